// tests/property/binding_test.rs

//! Property-based tests for parameter binding
//! Arity acceptance must predict binding success, and shaped binds must
//! round-trip their tokens.

use parlance::ParlanceError;
use parlance::commands::{ArgTokens, ParamShape, ParamSpec, ParamValue, accepts_arity, bind_values};
use proptest::prelude::*;

fn string_specs(required: usize, optional: usize, rest: bool) -> Vec<ParamSpec> {
    let mut specs = Vec::new();
    for i in 0..required {
        specs.push(ParamSpec::required(format!("r{i}"), ParamShape::String));
    }
    for i in 0..optional {
        specs.push(ParamSpec::optional(format!("o{i}"), ParamShape::String));
    }
    if rest {
        specs.push(ParamSpec::optional_rest("extra"));
    }
    specs
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_accepted_arity_always_binds_string_shapes(
        required in 0usize..4,
        optional in 0usize..3,
        rest in proptest::bool::ANY,
        tokens in prop::collection::vec("[a-z0-9]{1,8}", 0..10),
    ) {
        let specs = string_specs(required, optional, rest);
        let parsed = ArgTokens::parse(tokens.join(" "));
        if accepts_arity(&specs, parsed.len()) {
            let values = bind_values(&specs, &parsed, "probe").unwrap();
            prop_assert_eq!(values.len(), parsed.len().min(specs.len()));
        }
    }

    #[test]
    fn test_missing_required_tokens_never_bind(
        required in 1usize..5,
        provided in 0usize..4,
        token in "[a-z0-9]{1,8}",
    ) {
        prop_assume!(provided < required);
        let specs: Vec<ParamSpec> = (0..required)
            .map(|i| ParamSpec::required(format!("r{i}"), ParamShape::String))
            .collect();
        let parsed = ArgTokens::parse(vec![token; provided].join(" "));

        prop_assert!(!accepts_arity(&specs, parsed.len()));
        let err = bind_values(&specs, &parsed, "probe").unwrap_err();
        prop_assert!(matches!(err, ParlanceError::WrongArgumentCount(name) if name == "probe"));
    }

    #[test]
    fn test_rest_capture_is_verbatim(
        head in "[a-z0-9]{1,8}",
        rest_tokens in prop::collection::vec("[a-z0-9]{1,8}", 1..6),
    ) {
        let specs = vec![
            ParamSpec::required("target", ParamShape::String),
            ParamSpec::rest("reason"),
        ];
        // Double-space the join so captures must keep inner delimiters.
        let joined = rest_tokens.join("  ");
        let parsed = ArgTokens::parse(format!("{head} {joined}"));

        let values = bind_values(&specs, &parsed, "probe").unwrap();
        prop_assert_eq!(values.len(), 2);
        prop_assert_eq!(&values[0], &ParamValue::String(head));
        prop_assert_eq!(&values[1], &ParamValue::String(joined));
    }

    #[test]
    fn test_int_binding_round_trips(value in any::<i64>()) {
        let bound = ParamShape::Int.bind(&value.to_string()).unwrap();
        prop_assert_eq!(bound, ParamValue::Int(value));
    }

    #[test]
    fn test_bool_binding_accepts_only_the_literals(token in "[a-zA-Z01]{1,5}") {
        let accepted = ParamShape::Bool.bind(&token).is_ok();
        prop_assert_eq!(accepted, token == "true" || token == "false");
    }

    #[test]
    fn test_id_accepts_word_tokens(token in "[a-zA-Z0-9_-]{1,20}") {
        let bound = ParamShape::Id.bind(&token).unwrap();
        prop_assert_eq!(bound, ParamValue::Id(token));
    }

    #[test]
    fn test_id_rejects_other_characters(
        prefix in "[a-zA-Z0-9_-]{0,8}",
        bad in "[!@#$%^&*()+=.:/ ]",
        suffix in "[a-zA-Z0-9_-]{0,8}",
    ) {
        let token = format!("{prefix}{bad}{suffix}");
        let err = ParamShape::Id.bind(&token).unwrap_err();
        prop_assert!(matches!(err, ParlanceError::NotAnIdentifier));
    }
}
