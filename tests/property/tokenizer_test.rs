// tests/property/tokenizer_test.rs

//! Property-based tests for invocation tokenization
//! Tokens must agree with whitespace splitting while remainder slices keep
//! the original text verbatim.

use parlance::commands::ArgTokens;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_tokens_match_whitespace_split(text in r"[ \t!0-9a-zé☃]{0,120}") {
        let tokens = ArgTokens::parse(text.clone());
        let expected: Vec<&str> = text.split_whitespace().collect();

        prop_assert_eq!(tokens.len(), expected.len());
        prop_assert_eq!(tokens.is_empty(), expected.is_empty());
        for (index, word) in expected.iter().enumerate() {
            prop_assert_eq!(tokens.get(index), Some(*word));
        }
    }

    #[test]
    fn test_tokens_are_nonempty_and_unpadded(text in r"[ \t!0-9a-zé]{0,120}") {
        let tokens = ArgTokens::parse(text);
        for token in tokens.iter() {
            prop_assert!(!token.is_empty());
            prop_assert!(!token.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn test_tail_drops_exactly_the_first_token(text in r"[ \t0-9a-z]{0,120}") {
        let tokens = ArgTokens::parse(text);
        let tail = tokens.tail();

        prop_assert_eq!(tail.len(), tokens.len().saturating_sub(1));
        for index in 0..tail.len() {
            prop_assert_eq!(tail.get(index), tokens.get(index + 1));
        }
        // Narrowing is non-destructive and keeps the backing text.
        prop_assert_eq!(tokens.len(), ArgTokens::parse(tokens.source()).len());
        prop_assert_eq!(tail.source(), tokens.source());
    }

    #[test]
    fn test_remainder_retokenizes_to_the_suffix(text in r"[ \t!0-9a-zé]{0,120}") {
        let tokens = ArgTokens::parse(text);
        for from in 0..tokens.len() {
            let remainder = tokens.remainder(from).unwrap();
            prop_assert!(remainder.starts_with(tokens.get(from).unwrap()));
            prop_assert!(remainder.ends_with(tokens.get(tokens.len() - 1).unwrap()));

            let reparsed = ArgTokens::parse(remainder);
            prop_assert_eq!(reparsed.len(), tokens.len() - from);
            for index in 0..reparsed.len() {
                prop_assert_eq!(reparsed.get(index), tokens.get(from + index));
            }
        }
        prop_assert_eq!(tokens.remainder(tokens.len()), None);
    }

    #[test]
    fn test_source_round_trips(text in r"[ \t!0-9a-zé]{0,120}") {
        let tokens = ArgTokens::parse(text.clone());
        prop_assert_eq!(tokens.source(), text.as_str());
    }
}
