// src/commands/params.rs

//! Invocation tokens and parameter binding.
//!
//! [`ArgTokens`] is a cheaply-cloneable window over the whitespace-split
//! tokens of one invocation. It keeps byte spans into the original text so a
//! capture-rest parameter can recover the remaining tokens exactly as the
//! author delimited them.

use crate::errors::ParlanceError;
use std::sync::Arc;

/// Byte range of one token within the original invocation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A window over the token sequence of one invocation. `tail()` narrows the
/// window by one token without copying the underlying text.
#[derive(Debug, Clone)]
pub struct ArgTokens {
    text: Arc<str>,
    spans: Arc<[Span]>,
    start: usize,
}

impl ArgTokens {
    /// Tokenizes `text` on whitespace. Runs of delimiters produce no empty
    /// tokens; the original text is retained for verbatim capture.
    pub fn parse(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let mut spans = Vec::new();
        let mut token_start: Option<usize> = None;
        for (i, ch) in text.char_indices() {
            if ch.is_whitespace() {
                if let Some(start) = token_start.take() {
                    spans.push(Span { start, end: i });
                }
            } else if token_start.is_none() {
                token_start = Some(i);
            }
        }
        if let Some(start) = token_start {
            spans.push(Span {
                start,
                end: text.len(),
            });
        }

        Self {
            text: Arc::from(text),
            spans: spans.into(),
            start: 0,
        }
    }

    /// Number of tokens visible in this window.
    pub fn len(&self) -> usize {
        self.spans.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.spans.len()
    }

    /// The `index`-th token of this window.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.spans
            .get(self.start + index)
            .map(|span| &self.text[span.start..span.end])
    }

    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    /// A window starting one token later. Narrowing past the end yields an
    /// empty window.
    pub fn tail(&self) -> Self {
        Self {
            text: Arc::clone(&self.text),
            spans: Arc::clone(&self.spans),
            start: (self.start + 1).min(self.spans.len()),
        }
    }

    /// The verbatim text from the `from`-th token of this window through the
    /// end of the final token, inner delimiters intact.
    pub fn remainder(&self, from: usize) -> Option<&str> {
        let first = self.spans.get(self.start + from)?;
        let last = self.spans.last()?;
        Some(&self.text[first.start..last.end])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.spans[self.start..]
            .iter()
            .map(|span| &self.text[span.start..span.end])
    }

    /// The full original text this window was parsed from.
    pub fn source(&self) -> &str {
        &self.text
    }
}

/// The value shape a parameter binds its token into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    String,
    Int,
    Float,
    Bool,
    /// An opaque platform identifier: non-empty, alphanumeric plus `-`/`_`.
    Id,
}

impl ParamShape {
    /// Binds a single token into a value of this shape.
    pub fn bind(&self, token: &str) -> Result<ParamValue, ParlanceError> {
        match self {
            ParamShape::String => Ok(ParamValue::String(token.to_string())),
            ParamShape::Int => Ok(ParamValue::Int(token.parse::<i64>()?)),
            ParamShape::Float => Ok(ParamValue::Float(token.parse::<f64>()?)),
            ParamShape::Bool => Ok(ParamValue::Bool(token.parse::<bool>()?)),
            ParamShape::Id => {
                let valid = !token.is_empty()
                    && token
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
                if valid {
                    Ok(ParamValue::Id(token.to_string()))
                } else {
                    Err(ParlanceError::NotAnIdentifier)
                }
            }
        }
    }
}

/// One declared parameter of a leaf command.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    shape: ParamShape,
    optional: bool,
    rest: bool,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, shape: ParamShape) -> Self {
        Self {
            name: name.into(),
            shape,
            optional: false,
            rest: false,
        }
    }

    pub fn optional(name: impl Into<String>, shape: ParamShape) -> Self {
        Self {
            name: name.into(),
            shape,
            optional: true,
            rest: false,
        }
    }

    /// A capture-rest parameter: consumes every remaining token verbatim.
    /// Always string-shaped and only valid in final position.
    pub fn rest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: ParamShape::String,
            optional: false,
            rest: true,
        }
    }

    pub fn optional_rest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: ParamShape::String,
            optional: true,
            rest: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ParamShape {
        self.shape
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_rest(&self) -> bool {
        self.rest
    }
}

/// A bound argument value, in declaration order. Trailing unfilled optional
/// parameters are simply absent from the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Id(String),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) | ParamValue::Id(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// Whether `provided` tokens can satisfy `params`: at least every required
/// parameter filled, and no extra tokens unless a capture-rest absorbs them.
pub fn accepts_arity(params: &[ParamSpec], provided: usize) -> bool {
    let required = params.iter().filter(|p| !p.is_optional()).count();
    let has_rest = params.last().is_some_and(|p| p.is_rest());
    provided >= required && (has_rest || provided <= params.len())
}

/// Positionally binds `args` against `params`. Callers are expected to have
/// checked arity first; a shape mismatch or missing required token is an
/// error here.
pub fn bind_values(
    params: &[ParamSpec],
    args: &ArgTokens,
    command: &str,
) -> Result<Vec<ParamValue>, ParlanceError> {
    let mut values = Vec::with_capacity(params.len());
    for (index, param) in params.iter().enumerate() {
        if param.is_rest() {
            if let Some(text) = args.remainder(index) {
                values.push(ParamValue::String(text.to_string()));
            } else if !param.is_optional() {
                return Err(ParlanceError::WrongArgumentCount(command.to_string()));
            }
            break;
        }

        match args.get(index) {
            Some(token) => values.push(param.shape().bind(token)?),
            None if param.is_optional() => break,
            None => return Err(ParlanceError::WrongArgumentCount(command.to_string())),
        }
    }
    Ok(values)
}
