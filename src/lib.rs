//! A hand-written JSON lexer and recursive-descent parser.
//!
//! [`parse`] turns JSON text into a [`Value`] tree. The [`Lexer`] is pulled
//! one token at a time by the [`Parser`] and never fails on its own: input it
//! cannot classify comes back as an `Invalid` token for the parser to report.
//!
//! The grammar is permissive in places (numbers, bare words, trailing
//! commas); [`ParseOptions`] controls the behaviours that are configurable.
//! Parsed trees can be walked with an [`Explorer`].

use std::collections::HashMap;

mod explore;
mod options;
mod parse;
mod tokenize;

pub use explore::{ExploreError, Explorer, FromValue, Key};
pub use options::{EscapePolicy, ParseOptions};
pub use parse::{parse, parse_with_options, EscapeError, ParseError, Parser};
pub use tokenize::{tokenize, Lexer, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// literal characters `null`
    Null,

    /// literal characters `true` or `false`
    Bool(bool),

    /// every JSON number, integer or not
    Number(f64),

    /// a string with its escapes decoded
    String(String),

    /// an array of values, in document order
    Array(Vec<Value>),

    /// an object with key-value pairs; a repeated key keeps its last value
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Looks up `index` if this is an array.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Starts a path traversal rooted at this value.
    pub fn explore(&self) -> Explorer<'_> {
        Explorer::new(self)
    }
}
