//! Read-only navigation over a parsed [`Value`].
//!
//! An [`Explorer`] carries either the node reached so far or the first error
//! met on the way, so steps can be chained without checking each one:
//!
//! ```
//! use json_parser::parse;
//!
//! let value = parse(r#"{"users": [{"id": 7}]}"#).unwrap();
//! let id: u32 = value.explore().field("users").at(0).field("id").get().unwrap();
//! assert_eq!(id, 7);
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExploreError {
    #[error("index out of range: {index} (array length: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot index into {found}")]
    NotAnArray { found: &'static str },

    #[error("key `{key}` not found in object")]
    MissingKey { key: String },

    #[error("cannot look up key `{key}` in {found}")]
    NotAnObject { key: String, found: &'static str },

    #[error("key `{key}` not found below this node")]
    KeyNotFound { key: String },

    #[error("cannot convert {found} to {target}")]
    TypeMismatch {
        found: &'static str,
        target: &'static str,
    },

    #[error("cannot convert {value} to {target} without loss")]
    LossyConversion { value: f64, target: &'static str },
}

/// One step of a [`Explorer::traverse`] path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'k> {
    Index(usize),
    Field(&'k str),
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(field: &'k str) -> Self {
        Key::Field(field)
    }
}

impl<'k> From<&'k String> for Key<'k> {
    fn from(field: &'k String) -> Self {
        Key::Field(field)
    }
}

#[derive(Debug, Clone)]
pub struct Explorer<'v> {
    node: Result<&'v Value, ExploreError>,
}

impl<'v> Explorer<'v> {
    pub fn new(value: &'v Value) -> Self {
        Self { node: Ok(value) }
    }

    fn step<F>(self, f: F) -> Self
    where
        F: FnOnce(&'v Value) -> Result<&'v Value, ExploreError>,
    {
        Self {
            node: self.node.and_then(f),
        }
    }

    /// Moves to element `index` of an array.
    pub fn at(self, index: usize) -> Self {
        self.step(|node| match node {
            Value::Array(items) => items.get(index).ok_or(ExploreError::IndexOutOfRange {
                index,
                len: items.len(),
            }),
            other => Err(ExploreError::NotAnArray {
                found: other.type_name(),
            }),
        })
    }

    /// Moves to member `key` of an object.
    pub fn field(self, key: &str) -> Self {
        self.step(|node| match node {
            Value::Object(map) => map.get(key).ok_or_else(|| ExploreError::MissingKey {
                key: key.to_string(),
            }),
            other => Err(ExploreError::NotAnObject {
                key: key.to_string(),
                found: other.type_name(),
            }),
        })
    }

    /// Applies [`at`](Self::at) or [`field`](Self::field) for each key in
    /// turn, stopping at the first failure.
    pub fn traverse<'k, I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key<'k>>,
    {
        for key in keys {
            if self.node.is_err() {
                break;
            }
            self = match key.into() {
                Key::Index(index) => self.at(index),
                Key::Field(field) => self.field(field),
            };
        }
        self
    }

    /// Moves to the first value stored under `key` anywhere below the current
    /// node, depth first. Arrays are searched in element order; an object's
    /// own entries are checked before its children, which are visited in no
    /// particular order.
    pub fn find_key(self, key: &str) -> Self {
        self.step(|node| {
            find_below(node, key).ok_or_else(|| ExploreError::KeyNotFound {
                key: key.to_string(),
            })
        })
    }

    pub fn value(&self) -> Result<&'v Value, ExploreError> {
        self.node.clone()
    }

    /// Extracts the current node as a concrete type.
    pub fn get<T: FromValue<'v>>(&self) -> Result<T, ExploreError> {
        T::from_value(self.value()?)
    }
}

fn find_below<'v>(node: &'v Value, key: &str) -> Option<&'v Value> {
    match node {
        Value::Array(items) => items.iter().find_map(|item| find_below(item, key)),
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|child| find_below(child, key))),
        _ => None,
    }
}

/// Typed extraction from a [`Value`].
///
/// Non-numeric targets match their variant exactly. Integer targets accept a
/// `Number` only when it has no fractional part and fits the type.
pub trait FromValue<'v>: Sized {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError>;
}

fn mismatch(value: &Value, target: &'static str) -> ExploreError {
    ExploreError::TypeMismatch {
        found: value.type_name(),
        target,
    }
}

impl<'v> FromValue<'v> for &'v Value {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
        Ok(value)
    }
}

impl<'v> FromValue<'v> for bool {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
        value.as_bool().ok_or_else(|| mismatch(value, "bool"))
    }
}

impl<'v> FromValue<'v> for f64 {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
        value.as_f64().ok_or_else(|| mismatch(value, "f64"))
    }
}

impl<'v> FromValue<'v> for &'v str {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
        value.as_str().ok_or_else(|| mismatch(value, "&str"))
    }
}

impl<'v> FromValue<'v> for String {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
        <&str>::from_value(value).map(str::to_string)
    }
}

impl<'v> FromValue<'v> for &'v [Value] {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
        value.as_array().ok_or_else(|| mismatch(value, "array"))
    }
}

impl<'v> FromValue<'v> for &'v HashMap<String, Value> {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
        value.as_object().ok_or_else(|| mismatch(value, "object"))
    }
}

impl<'v, T: FromValue<'v>> FromValue<'v> for Option<T> {
    fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {$(
        impl<'v> FromValue<'v> for $t {
            fn from_value(value: &'v Value) -> Result<Self, ExploreError> {
                let number = value.as_f64().ok_or_else(|| mismatch(value, stringify!($t)))?;
                // MIN and MAX + 1 are both exactly representable as f64
                let (min, end) = (<$t>::MIN as f64, <$t>::MAX as f64 + 1.0);
                if number.fract() != 0.0 || number < min || number >= end {
                    return Err(ExploreError::LossyConversion {
                        value: number,
                        target: stringify!($t),
                    });
                }
                Ok(number as $t)
            }
        }
    )*};
}

from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
