//! Characteristic values and the comparison rules shared by preconditions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A characteristic value: an integer for numeric classes, a flag for boolean ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Number(i64),
}

impl Value {
    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// The value as an integer; booleans count as 0/1.
    pub fn as_number(&self) -> i64 {
        match self {
            Self::Number(n) => *n,
            Self::Bool(b) => i64::from(*b),
        }
    }

    /// The value as a flag; numbers are true when non-zero.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0,
        }
    }

    /// Order two values. Booleans compare with `false < true`; mixed kinds
    /// compare as integers.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            _ => self.as_number().cmp(&other.as_number()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_untagged() {
        let v: Value = serde_json::from_str("true").unwrap();
        assert_eq!(v, Value::Bool(true));
        let v: Value = serde_json::from_str("-4").unwrap();
        assert_eq!(v, Value::Number(-4));
    }

    #[test]
    fn mixed_kinds_compare_as_integers() {
        assert_eq!(Value::Bool(true).compare(&Value::Number(1)), Ordering::Equal);
        assert_eq!(Value::Number(0).compare(&Value::Bool(true)), Ordering::Less);
    }

    #[test]
    fn booleans_order_false_first() {
        assert_eq!(Value::Bool(false).compare(&Value::Bool(true)), Ordering::Less);
    }

    #[test]
    fn coercions() {
        assert!(Value::Number(-3).as_bool());
        assert!(!Value::Number(0).as_bool());
        assert_eq!(Value::Bool(true).as_number(), 1);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Number(7).to_string(), "7");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }
}
