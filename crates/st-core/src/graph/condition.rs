//! Preconditions and expressions attached to actions.
//!
//! Both point at one (character, class, subtype) characteristic. Operator
//! strings are parsed once, when the graph is built.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoryError;
use crate::record::ConditionRecord;
use crate::value::Value;

/// Comparison used by a precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `==`
    Equal,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
    /// `!=`
    NotEqual,
}

impl Comparator {
    /// Returns true if `lhs <op> rhs` holds.
    pub fn holds(&self, lhs: &Value, rhs: &Value) -> bool {
        let ord = lhs.compare(rhs);
        match self {
            Self::Greater => ord == Ordering::Greater,
            Self::Less => ord == Ordering::Less,
            Self::Equal => ord == Ordering::Equal,
            Self::GreaterOrEqual => ord != Ordering::Less,
            Self::LessOrEqual => ord != Ordering::Greater,
            Self::NotEqual => ord != Ordering::Equal,
        }
    }

    /// The operator as written in documents.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::Less => "<",
            Self::Equal => "==",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::NotEqual => "!=",
        }
    }
}

impl FromStr for Comparator {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" => Ok(Self::Greater),
            "<" => Ok(Self::Less),
            "==" | "===" => Ok(Self::Equal),
            ">=" => Ok(Self::GreaterOrEqual),
            "<=" => Ok(Self::LessOrEqual),
            "!=" | "!==" => Ok(Self::NotEqual),
            other => Err(StoryError::UnknownOperator(other.to_string())),
        }
    }
}

/// State change applied by an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// `=`
    Assign,
    /// `+=` or `+`
    Add,
    /// `-=` or `-`
    Subtract,
    /// `*=` or `*`
    Multiply,
    /// `/=` or `/`
    Divide,
    /// `!` or `toggle`
    Toggle,
}

impl Operation {
    /// The canonical operator string.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Subtract => "-=",
            Self::Multiply => "*=",
            Self::Divide => "/=",
            Self::Toggle => "!",
        }
    }
}

impl FromStr for Operation {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(Self::Assign),
            "+=" | "+" => Ok(Self::Add),
            "-=" | "-" => Ok(Self::Subtract),
            "*=" | "*" => Ok(Self::Multiply),
            "/=" | "/" => Ok(Self::Divide),
            "!" | "toggle" => Ok(Self::Toggle),
            other => Err(StoryError::UnknownOperator(other.to_string())),
        }
    }
}

/// A read-only test gating traversal into an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precondition {
    /// Character whose state is read.
    pub character: String,
    /// Schema class.
    pub class: String,
    /// Subtype within the class.
    pub subtype: String,
    /// Comparison to apply.
    pub comparator: Comparator,
    /// Right-hand side of the comparison.
    pub value: Value,
}

impl TryFrom<&ConditionRecord> for Precondition {
    type Error = StoryError;

    fn try_from(record: &ConditionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            character: record.character.clone(),
            class: record.class.clone(),
            subtype: record.subtype.clone(),
            comparator: record.operation.parse()?,
            value: record.value,
        })
    }
}

/// A state change applied when an action executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    /// Character whose state is written; may differ from the graph owner.
    pub character: String,
    /// Schema class.
    pub class: String,
    /// Subtype within the class.
    pub subtype: String,
    /// Operation to apply.
    pub operation: Operation,
    /// Operand.
    pub value: Value,
}

impl TryFrom<&ConditionRecord> for Expression {
    type Error = StoryError;

    fn try_from(record: &ConditionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            character: record.character.clone(),
            class: record.class.clone(),
            subtype: record.subtype.clone(),
            operation: record.operation.parse()?,
            value: record.value,
        })
    }
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{} {} {}",
            self.character,
            self.class,
            self.subtype,
            self.comparator.symbol(),
            self.value
        )
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{} {} {}",
            self.character,
            self.class,
            self.subtype,
            self.operation.symbol(),
            self.value
        )
    }
}
