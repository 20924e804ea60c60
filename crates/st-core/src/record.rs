//! Already-parsed input documents.
//!
//! These mirror the JSON documents a loader reads: one schema list, one
//! character record set, and one action list per character. Field names
//! follow the document keys (`isBoolean`, `defaultVal`, `type`, `leadsTo`).

use serde::{Deserialize, Serialize};

use crate::graph::ActionId;
use crate::value::Value;

/// One characteristic class in the schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRecord {
    /// Class name.
    pub class: String,
    /// Subtype names.
    pub types: Vec<String>,
    /// Whether characteristics of this class are flags.
    #[serde(rename = "isBoolean", default)]
    pub is_boolean: bool,
    /// Lower bound. Required for numeric classes, ignored for boolean ones.
    #[serde(default)]
    pub min: Option<i64>,
    /// Upper bound. Required for numeric classes, ignored for boolean ones.
    #[serde(default)]
    pub max: Option<i64>,
    /// Starting value shared by every subtype of the class.
    #[serde(rename = "defaultVal")]
    pub default_val: Value,
}

/// The character document: names plus explicit starting values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterDocument {
    /// Character names, in registration order.
    pub characters: Vec<String>,
    /// Explicit characteristic values.
    #[serde(default)]
    pub characteristics: Vec<CharacteristicRecord>,
}

/// A starting value for one characteristic of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicRecord {
    /// Owning character.
    pub name: String,
    /// Schema class.
    pub class: String,
    /// Subtype within the class.
    #[serde(rename = "type")]
    pub subtype: String,
    /// Starting value, clamped into the class bounds.
    pub value: Value,
}

/// One node of a character's action graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Unique id within the graph.
    pub uid: ActionId,
    /// Unique name within the graph.
    pub name: String,
    /// Marks a root action.
    #[serde(default)]
    pub first: bool,
    /// Optional class tag used for option de-duplication.
    #[serde(default)]
    pub class: Option<String>,
    /// Gating tests, all of which must pass.
    #[serde(default)]
    pub preconditions: Vec<ConditionRecord>,
    /// State changes applied on execution.
    #[serde(default)]
    pub expressions: Vec<ConditionRecord>,
    /// Child uids, in traversal order.
    #[serde(rename = "leadsTo", default)]
    pub leads_to: Vec<ActionId>,
    /// Parent uids.
    #[serde(default)]
    pub parents: Vec<ActionId>,
}

/// A precondition or expression as written in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    /// Character whose characteristic is read or written.
    pub character: String,
    /// Schema class.
    pub class: String,
    /// Subtype within the class.
    #[serde(rename = "type")]
    pub subtype: String,
    /// Operator string, e.g. `>` or `+=`.
    pub operation: String,
    /// Right-hand operand.
    pub value: Value,
}
