//! Story tree engine core.
//!
//! Characters carry schema-bounded characteristics (numeric values clamped to
//! a class range, or boolean flags) and each character may own a directed
//! graph of actions. Traversing a graph under the current state yields the
//! option paths a character can take; executing a path applies its
//! expressions to the state of any character.
//!
//! The [`Engine`] facade drives loading and answers queries. The lower-level
//! modules are public for embedding and testing.

pub mod character;
pub mod config;
pub mod engine;
pub mod error;
pub mod expression;
pub mod graph;
pub mod record;
pub mod schema;
pub mod traversal;
pub mod value;

pub use character::{Character, CharacterRegistry, Characteristic, CharacteristicStore};
pub use config::{ClassDedup, DuplicatePolicy, EngineConfig};
pub use engine::Engine;
pub use error::{SchemaError, StoryError, StoryResult};
pub use graph::{Action, ActionGraph, ActionId, Comparator, Expression, Operation, Precondition};
pub use record::{
    ActionRecord, CharacterDocument, CharacteristicRecord, ConditionRecord, SchemaRecord,
};
pub use schema::{SchemaClass, SchemaRegistry};
pub use value::Value;
