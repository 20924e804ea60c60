//! Error types for the story tree engine.

use crate::graph::ActionId;

/// Convenience result type for engine operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Reasons a schema class definition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The schema document defines no classes at all.
    #[error("schema defines no classes")]
    NoClasses,

    /// A class definition has an empty name.
    #[error("class name is empty")]
    EmptyName,

    /// A class lists no subtypes.
    #[error("class '{0}' has no types")]
    NoTypes(String),

    /// A class lists an empty subtype name.
    #[error("class '{0}' has an empty type name")]
    EmptyType(String),

    /// A class lists the same subtype twice.
    #[error("class '{class}' lists type '{subtype}' twice")]
    DuplicateType {
        /// Class being validated.
        class: String,
        /// Repeated subtype name.
        subtype: String,
    },

    /// A numeric class omits `min` or `max`.
    #[error("class '{0}' is numeric but does not declare both min and max")]
    MissingBounds(String),

    /// A numeric class has `min > max`.
    #[error("class '{class}' has min ({min}) > max ({max})")]
    InvertedBounds {
        /// Class being validated.
        class: String,
        /// Declared lower bound.
        min: i64,
        /// Declared upper bound.
        max: i64,
    },

    /// A numeric class has a default outside its bounds.
    #[error("class '{class}' default {default} is outside [{min}, {max}]")]
    DefaultOutOfBounds {
        /// Class being validated.
        class: String,
        /// Declared default.
        default: i64,
        /// Declared lower bound.
        min: i64,
        /// Declared upper bound.
        max: i64,
    },

    /// The default value's kind does not match the class's boolean-ness.
    #[error("class '{0}' default value has the wrong kind")]
    DefaultKind(String),

    /// Two definitions share a class name.
    #[error("class '{0}' is defined twice")]
    DuplicateClass(String),
}

/// Errors that can occur while loading or querying the engine.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// A schema class definition failed validation.
    #[error("schema validation failed: {0}")]
    Schema(#[from] SchemaError),

    /// An earlier load failed; the engine no longer accepts calls.
    #[error("engine is poisoned by an earlier load failure")]
    BadFormatting,

    /// Loading has not finished yet.
    #[error("engine is still loading")]
    NotReady,

    /// A load phase was started before the phase it depends on.
    #[error("load order violated: {0}")]
    LoadOrder(&'static str),

    /// No character with this name is registered.
    #[error("unknown character: {0}")]
    UnknownCharacter(String),

    /// No schema class with this name is registered.
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// The class exists but does not list this subtype.
    #[error("class '{class}' has no type '{subtype}'")]
    UnknownSubtype {
        /// Class that was looked up.
        class: String,
        /// Missing subtype.
        subtype: String,
    },

    /// The character's graph has no action with this uid.
    #[error("{character} has no action with uid {uid}")]
    UnknownUid {
        /// Owner of the graph.
        character: String,
        /// Missing uid.
        uid: ActionId,
    },

    /// The character's graph has no action with this name.
    #[error("{character} has no action named '{name}'")]
    UnknownAction {
        /// Owner of the graph.
        character: String,
        /// Missing action name.
        name: String,
    },

    /// The character exists but has no action graph attached.
    #[error("{0} has no action graph")]
    MissingGraph(String),

    /// An action graph was attached to a character twice.
    #[error("{0} already has an action graph")]
    GraphAlreadyAttached(String),

    /// A character name was registered twice under the reject policy.
    #[error("character already exists: \"{0}\"")]
    DuplicateCharacter(String),

    /// Two actions in one graph share a uid.
    #[error("{character}'s graph defines uid {uid} twice")]
    DuplicateUid {
        /// Owner of the graph.
        character: String,
        /// Repeated uid.
        uid: ActionId,
    },

    /// Two actions in one graph share a name.
    #[error("{character}'s graph defines action '{name}' twice")]
    DuplicateActionName {
        /// Owner of the graph.
        character: String,
        /// Repeated name.
        name: String,
    },

    /// An action references a uid that is not in the graph.
    #[error("{character}'s action {from} references missing uid {to}")]
    DanglingReference {
        /// Owner of the graph.
        character: String,
        /// Action holding the reference.
        from: ActionId,
        /// Referenced uid.
        to: ActionId,
    },

    /// A precondition or expression uses an operator string the engine does not know.
    #[error("unknown operator: '{0}'")]
    UnknownOperator(String),

    /// An expression divided a characteristic by zero.
    #[error("division by zero on {class}.{subtype}")]
    DivisionByZero {
        /// Class of the target characteristic.
        class: String,
        /// Subtype of the target characteristic.
        subtype: String,
    },
}
