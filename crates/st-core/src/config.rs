//! Engine configuration.

/// How class tags of committed options affect later branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassDedup {
    /// Skip any branch whose class tag was already consumed by an earlier option.
    #[default]
    SkipConsumed,
    /// Record consumed tags but never skip on them.
    RecordOnly,
}

/// What happens when the character document repeats a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first registration and carry on.
    #[default]
    Ignore,
    /// Fail the load with `DuplicateCharacter`.
    Reject,
}

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Characters registered after every character load.
    pub builtin_characters: Vec<String>,
    /// Class de-duplication during option search.
    pub class_dedup: ClassDedup,
    /// Handling of repeated character names.
    pub duplicate_characters: DuplicatePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            builtin_characters: vec!["World".to_string(), "Player".to_string()],
            class_dedup: ClassDedup::SkipConsumed,
            duplicate_characters: DuplicatePolicy::Ignore,
        }
    }
}

impl EngineConfig {
    /// Set the class de-duplication policy.
    pub fn with_class_dedup(mut self, dedup: ClassDedup) -> Self {
        self.class_dedup = dedup;
        self
    }

    /// Set the duplicate character policy.
    pub fn with_duplicate_characters(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_characters = policy;
        self
    }

    /// Replace the built-in character names.
    pub fn with_builtin_characters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builtin_characters = names.into_iter().map(Into::into).collect();
        self
    }
}
