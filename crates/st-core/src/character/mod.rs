//! Characters and the name-keyed registry that owns them.

pub mod characteristic;

pub use characteristic::{Characteristic, CharacteristicStore};

use std::collections::HashMap;

use crate::error::{StoryError, StoryResult};
use crate::graph::ActionGraph;

/// A named character with its own state and, optionally, its own action graph.
#[derive(Debug, Clone)]
pub struct Character {
    /// Unique name.
    pub name: String,
    /// Characteristic values owned by this character.
    pub characteristics: CharacteristicStore,
    graph: Option<ActionGraph>,
}

impl Character {
    /// Create a character with no characteristics and no graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            characteristics: CharacteristicStore::new(),
            graph: None,
        }
    }

    /// The attached action graph, if any.
    pub fn graph(&self) -> Option<&ActionGraph> {
        self.graph.as_ref()
    }

    /// Attach an action graph. A character accepts exactly one.
    pub fn attach_graph(&mut self, graph: ActionGraph) -> StoryResult<()> {
        if self.graph.is_some() {
            return Err(StoryError::GraphAlreadyAttached(self.name.clone()));
        }
        self.graph = Some(graph);
        Ok(())
    }
}

/// Insertion-ordered collection of characters keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CharacterRegistry {
    characters: Vec<Character>,
    by_name: HashMap<String, usize>,
}

impl CharacterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a character. Returns false (and changes nothing) if the name exists.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.by_name.insert(name.to_string(), self.characters.len());
        self.characters.push(Character::new(name));
        true
    }

    /// Returns true if a character with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up a character by name.
    pub fn get(&self, name: &str) -> StoryResult<&Character> {
        self.by_name
            .get(name)
            .and_then(|&idx| self.characters.get(idx))
            .ok_or_else(|| StoryError::UnknownCharacter(name.to_string()))
    }

    /// Look up a character by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> StoryResult<&mut Character> {
        self.by_name
            .get(name)
            .and_then(|&idx| self.characters.get_mut(idx))
            .ok_or_else(|| StoryError::UnknownCharacter(name.to_string()))
    }

    /// Character names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.characters.iter().map(|c| c.name.as_str()).collect()
    }

    /// Characters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    /// Number of registered characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// True until a character has been registered.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Run `f` with the named character's graph lent out while the registry
    /// stays mutable, so preconditions and expressions can write any
    /// character's state, the graph owner included.
    pub(crate) fn with_graph<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&ActionGraph, &mut Self) -> StoryResult<T>,
    ) -> StoryResult<T> {
        let graph = self
            .get_mut(name)?
            .graph
            .take()
            .ok_or_else(|| StoryError::MissingGraph(name.to_string()))?;

        let result = f(&graph, self);

        if let Ok(character) = self.get_mut(name) {
            character.graph = Some(graph);
        }
        result
    }
}
