//! Per-character action graphs.
//!
//! An [`ActionGraph`] is a directed graph of [`Action`] nodes with a list of
//! root uids ("firsts") and a name lookup. Graphs are built from a
//! character's action document in two passes: structure first, class tags
//! second, so tags are applied to a fully linked graph.

pub mod condition;

pub use condition::{Comparator, Expression, Operation, Precondition};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};
use crate::record::ActionRecord;

/// Identifier of an action, unique within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub i64);

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of an action graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Unique id within the graph.
    pub uid: ActionId,
    /// Unique name within the graph.
    pub name: String,
    /// Tests that must all pass before traversal enters this action.
    pub preconditions: Vec<Precondition>,
    /// State changes applied when the action executes.
    pub expressions: Vec<Expression>,
    /// Child uids in declaration order.
    pub children: Vec<ActionId>,
    /// Parent uids.
    pub parents: Vec<ActionId>,
    /// Class tag; empty when untagged.
    pub class: String,
}

impl Action {
    /// Create an action with no links, conditions or tag.
    pub fn new(uid: ActionId, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            preconditions: Vec::new(),
            expressions: Vec::new(),
            children: Vec::new(),
            parents: Vec::new(),
            class: String::new(),
        }
    }

    /// Returns true if the action has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Add a child uid, ignoring repeats.
    pub fn add_child(&mut self, uid: ActionId) {
        if !self.children.contains(&uid) {
            self.children.push(uid);
        }
    }

    /// Add a parent uid, ignoring repeats.
    pub fn add_parent(&mut self, uid: ActionId) {
        if !self.parents.contains(&uid) {
            self.parents.push(uid);
        }
    }

    /// The class tag, or `None` when untagged.
    pub fn class_tag(&self) -> Option<&str> {
        if self.class.is_empty() {
            None
        } else {
            Some(&self.class)
        }
    }
}

/// A character's directed graph of actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionGraph {
    actions: HashMap<ActionId, Action>,
    name_to_uid: HashMap<String, ActionId>,
    firsts: Vec<ActionId>,
}

impl ActionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a character's action document.
    ///
    /// The first pass registers every action with its conditions and links;
    /// the second applies class tags. Repeated uids or names, links to uids
    /// outside the document and unknown operator strings are rejected.
    pub fn from_records(character: &str, records: &[ActionRecord]) -> StoryResult<Self> {
        let mut graph = Self::new();

        for record in records {
            if graph.actions.contains_key(&record.uid) {
                return Err(StoryError::DuplicateUid {
                    character: character.to_string(),
                    uid: record.uid,
                });
            }
            if graph.name_to_uid.contains_key(&record.name) {
                return Err(StoryError::DuplicateActionName {
                    character: character.to_string(),
                    name: record.name.clone(),
                });
            }

            if record.first {
                graph.add_first(record.uid);
            }

            let action = graph.map_action(&record.name, record.uid);
            for pre in &record.preconditions {
                action.preconditions.push(Precondition::try_from(pre)?);
            }
            for exp in &record.expressions {
                action.expressions.push(Expression::try_from(exp)?);
            }
            for &child in &record.leads_to {
                action.add_child(child);
            }
            for &parent in &record.parents {
                action.add_parent(parent);
            }
        }

        graph.check_links(character)?;

        for record in records {
            if let Some(class) = &record.class {
                graph.set_class(record.uid, class);
            }
        }

        tracing::debug!(
            character,
            actions = graph.len(),
            roots = graph.firsts.len(),
            "built action graph"
        );
        Ok(graph)
    }

    /// Register `name -> uid` and create the action. Returns the new action.
    pub fn map_action(&mut self, name: &str, uid: ActionId) -> &mut Action {
        self.name_to_uid.insert(name.to_string(), uid);
        self.actions
            .entry(uid)
            .or_insert_with(|| Action::new(uid, name))
    }

    /// Mark a uid as a root, keeping declaration order.
    pub fn add_first(&mut self, uid: ActionId) {
        if !self.firsts.contains(&uid) {
            self.firsts.push(uid);
        }
    }

    /// Apply a class tag to an existing action. Returns false if the uid is unknown.
    pub fn set_class(&mut self, uid: ActionId, class: &str) -> bool {
        match self.actions.get_mut(&uid) {
            Some(action) => {
                action.class = class.to_string();
                true
            }
            None => false,
        }
    }

    /// Look up an action by uid.
    pub fn get(&self, uid: ActionId) -> Option<&Action> {
        self.actions.get(&uid)
    }

    /// Look up a uid by action name.
    pub fn uid_of(&self, name: &str) -> Option<ActionId> {
        self.name_to_uid.get(name).copied()
    }

    /// Root uids in declaration order.
    pub fn firsts(&self) -> &[ActionId] {
        &self.firsts
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if the graph has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Every child, parent and root uid must name an action in this graph.
    fn check_links(&self, character: &str) -> StoryResult<()> {
        let dangling = |from: ActionId, to: ActionId| StoryError::DanglingReference {
            character: character.to_string(),
            from,
            to,
        };

        for &root in &self.firsts {
            if !self.actions.contains_key(&root) {
                return Err(dangling(root, root));
            }
        }

        let mut uids: Vec<_> = self.actions.keys().copied().collect();
        uids.sort();
        for uid in uids {
            let Some(action) = self.actions.get(&uid) else {
                continue;
            };
            for &linked in action.children.iter().chain(&action.parents) {
                if !self.actions.contains_key(&linked) {
                    return Err(dangling(uid, linked));
                }
            }
        }
        Ok(())
    }
}
