//! Precondition-gated search for legal action paths.
//!
//! Starting from the graph's roots in declaration order, the search walks
//! children depth-first in declaration order. An action is entered only if
//! all of its preconditions hold; a leaf that is reached commits the path
//! from its root to itself as one option. The search stops the moment the
//! requested number of options has been collected.

use std::collections::HashSet;

use crate::character::CharacterRegistry;
use crate::config::ClassDedup;
use crate::error::{StoryError, StoryResult};
use crate::graph::{Action, ActionGraph, ActionId, Precondition};
use crate::schema::SchemaRegistry;

/// Evaluate one precondition, materializing the characteristic if needed.
pub fn evaluate_precondition(
    precondition: &Precondition,
    characters: &mut CharacterRegistry,
    schema: &SchemaRegistry,
) -> StoryResult<bool> {
    let characteristic = characters
        .get_mut(&precondition.character)?
        .characteristics
        .get_or_create(&precondition.class, &precondition.subtype, schema)?;
    Ok(precondition
        .comparator
        .holds(&characteristic.value, &precondition.value))
}

/// Returns true if every precondition of the action holds. Stops at the first failure.
pub fn preconditions_hold(
    action: &Action,
    characters: &mut CharacterRegistry,
    schema: &SchemaRegistry,
) -> StoryResult<bool> {
    for precondition in &action.preconditions {
        if !evaluate_precondition(precondition, characters, schema)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// One run of the option search over a single graph.
pub struct Traversal<'a> {
    owner: &'a str,
    graph: &'a ActionGraph,
    schema: &'a SchemaRegistry,
    dedup: ClassDedup,
    remaining: usize,
    path: Vec<ActionId>,
    consumed: HashSet<String>,
    options: Vec<Vec<ActionId>>,
}

impl<'a> Traversal<'a> {
    /// Prepare a search of `owner`'s graph for up to `limit` options.
    pub fn new(
        owner: &'a str,
        graph: &'a ActionGraph,
        schema: &'a SchemaRegistry,
        limit: usize,
    ) -> Self {
        Self {
            owner,
            graph,
            schema,
            dedup: ClassDedup::default(),
            remaining: limit,
            path: Vec::new(),
            consumed: HashSet::new(),
            options: Vec::new(),
        }
    }

    /// Choose how class tags of committed options prune later branches.
    pub fn with_dedup(mut self, dedup: ClassDedup) -> Self {
        self.dedup = dedup;
        self
    }

    /// Run the search and return the committed option paths.
    pub fn run(mut self, characters: &mut CharacterRegistry) -> StoryResult<Vec<Vec<ActionId>>> {
        for &root in self.graph.firsts() {
            if self.remaining == 0 {
                break;
            }
            self.visit(root, characters)?;
        }
        Ok(self.options)
    }

    fn visit(&mut self, uid: ActionId, characters: &mut CharacterRegistry) -> StoryResult<()> {
        let graph = self.graph;
        let action = graph.get(uid).ok_or_else(|| StoryError::UnknownUid {
            character: self.owner.to_string(),
            uid,
        })?;

        if !preconditions_hold(action, characters, self.schema)? {
            return Ok(());
        }

        if let Some(tag) = action.class_tag() {
            if self.dedup == ClassDedup::SkipConsumed && self.consumed.contains(tag) {
                tracing::trace!(owner = self.owner, %uid, tag, "skipping consumed class");
                return Ok(());
            }
        }

        self.path.push(uid);

        if action.is_leaf() {
            tracing::debug!(owner = self.owner, path = ?self.path, "committed option");
            self.options.push(self.path.clone());
            if let Some(tag) = action.class_tag() {
                self.consumed.insert(tag.to_string());
            }
            self.remaining -= 1;
        } else {
            for &child in &action.children {
                if self.remaining == 0 {
                    break;
                }
                if self.path.contains(&child) {
                    tracing::warn!(owner = self.owner, %uid, %child, "cycle in action graph");
                    continue;
                }
                self.visit(child, characters)?;
            }
        }

        self.path.pop();
        Ok(())
    }
}

/// Collect up to `limit` legal option paths from `owner`'s graph.
pub fn options(
    owner: &str,
    graph: &ActionGraph,
    characters: &mut CharacterRegistry,
    schema: &SchemaRegistry,
    limit: usize,
    dedup: ClassDedup,
) -> StoryResult<Vec<Vec<ActionId>>> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    Traversal::new(owner, graph, schema, limit)
        .with_dedup(dedup)
        .run(characters)
}
