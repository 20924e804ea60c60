//! The engine facade: load phases, readiness, and the public queries.
//!
//! Loading happens in three phases (schema, characters, action graphs), each
//! fed with already-parsed records. Any load failure poisons the engine:
//! every later call returns [`StoryError::BadFormatting`] and nothing changes.
//! Queries and execution are only answered once [`Engine::is_ready`] holds.

use crate::character::{Characteristic, CharacterRegistry};
use crate::config::{DuplicatePolicy, EngineConfig};
use crate::error::{StoryError, StoryResult};
use crate::expression;
use crate::graph::{ActionGraph, ActionId};
use crate::record::{ActionRecord, CharacterDocument, SchemaRecord};
use crate::schema::SchemaRegistry;
use crate::traversal;

/// The story tree engine.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    schema: SchemaRegistry,
    characters: CharacterRegistry,
    characters_loaded: bool,
    graphs_loaded: bool,
    poisoned: bool,
}

impl Engine {
    /// Create an empty engine.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load the schema document. All classes are registered or none are.
    pub fn load_schema(&mut self, records: Vec<SchemaRecord>) -> StoryResult<()> {
        self.guard_poison()?;
        if !self.schema.is_empty() {
            return self.poison(StoryError::LoadOrder("schema is already loaded"));
        }
        match SchemaRegistry::from_records(records) {
            Ok(schema) => {
                tracing::info!(classes = schema.len(), "schema loaded");
                self.schema = schema;
                Ok(())
            }
            Err(e) => self.poison(e.into()),
        }
    }

    /// Load the character document. Requires a loaded schema.
    ///
    /// Names are registered in document order followed by the configured
    /// built-in characters. Characteristic records whose type is not listed
    /// by their class are skipped.
    pub fn load_characters(&mut self, document: CharacterDocument) -> StoryResult<()> {
        self.guard_poison()?;
        if self.schema.is_empty() {
            return Err(StoryError::LoadOrder("characters require a loaded schema"));
        }
        if self.characters_loaded {
            return self.poison(StoryError::LoadOrder("characters are already loaded"));
        }
        let result = self.register_characters(document);
        if let Err(e) = result {
            return self.poison(e);
        }
        self.characters_loaded = true;
        tracing::info!(characters = self.characters.len(), "characters loaded");
        Ok(())
    }

    /// Build and attach one character's action graph.
    pub fn attach_graph(&mut self, character: &str, records: &[ActionRecord]) -> StoryResult<()> {
        self.guard_poison()?;
        if !self.characters_loaded {
            return Err(StoryError::LoadOrder("graphs require loaded characters"));
        }
        let result = ActionGraph::from_records(character, records)
            .and_then(|graph| self.characters.get_mut(character)?.attach_graph(graph));
        match result {
            Ok(()) => Ok(()),
            Err(e) => self.poison(e),
        }
    }

    /// Attach every `(character, records)` pair, then mark loading complete.
    pub fn load_graphs<I>(&mut self, graphs: I) -> StoryResult<()>
    where
        I: IntoIterator<Item = (String, Vec<ActionRecord>)>,
    {
        self.guard_poison()?;
        if !self.characters_loaded {
            return Err(StoryError::LoadOrder("graphs require loaded characters"));
        }
        let mut attached = 0usize;
        for (character, records) in graphs {
            self.attach_graph(&character, &records)?;
            attached += 1;
        }
        self.graphs_loaded = true;
        tracing::info!(graphs = attached, "action graphs loaded");
        Ok(())
    }

    /// True once schema, characters and graphs have all been loaded.
    pub fn is_ready(&self) -> bool {
        !self.poisoned && !self.schema.is_empty() && self.characters_loaded && self.graphs_loaded
    }

    /// True once a load failure has poisoned the engine.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The loaded schema.
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// The loaded characters.
    pub fn characters(&self) -> &CharacterRegistry {
        &self.characters
    }

    /// Character names in registration order.
    pub fn character_names(&self) -> StoryResult<Vec<String>> {
        self.guard_ready()?;
        Ok(self
            .characters
            .names()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Snapshot of a character's materialized characteristics.
    pub fn characteristics(&self, character: &str) -> StoryResult<Vec<Characteristic>> {
        self.guard_ready()?;
        Ok(self
            .characters
            .get(character)?
            .characteristics
            .iter()
            .cloned()
            .collect())
    }

    /// One characteristic, if it has been materialized.
    pub fn characteristic(
        &self,
        character: &str,
        class: &str,
        subtype: &str,
    ) -> StoryResult<Option<&Characteristic>> {
        self.guard_ready()?;
        Ok(self
            .characters
            .get(character)?
            .characteristics
            .get(class, subtype))
    }

    /// The name of an action in a character's graph.
    pub fn action_name(&self, character: &str, uid: ActionId) -> StoryResult<&str> {
        self.guard_ready()?;
        let action = self
            .graph(character)?
            .get(uid)
            .ok_or_else(|| StoryError::UnknownUid {
                character: character.to_string(),
                uid,
            })?;
        Ok(&action.name)
    }

    /// The uid of a named action in a character's graph.
    pub fn action_uid(&self, character: &str, name: &str) -> StoryResult<ActionId> {
        self.guard_ready()?;
        self.graph(character)?
            .uid_of(name)
            .ok_or_else(|| StoryError::UnknownAction {
                character: character.to_string(),
                name: name.to_string(),
            })
    }

    /// Resolve option paths to action names.
    pub fn option_names(
        &self,
        character: &str,
        options: &[Vec<ActionId>],
    ) -> StoryResult<Vec<Vec<String>>> {
        options
            .iter()
            .map(|path| {
                path.iter()
                    .map(|&uid| self.action_name(character, uid).map(str::to_string))
                    .collect()
            })
            .collect()
    }

    /// Up to `count` legal option paths through a character's graph.
    ///
    /// Evaluating preconditions may materialize characteristics at their
    /// class defaults.
    pub fn options(&mut self, character: &str, count: usize) -> StoryResult<Vec<Vec<ActionId>>> {
        self.guard_ready()?;
        let schema = &self.schema;
        let dedup = self.config.class_dedup;
        self.characters.with_graph(character, |graph, characters| {
            traversal::options(character, graph, characters, schema, count, dedup)
        })
    }

    /// Apply every expression on `path`, in order.
    ///
    /// Unknown uids are reported before anything is applied. Errors raised
    /// while applying leave earlier expressions in effect.
    pub fn execute_action(&mut self, character: &str, path: &[ActionId]) -> StoryResult<()> {
        self.guard_ready()?;
        let schema = &self.schema;
        self.characters.with_graph(character, |graph, characters| {
            expression::execute_path(character, graph, path, characters, schema)
        })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn register_characters(&mut self, document: CharacterDocument) -> StoryResult<()> {
        for name in &document.characters {
            let added = self.characters.add(name);
            if !added && self.config.duplicate_characters == DuplicatePolicy::Reject {
                return Err(StoryError::DuplicateCharacter(name.clone()));
            }
            if !added {
                tracing::debug!(%name, "ignoring repeated character");
            }
        }
        for name in &self.config.builtin_characters {
            self.characters.add(name);
        }

        for record in &document.characteristics {
            let class = self
                .schema
                .get(&record.class)
                .ok_or_else(|| StoryError::UnknownClass(record.class.clone()))?;
            if !class.has_type(&record.subtype) {
                tracing::warn!(
                    character = %record.name,
                    class = %record.class,
                    subtype = %record.subtype,
                    "skipping characteristic with unknown type"
                );
                continue;
            }
            self.characters
                .get_mut(&record.name)?
                .characteristics
                .set(&record.class, &record.subtype, record.value, &self.schema)?;
        }
        Ok(())
    }

    fn graph(&self, character: &str) -> StoryResult<&ActionGraph> {
        self.characters
            .get(character)?
            .graph()
            .ok_or_else(|| StoryError::MissingGraph(character.to_string()))
    }

    fn guard_poison(&self) -> StoryResult<()> {
        if self.poisoned {
            return Err(StoryError::BadFormatting);
        }
        Ok(())
    }

    fn guard_ready(&self) -> StoryResult<()> {
        self.guard_poison()?;
        if !self.is_ready() {
            return Err(StoryError::NotReady);
        }
        Ok(())
    }

    fn poison<T>(&mut self, error: StoryError) -> StoryResult<T> {
        tracing::warn!(%error, "load failed; engine poisoned");
        self.poisoned = true;
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CharacteristicRecord, ConditionRecord};
    use crate::value::Value;

    fn schema_records() -> Vec<SchemaRecord> {
        vec![SchemaRecord {
            class: "mood".to_string(),
            types: vec!["happy".to_string()],
            is_boolean: false,
            min: Some(0),
            max: Some(10),
            default_val: Value::Number(5),
        }]
    }

    fn document() -> CharacterDocument {
        CharacterDocument {
            characters: vec!["Alice".to_string(), "Bob".to_string()],
            characteristics: vec![CharacteristicRecord {
                name: "Bob".to_string(),
                class: "mood".to_string(),
                subtype: "happy".to_string(),
                value: Value::Number(42),
            }],
        }
    }

    fn leaf(uid: i64, name: &str) -> ActionRecord {
        ActionRecord {
            uid: ActionId(uid),
            name: name.to_string(),
            first: true,
            class: None,
            preconditions: Vec::new(),
            expressions: Vec::new(),
            leads_to: Vec::new(),
            parents: Vec::new(),
        }
    }

    fn loaded() -> Engine {
        let mut engine = Engine::default();
        engine.load_schema(schema_records()).unwrap();
        engine.load_characters(document()).unwrap();
        engine
            .load_graphs(vec![("Alice".to_string(), vec![leaf(1, "wave")])])
            .unwrap();
        engine
    }

    #[test]
    fn ready_only_after_all_phases() {
        let mut engine = Engine::default();
        assert!(!engine.is_ready());
        engine.load_schema(schema_records()).unwrap();
        assert!(!engine.is_ready());
        engine.load_characters(document()).unwrap();
        assert!(!engine.is_ready());
        engine.load_graphs(Vec::new()).unwrap();
        assert!(engine.is_ready());
    }

    #[test]
    fn queries_before_ready_are_refused() {
        let mut engine = Engine::default();
        engine.load_schema(schema_records()).unwrap();
        assert!(matches!(engine.character_names(), Err(StoryError::NotReady)));
        assert!(matches!(engine.options("Alice", 1), Err(StoryError::NotReady)));
    }

    #[test]
    fn characters_before_schema_is_a_load_order_error() {
        let mut engine = Engine::default();
        let err = engine.load_characters(document()).unwrap_err();
        assert!(matches!(err, StoryError::LoadOrder(_)));
        assert!(!engine.is_poisoned());
    }

    #[test]
    fn builtins_follow_document_names() {
        let engine = loaded();
        assert_eq!(
            engine.character_names().unwrap(),
            vec!["Alice", "Bob", "World", "Player"]
        );
    }

    #[test]
    fn characteristic_records_are_clamped() {
        let engine = loaded();
        let bob = engine.characteristic("Bob", "mood", "happy").unwrap().unwrap();
        assert_eq!(bob.value, Value::Number(10));
    }

    #[test]
    fn unknown_type_in_character_document_is_skipped() {
        let mut engine = Engine::default();
        engine.load_schema(schema_records()).unwrap();
        let mut doc = document();
        doc.characteristics[0].subtype = "sleepy".to_string();
        engine.load_characters(doc).unwrap();
        engine.load_graphs(Vec::new()).unwrap();
        assert!(engine.characteristics("Bob").unwrap().is_empty());
    }

    #[test]
    fn bad_schema_poisons_everything() {
        let mut engine = Engine::default();
        let mut records = schema_records();
        records[0].min = Some(20);
        assert!(matches!(engine.load_schema(records), Err(StoryError::Schema(_))));
        assert!(engine.is_poisoned());
        assert!(matches!(
            engine.load_schema(schema_records()),
            Err(StoryError::BadFormatting)
        ));
        assert!(matches!(
            engine.load_characters(document()),
            Err(StoryError::BadFormatting)
        ));
        assert!(engine.schema().is_empty());
        assert!(!engine.is_ready());
    }

    #[test]
    fn bad_graph_poisons_the_engine() {
        let mut engine = Engine::default();
        engine.load_schema(schema_records()).unwrap();
        engine.load_characters(document()).unwrap();
        let mut bad = leaf(1, "wave");
        bad.leads_to.push(ActionId(2));
        let err = engine
            .load_graphs(vec![("Alice".to_string(), vec![bad])])
            .unwrap_err();
        assert!(matches!(err, StoryError::DanglingReference { .. }));
        assert!(engine.is_poisoned());
        assert!(matches!(engine.character_names(), Err(StoryError::BadFormatting)));
    }

    #[test]
    fn graph_for_unknown_character_fails() {
        let mut engine = Engine::default();
        engine.load_schema(schema_records()).unwrap();
        engine.load_characters(document()).unwrap();
        let err = engine.attach_graph("Ghost", &[leaf(1, "boo")]).unwrap_err();
        assert!(matches!(err, StoryError::UnknownCharacter(_)));
    }

    #[test]
    fn duplicate_names_ignored_or_rejected() {
        let mut doc = document();
        doc.characters.push("Alice".to_string());

        let mut engine = Engine::default();
        engine.load_schema(schema_records()).unwrap();
        engine.load_characters(doc.clone()).unwrap();
        assert_eq!(engine.characters().len(), 4);

        let mut strict =
            Engine::new(EngineConfig::default().with_duplicate_characters(DuplicatePolicy::Reject));
        strict.load_schema(schema_records()).unwrap();
        let err = strict.load_characters(doc).unwrap_err();
        assert!(matches!(err, StoryError::DuplicateCharacter(n) if n == "Alice"));
    }

    #[test]
    fn action_lookups() {
        let engine = loaded();
        assert_eq!(engine.action_name("Alice", ActionId(1)).unwrap(), "wave");
        assert_eq!(engine.action_uid("Alice", "wave").unwrap(), ActionId(1));
        assert!(matches!(
            engine.action_uid("Alice", "bow"),
            Err(StoryError::UnknownAction { .. })
        ));
        assert!(matches!(
            engine.action_name("World", ActionId(1)),
            Err(StoryError::MissingGraph(_))
        ));
    }

    #[test]
    fn options_and_execution_through_the_facade() {
        let mut engine = loaded();
        let mut bump = leaf(1, "cheer");
        bump.expressions.push(ConditionRecord {
            character: "Bob".to_string(),
            class: "mood".to_string(),
            subtype: "happy".to_string(),
            operation: "-=".to_string(),
            value: Value::Number(4),
        });
        engine.attach_graph("Bob", &[bump]).unwrap();

        let options = engine.options("Bob", 3).unwrap();
        assert_eq!(options, vec![vec![ActionId(1)]]);
        assert_eq!(
            engine.option_names("Bob", &options).unwrap(),
            vec![vec!["cheer".to_string()]]
        );

        engine.execute_action("Bob", &options[0]).unwrap();
        let bob = engine.characteristic("Bob", "mood", "happy").unwrap().unwrap();
        assert_eq!(bob.value, Value::Number(6));
    }

    #[test]
    fn graph_attaches_once_through_the_facade() {
        let mut engine = loaded();
        let err = engine.attach_graph("Alice", &[leaf(2, "bow")]).unwrap_err();
        assert!(matches!(err, StoryError::GraphAlreadyAttached(_)));
    }
}
