//! Property tests for the clamping rule and the traversal bound.

use proptest::prelude::*;
use st_core::expression::apply_operation;
use st_core::{
    ActionId, ActionRecord, CharacterDocument, CharacteristicRecord, Characteristic,
    ConditionRecord, Engine, EngineConfig, Operation, SchemaRecord, SchemaRegistry, Value,
};

const OPERATIONS: [Operation; 6] = [
    Operation::Assign,
    Operation::Add,
    Operation::Subtract,
    Operation::Multiply,
    Operation::Divide,
    Operation::Toggle,
];

fn numeric(min: i64, max: i64) -> Characteristic {
    let schema = SchemaRegistry::from_records(vec![SchemaRecord {
        class: "mood".to_string(),
        types: vec!["happy".to_string()],
        is_boolean: false,
        min: Some(min),
        max: Some(max),
        default_val: Value::Number(min),
    }])
    .unwrap();
    Characteristic::materialize("mood", "happy", &schema).unwrap()
}

fn flag() -> Characteristic {
    let schema = SchemaRegistry::from_records(vec![SchemaRecord {
        class: "met".to_string(),
        types: vec!["bob".to_string()],
        is_boolean: true,
        min: None,
        max: None,
        default_val: Value::Bool(false),
    }])
    .unwrap();
    Characteristic::materialize("met", "bob", &schema).unwrap()
}

/// Builds a forest: action `i` hangs under an earlier action unless its
/// shape byte makes it a root. Each action requires `mood >= threshold`.
fn forest(shape: &[(usize, i64)]) -> Vec<ActionRecord> {
    let mut records: Vec<ActionRecord> = shape
        .iter()
        .enumerate()
        .map(|(i, &(_, threshold))| ActionRecord {
            uid: ActionId(i as i64 + 1),
            name: format!("a{i}"),
            first: false,
            class: None,
            preconditions: vec![ConditionRecord {
                character: "Alice".to_string(),
                class: "mood".to_string(),
                subtype: "happy".to_string(),
                operation: ">=".to_string(),
                value: Value::Number(threshold),
            }],
            expressions: Vec::new(),
            leads_to: Vec::new(),
            parents: Vec::new(),
        })
        .collect();

    for (i, &(pick, _)) in shape.iter().enumerate() {
        if i == 0 || pick % 5 == 0 {
            records[i].first = true;
            continue;
        }
        let parent = pick % i;
        records[parent].leads_to.push(ActionId(i as i64 + 1));
        records[i].parents.push(ActionId(parent as i64 + 1));
    }
    records
}

proptest! {
    #[test]
    fn numeric_values_stay_in_bounds(
        min in -50i64..50,
        span in 0i64..100,
        steps in prop::collection::vec((0usize..6, any::<i64>()), 0..40),
    ) {
        let max = min + span;
        let mut c = numeric(min, max);
        for (op, operand) in steps {
            let _ = apply_operation(&mut c, OPERATIONS[op], Value::Number(operand));
            let v = c.value.as_number();
            prop_assert!(!c.value.is_bool());
            prop_assert!(min <= v && v <= max, "{v} escaped [{min}, {max}]");
        }
    }

    #[test]
    fn flag_values_stay_boolean(
        steps in prop::collection::vec((0usize..6, any::<i64>()), 0..40),
    ) {
        let mut c = flag();
        for (op, operand) in steps {
            let _ = apply_operation(&mut c, OPERATIONS[op], Value::Number(operand));
            prop_assert!(c.value.is_bool());
        }
    }

    #[test]
    fn options_respect_limit_and_preconditions(
        shape in prop::collection::vec((0usize..100, 0i64..11), 1..16),
        mood in 0i64..=10,
        limit in 0usize..8,
    ) {
        let mut engine = Engine::new(EngineConfig::default());
        engine.load_schema(vec![SchemaRecord {
            class: "mood".to_string(),
            types: vec!["happy".to_string()],
            is_boolean: false,
            min: Some(0),
            max: Some(10),
            default_val: Value::Number(5),
        }]).unwrap();
        engine.load_characters(CharacterDocument {
            characters: vec!["Alice".to_string()],
            characteristics: vec![CharacteristicRecord {
                name: "Alice".to_string(),
                class: "mood".to_string(),
                subtype: "happy".to_string(),
                value: Value::Number(mood),
            }],
        }).unwrap();
        engine.load_graphs(vec![("Alice".to_string(), forest(&shape))]).unwrap();

        let options = engine.options("Alice", limit).unwrap();
        prop_assert!(options.len() <= limit);

        let graph = engine.characters().get("Alice").unwrap().graph().unwrap();
        let state = Value::Number(mood);
        for path in &options {
            prop_assert!(!path.is_empty());
            prop_assert!(graph.firsts().contains(&path[0]));
            for pair in path.windows(2) {
                prop_assert!(graph.get(pair[0]).unwrap().children.contains(&pair[1]));
            }
            let last = path[path.len() - 1];
            prop_assert!(graph.get(last).unwrap().is_leaf());
            for uid in path {
                for pre in &graph.get(*uid).unwrap().preconditions {
                    prop_assert!(pre.comparator.holds(&state, &pre.value));
                }
            }
        }
    }
}
