//! Bounded characteristic values and the per-character store holding them.
//!
//! A characteristic is a clamped value of one (class, subtype) pair. It is
//! created from the schema the first time anything references it and is
//! never removed afterwards.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};
use crate::schema::{SchemaClass, SchemaRegistry};
use crate::value::Value;

/// A live value of one (class, subtype) pair for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    /// Schema class.
    pub class: String,
    /// Subtype within the class.
    pub subtype: String,
    /// Lower bound (unused for boolean characteristics).
    pub min: i64,
    /// Upper bound (unused for boolean characteristics).
    pub max: i64,
    /// Whether the value is a flag.
    pub is_boolean: bool,
    /// Current value, always within bounds.
    pub value: Value,
    /// Value the characteristic started from.
    pub default_value: Value,
}

impl Characteristic {
    /// Create a characteristic at its class default.
    pub fn from_class(class: &SchemaClass, subtype: impl Into<String>) -> Self {
        let mut characteristic = Self {
            class: class.name.clone(),
            subtype: subtype.into(),
            min: class.min,
            max: class.max,
            is_boolean: class.is_boolean,
            value: class.default_value,
            default_value: class.default_value,
        };
        characteristic.set(class.default_value);
        characteristic
    }

    /// Look up the class in the schema and create the characteristic at its default.
    pub fn materialize(class: &str, subtype: &str, schema: &SchemaRegistry) -> StoryResult<Self> {
        let def = schema
            .get(class)
            .ok_or_else(|| StoryError::UnknownClass(class.to_string()))?;
        if !def.has_type(subtype) {
            return Err(StoryError::UnknownSubtype {
                class: class.to_string(),
                subtype: subtype.to_string(),
            });
        }
        Ok(Self::from_class(def, subtype))
    }

    /// Store a raw value, clamping numbers and coercing flags. Returns the stored value.
    pub fn set(&mut self, raw: Value) -> Value {
        self.value = if self.is_boolean {
            Value::Bool(raw.as_bool())
        } else {
            let (lo, hi) = if self.min <= self.max {
                (self.min, self.max)
            } else {
                (self.max, self.min)
            };
            Value::Number(raw.as_number().clamp(lo, hi))
        };
        self.value
    }
}

impl std::fmt::Display for Characteristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_boolean {
            write!(f, "{}.{}: {}", self.class, self.subtype, self.value)
        } else {
            write!(
                f,
                "{}.{}: {} [{}, {}]",
                self.class, self.subtype, self.value, self.min, self.max
            )
        }
    }
}

/// A character's characteristics, keyed by class then subtype.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacteristicStore {
    entries: BTreeMap<String, BTreeMap<String, Characteristic>>,
}

impl CharacteristicStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a characteristic without materializing it.
    pub fn get(&self, class: &str, subtype: &str) -> Option<&Characteristic> {
        self.entries.get(class)?.get(subtype)
    }

    /// Return the characteristic, creating it from the schema default if absent.
    pub fn get_or_create(
        &mut self,
        class: &str,
        subtype: &str,
        schema: &SchemaRegistry,
    ) -> StoryResult<&mut Characteristic> {
        if self.get(class, subtype).is_none() {
            let created = Characteristic::materialize(class, subtype, schema)?;
            tracing::debug!(class, subtype, value = %created.value, "materialized characteristic");
            return Ok(self.insert(created));
        }
        self.entries
            .get_mut(class)
            .and_then(|subtypes| subtypes.get_mut(subtype))
            .ok_or_else(|| StoryError::UnknownClass(class.to_string()))
    }

    /// Assign a raw value directly, still clamped to the class bounds.
    pub fn set(
        &mut self,
        class: &str,
        subtype: &str,
        raw: Value,
        schema: &SchemaRegistry,
    ) -> StoryResult<Value> {
        Ok(self.get_or_create(class, subtype, schema)?.set(raw))
    }

    /// Insert or replace a characteristic.
    pub fn insert(&mut self, characteristic: Characteristic) -> &mut Characteristic {
        let subtypes = self.entries.entry(characteristic.class.clone()).or_default();
        match subtypes.entry(characteristic.subtype.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(characteristic);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(characteristic),
        }
    }

    /// All characteristics, ordered by class then subtype.
    pub fn iter(&self) -> impl Iterator<Item = &Characteristic> {
        self.entries.values().flat_map(|subtypes| subtypes.values())
    }

    /// Number of materialized characteristics.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Returns true if nothing has been materialized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SchemaRecord;

    fn schema() -> SchemaRegistry {
        SchemaRegistry::from_records(vec![
            SchemaRecord {
                class: "mood".to_string(),
                types: vec!["happy".to_string(), "angry".to_string()],
                is_boolean: false,
                min: Some(0),
                max: Some(10),
                default_val: Value::Number(5),
            },
            SchemaRecord {
                class: "met".to_string(),
                types: vec!["bob".to_string()],
                is_boolean: true,
                min: None,
                max: None,
                default_val: Value::Bool(false),
            },
        ])
        .unwrap()
    }

    #[test]
    fn get_or_create_uses_class_default() {
        let schema = schema();
        let mut store = CharacteristicStore::new();
        let c = store.get_or_create("mood", "happy", &schema).unwrap();
        assert_eq!(c.value, Value::Number(5));
        assert_eq!((c.min, c.max), (0, 10));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_or_create_returns_existing_entry() {
        let schema = schema();
        let mut store = CharacteristicStore::new();
        store.set("mood", "happy", Value::Number(9), &schema).unwrap();
        let c = store.get_or_create("mood", "happy", &schema).unwrap();
        assert_eq!(c.value, Value::Number(9));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_class_is_an_error() {
        let schema = schema();
        let mut store = CharacteristicStore::new();
        let err = store.get_or_create("fear", "dark", &schema).unwrap_err();
        assert!(matches!(err, StoryError::UnknownClass(c) if c == "fear"));
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_subtype_is_an_error() {
        let schema = schema();
        let mut store = CharacteristicStore::new();
        let err = store.get_or_create("mood", "sleepy", &schema).unwrap_err();
        assert!(matches!(err, StoryError::UnknownSubtype { .. }));
        assert!(store.get("mood", "sleepy").is_none());
    }

    #[test]
    fn set_with_inverted_bounds_stays_between_them() {
        let class = crate::schema::SchemaClass {
            name: "mood".to_string(),
            types: vec!["happy".to_string()],
            is_boolean: false,
            min: 10,
            max: 0,
            default_value: Value::Number(5),
        };
        let mut c = Characteristic::from_class(&class, "happy");
        assert_eq!(c.set(Value::Number(40)), Value::Number(10));
        assert_eq!(c.set(Value::Number(-3)), Value::Number(0));
        assert_eq!(c.set(Value::Number(7)), Value::Number(7));
    }

    #[test]
    fn set_clamps_into_bounds() {
        let schema = schema();
        let mut store = CharacteristicStore::new();
        assert_eq!(
            store.set("mood", "angry", Value::Number(40), &schema).unwrap(),
            Value::Number(10)
        );
        assert_eq!(
            store.set("mood", "angry", Value::Number(-3), &schema).unwrap(),
            Value::Number(0)
        );
    }

    #[test]
    fn set_coerces_flags() {
        let schema = schema();
        let mut store = CharacteristicStore::new();
        assert_eq!(
            store.set("met", "bob", Value::Number(2), &schema).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            store.set("met", "bob", Value::Number(0), &schema).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn iterates_by_class_then_subtype() {
        let schema = schema();
        let mut store = CharacteristicStore::new();
        store.get_or_create("mood", "happy", &schema).unwrap();
        store.get_or_create("met", "bob", &schema).unwrap();
        store.get_or_create("mood", "angry", &schema).unwrap();
        let keys: Vec<_> = store
            .iter()
            .map(|c| format!("{}.{}", c.class, c.subtype))
            .collect();
        assert_eq!(keys, vec!["met.bob", "mood.angry", "mood.happy"]);
    }

    #[test]
    fn display() {
        let schema = schema();
        let mood = Characteristic::materialize("mood", "happy", &schema).unwrap();
        assert_eq!(mood.to_string(), "mood.happy: 5 [0, 10]");
        let met = Characteristic::materialize("met", "bob", &schema).unwrap();
        assert_eq!(met.to_string(), "met.bob: false");
    }
}
