//! Schema registry: the legal characteristic classes.
//!
//! A [`SchemaClass`] fixes the subtypes, bounds, boolean-ness and default of
//! one class. The registry is filled once from the schema document and read
//! by everything else; a bulk load either registers every class or none.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::record::SchemaRecord;
use crate::value::Value;

/// A validated characteristic class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaClass {
    /// Class name.
    pub name: String,
    /// Subtype names, in document order.
    pub types: Vec<String>,
    /// Whether characteristics of this class are flags.
    pub is_boolean: bool,
    /// Lower bound (unused for boolean classes).
    pub min: i64,
    /// Upper bound (unused for boolean classes).
    pub max: i64,
    /// Starting value for every subtype of the class.
    pub default_value: Value,
}

impl SchemaClass {
    /// Returns true if the class lists this subtype.
    pub fn has_type(&self, subtype: &str) -> bool {
        self.types.iter().any(|t| t == subtype)
    }
}

impl From<SchemaRecord> for SchemaClass {
    fn from(record: SchemaRecord) -> Self {
        Self {
            name: record.class,
            types: record.types,
            is_boolean: record.is_boolean,
            min: record.min.unwrap_or_default(),
            max: record.max.unwrap_or_default(),
            default_value: record.default_val,
        }
    }
}

/// Structural check of one class definition. Pure; touches no registry.
pub fn validate(record: &SchemaRecord) -> Result<(), SchemaError> {
    if record.class.is_empty() {
        return Err(SchemaError::EmptyName);
    }
    if record.types.is_empty() {
        return Err(SchemaError::NoTypes(record.class.clone()));
    }

    let mut seen = HashSet::new();
    for subtype in &record.types {
        if subtype.is_empty() {
            return Err(SchemaError::EmptyType(record.class.clone()));
        }
        if !seen.insert(subtype.as_str()) {
            return Err(SchemaError::DuplicateType {
                class: record.class.clone(),
                subtype: subtype.clone(),
            });
        }
    }

    match (record.is_boolean, record.default_val) {
        (true, Value::Bool(_)) => Ok(()),
        (false, Value::Number(default)) => {
            let (Some(min), Some(max)) = (record.min, record.max) else {
                return Err(SchemaError::MissingBounds(record.class.clone()));
            };
            if min > max {
                return Err(SchemaError::InvertedBounds {
                    class: record.class.clone(),
                    min,
                    max,
                });
            }
            if default < min || default > max {
                return Err(SchemaError::DefaultOutOfBounds {
                    class: record.class.clone(),
                    default,
                    min,
                    max,
                });
            }
            Ok(())
        }
        _ => Err(SchemaError::DefaultKind(record.class.clone())),
    }
}

/// Mapping from class name to its definition.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    classes: HashMap<String, SchemaClass>,
    order: Vec<String>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every record, then register all of them.
    ///
    /// Nothing is registered unless the whole document is valid.
    pub fn from_records(records: Vec<SchemaRecord>) -> Result<Self, SchemaError> {
        if records.is_empty() {
            return Err(SchemaError::NoClasses);
        }

        let mut names = HashSet::new();
        for record in &records {
            validate(record)?;
            if !names.insert(record.class.as_str()) {
                return Err(SchemaError::DuplicateClass(record.class.clone()));
            }
        }

        let mut registry = Self::new();
        for record in records {
            registry.register(record.into());
        }
        Ok(registry)
    }

    /// Add a class under its name. Callers validate first.
    pub(crate) fn register(&mut self, class: SchemaClass) {
        if !self.classes.contains_key(&class.name) {
            self.order.push(class.name.clone());
        }
        self.classes.insert(class.name.clone(), class);
    }

    /// Look up a class by name.
    pub fn get(&self, name: &str) -> Option<&SchemaClass> {
        self.classes.get(name)
    }

    /// True until at least one class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Classes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaClass> {
        self.order.iter().filter_map(|name| self.classes.get(name))
    }
}
