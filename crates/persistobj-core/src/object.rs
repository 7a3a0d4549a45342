//! The persistent object contract.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::value::Value;

/// Property name → typed value, as produced by a row transformer.
pub type StateMap = BTreeMap<String, Value>;

/// An in-memory domain object that can be loaded from rows.
///
/// `Default` is the no-argument construction path used to create the single
/// instance a find iterator reuses. [`PersistentObject::set_state`] must
/// overwrite fields in place: it is called once per row on the same instance.
pub trait PersistentObject: Default {
    /// Overwrite this object's properties from `state`.
    fn set_state(&mut self, state: &StateMap) -> Result<()>;

    /// Snapshot of this object's properties.
    fn state(&self) -> StateMap;
}

/// A persistent object whose properties are only known at runtime.
///
/// `set_state` overwrites the properties present in the state and leaves the
/// others as they were.
///
/// ```
/// use persistobj_core::{DynamicObject, PersistentObject, StateMap, Value};
///
/// let mut obj = DynamicObject::default();
/// let mut state = StateMap::new();
/// state.insert("name".to_string(), Value::from("Alice"));
/// obj.set_state(&state).unwrap();
/// assert_eq!(obj.get("name").and_then(Value::as_str), Some("Alice"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicObject {
    values: StateMap,
}

impl DynamicObject {
    /// Get a property value.
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.values.get(property)
    }

    /// Set a property value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(property.into(), value.into());
    }

    /// Check if a property has a value.
    pub fn has(&self, property: &str) -> bool {
        self.values.contains_key(property)
    }
}

impl PersistentObject for DynamicObject {
    fn set_state(&mut self, state: &StateMap) -> Result<()> {
        for (property, value) in state {
            match self.values.get_mut(property) {
                Some(slot) => slot.clone_from(value),
                None => {
                    self.values.insert(property.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    fn state(&self) -> StateMap {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pairs: &[(&str, Value)]) -> StateMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_set_state_overwrites_present_keys_only() {
        let mut obj = DynamicObject::default();
        obj.set_state(&state(&[("id", Value::Int(1)), ("name", "a".into())]))
            .unwrap();
        obj.set_state(&state(&[("id", Value::Int(2))])).unwrap();

        assert_eq!(obj.get("id"), Some(&Value::Int(2)));
        assert_eq!(obj.get("name"), Some(&Value::Text("a".to_string())));
        assert!(!obj.has("missing"));
    }

    #[test]
    fn test_state_snapshot() {
        let mut obj = DynamicObject::default();
        obj.set("id", 7);
        let snapshot = obj.state();
        obj.set("id", 8);
        assert_eq!(snapshot.get("id"), Some(&Value::Int(7)));
    }
}
