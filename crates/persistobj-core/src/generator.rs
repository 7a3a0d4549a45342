//! Identifier generator definitions.
//!
//! A [`GeneratorDefinition`] names the strategy that produces identifier values
//! on insert, plus the strategy's string parameters. The strategies themselves
//! live with the persistence session; the metadata layer only stores and
//! returns the definition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Strategy class for sequence-backed identifiers.
pub const SEQUENCE_GENERATOR: &str = "SequenceGenerator";
/// Strategy class for database-assigned (auto-increment) identifiers.
pub const NATIVE_GENERATOR: &str = "NativeGenerator";
/// Strategy class for caller-assigned identifiers.
pub const MANUAL_GENERATOR: &str = "ManualGenerator";

/// Parameter holding the sequence name for [`SEQUENCE_GENERATOR`].
pub const SEQUENCE_PARAM: &str = "sequence";

/// Classification of a generator definition's strategy class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Values are drawn from a named database sequence before insert.
    Sequence,
    /// The database assigns the value during insert.
    Native,
    /// The caller supplies the value.
    Manual,
    /// A strategy class not shipped with persistobj.
    Custom,
}

impl GeneratorKind {
    /// True when the INSERT statement must carry an identifier value.
    pub const fn supplies_value_on_insert(self) -> bool {
        !matches!(self, GeneratorKind::Native)
    }
}

/// Definition of the identifier generator for one persistent object type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratorDefinition {
    /// Strategy class name.
    pub class: String,
    /// Strategy parameters.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl GeneratorDefinition {
    /// Create a definition for an arbitrary strategy class.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            params: BTreeMap::new(),
        }
    }

    /// Sequence-backed generator drawing from `sequence`.
    pub fn sequence(sequence: impl Into<String>) -> Self {
        Self::new(SEQUENCE_GENERATOR).param(SEQUENCE_PARAM, sequence)
    }

    /// Database-assigned identifiers.
    pub fn native() -> Self {
        Self::new(NATIVE_GENERATOR)
    }

    /// Caller-assigned identifiers.
    pub fn manual() -> Self {
        Self::new(MANUAL_GENERATOR)
    }

    /// Set a strategy parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a strategy parameter.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Classify the strategy class.
    pub fn kind(&self) -> GeneratorKind {
        match self.class.as_str() {
            SEQUENCE_GENERATOR => GeneratorKind::Sequence,
            NATIVE_GENERATOR => GeneratorKind::Native,
            MANUAL_GENERATOR => GeneratorKind::Manual,
            _ => GeneratorKind::Custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_kinds() {
        let seq = GeneratorDefinition::sequence("users_id_seq");
        assert_eq!(seq.kind(), GeneratorKind::Sequence);
        assert_eq!(seq.get_param(SEQUENCE_PARAM), Some("users_id_seq"));
        assert_eq!(GeneratorDefinition::native().kind(), GeneratorKind::Native);
        assert_eq!(GeneratorDefinition::manual().kind(), GeneratorKind::Manual);
        assert_eq!(
            GeneratorDefinition::new("UuidGenerator").kind(),
            GeneratorKind::Custom
        );
    }

    #[test]
    fn test_only_native_omits_value_on_insert() {
        assert!(!GeneratorKind::Native.supplies_value_on_insert());
        assert!(GeneratorKind::Sequence.supplies_value_on_insert());
        assert!(GeneratorKind::Manual.supplies_value_on_insert());
    }

    #[test]
    fn test_params_default_when_missing() {
        let def: GeneratorDefinition =
            serde_json::from_value(serde_json::json!({ "class": "NativeGenerator" })).unwrap();
        assert_eq!(def, GeneratorDefinition::native());
    }
}
