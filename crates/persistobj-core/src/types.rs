//! In-memory property types.

use serde::{Deserialize, Serialize};

/// The in-memory type of a persistent object's property.
///
/// Each variant carries a stable integer code; exported metadata stores the
/// code, not the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PropertyType {
    String,
    #[default]
    Int,
    Float,
    Array,
    Object,
    Bool,
}

impl PropertyType {
    /// All property types, in code order.
    pub const ALL: [PropertyType; 6] = [
        PropertyType::String,
        PropertyType::Int,
        PropertyType::Float,
        PropertyType::Array,
        PropertyType::Object,
        PropertyType::Bool,
    ];

    /// Stable integer code of this type.
    pub const fn code(self) -> i64 {
        match self {
            PropertyType::String => 1,
            PropertyType::Int => 2,
            PropertyType::Float => 3,
            PropertyType::Array => 4,
            PropertyType::Object => 5,
            PropertyType::Bool => 6,
        }
    }

    /// Look a type up by its integer code.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(PropertyType::String),
            2 => Some(PropertyType::Int),
            3 => Some(PropertyType::Float),
            4 => Some(PropertyType::Array),
            5 => Some(PropertyType::Object),
            6 => Some(PropertyType::Bool),
            _ => None,
        }
    }

    /// Lowercase name, for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Int => "int",
            PropertyType::Float => "float",
            PropertyType::Array => "array",
            PropertyType::Object => "object",
            PropertyType::Bool => "bool",
        }
    }
}

impl From<PropertyType> for i64 {
    fn from(t: PropertyType) -> Self {
        t.code()
    }
}

impl TryFrom<i64> for PropertyType {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        PropertyType::from_code(code).ok_or_else(|| format!("unknown property type code {code}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        for t in PropertyType::ALL {
            assert_eq!(PropertyType::from_code(t.code()), Some(t));
        }
        assert_eq!(PropertyType::Int.code(), 2);
        assert_eq!(PropertyType::from_code(0), None);
        assert_eq!(PropertyType::from_code(7), None);
    }

    #[test]
    fn test_default_is_int() {
        assert_eq!(PropertyType::default(), PropertyType::Int);
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(
            serde_json::to_value(PropertyType::Bool).unwrap(),
            serde_json::json!(6)
        );
        let t: PropertyType = serde_json::from_value(serde_json::json!(1)).unwrap();
        assert_eq!(t, PropertyType::String);
        assert!(serde_json::from_value::<PropertyType>(serde_json::json!(99)).is_err());
    }
}
