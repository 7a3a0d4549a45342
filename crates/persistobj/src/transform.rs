//! Row to state transformation.
//!
//! A [`RowTransformer`] turns one raw [`Row`] into the [`StateMap`] applied to
//! a persistent object. [`StateTransformer`] is the default: it renames
//! columns to properties using the [`ObjectDefinition`] and converts each raw
//! value to the property's declared type.

use persistobj_core::{Error, ObjectDefinition, PropertyType, Result, Row, StateMap, Value};

/// Maps a raw row onto typed object state.
///
/// Implementations must be pure: the same row and definition always produce
/// the same state.
pub trait RowTransformer {
    fn row_to_state(&self, row: &Row, definition: &ObjectDefinition) -> Result<StateMap>;
}

impl<F> RowTransformer for F
where
    F: Fn(&Row, &ObjectDefinition) -> Result<StateMap>,
{
    fn row_to_state(&self, row: &Row, definition: &ObjectDefinition) -> Result<StateMap> {
        self(row, definition)
    }
}

/// What to do with a row column the definition does not map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownColumnPolicy {
    /// Skip the column.
    #[default]
    Ignore,
    /// Fail the transformation.
    Reject,
}

/// Configuration for [`StateTransformer`].
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Handling of columns with no mapped property.
    pub unknown_columns: UnknownColumnPolicy,
    /// Whether text values may be parsed into numeric and boolean properties.
    /// Many drivers deliver every column as text.
    pub coerce_text: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            unknown_columns: UnknownColumnPolicy::Ignore,
            coerce_text: true,
        }
    }
}

impl TransformConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown-column policy.
    pub fn unknown_columns(mut self, policy: UnknownColumnPolicy) -> Self {
        self.unknown_columns = policy;
        self
    }

    /// Enable or disable parsing of text values.
    pub fn coerce_text(mut self, coerce: bool) -> Self {
        self.coerce_text = coerce;
        self
    }
}

/// The default row transformer.
#[derive(Debug, Clone, Default)]
pub struct StateTransformer {
    config: TransformConfig,
}

impl StateTransformer {
    /// Create a transformer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transformer with a custom configuration.
    pub fn with_config(config: TransformConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    fn convert(&self, column: &str, value: &Value, target: PropertyType) -> Result<Value> {
        let converted = match (target, value) {
            (_, Value::Null) => Some(Value::Null),

            (PropertyType::Int, Value::Int(_)) => Some(value.clone()),
            (PropertyType::Int, Value::Float(f)) => integral(*f).map(Value::Int),
            (PropertyType::Int, Value::Bool(b)) => Some(Value::Int(i64::from(*b))),
            (PropertyType::Int, Value::Text(s)) if self.config.coerce_text => {
                s.trim().parse::<i64>().ok().map(Value::Int)
            }

            (PropertyType::Float, Value::Float(_)) => Some(value.clone()),
            (PropertyType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (PropertyType::Float, Value::Text(s)) if self.config.coerce_text => {
                s.trim().parse::<f64>().ok().map(Value::Float)
            }

            (PropertyType::Bool, Value::Bool(_)) => Some(value.clone()),
            (PropertyType::Bool, Value::Int(0)) => Some(Value::Bool(false)),
            (PropertyType::Bool, Value::Int(1)) => Some(Value::Bool(true)),
            (PropertyType::Bool, Value::Text(s)) if self.config.coerce_text => {
                // "t"/"f" is PostgreSQL's text form for booleans.
                match s.trim().to_ascii_lowercase().as_str() {
                    "1" | "true" | "t" => Some(Value::Bool(true)),
                    "0" | "false" | "f" => Some(Value::Bool(false)),
                    _ => None,
                }
            }

            (PropertyType::String, Value::Text(_)) => Some(value.clone()),
            (PropertyType::String, Value::Int(i)) => Some(Value::Text(i.to_string())),
            (PropertyType::String, Value::Float(f)) => Some(Value::Text(f.to_string())),
            (PropertyType::String, Value::Bool(b)) => Some(Value::Text(b.to_string())),

            // Serialized payloads; decoding belongs to the object.
            (PropertyType::Array | PropertyType::Object, Value::Text(_)) => Some(value.clone()),

            _ => None,
        };

        converted.ok_or_else(|| {
            Error::row_transform(
                column,
                format!(
                    "cannot convert {} value to {}",
                    value.type_name(),
                    target.name()
                ),
            )
        })
    }
}

/// The exact integer value of `f`, if it has one in `i64` range.
#[allow(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

impl RowTransformer for StateTransformer {
    fn row_to_state(&self, row: &Row, definition: &ObjectDefinition) -> Result<StateMap> {
        let mut state = StateMap::new();
        for (column, value) in row.iter() {
            let Some(mapping) = definition.property_for_column(column) else {
                match self.config.unknown_columns {
                    UnknownColumnPolicy::Ignore => {
                        tracing::trace!(
                            class = definition.class(),
                            column = column,
                            "Skipping unmapped column"
                        );
                        continue;
                    }
                    UnknownColumnPolicy::Reject => {
                        return Err(Error::row_transform(
                            column,
                            format!("column is not mapped by {}", definition.class()),
                        ));
                    }
                }
            };

            let value = match mapping.property_type {
                Some(target) => self.convert(column, value, target)?,
                None => value.clone(),
            };
            state.insert(mapping.property_name.to_string(), value);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistobj_core::{IdProperty, PropertyDefinition};

    fn definition() -> ObjectDefinition {
        ObjectDefinition::new("Hero", "heroes")
            .id_property(IdProperty::named("hero_id", "id"))
            .property(PropertyDefinition::new("name", "name", PropertyType::String))
            .property(PropertyDefinition::new("power", "power", PropertyType::Float))
            .property(PropertyDefinition::new("active", "active", PropertyType::Bool))
    }

    #[test]
    fn test_columns_renamed_to_properties() {
        let row = Row::new()
            .with("hero_id", 1)
            .with("name", "Deadpond")
            .with("power", 9.5)
            .with("active", true);
        let state = StateTransformer::new()
            .row_to_state(&row, &definition())
            .unwrap();

        assert_eq!(state.get("id"), Some(&Value::Int(1)));
        assert_eq!(state.get("name"), Some(&Value::Text("Deadpond".into())));
        assert_eq!(state.get("power"), Some(&Value::Float(9.5)));
        assert_eq!(state.get("active"), Some(&Value::Bool(true)));
        assert!(!state.contains_key("hero_id"));
    }

    #[test]
    fn test_text_coercion() {
        let row = Row::new()
            .with("hero_id", " 42 ")
            .with("power", "1.25")
            .with("active", "0")
            .with("name", 7);
        let state = StateTransformer::new()
            .row_to_state(&row, &definition())
            .unwrap();

        assert_eq!(state.get("id"), Some(&Value::Int(42)));
        assert_eq!(state.get("power"), Some(&Value::Float(1.25)));
        assert_eq!(state.get("active"), Some(&Value::Bool(false)));
        assert_eq!(state.get("name"), Some(&Value::Text("7".into())));
    }

    #[test]
    fn test_coercion_disabled() {
        let transformer = StateTransformer::with_config(TransformConfig::new().coerce_text(false));
        let row = Row::new().with("hero_id", "42");
        let err = transformer.row_to_state(&row, &definition()).unwrap_err();
        assert!(matches!(err, Error::RowTransform { column, .. } if column == "hero_id"));
    }

    #[test]
    fn test_nulls_pass_through() {
        let row = Row::new().with("hero_id", Value::Null).with("power", Value::Null);
        let state = StateTransformer::new()
            .row_to_state(&row, &definition())
            .unwrap();
        assert_eq!(state.get("id"), Some(&Value::Null));
        assert_eq!(state.get("power"), Some(&Value::Null));
    }

    #[test]
    fn test_type_mismatch_fails() {
        let row = Row::new().with("hero_id", 1.5);
        let err = StateTransformer::new()
            .row_to_state(&row, &definition())
            .unwrap_err();
        assert!(err.to_string().contains("cannot convert float value to int"));

        let row = Row::new().with("active", 2);
        assert!(
            StateTransformer::new()
                .row_to_state(&row, &definition())
                .is_err()
        );
    }

    #[test]
    fn test_unknown_columns() {
        let row = Row::new().with("hero_id", 1).with("secret_name", "Dive Wilson");

        let state = StateTransformer::new()
            .row_to_state(&row, &definition())
            .unwrap();
        assert_eq!(state.len(), 1);

        let strict = StateTransformer::with_config(
            TransformConfig::new().unknown_columns(UnknownColumnPolicy::Reject),
        );
        let err = strict.row_to_state(&row, &definition()).unwrap_err();
        assert!(matches!(err, Error::RowTransform { column, .. } if column == "secret_name"));
    }

    #[test]
    fn test_unconfigured_identifier_type_passes_raw_value() {
        let mut def = definition();
        def.identifier_mut()
            .set(
                persistobj_core::id_property::PROPERTY_TYPE,
                persistobj_core::AttributeValue::Null,
            )
            .unwrap();
        let row = Row::new().with("hero_id", "abc");
        let state = StateTransformer::new().row_to_state(&row, &def).unwrap();
        assert_eq!(state.get("id"), Some(&Value::Text("abc".into())));
    }

    #[test]
    fn test_unknown_identifier_type_code_passes_raw_value() {
        let mut def = definition();
        def.identifier_mut()
            .set(persistobj_core::id_property::PROPERTY_TYPE, 99)
            .unwrap();
        let row = Row::new().with("hero_id", "abc");
        let state = StateTransformer::new().row_to_state(&row, &def).unwrap();
        assert_eq!(state.get("id"), Some(&Value::Text("abc".into())));
    }

    #[test]
    fn test_bool_text_forms() {
        let transformer = StateTransformer::new();
        for (text, expected) in [
            ("t", true),
            ("TRUE", true),
            ("1", true),
            ("f", false),
            ("false", false),
        ] {
            let row = Row::new().with("active", text);
            let state = transformer.row_to_state(&row, &definition()).unwrap();
            assert_eq!(state.get("active"), Some(&Value::Bool(expected)), "{text}");
        }
        let row = Row::new().with("active", "yes");
        assert!(transformer.row_to_state(&row, &definition()).is_err());
    }

    #[test]
    fn test_closure_transformer() {
        let upper = |row: &Row, _: &ObjectDefinition| -> Result<StateMap> {
            Ok(row
                .iter()
                .map(|(c, v)| (c.to_uppercase(), v.clone()))
                .collect())
        };
        let state = upper
            .row_to_state(&Row::new().with("a", 1), &definition())
            .unwrap();
        assert_eq!(state.get("A"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_integral() {
        assert_eq!(integral(3.0), Some(3));
        assert_eq!(integral(-0.0), Some(0));
        assert_eq!(integral(3.5), None);
        assert_eq!(integral(f64::NAN), None);
        assert_eq!(integral(1e300), None);
    }
}
