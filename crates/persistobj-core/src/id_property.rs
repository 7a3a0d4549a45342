//! Identifier property metadata.
//!
//! [`IdProperty`] describes how a persistent object's identifier column maps to
//! its in-memory property and which generator produces identifier values on
//! insert. It is built once while a type definition is assembled, then read by
//! the session (to decide whether an INSERT carries an identifier value) and
//! by generator strategies (to know which column and property to populate).
//!
//! Typed accessors cover ordinary use. Generic export/import code addresses
//! the five attributes by name through [`IdProperty::get`], [`IdProperty::set`]
//! and [`IdProperty::has`]; the name set is closed and every write is type
//! checked. `Null` is accepted for every attribute and means "not configured".

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};

use crate::error::{Error, Result};
use crate::generator::{GeneratorDefinition, GeneratorKind};
use crate::types::PropertyType;

/// Attribute name of the database column.
pub const COLUMN_NAME: &str = "columnName";
/// Attribute name of the in-memory property.
pub const PROPERTY_NAME: &str = "propertyName";
/// Attribute name of the property type code.
pub const PROPERTY_TYPE: &str = "propertyType";
/// Attribute name of the generator definition.
pub const GENERATOR: &str = "generator";
/// Attribute name of the deprecated visibility flag.
pub const VISIBILITY: &str = "visibility";

/// Wrapper key of the nested export shape.
pub const NESTED_STATE_KEY: &str = "properties";

/// The closed set of attributes an [`IdProperty`] declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    ColumnName,
    PropertyName,
    PropertyType,
    Generator,
    Visibility,
}

impl Attribute {
    /// All attributes, in declaration order.
    pub const ALL: [Attribute; 5] = [
        Attribute::ColumnName,
        Attribute::PropertyName,
        Attribute::PropertyType,
        Attribute::Generator,
        Attribute::Visibility,
    ];

    /// Resolve an attribute by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            COLUMN_NAME => Some(Attribute::ColumnName),
            PROPERTY_NAME => Some(Attribute::PropertyName),
            PROPERTY_TYPE => Some(Attribute::PropertyType),
            GENERATOR => Some(Attribute::Generator),
            VISIBILITY => Some(Attribute::Visibility),
            _ => None,
        }
    }

    /// The attribute's name.
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::ColumnName => COLUMN_NAME,
            Attribute::PropertyName => PROPERTY_NAME,
            Attribute::PropertyType => PROPERTY_TYPE,
            Attribute::Generator => GENERATOR,
            Attribute::Visibility => VISIBILITY,
        }
    }

    /// Description of the values this attribute accepts.
    pub const fn expected(self) -> &'static str {
        match self {
            Attribute::ColumnName | Attribute::PropertyName => "string or null",
            Attribute::PropertyType | Attribute::Visibility => "int or null",
            Attribute::Generator => "GeneratorDefinition or null",
        }
    }
}

/// A dynamically-typed attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttributeValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Generator(GeneratorDefinition),
}

impl AttributeValue {
    /// Check if this value is `Null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Get the text payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the generator payload.
    pub fn as_generator(&self) -> Option<&GeneratorDefinition> {
        match self {
            AttributeValue::Generator(g) => Some(g),
            _ => None,
        }
    }

    /// Encode as JSON for export.
    pub fn to_json(&self) -> Json {
        match self {
            AttributeValue::Null => Json::Null,
            AttributeValue::Bool(b) => Json::Bool(*b),
            AttributeValue::Int(v) => Json::from(*v),
            AttributeValue::Float(v) => {
                serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number)
            }
            AttributeValue::Text(s) => Json::String(s.clone()),
            AttributeValue::Generator(g) => {
                let params: Map<String, Json> = g
                    .params
                    .iter()
                    .map(|(k, v)| (k.clone(), Json::String(v.clone())))
                    .collect();
                let mut map = Map::new();
                map.insert("class".to_string(), Json::String(g.class.clone()));
                map.insert("params".to_string(), Json::Object(params));
                Json::Object(map)
            }
        }
    }

    /// Decode an exported JSON value destined for `attribute`.
    ///
    /// Objects decode to generator definitions; arrays have no counterpart
    /// and are rejected.
    pub fn from_json(attribute: Attribute, json: &Json) -> Result<Self> {
        let value = match json {
            Json::Null => AttributeValue::Null,
            Json::Bool(b) => AttributeValue::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(v) => AttributeValue::Int(v),
                None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => AttributeValue::Text(s.clone()),
            Json::Object(_) => {
                let generator = GeneratorDefinition::deserialize(json).map_err(|_| {
                    Error::invalid_value(attribute.name(), json, attribute.expected())
                })?;
                AttributeValue::Generator(generator)
            }
            Json::Array(_) => {
                return Err(Error::invalid_value(
                    attribute.name(),
                    json,
                    attribute.expected(),
                ));
            }
        };
        Ok(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => f.write_str("null"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Generator(g) => write!(f, "GeneratorDefinition({})", g.class),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(i64::from(v))
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<GeneratorDefinition> for AttributeValue {
    fn from(v: GeneratorDefinition) -> Self {
        AttributeValue::Generator(v)
    }
}

impl From<PropertyType> for AttributeValue {
    fn from(v: PropertyType) -> Self {
        AttributeValue::Int(v.code())
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(AttributeValue::Null, Into::into)
    }
}

/// Which of the two historical layouts [`IdProperty::export_state`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportShape {
    /// `{"properties": {"columnName": .., ...}}`
    Nested,
    /// `{"columnName": .., ...}`
    #[default]
    Flat,
}

/// Metadata for the identifier property of a persistent object type.
#[derive(Debug, Clone, PartialEq)]
pub struct IdProperty {
    column_name: Option<String>,
    property_name: Option<String>,
    /// Property type code; codes outside [`PropertyType`] are kept as given.
    property_type: Option<i64>,
    generator: Option<GeneratorDefinition>,
    /// Deprecated; stored and exported, never interpreted.
    visibility: Option<i64>,
}

impl Default for IdProperty {
    fn default() -> Self {
        Self {
            column_name: None,
            property_name: None,
            property_type: Some(PropertyType::default().code()),
            generator: None,
            visibility: None,
        }
    }
}

impl IdProperty {
    /// Names of the declared attributes.
    pub const ATTRIBUTE_NAMES: [&'static str; 5] =
        [COLUMN_NAME, PROPERTY_NAME, PROPERTY_TYPE, GENERATOR, VISIBILITY];

    /// Create a descriptor, validating every argument through [`IdProperty::set`].
    ///
    /// ```
    /// use persistobj_core::{GeneratorDefinition, IdProperty, PropertyType};
    ///
    /// let id = IdProperty::new(
    ///     "id",
    ///     "id",
    ///     None::<i64>,
    ///     GeneratorDefinition::sequence("users_id_seq"),
    ///     PropertyType::Int,
    /// )
    /// .unwrap();
    /// assert_eq!(id.column_name(), Some("id"));
    ///
    /// assert!(IdProperty::new(42, "id", None::<i64>, None::<GeneratorDefinition>, PropertyType::Int).is_err());
    /// ```
    pub fn new(
        column_name: impl Into<AttributeValue>,
        property_name: impl Into<AttributeValue>,
        visibility: impl Into<AttributeValue>,
        generator: impl Into<AttributeValue>,
        property_type: impl Into<AttributeValue>,
    ) -> Result<Self> {
        let mut id = Self::default();
        id.set(COLUMN_NAME, column_name)?;
        id.set(PROPERTY_NAME, property_name)?;
        id.set(VISIBILITY, visibility)?;
        id.set(GENERATOR, generator)?;
        id.set(PROPERTY_TYPE, property_type)?;
        Ok(id)
    }

    /// Create a descriptor mapping `column_name` to `property_name`, with the
    /// default property type and no generator.
    pub fn named(column_name: impl Into<String>, property_name: impl Into<String>) -> Self {
        Self {
            column_name: Some(column_name.into()),
            property_name: Some(property_name.into()),
            ..Self::default()
        }
    }

    /// Set the generator definition.
    pub fn with_generator(mut self, generator: GeneratorDefinition) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the property type.
    pub fn with_property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type.code());
        self
    }

    /// Set the deprecated visibility flag.
    pub fn with_visibility(mut self, visibility: i64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }

    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    /// The property type, or `None` when unset or the code names no
    /// [`PropertyType`].
    pub fn property_type(&self) -> Option<PropertyType> {
        self.property_type.and_then(PropertyType::from_code)
    }

    /// The raw property type code.
    pub fn property_type_code(&self) -> Option<i64> {
        self.property_type
    }

    pub fn generator(&self) -> Option<&GeneratorDefinition> {
        self.generator.as_ref()
    }

    /// Deprecated visibility flag. Carried for metadata compatibility only.
    pub fn visibility(&self) -> Option<i64> {
        self.visibility
    }

    /// Strategy classification of the configured generator, if any.
    pub fn generator_kind(&self) -> Option<GeneratorKind> {
        self.generator.as_ref().map(GeneratorDefinition::kind)
    }

    /// True once both the column and the property are named.
    pub fn is_configured(&self) -> bool {
        self.column_name.is_some() && self.property_name.is_some()
    }

    /// Whether `name` is a declared attribute, regardless of its value.
    pub fn has(&self, name: &str) -> bool {
        Attribute::from_name(name).is_some()
    }

    /// Read an attribute by name.
    pub fn get(&self, name: &str) -> Result<AttributeValue> {
        let attribute = Attribute::from_name(name).ok_or_else(|| Error::property_not_found(name))?;
        Ok(self.attribute(attribute))
    }

    /// Write an attribute by name, replacing its previous value.
    ///
    /// Fails with [`Error::PropertyNotFound`] for undeclared names and with
    /// [`Error::InvalidPropertyValue`] when the value does not fit the
    /// attribute; the descriptor is unchanged on failure.
    pub fn set(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<()> {
        let attribute = Attribute::from_name(name).ok_or_else(|| Error::property_not_found(name))?;
        let value = value.into();
        match (attribute, value) {
            (Attribute::ColumnName, AttributeValue::Null) => self.column_name = None,
            (Attribute::ColumnName, AttributeValue::Text(s)) => self.column_name = Some(s),
            (Attribute::PropertyName, AttributeValue::Null) => self.property_name = None,
            (Attribute::PropertyName, AttributeValue::Text(s)) => self.property_name = Some(s),
            (Attribute::PropertyType, AttributeValue::Null) => self.property_type = None,
            (Attribute::PropertyType, AttributeValue::Int(code)) => {
                self.property_type = Some(code);
            }
            (Attribute::Generator, AttributeValue::Null) => self.generator = None,
            (Attribute::Generator, AttributeValue::Generator(g)) => self.generator = Some(g),
            (Attribute::Visibility, AttributeValue::Null) => self.visibility = None,
            (Attribute::Visibility, AttributeValue::Int(v)) => self.visibility = Some(v),
            (attribute, value) => {
                return Err(Error::invalid_value(
                    attribute.name(),
                    &value,
                    attribute.expected(),
                ));
            }
        }
        Ok(())
    }

    /// All attributes with their current values, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, AttributeValue)> + '_ {
        Attribute::ALL
            .into_iter()
            .map(|attribute| (attribute.name(), self.attribute(attribute)))
    }

    fn attribute(&self, attribute: Attribute) -> AttributeValue {
        match attribute {
            Attribute::ColumnName => self.column_name.clone().into(),
            Attribute::PropertyName => self.property_name.clone().into(),
            Attribute::PropertyType => self.property_type.into(),
            Attribute::Generator => self.generator.clone().into(),
            Attribute::Visibility => self.visibility.into(),
        }
    }

    /// Export the descriptor's state as JSON in the given shape.
    pub fn export_state(&self, shape: ExportShape) -> Json {
        let flat: Map<String, Json> = self
            .attributes()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        match shape {
            ExportShape::Flat => Json::Object(flat),
            ExportShape::Nested => {
                let mut outer = Map::new();
                outer.insert(NESTED_STATE_KEY.to_string(), Json::Object(flat));
                Json::Object(outer)
            }
        }
    }

    /// Rebuild a descriptor from exported state in either historical shape.
    ///
    /// An object whose only key is `properties` (holding an object) is the
    /// nested shape; anything else is read as the flat shape. Missing
    /// attributes read as `null`, except `propertyType`, which falls back to
    /// the default type. Undeclared keys are ignored.
    pub fn from_exported_state(state: &Json) -> Result<Self> {
        let outer = state.as_object().ok_or_else(|| {
            Error::InvalidExportedState(format!("expected an object, found {state}"))
        })?;
        let fields = match outer.get(NESTED_STATE_KEY) {
            Some(Json::Object(inner)) if outer.len() == 1 => inner,
            _ => outer,
        };

        for key in fields.keys().filter(|key| Attribute::from_name(key).is_none()) {
            tracing::debug!(key = %key, "Ignoring undeclared key in exported id property state");
        }

        let read = |attribute: Attribute| -> Result<AttributeValue> {
            fields
                .get(attribute.name())
                .map_or(Ok(AttributeValue::Null), |json| {
                    AttributeValue::from_json(attribute, json)
                })
        };
        let property_type = match fields.get(PROPERTY_TYPE) {
            Some(json) => AttributeValue::from_json(Attribute::PropertyType, json)?,
            None => PropertyType::default().into(),
        };

        Self::new(
            read(Attribute::ColumnName)?,
            read(Attribute::PropertyName)?,
            read(Attribute::Visibility)?,
            read(Attribute::Generator)?,
            property_type,
        )
    }
}

impl Serialize for IdProperty {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.export_state(ExportShape::Flat).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IdProperty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let state = Json::deserialize(deserializer)?;
        IdProperty::from_exported_state(&state).map_err(serde::de::Error::custom)
    }
}
