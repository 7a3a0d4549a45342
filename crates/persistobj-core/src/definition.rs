//! Persistent object type definitions.
//!
//! An [`ObjectDefinition`] is the schema metadata for one persisted entity
//! type: the class it is loaded into, the table it is stored in, its
//! identifier property and its ordinary properties. Row transformers use the
//! column mapping it provides.

use crate::id_property::IdProperty;
use crate::types::PropertyType;

/// Metadata about an ordinary (non-identifier) property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    /// Database column name.
    pub column_name: String,
    /// In-memory property name (may differ from the column name).
    pub property_name: String,
    /// In-memory type of the property.
    pub property_type: PropertyType,
}

impl PropertyDefinition {
    /// Create a property definition.
    pub fn new(
        column_name: impl Into<String>,
        property_name: impl Into<String>,
        property_type: PropertyType,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            property_name: property_name.into(),
            property_type,
        }
    }
}

/// A column resolved to the property it populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping<'a> {
    /// Database column name.
    pub column_name: &'a str,
    /// In-memory property name.
    pub property_name: &'a str,
    /// Declared type; `None` when the identifier leaves it unconfigured.
    pub property_type: Option<PropertyType>,
    /// Whether this column is the identifier.
    pub is_identifier: bool,
}

/// Schema metadata for one persistent object type.
///
/// # Example
///
/// ```
/// use persistobj_core::{IdProperty, ObjectDefinition, PropertyDefinition, PropertyType};
///
/// let def = ObjectDefinition::new("User", "users")
///     .id_property(IdProperty::named("id", "id"))
///     .property(PropertyDefinition::new("user_name", "name", PropertyType::String));
///
/// let mapping = def.property_for_column("user_name").unwrap();
/// assert_eq!(mapping.property_name, "name");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDefinition {
    class: String,
    table: String,
    id_property: IdProperty,
    properties: Vec<PropertyDefinition>,
}

impl ObjectDefinition {
    /// Create a definition with no properties and an unconfigured identifier.
    pub fn new(class: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            table: table.into(),
            id_property: IdProperty::default(),
            properties: Vec::new(),
        }
    }

    /// Set the identifier property.
    pub fn id_property(mut self, id_property: IdProperty) -> Self {
        self.id_property = id_property;
        self
    }

    /// Add an ordinary property.
    pub fn property(mut self, property: PropertyDefinition) -> Self {
        self.properties.push(property);
        self
    }

    /// Name of the domain class rows are loaded into.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Table the objects are stored in.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Identifier metadata.
    pub fn identifier(&self) -> &IdProperty {
        &self.id_property
    }

    /// Mutable identifier metadata, for the schema-building phase.
    pub fn identifier_mut(&mut self) -> &mut IdProperty {
        &mut self.id_property
    }

    /// Ordinary properties in declaration order.
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    /// Every mapped column, identifier first.
    ///
    /// The identifier only contributes an entry once both its column and its
    /// property are named.
    pub fn column_map(&self) -> Vec<ColumnMapping<'_>> {
        let id = self.identifier_mapping();
        id.into_iter()
            .chain(self.properties.iter().map(|p| ColumnMapping {
                column_name: &p.column_name,
                property_name: &p.property_name,
                property_type: Some(p.property_type),
                is_identifier: false,
            }))
            .collect()
    }

    /// Resolve the property populated by `column`.
    pub fn property_for_column(&self, column: &str) -> Option<ColumnMapping<'_>> {
        if let Some(id) = self
            .identifier_mapping()
            .filter(|id| id.column_name == column)
        {
            return Some(id);
        }
        self.properties
            .iter()
            .find(|p| p.column_name == column)
            .map(|p| ColumnMapping {
                column_name: &p.column_name,
                property_name: &p.property_name,
                property_type: Some(p.property_type),
                is_identifier: false,
            })
    }

    fn identifier_mapping(&self) -> Option<ColumnMapping<'_>> {
        let column_name = self.id_property.column_name()?;
        let property_name = self.id_property.property_name()?;
        Some(ColumnMapping {
            column_name,
            property_name,
            property_type: self.id_property.property_type(),
            is_identifier: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_definition() -> ObjectDefinition {
        ObjectDefinition::new("User", "users")
            .id_property(IdProperty::named("user_id", "id"))
            .property(PropertyDefinition::new("name", "name", PropertyType::String))
            .property(PropertyDefinition::new("score", "score", PropertyType::Float))
    }

    #[test]
    fn test_column_map_identifier_first() {
        let def = user_definition();
        let map = def.column_map();
        assert_eq!(map.len(), 3);
        assert!(map[0].is_identifier);
        assert_eq!(map[0].column_name, "user_id");
        assert_eq!(map[0].property_name, "id");
        assert_eq!(map[0].property_type, Some(PropertyType::Int));
        assert_eq!(map[2].property_type, Some(PropertyType::Float));
    }

    #[test]
    fn test_unconfigured_identifier_is_unmapped() {
        let def = ObjectDefinition::new("Log", "logs")
            .property(PropertyDefinition::new("msg", "message", PropertyType::String));
        assert_eq!(def.column_map().len(), 1);
        assert!(def.property_for_column("id").is_none());
    }

    #[test]
    fn test_unknown_identifier_type_code_is_untyped() {
        let mut def = user_definition();
        def.identifier_mut()
            .set(crate::id_property::PROPERTY_TYPE, 42)
            .unwrap();
        let mapping = def.property_for_column("user_id").unwrap();
        assert!(mapping.is_identifier);
        assert_eq!(mapping.property_type, None);
        assert_eq!(def.identifier().property_type_code(), Some(42));
    }

    #[test]
    fn test_property_for_column() {
        let def = user_definition();
        assert!(def.property_for_column("user_id").unwrap().is_identifier);
        assert_eq!(def.property_for_column("score").unwrap().property_name, "score");
        assert!(def.property_for_column("id").is_none());
    }

    #[test]
    fn test_identifier_mut_during_schema_build() {
        let mut def = ObjectDefinition::new("User", "users");
        def.identifier_mut()
            .set(crate::id_property::COLUMN_NAME, "id")
            .unwrap();
        def.identifier_mut()
            .set(crate::id_property::PROPERTY_NAME, "id")
            .unwrap();
        assert!(def.identifier().is_configured());
        assert_eq!(def.column_map().len(), 1);
    }
}
