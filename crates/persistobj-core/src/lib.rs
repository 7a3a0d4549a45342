//! Core types and contracts for persistobj.
//!
//! `persistobj-core` is the contract layer the rest of persistobj builds on.
//!
//! # Role In The Architecture
//!
//! - **Data model**: `Row` and `Value` carry raw driver output; `StateMap`
//!   carries typed property values.
//! - **Contracts**: `Cursor` is implemented by drivers, `PersistentObject` by
//!   domain types.
//! - **Metadata**: `ObjectDefinition` describes one persisted type, and
//!   `IdProperty` its validated identifier configuration, including the
//!   `GeneratorDefinition` used on insert.
//!
//! Most applications should use the `persistobj` facade; reach for
//! `persistobj-core` directly when writing drivers or schema tooling.

pub mod cursor;
pub mod definition;
pub mod error;
pub mod generator;
pub mod id_property;
pub mod object;
pub mod row;
pub mod types;
pub mod value;

pub use cursor::{Cursor, Fetch};
pub use definition::{ColumnMapping, ObjectDefinition, PropertyDefinition};
pub use error::{CursorError, Error, Result};
pub use generator::{GeneratorDefinition, GeneratorKind};
pub use id_property::{Attribute, AttributeValue, ExportShape, IdProperty};
pub use object::{DynamicObject, PersistentObject, StateMap};
pub use row::Row;
pub use types::PropertyType;
pub use value::Value;
