//! persistobj: persistent objects over database cursors.
//!
//! This facade crate re-exports the `persistobj-core` contracts and adds the
//! pieces that operate on them:
//!
//! - [`FindIterator`] streams a result set into a single reused object.
//! - [`StateTransformer`] maps raw rows onto typed object state, configured by
//!   [`TransformConfig`].
//! - [`VecCursor`] is an in-memory [`Cursor`].
//!
//! Identifier metadata ([`IdProperty`], [`GeneratorDefinition`]) lives in the
//! core crate and is re-exported here.

pub mod find_iterator;
pub mod memory;
pub mod transform;

pub use find_iterator::{Cloned, FindIterator};
pub use memory::VecCursor;
pub use transform::{RowTransformer, StateTransformer, TransformConfig, UnknownColumnPolicy};

pub use persistobj_core::{
    Attribute, AttributeValue, ColumnMapping, Cursor, CursorError, DynamicObject, Error,
    ExportShape, Fetch, GeneratorDefinition, GeneratorKind, IdProperty, ObjectDefinition,
    PersistentObject, PropertyDefinition, PropertyType, Result, Row, StateMap, Value,
};

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        Cursor, DynamicObject, Error, ExportShape, Fetch, FindIterator, GeneratorDefinition,
        IdProperty, ObjectDefinition, PersistentObject, PropertyDefinition, PropertyType,
        Result, Row, RowTransformer, StateMap, StateTransformer, TransformConfig, Value,
        VecCursor,
    };
}
