//! Streaming iteration over a result set as persistent objects.
//!
//! [`FindIterator`] instantiates exactly one object and reuses it for every
//! row: each [`advance`](FindIterator::advance) overwrites the held object's
//! state in place. This keeps memory flat for arbitrarily large result sets
//! and avoids an allocation per row.
//!
//! References returned by the iterator are invalidated by the next advance.
//! The borrow checker enforces this; clone the object (or use
//! [`FindIterator::cloned`]) to keep a snapshot.
//!
//! # Example
//!
//! ```
//! use persistobj::prelude::*;
//!
//! let def = ObjectDefinition::new("User", "users")
//!     .id_property(IdProperty::named("id", "id"))
//!     .property(PropertyDefinition::new("name", "name", PropertyType::String));
//!
//! let cursor = VecCursor::new(vec![
//!     Row::new().with("id", 1).with("name", "a"),
//!     Row::new().with("id", 2).with("name", "b"),
//! ]);
//!
//! let mut users = FindIterator::<DynamicObject, _>::new(cursor, &def);
//! let mut names = Vec::new();
//! while let Some(user) = users.advance()? {
//!     names.push(user.get("name").and_then(Value::as_str).unwrap_or_default().to_string());
//! }
//! assert_eq!(names, ["a", "b"]);
//! assert!(!users.has_current());
//! # Ok::<(), persistobj::Error>(())
//! ```

use std::iter::FusedIterator;

use persistobj_core::{Cursor, Fetch, ObjectDefinition, PersistentObject, Result};

use crate::transform::{RowTransformer, StateTransformer};

/// Forward-only iterator over a cursor's rows, materialized into one reused
/// persistent object.
pub struct FindIterator<'d, T, C, R = StateTransformer> {
    cursor: C,
    definition: &'d ObjectDefinition,
    transformer: R,
    /// The reused instance; `None` before the first row and after the end.
    current: Option<T>,
    rows_fetched: u64,
}

impl<'d, T, C> FindIterator<'d, T, C>
where
    T: PersistentObject,
    C: Cursor,
{
    /// Wrap an executed cursor, mapping rows with the default transformer.
    ///
    /// The cursor must not have been read from yet.
    pub fn new(cursor: C, definition: &'d ObjectDefinition) -> Self {
        Self::with_transformer(cursor, definition, StateTransformer::default())
    }
}

impl<'d, T, C, R> FindIterator<'d, T, C, R>
where
    T: PersistentObject,
    C: Cursor,
    R: RowTransformer,
{
    /// Wrap an executed cursor, mapping rows with `transformer`.
    #[tracing::instrument(
        level = "debug",
        skip(cursor, definition, transformer),
        fields(class = definition.class())
    )]
    pub fn with_transformer(cursor: C, definition: &'d ObjectDefinition, transformer: R) -> Self {
        tracing::debug!(
            class = definition.class(),
            table = definition.table(),
            "Creating find iterator"
        );
        Self {
            cursor,
            definition,
            transformer,
            current: None,
            rows_fetched: 0,
        }
    }

    /// Position the iterator on the first object.
    ///
    /// Fetches a row only when no object is currently held; otherwise this
    /// is a no-op. The cursor is single-pass, so this never rewinds past
    /// rows already consumed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> Result<Option<&T>> {
        if self.current.is_none() {
            return self.advance();
        }
        Ok(self.current.as_ref())
    }

    /// Fetch the next row into the held object and return it.
    ///
    /// Returns `Ok(None)` and drops the held object once the cursor is
    /// exhausted, or when the cursor reports that its statement was never
    /// executed. Cursor failures and transform failures are returned
    /// unmodified; the held object is not replaced when either occurs.
    pub fn advance(&mut self) -> Result<Option<&T>> {
        let row = match self.cursor.fetch_row() {
            Fetch::Row(row) => row,
            Fetch::EndOfResults => {
                tracing::trace!(
                    class = self.definition.class(),
                    rows = self.rows_fetched,
                    "Result set exhausted"
                );
                self.current = None;
                return Ok(None);
            }
            Fetch::NotExecuted => {
                tracing::debug!(
                    class = self.definition.class(),
                    "Cursor statement not executed, treating as end of results"
                );
                self.current = None;
                return Ok(None);
            }
            Fetch::Failed(e) => return Err(e.into()),
        };

        self.rows_fetched += 1;
        tracing::trace!(
            class = self.definition.class(),
            row = self.rows_fetched,
            columns = row.len(),
            "Fetched row"
        );

        let state = self.transformer.row_to_state(&row, self.definition)?;
        match self.current.as_mut() {
            Some(object) => object.set_state(&state)?,
            None => {
                let mut object = T::default();
                object.set_state(&state)?;
                self.current = Some(object);
            }
        }
        Ok(self.current.as_ref())
    }

    /// True if an object is currently held.
    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }

    /// The held object, without fetching.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Persistent objects carry no sequence key; always `None`.
    pub fn key(&self) -> Option<()> {
        None
    }

    /// The definition rows are mapped with.
    pub fn definition(&self) -> &'d ObjectDefinition {
        self.definition
    }

    /// Number of rows fetched so far.
    pub fn rows_fetched(&self) -> u64 {
        self.rows_fetched
    }

    /// Release the cursor.
    pub fn into_cursor(self) -> C {
        self.cursor
    }

    /// Adapt into a standard iterator yielding an owned snapshot per row.
    ///
    /// Each item is a clone of the reused object. Iteration stops after the
    /// first error.
    pub fn cloned(self) -> Cloned<'d, T, C, R>
    where
        T: Clone,
    {
        Cloned {
            inner: self,
            done: false,
        }
    }
}

impl<T: std::fmt::Debug, C, R> std::fmt::Debug for FindIterator<'_, T, C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindIterator")
            .field("class", &self.definition.class())
            .field("current", &self.current)
            .field("rows_fetched", &self.rows_fetched)
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`FindIterator::cloned`].
pub struct Cloned<'d, T, C, R = StateTransformer> {
    inner: FindIterator<'d, T, C, R>,
    done: bool,
}

impl<T, C, R> Iterator for Cloned<'_, T, C, R>
where
    T: PersistentObject + Clone,
    C: Cursor,
    R: RowTransformer,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.advance() {
            Ok(Some(object)) => Some(Ok(object.clone())),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<T, C, R> FusedIterator for Cloned<'_, T, C, R>
where
    T: PersistentObject + Clone,
    C: Cursor,
    R: RowTransformer,
{
}
