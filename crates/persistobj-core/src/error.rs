//! Error types for persistobj.
//!
//! Descriptor misuse (`PropertyNotFound`, `InvalidPropertyValue`) is always
//! surfaced to the caller. Cursor and transform failures propagate through the
//! find iterator unmodified; the one cursor condition that is *not* an error
//! (fetching from a statement that was never executed) is modelled
//! structurally by [`crate::cursor::Fetch::NotExecuted`] and never reaches this
//! type.

/// Result alias used throughout persistobj.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by persistobj.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dynamic accessor was given a name outside the declared attribute set.
    #[error("no such property name '{name}'")]
    PropertyNotFound { name: String },

    /// A value failed the type constraint of the attribute it was assigned to.
    #[error("the value '{value}' that you were trying to assign to setting '{name}' is invalid; allowed values are: {expected}")]
    InvalidPropertyValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// Serialized descriptor state was not in one of the recognized shapes.
    #[error("invalid exported state: {0}")]
    InvalidExportedState(String),

    /// The cursor failed while fetching a row.
    #[error("cursor error: {0}")]
    Cursor(#[from] CursorError),

    /// A raw row could not be mapped onto the object's state.
    #[error("cannot transform column '{column}': {message}")]
    RowTransform { column: String, message: String },

    /// The domain object rejected the state it was given.
    #[error("cannot apply state to {class}: {message}")]
    State { class: String, message: String },
}

impl Error {
    /// Build an [`Error::PropertyNotFound`].
    pub fn property_not_found(name: impl Into<String>) -> Self {
        Error::PropertyNotFound { name: name.into() }
    }

    /// Build an [`Error::InvalidPropertyValue`].
    pub fn invalid_value(
        name: impl Into<String>,
        value: &impl std::fmt::Display,
        expected: &'static str,
    ) -> Self {
        Error::InvalidPropertyValue {
            name: name.into(),
            value: value.to_string(),
            expected,
        }
    }

    /// Build an [`Error::RowTransform`].
    pub fn row_transform(column: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RowTransform {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Build an [`Error::State`].
    pub fn state(class: impl Into<String>, message: impl Into<String>) -> Self {
        Error::State {
            class: class.into(),
            message: message.into(),
        }
    }

    /// True for descriptor-protocol misuse (unknown name or mistyped value).
    pub fn is_property_error(&self) -> bool {
        matches!(
            self,
            Error::PropertyNotFound { .. } | Error::InvalidPropertyValue { .. }
        )
    }
}

/// Failure reported by a [`crate::cursor::Cursor`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The connection backing the cursor went away.
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// Any other driver-reported failure.
    #[error("driver error: {0}")]
    Driver(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message_names_expected_type() {
        let err = Error::invalid_value("columnName", &42, "string or null");
        let msg = err.to_string();
        assert!(msg.contains("columnName"));
        assert!(msg.contains("42"));
        assert!(msg.contains("string or null"));
        assert!(err.is_property_error());
    }

    #[test]
    fn test_cursor_error_converts() {
        let err: Error = CursorError::Driver("boom".to_string()).into();
        assert!(matches!(err, Error::Cursor(CursorError::Driver(_))));
        assert!(!err.is_property_error());
    }
}
