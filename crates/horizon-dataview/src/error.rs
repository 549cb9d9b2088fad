//! Error types for the data view.
//!
//! Lookups never fail with an error: "not found" is `None` or
//! [`Row::INVALID`](crate::Row::INVALID). Errors explain why an operation
//! that changes state (mostly opening an edit session) did not happen.

use crate::column::ColumnId;

/// Result type alias for data view operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the data view.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An edit session is already open.
    #[error("an edit session is already in progress")]
    EditInProgress,

    /// The item is stale, or not a valid index for the model.
    #[error("item does not exist or is not reachable from the root")]
    InvalidItem,

    /// No column with this id is displayed.
    #[error("unknown column {0:?}")]
    UnknownColumn(ColumnId),

    /// The column or the model refuses editing of the cell.
    #[error("cell is not editable")]
    NotEditable,

    /// The model had no value to start an editor from.
    #[error("model returned no editable value")]
    NoEditableValue,

    /// A listener vetoed the transition.
    #[error("operation vetoed by a listener")]
    Vetoed,

    /// The column's renderer does not create editor controls.
    #[error("renderer did not create an editor control")]
    NoEditorControl,

    /// The operation does not apply to this kind of model.
    #[error("operation requires a {expected} model")]
    WrongModelKind { expected: &'static str },

    /// A configuration value is out of range.
    #[error("invalid configuration for '{field}': {message}")]
    InvalidConfig { field: &'static str, message: String },
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::invalid_config("indent", "must be finite").to_string(),
            "invalid configuration for 'indent': must be finite"
        );
        assert_eq!(
            Error::WrongModelKind { expected: "tree" }.to_string(),
            "operation requires a tree model"
        );
        assert_eq!(Error::UnknownColumn(ColumnId::new(3)).to_string(), "unknown column ColumnId(3)");
    }
}
