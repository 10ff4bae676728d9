//! Errors raised while decoding or transforming content documents.

use thiserror::Error;

/// An error in a content document or in an operation on one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A document or sub-record was not a JSON object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// A `type` tag outside the closed set of block types.
    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),

    /// A collection name that is not one of the known content collections.
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),

    /// A language tag other than the supported ones.
    #[error("unknown language `{0}`")]
    UnknownLang(String),

    /// A field was present but held a value of the wrong shape.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField {
        /// Wire name of the offending field.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An attempt to replace a block's body with a body of another type.
    #[error("block type is immutable: cannot change `{from}` into `{to}`")]
    TypeChange {
        /// Type of the existing block.
        from: String,
        /// Type of the rejected replacement.
        to: String,
    },
}

impl ModelError {
    /// Shorthand for [`ModelError::InvalidField`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Returns the JSON kind name of a value, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
