//! Editing and saving failures.

use folio_gateway::GatewayError;
use folio_model::{BlockId, ModelError};
use thiserror::Error;

/// An edit that could not be applied. The edited value is left unchanged.
#[derive(Debug, Error)]
pub enum EditError {
    /// No block with this id on the page.
    #[error("no block `{0}` on this page")]
    BlockNotFound(BlockId),

    /// The block's type is not known to this build, so it cannot be edited.
    #[error("blocks of type `{0}` cannot be edited")]
    UnknownType(String),

    /// The field is not part of the block type's editing surface, or the edit
    /// does not fit the field's input kind.
    #[error("`{field}` is not an editable {input} field of `{owner}`")]
    NotEditable {
        /// Block type or item kind.
        owner: String,
        /// Field named by the edit.
        field: String,
        /// What the edit expected the field to be.
        input: &'static str,
    },

    /// A list index past the end.
    #[error("`{field}` has no entry {index} (length {len})")]
    NoEntry {
        /// List field.
        field: String,
        /// Requested index.
        index: usize,
        /// Current length.
        len: usize,
    },

    /// A value outside the field's allowed choices.
    #[error("`{value}` is not a valid choice for `{field}`")]
    InvalidChoice {
        /// Field named by the edit.
        field: String,
        /// Rejected value.
        value: String,
    },

    /// No form field with this id.
    #[error("no form field `{0}`")]
    FieldNotFound(String),

    /// A reorder that is not a permutation of the current items.
    #[error("new order must list every current item exactly once")]
    NotAPermutation,

    /// The edited document no longer decodes.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A save or delete that did not go through. The in-memory document is left
/// exactly as it was before the call.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Deleting a document that was never saved.
    #[error("document has not been saved yet")]
    NotSaved,
}

impl SaveError {
    /// Returns true when the session has expired and the caller should log
    /// in again.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, SaveError::Gateway(err) if err.is_auth_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_told_apart() {
        assert!(SaveError::from(GatewayError::Unauthorized(401)).is_auth_failure());
        assert!(!SaveError::from(GatewayError::Transport("refused".into())).is_auth_failure());
        assert!(!SaveError::NotSaved.is_auth_failure());
    }
}
