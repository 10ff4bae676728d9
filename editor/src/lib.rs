//! # folio-editor
//!
//! Admin-side editing of Folio content. Pages, forms and collection items
//! are edited in memory and only reach the content gateway on an explicit
//! save; a save that fails leaves the edited value exactly as it was.
//!
//! | Module | Edits |
//! |---|---|
//! | [`page`] | a page's blocks and settings ([`PageEditor`]) |
//! | [`block`] | one block's fields, checked against its surface in [`fields`] |
//! | [`form`] | form definitions and their submissions ([`FormEditor`]) |
//! | [`collection`] | content collection items ([`CollectionEditor`]) |
//! | [`session`] | the admin login and failure notices ([`AdminSession`]) |
//!
//! ```
//! use folio_editor::{BlockEdit, PageEditor};
//! use folio_gateway::MemoryGateway;
//! use folio_model::{BlockType, Lang, LocalizedText};
//!
//! let store = MemoryGateway::new();
//! let mut editor = PageEditor::create("about", LocalizedText::new("О нас"));
//! let id = editor.add_block(BlockType::Text);
//! editor
//!     .apply_edit(
//!         &id,
//!         &BlockEdit::SetLocalized {
//!             field: "heading".into(),
//!             lang: Lang::En,
//!             value: "About".into(),
//!         },
//!     )
//!     .map_err(|e| e.to_string())?;
//! editor.save(&store).map_err(|e| e.to_string())?;
//! assert!(editor.page().id.is_some());
//! # Ok::<(), String>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod block;
pub mod collection;
pub mod error;
pub mod fields;
pub mod form;
pub mod order;
pub mod page;
pub mod session;

pub use block::{apply_edit, describe, BlockEdit, FieldValue};
pub use collection::{empty_item, CollectionEditor};
pub use error::{EditError, SaveError};
pub use fields::{fields_for, FieldSpec, InputKind};
pub use form::FormEditor;
pub use order::Direction;
pub use page::PageEditor;
pub use session::{AdminSession, Failure, Notice, Operation, SessionState};
