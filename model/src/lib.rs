//! Folio content model.
//!
//! Pages are ordered lists of typed [`Block`]s. Every user-facing text is
//! bilingual and resolves through [`LocalizedText::resolve`] (or
//! [`Record::resolve`] for untyped collection items): the secondary language
//! wins when its value is non-empty, otherwise the default-language value is
//! used.
//!
//! All documents travel as JSON objects through the content gateway. The wire
//! shape keeps `field` / `field_en` pairs; the Rust types are converted with
//! the [`Document`] trait.
//!
//! ```
//! use folio_model::{Block, BlockType, Document, Lang, Page};
//!
//! let mut page = Page::default();
//! page.slug = "about".into();
//! page.blocks.push(Block::create(BlockType::Text));
//!
//! let wire = page.to_value();
//! let back = Page::from_value(wire).unwrap();
//! assert_eq!(back, page);
//! assert_eq!(back.title.resolve(Lang::En), "");
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
pub mod form;
pub mod lang;
pub mod liquid;
pub mod media;
pub mod page;
pub mod record;
pub mod settings;

pub use block::{
    Block, BlockBody, BlockId, BlockType, CardItem, CardsBlock, CollectionBlock, CtaBlock,
    FormBlock, GalleryBlock, HeroBlock, HtmlBlock, ImageBlock, ListBlock, LogoGridBlock,
    LogoItem, MarqueeBlock, SpacerBlock, StatItem, StatsBlock, TextBlock, UnknownBlock,
    VideoBlock, VideoSource, DEFAULT_SPACER_SIZE,
};
pub use collection::CollectionName;
pub use error::ModelError;
pub use form::{FieldKind, Form, FormField, Submission};
pub use lang::{Lang, LocalizedText};
pub use liquid::{LiquidSettings, ResolvedLiquid, DEFAULT_LIQUID_COLORS};
pub use media::MediaAsset;
pub use page::Page;
pub use record::{Document, Record};
pub use settings::{NavLink, SiteSettings, Theme};
