//! # folio-render
//!
//! Turns Folio content into HTML. Every render call is a pure function of
//! the content, a [`RenderContext`] (language, site settings, gateway and
//! link prefixes) and whatever the gateway returns for referenced forms and
//! collections.
//!
//! | Module | Renders |
//! |---|---|
//! | [`blocks`] | one block, dispatched on its type |
//! | [`page`] | page bodies, the document shell and the not-found page |
//! | [`form`] | public forms and the submission session behind them |
//! | [`nav`] | the site navigation and language switch |
//! | [`detail`] | collection item detail pages |
//!
//! ```
//! use folio_gateway::MemoryGateway;
//! use folio_model::{Block, BlockBody, BlockId, Lang, LocalizedText, SiteSettings, TextBlock};
//! use folio_render::{blocks::render_block, RenderContext};
//!
//! let store = MemoryGateway::new();
//! let settings = SiteSettings::default();
//! let ctx = RenderContext::new(Lang::En, &settings, &store);
//! let block = Block::new(
//!     BlockId::new("intro"),
//!     BlockBody::Text(TextBlock {
//!         heading: LocalizedText::new("Привет").with(Lang::En, "Hello"),
//!         body: LocalizedText::new("Текст"),
//!     }),
//! );
//! let html = render_block(&block, &ctx);
//! assert!(html.contains("Hello"));
//! assert!(html.contains("Текст"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod blocks;
pub mod detail;
pub mod form;
pub mod html;
pub mod labels;
pub mod marquee;
pub mod nav;
pub mod page;
pub mod video;

use folio_gateway::ContentGateway;
use folio_model::{Lang, LocalizedText, SiteSettings};

pub use html::escape_html;

/// Everything a render call needs besides the content itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Language being rendered.
    pub lang: Lang,
    /// Site-wide theme, navigation and footer.
    pub settings: &'a SiteSettings,
    /// Source of referenced forms and collection items.
    pub gateway: &'a dyn ContentGateway,
    /// Prefix of every generated URL (`""` when served from the host root).
    pub base_path: &'a str,
    /// Where static forms post to; `{form_action_base}/forms/{slug}/submit`.
    pub form_action_base: &'a str,
}

impl<'a> RenderContext<'a> {
    /// Creates a context rendering at the host root, posting forms to `/api`.
    pub fn new(lang: Lang, settings: &'a SiteSettings, gateway: &'a dyn ContentGateway) -> Self {
        Self {
            lang,
            settings,
            gateway,
            base_path: "",
            form_action_base: "/api",
        }
    }

    /// Sets the URL prefix.
    #[must_use]
    pub fn with_base_path(mut self, base_path: &'a str) -> Self {
        self.base_path = base_path;
        self
    }

    /// Sets the form submission base URL.
    #[must_use]
    pub fn with_form_action_base(mut self, form_action_base: &'a str) -> Self {
        self.form_action_base = form_action_base;
        self
    }

    /// The same context in another language.
    #[must_use]
    pub fn in_lang(mut self, lang: Lang) -> Self {
        self.lang = lang;
        self
    }

    /// Routes a content link into the current language tree.
    #[must_use]
    pub fn href(&self, href: &str) -> String {
        html::localize_href(href, self.lang, self.base_path)
    }

    /// Prefixes a media URL with the base path.
    #[must_use]
    pub fn asset(&self, url: &str) -> String {
        html::asset_url(url, self.base_path)
    }

    /// Resolves a bilingual text for the current language.
    #[must_use]
    pub fn text<'t>(&self, text: &'t LocalizedText) -> &'t str {
        text.resolve(self.lang)
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("lang", &self.lang)
            .field("base_path", &self.base_path)
            .field("form_action_base", &self.form_action_base)
            .finish_non_exhaustive()
    }
}
