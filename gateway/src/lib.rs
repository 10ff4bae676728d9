//! Folio content gateway.
//!
//! The gateway is the document boundary of the CMS: JSON objects read and
//! written by collection name and slug or id. Two implementations exist:
//!
//! - [`MemoryGateway`], an in-process store that can be loaded from and saved
//!   to a directory of `<collection>.json` files;
//! - [`HttpGateway`], a client of the REST content API:
//!
//! ```text
//! GET    /{collection}?lang=..&filter=..   list
//! GET    /{collection}/{slug_or_id}        single document
//! POST   /admin/{collection}               create   (bearer token)
//! PUT    /admin/{collection}/{id}          update   (bearer token)
//! DELETE /admin/{collection}/{id}          delete   (bearer token)
//! POST   /forms/{slug}/submit              public form submission
//! POST   /admin/media/upload?filename=..   media upload (bearer token)
//! POST   /auth/login                       obtain a bearer token
//! ```
//!
//! Typed access to pages, forms, settings and submissions lives in
//! [`documents`].

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod documents;
pub mod error;
pub mod http;
pub mod memory;

use std::collections::BTreeMap;

use folio_model::{Lang, MediaAsset, Record};

pub use error::GatewayError;
pub use http::HttpGateway;
pub use memory::MemoryGateway;

/// Collection of dynamic pages.
pub const PAGES: &str = "pages-dynamic";
/// Collection of form definitions.
pub const FORMS: &str = "forms";
/// Collection of form submissions.
pub const SUBMISSIONS: &str = "submissions";
/// Collection of uploaded media metadata.
pub const MEDIA: &str = "media";
/// Collection holding the site settings document.
pub const SETTINGS: &str = "settings";
/// Identifier of the single site settings document.
pub const SETTINGS_ID: &str = "site";

/// Parameters of a list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Language hint passed to the content API.
    pub lang: Option<Lang>,
    /// Collection-specific equality filters (`category`, `form_id`, ...).
    pub filters: BTreeMap<String, String>,
    /// Maximum number of documents; `None` for all.
    pub limit: Option<usize>,
}

impl ListQuery {
    /// A query returning every document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language hint.
    #[must_use]
    pub fn lang(mut self, lang: Lang) -> Self {
        self.lang = Some(lang);
        self
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Caps the number of documents. Zero means no cap.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Returns true when `record` passes every filter.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|(key, value)| record.text(key) == *value)
    }
}

/// Generic access to content documents.
///
/// Public reads (`list`, `get`, `submit_form`) need no credentials; every
/// other call is an admin call and fails with
/// [`GatewayError::Unauthorized`] when the session is missing or expired.
pub trait ContentGateway {
    /// Lists the documents of a collection, in stored order.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the store cannot be reached.
    fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Record>, GatewayError>;

    /// Fetches one document by slug or id. A missing document is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the store cannot be reached.
    fn get(&self, collection: &str, key: &str) -> Result<Option<Record>, GatewayError>;

    /// Creates a document and returns it as stored, with its identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the store rejects the call.
    fn create(&self, collection: &str, document: Record) -> Result<Record, GatewayError>;

    /// Replaces the document with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the document does not exist or the
    /// store rejects the call.
    fn update(&self, collection: &str, id: &str, document: Record)
        -> Result<Record, GatewayError>;

    /// Deletes the document with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the document does not exist or the
    /// store rejects the call.
    fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError>;

    /// Posts a public form submission and returns the stored submission.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the form does not exist or the call
    /// fails.
    fn submit_form(
        &self,
        slug: &str,
        payload: &BTreeMap<String, String>,
    ) -> Result<Record, GatewayError>;

    /// Uploads a media file.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the store rejects the upload.
    fn upload_media(&self, filename: &str, bytes: &[u8]) -> Result<MediaAsset, GatewayError>;
}

/// Exchanges credentials for a bearer token used by admin calls.
pub trait Authenticator {
    /// Logs in and keeps the returned token for later admin calls.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] for rejected credentials.
    fn login(&self, username: &str, password: &str) -> Result<String, GatewayError>;

    /// Forgets the current token.
    fn logout(&self);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn zero_limit_means_unbounded() {
        assert_eq!(ListQuery::new().limit(0).limit, None);
        assert_eq!(ListQuery::new().limit(3).limit, Some(3));
    }

    #[test]
    fn filters_compare_text() -> Result<(), folio_model::ModelError> {
        let record = Record::from_value(json!({"category": "retail", "stage": 2}))?;
        assert!(ListQuery::new().filter("category", "retail").matches(&record));
        assert!(ListQuery::new().filter("stage", "2").matches(&record));
        assert!(!ListQuery::new().filter("category", "b2b").matches(&record));
        Ok(())
    }
}
