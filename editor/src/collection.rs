//! Items of the content collections (services, cases, team, ...).

use chrono::{SecondsFormat, Utc};
use folio_gateway::{ContentGateway, GatewayError, ListQuery};
use folio_model::{CollectionName, Record};
use tracing::{info, warn};

use crate::error::SaveError;

/// A blank item with the fields the admin form shows for `collection`.
#[must_use]
pub fn empty_item(collection: CollectionName) -> Record {
    let mut item = Record::new();
    item.set("name", "");
    item.set("description", "");
    item.set("image_url", "");
    let now = || Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let (texts, lists): (&[&str], &[&str]) = match collection {
        CollectionName::Services => (&["slug"], &["features"]),
        CollectionName::Cases => (
            &["slug", "title", "client", "category", "challenge", "solution"],
            &["results"],
        ),
        CollectionName::Events => (&["slug", "title", "date", "location", "type"], &["program"]),
        CollectionName::Projects => (
            &[
                "slug",
                "title",
                "stage",
                "industry",
                "country",
                "capital_required",
                "timeline",
            ],
            &[],
        ),
        CollectionName::Partners => (&["slug", "country", "logo_url"], &["categories"]),
        CollectionName::Articles => (
            &["slug", "title", "excerpt", "content", "author", "category"],
            &[],
        ),
        CollectionName::Team => (&["position", "bio", "linkedin"], &[]),
    };
    for key in texts {
        item.set(*key, "");
    }
    for key in lists {
        item.put_strings(key, &[]);
    }
    match collection {
        CollectionName::Cases => item.set("created_at", now()),
        CollectionName::Articles => item.set("published_at", now()),
        CollectionName::Projects => item.set("status", "active"),
        _ => {}
    }
    item
}

/// Admin access to one content collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionEditor {
    collection: CollectionName,
}

impl CollectionEditor {
    /// Edits `collection`.
    #[must_use]
    pub fn new(collection: CollectionName) -> Self {
        Self { collection }
    }

    /// The collection being edited.
    #[must_use]
    pub fn collection(&self) -> CollectionName {
        self.collection
    }

    /// A blank item for this collection.
    #[must_use]
    pub fn blank(&self) -> Record {
        empty_item(self.collection)
    }

    /// Every stored item, in stored order.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the call fails.
    pub fn list<G: ContentGateway + ?Sized>(
        &self,
        gateway: &G,
    ) -> Result<Vec<Record>, GatewayError> {
        gateway.list(self.collection.as_str(), &ListQuery::new())
    }

    /// Stores `item`: created under a fresh id when it has none, updated
    /// otherwise. Returns the stored item.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Gateway`] when the call fails.
    pub fn save<G: ContentGateway + ?Sized>(
        &self,
        gateway: &G,
        mut item: Record,
    ) -> Result<Record, SaveError> {
        let name = self.collection.as_str();
        let result = match item.opt_text("id") {
            Some(id) => gateway.update(name, &id, item),
            None => {
                item.set("id", ulid::Ulid::new().to_string());
                gateway.create(name, item)
            }
        };
        match result {
            Ok(stored) => {
                info!(collection = name, id = %stored.text("id"), "item saved");
                Ok(stored)
            }
            Err(err) => {
                warn!(collection = name, error = %err, "item save failed");
                Err(err.into())
            }
        }
    }

    /// Deletes the item with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Gateway`] when the call fails.
    pub fn delete<G: ContentGateway + ?Sized>(
        &self,
        gateway: &G,
        id: &str,
    ) -> Result<(), SaveError> {
        gateway.delete(self.collection.as_str(), id).map_err(|err| {
            warn!(collection = self.collection.as_str(), id, error = %err, "item delete failed");
            SaveError::from(err)
        })
    }
}
