//! In-process content store.
//!
//! [`MemoryGateway`] keeps every collection as an ordered list of records.
//! It backs the local content directory used by the command-line clients
//! (`<collection>.json` files, media bytes under `uploads/`) and stands in for
//! the content API in tests, including simulated outages and expired
//! sessions.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use folio_model::media::content_type_for;
use folio_model::{Document, MediaAsset, Record, Submission};
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::{Authenticator, ContentGateway, GatewayError, ListQuery, FORMS, MEDIA, SUBMISSIONS};

/// Directory under the content root holding uploaded media bytes.
const UPLOADS_DIR: &str = "uploads";

/// A content store held in memory.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    collections: RwLock<BTreeMap<String, Vec<Record>>>,
    uploads: RwLock<BTreeMap<String, Vec<u8>>>,
    credentials: Option<(String, String)>,
    token: RwLock<Option<String>>,
    offline: AtomicBool,
}

impl MemoryGateway {
    /// Creates an empty store that accepts admin calls without logging in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a login with these credentials before admin calls.
    #[must_use]
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Loads every `<collection>.json` file of `dir`. A file holds either an
    /// array of documents or a single document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Io`] when the directory or a file cannot be
    /// read and [`GatewayError::Decode`] when a file is not valid JSON.
    pub fn load_dir(dir: &Path) -> Result<Self, GatewayError> {
        let store = Self::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| GatewayError::Io {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }
            let Some(collection) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = fs::read_to_string(path).map_err(|source| GatewayError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let value: Value = serde_json::from_str(&text)
                .map_err(|e| GatewayError::Decode(format!("{}: {e}", path.display())))?;
            let documents = match value {
                Value::Array(items) => items,
                other => vec![other],
            };
            for document in documents {
                store.insert(collection, Record::from_value(document)?);
            }
            debug!(collection, path = %path.display(), "loaded collection");
        }

        let uploads = dir.join(UPLOADS_DIR);
        if uploads.is_dir() {
            for entry in WalkDir::new(&uploads).min_depth(1).max_depth(1) {
                let entry = entry.map_err(|e| GatewayError::Io {
                    path: uploads.clone(),
                    source: e.into(),
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let bytes = fs::read(entry.path()).map_err(|source| GatewayError::Io {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
                let url = format!("/{UPLOADS_DIR}/{}", entry.file_name().to_string_lossy());
                write_lock(&store.uploads).insert(url, bytes);
            }
        }
        Ok(store)
    }

    /// Writes every collection to `dir` as `<collection>.json`, plus the
    /// uploaded media bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Io`] when a file cannot be written.
    pub fn save_dir(&self, dir: &Path) -> Result<(), GatewayError> {
        fs::create_dir_all(dir).map_err(io_error(dir))?;
        for (collection, records) in read_lock(&self.collections).iter() {
            let path = dir.join(format!("{collection}.json"));
            let text = serde_json::to_string_pretty(records)
                .map_err(|e| GatewayError::Decode(e.to_string()))?;
            fs::write(&path, text + "\n").map_err(io_error(&path))?;
        }
        let uploads = read_lock(&self.uploads);
        if !uploads.is_empty() {
            let root = dir.join(UPLOADS_DIR);
            fs::create_dir_all(&root).map_err(io_error(&root))?;
            for (url, bytes) in uploads.iter() {
                let name = url.rsplit('/').next().unwrap_or(url);
                let path = root.join(name);
                fs::write(&path, bytes).map_err(io_error(&path))?;
            }
        }
        Ok(())
    }

    /// Appends a document without credential checks, assigning an id when it
    /// has none. Used to seed content.
    pub fn insert(&self, collection: &str, mut document: Record) -> Record {
        if document.opt_text("id").is_none() {
            let id = document.opt_text("_id").unwrap_or_else(new_id);
            document.set("id", id);
        }
        write_lock(&self.collections)
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        document
    }

    /// Names of the collections holding at least one document.
    #[must_use]
    pub fn collections(&self) -> Vec<String> {
        read_lock(&self.collections).keys().cloned().collect()
    }

    /// Bytes of an uploaded file, by its public URL.
    #[must_use]
    pub fn upload(&self, url: &str) -> Option<Vec<u8>> {
        read_lock(&self.uploads).get(url).cloned()
    }

    /// Makes every later call fail with a transport error until cleared.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Invalidates the current admin token, as a server-side expiry would.
    pub fn expire_session(&self) {
        *write_lock(&self.token) = None;
    }

    fn reachable(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("content store is offline".into()));
        }
        Ok(())
    }

    fn authorize(&self) -> Result<(), GatewayError> {
        self.reachable()?;
        if self.credentials.is_some() && read_lock(&self.token).is_none() {
            return Err(GatewayError::Unauthorized(401));
        }
        Ok(())
    }
}

impl ContentGateway for MemoryGateway {
    fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Record>, GatewayError> {
        if collection == SUBMISSIONS {
            self.authorize()?;
        } else {
            self.reachable()?;
        }
        let store = read_lock(&self.collections);
        let matching = store
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|r| query.matches(r))
            .cloned();
        Ok(match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<Record>, GatewayError> {
        self.reachable()?;
        Ok(read_lock(&self.collections)
            .get(collection)
            .and_then(|records| records.iter().find(|r| has_key(r, key)))
            .cloned())
    }

    fn create(&self, collection: &str, document: Record) -> Result<Record, GatewayError> {
        self.authorize()?;
        if let Some(id) = document.opt_text("id") {
            let exists = read_lock(&self.collections)
                .get(collection)
                .is_some_and(|records| records.iter().any(|r| r.text("id") == id));
            if exists {
                return Err(GatewayError::Status {
                    code: 409,
                    body: format!("{collection}/{id} already exists"),
                });
            }
        }
        let stored = self.insert(collection, document);
        debug!(collection, id = %stored.text("id"), "created document");
        Ok(stored)
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        mut document: Record,
    ) -> Result<Record, GatewayError> {
        self.authorize()?;
        document.set("id", id);
        let mut store = write_lock(&self.collections);
        let slot = store
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| r.text("id") == id))
            .ok_or_else(|| GatewayError::not_found(collection, id))?;
        *slot = document.clone();
        debug!(collection, id, "updated document");
        Ok(document)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        self.authorize()?;
        let mut store = write_lock(&self.collections);
        let records = store
            .get_mut(collection)
            .ok_or_else(|| GatewayError::not_found(collection, id))?;
        let before = records.len();
        records.retain(|r| r.text("id") != id);
        if records.len() == before {
            return Err(GatewayError::not_found(collection, id));
        }
        debug!(collection, id, "deleted document");
        Ok(())
    }

    fn submit_form(
        &self,
        slug: &str,
        payload: &BTreeMap<String, String>,
    ) -> Result<Record, GatewayError> {
        self.reachable()?;
        let form = self
            .get(FORMS, slug)?
            .ok_or_else(|| GatewayError::not_found(FORMS, slug))?;
        let submission = Submission {
            id: new_id(),
            form_id: form.opt_text("id").unwrap_or_else(|| slug.to_string()),
            payload: payload.clone(),
            created_at: Utc::now(),
        };
        Ok(self.insert(SUBMISSIONS, submission.to_record()))
    }

    fn upload_media(&self, filename: &str, bytes: &[u8]) -> Result<MediaAsset, GatewayError> {
        self.authorize()?;
        let id = new_id();
        let url = format!("/{UPLOADS_DIR}/{id}-{filename}");
        let asset = MediaAsset {
            id,
            filename: filename.to_string(),
            url: url.clone(),
            content_type: content_type_for(filename).to_string(),
            size: bytes.len() as u64,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&asset).map_err(|e| GatewayError::Decode(e.to_string()))?;
        self.insert(MEDIA, Record::from_value(value)?);
        write_lock(&self.uploads).insert(url, bytes.to_vec());
        Ok(asset)
    }
}

impl Authenticator for MemoryGateway {
    fn login(&self, username: &str, password: &str) -> Result<String, GatewayError> {
        self.reachable()?;
        match &self.credentials {
            Some((user, pass)) if user != username || pass != password => {
                Err(GatewayError::Unauthorized(401))
            }
            _ => {
                let token = new_id();
                *write_lock(&self.token) = Some(token.clone());
                Ok(token)
            }
        }
    }

    fn logout(&self) {
        *write_lock(&self.token) = None;
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GatewayError {
    let path = path.to_path_buf();
    move |source| GatewayError::Io { path, source }
}

fn has_key(record: &Record, key: &str) -> bool {
    record.text("id") == key || record.text("slug") == key
}

fn new_id() -> String {
    ulid::Ulid::new().to_string().to_ascii_lowercase()
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::PAGES;

    fn record(value: Value) -> Record {
        Record::from(value.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn get_finds_by_slug_or_id() -> Result<(), GatewayError> {
        let store = MemoryGateway::new();
        let stored = store.insert(PAGES, record(json!({"slug": "about"})));
        let id = stored.text("id");
        assert!(store.get(PAGES, "about")?.is_some());
        assert!(store.get(PAGES, &id)?.is_some());
        assert!(store.get(PAGES, "missing")?.is_none());
        Ok(())
    }

    #[test]
    fn list_applies_filters_and_limit() -> Result<(), GatewayError> {
        let store = MemoryGateway::new();
        for (slug, category) in [("a", "x"), ("b", "y"), ("c", "x"), ("d", "x")] {
            store.insert("cases", record(json!({"slug": slug, "category": category})));
        }
        let query = ListQuery::new().filter("category", "x").limit(2);
        let slugs: Vec<String> = store
            .list("cases", &query)?
            .iter()
            .map(|r| r.text("slug"))
            .collect();
        assert_eq!(slugs, ["a", "c"]);
        Ok(())
    }

    #[test]
    fn admin_calls_need_a_login_when_credentials_are_set() -> Result<(), GatewayError> {
        let store = MemoryGateway::new().with_credentials("admin", "secret");
        let err = store.create(PAGES, Record::new()).err();
        assert!(err.is_some_and(|e| e.is_auth_failure()));
        assert!(store.login("admin", "wrong").is_err());
        store.login("admin", "secret")?;
        store.create(PAGES, Record::new())?;
        store.expire_session();
        let err = store.delete(PAGES, "any").err();
        assert!(err.is_some_and(|e| e.is_auth_failure()));
        Ok(())
    }

    #[test]
    fn offline_store_fails_with_transport_error() {
        let store = MemoryGateway::new();
        store.set_offline(true);
        let err = store.list(PAGES, &ListQuery::new()).err();
        assert!(matches!(err, Some(GatewayError::Transport(_))));
    }

    #[test]
    fn update_of_missing_document_is_not_found() {
        let store = MemoryGateway::new();
        let err = store.update(PAGES, "nope", Record::new()).err();
        assert!(err.is_some_and(|e| e.is_not_found()));
    }

    #[test]
    fn submission_references_the_form_id() -> Result<(), GatewayError> {
        let store = MemoryGateway::new();
        store.insert(FORMS, record(json!({"id": "f1", "slug": "contact"})));
        let payload = BTreeMap::from([("name".to_string(), "Анна".to_string())]);
        let stored = store.submit_form("contact", &payload)?;
        assert_eq!(stored.text("form_id"), "f1");
        assert_eq!(store.list(SUBMISSIONS, &ListQuery::new())?.len(), 1);
        assert!(store.submit_form("missing", &payload).is_err());
        Ok(())
    }

    #[test]
    fn directory_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = MemoryGateway::new();
        store.insert(PAGES, record(json!({"id": "p1", "slug": "home"})));
        let asset = store.upload_media("logo.png", b"png-bytes")?;
        store.save_dir(dir.path())?;

        let loaded = MemoryGateway::load_dir(dir.path())?;
        assert_eq!(loaded.get(PAGES, "home")?.map(|r| r.text("id")), Some("p1".into()));
        assert_eq!(loaded.upload(&asset.url), Some(b"png-bytes".to_vec()));
        assert_eq!(loaded.list(MEDIA, &ListQuery::new())?.len(), 1);
        Ok(())
    }
}
