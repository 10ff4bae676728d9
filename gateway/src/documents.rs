//! Typed access to the documents the CMS core works with.

use folio_model::{
    CollectionName, Document, Form, Lang, MediaAsset, Page, Record, SiteSettings, Submission,
};
use tracing::warn;

use crate::{
    ContentGateway, GatewayError, ListQuery, FORMS, MEDIA, PAGES, SETTINGS, SETTINGS_ID,
    SUBMISSIONS,
};

/// Fetches a page by slug or id.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails or the stored page is
/// malformed.
pub fn fetch_page<G: ContentGateway + ?Sized>(
    gateway: &G,
    key: &str,
) -> Result<Option<Page>, GatewayError> {
    decode_opt(gateway.get(PAGES, key)?)
}

/// Lists every page. Pages that do not decode are left out with a warning.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails.
pub fn list_pages<G: ContentGateway + ?Sized>(gateway: &G) -> Result<Vec<Page>, GatewayError> {
    Ok(decode_all(PAGES, gateway.list(PAGES, &ListQuery::new())?))
}

/// Fetches a form by slug or id.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails or the stored form is
/// malformed.
pub fn fetch_form<G: ContentGateway + ?Sized>(
    gateway: &G,
    key: &str,
) -> Result<Option<Form>, GatewayError> {
    decode_opt(gateway.get(FORMS, key)?)
}

/// Lists every form. Forms that do not decode are left out with a warning.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails.
pub fn list_forms<G: ContentGateway + ?Sized>(gateway: &G) -> Result<Vec<Form>, GatewayError> {
    Ok(decode_all(FORMS, gateway.list(FORMS, &ListQuery::new())?))
}

/// Lists submissions, optionally only those of one form.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails (submissions are an admin
/// collection). Malformed submissions are left out with a warning.
pub fn list_submissions<G: ContentGateway + ?Sized>(
    gateway: &G,
    form_id: Option<&str>,
) -> Result<Vec<Submission>, GatewayError> {
    let mut query = ListQuery::new();
    if let Some(form_id) = form_id {
        query = query.filter("form_id", form_id);
    }
    Ok(decode_all(SUBMISSIONS, gateway.list(SUBMISSIONS, &query)?))
}

/// Lists up to `limit` items of a content collection, 0 meaning all.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails.
pub fn list_collection<G: ContentGateway + ?Sized>(
    gateway: &G,
    collection: CollectionName,
    lang: Lang,
    limit: usize,
) -> Result<Vec<Record>, GatewayError> {
    gateway.list(collection.as_str(), &ListQuery::new().lang(lang).limit(limit))
}

/// Lists uploaded media.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails or a record is not a media
/// asset.
pub fn list_media<G: ContentGateway + ?Sized>(
    gateway: &G,
) -> Result<Vec<MediaAsset>, GatewayError> {
    gateway
        .list(MEDIA, &ListQuery::new())?
        .into_iter()
        .map(|r| {
            serde_json::from_value(r.into_value()).map_err(|e| GatewayError::Decode(e.to_string()))
        })
        .collect()
}

/// Reads the site settings. A store without settings, or one that cannot
/// be reached, yields the built-in defaults.
#[must_use]
pub fn fetch_settings<G: ContentGateway + ?Sized>(gateway: &G) -> SiteSettings {
    let stored = gateway
        .get(SETTINGS, SETTINGS_ID)
        .and_then(|found| match found {
            Some(record) => Ok(Some(record)),
            None => Ok(gateway.list(SETTINGS, &ListQuery::new())?.into_iter().next()),
        });
    match stored {
        Ok(Some(record)) => SiteSettings::from_record(&record).unwrap_or_else(|err| {
            warn!(error = %err, "malformed site settings, using defaults");
            SiteSettings::default()
        }),
        Ok(None) => SiteSettings::default(),
        Err(err) => {
            warn!(error = %err, "site settings unavailable, using defaults");
            SiteSettings::default()
        }
    }
}

/// Stores the site settings document.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails.
pub fn save_settings<G: ContentGateway + ?Sized>(
    gateway: &G,
    settings: &SiteSettings,
) -> Result<SiteSettings, GatewayError> {
    let mut record = settings.to_record();
    record.set("id", SETTINGS_ID);
    let stored = match gateway.get(SETTINGS, SETTINGS_ID)? {
        Some(_) => gateway.update(SETTINGS, SETTINGS_ID, record)?,
        None => gateway.create(SETTINGS, record)?,
    };
    Ok(SiteSettings::from_record(&stored)?)
}

/// Creates the document when it has no identifier yet, otherwise updates it.
/// Returns the stored document.
///
/// # Errors
///
/// Returns a [`GatewayError`] when the call fails or the stored document does
/// not decode.
pub fn save_document<G: ContentGateway + ?Sized, D: Document>(
    gateway: &G,
    collection: &str,
    id: Option<&str>,
    document: &D,
) -> Result<D, GatewayError> {
    let record = document.to_record();
    let stored = match id {
        Some(id) => gateway.update(collection, id, record)?,
        None => gateway.create(collection, record)?,
    };
    Ok(D::from_record(&stored)?)
}

fn decode_opt<D: Document>(record: Option<Record>) -> Result<Option<D>, GatewayError> {
    record.map(|r| D::from_record(&r)).transpose().map_err(GatewayError::from)
}

/// Decodes each record on its own so that one malformed document does not
/// hide the rest.
fn decode_all<D: Document>(collection: &str, records: Vec<Record>) -> Vec<D> {
    records
        .iter()
        .filter_map(|r| match D::from_record(r) {
            Ok(document) => Some(document),
            Err(err) => {
                let key = r.opt_text("slug").or_else(|| r.opt_text("id"));
                warn!(collection, key = ?key, error = %err, "skipping malformed document");
                None
            }
        })
        .collect()
}
