//! Blocking client of the REST content API.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use folio_model::media::content_type_for;
use folio_model::{MediaAsset, Record};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::{Authenticator, ContentGateway, GatewayError, ListQuery};

const TIMEOUT: Duration = Duration::from_secs(30);

/// Request body of a call.
enum Body<'a> {
    Empty,
    Json(Value),
    Bytes(&'a [u8], &'a str),
}

/// A [`ContentGateway`] over HTTP.
///
/// The bearer token, once set or obtained through [`Authenticator::login`],
/// is attached to every request.
#[derive(Debug)]
pub struct HttpGateway {
    base_url: String,
    agent: ureq::Agent,
    token: RwLock<Option<String>>,
}

impl HttpGateway {
    /// Creates a client for the API rooted at `base_url`
    /// (for example `https://example.org/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
            token: RwLock::new(None),
        }
    }

    /// Uses an existing bearer token.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    /// Replaces the bearer token.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// The current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The API root joined with `segments`, each percent-encoded so that a
    /// slug or id holding `/`, `?` or `#` stays one segment.
    fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let invalid = || GatewayError::Transport(format!("invalid API URL `{}`", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Performs one request and returns the raw response body.
    fn send(
        &self,
        method: &str,
        path: &[&str],
        query: &[(&str, String)],
        body: Body<'_>,
    ) -> Result<String, GatewayError> {
        let url = self.url(path)?;
        debug!(method, url = %url, "content API request");
        let mut request = self.agent.request_url(method, &url);
        if let Some(token) = self.token() {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        for (key, value) in query {
            request = request.query(key, value);
        }
        let result = match body {
            Body::Empty => request.call(),
            Body::Json(value) => request.send_json(value),
            Body::Bytes(bytes, content_type) => {
                request.set("Content-Type", content_type).send_bytes(bytes)
            }
        };
        match result {
            Ok(response) => response
                .into_string()
                .map_err(|e| GatewayError::Decode(e.to_string())),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                warn!(method, url = %url, code, "content API rejected request");
                Err(GatewayError::from_status(code, body))
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(method, url = %url, error = %transport, "content API unreachable");
                Err(GatewayError::Transport(transport.to_string()))
            }
        }
    }

    fn send_json(
        &self,
        method: &str,
        path: &[&str],
        query: &[(&str, String)],
        body: Body<'_>,
    ) -> Result<Value, GatewayError> {
        let text = self.send(method, path, query, body)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Reads a stored document from a write response, keeping what was sent when
/// the API answers with no document.
fn stored_or(sent: Record, response: Value) -> Result<Record, GatewayError> {
    match response {
        Value::Object(_) => Ok(Record::from_value(response)?),
        _ => Ok(sent),
    }
}

impl ContentGateway for HttpGateway {
    fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Record>, GatewayError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(lang) = query.lang {
            params.push(("lang", lang.as_str().to_string()));
        }
        for (key, value) in &query.filters {
            params.push((key.as_str(), value.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        let records = match self.send_json("GET", &[collection], &params, Body::Empty)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .map(Record::from_value)
                .collect::<Result<Vec<_>, _>>()?,
            Value::Null => Vec::new(),
            single @ Value::Object(_) => vec![Record::from_value(single)?],
            other => {
                return Err(GatewayError::Decode(format!(
                    "expected a list of documents, got {other}"
                )))
            }
        };
        // The API may ignore `limit` or filters; apply them again locally.
        let matching = records.into_iter().filter(|r| query.matches(r));
        Ok(match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<Record>, GatewayError> {
        match self.send_json("GET", &[collection, key], &[], Body::Empty) {
            Ok(value @ Value::Object(_)) => Ok(Some(Record::from_value(value)?)),
            Ok(_) => Ok(None),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn create(&self, collection: &str, document: Record) -> Result<Record, GatewayError> {
        let body = Body::Json(document.clone().into_value());
        let response = self.send_json("POST", &["admin", collection], &[], body)?;
        stored_or(document, response)
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        document: Record,
    ) -> Result<Record, GatewayError> {
        let body = Body::Json(document.clone().into_value());
        let response = self.send_json("PUT", &["admin", collection, id], &[], body)?;
        stored_or(document, response)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        self.send("DELETE", &["admin", collection, id], &[], Body::Empty)?;
        Ok(())
    }

    fn submit_form(
        &self,
        slug: &str,
        payload: &BTreeMap<String, String>,
    ) -> Result<Record, GatewayError> {
        let body = Body::Json(json!(payload));
        let response = self.send_json("POST", &["forms", slug, "submit"], &[], body)?;
        let mut sent = Record::new();
        sent.set("payload", json!(payload));
        stored_or(sent, response)
    }

    fn upload_media(&self, filename: &str, bytes: &[u8]) -> Result<MediaAsset, GatewayError> {
        let body = Body::Bytes(bytes, content_type_for(filename));
        let query = [("filename", filename.to_string())];
        let response = self.send_json("POST", &["admin", "media", "upload"], &query, body)?;
        serde_json::from_value(response).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

impl Authenticator for HttpGateway {
    fn login(&self, username: &str, password: &str) -> Result<String, GatewayError> {
        let body = Body::Json(json!({"username": username, "password": password}));
        let response = self.send_json("POST", &["auth", "login"], &[], body)?;
        let response = Record::from_value(response)?;
        let token = response
            .opt_text("token")
            .or_else(|| response.opt_text("access_token"))
            .ok_or_else(|| GatewayError::Decode("login response carries no token".into()))?;
        self.set_token(Some(token.clone()));
        Ok(token)
    }

    fn logout(&self) {
        self.set_token(None);
    }
}
