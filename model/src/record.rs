//! JSON object records and the document codec built on them.
//!
//! Every document the content gateway stores is a JSON object. [`Record`]
//! wraps one and reads it leniently: absent or `null` fields read as empty,
//! numbers read as text where text is expected, numeric strings read as
//! numbers. Bilingual fields follow the `field` / `field_en` convention and
//! are resolved with [`Record::resolve`].
//!
//! Typed documents implement [`Document`]; `record_serde!` derives their
//! `Serialize` / `Deserialize` impls from it so they travel as plain JSON.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{json_kind, ModelError};
use crate::lang::{Lang, LocalizedText};

/// A JSON object with lenient typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotAnObject`] for any other JSON kind.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ModelError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Unwraps into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Borrows the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns true when the field exists and is not `null`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        !matches!(self.fields.get(key), None | Some(Value::Null))
    }

    /// Reads a field as text. Absent, `null` and structured values read as
    /// empty; numbers and booleans are rendered to text.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(value) => scalar_text(value),
            None => String::new(),
        }
    }

    /// Reads a field as text, `None` when it is empty.
    #[must_use]
    pub fn opt_text(&self, key: &str) -> Option<String> {
        let text = self.text(key);
        (!text.is_empty()).then_some(text)
    }

    /// Reads a field as a flag using JSON truthiness.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty() && s != "false" && s != "0",
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
            Some(Value::Null) | None => false,
        }
    }

    /// Reads a field as a number. Numeric strings are accepted.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Reads a field as a list of strings. Non-array values read as empty;
    /// `null` entries are skipped and scalar entries are rendered to text.
    #[must_use]
    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|v| !v.is_null())
                .map(scalar_text)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Reads a field as a list of records. Non-object entries are skipped.
    #[must_use]
    pub fn records(&self, key: &str) -> Vec<Record> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(Record { fields: map.clone() }),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Reads a nested object field.
    #[must_use]
    pub fn record(&self, key: &str) -> Option<Record> {
        match self.fields.get(key) {
            Some(Value::Object(map)) => Some(Record { fields: map.clone() }),
            _ => None,
        }
    }

    /// Reads the `key` / `key_en` pair as a [`LocalizedText`].
    #[must_use]
    pub fn localized(&self, key: &str) -> LocalizedText {
        let mut text = LocalizedText::new(self.text(key));
        for lang in Lang::ALL.into_iter().filter(|l| !l.is_default()) {
            let sibling = lang.field_name(key);
            if self.contains(&sibling) {
                text.set(lang, self.text(&sibling));
            }
        }
        text
    }

    /// Resolves a bilingual field for `lang`.
    ///
    /// For the secondary language the `_en` sibling wins when it is present
    /// and non-empty; otherwise the base field is returned, empty when absent.
    /// Each field resolves on its own, so a record may be partly translated.
    #[must_use]
    pub fn resolve(&self, key: &str, lang: Lang) -> String {
        if !lang.is_default() {
            let sibling = self.text(&lang.field_name(key));
            if !sibling.is_empty() {
                return sibling;
            }
        }
        self.text(key)
    }

    /// Resolves the first of `keys` that is non-empty for `lang`.
    #[must_use]
    pub fn resolve_first(&self, keys: &[&str], lang: Lang) -> String {
        keys.iter()
            .map(|key| self.resolve(key, lang))
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// Sets a field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Writes a [`LocalizedText`] as its `key` / `key_en` pair.
    pub fn put_localized(&mut self, key: &str, text: &LocalizedText) {
        for lang in Lang::ALL {
            self.set(lang.field_name(key), text.get(lang));
        }
    }

    /// Writes a list of strings.
    pub fn put_strings(&mut self, key: &str, items: &[String]) {
        self.set(
            key,
            Value::Array(items.iter().cloned().map(Value::String).collect()),
        );
    }

    /// Writes a list of records.
    pub fn put_records(&mut self, key: &str, items: Vec<Record>) {
        self.set(
            key,
            Value::Array(items.into_iter().map(Record::into_value).collect()),
        );
    }

    /// Removes a field, returning its old value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            fields: Map::deserialize(deserializer)?,
        })
    }
}

/// Renders a scalar JSON value as text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// A typed document that travels as a JSON record.
pub trait Document: Sized {
    /// Encodes the document.
    fn to_record(&self) -> Record;

    /// Decodes a document.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] when a field holds a value of the wrong shape.
    fn from_record(record: &Record) -> Result<Self, ModelError>;

    /// Encodes the document as a JSON value.
    fn to_value(&self) -> Value {
        self.to_record().into_value()
    }

    /// Decodes a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] when the value is not an object or a field is
    /// malformed.
    fn from_value(value: Value) -> Result<Self, ModelError> {
        Self::from_record(&Record::from_value(value)?)
    }
}

/// Implements `Serialize` / `Deserialize` for [`Document`] types.
macro_rules! record_serde {
    ($($ty:ty),* $(,)?) => {$(
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(
                    &$crate::record::Document::to_record(self),
                    serializer,
                )
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let record = <$crate::record::Record as serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::record::Document>::from_record(&record)
                    .map_err(serde::de::Error::custom)
            }
        }
    )*};
}

pub(crate) use record_serde;
