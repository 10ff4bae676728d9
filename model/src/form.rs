//! Custom forms and the submissions posted to them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::ModelError;
use crate::lang::{Lang, LocalizedText};
use crate::record::{record_serde, Document, Record};

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-line free text.
    #[default]
    Text,
    /// E-mail address.
    Email,
    /// Phone number.
    Tel,
    /// Multi-line free text.
    Textarea,
    /// One choice out of the field's options.
    Select,
}

impl FieldKind {
    /// Every field kind, in the order the form editor offers them.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Tel,
        FieldKind::Textarea,
        FieldKind::Select,
    ];

    /// Wire value of the field's `type`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
            FieldKind::Textarea => "textarea",
            FieldKind::Select => "select",
        }
    }

    /// Reads a field `type`. Unrecognized kinds are plain text inputs.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        FieldKind::ALL
            .into_iter()
            .find(|k| k.as_str() == value)
            .unwrap_or_default()
    }
}

/// One input of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormField {
    /// Key of the field's value in a submission payload.
    pub id: String,
    /// Input kind.
    pub kind: FieldKind,
    /// Field label.
    pub label: LocalizedText,
    /// The field must be filled before submitting.
    pub required: bool,
    /// Choices of a select field, default language.
    pub options: Vec<String>,
    /// Choices of a select field, secondary language.
    pub options_en: Vec<String>,
}

impl FormField {
    /// Choices shown for `lang`, replaced as a whole by the secondary list
    /// when that list is non-empty.
    #[must_use]
    pub fn options_for(&self, lang: Lang) -> &[String] {
        if lang == Lang::En && !self.options_en.is_empty() {
            &self.options_en
        } else {
            &self.options
        }
    }
}

/// A form definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    /// Gateway identifier; `None` until the form is first saved.
    pub id: Option<String>,
    /// Slug that form blocks reference.
    pub slug: String,
    /// Form heading.
    pub title: LocalizedText,
    /// Confirmation shown after a successful submission.
    pub submit_message: LocalizedText,
    /// Fields in display order.
    pub fields: Vec<FormField>,
}

impl Form {
    /// Finds a field by id.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// A stored form submission. Submissions are never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Gateway identifier.
    pub id: String,
    /// Identifier of the submitted form.
    pub form_id: String,
    /// Submitted values keyed by field id.
    pub payload: BTreeMap<String, String>,
    /// Time the submission was received.
    pub created_at: DateTime<Utc>,
}

impl Document for FormField {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        r.set("id", self.id.as_str());
        r.set("type", self.kind.as_str());
        r.put_localized("label", &self.label);
        r.set("required", self.required);
        r.put_strings("options", &self.options);
        r.put_strings("options_en", &self.options_en);
        r
    }

    fn from_record(r: &Record) -> Result<Self, ModelError> {
        Ok(FormField {
            id: r.text("id"),
            kind: FieldKind::parse(&r.text("type")),
            label: r.localized("label"),
            required: r.flag("required"),
            options: r.strings("options"),
            options_en: r.strings("options_en"),
        })
    }
}

impl Document for Form {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        if let Some(id) = &self.id {
            r.set("id", id.as_str());
        }
        r.set("slug", self.slug.as_str());
        r.put_localized("title", &self.title);
        r.put_localized("submit_message", &self.submit_message);
        r.put_records("fields", self.fields.iter().map(Document::to_record).collect());
        r
    }

    fn from_record(r: &Record) -> Result<Self, ModelError> {
        Ok(Form {
            id: r.opt_text("id").or_else(|| r.opt_text("_id")),
            slug: r.text("slug"),
            title: r.localized("title"),
            submit_message: r.localized("submit_message"),
            fields: r
                .records("fields")
                .iter()
                .map(FormField::from_record)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl Document for Submission {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        r.set("id", self.id.as_str());
        r.set("form_id", self.form_id.as_str());
        let payload: serde_json::Map<String, serde_json::Value> = self
            .payload
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        r.set("payload", payload);
        r.set("created_at", self.created_at.to_rfc3339());
        r
    }

    /// Payload values of any scalar kind are read as text.
    fn from_record(r: &Record) -> Result<Self, ModelError> {
        let payload = r.record("payload").unwrap_or_default();
        let created_at = match r.opt_text("created_at") {
            Some(stamp) => DateTime::parse_from_rfc3339(&stamp)
                .map_err(|e| ModelError::invalid("created_at", e.to_string()))?
                .with_timezone(&Utc),
            None => DateTime::<Utc>::default(),
        };
        Ok(Submission {
            id: r.opt_text("id").or_else(|| r.opt_text("_id")).unwrap_or_default(),
            form_id: r.text("form_id"),
            payload: payload
                .as_map()
                .keys()
                .map(|key| (key.clone(), payload.text(key)))
                .collect(),
            created_at,
        })
    }
}

record_serde!(FormField, Form, Submission);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_kind_is_text() {
        assert_eq!(FieldKind::parse("date"), FieldKind::Text);
        assert_eq!(FieldKind::parse("tel"), FieldKind::Tel);
    }

    #[test]
    fn options_fall_back_as_a_whole() {
        let field = FormField {
            kind: FieldKind::Select,
            options: vec!["Да".into(), "Нет".into()],
            ..FormField::default()
        };
        assert_eq!(field.options_for(Lang::En).len(), 2);
    }

    #[test]
    fn submission_reads_scalar_payload() -> Result<(), ModelError> {
        let submission = Submission::from_value(json!({
            "id": "s1",
            "form_id": "f1",
            "payload": {"name": "Анна", "seats": 3},
            "created_at": "2024-05-01T10:00:00+00:00"
        }))?;
        assert_eq!(submission.payload.get("seats").map(String::as_str), Some("3"));
        assert_eq!(submission.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        Ok(())
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let result = Submission::from_value(json!({"created_at": "yesterday"}));
        assert!(matches!(result, Err(ModelError::InvalidField { .. })));
    }
}
