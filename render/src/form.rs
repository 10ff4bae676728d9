//! Public forms: the markup for a form definition and the submission session
//! that validates, posts and reports back.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use folio_gateway::{ContentGateway, GatewayError};
use folio_model::{FieldKind, Form, FormField, Lang};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::html::escape_html;
use crate::labels::Label;
use crate::RenderContext;

/// Entered values keyed by field id.
pub type Values = BTreeMap<String, String>;

/// Confirmation shown when a form has no submit message of its own.
pub const DEFAULT_SUBMITTED: &str = "Form submitted";

/// Shown when the gateway rejects or cannot receive a submission.
pub const SUBMISSION_FAILED: &str = "Submission failed";

/// Why a submission did not go through.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A required field is blank.
    #[error("field `{0}` is required")]
    MissingRequired(String),
    /// An email field does not look like an address.
    #[error("field `{0}` is not an email address")]
    InvalidEmail(String),
    /// A value was entered for a field the form does not have.
    #[error("form has no field `{0}`")]
    UnknownField(String),
    /// The gateway call failed.
    #[error("submission failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Where a form session stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    /// Accepting input.
    #[default]
    Editing,
    /// The last submission was stored; carries the confirmation message.
    Submitted(String),
    /// The last submission was rejected; carries what to show.
    Failed(String),
}

/// One visitor's interaction with a form.
#[derive(Debug, Clone)]
pub struct FormSession {
    form: Form,
    lang: Lang,
    values: Values,
    status: FormStatus,
}

impl FormSession {
    /// Starts an empty session.
    pub fn new(form: Form, lang: Lang) -> Self {
        Self {
            form,
            lang,
            values: Values::new(),
            status: FormStatus::Editing,
        }
    }

    /// The form being filled in.
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Entered values.
    #[must_use]
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Enters a value.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::UnknownField`] when the form has no such field.
    pub fn set(&mut self, field_id: &str, value: impl Into<String>) -> Result<(), SubmitError> {
        if self.form.field(field_id).is_none() {
            return Err(SubmitError::UnknownField(field_id.to_string()));
        }
        self.values.insert(field_id.to_string(), value.into());
        Ok(())
    }

    /// Checks required and email fields.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails, in declared order.
    pub fn validate(&self) -> Result<(), SubmitError> {
        for field in &self.form.fields {
            let value = self.values.get(&field.id).map_or("", |v| v.trim());
            if value.is_empty() {
                if field.required {
                    return Err(SubmitError::MissingRequired(field.id.clone()));
                }
                continue;
            }
            if field.kind == FieldKind::Email && !looks_like_email(value) {
                return Err(SubmitError::InvalidEmail(field.id.clone()));
            }
        }
        Ok(())
    }

    /// Validates, then posts the values. On success the values are cleared and
    /// the localized confirmation returned; on any failure they are kept.
    ///
    /// # Errors
    ///
    /// Returns a validation error without calling the gateway, or
    /// [`SubmitError::Gateway`] when the post fails.
    pub fn submit<G: ContentGateway + ?Sized>(&mut self, gateway: &G) -> Result<String, SubmitError> {
        if let Err(err) = self.validate() {
            debug!(form = %self.form.slug, error = %err, "submission rejected");
            self.status = FormStatus::Failed(err.to_string());
            return Err(err);
        }
        match gateway.submit_form(&self.form.slug, &self.values) {
            Ok(_) => {
                let message = self.confirmation().to_string();
                self.values.clear();
                self.status = FormStatus::Submitted(message.clone());
                Ok(message)
            }
            Err(err) => {
                warn!(form = %self.form.slug, error = %err, "submission failed");
                self.status = FormStatus::Failed(SUBMISSION_FAILED.to_string());
                Err(err.into())
            }
        }
    }

    /// The localized submit message, or [`DEFAULT_SUBMITTED`].
    #[must_use]
    pub fn confirmation(&self) -> &str {
        let message = self.form.submit_message.resolve(self.lang);
        if message.is_empty() {
            DEFAULT_SUBMITTED
        } else {
            message
        }
    }

    /// Renders the form with the entered values and current status.
    #[must_use]
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        render_form(&self.form, &ctx.in_lang(self.lang), &self.values, Some(&self.status))
    }
}

fn looks_like_email(value: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Renders a form: one labelled input per field in declared order, posting to
/// `{form_action_base}/forms/{slug}/submit`.
#[must_use]
pub fn render_form(
    form: &Form,
    ctx: &RenderContext<'_>,
    values: &Values,
    status: Option<&FormStatus>,
) -> String {
    let action = format!(
        "{}/forms/{}/submit",
        ctx.form_action_base.trim_end_matches('/'),
        form.slug
    );
    let mut html = format!(
        "<form class=\"folio-form\" method=\"post\" action=\"{}\" data-form=\"{}\">\n",
        escape_html(&action),
        escape_html(&form.slug)
    );
    let title = ctx.text(&form.title);
    if !title.is_empty() {
        html.push_str(&format!("<h3>{}</h3>\n", escape_html(title)));
    }
    for field in &form.fields {
        let value = values.get(&field.id).map_or("", String::as_str);
        html.push_str(&render_field(field, value, ctx.lang));
    }
    match status {
        Some(FormStatus::Submitted(message)) => html.push_str(&format!(
            "<p class=\"form-status form-success\" role=\"status\">{}</p>\n",
            escape_html(message)
        )),
        Some(FormStatus::Failed(message)) => html.push_str(&format!(
            "<p class=\"form-status form-error\" role=\"alert\">{}</p>\n",
            escape_html(message)
        )),
        Some(FormStatus::Editing) | None => {}
    }
    html.push_str(&format!(
        "<button type=\"submit\" class=\"button\">{}</button>\n</form>\n",
        Label::Submit.text(ctx.lang)
    ));
    html
}

fn render_field(field: &FormField, value: &str, lang: Lang) -> String {
    let id = escape_html(&field.id);
    let required = if field.required { " required" } else { "" };
    let control = match field.kind {
        FieldKind::Textarea => format!(
            "<textarea id=\"field-{id}\" name=\"{id}\" rows=\"4\"{required}>{}</textarea>",
            escape_html(value)
        ),
        FieldKind::Select => {
            let mut select = format!(
                "<select id=\"field-{id}\" name=\"{id}\"{required}>\n<option value=\"\">{}</option>\n",
                Label::SelectPrompt.text(lang)
            );
            for option in field.options_for(lang) {
                let selected = if option == value { " selected" } else { "" };
                select.push_str(&format!(
                    "<option value=\"{o}\"{selected}>{o}</option>\n",
                    o = escape_html(option)
                ));
            }
            select.push_str("</select>");
            select
        }
        FieldKind::Text | FieldKind::Email | FieldKind::Tel => format!(
            "<input id=\"field-{id}\" name=\"{id}\" type=\"{}\" value=\"{}\"{required}>",
            field.kind.as_str(),
            escape_html(value)
        ),
    };
    format!(
        "<div class=\"form-field\">\n<label for=\"field-{id}\">{}</label>\n{control}\n</div>\n",
        escape_html(field.label.resolve(lang))
    )
}

#[cfg(test)]
mod tests {
    use folio_gateway::MemoryGateway;
    use folio_model::{LocalizedText, SiteSettings};

    use super::*;

    fn contact() -> Form {
        Form {
            id: Some("f-1".into()),
            slug: "contact".into(),
            title: LocalizedText::new("Связаться").with(Lang::En, "Contact"),
            submit_message: LocalizedText::new("Спасибо").with(Lang::En, "Thanks"),
            fields: vec![
                FormField {
                    id: "name".into(),
                    label: LocalizedText::new("Имя"),
                    required: true,
                    ..FormField::default()
                },
                FormField {
                    id: "email".into(),
                    kind: FieldKind::Email,
                    label: LocalizedText::new("Почта"),
                    ..FormField::default()
                },
                FormField {
                    id: "topic".into(),
                    kind: FieldKind::Select,
                    label: LocalizedText::new("Тема"),
                    options: vec!["Инвестиции".into(), "Партнёрство".into()],
                    options_en: vec!["Invest".into()],
                    ..FormField::default()
                },
            ],
        }
    }

    fn store_with_contact() -> MemoryGateway {
        let store = MemoryGateway::new();
        store.insert(folio_gateway::FORMS, folio_model::Document::to_record(&contact()));
        store
    }

    #[test]
    fn blank_required_field_is_rejected_before_posting() {
        let store = store_with_contact();
        store.set_offline(true);
        let mut session = FormSession::new(contact(), Lang::Ru);
        let err = session.submit(&store).err();
        // An offline store would yield a gateway error; validation comes first.
        assert!(matches!(err, Some(SubmitError::MissingRequired(ref f)) if f == "name"));
        assert!(matches!(session.status(), FormStatus::Failed(_)));
    }

    #[test]
    fn malformed_email_is_rejected() -> Result<(), SubmitError> {
        let mut session = FormSession::new(contact(), Lang::Ru);
        session.set("name", "Анна")?;
        session.set("email", "anna at mail")?;
        assert!(matches!(session.validate(), Err(SubmitError::InvalidEmail(_))));
        session.set("email", "anna@mail.ru")?;
        session.validate()
    }

    #[test]
    fn success_clears_values_and_confirms() -> Result<(), SubmitError> {
        let store = store_with_contact();
        let mut session = FormSession::new(contact(), Lang::En);
        session.set("name", "Anna")?;
        assert_eq!(session.submit(&store)?, "Thanks");
        assert!(session.values().is_empty());
        assert_eq!(session.status(), &FormStatus::Submitted("Thanks".into()));
        Ok(())
    }

    #[test]
    fn failure_keeps_values() -> Result<(), SubmitError> {
        let store = store_with_contact();
        let mut session = FormSession::new(contact(), Lang::Ru);
        session.set("name", "Анна")?;
        store.set_offline(true);
        assert!(matches!(session.submit(&store), Err(SubmitError::Gateway(_))));
        assert_eq!(session.values().get("name").map(String::as_str), Some("Анна"));
        assert_eq!(session.status(), &FormStatus::Failed(SUBMISSION_FAILED.into()));
        Ok(())
    }

    #[test]
    fn missing_message_uses_default() {
        let mut form = contact();
        form.submit_message = LocalizedText::default();
        assert_eq!(FormSession::new(form, Lang::En).confirmation(), DEFAULT_SUBMITTED);
    }

    #[test]
    fn unknown_field_is_refused() {
        let mut session = FormSession::new(contact(), Lang::Ru);
        assert!(matches!(session.set("phone", "1"), Err(SubmitError::UnknownField(_))));
    }

    #[test]
    fn markup_follows_field_kinds() -> Result<(), SubmitError> {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::En, &settings, &store);
        let mut session = FormSession::new(contact(), Lang::En);
        session.set("topic", "Invest")?;
        let html = session.render(&ctx);
        assert!(html.contains("<h3>Contact</h3>"));
        assert!(html.contains("name=\"name\" type=\"text\" value=\"\" required>"));
        assert!(html.contains("type=\"email\""));
        assert!(html.contains("<option value=\"\">Select...</option>"));
        assert!(html.contains("<option value=\"Invest\" selected>Invest</option>"));
        assert!(!html.contains("Партнёрство"));
        Ok(())
    }

    #[test]
    fn controls_are_labelled_in_the_page_language() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let html = FormSession::new(contact(), Lang::Ru).render(&ctx);
        assert!(html.contains("<option value=\"\">Выберите...</option>"));
        assert!(html.contains(">Отправить</button>"));
        assert!(!html.contains("Submit"));
    }
}
