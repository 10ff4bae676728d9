//! Form definitions under edit, and reading their submissions.

use folio_gateway::documents::{fetch_form, list_submissions, save_document};
use folio_gateway::{ContentGateway, GatewayError, FORMS};
use folio_model::{FieldKind, Form, FormField, Lang, Submission};
use tracing::{info, warn};

use crate::error::{EditError, SaveError};
use crate::order::{swap_neighbor, Direction};

/// A form being edited. Same save contract as pages.
#[derive(Debug, Clone, PartialEq)]
pub struct FormEditor {
    form: Form,
    dirty: bool,
}

impl FormEditor {
    /// Starts editing a form.
    pub fn new(form: Form) -> Self {
        Self { form, dirty: false }
    }

    /// Starts editing a new, unsaved form.
    pub fn create(slug: impl Into<String>) -> Self {
        Self {
            form: Form {
                slug: slug.into(),
                ..Form::default()
            },
            dirty: true,
        }
    }

    /// Loads a form by slug or id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the fetch fails or the stored form is
    /// malformed.
    pub fn open<G: ContentGateway + ?Sized>(
        gateway: &G,
        key: &str,
    ) -> Result<Option<Self>, GatewayError> {
        Ok(fetch_form(gateway, key)?.map(Self::new))
    }

    /// The form in its current edited state.
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Returns true when there are edits not yet saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Sets the form title for one language.
    pub fn set_title(&mut self, lang: Lang, title: impl Into<String>) {
        self.form.title.set(lang, title);
        self.dirty = true;
    }

    /// Sets the confirmation message for one language.
    pub fn set_submit_message(&mut self, lang: Lang, message: impl Into<String>) {
        self.form.submit_message.set(lang, message);
        self.dirty = true;
    }

    /// Sets the URL slug.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.form.slug = slug.into();
        self.dirty = true;
    }

    /// Appends a field of the given kind with empty labels and a fresh id.
    /// Returns the id.
    pub fn add_field(&mut self, kind: FieldKind) -> String {
        let mut id = new_field_id();
        while self.form.field(&id).is_some() {
            id = new_field_id();
        }
        self.form.fields.push(FormField {
            id: id.clone(),
            kind,
            ..FormField::default()
        });
        self.dirty = true;
        id
    }

    /// Removes a field. Returns it, or `None` when there is no such field.
    pub fn remove_field(&mut self, id: &str) -> Option<FormField> {
        let index = self.position(id)?;
        self.dirty = true;
        Some(self.form.fields.remove(index))
    }

    /// Swaps a field with its neighbor. Returns false when the field is
    /// absent or already at that edge.
    pub fn move_field(&mut self, id: &str, direction: Direction) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let moved = swap_neighbor(&mut self.form.fields, index, direction).is_some();
        self.dirty |= moved;
        moved
    }

    /// Sets a field's label for one language.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::FieldNotFound`] for an unknown field.
    pub fn set_label(
        &mut self,
        id: &str,
        lang: Lang,
        label: impl Into<String>,
    ) -> Result<(), EditError> {
        self.field_mut(id)?.label.set(lang, label);
        Ok(())
    }

    /// Changes a field's input kind.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::FieldNotFound`] for an unknown field.
    pub fn set_kind(&mut self, id: &str, kind: FieldKind) -> Result<(), EditError> {
        self.field_mut(id)?.kind = kind;
        Ok(())
    }

    /// Marks a field required or optional.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::FieldNotFound`] for an unknown field.
    pub fn set_required(&mut self, id: &str, required: bool) -> Result<(), EditError> {
        self.field_mut(id)?.required = required;
        Ok(())
    }

    /// Replaces a select field's options for one language. The secondary
    /// language list may be left empty to reuse the default one.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::FieldNotFound`] for an unknown field.
    pub fn set_options(
        &mut self,
        id: &str,
        lang: Lang,
        options: Vec<String>,
    ) -> Result<(), EditError> {
        let field = self.field_mut(id)?;
        if lang.is_default() {
            field.options = options;
        } else {
            field.options_en = options;
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.form.fields.iter().position(|f| f.id == id)
    }

    fn field_mut(&mut self, id: &str) -> Result<&mut FormField, EditError> {
        let index = self
            .position(id)
            .ok_or_else(|| EditError::FieldNotFound(id.to_string()))?;
        self.dirty = true;
        Ok(&mut self.form.fields[index])
    }

    /// Stores the form, adopting the stored id on first save.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Gateway`] when the call fails; the in-memory form
    /// is left untouched.
    pub fn save<G: ContentGateway + ?Sized>(&mut self, gateway: &G) -> Result<(), SaveError> {
        let id = self.form.id.clone();
        match save_document(gateway, FORMS, id.as_deref(), &self.form) {
            Ok(mut stored) => {
                if stored.id.is_none() {
                    stored.id = id;
                }
                info!(slug = %stored.slug, "form saved");
                self.form = stored;
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                warn!(slug = %self.form.slug, error = %err, "form save failed");
                Err(err.into())
            }
        }
    }

    /// Deletes the stored form.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::NotSaved`] for a form that was never stored, or
    /// [`SaveError::Gateway`] when the call fails.
    pub fn delete<G: ContentGateway + ?Sized>(&mut self, gateway: &G) -> Result<(), SaveError> {
        let id = self.form.id.clone().ok_or(SaveError::NotSaved)?;
        gateway.delete(FORMS, &id)?;
        self.form.id = None;
        self.dirty = true;
        Ok(())
    }

    /// Lists the submissions received by this form, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::NotSaved`] for an unsaved form, or
    /// [`SaveError::Gateway`] when the call fails (submissions are admin
    /// data).
    pub fn submissions<G: ContentGateway + ?Sized>(
        &self,
        gateway: &G,
    ) -> Result<Vec<Submission>, SaveError> {
        let id = self.form.id.as_deref().ok_or(SaveError::NotSaved)?;
        let mut submissions = list_submissions(gateway, Some(id))?;
        submissions.sort_by_key(|s| s.created_at);
        Ok(submissions)
    }
}

fn new_field_id() -> String {
    format!("field-{}", ulid::Ulid::new().to_string().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use folio_gateway::MemoryGateway;

    use super::*;

    #[test]
    fn fields_are_added_edited_and_ordered() -> Result<(), EditError> {
        let mut editor = FormEditor::create("contact");
        let name = editor.add_field(FieldKind::Text);
        let topic = editor.add_field(FieldKind::Select);
        editor.set_label(&name, Lang::Ru, "Имя")?;
        editor.set_required(&name, true)?;
        editor.set_options(&topic, Lang::Ru, vec!["Инвестиции".into()])?;
        editor.set_options(&topic, Lang::En, vec!["Invest".into()])?;
        assert!(editor.move_field(&topic, Direction::Up));
        assert!(!editor.move_field(&topic, Direction::Up));

        let form = editor.form();
        assert_eq!(form.fields[0].id, topic);
        assert_eq!(form.fields[0].options_for(Lang::En), ["Invest".to_string()]);
        assert!(form.fields[1].required);
        assert!(editor.set_label("nope", Lang::Ru, "x").is_err());
        assert!(editor.remove_field(&name).is_some());
        assert_eq!(editor.form().fields.len(), 1);
        Ok(())
    }

    #[test]
    fn save_then_read_submissions() -> Result<(), SaveError> {
        let store = MemoryGateway::new();
        let mut editor = FormEditor::create("contact");
        let email = editor.add_field(FieldKind::Email);
        editor.set_title(Lang::Ru, "Связь");
        assert!(matches!(editor.submissions(&store), Err(SaveError::NotSaved)));
        editor.save(&store)?;

        let payload = BTreeMap::from([(email, "a@b.co".to_string())]);
        store.submit_form("contact", &payload)?;
        let received = editor.submissions(&store)?;
        assert_eq!(received.len(), 1);
        assert_eq!(Some(&received[0].form_id), editor.form().id.as_ref());
        Ok(())
    }

    #[test]
    fn failed_save_keeps_form() {
        let store = MemoryGateway::new();
        store.set_offline(true);
        let mut editor = FormEditor::create("contact");
        editor.add_field(FieldKind::Tel);
        let before = editor.clone();
        assert!(editor.save(&store).is_err());
        assert_eq!(editor, before);
    }
}
