//! Fixed interface text, one entry per language.

use folio_model::Lang;

/// A piece of interface text that is not content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Card link to the item's page.
    LearnMore,
    /// Form submit button.
    Submit,
    /// Empty first option of a select field.
    SelectPrompt,
}

impl Label {
    /// The text of this label in `lang`.
    #[must_use]
    pub fn text(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Label::LearnMore, Lang::Ru) => "Подробнее",
            (Label::LearnMore, Lang::En) => "Learn more",
            (Label::Submit, Lang::Ru) => "Отправить",
            (Label::Submit, Lang::En) => "Submit",
            (Label::SelectPrompt, Lang::Ru) => "Выберите...",
            (Label::SelectPrompt, Lang::En) => "Select...",
        }
    }
}
