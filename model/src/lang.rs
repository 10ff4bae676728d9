//! Site languages and bilingual text values.
//!
//! The site is published in a default language (`ru`) and one secondary
//! language (`en`). On the wire every user-facing text is a pair of fields,
//! `field` for the default language and `field_en` for the secondary one.
//! In Rust the pair is a [`LocalizedText`], and the fallback rule is
//! [`LocalizedText::resolve`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A language the site is published in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// The default language. Base fields hold its text.
    #[default]
    Ru,
    /// The secondary language, stored in `_en` sibling fields.
    En,
}

impl Lang {
    /// All languages, default first.
    pub const ALL: [Lang; 2] = [Lang::Ru, Lang::En];

    /// Returns the language tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }

    /// Returns true for the default language.
    #[must_use]
    pub fn is_default(self) -> bool {
        self == Lang::Ru
    }

    /// Suffix that addresses this language's sibling of a base field.
    #[must_use]
    pub fn field_suffix(self) -> &'static str {
        match self {
            Lang::Ru => "",
            Lang::En => "_en",
        }
    }

    /// Wire name of `base` for this language (`title` / `title_en`).
    #[must_use]
    pub fn field_name(self, base: &str) -> String {
        format!("{base}{}", self.field_suffix())
    }

    /// The language the switcher offers from this one.
    #[must_use]
    pub fn other(self) -> Lang {
        match self {
            Lang::Ru => Lang::En,
            Lang::En => Lang::Ru,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lang {
    type Err = ModelError;

    /// Accepts bare tags and region-qualified ones (`en-US`, `ru_RU`).
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ru" => Ok(Lang::Ru),
            "en" => Ok(Lang::En),
            _ => Err(ModelError::UnknownLang(tag.to_string())),
        }
    }
}

/// A user-facing text with one value per language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText {
    values: BTreeMap<Lang, String>,
}

impl LocalizedText {
    /// Creates a text holding only the default-language value.
    pub fn new(base: impl Into<String>) -> Self {
        let mut text = Self::default();
        text.set(Lang::Ru, base);
        text
    }

    /// Builder form of [`LocalizedText::set`].
    #[must_use]
    pub fn with(mut self, lang: Lang, text: impl Into<String>) -> Self {
        self.set(lang, text);
        self
    }

    /// Sets the value for one language. An empty text clears it.
    pub fn set(&mut self, lang: Lang, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.values.remove(&lang);
        } else {
            self.values.insert(lang, text);
        }
    }

    /// Returns the stored value for `lang`, without fallback.
    #[must_use]
    pub fn get(&self, lang: Lang) -> &str {
        self.values.get(&lang).map(String::as_str).unwrap_or("")
    }

    /// Returns the default-language value.
    #[must_use]
    pub fn base(&self) -> &str {
        self.get(Lang::Ru)
    }

    /// Resolves the text for `lang`.
    ///
    /// A secondary-language request returns that language's value when it is
    /// present and non-empty; every other case returns the default-language
    /// value, which is empty when absent.
    #[must_use]
    pub fn resolve(&self, lang: Lang) -> &str {
        if !lang.is_default() {
            if let Some(text) = self.values.get(&lang) {
                if !text.is_empty() {
                    return text;
                }
            }
        }
        self.base()
    }

    /// Returns true when no language has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<&str> for LocalizedText {
    fn from(base: &str) -> Self {
        Self::new(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secondary_falls_back_to_base() {
        let text = LocalizedText::new("A").with(Lang::En, "");
        assert_eq!(text.resolve(Lang::En), "A");
        assert_eq!(text.resolve(Lang::Ru), "A");
    }

    #[test]
    fn secondary_wins_when_present() {
        let text = LocalizedText::new("Привет").with(Lang::En, "Hello");
        assert_eq!(text.resolve(Lang::En), "Hello");
        assert_eq!(text.resolve(Lang::Ru), "Привет");
    }

    #[test]
    fn absent_everything_resolves_empty() {
        let text = LocalizedText::default();
        assert_eq!(text.resolve(Lang::En), "");
        assert!(text.is_empty());
    }

    #[test]
    fn parses_region_tags() {
        assert_eq!("en-US".parse::<Lang>(), Ok(Lang::En));
        assert_eq!("RU".parse::<Lang>(), Ok(Lang::Ru));
        assert!("de".parse::<Lang>().is_err());
    }

    #[test]
    fn field_names_follow_suffix_convention() {
        assert_eq!(Lang::Ru.field_name("title"), "title");
        assert_eq!(Lang::En.field_name("title"), "title_en");
    }
}
