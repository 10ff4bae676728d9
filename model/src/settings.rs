//! Site-wide settings: name, theme and navigation.
//!
//! Settings are content like any other document, stored in the `settings`
//! collection, and passed explicitly to every render call.

use crate::error::ModelError;
use crate::lang::{Lang, LocalizedText};
use crate::record::{record_serde, Document, Record};

/// Colors and fonts of the public site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Accent color for links, buttons and the current menu item.
    pub primary_color: String,
    /// Page background color.
    pub background_color: String,
    /// Body text color.
    pub text_color: String,
    /// Font family of headings.
    pub heading_font: String,
    /// Font family of body text.
    pub body_font: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#e11d2e".into(),
            background_color: "#09090b".into(),
            text_color: "#ffffff".into(),
            heading_font: "Unbounded".into(),
            body_font: "Manrope".into(),
        }
    }
}

/// A top-level menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Menu label.
    pub label: LocalizedText,
    /// Target path, relative to the language root, or an absolute URL.
    pub href: String,
}

impl NavLink {
    /// Creates a menu entry.
    pub fn new(label: LocalizedText, href: impl Into<String>) -> Self {
        Self {
            label,
            href: href.into(),
        }
    }
}

/// Site-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    /// Site name shown in the header and page titles.
    pub site_name: String,
    /// Line shown next to the site name.
    pub tagline: LocalizedText,
    /// Colors and fonts.
    pub theme: Theme,
    /// Main menu in display order.
    pub nav: Vec<NavLink>,
    /// Footer text.
    pub footer_text: LocalizedText,
}

impl Default for SiteSettings {
    fn default() -> Self {
        let link = |ru: &str, en: &str, href: &str| {
            NavLink::new(LocalizedText::new(ru).with(Lang::En, en), href)
        };
        Self {
            site_name: "Folio".into(),
            tagline: LocalizedText::default(),
            theme: Theme::default(),
            nav: vec![
                link("Главная", "Home", "/"),
                link("О нас", "About", "/about"),
                link("Услуги", "Services", "/services"),
                link("Инвестиции", "Invest", "/invest"),
                link("Партнёры", "Partners", "/partners"),
                link("События", "Events", "/events"),
                link("Кейсы", "Cases", "/cases"),
                link("Аналитика", "Insights", "/insights"),
            ],
            footer_text: LocalizedText::default(),
        }
    }
}

impl Document for SiteSettings {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        r.set("site_name", self.site_name.as_str());
        r.put_localized("tagline", &self.tagline);
        let mut theme = Record::new();
        theme.set("primary_color", self.theme.primary_color.as_str());
        theme.set("background_color", self.theme.background_color.as_str());
        theme.set("text_color", self.theme.text_color.as_str());
        theme.set("heading_font", self.theme.heading_font.as_str());
        theme.set("body_font", self.theme.body_font.as_str());
        r.set("theme", theme.into_value());
        r.put_records(
            "nav",
            self.nav
                .iter()
                .map(|link| {
                    let mut item = Record::new();
                    item.put_localized("label", &link.label);
                    item.set("href", link.href.as_str());
                    item
                })
                .collect(),
        );
        r.put_localized("footer_text", &self.footer_text);
        r
    }

    /// Missing keys take the built-in defaults; an empty `nav` keeps the
    /// default menu.
    fn from_record(r: &Record) -> Result<Self, ModelError> {
        let defaults = SiteSettings::default();
        let theme = r.record("theme").unwrap_or_default();
        let pick = |key: &str, fallback: &str| {
            theme.opt_text(key).unwrap_or_else(|| fallback.to_string())
        };
        let nav: Vec<NavLink> = r
            .records("nav")
            .iter()
            .map(|item| NavLink::new(item.localized("label"), item.text("href")))
            .filter(|link| !link.href.is_empty())
            .collect();
        Ok(SiteSettings {
            site_name: r.opt_text("site_name").unwrap_or(defaults.site_name),
            tagline: r.localized("tagline"),
            theme: Theme {
                primary_color: pick("primary_color", &defaults.theme.primary_color),
                background_color: pick("background_color", &defaults.theme.background_color),
                text_color: pick("text_color", &defaults.theme.text_color),
                heading_font: pick("heading_font", &defaults.theme.heading_font),
                body_font: pick("body_font", &defaults.theme.body_font),
            },
            nav: if nav.is_empty() { defaults.nav } else { nav },
            footer_text: r.localized("footer_text"),
        })
    }
}

record_serde!(SiteSettings);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn partial_settings_keep_defaults() -> Result<(), ModelError> {
        let settings = SiteSettings::from_value(json!({
            "site_name": "Aichin",
            "theme": {"primary_color": "#123456"}
        }))?;
        assert_eq!(settings.site_name, "Aichin");
        assert_eq!(settings.theme.primary_color, "#123456");
        assert_eq!(settings.theme.body_font, Theme::default().body_font);
        assert_eq!(settings.nav.len(), 8);
        Ok(())
    }

    #[test]
    fn default_menu_is_bilingual() {
        let settings = SiteSettings::default();
        assert_eq!(settings.nav[1].label.resolve(Lang::En), "About");
        assert_eq!(settings.nav[1].label.resolve(Lang::Ru), "О нас");
    }
}
