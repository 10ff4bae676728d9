//! Editing surfaces: which fields each block type exposes and how they are
//! entered.
//!
//! A surface lists exactly the fields the renderer reads for the type, under
//! their wire names. Localized fields are named by their base (`title`); the
//! edit chooses the language. `id` and `type` never appear.

use folio_model::BlockType;

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// One line of text, the same in every language.
    Text,
    /// A link or media URL.
    Url,
    /// One line of text per language.
    Localized,
    /// Several lines of text per language.
    LocalizedMultiline,
    /// On or off.
    Toggle,
    /// A whole, non-negative number.
    Number,
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
    /// An ordered list of strings.
    StringList,
    /// An ordered list of sub-items, each with its own fields.
    Items(&'static [FieldSpec]),
    /// Animated background tuning keys.
    Tuning,
}

impl InputKind {
    /// Short name used in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Url => "url",
            InputKind::Localized => "localized",
            InputKind::LocalizedMultiline => "localized multiline",
            InputKind::Toggle => "toggle",
            InputKind::Number => "number",
            InputKind::Choice(_) => "choice",
            InputKind::StringList => "list",
            InputKind::Items(_) => "item list",
            InputKind::Tuning => "tuning",
        }
    }

    /// Returns true for inputs edited as a single text value.
    #[must_use]
    pub fn is_plain_text(self) -> bool {
        matches!(self, InputKind::Text | InputKind::Url | InputKind::Choice(_))
    }

    /// Returns true for inputs that hold one value per language.
    #[must_use]
    pub fn is_localized(self) -> bool {
        matches!(self, InputKind::Localized | InputKind::LocalizedMultiline)
    }
}

/// One editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name (base name for localized fields).
    pub name: &'static str,
    /// Admin label.
    pub label: &'static str,
    /// Input kind.
    pub input: InputKind,
}

const fn field(name: &'static str, label: &'static str, input: InputKind) -> FieldSpec {
    FieldSpec { name, label, input }
}

/// Tuning keys accepted for the animated hero background, with whether each
/// is a flag (`true`) or a number (`false`).
pub const TUNING_KEYS: [(&str, bool); 16] = [
    ("mouseForce", false),
    ("cursorSize", false),
    ("resolution", false),
    ("dt", false),
    ("BFECC", true),
    ("isViscous", true),
    ("viscous", false),
    ("iterationsViscous", false),
    ("iterationsPoisson", false),
    ("isBounce", true),
    ("autoDemo", true),
    ("autoSpeed", false),
    ("autoIntensity", false),
    ("takeoverDuration", false),
    ("autoResumeDelay", false),
    ("autoRampDuration", false),
];

/// Video source values.
pub const VIDEO_SOURCES: &[&str] = &["file", "youtube"];

/// Collection values, empty meaning none chosen.
pub const COLLECTIONS: &[&str] = &[
    "", "services", "cases", "events", "projects", "partners", "articles", "team",
];

/// Fields of a card item.
pub const CARD_ITEM: &[FieldSpec] = &[
    field("title", "Title", InputKind::Localized),
    field("description", "Description", InputKind::LocalizedMultiline),
    field("image_url", "Image", InputKind::Url),
    field("icon_url", "Icon", InputKind::Url),
    field("link", "Link", InputKind::Url),
];

/// Fields of a stat item.
pub const STAT_ITEM: &[FieldSpec] = &[
    field("value", "Value", InputKind::Text),
    field("suffix", "Suffix", InputKind::Text),
    field("label", "Label", InputKind::Localized),
];

/// Fields of a logo item (logo grids and marquees).
pub const LOGO_ITEM: &[FieldSpec] = &[
    field("image_url", "Image", InputKind::Url),
    field("link", "Link", InputKind::Url),
];

const HERO: &[FieldSpec] = &[
    field("title", "Title", InputKind::Localized),
    field("subtitle", "Subtitle", InputKind::LocalizedMultiline),
    field("cta_label", "Button label", InputKind::Localized),
    field("cta_href", "Button link", InputKind::Url),
    field("background_image", "Background image", InputKind::Url),
    field("background_video", "Background video", InputKind::Url),
    field("full_bleed", "Full bleed", InputKind::Toggle),
    field("use_liquid", "Animated background", InputKind::Toggle),
    field("liquid_colors", "Animation colors", InputKind::StringList),
    field("liquid_settings", "Animation tuning", InputKind::Tuning),
];

const TEXT: &[FieldSpec] = &[
    field("heading", "Heading", InputKind::Localized),
    field("body", "Body", InputKind::LocalizedMultiline),
];

const IMAGE: &[FieldSpec] = &[
    field("url", "Image", InputKind::Url),
    field("caption", "Caption", InputKind::Localized),
];

const GALLERY: &[FieldSpec] = &[field("images", "Images", InputKind::StringList)];

const VIDEO: &[FieldSpec] = &[
    field("source", "Source", InputKind::Choice(VIDEO_SOURCES)),
    field("url", "Video", InputKind::Url),
    field("title", "Title", InputKind::Localized),
];

const FORM: &[FieldSpec] = &[field("form_slug", "Form", InputKind::Text)];

const CARDS: &[FieldSpec] = &[
    field("title", "Title", InputKind::Localized),
    field("items", "Cards", InputKind::Items(CARD_ITEM)),
];

const STATS: &[FieldSpec] = &[field("items", "Stats", InputKind::Items(STAT_ITEM))];

const LOGOS: &[FieldSpec] = &[field("items", "Logos", InputKind::Items(LOGO_ITEM))];

const CTA: &[FieldSpec] = &[
    field("title", "Title", InputKind::Localized),
    field("body", "Body", InputKind::LocalizedMultiline),
    field("button_label", "Button label", InputKind::Localized),
    field("button_href", "Button link", InputKind::Url),
    field("background_image", "Background image", InputKind::Url),
];

const LIST: &[FieldSpec] = &[
    field("title", "Title", InputKind::Localized),
    field("items", "Items", InputKind::StringList),
    field("items_en", "Items (EN)", InputKind::StringList),
];

const COLLECTION: &[FieldSpec] = &[
    field("title", "Title", InputKind::Localized),
    field("collection", "Collection", InputKind::Choice(COLLECTIONS)),
    field("limit", "Limit (0 = all)", InputKind::Number),
    field("detail_prefix", "Detail link prefix", InputKind::Text),
];

const HTML: &[FieldSpec] = &[field("html", "HTML", InputKind::LocalizedMultiline)];

const SPACER: &[FieldSpec] = &[field("size", "Height (px)", InputKind::Number)];

/// The editing surface of a block type.
#[must_use]
pub fn fields_for(block_type: BlockType) -> &'static [FieldSpec] {
    match block_type {
        BlockType::Hero => HERO,
        BlockType::Text => TEXT,
        BlockType::Image => IMAGE,
        BlockType::Gallery => GALLERY,
        BlockType::Video => VIDEO,
        BlockType::Form => FORM,
        BlockType::Cards => CARDS,
        BlockType::Stats => STATS,
        BlockType::LogoGrid | BlockType::Marquee => LOGOS,
        BlockType::Cta => CTA,
        BlockType::List => LIST,
        BlockType::Collection => COLLECTION,
        BlockType::Html => HTML,
        BlockType::Spacer => SPACER,
    }
}

/// Looks up a field of a surface by name.
#[must_use]
pub fn find(fields: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
    fields.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use folio_model::{Block, CollectionName, Document, Lang};

    use super::*;

    #[test]
    fn surfaces_cover_every_written_field() {
        for block_type in BlockType::ALL {
            let surface = fields_for(block_type);
            let record = Block::create(block_type).to_record();
            for key in record.as_map().keys().filter(|k| !matches!(k.as_str(), "id" | "type")) {
                let covered = find(surface, key).is_some()
                    || key
                        .strip_suffix(Lang::En.field_suffix())
                        .and_then(|base| find(surface, base))
                        .is_some_and(|f| f.input.is_localized());
                assert!(covered, "{block_type}: `{key}` is not editable");
            }
        }
    }

    #[test]
    fn collection_choices_are_known() {
        for name in COLLECTIONS.iter().filter(|n| !n.is_empty()) {
            assert!(name.parse::<CollectionName>().is_ok(), "{name}");
        }
        assert_eq!(COLLECTIONS.len(), CollectionName::ALL.len() + 1);
    }

    #[test]
    fn tuning_keys_match_settings_wire_names() -> Result<(), serde_json::Error> {
        let resolved = serde_json::to_value(folio_model::ResolvedLiquid::default())?;
        let wire: BTreeSet<&str> = resolved
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        let keys: BTreeSet<&str> = TUNING_KEYS.iter().map(|(k, _)| *k).collect();
        assert_eq!(wire, keys);
        Ok(())
    }
}
