//! The closed set of page blocks.
//!
//! A [`Block`] is an identifier plus a [`BlockBody`], one variant per block
//! type. The type tag is fixed once a block exists: bodies can only be
//! replaced by bodies of the same variant ([`Block::with_body`]).
//!
//! Blocks whose stored `type` is outside the closed set decode into
//! [`BlockBody::Unknown`] so that they survive a load/save cycle untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::collection::CollectionName;
use crate::error::ModelError;
use crate::lang::{Lang, LocalizedText};
use crate::liquid::LiquidSettings;
use crate::record::{record_serde, Document, Record};

/// Height of a freshly added spacer, in pixels.
pub const DEFAULT_SPACER_SIZE: u32 = 32;

/// Stable identifier of a block within its page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, unique identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string().to_ascii_lowercase())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The type tag of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockType {
    /// Large heading with optional call to action and background.
    Hero,
    /// Heading and body text.
    Text,
    /// Single image with caption.
    Image,
    /// Grid of images.
    Gallery,
    /// Embedded or directly played video.
    Video,
    /// A custom form, referenced by slug.
    Form,
    /// Grid of cards.
    Cards,
    /// Row of figures.
    Stats,
    /// Static grid of logos.
    LogoGrid,
    /// Call-to-action panel.
    Cta,
    /// Bulleted list.
    List,
    /// Cards listing items of a content collection.
    Collection,
    /// Raw markup.
    Html,
    /// Scrolling strip of logos.
    Marquee,
    /// Vertical whitespace.
    Spacer,
}

impl BlockType {
    /// Every block type, in the order the editor offers them.
    pub const ALL: [BlockType; 15] = [
        BlockType::Hero,
        BlockType::Text,
        BlockType::Image,
        BlockType::Gallery,
        BlockType::Video,
        BlockType::Form,
        BlockType::Cards,
        BlockType::Stats,
        BlockType::LogoGrid,
        BlockType::Cta,
        BlockType::List,
        BlockType::Collection,
        BlockType::Html,
        BlockType::Marquee,
        BlockType::Spacer,
    ];

    /// Wire tag stored in the `type` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Hero => "hero",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Gallery => "gallery",
            BlockType::Video => "video",
            BlockType::Form => "form",
            BlockType::Cards => "cards",
            BlockType::Stats => "stats",
            BlockType::LogoGrid => "logo_grid",
            BlockType::Cta => "cta",
            BlockType::List => "list",
            BlockType::Collection => "collection",
            BlockType::Html => "html",
            BlockType::Marquee => "marquee",
            BlockType::Spacer => "spacer",
        }
    }

    /// Display label for the admin editor.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BlockType::Hero => "Hero",
            BlockType::Text => "Text",
            BlockType::Image => "Image",
            BlockType::Gallery => "Gallery",
            BlockType::Video => "Video",
            BlockType::Form => "Form",
            BlockType::Cards => "Cards",
            BlockType::Stats => "Stats",
            BlockType::LogoGrid => "Logo grid",
            BlockType::Cta => "Call to action",
            BlockType::List => "List",
            BlockType::Collection => "Collection",
            BlockType::Html => "HTML",
            BlockType::Marquee => "Marquee",
            BlockType::Spacer => "Spacer",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ModelError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| ModelError::UnknownBlockType(tag.to_string()))
    }
}

/// Hero block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroBlock {
    /// Main heading.
    pub title: LocalizedText,
    /// Line under the heading.
    pub subtitle: LocalizedText,
    /// Call-to-action label; the button shows only with a target.
    pub cta_label: LocalizedText,
    /// Call-to-action target, internal path or absolute URL.
    pub cta_href: String,
    /// Static background image URL.
    pub background_image: String,
    /// Static background video URL; wins over the image.
    pub background_video: String,
    /// Render edge to edge instead of as a card.
    pub full_bleed: bool,
    /// Show the animated background.
    pub use_liquid: bool,
    /// Colors of the animated background; empty means the defaults.
    pub liquid_colors: Vec<String>,
    /// Tuning of the animated background.
    pub liquid_settings: LiquidSettings,
}

/// Text block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    /// Section heading.
    pub heading: LocalizedText,
    /// Body text; line breaks are preserved.
    pub body: LocalizedText,
}

/// Image block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBlock {
    /// Image URL; nothing renders without it.
    pub url: String,
    /// Caption, also used as alternative text.
    pub caption: LocalizedText,
}

/// Gallery block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryBlock {
    /// Image URLs in display order.
    pub images: Vec<String>,
}

/// How a video block plays its URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VideoSource {
    /// A media file played by the browser.
    #[default]
    File,
    /// A page on a video-hosting service, shown through its embed player.
    Embed,
}

impl VideoSource {
    /// Wire value of the `source` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VideoSource::File => "file",
            VideoSource::Embed => "youtube",
        }
    }

    /// Reads the `source` field. Anything but a hosting tag means a file.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "youtube" | "embed" => VideoSource::Embed,
            _ => VideoSource::File,
        }
    }
}

/// Video block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoBlock {
    /// Declared playback kind.
    pub source: VideoSource,
    /// Video URL; nothing renders without it.
    pub url: String,
    /// Heading above the player.
    pub title: LocalizedText,
}

/// Form block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBlock {
    /// Slug of the referenced form.
    pub form_slug: String,
}

/// One card of a cards block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardItem {
    /// Card heading.
    pub title: LocalizedText,
    /// Card text.
    pub description: LocalizedText,
    /// Cover image URL.
    pub image_url: String,
    /// Small icon URL.
    pub icon_url: String,
    /// "Learn more" target.
    pub link: String,
}

/// Cards block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardsBlock {
    /// Section heading.
    pub title: LocalizedText,
    /// Cards in display order.
    pub items: Vec<CardItem>,
}

/// One figure of a stats block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatItem {
    /// The figure, kept as text (`"500"`).
    pub value: String,
    /// Text after the figure (`"+"`, `" days"`).
    pub suffix: String,
    /// Caption under the figure.
    pub label: LocalizedText,
}

/// Stats block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsBlock {
    /// Figures in display order.
    pub items: Vec<StatItem>,
}

/// A logo in a logo grid or marquee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoItem {
    /// Logo image URL.
    pub image_url: String,
    /// Outbound link opened in a new tab.
    pub link: String,
}

/// Logo grid block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoGridBlock {
    /// Logos in display order.
    pub items: Vec<LogoItem>,
}

/// Call-to-action block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CtaBlock {
    /// Panel heading.
    pub title: LocalizedText,
    /// Panel text.
    pub body: LocalizedText,
    /// Button label; the button shows only with a target.
    pub button_label: LocalizedText,
    /// Button target, internal path or absolute URL.
    pub button_href: String,
    /// Background image URL.
    pub background_image: String,
}

/// List block.
///
/// The two item lists are independent and may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBlock {
    /// Section heading.
    pub title: LocalizedText,
    /// Items in the default language.
    pub items: Vec<String>,
    /// Items in the secondary language.
    pub items_en: Vec<String>,
}

impl ListBlock {
    /// Items shown for `lang`.
    ///
    /// The secondary list replaces the default one as a whole when it is
    /// non-empty; there is no per-item fallback.
    #[must_use]
    pub fn items_for(&self, lang: Lang) -> &[String] {
        if lang == Lang::En && !self.items_en.is_empty() {
            &self.items_en
        } else {
            &self.items
        }
    }
}

/// Collection block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionBlock {
    /// Section heading.
    pub title: LocalizedText,
    /// Listed collection; nothing renders without one.
    pub collection: Option<CollectionName>,
    /// A stored collection name outside [`CollectionName::ALL`]. It renders
    /// nothing but is written back unchanged.
    pub unlisted_collection: Option<String>,
    /// Maximum number of items, 0 for all.
    pub limit: usize,
    /// Path prefix of item detail pages; cards link only when set.
    pub detail_prefix: String,
}

/// Raw markup block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlBlock {
    /// Markup inserted verbatim.
    pub html: LocalizedText,
}

/// Marquee block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarqueeBlock {
    /// Logos in scroll order.
    pub items: Vec<LogoItem>,
}

/// Spacer block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacerBlock {
    /// Height in pixels.
    pub size: u32,
}

impl Default for SpacerBlock {
    fn default() -> Self {
        Self {
            size: DEFAULT_SPACER_SIZE,
        }
    }
}

/// A stored block whose type this version does not know.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnknownBlock {
    /// The stored `type` tag.
    pub type_name: String,
    /// Every stored field except `id` and `type`.
    pub fields: Record,
}

/// Type-specific content of a block.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum BlockBody {
    Hero(HeroBlock),
    Text(TextBlock),
    Image(ImageBlock),
    Gallery(GalleryBlock),
    Video(VideoBlock),
    Form(FormBlock),
    Cards(CardsBlock),
    Stats(StatsBlock),
    LogoGrid(LogoGridBlock),
    Cta(CtaBlock),
    List(ListBlock),
    Collection(CollectionBlock),
    Html(HtmlBlock),
    Marquee(MarqueeBlock),
    Spacer(SpacerBlock),
    /// Preserved verbatim; never rendered or edited.
    Unknown(UnknownBlock),
}

impl BlockBody {
    /// Body of a freshly added block of type `block_type`.
    #[must_use]
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Hero => BlockBody::Hero(HeroBlock::default()),
            BlockType::Text => BlockBody::Text(TextBlock::default()),
            BlockType::Image => BlockBody::Image(ImageBlock::default()),
            BlockType::Gallery => BlockBody::Gallery(GalleryBlock::default()),
            BlockType::Video => BlockBody::Video(VideoBlock::default()),
            BlockType::Form => BlockBody::Form(FormBlock::default()),
            BlockType::Cards => BlockBody::Cards(CardsBlock::default()),
            BlockType::Stats => BlockBody::Stats(StatsBlock::default()),
            BlockType::LogoGrid => BlockBody::LogoGrid(LogoGridBlock::default()),
            BlockType::Cta => BlockBody::Cta(CtaBlock::default()),
            BlockType::List => BlockBody::List(ListBlock::default()),
            BlockType::Collection => BlockBody::Collection(CollectionBlock::default()),
            BlockType::Html => BlockBody::Html(HtmlBlock::default()),
            BlockType::Marquee => BlockBody::Marquee(MarqueeBlock::default()),
            BlockType::Spacer => BlockBody::Spacer(SpacerBlock::default()),
        }
    }

    /// Type of the body, `None` for unknown blocks.
    #[must_use]
    pub fn block_type(&self) -> Option<BlockType> {
        Some(match self {
            BlockBody::Hero(_) => BlockType::Hero,
            BlockBody::Text(_) => BlockType::Text,
            BlockBody::Image(_) => BlockType::Image,
            BlockBody::Gallery(_) => BlockType::Gallery,
            BlockBody::Video(_) => BlockType::Video,
            BlockBody::Form(_) => BlockType::Form,
            BlockBody::Cards(_) => BlockType::Cards,
            BlockBody::Stats(_) => BlockType::Stats,
            BlockBody::LogoGrid(_) => BlockType::LogoGrid,
            BlockBody::Cta(_) => BlockType::Cta,
            BlockBody::List(_) => BlockType::List,
            BlockBody::Collection(_) => BlockType::Collection,
            BlockBody::Html(_) => BlockType::Html,
            BlockBody::Marquee(_) => BlockType::Marquee,
            BlockBody::Spacer(_) => BlockType::Spacer,
            BlockBody::Unknown(_) => return None,
        })
    }

    /// Wire tag of the body, including unknown tags.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            BlockBody::Unknown(unknown) => &unknown.type_name,
            known => known.block_type().map(BlockType::as_str).unwrap_or_default(),
        }
    }

    /// Writes the type-specific fields.
    fn write(&self, r: &mut Record) {
        match self {
            BlockBody::Hero(b) => {
                r.put_localized("title", &b.title);
                r.put_localized("subtitle", &b.subtitle);
                r.put_localized("cta_label", &b.cta_label);
                r.set("cta_href", b.cta_href.as_str());
                r.set("background_image", b.background_image.as_str());
                r.set("background_video", b.background_video.as_str());
                r.set("full_bleed", b.full_bleed);
                r.set("use_liquid", b.use_liquid);
                r.put_strings("liquid_colors", &b.liquid_colors);
                if !b.liquid_settings.is_empty() {
                    if let Ok(settings) = serde_json::to_value(&b.liquid_settings) {
                        r.set("liquid_settings", settings);
                    }
                }
            }
            BlockBody::Text(b) => {
                r.put_localized("heading", &b.heading);
                r.put_localized("body", &b.body);
            }
            BlockBody::Image(b) => {
                r.set("url", b.url.as_str());
                r.put_localized("caption", &b.caption);
            }
            BlockBody::Gallery(b) => r.put_strings("images", &b.images),
            BlockBody::Video(b) => {
                r.set("source", b.source.as_str());
                r.set("url", b.url.as_str());
                r.put_localized("title", &b.title);
            }
            BlockBody::Form(b) => r.set("form_slug", b.form_slug.as_str()),
            BlockBody::Cards(b) => {
                r.put_localized("title", &b.title);
                r.put_records("items", b.items.iter().map(Document::to_record).collect());
            }
            BlockBody::Stats(b) => {
                r.put_records("items", b.items.iter().map(Document::to_record).collect());
            }
            BlockBody::LogoGrid(b) => {
                r.put_records("items", b.items.iter().map(Document::to_record).collect());
            }
            BlockBody::Cta(b) => {
                r.put_localized("title", &b.title);
                r.put_localized("body", &b.body);
                r.put_localized("button_label", &b.button_label);
                r.set("button_href", b.button_href.as_str());
                r.set("background_image", b.background_image.as_str());
            }
            BlockBody::List(b) => {
                r.put_localized("title", &b.title);
                r.put_strings("items", &b.items);
                r.put_strings("items_en", &b.items_en);
            }
            BlockBody::Collection(b) => {
                r.put_localized("title", &b.title);
                let name = match (b.collection, &b.unlisted_collection) {
                    (Some(known), _) => known.as_str(),
                    (None, Some(unlisted)) => unlisted.as_str(),
                    (None, None) => "",
                };
                r.set("collection", name);
                r.set("limit", b.limit);
                r.set("detail_prefix", b.detail_prefix.as_str());
            }
            BlockBody::Html(b) => r.put_localized("html", &b.html),
            BlockBody::Marquee(b) => {
                r.put_records("items", b.items.iter().map(Document::to_record).collect());
            }
            BlockBody::Spacer(b) => r.set("size", b.size),
            BlockBody::Unknown(b) => {
                for (key, value) in b.fields.as_map() {
                    r.set(key.clone(), value.clone());
                }
            }
        }
    }

    /// Reads the type-specific fields of a known type.
    fn read(block_type: BlockType, r: &Record) -> Result<Self, ModelError> {
        Ok(match block_type {
            BlockType::Hero => BlockBody::Hero(HeroBlock {
                title: r.localized("title"),
                subtitle: r.localized("subtitle"),
                cta_label: r.localized("cta_label"),
                cta_href: r.text("cta_href"),
                background_image: r.text("background_image"),
                background_video: r.text("background_video"),
                full_bleed: r.flag("full_bleed"),
                use_liquid: r.flag("use_liquid"),
                liquid_colors: r.strings("liquid_colors"),
                liquid_settings: r
                    .record("liquid_settings")
                    .map(|settings| LiquidSettings::from_record(&settings))
                    .unwrap_or_default(),
            }),
            BlockType::Text => BlockBody::Text(TextBlock {
                heading: r.localized("heading"),
                body: r.localized("body"),
            }),
            BlockType::Image => BlockBody::Image(ImageBlock {
                url: r.text("url"),
                caption: r.localized("caption"),
            }),
            BlockType::Gallery => BlockBody::Gallery(GalleryBlock {
                images: r.strings("images"),
            }),
            BlockType::Video => BlockBody::Video(VideoBlock {
                source: VideoSource::parse(&r.text("source")),
                url: r.text("url"),
                title: r.localized("title"),
            }),
            BlockType::Form => BlockBody::Form(FormBlock {
                form_slug: r.text("form_slug"),
            }),
            BlockType::Cards => BlockBody::Cards(CardsBlock {
                title: r.localized("title"),
                items: read_items(r, "items")?,
            }),
            BlockType::Stats => BlockBody::Stats(StatsBlock {
                items: read_items(r, "items")?,
            }),
            BlockType::LogoGrid => BlockBody::LogoGrid(LogoGridBlock {
                items: read_items(r, "items")?,
            }),
            BlockType::Cta => BlockBody::Cta(CtaBlock {
                title: r.localized("title"),
                body: r.localized("body"),
                button_label: r.localized("button_label"),
                button_href: r.text("button_href"),
                background_image: r.text("background_image"),
            }),
            BlockType::List => BlockBody::List(ListBlock {
                title: r.localized("title"),
                items: r.strings("items"),
                items_en: r.strings("items_en"),
            }),
            BlockType::Collection => BlockBody::Collection(CollectionBlock {
                title: r.localized("title"),
                collection: r.opt_text("collection").and_then(|name| name.parse().ok()),
                unlisted_collection: r
                    .opt_text("collection")
                    .filter(|name| name.parse::<CollectionName>().is_err()),
                limit: non_negative(r, "limit")?.unwrap_or(0),
                detail_prefix: r.text("detail_prefix"),
            }),
            BlockType::Html => BlockBody::Html(HtmlBlock {
                html: r.localized("html"),
            }),
            BlockType::Marquee => BlockBody::Marquee(MarqueeBlock {
                items: read_items(r, "items")?,
            }),
            BlockType::Spacer => BlockBody::Spacer(SpacerBlock {
                size: non_negative(r, "size")?
                    .filter(|size| *size > 0)
                    .map_or(DEFAULT_SPACER_SIZE, |size| {
                        u32::try_from(size).unwrap_or(u32::MAX)
                    }),
            }),
        })
    }
}

/// Reads a list of sub-records into typed items.
fn read_items<T: Document>(r: &Record, key: &str) -> Result<Vec<T>, ModelError> {
    r.records(key).iter().map(T::from_record).collect()
}

/// Reads a whole, non-negative number.
fn non_negative(r: &Record, key: &str) -> Result<Option<usize>, ModelError> {
    match r.number(key) {
        None => {
            if r.contains(key) && !r.text(key).is_empty() {
                Err(ModelError::invalid(key, "expected a number"))
            } else {
                Ok(None)
            }
        }
        Some(n) if n.is_finite() && n >= 0.0 => Ok(Some(n.trunc() as usize)),
        Some(_) => Err(ModelError::invalid(key, "expected a non-negative number")),
    }
}

/// A typed, orderable unit of page content.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: BlockId,
    body: BlockBody,
}

impl Block {
    /// Creates a block from an identifier and a body.
    #[must_use]
    pub fn new(id: BlockId, body: BlockBody) -> Self {
        Self { id, body }
    }

    /// Creates a block of `block_type` with default content and a fresh id.
    #[must_use]
    pub fn create(block_type: BlockType) -> Self {
        Self::new(BlockId::generate(), BlockBody::default_for(block_type))
    }

    /// The block's identifier.
    #[must_use]
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    /// The block's content.
    #[must_use]
    pub fn body(&self) -> &BlockBody {
        &self.body
    }

    /// The block's type, `None` for unknown blocks.
    #[must_use]
    pub fn block_type(&self) -> Option<BlockType> {
        self.body.block_type()
    }

    /// The block's wire tag.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.body.type_name()
    }

    /// Returns a copy of this block with `body` in place of its content.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::TypeChange`] when `body` is of another type.
    pub fn with_body(&self, body: BlockBody) -> Result<Block, ModelError> {
        if body.type_name() != self.type_name() {
            return Err(ModelError::TypeChange {
                from: self.type_name().to_string(),
                to: body.type_name().to_string(),
            });
        }
        Ok(Block {
            id: self.id.clone(),
            body,
        })
    }

    /// Returns a copy of this block under a new identifier.
    #[must_use]
    pub fn with_id(&self, id: BlockId) -> Block {
        Block {
            id,
            body: self.body.clone(),
        }
    }

    /// Returns true for a hero block that asks to be rendered edge to edge.
    #[must_use]
    pub fn is_full_bleed_hero(&self) -> bool {
        matches!(&self.body, BlockBody::Hero(hero) if hero.full_bleed)
    }
}

impl Document for Block {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        r.set("id", self.id.as_str());
        r.set("type", self.type_name());
        self.body.write(&mut r);
        r
    }

    /// Decodes a block. A missing `id` (seed data) is replaced by a fresh one.
    fn from_record(r: &Record) -> Result<Self, ModelError> {
        let id = r
            .opt_text("id")
            .or_else(|| r.opt_text("_id"))
            .map_or_else(BlockId::generate, BlockId::new);
        let type_name = r.text("type");
        let body = match type_name.parse::<BlockType>() {
            Ok(block_type) => BlockBody::read(block_type, r)?,
            Err(_) => {
                let mut fields = r.clone();
                fields.remove("id");
                fields.remove("_id");
                fields.remove("type");
                BlockBody::Unknown(UnknownBlock { type_name, fields })
            }
        };
        Ok(Block { id, body })
    }
}

impl Document for CardItem {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        r.put_localized("title", &self.title);
        r.put_localized("description", &self.description);
        r.set("image_url", self.image_url.as_str());
        r.set("icon_url", self.icon_url.as_str());
        r.set("link", self.link.as_str());
        r
    }

    fn from_record(r: &Record) -> Result<Self, ModelError> {
        Ok(CardItem {
            title: r.localized("title"),
            description: r.localized("description"),
            image_url: r.text("image_url"),
            icon_url: r.text("icon_url"),
            link: r.text("link"),
        })
    }
}

impl Document for StatItem {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        r.set("value", self.value.as_str());
        r.set("suffix", self.suffix.as_str());
        r.put_localized("label", &self.label);
        r
    }

    fn from_record(r: &Record) -> Result<Self, ModelError> {
        Ok(StatItem {
            value: r.text("value"),
            suffix: r.text("suffix"),
            label: r.localized("label"),
        })
    }
}

impl Document for LogoItem {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        r.set("image_url", self.image_url.as_str());
        r.set("link", self.link.as_str());
        r
    }

    /// Older documents store the image under `url`.
    fn from_record(r: &Record) -> Result<Self, ModelError> {
        Ok(LogoItem {
            image_url: r.opt_text("image_url").unwrap_or_else(|| r.text("url")),
            link: r.text("link"),
        })
    }
}

record_serde!(Block, CardItem, StatItem, LogoItem);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn every_type_tag_round_trips() {
        for block_type in BlockType::ALL {
            assert_eq!(block_type.as_str().parse::<BlockType>(), Ok(block_type));
            let block = Block::create(block_type);
            assert_eq!(block.block_type(), Some(block_type));
        }
    }

    #[test]
    fn seed_block_without_id_gets_one() -> Result<(), ModelError> {
        let block = Block::from_value(json!({"type": "text", "heading": "Привет"}))?;
        assert!(!block.id().as_str().is_empty());
        match block.body() {
            BlockBody::Text(text) => assert_eq!(text.heading.base(), "Привет"),
            other => return Err(ModelError::UnknownBlockType(other.type_name().into())),
        }
        Ok(())
    }

    #[test]
    fn unknown_type_is_preserved() -> Result<(), ModelError> {
        let source = json!({"id": "b1", "type": "carousel", "speed": 3});
        let block = Block::from_value(source.clone())?;
        assert_eq!(block.block_type(), None);
        assert_eq!(block.type_name(), "carousel");
        assert_eq!(block.to_value(), source);
        Ok(())
    }

    #[test]
    fn type_cannot_change() {
        let block = Block::create(BlockType::Text);
        let err = block.with_body(BlockBody::default_for(BlockType::Image));
        assert_eq!(
            err,
            Err(ModelError::TypeChange {
                from: "text".into(),
                to: "image".into()
            })
        );
    }

    #[test]
    fn spacer_defaults_when_zero_or_absent() -> Result<(), ModelError> {
        for source in [json!({"type": "spacer"}), json!({"type": "spacer", "size": 0})] {
            match Block::from_value(source)?.body() {
                BlockBody::Spacer(spacer) => assert_eq!(spacer.size, DEFAULT_SPACER_SIZE),
                other => return Err(ModelError::UnknownBlockType(other.type_name().into())),
            }
        }
        Ok(())
    }

    #[test]
    fn collection_limit_accepts_numeric_strings() -> Result<(), ModelError> {
        let block = Block::from_value(
            json!({"type": "collection", "collection": "cases", "limit": "3"}),
        )?;
        match block.body() {
            BlockBody::Collection(c) => {
                assert_eq!(c.limit, 3);
                assert_eq!(c.collection, Some(CollectionName::Cases));
            }
            other => return Err(ModelError::UnknownBlockType(other.type_name().into())),
        }
        Ok(())
    }

    #[test]
    fn unknown_collection_is_kept_but_not_listed() -> Result<(), ModelError> {
        let source = json!({"type": "collection", "collection": "vacancies"});
        let block = Block::from_value(source)?;
        match block.body() {
            BlockBody::Collection(c) => {
                assert_eq!(c.collection, None);
                assert_eq!(c.unlisted_collection.as_deref(), Some("vacancies"));
            }
            other => return Err(ModelError::UnknownBlockType(other.type_name().into())),
        }
        assert_eq!(block.to_record().text("collection"), "vacancies");
        Ok(())
    }

    #[test]
    fn malformed_tuning_keys_are_ignored() -> Result<(), ModelError> {
        let block = Block::from_value(json!({
            "type": "hero",
            "liquid_settings": {"mouseForce": "20", "cursorSize": "big", "autoDemo": false}
        }))?;
        match block.body() {
            BlockBody::Hero(h) => {
                assert_eq!(h.liquid_settings.mouse_force, Some(20.0));
                assert_eq!(h.liquid_settings.cursor_size, None);
                assert_eq!(h.liquid_settings.auto_demo, Some(false));
            }
            other => return Err(ModelError::UnknownBlockType(other.type_name().into())),
        }

        let scalar = Block::from_value(json!({"type": "hero", "liquid_settings": "fast"}))?;
        assert!(matches!(scalar.body(), BlockBody::Hero(h) if h.liquid_settings.is_empty()));
        Ok(())
    }

    #[test]
    fn negative_limit_is_invalid() {
        let result = Block::from_value(json!({"type": "collection", "limit": -1}));
        assert!(matches!(result, Err(ModelError::InvalidField { .. })));
    }

    #[test]
    fn logo_item_reads_legacy_url() -> Result<(), ModelError> {
        let item = LogoItem::from_value(json!({"url": "/partners/1.jpg"}))?;
        assert_eq!(item.image_url, "/partners/1.jpg");
        Ok(())
    }

    #[test]
    fn list_uses_whole_secondary_list_only_when_non_empty() {
        let list = ListBlock {
            items: vec!["один".into(), "два".into()],
            items_en: Vec::new(),
            ..ListBlock::default()
        };
        assert_eq!(list.items_for(Lang::En), list.items.as_slice());
        let translated = ListBlock {
            items_en: vec!["one".into()],
            ..list
        };
        assert_eq!(translated.items_for(Lang::En), ["one".to_string()]);
        assert_eq!(translated.items_for(Lang::Ru).len(), 2);
    }
}
