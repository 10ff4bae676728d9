//! Block renderer: one HTML fragment per block, dispatched on the block type.
//!
//! A block renders to an empty string when it has nothing to show (an image
//! without a URL, a form whose slug does not resolve, a type this build does
//! not know). Rendering never fails; a collection or form fetch that errors is
//! logged and renders nothing.

use folio_gateway::documents::{fetch_form, list_collection};
use folio_model::{
    Block, BlockBody, CardsBlock, CollectionBlock, CtaBlock, FormBlock, GalleryBlock, HeroBlock,
    HtmlBlock, ImageBlock, ListBlock, LogoGridBlock, LogoItem, MarqueeBlock, Record, SpacerBlock,
    StatsBlock, TextBlock, VideoBlock, DEFAULT_LIQUID_COLORS,
};
use tracing::{debug, warn};

use crate::html::{escape_html, escape_multiline, is_external};
use crate::labels::Label;
use crate::{form, marquee, video, RenderContext};

/// Renders one block.
#[must_use]
pub fn render_block(block: &Block, ctx: &RenderContext<'_>) -> String {
    match block.body() {
        BlockBody::Hero(b) => render_hero(b, ctx),
        BlockBody::Text(b) => render_text(b, ctx),
        BlockBody::Image(b) => render_image(b, ctx),
        BlockBody::Gallery(b) => render_gallery(b, ctx),
        BlockBody::Video(b) => render_video(b, ctx),
        BlockBody::Form(b) => render_form_block(b, ctx),
        BlockBody::Cards(b) => render_cards(b, ctx),
        BlockBody::Stats(b) => render_stats(b, ctx),
        BlockBody::LogoGrid(b) => render_logo_grid(b, ctx),
        BlockBody::Cta(b) => render_cta(b, ctx),
        BlockBody::List(b) => render_list(b, ctx),
        BlockBody::Collection(b) => render_collection(b, ctx),
        BlockBody::Html(b) => render_html(b, ctx),
        BlockBody::Marquee(b) => render_marquee(b, ctx),
        BlockBody::Spacer(b) => render_spacer(b),
        BlockBody::Unknown(b) => {
            debug!(block = %block.id(), type_name = %b.type_name, "skipping unknown block type");
            String::new()
        }
    }
}

/// A call-to-action link. Internal targets are routed into the current
/// language tree.
fn action_link(href: &str, label: &str, class: &str, ctx: &RenderContext<'_>) -> String {
    let rel = if is_external(href) { " rel=\"noopener\"" } else { "" };
    format!(
        "<a href=\"{href}\" class=\"{class}\"{rel}>{label}</a>\n",
        href = escape_html(&ctx.href(href)),
        label = escape_html(label),
    )
}

fn heading(tag: &str, text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("<{tag}>{}</{tag}>\n", escape_html(text))
    }
}

fn paragraph(class: &str, text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("<p class=\"{class}\">{}</p>\n", escape_multiline(text))
    }
}

fn render_hero(block: &HeroBlock, ctx: &RenderContext<'_>) -> String {
    let class = if block.full_bleed {
        "block hero hero-full-bleed"
    } else {
        "block hero"
    };
    let mut html = format!("<section class=\"{class}\">\n");
    if block.use_liquid {
        html.push_str(&liquid_surface(block));
    } else if !block.background_video.is_empty() {
        html.push_str(&format!(
            "<div class=\"hero-background\"><video src=\"{}\" autoplay muted loop playsinline></video></div>\n",
            escape_html(&ctx.asset(&block.background_video))
        ));
    } else if !block.background_image.is_empty() {
        html.push_str(&format!(
            "<div class=\"hero-background\"><img src=\"{}\" alt=\"\"></div>\n",
            escape_html(&ctx.asset(&block.background_image))
        ));
    }
    html.push_str("<div class=\"hero-content\">\n");
    html.push_str(&heading("h2", ctx.text(&block.title)));
    html.push_str(&paragraph("hero-subtitle", ctx.text(&block.subtitle)));
    let label = ctx.text(&block.cta_label);
    if !label.is_empty() && !block.cta_href.is_empty() {
        html.push_str(&action_link(&block.cta_href, label, "button", ctx));
    }
    html.push_str("</div>\n</section>\n");
    html
}

/// The animated background mount point. Colors and tuning travel as JSON
/// data attributes; unset values take the built-in defaults.
fn liquid_surface(block: &HeroBlock) -> String {
    let colors: Vec<&str> = if block.liquid_colors.is_empty() {
        DEFAULT_LIQUID_COLORS.to_vec()
    } else {
        block.liquid_colors.iter().map(String::as_str).collect()
    };
    let colors = serde_json::to_string(&colors).unwrap_or_default();
    let settings = serde_json::to_string(&block.liquid_settings.resolved()).unwrap_or_default();
    format!(
        "<div class=\"hero-background liquid-background\" data-colors=\"{}\" data-settings=\"{}\"></div>\n",
        escape_html(&colors),
        escape_html(&settings)
    )
}

fn render_text(block: &TextBlock, ctx: &RenderContext<'_>) -> String {
    let mut html = String::from("<section class=\"block text\">\n");
    html.push_str(&heading("h3", ctx.text(&block.heading)));
    html.push_str(&paragraph("text-body", ctx.text(&block.body)));
    html.push_str("</section>\n");
    html
}

fn render_image(block: &ImageBlock, ctx: &RenderContext<'_>) -> String {
    if block.url.is_empty() {
        return String::new();
    }
    let caption = ctx.text(&block.caption);
    let figcaption = if caption.is_empty() {
        String::new()
    } else {
        format!("<figcaption>{}</figcaption>\n", escape_html(caption))
    };
    format!(
        "<figure class=\"block image\">\n<img src=\"{src}\" alt=\"{alt}\">\n{figcaption}</figure>\n",
        src = escape_html(&ctx.asset(&block.url)),
        alt = escape_html(caption),
    )
}

fn render_gallery(block: &GalleryBlock, ctx: &RenderContext<'_>) -> String {
    let images: Vec<&String> = block.images.iter().filter(|url| !url.trim().is_empty()).collect();
    if images.is_empty() {
        return String::new();
    }
    let mut html = String::from("<div class=\"block gallery\">\n");
    for url in images {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"\" loading=\"lazy\">\n",
            escape_html(&ctx.asset(url))
        ));
    }
    html.push_str("</div>\n");
    html
}

fn render_video(block: &VideoBlock, ctx: &RenderContext<'_>) -> String {
    if block.url.is_empty() {
        return String::new();
    }
    let title = ctx.text(&block.title);
    let mut html = String::from("<div class=\"block video\">\n");
    html.push_str(&heading("h3", title));
    if video::is_embedded(block) {
        let frame_title = if title.is_empty() { "video" } else { title };
        html.push_str(&format!(
            "<div class=\"video-frame\"><iframe title=\"{}\" src=\"{}\" allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture\" allowfullscreen></iframe></div>\n",
            escape_html(frame_title),
            escape_html(&video::embed_url(&block.url))
        ));
    } else {
        html.push_str(&format!(
            "<video src=\"{}\" controls></video>\n",
            escape_html(&ctx.asset(&block.url))
        ));
    }
    html.push_str("</div>\n");
    html
}

fn render_form_block(block: &FormBlock, ctx: &RenderContext<'_>) -> String {
    if block.form_slug.is_empty() {
        return String::new();
    }
    match fetch_form(ctx.gateway, &block.form_slug) {
        Ok(Some(found)) => format!(
            "<div class=\"block form\">\n{}</div>\n",
            form::render_form(&found, ctx, &form::Values::new(), None)
        ),
        Ok(None) => {
            debug!(slug = %block.form_slug, "form block references a missing form");
            String::new()
        }
        Err(err) => {
            warn!(slug = %block.form_slug, error = %err, "form unavailable");
            String::new()
        }
    }
}

fn render_cards(block: &CardsBlock, ctx: &RenderContext<'_>) -> String {
    let mut html = String::from("<section class=\"block cards\">\n");
    html.push_str(&heading("h3", ctx.text(&block.title)));
    html.push_str("<div class=\"card-grid\">\n");
    for item in &block.items {
        html.push_str("<div class=\"card\">\n");
        if !item.icon_url.is_empty() {
            html.push_str(&format!(
                "<img class=\"card-icon\" src=\"{}\" alt=\"\">\n",
                escape_html(&ctx.asset(&item.icon_url))
            ));
        }
        if !item.image_url.is_empty() {
            html.push_str(&format!(
                "<img class=\"card-image\" src=\"{}\" alt=\"\">\n",
                escape_html(&ctx.asset(&item.image_url))
            ));
        }
        html.push_str(&heading("h4", ctx.text(&item.title)));
        html.push_str(&paragraph("card-description", ctx.text(&item.description)));
        if !item.link.is_empty() {
            let label = Label::LearnMore.text(ctx.lang);
            html.push_str(&action_link(&item.link, label, "card-link", ctx));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</section>\n");
    html
}

fn render_stats(block: &StatsBlock, ctx: &RenderContext<'_>) -> String {
    let mut html = String::from("<section class=\"block stats\">\n");
    for item in &block.items {
        let label = ctx.text(&item.label);
        let label = if label.is_empty() {
            String::new()
        } else {
            format!("<div class=\"stat-label\">{}</div>\n", escape_html(label))
        };
        html.push_str(&format!(
            "<div class=\"stat\">\n<div class=\"stat-value\">{}{}</div>\n{label}</div>\n",
            escape_html(&item.value),
            escape_html(&item.suffix),
        ));
    }
    html.push_str("</section>\n");
    html
}

/// One logo, linked out in a new tab when it has a link. Items without an
/// image are skipped.
fn logo(item: &LogoItem, ctx: &RenderContext<'_>) -> String {
    if item.image_url.is_empty() {
        return String::new();
    }
    let img = format!(
        "<img src=\"{}\" alt=\"\">",
        escape_html(&ctx.asset(&item.image_url))
    );
    if item.link.is_empty() {
        format!("<div class=\"logo\">{img}</div>\n")
    } else {
        format!(
            "<div class=\"logo\"><a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{img}</a></div>\n",
            escape_html(&ctx.href(&item.link))
        )
    }
}

fn render_logo_grid(block: &LogoGridBlock, ctx: &RenderContext<'_>) -> String {
    let mut html = String::from("<section class=\"block logo-grid\">\n");
    for item in &block.items {
        html.push_str(&logo(item, ctx));
    }
    html.push_str("</section>\n");
    html
}

fn render_marquee(block: &MarqueeBlock, ctx: &RenderContext<'_>) -> String {
    if block.items.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section class=\"block marquee\">\n<div class=\"marquee-track\">\n");
    for item in marquee::sequence(&block.items) {
        html.push_str(&logo(item, ctx));
    }
    html.push_str("</div>\n</section>\n");
    html
}

fn render_cta(block: &CtaBlock, ctx: &RenderContext<'_>) -> String {
    let mut html = String::from("<section class=\"block cta\">\n");
    if !block.background_image.is_empty() {
        html.push_str(&format!(
            "<img class=\"cta-background\" src=\"{}\" alt=\"\">\n",
            escape_html(&ctx.asset(&block.background_image))
        ));
    }
    html.push_str("<div class=\"cta-content\">\n");
    html.push_str(&heading("h3", ctx.text(&block.title)));
    html.push_str(&paragraph("cta-body", ctx.text(&block.body)));
    let label = ctx.text(&block.button_label);
    if !label.is_empty() && !block.button_href.is_empty() {
        html.push_str(&action_link(&block.button_href, label, "button", ctx));
    }
    html.push_str("</div>\n</section>\n");
    html
}

fn render_list(block: &ListBlock, ctx: &RenderContext<'_>) -> String {
    let mut html = String::from("<section class=\"block list\">\n");
    html.push_str(&heading("h3", ctx.text(&block.title)));
    html.push_str("<ul>\n");
    for item in block.items_for(ctx.lang) {
        html.push_str(&format!("<li>{}</li>\n", escape_html(item)));
    }
    html.push_str("</ul>\n</section>\n");
    html
}

fn render_html(block: &HtmlBlock, ctx: &RenderContext<'_>) -> String {
    let markup = ctx.text(&block.html);
    if markup.is_empty() {
        return String::new();
    }
    format!("<section class=\"block html\">\n{markup}\n</section>\n")
}

fn render_collection(block: &CollectionBlock, ctx: &RenderContext<'_>) -> String {
    let Some(collection) = block.collection else {
        if let Some(name) = &block.unlisted_collection {
            warn!(collection = %name, "skipping block of an unknown collection");
        }
        return String::new();
    };
    let items = match list_collection(ctx.gateway, collection, ctx.lang, block.limit) {
        Ok(items) => items,
        Err(err) => {
            warn!(collection = %collection, error = %err, "collection unavailable");
            Vec::new()
        }
    };
    let shown = if block.limit == 0 { items.len() } else { block.limit };
    let mut html = format!(
        "<section class=\"block collection\" data-collection=\"{collection}\">\n"
    );
    html.push_str(&heading("h3", ctx.text(&block.title)));
    html.push_str("<div class=\"card-grid\">\n");
    for item in items.iter().take(shown) {
        html.push_str(&collection_card(item, &block.detail_prefix, ctx));
    }
    html.push_str("</div>\n</section>\n");
    html
}

/// The link a collection card points at: `{detail_prefix}/{slug}` when both
/// are set.
#[must_use]
pub fn detail_link(detail_prefix: &str, item: &Record) -> Option<String> {
    let slug = item.text("slug");
    if detail_prefix.is_empty() || slug.is_empty() {
        None
    } else {
        Some(format!("{}/{slug}", detail_prefix.trim_end_matches('/')))
    }
}

fn collection_card(item: &Record, detail_prefix: &str, ctx: &RenderContext<'_>) -> String {
    let name = item.resolve_first(&["name", "title"], ctx.lang);
    let description = item.resolve_first(&["description", "excerpt"], ctx.lang);
    let image = item.resolve_first(&["image_url", "logo_url"], ctx.lang);
    let mut card = String::from("<div class=\"card\">\n");
    if !image.is_empty() {
        card.push_str(&format!(
            "<img class=\"card-image\" src=\"{}\" alt=\"{}\">\n",
            escape_html(&ctx.asset(&image)),
            escape_html(&name)
        ));
    }
    card.push_str(&heading("h4", &name));
    card.push_str(&paragraph("card-description", &description));
    card.push_str("</div>\n");
    match detail_link(detail_prefix, item) {
        Some(link) => format!(
            "<a class=\"card-link\" href=\"{}\">\n{card}</a>\n",
            escape_html(&ctx.href(&link))
        ),
        None => card,
    }
}

fn render_spacer(block: &SpacerBlock) -> String {
    format!(
        "<div class=\"block spacer\" style=\"height: {}px\" aria-hidden=\"true\"></div>\n",
        block.size
    )
}

#[cfg(test)]
mod tests {
    use folio_gateway::MemoryGateway;
    use folio_model::{
        BlockId, BlockType, CardItem, FieldKind, Form, FormField, Lang, LiquidSettings,
        LocalizedText, ModelError, SiteSettings,
    };

    use super::*;

    fn block(body: BlockBody) -> Block {
        Block::new(BlockId::new("b1"), body)
    }

    #[test]
    fn empty_blocks_render_without_failing() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        for lang in Lang::ALL {
            let ctx = RenderContext::new(lang, &settings, &store);
            for block_type in folio_model::BlockType::ALL {
                let _ = render_block(&Block::create(block_type), &ctx);
            }
        }
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        assert!(render_block(&Block::create(BlockType::Image), &ctx).is_empty());
        assert!(render_block(&Block::create(BlockType::Form), &ctx).is_empty());
        assert!(render_block(&Block::create(BlockType::Collection), &ctx).is_empty());
        assert!(render_block(&Block::create(BlockType::Marquee), &ctx).is_empty());
    }

    #[test]
    fn unknown_type_renders_nothing() -> Result<(), ModelError> {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let raw = Record::from_value(serde_json::json!({"id": "x", "type": "carousel"}))?;
        let unknown = <Block as folio_model::Document>::from_record(&raw)?;
        assert_eq!(render_block(&unknown, &ctx), "");
        Ok(())
    }

    #[test]
    fn liquid_hero_uses_default_colors_and_tuning() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let hero = HeroBlock {
            use_liquid: true,
            background_image: "/uploads/bg.jpg".into(),
            liquid_settings: LiquidSettings {
                mouse_force: Some(5.0),
                ..LiquidSettings::default()
            },
            ..HeroBlock::default()
        };
        let html = render_block(&block(BlockBody::Hero(hero)), &ctx);
        assert!(html.contains("#e70d0d"));
        assert!(html.contains("&quot;mouseForce&quot;:5.0"));
        assert!(html.contains("&quot;cursorSize&quot;:100.0"));
        assert!(!html.contains("bg.jpg"));
    }

    #[test]
    fn hero_cta_needs_label_and_target() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::En, &settings, &store);
        let hero = HeroBlock {
            title: LocalizedText::new("Заголовок"),
            cta_label: LocalizedText::new("Связаться"),
            ..HeroBlock::default()
        };
        let html = render_block(&block(BlockBody::Hero(hero.clone())), &ctx);
        assert!(html.contains("Заголовок"));
        assert!(!html.contains("<a "));

        let external = HeroBlock {
            cta_href: "https://t.me/folio".into(),
            ..hero
        };
        let html = render_block(&block(BlockBody::Hero(external)), &ctx);
        assert!(html.contains("href=\"https://t.me/folio\""));
        assert!(html.contains("rel=\"noopener\""));
    }

    #[test]
    fn video_picks_player() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let hosted = VideoBlock {
            url: "https://www.youtube.com/watch?v=abc123".into(),
            ..VideoBlock::default()
        };
        let html = render_block(&block(BlockBody::Video(hosted)), &ctx);
        assert!(html.contains("<iframe title=\"video\" src=\"https://www.youtube.com/embed/abc123\""));

        let file = VideoBlock {
            url: "/uploads/reel.mp4".into(),
            ..VideoBlock::default()
        };
        let html = render_block(&block(BlockBody::Video(file)), &ctx.with_base_path("/site"));
        assert!(html.contains("<video src=\"/site/uploads/reel.mp4\" controls>"));
    }

    #[test]
    fn list_falls_back_as_a_whole() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::En, &settings, &store);
        let list = ListBlock {
            items: vec!["один".into(), "два".into()],
            ..ListBlock::default()
        };
        let html = render_block(&block(BlockBody::List(list)), &ctx);
        assert!(html.contains("<li>один</li>\n<li>два</li>"));
    }

    #[test]
    fn card_links_are_labelled_in_the_page_language() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let cards = CardsBlock {
            title: LocalizedText::default(),
            items: vec![CardItem {
                title: LocalizedText::new("Аудит"),
                link: "/services/audit".into(),
                ..CardItem::default()
            }],
        };
        let html = render_block(&block(BlockBody::Cards(cards)), &ctx);
        assert!(html.contains(">Подробнее</a>"));
        assert!(!html.contains("Learn more"));
    }

    #[test]
    fn cards_and_stats_resolve_items() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::En, &settings, &store);
        let cards = CardsBlock {
            title: LocalizedText::new("Услуги"),
            items: vec![CardItem {
                title: LocalizedText::new("Аудит").with(Lang::En, "Audit"),
                link: "/services/audit".into(),
                ..CardItem::default()
            }],
        };
        let html = render_block(&block(BlockBody::Cards(cards)), &ctx);
        assert!(html.contains("<h4>Audit</h4>"));
        assert!(html.contains("href=\"/en/services/audit\""));
        assert!(html.contains("Learn more"));

        let stats = StatsBlock {
            items: vec![folio_model::StatItem {
                value: "120".into(),
                suffix: "+".into(),
                label: LocalizedText::new("клиентов"),
            }],
        };
        let html = render_block(&block(BlockBody::Stats(stats)), &ctx);
        assert!(html.contains("120+"));
        assert!(html.contains("клиентов"));
    }

    #[test]
    fn html_is_inserted_raw_and_spacer_sized() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let raw = HtmlBlock {
            html: LocalizedText::new("<em>raw</em>"),
        };
        assert!(render_block(&block(BlockBody::Html(raw)), &ctx).contains("<em>raw</em>"));
        let spacer = render_block(&Block::create(BlockType::Spacer), &ctx);
        assert!(spacer.contains("height: 32px"));
    }

    #[test]
    fn form_block_renders_referenced_form() {
        let store = MemoryGateway::new();
        let form = Form {
            slug: "contact".into(),
            title: LocalizedText::new("Связь"),
            fields: vec![FormField {
                id: "email".into(),
                kind: FieldKind::Email,
                label: LocalizedText::new("Почта"),
                required: true,
                ..FormField::default()
            }],
            ..Form::default()
        };
        store.insert(folio_gateway::FORMS, folio_model::Document::to_record(&form));
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let html = render_block(
            &block(BlockBody::Form(FormBlock {
                form_slug: "contact".into(),
            })),
            &ctx,
        );
        assert!(html.contains("action=\"/api/forms/contact/submit\""));
        assert!(html.contains("type=\"email\""));
        let missing = render_block(
            &block(BlockBody::Form(FormBlock {
                form_slug: "nope".into(),
            })),
            &ctx,
        );
        assert!(missing.is_empty());
    }
}
