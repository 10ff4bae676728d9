//! Page bodies and the document shell around them.

use folio_model::{Block, BlockBody, Page, Theme};

use crate::blocks::render_block;
use crate::html::{escape_html, escape_multiline, lang_root};
use crate::nav::{render_lang_switch, render_nav};
use crate::RenderContext;

/// Shown in place of a page that does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Page not found.";

/// Whether a block spans the full viewport width on a full-width page.
fn spans_full_width(block: &Block) -> bool {
    block.is_full_bleed_hero() || matches!(block.body(), BlockBody::Marquee(_))
}

/// Renders the page title and its blocks in order.
///
/// A full-width page opening with a full-bleed hero loses its top padding.
/// The title is shown unless `hide_title` is set. On full-width pages,
/// full-bleed heroes and marquees span the viewport; every other block sits
/// in the centered container.
#[must_use]
pub fn render_page_body(page: &Page, ctx: &RenderContext<'_>) -> String {
    let class = if page.opens_full_bleed() {
        "page page-flush"
    } else {
        "page"
    };
    let mut html = format!("<div class=\"{class}\">\n");
    let title = ctx.text(&page.title);
    if !page.hide_title && !title.is_empty() {
        html.push_str(&format!(
            "<div class=\"container page-title\">\n<h1>{}</h1>\n</div>\n",
            escape_html(title)
        ));
    }
    for block in &page.blocks {
        let rendered = render_block(block, ctx);
        if rendered.is_empty() {
            continue;
        }
        let wrapper = if page.full_width && spans_full_width(block) {
            "w-full"
        } else {
            "container"
        };
        html.push_str(&format!(
            "<div class=\"{wrapper}\" data-block=\"{id}\">\n{rendered}</div>\n",
            id = escape_html(block.id().as_str())
        ));
    }
    html.push_str("</div>\n");
    html
}

/// Theme colors and fonts as CSS custom properties.
#[must_use]
pub fn theme_style(theme: &Theme) -> String {
    format!(
        ":root {{ --color-primary: {}; --color-background: {}; --color-text: {}; --font-heading: '{}', sans-serif; --font-body: '{}', sans-serif; }}",
        css_value(&theme.primary_color),
        css_value(&theme.background_color),
        css_value(&theme.text_color),
        css_value(&theme.heading_font),
        css_value(&theme.body_font),
    )
}

/// Drops characters that could end a declaration or the style element.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '\'' | '"' | '\\'))
        .collect()
}

/// Wraps rendered content in the full HTML document: head with theme, header
/// with navigation and language switch, main content and footer.
///
/// `current_path` is the root-relative content path of the page (`/`,
/// `/about`, `/cases/retail-audit`).
#[must_use]
pub fn render_document(
    title: &str,
    content_html: &str,
    current_path: &str,
    ctx: &RenderContext<'_>,
) -> String {
    let settings = ctx.settings;
    let full_title = if title.is_empty() {
        settings.site_name.clone()
    } else {
        format!("{title} | {}", settings.site_name)
    };
    let css_url = format!("{}/css/style.css", ctx.base_path.trim_end_matches('/'));
    let home_url = lang_root(ctx.lang, ctx.base_path);
    let tagline = ctx.text(&settings.tagline);
    let footer = ctx.text(&settings.footer_text);
    let footer = if footer.is_empty() {
        escape_html(&settings.site_name)
    } else {
        escape_multiline(footer)
    };
    format!(
        r##"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{full_title}</title>
<meta name="description" content="{tagline}">
<link rel="stylesheet" href="{css_url}">
<style>{theme}</style>
</head>
<body>
<a href="#main-content" class="skip-link">Skip to main content</a>
<header class="site-header">
<a href="{home_url}" class="site-logo">{site_name}</a>
<nav aria-label="Site navigation" class="site-nav">
{nav}</nav>
{switch}
</header>
<main id="main-content">
{content_html}</main>
<footer class="site-footer">
<p>{footer}</p>
</footer>
</body>
</html>
"##,
        lang = ctx.lang.as_str(),
        full_title = escape_html(&full_title),
        tagline = escape_html(tagline),
        css_url = escape_html(&css_url),
        theme = theme_style(&settings.theme),
        home_url = escape_html(&home_url),
        site_name = escape_html(&settings.site_name),
        nav = render_nav(&settings.nav, current_path, ctx),
        switch = render_lang_switch(current_path, ctx),
        content_html = content_html,
        footer = footer,
    )
}

/// Renders a complete page document.
#[must_use]
pub fn render_page(page: &Page, current_path: &str, ctx: &RenderContext<'_>) -> String {
    render_document(
        ctx.text(&page.title),
        &render_page_body(page, ctx),
        current_path,
        ctx,
    )
}

/// Renders the document shown for a missing page.
#[must_use]
pub fn render_not_found(ctx: &RenderContext<'_>) -> String {
    let body = format!(
        "<div class=\"page\">\n<div class=\"container not-found\">{NOT_FOUND_MESSAGE}</div>\n</div>\n"
    );
    render_document("", &body, "/404", ctx)
}

#[cfg(test)]
mod tests {
    use folio_gateway::MemoryGateway;
    use folio_model::{BlockId, BlockType, HeroBlock, Lang, LocalizedText, SiteSettings};

    use super::*;

    fn hero(full_bleed: bool) -> Block {
        Block::new(
            BlockId::new("hero"),
            BlockBody::Hero(HeroBlock {
                title: LocalizedText::new("Folio"),
                full_bleed,
                ..HeroBlock::default()
            }),
        )
    }

    #[test]
    fn full_bleed_hero_drops_padding_but_not_title() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let mut page = Page::new("home", LocalizedText::new("Главная"));
        page.full_width = true;
        page.blocks = vec![hero(true), Block::create(BlockType::Text)];

        let html = render_page_body(&page, &ctx);
        assert!(html.starts_with("<div class=\"page page-flush\">"));
        assert!(html.contains("<h1>Главная</h1>"));
        assert!(html.contains("<div class=\"w-full\" data-block=\"hero\">"));

        page.hide_title = true;
        assert!(!render_page_body(&page, &ctx).contains("<h1>"));

        page.full_width = false;
        let boxed = render_page_body(&page, &ctx);
        assert!(boxed.starts_with("<div class=\"page\">"));
        assert!(boxed.contains("<div class=\"container\" data-block=\"hero\">"));
    }

    #[test]
    fn plain_hero_first_keeps_padding() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let mut page = Page::new("home", LocalizedText::new("Главная"));
        page.full_width = true;
        page.blocks = vec![hero(false)];
        assert!(render_page_body(&page, &ctx).starts_with("<div class=\"page\">"));
    }

    #[test]
    fn document_carries_language_theme_and_nav() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::En, &settings, &store).with_base_path("/site");
        let page = Page::new("about", LocalizedText::new("О нас").with(Lang::En, "About"));
        let html = render_page(&page, "/about", &ctx);
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("<title>About | Folio</title>"));
        assert!(html.contains("--color-primary: #e11d2e"));
        assert!(html.contains("href=\"/site/css/style.css\""));
        assert!(html.contains("<li class=\"current\">"));
        assert!(html.contains("href=\"/site/about/\" hreflang=\"ru\""));
    }

    #[test]
    fn not_found_page_says_so() {
        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        assert!(render_not_found(&ctx).contains(NOT_FOUND_MESSAGE));
    }
}
