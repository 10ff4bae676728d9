//! Detail pages for collection items.

use folio_model::{Lang, Record};
use pulldown_cmark::{html, Options, Parser};

use crate::html::{escape_html, escape_multiline};
use crate::page::render_document;
use crate::RenderContext;

/// Short facts shown under the title, in this order, when present.
const META_FIELDS: [(&str, &str); 12] = [
    ("client", "Client"),
    ("category", "Category"),
    ("date", "Date"),
    ("location", "Location"),
    ("stage", "Stage"),
    ("industry", "Industry"),
    ("country", "Country"),
    ("capital_required", "Capital required"),
    ("timeline", "Timeline"),
    ("status", "Status"),
    ("author", "Author"),
    ("published_at", "Published"),
];

/// Longer text sections.
const SECTION_FIELDS: [(&str, &str); 2] = [("challenge", "Challenge"), ("solution", "Solution")];

/// String lists rendered as bullet lists.
const LIST_FIELDS: [(&str, &str); 3] = [
    ("features", "Features"),
    ("results", "Results"),
    ("categories", "Categories"),
];

/// Converts Markdown to HTML with GFM extensions.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, opts);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// The display title of an item: `name`, falling back to `title`.
#[must_use]
pub fn item_title(item: &Record, lang: Lang) -> String {
    item.resolve_first(&["name", "title"], lang)
}

/// A string list in `lang`, reusing the base list when the translation is empty.
fn localized_list(item: &Record, key: &str, lang: Lang) -> Vec<String> {
    let translated = item.strings(&lang.field_name(key));
    if !lang.is_default() && !translated.is_empty() {
        translated
    } else {
        item.strings(key)
    }
}

/// Renders the body of an item's detail page.
#[must_use]
pub fn render_detail_body(item: &Record, ctx: &RenderContext<'_>) -> String {
    let lang = ctx.lang;
    let mut html = String::from("<div class=\"page\">\n<article class=\"container detail\">\n");
    let title = item_title(item, lang);
    if !title.is_empty() {
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&title)));
    }

    let meta: Vec<String> = META_FIELDS
        .iter()
        .filter_map(|(key, label)| {
            let value = item.resolve(key, lang);
            (!value.is_empty()).then(|| {
                format!("<dt>{label}</dt><dd>{}</dd>", escape_html(&value))
            })
        })
        .collect();
    if !meta.is_empty() {
        html.push_str(&format!("<dl class=\"detail-meta\">\n{}\n</dl>\n", meta.join("\n")));
    }

    let image = item.resolve_first(&["image_url", "logo_url"], lang);
    if !image.is_empty() {
        html.push_str(&format!(
            "<img class=\"detail-image\" src=\"{}\" alt=\"{}\">\n",
            escape_html(&ctx.asset(&image)),
            escape_html(&title)
        ));
    }

    let lead = item.resolve_first(&["description", "excerpt"], lang);
    if !lead.is_empty() {
        html.push_str(&format!("<p class=\"detail-lead\">{}</p>\n", escape_multiline(&lead)));
    }

    for (key, label) in SECTION_FIELDS {
        let text = item.resolve(key, lang);
        if !text.is_empty() {
            html.push_str(&format!(
                "<section>\n<h2>{label}</h2>\n<p>{}</p>\n</section>\n",
                escape_multiline(&text)
            ));
        }
    }

    for (key, label) in LIST_FIELDS {
        let items = localized_list(item, key, lang);
        if items.is_empty() {
            continue;
        }
        html.push_str(&format!("<section>\n<h2>{label}</h2>\n<ul>\n"));
        for entry in items {
            html.push_str(&format!("<li>{}</li>\n", escape_html(&entry)));
        }
        html.push_str("</ul>\n</section>\n");
    }

    let content = item.resolve("content", lang);
    if !content.is_empty() {
        html.push_str(&format!(
            "<div class=\"detail-content\">\n{}</div>\n",
            markdown_to_html(&content)
        ));
    }
    html.push_str("</article>\n</div>\n");
    html
}

/// Renders a complete detail page document at `current_path`.
#[must_use]
pub fn render_detail(item: &Record, current_path: &str, ctx: &RenderContext<'_>) -> String {
    render_document(
        &item_title(item, ctx.lang),
        &render_detail_body(item, ctx),
        current_path,
        ctx,
    )
}
