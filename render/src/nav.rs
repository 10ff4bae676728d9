//! Site navigation and the language switch.

use folio_model::{Lang, NavLink};

use crate::html::{escape_html, lang_root, localize_href};
use crate::RenderContext;

/// Renders the menu as an HTML list. The entry whose target matches
/// `current_path` (a root-relative content path such as `/about`) is marked
/// current; the home entry only matches the root itself.
#[must_use]
pub fn render_nav(nav: &[NavLink], current_path: &str, ctx: &RenderContext<'_>) -> String {
    let mut html = String::from("<ul>\n");
    for item in nav {
        let is_current = is_current(&item.href, current_path);
        let class = if is_current { " class=\"current\"" } else { "" };
        let aria = if is_current { " aria-current=\"page\"" } else { "" };
        html.push_str(&format!(
            "  <li{class}><a href=\"{url}\"{aria}>{label}</a></li>\n",
            url = escape_html(&ctx.href(&item.href)),
            label = escape_html(ctx.text(&item.label)),
        ));
    }
    html.push_str("</ul>\n");
    html
}

fn is_current(href: &str, current_path: &str) -> bool {
    if href.is_empty() || !href.starts_with('/') {
        return false;
    }
    if href == "/" {
        return current_path == "/";
    }
    current_path == href
        || current_path
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// URL of `path` (root-relative content path) in language `lang`.
#[must_use]
pub fn page_url(path: &str, lang: Lang, base_path: &str) -> String {
    if path.is_empty() || path == "/" {
        lang_root(lang, base_path)
    } else {
        let url = localize_href(path, lang, base_path);
        if url.ends_with('/') {
            url
        } else {
            format!("{url}/")
        }
    }
}

/// The link to the same page in the other language.
#[must_use]
pub fn render_lang_switch(current_path: &str, ctx: &RenderContext<'_>) -> String {
    let other = ctx.lang.other();
    format!(
        "<a class=\"lang-switch\" href=\"{url}\" hreflang=\"{tag}\" lang=\"{tag}\">{label}</a>",
        url = escape_html(&page_url(current_path, other, ctx.base_path)),
        tag = other.as_str(),
        label = other.as_str().to_uppercase(),
    )
}
