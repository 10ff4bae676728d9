//! HTML text helpers and link routing.
//!
//! The default language is served from the site root and every other
//! language from `/{lang}`. Internal links are rewritten into the current
//! language's tree; absolute URLs pass through untouched.

use folio_model::Lang;

/// Escapes HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Returns true for a link that leaves the site.
#[must_use]
pub fn is_external(href: &str) -> bool {
    href.starts_with("http")
}

/// Path prefix of a language's tree, without trailing slash (`""`, `/en`).
#[must_use]
pub fn lang_prefix(lang: Lang) -> String {
    if lang.is_default() {
        String::new()
    } else {
        format!("/{}", lang.as_str())
    }
}

/// Root URL of a language's tree, with trailing slash.
#[must_use]
pub fn lang_root(lang: Lang, base_path: &str) -> String {
    format!("{}{}/", base_path.trim_end_matches('/'), lang_prefix(lang))
}

/// Rewrites an internal, root-relative link into `lang`'s tree under
/// `base_path`. External, fragment, `mailto:` and `tel:` links, and relative
/// paths, are returned unchanged.
#[must_use]
pub fn localize_href(href: &str, lang: Lang, base_path: &str) -> String {
    if is_external(href) || !href.starts_with('/') || href.starts_with("//") {
        return href.to_string();
    }
    if href == "/" {
        return lang_root(lang, base_path);
    }
    format!("{}{}{href}", base_path.trim_end_matches('/'), lang_prefix(lang))
}

/// Prefixes a root-relative asset URL with `base_path`.
#[must_use]
pub fn asset_url(url: &str, base_path: &str) -> String {
    if url.starts_with('/') && !url.starts_with("//") {
        format!("{}{url}", base_path.trim_end_matches('/'))
    } else {
        url.to_string()
    }
}

/// Turns line breaks into `<br>` after escaping.
#[must_use]
pub fn escape_multiline(s: &str) -> String {
    escape_html(s).replace('\n', "<br>\n")
}
