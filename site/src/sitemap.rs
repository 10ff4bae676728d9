//! `sitemap.xml` for the generated pages.

use folio_render::escape_html;

/// Renders a sitemap listing `paths` (site-absolute URL paths) under
/// `base_url`. Paths are listed in the given order, duplicates once.
#[must_use]
pub fn render_sitemap(base_url: &str, paths: &[String]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    let mut seen = std::collections::HashSet::new();
    for path in paths.iter().filter(|p| seen.insert(p.as_str())) {
        xml.push_str(&format!("  <url><loc>{}{}</loc></url>\n", escape_html(base), escape_html(path)));
    }
    xml.push_str("</urlset>\n");
    xml
}
