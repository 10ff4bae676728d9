//! # folio-site
//!
//! Generates the public Folio site as a directory of static files, once per
//! configured language, from whatever a content gateway returns.
//!
//! ```no_run
//! use std::path::Path;
//! use folio_gateway::MemoryGateway;
//! use folio_site::{generate, SiteConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = MemoryGateway::load_dir(Path::new("content"))?;
//! let config = SiteConfig::default();
//! let report = generate(&store, &config, Path::new("public"))?;
//! println!("{} pages", report.pages);
//! # Ok(())
//! # }
//! ```
//!
//! # Output Structure
//!
//! ```text
//! public/
//!   index.html                 (home page, default language)
//!   <slug>/index.html
//!   <detail_prefix>/<slug>/index.html
//!   404.html
//!   en/...                     (same tree for the secondary language)
//!   sitemap.xml
//!   css/style.css
//!   uploads/...                (media, when a content directory is used)
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod sitemap;
pub mod writer;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_gateway::documents::{fetch_settings, list_collection};
use folio_gateway::{ContentGateway, ListQuery, PAGES};
use folio_model::{BlockBody, CollectionName, Document, Lang, Page, Record};
use folio_render::blocks::detail_link;
use folio_render::detail::render_detail;
use folio_render::nav::page_url;
use folio_render::page::{render_not_found, render_page};
use folio_render::RenderContext;
use tracing::{debug, info, warn};

pub use config::SiteConfig;

/// Directory of uploaded media inside a content directory and the output.
pub const UPLOADS_DIR: &str = "uploads";

/// What a generation run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Pages written, counted once per language.
    pub pages: usize,
    /// Collection detail pages written, counted once per language.
    pub detail_pages: usize,
    /// Stored pages that did not decode and were left out.
    pub skipped: usize,
    /// Every file written, in write order.
    pub files: Vec<PathBuf>,
}

impl GenerationReport {
    fn wrote(&mut self, path: PathBuf) {
        self.files.push(path);
    }
}

/// Generates the site into `out_dir`.
///
/// Content that cannot be placed (a page that does not decode, a page without
/// a slug, a slug that would escape the output directory) is skipped with a
/// warning, as is a collection that fails to load for detail pages.
///
/// # Errors
///
/// Returns an error if pages cannot be listed or a file cannot be written.
pub fn generate(
    gateway: &dyn ContentGateway,
    config: &SiteConfig,
    out_dir: &Path,
) -> Result<GenerationReport> {
    let settings = fetch_settings(gateway);
    let records = gateway
        .list(PAGES, &ListQuery::new())
        .context("Cannot list pages")?;
    let mut report = GenerationReport::default();
    let pages = decode_pages(&records, &mut report);
    if !pages.iter().any(|p| p.slug == config.home_slug) {
        warn!(home = %config.home_slug, "no home page; language roots will be empty");
    }

    let mut sitemap_paths: Vec<String> = Vec::new();
    let base_path = config.base_path();

    for &lang in &config.languages {
        let ctx = RenderContext::new(lang, &settings, gateway)
            .with_base_path(base_path)
            .with_form_action_base(&config.form_action_base);

        for page in &pages {
            let Some(path) = content_path(page, &config.home_slug) else {
                warn!(id = ?page.id, "skipping page without a slug");
                continue;
            };
            let Some(file) = output_file(out_dir, lang, &path) else {
                warn!(slug = %page.slug, "skipping page with an unsafe slug");
                continue;
            };
            writer::write(&file, &render_page(page, &path, &ctx))?;
            debug!(lang = %lang.as_str(), path = %path, "wrote page");
            report.wrote(file);
            report.pages += 1;
            sitemap_paths.push(page_url(&path, lang, base_path));
        }

        for (collection, prefix) in detail_sources(&pages) {
            let items = match list_collection(gateway, collection, lang, 0) {
                Ok(items) => items,
                Err(err) => {
                    warn!(%collection, error = %err, "skipping detail pages");
                    continue;
                }
            };
            for item in &items {
                if let Some((file, path)) = detail_target(out_dir, lang, &prefix, item) {
                    writer::write(&file, &render_detail(item, &path, &ctx))?;
                    report.wrote(file);
                    report.detail_pages += 1;
                    sitemap_paths.push(page_url(&path, lang, base_path));
                }
            }
        }

        let not_found = lang_dir(out_dir, lang).join("404.html");
        writer::write(&not_found, &render_not_found(&ctx))?;
        report.wrote(not_found);
    }

    let sitemap = out_dir.join("sitemap.xml");
    let sitemap_base = config.base_url.trim_end_matches('/');
    writer::write(&sitemap, &sitemap::render_sitemap(sitemap_base, &sitemap_paths))?;
    report.wrote(sitemap);

    let css = out_dir.join("css").join("style.css");
    writer::write(&css, style_css())?;
    report.wrote(css);

    if let Some(content_dir) = &config.content_dir {
        let uploads = content_dir.join(UPLOADS_DIR);
        report.files.extend(writer::copy_tree(&uploads, &out_dir.join(UPLOADS_DIR))?);
    }

    info!(
        pages = report.pages,
        detail_pages = report.detail_pages,
        skipped = report.skipped,
        files = report.files.len(),
        out = %out_dir.display(),
        "site generated"
    );
    Ok(report)
}

/// Decodes every stored page, skipping and counting those that fail.
fn decode_pages(records: &[Record], report: &mut GenerationReport) -> Vec<Page> {
    records
        .iter()
        .filter_map(|record| match Page::from_record(record) {
            Ok(page) => Some(page),
            Err(err) => {
                warn!(
                    slug = %record.text("slug"),
                    error = %err,
                    "skipping page that does not decode"
                );
                report.skipped += 1;
                None
            }
        })
        .collect()
}

/// The content path of a page: `/` for the home page, `/{slug}` otherwise.
fn content_path(page: &Page, home_slug: &str) -> Option<String> {
    let slug = page.slug.trim_matches('/');
    if slug.is_empty() {
        None
    } else if slug == home_slug {
        Some("/".to_string())
    } else {
        Some(format!("/{slug}"))
    }
}

fn lang_dir(out_dir: &Path, lang: Lang) -> PathBuf {
    if lang.is_default() {
        out_dir.to_path_buf()
    } else {
        out_dir.join(lang.as_str())
    }
}

/// `{lang dir}/{path}/index.html`, or `None` for paths with empty, `.` or
/// `..` segments.
fn output_file(out_dir: &Path, lang: Lang, path: &str) -> Option<PathBuf> {
    let mut file = lang_dir(out_dir, lang);
    let trimmed = path.trim_matches('/');
    if !trimmed.is_empty() {
        for segment in trimmed.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return None;
            }
            file.push(segment);
        }
    }
    Some(file.join("index.html"))
}

/// Every (collection, detail prefix) pair named by a collection block, once.
fn detail_sources(pages: &[Page]) -> BTreeSet<(CollectionName, String)> {
    pages
        .iter()
        .flat_map(|page| page.blocks.iter())
        .filter_map(|block| match block.body() {
            BlockBody::Collection(b) if !b.detail_prefix.trim().is_empty() => {
                b.collection.map(|c| (c, b.detail_prefix.clone()))
            }
            _ => None,
        })
        .collect()
}

fn detail_target(
    out_dir: &Path,
    lang: Lang,
    prefix: &str,
    item: &Record,
) -> Option<(PathBuf, String)> {
    let path = detail_link(prefix, item)?;
    if !path.starts_with('/') {
        warn!(prefix, "detail prefix is not root-relative; skipping");
        return None;
    }
    let file = output_file(out_dir, lang, &path)?;
    Some((file, path))
}

/// Returns the complete CSS stylesheet.
fn style_css() -> &'static str {
    include_str!("../static/css/style.css")
}
