//! Runs the full suite over seeded content and the site generated from it.

use folio_conformance::{run_all, Targets};
use folio_gateway::{MemoryGateway, PAGES, SETTINGS};
use folio_model::{
    Block, BlockBody, BlockId, Document, FormBlock, HtmlBlock, Lang, LocalizedText, NavLink, Page,
    SiteSettings, TextBlock,
};
use folio_site::{generate, SiteConfig};

fn seed() -> MemoryGateway {
    let store = MemoryGateway::new();
    let settings = SiteSettings {
        nav: vec![
            NavLink::new(LocalizedText::new("Главная").with(Lang::En, "Home"), "/"),
            NavLink::new(LocalizedText::new("О нас").with(Lang::En, "About"), "/about"),
        ],
        ..SiteSettings::default()
    };
    store.insert(SETTINGS, settings.to_record());

    let mut home = Page::new("home", LocalizedText::new("Главная"));
    home.blocks.push(Block::new(
        BlockId::new("intro"),
        BlockBody::Text(TextBlock {
            heading: LocalizedText::new("Добро пожаловать"),
            body: LocalizedText::new("Текст"),
        }),
    ));
    store.insert(PAGES, home.to_record());
    store.insert(PAGES, Page::new("about", LocalizedText::new("О нас")).to_record());
    store
}

fn check(store: &MemoryGateway) -> folio_conformance::ConformanceReport {
    let out = tempfile::tempdir().expect("tempdir");
    generate(store, &SiteConfig::default(), out.path()).expect("generate");
    run_all(&Targets {
        content: Some(store),
        site: Some(out.path().to_path_buf()),
        base_path: String::new(),
    })
    .expect("run conformance")
}

#[test]
fn generated_site_conforms() {
    let report = check(&seed());
    assert!(report.all_passed(), "{report}");
    assert_eq!(report.warning_count(), 0, "{report}");
    assert!(report.by_validator("site/links").count() == 1);
}

#[test]
fn broken_references_fail() {
    let store = seed();
    let mut contact = Page::new("contact", LocalizedText::new("Контакты"));
    contact.blocks.push(Block::new(
        BlockId::new("form"),
        BlockBody::Form(FormBlock {
            form_slug: "contact".into(),
        }),
    ));
    contact.blocks.push(Block::new(
        BlockId::new("raw"),
        BlockBody::Html(HtmlBlock {
            html: LocalizedText::new("<a href=\"/nowhere\">?</a>"),
        }),
    ));
    store.insert(PAGES, contact.to_record());

    let report = check(&store);
    assert!(!report.all_passed());
    let failed: Vec<&str> = report
        .results
        .iter()
        .filter(|r| r.is_failure())
        .map(|r| r.validator.as_str())
        .collect();
    assert_eq!(failed, ["content/form-refs", "site/links"]);
}

#[test]
fn unreachable_store_is_a_failure() {
    let store = seed();
    store.set_offline(true);
    let report = run_all(&Targets {
        content: Some(&store),
        ..Targets::default()
    })
    .expect("run conformance");
    assert_eq!(report.failure_count(), 1);
    assert!(report.results[0].message.starts_with("Cannot read content"));
}
