//! Rendering scenarios across blocks, collections and pages.

use folio_gateway::MemoryGateway;
use folio_model::{
    Block, BlockBody, BlockId, CollectionBlock, CollectionName, HeroBlock, Lang, LocalizedText,
    LogoItem, MarqueeBlock, ModelError, Record, SiteSettings,
};
use folio_render::blocks::render_block;
use folio_render::marquee;
use folio_render::RenderContext;
use proptest::prelude::*;

fn block(body: BlockBody) -> Block {
    Block::new(BlockId::new("b"), body)
}

#[test]
fn plain_hero_links_internally() {
    let store = MemoryGateway::new();
    let settings = SiteSettings::default();
    let hero = HeroBlock {
        title: LocalizedText::new("Инвестиции в Азию").with(Lang::En, "Investing in Asia"),
        subtitle: LocalizedText::new("Сопровождение сделок"),
        cta_label: LocalizedText::new("Связаться").with(Lang::En, "Contact us"),
        cta_href: "/contact".into(),
        use_liquid: false,
        ..HeroBlock::default()
    };
    let block = block(BlockBody::Hero(hero));

    let ru = render_block(&block, &RenderContext::new(Lang::Ru, &settings, &store));
    assert!(ru.contains("<h2>Инвестиции в Азию</h2>"));
    assert!(ru.contains("Сопровождение сделок"));
    assert!(ru.contains("<a href=\"/contact\" class=\"button\">Связаться</a>"));
    assert!(!ru.contains("hero-background"));

    let en = render_block(&block, &RenderContext::new(Lang::En, &settings, &store));
    assert!(en.contains("<h2>Investing in Asia</h2>"));
    // Untranslated subtitle falls back to the default language.
    assert!(en.contains("Сопровождение сделок"));
    assert!(en.contains("<a href=\"/en/contact\" class=\"button\">Contact us</a>"));
}

fn seed_cases(store: &MemoryGateway, count: usize) -> Result<(), ModelError> {
    for i in 1..=count {
        let record = Record::from_value(serde_json::json!({
            "slug": format!("case-{i}"),
            "title": format!("Кейс {i}"),
            "title_en": format!("Case {i}"),
            "description": "Описание",
            "image_url": format!("/uploads/case-{i}.jpg"),
        }))?;
        store.insert("cases", record);
    }
    Ok(())
}

#[test]
fn collection_respects_limit_and_links_details() -> Result<(), ModelError> {
    let store = MemoryGateway::new();
    seed_cases(&store, 5)?;
    let settings = SiteSettings::default();
    let ctx = RenderContext::new(Lang::En, &settings, &store);
    let collection = CollectionBlock {
        title: LocalizedText::new("Кейсы").with(Lang::En, "Cases"),
        collection: Some(CollectionName::Cases),
        unlisted_collection: None,
        limit: 3,
        detail_prefix: "/cases".into(),
    };
    let html = render_block(&block(BlockBody::Collection(collection.clone())), &ctx);
    assert_eq!(html.matches("<div class=\"card\">").count(), 3);
    assert_eq!(html.matches("class=\"card-link\"").count(), 3);
    for i in 1..=3 {
        assert!(html.contains(&format!("href=\"/en/cases/case-{i}\"")));
        assert!(html.contains(&format!("<h4>Case {i}</h4>")));
    }
    assert!(!html.contains("case-4"));

    let unlinked = CollectionBlock {
        detail_prefix: String::new(),
        limit: 0,
        ..collection
    };
    let html = render_block(&block(BlockBody::Collection(unlinked)), &ctx);
    assert_eq!(html.matches("<div class=\"card\">").count(), 5);
    assert!(!html.contains("card-link"));
    Ok(())
}

#[test]
fn unreachable_collection_renders_empty_grid() -> Result<(), ModelError> {
    let store = MemoryGateway::new();
    seed_cases(&store, 2)?;
    store.set_offline(true);
    let settings = SiteSettings::default();
    let ctx = RenderContext::new(Lang::Ru, &settings, &store);
    let html = render_block(
        &block(BlockBody::Collection(CollectionBlock {
            collection: Some(CollectionName::Cases),
            ..CollectionBlock::default()
        })),
        &ctx,
    );
    assert!(!html.contains("<div class=\"card\">"));
    Ok(())
}

fn logos(count: usize) -> Vec<LogoItem> {
    (0..count)
        .map(|i| LogoItem {
            image_url: format!("/uploads/logo-{i}.svg"),
            link: String::new(),
        })
        .collect()
}

proptest! {
    #[test]
    fn short_marquees_repeat_each_logo_three_times(count in 1usize..8) {
        let items = logos(count);
        let sequence = marquee::sequence(&items);
        prop_assert_eq!(sequence.len(), count * 3);
        for (position, item) in sequence.iter().enumerate() {
            prop_assert_eq!(*item, &items[position % count]);
        }

        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let html = render_block(&block(BlockBody::Marquee(MarqueeBlock { items: items.clone() })), &ctx);
        for item in &items {
            let src = format!("src=\"{}\"", item.image_url);
            prop_assert_eq!(html.matches(&src).count(), 3);
        }
    }

    #[test]
    fn long_marquees_repeat_twice(count in 8usize..40) {
        let items = logos(count);
        prop_assert_eq!(marquee::sequence(&items).len(), count * 2);
    }

    #[test]
    fn repeated_logos_still_show_each_logo_three_times(
        picks in prop::collection::vec(0usize..10, 1..16),
    ) {
        let items: Vec<LogoItem> = picks
            .iter()
            .map(|i| LogoItem {
                image_url: format!("/uploads/logo-{i}.svg"),
                link: String::new(),
            })
            .collect();
        let distinct: std::collections::BTreeSet<_> = picks.iter().collect();

        let store = MemoryGateway::new();
        let settings = SiteSettings::default();
        let ctx = RenderContext::new(Lang::Ru, &settings, &store);
        let html = render_block(&block(BlockBody::Marquee(MarqueeBlock { items })), &ctx);
        for i in &distinct {
            let shown = html.matches(&format!("src=\"/uploads/logo-{i}.svg\"")).count();
            if distinct.len() < marquee::SHORT_STRIP {
                prop_assert!(shown >= 3, "logo {} shown {} times", i, shown);
            } else {
                prop_assert!(shown >= 2, "logo {} shown {} times", i, shown);
            }
        }
    }
}
