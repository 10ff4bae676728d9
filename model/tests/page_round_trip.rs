//! A page holding one populated block of every type survives encoding and
//! decoding with ids, order and field values intact.

use folio_model::{
    Block, BlockBody, BlockId, CardItem, CardsBlock, CollectionBlock, CollectionName, CtaBlock,
    Document, FormBlock, GalleryBlock, HeroBlock, HtmlBlock, ImageBlock, Lang, LiquidSettings,
    ListBlock, LocalizedText, LogoGridBlock, LogoItem, MarqueeBlock, ModelError, Page,
    SpacerBlock, StatItem, StatsBlock, TextBlock, VideoBlock, VideoSource,
};

fn bilingual(ru: &str, en: &str) -> LocalizedText {
    LocalizedText::new(ru).with(Lang::En, en)
}

fn logo(n: u32) -> LogoItem {
    LogoItem {
        image_url: format!("/media/logo-{n}.png"),
        link: format!("https://partner{n}.example"),
    }
}

fn every_block() -> Vec<BlockBody> {
    vec![
        BlockBody::Hero(HeroBlock {
            title: bilingual("Заголовок", "Title"),
            subtitle: bilingual("Подзаголовок", ""),
            cta_label: bilingual("Связаться", "Contact"),
            cta_href: "/contact".into(),
            background_image: "/media/bg.jpg".into(),
            background_video: String::new(),
            full_bleed: true,
            use_liquid: true,
            liquid_colors: vec!["#000000".into(), "#ffffff".into()],
            liquid_settings: LiquidSettings {
                mouse_force: Some(12.5),
                auto_demo: Some(false),
                ..LiquidSettings::default()
            },
        }),
        BlockBody::Text(TextBlock {
            heading: bilingual("О нас", "About"),
            body: LocalizedText::new("Строка один\nСтрока два"),
        }),
        BlockBody::Image(ImageBlock {
            url: "/media/office.jpg".into(),
            caption: bilingual("Офис", "Office"),
        }),
        BlockBody::Gallery(GalleryBlock {
            images: vec!["/a.jpg".into(), "/b.jpg".into(), "/c.jpg".into()],
        }),
        BlockBody::Video(VideoBlock {
            source: VideoSource::Embed,
            url: "https://youtu.be/dQw4w9WgXcQ".into(),
            title: bilingual("Видео", "Video"),
        }),
        BlockBody::Form(FormBlock {
            form_slug: "contact".into(),
        }),
        BlockBody::Cards(CardsBlock {
            title: bilingual("Направления", "Directions"),
            items: vec![
                CardItem {
                    title: bilingual("Консалтинг", "Consulting"),
                    description: LocalizedText::new("Описание"),
                    image_url: "/c1.jpg".into(),
                    icon_url: "/i1.svg".into(),
                    link: "/services/consulting".into(),
                },
                CardItem::default(),
            ],
        }),
        BlockBody::Stats(StatsBlock {
            items: vec![StatItem {
                value: "500".into(),
                suffix: "+".into(),
                label: bilingual("Клиентов", "Clients"),
            }],
        }),
        BlockBody::LogoGrid(LogoGridBlock {
            items: vec![logo(1), logo(2)],
        }),
        BlockBody::Cta(CtaBlock {
            title: bilingual("Начнём?", "Shall we start?"),
            body: LocalizedText::new("Оставьте заявку"),
            button_label: bilingual("Написать", "Write"),
            button_href: "https://t.me/folio".into(),
            background_image: String::new(),
        }),
        BlockBody::List(ListBlock {
            title: bilingual("Преимущества", "Advantages"),
            items: vec!["Скорость".into(), "Качество".into(), "Цена".into()],
            items_en: vec!["Speed".into()],
        }),
        BlockBody::Collection(CollectionBlock {
            title: bilingual("Кейсы", "Cases"),
            collection: Some(CollectionName::Cases),
            unlisted_collection: None,
            limit: 3,
            detail_prefix: "/cases".into(),
        }),
        BlockBody::Html(HtmlBlock {
            html: bilingual("<p>Привет</p>", "<p>Hi</p>"),
        }),
        BlockBody::Marquee(MarqueeBlock {
            items: vec![logo(3), logo(4), logo(5)],
        }),
        BlockBody::Spacer(SpacerBlock { size: 96 }),
    ]
}

fn sample_page() -> Page {
    let mut page = Page::new("about", bilingual("О компании", "About us"));
    page.id = Some("page-1".into());
    page.full_width = true;
    page.blocks = every_block()
        .into_iter()
        .enumerate()
        .map(|(i, body)| Block::new(BlockId::new(format!("b{i}")), body))
        .collect();
    page
}

#[test]
fn every_block_type_round_trips_through_json() -> Result<(), ModelError> {
    let page = sample_page();
    let decoded = Page::from_value(page.to_value())?;
    assert_eq!(decoded, page);
    Ok(())
}

#[test]
fn round_trip_through_serde_text() -> Result<(), serde_json::Error> {
    let page = sample_page();
    let text = serde_json::to_string(&page)?;
    let decoded: Page = serde_json::from_str(&text)?;
    let ids: Vec<&str> = decoded.blocks.iter().map(|b| b.id().as_str()).collect();
    let expected: Vec<String> = (0..page.blocks.len()).map(|i| format!("b{i}")).collect();
    assert_eq!(ids, expected);
    assert_eq!(decoded, page);
    Ok(())
}

#[test]
fn wire_shape_keeps_bilingual_pairs() {
    let value = sample_page().to_value();
    let hero = &value["blocks"][0];
    assert_eq!(hero["type"], "hero");
    assert_eq!(hero["title"], "Заголовок");
    assert_eq!(hero["title_en"], "Title");
    assert_eq!(hero["liquid_settings"]["mouseForce"], 12.5);
    assert_eq!(value["blocks"][8]["type"], "logo_grid");
}
