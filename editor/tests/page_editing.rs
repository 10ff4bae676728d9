//! Page editing scenarios: ordering, item edits and the save contract.

use folio_editor::{
    AdminSession, BlockEdit, Direction, FieldValue, Notice, Operation, PageEditor, SessionState,
};
use folio_gateway::{ContentGateway, MemoryGateway, PAGES};
use folio_model::{BlockBody, BlockId, BlockType, Lang, LocalizedText};
use proptest::prelude::*;

fn editor_with(count: usize) -> (PageEditor, Vec<BlockId>) {
    let mut editor = PageEditor::create("home", LocalizedText::new("Главная"));
    let ids = (0..count)
        .map(|i| {
            let kind = if i % 2 == 0 { BlockType::Text } else { BlockType::Spacer };
            editor.add_block(kind)
        })
        .collect();
    (editor, ids)
}

fn order(editor: &PageEditor) -> Vec<BlockId> {
    editor.page().blocks.iter().map(|b| b.id().clone()).collect()
}

proptest! {
    #[test]
    fn down_then_up_restores_order(count in 2usize..8, pick in 0usize..8) {
        let (mut editor, ids) = editor_with(count);
        let index = pick % (count - 1);
        let id = ids[index].clone();
        prop_assert!(editor.move_block(&id, Direction::Down));
        prop_assert_eq!(&order(&editor)[index + 1], &id);
        prop_assert!(editor.move_block(&id, Direction::Up));
        prop_assert_eq!(order(&editor), ids);
    }

    #[test]
    fn edges_do_not_move(count in 1usize..8) {
        let (mut editor, ids) = editor_with(count);
        prop_assert!(!editor.move_block(&ids[0], Direction::Up));
        prop_assert!(!editor.move_block(&ids[count - 1], Direction::Down));
        prop_assert_eq!(order(&editor), ids);
    }
}

#[test]
fn card_items_are_edited_in_place() {
    let (mut editor, _) = editor_with(0);
    let cards = editor.add_block(BlockType::Cards);
    for _ in 0..2 {
        editor
            .apply_edit(&cards, &BlockEdit::AddEntry { field: "items".into() })
            .expect("add card");
    }
    editor
        .apply_edit(
            &cards,
            &BlockEdit::SetItemLocalized {
                field: "items".into(),
                index: 1,
                key: "title".into(),
                lang: Lang::En,
                value: "Audit".into(),
            },
        )
        .expect("title card");
    editor
        .apply_edit(
            &cards,
            &BlockEdit::MoveEntry {
                field: "items".into(),
                index: 1,
                direction: Direction::Up,
            },
        )
        .expect("move card");

    let block = editor.page().block(&cards).expect("cards block");
    let BlockBody::Cards(body) = block.body() else {
        panic!("cards block changed type");
    };
    assert_eq!(body.items.len(), 2);
    assert_eq!(body.items[0].title.get(Lang::En), "Audit");
    assert_eq!(block.id(), &cards);

    let surface = folio_editor::describe(block).expect("describe");
    assert!(matches!(&surface[1].1, FieldValue::Items(items) if items.len() == 2));
}

#[test]
fn rejected_edit_changes_nothing() {
    let (mut editor, ids) = editor_with(1);
    let before = editor.clone();
    let err = editor.apply_edit(
        &ids[0],
        &BlockEdit::SetFlag {
            field: "heading".into(),
            value: true,
        },
    );
    assert!(err.is_err());
    assert_eq!(editor, before);
}

#[test]
fn expired_session_keeps_unsaved_page() {
    let store = MemoryGateway::new().with_credentials("admin", "secret");
    let mut session = AdminSession::new();
    session.login(&store, "admin", "secret").expect("login");

    let (mut editor, _) = editor_with(3);
    editor.save(&store).expect("first save");
    editor.set_title(Lang::En, "Home");
    let before = editor.clone();

    store.expire_session();
    let result = editor.save(&store);
    let notice = session.guard(&store, Operation::Save, result);

    assert_eq!(notice, Err(Notice::SessionExpired));
    assert_eq!(session.state(), SessionState::Expired);
    assert_eq!(editor, before);
    assert!(editor.is_dirty());

    let stored = store.get(PAGES, "home").expect("read").expect("stored page");
    assert_eq!(stored.text("title_en"), "");
}
