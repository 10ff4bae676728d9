//! Pages: a slug, a bilingual title and an ordered list of blocks.

use std::collections::HashSet;

use crate::block::{Block, BlockId};
use crate::error::ModelError;
use crate::lang::LocalizedText;
use crate::record::{record_serde, Document, Record};

/// A dynamic page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Gateway identifier; `None` until the page is first saved.
    pub id: Option<String>,
    /// URL slug, unique across pages.
    pub slug: String,
    /// Page title.
    pub title: LocalizedText,
    /// Suppress the rendered page title.
    pub hide_title: bool,
    /// Let blocks span the whole viewport width.
    pub full_width: bool,
    /// Blocks in render order. Block ids are unique within the page.
    pub blocks: Vec<Block>,
}

impl Page {
    /// Creates an empty, unsaved page.
    pub fn new(slug: impl Into<String>, title: LocalizedText) -> Self {
        Self {
            slug: slug.into(),
            title,
            ..Self::default()
        }
    }

    /// Finds a block by id.
    #[must_use]
    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    /// Position of a block in the render order.
    #[must_use]
    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// Returns true when the page is full width and opens with a full-bleed
    /// hero. Such pages drop their top padding.
    #[must_use]
    pub fn opens_full_bleed(&self) -> bool {
        self.full_width && self.blocks.first().is_some_and(Block::is_full_bleed_hero)
    }
}

impl Document for Page {
    fn to_record(&self) -> Record {
        let mut r = Record::new();
        if let Some(id) = &self.id {
            r.set("id", id.as_str());
        }
        r.set("slug", self.slug.as_str());
        r.put_localized("title", &self.title);
        r.set("hide_title", self.hide_title);
        r.set("full_width", self.full_width);
        r.put_records("blocks", self.blocks.iter().map(Document::to_record).collect());
        r
    }

    /// Decodes a page. A block whose id repeats an earlier one gets a fresh id.
    fn from_record(r: &Record) -> Result<Self, ModelError> {
        let mut seen = HashSet::new();
        let mut blocks = Vec::new();
        for record in r.records("blocks") {
            let mut block = Block::from_record(&record)?;
            if !seen.insert(block.id().clone()) {
                block = block.with_id(BlockId::generate());
                seen.insert(block.id().clone());
            }
            blocks.push(block);
        }
        Ok(Page {
            id: r.opt_text("id").or_else(|| r.opt_text("_id")),
            slug: r.text("slug"),
            title: r.localized("title"),
            hide_title: r.flag("hide_title"),
            full_width: r.flag("full_width"),
            blocks,
        })
    }
}

record_serde!(Page);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::block::BlockType;

    #[test]
    fn duplicate_block_ids_are_reassigned() -> Result<(), ModelError> {
        let page = Page::from_value(json!({
            "slug": "about",
            "blocks": [
                {"id": "a", "type": "text"},
                {"id": "a", "type": "spacer"},
            ]
        }))?;
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].id().as_str(), "a");
        assert_ne!(page.blocks[1].id().as_str(), "a");
        assert_eq!(page.blocks[1].block_type(), Some(BlockType::Spacer));
        Ok(())
    }

    #[test]
    fn full_bleed_needs_full_width_and_leading_hero() -> Result<(), ModelError> {
        let mut page = Page::from_value(json!({
            "slug": "home",
            "full_width": true,
            "blocks": [{"id": "h", "type": "hero", "full_bleed": true}]
        }))?;
        assert!(page.opens_full_bleed());
        assert_eq!(page.position(&BlockId::new("h")), Some(0));
        page.full_width = false;
        assert!(!page.opens_full_bleed());
        page.full_width = true;
        page.blocks.insert(0, Block::create(BlockType::Spacer));
        assert!(!page.opens_full_bleed());
        Ok(())
    }

    #[test]
    fn unsaved_page_has_no_id_on_the_wire() {
        let page = Page::new("contact", LocalizedText::new("Контакты"));
        let value = page.to_value();
        assert!(value.get("id").is_none());
        assert_eq!(value["title"], "Контакты");
        assert_eq!(value["title_en"], "");
    }
}
