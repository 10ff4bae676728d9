//! The page aggregate: an in-memory page under edit.
//!
//! Edits accumulate in memory; nothing reaches the gateway until
//! [`PageEditor::save`]. A failed save leaves the page exactly as it was.

use std::collections::HashSet;

use folio_gateway::documents::{fetch_page, save_document};
use folio_gateway::{ContentGateway, GatewayError, PAGES};
use folio_model::{Block, BlockId, BlockType, Lang, LocalizedText, Page};
use tracing::{debug, info, warn};

use crate::block::{apply_edit, BlockEdit};
use crate::error::{EditError, SaveError};
use crate::order::{swap_neighbor, Direction};

/// A page being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEditor {
    page: Page,
    dirty: bool,
}

impl PageEditor {
    /// Starts editing a page.
    pub fn new(page: Page) -> Self {
        Self { page, dirty: false }
    }

    /// Starts editing a new, unsaved page.
    pub fn create(slug: impl Into<String>, title: LocalizedText) -> Self {
        Self {
            page: Page::new(slug, title),
            dirty: true,
        }
    }

    /// Loads a page by slug or id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the fetch fails or the stored page is
    /// malformed.
    pub fn open<G: ContentGateway + ?Sized>(
        gateway: &G,
        key: &str,
    ) -> Result<Option<Self>, GatewayError> {
        Ok(fetch_page(gateway, key)?.map(Self::new))
    }

    /// The page in its current edited state.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Returns true when there are edits not yet saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Appends a new block of the given type with default fields and a fresh
    /// id. Returns the id.
    pub fn add_block(&mut self, block_type: BlockType) -> BlockId {
        let block = self.fresh_block(block_type);
        let id = block.id().clone();
        self.page.blocks.push(block);
        self.dirty = true;
        id
    }

    /// Inserts a new block at `index`, clamped to the end. Returns the id.
    pub fn insert_block(&mut self, index: usize, block_type: BlockType) -> BlockId {
        let block = self.fresh_block(block_type);
        let id = block.id().clone();
        let index = index.min(self.page.blocks.len());
        self.page.blocks.insert(index, block);
        self.dirty = true;
        id
    }

    fn fresh_block(&self, block_type: BlockType) -> Block {
        let mut block = Block::create(block_type);
        while self.page.block(block.id()).is_some() {
            block = block.with_id(BlockId::generate());
        }
        block
    }

    /// Removes the block with this id. Returns the removed block, or `None`
    /// when there is no such block. Other blocks keep their ids.
    pub fn remove_block(&mut self, id: &BlockId) -> Option<Block> {
        let index = self.page.position(id)?;
        self.dirty = true;
        Some(self.page.blocks.remove(index))
    }

    /// Swaps the block with its neighbor. Returns false, changing nothing,
    /// when the block is absent or already at that edge.
    pub fn move_block(&mut self, id: &BlockId, direction: Direction) -> bool {
        let Some(index) = self.page.position(id) else {
            return false;
        };
        let moved = swap_neighbor(&mut self.page.blocks, index, direction).is_some();
        self.dirty |= moved;
        moved
    }

    /// Rearranges the blocks into the given order.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NotAPermutation`] unless `order` names every
    /// current block exactly once.
    pub fn reorder(&mut self, order: &[BlockId]) -> Result<(), EditError> {
        let unique: HashSet<&BlockId> = order.iter().collect();
        if order.len() != self.page.blocks.len()
            || unique.len() != order.len()
            || order.iter().any(|id| self.page.block(id).is_none())
        {
            return Err(EditError::NotAPermutation);
        }
        let mut blocks = std::mem::take(&mut self.page.blocks);
        let mut reordered = Vec::with_capacity(blocks.len());
        for id in order {
            if let Some(index) = blocks.iter().position(|b| b.id() == id) {
                reordered.push(blocks.swap_remove(index));
            }
        }
        self.page.blocks = reordered;
        self.dirty = true;
        Ok(())
    }

    /// Applies an edit to one block, replacing it with the edited value.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::BlockNotFound`] or the edit's own error; the page
    /// is unchanged on error.
    pub fn apply_edit(&mut self, id: &BlockId, edit: &BlockEdit) -> Result<(), EditError> {
        let index = self
            .page
            .position(id)
            .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;
        let edited = apply_edit(&self.page.blocks[index], edit)?;
        self.page.blocks[index] = edited;
        self.dirty = true;
        Ok(())
    }

    /// Sets the page title for one language.
    pub fn set_title(&mut self, lang: Lang, title: impl Into<String>) {
        self.page.title.set(lang, title);
        self.dirty = true;
    }

    /// Sets the URL slug.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.page.slug = slug.into();
        self.dirty = true;
    }

    /// Shows or hides the page title.
    pub fn set_hide_title(&mut self, hide: bool) {
        self.page.hide_title = hide;
        self.dirty = true;
    }

    /// Switches the full-width layout.
    pub fn set_full_width(&mut self, full_width: bool) {
        self.page.full_width = full_width;
        self.dirty = true;
    }

    /// Stores the page: created when it has no id yet, updated by id
    /// otherwise. On success the stored page (with its id) replaces the
    /// in-memory one.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Gateway`] when the call fails; the in-memory page
    /// is left untouched.
    pub fn save<G: ContentGateway + ?Sized>(&mut self, gateway: &G) -> Result<(), SaveError> {
        let id = self.page.id.clone();
        match save_document(gateway, PAGES, id.as_deref(), &self.page) {
            Ok(mut stored) => {
                if stored.id.is_none() {
                    stored.id = id;
                }
                info!(slug = %stored.slug, id = ?stored.id, "page saved");
                self.page = stored;
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                warn!(slug = %self.page.slug, error = %err, "page save failed");
                Err(err.into())
            }
        }
    }

    /// Deletes the stored page. The in-memory page is kept, without its id,
    /// so it can be saved again as a new page.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::NotSaved`] for a page that was never stored, or
    /// [`SaveError::Gateway`] when the call fails.
    pub fn delete<G: ContentGateway + ?Sized>(&mut self, gateway: &G) -> Result<(), SaveError> {
        let id = self.page.id.clone().ok_or(SaveError::NotSaved)?;
        gateway.delete(PAGES, &id)?;
        debug!(id = %id, "page deleted");
        self.page.id = None;
        self.dirty = true;
        Ok(())
    }
}
