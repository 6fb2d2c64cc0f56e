//! # Edit session
//!
//! One editing session over a single content document. The session owns
//! the working tree and its last-saved baseline; every mutation goes
//! through [`EditSession::apply`] or the structural helpers, each of which
//! replaces the working tree wholesale and recomputes the dirty flag
//! against the baseline.
//!
//! All mutations are synchronous and run to completion before the next
//! user action is processed; the only suspension points are collaborator
//! calls (save, confirmation). While a save is in flight the rest of the
//! tree stays editable — only further saves are gated.

use std::sync::Arc;

use serde_json::Value;

use pagecraft_common::IdGenerator;
use pagecraft_schema::{FieldConfig, PageSchema};

use crate::collaborators::{ConfirmOutcome, ConfirmRequest, Confirmation, ContentStore, StoreError};
use crate::errors::EditorError;
use crate::fields::FieldUpdate;
use crate::navigation::NavigationStack;
use crate::path::{self, NodePath};
use crate::structure::{self, ActivePanel, BlockSummary};

/// Outcome of a save request
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { message: String },
    /// A save was already in flight; this request was dropped, not queued
    InFlight,
}

pub struct EditSession {
    content_path: String,
    schema: Arc<PageSchema>,
    /// Tree at the last successful load/save
    baseline: Value,
    /// Tree being edited
    working: Value,
    dirty: bool,
    saving: bool,
    ids: IdGenerator,
    pub nav: NavigationStack,
    pub panel: ActivePanel,
}

impl EditSession {
    pub fn new(content_path: impl Into<String>, tree: Value, schema: PageSchema) -> Self {
        let content_path = content_path.into();
        let schema = Arc::new(schema);
        Self {
            ids: IdGenerator::new(&content_path),
            nav: NavigationStack::new(Arc::clone(&schema)),
            baseline: tree.clone(),
            working: tree,
            dirty: false,
            saving: false,
            panel: ActivePanel::Idle,
            schema,
            content_path,
        }
    }

    pub fn content_path(&self) -> &str {
        &self.content_path
    }

    pub fn schema(&self) -> &PageSchema {
        &self.schema
    }

    pub fn tree(&self) -> &Value {
        &self.working
    }

    pub fn baseline(&self) -> &Value {
        &self.baseline
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Data under the current frame's path, if any frame is selected
    pub fn data_at_frame(&self) -> Option<&Value> {
        let frame = self.nav.current()?;
        path::get(&self.working, &frame.path)
    }

    /// Block rows for the structure panel
    pub fn block_summaries(&self) -> Vec<BlockSummary> {
        structure::block_summaries(&self.working, &self.schema)
    }

    fn replace_working(&mut self, next: Value) {
        self.working = next;
        self.dirty = self.baseline != self.working;
    }

    /// Apply one field update — the sole write path for field edits.
    ///
    /// The path is validated against the working tree before anything
    /// moves, so a rejected update leaves the session untouched.
    pub fn apply(&mut self, update: FieldUpdate) -> Result<(), EditorError> {
        path::check(&self.working, &update.path)?;
        let tree = std::mem::take(&mut self.working);
        let next = path::set(tree, &update.path, update.value)?;
        self.replace_working(next);
        Ok(())
    }

    /// Select a block for editing; targets the block's data subtree
    pub fn select_block(&mut self, index: usize) -> bool {
        let target = structure::blocks_container().index(index).child("data");
        self.select_path(target)
    }

    /// Select a global section by bare key, or any explicit dotted path
    /// (`page.seo`, `globals.header`, ...)
    pub fn select_section(&mut self, key_or_path: &str) -> bool {
        let target = if key_or_path.contains('.') {
            match NodePath::parse(key_or_path) {
                Ok(path) => path,
                Err(_) => return false,
            }
        } else {
            NodePath::default().child("globals").child(key_or_path)
        };
        self.select_path(target)
    }

    fn select_path(&mut self, target: NodePath) -> bool {
        let selected = self.nav.select(&target, &self.working);
        if selected {
            self.panel.open_editing();
        }
        selected
    }

    /// Close the editing surface: clears the whole stack, unlike
    /// `nav.go_back(0)` which keeps the root frame
    pub fn close_editing(&mut self) {
        self.nav.clear();
        self.panel.close();
    }

    pub fn add_block(&mut self, block_type: &str) -> Result<(), EditorError> {
        let next =
            structure::add_block(self.working.clone(), &self.schema, block_type, &mut self.ids)?;
        self.replace_working(next);
        Ok(())
    }

    /// Delete the block at `index` after an affirmative confirmation.
    /// Returns whether the block was removed; cancellation leaves the tree
    /// untouched and is not an error.
    pub async fn delete_block(
        &mut self,
        index: usize,
        confirmation: &dyn Confirmation,
    ) -> Result<bool, EditorError> {
        let request = ConfirmRequest::new(
            "Confirm deletion",
            "Are you sure you want to delete this block? This action cannot be undone.",
        )
        .with_confirm_text("Delete")
        .with_cancel_text("Cancel");
        match confirmation.confirm(request).await {
            ConfirmOutcome::Cancelled => Ok(false),
            ConfirmOutcome::Confirmed(_) => {
                let next =
                    structure::remove_at(self.working.clone(), &structure::blocks_container(), index)?;
                self.replace_working(next);
                Ok(true)
            }
        }
    }

    pub fn reorder_blocks(&mut self, old_index: usize, new_index: usize) -> Result<(), EditorError> {
        let next = structure::reorder(
            self.working.clone(),
            &structure::blocks_container(),
            old_index,
            new_index,
        )?;
        self.replace_working(next);
        Ok(())
    }

    /// Drop handler for the block list: both ends arrive as ids
    pub fn move_block(&mut self, active_id: &str, over_id: &str) -> Result<(), EditorError> {
        let next = structure::reorder_by_ids(
            self.working.clone(),
            &structure::blocks_container(),
            active_id,
            over_id,
        )?;
        self.replace_working(next);
        Ok(())
    }

    /// Append a repeater item. Immediate — repeater items are not
    /// confirmation-gated, unlike block deletion.
    pub fn add_repeater_item(
        &mut self,
        container: &NodePath,
        item_fields: &[FieldConfig],
    ) -> Result<(), EditorError> {
        let next = structure::add_repeater_item(
            self.working.clone(),
            container,
            item_fields,
            &mut self.ids,
        )?;
        self.replace_working(next);
        Ok(())
    }

    /// Remove a repeater item immediately (intentional asymmetry with
    /// block deletion)
    pub fn remove_repeater_item(
        &mut self,
        container: &NodePath,
        index: usize,
    ) -> Result<(), EditorError> {
        let next = structure::remove_at(self.working.clone(), container, index)?;
        self.replace_working(next);
        Ok(())
    }

    pub fn reorder_items(
        &mut self,
        container: &NodePath,
        old_index: usize,
        new_index: usize,
    ) -> Result<(), EditorError> {
        let next = structure::reorder(self.working.clone(), container, old_index, new_index)?;
        self.replace_working(next);
        Ok(())
    }

    /// Drop handler for a repeater list
    pub fn move_item(
        &mut self,
        container: &NodePath,
        active_id: &str,
        over_id: &str,
    ) -> Result<(), EditorError> {
        let next =
            structure::reorder_by_ids(self.working.clone(), container, active_id, over_id)?;
        self.replace_working(next);
        Ok(())
    }

    /// Persist the working tree.
    ///
    /// Single-flight: a save issued while another is in flight is dropped,
    /// not queued. On success the working tree becomes the new baseline;
    /// on failure both the working tree and the dirty flag are left
    /// untouched so the edits can be retried.
    pub async fn save(&mut self, store: &dyn ContentStore) -> Result<SaveOutcome, StoreError> {
        if self.saving {
            return Ok(SaveOutcome::InFlight);
        }
        self.saving = true;
        let result = store.save(&self.content_path, &self.working).await;
        self.saving = false;
        match result {
            Ok(receipt) => {
                self.baseline = self.working.clone();
                self.dirty = false;
                Ok(SaveOutcome::Saved {
                    message: receipt.message,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Adopt freshly loaded content as the new baseline — the post-save
    /// refresh, where the store's copy becomes authoritative again
    pub fn reload(&mut self, tree: Value) {
        self.baseline = tree.clone();
        self.working = tree;
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::SaveReceipt;
    use crate::fields;
    use async_trait::async_trait;
    use serde_json::json;

    fn schema() -> PageSchema {
        serde_json::from_value(json!({
            "blocks": {
                "hero": { "label": "Hero", "fields": [
                    { "type": "string", "label": "Title", "name": "title" }
                ], "defaultData": { "title": "" } }
            }
        }))
        .unwrap()
    }

    fn tree() -> Value {
        json!({
            "page": { "blocks": [
                { "id": "b1", "type": "hero", "data": { "title": "Hi" } }
            ]},
            "globals": {}
        })
    }

    struct OkStore;

    #[async_trait]
    impl ContentStore for OkStore {
        async fn load(&self, path: &str) -> Result<crate::ContentPayload, StoreError> {
            Err(StoreError::NotFound(path.to_string()))
        }
        async fn save(&self, _path: &str, _tree: &Value) -> Result<SaveReceipt, StoreError> {
            Ok(SaveReceipt {
                message: "Saved".to_string(),
            })
        }
        async fn list(&self) -> Result<Vec<crate::ContentGroup>, StoreError> {
            Ok(Vec::new())
        }
        async fn create(&self, _: &str, _: &str) -> Result<crate::CreatedContent, StoreError> {
            Err(StoreError::Validation("unsupported".to_string()))
        }
        async fn delete(&self, _: &str) -> Result<SaveReceipt, StoreError> {
            Err(StoreError::Validation("unsupported".to_string()))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ContentStore for FailingStore {
        async fn load(&self, path: &str) -> Result<crate::ContentPayload, StoreError> {
            Err(StoreError::NotFound(path.to_string()))
        }
        async fn save(&self, _path: &str, _tree: &Value) -> Result<SaveReceipt, StoreError> {
            Err(StoreError::Network("connection reset".to_string()))
        }
        async fn list(&self) -> Result<Vec<crate::ContentGroup>, StoreError> {
            Ok(Vec::new())
        }
        async fn create(&self, _: &str, _: &str) -> Result<crate::CreatedContent, StoreError> {
            Err(StoreError::Validation("unsupported".to_string()))
        }
        async fn delete(&self, _: &str) -> Result<SaveReceipt, StoreError> {
            Err(StoreError::Validation("unsupported".to_string()))
        }
    }

    #[test]
    fn dirty_tracks_divergence_from_the_baseline() {
        let mut session = EditSession::new("/", tree(), schema());
        assert!(!session.is_dirty());

        session.select_block(0);
        let frame = session.nav.current().unwrap().clone();
        session
            .apply(fields::field_update(&frame, "title", json!("Bye")))
            .unwrap();
        assert!(session.is_dirty());

        // writing the baseline value back clears it again
        session
            .apply(fields::field_update(&frame, "title", json!("Hi")))
            .unwrap();
        assert!(!session.is_dirty());
    }

    #[test]
    fn writing_an_equal_value_stays_clean() {
        let mut session = EditSession::new("/", tree(), schema());
        session.select_block(0);
        let frame = session.nav.current().unwrap().clone();
        session
            .apply(fields::field_update(&frame, "title", json!("Hi")))
            .unwrap();
        assert!(!session.is_dirty());
    }

    #[test]
    fn rejected_updates_leave_the_session_untouched() {
        let mut session = EditSession::new("/", tree(), schema());
        let before = session.tree().clone();
        let bad = FieldUpdate {
            path: NodePath::parse("page.blocks.title").unwrap(),
            value: json!("x"),
        };
        assert!(session.apply(bad).is_err());
        assert_eq!(session.tree(), &before);
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn save_promotes_the_working_tree_to_baseline() {
        let mut session = EditSession::new("/", tree(), schema());
        session.select_block(0);
        let frame = session.nav.current().unwrap().clone();
        session
            .apply(fields::field_update(&frame, "title", json!("Bye")))
            .unwrap();
        assert!(session.is_dirty());

        let outcome = session.save(&OkStore).await.unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                message: "Saved".to_string()
            }
        );
        assert!(!session.is_dirty());
        assert_eq!(session.baseline(), session.tree());
    }

    #[tokio::test]
    async fn failed_saves_keep_the_edits_and_the_dirty_flag() {
        let mut session = EditSession::new("/", tree(), schema());
        session.select_block(0);
        let frame = session.nav.current().unwrap().clone();
        session
            .apply(fields::field_update(&frame, "title", json!("Bye")))
            .unwrap();

        let err = session.save(&FailingStore).await.unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));
        assert!(session.is_dirty());
        assert!(!session.is_saving());
        assert_eq!(
            path::get(session.tree(), &NodePath::parse("page.blocks.0.data.title").unwrap()),
            Some(&json!("Bye"))
        );
    }

    #[tokio::test]
    async fn a_second_save_while_one_is_in_flight_is_dropped() {
        let mut session = EditSession::new("/", tree(), schema());
        session.saving = true;
        let outcome = session.save(&OkStore).await.unwrap();
        assert_eq!(outcome, SaveOutcome::InFlight);
        // the guard did not flip anything
        assert!(session.is_saving());
    }

    #[test]
    fn reload_adopts_the_stores_copy() {
        let mut session = EditSession::new("/", tree(), schema());
        session.select_block(0);
        let frame = session.nav.current().unwrap().clone();
        session
            .apply(fields::field_update(&frame, "title", json!("Bye")))
            .unwrap();

        let fresh = json!({ "page": { "blocks": [] }, "globals": {} });
        session.reload(fresh.clone());
        assert_eq!(session.tree(), &fresh);
        assert_eq!(session.baseline(), &fresh);
        assert!(!session.is_dirty());
    }

    #[test]
    fn selection_flips_the_panel_to_editing() {
        let mut session = EditSession::new("/", tree(), schema());
        assert!(session.select_block(0));
        assert!(session.panel.is_editing());

        session.close_editing();
        assert!(session.nav.is_empty());
        assert_eq!(session.panel, ActivePanel::Idle);

        // unresolvable selection: no panel flip, stack stays empty
        assert!(!session.select_section("missing"));
        assert!(session.nav.is_empty());
        assert_eq!(session.panel, ActivePanel::Idle);
    }
}
