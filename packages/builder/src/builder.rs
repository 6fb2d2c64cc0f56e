//! # Page builder orchestration
//!
//! [`PageBuilder`] owns one [`EditSession`] plus the collaborator handles
//! and turns host actions (select, edit, add, delete, reorder, save,
//! upload) into session calls. Collaborator failures become notices; the
//! working tree is never discarded on an error.

use serde_json::Value;
use tracing::{info, warn};

use pagecraft_editor::{
    AssetStore, AssetUpload, ConfirmOutcome, Confirmation, ContentGroup, ContentStore,
    CreatedContent, EditSession, FieldUpdate, NodePath, SaveOutcome, StoreError,
};
use pagecraft_schema::BuilderConfig;

use crate::manage::{self, DeleteOutcome};
use crate::notify::{Notice, Notifier};

pub struct PageBuilder<S, A, C, N> {
    content_path: String,
    config: BuilderConfig,
    store: S,
    assets: A,
    confirmation: C,
    notifier: N,
    /// None until loaded, and again when the store reports no content at
    /// the path (the absence state, distinct from an error)
    session: Option<EditSession>,
}

impl<S, A, C, N> PageBuilder<S, A, C, N>
where
    S: ContentStore,
    A: AssetStore,
    C: Confirmation,
    N: Notifier,
{
    pub fn new(
        content_path: impl Into<String>,
        config: BuilderConfig,
        store: S,
        assets: A,
        confirmation: C,
        notifier: N,
    ) -> Self {
        Self {
            content_path: content_path.into(),
            config,
            store,
            assets,
            confirmation,
            notifier,
            session: None,
        }
    }

    pub fn content_path(&self) -> &str {
        &self.content_path
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Load the document at the builder's path.
    ///
    /// Returns whether content exists there: NotFound is the absence state
    /// and not an error, so the host can offer creation instead of a
    /// banner. Transport and shape errors are notified and propagated for
    /// a retry affordance.
    pub async fn load(&mut self) -> Result<bool, StoreError> {
        match self.store.load(&self.content_path).await {
            Ok(payload) => {
                let schema = payload.schema.merge_globals(&self.config.global_schemas);
                self.session = Some(EditSession::new(&self.content_path, payload.tree, schema));
                info!(path = %self.content_path, "content loaded");
                Ok(true)
            }
            Err(StoreError::NotFound(_)) => {
                self.session = None;
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, path = %self.content_path, "loading content failed");
                self.notifier.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Apply one field update; errors are notified, the tree is untouched
    pub fn update_field(&mut self, update: FieldUpdate) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.apply(update) {
            warn!(error = %err, "field update rejected");
            self.notifier.notify(Notice::error(err.to_string()));
        }
    }

    pub fn add_block(&mut self, block_type: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.add_block(block_type) {
            warn!(error = %err, block_type, "adding block failed");
            self.notifier.notify(Notice::error(err.to_string()));
        }
    }

    /// Confirmation-gated block deletion; returns whether a block was
    /// removed
    pub async fn delete_block(&mut self, index: usize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.delete_block(index, &self.confirmation).await {
            Ok(removed) => removed,
            Err(err) => {
                warn!(error = %err, index, "deleting block failed");
                self.notifier.notify(Notice::error(err.to_string()));
                false
            }
        }
    }

    pub fn reorder_blocks(&mut self, old_index: usize, new_index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.reorder_blocks(old_index, new_index) {
            warn!(error = %err, "reordering blocks failed");
            self.notifier.notify(Notice::error(err.to_string()));
        }
    }

    /// Drop handler for the structure panel's block list
    pub fn move_block(&mut self, active_id: &str, over_id: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.move_block(active_id, over_id) {
            warn!(error = %err, "moving block failed");
            self.notifier.notify(Notice::error(err.to_string()));
        }
    }

    /// Persist the session, then refresh it from the store so the saved
    /// copy becomes authoritative again
    pub async fn save(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.save(&self.store).await {
            Ok(SaveOutcome::Saved { message }) => {
                self.notifier.notify(Notice::success(message));
                if let Ok(payload) = self.store.load(&self.content_path).await {
                    session.reload(payload.tree);
                }
            }
            Ok(SaveOutcome::InFlight) => {}
            Err(err) => {
                warn!(error = %err, path = %self.content_path, "saving content failed");
                self.notifier.notify(Notice::error(err.to_string()));
            }
        }
    }

    /// Upload an image and write its public path at `target`
    pub async fn upload_image(&mut self, target: NodePath, upload: AssetUpload) {
        match self.assets.upload(upload).await {
            Ok(asset) => {
                self.update_field(FieldUpdate {
                    path: target,
                    value: Value::String(asset.file_path),
                });
            }
            Err(err) => {
                warn!(error = %err, "image upload failed");
                self.notifier.notify(Notice::error("Image upload failed.".to_string()));
            }
        }
    }

    pub async fn list_content(&self) -> Vec<ContentGroup> {
        manage::list_content(&self.store, &self.notifier).await
    }

    /// Create a document of `type_id`, prompting for its name through the
    /// confirmation collaborator
    pub async fn create_content(&self, type_id: &str) -> Option<CreatedContent> {
        let type_label = self
            .config
            .content_types
            .get(type_id)
            .map(|config| config.label.clone())
            .unwrap_or_else(|| type_id.to_string());
        manage::create_content(
            &self.store,
            &self.confirmation,
            &self.notifier,
            type_id,
            &type_label,
        )
        .await
    }

    pub async fn delete_content(&self, path: &str) -> DeleteOutcome {
        manage::delete_content(
            &self.store,
            &self.confirmation,
            &self.notifier,
            path,
            Some(self.content_path.as_str()),
        )
        .await
    }
}

// Confirmation gating helper used by tests and simple hosts: approve
// everything, cancel everything.
pub struct AutoConfirm;

#[async_trait::async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&self, _request: pagecraft_editor::ConfirmRequest) -> ConfirmOutcome {
        ConfirmOutcome::Confirmed(String::new())
    }
}

pub struct AutoCancel;

#[async_trait::async_trait]
impl Confirmation for AutoCancel {
    async fn confirm(&self, _request: pagecraft_editor::ConfirmRequest) -> ConfirmOutcome {
        ConfirmOutcome::Cancelled
    }
}
