//! # Collaborator contracts
//!
//! External capabilities the editing session consumes but does not
//! implement: content persistence, asset uploads, confirmation prompts and
//! block rendering. Each contract is deliberately narrow; the session calls
//! through these traits at its only suspension points, and everything else
//! runs synchronously on the working tree.
//!
//! No timeouts are imposed here — deadlines belong to the host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use pagecraft_schema::{Block, PageSchema};

/// Errors surfaced by persistence and asset collaborators
#[derive(Error, Debug)]
pub enum StoreError {
    /// No content exists at the requested path. Surfaced as an absence
    /// state, not an error banner.
    #[error("No content at {0:?}")]
    NotFound(String),

    /// Response is missing its required shape (no tree, no schema, ...)
    #[error("Invalid store response: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payload of a successful load: the content tree plus its schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPayload {
    pub tree: Value,
    pub schema: PageSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentGroup {
    pub id: String,
    pub label: String,
    pub items: Vec<ContentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedContent {
    pub path: String,
}

/// Content persistence collaborator
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn load(&self, path: &str) -> Result<ContentPayload, StoreError>;
    async fn save(&self, path: &str, tree: &Value) -> Result<SaveReceipt, StoreError>;
    async fn list(&self) -> Result<Vec<ContentGroup>, StoreError>;
    async fn create(&self, name: &str, type_id: &str) -> Result<CreatedContent, StoreError>;
    async fn delete(&self, path: &str) -> Result<SaveReceipt, StoreError>;
}

pub struct AssetUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedAsset {
    /// Public path of the stored asset
    pub file_path: String,
}

/// Asset upload collaborator
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(&self, upload: AssetUpload) -> Result<UploadedAsset, StoreError>;
}

/// Optional free-text input attached to a confirmation dialog
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    pub label: String,
    pub placeholder: Option<String>,
}

/// What a confirmation dialog should ask
#[derive(Debug, Clone, Default)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub confirm_text: Option<String>,
    pub cancel_text: Option<String>,
    pub prompt: Option<PromptSpec>,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = Some(text.into());
        self
    }

    pub fn with_cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    pub fn with_prompt(mut self, label: impl Into<String>, placeholder: Option<String>) -> Self {
        self.prompt = Some(PromptSpec {
            label: label.into(),
            placeholder,
        });
        self
    }
}

/// Outcome of a confirmation.
///
/// Cancellation is its own variant so callers can branch without
/// ambiguity; a confirmed dialog without a prompt carries the empty
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed(String),
    Cancelled,
}

impl ConfirmOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmOutcome::Confirmed(_))
    }
}

/// Yes/no (optionally prompting) confirmation collaborator
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, request: ConfirmRequest) -> ConfirmOutcome;
}

/// Pure block-rendering capability supplied by the host.
///
/// No side channel back into the tree: edit affordances are layered around
/// the returned view by the editing surface, never inside it.
pub trait BlockRenderer {
    type View;

    fn render(&self, block: &Block) -> Self::View;
}
