//! # Pagecraft Editor
//!
//! Core in-place editing engine for Pagecraft.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: declarative field/section model     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: session + navigation + mutations    │
//! │  - Path-addressed get/set over the tree     │
//! │  - Breadcrumb drill-down stack              │
//! │  - Field dispatch + conditional visibility  │
//! │  - Structural add/delete/reorder            │
//! │  - Dirty tracking + single-flight save      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ collaborators: store / assets / confirm     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One write path**: every edit becomes a path-addressed `set` on the
//!    working tree; nothing mutates content behind the session's back
//! 2. **Schema drives the surface**: what is editable, and how, is data
//! 3. **Pass-through tolerance**: content keys the schema does not declare
//!    are preserved, never dropped on save
//! 4. **Collaborators stay narrow**: persistence, uploads, rich text and
//!    confirmation are capabilities supplied by the host
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{EditSession, fields};
//!
//! let mut session = EditSession::new("/about", tree, schema);
//!
//! // Select the first block and read its editable fields
//! session.select_block(0);
//! let frame = session.nav.current().unwrap();
//! let view = fields::resolve_frame(&frame.config, session.data_at_frame());
//!
//! // Edit one field
//! let update = fields::field_update(frame, "title", "Hello".into());
//! session.apply(update)?;
//!
//! // Persist
//! session.save(&store).await?;
//! ```

pub mod collaborators;
pub mod errors;
pub mod fields;
pub mod navigation;
pub mod path;
pub mod session;
pub mod structure;

pub use collaborators::{
    AssetStore, AssetUpload, BlockRenderer, ConfirmOutcome, ConfirmRequest, Confirmation,
    ContentEntry, ContentGroup, ContentPayload, ContentStore, CreatedContent, PromptSpec,
    SaveReceipt, StoreError, UploadedAsset,
};
pub use errors::EditorError;
pub use fields::{
    DrillTarget, FieldUpdate, FieldWidget, FrameView, RepeaterItem, RepeaterView, ResolvedField,
};
pub use navigation::{Breadcrumb, FrameConfig, NavigationStack};
pub use path::{NodePath, PathError, Segment};
pub use session::{EditSession, SaveOutcome};
pub use structure::{ActivePanel, BlockSummary};
