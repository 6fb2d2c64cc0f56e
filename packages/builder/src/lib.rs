//! # Pagecraft Builder
//!
//! Host-facing glue around the editing core: filesystem-backed content and
//! asset stores, a notification model, content-management flows and the
//! top-level [`PageBuilder`] orchestrator that wires an [`EditSession`]
//! to its collaborators.
//!
//! The core never talks to disk or network on its own; everything going in
//! or out of the session passes through the collaborator contracts defined
//! in `pagecraft-editor`, and this crate ships the default implementations
//! a host can start from.
//!
//! [`EditSession`]: pagecraft_editor::EditSession

pub mod assets;
pub mod builder;
pub mod manage;
pub mod notify;
pub mod store;

pub use assets::FsAssetStore;
pub use builder::{AutoCancel, AutoConfirm, PageBuilder};
pub use manage::DeleteOutcome;
pub use notify::{BufferedNotifier, Notice, Notifier, Severity};
pub use store::{FsContentStore, MemoryContentStore};
