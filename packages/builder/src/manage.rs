//! Content-management flows: listing documents, prompted creation and
//! confirmed deletion. These are the panel behaviors minus the chrome —
//! every outcome is reported through the notifier, and the store is only
//! touched after an affirmative confirmation.

use tracing::warn;

use pagecraft_editor::{
    ConfirmOutcome, ConfirmRequest, Confirmation, ContentGroup, ContentStore, CreatedContent,
};

use crate::notify::{Notice, Notifier};

/// Outcome of a confirmed deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted {
        /// The removed document was the one currently open; the host
        /// should navigate away instead of refreshing the listing
        was_current: bool,
    },
    Cancelled,
    Failed,
}

/// All content groups, or an empty listing (plus a notice) when the store
/// call fails
pub async fn list_content(store: &dyn ContentStore, notifier: &dyn Notifier) -> Vec<ContentGroup> {
    match store.list().await {
        Ok(groups) => groups,
        Err(err) => {
            warn!(error = %err, "listing content failed");
            notifier.notify(Notice::error(err.to_string()));
            Vec::new()
        }
    }
}

/// Create a document of `type_id`, prompting for its name.
///
/// A cancelled prompt or a blank name is a no-op. The name becomes the
/// document's URL, which is why it is asked for up front.
pub async fn create_content(
    store: &dyn ContentStore,
    confirmation: &dyn Confirmation,
    notifier: &dyn Notifier,
    type_id: &str,
    type_label: &str,
) -> Option<CreatedContent> {
    let request = ConfirmRequest::new(
        format!("Create a new {type_label}"),
        "Enter a name for this content. The name is used to generate its URL.",
    )
    .with_confirm_text("Create")
    .with_prompt("Content name", Some("e.g. My first article".to_string()));

    let name = match confirmation.confirm(request).await {
        ConfirmOutcome::Cancelled => return None,
        ConfirmOutcome::Confirmed(name) => name,
    };
    if name.trim().is_empty() {
        return None;
    }

    match store.create(name.trim(), type_id).await {
        Ok(created) => {
            notifier.notify(Notice::success(format!("{type_label} created.")));
            Some(created)
        }
        Err(err) => {
            warn!(error = %err, type_id, "creating content failed");
            notifier.notify(Notice::error(err.to_string()));
            None
        }
    }
}

/// Delete the document at `path` after confirmation
pub async fn delete_content(
    store: &dyn ContentStore,
    confirmation: &dyn Confirmation,
    notifier: &dyn Notifier,
    path: &str,
    current_path: Option<&str>,
) -> DeleteOutcome {
    let request = ConfirmRequest::new(
        "Confirm deletion",
        "Are you sure you want to delete this content? This action cannot be undone.",
    )
    .with_confirm_text("Delete");

    if confirmation.confirm(request).await == ConfirmOutcome::Cancelled {
        return DeleteOutcome::Cancelled;
    }

    match store.delete(path).await {
        Ok(receipt) => {
            notifier.notify(Notice::success(receipt.message));
            DeleteOutcome::Deleted {
                was_current: current_path == Some(path),
            }
        }
        Err(err) => {
            warn!(error = %err, path, "deleting content failed");
            notifier.notify(Notice::error(err.to_string()));
            DeleteOutcome::Failed
        }
    }
}
