//! Error types for the editor

use thiserror::Error;

use crate::collaborators::StoreError;
use crate::path::PathError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("No sequence at {0}")]
    NotASequence(String),

    #[error("No item with id {0:?}")]
    UnknownItemId(String),
}
