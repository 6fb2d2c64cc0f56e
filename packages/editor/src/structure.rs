//! # Structural editing
//!
//! Add/delete/reorder over any ordered sequence of id-carrying items: the
//! page's `blocks` array and nested repeater arrays at arbitrary depth.
//! Every operation is a pure `tree -> tree` function routed through the
//! path mutator; gating (delete confirmation) and panel wiring live in the
//! session.
//!
//! Drag-and-drop identification stops at ids: the core resolves a dragged
//! id to its current index just before reordering, the gesture itself is
//! the presentation layer's problem.

use serde_json::{json, Map, Value};

use pagecraft_common::IdGenerator;
use pagecraft_schema::{FieldConfig, PageSchema};

use crate::errors::EditorError;
use crate::path::{self, NodePath, Segment};

/// Path of the page's block sequence (`page.blocks`)
pub fn blocks_container() -> NodePath {
    NodePath::from_segments(vec![
        Segment::Field("page".to_string()),
        Segment::Field("blocks".to_string()),
    ])
}

/// Append a freshly constructed block of `block_type` to `page.blocks`.
///
/// The new block deep-clones the block type's `defaultData`, so editing it
/// later never writes back into the schema.
pub fn add_block(
    tree: Value,
    schema: &PageSchema,
    block_type: &str,
    ids: &mut IdGenerator,
) -> Result<Value, EditorError> {
    let config = schema
        .block(block_type)
        .ok_or_else(|| EditorError::UnknownBlockType(block_type.to_string()))?;
    let container = blocks_container();
    let taken = item_ids(&tree, &container);
    let id = ids.fresh_id("block", taken.iter().map(String::as_str));
    let data = config.default_data.clone().unwrap_or_else(|| json!({}));
    let block = json!({ "id": id, "type": block_type, "data": data });
    append(tree, &container, block)
}

/// Append a fresh repeater item: a generated id plus each item field's
/// declared default
pub fn add_repeater_item(
    tree: Value,
    container: &NodePath,
    item_fields: &[FieldConfig],
    ids: &mut IdGenerator,
) -> Result<Value, EditorError> {
    let taken = item_ids(&tree, container);
    let mut item = Map::new();
    item.insert(
        "id".to_string(),
        Value::String(ids.fresh_id("item", taken.iter().map(String::as_str))),
    );
    for field in item_fields {
        if let Some(default) = field.default_data() {
            item.insert(field.name.clone(), default.clone());
        }
    }
    append(tree, container, Value::Object(item))
}

fn append(tree: Value, container: &NodePath, item: Value) -> Result<Value, EditorError> {
    let len = path::get(&tree, container)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    Ok(path::set(tree, &container.index(len), item)?)
}

/// Remove the item at `index`, preserving the relative order of the rest.
/// Remaining items keep their ids; their indices shift down by one.
pub fn remove_at(mut tree: Value, container: &NodePath, index: usize) -> Result<Value, EditorError> {
    let items = sequence_mut(&mut tree, container)?;
    if index >= items.len() {
        return Err(EditorError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }
    items.remove(index);
    Ok(tree)
}

/// Move the item at `old_index` to `new_index`, shifting the items between
/// them by one position — remove-then-insert semantics. Reordering (i, j)
/// then (j, i) restores the original sequence.
pub fn reorder(
    mut tree: Value,
    container: &NodePath,
    old_index: usize,
    new_index: usize,
) -> Result<Value, EditorError> {
    let items = sequence_mut(&mut tree, container)?;
    let len = items.len();
    if old_index >= len {
        return Err(EditorError::IndexOutOfBounds { index: old_index, len });
    }
    if new_index >= len {
        return Err(EditorError::IndexOutOfBounds { index: new_index, len });
    }
    let item = items.remove(old_index);
    items.insert(new_index, item);
    Ok(tree)
}

/// Current index of the item carrying `item_id`
pub fn index_of_id(tree: &Value, container: &NodePath, item_id: &str) -> Option<usize> {
    path::get(tree, container)?
        .as_array()?
        .iter()
        .position(|item| item.get("id").and_then(Value::as_str) == Some(item_id))
}

/// Resolve a dragged id to its index, then reorder to `new_index`
pub fn move_by_id(
    tree: Value,
    container: &NodePath,
    item_id: &str,
    new_index: usize,
) -> Result<Value, EditorError> {
    let old_index = index_of_id(&tree, container, item_id)
        .ok_or_else(|| EditorError::UnknownItemId(item_id.to_string()))?;
    if old_index == new_index {
        return Ok(tree);
    }
    reorder(tree, container, old_index, new_index)
}

/// Resolve both ends of a drop (dragged id, drop-target id) to indices and
/// reorder. Dropping an item onto itself is a no-op.
pub fn reorder_by_ids(
    tree: Value,
    container: &NodePath,
    active_id: &str,
    over_id: &str,
) -> Result<Value, EditorError> {
    if active_id == over_id {
        return Ok(tree);
    }
    let new_index = index_of_id(&tree, container, over_id)
        .ok_or_else(|| EditorError::UnknownItemId(over_id.to_string()))?;
    move_by_id(tree, container, active_id, new_index)
}

fn sequence_mut<'a>(
    tree: &'a mut Value,
    container: &NodePath,
) -> Result<&'a mut Vec<Value>, EditorError> {
    match path::get_mut(tree, container) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(EditorError::NotASequence(container.to_string())),
    }
}

fn item_ids(tree: &Value, container: &NodePath) -> Vec<String> {
    path::get(tree, container)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// One row of the structure panel's block listing
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSummary {
    pub id: String,
    pub block_type: String,
    /// The block type's schema label, falling back to the raw type
    pub label: String,
}

/// Listing model for the page's blocks
pub fn block_summaries(tree: &Value, schema: &PageSchema) -> Vec<BlockSummary> {
    path::get(tree, &blocks_container())
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .map(|block| {
                    let id = block
                        .get("id")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    let block_type = block
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    let label = schema
                        .block(&block_type)
                        .map(|config| config.label.clone())
                        .unwrap_or_else(|| block_type.clone());
                    BlockSummary {
                        id,
                        block_type,
                        label,
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Which side panel is open.
///
/// Editing and Structure are mutually exclusive — opening one closes the
/// other — and both are reachable only from Idle or each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePanel {
    #[default]
    Idle,
    Editing,
    Structure,
}

impl ActivePanel {
    pub fn open_editing(&mut self) {
        *self = ActivePanel::Editing;
    }

    pub fn open_structure(&mut self) {
        *self = ActivePanel::Structure;
    }

    /// The toolbar toggle: Structure ↔ Idle
    pub fn toggle_structure(&mut self) {
        *self = match self {
            ActivePanel::Structure => ActivePanel::Idle,
            _ => ActivePanel::Structure,
        };
    }

    pub fn close(&mut self) {
        *self = ActivePanel::Idle;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, ActivePanel::Editing)
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, ActivePanel::Structure)
    }
}
