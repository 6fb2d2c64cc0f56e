//! # Field dispatch
//!
//! Resolves the current frame's config against its data into a render
//! model: which fields are visible, what widget each one gets, and what a
//! write to any of them looks like. The host renders the model; every edit
//! comes back as a [`FieldUpdate`], the sole write path into the tree.

use serde_json::Value;

use pagecraft_schema::{FieldConfig, FieldKind, SectionConfig};

use crate::navigation::{Breadcrumb, FrameConfig};
use crate::path::NodePath;

/// What the host should render for one visible field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWidget {
    /// Single- or multi-line text input
    Text { multiline: bool },
    /// Edited through the host's link picker
    Link,
    /// Edited through the host's upload capability
    Image,
    /// Edited through the host's rich-text capability
    RichText,
    /// Picks one entry of the content-type registry
    Collection,
    /// Two labeled states
    Toggle {
        true_label: String,
        false_label: String,
    },
    /// Object and array fields do not edit inline: selecting them drills
    /// down instead
    DrillIn(DrillTarget),
    /// Unrecognized `type` tag: an inline, non-fatal error that does not
    /// block sibling fields
    Unsupported { type_tag: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrillTarget {
    /// `object` field: drill into its nested fields
    Object,
    /// `array` field: drill into the repeater; carries the current item
    /// count for the affordance text
    Repeater { count: usize },
}

/// One field resolved against the current frame's data
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub label: String,
    /// Current value; `Null` when absent
    pub value: Value,
    pub widget: FieldWidget,
}

/// Row model for one repeater item
#[derive(Debug, Clone, PartialEq)]
pub struct RepeaterItem {
    pub index: usize,
    pub id: Option<String>,
    pub label: String,
}

/// Listing model for an `array` frame; structural operations on it go
/// through the structural editor
#[derive(Debug, Clone, PartialEq)]
pub struct RepeaterView {
    pub label: String,
    pub items: Vec<RepeaterItem>,
    pub item_fields: Vec<FieldConfig>,
}

impl RepeaterView {
    /// Config pushed when one of the items is selected: the item fields as
    /// a plain section, no label of its own
    pub fn item_config(&self) -> FrameConfig {
        FrameConfig::Section(SectionConfig {
            label: String::new(),
            fields: self.item_fields.clone(),
            default_data: None,
        })
    }
}

/// Render model for the current frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameView {
    Fields(Vec<ResolvedField>),
    Repeater(RepeaterView),
}

/// Resolve the current frame into its render model.
///
/// A `fields`-bearing config (section or object field) resolves to the
/// visible field list; an `array` config delegates to the repeater view. A
/// scalar field config has nothing nested to show and resolves to an empty
/// list.
pub fn resolve_frame(config: &FrameConfig, data: Option<&Value>) -> FrameView {
    match config {
        FrameConfig::Section(section) => FrameView::Fields(resolve_fields(&section.fields, data)),
        FrameConfig::Field(field) => match &field.kind {
            FieldKind::Array { item_fields, .. } => {
                FrameView::Repeater(repeater_view(&field.label, item_fields, data))
            }
            FieldKind::Object { fields } => FrameView::Fields(resolve_fields(fields, data)),
            _ => FrameView::Fields(Vec::new()),
        },
    }
}

/// A field without a condition is always visible; with one, visible iff
/// the sibling value equals the condition value exactly (type included).
/// Re-evaluated against every new tree.
pub fn is_visible(field: &FieldConfig, data: Option<&Value>) -> bool {
    match &field.condition {
        None => true,
        Some(condition) => data.and_then(|d| d.get(&condition.field)) == Some(&condition.value),
    }
}

fn resolve_fields(fields: &[FieldConfig], data: Option<&Value>) -> Vec<ResolvedField> {
    fields
        .iter()
        .filter(|field| is_visible(field, data))
        .map(|field| {
            let value = data
                .and_then(|d| d.get(&field.name))
                .cloned()
                .unwrap_or(Value::Null);
            let widget = widget_for(field, &value);
            ResolvedField {
                name: field.name.clone(),
                label: field.label.clone(),
                value,
                widget,
            }
        })
        .collect()
}

fn widget_for(field: &FieldConfig, value: &Value) -> FieldWidget {
    match &field.kind {
        FieldKind::String => FieldWidget::Text { multiline: false },
        FieldKind::Text => FieldWidget::Text { multiline: true },
        FieldKind::Link => FieldWidget::Link,
        FieldKind::Image => FieldWidget::Image,
        FieldKind::RichText => FieldWidget::RichText,
        FieldKind::Collection => FieldWidget::Collection,
        FieldKind::Boolean {
            true_label,
            false_label,
        } => FieldWidget::Toggle {
            true_label: true_label.clone().unwrap_or_else(|| "Enabled".to_string()),
            false_label: false_label
                .clone()
                .unwrap_or_else(|| "Disabled".to_string()),
        },
        FieldKind::Object { .. } => FieldWidget::DrillIn(DrillTarget::Object),
        FieldKind::Array { .. } => FieldWidget::DrillIn(DrillTarget::Repeater {
            count: value.as_array().map(Vec::len).unwrap_or(0),
        }),
        FieldKind::Unknown { type_tag } => FieldWidget::Unsupported {
            type_tag: type_tag.clone(),
        },
    }
}

fn repeater_view(label: &str, item_fields: &[FieldConfig], data: Option<&Value>) -> RepeaterView {
    let items = data
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| RepeaterItem {
                    index,
                    id: item.get("id").and_then(Value::as_str).map(str::to_string),
                    label: item_label(item, index),
                })
                .collect()
        })
        .unwrap_or_default();
    RepeaterView {
        label: label.to_string(),
        items,
        item_fields: item_fields.to_vec(),
    }
}

/// Row label: the item's own `label`/`title` if present, else positional
fn item_label(item: &Value, index: usize) -> String {
    ["label", "title"]
        .iter()
        .find_map(|key| {
            item.get(*key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("Item #{}", index + 1))
}

/// A pending write into the content tree
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub path: NodePath,
    pub value: Value,
}

/// Update for one named field of the current frame
pub fn field_update(frame: &Breadcrumb, field_name: &str, value: Value) -> FieldUpdate {
    FieldUpdate {
        path: frame.path.child(field_name),
        value,
    }
}

/// Update replacing the frame's own value (a repeater writing its whole
/// sequence)
pub fn frame_update(frame: &Breadcrumb, value: Value) -> FieldUpdate {
    FieldUpdate {
        path: frame.path.clone(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(raw: Value) -> FieldConfig {
        serde_json::from_value(raw).unwrap()
    }

    fn section(fields: Vec<Value>) -> FrameConfig {
        FrameConfig::Section(SectionConfig {
            label: "Test".to_string(),
            fields: fields.into_iter().map(field).collect(),
            default_data: None,
        })
    }

    #[test]
    fn dispatches_each_type_tag_to_its_widget() {
        let config = section(vec![
            json!({ "type": "string", "label": "Title", "name": "title" }),
            json!({ "type": "text", "label": "Body", "name": "body" }),
            json!({ "type": "boolean", "label": "Visible", "name": "visible",
                     "trueLabel": "Shown", "falseLabel": "Hidden" }),
            json!({ "type": "object", "label": "CTA", "name": "cta", "fields": [] }),
            json!({ "type": "array", "label": "Slides", "name": "slides", "itemFields": {} }),
        ]);
        let data = json!({ "title": "Hi", "slides": [1, 2, 3] });

        let FrameView::Fields(fields) = resolve_frame(&config, Some(&data)) else {
            panic!("expected a field list");
        };
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0].widget, FieldWidget::Text { multiline: false });
        assert_eq!(fields[0].value, json!("Hi"));
        assert_eq!(fields[1].widget, FieldWidget::Text { multiline: true });
        assert_eq!(fields[1].value, Value::Null);
        assert_eq!(
            fields[2].widget,
            FieldWidget::Toggle {
                true_label: "Shown".to_string(),
                false_label: "Hidden".to_string()
            }
        );
        assert_eq!(fields[3].widget, FieldWidget::DrillIn(DrillTarget::Object));
        assert_eq!(
            fields[4].widget,
            FieldWidget::DrillIn(DrillTarget::Repeater { count: 3 })
        );
    }

    #[test]
    fn unknown_type_is_inline_and_does_not_block_siblings() {
        let config = section(vec![
            json!({ "type": "video", "label": "Clip", "name": "clip" }),
            json!({ "type": "string", "label": "Title", "name": "title" }),
        ]);

        let FrameView::Fields(fields) = resolve_frame(&config, Some(&json!({}))) else {
            panic!("expected a field list");
        };
        assert_eq!(
            fields[0].widget,
            FieldWidget::Unsupported {
                type_tag: "video".to_string()
            }
        );
        assert_eq!(fields[1].widget, FieldWidget::Text { multiline: false });
    }

    #[test]
    fn conditional_fields_follow_their_controller_strictly() {
        let config = section(vec![
            json!({ "type": "string", "label": "Mode", "name": "mode" }),
            json!({ "type": "string", "label": "Custom URL", "name": "customUrl",
                     "condition": { "field": "mode", "value": "custom" } }),
        ]);

        let visible = |data: &Value| -> Vec<String> {
            let FrameView::Fields(fields) = resolve_frame(&config, Some(data)) else {
                panic!("expected a field list");
            };
            fields.into_iter().map(|f| f.name).collect()
        };

        assert_eq!(visible(&json!({ "mode": "custom" })), vec!["mode", "customUrl"]);
        assert_eq!(visible(&json!({ "mode": "preset" })), vec!["mode"]);
        assert_eq!(visible(&json!({})), vec!["mode"]);
        // equality is type-sensitive
        let config_num = section(vec![
            json!({ "type": "string", "label": "N", "name": "n",
                     "condition": { "field": "count", "value": 1 } }),
        ]);
        let FrameView::Fields(fields) = resolve_frame(&config_num, Some(&json!({ "count": "1" })))
        else {
            panic!("expected a field list");
        };
        assert!(fields.is_empty());
    }

    #[test]
    fn array_frames_resolve_to_a_repeater_view() {
        let config = FrameConfig::Field(field(json!({
            "type": "array", "label": "Menu", "name": "menu",
            "itemFields": {
                "label": { "type": "string", "label": "Label", "name": "label" }
            }
        })));
        let data = json!([
            { "id": "i1", "label": "Home" },
            { "id": "i2" }
        ]);

        let FrameView::Repeater(view) = resolve_frame(&config, Some(&data)) else {
            panic!("expected a repeater");
        };
        assert_eq!(view.label, "Menu");
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].label, "Home");
        assert_eq!(view.items[0].id.as_deref(), Some("i1"));
        assert_eq!(view.items[1].label, "Item #2");

        // selecting an item drills into the item fields as a bare section
        let FrameConfig::Section(item_section) = view.item_config() else {
            panic!("expected a section");
        };
        assert_eq!(item_section.label, "");
        assert_eq!(item_section.fields.len(), 1);
    }

    #[test]
    fn updates_extend_the_frame_path() {
        let frame = Breadcrumb {
            path: NodePath::parse("page.blocks.0.data").unwrap(),
            label: "Hero".to_string(),
            config: section(vec![]),
        };

        let update = field_update(&frame, "title", json!("Hello"));
        assert_eq!(update.path.to_string(), "page.blocks.0.data.title");

        let whole = frame_update(&frame, json!([]));
        assert_eq!(whole.path.to_string(), "page.blocks.0.data");
    }
}
