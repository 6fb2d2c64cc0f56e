//! # Navigation stack
//!
//! The breadcrumb stack behind the editing panel. Selecting a target path
//! classifies its first segments into one of three root categories (page
//! block, page field, global section), resolves the matching schema config
//! and seeds the stack with a single root frame. Drilling into object
//! fields and repeater items pushes frames whose paths strictly extend
//! their predecessor's.

use std::sync::Arc;

use serde_json::Value;

use pagecraft_schema::{FieldConfig, PageSchema, SectionConfig};

use crate::path::{self, NodePath, Segment};

/// Configuration carried by one frame: either a full section (block type,
/// global section) or a single field config (object/array drill-in).
///
/// Exactly the fields both shapes guarantee are reachable through
/// [`FrameConfig::label`] and the dispatcher's field-list resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameConfig {
    Section(SectionConfig),
    Field(FieldConfig),
}

impl FrameConfig {
    pub fn label(&self) -> &str {
        match self {
            FrameConfig::Section(section) => &section.label,
            FrameConfig::Field(field) => &field.label,
        }
    }
}

/// One level of the drill-down stack
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub path: NodePath,
    pub label: String,
    pub config: FrameConfig,
}

/// Breadcrumb stack driving drill-down editing. Empty when no target is
/// selected.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    schema: Arc<PageSchema>,
    frames: Vec<Breadcrumb>,
}

impl NavigationStack {
    /// The schema is injected once per session and treated as read-only
    pub fn new(schema: Arc<PageSchema>) -> Self {
        Self {
            schema,
            frames: Vec::new(),
        }
    }

    pub fn schema(&self) -> &PageSchema {
        &self.schema
    }

    /// Select an editing target, rebuilding the stack from scratch.
    ///
    /// Returns false — and leaves the stack empty — when no schema config
    /// resolves for the target; the host surfaces that as "configuration
    /// not found", and nothing else happens.
    pub fn select(&mut self, target: &NodePath, tree: &Value) -> bool {
        self.frames.clear();
        let Some(config) = self.resolve_root(target, tree) else {
            return false;
        };
        let label = config.label().to_string();
        self.frames.push(Breadcrumb {
            path: target.clone(),
            label,
            config,
        });
        true
    }

    fn resolve_root(&self, target: &NodePath, tree: &Value) -> Option<FrameConfig> {
        match target.segments() {
            [Segment::Field(root), Segment::Field(blocks), Segment::Index(_), ..]
                if root == "page" && blocks == "blocks" =>
            {
                // config keyed by the selected block's current type
                let mut type_path = NodePath::from_segments(target.segments()[..3].to_vec());
                type_path.push(Segment::Field("type".to_string()));
                let block_type = path::get(tree, &type_path)?.as_str()?;
                self.schema
                    .block(block_type)
                    .cloned()
                    .map(FrameConfig::Section)
            }
            [Segment::Field(root), Segment::Field(name), ..] if root == "page" => self
                .schema
                .page_field(name)
                .cloned()
                .map(FrameConfig::Field),
            [Segment::Field(root), Segment::Field(key), ..] if root == "globals" => self
                .schema
                .global_section(key)
                .cloned()
                .map(FrameConfig::Section),
            _ => None,
        }
    }

    /// Push one frame deeper. An empty `field_name` stays on the current
    /// value (repeater item drill-in); `index` addresses an item inside it.
    /// No-op when nothing is selected yet.
    pub fn drill_down(
        &mut self,
        field_name: &str,
        config: FrameConfig,
        index: Option<usize>,
        tree: &Value,
    ) -> bool {
        let Some(top) = self.frames.last() else {
            return false;
        };
        let mut new_path = top.path.clone();
        if !field_name.is_empty() {
            new_path.push(Segment::Field(field_name.to_string()));
        }
        if let Some(i) = index {
            new_path.push(Segment::Index(i));
        }
        // every frame's path must strictly extend its predecessor's
        if new_path.len() == top.path.len() {
            return false;
        }
        let label = frame_label(&config, index, path::get(tree, &new_path));
        self.frames.push(Breadcrumb {
            path: new_path,
            label,
            config,
        });
        true
    }

    /// Truncate back to the frame at `index`, keeping it as the new top.
    /// Out-of-range is a no-op.
    pub fn go_back(&mut self, index: usize) {
        if index < self.frames.len() {
            self.frames.truncate(index + 1);
        }
    }

    /// Close the editing surface: drops every frame, including the root
    /// (unlike `go_back(0)`, which keeps it)
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn current(&self) -> Option<&Breadcrumb> {
        self.frames.last()
    }

    pub fn frames(&self) -> &[Breadcrumb] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Label priority: the item's own `label`, then its `title`, then the
/// config label, then a positional fallback. Empty strings rank as missing.
fn frame_label(config: &FrameConfig, index: Option<usize>, item: Option<&Value>) -> String {
    // item data only participates when an index was given
    let own = index
        .and(item)
        .and_then(|value| {
            ["label", "title"].iter().find_map(|key| {
                value
                    .get(*key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            })
        })
        .map(str::to_string);
    if let Some(own) = own {
        return own;
    }
    let config_label = config.label();
    if !config_label.is_empty() {
        return config_label.to_string();
    }
    format!(
        "Item #{}",
        index.map(|i| (i + 1).to_string()).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_schema::FieldKind;
    use serde_json::json;

    fn schema() -> Arc<PageSchema> {
        Arc::new(
            serde_json::from_value(json!({
                "blocks": {
                    "hero": {
                        "label": "Hero",
                        "fields": [
                            { "type": "string", "label": "Title", "name": "title" }
                        ]
                    }
                },
                "pageFields": [
                    { "type": "object", "label": "SEO", "name": "seo", "fields": [] }
                ],
                "globalSections": {
                    "header": { "label": "Header", "fields": [] }
                }
            }))
            .unwrap(),
        )
    }

    fn tree() -> Value {
        json!({
            "page": {
                "blocks": [
                    { "id": "b1", "type": "hero", "data": { "title": "Hi" } }
                ]
            },
            "globals": { "header": {} }
        })
    }

    fn target(s: &str) -> NodePath {
        NodePath::parse(s).unwrap()
    }

    #[test]
    fn selecting_a_block_resolves_its_type_config() {
        let mut nav = NavigationStack::new(schema());
        assert!(nav.select(&target("page.blocks.0.data"), &tree()));
        let root = nav.current().unwrap();
        assert_eq!(root.label, "Hero");
        assert_eq!(root.path.to_string(), "page.blocks.0.data");
    }

    #[test]
    fn selecting_a_page_field_and_a_global_section() {
        let mut nav = NavigationStack::new(schema());
        assert!(nav.select(&target("page.seo"), &tree()));
        assert_eq!(nav.current().unwrap().label, "SEO");

        assert!(nav.select(&target("globals.header"), &tree()));
        assert_eq!(nav.current().unwrap().label, "Header");
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn unresolvable_selection_leaves_the_stack_empty() {
        let mut nav = NavigationStack::new(schema());
        assert!(nav.select(&target("page.blocks.0.data"), &tree()));
        assert!(!nav.select(&target("globals.missing"), &tree()));
        assert!(nav.is_empty());

        // block whose type is not in the registry
        let stray = json!({ "page": { "blocks": [{ "id": "x", "type": "gone", "data": {} }] } });
        assert!(!nav.select(&target("page.blocks.0.data"), &stray));
        assert!(nav.is_empty());
    }

    #[test]
    fn drill_down_extends_the_path_by_exactly_one_frame() {
        let mut nav = NavigationStack::new(schema());
        nav.select(&target("page.blocks.0.data"), &tree());

        let child = FrameConfig::Field(FieldConfig {
            label: "Slides".to_string(),
            name: "slides".to_string(),
            condition: None,
            kind: FieldKind::Array {
                item_fields: Vec::new(),
                default_data: None,
            },
        });
        assert!(nav.drill_down("slides", child, None, &tree()));
        assert_eq!(nav.depth(), 2);

        let top = nav.current().unwrap();
        assert_eq!(top.path.to_string(), "page.blocks.0.data.slides");
        let frames = nav.frames();
        assert!(top.path.starts_with(&frames[0].path));
        assert!(top.path.len() > frames[0].path.len());
    }

    #[test]
    fn item_labels_prefer_the_item_itself() {
        let tree = json!({
            "page": {
                "blocks": [{
                    "id": "b1",
                    "type": "hero",
                    "data": { "slides": [
                        { "id": "s1", "title": "First slide" },
                        { "id": "s2" }
                    ]}
                }]
            }
        });
        let mut nav = NavigationStack::new(schema());
        nav.select(&target("page.blocks.0.data"), &tree);
        nav.drill_down("slides", unlabeled_items(), None, &tree);

        // item with a title
        nav.drill_down("", unlabeled_items(), Some(0), &tree);
        assert_eq!(nav.current().unwrap().label, "First slide");
        nav.go_back(1);

        // bare item falls back to its position
        nav.drill_down("", unlabeled_items(), Some(1), &tree);
        assert_eq!(nav.current().unwrap().label, "Item #2");
    }

    fn unlabeled_items() -> FrameConfig {
        FrameConfig::Section(SectionConfig {
            label: String::new(),
            fields: Vec::new(),
            default_data: None,
        })
    }

    #[test]
    fn go_back_truncates_and_ignores_bad_indices() {
        let mut nav = NavigationStack::new(schema());
        nav.select(&target("page.blocks.0.data"), &tree());
        nav.drill_down("a", unlabeled_items(), None, &tree());
        nav.drill_down("b", unlabeled_items(), None, &tree());
        assert_eq!(nav.depth(), 3);

        nav.go_back(5); // out of range: no-op
        assert_eq!(nav.depth(), 3);

        nav.go_back(1);
        assert_eq!(nav.depth(), 2);

        nav.go_back(0);
        assert_eq!(nav.depth(), 1); // root kept

        nav.clear();
        assert!(nav.is_empty()); // closing drops the root too
    }

    #[test]
    fn drill_down_without_selection_is_a_no_op() {
        let mut nav = NavigationStack::new(schema());
        assert!(!nav.drill_down("a", unlabeled_items(), None, &tree()));
        assert!(nav.is_empty());
    }

    #[test]
    fn drill_down_refuses_a_non_extending_path() {
        let mut nav = NavigationStack::new(schema());
        nav.select(&target("page.blocks.0.data"), &tree());
        assert!(!nav.drill_down("", unlabeled_items(), None, &tree()));
        assert_eq!(nav.depth(), 1);
    }
}
