use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One ordered, typed, repeatable unit of page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique within `page.blocks`, immutable once created
    pub id: String,
    /// Must match a key in the schema's block registry
    #[serde(rename = "type")]
    pub block_type: String,
    /// Shape defined by the block type's fields; unknown keys pass through
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// The page half of the content tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Page-level fields (seo, settings, ...) the schema may or may not
    /// declare
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full content tree: page blocks plus site-wide global sections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteData {
    #[serde(default)]
    pub page: PageData,
    #[serde(default)]
    pub globals: Map<String, Value>,
}

impl SiteData {
    /// Typed view over a working tree
    pub fn from_value(tree: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(tree.clone())
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Payload of a `link` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    pub url: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_in_new_tab: Option<bool>,
}

/// Payload of an `image` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub url: String,
    pub alt: String,
}
