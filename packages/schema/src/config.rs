use std::collections::HashMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Conditional visibility: the field is shown only while the sibling field
/// named `field` equals `value` exactly (strict, type-sensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    pub field: String,
    pub value: Value,
}

/// One editable field declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub label: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<FieldCondition>,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldConfig {
    /// Default payload contributed when a fresh repeater item is created
    pub fn default_data(&self) -> Option<&Value> {
        match &self.kind {
            FieldKind::Array { default_data, .. } => default_data.as_ref(),
            _ => None,
        }
    }
}

/// Editing affordance of a field, discriminated by its `type` tag
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Single-line text input
    String,
    /// Multi-line text input
    Text,
    Link,
    Image,
    RichText,
    Collection,
    Boolean {
        true_label: Option<String>,
        false_label: Option<String>,
    },
    /// Nested fields edited one level deeper
    Object { fields: Vec<FieldConfig> },
    /// Repeater: an ordered sequence of structured sibling items
    Array {
        item_fields: Vec<FieldConfig>,
        default_data: Option<Value>,
    },
    /// Unrecognized `type` tag. Kept so one bad field surfaces as an inline
    /// dispatch error instead of failing the whole schema load.
    Unknown { type_tag: String },
}

impl FieldKind {
    pub fn type_tag(&self) -> &str {
        match self {
            FieldKind::String => "string",
            FieldKind::Text => "text",
            FieldKind::Link => "link",
            FieldKind::Image => "image",
            FieldKind::RichText => "richText",
            FieldKind::Collection => "collection",
            FieldKind::Boolean { .. } => "boolean",
            FieldKind::Object { .. } => "object",
            FieldKind::Array { .. } => "array",
            FieldKind::Unknown { type_tag } => type_tag,
        }
    }
}

/// Serde shape of the known field kinds. `FieldKind` itself adds the
/// `Unknown` catch-all on top of this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum KnownKind {
    String,
    Text,
    Link,
    Image,
    RichText,
    Collection,
    #[serde(rename_all = "camelCase")]
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        true_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        false_label: Option<String>,
    },
    Object {
        #[serde(deserialize_with = "field_list")]
        fields: Vec<FieldConfig>,
    },
    #[serde(rename_all = "camelCase")]
    Array {
        #[serde(deserialize_with = "field_list")]
        item_fields: Vec<FieldConfig>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_data: Option<Value>,
    },
}

const KNOWN_TAGS: &[&str] = &[
    "string",
    "text",
    "link",
    "image",
    "richText",
    "collection",
    "boolean",
    "object",
    "array",
];

impl From<KnownKind> for FieldKind {
    fn from(kind: KnownKind) -> Self {
        match kind {
            KnownKind::String => FieldKind::String,
            KnownKind::Text => FieldKind::Text,
            KnownKind::Link => FieldKind::Link,
            KnownKind::Image => FieldKind::Image,
            KnownKind::RichText => FieldKind::RichText,
            KnownKind::Collection => FieldKind::Collection,
            KnownKind::Boolean {
                true_label,
                false_label,
            } => FieldKind::Boolean {
                true_label,
                false_label,
            },
            KnownKind::Object { fields } => FieldKind::Object { fields },
            KnownKind::Array {
                item_fields,
                default_data,
            } => FieldKind::Array {
                item_fields,
                default_data,
            },
        }
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let tag = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if KNOWN_TAGS.contains(&tag.as_str()) {
            serde_json::from_value::<KnownKind>(raw)
                .map(FieldKind::from)
                .map_err(de::Error::custom)
        } else {
            Ok(FieldKind::Unknown { type_tag: tag })
        }
    }
}

impl Serialize for FieldKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let known = match self.clone() {
            FieldKind::Unknown { type_tag } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", &type_tag)?;
                return map.end();
            }
            FieldKind::String => KnownKind::String,
            FieldKind::Text => KnownKind::Text,
            FieldKind::Link => KnownKind::Link,
            FieldKind::Image => KnownKind::Image,
            FieldKind::RichText => KnownKind::RichText,
            FieldKind::Collection => KnownKind::Collection,
            FieldKind::Boolean {
                true_label,
                false_label,
            } => KnownKind::Boolean {
                true_label,
                false_label,
            },
            FieldKind::Object { fields } => KnownKind::Object { fields },
            FieldKind::Array {
                item_fields,
                default_data,
            } => KnownKind::Array {
                item_fields,
                default_data,
            },
        };
        known.serialize(serializer)
    }
}

/// Accept a field list written either as a JSON array or as a name-keyed
/// JSON object (the authoring shape for `itemFields`), preserving document
/// order in both cases.
fn field_list<'de, D>(deserializer: D) -> Result<Vec<FieldConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldListVisitor;

    impl<'de> Visitor<'de> for FieldListVisitor {
        type Value = Vec<FieldConfig>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a list of field configs or a name-keyed map of them")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut fields = Vec::new();
            while let Some(field) = seq.next_element::<FieldConfig>()? {
                fields.push(field);
            }
            Ok(fields)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut fields = Vec::new();
            while let Some((_key, field)) = map.next_entry::<String, FieldConfig>()? {
                fields.push(field);
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_any(FieldListVisitor)
}

/// Configuration of one section: a block type or a global section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    pub label: String,
    #[serde(default, deserialize_with = "field_list")]
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_data: Option<Value>,
}

/// Declarative description of everything editable on a page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSchema {
    pub page_fields: Vec<FieldConfig>,
    pub blocks: HashMap<String, SectionConfig>,
    pub global_sections: HashMap<String, SectionConfig>,
}

impl PageSchema {
    /// Fold externally supplied global schemas into the session schema.
    /// Supplied entries win over same-named ones already present.
    pub fn merge_globals(mut self, global_schemas: &HashMap<String, SectionConfig>) -> Self {
        for (key, section) in global_schemas {
            self.global_sections.insert(key.clone(), section.clone());
        }
        self
    }

    pub fn block(&self, block_type: &str) -> Option<&SectionConfig> {
        self.blocks.get(block_type)
    }

    pub fn page_field(&self, name: &str) -> Option<&FieldConfig> {
        self.page_fields.iter().find(|field| field.name == name)
    }

    pub fn global_section(&self, key: &str) -> Option<&SectionConfig> {
        self.global_sections.get(key)
    }
}

/// One entry of the content-type registry (pages, articles, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentTypeConfig {
    pub label: String,
    /// Initial tree for freshly created documents of this type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Session configuration threaded explicitly into the editing surface
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderConfig {
    pub global_schemas: HashMap<String, SectionConfig>,
    pub content_types: HashMap<String, ContentTypeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hero_schema_json() -> Value {
        json!({
            "blocks": {
                "hero": {
                    "label": "Hero",
                    "fields": [
                        { "type": "string", "label": "Title", "name": "title" },
                        { "type": "text", "label": "Intro", "name": "intro" },
                        {
                            "type": "array",
                            "label": "Slides",
                            "name": "slides",
                            "itemFields": {
                                "caption": { "type": "string", "label": "Caption", "name": "caption" },
                                "image": { "type": "image", "label": "Image", "name": "image" }
                            }
                        }
                    ],
                    "defaultData": { "title": "" }
                }
            },
            "pageFields": [
                { "type": "object", "label": "SEO", "name": "seo", "fields": [
                    { "type": "string", "label": "Meta title", "name": "metaTitle" }
                ]}
            ],
            "globalSections": {
                "header": { "label": "Header", "fields": [] }
            }
        })
    }

    #[test]
    fn parses_a_realistic_schema() {
        let schema: PageSchema = serde_json::from_value(hero_schema_json()).unwrap();

        let hero = schema.block("hero").unwrap();
        assert_eq!(hero.label, "Hero");
        assert_eq!(hero.fields.len(), 3);
        assert_eq!(hero.default_data, Some(json!({ "title": "" })));

        let slides = &hero.fields[2];
        match &slides.kind {
            FieldKind::Array { item_fields, .. } => {
                // object-form itemFields keep document order
                assert_eq!(item_fields[0].name, "caption");
                assert_eq!(item_fields[1].name, "image");
            }
            other => panic!("expected array kind, got {:?}", other),
        }

        assert!(schema.page_field("seo").is_some());
        assert!(schema.global_section("header").is_some());
    }

    #[test]
    fn unknown_type_tag_is_not_fatal() {
        let field: FieldConfig = serde_json::from_value(json!({
            "type": "video",
            "label": "Clip",
            "name": "clip"
        }))
        .unwrap();

        assert_eq!(
            field.kind,
            FieldKind::Unknown {
                type_tag: "video".to_string()
            }
        );
    }

    #[test]
    fn condition_round_trips() {
        let field: FieldConfig = serde_json::from_value(json!({
            "type": "string",
            "label": "Custom URL",
            "name": "customUrl",
            "condition": { "field": "mode", "value": "custom" }
        }))
        .unwrap();

        let condition = field.condition.as_ref().unwrap();
        assert_eq!(condition.field, "mode");
        assert_eq!(condition.value, json!("custom"));

        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back.get("type"), Some(&json!("string")));
        assert_eq!(back.get("condition"), Some(&json!({ "field": "mode", "value": "custom" })));
    }

    #[test]
    fn merge_globals_prefers_supplied_sections() {
        let schema: PageSchema = serde_json::from_value(hero_schema_json()).unwrap();
        let mut supplied = HashMap::new();
        supplied.insert(
            "header".to_string(),
            SectionConfig {
                label: "Site header".to_string(),
                fields: Vec::new(),
                default_data: None,
            },
        );
        supplied.insert(
            "footer".to_string(),
            SectionConfig {
                label: "Footer".to_string(),
                fields: Vec::new(),
                default_data: None,
            },
        );

        let merged = schema.merge_globals(&supplied);
        assert_eq!(merged.global_section("header").unwrap().label, "Site header");
        assert!(merged.global_section("footer").is_some());
    }
}
