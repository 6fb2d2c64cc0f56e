//! # Content stores
//!
//! [`FsContentStore`] keeps content as JSON documents under a root
//! directory:
//!
//! ```text
//! <root>/
//!   schema.json                    fallback schema for every document
//!   index/content.json             the "/" document
//!   articles/
//!     my-first-post/
//!       content.json               tree for /articles/my-first-post
//!       schema.json                optional per-document schema
//! ```
//!
//! Documents of a registered content type live under `<root>/<type-id>/`;
//! `list` walks the registry, `create` materializes a named document from
//! the type's template, `delete` removes its directory.
//!
//! [`MemoryContentStore`] is its in-memory twin for tests and ephemeral
//! hosts.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use pagecraft_editor::{
    ContentEntry, ContentGroup, ContentPayload, ContentStore, CreatedContent, SaveReceipt,
    StoreError,
};
use pagecraft_schema::{ContentTypeConfig, PageSchema};

const CONTENT_FILE: &str = "content.json";
const SCHEMA_FILE: &str = "schema.json";

/// Filesystem-backed content store
pub struct FsContentStore {
    root: PathBuf,
    content_types: HashMap<String, ContentTypeConfig>,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>, content_types: HashMap<String, ContentTypeConfig>) -> Self {
        Self {
            root: root.into(),
            content_types,
        }
    }

    /// Directory of the document at `path`; "/" maps to `index/`
    fn doc_dir(&self, path: &str) -> Result<PathBuf, StoreError> {
        let trimmed = path.trim_matches('/');
        let relative = if trimmed.is_empty() { "index" } else { trimmed };
        let relative = Path::new(relative);
        // content paths must stay inside the root
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StoreError::Validation(format!(
                "invalid content path {path:?}"
            )));
        }
        Ok(self.root.join(relative))
    }

    async fn read_schema(&self, dir: &Path, path: &str) -> Result<PageSchema, StoreError> {
        for candidate in [dir.join(SCHEMA_FILE), self.root.join(SCHEMA_FILE)] {
            match tokio::fs::read(&candidate).await {
                Ok(bytes) => return Ok(serde_json::from_slice(&bytes)?),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(StoreError::Validation(format!("no schema for {path:?}")))
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn load(&self, path: &str) -> Result<ContentPayload, StoreError> {
        let dir = self.doc_dir(path)?;
        let bytes = match tokio::fs::read(dir.join(CONTENT_FILE)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let tree: Value = serde_json::from_slice(&bytes)?;
        if tree.get("page").is_none() {
            return Err(StoreError::Validation(format!(
                "content at {path:?} has no page"
            )));
        }
        let schema = self.read_schema(&dir, path).await?;
        debug!(path, "content loaded from disk");
        Ok(ContentPayload { tree, schema })
    }

    async fn save(&self, path: &str, tree: &Value) -> Result<SaveReceipt, StoreError> {
        let dir = self.doc_dir(path)?;
        tokio::fs::create_dir_all(&dir).await?;
        let bytes = serde_json::to_vec_pretty(tree)?;
        tokio::fs::write(dir.join(CONTENT_FILE), bytes).await?;
        info!(path, "content saved");
        Ok(SaveReceipt {
            message: "Content saved.".to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<ContentGroup>, StoreError> {
        let mut type_ids: Vec<&String> = self.content_types.keys().collect();
        type_ids.sort();

        let mut groups = Vec::new();
        for type_id in type_ids {
            let config = &self.content_types[type_id];
            let type_dir = self.root.join(type_id);
            let mut items = Vec::new();
            let mut entries = match tokio::fs::read_dir(&type_dir).await {
                Ok(entries) => entries,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    groups.push(ContentGroup {
                        id: type_id.clone(),
                        label: config.label.clone(),
                        items,
                    });
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let content_file = entry.path().join(CONTENT_FILE);
                let Ok(bytes) = tokio::fs::read(&content_file).await else {
                    continue;
                };
                let slug = entry.file_name().to_string_lossy().to_string();
                // display name: the document's page title, else its slug
                let name = serde_json::from_slice::<Value>(&bytes)
                    .ok()
                    .and_then(|tree| {
                        tree.pointer("/page/title")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| slug.clone());
                items.push(ContentEntry {
                    name,
                    path: format!("/{type_id}/{slug}"),
                });
            }
            items.sort_by(|a, b| a.path.cmp(&b.path));
            groups.push(ContentGroup {
                id: type_id.clone(),
                label: config.label.clone(),
                items,
            });
        }
        Ok(groups)
    }

    async fn create(&self, name: &str, type_id: &str) -> Result<CreatedContent, StoreError> {
        let config = self
            .content_types
            .get(type_id)
            .ok_or_else(|| StoreError::Validation(format!("unknown content type {type_id:?}")))?;
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(StoreError::Validation("content name required".to_string()));
        }
        let path = format!("/{type_id}/{slug}");
        let dir = self.doc_dir(&path)?;
        if tokio::fs::try_exists(dir.join(CONTENT_FILE)).await? {
            return Err(StoreError::Validation(format!(
                "content already exists at {path:?}"
            )));
        }
        let template = config
            .template
            .clone()
            .unwrap_or_else(|| json!({ "page": { "title": name, "blocks": [] }, "globals": {} }));
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(CONTENT_FILE), serde_json::to_vec_pretty(&template)?).await?;
        info!(path, type_id, "content created");
        Ok(CreatedContent { path })
    }

    async fn delete(&self, path: &str) -> Result<SaveReceipt, StoreError> {
        let dir = self.doc_dir(path)?;
        if !tokio::fs::try_exists(dir.join(CONTENT_FILE)).await? {
            return Err(StoreError::NotFound(path.to_string()));
        }
        tokio::fs::remove_dir_all(&dir).await?;
        info!(path, "content deleted");
        Ok(SaveReceipt {
            message: "Content deleted.".to_string(),
        })
    }
}

/// URL-safe slug: lowercase alphanumerics separated by single dashes
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress a leading dash
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// In-memory content store for tests and ephemeral hosts
#[derive(Default)]
pub struct MemoryContentStore {
    schema: PageSchema,
    docs: Mutex<HashMap<String, Value>>,
}

impl MemoryContentStore {
    pub fn new(schema: PageSchema) -> Self {
        Self {
            schema,
            docs: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_content(self, path: impl Into<String>, tree: Value) -> Self {
        self.docs
            .lock()
            .expect("store poisoned")
            .insert(path.into(), tree);
        self
    }

    /// The last-saved tree at `path`, if any
    pub fn saved(&self, path: &str) -> Option<Value> {
        self.docs.lock().expect("store poisoned").get(path).cloned()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn load(&self, path: &str) -> Result<ContentPayload, StoreError> {
        let tree = self
            .saved(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(ContentPayload {
            tree,
            schema: self.schema.clone(),
        })
    }

    async fn save(&self, path: &str, tree: &Value) -> Result<SaveReceipt, StoreError> {
        self.docs
            .lock()
            .expect("store poisoned")
            .insert(path.to_string(), tree.clone());
        Ok(SaveReceipt {
            message: "Content saved.".to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<ContentGroup>, StoreError> {
        let docs = self.docs.lock().expect("store poisoned");
        let mut items: Vec<ContentEntry> = docs
            .keys()
            .map(|path| ContentEntry {
                name: path.clone(),
                path: path.clone(),
            })
            .collect();
        items.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(vec![ContentGroup {
            id: "content".to_string(),
            label: "Content".to_string(),
            items,
        }])
    }

    async fn create(&self, name: &str, type_id: &str) -> Result<CreatedContent, StoreError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(StoreError::Validation("content name required".to_string()));
        }
        let path = format!("/{type_id}/{slug}");
        let mut docs = self.docs.lock().expect("store poisoned");
        if docs.contains_key(&path) {
            return Err(StoreError::Validation(format!(
                "content already exists at {path:?}"
            )));
        }
        docs.insert(
            path.clone(),
            json!({ "page": { "title": name, "blocks": [] }, "globals": {} }),
        );
        Ok(CreatedContent { path })
    }

    async fn delete(&self, path: &str) -> Result<SaveReceipt, StoreError> {
        let mut docs = self.docs.lock().expect("store poisoned");
        docs.remove(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(SaveReceipt {
            message: "Content deleted.".to_string(),
        })
    }
}
