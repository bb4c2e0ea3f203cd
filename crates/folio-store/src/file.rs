//! JSON file backed document store
//!
//! The whole document tree lives in one JSON file:
//! `{ "<scope>": { "<collection>": { "<id>": { ...fields } } } }`.
//! Every mutation rewrites the file through a temporary sibling and a rename,
//! so a crash leaves either the old or the new tree on disk.

use crate::document::{Document, DocumentKey, DocumentStore, Namespace};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

type FileTree = BTreeMap<String, BTreeMap<String, BTreeMap<String, Document>>>;

/// Document store persisted to a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tree: Mutex<FileTree>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    ///
    /// # Errors
    /// - `StoreError::Io` if the file exists but cannot be read
    /// - `StoreError::Malformed` if the file is not a document tree
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tree = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => FileTree::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "store file absent, starting empty");
                FileTree::new()
            }
            Err(e) => return Err(StoreError::io_error(&path, e)),
        };

        Ok(Self {
            path,
            tree: Mutex::new(tree),
        })
    }

    /// Path of the backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, tree: &FileTree) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(tree)?;
        let tmp = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io_error(parent, e))?;
        }
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, key: &DocumentKey) -> Result<Option<Document>, StoreError> {
        let tree = self.tree.lock().await;
        let ns = key.namespace();
        Ok(tree
            .get(ns.scope())
            .and_then(|scope| scope.get(ns.collection()))
            .and_then(|docs| docs.get(key.id()))
            .cloned())
    }

    async fn put(&self, key: &DocumentKey, document: Document) -> Result<(), StoreError> {
        let mut tree = self.tree.lock().await;
        let ns = key.namespace();
        let previous = tree
            .entry(ns.scope().to_string())
            .or_default()
            .entry(ns.collection().to_string())
            .or_default()
            .insert(key.id().to_string(), document);

        if let Err(e) = self.flush(&tree).await {
            // Keep memory aligned with disk when the write did not land
            let docs = tree
                .get_mut(ns.scope())
                .and_then(|scope| scope.get_mut(ns.collection()));
            if let Some(docs) = docs {
                match previous {
                    Some(prev) => {
                        docs.insert(key.id().to_string(), prev);
                    }
                    None => {
                        docs.remove(key.id());
                    }
                }
            }
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, key: &DocumentKey) -> Result<bool, StoreError> {
        let mut tree = self.tree.lock().await;
        let ns = key.namespace();
        let removed = tree
            .get_mut(ns.scope())
            .and_then(|scope| scope.get_mut(ns.collection()))
            .and_then(|docs| docs.remove(key.id()));

        let Some(removed) = removed else {
            return Ok(false);
        };

        if let Err(e) = self.flush(&tree).await {
            if let Some(docs) = tree
                .get_mut(ns.scope())
                .and_then(|scope| scope.get_mut(ns.collection()))
            {
                docs.insert(key.id().to_string(), removed);
            }
            return Err(e);
        }
        Ok(true)
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<(String, Document)>, StoreError> {
        let tree = self.tree.lock().await;
        Ok(tree
            .get(namespace.scope())
            .and_then(|scope| scope.get(namespace.collection()))
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
