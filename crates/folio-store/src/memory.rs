//! In-memory document store

use crate::document::{Document, DocumentKey, DocumentStore, Namespace};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

type Tree = BTreeMap<Namespace, BTreeMap<String, Document>>;

/// In-memory implementation for embedding and testing
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Tree>,
}

impl InMemoryDocumentStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a namespace
    pub async fn count(&self, namespace: &Namespace) -> usize {
        self.documents
            .read()
            .await
            .get(namespace)
            .map_or(0, BTreeMap::len)
    }

    /// Whether a document exists
    pub async fn contains(&self, key: &DocumentKey) -> bool {
        self.documents
            .read()
            .await
            .get(key.namespace())
            .is_some_and(|docs| docs.contains_key(key.id()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, key: &DocumentKey) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(key.namespace())
            .and_then(|docs| docs.get(key.id()))
            .cloned())
    }

    async fn put(&self, key: &DocumentKey, document: Document) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents
            .entry(key.namespace().clone())
            .or_default()
            .insert(key.id().to_string(), document);
        Ok(())
    }

    async fn delete(&self, key: &DocumentKey) -> Result<bool, StoreError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .get_mut(key.namespace())
            .is_some_and(|docs| docs.remove(key.id()).is_some()))
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<(String, Document)>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(namespace)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
