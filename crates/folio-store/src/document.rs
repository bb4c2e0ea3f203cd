//! Document addressing and the store trait
//!
//! A document is a JSON object addressed by `(scope, collection, id)`. The
//! scope is the owning student; the collection names the entity kind.

use crate::error::StoreError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Field map of one stored document
pub type Document = serde_json::Map<String, serde_json::Value>;

/// All documents of one kind under one student scope
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace {
    scope: String,
    collection: String,
}

impl Namespace {
    /// Create namespace for a scope and collection
    #[inline]
    #[must_use]
    pub fn new(scope: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            collection: collection.into(),
        }
    }

    /// Owning scope (student key)
    #[inline]
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Collection name
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Key for a document id inside this namespace
    #[inline]
    #[must_use]
    pub fn key(&self, id: impl Into<String>) -> DocumentKey {
        DocumentKey {
            namespace: self.clone(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.collection)
    }
}

/// Full address of one document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentKey {
    namespace: Namespace,
    id: String,
}

impl DocumentKey {
    /// Namespace part of the key
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Document id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.id)
    }
}

/// Remote document store consumed by the core
///
/// Every call is an independent round trip. There is no multi-document
/// transaction; callers sequence writes themselves.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Fetch a document, `None` if absent
    async fn get(&self, key: &DocumentKey) -> Result<Option<Document>, StoreError>;

    /// Create or replace a document
    async fn put(&self, key: &DocumentKey, document: Document) -> Result<(), StoreError>;

    /// Remove a document, returning whether it existed
    async fn delete(&self, key: &DocumentKey) -> Result<bool, StoreError>;

    /// List every `(id, document)` in a namespace, ordered by id
    async fn list(&self, namespace: &Namespace) -> Result<Vec<(String, Document)>, StoreError>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn get(&self, key: &DocumentKey) -> Result<Option<Document>, StoreError> {
        (**self).get(key).await
    }

    async fn put(&self, key: &DocumentKey, document: Document) -> Result<(), StoreError> {
        (**self).put(key, document).await
    }

    async fn delete(&self, key: &DocumentKey) -> Result<bool, StoreError> {
        (**self).delete(key).await
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<(String, Document)>, StoreError> {
        (**self).list(namespace).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display() {
        let ns = Namespace::new("student-1", "essays");
        let key = ns.key("01ABC");
        assert_eq!(key.to_string(), "student-1/essays/01ABC");
        assert_eq!(key.namespace(), &ns);
        assert_eq!(key.id(), "01ABC");
    }

    #[test]
    fn namespaces_order_by_scope_then_collection() {
        let a = Namespace::new("a", "values");
        let b = Namespace::new("b", "colleges");
        assert!(a < b);
    }
}
