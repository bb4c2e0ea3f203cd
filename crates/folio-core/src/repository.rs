//! Typed entity access over the document store
//!
//! [`Repository`] maps each entity kind to a collection under the student
//! scope and (de)serializes documents. With the session cache on it mirrors
//! every document it reads or writes, so a read after a write in the same
//! session sees that write. A failed write drops the mirrored entry, since
//! the store's state for that key is then unknown.

use crate::error::{EntityKind, FolioError};
use crate::types::{College, CollegeId, Essay, EssayId, Prompt, PromptId, Value, ValueId};
use dashmap::DashMap;
use folio_store::{Document, DocumentKey, DocumentStore, Namespace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A document-backed entity
pub(crate) trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Typed id
    type Id: Copy + fmt::Display + Send + Sync;

    /// Collection name under the student scope
    const COLLECTION: &'static str;

    /// Kind reported in errors
    const KIND: EntityKind;

    fn id(&self) -> Self::Id;
}

impl Entity for College {
    type Id = CollegeId;
    const COLLECTION: &'static str = "colleges";
    const KIND: EntityKind = EntityKind::College;

    fn id(&self) -> CollegeId {
        self.id
    }
}

impl Entity for Prompt {
    type Id = PromptId;
    const COLLECTION: &'static str = "prompts";
    const KIND: EntityKind = EntityKind::Prompt;

    fn id(&self) -> PromptId {
        self.id
    }
}

impl Entity for Essay {
    type Id = EssayId;
    const COLLECTION: &'static str = "essays";
    const KIND: EntityKind = EntityKind::Essay;

    fn id(&self) -> EssayId {
        self.id
    }
}

impl Entity for Value {
    type Id = ValueId;
    const COLLECTION: &'static str = "values";
    const KIND: EntityKind = EntityKind::Value;

    fn id(&self) -> ValueId {
        self.id
    }
}

/// Typed, scoped access to the store with an optional session cache
pub(crate) struct Repository {
    store: Arc<dyn DocumentStore>,
    scope: String,
    cache: Option<DashMap<DocumentKey, Document>>,
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("store", &self.store)
            .field("scope", &self.scope)
            .field("cached", &self.cache.as_ref().map(DashMap::len))
            .finish()
    }
}

impl Repository {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, scope: impl Into<String>, cache: bool) -> Self {
        Self {
            store,
            scope: scope.into(),
            cache: cache.then(DashMap::new),
        }
    }

    pub(crate) fn scope(&self) -> &str {
        &self.scope
    }

    fn namespace<E: Entity>(&self) -> Namespace {
        Namespace::new(self.scope.clone(), E::COLLECTION)
    }

    fn key<E: Entity>(&self, id: E::Id) -> DocumentKey {
        self.namespace::<E>().key(id.to_string())
    }

    fn decode<E: Entity>(id: &str, document: Document) -> Result<E, FolioError> {
        serde_json::from_value(serde_json::Value::Object(document)).map_err(|e| {
            FolioError::CorruptDocument {
                kind: E::KIND,
                id: id.to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn encode<E: Entity>(entity: &E) -> Result<Document, FolioError> {
        match serde_json::to_value(entity) {
            Ok(serde_json::Value::Object(document)) => Ok(document),
            Ok(_) => Err(FolioError::CorruptDocument {
                kind: E::KIND,
                id: entity.id().to_string(),
                reason: "entity did not encode to an object".to_string(),
            }),
            Err(e) => Err(FolioError::CorruptDocument {
                kind: E::KIND,
                id: entity.id().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Fetch an entity, `None` if absent
    pub(crate) async fn get<E: Entity>(&self, id: E::Id) -> Result<Option<E>, FolioError> {
        let key = self.key::<E>(id);

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            return Self::decode(key.id(), cached.value().clone()).map(Some);
        }

        let Some(document) = self.store.get(&key).await? else {
            return Ok(None);
        };
        if let Some(cache) = &self.cache {
            cache.insert(key.clone(), document.clone());
        }
        Self::decode(key.id(), document).map(Some)
    }

    /// Fetch an entity or fail with `NotFound`
    pub(crate) async fn require<E: Entity>(&self, id: E::Id) -> Result<E, FolioError> {
        self.get::<E>(id)
            .await?
            .ok_or_else(|| FolioError::not_found(E::KIND, id))
    }

    /// Create or replace an entity
    pub(crate) async fn put<E: Entity>(&self, entity: &E) -> Result<(), FolioError> {
        let key = self.key::<E>(entity.id());
        let document = Self::encode(entity)?;

        match self.store.put(&key, document.clone()).await {
            Ok(()) => {
                if let Some(cache) = &self.cache {
                    cache.insert(key, document);
                }
                Ok(())
            }
            Err(e) => {
                if let Some(cache) = &self.cache {
                    cache.remove(&key);
                }
                Err(e.into())
            }
        }
    }

    /// Remove an entity, returning whether it existed
    pub(crate) async fn delete<E: Entity>(&self, id: E::Id) -> Result<bool, FolioError> {
        let key = self.key::<E>(id);
        let result = self.store.delete(&key).await;
        if let Some(cache) = &self.cache {
            cache.remove(&key);
        }
        Ok(result?)
    }

    /// List every entity of a kind, ordered by id
    pub(crate) async fn list<E: Entity>(&self) -> Result<Vec<E>, FolioError> {
        let namespace = self.namespace::<E>();
        let documents = self.store.list(&namespace).await?;

        let mut entities = Vec::with_capacity(documents.len());
        for (id, document) in documents {
            if let Some(cache) = &self.cache {
                cache.insert(namespace.key(id.clone()), document.clone());
            }
            entities.push(Self::decode::<E>(&id, document)?);
        }
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_store::InMemoryDocumentStore;

    fn repo(cache: bool) -> (Arc<InMemoryDocumentStore>, Repository) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let repo = Repository::new(store.clone(), "student-1", cache);
        (store, repo)
    }

    #[tokio::test]
    async fn put_get_roundtrip() {
        let (_, repo) = repo(true);
        let college = College::new("Reed");

        repo.put(&college).await.unwrap();
        let found = repo.get::<College>(college.id).await.unwrap();
        assert_eq!(found, Some(college));
    }

    #[tokio::test]
    async fn require_missing_is_not_found() {
        let (_, repo) = repo(false);
        let err = repo.require::<Prompt>(PromptId::new()).await.unwrap_err();
        assert!(matches!(err, FolioError::NotFound { kind: EntityKind::Prompt, .. }));
    }

    #[tokio::test]
    async fn documents_land_under_scope_and_collection() {
        let (store, repo) = repo(true);
        let value = Value::new("Grit", "#E57373");
        repo.put(&value).await.unwrap();

        let key = Namespace::new("student-1", "values").key(value.id.to_string());
        assert!(store.contains(&key).await);
    }

    #[tokio::test]
    async fn delete_evicts_cache() {
        let (_, repo) = repo(true);
        let college = College::new("Reed");
        repo.put(&college).await.unwrap();

        assert!(repo.delete::<College>(college.id).await.unwrap());
        assert!(repo.get::<College>(college.id).await.unwrap().is_none());
        assert!(!repo.delete::<College>(college.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_decodes_every_entity() {
        let (_, repo) = repo(false);
        let a = College::new("A");
        let b = College::new("B");
        repo.put(&a).await.unwrap();
        repo.put(&b).await.unwrap();

        let mut names: Vec<String> = repo
            .list::<College>()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let (store, repo) = repo(false);
        let id = EssayId::new();
        let key = Namespace::new("student-1", "essays").key(id.to_string());
        let mut doc = Document::new();
        doc.insert("title".into(), serde_json::json!(42));
        store.put(&key, doc).await.unwrap();

        let err = repo.get::<Essay>(id).await.unwrap_err();
        assert!(matches!(err, FolioError::CorruptDocument { kind: EntityKind::Essay, .. }));
    }
}
