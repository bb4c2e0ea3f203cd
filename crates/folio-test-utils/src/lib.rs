//! Testing utilities for Folio workspace
//!
//! Shared test helpers, fixtures, and a store that fails on demand.

#![allow(missing_docs)]

use async_trait::async_trait;
use folio_core::{College, FolioConfig, Portfolio, Prompt};
use folio_store::{
    Document, DocumentKey, DocumentStore, InMemoryDocumentStore, Namespace, StoreError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const UNLIMITED: usize = usize::MAX;

/// In-memory store whose writes start failing after a budget runs out
///
/// Reads always succeed. A failed write leaves the store unchanged.
#[derive(Debug)]
pub struct FaultyStore {
    inner: InMemoryDocumentStore,
    remaining: AtomicUsize,
    writes: AtomicUsize,
}

impl Default for FaultyStore {
    fn default() -> Self {
        Self {
            inner: InMemoryDocumentStore::new(),
            remaining: AtomicUsize::new(UNLIMITED),
            writes: AtomicUsize::new(0),
        }
    }
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `writes` more writes, then fail every write
    pub fn fail_after(&self, writes: usize) {
        self.remaining.store(writes, Ordering::SeqCst);
    }

    /// Stop failing
    pub fn heal(&self) {
        self.remaining.store(UNLIMITED, Ordering::SeqCst);
    }

    /// Successful writes so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Underlying store, for assertions that bypass fault injection
    pub fn inner(&self) -> &InMemoryDocumentStore {
        &self.inner
    }

    fn admit(&self, key: &DocumentKey) -> Result<(), StoreError> {
        let admitted = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                UNLIMITED => Some(UNLIMITED),
                n => Some(n - 1),
            })
            .is_ok();
        if admitted {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        } else {
            Err(StoreError::unavailable(format!("injected failure writing {key}")))
        }
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn get(&self, key: &DocumentKey) -> Result<Option<Document>, StoreError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &DocumentKey, document: Document) -> Result<(), StoreError> {
        self.admit(key)?;
        self.inner.put(key, document).await
    }

    async fn delete(&self, key: &DocumentKey) -> Result<bool, StoreError> {
        self.admit(key)?;
        self.inner.delete(key).await
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<(String, Document)>, StoreError> {
        self.inner.list(namespace).await
    }
}

/// Configuration used by fixtures
pub fn test_config() -> FolioConfig {
    FolioConfig::new().with_student("test-student")
}

/// Portfolio over a plain in-memory store
pub fn setup_portfolio() -> Portfolio {
    Portfolio::new(Arc::new(InMemoryDocumentStore::new()), test_config())
        .expect("test config is valid")
}

/// Portfolio over a fault-injecting store, with the store handle
///
/// The session cache is off so every read goes to the store.
pub fn setup_faulty_portfolio() -> (Arc<FaultyStore>, Portfolio) {
    let store = Arc::new(FaultyStore::new());
    let portfolio = Portfolio::new(store.clone(), test_config().with_cache(false))
        .expect("test config is valid");
    (store, portfolio)
}

/// College with `count` prompts
pub async fn college_with_prompts(
    portfolio: &Portfolio,
    name: &str,
    count: usize,
) -> (College, Vec<Prompt>) {
    let college = portfolio
        .registry()
        .add_college(name)
        .await
        .expect("add college");
    let mut prompts = Vec::with_capacity(count);
    for i in 0..count {
        let prompt = portfolio
            .registry()
            .add_prompt(college.id, format!("{name} prompt {}", i + 1), Some(250))
            .await
            .expect("add prompt");
        prompts.push(prompt);
    }
    (college, prompts)
}
