//! Folio document store boundary
//!
//! The external persistent store the portfolio engine writes through.
//!
//! # Core Operations
//!
//! - **get**: fetch one document by key
//! - **put**: create or replace one document
//! - **delete**: remove one document
//! - **list**: enumerate a `(scope, collection)` namespace
//!
//! Every call is its own round trip; the store offers no multi-document
//! transaction. The engine in `folio-core` sequences its writes and reports
//! partial completion when a later write fails.
//!
//! # Example
//!
//! ```rust
//! use folio_store::{DocumentStore, InMemoryDocumentStore, Namespace};
//!
//! # async fn example() -> Result<(), folio_store::StoreError> {
//! let store = InMemoryDocumentStore::new();
//! let essays = Namespace::new("student-1", "essays");
//!
//! store.put(&essays.key("e1"), serde_json::Map::new()).await?;
//! assert_eq!(store.list(&essays).await?.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod file;
pub mod memory;

// Re-exports for convenience
pub use document::{Document, DocumentKey, DocumentStore, Namespace};
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
