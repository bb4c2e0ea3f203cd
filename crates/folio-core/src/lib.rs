//! Folio Core - Essay portfolio linking engine
//!
//! Keeps a student's essays, the colleges and prompts they answer, and their
//! value tags consistent:
//! - Forks a base essay into per-prompt branches
//! - Links and unlinks essays to prompts, one essay per prompt
//! - Mirrors value tags from a base onto all of its branches
//! - Computes which values each college's linked essays cover
//!
//! The store offers no multi-document transactions. Multi-step operations
//! report the writes they issued and are safe to re-run after a failure.
//!
//! # Example
//!
//! ```rust
//! use folio_core::prelude::*;
//! use folio_store::InMemoryDocumentStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), FolioError> {
//! let portfolio = Portfolio::new(Arc::new(InMemoryDocumentStore::new()), FolioConfig::new())?;
//!
//! let reed = portfolio.registry().add_college("Reed").await?;
//! let prompt = portfolio.registry().add_prompt(reed.id, "Why Reed?", Some(300)).await?;
//! let base = portfolio.graph().create_idea("Robotics", "Losing well", false, None).await?;
//!
//! let branch = portfolio.graph().branch_essay(prompt.id, base.id).await?.into_value();
//! assert_eq!(branch.source_essay_id(), Some(base.id));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod audit;
pub mod config;
pub mod coverage;
pub mod error;
pub mod graph;
pub mod ideas;
pub mod portfolio;
pub mod registry;
pub mod types;
pub mod values;
pub mod workflow;

mod repository;

// Re-exports for convenience
pub use audit::{IntegrityIssue, IntegrityReport};
pub use config::{FolioConfig, DEFAULT_PALETTE};
pub use coverage::CoverageAggregator;
pub use error::{EntityKind, FolioError, PartialCompletion};
pub use graph::{EssayGraph, Unlinked};
pub use ideas::{Activity, Honor, IdeaRequest, IdeaSource, IdeaSuggestion, StaticIdeaSource};
pub use portfolio::Portfolio;
pub use registry::PromptRegistry;
pub use types::{
    BranchTarget, College, CollegeId, Essay, EssayId, EssayKind, EssayShapeError, EssayStatus,
    Prompt, PromptId, Value, ValueId, WordBudget,
};
pub use values::{SweepReport, ValueRegistry};
pub use workflow::{Outcome, Step, StepLog, Workflow};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Folio Core
    pub use crate::{
        College, CollegeId, Essay, EssayId, EssayKind, EssayStatus, FolioConfig, FolioError,
        Outcome, Portfolio, Prompt, PromptId, Value, ValueId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
