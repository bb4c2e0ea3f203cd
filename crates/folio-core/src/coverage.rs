//! Per-college value coverage
//!
//! Coverage of a college is the union of the values on the essays linked to
//! its prompts. It is computed on every call and never stored.

use crate::error::FolioError;
use crate::repository::Repository;
use crate::types::{College, CollegeId, Essay, EssayId, Prompt, Value, ValueId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Read-side coverage queries
#[derive(Debug, Clone)]
pub struct CoverageAggregator {
    repo: Arc<Repository>,
}

impl CoverageAggregator {
    pub(crate) fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Values covered by the essays linked to a college's prompts
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the college does not exist
    pub async fn coverage_for_college(
        &self,
        college_id: CollegeId,
    ) -> Result<BTreeSet<ValueId>, FolioError> {
        self.repo.require::<College>(college_id).await?;

        let prompts = self.repo.list::<Prompt>().await?;
        let mut covered = BTreeSet::new();
        for prompt in prompts.iter().filter(|p| p.college_id == college_id) {
            let Some(essay_id) = prompt.linked_essay_id else {
                continue;
            };
            match self.repo.get::<Essay>(essay_id).await? {
                Some(essay) => covered.extend(essay.assigned_values),
                None => warn_dangling(prompt, essay_id),
            }
        }
        Ok(covered)
    }

    /// Coverage of every college, including colleges with nothing covered
    pub async fn coverage_by_college(
        &self,
    ) -> Result<BTreeMap<CollegeId, BTreeSet<ValueId>>, FolioError> {
        let colleges = self.repo.list::<College>().await?;
        let prompts = self.repo.list::<Prompt>().await?;
        let essays: HashMap<EssayId, Essay> = self
            .repo
            .list::<Essay>()
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let mut coverage: BTreeMap<CollegeId, BTreeSet<ValueId>> =
            colleges.iter().map(|c| (c.id, BTreeSet::new())).collect();

        for prompt in &prompts {
            let Some(essay_id) = prompt.linked_essay_id else {
                continue;
            };
            let Some(covered) = coverage.get_mut(&prompt.college_id) else {
                continue;
            };
            match essays.get(&essay_id) {
                Some(essay) => covered.extend(essay.assigned_values.iter().copied()),
                None => warn_dangling(prompt, essay_id),
            }
        }
        Ok(coverage)
    }

    /// Registered values not yet covered for a college
    pub async fn missing_values(&self, college_id: CollegeId) -> Result<Vec<Value>, FolioError> {
        let covered = self.coverage_for_college(college_id).await?;
        Ok(self
            .repo
            .list::<Value>()
            .await?
            .into_iter()
            .filter(|v| !covered.contains(&v.id))
            .collect())
    }
}

fn warn_dangling(prompt: &Prompt, essay_id: EssayId) {
    tracing::warn!(
        prompt_id = %prompt.id,
        essay_id = %essay_id,
        "prompt linked to a missing essay; skipped in coverage"
    );
}
