//! Prompt/College registry
//!
//! Owns colleges and their prompts. A prompt belongs to exactly one college
//! and is fulfilled by at most one essay. Deleting a prompt leaves the essay it
//! pointed to (and that essay's `promptId`) in place.

use crate::error::{EntityKind, FolioError};
use crate::repository::Repository;
use crate::types::{College, CollegeId, Prompt, PromptId};
use std::sync::Arc;

/// Colleges and prompts for one student
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    repo: Arc<Repository>,
}

impl PromptRegistry {
    pub(crate) fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Add a college
    pub async fn add_college(&self, name: impl Into<String>) -> Result<College, FolioError> {
        let college = College::new(name);
        self.repo.put(&college).await?;
        tracing::info!(college_id = %college.id, name = %college.name, "college added");
        Ok(college)
    }

    /// Rename a college
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the college does not exist
    pub async fn rename_college(
        &self,
        college_id: CollegeId,
        name: impl Into<String>,
    ) -> Result<College, FolioError> {
        let mut college = self.repo.require::<College>(college_id).await?;
        college.name = name.into();
        self.repo.put(&college).await?;
        Ok(college)
    }

    /// Get a college
    pub async fn college(&self, college_id: CollegeId) -> Result<College, FolioError> {
        self.repo.require(college_id).await
    }

    /// All colleges
    pub async fn colleges(&self) -> Result<Vec<College>, FolioError> {
        self.repo.list().await
    }

    /// Add a prompt under a college
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the college does not exist
    pub async fn add_prompt(
        &self,
        college_id: CollegeId,
        text: impl Into<String>,
        word_limit: Option<u32>,
    ) -> Result<Prompt, FolioError> {
        self.repo.require::<College>(college_id).await?;

        let prompt = Prompt::new(college_id, text, word_limit);
        self.repo.put(&prompt).await?;
        tracing::info!(prompt_id = %prompt.id, college_id = %college_id, "prompt added");
        Ok(prompt)
    }

    /// Delete a prompt row
    ///
    /// The linked essay is neither deleted nor unlinked; its `promptId`
    /// becomes stale. Use unlink first for a clean removal.
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the prompt does not exist
    pub async fn delete_prompt(&self, prompt_id: PromptId) -> Result<Prompt, FolioError> {
        let prompt = self.repo.require::<Prompt>(prompt_id).await?;
        if !self.repo.delete::<Prompt>(prompt_id).await? {
            return Err(FolioError::not_found(EntityKind::Prompt, prompt_id));
        }
        if let Some(essay_id) = prompt.linked_essay_id {
            tracing::warn!(
                prompt_id = %prompt_id,
                essay_id = %essay_id,
                "prompt deleted while linked; essay keeps a stale prompt reference"
            );
        }
        Ok(prompt)
    }

    /// Set or clear the word limit
    pub async fn update_word_limit(
        &self,
        prompt_id: PromptId,
        limit: Option<u32>,
    ) -> Result<Prompt, FolioError> {
        let mut prompt = self.repo.require::<Prompt>(prompt_id).await?;
        prompt.word_limit = limit;
        self.repo.put(&prompt).await?;
        Ok(prompt)
    }

    /// Replace the prompt text
    pub async fn update_prompt_text(
        &self,
        prompt_id: PromptId,
        text: impl Into<String>,
    ) -> Result<Prompt, FolioError> {
        let mut prompt = self.repo.require::<Prompt>(prompt_id).await?;
        prompt.text = text.into();
        self.repo.put(&prompt).await?;
        Ok(prompt)
    }

    /// Get a prompt
    pub async fn prompt(&self, prompt_id: PromptId) -> Result<Prompt, FolioError> {
        self.repo.require(prompt_id).await
    }

    /// Prompts of one college
    pub async fn prompts_for(&self, college_id: CollegeId) -> Result<Vec<Prompt>, FolioError> {
        Ok(self
            .repo
            .list::<Prompt>()
            .await?
            .into_iter()
            .filter(|p| p.college_id == college_id)
            .collect())
    }

    /// All prompts
    pub async fn prompts(&self) -> Result<Vec<Prompt>, FolioError> {
        self.repo.list().await
    }
}
