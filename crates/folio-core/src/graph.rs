//! Essay graph manager
//!
//! Owns essays and the operations that keep essays, prompts and value tags
//! consistent:
//! - Creating ideas (CommonApp or Base essays)
//! - Forking a base into a per-prompt branch, or writing a custom branch
//! - Linking and unlinking prompts
//! - Assigning values, mirrored from a base onto its forks
//!
//! Multi-step operations return an [`Outcome`] with their step log. Each one
//! validates its preconditions before the first write and is safe to re-run
//! after a partial failure.
//!
//! Deleting an essay never cascades: forks of a deleted base keep their
//! `sourceEssayId`, and prompts keep pointing at the deleted id until they
//! are unlinked.

use crate::error::{EntityKind, FolioError};
use crate::repository::Repository;
use crate::types::{
    College, Essay, EssayId, EssayKind, EssayStatus, Prompt, PromptId, Value, ValueId, WordBudget,
};
use crate::workflow::{Outcome, Step, StepLog, Workflow};
use std::collections::BTreeSet;
use std::sync::Arc;

/// What unlinking a prompt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlinked {
    /// Prompt had no linked essay
    NothingLinked,
    /// Linked essay was a fork and was deleted
    DeletedFork(EssayId),
    /// Linked essay survives; only the link was cleared
    Detached(EssayId),
    /// Linked essay was already gone; the stale link was cleared
    ClearedDangling(EssayId),
}

/// Essays of one student and their links
#[derive(Debug, Clone)]
pub struct EssayGraph {
    repo: Arc<Repository>,
}

impl EssayGraph {
    pub(crate) fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Create a new idea
    ///
    /// `is_common_app` selects kind `CommonApp`, otherwise `Base`. The essay
    /// starts with status `Idea` and no college or prompt attachment.
    pub async fn create_idea(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        is_common_app: bool,
        prompt_text: Option<String>,
    ) -> Result<Essay, FolioError> {
        let essay = Essay::idea(title, text, is_common_app, prompt_text);
        self.repo.put(&essay).await?;
        tracing::info!(essay_id = %essay.id, kind = essay.kind.tag(), "idea created");
        Ok(essay)
    }

    /// Link an essay to a prompt
    ///
    /// Sets `Prompt.linkedEssayId` and adds the prompt's college to the
    /// essay's assigned colleges. A previously linked essay is left as is,
    /// including its assigned college.
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the prompt or essay does not exist
    pub async fn link_essay_to_prompt(
        &self,
        prompt_id: PromptId,
        essay_id: EssayId,
    ) -> Result<Outcome<Essay>, FolioError> {
        let prompt = self.repo.require::<Prompt>(prompt_id).await?;
        let essay = self.repo.require::<Essay>(essay_id).await?;

        let mut log = StepLog::new(Workflow::LinkEssay);
        let essay = self.link(prompt, essay, &mut log).await?;
        tracing::info!(prompt_id = %prompt_id, essay_id = %essay_id, "essay linked");
        Ok(Outcome::new(essay, log))
    }

    async fn link(
        &self,
        mut prompt: Prompt,
        mut essay: Essay,
        log: &mut StepLog,
    ) -> Result<Essay, FolioError> {
        if prompt.linked_essay_id != Some(essay.id) {
            if let Some(previous) = prompt.linked_essay_id {
                tracing::debug!(
                    prompt_id = %prompt.id,
                    previous = %previous,
                    "replacing existing prompt link"
                );
            }
            prompt.linked_essay_id = Some(essay.id);
            self.repo.put(&prompt).await.map_err(|e| log.fail(e))?;
            log.record(Step::LinkedPrompt {
                prompt: prompt.id,
                essay: essay.id,
            });
        }

        if essay.assigned_colleges.insert(prompt.college_id) {
            essay.touch();
            self.repo.put(&essay).await.map_err(|e| log.fail(e))?;
            log.record(Step::AssignedCollege {
                essay: essay.id,
                college: prompt.college_id,
            });
        }

        Ok(essay)
    }

    /// Fork a base essay for a prompt
    ///
    /// The branch copies the base's title, body and values now; bodies evolve
    /// independently afterwards while values stay mirrored. The prompt's
    /// college is added to the base's assigned colleges and the branch is
    /// linked as the final step.
    ///
    /// A branch of the same base for the same prompt left behind by an earlier
    /// attempt is reused instead of creating a second one.
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the prompt or base does not exist
    /// - `FolioError::InvalidState` if the essay is not a base
    pub async fn branch_essay(
        &self,
        prompt_id: PromptId,
        base_id: EssayId,
    ) -> Result<Outcome<Essay>, FolioError> {
        let prompt = self.repo.require::<Prompt>(prompt_id).await?;
        let mut base = self.repo.require::<Essay>(base_id).await?;

        match base.kind {
            EssayKind::Base => {}
            EssayKind::CommonApp => {
                return Err(FolioError::invalid_state(format!(
                    "essay {base_id} is a Common App essay and cannot be forked"
                )));
            }
            EssayKind::Branch(_) => {
                return Err(FolioError::invalid_state(format!(
                    "essay {base_id} is already a branch; only base essays can be forked"
                )));
            }
        }

        let mut log = StepLog::new(Workflow::BranchEssay);
        let existing = self.find_fork(&prompt, base_id).await?;

        let branch = if let Some(mut branch) = existing {
            tracing::debug!(branch_id = %branch.id, "resuming earlier fork");
            if branch.assigned_values != base.assigned_values {
                branch.assigned_values = base.assigned_values.clone();
                branch.touch();
                self.repo.put(&branch).await.map_err(|e| log.fail(e))?;
                log.record(Step::WroteValues(branch.id));
            }
            branch
        } else {
            let branch = Essay::fork(&base, &prompt);
            self.repo.put(&branch).await.map_err(|e| log.fail(e))?;
            log.record(Step::CreatedEssay(branch.id));
            branch
        };

        if base.assigned_colleges.insert(prompt.college_id) {
            base.touch();
            self.repo.put(&base).await.map_err(|e| log.fail(e))?;
            log.record(Step::AssignedCollege {
                essay: base.id,
                college: prompt.college_id,
            });
        }

        let branch = self.link(prompt, branch, &mut log).await?;
        tracing::info!(
            branch_id = %branch.id,
            base_id = %base_id,
            prompt_id = %prompt_id,
            steps = log.len(),
            "essay branched"
        );
        Ok(Outcome::new(branch, log))
    }

    /// Existing fork of `base_id` for `prompt`, preferring the linked one
    async fn find_fork(
        &self,
        prompt: &Prompt,
        base_id: EssayId,
    ) -> Result<Option<Essay>, FolioError> {
        let mut forks: Vec<Essay> = self
            .repo
            .list::<Essay>()
            .await?
            .into_iter()
            .filter(|e| e.is_fork_of(base_id) && e.prompt_id() == Some(prompt.id))
            .collect();

        if let Some(pos) = forks
            .iter()
            .position(|e| prompt.linked_essay_id == Some(e.id))
        {
            return Ok(Some(forks.swap_remove(pos)));
        }
        Ok(forks.into_iter().next())
    }

    /// Write a new essay from scratch for a prompt
    ///
    /// Creates an empty, unforked branch with status `In Progress` and links
    /// it. An empty custom branch for the same prompt left by an earlier
    /// attempt is reused, preferring the one the prompt already links to.
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the prompt does not exist
    pub async fn write_custom_for_prompt(
        &self,
        prompt_id: PromptId,
    ) -> Result<Outcome<Essay>, FolioError> {
        let prompt = self.repo.require::<Prompt>(prompt_id).await?;
        let mut log = StepLog::new(Workflow::WriteCustom);

        let mut candidates: Vec<Essay> = self
            .repo
            .list::<Essay>()
            .await?
            .into_iter()
            .filter(|e| e.prompt_id() == Some(prompt_id) && !e.is_forked() && e.body.is_empty())
            .collect();
        let leftover = match candidates
            .iter()
            .position(|e| prompt.linked_essay_id == Some(e.id))
        {
            Some(pos) => Some(candidates.swap_remove(pos)),
            None => candidates.into_iter().next(),
        };

        let essay = if let Some(essay) = leftover {
            tracing::debug!(essay_id = %essay.id, "resuming earlier custom essay");
            essay
        } else {
            let title = match self.repo.get::<College>(prompt.college_id).await? {
                Some(college) => format!("{} essay", college.name),
                None => "Custom essay".to_string(),
            };
            let essay = Essay::custom(title, &prompt);
            self.repo.put(&essay).await.map_err(|e| log.fail(e))?;
            log.record(Step::CreatedEssay(essay.id));
            essay
        };

        let essay = self.link(prompt, essay, &mut log).await?;
        tracing::info!(essay_id = %essay.id, prompt_id = %prompt_id, "custom essay written");
        Ok(Outcome::new(essay, log))
    }

    /// Unlink whatever essay fulfils a prompt
    ///
    /// A forked branch exists only to answer its prompt, so it is deleted.
    /// Any other essay survives and only the link is cleared. Unlinking a
    /// prompt with no link is a no-op.
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the prompt does not exist
    pub async fn unlink_essay_from_prompt(
        &self,
        prompt_id: PromptId,
    ) -> Result<Outcome<Unlinked>, FolioError> {
        let mut prompt = self.repo.require::<Prompt>(prompt_id).await?;
        let mut log = StepLog::new(Workflow::UnlinkEssay);

        let Some(essay_id) = prompt.linked_essay_id else {
            return Ok(Outcome::new(Unlinked::NothingLinked, log));
        };

        let result = match self.repo.get::<Essay>(essay_id).await? {
            Some(essay) if essay.is_forked() => {
                self.repo
                    .delete::<Essay>(essay_id)
                    .await
                    .map_err(|e| log.fail(e))?;
                log.record(Step::DeletedEssay(essay_id));
                Unlinked::DeletedFork(essay_id)
            }
            Some(_) => Unlinked::Detached(essay_id),
            None => {
                tracing::warn!(
                    prompt_id = %prompt_id,
                    essay_id = %essay_id,
                    "prompt linked to a missing essay"
                );
                Unlinked::ClearedDangling(essay_id)
            }
        };

        prompt.linked_essay_id = None;
        self.repo.put(&prompt).await.map_err(|e| log.fail(e))?;
        log.record(Step::ClearedLink(prompt_id));

        tracing::info!(prompt_id = %prompt_id, result = ?result, "prompt unlinked");
        Ok(Outcome::new(result, log))
    }

    /// Delete an essay document
    ///
    /// Does not touch forks of this essay nor prompts linking to it.
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the essay does not exist
    pub async fn delete_essay(&self, essay_id: EssayId) -> Result<(), FolioError> {
        if !self.repo.delete::<Essay>(essay_id).await? {
            return Err(FolioError::not_found(EntityKind::Essay, essay_id));
        }
        tracing::info!(essay_id = %essay_id, "essay deleted");
        Ok(())
    }

    /// Flip a value's membership on an essay
    ///
    /// Returns the resulting value set. See [`Self::set_value_on_essay`] for
    /// which essays are written.
    pub async fn toggle_value_on_essay(
        &self,
        essay_id: EssayId,
        value_id: ValueId,
    ) -> Result<Outcome<BTreeSet<ValueId>>, FolioError> {
        let essay = self.repo.require::<Essay>(essay_id).await?;
        let holder = self.value_holder(essay).await?;
        let assigned = !holder.assigned_values.contains(&value_id);
        self.set_value_on_essay(essay_id, value_id, assigned).await
    }

    /// Assign or remove a value on an essay
    ///
    /// - Base: the base is updated and its full value set is written to every
    ///   fork of it.
    /// - Forked branch: routed to its base, so the base and all its forks end
    ///   with the same set. A fork whose base is gone is updated alone.
    /// - CommonApp or custom branch: only that essay is updated.
    ///
    /// Re-running against an already consistent state writes nothing.
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the essay does not exist, or if assigning
    ///   a value that does not exist
    pub async fn set_value_on_essay(
        &self,
        essay_id: EssayId,
        value_id: ValueId,
        assigned: bool,
    ) -> Result<Outcome<BTreeSet<ValueId>>, FolioError> {
        let essay = self.repo.require::<Essay>(essay_id).await?;
        if assigned {
            self.repo.require::<Value>(value_id).await?;
        }

        let mut log = StepLog::new(Workflow::AssignValue);
        let mut holder = self.value_holder(essay).await?;

        let changed = if assigned {
            holder.assigned_values.insert(value_id)
        } else {
            holder.assigned_values.remove(&value_id)
        };
        if changed {
            holder.touch();
            self.repo.put(&holder).await.map_err(|e| log.fail(e))?;
            log.record(Step::WroteValues(holder.id));
        }

        if holder.is_base() {
            self.propagate(&holder, &mut log).await?;
        }

        tracing::info!(
            essay_id = %essay_id,
            value_id = %value_id,
            assigned,
            steps = log.len(),
            "value assignment applied"
        );

        // forks of the holder now mirror its set
        Ok(Outcome::new(holder.assigned_values, log))
    }

    /// Essay whose value set is authoritative for `essay`
    async fn value_holder(&self, essay: Essay) -> Result<Essay, FolioError> {
        let Some(base_id) = essay.source_essay_id() else {
            return Ok(essay);
        };
        match self.repo.get::<Essay>(base_id).await? {
            Some(base) => Ok(base),
            None => {
                tracing::warn!(
                    essay_id = %essay.id,
                    base_id = %base_id,
                    "fork of a deleted base; updating it alone"
                );
                Ok(essay)
            }
        }
    }

    /// Write `base`'s value set to every fork that differs
    async fn propagate(&self, base: &Essay, log: &mut StepLog) -> Result<usize, FolioError> {
        let forks = self.branches_of(base.id).await.map_err(|e| log.fail(e))?;

        let mut written = 0;
        for mut fork in forks {
            if fork.assigned_values == base.assigned_values {
                continue;
            }
            fork.assigned_values = base.assigned_values.clone();
            fork.touch();
            self.repo.put(&fork).await.map_err(|e| log.fail(e))?;
            log.record(Step::WroteValues(fork.id));
            written += 1;
        }
        Ok(written)
    }

    /// Rewrite every fork's values from its base
    ///
    /// Repairs a propagation that stopped part-way. Returns the number of
    /// forks rewritten; zero when already consistent.
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the essay does not exist
    /// - `FolioError::InvalidState` if it is not a base
    pub async fn resync_branches(&self, base_id: EssayId) -> Result<Outcome<usize>, FolioError> {
        let base = self.repo.require::<Essay>(base_id).await?;
        if !base.is_base() {
            return Err(FolioError::invalid_state(format!(
                "essay {base_id} is not a base essay"
            )));
        }

        let mut log = StepLog::new(Workflow::ResyncBranches);
        let written = self.propagate(&base, &mut log).await?;
        tracing::info!(base_id = %base_id, written, "branches resynced");
        Ok(Outcome::new(written, log))
    }

    /// Flip the emphasis flag
    pub async fn toggle_emphasis(&self, essay_id: EssayId) -> Result<Essay, FolioError> {
        self.update(essay_id, |essay| essay.is_emphasized = !essay.is_emphasized)
            .await
    }

    /// Set the status; every transition is allowed
    pub async fn set_status(
        &self,
        essay_id: EssayId,
        status: EssayStatus,
    ) -> Result<Essay, FolioError> {
        self.update(essay_id, |essay| essay.status = status).await
    }

    /// Replace the title
    pub async fn update_title(
        &self,
        essay_id: EssayId,
        title: impl Into<String>,
    ) -> Result<Essay, FolioError> {
        let title = title.into();
        self.update(essay_id, move |essay| essay.title = title).await
    }

    /// Replace the body; forks and bases never see each other's edits
    pub async fn update_body(
        &self,
        essay_id: EssayId,
        body: impl Into<String>,
    ) -> Result<Essay, FolioError> {
        let body = body.into();
        self.update(essay_id, move |essay| essay.body = body).await
    }

    async fn update<F>(&self, essay_id: EssayId, edit: F) -> Result<Essay, FolioError>
    where
        F: FnOnce(&mut Essay),
    {
        let mut essay = self.repo.require::<Essay>(essay_id).await?;
        edit(&mut essay);
        essay.touch();
        self.repo.put(&essay).await?;
        Ok(essay)
    }

    /// Get an essay
    pub async fn essay(&self, essay_id: EssayId) -> Result<Essay, FolioError> {
        self.repo.require(essay_id).await
    }

    /// All essays
    pub async fn essays(&self) -> Result<Vec<Essay>, FolioError> {
        self.repo.list().await
    }

    /// Forks of a base, whether or not the base still exists
    pub async fn branches_of(&self, base_id: EssayId) -> Result<Vec<Essay>, FolioError> {
        Ok(self
            .repo
            .list::<Essay>()
            .await?
            .into_iter()
            .filter(|e| e.is_fork_of(base_id))
            .collect())
    }

    /// Word count against the limit of the prompt a branch answers
    ///
    /// A missing prompt (deleted after linking) means no limit.
    pub async fn word_budget(&self, essay_id: EssayId) -> Result<WordBudget, FolioError> {
        let essay = self.repo.require::<Essay>(essay_id).await?;
        let limit = match essay.prompt_id() {
            Some(prompt_id) => self
                .repo
                .get::<Prompt>(prompt_id)
                .await?
                .and_then(|p| p.word_limit),
            None => None,
        };
        Ok(WordBudget {
            words: essay.word_count(),
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PromptRegistry;
    use folio_store::InMemoryDocumentStore;

    struct Fixture {
        registry: PromptRegistry,
        graph: EssayGraph,
        repo: Arc<Repository>,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(Repository::new(
            Arc::new(InMemoryDocumentStore::new()),
            "s1",
            true,
        ));
        Fixture {
            registry: PromptRegistry::new(repo.clone()),
            graph: EssayGraph::new(repo.clone()),
            repo,
        }
    }

    async fn prompt(fx: &Fixture, college: &str) -> Prompt {
        let college = fx.registry.add_college(college).await.unwrap();
        fx.registry
            .add_prompt(college.id, "Why us?", Some(250))
            .await
            .unwrap()
    }

    async fn value(fx: &Fixture, name: &str) -> Value {
        let value = Value::new(name, "#000000");
        fx.repo.put(&value).await.unwrap();
        value
    }

    #[tokio::test]
    async fn link_adds_college_once() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let essay = fx.graph.create_idea("Story", "", true, None).await.unwrap();

        let first = fx.graph.link_essay_to_prompt(p.id, essay.id).await.unwrap();
        assert_eq!(first.steps_completed(), 2);
        assert!(first.value.assigned_colleges.contains(&p.college_id));

        let again = fx.graph.link_essay_to_prompt(p.id, essay.id).await.unwrap();
        assert!(again.was_noop());
    }

    #[tokio::test]
    async fn relinking_keeps_previous_essay_college() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let a = fx.graph.create_idea("A", "", true, None).await.unwrap();
        let b = fx.graph.create_idea("B", "", true, None).await.unwrap();

        fx.graph.link_essay_to_prompt(p.id, a.id).await.unwrap();
        fx.graph.link_essay_to_prompt(p.id, b.id).await.unwrap();

        let prompt = fx.registry.prompt(p.id).await.unwrap();
        assert_eq!(prompt.linked_essay_id, Some(b.id));
        let a = fx.graph.essay(a.id).await.unwrap();
        assert!(a.assigned_colleges.contains(&p.college_id));
    }

    #[tokio::test]
    async fn branching_a_branch_is_invalid() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let base = fx.graph.create_idea("Base", "text", false, None).await.unwrap();
        let branch = fx.graph.branch_essay(p.id, base.id).await.unwrap().value;

        let err = fx.graph.branch_essay(p.id, branch.id).await.unwrap_err();
        assert!(matches!(err, FolioError::InvalidState(_)));
    }

    #[tokio::test]
    async fn common_app_cannot_be_forked() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let common = fx.graph.create_idea("CA", "text", true, None).await.unwrap();

        let err = fx.graph.branch_essay(p.id, common.id).await.unwrap_err();
        assert!(matches!(err, FolioError::InvalidState(_)));
    }

    #[tokio::test]
    async fn branching_twice_reuses_the_fork() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let base = fx.graph.create_idea("Base", "text", false, None).await.unwrap();

        let first = fx.graph.branch_essay(p.id, base.id).await.unwrap();
        let second = fx.graph.branch_essay(p.id, base.id).await.unwrap();

        assert_eq!(first.value.id, second.value.id);
        assert!(second.was_noop());
        assert_eq!(fx.graph.branches_of(base.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fork_of_value_toggle_routes_through_base() {
        let fx = fixture();
        let p1 = prompt(&fx, "Reed").await;
        let p2 = prompt(&fx, "Rice").await;
        let grit = value(&fx, "Grit").await;
        let base = fx.graph.create_idea("Base", "text", false, None).await.unwrap();
        let f1 = fx.graph.branch_essay(p1.id, base.id).await.unwrap().value;
        let f2 = fx.graph.branch_essay(p2.id, base.id).await.unwrap().value;

        let result = fx.graph.toggle_value_on_essay(f1.id, grit.id).await.unwrap();
        assert!(result.value.contains(&grit.id));

        for id in [base.id, f1.id, f2.id] {
            let essay = fx.graph.essay(id).await.unwrap();
            assert!(essay.assigned_values.contains(&grit.id), "essay {id}");
        }
    }

    #[tokio::test]
    async fn clearing_through_fork_returns_stored_set() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let grit = value(&fx, "Grit").await;
        let humor = value(&fx, "Humor").await;
        let base = fx.graph.create_idea("Base", "text", false, None).await.unwrap();
        let fork = fx.graph.branch_essay(p.id, base.id).await.unwrap().value;
        fx.graph.set_value_on_essay(base.id, grit.id, true).await.unwrap();
        fx.graph.set_value_on_essay(base.id, humor.id, true).await.unwrap();

        let outcome = fx.graph.set_value_on_essay(fork.id, grit.id, false).await.unwrap();

        assert_eq!(outcome.value, BTreeSet::from([humor.id]));
        let stored = fx.graph.essay(fork.id).await.unwrap();
        assert_eq!(stored.assigned_values, outcome.value);
        assert_eq!(outcome.steps_completed(), 2);
    }

    #[tokio::test]
    async fn common_app_toggle_is_local() {
        let fx = fixture();
        let grit = value(&fx, "Grit").await;
        let common = fx.graph.create_idea("CA", "", true, None).await.unwrap();
        let other = fx.graph.create_idea("CA2", "", true, None).await.unwrap();

        let outcome = fx.graph.toggle_value_on_essay(common.id, grit.id).await.unwrap();
        assert_eq!(outcome.steps_completed(), 1);
        assert!(fx.graph.essay(other.id).await.unwrap().assigned_values.is_empty());
    }

    #[tokio::test]
    async fn assigning_unknown_value_is_not_found() {
        let fx = fixture();
        let essay = fx.graph.create_idea("CA", "", true, None).await.unwrap();
        let err = fx
            .graph
            .set_value_on_essay(essay.id, ValueId::new(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::NotFound { kind: EntityKind::Value, .. }));
    }

    #[tokio::test]
    async fn set_value_is_idempotent() {
        let fx = fixture();
        let grit = value(&fx, "Grit").await;
        let essay = fx.graph.create_idea("Base", "", false, None).await.unwrap();

        let first = fx.graph.set_value_on_essay(essay.id, grit.id, true).await.unwrap();
        let second = fx.graph.set_value_on_essay(essay.id, grit.id, true).await.unwrap();

        assert_eq!(first.value, second.value);
        assert!(second.was_noop());
    }

    #[tokio::test]
    async fn unlink_without_link_is_noop() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let outcome = fx.graph.unlink_essay_from_prompt(p.id).await.unwrap();
        assert_eq!(outcome.value, Unlinked::NothingLinked);
        assert!(outcome.was_noop());
    }

    #[tokio::test]
    async fn unlink_after_generic_delete_clears_dangling_link() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let essay = fx.graph.create_idea("CA", "", true, None).await.unwrap();
        fx.graph.link_essay_to_prompt(p.id, essay.id).await.unwrap();

        fx.graph.delete_essay(essay.id).await.unwrap();
        assert_eq!(
            fx.registry.prompt(p.id).await.unwrap().linked_essay_id,
            Some(essay.id)
        );

        let outcome = fx.graph.unlink_essay_from_prompt(p.id).await.unwrap();
        assert_eq!(outcome.value, Unlinked::ClearedDangling(essay.id));
        assert!(fx.registry.prompt(p.id).await.unwrap().linked_essay_id.is_none());
    }

    #[tokio::test]
    async fn deleting_base_leaves_forks() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let base = fx.graph.create_idea("Base", "text", false, None).await.unwrap();
        let fork = fx.graph.branch_essay(p.id, base.id).await.unwrap().value;

        fx.graph.delete_essay(base.id).await.unwrap();

        let fork = fx.graph.essay(fork.id).await.unwrap();
        assert_eq!(fork.source_essay_id(), Some(base.id));
        assert!(fx.graph.delete_essay(base.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn status_accepts_any_transition() {
        let fx = fixture();
        let essay = fx.graph.create_idea("CA", "", true, None).await.unwrap();

        for status in [
            EssayStatus::Submitted,
            EssayStatus::Idea,
            EssayStatus::Proofread,
            EssayStatus::InProgress,
            EssayStatus::Submitted,
        ] {
            let updated = fx.graph.set_status(essay.id, status).await.unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn emphasis_flips() {
        let fx = fixture();
        let essay = fx.graph.create_idea("CA", "", true, None).await.unwrap();
        assert!(fx.graph.toggle_emphasis(essay.id).await.unwrap().is_emphasized);
        assert!(!fx.graph.toggle_emphasis(essay.id).await.unwrap().is_emphasized);
    }

    #[tokio::test]
    async fn word_budget_uses_prompt_limit() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let custom = fx.graph.write_custom_for_prompt(p.id).await.unwrap().value;
        fx.graph
            .update_body(custom.id, "word ".repeat(260))
            .await
            .unwrap();

        let budget = fx.graph.word_budget(custom.id).await.unwrap();
        assert_eq!(budget.words, 260);
        assert_eq!(budget.limit, Some(250));
        assert!(budget.is_over());
    }

    #[tokio::test]
    async fn custom_essay_title_uses_college_name() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;
        let custom = fx.graph.write_custom_for_prompt(p.id).await.unwrap().value;
        assert_eq!(custom.title, "Reed essay");
        assert_eq!(custom.status, EssayStatus::InProgress);
    }

    #[tokio::test]
    async fn writing_custom_twice_reuses_the_linked_essay() {
        let fx = fixture();
        let p = prompt(&fx, "Reed").await;

        let first = fx.graph.write_custom_for_prompt(p.id).await.unwrap();
        let second = fx.graph.write_custom_for_prompt(p.id).await.unwrap();

        assert_eq!(first.value.id, second.value.id);
        assert!(second.was_noop());
        let customs = fx
            .graph
            .essays()
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.prompt_id() == Some(p.id))
            .count();
        assert_eq!(customs, 1);
    }

    #[tokio::test]
    async fn resync_requires_base() {
        let fx = fixture();
        let common = fx.graph.create_idea("CA", "", true, None).await.unwrap();
        let err = fx.graph.resync_branches(common.id).await.unwrap_err();
        assert!(matches!(err, FolioError::InvalidState(_)));
    }
}
