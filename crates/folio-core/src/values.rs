//! Value tag registry
//!
//! Values are named, colored tags attached to essays. New values take the
//! next palette color; deleting a value sweeps it from every essay.

use crate::config::FolioConfig;
use crate::error::FolioError;
use crate::repository::Repository;
use crate::types::{Essay, Value, ValueId};
use crate::workflow::{Outcome, Step, StepLog, Workflow};
use std::sync::Arc;

/// Result of deleting a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Whether a value document was removed
    pub value_removed: bool,
    /// Essays whose `assignedValues` were rewritten
    pub essays_updated: usize,
}

/// Values of one student
#[derive(Debug, Clone)]
pub struct ValueRegistry {
    repo: Arc<Repository>,
    config: Arc<FolioConfig>,
}

impl ValueRegistry {
    pub(crate) fn new(repo: Arc<Repository>, config: Arc<FolioConfig>) -> Self {
        Self { repo, config }
    }

    /// Create a value colored `palette[count % len]`
    pub async fn create_value(&self, name: impl Into<String>) -> Result<Value, FolioError> {
        let count = self.repo.list::<Value>().await?.len();
        let value = Value::new(name, self.config.color_for(count));
        self.repo.put(&value).await?;
        tracing::info!(value_id = %value.id, color = %value.color, "value created");
        Ok(value)
    }

    /// Rename a value; essays reference it by id and are untouched
    ///
    /// # Errors
    /// - `FolioError::NotFound` if the value does not exist
    pub async fn rename_value(
        &self,
        value_id: ValueId,
        name: impl Into<String>,
    ) -> Result<Value, FolioError> {
        let mut value = self.repo.require::<Value>(value_id).await?;
        value.name = name.into();
        self.repo.put(&value).await?;
        Ok(value)
    }

    /// Get a value
    pub async fn value(&self, value_id: ValueId) -> Result<Value, FolioError> {
        self.repo.require(value_id).await
    }

    /// All values
    pub async fn values(&self) -> Result<Vec<Value>, FolioError> {
        self.repo.list().await
    }

    /// Delete a value and remove it from every essay
    ///
    /// The value document goes first, then each essay holding the id is
    /// rewritten. A value that is already gone still gets swept, which is how
    /// a sweep interrupted part-way is finished.
    pub async fn delete_value(&self, value_id: ValueId) -> Result<Outcome<SweepReport>, FolioError> {
        let mut log = StepLog::new(Workflow::DeleteValue);
        let mut report = SweepReport::default();

        report.value_removed = self.repo.delete::<Value>(value_id).await?;
        if report.value_removed {
            log.record(Step::DeletedValue(value_id));
        } else {
            tracing::debug!(value_id = %value_id, "value already gone; sweeping essays");
        }

        let holders: Vec<Essay> = self
            .repo
            .list::<Essay>()
            .await
            .map_err(|e| log.fail(e))?
            .into_iter()
            .filter(|e| e.assigned_values.contains(&value_id))
            .collect();

        for mut essay in holders {
            essay.assigned_values.remove(&value_id);
            essay.touch();
            self.repo.put(&essay).await.map_err(|e| log.fail(e))?;
            log.record(Step::WroteValues(essay.id));
            report.essays_updated += 1;
        }

        tracing::info!(
            value_id = %value_id,
            removed = report.value_removed,
            essays = report.essays_updated,
            "value deleted"
        );
        Ok(Outcome::new(report, log))
    }
}
