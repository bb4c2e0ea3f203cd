//! Portfolio facade
//!
//! One student's portfolio over a document store. Every mutation goes
//! through the components reachable from here, which share one repository
//! (and so one session cache).

use crate::audit::{self, IntegrityReport};
use crate::config::FolioConfig;
use crate::coverage::CoverageAggregator;
use crate::error::FolioError;
use crate::graph::EssayGraph;
use crate::ideas::{IdeaRequest, IdeaSource, IdeaSuggestion};
use crate::registry::PromptRegistry;
use crate::repository::Repository;
use crate::types::Essay;
use crate::values::ValueRegistry;
use folio_store::DocumentStore;
use std::sync::Arc;

/// A student's essay portfolio
#[derive(Debug, Clone)]
pub struct Portfolio {
    config: Arc<FolioConfig>,
    repo: Arc<Repository>,
    registry: PromptRegistry,
    graph: EssayGraph,
    values: ValueRegistry,
    coverage: CoverageAggregator,
}

impl Portfolio {
    /// Open the portfolio of `config.student` in `store`
    ///
    /// # Errors
    /// `FolioError::Config` if the configuration is invalid
    pub fn new(store: Arc<dyn DocumentStore>, config: FolioConfig) -> Result<Self, FolioError> {
        config.validate()?;

        let config = Arc::new(config);
        let repo = Arc::new(Repository::new(
            store,
            config.student.clone(),
            config.cache_enabled,
        ));
        tracing::debug!(
            student = %config.student,
            cache = config.cache_enabled,
            "portfolio opened"
        );

        Ok(Self {
            registry: PromptRegistry::new(repo.clone()),
            graph: EssayGraph::new(repo.clone()),
            values: ValueRegistry::new(repo.clone(), config.clone()),
            coverage: CoverageAggregator::new(repo.clone()),
            config,
            repo,
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// Student scope key
    #[inline]
    #[must_use]
    pub fn student(&self) -> &str {
        self.repo.scope()
    }

    /// Colleges and prompts
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &PromptRegistry {
        &self.registry
    }

    /// Essays, links and value propagation
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &EssayGraph {
        &self.graph
    }

    /// Value tags
    #[inline]
    #[must_use]
    pub fn values(&self) -> &ValueRegistry {
        &self.values
    }

    /// Coverage queries
    #[inline]
    #[must_use]
    pub fn coverage(&self) -> &CoverageAggregator {
        &self.coverage
    }

    /// Scan for dangling references and diverged branches
    pub async fn audit(&self) -> Result<IntegrityReport, FolioError> {
        audit::audit(&self.repo).await
    }

    /// Ask an idea source for angles
    pub async fn suggest_ideas(
        &self,
        source: &dyn IdeaSource,
        request: &IdeaRequest,
    ) -> Result<Vec<IdeaSuggestion>, FolioError> {
        let suggestions = source.suggest(request).await?;
        tracing::debug!(count = suggestions.len(), "idea suggestions received");
        Ok(suggestions)
    }

    /// Turn a picked suggestion into an idea
    pub async fn create_idea_from_suggestion(
        &self,
        suggestion: &IdeaSuggestion,
        is_common_app: bool,
        prompt_text: Option<String>,
    ) -> Result<Essay, FolioError> {
        self.graph
            .create_idea(
                suggestion.title.clone(),
                suggestion.angle.clone(),
                is_common_app,
                prompt_text,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ideas::StaticIdeaSource;
    use crate::types::{EssayKind, EssayStatus};
    use folio_store::InMemoryDocumentStore;

    fn portfolio(student: &str) -> (Arc<InMemoryDocumentStore>, Portfolio) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let config = FolioConfig::new().with_student(student);
        (store.clone(), Portfolio::new(store, config).unwrap())
    }

    #[test]
    fn invalid_config_is_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let result = Portfolio::new(store, FolioConfig::new().with_palette(Vec::<String>::new()));
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[tokio::test]
    async fn students_are_isolated() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let ada = Portfolio::new(store.clone(), FolioConfig::new().with_student("ada")).unwrap();
        let sam = Portfolio::new(store, FolioConfig::new().with_student("sam")).unwrap();

        ada.registry().add_college("Reed").await.unwrap();
        assert_eq!(ada.registry().colleges().await.unwrap().len(), 1);
        assert!(sam.registry().colleges().await.unwrap().is_empty());
        assert_eq!(sam.student(), "sam");
    }

    #[tokio::test]
    async fn suggestion_becomes_idea() {
        let (_, portfolio) = portfolio("ada");
        let source = StaticIdeaSource::new(vec![IdeaSuggestion::new("Night shifts", "Caring late")]);

        let ideas = portfolio
            .suggest_ideas(&source, &IdeaRequest::new("Describe a challenge"))
            .await
            .unwrap();
        let essay = portfolio
            .create_idea_from_suggestion(&ideas[0], false, Some("Describe a challenge".into()))
            .await
            .unwrap();

        assert_eq!(essay.title, "Night shifts");
        assert_eq!(essay.body, "Caring late");
        assert_eq!(essay.kind, EssayKind::Base);
        assert_eq!(essay.status, EssayStatus::Idea);
        assert_eq!(essay.prompt_text.as_deref(), Some("Describe a challenge"));
    }

    #[tokio::test]
    async fn writes_are_visible_through_every_component() {
        let (_, portfolio) = portfolio("ada");
        let value = portfolio.values().create_value("Grit").await.unwrap();
        let essay = portfolio
            .graph()
            .create_idea("CA", "", true, None)
            .await
            .unwrap();
        portfolio
            .graph()
            .toggle_value_on_essay(essay.id, value.id)
            .await
            .unwrap();

        assert!(portfolio.audit().await.unwrap().is_clean());
    }
}
