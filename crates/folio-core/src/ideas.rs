//! Idea source
//!
//! An idea source proposes essay angles for a prompt given the student's
//! activities and honors. Implementations live outside the core (a model
//! backend, a counselor's list); suggestions are inert data that become Base
//! or Common App ideas only when the student picks one.

use crate::error::FolioError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Extracurricular activity record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Honor or award record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Honor {
    pub title: String,
    /// e.g. school, state, national
    #[serde(default)]
    pub level: Option<String>,
}

/// Input to an idea source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRequest {
    pub prompt_text: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub honors: Vec<Honor>,
}

impl IdeaRequest {
    /// Request for a prompt with no records attached
    #[inline]
    #[must_use]
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            ..Self::default()
        }
    }

    /// With an activity
    #[inline]
    #[must_use]
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    /// With an honor
    #[inline]
    #[must_use]
    pub fn with_honor(mut self, honor: Honor) -> Self {
        self.honors.push(honor);
        self
    }
}

/// A candidate essay angle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaSuggestion {
    pub title: String,
    /// One-paragraph pitch; becomes the idea's body
    pub angle: String,
}

impl IdeaSuggestion {
    /// Create suggestion
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, angle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            angle: angle.into(),
        }
    }
}

/// Source of essay ideas
#[async_trait]
pub trait IdeaSource: Send + Sync {
    /// Propose angles for a prompt
    async fn suggest(&self, request: &IdeaRequest) -> Result<Vec<IdeaSuggestion>, FolioError>;
}

/// Fixed list of suggestions, returned for every request
#[derive(Debug, Clone, Default)]
pub struct StaticIdeaSource {
    suggestions: Vec<IdeaSuggestion>,
}

impl StaticIdeaSource {
    /// Create source from a list
    #[must_use]
    pub fn new(suggestions: Vec<IdeaSuggestion>) -> Self {
        Self { suggestions }
    }

    /// One angle per activity and honor in the request
    ///
    /// Used when no list was configured, so a demo still has something to
    /// offer.
    fn from_records(request: &IdeaRequest) -> Vec<IdeaSuggestion> {
        let activities = request.activities.iter().map(|a| {
            let angle = match &a.role {
                Some(role) => format!("What being {role} in {} taught you", a.name),
                None => format!("A moment from {} that changed how you work", a.name),
            };
            IdeaSuggestion::new(a.name.clone(), angle)
        });
        let honors = request.honors.iter().map(|h| {
            IdeaSuggestion::new(
                h.title.clone(),
                format!("The work nobody saw behind {}", h.title),
            )
        });
        activities.chain(honors).collect()
    }
}

#[async_trait]
impl IdeaSource for StaticIdeaSource {
    async fn suggest(&self, request: &IdeaRequest) -> Result<Vec<IdeaSuggestion>, FolioError> {
        if self.suggestions.is_empty() {
            return Ok(Self::from_records(request));
        }
        Ok(self.suggestions.clone())
    }
}
