//! Core types for Folio
//!
//! Defines the portfolio entities:
//! - Colleges and their prompts
//! - Student-defined values (thematic tags)
//! - Essays, whose kind decides which attachments they carry
//!
//! Essays are held in memory as a closed [`EssayKind`] so a branch can never
//! lack its prompt, and a base can never carry a fork source. On disk they are
//! a flat camelCase record; field names there are the stable schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Ulid);

        impl $name {
            /// Generate new ID
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ulid::from_string(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Unique college identifier (ULID for sortability)
    CollegeId
);
entity_id!(
    /// Unique prompt identifier
    PromptId
);
entity_id!(
    /// Unique essay identifier
    EssayId
);
entity_id!(
    /// Unique value (tag) identifier
    ValueId
);

/// A college the student applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub id: CollegeId,
    pub name: String,
}

impl College {
    /// Create new college
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CollegeId::new(),
            name: name.into(),
        }
    }
}

/// A college-specific essay question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: PromptId,
    pub college_id: CollegeId,
    pub text: String,
    #[serde(default)]
    pub word_limit: Option<u32>,
    /// Essay currently fulfilling this prompt (at most one)
    #[serde(default)]
    pub linked_essay_id: Option<EssayId>,
}

impl Prompt {
    /// Create new, unlinked prompt
    #[inline]
    #[must_use]
    pub fn new(college_id: CollegeId, text: impl Into<String>, word_limit: Option<u32>) -> Self {
        Self {
            id: PromptId::new(),
            college_id,
            text: text.into(),
            word_limit,
            linked_essay_id: None,
        }
    }

    /// Whether an essay is linked
    #[inline]
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.linked_essay_id.is_some()
    }
}

/// Student-defined thematic tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub id: ValueId,
    pub name: String,
    /// Hex color, e.g. `#64B5F6`
    pub color: String,
}

impl Value {
    /// Create new value
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: ValueId::new(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Drafting status
///
/// `Idea -> In Progress -> Proofread -> Submitted` is the usual order, but any
/// status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EssayStatus {
    #[serde(rename = "Idea")]
    Idea,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Proofread")]
    Proofread,
    #[serde(rename = "Submitted")]
    Submitted,
}

impl EssayStatus {
    /// All statuses in their usual order
    pub const ALL: [EssayStatus; 4] = [
        EssayStatus::Idea,
        EssayStatus::InProgress,
        EssayStatus::Proofread,
        EssayStatus::Submitted,
    ];

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            EssayStatus::Idea => "Idea",
            EssayStatus::InProgress => "In Progress",
            EssayStatus::Proofread => "Proofread",
            EssayStatus::Submitted => "Submitted",
        }
    }
}

impl fmt::Display for EssayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EssayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "idea" => Ok(EssayStatus::Idea),
            "inprogress" => Ok(EssayStatus::InProgress),
            "proofread" => Ok(EssayStatus::Proofread),
            "submitted" => Ok(EssayStatus::Submitted),
            _ => Err(format!("unknown essay status: {s}")),
        }
    }
}

/// Prompt attachment carried by every branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchTarget {
    pub prompt_id: PromptId,
    pub college_id: CollegeId,
    /// Base essay this branch was forked from; `None` for custom branches
    pub source_essay_id: Option<EssayId>,
}

/// Essay kind with its kind-specific fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EssayKind {
    /// Independent top-level draft, never forked, never propagated
    CommonApp,
    /// Draft not tied to a prompt; origin of zero or more branches
    Base,
    /// Per-prompt essay, forked or written from scratch
    Branch(BranchTarget),
}

impl EssayKind {
    /// Short tag used in the stored record
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            EssayKind::CommonApp => "CommonApp",
            EssayKind::Base => "Base",
            EssayKind::Branch(_) => "Branch",
        }
    }
}

/// An essay draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "EssayRecord", try_from = "EssayRecord")]
pub struct Essay {
    pub id: EssayId,
    pub title: String,
    /// Draft body, or idea text while the essay is still an idea
    pub body: String,
    pub status: EssayStatus,
    pub kind: EssayKind,
    /// Prompt text captured when the idea was created
    pub prompt_text: Option<String>,
    pub assigned_values: BTreeSet<ValueId>,
    pub assigned_colleges: BTreeSet<CollegeId>,
    pub is_emphasized: bool,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Essay {
    fn blank(kind: EssayKind, status: EssayStatus) -> Self {
        let now = Utc::now();
        Self {
            id: EssayId::new(),
            title: String::new(),
            body: String::new(),
            status,
            kind,
            prompt_text: None,
            assigned_values: BTreeSet::new(),
            assigned_colleges: BTreeSet::new(),
            is_emphasized: false,
            created_at: now,
            last_modified: now,
        }
    }

    /// New idea: a CommonApp or Base essay with status `Idea`
    #[must_use]
    pub fn idea(
        title: impl Into<String>,
        text: impl Into<String>,
        is_common_app: bool,
        prompt_text: Option<String>,
    ) -> Self {
        let kind = if is_common_app {
            EssayKind::CommonApp
        } else {
            EssayKind::Base
        };
        Self {
            title: title.into(),
            body: text.into(),
            prompt_text,
            ..Self::blank(kind, EssayStatus::Idea)
        }
    }

    /// Fork of `base` for `prompt`, content and values copied now
    #[must_use]
    pub fn fork(base: &Essay, prompt: &Prompt) -> Self {
        let kind = EssayKind::Branch(BranchTarget {
            prompt_id: prompt.id,
            college_id: prompt.college_id,
            source_essay_id: Some(base.id),
        });
        Self {
            title: base.title.clone(),
            body: base.body.clone(),
            assigned_values: base.assigned_values.clone(),
            ..Self::blank(kind, EssayStatus::InProgress)
        }
    }

    /// Empty branch written from scratch for `prompt`
    #[must_use]
    pub fn custom(title: impl Into<String>, prompt: &Prompt) -> Self {
        let kind = EssayKind::Branch(BranchTarget {
            prompt_id: prompt.id,
            college_id: prompt.college_id,
            source_essay_id: None,
        });
        Self {
            title: title.into(),
            ..Self::blank(kind, EssayStatus::InProgress)
        }
    }

    /// Branch attachment, if this is a branch
    #[inline]
    #[must_use]
    pub fn branch_target(&self) -> Option<&BranchTarget> {
        match &self.kind {
            EssayKind::Branch(target) => Some(target),
            _ => None,
        }
    }

    /// Base essay this was forked from
    #[inline]
    #[must_use]
    pub fn source_essay_id(&self) -> Option<EssayId> {
        self.branch_target().and_then(|t| t.source_essay_id)
    }

    /// Prompt this branch answers
    #[inline]
    #[must_use]
    pub fn prompt_id(&self) -> Option<PromptId> {
        self.branch_target().map(|t| t.prompt_id)
    }

    /// College of the prompt this branch answers
    #[inline]
    #[must_use]
    pub fn college_id(&self) -> Option<CollegeId> {
        self.branch_target().map(|t| t.college_id)
    }

    /// Whether this is a branch forked from a base
    #[inline]
    #[must_use]
    pub fn is_forked(&self) -> bool {
        self.source_essay_id().is_some()
    }

    /// Whether this is a base essay (fork source, value propagation origin)
    #[inline]
    #[must_use]
    pub fn is_base(&self) -> bool {
        matches!(self.kind, EssayKind::Base)
    }

    /// Whether this branch was forked from `base`
    #[inline]
    #[must_use]
    pub fn is_fork_of(&self, base: EssayId) -> bool {
        self.source_essay_id() == Some(base)
    }

    /// Whitespace-separated word count of the body
    #[inline]
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    /// Bump `last_modified`
    #[inline]
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

/// Word count against the linked prompt's limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBudget {
    pub words: usize,
    pub limit: Option<u32>,
}

impl WordBudget {
    /// Whether the draft exceeds its limit
    #[inline]
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.limit.is_some_and(|limit| self.words > limit as usize)
    }

    /// Words left before the limit, negative when over
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> Option<i64> {
        self.limit
            .map(|limit| i64::from(limit) - i64::try_from(self.words).unwrap_or(i64::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum KindTag {
    CommonApp,
    Base,
    Branch,
}

/// Flat stored form of an [`Essay`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EssayRecord {
    id: EssayId,
    title: String,
    #[serde(default)]
    body: String,
    status: EssayStatus,
    kind: KindTag,
    #[serde(default)]
    source_essay_id: Option<EssayId>,
    #[serde(default)]
    prompt_id: Option<PromptId>,
    #[serde(default)]
    college_id: Option<CollegeId>,
    #[serde(default)]
    prompt_text: Option<String>,
    #[serde(default)]
    assigned_values: BTreeSet<ValueId>,
    #[serde(default)]
    assigned_colleges: BTreeSet<CollegeId>,
    #[serde(default)]
    is_emphasized: bool,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl From<Essay> for EssayRecord {
    fn from(essay: Essay) -> Self {
        let (kind, target) = match essay.kind {
            EssayKind::CommonApp => (KindTag::CommonApp, None),
            EssayKind::Base => (KindTag::Base, None),
            EssayKind::Branch(target) => (KindTag::Branch, Some(target)),
        };
        Self {
            id: essay.id,
            title: essay.title,
            body: essay.body,
            status: essay.status,
            kind,
            source_essay_id: target.and_then(|t| t.source_essay_id),
            prompt_id: target.map(|t| t.prompt_id),
            college_id: target.map(|t| t.college_id),
            prompt_text: essay.prompt_text,
            assigned_values: essay.assigned_values,
            assigned_colleges: essay.assigned_colleges,
            is_emphasized: essay.is_emphasized,
            created_at: essay.created_at,
            last_modified: essay.last_modified,
        }
    }
}

/// Stored essay record whose fields contradict its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssayShapeError(String);

impl fmt::Display for EssayShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for EssayShapeError {}

impl TryFrom<EssayRecord> for Essay {
    type Error = EssayShapeError;

    fn try_from(record: EssayRecord) -> Result<Self, Self::Error> {
        let kind = match record.kind {
            KindTag::Branch => {
                let (Some(prompt_id), Some(college_id)) = (record.prompt_id, record.college_id)
                else {
                    return Err(EssayShapeError(format!(
                        "branch {} is missing its prompt or college",
                        record.id
                    )));
                };
                EssayKind::Branch(BranchTarget {
                    prompt_id,
                    college_id,
                    source_essay_id: record.source_essay_id,
                })
            }
            tag => {
                if record.source_essay_id.is_some() {
                    return Err(EssayShapeError(format!(
                        "{tag:?} essay {} carries a source essay",
                        record.id
                    )));
                }
                if record.prompt_id.is_some() || record.college_id.is_some() {
                    return Err(EssayShapeError(format!(
                        "{tag:?} essay {} carries a prompt attachment",
                        record.id
                    )));
                }
                if tag == KindTag::CommonApp {
                    EssayKind::CommonApp
                } else {
                    EssayKind::Base
                }
            }
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            body: record.body,
            status: record.status,
            kind,
            prompt_text: record.prompt_text,
            assigned_values: record.assigned_values,
            assigned_colleges: record.assigned_colleges,
            is_emphasized: record.is_emphasized,
            created_at: record.created_at,
            last_modified: record.last_modified,
        })
    }
}
