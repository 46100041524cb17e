//! Data model for one extraction run: date candidates, draft items,
//! the type suggestion, and the externally visible result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One temporal expression resolved from a fragment.
///
/// `fuzzy` is true whenever no explicit clock time was present or the
/// phrase is inherently vague ("someday", "this week"). A fully vague
/// fragment yields a synthetic candidate with neither start nor end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateCandidate {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(rename = "allDay")]
    pub all_day: Option<bool>,
    /// The original matched phrase, e.g. "tomorrow at 3pm".
    #[serde(rename = "whenText")]
    pub when_text: Option<String>,
    pub fuzzy: bool,
}

/// A draft item extracted from one fragment.
///
/// Both variants carry `is_draft: true` and `is_private: true` — the core
/// always produces drafts; promotion to a committed record belongs to the
/// surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StructuredItem {
    Todo {
        title: String,
        #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
        project_id: Option<String>,
        /// Set only from a concrete (non-fuzzy) date; vague phrases live in
        /// `when_text` instead.
        #[serde(skip_serializing_if = "Option::is_none")]
        due: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        priority: Option<String>,
        #[serde(rename = "whenText", skip_serializing_if = "Option::is_none")]
        when_text: Option<String>,
        #[serde(rename = "isDraft")]
        is_draft: bool,
        #[serde(rename = "isPrivate")]
        is_private: bool,
    },
    Event {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        end: Option<DateTime<Utc>>,
        #[serde(rename = "allDay", skip_serializing_if = "Option::is_none")]
        all_day: Option<bool>,
        #[serde(rename = "whenText", skip_serializing_if = "Option::is_none")]
        when_text: Option<String>,
        fuzzy: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reminder: Option<String>,
        #[serde(rename = "isDraft")]
        is_draft: bool,
        #[serde(rename = "isPrivate")]
        is_private: bool,
    },
}

impl StructuredItem {
    pub fn title(&self) -> &str {
        match self {
            StructuredItem::Todo { title, .. } => title,
            StructuredItem::Event { title, .. } => title,
        }
    }

    pub fn is_todo(&self) -> bool {
        matches!(self, StructuredItem::Todo { .. })
    }

    pub fn is_event(&self) -> bool {
        matches!(self, StructuredItem::Event { .. })
    }
}

/// Overall item type inferred from a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredType {
    Todo,
    Event,
    Mixed,
}

/// Non-authoritative summary of one run's item list. Computed once, never
/// fed back into item construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "inferredType")]
    pub inferred_type: InferredType,
    pub confidence: f64,
    pub rationale: String,
}

/// The externally visible output of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResult {
    pub cleaned_text: String,
    pub items: Vec<StructuredItem>,
    pub suggestion: Suggestion,
    pub followups: Vec<String>,
}
