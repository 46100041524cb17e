//! Per-run processing options: schema, defaults, and validation.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fallback zone applied when the caller sends none.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Hard ceiling on extracted items per run.
pub const MAX_ITEMS_CEILING: usize = 20;

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_someday_allowed() -> bool {
    true
}

fn default_max_items() -> usize {
    MAX_ITEMS_CEILING
}

/// Options for one pipeline run. Immutable for the duration of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// IANA timezone identifier, e.g. "Europe/Berlin".
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "projectId", default)]
    pub project_id: Option<String>,
    /// When false, purely vague fragments generate a follow-up question
    /// instead of silently carrying the vague phrase.
    #[serde(rename = "somedayAllowed", default = "default_someday_allowed")]
    pub someday_allowed: bool,
    #[serde(rename = "maxItems", default = "default_max_items")]
    pub max_items: usize,
    /// Fixed clock for reproducible runs; real current time when absent.
    #[serde(rename = "nowISO", default)]
    pub now: Option<DateTime<Utc>>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            user_id: String::new(),
            project_id: None,
            someday_allowed: true,
            max_items: MAX_ITEMS_CEILING,
            now: None,
        }
    }
}

impl ProcessOptions {
    /// Minimal options for a given user, everything else defaulted.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Validate the schema and resolve the timezone.
    ///
    /// Checks: non-empty userId, known IANA timezone, maxItems in 1..=20.
    pub fn validate(&self) -> Result<Tz> {
        if self.user_id.trim().is_empty() {
            return Err(Error::InvalidOptions("userId is required".into()));
        }
        if self.max_items == 0 || self.max_items > MAX_ITEMS_CEILING {
            return Err(Error::InvalidOptions(format!(
                "maxItems must be between 1 and {}, got {}",
                MAX_ITEMS_CEILING, self.max_items
            )));
        }
        self.timezone
            .parse::<Tz>()
            .map_err(|_| Error::InvalidOptions(format!("unknown timezone: {}", self.timezone)))
    }
}
