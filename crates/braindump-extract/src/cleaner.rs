//! Optional external text cleaner — a strategy seam for callers that want to
//! post-process the rule-cleaned text (e.g. an LLM pass). The pipeline never
//! depends on one being present, and a cleaner can never fail a run.

use async_trait::async_trait;
use tracing::warn;

/// Injected text-cleaning strategy, awaited at most once per run.
#[async_trait]
pub trait TextCleaner: Send + Sync {
    async fn clean(&self, text: &str) -> anyhow::Result<String>;
}

/// Run the cleaner defensively: any error or unusable output falls back to
/// the rule-cleaned text. Not retried — one failure means "no cleaner" for
/// this run.
pub(crate) async fn apply_cleaner(cleaner: Option<&dyn TextCleaner>, text: &str) -> String {
    let Some(cleaner) = cleaner else {
        return text.to_string();
    };
    match cleaner.clean(text).await {
        Ok(cleaned) if !cleaned.trim().is_empty() => cleaned,
        Ok(_) => {
            warn!("external cleaner returned empty output, keeping rule-cleaned text");
            text.to_string()
        }
        Err(e) => {
            warn!(error = %e, "external cleaner failed, keeping rule-cleaned text");
            text.to_string()
        }
    }
}
