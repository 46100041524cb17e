//! Pipeline orchestration: normalize → optional clean → segment →
//! per-fragment resolve/classify/build → cap → suggest.
//!
//! Each invocation is a fresh pass over its own input; no state survives the
//! call. The only suspension point is the optional external cleaner.

use chrono::Utc;
use tracing::{debug, info};

use braindump_core::{ProcessOptions, ProcessResult, Result, StructuredItem};

use crate::builder;
use crate::classify::{self, Classification};
use crate::cleaner::{apply_cleaner, TextCleaner};
use crate::dates;
use crate::normalize::normalize;
use crate::segment::segment;
use crate::suggest::suggest;

/// Run the full extraction pipeline over one transcript.
///
/// Option validation failures surface immediately; everything downstream is
/// fragment-local and recoverable, so ambiguity comes back as low-confidence
/// items and follow-up questions rather than errors.
pub async fn process_text(
    input: &str,
    options: &ProcessOptions,
    cleaner: Option<&dyn TextCleaner>,
) -> Result<ProcessResult> {
    let tz = options.validate()?;
    let now = options.now.unwrap_or_else(Utc::now);

    let cleaned = normalize(input);
    let cleaned = apply_cleaner(cleaner, &cleaned).await;

    let fragments = segment(&cleaned);
    debug!(count = fragments.len(), "segmented fragments");

    let mut items: Vec<StructuredItem> = Vec::new();
    let mut followups: Vec<String> = Vec::new();

    for fragment in &fragments {
        let candidates = dates::resolve_dates(fragment, now, tz);
        let classification = classify::classify(fragment, &candidates);
        if classification == Classification::Drop {
            continue;
        }
        let built = builder::build(fragment, classification, &candidates, options);
        items.extend(built.items);
        followups.extend(built.followups);
    }

    // Cap only after every fragment is classified so truncation never biases
    // which types survive; first-extracted items win.
    if items.len() > options.max_items {
        items.truncate(options.max_items);
    }

    let suggestion = suggest(&items);

    info!(
        user_id = %options.user_id,
        fragments = fragments.len(),
        items = items.len(),
        followups = followups.len(),
        inferred = ?suggestion.inferred_type,
        "processed transcript"
    );

    Ok(ProcessResult {
        cleaned_text: cleaned,
        items,
        suggestion,
        followups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use braindump_core::InferredType;
    use chrono::{DateTime, TimeZone, Timelike};
    use chrono_tz::America::New_York;

    // Monday 2025-06-02, 12:00 in New York.
    fn opts() -> ProcessOptions {
        let mut o = ProcessOptions::for_user("test-user");
        o.now = Some(Utc.with_ymd_and_hms(2025, 6, 2, 16, 0, 0).unwrap());
        o
    }

    fn local(dt: DateTime<Utc>) -> DateTime<chrono_tz::Tz> {
        dt.with_timezone(&New_York)
    }

    #[tokio::test]
    async fn test_scenario_grocery_todo() {
        let result = process_text("I need to buy milk, eggs and bread tomorrow", &opts(), None)
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
        match &result.items[0] {
            StructuredItem::Todo { title, due, when_text, .. } => {
                assert_eq!(title, "Buy milk, eggs and bread");
                assert!(when_text.as_deref().unwrap().contains("tomorrow"));
                let due = local(due.unwrap());
                assert_eq!(due.date_naive().to_string(), "2025-06-03");
                assert_eq!(due.hour(), 9);
            }
            other => panic!("expected todo, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scenario_meeting_event() {
        let result = process_text("Meeting with Sarah at 3pm tomorrow", &opts(), None)
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
        match &result.items[0] {
            StructuredItem::Event { title, start, fuzzy, .. } => {
                assert_eq!(title, "Meeting with Sarah");
                assert!(!fuzzy);
                let start = local(start.unwrap());
                assert_eq!(start.date_naive().to_string(), "2025-06-03");
                assert_eq!(start.hour(), 15);
            }
            other => panic!("expected event, got {other:?}"),
        }
        assert!(result.followups.is_empty());
    }

    #[tokio::test]
    async fn test_scenario_reflective_dropped() {
        let result = process_text(
            "I feel really tired today, everything is overwhelming",
            &opts(),
            None,
        )
        .await
        .unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.suggestion.inferred_type, InferredType::Mixed);
        assert_eq!(result.suggestion.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_scenario_vague_todo() {
        let result = process_text("Call the dentist sometime soon", &opts(), None)
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
        match &result.items[0] {
            StructuredItem::Todo { title, due, when_text, .. } => {
                assert_eq!(title, "Call the dentist");
                assert!(due.is_none());
                assert!(when_text.as_deref().unwrap().contains("soon"));
            }
            other => panic!("expected todo, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scenario_fuzzy_reminder_event() {
        let result = process_text("Reminder tomorrow", &opts(), None).await.unwrap();
        assert_eq!(result.items.len(), 1);
        match &result.items[0] {
            StructuredItem::Event { fuzzy, .. } => assert!(fuzzy),
            other => panic!("expected event, got {other:?}"),
        }
        assert_eq!(result.followups.len(), 1);
        assert!(result.followups[0].contains("What time"));
    }

    #[tokio::test]
    async fn test_multiple_fragments() {
        let result = process_text(
            "I need to buy milk tomorrow and I have to call mom",
            &opts(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.suggestion.inferred_type, InferredType::Todo);
        assert_eq!(result.suggestion.rationale, "All fragments are todos");
    }

    #[tokio::test]
    async fn test_cap_preserves_first_items() {
        let mut options = opts();
        options.max_items = 2;
        let input = "Call mom. Email the landlord. Clean the garage. Pay the rent.";
        let result = process_text(input, &options, None).await.unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].title(), "Call mom");
        assert_eq!(result.items[1].title(), "Email the landlord");
    }

    #[tokio::test]
    async fn test_event_fan_out() {
        let result = process_text("Call Monday or Tuesday", &opts(), None).await.unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].title(), result.items[1].title());
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_result() {
        let result = process_text("   ", &opts(), None).await.unwrap();
        assert!(result.items.is_empty());
        assert!(result.cleaned_text.is_empty());
        assert_eq!(result.suggestion.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_bad_options_rejected() {
        let mut options = opts();
        options.timezone = "Nowhere/Nada".into();
        assert!(process_text("Call mom", &options, None).await.is_err());
    }

    struct Crashing;

    #[async_trait]
    impl TextCleaner for Crashing {
        async fn clean(&self, _text: &str) -> anyhow::Result<String> {
            anyhow::bail!("model unavailable")
        }
    }

    #[tokio::test]
    async fn test_cleaner_failure_never_fails_the_run() {
        let result = process_text("Call the dentist sometime soon", &opts(), Some(&Crashing))
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
    }

    #[tokio::test]
    async fn test_deterministic_with_fixed_now() {
        let a = process_text("Buy milk tomorrow", &opts(), None).await.unwrap();
        let b = process_text("Buy milk tomorrow", &opts(), None).await.unwrap();
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}
