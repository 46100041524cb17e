//! Item construction — turns a classified fragment plus its date candidates
//! into draft todos/events with a normalized title.

use once_cell::sync::Lazy;
use regex::Regex;

use braindump_core::{DateCandidate, ProcessOptions, StructuredItem};

use crate::classify::Classification;
use crate::dates;

/// Items built from one fragment, plus any clarifying questions raised.
#[derive(Debug, Default)]
pub struct BuildOutput {
    pub items: Vec<StructuredItem>,
    pub followups: Vec<String>,
}

static LEAD_IN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:i need to|i have to|i want to|i should|i must|i'll|please|reminder:?|don't forget to|remember to|urgent:?)\s+")
        .unwrap()
});

static CALL_AND_ASK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+and\s+ask\s+").unwrap());

static ARTICLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:the|a|an)\s+").unwrap());

/// Trailing temporal/connective tokens left behind once the matched date
/// phrases are cut out of the title.
static TRAILER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\b(?:today|tomorrow|tonight|someday|sometime|soon|later|eventually|next|this|week|weekend|at|on|by|in|from|until|and|then|or|am|pm|o'clock|\d{1,2}(?::\d{2})?)[\s.,!?]*$")
        .unwrap()
});

static PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:urgent|urgently|asap|high priority|important)\b").unwrap());

static SHOPPING_ITEMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:buy|purchase|get|pick up)\b\s+(.+)$").unwrap());

const MAX_TITLE_LEN: usize = 140;

/// Build the draft items for one classified fragment.
pub fn build(
    fragment: &str,
    classification: Classification,
    candidates: &[DateCandidate],
    options: &ProcessOptions,
) -> BuildOutput {
    match classification {
        Classification::Drop => BuildOutput::default(),
        Classification::Event => build_events(fragment, candidates),
        Classification::ShoppingList => build_shopping_todo(fragment, candidates, options),
        Classification::Todo => build_todo(fragment, candidates, options),
    }
}

/// One event per candidate; a fragment naming two dates fans out into two
/// events sharing the same title.
fn build_events(fragment: &str, candidates: &[DateCandidate]) -> BuildOutput {
    let title = normalize_title(fragment, candidates);
    let mut out = BuildOutput::default();

    // An event classification with no candidate still yields one (dateless)
    // event, with a question about the missing time.
    let fallback = [DateCandidate {
        fuzzy: true,
        ..Default::default()
    }];
    let candidates = if candidates.is_empty() {
        &fallback[..]
    } else {
        candidates
    };

    for candidate in candidates {
        if candidate.fuzzy || candidate.start.is_none() {
            let phrase = candidate.when_text.clone().unwrap_or_else(|| title.clone());
            out.followups.push(format!("What time is '{}'?", phrase));
        }
        out.items.push(StructuredItem::Event {
            title: title.clone(),
            start: candidate.start,
            end: candidate.end,
            all_day: candidate.all_day,
            when_text: candidate.when_text.clone(),
            fuzzy: candidate.fuzzy,
            location: None,
            reminder: None,
            is_draft: true,
            is_private: true,
        });
    }
    out
}

fn build_todo(
    fragment: &str,
    candidates: &[DateCandidate],
    options: &ProcessOptions,
) -> BuildOutput {
    let title = normalize_title(fragment, candidates);
    let mut out = BuildOutput::default();

    // Due only from a resolved, non-vague phrase; vague wording rides along
    // as when_text and never becomes a deadline.
    let due = candidates
        .iter()
        .find(|c| {
            c.start.is_some()
                && !c
                    .when_text
                    .as_deref()
                    .is_some_and(dates::is_vague_phrase)
        })
        .and_then(|c| c.start);
    let when_text = candidates.iter().find_map(|c| c.when_text.clone());

    if due.is_none() && !options.someday_allowed {
        if let Some(c) = candidates.iter().find(|c| c.fuzzy) {
            let phrase = c.when_text.clone().unwrap_or_else(|| title.clone());
            out.followups
                .push(format!("When should '{}' happen?", phrase));
        }
    }

    out.items.push(StructuredItem::Todo {
        title,
        project_id: options.project_id.clone(),
        due,
        notes: None,
        priority: detect_priority(fragment),
        when_text,
        is_draft: true,
        is_private: true,
    });
    out
}

/// A comma list behind a buy-verb collapses into one "Buy groceries" todo
/// with the items preserved as notes.
fn build_shopping_todo(
    fragment: &str,
    candidates: &[DateCandidate],
    options: &ProcessOptions,
) -> BuildOutput {
    let notes = SHOPPING_ITEMS_RE
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            strip_date_phrases(m.as_str(), candidates)
                .trim_end_matches(['.', '!', '?', ',', ' '])
                .to_string()
        });

    let mut out = build_todo(fragment, candidates, options);
    if let Some(StructuredItem::Todo { title, notes: n, .. }) = out.items.first_mut() {
        *title = "Buy groceries".to_string();
        *n = notes;
    }
    out
}

fn detect_priority(fragment: &str) -> Option<String> {
    PRIORITY_RE.is_match(fragment).then(|| "high".to_string())
}

/// Normalize a fragment into an item title: strip lead-ins and temporal
/// clauses, tidy connectives, capitalize, cap the length.
fn normalize_title(fragment: &str, candidates: &[DateCandidate]) -> String {
    let base = fragment.trim().trim_end_matches(['.', '!', '?']);

    let title = finish_title(base, candidates, true);
    if !title.is_empty() {
        return title;
    }
    // Everything but the lead-in was temporal ("Reminder tomorrow") — keep
    // the lead-in as the title instead of returning nothing.
    let title = finish_title(base, candidates, false);
    if !title.is_empty() {
        return title;
    }
    capitalize(base)
}

fn finish_title(base: &str, candidates: &[DateCandidate], strip_lead_in: bool) -> String {
    let mut t = base.to_string();
    if strip_lead_in {
        loop {
            let stripped = LEAD_IN_RE.replace(&t, "").into_owned();
            if stripped == t {
                break;
            }
            t = stripped;
        }
    }
    let t = CALL_AND_ASK_RE.replace(&t, " to ask ").into_owned();
    let t = strip_date_phrases(&t, candidates);
    let mut t = t;
    loop {
        let stripped = TRAILER_RE.replace(&t, "").into_owned();
        if stripped == t {
            break;
        }
        t = stripped;
    }
    let t = ARTICLE_RE.replace(t.trim(), "").into_owned();
    let t = t
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches([',', ' '])
        .to_string();
    truncate(&capitalize(&t), MAX_TITLE_LEN)
}

/// Cut each candidate's matched phrase out of the title; the date lives on
/// the item, not in its name.
fn strip_date_phrases(text: &str, candidates: &[DateCandidate]) -> String {
    let mut t = text.to_string();
    for candidate in candidates {
        let Some(when) = &candidate.when_text else {
            continue;
        };
        if let Ok(re) = Regex::new(&format!(r"(?i){}", regex::escape(when))) {
            t = re.replace(&t, " ").into_owned();
        }
    }
    t
}

fn capitalize(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn opts() -> ProcessOptions {
        ProcessOptions::for_user("u1")
    }

    fn candidate(when: &str, concrete: bool) -> DateCandidate {
        DateCandidate {
            start: Some(Utc.with_ymd_and_hms(2025, 6, 3, 13, 0, 0).unwrap()),
            when_text: Some(when.into()),
            fuzzy: !concrete,
            ..Default::default()
        }
    }

    #[test]
    fn test_todo_title_strips_lead_in_and_date() {
        let cands = [candidate("tomorrow", false)];
        let out = build(
            "I need to buy milk, eggs and bread tomorrow.",
            Classification::Todo,
            &cands,
            &opts(),
        );
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].title(), "Buy milk, eggs and bread");
    }

    #[test]
    fn test_event_title_strips_time_phrase() {
        let cands = [candidate("at 3pm tomorrow", true)];
        let out = build(
            "Meeting with Sarah at 3pm tomorrow.",
            Classification::Event,
            &cands,
            &opts(),
        );
        assert_eq!(out.items[0].title(), "Meeting with Sarah");
        assert!(out.followups.is_empty());
    }

    #[test]
    fn test_fuzzy_event_gets_followup() {
        let cands = [candidate("tomorrow", false)];
        let out = build("Reminder tomorrow.", Classification::Event, &cands, &opts());
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].title(), "Reminder");
        assert_eq!(out.followups, vec!["What time is 'tomorrow'?"]);
    }

    #[test]
    fn test_event_fan_out_shares_title() {
        let cands = [candidate("Monday", false), candidate("Tuesday", false)];
        let out = build("Call Monday or Tuesday.", Classification::Event, &cands, &opts());
        assert_eq!(out.items.len(), 2);
        assert_eq!(out.items[0].title(), out.items[1].title());
        assert_eq!(out.items[0].title(), "Call");
    }

    #[test]
    fn test_vague_todo_never_gets_due() {
        let cands = [DateCandidate {
            when_text: Some("sometime soon".into()),
            fuzzy: true,
            ..Default::default()
        }];
        let out = build(
            "Call the dentist sometime soon.",
            Classification::Todo,
            &cands,
            &opts(),
        );
        match &out.items[0] {
            StructuredItem::Todo { title, due, when_text, .. } => {
                assert_eq!(title, "Call the dentist");
                assert!(due.is_none());
                assert_eq!(when_text.as_deref(), Some("sometime soon"));
            }
            other => panic!("expected todo, got {other:?}"),
        }
    }

    #[test]
    fn test_day_only_todo_gets_due() {
        let cands = [candidate("tomorrow", false)];
        let out = build("Pay the rent tomorrow.", Classification::Todo, &cands, &opts());
        match &out.items[0] {
            StructuredItem::Todo { due, .. } => assert!(due.is_some()),
            other => panic!("expected todo, got {other:?}"),
        }
    }

    #[test]
    fn test_shopping_list_collapses() {
        let out = build(
            "Buy milk, eggs, bread and coffee.",
            Classification::ShoppingList,
            &[],
            &opts(),
        );
        match &out.items[0] {
            StructuredItem::Todo { title, notes, .. } => {
                assert_eq!(title, "Buy groceries");
                assert_eq!(notes.as_deref(), Some("milk, eggs, bread and coffee"));
            }
            other => panic!("expected todo, got {other:?}"),
        }
    }

    #[test]
    fn test_call_and_ask_collapses() {
        let out = build(
            "Call Sarah and ask about the invoice.",
            Classification::Todo,
            &[],
            &opts(),
        );
        assert_eq!(out.items[0].title(), "Call Sarah to ask about the invoice");
    }

    #[test]
    fn test_priority_detected() {
        let out = build("Urgent: submit the visa form.", Classification::Todo, &[], &opts());
        match &out.items[0] {
            StructuredItem::Todo { priority, .. } => {
                assert_eq!(priority.as_deref(), Some("high"));
            }
            other => panic!("expected todo, got {other:?}"),
        }
    }

    #[test]
    fn test_someday_disallowed_raises_followup() {
        let mut options = opts();
        options.someday_allowed = false;
        let cands = [DateCandidate {
            when_text: Some("someday".into()),
            fuzzy: true,
            ..Default::default()
        }];
        let out = build("Clean the garage someday.", Classification::Todo, &cands, &options);
        assert_eq!(out.followups.len(), 1);
        assert!(out.followups[0].contains("someday"));
    }

    #[test]
    fn test_title_truncated() {
        let long = format!("Write {}", "very ".repeat(60));
        let out = build(&long, Classification::Todo, &[], &opts());
        assert!(out.items[0].title().chars().count() <= 140);
    }

    #[test]
    fn test_project_id_carried() {
        let mut options = opts();
        options.project_id = Some("p42".into());
        let out = build("Email the landlord.", Classification::Todo, &[], &options);
        match &out.items[0] {
            StructuredItem::Todo { project_id, .. } => {
                assert_eq!(project_id.as_deref(), Some("p42"));
            }
            other => panic!("expected todo, got {other:?}"),
        }
    }
}
