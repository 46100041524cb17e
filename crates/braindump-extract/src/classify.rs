//! Fragment classification — an ordered rule cascade.
//!
//! Priority is encoded by position, first match wins: journal detection runs
//! before anything else so reflective text never becomes an item, and the
//! concrete-date rule deliberately promotes dated fragments to events even
//! without an event keyword.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use braindump_core::DateCandidate;

use crate::dates;
use crate::lexicon;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Event,
    Todo,
    ShoppingList,
    Drop,
}

/// One cascade rule: returns a classification or defers to the next rule.
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&str, &[DateCandidate]) -> Option<Classification>,
}

/// The cascade, in priority order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "reflective",
        check: reflective,
    },
    Rule {
        name: "event-with-time",
        check: event_with_time,
    },
    Rule {
        name: "concrete-date",
        check: concrete_date,
    },
    Rule {
        name: "shopping-list",
        check: shopping_list,
    },
    Rule {
        name: "actionable",
        check: actionable,
    },
];

/// Classify one fragment given its resolved date candidates.
pub fn classify(fragment: &str, dates: &[DateCandidate]) -> Classification {
    for rule in RULES {
        if let Some(class) = (rule.check)(fragment, dates) {
            debug!(rule = rule.name, ?class, fragment, "classified fragment");
            return class;
        }
    }
    debug!(fragment, "no rule matched, dropping fragment");
    Classification::Drop
}

/// Journal/reflective prose produces nothing — journaling capture is outside
/// this pipeline.
fn reflective(fragment: &str, _dates: &[DateCandidate]) -> Option<Classification> {
    lexicon::is_reflective(fragment).then_some(Classification::Drop)
}

/// Event keyword plus a dated candidate ("tomorrow" counts as a relative
/// marker), unless phrased as a "by <day>" due date.
fn event_with_time(fragment: &str, dates: &[DateCandidate]) -> Option<Classification> {
    let dated = dates.iter().any(|c| c.start.is_some());
    (lexicon::contains_event_keyword(fragment) && dated && !dates::has_by_weekday(fragment))
        .then_some(Classification::Event)
}

/// Any concrete (non-vague) date implies scheduling intent, event keyword or
/// not.
fn concrete_date(_fragment: &str, dates: &[DateCandidate]) -> Option<Classification> {
    dates
        .iter()
        .any(|c| !c.fuzzy)
        .then_some(Classification::Event)
}

/// A buy-verb followed by a comma list of two or more items.
fn shopping_list(fragment: &str, _dates: &[DateCandidate]) -> Option<Classification> {
    static SHOPPING_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\b(?:buy|purchase|get|pick up)\b[^.;]*,[^.;]*,").unwrap()
    });
    SHOPPING_RE
        .is_match(fragment)
        .then_some(Classification::ShoppingList)
}

fn actionable(fragment: &str, _dates: &[DateCandidate]) -> Option<Classification> {
    (lexicon::contains_action_verb(fragment) || lexicon::starts_with_task_indicator(fragment))
        .then_some(Classification::Todo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn concrete() -> DateCandidate {
        DateCandidate {
            start: Some(Utc::now() + Duration::days(1)),
            fuzzy: false,
            ..Default::default()
        }
    }

    fn day_only(when: &str) -> DateCandidate {
        DateCandidate {
            start: Some(Utc::now() + Duration::days(1)),
            when_text: Some(when.into()),
            fuzzy: true,
            ..Default::default()
        }
    }

    fn vague(when: &str) -> DateCandidate {
        DateCandidate {
            when_text: Some(when.into()),
            fuzzy: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_reflective_dropped_before_anything() {
        // "today" resolves to a date, but journal detection runs first.
        let c = classify(
            "I feel really tired today, everything is overwhelming.",
            &[day_only("today")],
        );
        assert_eq!(c, Classification::Drop);
    }

    #[test]
    fn test_meeting_with_time_is_event() {
        let c = classify("Meeting with Sarah at 3pm tomorrow.", &[concrete()]);
        assert_eq!(c, Classification::Event);
    }

    #[test]
    fn test_reminder_with_day_ref_is_event() {
        let c = classify("Reminder tomorrow.", &[day_only("tomorrow")]);
        assert_eq!(c, Classification::Event);
    }

    #[test]
    fn test_by_weekday_is_todo_not_event() {
        let c = classify("Call me back by Friday.", &[day_only("by Friday")]);
        assert_eq!(c, Classification::Todo);
    }

    #[test]
    fn test_concrete_date_without_keyword_is_event() {
        // The flagged simplification: a dated fragment becomes an event even
        // when it reads like a due-date todo.
        let c = classify("Finish the report March 5 at 2pm.", &[concrete()]);
        assert_eq!(c, Classification::Event);
    }

    #[test]
    fn test_shopping_list_needs_two_commas() {
        let c = classify("Buy milk, eggs, bread and coffee.", &[]);
        assert_eq!(c, Classification::ShoppingList);

        let c = classify("Buy milk, eggs and bread tomorrow.", &[day_only("tomorrow")]);
        assert_eq!(c, Classification::Todo);
    }

    #[test]
    fn test_vague_call_is_todo() {
        // "call" is an event keyword, but a synthetic vague candidate has no
        // date, so the event rules pass it over.
        let c = classify("Call the dentist sometime soon.", &[vague("sometime soon")]);
        assert_eq!(c, Classification::Todo);
    }

    #[test]
    fn test_unclassifiable_dropped() {
        assert_eq!(classify("The sky was gray.", &[]), Classification::Drop);
        assert_eq!(classify("Random words here.", &[]), Classification::Drop);
    }
}
