//! Shared word tables and predicates used by the segmenter and classifier.
//!
//! Everything here is data plus thin `looks_*` helpers; the decision logic
//! that consumes these lives in `segment` and `classify`.

use once_cell::sync::Lazy;
use regex::Regex;

/// First-person task openers ("I need to buy…").
pub const TASK_INDICATORS: &[&str] = &[
    "i need to",
    "i have to",
    "i want to",
    "i should",
    "i'll",
    "i must",
    "don't forget",
    "remember to",
    "reminder",
];

/// Imperative/action verbs that mark a fragment as actionable.
pub const ACTION_VERBS: &[&str] = &[
    "buy", "purchase", "get", "pick up", "call", "email", "text", "schedule", "book", "send",
    "finish", "complete", "write", "submit", "review", "clean", "fix", "pay", "order", "renew",
    "cancel", "check", "go for", "prepare", "plan", "update", "organize", "return",
];

/// Keywords that signal a scheduled occasion rather than a task.
pub const EVENT_KEYWORDS: &[&str] = &[
    "meet", "meeting", "appointment", "visit", "call", "reminder", "lunch", "dinner",
    "interview", "session", "standup",
];

/// Openers of reflective / journal statements.
pub const FEELING_OPENERS: &[&str] = &[
    "i feel",
    "i'm feeling",
    "i am feeling",
    "i felt",
    "i'm tired",
    "i am tired",
    "i'm so",
    "i am so",
    "today was",
    "yesterday was",
    "i've been",
    "i have been",
    "i wish",
    "i hope",
    "i can't believe",
];

/// Vague temporal wording that implies intent without a usable date.
/// Joined into an alternation by the date resolver, so multi-word phrases
/// must precede their own substrings ("sometime soon" before "sometime").
pub const VAGUE_TIME_WORDS: &[&str] = &[
    "sometime soon",
    "someday",
    "sometime",
    "soon",
    "later",
    "eventually",
    "this week",
    "next week",
    "this weekend",
    "at some point",
];

pub const WEEKDAYS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

static ACTION_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", ACTION_VERBS.join("|"))).unwrap()
});

static PAST_TENSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:was|were|went|felt|had|did|couldn't|didn't|happened|seemed)\b").unwrap()
});

static PRONOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:i|me|my|myself|we|everything|everyone)\b").unwrap());

pub fn starts_with_task_indicator(text: &str) -> bool {
    let lower = text.trim_start().to_lowercase();
    TASK_INDICATORS.iter().any(|p| lower.starts_with(p))
}

pub fn starts_with_action_verb(text: &str) -> bool {
    let lower = text.trim_start().to_lowercase();
    let lower = lower
        .strip_prefix("please ")
        .unwrap_or(&lower)
        .to_string();
    ACTION_VERBS.iter().any(|v| {
        lower.starts_with(v)
            && lower[v.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
    })
}

pub fn contains_action_verb(text: &str) -> bool {
    ACTION_VERB_RE.is_match(text)
}

pub fn contains_event_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    EVENT_KEYWORDS.iter().any(|k| contains_word(&lower, k))
}

pub fn is_weekday_word(word: &str) -> bool {
    WEEKDAYS.contains(&word.to_lowercase().trim_matches(|c: char| !c.is_alphanumeric()))
}

/// Journal-like prose: opens with a feeling statement, or reads as long
/// past-tense narrative with personal pronouns — and carries no strong task
/// opener.
pub fn is_reflective(text: &str) -> bool {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();

    if starts_with_task_indicator(trimmed) || starts_with_action_verb(trimmed) {
        return false;
    }
    if FEELING_OPENERS.iter().any(|p| lower.starts_with(p)) {
        return true;
    }
    trimmed.len() > 80
        && PRONOUN_RE.is_match(trimmed)
        && PAST_TENSE_RE.is_match(trimmed)
        && !contains_action_verb(trimmed)
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.split(|c: char| !c.is_alphanumeric() && c != '\'').any(|w| w == needle)
}
