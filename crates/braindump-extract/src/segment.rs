//! Fragment segmentation — splits normalized text into independently
//! classifiable statements.
//!
//! The cascade is coarse-to-fine: sentences, then transitions, then task
//! openers, then conjunctions, then commas, then semicolons. Each stage
//! assumes the previous one already cut at its granularity; reversing the
//! order over-splits dates and lists.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon;

/// Lines recognized as structured note headers are kept whole.
static NOTE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:key points|summary|notes|ideas|thoughts|agenda)\b\s*:").unwrap()
});

static TRANSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[,;]?\s+\b(?:but then|and then|then)\s+").unwrap());

/// Task openers that begin a new fragment mid-piece. The optional leading
/// connective is captured so the split lands before it.
static TASK_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:and\s+|then\s+)?(?:i need to|i have to|i want to|i should|i must|i'll)\b")
        .unwrap()
});

/// A piece that is only a time phrase, e.g. "Tomorrow at 3pm." — merged back
/// into a preceding appointment/meeting piece instead of standing alone.
static TIME_PHRASE_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:today|tomorrow|tonight|next|this|on|at|every)\b[\w\s:,]{0,30}[.!?]?$")
        .unwrap()
});

/// Comma followed by a four-digit year, i.e. a date literal.
static DATE_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\d{4}\b").unwrap());

/// Shopping lead-in followed by a comma list — kept intact for the
/// shopping-list classification.
static SHOPPING_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:buy|purchase|get|pick up)\b[^,.;]*,").unwrap());

/// Split cleaned text into candidate fragments. Pure and total.
pub fn segment(cleaned: &str) -> Vec<String> {
    let mut fragments = Vec::new();

    for line in cleaned.split("\n\n").flat_map(|block| block.lines()) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if NOTE_HEADER_RE.is_match(line) || keep_whole(line) {
            fragments.push(line.to_string());
            continue;
        }

        for piece in split_line(line) {
            if let Some(frag) = tidy(&piece) {
                fragments.push(frag);
            }
        }
    }

    fragments
}

/// Long reflective narrative is not shredded into nonsensical pieces; it is
/// kept as one fragment (and later dropped by the classifier).
fn keep_whole(line: &str) -> bool {
    line.len() > 120
        && line.matches(['.', '!', '?']).count() >= 2
        && lexicon::is_reflective(line)
        && !lexicon::contains_action_verb(line)
}

fn split_line(line: &str) -> Vec<String> {
    let mut pieces = split_sentences(line);
    pieces = apply(pieces, split_transitions);
    pieces = apply(pieces, split_task_openers);
    pieces = apply(pieces, split_conjunctions);
    pieces = apply(pieces, split_commas);
    pieces = apply(pieces, |p| {
        p.split(';').map(|s| s.trim().to_string()).collect()
    });
    pieces
}

fn apply(pieces: Vec<String>, f: impl Fn(&str) -> Vec<String>) -> Vec<String> {
    pieces
        .iter()
        .flat_map(|p| f(p))
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// Sentence split by byte scan (no lookbehind in the regex crate), then
/// merge time-phrase-only pieces back into a preceding appointment/meeting
/// piece so the pair is classified together.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'.' || b == b'!' || b == b'?')
            && i + 1 < bytes.len()
            && bytes[i + 1].is_ascii_whitespace()
        {
            let s = text[start..=i].trim();
            if !s.is_empty() {
                sentences.push(s.to_string());
            }
            start = i + 1;
        }
    }
    let s = text[start..].trim();
    if !s.is_empty() {
        sentences.push(s.to_string());
    }

    let mut merged: Vec<String> = Vec::new();
    for sentence in sentences {
        match merged.last_mut() {
            Some(prev)
                if lexicon::contains_event_keyword(prev)
                    && TIME_PHRASE_ONLY_RE.is_match(&sentence) =>
            {
                let head = prev.trim_end_matches(['.', '!', '?']).to_string();
                *prev = format!("{} {}", head, sentence);
            }
            _ => merged.push(sentence),
        }
    }
    merged
}

fn split_transitions(text: &str) -> Vec<String> {
    TRANSITION_RE
        .split(text)
        .map(|s| s.trim().to_string())
        .collect()
}

fn split_task_openers(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for m in TASK_SPLIT_RE.find_iter(text) {
        if m.start() > start {
            pieces.push(text[start..m.start()].to_string());
            start = m.start();
        }
    }
    pieces.push(text[start..].to_string());
    pieces
}

/// Split on "and" only before a recognized action or another task opener.
/// Weekday and clock ranges ("Monday and Tuesday", "3 and 4 pm") never split
/// because neither side is an action.
fn split_conjunctions(text: &str) -> Vec<String> {
    static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+\band\b\s+").unwrap());

    let mut pieces = Vec::new();
    let mut start = 0;
    for m in AND_RE.find_iter(text) {
        let before = text[..m.start()].split_whitespace().last().unwrap_or("");
        let after = &text[m.end()..];
        let splittable = lexicon::starts_with_action_verb(after)
            && !lexicon::is_weekday_word(before)
            && before.parse::<u32>().is_err();
        if splittable && m.start() > start {
            pieces.push(text[start..m.start()].to_string());
            start = m.end();
        }
    }
    pieces.push(text[start..].to_string());
    pieces
}

/// Split on commas only when the next clause is itself actionable, and never
/// inside date literals, shopping lists, or note-like lists of 4+ items.
fn split_commas(text: &str) -> Vec<String> {
    if DATE_COMMA_RE.is_match(text)
        || SHOPPING_LIST_RE.is_match(text)
        || text.matches(',').count() >= 3
    {
        return vec![text.to_string()];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, _) in text.match_indices(',') {
        let after = text[i + 1..].trim_start();
        if lexicon::starts_with_action_verb(after) || lexicon::starts_with_task_indicator(after) {
            let head = text[start..i].trim();
            if !head.is_empty() {
                pieces.push(head.to_string());
            }
            start = i + 1;
        }
    }
    pieces.push(text[start..].trim().to_string());
    pieces
}

/// Final cleanup: strip leading connectives, drop stubs.
fn tidy(piece: &str) -> Option<String> {
    let mut s = piece.trim();
    for prefix in ["and ", "then ", "but ", "And ", "Then ", "But "] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }
    let s = s.trim_end_matches([',']).trim().to_string();

    let bare = s
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .to_lowercase();
    if s.len() < 4 {
        return None;
    }
    const STUBS: &[&str] = &["i need to", "i have to", "i want to", "i'll", "i should", "i", "and", "then"];
    if STUBS.contains(&bare.as_str()) {
        return None;
    }
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sentence() {
        let frags = segment("I need to call the dentist.");
        assert_eq!(frags, vec!["I need to call the dentist."]);
    }

    #[test]
    fn test_sentence_split() {
        let frags = segment("Finish the report. I need to call Sarah.");
        assert_eq!(frags.len(), 2);
        assert!(frags[1].contains("call Sarah"));
    }

    #[test]
    fn test_task_opener_split() {
        let frags = segment("I need to buy milk and I have to call mom");
        assert_eq!(frags.len(), 2, "got {frags:?}");
        assert!(frags[0].contains("buy milk"));
        assert!(frags[1].contains("call mom"));
    }

    #[test]
    fn test_and_plus_action_splits() {
        let frags = segment("Buy milk and call the dentist");
        assert_eq!(frags.len(), 2, "got {frags:?}");
    }

    #[test]
    fn test_weekday_pair_not_split() {
        let frags = segment("Meet Sarah on Monday and Tuesday");
        assert_eq!(frags.len(), 1, "got {frags:?}");
    }

    #[test]
    fn test_time_range_not_split() {
        let frags = segment("Book the room between 3 and 4 pm");
        assert_eq!(frags.len(), 1, "got {frags:?}");
    }

    #[test]
    fn test_date_literal_kept_whole() {
        let frags = segment("Submit the form on January 1, 2024");
        assert_eq!(frags.len(), 1, "got {frags:?}");
        assert!(frags[0].contains("January 1, 2024"));
    }

    #[test]
    fn test_shopping_list_kept_whole() {
        let frags = segment("I need to buy milk, eggs and bread tomorrow.");
        assert_eq!(frags.len(), 1, "got {frags:?}");
    }

    #[test]
    fn test_comma_before_action_splits() {
        let frags = segment("Clean the garage, email the landlord");
        assert_eq!(frags.len(), 2, "got {frags:?}");
    }

    #[test]
    fn test_meeting_time_pair_merged() {
        let frags = segment("Dentist appointment. Tomorrow at 3pm.");
        assert_eq!(frags.len(), 1, "got {frags:?}");
        assert!(frags[0].contains("appointment"));
        assert!(frags[0].contains("3pm"));
    }

    #[test]
    fn test_narrative_kept_whole() {
        let text = "Today was such a long day and everything felt harder than usual. \
                    I kept thinking about how tired I was. Nothing seemed to help at all.";
        let frags = segment(text);
        assert_eq!(frags.len(), 1, "got {frags:?}");
    }

    #[test]
    fn test_note_header_kept_whole() {
        let frags = segment("Key Points: budget, staffing, timeline");
        assert_eq!(frags.len(), 1);
    }

    #[test]
    fn test_stubs_dropped() {
        let frags = segment("I'll. Call mom.");
        assert_eq!(frags, vec!["Call mom."]);
    }

    #[test]
    fn test_transition_split() {
        let frags = segment("Pick up the dry cleaning but then go for a run");
        assert_eq!(frags.len(), 2, "got {frags:?}");
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
    }
}
