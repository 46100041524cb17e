//! Rule-based transcript cleanup.
//!
//! Dictated text arrives as one run-on stream with fillers, recognition
//! errors, and no sentence boundaries. Normalization is an ordered series of
//! regex-table passes; the key device is inserting terminal punctuation
//! before task-indicator phrases so the segmenter can later split the stream
//! into independent fragments.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Filler words and false starts stripped with word-boundary matching.
static FILLER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:um+|uh+|uhm|erm|hmm|you know|i mean|actually|basically|literally|kind of|sort of)\b")
        .unwrap()
});

/// "like" is only a filler when set off by commas; bare "like" is a verb.
static COMMA_LIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),\s*like\s*,").unwrap());

/// Speech-recognition correction table, applied in order by a single fold.
/// This is data, not logic — extend the list, not the control flow.
static CORRECTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let table: &[(&str, &str)] = &[
        (r"(?i)\bby (milk|eggs|bread|groceries|coffee|tickets|stamps|flowers)\b", "buy $1"),
        (r"(?i)\bthere free\b", "they're free"),
        (r"(?i)\bthere (going|coming|meeting)\b", "they're $1"),
        (r"(?i)\bmeat (with|at|up)\b", "meet $1"),
        (r"(?i)\bsend male\b", "send mail"),
        (r"(?i)\bweak end\b", "weekend"),
        (r"(?i)\bdew (tomorrow|today|tonight|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b", "due $1"),
        (r"(?i)\btwo do\b", "to do"),
        (r"(?i)\bfor get\b", "forget"),
        (r"(?i)\bgotta\b", "got to"),
        (r"(?i)\bwanna\b", "want to"),
    ];
    table
        .iter()
        .map(|(p, r)| (Regex::new(p).unwrap(), *r))
        .collect()
});

/// First-person task openers that start a new sentence when run together
/// with the previous clause.
static PHRASE_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)([a-z0-9,]) ((?:and |then )?(?:i need to|i have to|i want to|i should|i'll|i must|don't forget|remember to|reminder:?))\b",
    )
    .unwrap()
});

/// Bare action verbs that start a new sentence — but only when the word
/// before them is not an auxiliary/connective ("need to call" stays whole).
static VERB_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z0-9']+)(,?) (buy|call|email|text|schedule|book|go for|pick up)\b")
        .unwrap()
});

const VERB_BREAK_STOPWORDS: &[&str] = &[
    "to", "and", "or", "then", "please", "will", "would", "should", "must", "can", "could",
    "don't", "won't", "can't", "gonna", "i'll", "a", "the", "go", "just",
];

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static MULTI_BLANK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*\u{2022}]\s+").unwrap());
static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" +([.,;!?])").unwrap());
static LONE_I_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bi\b").unwrap());

/// Clean a raw transcript. Pure and total: the worst case is a trimmed,
/// capitalized copy of the input; empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let text = collapse_whitespace(raw);
    if text.is_empty() {
        return String::new();
    }
    // Purely non-alphabetic input passes through untouched.
    if !text.chars().any(|c| c.is_alphabetic()) {
        return text;
    }

    let text = fold_to_ascii(&text);
    let text = strip_fillers(&text);
    let text = CORRECTIONS
        .iter()
        .fold(text, |acc, (re, rep)| re.replace_all(&acc, *rep).into_owned());
    let text = insert_sentence_breaks(&text);
    let text = collapse_whitespace(&text);
    let text = fix_capitalization(&text);
    finalize(&text)
}

fn collapse_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = MULTI_SPACE_RE.replace_all(&text, " ");
    let text = MULTI_BLANK_RE.replace_all(&text, "\n\n");
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    lines.join("\n").trim().to_string()
}

/// Smart quotes, dashes, and ellipses to ASCII; bullet markers trimmed.
fn fold_to_ascii(text: &str) -> String {
    let text: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2026}' => '.',
            other => other,
        })
        .collect();
    BULLET_RE.replace_all(&text, "").into_owned()
}

fn strip_fillers(text: &str) -> String {
    let text = COMMA_LIKE_RE.replace_all(text, ",");
    let text = FILLER_RE.replace_all(&text, "");
    // Stripping leaves doubled spaces and stranded commas behind.
    let text = MULTI_SPACE_RE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT_RE.replace_all(&text, "$1");
    text.trim().to_string()
}

/// Insert terminal punctuation before task-indicator phrases that run on
/// from the previous clause.
fn insert_sentence_breaks(text: &str) -> String {
    let text = PHRASE_BREAK_RE.replace_all(text, "$1. $2");
    VERB_BREAK_RE
        .replace_all(&text, |caps: &Captures| {
            let prev = caps[1].to_lowercase();
            if VERB_BREAK_STOPWORDS.contains(&prev.as_str()) {
                caps[0].to_string()
            } else {
                format!("{}. {}", &caps[1], &caps[3])
            }
        })
        .into_owned()
}

/// Capitalize sentence starts and the pronoun "I".
fn fix_capitalization(text: &str) -> String {
    let text = LONE_I_RE.replace_all(text, "I");
    let mut out = String::with_capacity(text.len());
    let mut at_sentence_start = true;
    for c in text.chars() {
        if at_sentence_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_sentence_start = false;
        } else {
            out.push(c);
            match c {
                '.' | '!' | '?' | '\n' => at_sentence_start = true,
                c if c.is_whitespace() => {}
                _ => at_sentence_start = false,
            }
        }
    }
    out
}

/// Guarantee a leading capital and a trailing terminator.
fn finalize(text: &str) -> String {
    let mut out = text.trim().to_string();
    if let Some(last) = out.chars().last() {
        if last.is_alphanumeric() {
            out.push('.');
        }
    }
    out
}
