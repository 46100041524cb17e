//! Overall type suggestion — a derived summary of one run's item list.

use braindump_core::{InferredType, StructuredItem, Suggestion};

/// Majority share required before a single type is inferred.
const DOMINANCE_THRESHOLD: f64 = 0.6;

/// Count items by type and summarize. Never feeds back into construction.
pub fn suggest(items: &[StructuredItem]) -> Suggestion {
    let total = items.len();
    if total == 0 {
        return Suggestion {
            inferred_type: InferredType::Mixed,
            confidence: 0.0,
            rationale: "No items were extracted".to_string(),
        };
    }

    let todos = items.iter().filter(|i| i.is_todo()).count();
    let events = total - todos;
    let (majority, count, label) = if todos >= events {
        (InferredType::Todo, todos, "todos")
    } else {
        (InferredType::Event, events, "events")
    };

    let confidence = count as f64 / total as f64;
    let inferred_type = if confidence >= DOMINANCE_THRESHOLD {
        majority
    } else {
        InferredType::Mixed
    };

    let rationale = if count == total {
        format!("All fragments are {label}")
    } else {
        let mut lead = number_word(count);
        if let Some(first) = lead.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!("{} of {} fragments are {label}", lead, number_word(total))
    };

    Suggestion {
        inferred_type,
        confidence,
        rationale,
    }
}

fn number_word(n: usize) -> String {
    const WORDS: &[&str] = &[
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
        "eighteen", "nineteen", "twenty",
    ];
    WORDS
        .get(n)
        .map(|w| w.to_string())
        .unwrap_or_else(|| n.to_string())
}
