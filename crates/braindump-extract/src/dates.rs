//! Calendar-aware date/time resolution.
//!
//! Literal recognition is table-driven (weekdays, month-day literals, clock
//! times, relative offsets, day references); chrono does the calendar math in
//! the caller's zone and candidates carry UTC instants. A malformed
//! expression never fails the run — it simply yields no candidate.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use braindump_core::DateCandidate;

use crate::lexicon;

/// Morning anchor for day-only references ("tomorrow", "on Friday").
const MORNING: (u32, u32) = (9, 0);
/// Evening anchor for "tonight".
const EVENING: (u32, u32) = (20, 0);

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:at\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b|\b(\d{1,2}):(\d{2})\b|\bat\s+(noon|midnight)\b")
        .unwrap()
});

static DAY_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(today|tomorrow|tonight)\b").unwrap());

static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(on|next|this|by)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .unwrap()
});

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s*(\d{4}))?\b")
        .unwrap()
});

static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bin\s+(\d{1,3}|a|an)\s+(minute|hour|day|week)s?\b").unwrap()
});

static VAGUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", lexicon::VAGUE_TIME_WORDS.join("|"))).unwrap()
});

/// True when the phrase is canonically vague — such phrases never populate a
/// todo's due date even when a date was resolvable.
pub fn is_vague_phrase(text: &str) -> bool {
    VAGUE_RE.is_match(text)
}

struct TimeMatch {
    time: NaiveTime,
    start: usize,
    end: usize,
}

/// Extract temporal expressions from one fragment, resolved against `now`
/// in the caller's timezone.
pub fn resolve_dates(fragment: &str, now: DateTime<Utc>, tz: Tz) -> Vec<DateCandidate> {
    let local_now = now.with_timezone(&tz);
    let today = local_now.date_naive();
    let time = first_time(fragment);

    let mut candidates = Vec::new();

    // Relative offsets resolve directly against the clock.
    for caps in RELATIVE_RE.captures_iter(fragment) {
        let n: i64 = match &caps[1] {
            a if a.eq_ignore_ascii_case("a") || a.eq_ignore_ascii_case("an") => 1,
            digits => match digits.parse() {
                Ok(n) => n,
                Err(_) => continue,
            },
        };
        let unit = caps[2].to_lowercase();
        let (start, fine_grained) = match unit.as_str() {
            "minute" => (local_now + Duration::minutes(n), true),
            "hour" => (local_now + Duration::hours(n), true),
            "day" => match morning_of(today + Duration::days(n), tz) {
                Some(dt) => (dt, false),
                None => continue,
            },
            "week" => match morning_of(today + Duration::weeks(n), tz) {
                Some(dt) => (dt, false),
                None => continue,
            },
            _ => continue,
        };
        candidates.push(DateCandidate {
            start: Some(start.with_timezone(&Utc)),
            end: None,
            all_day: Some(!fine_grained),
            when_text: Some(caps[0].to_string()),
            fuzzy: !fine_grained,
        });
    }

    // Day references: today / tomorrow / tonight.
    for m in DAY_REF_RE.find_iter(fragment) {
        let word = m.as_str().to_lowercase();
        let (date, default) = match word.as_str() {
            "today" => (today, MORNING),
            "tomorrow" => (today + Duration::days(1), MORNING),
            "tonight" => (today, EVENING),
            _ => continue,
        };
        push_day_candidate(&mut candidates, fragment, date, default, &time, m.start(), m.end(), tz);
    }

    // Weekday references, resolved to the next occurrence.
    for caps in WEEKDAY_RE.captures_iter(fragment) {
        let Some(weekday) = parse_weekday(&caps[2]) else {
            continue;
        };
        let m = caps.get(0).unwrap();
        let date = next_weekday(today, weekday);
        push_day_candidate(&mut candidates, fragment, date, MORNING, &time, m.start(), m.end(), tz);
    }

    // Month-day literals ("March 5", "January 1, 2024").
    for caps in MONTH_DAY_RE.captures_iter(fragment) {
        let Some(month) = parse_month(&caps[1]) else {
            continue;
        };
        let day: u32 = match caps[2].parse() {
            Ok(d) => d,
            Err(_) => continue,
        };
        let year: Option<i32> = caps.get(3).and_then(|y| y.as_str().parse().ok());
        let date = match month_day_date(today, month, day, year) {
            Some(d) => d,
            None => {
                debug!(month, day, "unresolvable month-day literal, skipping");
                continue;
            }
        };
        let m = caps.get(0).unwrap();
        push_day_candidate(&mut candidates, fragment, date, MORNING, &time, m.start(), m.end(), tz);
    }

    // A clock time with no date anchors to today.
    if candidates.is_empty() {
        if let Some(t) = &time {
            if let Some(start) = at_time(today, t.time, tz) {
                candidates.push(DateCandidate {
                    start: Some(start.with_timezone(&Utc)),
                    end: None,
                    all_day: Some(false),
                    when_text: Some(fragment[t.start..t.end].to_string()),
                    fuzzy: false,
                });
            }
        }
    }

    // No literal date, but vague temporal intent: one synthetic candidate.
    if candidates.is_empty() {
        if let Some(m) = VAGUE_RE.find(fragment) {
            candidates.push(DateCandidate {
                start: None,
                end: None,
                all_day: None,
                when_text: Some(m.as_str().to_string()),
                fuzzy: true,
            });
        }
    }

    candidates
}

/// Push a candidate for a day-level match, attaching the fragment's clock
/// time when one was found. Day-only references anchor to the default slot
/// and stay fuzzy; an explicit time makes the candidate concrete.
#[allow(clippy::too_many_arguments)]
fn push_day_candidate(
    candidates: &mut Vec<DateCandidate>,
    fragment: &str,
    date: NaiveDate,
    default: (u32, u32),
    time: &Option<TimeMatch>,
    match_start: usize,
    match_end: usize,
    tz: Tz,
) {
    let (clock, has_time) = match time {
        Some(t) => (t.time, true),
        None => (
            NaiveTime::from_hms_opt(default.0, default.1, 0).unwrap_or_default(),
            false,
        ),
    };
    let Some(start) = at_time(date, clock, tz) else {
        debug!(%date, "date falls in a timezone gap, skipping");
        return;
    };

    let when_text = match time {
        // Adjacent day and time reads as one phrase ("at 3pm tomorrow").
        Some(t) if gap(t.start, t.end, match_start, match_end) <= 1 => {
            let lo = t.start.min(match_start);
            let hi = t.end.max(match_end);
            fragment[lo..hi].to_string()
        }
        _ => fragment[match_start..match_end].to_string(),
    };

    candidates.push(DateCandidate {
        start: Some(start.with_timezone(&Utc)),
        end: None,
        all_day: Some(!has_time),
        when_text: Some(when_text),
        fuzzy: !has_time,
    });
}

fn gap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> usize {
    if a_end <= b_start {
        b_start - a_end
    } else if b_end <= a_start {
        a_start - b_end
    } else {
        0
    }
}

fn first_time(fragment: &str) -> Option<TimeMatch> {
    let caps = TIME_RE.captures(fragment)?;
    let m = caps.get(0)?;

    let time = if let Some(word) = caps.get(6) {
        match word.as_str().to_lowercase().as_str() {
            "noon" => NaiveTime::from_hms_opt(12, 0, 0)?,
            _ => NaiveTime::from_hms_opt(0, 0, 0)?,
        }
    } else if let Some(hour) = caps.get(1) {
        let mut h: u32 = hour.as_str().parse().ok()?;
        let min: u32 = caps
            .get(2)
            .map_or(Some(0), |m| m.as_str().parse().ok())?;
        let meridiem = caps.get(3)?.as_str().to_lowercase();
        if h > 12 {
            debug!(hour = h, "clock hour out of range, skipping time");
            return None;
        }
        if meridiem == "pm" && h != 12 {
            h += 12;
        } else if meridiem == "am" && h == 12 {
            h = 0;
        }
        NaiveTime::from_hms_opt(h, min, 0)?
    } else {
        let h: u32 = caps.get(4)?.as_str().parse().ok()?;
        let min: u32 = caps.get(5)?.as_str().parse().ok()?;
        NaiveTime::from_hms_opt(h, min, 0)?
    };

    Some(TimeMatch {
        time,
        start: m.start(),
        end: m.end(),
    })
}

fn at_time(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Tz>> {
    date.and_time(time).and_local_timezone(tz).earliest()
}

fn morning_of(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    at_time(date, NaiveTime::from_hms_opt(MORNING.0, MORNING.1, 0).unwrap_or_default(), tz)
        // DST-gap fallback.
        .or_else(|| at_time(date, NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default(), tz))
}

/// Strictly-next occurrence: a bare weekday never means today.
fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut delta = target - current;
    if delta <= 0 {
        delta += 7;
    }
    today + Duration::days(delta)
}

fn month_day_date(today: NaiveDate, month: u32, day: u32, year: Option<i32>) -> Option<NaiveDate> {
    match year {
        Some(y) => NaiveDate::from_ymd_opt(y, month, day),
        None => {
            // Yearless dates already past roll into next year.
            let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
            if this_year < today {
                NaiveDate::from_ymd_opt(today.year() + 1, month, day)
            } else {
                Some(this_year)
            }
        }
    }
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_month(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" => Some(1),
        "february" => Some(2),
        "march" => Some(3),
        "april" => Some(4),
        "may" => Some(5),
        "june" => Some(6),
        "july" => Some(7),
        "august" => Some(8),
        "september" => Some(9),
        "october" => Some(10),
        "november" => Some(11),
        "december" => Some(12),
        _ => None,
    }
}

/// "by Friday" reads as a due date, not an occasion — the classifier uses
/// this to keep such fragments out of the event bucket.
pub fn has_by_weekday(fragment: &str) -> bool {
    static BY_WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\bby\s+(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|tomorrow|tonight|today)\b")
            .unwrap()
    });
    BY_WEEKDAY_RE.is_match(fragment)
}
