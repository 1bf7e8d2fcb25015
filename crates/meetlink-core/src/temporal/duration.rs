//! Meeting length extraction.
//!
//! Durations are independent of the date/time cascade: one token in, a whole
//! number of minutes out. There is no confidence grading.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `duration=45`, `length:1h`, `dur=PT30M` anywhere in the token.
static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])(?:duration|length|dur)\s*[=:]\s*([^&;#\s=]+)")
        .expect("Invalid duration key-value regex")
});

static ISO8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("Invalid ISO duration regex")
});

/// `2h`, `2 hours`, `1h30m`, `1h30`.
static HOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s*h(?:ours?|rs?)?\s*(?:(\d+)\s*(?:m(?:in(?:ute)?s?)?)?)?$")
        .expect("Invalid hours duration regex")
});

/// `45m`, `45min`, `45 minutes`.
static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s*m(?:in(?:ute)?s?)?$").expect("Invalid minutes duration regex")
});

/// `1:30`, `0:45:30`.
static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):([0-5]\d)(?::[0-5]\d)?$").expect("Invalid clock duration regex")
});

static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("Invalid bare duration regex"));

/// A meeting length in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationResult {
    minutes: u32,
}

impl DurationResult {
    /// Creates a duration. Zero is not a meeting length.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes > 0).then_some(Self { minutes })
    }

    /// The normalized minute count.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// The rendered form, e.g. `"90 minutes"`.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DurationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.minutes)
    }
}

type DurationMatcher = fn(&str) -> Option<u32>;

/// Every duration form, first match wins.
const FULL: &[(&str, DurationMatcher)] = &[
    ("key_value", match_key_value),
    ("iso8601", match_iso8601),
    ("hours", match_hours),
    ("minutes", match_minutes),
    ("clock", match_clock),
    ("bare", match_bare),
];

/// Forms that carry their own unit. Bare numbers and clocks found in a path
/// are identifiers far more often than lengths.
const STRICT: &[(&str, DurationMatcher)] = &[
    ("key_value", match_key_value),
    ("iso8601", match_iso8601),
    ("hours", match_hours),
    ("minutes", match_minutes),
];

/// Parses a duration from a token using every supported form.
pub fn parse_duration(token: &str) -> Option<DurationResult> {
    run(FULL, token)
}

/// Parses a duration from a token, accepting only unit-bearing forms.
pub fn parse_duration_strict(token: &str) -> Option<DurationResult> {
    run(STRICT, token)
}

fn run(matchers: &[(&str, DurationMatcher)], token: &str) -> Option<DurationResult> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    matchers.iter().find_map(|(name, matcher)| {
        let minutes = matcher(token)?;
        tracing::trace!(token, matcher = name, minutes, "duration matched");
        DurationResult::from_minutes(minutes)
    })
}

fn match_key_value(token: &str) -> Option<u32> {
    let caps = KEY_VALUE.captures(token)?;
    // The key names the value, so any form is fine for it.
    let value = &caps[1];
    FULL[1..].iter().find_map(|(_, matcher)| matcher(value))
}

fn match_iso8601(token: &str) -> Option<u32> {
    let caps = ISO8601.captures(token)?;
    if caps.get(1).is_none() && caps.get(2).is_none() {
        return None;
    }
    let hours = group(&caps, 1)?;
    let minutes = group(&caps, 2)?;
    hours.checked_mul(60)?.checked_add(minutes)
}

fn match_hours(token: &str) -> Option<u32> {
    let caps = HOURS.captures(token)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes = group(&caps, 2)?;
    hours.checked_mul(60)?.checked_add(minutes)
}

fn match_minutes(token: &str) -> Option<u32> {
    MINUTES.captures(token)?[1].parse().ok()
}

fn match_clock(token: &str) -> Option<u32> {
    let caps = CLOCK.captures(token)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    Some(hours * 60 + minutes)
}

fn match_bare(token: &str) -> Option<u32> {
    if !BARE.is_match(token) {
        return None;
    }
    token.parse().ok()
}

fn group(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).map_or(Some(0), |m| m.as_str().parse().ok())
}
