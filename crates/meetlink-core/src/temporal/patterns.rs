//! Pattern families for the temporal cascade.
//!
//! Each family is an ordered list of independent matchers. A matcher looks
//! at one decoded token and either returns a value or `None`; invalid
//! calendar values are a miss, never an error. The cascade in the parent
//! module walks the families in priority order.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Weekday,
};
use regex::{Captures, Regex};

/// Month names and abbreviations, shared by the named-month matchers.
const MONTH_NAMES: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Separator accepted between words of a relative expression. URLs rarely
/// carry literal spaces, so `next-monday` and `in_5_minutes` count too.
const WORD_SEP: &str = r"[\s_+-]+";

// ---------------------------------------------------------------------------
// Absolute instants
// ---------------------------------------------------------------------------

/// `YYYY-MM-DD[T ]HH:MM[:SS[.fff]][offset]`.
static ISO_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|\D)(\d{4})-(\d{2})-(\d{2})[T ](\d{2}):(\d{2})(?::(\d{2})(?:[.,](\d{1,9}))?)?\s*(Z|[+-]\d{2}(?::?\d{2})?)?",
    )
    .expect("Invalid ISO datetime regex")
});

/// `YYYY-MM-DD HH-MM[-SS]` or `HH.MM[.SS]`, as left by split path segments
/// rejoined with a space (`2025-01-09 14-30-00`). The clock separator is
/// the same throughout and no offset may follow, so `-00` is always seconds.
static ISO_SEPARATED_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|\D)(\d{4})-(\d{2})-(\d{2})[T ](\d{2})([-.])(\d{2})(?:([-.])(\d{2}))?(?:[^\dZz:+.-]|$)",
    )
    .expect("Invalid separated clock regex")
});

/// Compact basic format: `YYYYMMDDTHHMM[SS][Z]`.
static ISO_COMPACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\D)(\d{4})(\d{2})(\d{2})T(\d{2})(\d{2})(\d{2})?(Z)?(?:\D|$)")
        .expect("Invalid compact ISO regex")
});

static EPOCH_MILLIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{13}$").expect("Invalid epoch millis regex"));

static EPOCH_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("Invalid epoch seconds regex"));

/// An absolute-instant matcher. Naive values are placed in `offset`.
pub(crate) type InstantMatcher = fn(&str, FixedOffset) -> Option<DateTime<FixedOffset>>;

/// Which absolute family an instant matcher belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AbsoluteFamily {
    Iso,
    Epoch,
}

/// Absolute matchers, in cascade order.
pub(crate) const ABSOLUTE_MATCHERS: &[(AbsoluteFamily, InstantMatcher)] = &[
    (AbsoluteFamily::Iso, match_rfc3339),
    (AbsoluteFamily::Iso, match_iso_datetime),
    (AbsoluteFamily::Iso, match_iso_separated_clock),
    (AbsoluteFamily::Iso, match_iso_compact),
    (AbsoluteFamily::Epoch, match_epoch_millis),
    (AbsoluteFamily::Epoch, match_epoch_seconds),
];

fn match_rfc3339(text: &str, _offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).ok()
}

fn match_iso_datetime(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let caps = ISO_DATETIME.captures(text)?;
    let date = ymd(&caps[1], &caps[2], &caps[3])?;
    let nanos = caps.get(7).map_or(Some(0), |m| fraction_nanos(m.as_str()))?;
    let time = NaiveTime::from_hms_nano_opt(
        caps[4].parse().ok()?,
        caps[5].parse().ok()?,
        optional_number(&caps, 6)?,
        nanos,
    )?;
    let offset = match caps.get(8) {
        Some(m) => parse_offset(m.as_str())?,
        None => offset,
    };
    localize(date.and_time(time), offset)
}

fn match_iso_separated_clock(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let caps = ISO_SEPARATED_CLOCK.captures(text)?;
    if caps.get(7).is_some_and(|sep| sep.as_str() != &caps[5]) {
        return None;
    }
    let date = ymd(&caps[1], &caps[2], &caps[3])?;
    let time = NaiveTime::from_hms_opt(
        caps[4].parse().ok()?,
        caps[6].parse().ok()?,
        optional_number(&caps, 8)?,
    )?;
    localize(date.and_time(time), offset)
}

fn match_iso_compact(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let caps = ISO_COMPACT.captures(text)?;
    let date = ymd(&caps[1], &caps[2], &caps[3])?;
    let time = NaiveTime::from_hms_opt(
        caps[4].parse().ok()?,
        caps[5].parse().ok()?,
        optional_number(&caps, 6)?,
    )?;
    let offset = if caps.get(7).is_some() {
        FixedOffset::east_opt(0)?
    } else {
        offset
    };
    localize(date.and_time(time), offset)
}

fn match_epoch_millis(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if !EPOCH_MILLIS.is_match(text) {
        return None;
    }
    let millis: i64 = text.parse().ok()?;
    Some(DateTime::from_timestamp_millis(millis)?.with_timezone(&offset))
}

fn match_epoch_seconds(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if !EPOCH_SECONDS.is_match(text) {
        return None;
    }
    let seconds: i64 = text.parse().ok()?;
    Some(DateTime::from_timestamp_millis(seconds.checked_mul(1000)?)?.with_timezone(&offset))
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

static DATE_YMD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:\D|$)")
        .expect("Invalid YMD date regex")
});

/// Shared by the day-first and month-first matchers: the two orders are
/// structurally identical and only calendar validity tells them apart.
static DATE_NUMERIC_SHORT_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})(?:\D|$)")
        .expect("Invalid numeric date regex")
});

static DATE_COMPACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)((?:19[7-9]|20\d)\d)(\d{2})(\d{2})(?:\D|$)")
        .expect("Invalid compact date regex")
});

/// `March 4th, 2025`, `Mar 4`, `march 4 2025`.
static DATE_MONTH_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH_NAMES})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(\d{{4}})\b)?"
    ))
    .expect("Invalid month-first date regex")
});

/// `4 March 2025`, `4th of march`.
static DATE_DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTH_NAMES})\b\.?(?:,?\s+(\d{{4}})\b)?"
    ))
    .expect("Invalid day-first date regex")
});

/// A date matcher. `default_year` fills in dates written without a year.
pub(crate) type DateMatcher = fn(&str, i32) -> Option<NaiveDate>;

/// Date matchers, in cascade order.
///
/// `DD-MM-YYYY` is tried before `MM-DD-YYYY`, so `03-04-2025` is the 3rd of
/// April while `12-25-2025` (no 25th month) falls through to Christmas.
pub(crate) const DATE_MATCHERS: &[(&str, DateMatcher)] = &[
    ("year_first", match_year_first),
    ("day_first", match_day_first),
    ("month_first", match_month_first),
    ("compact", match_compact_date),
    ("named_month", match_named_month),
];

fn match_year_first(text: &str, _default_year: i32) -> Option<NaiveDate> {
    let caps = DATE_YMD.captures(text)?;
    ymd(&caps[1], &caps[2], &caps[3])
}

fn match_day_first(text: &str, _default_year: i32) -> Option<NaiveDate> {
    let caps = DATE_NUMERIC_SHORT_FIRST.captures(text)?;
    ymd(&expand_year(&caps[3]), &caps[2], &caps[1])
}

fn match_month_first(text: &str, _default_year: i32) -> Option<NaiveDate> {
    let caps = DATE_NUMERIC_SHORT_FIRST.captures(text)?;
    ymd(&expand_year(&caps[3]), &caps[1], &caps[2])
}

fn match_compact_date(text: &str, _default_year: i32) -> Option<NaiveDate> {
    let caps = DATE_COMPACT.captures(text)?;
    ymd(&caps[1], &caps[2], &caps[3])
}

fn match_named_month(text: &str, default_year: i32) -> Option<NaiveDate> {
    if let Some(caps) = DATE_MONTH_FIRST.captures(text) {
        if let Some(date) = named_date(&caps[1], &caps[2], caps.get(3), default_year) {
            return Some(date);
        }
    }
    let caps = DATE_DAY_FIRST.captures(text)?;
    named_date(&caps[2], &caps[1], caps.get(3), default_year)
}

fn named_date(
    month: &str,
    day: &str,
    year: Option<regex::Match<'_>>,
    default_year: i32,
) -> Option<NaiveDate> {
    let month = month_number(month)?;
    let day: u32 = day.parse().ok()?;
    let year = match year {
        Some(m) => m.as_str().parse().ok()?,
        None => default_year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Maps a month name or abbreviation to 1..=12.
fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Two-digit years are taken to be in the 2000s.
fn expand_year(year: &str) -> String {
    if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    }
}

// ---------------------------------------------------------------------------
// Times of day
// ---------------------------------------------------------------------------

static TIME_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})(?::(\d{2}))?\s*([ap])\.?m\b")
        .expect("Invalid 12-hour time regex")
});

static TIME_24H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)(?::([0-5]\d))?\b").expect("Invalid 24-hour time regex")
});

/// `14h30`, as written in much of Europe.
static TIME_H_SEPARATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([01]\d|2[0-3])h([0-5]\d)\b").expect("Invalid h-separated time regex")
});

/// A whole token like `14-30` or `9.15`, typically a path segment.
static TIME_DASHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]?\d|2[0-3])[-.]([0-5]\d)$").expect("Invalid dashed time regex")
});

static TIME_MILITARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3])([0-5]\d)$").expect("Invalid military time regex")
});

static TIME_HOUR_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*([ap])\.?m\b").expect("Invalid hour meridiem regex")
});

static TIME_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(noon|midnight|morning|afternoon|evening)\b")
        .expect("Invalid time marker regex")
});

/// A time of day found in a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeOfDay {
    /// A concrete clock time.
    Exact(NaiveTime),
    /// A vague part of the day (`morning`, `evening`...). Recognized, but it
    /// pins no clock time.
    Vague,
}

impl TimeOfDay {
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

pub(crate) type TimeMatcher = fn(&str) -> Option<TimeOfDay>;

/// Time matchers, in cascade order. The meridiem form goes first so that
/// `3:30pm` is not read as 03:30 by the 24-hour matcher.
pub(crate) const TIME_MATCHERS: &[(&str, TimeMatcher)] = &[
    ("meridiem", match_meridiem_time),
    ("24h", match_24h_time),
    ("dashed", match_dashed_time),
    ("military", match_military_time),
    ("hour_meridiem", match_hour_meridiem),
    ("marker", match_time_marker),
];

fn match_meridiem_time(text: &str) -> Option<TimeOfDay> {
    let caps = TIME_MERIDIEM.captures(text)?;
    let hour = to_24h(caps[1].parse().ok()?, &caps[4])?;
    exact(hour, caps[2].parse().ok()?, optional_number(&caps, 3)?)
}

fn match_24h_time(text: &str) -> Option<TimeOfDay> {
    if let Some(caps) = TIME_24H.captures(text) {
        return exact(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            optional_number(&caps, 3)?,
        );
    }
    let caps = TIME_H_SEPARATED.captures(text)?;
    exact(caps[1].parse().ok()?, caps[2].parse().ok()?, 0)
}

fn match_dashed_time(text: &str) -> Option<TimeOfDay> {
    let caps = TIME_DASHED.captures(text)?;
    exact(caps[1].parse().ok()?, caps[2].parse().ok()?, 0)
}

fn match_military_time(text: &str) -> Option<TimeOfDay> {
    let caps = TIME_MILITARY.captures(text)?;
    exact(caps[1].parse().ok()?, caps[2].parse().ok()?, 0)
}

fn match_hour_meridiem(text: &str) -> Option<TimeOfDay> {
    let caps = TIME_HOUR_MERIDIEM.captures(text)?;
    let hour = to_24h(caps[1].parse().ok()?, &caps[2])?;
    exact(hour, 0, 0)
}

fn match_time_marker(text: &str) -> Option<TimeOfDay> {
    let caps = TIME_MARKER.captures(text)?;
    match caps[1].to_ascii_lowercase().as_str() {
        "noon" => exact(12, 0, 0),
        "midnight" => exact(0, 0, 0),
        _ => Some(TimeOfDay::Vague),
    }
}

fn exact(hour: u32, minute: u32, second: u32) -> Option<TimeOfDay> {
    NaiveTime::from_hms_opt(hour, minute, second).map(TimeOfDay::Exact)
}

/// Converts a 1..=12 hour plus `a`/`p` into 0..=23.
fn to_24h(hour: u32, meridiem: &str) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = meridiem.eq_ignore_ascii_case("p");
    Some(match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    })
}

// ---------------------------------------------------------------------------
// Relative expressions
// ---------------------------------------------------------------------------

static RELATIVE_NOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*now\s*$").expect("Invalid now regex"));

static RELATIVE_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(today|tomorrow|yesterday)\b").expect("Invalid relative day regex")
});

static RELATIVE_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(next|last){WORD_SEP}(mon|tue|wed|thu|fri|sat|sun)[a-z]*\b"
    ))
    .expect("Invalid relative weekday regex")
});

const UNITS: &str = r"(minutes?|mins?|hours?|hrs?|days?|weeks?)";

static RELATIVE_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\bin{WORD_SEP}(\d{{1,6}})[\s_+-]*{UNITS}\b"))
        .expect("Invalid 'in N units' regex")
});

static RELATIVE_AGO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,6}})[\s_+-]*{UNITS}{WORD_SEP}(ago|from{WORD_SEP}now)\b"
    ))
    .expect("Invalid 'N units ago' regex")
});

/// A relative expression resolved against the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RelativeMatch {
    pub instant: DateTime<FixedOffset>,
    /// `true` when the expression only picks a day (`tomorrow`, `in 2 days`),
    /// so a time found in the same token may still set the clock.
    pub day_only: bool,
}

pub(crate) type RelativeMatcher = fn(&str, DateTime<FixedOffset>) -> Option<RelativeMatch>;

/// Relative matchers, in cascade order. Offsets (`in 5 minutes`) come before
/// the bare `now` so `5 minutes from now` is not swallowed by it.
pub(crate) const RELATIVE_MATCHERS: &[(&str, RelativeMatcher)] = &[
    ("in_units", match_in_units),
    ("units_ago", match_units_ago),
    ("day", match_relative_day),
    ("weekday", match_relative_weekday),
    ("now", match_now),
];

fn match_now(text: &str, reference: DateTime<FixedOffset>) -> Option<RelativeMatch> {
    RELATIVE_NOW.is_match(text).then_some(RelativeMatch {
        instant: reference,
        day_only: false,
    })
}

fn match_relative_day(text: &str, reference: DateTime<FixedOffset>) -> Option<RelativeMatch> {
    let caps = RELATIVE_DAY.captures(text)?;
    let days = match caps[1].to_ascii_lowercase().as_str() {
        "today" => 0,
        "tomorrow" => 1,
        _ => -1,
    };
    shifted(reference, Duration::days(days), true)
}

fn match_relative_weekday(text: &str, reference: DateTime<FixedOffset>) -> Option<RelativeMatch> {
    let caps = RELATIVE_WEEKDAY.captures(text)?;
    let target = weekday(&caps[2])?;
    let current = reference.weekday();
    let days = if caps[1].eq_ignore_ascii_case("next") {
        let ahead = (7 + target.num_days_from_monday() - current.num_days_from_monday()) % 7;
        if ahead == 0 { 7 } else { i64::from(ahead) }
    } else {
        let back = (7 + current.num_days_from_monday() - target.num_days_from_monday()) % 7;
        let back = if back == 0 { 7 } else { i64::from(back) };
        -back
    };
    shifted(reference, Duration::days(days), true)
}

fn match_in_units(text: &str, reference: DateTime<FixedOffset>) -> Option<RelativeMatch> {
    let caps = RELATIVE_IN.captures(text)?;
    let (delta, day_only) = unit_delta(caps[1].parse().ok()?, &caps[2])?;
    shifted(reference, delta, day_only)
}

fn match_units_ago(text: &str, reference: DateTime<FixedOffset>) -> Option<RelativeMatch> {
    let caps = RELATIVE_AGO.captures(text)?;
    let (delta, day_only) = unit_delta(caps[1].parse().ok()?, &caps[2])?;
    let delta = if caps[3].eq_ignore_ascii_case("ago") {
        -delta
    } else {
        delta
    };
    shifted(reference, delta, day_only)
}

fn unit_delta(amount: i64, unit: &str) -> Option<(Duration, bool)> {
    let unit = unit.to_ascii_lowercase();
    let delta = match unit.get(..1)? {
        "m" => (Duration::minutes(amount), false),
        "h" => (Duration::hours(amount), false),
        "d" => (Duration::days(amount), true),
        "w" => (Duration::weeks(amount), true),
        _ => return None,
    };
    Some(delta)
}

fn shifted(
    reference: DateTime<FixedOffset>,
    delta: Duration,
    day_only: bool,
) -> Option<RelativeMatch> {
    Some(RelativeMatch {
        instant: reference.checked_add_signed(delta)?,
        day_only,
    })
}

fn weekday(name: &str) -> Option<Weekday> {
    let weekday = match name.to_ascii_lowercase().as_str() {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Parses capture group `index` as a number, treating an absent group as 0.
fn optional_number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).map_or(Some(0), |m| m.as_str().parse().ok())
}

/// Right-pads a fractional-seconds string to nanoseconds.
fn fraction_nanos(fraction: &str) -> Option<u32> {
    format!("{fraction:0<9}").get(..9)?.parse().ok()
}

/// Parses `Z`, `+HH`, `+HHMM` or `+HH:MM`.
fn parse_offset(text: &str) -> Option<FixedOffset> {
    if text.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let sign = if text.starts_with('-') { -1 } else { 1 };
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

pub(crate) fn localize(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&naive).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn reference() -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2025, 1, 9, 15, 32, 17).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn first_date(text: &str) -> Option<NaiveDate> {
        DATE_MATCHERS.iter().find_map(|(_, m)| m(text, 2025))
    }

    fn first_time(text: &str) -> Option<TimeOfDay> {
        TIME_MATCHERS.iter().find_map(|(_, m)| m(text))
    }

    fn clock(h: u32, m: u32, s: u32) -> Option<TimeOfDay> {
        Some(TimeOfDay::Exact(NaiveTime::from_hms_opt(h, m, s).unwrap()))
    }

    mod absolute {
        use super::*;

        #[test]
        fn iso_with_offset_keeps_offset() {
            let dt = match_iso_datetime("2025-01-09T14:30:00-05:00", offset()).unwrap();
            assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
            assert_eq!(dt.timestamp(), 1_736_451_000);
        }

        #[test]
        fn iso_embedded_in_token() {
            let dt = match_iso_datetime("standup_2025-01-09 14:30", offset()).unwrap();
            assert_eq!(dt, offset().with_ymd_and_hms(2025, 1, 9, 14, 30, 0).unwrap());
        }

        #[test]
        fn iso_with_dashed_clock() {
            let dt = match_iso_separated_clock("2025-01-09 14-30", offset()).unwrap();
            assert_eq!(dt, offset().with_ymd_and_hms(2025, 1, 9, 14, 30, 0).unwrap());
            assert!(match_iso_datetime("2025-01-09 14-30", offset()).is_none());
        }

        #[test]
        fn dashed_clock_seconds_are_not_an_offset() {
            let dt = match_iso_separated_clock("2025-01-09 14-30-00", offset()).unwrap();
            assert_eq!(dt, offset().with_ymd_and_hms(2025, 1, 9, 14, 30, 0).unwrap());

            let dt = match_iso_separated_clock("2025-01-09 09.15.30", offset()).unwrap();
            assert_eq!(dt, offset().with_ymd_and_hms(2025, 1, 9, 9, 15, 30).unwrap());
        }

        #[test]
        fn dashed_clock_rejects_mixed_separators_and_offsets() {
            assert!(match_iso_separated_clock("2025-01-09 14.30-00", offset()).is_none());
            assert!(match_iso_separated_clock("2025-01-09 14-30+02", offset()).is_none());
            assert!(match_iso_separated_clock("2025-01-09 14-30Z", offset()).is_none());
        }

        #[test]
        fn iso_fractional_seconds() {
            let dt = match_iso_datetime("2025-01-09T14:30:05.25Z", offset()).unwrap();
            assert_eq!(dt.timestamp_subsec_millis(), 250);
        }

        #[test]
        fn iso_rejects_invalid_calendar_values() {
            assert!(match_iso_datetime("2025-02-30T10:00", offset()).is_none());
            assert!(match_iso_datetime("2025-01-09T25:00", offset()).is_none());
        }

        #[test]
        fn compact_iso() {
            let dt = match_iso_compact("20250109T143000Z", offset()).unwrap();
            assert_eq!(dt.timestamp(), 1_736_433_000);

            let dt = match_iso_compact("20250109T1430", offset()).unwrap();
            assert_eq!(dt, offset().with_ymd_and_hms(2025, 1, 9, 14, 30, 0).unwrap());
        }

        #[test]
        fn epochs_require_exact_length() {
            assert!(match_epoch_seconds("1736433000", offset()).is_some());
            assert!(match_epoch_seconds("17364330001", offset()).is_none());
            assert!(match_epoch_millis("1736433000000", offset()).is_some());
            assert!(match_epoch_millis("x1736433000000", offset()).is_none());
        }
    }

    mod dates {
        use super::*;

        #[test]
        fn year_first_separators() {
            assert_eq!(first_date("2025-03-04"), Some(date(2025, 3, 4)));
            assert_eq!(first_date("2025/3/4"), Some(date(2025, 3, 4)));
            assert_eq!(first_date("2025.03.04"), Some(date(2025, 3, 4)));
        }

        #[test]
        fn ambiguous_numeric_date_prefers_day_first() {
            // Both readings are valid calendar dates; day-first is tried first.
            assert_eq!(first_date("03-04-2025"), Some(date(2025, 4, 3)));
        }

        #[test]
        fn ambiguous_numeric_date_falls_back_to_month_first() {
            assert_eq!(first_date("12/25/2025"), Some(date(2025, 12, 25)));
        }

        #[test]
        fn two_digit_year_is_expanded() {
            assert_eq!(first_date("09.01.25"), Some(date(2025, 1, 9)));
        }

        #[test]
        fn compact_date_needs_plausible_year() {
            assert_eq!(first_date("20250109"), Some(date(2025, 1, 9)));
            assert_eq!(first_date("12345678"), None);
        }

        #[test]
        fn named_months() {
            assert_eq!(first_date("March 4th, 2025"), Some(date(2025, 3, 4)));
            assert_eq!(first_date("4 march 2026"), Some(date(2026, 3, 4)));
            assert_eq!(first_date("Dec 31"), Some(date(2025, 12, 31)));
            assert_eq!(first_date("the 1st of Feb"), Some(date(2025, 2, 1)));
        }

        #[test]
        fn impossible_dates_miss() {
            assert_eq!(first_date("31-02-2025"), None);
            assert_eq!(first_date("February 30, 2025"), None);
        }
    }

    mod times {
        use super::*;

        #[test]
        fn twelve_hour_clock() {
            assert_eq!(first_time("3:30pm"), clock(15, 30, 0));
            assert_eq!(first_time("12:15 a.m."), clock(0, 15, 0));
            assert_eq!(first_time("12:00PM"), clock(12, 0, 0));
        }

        #[test]
        fn twenty_four_hour_clock() {
            assert_eq!(first_time("14:30"), clock(14, 30, 0));
            assert_eq!(first_time("at 09:05:30"), clock(9, 5, 30));
            assert_eq!(first_time("14h30"), clock(14, 30, 0));
        }

        #[test]
        fn whole_token_forms() {
            assert_eq!(first_time("14-30"), clock(14, 30, 0));
            assert_eq!(first_time("0915"), clock(9, 15, 0));
            assert_eq!(first_time("2460"), None);
            assert_eq!(first_time("meeting-1430"), None);
        }

        #[test]
        fn hour_with_meridiem() {
            assert_eq!(first_time("3pm"), clock(15, 0, 0));
            assert_eq!(first_time("11 AM"), clock(11, 0, 0));
            assert_eq!(first_time("13pm"), None);
        }

        #[test]
        fn natural_markers() {
            assert_eq!(first_time("noon"), clock(12, 0, 0));
            assert_eq!(first_time("Midnight"), clock(0, 0, 0));
            assert_eq!(first_time("friday-evening"), Some(TimeOfDay::Vague));
        }
    }

    mod relative {
        use super::*;

        fn first_relative(text: &str) -> Option<RelativeMatch> {
            RELATIVE_MATCHERS
                .iter()
                .find_map(|(_, m)| m(text, reference()))
        }

        #[test]
        fn day_words() {
            let m = first_relative("tomorrow").unwrap();
            assert_eq!(m.instant, reference() + Duration::days(1));
            assert!(m.day_only);

            let m = first_relative("Yesterday").unwrap();
            assert_eq!(m.instant, reference() - Duration::days(1));
        }

        #[test]
        fn weekdays_never_resolve_to_today() {
            // The reference instant is a Thursday.
            let next = first_relative("next thursday").unwrap();
            assert_eq!(next.instant.date_naive(), date(2025, 1, 16));

            let last = first_relative("last-thursday").unwrap();
            assert_eq!(last.instant.date_naive(), date(2025, 1, 2));

            let next_mon = first_relative("next_monday").unwrap();
            assert_eq!(next_mon.instant.date_naive(), date(2025, 1, 13));

            let last_fri = first_relative("last friday").unwrap();
            assert_eq!(last_fri.instant.date_naive(), date(2025, 1, 3));
        }

        #[test]
        fn offsets() {
            let m = first_relative("in 5 minutes").unwrap();
            assert_eq!(m.instant, reference() + Duration::minutes(5));
            assert!(!m.day_only);

            let m = first_relative("2 hours ago").unwrap();
            assert_eq!(m.instant, reference() - Duration::hours(2));

            let m = first_relative("3-days-from-now").unwrap();
            assert_eq!(m.instant, reference() + Duration::days(3));
            assert!(m.day_only);
        }

        #[test]
        fn now_is_the_reference() {
            let m = first_relative("now").unwrap();
            assert_eq!(m.instant, reference());
            assert!(first_relative("NOW").is_some());
            assert!(first_relative("snowfall").is_none());
            assert!(first_relative("join-now").is_none());
            assert!(first_relative("book now").is_none());
        }
    }

    #[test]
    fn offsets_parse_in_all_forms() {
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("+05").unwrap().local_minus_utc(), 5 * 3600);
        assert_eq!(parse_offset("-0530").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_offset("+01:00").unwrap().local_minus_utc(), 3600);
    }
}
