//! Heuristic date, time and duration extraction from URL tokens.
//!
//! A token (query value, path segment, two segments glued together...) is
//! decoded opportunistically and then run through a fixed cascade:
//!
//! 1. ISO-8601-like instants (`2025-01-09T14:30`, `20250109T143000Z`)
//! 2. Unix epochs (13 digits = milliseconds, 10 digits = seconds)
//! 3. Dates (`2025-03-04`, `03-04-2025`, `20250304`, `March 4th, 2025`)
//! 4. Times of day (`3:30pm`, `14:30`, `1430`, `3pm`, `noon`)
//! 5. Relative expressions (`tomorrow`, `next friday`, `in 5 minutes`)
//!
//! The first two produce an instant directly with [`Confidence::High`].
//! Otherwise any date and time fragments are merged onto a base instant (the
//! reference instant, or the result of a relative expression): a date plus
//! an exact time is `High`, anything less is `Medium`.
//!
//! The reference instant is injected, never read from a clock, so the same
//! token always resolves to the same result.
//!
//! # Example
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use meetlink_core::temporal::{Confidence, TemporalExtractor};
//!
//! let reference = FixedOffset::east_opt(0)
//!     .unwrap()
//!     .with_ymd_and_hms(2025, 1, 9, 15, 0, 0)
//!     .unwrap();
//! let extractor = TemporalExtractor::new(reference);
//!
//! let result = extractor.parse_temporal("2025-01-10T09:30:00Z").unwrap();
//! assert_eq!(result.confidence, Confidence::High);
//! assert_eq!(result.date, "2025-01-10");
//! assert_eq!(result.time, "09:30:00");
//!
//! let result = extractor.parse_temporal("tomorrow").unwrap();
//! assert_eq!(result.confidence, Confidence::Medium);
//! ```

mod decode;
mod duration;
mod patterns;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use duration::{DurationResult, parse_duration, parse_duration_strict};

use patterns::{
    ABSOLUTE_MATCHERS, AbsoluteFamily, DATE_MATCHERS, RELATIVE_MATCHERS, RelativeMatch,
    TIME_MATCHERS, TimeOfDay,
};

/// How far a temporal result can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// An unambiguous absolute value: ISO-8601, a Unix epoch, or a date and
    /// an exact time found together.
    High,
    /// A relative expression, or a lone date or time merged onto a base
    /// instant.
    Medium,
}

/// The pattern family that produced a [`TemporalResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// ISO-8601 or RFC 3339.
    Iso,
    /// Unix epoch in seconds or milliseconds.
    Epoch,
    /// Date and/or time fragments merged onto the reference instant.
    Calendar,
    /// A relative expression, possibly refined by date/time fragments.
    Relative,
}

/// A successfully interpreted temporal token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalResult {
    /// Rendered date, in the reference instant's offset.
    pub date: String,
    /// Rendered time of day, in the reference instant's offset.
    pub time: String,
    /// Milliseconds since the Unix epoch.
    pub epoch_millis: i64,
    pub confidence: Confidence,
    pub kind: MatchKind,
    /// The resolved instant, in the reference instant's offset.
    pub instant: DateTime<FixedOffset>,
}

/// Errors from building a [`RenderFormat`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFormatError {
    /// A strftime string chrono cannot format with.
    #[error("invalid {field} format string: {format:?}")]
    Invalid {
        /// Which format was rejected (`"date"` or `"time"`).
        field: &'static str,
        format: String,
    },
}

/// How dates and times are rendered into strings.
///
/// Both formats are `chrono` strftime strings, checked on construction so
/// that rendering can never panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFormat {
    date: String,
    time: String,
}

impl Default for RenderFormat {
    fn default() -> Self {
        Self {
            date: "%Y-%m-%d".to_string(),
            time: "%H:%M:%S".to_string(),
        }
    }
}

impl RenderFormat {
    /// Creates a render format, validating both strftime strings.
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Result<Self, RenderFormatError> {
        let date = validated("date", date.into())?;
        let time = validated("time", time.into())?;
        Ok(Self { date, time })
    }

    pub fn date_format(&self) -> &str {
        &self.date
    }

    pub fn time_format(&self) -> &str {
        &self.time
    }

    /// Renders an instant as `(date, time)`.
    pub fn render(&self, instant: &DateTime<FixedOffset>) -> (String, String) {
        (
            instant.format(&self.date).to_string(),
            instant.format(&self.time).to_string(),
        )
    }
}

fn validated(field: &'static str, format: String) -> Result<String, RenderFormatError> {
    if format.is_empty() || StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
        return Err(RenderFormatError::Invalid { field, format });
    }
    Ok(format)
}

/// Interprets URL tokens as instants and durations relative to a fixed
/// reference instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalExtractor {
    reference: DateTime<FixedOffset>,
    render: RenderFormat,
}

impl TemporalExtractor {
    /// Creates an extractor anchored at `reference`.
    pub fn new(reference: DateTime<FixedOffset>) -> Self {
        Self {
            reference,
            render: RenderFormat::default(),
        }
    }

    /// Builder: set the render format.
    pub fn with_render_format(mut self, render: RenderFormat) -> Self {
        self.render = render;
        self
    }

    /// The instant relative expressions are resolved against.
    pub fn reference(&self) -> DateTime<FixedOffset> {
        self.reference
    }

    pub fn render_format(&self) -> &RenderFormat {
        &self.render
    }

    /// Renders the reference instant as `(date, time)`.
    pub fn render_reference(&self) -> (String, String) {
        self.render.render(&self.reference)
    }

    /// Interprets `token` as a point in time.
    ///
    /// The plain (percent-decoded) token is tried first; its base64-decoded
    /// form only if the plain token matched nothing. Returns `None` when no
    /// pattern applies.
    pub fn parse_temporal(&self, token: &str) -> Option<TemporalResult> {
        let decoded = decode::decode(token.trim());
        decoded.candidates().find_map(|text| {
            let result = self.interpret(text.trim())?;
            tracing::trace!(
                token,
                text,
                kind = ?result.kind,
                confidence = ?result.confidence,
                "temporal token matched"
            );
            Some(result)
        })
    }

    /// Interprets `token` as a meeting length. See [`parse_duration`].
    pub fn parse_duration(&self, token: &str) -> Option<DurationResult> {
        parse_duration(token)
    }

    fn interpret(&self, text: &str) -> Option<TemporalResult> {
        if text.is_empty() {
            return None;
        }

        let offset = *self.reference.offset();
        for (family, matcher) in ABSOLUTE_MATCHERS {
            if let Some(instant) = matcher(text, offset) {
                let kind = match family {
                    AbsoluteFamily::Iso => MatchKind::Iso,
                    AbsoluteFamily::Epoch => MatchKind::Epoch,
                };
                return Some(self.build(instant, Confidence::High, kind));
            }
        }

        let year = chrono::Datelike::year(&self.reference);
        let date = DATE_MATCHERS
            .iter()
            .find_map(|(_, matcher)| matcher(text, year));
        let time = TIME_MATCHERS.iter().find_map(|(_, matcher)| matcher(text));
        let relative = RELATIVE_MATCHERS
            .iter()
            .find_map(|(_, matcher)| matcher(text, self.reference));

        self.merge(date, time, relative)
    }

    /// Applies the merge rule for partial matches.
    fn merge(
        &self,
        date: Option<NaiveDate>,
        time: Option<TimeOfDay>,
        relative: Option<RelativeMatch>,
    ) -> Option<TemporalResult> {
        let (base, kind) = match relative {
            // `in 5 minutes` already names an instant; fragments cannot refine it.
            Some(rel) if !rel.day_only => {
                return Some(self.build(rel.instant, Confidence::Medium, MatchKind::Relative));
            }
            Some(rel) => (rel.instant, MatchKind::Relative),
            None if date.is_none() && time.is_none() => return None,
            None => (self.reference, MatchKind::Calendar),
        };

        let mut naive = base.naive_local();
        if let Some(date) = date {
            naive = date.and_time(naive.time());
        }
        if let Some(TimeOfDay::Exact(clock)) = time {
            naive = naive.date().and_time(clock);
        }
        let instant = patterns::localize(naive, *base.offset())?;

        let confidence = if date.is_some() && time.is_some_and(|t| t.is_exact()) {
            Confidence::High
        } else {
            Confidence::Medium
        };
        Some(self.build(instant, confidence, kind))
    }

    fn build(
        &self,
        instant: DateTime<FixedOffset>,
        confidence: Confidence,
        kind: MatchKind,
    ) -> TemporalResult {
        let instant = instant.with_timezone(self.reference.offset());
        let (date, time) = self.render.render(&instant);
        TemporalResult {
            date,
            time,
            epoch_millis: instant.timestamp_millis(),
            confidence,
            kind,
            instant,
        }
    }
}

/// Convenience function to interpret a single token.
///
/// See [`TemporalExtractor::parse_temporal`] for details.
pub fn parse_temporal(token: &str, reference: DateTime<FixedOffset>) -> Option<TemporalResult> {
    TemporalExtractor::new(reference).parse_temporal(token)
}
