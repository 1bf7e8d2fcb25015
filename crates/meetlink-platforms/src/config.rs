//! Parser configuration.
//!
//! Everything has a default, so an empty file (or no file at all) gives the
//! stock behaviour. A TOML file only needs the keys it wants to change:
//!
//! ```toml
//! date_format = "%A, %B %-d, %Y"
//! time_format = "%-I:%M %p"
//! duration_params = ["duration", "len"]
//! ```

use std::path::Path;

use meetlink_core::RenderFormat;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Query/fragment parameter names that commonly carry a start time, in the
/// order they are checked.
pub const DEFAULT_TIME_PARAMS: &[&str] = &[
    // Common time parameters
    "time",
    "startTime",
    "start_time",
    "start",
    "t",
    "date",
    "startDate",
    "start_date",
    "d",
    "datetime",
    "dateTime",
    "date_time",
    "dt",
    "scheduled",
    "scheduledTime",
    "scheduled_time",
    "scheduledAt",
    "scheduled_at",
    "when",
    "timestamp",
    "ts",
    // Platform-specific parameters
    "meetingTime",
    "meeting_time",
    "eventTime",
    "event_time",
    "scheduledStart",
    "scheduled_start",
    "begins",
    "beginTime",
    "startAt",
    "start_at",
    "startsAt",
    "starts_at",
    "scheduledFor",
    "scheduled_for",
    "plannedStart",
    "planned_start",
];

/// Query/fragment parameter names that commonly carry a meeting length.
pub const DEFAULT_DURATION_PARAMS: &[&str] = &[
    "duration",
    "dur",
    "length",
    "meetingLength",
    "meeting_length",
    "time_limit",
    "timeLimit",
    "period",
    "interval",
    "span",
    "meetingDuration",
];

/// Configuration for [`MeetingParser`](crate::MeetingParser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Parameter names checked first for a start time.
    pub time_params: Vec<String>,

    /// Parameter names checked for a meeting length.
    pub duration_params: Vec<String>,

    /// strftime format for rendered dates.
    pub date_format: String,

    /// strftime format for rendered times.
    pub time_format: String,

    /// Accept medium-confidence times for links that match no platform.
    /// Off by default: on an arbitrary URL a lone `2025` path segment is much
    /// more likely a year than 20:25.
    pub accept_medium_on_generic: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let render = RenderFormat::default();
        Self {
            time_params: DEFAULT_TIME_PARAMS.iter().map(|s| s.to_string()).collect(),
            duration_params: DEFAULT_DURATION_PARAMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            date_format: render.date_format().to_string(),
            time_format: render.time_format().to_string(),
            accept_medium_on_generic: false,
        }
    }
}

impl ParserConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks the format strings and parameter lists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.render_format()?;
        if self.time_params.is_empty() {
            return Err(ConfigError::EmptyParameterList("time_params"));
        }
        if self.duration_params.is_empty() {
            return Err(ConfigError::EmptyParameterList("duration_params"));
        }
        Ok(())
    }

    /// The render format described by `date_format`/`time_format`.
    pub fn render_format(&self) -> Result<RenderFormat, ConfigError> {
        Ok(RenderFormat::new(&self.date_format, &self.time_format)?)
    }

    /// Builder: replace the time parameter names.
    pub fn with_time_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.time_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: replace the duration parameter names.
    pub fn with_duration_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.duration_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set the date and time strftime formats.
    pub fn with_formats(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.date_format = date.into();
        self.time_format = time.into();
        self
    }

    /// Builder: accept medium-confidence times on the generic path.
    pub fn with_accept_medium_on_generic(mut self, accept: bool) -> Self {
        self.accept_medium_on_generic = accept;
        self
    }
}
