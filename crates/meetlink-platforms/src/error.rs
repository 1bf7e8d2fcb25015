//! Error types for link dispatch and parser configuration.
//!
//! None of these ever reach a caller of
//! [`MeetingParser::parse_meeting_link`](crate::MeetingParser::parse_meeting_link):
//! link errors are folded into `MeetingInfo::error`. Configuration errors are
//! returned from the setup calls that can produce them.

use std::path::PathBuf;

use meetlink_core::RenderFormatError;
use thiserror::Error;

/// Why a link could not be dispatched at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// Nothing but whitespace was given.
    #[error("empty meeting link")]
    Empty,

    /// The string is not a URL.
    #[error("invalid meeting link: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A URL, but one without a host to dispatch on (`mailto:`, `data:`...).
    #[error("meeting link has no host: {0}")]
    MissingHost(String),
}

/// Errors from loading or applying a [`ParserConfig`](crate::ParserConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    RenderFormat(#[from] RenderFormatError),

    /// A parameter list that must not be empty is.
    #[error("{0} must list at least one parameter name")]
    EmptyParameterList(&'static str),
}
