//! Core types and temporal extraction for meeting links.

pub mod meeting;
pub mod temporal;
pub mod tracing;

pub use meeting::MeetingInfo;
pub use temporal::{
    Confidence, DurationResult, MatchKind, RenderFormat, RenderFormatError, TemporalExtractor,
    TemporalResult, parse_duration, parse_temporal,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
