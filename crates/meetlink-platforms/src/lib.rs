//! Platform registry and the meeting link dispatcher.
//!
//! # Example
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use meetlink_platforms::MeetingParser;
//!
//! let reference = FixedOffset::east_opt(3600)
//!     .unwrap()
//!     .with_ymd_and_hms(2025, 1, 9, 15, 32, 17)
//!     .unwrap();
//! let parser = MeetingParser::new(reference);
//!
//! let info = parser.parse_meeting_link("https://zoom.us/j/1234567890?pwd=abc");
//! assert_eq!(info.platform, "Zoom");
//! assert_eq!(info.meeting_id, "1234567890");
//! assert_eq!(info.password, "abc");
//! assert!(info.inferred_time);
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod extractors;
pub mod registry;
mod tokens;

pub use config::ParserConfig;
pub use dispatch::{MeetingParser, parse_meeting_link};
pub use error::{ConfigError, LinkError};
pub use registry::{PlatformDescriptor, PlatformFields, PlatformRegistry};
