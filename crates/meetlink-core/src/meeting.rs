//! The record produced for every parsed meeting link.

use serde::{Deserialize, Serialize};

/// Everything that could be recovered from a single meeting link.
///
/// Empty strings mean "not found". A record is built once per parse and
/// handed to the caller as-is; it carries its own failure state in
/// [`MeetingInfo::error`] instead of being wrapped in a `Result`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInfo {
    /// Display name of the detected platform, empty on the generic path.
    pub platform: String,
    /// Meeting identifier (numeric id, room name, meeting code...).
    pub meeting_id: String,
    /// Meeting password or passcode.
    pub password: String,
    /// Owner or host segment of the link (e.g. a Cal.com user name).
    pub host: String,
    /// Canonical join URL, or the input link when no canonical form exists.
    pub join_url: String,
    /// Rendered time of day.
    pub time: String,
    /// Rendered calendar date.
    pub date: String,
    /// Rendered duration, e.g. `"90 minutes"`.
    pub duration: String,
    /// `true` when `time`/`date` are the reference instant rather than
    /// something found in the link.
    pub inferred_time: bool,
    /// Why the link could not be parsed. `None` on success.
    pub error: Option<String>,
}

impl MeetingInfo {
    /// Creates a failed record: every field default except `error`.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Returns true if the link was parsed (even if most fields are empty).
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns true if a registered platform matched the link.
    pub fn has_platform(&self) -> bool {
        !self.platform.is_empty()
    }

    /// Returns true if `time`/`date` came from the link itself.
    pub fn has_extracted_time(&self) -> bool {
        !self.inferred_time && !self.time.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_record_is_otherwise_empty() {
        let info = MeetingInfo::from_error("invalid meeting link");
        assert!(!info.is_ok());
        assert_eq!(info.error.as_deref(), Some("invalid meeting link"));
        assert_eq!(
            MeetingInfo {
                error: None,
                ..info
            },
            MeetingInfo::default()
        );
    }

    #[test]
    fn extracted_time_requires_non_inferred_value() {
        let mut info = MeetingInfo {
            time: "14:30:00".to_string(),
            ..Default::default()
        };
        assert!(info.has_extracted_time());

        info.inferred_time = true;
        assert!(!info.has_extracted_time());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let info = MeetingInfo {
            platform: "Zoom".to_string(),
            meeting_id: "123".to_string(),
            inferred_time: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["meetingId"], "123");
        assert_eq!(json["joinUrl"], "");
        assert_eq!(json["inferredTime"], true);
        assert!(json["error"].is_null());
    }
}
