//! The table of known meeting platforms.
//!
//! A descriptor pairs a match key with a display name and an extractor
//! function. Keys without a `/` match a host and its subdomains
//! (`webex.com` matches `acme.webex.com`); keys with a `/` also require the
//! path to start with the given segments (`meet.google.com/lookup`).
//!
//! When several descriptors match, the longest key wins, so adding a more
//! specific entry never requires reordering the table.

use std::cmp::Reverse;
use std::fmt;
use std::sync::LazyLock;

use url::Url;

use crate::extractors;

/// Fields a platform extractor recovered from a link.
///
/// Empty strings mean "not found", matching
/// [`MeetingInfo`](meetlink_core::MeetingInfo).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformFields {
    pub meeting_id: String,
    pub password: String,
    /// Owner/host segment, e.g. the user name in a Cal.com link.
    pub host: String,
    /// Canonical join URL, when the platform has one.
    pub join_url: Option<String>,
}

impl PlatformFields {
    /// Creates fields with only a meeting id.
    pub fn with_id(meeting_id: Option<String>) -> Self {
        Self::with_credentials(meeting_id, None)
    }

    /// Creates fields with a meeting id and password.
    pub fn with_credentials(meeting_id: Option<String>, password: Option<String>) -> Self {
        Self {
            meeting_id: meeting_id.unwrap_or_default(),
            password: password.unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Builder: set the owner/host segment.
    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host.unwrap_or_default();
        self
    }

    /// Builder: set the canonical join URL.
    pub fn with_join_url(mut self, join_url: impl Into<String>) -> Self {
        self.join_url = Some(join_url.into());
        self
    }
}

/// Signature of a platform extractor.
pub type ExtractFn = fn(&Url) -> PlatformFields;

/// One registered platform.
#[derive(Clone, Copy)]
pub struct PlatformDescriptor {
    match_key: &'static str,
    name: &'static str,
    extract: ExtractFn,
}

impl fmt::Debug for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformDescriptor")
            .field("match_key", &self.match_key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PlatformDescriptor {
    pub const fn new(match_key: &'static str, name: &'static str, extract: ExtractFn) -> Self {
        Self {
            match_key,
            name,
            extract,
        }
    }

    /// The host (and optional path prefix) this descriptor matches.
    pub fn match_key(&self) -> &'static str {
        self.match_key
    }

    /// Display name reported in `MeetingInfo::platform`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this descriptor applies to a lowercased host and a
    /// URL path.
    pub fn matches(&self, host: &str, path: &str) -> bool {
        let (key_host, key_path) = match self.match_key.split_once('/') {
            Some((key_host, key_path)) => (key_host, Some(key_path)),
            None => (self.match_key, None),
        };

        let host_matches = host == key_host
            || host
                .strip_suffix(key_host)
                .is_some_and(|prefix| prefix.ends_with('.'));
        if !host_matches {
            return false;
        }

        let Some(key_path) = key_path else {
            return true;
        };
        path.trim_start_matches('/')
            .strip_prefix(key_path.trim_matches('/'))
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Runs the platform extractor.
    pub fn extract(&self, url: &Url) -> PlatformFields {
        (self.extract)(url)
    }
}

/// An ordered set of platform descriptors.
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    descriptors: Vec<PlatformDescriptor>,
}

static BUILTIN: LazyLock<PlatformRegistry> = LazyLock::new(|| {
    use extractors as ex;

    PlatformRegistry::new(vec![
        PlatformDescriptor::new("zoom.us", "Zoom", ex::zoom),
        PlatformDescriptor::new("zoomgov.com", "Zoom (Gov)", ex::zoom_gov),
        PlatformDescriptor::new("teams.microsoft.com", "Microsoft Teams", ex::teams),
        PlatformDescriptor::new("teams.live.com", "Microsoft Teams Live", ex::teams_live),
        PlatformDescriptor::new("meet.google.com", "Google Meet", ex::google_meet),
        PlatformDescriptor::new(
            "meet.google.com/lookup",
            "Google Meet (Education)",
            ex::google_meet_lookup,
        ),
        PlatformDescriptor::new(
            "meet.google.com/native",
            "Google Meet (PWA)",
            ex::google_meet_native,
        ),
        PlatformDescriptor::new("duo.google.com", "Google Duo", ex::call_id),
        PlatformDescriptor::new("webex.com", "Cisco Webex", ex::webex),
        PlatformDescriptor::new("cal.com", "Cal.com", ex::cal_com),
        PlatformDescriptor::new("bluejeans.com", "BlueJeans", ex::last_segment_id),
        PlatformDescriptor::new("gotomeeting.com", "GoToMeeting", ex::goto),
        PlatformDescriptor::new("meet.goto.com", "GoTo Meeting", ex::goto),
        PlatformDescriptor::new("join.me", "Join.me", ex::last_segment_id),
        PlatformDescriptor::new("whereby.com", "Whereby", ex::owner_room),
        PlatformDescriptor::new("meet.jit.si", "Jitsi Meet", ex::jitsi),
        PlatformDescriptor::new("chime.aws", "Amazon Chime", ex::chime),
        PlatformDescriptor::new("meet.starleaf.com", "StarLeaf", ex::last_segment_id),
        PlatformDescriptor::new("lifesize.com", "Lifesize", ex::lifesize),
        PlatformDescriptor::new("meet.ringcentral.com", "RingCentral", ex::last_segment_id),
        PlatformDescriptor::new("8x8.vc", "8x8 Meet", ex::last_segment_id),
        PlatformDescriptor::new("vonage.com", "Vonage Meetings", ex::meeting_id_param),
        PlatformDescriptor::new("meet.lync.com", "Skype for Business", ex::conference_id),
        PlatformDescriptor::new(
            "meetingsemea.lync.com",
            "Skype for Business (EMEA)",
            ex::conference_id,
        ),
        PlatformDescriptor::new("uberconference.com", "UberConference", ex::owner_room),
        PlatformDescriptor::new("facetime.apple.com", "FaceTime", ex::call_id),
        PlatformDescriptor::new("skype.com", "Skype", ex::last_segment_id),
        PlatformDescriptor::new("meet.anydesk.com", "AnyDesk Meeting", ex::last_segment_id),
        PlatformDescriptor::new(
            "meet.teamviewer.com",
            "TeamViewer Meeting",
            ex::meeting_id_param,
        ),
        PlatformDescriptor::new("discord.com", "Discord", ex::last_segment_id),
        PlatformDescriptor::new("slack.com", "Slack Huddle", ex::slack_huddle),
        PlatformDescriptor::new("meet.zoho.com", "Zoho Meeting", ex::last_segment_id),
        PlatformDescriptor::new("bigbluebutton.org", "BigBlueButton", ex::meeting_id_param),
        PlatformDescriptor::new("meet.jio.com", "JioMeet", ex::last_segment_id),
        PlatformDescriptor::new("livestorm.co", "Livestorm", ex::last_segment_id),
        PlatformDescriptor::new("demio.com", "Demio", ex::last_segment_id),
        PlatformDescriptor::new("meetfox.com", "MeetFox", ex::owner_and_event),
    ])
});

impl PlatformRegistry {
    pub fn new(descriptors: Vec<PlatformDescriptor>) -> Self {
        Self { descriptors }
    }

    /// The registry of every supported platform.
    pub fn builtin() -> &'static PlatformRegistry {
        &BUILTIN
    }

    /// Finds the most specific descriptor for a lowercased host and a path.
    ///
    /// Ties between keys of equal length go to the one registered first.
    pub fn resolve(&self, host: &str, path: &str) -> Option<&PlatformDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.matches(host, path))
            .min_by_key(|descriptor| Reverse(descriptor.match_key.len()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_name(host: &str, path: &str) -> Option<&'static str> {
        PlatformRegistry::builtin()
            .resolve(host, path)
            .map(PlatformDescriptor::name)
    }

    mod matching {
        use super::*;

        #[test]
        fn host_key_matches_subdomains() {
            let descriptor = PlatformDescriptor::new("webex.com", "Cisco Webex", |_| {
                PlatformFields::default()
            });
            assert!(descriptor.matches("webex.com", "/"));
            assert!(descriptor.matches("acme.webex.com", "/meet/jdoe"));
            assert!(!descriptor.matches("notwebex.com", "/"));
            assert!(!descriptor.matches("webex.com.evil.example", "/"));
        }

        #[test]
        fn path_key_requires_whole_segments() {
            let descriptor =
                PlatformDescriptor::new("meet.google.com/lookup", "Lookup", |_| {
                    PlatformFields::default()
                });
            assert!(descriptor.matches("meet.google.com", "/lookup/abc"));
            assert!(descriptor.matches("meet.google.com", "/lookup"));
            assert!(!descriptor.matches("meet.google.com", "/lookups/abc"));
            assert!(!descriptor.matches("meet.google.com", "/abc-defg-hij"));
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn longest_key_wins() {
            assert_eq!(
                resolve_name("meet.google.com", "/lookup/xyz"),
                Some("Google Meet (Education)")
            );
            assert_eq!(
                resolve_name("meet.google.com", "/native"),
                Some("Google Meet (PWA)")
            );
            assert_eq!(
                resolve_name("meet.google.com", "/abc-defg-hij"),
                Some("Google Meet")
            );
        }

        #[test]
        fn subdomains_resolve() {
            assert_eq!(resolve_name("us02web.zoom.us", "/j/1"), Some("Zoom"));
            assert_eq!(resolve_name("acme.zoomgov.com", "/j/1"), Some("Zoom (Gov)"));
            assert_eq!(resolve_name("global.gotomeeting.com", "/join/1"), Some("GoToMeeting"));
            assert_eq!(resolve_name("app.slack.com", "/huddle"), Some("Slack Huddle"));
        }

        #[test]
        fn unknown_host_has_no_descriptor() {
            assert_eq!(resolve_name("unknown-host.example", "/meeting/42"), None);
            assert_eq!(resolve_name("google.com", "/"), None);
        }

        #[test]
        fn ties_go_to_first_registered() {
            let registry = PlatformRegistry::new(vec![
                PlatformDescriptor::new("example.com", "First", |_| PlatformFields::default()),
                PlatformDescriptor::new("example.com", "Second", |_| PlatformFields::default()),
            ]);
            let descriptor = registry.resolve("example.com", "/").unwrap();
            assert_eq!(descriptor.name(), "First");
        }
    }

    #[test]
    fn builtin_keys_are_unique_and_lowercase() {
        let registry = PlatformRegistry::builtin();
        assert!(registry.len() >= 35);

        let mut keys: Vec<_> = registry.iter().map(PlatformDescriptor::match_key).collect();
        assert!(keys.iter().all(|key| *key == key.to_ascii_lowercase()));
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), registry.len());
    }

    #[test]
    fn fields_builders() {
        let fields = PlatformFields::with_credentials(Some("123".into()), None)
            .with_host(Some("jdoe".into()))
            .with_join_url("https://example.com/123");
        assert_eq!(fields.meeting_id, "123");
        assert_eq!(fields.password, "");
        assert_eq!(fields.host, "jdoe");
        assert_eq!(fields.join_url.as_deref(), Some("https://example.com/123"));
    }
}
