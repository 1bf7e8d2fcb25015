//! Per-platform field extractors.
//!
//! Each extractor takes an already-parsed URL and pulls out whatever the
//! platform puts in it: a meeting id, a password, an owner segment, and for
//! a few platforms a canonical join URL with tracking parameters stripped.
//! Extractors never fail; anything they cannot find stays empty.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::registry::PlatformFields;

/// Teams' legacy short meeting ids.
static TEAMS_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{12,}$").expect("Invalid Teams id regex"));

/// Webex personal meeting numbers.
static WEBEX_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{9,11}$").expect("Invalid Webex id regex"));

static GOTO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{9}$").expect("Invalid GoTo id regex"));

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("Invalid word segment regex"));

/// Non-empty path segments.
fn segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn segment(url: &Url, index: usize) -> Option<String> {
    segments(url).get(index).map(|s| s.to_string())
}

fn last_segment(url: &Url) -> Option<String> {
    segments(url).last().map(|s| s.to_string())
}

/// The segment right after the first segment equal to one of `markers`.
fn segment_after(url: &Url, markers: &[&str]) -> Option<String> {
    let segments = segments(url);
    let position = segments.iter().position(|s| markers.contains(s))?;
    segments.get(position + 1).map(|s| s.to_string())
}

/// The first segment matching `regex`.
fn segment_matching(url: &Url, regex: &Regex) -> Option<String> {
    segments(url)
        .into_iter()
        .find(|s| regex.is_match(s))
        .map(str::to_string)
}

/// The first non-empty value of any of `names` in the query string.
fn query_param(url: &Url, names: &[&str]) -> Option<String> {
    url.query_pairs()
        .find(|(key, value)| names.iter().any(|name| key == name) && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Zoom: `/j/<id>`, `/my/<id>`, `/w/<id>`, `/wc/<id>`, `/s/<id>` or
/// `/join?confno=<id>`, passcode from `pwd`/`passcode`.
pub fn zoom(url: &Url) -> PlatformFields {
    zoom_on(url, "zoom.us")
}

/// Zoom for Government, same layout as [`zoom`] on `zoomgov.com`.
pub fn zoom_gov(url: &Url) -> PlatformFields {
    zoom_on(url, "zoomgov.com")
}

fn zoom_on(url: &Url, domain: &str) -> PlatformFields {
    let meeting_id = query_param(url, &["confno"])
        .or_else(|| segment_after(url, &["j", "my", "w", "wc", "s"]));
    let passcode = query_param(url, &["pwd", "passcode"]);

    let Some(id) = meeting_id else {
        return PlatformFields::with_credentials(None, passcode);
    };

    let mut join_url = format!("https://{domain}/j/{id}");
    if let Some(ref pwd) = passcode {
        join_url.push_str("?pwd=");
        join_url.push_str(pwd);
    }
    PlatformFields::with_credentials(Some(id), passcode).with_join_url(join_url)
}

/// Teams: the thread id of a `meetup-join` link, otherwise the first long
/// opaque path segment. Teams links are signed, so the join URL stays the
/// input link.
pub fn teams(url: &Url) -> PlatformFields {
    let thread = segment_after(url, &["meetup-join"]).and_then(|raw| {
        urlencoding::decode(&raw)
            .ok()
            .map(|decoded| decoded.into_owned())
    });
    PlatformFields::with_id(thread.or_else(|| segment_matching(url, &TEAMS_ID_REGEX)))
}

/// Teams (consumer): `?event_id=` or `/meet/<id>`.
pub fn teams_live(url: &Url) -> PlatformFields {
    PlatformFields::with_id(
        query_param(url, &["event_id"]).or_else(|| segment_after(url, &["meet"])),
    )
}

/// Google Meet: the meeting code is the last path segment.
pub fn google_meet(url: &Url) -> PlatformFields {
    let meeting_id = last_segment(url);
    match meeting_id {
        Some(id) => {
            let join_url = format!("https://meet.google.com/{id}");
            PlatformFields::with_id(Some(id)).with_join_url(join_url)
        }
        None => PlatformFields::default(),
    }
}

/// Google Meet for Education: `/lookup/<nickname>`.
pub fn google_meet_lookup(url: &Url) -> PlatformFields {
    PlatformFields::with_id(segment_after(url, &["lookup"]))
}

/// Google Meet PWA: `?meeting_code=`.
pub fn google_meet_native(url: &Url) -> PlatformFields {
    PlatformFields::with_id(query_param(url, &["meeting_code"]))
}

/// Platforms that pass the call in `?call_id=` (Duo, FaceTime).
pub fn call_id(url: &Url) -> PlatformFields {
    PlatformFields::with_id(query_param(url, &["call_id"]))
}

/// Webex: a 9-11 digit meeting number in the path, else `?MTID=`.
/// Personal rooms (`/meet/<user>`) also give the owner.
pub fn webex(url: &Url) -> PlatformFields {
    let meeting_id =
        segment_matching(url, &WEBEX_ID_REGEX).or_else(|| query_param(url, &["MTID"]));
    PlatformFields::with_id(meeting_id).with_host(segment_after(url, &["meet"]))
}

/// Booking pages shaped `/<owner>/<event>` (MeetFox).
pub fn owner_and_event(url: &Url) -> PlatformFields {
    PlatformFields::with_id(segment(url, 1)).with_host(segment(url, 0))
}

/// Cal.com: `/<owner>/<event>`. A bare `/<owner>` profile page names no
/// meeting, so nothing is taken from it.
pub fn cal_com(url: &Url) -> PlatformFields {
    if segments(url).len() < 2 {
        return PlatformFields::default();
    }
    owner_and_event(url)
}

/// Rooms named after their owner (Whereby, UberConference).
pub fn owner_room(url: &Url) -> PlatformFields {
    PlatformFields::default().with_host(segment(url, 0))
}

/// Platforms whose last path segment is the room or meeting id.
pub fn last_segment_id(url: &Url) -> PlatformFields {
    PlatformFields::with_id(last_segment(url))
}

/// GoTo Meeting: a 9-digit meeting id anywhere in the path.
pub fn goto(url: &Url) -> PlatformFields {
    PlatformFields::with_id(segment_matching(url, &GOTO_ID_REGEX))
}

/// Jitsi: the room is the last path segment.
pub fn jitsi(url: &Url) -> PlatformFields {
    match last_segment(url) {
        Some(room) => {
            let join_url = format!("https://meet.jit.si/{room}");
            PlatformFields::with_id(Some(room)).with_join_url(join_url)
        }
        None => PlatformFields::default(),
    }
}

/// Amazon Chime: `?meeting_ID=`, else the last path segment.
pub fn chime(url: &Url) -> PlatformFields {
    PlatformFields::with_id(query_param(url, &["meeting_ID"]).or_else(|| last_segment(url)))
}

/// Lifesize: a trailing word segment (`/extension/1234567`).
pub fn lifesize(url: &Url) -> PlatformFields {
    PlatformFields::with_id(last_segment(url).filter(|s| WORD_REGEX.is_match(s)))
}

/// Platforms that pass the meeting in `?meeting_id=`.
pub fn meeting_id_param(url: &Url) -> PlatformFields {
    PlatformFields::with_id(query_param(url, &["meeting_id"]))
}

/// Skype for Business: `?conference_id=`.
pub fn conference_id(url: &Url) -> PlatformFields {
    PlatformFields::with_id(query_param(url, &["conference_id"]))
}

/// Slack huddles are keyed by the thread timestamp.
pub fn slack_huddle(url: &Url) -> PlatformFields {
    PlatformFields::with_id(query_param(url, &["thread_ts"]))
}
