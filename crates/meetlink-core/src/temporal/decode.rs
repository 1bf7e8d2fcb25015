//! Opportunistic decoding of URL tokens.
//!
//! Tokens pulled out of a link may be percent-encoded (path segments) or
//! base64-wrapped (some schedulers pack the start time that way). Decoding
//! never fails: anything that does not decode cleanly is left as it was.

use std::borrow::Cow;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use regex::Regex;

/// A single `%XX` escape.
static PERCENT_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%[0-9A-Fa-f]{2}").expect("Invalid percent escape regex")
});

/// Tokens that could plausibly be base64 (standard or URL-safe alphabet).
static BASE64_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+/=_-]{8,}$").expect("Invalid base64 token regex")
});

/// A token in every form worth running through the pattern cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DecodedToken<'a> {
    /// The token, percent-decoded when it contained escapes.
    pub plain: Cow<'a, str>,
    /// The base64-decoded text, when the token decodes to printable UTF-8.
    pub base64: Option<String>,
}

impl DecodedToken<'_> {
    /// Iterates over the candidate texts, plain form first.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.plain.as_ref()).chain(self.base64.as_deref())
    }
}

/// Runs the decoding pre-pass over a raw token.
pub(crate) fn decode(token: &str) -> DecodedToken<'_> {
    let plain = percent_decode(token);
    let base64 = base64_decode(&plain);
    DecodedToken { plain, base64 }
}

/// Percent-decodes `token` if it contains an escape sequence.
///
/// Escapes that decode to invalid UTF-8 leave the token untouched.
pub(crate) fn percent_decode(token: &str) -> Cow<'_, str> {
    if !PERCENT_ESCAPE.is_match(token) {
        return Cow::Borrowed(token);
    }
    match urlencoding::decode(token) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(err) => {
            tracing::trace!(token, error = %err, "percent decoding failed");
            Cow::Borrowed(token)
        }
    }
}

/// Decodes `token` as base64, trying padded and unpadded variants of both
/// alphabets.
///
/// Returns `None` unless the result is non-empty UTF-8 without control
/// characters; random identifiers that happen to fit the alphabet almost
/// always decode to binary noise and are rejected here.
pub(crate) fn base64_decode(token: &str) -> Option<String> {
    if !BASE64_TOKEN.is_match(token) {
        return None;
    }

    let bytes = [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(token).ok())?;

    let text = String::from_utf8(bytes).ok()?;
    let text = text.trim();
    if text.is_empty() || text.chars().any(char::is_control) {
        return None;
    }
    Some(text.to_string())
}
