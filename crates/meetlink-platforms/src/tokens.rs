//! Splitting a URL into candidate tokens for temporal and duration backfill.

use url::Url;
use url::form_urlencoded;

/// The pieces of a URL that may carry a time or a duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UrlTokens {
    query: Vec<(String, String)>,
    fragment: Vec<(String, String)>,
    segments: Vec<String>,
    /// Username, password and port, in that order, when present.
    authority: Vec<String>,
}

impl UrlTokens {
    pub(crate) fn from_url(url: &Url) -> Self {
        let query = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        let fragment = url
            .fragment()
            .map(|fragment| {
                form_urlencoded::parse(fragment.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        let segments = url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut authority = Vec::new();
        if !url.username().is_empty() {
            authority.push(url.username().to_string());
        }
        if let Some(password) = url.password() {
            authority.push(password.to_string());
        }
        if let Some(port) = url.port() {
            authority.push(port.to_string());
        }

        Self {
            query,
            fragment,
            segments,
            authority,
        }
    }

    /// Non-empty values of parameter `name`, query first, then fragment.
    pub(crate) fn param<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .chain(&self.fragment)
            .filter(move |(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Every individual token: query values, fragment values, path
    /// segments, then the authority parts.
    ///
    /// A parameter with an empty value contributes its key instead, which
    /// covers `?2025-01-09` and `#tomorrow`. Tokens equal to one of
    /// `exclude` are skipped.
    pub(crate) fn pool(&self, exclude: &[&str]) -> Vec<&str> {
        let params = self
            .query
            .iter()
            .chain(&self.fragment)
            .map(|(key, value)| if value.is_empty() { key } else { value });

        params
            .chain(&self.segments)
            .chain(&self.authority)
            .map(String::as_str)
            .filter(|token| !token.is_empty() && !exclude.contains(token))
            .collect()
    }
}

/// Each adjacent pair of `tokens` joined with a space.
pub(crate) fn adjacent_pairs<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0].as_ref(), pair[1].as_ref()))
        .collect()
}
