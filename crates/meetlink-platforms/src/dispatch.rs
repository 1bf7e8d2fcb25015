//! Meeting link dispatch.
//!
//! [`MeetingParser::parse_meeting_link`] is total: whatever the input, it
//! returns a [`MeetingInfo`]. Failures are reported through
//! `MeetingInfo::error`.
//!
//! A parse goes through these steps:
//!
//! 1. Parse the trimmed link (recovering `host/path` links without a
//!    scheme) and unwrap Outlook SafeLinks.
//! 2. Pick the most specific registered platform for the host and run its
//!    extractor. Unknown hosts take the generic path.
//! 3. Look for a start time: curated parameter names first, then every
//!    token of the URL, then adjacent token pairs.
//! 4. Look for a duration: curated parameter names, then unit-bearing
//!    path segments.
//! 5. Fall back to the reference instant, flagged as inferred, when no
//!    time was found.

use chrono::{DateTime, FixedOffset};
use meetlink_core::temporal::{parse_duration, parse_duration_strict};
use meetlink_core::{Confidence, MeetingInfo, TemporalExtractor, TemporalResult};
use tracing::{debug, trace};
use url::Url;

use crate::config::ParserConfig;
use crate::error::{ConfigError, LinkError};
use crate::registry::{PlatformFields, PlatformRegistry};
use crate::tokens::{UrlTokens, adjacent_pairs};

/// Outlook wraps links as `https://<region>.safelinks.protection.outlook.com/?url=<encoded>`.
const SAFELINKS_DOMAIN: &str = "safelinks.protection.outlook.com";

/// Parses meeting links against a fixed reference instant.
#[derive(Debug, Clone)]
pub struct MeetingParser {
    extractor: TemporalExtractor,
    config: ParserConfig,
    registry: &'static PlatformRegistry,
}

impl MeetingParser {
    /// Creates a parser with the default configuration and the builtin
    /// platform registry.
    pub fn new(reference: DateTime<FixedOffset>) -> Self {
        Self {
            extractor: TemporalExtractor::new(reference),
            config: ParserConfig::default(),
            registry: PlatformRegistry::builtin(),
        }
    }

    /// Builder: apply a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn with_config(mut self, config: ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let render = config.render_format()?;
        self.extractor = self.extractor.with_render_format(render);
        self.config = config;
        Ok(self)
    }

    /// Builder: use a custom platform registry.
    pub fn with_registry(mut self, registry: &'static PlatformRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn extractor(&self) -> &TemporalExtractor {
        &self.extractor
    }

    /// Extracts everything recoverable from `link`.
    pub fn parse_meeting_link(&self, link: &str) -> MeetingInfo {
        match self.try_parse(link) {
            Ok(info) => info,
            Err(err) => {
                debug!(link, error = %err, "meeting link rejected");
                MeetingInfo::from_error(err.to_string())
            }
        }
    }

    fn try_parse(&self, link: &str) -> Result<MeetingInfo, LinkError> {
        let link = link.trim();
        let url = unwrap_safelink(parse_link(link)?);
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| LinkError::MissingHost(link.to_string()))?
            .to_ascii_lowercase();

        let mut info = MeetingInfo::default();
        let descriptor = self.registry.resolve(&host, url.path());
        let fields = match descriptor {
            Some(descriptor) => {
                debug!(%host, platform = descriptor.name(), "platform matched");
                info.platform = descriptor.name().to_string();
                descriptor.extract(&url)
            }
            None => {
                debug!(%host, "no platform matched, using generic path");
                PlatformFields::default()
            }
        };

        info.join_url = fields.join_url.unwrap_or_else(|| link.to_string());
        info.meeting_id = fields.meeting_id;
        info.password = fields.password;
        info.host = fields.host;

        let tokens = UrlTokens::from_url(&url);
        let accept_medium = descriptor.is_some() || self.config.accept_medium_on_generic;
        self.backfill_time(&mut info, &tokens, accept_medium);
        self.backfill_duration(&mut info, &tokens);

        Ok(info)
    }

    fn backfill_time(&self, info: &mut MeetingInfo, tokens: &UrlTokens, accept_medium: bool) {
        if !info.time.is_empty() && !info.date.is_empty() {
            return;
        }

        let exclude: Vec<&str> = [info.meeting_id.as_str(), info.password.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();

        match self.find_time(tokens, &exclude, accept_medium) {
            Some(result) => {
                debug!(
                    date = %result.date,
                    time = %result.time,
                    confidence = ?result.confidence,
                    "start time found"
                );
                info.date = result.date;
                info.time = result.time;
                info.inferred_time = false;
            }
            None => {
                let (date, time) = self.extractor.render_reference();
                debug!(%date, %time, "no start time found, using reference instant");
                info.date = date;
                info.time = time;
                info.inferred_time = true;
            }
        }
    }

    fn find_time(
        &self,
        tokens: &UrlTokens,
        exclude: &[&str],
        accept_medium: bool,
    ) -> Option<TemporalResult> {
        // The parameter name vouches for the value, so a lone date or time
        // under `start=` is good enough.
        let curated: Vec<&str> = self
            .config
            .time_params
            .iter()
            .flat_map(|name| tokens.param(name))
            .collect();

        let singles = self.sweep(&curated);
        if singles.high.is_some() {
            return singles.high;
        }
        let pairs = self.sweep(&adjacent_pairs(&curated));
        if pairs.high.is_some() {
            return pairs.high;
        }
        if accept_medium && singles.medium.is_some() {
            return singles.medium;
        }

        let pool = tokens.pool(exclude);
        trace!(?pool, "sweeping url tokens");
        let mut candidates: Vec<String> = pool.iter().map(|s| s.to_string()).collect();
        candidates.extend(adjacent_pairs(&pool));

        let swept = self.sweep(&candidates);
        swept.high.or(swept.medium.filter(|_| accept_medium))
    }

    /// Parses `candidates` in order, stopping at the first `High` result and
    /// remembering the first `Medium` one.
    fn sweep<S: AsRef<str>>(&self, candidates: &[S]) -> Sweep {
        let mut sweep = Sweep::default();
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let Some(result) = self.extractor.parse_temporal(candidate) else {
                continue;
            };
            match result.confidence {
                Confidence::High => {
                    sweep.high = Some(result);
                    break;
                }
                Confidence::Medium => {
                    if sweep.medium.is_none() {
                        trace!(candidate, "keeping medium-confidence fallback");
                        sweep.medium = Some(result);
                    }
                }
            }
        }
        sweep
    }

    fn backfill_duration(&self, info: &mut MeetingInfo, tokens: &UrlTokens) {
        if !info.duration.is_empty() {
            return;
        }

        let duration = self
            .config
            .duration_params
            .iter()
            .flat_map(|name| tokens.param(name))
            .find_map(parse_duration)
            .or_else(|| {
                tokens
                    .segments()
                    .iter()
                    .find_map(|segment| parse_duration_strict(segment))
            });

        if let Some(duration) = duration {
            debug!(minutes = duration.minutes(), "duration found");
            info.duration = duration.text();
        }
    }
}

#[derive(Default)]
struct Sweep {
    high: Option<TemporalResult>,
    medium: Option<TemporalResult>,
}

/// Parses a trimmed link, retrying links like `zoom.us/j/123` with
/// `https://`.
fn parse_link(link: &str) -> Result<Url, LinkError> {
    if link.is_empty() {
        return Err(LinkError::Empty);
    }

    match Url::parse(link) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) if looks_like_host_path(link) => {
            trace!(link, "retrying link without scheme");
            Ok(Url::parse(&format!("https://{link}"))?)
        }
        Err(err) => Err(err.into()),
    }
}

fn looks_like_host_path(link: &str) -> bool {
    !link.chars().any(char::is_whitespace)
        && link
            .split('/')
            .next()
            .is_some_and(|host| host.contains('.') && !host.starts_with('.'))
}

/// Unwraps Microsoft Outlook SafeLinks.
///
/// SafeLinks redirect through `safelinks.protection.outlook.com` with the
/// original URL in the `url` query parameter. Anything else, including a
/// SafeLink whose target does not parse, is returned unchanged.
fn unwrap_safelink(url: Url) -> Url {
    let is_safelink = url
        .host_str()
        .is_some_and(|host| host.to_ascii_lowercase().ends_with(SAFELINKS_DOMAIN));
    if !is_safelink {
        return url;
    }

    let target = url
        .query_pairs()
        .find(|(key, _)| key == "url")
        .and_then(|(_, value)| Url::parse(&value).ok());
    match target {
        Some(target) => {
            debug!(%target, "unwrapped safelink");
            target
        }
        None => url,
    }
}

/// Convenience function to parse a single link.
///
/// See [`MeetingParser::parse_meeting_link`] for details.
pub fn parse_meeting_link(link: &str, reference: DateTime<FixedOffset>) -> MeetingInfo {
    MeetingParser::new(reference).parse_meeting_link(link)
}
