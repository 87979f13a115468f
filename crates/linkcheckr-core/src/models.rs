use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::AppError;
use crate::probe::ProbeOutcome;
use crate::urls::is_valid_url;

/// Post-navigation wait used when the caller does not ask for one.
pub const DEFAULT_WAIT_TIME: Duration = Duration::from_secs(5);

/// Upper bound on the caller-supplied wait time.
pub const MAX_WAIT_TIME: Duration = Duration::from_secs(60);

/// Validated input to one pipeline run.
///
/// Can only be built through [`CheckRequest::from_parts`] (or
/// [`CheckRequest::new`]), so `target_url` always passes [`is_valid_url`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRequest {
    target_url: String,
    wait_time: Duration,
}

impl CheckRequest {
    /// Build a request for `url` with the default wait time.
    pub fn new(url: &str) -> Result<Self, AppError> {
        Self::from_parts(Some(url), None)
    }

    /// Validate raw caller input.
    ///
    /// `wait_time_secs` may be fractional; `None` means [`DEFAULT_WAIT_TIME`].
    pub fn from_parts(url: Option<&str>, wait_time_secs: Option<f64>) -> Result<Self, AppError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::InvalidInput("URL is required".into()))?;

        if !is_valid_url(url) {
            return Err(AppError::InvalidInput("Invalid URL provided".into()));
        }

        let wait_time = match wait_time_secs {
            None => DEFAULT_WAIT_TIME,
            Some(secs) => Duration::try_from_secs_f64(secs)
                .ok()
                .filter(|d| *d <= MAX_WAIT_TIME)
                .ok_or_else(|| AppError::InvalidInput("Invalid wait_time provided".into()))?,
        };

        Ok(Self {
            target_url: url.to_string(),
            wait_time,
        })
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }
}

/// Markup of a rendered page together with the URL it was finally served
/// from. After redirects that URL is the base for relative links, not the
/// one that was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub final_url: String,
    pub markup: String,
}

impl RenderedPage {
    pub fn new(final_url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            final_url: final_url.into(),
            markup: markup.into(),
        }
    }
}

/// Ordered, duplicate-free collection of normalized links.
///
/// The first occurrence of a link fixes its position; later duplicates are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `link` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, link: String) -> bool {
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.links.push(link);
        true
    }

    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.links.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }

    pub fn into_vec(self) -> Vec<String> {
        self.links
    }
}

impl FromIterator<String> for LinkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = LinkSet::new();
        for link in iter {
            set.insert(link);
        }
        set
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

/// Externally visible status of a probed link: the final HTTP status code,
/// or `"Unknown"` when no response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Code(u16),
    Unknown,
}

impl ProbeStatus {
    /// A link is broken when it has no status or a status of 400 or above.
    pub fn is_broken(&self) -> bool {
        match self {
            ProbeStatus::Code(code) => *code >= 400,
            ProbeStatus::Unknown => true,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Code(code) => write!(f, "{code}"),
            ProbeStatus::Unknown => f.write_str("Unknown"),
        }
    }
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProbeStatus::Code(code) => serializer.serialize_u16(*code),
            ProbeStatus::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

/// Result of probing a single link.
///
/// Serializes as `{"url": ..., "status": ...}`. The full [`ProbeOutcome`]
/// (including failure reasons) stays available to Rust callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    url: String,
    status: ProbeStatus,
    #[serde(skip)]
    outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn new(url: impl Into<String>, outcome: ProbeOutcome) -> Self {
        Self {
            url: url.into(),
            status: outcome.status(),
            outcome,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn outcome(&self) -> &ProbeOutcome {
        &self.outcome
    }

    pub fn is_broken(&self) -> bool {
        self.status.is_broken()
    }
}
