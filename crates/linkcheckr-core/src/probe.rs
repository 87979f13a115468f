//! Probe outcomes and the request strategy used to obtain them.
//!
//! The strategy is plain data: a primary method plus an ordered list of
//! fallback rules. Transport (reqwest, mocks) is injected into
//! [`ProbeStrategy::run`] as a closure, so the fallback logic is testable
//! without a network.

use std::fmt;
use std::future::Future;

use crate::models::ProbeStatus;

/// HTTP method used for one probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    Get,
}

impl ProbeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Head => "HEAD",
            ProbeMethod::Get => "GET",
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What actually happened when a link was probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A response was received; the final status after redirects.
    Status(u16),
    /// No response within the probe timeout.
    Timeout,
    /// Connection, DNS, TLS, redirect-loop or policy failure.
    Failed(String),
}

impl ProbeOutcome {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Status(code) => Some(*code),
            _ => None,
        }
    }

    /// Collapses the outcome to the externally reported status.
    pub fn status(&self) -> ProbeStatus {
        match self {
            ProbeOutcome::Status(code) => ProbeStatus::Code(*code),
            ProbeOutcome::Timeout | ProbeOutcome::Failed(_) => ProbeStatus::Unknown,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Status(code) => write!(f, "HTTP {code}"),
            ProbeOutcome::Timeout => f.write_str("timed out"),
            ProbeOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Retry with `method` when the previous attempt answered `on_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallback {
    pub on_status: u16,
    pub method: ProbeMethod,
}

/// Ordered probe plan. Each fallback rule is consulted once, in order,
/// against the latest outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStrategy {
    primary: ProbeMethod,
    fallbacks: Vec<Fallback>,
}

impl ProbeStrategy {
    pub fn new(primary: ProbeMethod) -> Self {
        Self {
            primary,
            fallbacks: Vec::new(),
        }
    }

    /// `HEAD`, then a single `GET` if the server answers 405 Method Not Allowed.
    pub fn head_then_get() -> Self {
        Self::new(ProbeMethod::Head).with_fallback(405, ProbeMethod::Get)
    }

    pub fn with_fallback(mut self, on_status: u16, method: ProbeMethod) -> Self {
        self.fallbacks.push(Fallback { on_status, method });
        self
    }

    pub fn primary(&self) -> ProbeMethod {
        self.primary
    }

    pub fn fallbacks(&self) -> &[Fallback] {
        &self.fallbacks
    }

    /// Runs the plan, calling `send` once for the primary method and at most
    /// once more per matching fallback rule.
    pub async fn run<F, Fut>(&self, mut send: F) -> ProbeOutcome
    where
        F: FnMut(ProbeMethod) -> Fut,
        Fut: Future<Output = ProbeOutcome>,
    {
        let mut outcome = send(self.primary).await;
        for fallback in &self.fallbacks {
            if outcome.status_code() == Some(fallback.on_status) {
                tracing::debug!(
                    status = fallback.on_status,
                    method = %fallback.method,
                    "Retrying probe with fallback method"
                );
                outcome = send(fallback.method).await;
            }
        }
        outcome
    }
}

impl Default for ProbeStrategy {
    fn default() -> Self {
        Self::head_then_get()
    }
}
