use std::time::Duration;

use linkcheckr_core::error::AppError;
use linkcheckr_core::models::ProbeResult;
use linkcheckr_core::probe::{ProbeMethod, ProbeOutcome, ProbeStrategy};
use linkcheckr_core::traits::Prober;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use url::Url;

use crate::guard::check_hop;
use crate::redirect::{HopError, MAX_REDIRECTS, send_following};

/// Some servers answer unidentified clients with 403, so probes present
/// themselves as a regular desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Link prober backed by reqwest.
///
/// Runs a [`ProbeStrategy`] (by default `HEAD`, then `GET` on 405) with a
/// per-request timeout. Redirects are followed hop by hop, each hop passing
/// the SSRF guard when it is on, and the final status is recorded. Never
/// fails: transport errors become [`ProbeOutcome::Timeout`] or
/// [`ProbeOutcome::Failed`].
#[derive(Clone)]
pub struct HttpProber {
    client: Client,
    strategy: ProbeStrategy,
    ssrf_protection: bool,
}

impl HttpProber {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            strategy: ProbeStrategy::default(),
            ssrf_protection: true,
        })
    }

    pub fn with_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Disable the SSRF guard, allowing probes of private/reserved IPs.
    pub fn allow_private_urls(mut self) -> Self {
        self.ssrf_protection = false;
        self
    }

    async fn send(&self, method: ProbeMethod, url: &str) -> ProbeOutcome {
        let method = match method {
            ProbeMethod::Head => Method::HEAD,
            ProbeMethod::Get => Method::GET,
        };
        let guard = self.ssrf_protection;

        let sent = send_following(&self.client, method, url, MAX_REDIRECTS, move |hop: Url| {
            check_hop(guard, hop)
        })
        .await;

        // Only the status line matters; the body is dropped unread.
        match sent {
            Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
            Err(HopError::Transport(e)) => classify_error(&e),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}

impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        let outcome = self
            .strategy
            .run(move |method| self.send(method, url))
            .await;
        ProbeResult::new(url, outcome)
    }
}

fn classify_error(error: &reqwest::Error) -> ProbeOutcome {
    if error.is_timeout() {
        ProbeOutcome::Timeout
    } else if error.is_connect() {
        ProbeOutcome::Failed(format!("connection failed: {error}"))
    } else {
        ProbeOutcome::Failed(error.to_string())
    }
}
