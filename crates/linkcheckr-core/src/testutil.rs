//! Test utilities: mock implementations of the pipeline traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{LinkSet, ProbeResult, RenderedPage};
use crate::probe::ProbeOutcome;
use crate::traits::{LinkExtractor, Prober, Renderer};

// ---------------------------------------------------------------------------
// MockRenderer
// ---------------------------------------------------------------------------

/// Mock renderer that returns a configurable response and records calls.
#[derive(Clone)]
pub struct MockRenderer {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    calls: Arc<Mutex<Vec<(String, Duration)>>>,
    /// Reported as the page's final URL instead of the requested one.
    final_url: Option<String>,
    delay: Duration,
}

impl MockRenderer {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
            final_url: None,
            delay: Duration::ZERO,
        }
    }

    /// Pretend the page redirected to `final_url`.
    pub fn redirected_to(mut self, final_url: &str) -> Self {
        self.final_url = Some(final_url.to_string());
        self
    }

    /// Take `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `(url, wait_time)` for every render call, in call order.
    pub fn calls(&self) -> Vec<(String, Duration)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Renderer for MockRenderer {
    async fn render(&self, url: &str, wait_time: Duration) -> Result<RenderedPage, AppError> {
        self.calls.lock().unwrap().push((url.to_string(), wait_time));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok("<html><body>default</body></html>".to_string())
            } else {
                responses.remove(0)
            }
        };
        let final_url = self.final_url.as_deref().unwrap_or(url);
        response.map(|markup| RenderedPage::new(final_url, markup))
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// Mock extractor that ignores the markup and returns a fixed link set.
#[derive(Clone)]
pub struct MockExtractor {
    links: LinkSet,
    bases: Arc<Mutex<Vec<String>>>,
}

impl MockExtractor {
    pub fn new(links: LinkSet) -> Self {
        Self {
            links,
            bases: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Base URLs passed to `extract`, in call order.
    pub fn bases(&self) -> Vec<String> {
        self.bases.lock().unwrap().clone()
    }
}

impl LinkExtractor for MockExtractor {
    fn extract(&self, _markup: &str, base_url: &str) -> LinkSet {
        self.bases.lock().unwrap().push(base_url.to_string());
        self.links.clone()
    }
}

// ---------------------------------------------------------------------------
// MockProber
// ---------------------------------------------------------------------------

/// Mock prober answering from a per-URL table.
///
/// Unknown URLs answer `200`. An optional delay simulates slow targets.
#[derive(Clone, Default)]
pub struct MockProber {
    responses: Arc<Mutex<HashMap<String, (ProbeOutcome, Duration)>>>,
    probed: Arc<Mutex<Vec<String>>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, outcome: ProbeOutcome) -> Self {
        self.respond_after(url, outcome, Duration::ZERO)
    }

    pub fn respond_after(self, url: &str, outcome: ProbeOutcome, delay: Duration) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (outcome, delay));
        self
    }

    /// URLs in the order their probes started.
    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

impl Prober for MockProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        self.probed.lock().unwrap().push(url.to_string());
        let (outcome, delay) = self
            .responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or((ProbeOutcome::Status(200), Duration::ZERO));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        ProbeResult::new(url, outcome)
    }
}
