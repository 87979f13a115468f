use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::{CheckRequest, LinkSet, ProbeResult};
use crate::probe::ProbeOutcome;
use crate::report::Report;
use crate::traits::{LinkExtractor, Prober, Renderer};

/// Default number of probes in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Tuning knobs for the probe stage.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Maximum number of concurrent probes (at least 1).
    pub concurrency: usize,
    /// Budget for the whole check, rendering included. Probes still running
    /// when it expires are cancelled and reported as `Unknown`.
    pub deadline: Option<Duration>,
}

impl CheckConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
        }
    }
}

/// Orchestrates one link check: render → extract → probe → aggregate.
///
/// Generic over the engine, the extractor and the prober so each stage can be
/// swapped (headless vs. static rendering) or mocked in tests.
#[derive(Clone)]
pub struct CheckService<R, X, P>
where
    R: Renderer,
    X: LinkExtractor,
    P: Prober,
{
    renderer: R,
    extractor: X,
    prober: P,
    config: CheckConfig,
}

impl<R, X, P> CheckService<R, X, P>
where
    R: Renderer,
    X: LinkExtractor,
    P: Prober,
{
    pub fn new(renderer: R, extractor: X, prober: P) -> Self {
        Self::with_config(renderer, extractor, prober, CheckConfig::default())
    }

    pub fn with_config(renderer: R, extractor: X, prober: P, config: CheckConfig) -> Self {
        Self {
            renderer,
            extractor,
            prober,
            config,
        }
    }

    /// Runs the full pipeline for a validated request.
    ///
    /// Only rendering can fail. Individual links that cannot be reached are
    /// reported as broken with an `Unknown` status. When a deadline is set it
    /// covers the whole run: rendering past it is a [`AppError::Timeout`],
    /// probes still in flight become `Unknown`.
    pub async fn check(&self, request: &CheckRequest) -> Result<Report, AppError> {
        let cancel = CancellationToken::new();

        let timer = self.config.deadline.map(|deadline| {
            let token = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                tracing::warn!(
                    deadline_ms = deadline.as_millis() as u64,
                    "Check deadline reached, cancelling outstanding work"
                );
                token.cancel();
            })
        });

        let result = self.run(request, &cancel).await;

        if let Some(timer) = timer {
            timer.abort();
        }
        result
    }

    async fn run(
        &self,
        request: &CheckRequest,
        cancel: &CancellationToken,
    ) -> Result<Report, AppError> {
        let url = request.target_url();

        tracing::info!(
            url,
            wait_ms = request.wait_time().as_millis() as u64,
            "Rendering page"
        );
        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let secs = self.config.deadline.unwrap_or_default().as_secs();
                return Err(AppError::Timeout(secs));
            }
            page = self.renderer.render(url, request.wait_time()) => page?,
        };
        tracing::info!(
            final_url = %page.final_url,
            "Rendered {} bytes of markup",
            page.markup.len()
        );

        let links = self.extractor.extract(&page.markup, &page.final_url);
        tracing::info!(links = links.len(), "Extracted links");

        let results = self.probe_all(&links, cancel).await;
        let report = Report::from_link_set(url, &links, results);

        tracing::info!(
            total = report.summary.total,
            working = report.summary.working,
            broken = report.summary.broken,
            "Link check complete"
        );
        Ok(report)
    }

    /// Probes every link with bounded concurrency. Results come back in
    /// completion order; one result per link.
    async fn probe_all(&self, links: &LinkSet, cancel: &CancellationToken) -> Vec<ProbeResult> {
        stream::iter(links.clone().into_vec())
            .map(|link| {
                let prober = self.prober.clone();
                let cancel = cancel.clone();
                async move {
                    let result = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => ProbeResult::new(
                            link.as_str(),
                            ProbeOutcome::Failed("deadline exceeded".into()),
                        ),
                        result = prober.probe(&link) => result,
                    };

                    if result.is_broken() {
                        tracing::warn!(url = %link, outcome = %result.outcome(), "Broken link");
                    } else {
                        tracing::debug!(url = %link, outcome = %result.outcome(), "Link ok");
                    }
                    result
                }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect::<Vec<_>>()
            .await
    }
}
