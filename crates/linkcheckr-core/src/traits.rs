use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::models::{LinkSet, ProbeResult, RenderedPage};

/// Produces the markup of a page after client-side scripts have run.
pub trait Renderer: Send + Sync + Clone {
    /// Navigates to `url`, waits `wait_time`, and returns the page markup
    /// along with the URL the page ended up at.
    fn render(
        &self,
        url: &str,
        wait_time: Duration,
    ) -> impl Future<Output = Result<RenderedPage, AppError>> + Send;
}

/// Pulls the normalized, deduplicated anchor targets out of page markup.
pub trait LinkExtractor: Send + Sync + Clone {
    fn extract(&self, markup: &str, base_url: &str) -> LinkSet;
}

/// Checks whether a single link is alive.
///
/// Infallible by signature: network failures are encoded in the returned
/// [`ProbeResult`], never raised.
pub trait Prober: Send + Sync + Clone {
    fn probe(&self, url: &str) -> impl Future<Output = ProbeResult> + Send;
}
