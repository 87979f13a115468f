use std::time::Duration;

use linkcheckr_core::error::AppError;
use linkcheckr_core::models::RenderedPage;
use linkcheckr_core::traits::Renderer;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use url::Url;

use crate::guard::check_hop;
use crate::prober::BROWSER_USER_AGENT;
use crate::redirect::{HopError, MAX_REDIRECTS, send_following};

/// Budget for the whole page download.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Static renderer: one GET, no scripts.
///
/// Links injected client-side are missed, but no Chromium is needed. Error
/// pages are returned like any other page, the way a browser would show
/// them; only a failed request is an error. The SSRF guard is on by default
/// and applies to every redirect hop.
#[derive(Clone)]
pub struct HttpRenderer {
    client: Client,
    timeout: Duration,
    guard: bool,
}

impl HttpRenderer {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(DEFAULT_RENDER_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::ConfigError(format!("Cannot build page client: {e}")))?;

        Ok(Self {
            client,
            timeout,
            guard: true,
        })
    }

    /// Lets the renderer load pages on private and loopback addresses.
    pub fn allow_private_urls(mut self) -> Self {
        self.guard = false;
        self
    }

    fn page_error(&self, url: &str, error: HopError) -> AppError {
        match error {
            HopError::Invalid(msg) => AppError::InvalidInput(msg),
            HopError::Blocked(e) => e,
            HopError::TooManyRedirects(_) => AppError::HttpError(format!("{url}: {error}")),
            HopError::Transport(e) if e.is_timeout() => AppError::Timeout(self.timeout.as_secs()),
            HopError::Transport(e) if e.is_connect() => {
                AppError::NetworkError(format!("Could not reach {url}: {e}"))
            }
            HopError::Transport(e) => AppError::HttpError(format!("{url}: {e}")),
        }
    }
}

impl Renderer for HttpRenderer {
    async fn render(&self, url: &str, wait_time: Duration) -> Result<RenderedPage, AppError> {
        if !wait_time.is_zero() {
            tracing::debug!(
                wait_ms = wait_time.as_millis() as u64,
                "Static renderer ignores wait time"
            );
        }

        let guard = self.guard;
        let response = send_following(&self.client, Method::GET, url, MAX_REDIRECTS, move |hop: Url| {
            check_hop(guard, hop)
        })
        .await
        .map_err(|e| self.page_error(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            tracing::debug!(
                status = status.as_u16(),
                url = %final_url,
                "Page answered with an error status, reading it anyway"
            );
        }

        let markup = response
            .text()
            .await
            .map_err(|e| AppError::RenderError(format!("Page body of {final_url} was cut off: {e}")))?;

        Ok(RenderedPage::new(final_url, markup))
    }
}
