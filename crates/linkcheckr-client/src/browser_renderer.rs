use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use linkcheckr_core::error::AppError;
use linkcheckr_core::models::RenderedPage;
use linkcheckr_core::traits::Renderer;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use crate::guard::ensure_public_url;

/// Default cap on concurrently open tabs.
pub const DEFAULT_MAX_TABS: usize = 4;

/// Headless-browser renderer using Chromium via the Chrome DevTools Protocol.
///
/// Unlike [`crate::HttpRenderer`], this executes the page's JavaScript
/// before returning the markup, so links injected by SPAs (React, Vue, ...)
/// are seen.
///
/// A single Chromium process is shared across all clones of this struct and
/// owns a private, throwaway profile directory. Tabs are a bounded pool:
/// each [`Renderer::render`] call checks out a slot, opens a tab, and closes
/// it again on every exit path.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use linkcheckr_client::BrowserRenderer;
/// use linkcheckr_core::traits::Renderer;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let renderer = BrowserRenderer::launch().await?;
/// let page = renderer.render("https://example.com", Duration::from_secs(2)).await?;
/// println!("{} -> {} bytes", page.final_url, page.markup.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BrowserRenderer {
    browser: Arc<Browser>,
    tabs: TabPool,
    navigation_timeout: Duration,
    ssrf_protection: bool,
    _profile: Arc<TempDir>,
}

impl BrowserRenderer {
    /// Launches headless Chromium with a **30 s** navigation timeout and
    /// [`DEFAULT_MAX_TABS`] tabs.
    ///
    /// Requires a Chromium / Chrome binary reachable via `$PATH` (or the
    /// default locations checked by `chromiumoxide`), or `CHROME_BIN`.
    pub async fn launch() -> Result<Self, AppError> {
        Self::launch_with(Duration::from_secs(30), DEFAULT_MAX_TABS).await
    }

    /// Launches headless Chromium with a custom navigation timeout and tab cap.
    pub async fn launch_with(navigation_timeout: Duration, max_tabs: usize) -> Result<Self, AppError> {
        let profile = tempfile::Builder::new()
            .prefix("linkcheckr-chromium-")
            .tempdir()
            .map_err(|e| AppError::RenderError(format!("Failed to create browser profile dir: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .disable_default_args()
            .user_data_dir(profile.path());

        // Snap-packaged Chromium exposes a wrapper that rejects standard
        // Chrome CLI flags (--headless, --disable-gpu, ...), so look for the
        // real binary first.
        if let Some(bin) = Self::find_chrome_binary() {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        let config = builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-translate")
            .arg("--no-first-run")
            .build()
            .map_err(|e| AppError::RenderError(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::RenderError(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        tracing::info!(
            profile = %profile.path().display(),
            max_tabs,
            "Headless browser launched"
        );

        Ok(Self {
            browser: Arc::new(browser),
            tabs: TabPool::new(max_tabs),
            navigation_timeout,
            ssrf_protection: true,
            _profile: Arc::new(profile),
        })
    }

    /// Disable the SSRF guard for the page being rendered.
    pub fn allow_private_urls(mut self) -> Self {
        self.ssrf_protection = false;
        self
    }

    /// Tries to locate the real Chrome/Chromium binary.
    ///
    /// Honours `CHROME_BIN`, then well-known install paths. Returns `None`
    /// to let `chromiumoxide` do its own lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        [
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    }

    async fn open_tab(&self) -> Result<Tab, AppError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::RenderError(format!("Failed to open tab: {e}")))?;

        Ok(Tab { page: Some(page) })
    }

    async fn load(
        &self,
        page: &Page,
        url: &str,
        wait_time: Duration,
    ) -> Result<RenderedPage, AppError> {
        tokio::time::timeout(self.navigation_timeout, page.goto(url))
            .await
            .map_err(|_| AppError::Timeout(self.navigation_timeout.as_secs()))?
            .map_err(|e| AppError::RenderError(format!("Failed to navigate to {url}: {e}")))?;

        // Fixed settle time for client-side rendering. Not a readiness signal.
        tokio::time::sleep(wait_time).await;

        let markup = page
            .content()
            .await
            .map_err(|e| AppError::RenderError(format!("Failed to read page content: {e}")))?;

        let final_url = match page.url().await {
            Ok(Some(final_url)) => final_url,
            Ok(None) => url.to_string(),
            Err(e) => {
                tracing::warn!("Could not read final page URL, using {url}: {e}");
                url.to_string()
            }
        };

        // Chromium follows redirects on its own; refuse pages that ended up
        // somewhere private.
        if self.ssrf_protection && final_url != url {
            ensure_public_url(&final_url).await?;
        }

        Ok(RenderedPage::new(final_url, markup))
    }
}

impl Renderer for BrowserRenderer {
    async fn render(&self, url: &str, wait_time: Duration) -> Result<RenderedPage, AppError> {
        if self.ssrf_protection {
            ensure_public_url(url).await?;
        }

        self.tabs
            .with_slot(|| async {
                let mut tab = self.open_tab().await?;
                let result = match tab.page.as_ref() {
                    Some(page) => self.load(page, url, wait_time).await,
                    None => Err(AppError::RenderError("Browser tab already closed".into())),
                };
                tab.close().await;
                result
            })
            .await
    }
}

/// Bounded number of concurrently open tabs.
///
/// A slot is held for exactly as long as the work given to
/// [`TabPool::with_slot`] runs, and is returned on success, on error, and
/// when the work is dropped midway.
#[derive(Clone)]
struct TabPool {
    slots: Arc<Semaphore>,
}

impl TabPool {
    fn new(max_tabs: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(max_tabs.max(1))),
        }
    }

    async fn with_slot<T, F, Fut>(&self, work: F) -> Result<T, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let _slot = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| AppError::RenderError("Browser tab pool is closed".into()))?;
        work().await
    }

    #[cfg(test)]
    fn available(&self) -> usize {
        self.slots.available_permits()
    }
}

/// An open tab. [`Tab::close`] closes it; if the render future is dropped
/// midway, `Drop` closes the tab in the background instead.
struct Tab {
    page: Option<Page>,
}

impl Tab {
    async fn close(&mut self) {
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            tracing::warn!("Failed to close browser tab: {e}");
        }
    }
}

impl Drop for Tab {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        tracing::warn!("Failed to close abandoned browser tab: {e}");
                    }
                });
            }
            Err(_) => tracing::warn!("Browser tab leaked: no runtime to close it on"),
        }
    }
}
