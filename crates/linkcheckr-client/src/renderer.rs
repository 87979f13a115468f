use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use linkcheckr_core::error::AppError;
use linkcheckr_core::models::RenderedPage;
use linkcheckr_core::traits::Renderer;

#[cfg(feature = "browser")]
use crate::BrowserRenderer;
use crate::HttpRenderer;

/// Which engine renders the target page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Headless Chromium, scripts executed.
    Browser,
    /// Plain GET, no scripts.
    Http,
}

impl RendererKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RendererKind::Browser => "browser",
            RendererKind::Http => "http",
        }
    }
}

impl Default for RendererKind {
    fn default() -> Self {
        if cfg!(feature = "browser") {
            RendererKind::Browser
        } else {
            RendererKind::Http
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" | "chromium" | "headless" => Ok(RendererKind::Browser),
            "http" | "static" => Ok(RendererKind::Http),
            other => Err(format!(
                "Unknown renderer '{other}' (expected 'browser' or 'http')"
            )),
        }
    }
}

/// Runtime-selected renderer, so binaries can pick an engine from config
/// while [`linkcheckr_core::CheckService`] stays statically typed.
#[derive(Clone)]
pub enum AnyRenderer {
    #[cfg(feature = "browser")]
    Browser(BrowserRenderer),
    Http(HttpRenderer),
}

impl AnyRenderer {
    /// Builds the requested engine. `allow_private` disables the SSRF guard.
    pub async fn build(
        kind: RendererKind,
        navigation_timeout: Duration,
        max_tabs: usize,
        allow_private: bool,
    ) -> Result<Self, AppError> {
        match kind {
            #[cfg(feature = "browser")]
            RendererKind::Browser => {
                let renderer = BrowserRenderer::launch_with(navigation_timeout, max_tabs).await?;
                Ok(AnyRenderer::Browser(if allow_private {
                    renderer.allow_private_urls()
                } else {
                    renderer
                }))
            }
            #[cfg(not(feature = "browser"))]
            RendererKind::Browser => {
                let _ = max_tabs;
                Err(AppError::ConfigError(
                    "Browser renderer not compiled in (enable the `browser` feature)".into(),
                ))
            }
            RendererKind::Http => {
                let renderer = HttpRenderer::with_timeout(navigation_timeout)?;
                Ok(AnyRenderer::Http(if allow_private {
                    renderer.allow_private_urls()
                } else {
                    renderer
                }))
            }
        }
    }

    pub fn kind(&self) -> RendererKind {
        match self {
            #[cfg(feature = "browser")]
            AnyRenderer::Browser(_) => RendererKind::Browser,
            AnyRenderer::Http(_) => RendererKind::Http,
        }
    }
}

impl Renderer for AnyRenderer {
    async fn render(&self, url: &str, wait_time: Duration) -> Result<RenderedPage, AppError> {
        match self {
            #[cfg(feature = "browser")]
            AnyRenderer::Browser(r) => r.render(url, wait_time).await,
            AnyRenderer::Http(r) => r.render(url, wait_time).await,
        }
    }
}
