use linkcheckr_client::{AnyRenderer, HtmlLinkExtractor, HttpProber, RendererKind};
use linkcheckr_core::{AppError, CheckConfig, CheckService};

use crate::config::ServerConfig;

/// The pipeline as wired by the server.
pub type LinkCheckService = CheckService<AnyRenderer, HtmlLinkExtractor, HttpProber>;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
///
/// Holds the rendering engine (one browser process for the whole server) and
/// the probe client; no request data.
pub struct AppState {
    pub service: LinkCheckService,
    pub renderer: RendererKind,
}

impl AppState {
    pub fn new(service: LinkCheckService, renderer: RendererKind) -> Self {
        Self { service, renderer }
    }

    /// Launches the configured engine and builds the pipeline.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, AppError> {
        let renderer = AnyRenderer::build(
            config.renderer,
            config.navigation_timeout,
            config.max_tabs,
            config.allow_private,
        )
        .await?;

        let prober = HttpProber::with_timeout(config.probe_timeout)?;
        let prober = if config.allow_private {
            prober.allow_private_urls()
        } else {
            prober
        };

        let mut check_config = CheckConfig::default().with_concurrency(config.concurrency);
        if let Some(deadline) = config.deadline {
            check_config = check_config.with_deadline(deadline);
        }

        let kind = renderer.kind();
        let service =
            CheckService::with_config(renderer, HtmlLinkExtractor::new(), prober, check_config);
        Ok(Self::new(service, kind))
    }
}
