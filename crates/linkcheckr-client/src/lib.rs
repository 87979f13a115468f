#[cfg(feature = "browser")]
pub mod browser_renderer;
pub mod extractor;
pub mod guard;
pub mod http_renderer;
pub mod prober;
pub mod redirect;
pub mod renderer;

#[cfg(feature = "browser")]
pub use browser_renderer::BrowserRenderer;
pub use extractor::HtmlLinkExtractor;
pub use http_renderer::HttpRenderer;
pub use prober::HttpProber;
pub use renderer::{AnyRenderer, RendererKind};
