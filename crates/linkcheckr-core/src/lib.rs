pub mod check;
pub mod error;
pub mod models;
pub mod probe;
pub mod report;
pub mod traits;
pub mod urls;

#[cfg(test)]
pub(crate) mod testutil;

pub use check::{CheckConfig, CheckService};
pub use error::AppError;
pub use models::{CheckRequest, LinkSet, ProbeResult, ProbeStatus, RenderedPage};
pub use probe::{Fallback, ProbeMethod, ProbeOutcome, ProbeStrategy};
pub use report::{Report, Summary};
pub use traits::{LinkExtractor, Prober, Renderer};
pub use urls::{is_valid_url, normalize_url};
