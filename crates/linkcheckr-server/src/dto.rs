use serde::{Deserialize, Serialize};

use linkcheckr_core::models::{ProbeResult, ProbeStatus};
use linkcheckr_core::report::{Report, Summary};

// ---------------------------------------------------------------------------
// Check links
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CheckLinksRequest {
    /// Page to check. Required; must be an absolute URL with a host.
    pub url: Option<String>,
    /// Seconds to let client-side scripts run before links are read (default 5).
    pub wait_time: Option<f64>,
}

/// Final HTTP status, or `"Unknown"` when the link could not be reached.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum LinkStatus {
    Code(u16),
    Unknown(String),
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LinkResponse {
    pub url: String,
    pub status: LinkStatus,
}

impl From<ProbeResult> for LinkResponse {
    fn from(result: ProbeResult) -> Self {
        let status = match result.status() {
            ProbeStatus::Code(code) => LinkStatus::Code(code),
            unknown @ ProbeStatus::Unknown => LinkStatus::Unknown(unknown.to_string()),
        };
        Self {
            url: result.url().to_string(),
            status,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SummaryResponse {
    pub total: usize,
    pub working: usize,
    pub broken: usize,
}

impl From<Summary> for SummaryResponse {
    fn from(s: Summary) -> Self {
        Self {
            total: s.total,
            working: s.working,
            broken: s.broken,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CheckLinksResponse {
    pub url_checked: String,
    pub total_links: usize,
    pub working_links: Vec<LinkResponse>,
    pub broken_links: Vec<LinkResponse>,
    pub summary: SummaryResponse,
}

impl From<Report> for CheckLinksResponse {
    fn from(report: Report) -> Self {
        Self {
            url_checked: report.url_checked,
            total_links: report.total_links,
            working_links: report.working_links.into_iter().map(Into::into).collect(),
            broken_links: report.broken_links.into_iter().map(Into::into).collect(),
            summary: report.summary.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub renderer: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
