use std::str::FromStr;
use std::time::Duration;

use linkcheckr_client::RendererKind;
use linkcheckr_core::AppError;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,https://linkcheckr.vercel.app";

/// Server configuration, read from `LINKCHECKR_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    pub cors_origins: Vec<String>,
    pub renderer: RendererKind,
    pub navigation_timeout: Duration,
    pub max_tabs: usize,
    pub probe_timeout: Duration,
    pub concurrency: usize,
    pub deadline: Option<Duration>,
    /// Disables the SSRF guard. Only for trusted, local deployments.
    pub allow_private: bool,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// - `LINKCHECKR_PORT` (default 5000)
    /// - `LINKCHECKR_CORS_ORIGINS` (comma-separated)
    /// - `LINKCHECKR_RENDERER` (`browser` | `http`)
    /// - `LINKCHECKR_NAV_TIMEOUT_SECS` (default 30)
    /// - `LINKCHECKR_MAX_TABS` (default 4)
    /// - `LINKCHECKR_PROBE_TIMEOUT_SECS` (default 5)
    /// - `LINKCHECKR_CONCURRENCY` (default 16)
    /// - `LINKCHECKR_DEADLINE_SECS` (optional)
    /// - `LINKCHECKR_ALLOW_PRIVATE` (default false)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cors_origins = lookup("LINKCHECKR_CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        let renderer = match lookup("LINKCHECKR_RENDERER") {
            Some(raw) => raw
                .parse()
                .map_err(|e: String| AppError::ConfigError(format!("LINKCHECKR_RENDERER: {e}")))?,
            None => RendererKind::default(),
        };

        let concurrency: usize = parse_var(&lookup, "LINKCHECKR_CONCURRENCY", 16)?;
        if concurrency == 0 {
            return Err(AppError::ConfigError(
                "LINKCHECKR_CONCURRENCY must be at least 1".into(),
            ));
        }

        let max_tabs: usize = parse_var(&lookup, "LINKCHECKR_MAX_TABS", 4)?;
        if max_tabs == 0 {
            return Err(AppError::ConfigError(
                "LINKCHECKR_MAX_TABS must be at least 1".into(),
            ));
        }

        let deadline = match lookup("LINKCHECKR_DEADLINE_SECS") {
            None => None,
            Some(raw) => Some(Duration::from_secs(parse_value(
                "LINKCHECKR_DEADLINE_SECS",
                &raw,
            )?)),
        };

        Ok(Self {
            port: parse_var(&lookup, "LINKCHECKR_PORT", DEFAULT_PORT)?,
            cors_origins,
            renderer,
            navigation_timeout: Duration::from_secs(parse_var(
                &lookup,
                "LINKCHECKR_NAV_TIMEOUT_SECS",
                30,
            )?),
            max_tabs,
            probe_timeout: Duration::from_secs(parse_var(
                &lookup,
                "LINKCHECKR_PROBE_TIMEOUT_SECS",
                5,
            )?),
            concurrency,
            deadline,
            allow_private: parse_var(&lookup, "LINKCHECKR_ALLOW_PRIVATE", false)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => parse_value(name, &raw),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid {name} '{raw}'")))
}
