//! Manual redirect following.
//!
//! Clients are built with `Policy::none()` and redirects are walked here one
//! hop at a time, so every URL in the chain goes through the same check as the
//! first one.

use std::fmt;
use std::future::Future;

use linkcheckr_core::AppError;
use reqwest::header::LOCATION;
use reqwest::{Client, Method, Response, StatusCode};
use url::Url;

/// Hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug)]
pub enum HopError {
    /// The URL could not be parsed.
    Invalid(String),
    /// The hop check refused a URL in the chain.
    Blocked(AppError),
    /// The request itself failed.
    Transport(reqwest::Error),
    TooManyRedirects(usize),
}

impl fmt::Display for HopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HopError::Invalid(msg) => f.write_str(msg),
            HopError::Blocked(e) => write!(f, "{e}"),
            HopError::Transport(e) => write!(f, "{e}"),
            HopError::TooManyRedirects(max) => write!(f, "too many redirects (more than {max})"),
        }
    }
}

/// Sends `method` to `url`, following up to `max_redirects` redirects.
///
/// `check` runs on every URL before it is requested; an error stops the chain.
/// The returned response is the first non-redirect one, and its `url()` is the
/// final location.
pub async fn send_following<C, Fut>(
    client: &Client,
    method: Method,
    url: &str,
    max_redirects: usize,
    check: C,
) -> Result<Response, HopError>
where
    C: Fn(Url) -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    let mut current =
        Url::parse(url).map_err(|e| HopError::Invalid(format!("Invalid URL '{url}': {e}")))?;
    let mut method = method;
    let mut hops = 0;

    loop {
        check(current.clone()).await.map_err(HopError::Blocked)?;

        let response = client
            .request(method.clone(), current.clone())
            .send()
            .await
            .map_err(HopError::Transport)?;

        let Some(next) = redirect_target(&response) else {
            return Ok(response);
        };
        if hops == max_redirects {
            return Err(HopError::TooManyRedirects(max_redirects));
        }
        hops += 1;

        if response.status() == StatusCode::SEE_OTHER && method != Method::HEAD {
            method = Method::GET;
        }
        tracing::debug!(
            from = %current,
            to = %next,
            status = response.status().as_u16(),
            "Following redirect"
        );
        current = next;
    }
}

/// Where a redirect response points, resolved against the URL that sent it.
/// A redirect status without a usable `Location` is treated as final.
fn redirect_target(response: &Response) -> Option<Url> {
    match response.status() {
        StatusCode::MOVED_PERMANENTLY
        | StatusCode::FOUND
        | StatusCode::SEE_OTHER
        | StatusCode::TEMPORARY_REDIRECT
        | StatusCode::PERMANENT_REDIRECT => {}
        _ => return None,
    }

    let location = response.headers().get(LOCATION)?.to_str().ok()?.trim();
    response.url().join(location).ok()
}
