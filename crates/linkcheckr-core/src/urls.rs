//! URL validation and normalization.
//!
//! Both functions are total: malformed input yields `false` / `None`,
//! never an error.

use url::Url;

/// Schemes that never point at something a link checker can probe.
const IGNORED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Returns true iff `url` parses into an absolute URL with both a scheme and
/// a non-empty host.
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Turns a raw `href` into an absolute URL string.
///
/// - Empty links and `mailto:` / `tel:` / `javascript:` links yield `None`.
/// - Links that already carry a host are returned in their parsed form.
/// - Anything else is resolved against `base_url` using standard relative
///   resolution (`/a`, `../b`, `?q=1`, `//host/path`, ...).
///
/// Resolution failures yield `None`.
pub fn normalize_url(base_url: &str, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() || has_ignored_scheme(link) {
        return None;
    }

    if let Ok(parsed) = Url::parse(link)
        && parsed.host_str().is_some_and(|h| !h.is_empty())
    {
        return Some(parsed.into());
    }

    let base = Url::parse(base_url).ok()?;
    base.join(link).ok().map(Into::into)
}

fn has_ignored_scheme(link: &str) -> bool {
    IGNORED_SCHEMES.iter().any(|scheme| {
        link.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
