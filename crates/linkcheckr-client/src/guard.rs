//! SSRF guard for server deployments.
//!
//! A public link checker will happily fetch whatever a page links to. When
//! the guard is on, targets must use `http`/`https` and every address their
//! host resolves to must be publicly routable.

use std::net::IpAddr;

use linkcheckr_core::AppError;
use url::Url;

/// Rejects URLs that are not http(s) or that resolve to a private/reserved IP.
pub async fn ensure_public_url(url: &str) -> Result<(), AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::InvalidInput(format!("Invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::InvalidInput(format!(
                "URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::InvalidInput("URL has no host".to_string()))?;

    // IPv6 literals come back bracketed from host_str().
    let literal = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = literal.parse::<IpAddr>() {
        return check_ip(host, ip);
    }

    let port = parsed.port_or_known_default().unwrap_or(80);
    let addrs: Vec<_> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| AppError::NetworkError(format!("DNS resolution failed for {host}: {e}")))?
        .collect();

    if addrs.is_empty() {
        return Err(AppError::NetworkError(format!(
            "DNS resolution returned no addresses for {host}"
        )));
    }

    for addr in &addrs {
        check_ip(host, addr.ip())?;
    }

    Ok(())
}

/// Hop check for [`crate::redirect::send_following`]: the guard when
/// `enabled`, otherwise a pass.
pub async fn check_hop(enabled: bool, hop: Url) -> Result<(), AppError> {
    if enabled {
        ensure_public_url(hop.as_str()).await
    } else {
        Ok(())
    }
}

fn check_ip(host: &str, ip: IpAddr) -> Result<(), AppError> {
    if is_private_ip(ip) {
        return Err(AppError::InvalidInput(format!(
            "SSRF blocked: {host} resolves to private/reserved IP {ip}"
        )));
    }
    Ok(())
}

/// Check if an IP address is in a private/reserved/link-local range.
fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local() // 169.254.0.0/16, cloud metadata
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64 // 100.64.0.0/10 (CGN)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xFFC0) == 0xFE80 // fe80::/10
                || (v6.segments()[0] & 0xFE00) == 0xFC00 // fc00::/7
                || v6
                    .to_ipv4_mapped()
                    .is_some_and(|v4| is_private_ip(IpAddr::V4(v4)))
        }
    }
}
