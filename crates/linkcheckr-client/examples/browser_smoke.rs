/// Smoke-test for `BrowserRenderer` + `HtmlLinkExtractor`.
///
/// Launches a headless Chromium, renders <https://example.com>, and verifies
/// the rendered page yields at least one link.
///
/// Run with:
///   cargo run -p linkcheckr-client --example browser_smoke
use std::time::Duration;

use linkcheckr_client::{BrowserRenderer, HtmlLinkExtractor};
use linkcheckr_core::traits::{LinkExtractor, Renderer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Launching headless browser…");
    let renderer = BrowserRenderer::launch().await?;

    let url = "https://example.com";
    println!("Rendering {url} …");
    let page = renderer.render(url, Duration::from_secs(1)).await?;
    assert!(
        page.markup.contains("Example Domain"),
        "Expected heading not found in rendered HTML"
    );

    let links = HtmlLinkExtractor::new().extract(&page.markup, &page.final_url);
    assert!(!links.is_empty(), "No links extracted from {url}");

    println!(
        "OK: {} bytes of rendered HTML from {}, {} link(s):",
        page.markup.len(),
        page.final_url,
        links.len()
    );
    for link in &links {
        println!("  {link}");
    }
    Ok(())
}
