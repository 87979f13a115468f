use linkcheckr_core::models::LinkSet;
use linkcheckr_core::traits::LinkExtractor;
use linkcheckr_core::urls::{is_valid_url, normalize_url};
use scraper::{Html, Selector};

const ANCHOR_SELECTOR: &str = "a[href]";
const BASE_SELECTOR: &str = "base[href]";

/// Anchor extractor built on `scraper` (html5ever).
///
/// Parsing is best-effort: broken markup yields whatever anchors html5ever
/// recovers, never an error. Relative links resolve against the document's
/// first `<base href>` when it has one, else against the page URL.
#[derive(Debug, Clone, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, markup: &str, base_url: &str) -> LinkSet {
        let selector = match Selector::parse(ANCHOR_SELECTOR) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::error!("Invalid anchor selector: {e}");
                return LinkSet::new();
            }
        };

        let document = Html::parse_document(markup);
        let base = document_base(&document, base_url);
        let base_url = base.as_deref().unwrap_or(base_url);

        let mut links = LinkSet::new();
        let mut skipped = 0usize;

        for href in document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
        {
            match normalize_url(base_url, href).filter(|link| is_valid_url(link)) {
                Some(link) => {
                    links.insert(link);
                }
                None => skipped += 1,
            }
        }

        tracing::debug!(
            kept = links.len(),
            skipped,
            "Extracted anchors from {} bytes of markup",
            markup.len()
        );
        links
    }
}

/// The `<base href>` of the document, resolved against the page URL.
fn document_base(document: &Html, page_url: &str) -> Option<String> {
    let selector = Selector::parse(BASE_SELECTOR).ok()?;
    let href = document.select(&selector).next()?.value().attr("href")?;
    normalize_url(page_url, href).filter(|base| is_valid_url(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(markup: &str, base: &str) -> Vec<String> {
        HtmlLinkExtractor::new().extract(markup, base).into_vec()
    }

    #[test]
    fn test_filters_and_resolves_page_links() {
        let html = r#"
            <a href="/a">A</a>
            <a href="https://other.test/b">B</a>
            <a href="mailto:x@y.com">Mail</a>
            <a href="javascript:void(0)">JS</a>
        "#;
        assert_eq!(
            extract(html, "https://example.test/page"),
            ["https://example.test/a", "https://other.test/b"]
        );
    }

    #[test]
    fn test_deduplicates_in_first_occurrence_order() {
        let html = r#"
            <a href="/two">2</a>
            <a href="/five">5</a>
            <a href="https://example.test/two">2 again</a>
            <a href="/seven">7</a>
        "#;
        assert_eq!(
            extract(html, "https://example.test/"),
            [
                "https://example.test/two",
                "https://example.test/five",
                "https://example.test/seven"
            ]
        );
    }

    #[test]
    fn test_anchors_without_href_are_skipped() {
        let html = r#"<a name="top">Top</a><a>bare</a><a href="">empty</a><a href="/x">x</a>"#;
        assert_eq!(extract(html, "https://example.test/"), ["https://example.test/x"]);
    }

    #[test]
    fn test_non_network_schemes_are_dropped() {
        let html = r#"
            <a href="tel:+15551234">Call</a>
            <a href="data:text/plain,hi">Data</a>
            <a href="file:///etc/passwd">File</a>
        "#;
        assert!(extract(html, "https://example.test/").is_empty());
    }

    #[test]
    fn test_malformed_markup_is_best_effort() {
        let html = r#"<div><a href="/ok">ok<p><a href="/also<b>broken"#;
        let links = extract(html, "https://example.test/");
        assert_eq!(links[0], "https://example.test/ok");

        assert!(extract("<<<>>> not html", "https://example.test/").is_empty());
        assert!(extract("", "https://example.test/").is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let html = r#"<a href="/b">b</a><a href="/a">a</a><a href="/b">b</a>"#;
        let extractor = HtmlLinkExtractor::new();
        let first = extractor.extract(html, "https://example.test/");
        let second = extractor.extract(html, "https://example.test/");
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_unparseable_base_keeps_only_absolute_links() {
        let html = r#"<a href="/relative">r</a><a href="https://abs.test/x">x</a>"#;
        assert_eq!(extract(html, "not a url"), ["https://abs.test/x"]);
    }

    #[test]
    fn test_base_element_sets_resolution_base() {
        let html = r#"
            <html><head><base href="https://cdn.example.test/docs/"></head>
            <body><a href="guide.html">guide</a><a href="/root">root</a></body></html>
        "#;
        assert_eq!(
            extract(html, "https://example.test/page"),
            ["https://cdn.example.test/docs/guide.html", "https://cdn.example.test/root"]
        );
    }

    #[test]
    fn test_relative_base_element_resolves_against_page() {
        let html = r#"<base href="/v2/"><a href="intro">intro</a>"#;
        assert_eq!(
            extract(html, "https://example.test/page"),
            ["https://example.test/v2/intro"]
        );
    }

    #[test]
    fn test_only_first_base_element_counts() {
        let html = r#"<base href="https://one.test/"><base href="https://two.test/"><a href="x">x</a>"#;
        assert_eq!(extract(html, "https://example.test/"), ["https://one.test/x"]);
    }
}
