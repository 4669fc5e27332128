//! HTML link extraction
//!
//! This module turns a downloaded page into raw [`Link`] records:
//! - One record per `<a href="...">` anchor, in document order
//! - `description` from the anchor's `title` attribute
//! - `relation` from its `rel` attribute
//!
//! Extraction is pure: hrefs are reported as written, relative or not.
//! Resolution against the page URL and all filtering happen in the driver,
//! so a custom extractor only has to find links, not judge them.

use scraper::{Html, Selector};

use super::frontier::Link;

/// The extraction seam the crawl driver consumes
pub trait LinkExtractor: Send + Sync {
    /// Returns the links found in `html`, hrefs as written in the document
    fn extract(&self, html: &str) -> Vec<Link>;
}

/// scraper-backed [`LinkExtractor`] for HTML documents
///
/// Tolerates malformed markup the way browsers do; anchors with an empty
/// href are skipped, everything else is reported. `rel="nofollow"` anchors
/// are reported too, with the relation carried along so a policy can decide
/// what to do with them.
///
/// # Example
///
/// ```
/// use spindrift::crawler::{HtmlLinkExtractor, LinkExtractor};
///
/// let html = r#"<a href="/about" title="About us">About</a>"#;
/// let links = HtmlLinkExtractor::new().extract(html);
///
/// assert_eq!(links[0].url, "/about");
/// assert_eq!(links[0].description, "About us");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    /// Creates the extractor
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, html: &str) -> Vec<Link> {
        let document = Html::parse_document(html);
        let mut links = Vec::new();

        if let Ok(selector) = Selector::parse("a[href]") {
            for element in document.select(&selector) {
                let href = element.value().attr("href").unwrap_or("");
                if href.trim().is_empty() {
                    continue;
                }

                links.push(Link {
                    url: href.to_string(),
                    description: element.value().attr("title").unwrap_or("").to_string(),
                    relation: element.value().attr("rel").unwrap_or("").to_string(),
                });
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<Link> {
        HtmlLinkExtractor::new().extract(html)
    }

    #[test]
    fn test_extract_single_anchor() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        let links = extract(html);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://other.com/page");
    }

    #[test]
    fn test_hrefs_are_reported_as_written() {
        let html = r#"<a href="/rooted">A</a><a href="sibling.html">B</a><a href="../up">C</a>"#;
        let links = extract(html);

        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["/rooted", "sibling.html", "../up"]);
    }

    #[test]
    fn test_title_attribute_becomes_description() {
        let html = r#"<a href="/about" title="About the project">About</a>"#;
        let links = extract(html);

        assert_eq!(links[0].description, "About the project");
    }

    #[test]
    fn test_rel_attribute_becomes_relation() {
        let html = r#"<a href="/external" rel="nofollow">Out</a>"#;
        let links = extract(html);

        // nofollow anchors are still reported; policies decide their fate.
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].relation, "nofollow");
    }

    #[test]
    fn test_missing_attributes_are_empty() {
        let html = r#"<a href="/plain">Plain</a>"#;
        let links = extract(html);

        assert_eq!(links[0].description, "");
        assert_eq!(links[0].relation, "");
    }

    #[test]
    fn test_empty_href_skipped() {
        let html = r#"<a href="">Nowhere</a><a href="   ">Also nowhere</a>"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_anchor_without_href_skipped() {
        let html = r#"<a name="top">Anchor</a><a href="/real">Real</a>"#;
        let links = extract(html);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "/real");
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"
            <html>
            <body>
                <a href="/first">1</a>
                <p><a href="/second">2</a></p>
                <footer><a href="/third">3</a></footer>
            </body>
            </html>
        "#;
        let links = extract(html);

        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["/first", "/second", "/third"]);
    }

    #[test]
    fn test_duplicate_hrefs_all_reported() {
        // Deduplication is the registry's job, not the extractor's.
        let html = r#"<a href="/twice">A</a><a href="/twice">B</a>"#;
        assert_eq!(extract(html).len(), 2);
    }

    #[test]
    fn test_pseudo_links_are_reported_raw() {
        // The extractor does not judge schemes; absolutization drops these.
        let html = r#"<a href="javascript:void(0)">JS</a><a href="mailto:a@b.c">Mail</a>"#;
        assert_eq!(extract(html).len(), 2);
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let html = r#"<html><body><a href="/ok">unclosed<div><a href="/also-ok">"#;
        let links = extract(html);

        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_no_anchors() {
        assert!(extract("<html><body><p>No links here</p></body></html>").is_empty());
        assert!(extract("").is_empty());
    }
}
