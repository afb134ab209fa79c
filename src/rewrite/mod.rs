//! HTML/CSS content rewriting for sandboxed previews.
//!
//! Turns a fetched page into a self-contained document that renders correctly
//! inside an isolated frame: a base tag anchors relative navigation, external
//! stylesheets are inlined with their inner references absolutized, and every
//! URL-carrying attribute is rewritten against the page's origin.
//!
//! The transformation is string-based pattern matching, not a DOM parse. The
//! absolutization rule is deliberately simpler than RFC 3986 resolution:
//! values starting with `/` get the origin prefixed, everything else gets
//! `origin/` prefixed, and `..` segments are not collapsed.

mod css;
mod html;

use std::sync::LazyLock;

use anyhow::Context;
use log::warn;
use regex::Regex;
use url::Url;

use crate::fetch::ContentFetcher;

static HEAD_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head>").expect("head close pattern is valid"));

static BASE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<base").expect("base tag pattern is valid"));

static CSS_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link[^>]*rel=["']stylesheet["'][^>]*href=["']([^"']+)["'][^>]*>"#)
        .expect("stylesheet link pattern is valid")
});

static STYLE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("style tag pattern is valid")
});

/// Base context for one rewrite operation, derived once from the final URL
/// and immutable for the duration of the rewrite.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    origin: String,
}

impl RewriteContext {
    /// Derives the origin (`scheme://host[:port]`) from the final effective
    /// URL the document was fetched from.
    pub fn from_final_url(final_url: &str) -> anyhow::Result<Self> {
        let url = Url::parse(final_url)
            .with_context(|| format!("invalid final URL: {final_url}"))?;
        let origin = url.origin();
        if !matches!(origin, url::Origin::Tuple(..)) {
            anyhow::bail!("URL has no usable origin: {final_url}");
        }
        Ok(RewriteContext {
            origin: origin.ascii_serialization(),
        })
    }

    /// The origin string every reference is resolved against.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The three-case absolutization rule used by every pass: values starting
    /// with `/` are root-relative, everything else is prefixed with
    /// `origin/` as-is.
    pub(crate) fn absolutize(&self, value: &str) -> String {
        if value.starts_with('/') {
            format!("{}{}", self.origin, value)
        } else {
            format!("{}/{}", self.origin, value)
        }
    }
}

/// The rewritten output document.
#[derive(Debug, Clone)]
pub struct RewrittenDocument {
    /// The processed HTML text.
    pub html: String,
}

impl RewrittenDocument {
    /// Size of the document in bytes.
    pub fn size(&self) -> usize {
        self.html.len()
    }

    /// Human-readable size, e.g. `"12.40KB"`.
    pub fn size_formatted(&self) -> String {
        format!("{:.2}KB", self.html.len() as f64 / 1024.0)
    }
}

/// Rewrites a fetched page into a self-contained, origin-neutral document.
///
/// Any processing error falls back to the original HTML unchanged: a rewrite
/// bug must never cost the user the preview itself.
///
/// # Arguments
///
/// * `html` - Raw page HTML
/// * `final_url` - The final effective URL the page was fetched from
/// * `fetcher` - Used to pull external stylesheets, one at a time in
///   document order
pub async fn rewrite_document(
    html: &str,
    final_url: &str,
    fetcher: &dyn ContentFetcher,
) -> RewrittenDocument {
    match rewrite_inner(html, final_url, fetcher).await {
        Ok(document) => document,
        Err(err) => {
            warn!("Rewrite of {final_url} failed, returning original document: {err:#}");
            RewrittenDocument {
                html: html.to_string(),
            }
        }
    }
}

async fn rewrite_inner(
    html: &str,
    final_url: &str,
    fetcher: &dyn ContentFetcher,
) -> anyhow::Result<RewrittenDocument> {
    let ctx = RewriteContext::from_final_url(final_url)?;
    let mut processed = html.to_string();

    // Anchor relative navigation. An explicit base in the source always wins;
    // a document must never carry two conflicting base declarations.
    if !BASE_TAG_RE.is_match(&processed) {
        let base_tag = format!("<base href=\"{}/\">", ctx.origin());
        match HEAD_CLOSE_RE.find(&processed) {
            Some(head_close) => {
                let at = head_close.start();
                processed.insert_str(at, &base_tag);
            }
            None => {
                processed = format!("{base_tag}{processed}");
            }
        }
    }

    // Inline external stylesheets. Fetches run one at a time in document
    // order so the combined output is deterministic; a failed fetch skips
    // that sheet but still removes its link element so the browser does not
    // attempt a second, unrewritten load.
    let stylesheet_links: Vec<(String, String)> = CSS_LINK_RE
        .captures_iter(&processed)
        .map(|caps| (caps[0].to_string(), caps[1].to_string()))
        .collect();

    let mut combined_css = String::new();
    for (link_tag, href) in stylesheet_links {
        let css_url = if href.starts_with("http") {
            href
        } else {
            ctx.absolutize(&href)
        };

        match fetcher.fetch_text(&css_url).await {
            Ok(stylesheet) => {
                combined_css.push_str(&format!("/* CSS from: {css_url} */\n"));
                combined_css.push_str(&css::rewrite_css_urls(&stylesheet, &ctx));
                combined_css.push_str("\n\n");
            }
            Err(err) => {
                warn!("Failed to fetch stylesheet {css_url}: {err}");
            }
        }

        processed = processed.replacen(&link_tag, "", 1);
    }

    // Collect inline style blocks, then strip them; they are reinserted as
    // part of the single combined block below, after all stylesheet CSS.
    for caps in STYLE_TAG_RE.captures_iter(&processed) {
        combined_css.push_str("/* Inline style */\n");
        combined_css.push_str(&caps[1]);
        combined_css.push_str("\n\n");
    }
    processed = STYLE_TAG_RE.replace_all(&processed, "").into_owned();

    if !combined_css.is_empty() {
        let combined_tag = format!(
            "<style>\n/* Combined CSS from original website */\n{combined_css}</style>"
        );
        match HEAD_CLOSE_RE.find(&processed) {
            Some(head_close) => {
                let at = head_close.start();
                processed.insert_str(at, &combined_tag);
            }
            None => {
                processed = format!("{combined_tag}{processed}");
            }
        }
    }

    processed = html::rewrite_img_elements(&processed, &ctx);
    processed = html::rewrite_source_elements(&processed, &ctx);
    processed = html::rewrite_video_posters(&processed, &ctx);
    processed = html::rewrite_generic_attributes(&processed, &ctx);

    Ok(RewrittenDocument { html: processed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MockFetcher {
        stylesheets: HashMap<String, String>,
    }

    impl MockFetcher {
        fn empty() -> Self {
            MockFetcher {
                stylesheets: HashMap::new(),
            }
        }

        fn with(url: &str, body: &str) -> Self {
            let mut stylesheets = HashMap::new();
            stylesheets.insert(url.to_string(), body.to_string());
            MockFetcher { stylesheets }
        }
    }

    #[async_trait]
    impl ContentFetcher for MockFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.stylesheets
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Upstream(format!("no stylesheet at {url}")))
        }
    }

    #[tokio::test]
    async fn test_stylesheet_inlined_and_link_removed() {
        let html = r#"<html><head><link rel="stylesheet" href="/s.css"></head><body></body></html>"#;
        let fetcher = MockFetcher::with("https://ex.com/s.css", "body{background:url(/bg.png)}");

        let doc = rewrite_document(html, "https://ex.com/", &fetcher).await;

        assert!(!doc.html.contains("<link"));
        assert_eq!(doc.html.matches("<style>").count(), 1);
        assert!(doc.html.contains("url(\"https://ex.com/bg.png\")"));
        assert!(doc.html.contains("/* CSS from: https://ex.com/s.css */"));
    }

    #[tokio::test]
    async fn test_base_tag_inserted_before_head_close() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let doc = rewrite_document(html, "https://ex.com/page", &MockFetcher::empty()).await;
        assert_eq!(
            doc.html,
            "<html><head><title>t</title><base href=\"https://ex.com/\"></head><body></body></html>"
        );
    }

    #[tokio::test]
    async fn test_existing_base_tag_wins() {
        let html = r#"<html><head><base href="/sub/"><title>t</title></head><body></body></html>"#;
        let doc = rewrite_document(html, "https://ex.com/", &MockFetcher::empty()).await;
        // No second base declaration is added; the relative href is still
        // absolutized by the generic pass.
        assert_eq!(doc.html.matches("<base").count(), 1);
        assert!(doc.html.contains("base href=\"https://ex.com/sub/\""));
    }

    #[tokio::test]
    async fn test_document_without_references_only_gains_base_tag() {
        let html = "<html><head></head><body><p>hello</p>\
                    <a href=\"https://other.org/x\">x</a></body></html>";
        let doc = rewrite_document(html, "https://ex.com/", &MockFetcher::empty()).await;
        assert_eq!(
            doc.html,
            "<html><head><base href=\"https://ex.com/\"></head><body><p>hello</p>\
             <a href=\"https://other.org/x\">x</a></body></html>"
        );
    }

    #[tokio::test]
    async fn test_inline_styles_combined_after_stylesheets() {
        let html = r#"<html><head><link rel="stylesheet" href="/a.css"><style>p{color:red}</style></head><body></body></html>"#;
        let fetcher = MockFetcher::with("https://ex.com/a.css", "h1{margin:0}");

        let doc = rewrite_document(html, "https://ex.com/", &fetcher).await;

        let stylesheet_at = doc.html.find("h1{margin:0}").expect("stylesheet css present");
        let inline_at = doc.html.find("p{color:red}").expect("inline css present");
        assert!(stylesheet_at < inline_at, "stylesheet CSS must precede inline CSS");
        assert_eq!(doc.html.matches("<style>").count(), 1);
    }

    #[tokio::test]
    async fn test_failed_stylesheet_fetch_is_nonfatal() {
        let html = r#"<html><head><link rel="stylesheet" href="/missing.css"></head><body><img src="/x.png"></body></html>"#;
        let doc = rewrite_document(html, "https://ex.com/", &MockFetcher::empty()).await;

        // The dead link is removed and the rest of the rewrite still runs.
        assert!(!doc.html.contains("<link"));
        assert!(doc.html.contains("src=\"https://ex.com/x.png\""));
    }

    #[tokio::test]
    async fn test_invalid_final_url_returns_original_html() {
        let html = "<html><head></head><body><img src=\"/x.png\"></body></html>";
        let doc = rewrite_document(html, "not a url", &MockFetcher::empty()).await;
        assert_eq!(doc.html, html);
    }

    #[tokio::test]
    async fn test_size_formatting() {
        let doc = RewrittenDocument {
            html: "x".repeat(2048),
        };
        assert_eq!(doc.size(), 2048);
        assert_eq!(doc.size_formatted(), "2.00KB");
    }
}
