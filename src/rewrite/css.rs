//! CSS reference rewriting.
//!
//! Fetched stylesheets are rewritten so every `url(...)` and `@import`
//! resolves against the page's origin instead of the preview origin. `data:`
//! URIs and scheme-relative `//` references are left untouched; absolute URLs
//! are kept but normalized to double-quoted form.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::RewriteContext;

static CSS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(["']?([^"')]+)["']?\)"#).expect("css url pattern is valid")
});

static CSS_IMPORT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)@import\s+url\(["']?([^"')]+)["']?\)"#)
        .expect("css import-url pattern is valid")
});

static CSS_IMPORT_BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)@import\s+["']([^"']+)["']\s*;"#).expect("css bare-import pattern is valid")
});

/// Rewrites every URL reference inside a stylesheet against the given origin.
pub(super) fn rewrite_css_urls(css: &str, ctx: &RewriteContext) -> String {
    // The plain url() pass also rewrites the inner part of @import url(...)
    // forms; the dedicated import pass then sees an absolute URL and only
    // normalizes its quoting.
    let rewritten = CSS_URL_RE.replace_all(css, |caps: &Captures| {
        let url = &caps[1];
        if !url.starts_with("http") && !url.starts_with("data:") && !url.starts_with("//") {
            format!("url(\"{}\")", ctx.absolutize(url))
        } else if url.starts_with("http") || url.starts_with("//") {
            format!("url(\"{url}\")")
        } else {
            caps[0].to_string()
        }
    });

    let rewritten = CSS_IMPORT_URL_RE.replace_all(&rewritten, |caps: &Captures| {
        let url = &caps[1];
        if !url.starts_with("http") && !url.starts_with("data:") && !url.starts_with("//") {
            format!("@import url(\"{}\")", ctx.absolutize(url))
        } else if url.starts_with("http") || url.starts_with("//") {
            format!("@import url(\"{url}\")")
        } else {
            caps[0].to_string()
        }
    });

    let rewritten = CSS_IMPORT_BARE_RE.replace_all(&rewritten, |caps: &Captures| {
        let url = &caps[1];
        if !url.starts_with("http") && !url.starts_with("data:") && !url.starts_with("//") {
            format!("@import '{}';", ctx.absolutize(url))
        } else if url.starts_with("http") || url.starts_with("//") {
            format!("@import '{url}';")
        } else {
            caps[0].to_string()
        }
    });

    rewritten.into_owned()
}
