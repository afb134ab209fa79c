//! HTML attribute rewriting passes.
//!
//! Pattern-based rather than DOM-based: elements are matched with regular
//! expressions and their URL-carrying attributes absolutized in place. The
//! generic pass at the end is not tag-aware; it rewrites any matching
//! attribute wherever it appears, which is the documented scope of these
//! passes rather than an oversight.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::RewriteContext;

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img([^>]*)>").expect("img tag pattern is valid"));

static SOURCE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<source([^>]*)>").expect("source tag pattern is valid"));

static VIDEO_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<video([^>]*)>").expect("video tag pattern is valid"));

static SRC_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\ssrc=["']([^"']+)["']"#).expect("src attr pattern is valid")
});

static SRCSET_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\ssrcset=["']([^"']+)["']"#).expect("srcset attr pattern is valid")
});

static POSTER_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sposter=["']([^"']+)["']"#).expect("poster attr pattern is valid")
});

/// Lazy-loading and poster attributes on `<img>`, rewritten as single values.
static IMG_DATA_ATTRS: &[&str] = &["data-src", "data-srcset", "poster", "data-poster"];

static IMG_DATA_ATTR_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    IMG_DATA_ATTRS
        .iter()
        .map(|attr| {
            let re = Regex::new(&format!(r#"(?i)\s{attr}=["']([^"']+)["']"#))
                .expect("img data attr pattern is valid");
            (*attr, re)
        })
        .collect()
});

/// Attributes handled by the generic pass, on any element.
static GENERIC_ATTRS: &[&str] = &["href", "src", "action", "data-src", "data-href"];

static GENERIC_ATTR_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    GENERIC_ATTRS
        .iter()
        .map(|attr| {
            Regex::new(&format!(r#"(?i)([\s\w]+{attr})=["']([^"']+)["']"#))
                .expect("generic attr pattern is valid")
        })
        .collect()
});

fn absolutize_single(value: &str, ctx: &RewriteContext) -> Option<String> {
    if value.starts_with("data:") || value.starts_with("http") {
        None
    } else {
        Some(ctx.absolutize(value))
    }
}

/// Rewrites each comma-separated srcset entry, preserving descriptor tokens
/// (`2x`, `800w`, ...).
fn absolutize_srcset(srcset: &str, ctx: &RewriteContext) -> String {
    srcset
        .split(',')
        .map(|entry| {
            let trimmed = entry.trim();
            let mut parts = trimmed.split_whitespace();
            let url = parts.next().unwrap_or_default();
            let descriptor = parts.collect::<Vec<_>>().join(" ");

            match absolutize_single(url, ctx) {
                Some(absolute) if descriptor.is_empty() => absolute,
                Some(absolute) => format!("{absolute} {descriptor}"),
                None => trimmed.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn rewrite_src_attr(attrs: &str, ctx: &RewriteContext) -> String {
    SRC_ATTR_RE
        .replace_all(attrs, |caps: &Captures| {
            match absolutize_single(&caps[1], ctx) {
                Some(absolute) => format!(" src=\"{absolute}\""),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn rewrite_srcset_attr(attrs: &str, ctx: &RewriteContext) -> String {
    SRCSET_ATTR_RE
        .replace_all(attrs, |caps: &Captures| {
            format!(" srcset=\"{}\"", absolutize_srcset(&caps[1], ctx))
        })
        .into_owned()
}

/// Rewrites `<img>` elements: `src`, `srcset`, and the lazy-loading/poster
/// attribute family.
pub(super) fn rewrite_img_elements(html: &str, ctx: &RewriteContext) -> String {
    IMG_TAG_RE
        .replace_all(html, |caps: &Captures| {
            let mut attrs = rewrite_src_attr(&caps[1], ctx);
            attrs = rewrite_srcset_attr(&attrs, ctx);
            for (name, re) in IMG_DATA_ATTR_RES.iter() {
                attrs = re
                    .replace_all(&attrs, |c: &Captures| {
                        match absolutize_single(&c[1], ctx) {
                            Some(absolute) => format!(" {name}=\"{absolute}\""),
                            None => c[0].to_string(),
                        }
                    })
                    .into_owned();
            }
            format!("<img{attrs}>")
        })
        .into_owned()
}

/// Rewrites `<source>` elements (inside `<picture>`/`<video>`): `srcset` and
/// `src`.
pub(super) fn rewrite_source_elements(html: &str, ctx: &RewriteContext) -> String {
    SOURCE_TAG_RE
        .replace_all(html, |caps: &Captures| {
            let attrs = rewrite_srcset_attr(&caps[1], ctx);
            let attrs = rewrite_src_attr(&attrs, ctx);
            format!("<source{attrs}>")
        })
        .into_owned()
}

/// Rewrites the `poster` attribute on `<video>` elements.
pub(super) fn rewrite_video_posters(html: &str, ctx: &RewriteContext) -> String {
    VIDEO_TAG_RE
        .replace_all(html, |caps: &Captures| {
            let attrs = POSTER_ATTR_RE
                .replace_all(&caps[1], |c: &Captures| {
                    match absolutize_single(&c[1], ctx) {
                        Some(absolute) => format!(" poster=\"{absolute}\""),
                        None => c[0].to_string(),
                    }
                })
                .into_owned();
            format!("<video{attrs}>")
        })
        .into_owned()
}

/// Generic absolutization over `href`, `src`, `action`, `data-src`, and
/// `data-href` on any remaining element. Values that are already absolute,
/// scheme-relative, fragment-only, or `data:` URIs are skipped.
pub(super) fn rewrite_generic_attributes(html: &str, ctx: &RewriteContext) -> String {
    let mut processed = html.to_string();
    for re in GENERIC_ATTR_RES.iter() {
        processed = re
            .replace_all(&processed, |caps: &Captures| {
                let value = &caps[2];
                if value.starts_with("data:")
                    || value.starts_with("//")
                    || value.starts_with('#')
                    || value.starts_with("http")
                {
                    caps[0].to_string()
                } else {
                    format!("{}=\"{}\"", &caps[1], ctx.absolutize(value))
                }
            })
            .into_owned();
    }
    processed
}
