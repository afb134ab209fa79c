//! Heuristic URL safety analysis.
//!
//! This module runs a fixed set of pattern checks over a validated URL and
//! produces a weighted verdict. It is a pure function of the URL string: no
//! network requests, no retained state. The verdict gates whether the preview
//! pipeline may run at all (`can_preview`).

mod checks;
mod score;
mod types;

pub use types::{SafetyLevel, SecurityCheck, Severity, UrlAnalysis};

use chrono::{SecondsFormat, Utc};

use crate::normalize::normalize_url;

/// Analyzes a raw URL string and returns a full safety report.
///
/// The input is normalized first (scheme-less input gets an `https://`
/// prefix). Input that fails normalization yields a DANGEROUS report with a
/// single failed validation check rather than an error: an unparseable URL is
/// itself a verdict, not a processing failure.
pub fn analyze_url(raw: &str) -> UrlAnalysis {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let target = match normalize_url(raw) {
        Ok(target) => target,
        Err(err) => {
            return UrlAnalysis {
                url: raw.to_string(),
                safety_level: SafetyLevel::Dangerous,
                score: 0,
                checks: vec![SecurityCheck {
                    name: "URL Validation".to_string(),
                    passed: false,
                    message: err.to_string(),
                    severity: Severity::High,
                }],
                explanation: "The provided URL is invalid and cannot be analyzed.".to_string(),
                timestamp,
                can_preview: false,
            };
        }
    };

    let url = target.url();
    let checks = vec![
        SecurityCheck {
            name: "URL Validation".to_string(),
            passed: true,
            message: "URL format is valid".to_string(),
            severity: Severity::Low,
        },
        checks::check_https(url),
        checks::check_suspicious_patterns(url),
        checks::check_domain(url),
        checks::check_domain_age(url),
        checks::check_url_length(url),
        checks::check_special_characters(url),
    ];

    let (safety_level, score) = score::calculate_safety_score(&checks);
    let explanation = score::generate_explanation(safety_level, &checks);
    let can_preview = safety_level != SafetyLevel::Dangerous;

    UrlAnalysis {
        url: url.to_string(),
        safety_level,
        score,
        checks,
        explanation,
        timestamp,
        can_preview,
    }
}
