//! Individual security checks.
//!
//! Each check is a pure function over a parsed URL. Checks never fail the
//! analysis; they report pass/fail with a severity that feeds the score.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::types::{SecurityCheck, Severity};

static IP_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("IP address pattern is valid")
});

static PHISHING_KEYWORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)paypal|amazon|google|microsoft|apple|bank|login|verify|secure|account|update")
        .expect("phishing keyword pattern is valid")
});

static DASH_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("dash run pattern is valid"));

static SUSPICIOUS_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[<>{}|\^`\[\]]").expect("special char pattern is valid"));

/// TLDs handed out free or cheaply, disproportionately used for phishing.
const SUSPICIOUS_TLDS: &[&str] = &[
    ".tk", ".ml", ".ga", ".cf", ".gq", // free registrations
    ".xyz", ".top", ".work", ".click", ".link", // frequently abused
];

/// TLDs that predate the new-gTLD expansion; registrations there skew older.
const ESTABLISHED_TLDS: &[&str] = &[".com", ".org", ".edu", ".gov", ".net"];

/// Domains broadly recognized as legitimate, matched by suffix so subdomains
/// count too.
const WELL_KNOWN_DOMAINS: &[&str] = &[
    "google.com",
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "facebook.com",
    "twitter.com",
    "github.com",
    "stackoverflow.com",
];

/// Checks whether the URL uses HTTPS.
pub(super) fn check_https(url: &Url) -> SecurityCheck {
    let is_https = url.scheme() == "https";

    SecurityCheck {
        name: "HTTPS Protocol".to_string(),
        passed: is_https,
        message: if is_https {
            "Website uses secure HTTPS connection".to_string()
        } else {
            "Website uses insecure HTTP connection - data may be intercepted".to_string()
        },
        severity: if is_https { Severity::Low } else { Severity::High },
    }
}

/// Checks for structural patterns common in phishing URLs: IP-address hosts,
/// brand/credential keywords, `@` signs, dash runs, and excessive subdomains.
pub(super) fn check_suspicious_patterns(url: &Url) -> SecurityCheck {
    let hostname = url.host_str().unwrap_or_default().to_lowercase();
    let full_url = url.as_str().to_lowercase();

    let matches_pattern = |text: &str| {
        IP_ADDRESS_RE.is_match(text)
            || PHISHING_KEYWORDS_RE.is_match(text)
            || text.contains('@')
            || DASH_RUN_RE.is_match(text)
    };
    let has_suspicious_pattern = matches_pattern(&hostname) || matches_pattern(&full_url);

    // More than 4 dot-separated labels means at least 3 subdomain levels.
    let has_excessive_subdomains = hostname.split('.').count() > 4;

    let is_suspicious = has_suspicious_pattern || has_excessive_subdomains;

    SecurityCheck {
        name: "Suspicious Patterns".to_string(),
        passed: !is_suspicious,
        message: if is_suspicious {
            "URL contains patterns commonly used in phishing attacks (IP addresses, suspicious keywords, or excessive subdomains)".to_string()
        } else {
            "No suspicious patterns detected in URL structure".to_string()
        },
        severity: if is_suspicious { Severity::High } else { Severity::Low },
    }
}

/// Checks domain characteristics: abused TLDs, digits in the leading label,
/// and unusually long hostnames.
pub(super) fn check_domain(url: &Url) -> SecurityCheck {
    let hostname = url.host_str().unwrap_or_default().to_lowercase();

    let has_suspicious_tld = SUSPICIOUS_TLDS.iter().any(|tld| hostname.ends_with(tld));
    let has_digits_in_domain = hostname
        .split('.')
        .next()
        .is_some_and(|label| label.chars().any(|c| c.is_ascii_digit()));
    let is_very_long = hostname.len() > 30;

    let mut issues = Vec::new();
    if has_suspicious_tld {
        issues.push("suspicious TLD");
    }
    if has_digits_in_domain {
        issues.push("numbers in domain name");
    }
    if is_very_long {
        issues.push("unusually long domain");
    }

    let passed = issues.is_empty();

    SecurityCheck {
        name: "Domain Analysis".to_string(),
        passed,
        message: if passed {
            "Domain appears legitimate with standard characteristics".to_string()
        } else {
            format!("Domain has concerning characteristics: {}", issues.join(", "))
        },
        severity: if passed { Severity::Low } else { Severity::Medium },
    }
}

/// Estimates domain age from the TLD and a well-known-domain allowlist.
///
/// A WHOIS lookup would answer this properly; the TLD heuristic stands in for
/// it so the analysis stays a pure function with no network access.
pub(super) fn check_domain_age(url: &Url) -> SecurityCheck {
    let hostname = url.host_str().unwrap_or_default().to_lowercase();

    let is_well_known = WELL_KNOWN_DOMAINS
        .iter()
        .any(|domain| hostname.ends_with(domain));
    let has_established_tld = ESTABLISHED_TLDS.iter().any(|tld| hostname.ends_with(tld));

    let passed = is_well_known || has_established_tld;

    SecurityCheck {
        name: "Domain Age".to_string(),
        passed,
        message: if is_well_known {
            "Domain is well-established and widely recognized".to_string()
        } else if has_established_tld {
            "Domain uses an established TLD, likely older than 1 year".to_string()
        } else {
            "Domain may be recently registered (higher risk for phishing)".to_string()
        },
        severity: if passed { Severity::Low } else { Severity::Medium },
    }
}

/// Flags URLs longer than 200 characters.
pub(super) fn check_url_length(url: &Url) -> SecurityCheck {
    let url_length = url.as_str().len();
    let is_suspiciously_long = url_length > 200;

    SecurityCheck {
        name: "URL Length".to_string(),
        passed: !is_suspiciously_long,
        message: if is_suspiciously_long {
            format!("URL is suspiciously long ({url_length} characters) - may hide malicious content")
        } else {
            format!("URL length is normal ({url_length} characters)")
        },
        severity: if is_suspiciously_long {
            Severity::Medium
        } else {
            Severity::Low
        },
    }
}

/// Flags characters that have no place in an ordinary URL and usually signal
/// obfuscation.
pub(super) fn check_special_characters(url: &Url) -> SecurityCheck {
    let has_suspicious_chars = SUSPICIOUS_CHARS_RE.is_match(url.as_str());

    SecurityCheck {
        name: "Special Characters".to_string(),
        passed: !has_suspicious_chars,
        message: if has_suspicious_chars {
            "URL contains unusual special characters that may indicate obfuscation".to_string()
        } else {
            "No unusual special characters detected".to_string()
        },
        severity: if has_suspicious_chars {
            Severity::High
        } else {
            Severity::Low
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Url {
        Url::parse(url).expect("test URL should parse")
    }

    #[test]
    fn test_check_https_passes_for_https() {
        let check = check_https(&parse("https://example.com"));
        assert!(check.passed);
        assert_eq!(check.severity, Severity::Low);
    }

    #[test]
    fn test_check_https_fails_high_for_http() {
        let check = check_https(&parse("http://example.com"));
        assert!(!check.passed);
        assert_eq!(check.severity, Severity::High);
    }

    #[test]
    fn test_suspicious_patterns_flags_ip_host() {
        let check = check_suspicious_patterns(&parse("http://192.168.1.1/login"));
        assert!(!check.passed);
        assert_eq!(check.severity, Severity::High);
    }

    #[test]
    fn test_suspicious_patterns_flags_phishing_keyword() {
        let check = check_suspicious_patterns(&parse("https://paypal-signin.example.net"));
        assert!(!check.passed);
    }

    #[test]
    fn test_suspicious_patterns_flags_excessive_subdomains() {
        let check = check_suspicious_patterns(&parse("https://a.b.c.d.example.io"));
        assert!(!check.passed);
    }

    #[test]
    fn test_suspicious_patterns_passes_plain_domain() {
        let check = check_suspicious_patterns(&parse("https://example.net"));
        assert!(check.passed);
        assert_eq!(check.severity, Severity::Low);
    }

    #[test]
    fn test_check_domain_flags_abused_tld() {
        let check = check_domain(&parse("https://freebie.tk"));
        assert!(!check.passed);
        assert!(check.message.contains("suspicious TLD"));
        assert_eq!(check.severity, Severity::Medium);
    }

    #[test]
    fn test_check_domain_flags_digits_in_first_label() {
        let check = check_domain(&parse("https://examp1e.net"));
        assert!(!check.passed);
        assert!(check.message.contains("numbers in domain name"));
    }

    #[test]
    fn test_check_domain_passes_ordinary_hostname() {
        let check = check_domain(&parse("https://example.net"));
        assert!(check.passed);
    }

    #[test]
    fn test_domain_age_recognizes_well_known_domain() {
        let check = check_domain_age(&parse("https://gist.github.com"));
        assert!(check.passed);
        assert!(check.message.contains("well-established"));
    }

    #[test]
    fn test_domain_age_accepts_established_tld() {
        let check = check_domain_age(&parse("https://example.org"));
        assert!(check.passed);
    }

    #[test]
    fn test_domain_age_flags_new_tld() {
        let check = check_domain_age(&parse("https://example.dev"));
        assert!(!check.passed);
        assert_eq!(check.severity, Severity::Medium);
    }

    #[test]
    fn test_url_length_flags_over_200_chars() {
        let long = format!("https://example.com/{}", "a".repeat(200));
        let check = check_url_length(&parse(&long));
        assert!(!check.passed);
        assert_eq!(check.severity, Severity::Medium);
    }

    #[test]
    fn test_special_characters_flags_angle_brackets() {
        let check = check_special_characters(&parse("https://example.com/?q=%3Cscript%3E"));
        // Percent-encoded brackets stay encoded in the serialized URL.
        assert!(check.passed);

        let check = check_special_characters(&parse("https://example.com/?q={x}"));
        assert!(!check.passed);
        assert_eq!(check.severity, Severity::High);
    }
}
