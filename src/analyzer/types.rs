//! Analysis result types.

use serde::Serialize;

/// Overall verdict for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SafetyLevel {
    /// All checks passed or only minor concerns.
    Safe,
    /// Some warning signs; user discretion advised.
    Suspicious,
    /// High-severity failures; preview is disabled.
    Dangerous,
}

/// Severity of a single check, weighted into the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; weight 1.
    Low,
    /// Worth noting; weight 2.
    Medium,
    /// Strong phishing/malware signal; weight 3.
    High,
}

impl Severity {
    /// The scoring weight for this severity.
    pub fn weight(self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

/// One named pass/fail check with a user-facing message.
///
/// The severity is dynamic: a check that passes reports `Low`, while the same
/// check failing reports the severity of what it detected.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityCheck {
    /// Short display name, e.g. "HTTPS Protocol".
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Human-readable explanation of the outcome.
    pub message: String,
    /// Severity weight this check contributes.
    pub severity: Severity,
}

/// Full analysis report for one URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlAnalysis {
    /// The normalized URL that was analyzed.
    pub url: String,
    /// Overall verdict.
    pub safety_level: SafetyLevel,
    /// Weighted score, 0-100.
    pub score: u32,
    /// Every check that ran, in order.
    pub checks: Vec<SecurityCheck>,
    /// Verdict explanation naming the failed checks.
    pub explanation: String,
    /// RFC 3339 timestamp of the analysis.
    pub timestamp: String,
    /// Whether the sandboxed preview may be offered for this URL.
    pub can_preview: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&SafetyLevel::Dangerous).unwrap(),
            "\"DANGEROUS\""
        );
        assert_eq!(serde_json::to_string(&SafetyLevel::Safe).unwrap(), "\"SAFE\"");
    }

    #[test]
    fn test_severity_serializes_lowercase_and_weights() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(Severity::Low.weight(), 1);
        assert_eq!(Severity::Medium.weight(), 2);
        assert_eq!(Severity::High.weight(), 3);
    }
}
