//! Weighted scoring and verdict explanation.

use super::types::{SafetyLevel, SecurityCheck, Severity};

/// Folds the check results into a 0-100 score and a verdict.
///
/// Each check contributes its severity weight to the total; passed checks earn
/// their weight back. Score thresholds: >= 80 SAFE, >= 50 SUSPICIOUS, below
/// that DANGEROUS. Independently of the score, any failed high-severity check
/// upgrades a SUSPICIOUS verdict to DANGEROUS.
pub(super) fn calculate_safety_score(checks: &[SecurityCheck]) -> (SafetyLevel, u32) {
    let mut total_weight = 0u32;
    let mut earned_weight = 0u32;

    for check in checks {
        let weight = check.severity.weight();
        total_weight += weight;
        if check.passed {
            earned_weight += weight;
        }
    }

    let score = if total_weight == 0 {
        0
    } else {
        (earned_weight as f64 / total_weight as f64 * 100.0).round() as u32
    };

    let mut safety_level = if score >= 80 {
        SafetyLevel::Safe
    } else if score >= 50 {
        SafetyLevel::Suspicious
    } else {
        SafetyLevel::Dangerous
    };

    let high_severity_failed = checks
        .iter()
        .any(|check| matches!(check.severity, Severity::High) && !check.passed);
    if high_severity_failed && safety_level == SafetyLevel::Suspicious {
        safety_level = SafetyLevel::Dangerous;
    }

    (safety_level, score)
}

/// Produces the user-facing explanation for a verdict, naming failed checks.
pub(super) fn generate_explanation(safety_level: SafetyLevel, checks: &[SecurityCheck]) -> String {
    let failed: Vec<&str> = checks
        .iter()
        .filter(|check| !check.passed)
        .map(|check| check.name.as_str())
        .collect();

    match safety_level {
        SafetyLevel::Safe => "This URL appears to be safe. All security checks passed \
            successfully. The website uses standard security practices and shows no obvious \
            signs of malicious intent. However, always exercise caution when clicking links \
            from untrusted sources."
            .to_string(),
        SafetyLevel::Suspicious => {
            if failed.is_empty() {
                "This URL has some minor concerns but may be safe. Review the security \
                 checks before proceeding."
                    .to_string()
            } else {
                format!(
                    "This URL shows {} warning sign{}: {}. Proceed with caution and verify \
                     the source before interacting with this website.",
                    failed.len(),
                    if failed.len() > 1 { "s" } else { "" },
                    failed.join(", ")
                )
            }
        }
        SafetyLevel::Dangerous => {
            if failed.is_empty() {
                "This URL is potentially dangerous. Multiple security concerns detected."
                    .to_string()
            } else {
                format!(
                    "This URL is potentially dangerous and should be avoided. {} critical \
                     issue{} detected: {}. Do not enter personal information or credentials \
                     on this site.",
                    failed.len(),
                    if failed.len() > 1 { "s" } else { "" },
                    failed.join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::Severity;

    fn check(name: &str, passed: bool, severity: Severity) -> SecurityCheck {
        SecurityCheck {
            name: name.to_string(),
            passed,
            message: String::new(),
            severity,
        }
    }

    #[test]
    fn test_all_passed_scores_100_safe() {
        let checks = vec![
            check("a", true, Severity::Low),
            check("b", true, Severity::Medium),
            check("c", true, Severity::High),
        ];
        let (level, score) = calculate_safety_score(&checks);
        assert_eq!(score, 100);
        assert_eq!(level, SafetyLevel::Safe);
    }

    #[test]
    fn test_weighted_score_computation() {
        // total = 1 + 3 = 4, earned = 1 -> 25
        let checks = vec![
            check("a", true, Severity::Low),
            check("b", false, Severity::High),
        ];
        let (level, score) = calculate_safety_score(&checks);
        assert_eq!(score, 25);
        assert_eq!(level, SafetyLevel::Dangerous);
    }

    #[test]
    fn test_high_severity_failure_upgrades_suspicious_to_dangerous() {
        // total = 3 + 2*3 = 9... earned 6 of 9 = 67 -> SUSPICIOUS by score,
        // but the failed high-severity check forces DANGEROUS.
        let checks = vec![
            check("a", false, Severity::High),
            check("b", true, Severity::High),
            check("c", true, Severity::High),
        ];
        let (level, score) = calculate_safety_score(&checks);
        assert_eq!(score, 67);
        assert_eq!(level, SafetyLevel::Dangerous);
    }

    #[test]
    fn test_medium_failures_stay_suspicious() {
        // total = 2 + 2 + 1 + 1 = 6, earned = 4 -> 67 -> SUSPICIOUS, and no
        // high-severity failure to upgrade it.
        let checks = vec![
            check("a", false, Severity::Medium),
            check("b", true, Severity::Medium),
            check("c", true, Severity::Low),
            check("d", true, Severity::Low),
        ];
        let (level, score) = calculate_safety_score(&checks);
        assert_eq!(score, 67);
        assert_eq!(level, SafetyLevel::Suspicious);
    }

    #[test]
    fn test_explanation_names_failed_checks() {
        let checks = vec![
            check("HTTPS Protocol", false, Severity::High),
            check("URL Length", true, Severity::Low),
        ];
        let explanation = generate_explanation(SafetyLevel::Dangerous, &checks);
        assert!(explanation.contains("HTTPS Protocol"));
        assert!(explanation.contains("1 critical issue detected"));
    }

    #[test]
    fn test_safe_explanation_mentions_all_checks_passed() {
        let explanation = generate_explanation(SafetyLevel::Safe, &[]);
        assert!(explanation.contains("All security checks passed"));
    }
}
