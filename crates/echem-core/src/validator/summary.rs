use echem_domain::{IssueLevel, ValidationIssue};
use serde::Serialize;

/// Issues particionados por nivel, conservando el orden relativo.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueSummary {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub infos: Vec<ValidationIssue>,
}

impl IssueSummary {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn summarize_issues(issues: &[ValidationIssue]) -> IssueSummary {
    let mut summary = IssueSummary::default();
    for issue in issues {
        let bucket = match issue.level {
            IssueLevel::Error => &mut summary.errors,
            IssueLevel::Warning => &mut summary.warnings,
            IssueLevel::Info => &mut summary.infos,
        };
        bucket.push(issue.clone());
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_keeps_relative_order() {
        let issues = vec![
            ValidationIssue::warning("DR001", "a"),
            ValidationIssue::error("PV001", "b"),
            ValidationIssue::info("IN001", "c"),
            ValidationIssue::warning("DR004", "d"),
        ];
        let s = summarize_issues(&issues);
        assert_eq!(s.errors.len(), 1);
        assert_eq!(s.warnings.iter().map(|i| i.code.as_str()).collect::<Vec<_>>(), vec!["DR001", "DR004"]);
        assert_eq!(s.infos[0].code, "IN001");
        assert!(s.has_errors());
    }
}
