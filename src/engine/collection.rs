//! All issues from a run with their common groupings

use crate::core::{Issue, IssueCategory, IssueType, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueCollection {
    issues: Vec<Issue>,
}

/// Wrap issues for grouped access, keeping their order
pub fn aggregate_issues(issues: Vec<Issue>) -> IssueCollection {
    IssueCollection { issues }
}

impl IssueCollection {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn grouped_by_file(&self) -> BTreeMap<&str, Vec<&Issue>> {
        let mut groups: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
        for issue in &self.issues {
            groups.entry(issue.file.as_str()).or_default().push(issue);
        }
        groups
    }

    pub fn grouped_by_type(&self) -> BTreeMap<IssueType, Vec<&Issue>> {
        let mut groups: BTreeMap<IssueType, Vec<&Issue>> = BTreeMap::new();
        for issue in &self.issues {
            groups.entry(issue.issue_type).or_default().push(issue);
        }
        groups
    }

    pub fn grouped_by_category(&self) -> BTreeMap<IssueCategory, Vec<&Issue>> {
        let mut groups: BTreeMap<IssueCategory, Vec<&Issue>> = BTreeMap::new();
        for issue in &self.issues {
            groups.entry(issue.category).or_default().push(issue);
        }
        groups
    }

    /// Most severe first; severities without issues are omitted
    pub fn grouped_by_severity(&self) -> Vec<(Severity, Vec<&Issue>)> {
        Severity::ALL
            .iter()
            .map(|severity| (*severity, self.with_severity(*severity)))
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }

    pub fn with_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    pub fn in_file(&self, file: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.file == file).collect()
    }
}
