mod common;

use cleanmap::{
    EffortLevel, Issue, IssueCategory, IssueClassifier, IssueType, PatternDetectionConfig,
    Severity,
};
use common::{spread_issues, IssueBuilder};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_systemic_type_safety_outranks_small_group() {
    let classifier = IssueClassifier::default();
    let six = spread_issues(IssueType::TypeSafety, IssueCategory::Types, Severity::High, 6);
    let three = spread_issues(IssueType::TypeSafety, IssueCategory::Types, Severity::High, 3);

    let patterns = classifier.detect_patterns(&six);
    let systemic = patterns
        .iter()
        .find(|p| p.pattern_id == "systemic-type-safety")
        .expect("systemic pattern");
    assert_eq!(systemic.occurrences, 6);
    assert_eq!(systemic.affected_files.len(), 6);
    assert_eq!(systemic.pattern_name, "Systemic Type Safety Issues Problem");
    assert!(systemic
        .description
        .starts_with("Widespread type safety issues problem affecting 6 files"));

    let small = classifier.detect_patterns(&three);
    let grouped = small
        .iter()
        .find(|p| p.pattern_id == "pattern-type-safety-types")
        .expect("type/category pattern");
    assert!(small.iter().all(|p| !p.pattern_id.starts_with("systemic-")));
    assert!(systemic.priority > grouped.priority);
}

#[test]
fn test_patterns_sorted_by_priority() {
    let mut issues = spread_issues(
        IssueType::PoorNaming,
        IssueCategory::General,
        Severity::Low,
        3,
    );
    issues.extend(spread_issues(
        IssueType::MissingErrorHandling,
        IssueCategory::ErrorHandling,
        Severity::Critical,
        4,
    ));
    let patterns = IssueClassifier::default().detect_patterns(&issues);
    assert!(!patterns.is_empty());
    assert!(patterns.windows(2).all(|w| w[0].priority >= w[1].priority));
    for pattern in &patterns {
        assert_eq!(pattern.occurrences, pattern.related_issues.len());
        let mut files = pattern.affected_files.clone();
        files.dedup();
        assert_eq!(files.len(), pattern.affected_files.len());
    }
}

#[test]
fn test_min_occurrences_and_priority_filter() {
    let issues = spread_issues(IssueType::LegacyCode, IssueCategory::Services, Severity::Low, 2);
    assert!(IssueClassifier::default().detect_patterns(&issues).is_empty());

    let strict = IssueClassifier::new(PatternDetectionConfig {
        min_occurrences: 2,
        min_priority: 9,
        ..Default::default()
    });
    assert!(strict.detect_patterns(&issues).is_empty());

    let loose = IssueClassifier::new(PatternDetectionConfig {
        min_occurrences: 2,
        ..Default::default()
    });
    let patterns = loose.detect_patterns(&issues);
    assert!(patterns
        .iter()
        .any(|p| p.pattern_id == "pattern-legacy-code-services"));
}

#[test]
fn test_prioritize_keeps_input_order_for_ties() {
    let issues: Vec<Issue> = (1..=3)
        .map(|line| {
            IssueBuilder::new(IssueType::CodeDuplication, IssueCategory::Components)
                .line(line)
                .build()
        })
        .collect();
    let sorted = IssueClassifier::default().prioritize(&issues);
    assert_eq!(sorted, issues);
}

#[test]
fn test_classify_buckets_and_patterns() {
    let mut issues = spread_issues(
        IssueType::UnnecessaryAdapter,
        IssueCategory::Services,
        Severity::Medium,
        3,
    );
    issues.push(
        IssueBuilder::new(IssueType::Architectural, IssueCategory::General)
            .severity(Severity::Critical)
            .build(),
    );
    let classified = IssueClassifier::default().classify(&issues);
    assert_eq!(classified.critical.len(), 1);
    assert_eq!(classified.medium.len(), 3);
    assert_eq!(classified.total(), 4);
    assert!(classified
        .patterns
        .iter()
        .any(|p| p.pattern_id == "pattern-unnecessary-adapter-services"));
}

#[test]
fn test_pattern_statistics_and_similarity_are_public() {
    let classifier = IssueClassifier::default();
    let issues = vec![
        IssueBuilder::new(IssueType::TypeSafety, IssueCategory::Types)
            .effort(EffortLevel::Large)
            .file("a.ts")
            .build(),
        IssueBuilder::new(IssueType::TypeSafety, IssueCategory::Types)
            .effort(EffortLevel::Large)
            .file("a.ts")
            .line(2)
            .build(),
    ];
    let stats = classifier.pattern_statistics(&issues);
    assert_eq!(stats.unique_files, 1);
    assert_eq!(stats.average_effort, EffortLevel::Large);
    assert_eq!(stats.estimated_total_effort, "2 days");

    assert_eq!(
        classifier.description_similarity("Missing error handling", "missing ERROR handling!"),
        1.0
    );
    assert_eq!(classifier.description_similarity("", "anything here"), 0.0);
}

fn arb_issue() -> impl Strategy<Value = Issue> {
    (
        0..IssueType::ALL.len(),
        0..IssueCategory::ALL.len(),
        0..Severity::ALL.len(),
        prop::sample::select(vec![
            EffortLevel::Trivial,
            EffortLevel::Small,
            EffortLevel::Medium,
            EffortLevel::Large,
        ]),
        0usize..5,
        0usize..100,
        0usize..3,
    )
        .prop_map(|(t, c, s, effort, file, line, related)| {
            let mut issue = IssueBuilder::new(IssueType::ALL[t], IssueCategory::ALL[c])
                .severity(Severity::ALL[s])
                .effort(effort)
                .file(&format!("src/file_{file}.ts"))
                .line(line)
                .build();
            issue.related_issues = (0..related).map(|r| format!("rel-{r}")).collect();
            issue
        })
}

proptest! {
    #[test]
    fn prop_prioritize_is_idempotent_and_pure(issues in prop::collection::vec(arb_issue(), 0..40)) {
        let classifier = IssueClassifier::default();
        let before = issues.clone();
        let once = classifier.prioritize(&issues);
        let twice = classifier.prioritize(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(&issues, &before);
        prop_assert_eq!(once.len(), issues.len());
    }

    #[test]
    fn prop_pattern_priorities_in_range(issues in prop::collection::vec(arb_issue(), 0..40)) {
        let patterns = IssueClassifier::default().detect_patterns(&issues);
        for pattern in &patterns {
            prop_assert!((1..=10).contains(&pattern.priority));
            prop_assert_eq!(pattern.occurrences, pattern.related_issues.len());
        }
        prop_assert!(patterns.windows(2).all(|w| w[0].priority >= w[1].priority));
    }
}
