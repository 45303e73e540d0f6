//! Multi-file analysis
//!
//! Files are parsed and analyzed independently, in parallel on the rayon
//! pool unless [`EngineOptions::parallel`] is off. Each file gets its own
//! [`AnalysisContext`]. The per-file type registries are merged in input
//! order before the cross-file type pass runs once over the merged result.

pub mod collection;
pub mod metrics;

pub use collection::{aggregate_issues, IssueCollection};
pub use metrics::{average_time_per_file, slowest_file, FileFailure, FileMetrics};

use crate::analyzers::typescript::parser::parse_file;
use crate::analyzers::{
    default_analyzers, AnalysisContext, PatternAnalyzer, TypePatternAnalyzer, TypeRegistry,
};
use crate::classifier::IssueClassifier;
use crate::config::EngineOptions;
use crate::core::{ClassifiedIssues, FileInfo, Issue, JsLanguageVariant};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// A file handed to the engine by the caller's scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub info: FileInfo,
    pub content: String,
}

impl SourceFile {
    pub fn new(info: FileInfo, content: impl Into<String>) -> Self {
        Self {
            info,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_files: usize,
    pub analyzed_files: usize,
    pub total_issues: usize,
    pub issues: IssueCollection,
    pub failures: Vec<FileFailure>,
    pub file_metrics: Vec<FileMetrics>,
    pub duration: Duration,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn slowest_file(&self) -> Option<&FileMetrics> {
        slowest_file(&self.file_metrics)
    }

    pub fn average_time_per_file(&self) -> Duration {
        average_time_per_file(&self.file_metrics)
    }

    pub fn classify(&self, classifier: &IssueClassifier) -> ClassifiedIssues {
        classifier.classify(self.issues.issues())
    }
}

/// What one file contributed to the run
struct FileReport {
    issues: Vec<Issue>,
    context: AnalysisContext,
    metrics: FileMetrics,
}

pub struct AnalysisEngine {
    analyzers: Vec<Box<dyn PatternAnalyzer>>,
    options: EngineOptions,
}

impl AnalysisEngine {
    pub fn new(analyzers: Vec<Box<dyn PatternAnalyzer>>, options: EngineOptions) -> Self {
        Self { analyzers, options }
    }

    /// Adapter, component and type detectors
    pub fn with_default_analyzers(options: EngineOptions) -> Self {
        Self::new(default_analyzers(), options)
    }

    pub fn analyzers(&self) -> &[Box<dyn PatternAnalyzer>] {
        &self.analyzers
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn analyze(&self, files: &[SourceFile]) -> Result<AnalysisResult> {
        self.options.validate().map_err(Error::Configuration)?;
        let start = Instant::now();
        log::info!(
            "Analyzing {} file(s) with {} analyzer(s)",
            files.len(),
            self.analyzers.len()
        );

        let outcomes: Vec<std::result::Result<FileReport, FileFailure>> = if self.options.parallel
        {
            files.par_iter().map(|file| self.analyze_file(file)).collect()
        } else {
            files.iter().map(|file| self.analyze_file(file)).collect()
        };

        let mut issues = Vec::new();
        let mut registry = TypeRegistry::new();
        let mut failures: Vec<FileFailure> = Vec::new();
        let mut file_metrics = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(report) => {
                    if report.metrics.is_slow() {
                        log::warn!(
                            "Slow file: {} ({} ms)",
                            report.metrics.file,
                            report.metrics.total_time.as_millis()
                        );
                    }
                    issues.extend(report.issues);
                    registry.merge(report.context.types);
                    file_metrics.push(report.metrics);
                }
                Err(failure) => {
                    log::warn!("Error analyzing {}: {}", failure.file, failure.message);
                    let file = failure.file.clone();
                    failures.push(failure);
                    if let Some(max) = self.options.max_errors {
                        if failures.len() >= max {
                            return Err(Error::Analysis(format!(
                                "Analysis stopped after {} errors. Last error: {file}",
                                failures.len()
                            )));
                        }
                    }
                    if !self.options.continue_on_error {
                        return Err(Error::Analysis(format!("Analysis failed on file: {file}")));
                    }
                }
            }
        }

        if self.runs_type_patterns() {
            issues.extend(TypePatternAnalyzer::new().detect_type_inconsistencies(&registry));
        }

        let duration = start.elapsed();
        log::info!(
            "Analyzed {}/{} file(s): {} issue(s), {} failure(s) in {} ms",
            file_metrics.len(),
            files.len(),
            issues.len(),
            failures.len(),
            duration.as_millis()
        );

        Ok(AnalysisResult {
            total_files: files.len(),
            analyzed_files: file_metrics.len(),
            total_issues: issues.len(),
            issues: aggregate_issues(issues),
            failures,
            file_metrics,
            duration,
            analyzed_at: Utc::now(),
        })
    }

    fn runs_type_patterns(&self) -> bool {
        self.analyzers
            .iter()
            .any(|a| a.name() == TypePatternAnalyzer::NAME)
    }

    fn analyze_file(&self, file: &SourceFile) -> std::result::Result<FileReport, FileFailure> {
        let info = &file.info;
        let failure = |message: String| FileFailure {
            file: info.relative_path.clone(),
            message,
        };

        if JsLanguageVariant::from_extension(&info.extension).is_none() {
            return Err(failure(format!(
                "unsupported file extension '{}'",
                info.extension
            )));
        }

        let started = Instant::now();
        let ast = parse_file(&file.content, &info.path)
            .map_err(|e| Error::parse(&info.path, format!("{e:#}")))
            .map_err(|e| failure(e.to_string()))?;
        let parse_time = started.elapsed();

        let analysis_started = Instant::now();
        let mut context = AnalysisContext::new();
        let mut issues = Vec::new();
        let mut analyzers_run = 0;
        for analyzer in self.analyzers.iter().filter(|a| a.supports(info.category)) {
            issues.extend(analyzer.analyze(info, &ast, &mut context));
            analyzers_run += 1;
        }
        if analyzers_run == 0 {
            log::debug!(
                "No analyzer handles {} files; skipped {}",
                info.category,
                info.relative_path
            );
        }

        Ok(FileReport {
            metrics: FileMetrics {
                file: info.relative_path.clone(),
                parse_time,
                analysis_time: analysis_started.elapsed(),
                total_time: started.elapsed(),
                issues_found: issues.len(),
                analyzers_run,
            },
            issues,
            context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FileCategory, IssueType};

    fn source(path: &str, category: FileCategory, content: &str) -> SourceFile {
        SourceFile::new(FileInfo::new(path, path, category), content)
    }

    #[test]
    fn test_cross_file_types_use_input_order() {
        let files = vec![
            source("a/types.ts", FileCategory::Type, "export interface User { id: string }"),
            source("b/types.ts", FileCategory::Type, "export interface User { id: string }"),
        ];
        let engine = AnalysisEngine::with_default_analyzers(EngineOptions::default());
        let result = engine.analyze(&files).unwrap();
        let duplicates: Vec<_> = result
            .issues
            .issues()
            .iter()
            .filter(|i| i.issue_type == IssueType::CodeDuplication)
            .map(|i| i.file.as_str())
            .collect();
        assert_eq!(duplicates, vec!["a/types.ts", "b/types.ts"]);
        assert_eq!(result.analyzed_files, 2);
        assert_eq!(result.file_metrics[0].analyzers_run, 1);
    }

    #[test]
    fn test_failures_respect_options() {
        let files = vec![
            source("styles.css", FileCategory::Other, "body {}"),
            source("ok.ts", FileCategory::Util, "export const x = 1;"),
        ];

        let lenient = AnalysisEngine::with_default_analyzers(EngineOptions::sequential());
        let result = lenient.analyze(&files).unwrap();
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].file, "styles.css");
        assert_eq!(result.analyzed_files, 1);

        let strict = AnalysisEngine::with_default_analyzers(EngineOptions {
            continue_on_error: false,
            ..EngineOptions::default()
        });
        assert!(matches!(strict.analyze(&files), Err(Error::Analysis(_))));

        let capped = AnalysisEngine::with_default_analyzers(EngineOptions {
            max_errors: Some(1),
            ..EngineOptions::default()
        });
        let err = capped.analyze(&files).unwrap_err();
        assert!(err.to_string().contains("stopped after 1 errors"));
    }
}
