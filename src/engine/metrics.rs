//! Per-file timing and failure records

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Files slower than this are logged
pub const SLOW_FILE_THRESHOLD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub file: String,
    pub parse_time: Duration,
    pub analysis_time: Duration,
    pub total_time: Duration,
    pub issues_found: usize,
    pub analyzers_run: usize,
}

impl FileMetrics {
    pub fn is_slow(&self) -> bool {
        self.total_time > SLOW_FILE_THRESHOLD
    }
}

/// A file that produced no analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

/// First file with the longest total time
pub fn slowest_file(metrics: &[FileMetrics]) -> Option<&FileMetrics> {
    let mut slowest: Option<&FileMetrics> = None;
    for metric in metrics {
        if slowest.map_or(true, |s| metric.total_time > s.total_time) {
            slowest = Some(metric);
        }
    }
    slowest
}

/// Mean total time per analyzed file, zero when nothing was analyzed
pub fn average_time_per_file(metrics: &[FileMetrics]) -> Duration {
    if metrics.is_empty() {
        return Duration::ZERO;
    }
    let total: Duration = metrics.iter().map(|m| m.total_time).sum();
    total / metrics.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(file: &str, millis: u64) -> FileMetrics {
        FileMetrics {
            file: file.to_string(),
            parse_time: Duration::ZERO,
            analysis_time: Duration::from_millis(millis),
            total_time: Duration::from_millis(millis),
            issues_found: 0,
            analyzers_run: 1,
        }
    }

    #[test]
    fn test_slowest_and_average() {
        let metrics = vec![metric("a.ts", 10), metric("b.ts", 30), metric("c.ts", 30)];
        assert_eq!(slowest_file(&metrics).unwrap().file, "b.ts");
        assert_eq!(average_time_per_file(&metrics), Duration::from_nanos(23_333_333));
        assert!(slowest_file(&[]).is_none());
        assert_eq!(average_time_per_file(&[]), Duration::ZERO);
    }

    #[test]
    fn test_slow_threshold() {
        assert!(!metric("a.ts", 1000).is_slow());
        assert!(metric("a.ts", 1001).is_slow());
    }
}
