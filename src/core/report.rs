//! Build result models

use crate::core::step::StepKind;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of a single step invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Failed,
}

/// Report for a single step invocation
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: StepKind,
    pub status: StepStatus,

    /// Number of output files written
    pub files_written: usize,

    pub started_at: DateTime<Utc>,
    pub duration: Duration,

    /// Error text when the step failed
    pub error: Option<String>,
}

impl StepReport {
    pub fn success(
        step: StepKind,
        files_written: usize,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            step,
            status: StepStatus::Completed,
            files_written,
            started_at,
            duration,
            error: None,
        }
    }

    pub fn failure(
        step: StepKind,
        error: String,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            step,
            status: StepStatus::Failed,
            files_written: 0,
            started_at,
            duration,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Completed
    }
}

/// Aggregate report for a pipeline run
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub steps: Vec<StepReport>,
}

impl BuildReport {
    pub fn push(&mut self, report: StepReport) {
        self.steps.push(report);
    }

    pub fn extend(&mut self, other: BuildReport) {
        self.steps.extend(other.steps);
    }

    /// Reports for steps that failed
    pub fn failed(&self) -> Vec<&StepReport> {
        self.steps.iter().filter(|s| !s.is_success()).collect()
    }

    /// Whether every step completed
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(StepReport::is_success)
    }

    /// Total number of output files written across all steps
    pub fn files_written(&self) -> usize {
        self.steps.iter().map(|s| s.files_written).sum()
    }

    /// Report for a given step, if it ran
    pub fn step(&self, kind: StepKind) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_success() {
        assert!(BuildReport::default().is_success());
    }

    #[test]
    fn test_failed_step_fails_the_report() {
        let mut report = BuildReport::default();
        report.push(StepReport::success(
            StepKind::Fonts,
            3,
            Utc::now(),
            Duration::from_millis(5),
        ));
        report.push(StepReport::failure(
            StepKind::Styles,
            "unexpected token".to_string(),
            Utc::now(),
            Duration::from_millis(2),
        ));

        assert!(!report.is_success());
        assert_eq!(report.failed().len(), 1);
        assert_eq!(report.failed()[0].step, StepKind::Styles);
        assert_eq!(report.files_written(), 3);
        assert!(report.step(StepKind::Fonts).unwrap().is_success());
        assert!(report.step(StepKind::Svg).is_none());
    }
}
