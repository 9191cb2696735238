//! CLI output formatting

use crate::core::{BuildReport, StepKind, StepStatus};
use crate::execution::BuildEvent;
use console::Emoji;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a build event for display
pub fn format_build_event(event: &BuildEvent) -> String {
    match event {
        BuildEvent::PipelineStarted { steps } => {
            format!(
                "{} Building site ({} steps)",
                ROCKET,
                style(steps).cyan()
            )
        }
        BuildEvent::StepStarted { step } => format!("{} {}", SPINNER, style(step).cyan()),
        BuildEvent::StepCompleted {
            step,
            files_written,
            duration,
        } => format!(
            "{} {} ({} {}, {})",
            CHECK,
            style(step).green(),
            files_written,
            if *files_written == 1 { "file" } else { "files" },
            style(format_duration(*duration)).dim()
        ),
        BuildEvent::StepFailed { step, title, error } => notification(title, *step, error),
        BuildEvent::PipelineCompleted { success, duration } => {
            if *success {
                format!(
                    "{} Build {} in {}",
                    CHECK,
                    style("succeeded").green(),
                    format_duration(*duration)
                )
            } else {
                format!(
                    "{} Build {} in {}",
                    CROSS,
                    style("finished with failures").red(),
                    format_duration(*duration)
                )
            }
        }
    }
}

/// Console notification block naming the failing step and the error text
pub fn notification(title: &str, step: StepKind, error: &str) -> String {
    format!(
        "{} {} {}\n    {}",
        CROSS,
        style(title).red().bold(),
        style(format!("({})", step)).dim(),
        style(error).red()
    )
}

/// Format a per-step summary of a pipeline run
pub fn format_report(report: &BuildReport) -> String {
    let mut lines = Vec::new();
    for step in &report.steps {
        let line = match step.status {
            StepStatus::Completed => format!(
                "  {} {} ({} files, {})",
                CHECK,
                style(step.step).green(),
                step.files_written,
                style(format_duration(step.duration)).dim()
            ),
            StepStatus::Failed => format!(
                "  {} {} {}",
                CROSS,
                style(step.step).red(),
                style(step.error.as_deref().unwrap_or("unknown error")).dim()
            ),
        };
        lines.push(line);
    }
    lines.join("\n")
}

/// Format a duration for display
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
