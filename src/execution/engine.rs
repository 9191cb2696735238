//! Build engine - orchestrates step and pipeline execution

use crate::assets;
use crate::core::{default_pipeline, BuildReport, PipelineNode, SiteConfig, StepKind, StepReport};
use futures_util::future::{join_all, BoxFuture, FutureExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info};

/// Events emitted on the uniform notification channel during a build
#[derive(Debug, Clone)]
pub enum BuildEvent {
    PipelineStarted {
        steps: usize,
    },
    StepStarted {
        step: StepKind,
    },
    StepCompleted {
        step: StepKind,
        files_written: usize,
        duration: Duration,
    },
    /// A step failed; `title` names the failing step for the notification
    StepFailed {
        step: StepKind,
        title: &'static str,
        error: String,
    },
    PipelineCompleted {
        success: bool,
        duration: Duration,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(BuildEvent) + Send + Sync>;

/// Fatal engine errors that abort a build before any step runs
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to clean output root {path}: {source}")]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build engine.
///
/// Step failures are captured in reports and surfaced as events; they never
/// abort a pipeline or a watch/serve session. Only [`BuildEngine::clean`]
/// failures are fatal.
pub struct BuildEngine {
    config: Arc<SiteConfig>,
    handlers: Vec<EventHandler>,
}

impl BuildEngine {
    pub fn new(config: Arc<SiteConfig>) -> Self {
        Self {
            config,
            handlers: Vec::new(),
        }
    }

    /// Register an event handler. Handlers are registered before the engine
    /// is shared and called in registration order.
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(BuildEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    fn emit(&self, event: BuildEvent) {
        for handler in &self.handlers {
            handler(event.clone());
        }
    }

    /// Run a single step to completion, capturing failure in the report
    pub async fn run_step(&self, kind: StepKind) -> StepReport {
        info!("running step: {}", kind);
        self.emit(BuildEvent::StepStarted { step: kind });

        let config = Arc::clone(&self.config);
        let started_at = chrono::Utc::now();
        let started = Instant::now();
        let result = tokio::task::spawn_blocking(move || assets::run(kind, &config)).await;
        let duration = started.elapsed();

        let report = match result {
            Ok(Ok(output)) => {
                StepReport::success(kind, output.files.len(), started_at, duration)
            }
            Ok(Err(e)) => StepReport::failure(kind, e.to_string(), started_at, duration),
            Err(e) => StepReport::failure(
                kind,
                format!("step task panicked: {e}"),
                started_at,
                duration,
            ),
        };

        match &report.error {
            None => self.emit(BuildEvent::StepCompleted {
                step: kind,
                files_written: report.files_written,
                duration,
            }),
            Some(message) => {
                error!("step {} failed: {}", kind, message);
                self.emit(BuildEvent::StepFailed {
                    step: kind,
                    title: kind.title(),
                    error: message.clone(),
                });
            }
        }

        report
    }

    /// Execute a pipeline tree honoring its declared ordering.
    ///
    /// Sequential children run one after another; a child's writes are
    /// durable before the next child starts. Parallel children run
    /// concurrently and are all joined; a failing sibling never cancels the
    /// others.
    pub fn run_pipeline<'a>(&'a self, node: &'a PipelineNode) -> BoxFuture<'a, BuildReport> {
        async move {
            let mut report = BuildReport::default();
            match node {
                PipelineNode::Step(kind) => {
                    report.push(self.run_step(*kind).await);
                }
                PipelineNode::Sequence(children) => {
                    for child in children {
                        report.extend(self.run_pipeline(child).await);
                    }
                }
                PipelineNode::Parallel(children) => {
                    let branches =
                        join_all(children.iter().map(|child| self.run_pipeline(child))).await;
                    for branch in branches {
                        report.extend(branch);
                    }
                }
            }
            report
        }
        .boxed()
    }

    /// Delete the output root. A missing root is not an error; anything else
    /// is fatal.
    pub async fn clean(&self) -> Result<(), EngineError> {
        let path = self.config.output_path();
        info!("cleaning {}", path.display());
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(EngineError::Clean { path, source }),
        }
    }

    /// The default startup sequence: clean, then the default pipeline
    pub async fn build(&self) -> Result<BuildReport, EngineError> {
        let pipeline = default_pipeline();
        let started = Instant::now();
        self.emit(BuildEvent::PipelineStarted {
            steps: pipeline.steps().len(),
        });

        self.clean().await?;
        let report = self.run_pipeline(&pipeline).await;

        self.emit(BuildEvent::PipelineCompleted {
            success: report.is_success(),
            duration: started.elapsed(),
        });
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StepStatus;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn fixture(temp: &TempDir) -> Arc<SiteConfig> {
        write(
            temp.path(),
            "app/templates/pages/index.html",
            "<h1>{{ site_name }}</h1>",
        );
        write(temp.path(), "app/css/main.css", "body { margin: 0; }");
        write(temp.path(), "app/js/app.js", "function main() {}");
        write(
            temp.path(),
            "app/img/icons/star.svg",
            "<svg viewBox=\"0 0 16 16\"><path d=\"M1 1\"/></svg>",
        );
        std::fs::create_dir_all(temp.path().join("app/fonts")).unwrap();
        std::fs::write(temp.path().join("app/fonts/body.woff2"), b"bytes").unwrap();

        let mut config = SiteConfig::default().with_root(temp.path());
        config.variables.insert(
            "site_name".to_string(),
            serde_yaml::Value::String("Test".to_string()),
        );
        Arc::new(config)
    }

    #[tokio::test]
    async fn test_run_step_reports_success() {
        let temp = TempDir::new().unwrap();
        let engine = BuildEngine::new(fixture(&temp));

        let report = engine.run_step(StepKind::Fonts).await;
        assert_eq!(report.status, StepStatus::Completed);
        assert_eq!(report.files_written, 1);
        assert!(temp.path().join("dist/fonts/body.woff2").exists());
    }

    #[tokio::test]
    async fn test_run_step_captures_failure_and_emits_titled_event() {
        let temp = TempDir::new().unwrap();
        let config = fixture(&temp);
        write(temp.path(), "app/css/main.css", ".card { color:: red; }");

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut engine = BuildEngine::new(config);
        engine.add_event_handler(move |event| sink.lock().unwrap().push(event));

        let report = engine.run_step(StepKind::Styles).await;
        assert_eq!(report.status, StepStatus::Failed);
        assert!(report.error.is_some());

        let events = events.lock().unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            BuildEvent::StepFailed { title: "Style", .. }
        )));
    }

    #[tokio::test]
    async fn test_build_runs_every_step_and_cleans_stale_output() {
        let temp = TempDir::new().unwrap();
        let config = fixture(&temp);
        write(temp.path(), "dist/stale.txt", "left over");

        let engine = BuildEngine::new(config);
        let report = engine.build().await.unwrap();

        assert!(report.is_success(), "failures: {:?}", report.failed());
        assert_eq!(report.steps.len(), StepKind::ALL.len());
        assert!(!temp.path().join("dist/stale.txt").exists());
        assert!(temp.path().join("dist/index.html").exists());
        assert!(temp.path().join("dist/css/main.min.css").exists());
        assert!(temp.path().join("dist/js/app.min.js").exists());
        assert!(temp.path().join("dist/img/icons/sprite.svg").exists());
        assert!(temp.path().join("dist/fonts/body.woff2").exists());
    }

    #[tokio::test]
    async fn test_parallel_sibling_failure_does_not_stop_others() {
        let temp = TempDir::new().unwrap();
        let config = fixture(&temp);
        write(temp.path(), "app/css/main.css", "}{ definitely not css");

        let engine = BuildEngine::new(config);
        let report = engine.build().await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failed().len(), 1);
        assert_eq!(report.failed()[0].step, StepKind::Styles);
        // Parallel siblings still completed and wrote their output
        assert!(temp.path().join("dist/index.html").exists());
        assert!(temp.path().join("dist/js/app.min.js").exists());
        assert!(!temp.path().join("dist/css/main.min.css").exists());
    }
}
