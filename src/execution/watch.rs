//! Watch mode - re-runs steps when their inputs change
//!
//! Bindings from input glob to step are derived from the configuration once
//! at startup. Rapid successive change events are coalesced by the debounce
//! window; the steps matched by a batch run sequentially inside the watch
//! task, so reruns of a step never race with themselves.

use crate::core::{SiteConfig, Step, StepKind};
use crate::execution::BuildEngine;
use glob::Pattern;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Association between an input glob and the step it re-triggers
pub struct WatchBinding {
    pattern: Pattern,
    step: StepKind,
}

impl WatchBinding {
    pub fn step(&self) -> StepKind {
        self.step
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.pattern.matches_path(path)
    }
}

/// Build the watch bindings from the configuration
pub fn bindings(config: &SiteConfig) -> Result<Vec<WatchBinding>, glob::PatternError> {
    Step::watched(config)
        .into_iter()
        .map(|step| {
            // Step::watched only yields steps with a watch glob
            let glob = step.watch.unwrap_or_else(|| step.input.clone());
            Pattern::new(&glob).map(|pattern| WatchBinding {
                pattern,
                step: step.kind,
            })
        })
        .collect()
}

/// Steps triggered by a batch of changed paths, deduplicated in binding order
pub fn triggered_steps<'a, I>(bindings: &[WatchBinding], changed: I) -> Vec<StepKind>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut steps = Vec::new();
    for path in changed {
        for binding in bindings {
            if binding.matches(path) && !steps.contains(&binding.step) {
                steps.push(binding.step);
            }
        }
    }
    steps
}

/// Watch the source tree and re-run matched steps until the process ends
pub async fn watch(engine: Arc<BuildEngine>, config: Arc<SiteConfig>) -> anyhow::Result<()> {
    let bindings = bindings(&config)?;
    let source_root = config.source_path();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut debouncer = new_debouncer(
        Duration::from_millis(config.watch.debounce_ms),
        move |result: DebounceEventResult| {
            let _ = tx.send(result);
        },
    )?;
    debouncer
        .watcher()
        .watch(&source_root, RecursiveMode::Recursive)?;

    info!("watching {} for changes", source_root.display());

    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                let changed: Vec<&Path> = events
                    .iter()
                    .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                    .map(|e| {
                        e.path
                            .strip_prefix(&config.root)
                            .unwrap_or(e.path.as_path())
                    })
                    .collect();

                for path in &changed {
                    debug!("changed: {}", path.display());
                }

                for step in triggered_steps(&bindings, changed) {
                    engine.run_step(step).await;
                }
            }
            Err(e) => warn!("watch error: {}", e),
        }
    }

    Ok(())
}
