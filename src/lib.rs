//! sitepipe - a static-site asset pipeline
//!
//! Builds a static site from a fixed source tree into an output root:
//! template rendering, stylesheet compilation, script bundling, image and
//! SVG processing, font copying - plus watch mode and a live-reloading dev
//! server.

pub mod assets;
pub mod cli;
pub mod core;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{
    default_pipeline, BuildReport, PipelineNode, SiteConfig, Step, StepKind, StepReport,
    StepStatus,
};
pub use crate::execution::{BuildEngine, BuildEvent, EngineError};
