//! Asset transformations
//!
//! One module per build step. Each transformation is a plain function from
//! the project configuration to written output files; the engine decides
//! when and with what concurrency they run.

pub mod fonts;
pub mod images;
pub mod scripts;
pub mod styles;
pub mod svg;
pub mod templates;

use crate::core::{SiteConfig, StepKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error raised by an asset transformation
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("stylesheet compilation failed: {0}")]
    Style(String),

    #[error("svg processing failed: {0}")]
    Svg(String),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Files written by a transformation
#[derive(Debug, Default)]
pub struct StepOutput {
    pub files: Vec<PathBuf>,
}

impl StepOutput {
    pub fn push(&mut self, path: PathBuf) {
        self.files.push(path);
    }
}

/// Run the transformation for a step
pub fn run(kind: StepKind, config: &SiteConfig) -> Result<StepOutput, AssetError> {
    match kind {
        StepKind::Templates => templates::render(config),
        StepKind::Styles => styles::compile(config),
        StepKind::Scripts => scripts::bundle(config),
        StepKind::Images => images::process(config),
        StepKind::Fonts => fonts::copy(config),
        StepKind::Svg => svg::sprite(config),
    }
}

/// Expand a config-relative glob into a sorted list of matching files
pub(crate) fn expand(config: &SiteConfig, pattern: &str) -> Result<Vec<PathBuf>, AssetError> {
    let absolute = config.resolve_pattern(pattern);
    let mut files = Vec::new();
    for entry in glob::glob(&absolute)? {
        let path = entry.map_err(|e| AssetError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Static directory prefix of a glob pattern ("app/img/**/*" -> "app/img")
pub(crate) fn glob_base(pattern: &str) -> &str {
    match pattern.find(['*', '?', '[']) {
        Some(meta) => match pattern[..meta].rfind('/') {
            Some(slash) => &pattern[..slash],
            None => "",
        },
        // No wildcard: the pattern names a file, its parent is the base
        None => match pattern.rfind('/') {
            Some(slash) => &pattern[..slash],
            None => "",
        },
    }
}

/// Path of `path` relative to `base`; falls back to the file name when the
/// prefix does not match.
pub(crate) fn relative_to<'a>(path: &'a Path, base: &Path) -> &'a Path {
    match path.strip_prefix(base) {
        Ok(relative) => relative,
        Err(_) => Path::new(path.file_name().unwrap_or(path.as_os_str())),
    }
}
