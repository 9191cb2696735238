//! Script bundling and minification
//!
//! Matched sources are concatenated in sorted path order and minified into a
//! single bundle.

use crate::assets::{self, AssetError, StepOutput};
use crate::core::SiteConfig;
use tracing::debug;

/// Bundle and minify all matched scripts into `scripts.bundle`
pub fn bundle(config: &SiteConfig) -> Result<StepOutput, AssetError> {
    let sources = assets::expand(config, &config.scripts.src)?;
    if sources.is_empty() {
        return Ok(StepOutput::default());
    }

    let mut concatenated = String::new();
    for path in &sources {
        debug!("bundling {}", path.display());
        concatenated.push_str(&std::fs::read_to_string(path)?);
        if !concatenated.ends_with('\n') {
            concatenated.push('\n');
        }
    }

    let minified = minifier::js::minify(&concatenated).to_string();

    let dest = config.resolve(&config.scripts.dest);
    std::fs::create_dir_all(&dest)?;
    let out = dest.join(&config.scripts.bundle);
    std::fs::write(&out, minified)?;

    let mut output = StepOutput::default();
    output.push(out);
    Ok(output)
}
