//! Page rendering with Tera

use crate::assets::{AssetError, StepOutput};
use crate::core::SiteConfig;
use std::path::Path;
use tera::{Context, Tera};
use tracing::debug;

/// Render every page template into the output root.
///
/// The whole template tree is loaded so pages can extend layouts and include
/// partials; only templates under `pages/` produce output files.
pub fn render(config: &SiteConfig) -> Result<StepOutput, AssetError> {
    let tera = Tera::new(&config.resolve_pattern(&config.templates.src))?;

    let mut context = Context::new();
    for (key, value) in &config.variables {
        context.insert(key.as_str(), value);
    }

    let dest = config.resolve(&config.templates.dest);
    std::fs::create_dir_all(&dest)?;

    let mut names: Vec<String> = tera
        .get_template_names()
        .filter(|name| name.starts_with("pages/"))
        .map(str::to_owned)
        .collect();
    names.sort();

    let mut output = StepOutput::default();
    for name in names {
        let html = tera.render(&name, &context)?;
        let file_name = Path::new(&name)
            .file_name()
            .unwrap_or_else(|| Path::new(&name).as_os_str());
        let out = dest.join(file_name);
        debug!("rendered {} -> {}", name, out.display());
        std::fs::write(&out, html)?;
        output.push(out);
    }

    Ok(output)
}
