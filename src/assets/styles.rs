//! Stylesheet compilation with lightningcss
//!
//! The entry stylesheet is bundled (`@import` resolution), lowered and
//! vendor-prefixed for the browser targets, minified, and written with an
//! external source map.

use crate::assets::{AssetError, StepOutput};
use crate::core::SiteConfig;
use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;

const fn browser_version(major: u32, minor: u32) -> u32 {
    (major << 16) | (minor << 8)
}

/// Browser targets driving vendor prefixing and syntax lowering
fn browser_targets() -> Targets {
    Targets::from(Browsers {
        chrome: Some(browser_version(109, 0)),
        edge: Some(browser_version(109, 0)),
        firefox: Some(browser_version(109, 0)),
        safari: Some(browser_version(15, 6)),
        ios_saf: Some(browser_version(15, 6)),
        ..Browsers::default()
    })
}

/// Compile the entry stylesheet into `<stem>.min.css` plus a source map
pub fn compile(config: &SiteConfig) -> Result<StepOutput, AssetError> {
    let entry = config.resolve(&config.styles.entry);
    let stem = entry
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("main")
        .to_string();

    let provider = FileProvider::new();
    let mut bundler = Bundler::new(&provider, None, ParserOptions::default());
    let mut stylesheet = bundler
        .bundle(&entry)
        .map_err(|e| AssetError::Style(e.to_string()))?;

    let targets = browser_targets();
    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| AssetError::Style(e.to_string()))?;

    let mut source_map = SourceMap::new("/");
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            source_map: Some(&mut source_map),
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| AssetError::Style(e.to_string()))?;

    let dest = config.resolve(&config.styles.dest);
    std::fs::create_dir_all(&dest)?;

    let map_name = format!("{stem}.min.css.map");
    let map_json = source_map
        .to_json(None)
        .map_err(|e| AssetError::Style(e.to_string()))?;
    let map_path = dest.join(&map_name);
    std::fs::write(&map_path, map_json)?;

    let css_path = dest.join(format!("{stem}.min.css"));
    let css = format!("{}\n/*# sourceMappingURL={} */\n", result.code, map_name);
    std::fs::write(&css_path, css)?;

    let mut output = StepOutput::default();
    output.push(css_path);
    output.push(map_path);
    Ok(output)
}
