//! Font copying

use crate::assets::{self, AssetError, StepOutput};
use crate::core::SiteConfig;
use tracing::debug;

/// Copy every font file into the output tree, preserving the subtree layout
pub fn copy(config: &SiteConfig) -> Result<StepOutput, AssetError> {
    let sources = assets::expand(config, &config.fonts.src)?;
    let base = config.resolve(assets::glob_base(&config.fonts.src));
    let dest = config.resolve(&config.fonts.dest);

    let mut output = StepOutput::default();
    for path in &sources {
        let out = dest.join(assets::relative_to(path, &base));
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!("copying {}", path.display());
        std::fs::copy(path, &out)?;
        output.push(out);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copies_fonts_preserving_subtree() {
        let temp = TempDir::new().unwrap();
        let fonts = temp.path().join("app/fonts");
        std::fs::create_dir_all(fonts.join("display")).unwrap();
        std::fs::write(fonts.join("body.woff2"), b"woff2 bytes").unwrap();
        std::fs::write(fonts.join("display/heading.woff2"), b"more bytes").unwrap();

        let config = SiteConfig::default().with_root(temp.path());
        let output = copy(&config).unwrap();
        assert_eq!(output.files.len(), 2);

        assert_eq!(
            std::fs::read(temp.path().join("dist/fonts/body.woff2")).unwrap(),
            b"woff2 bytes"
        );
        assert!(temp
            .path()
            .join("dist/fonts/display/heading.woff2")
            .exists());
    }

    #[test]
    fn test_no_fonts_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let config = SiteConfig::default().with_root(temp.path());
        let output = copy(&config).unwrap();
        assert!(output.files.is_empty());
    }
}
