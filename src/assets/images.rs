//! Raster image recompression
//!
//! PNG and JPEG sources are decoded and re-encoded with aggressive encoder
//! settings; everything else under the image tree is copied through
//! unchanged, preserving the subtree layout.

use crate::assets::{self, AssetError, StepOutput};
use crate::core::SiteConfig;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

const JPEG_QUALITY: u8 = 80;

/// Recompress or copy every file under the image tree
pub fn process(config: &SiteConfig) -> Result<StepOutput, AssetError> {
    let sources = assets::expand(config, &config.images.src)?;
    let base = config.resolve(assets::glob_base(&config.images.src));
    let dest = config.resolve(&config.images.dest);

    let mut output = StepOutput::default();
    for path in &sources {
        let out = dest.join(assets::relative_to(path, &base));
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match extension(path) {
            Some("png") => recompress_png(path, &out)?,
            Some("jpg") | Some("jpeg") => recompress_jpeg(path, &out)?,
            _ => {
                debug!("copying {}", path.display());
                std::fs::copy(path, &out)?;
            }
        }
        output.push(out);
    }

    Ok(output)
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn recompress_png(path: &Path, out: &Path) -> Result<(), AssetError> {
    debug!("recompressing png {}", path.display());
    let img = image::open(path)?;
    let rgba = img.to_rgba8();
    let writer = BufWriter::new(File::create(out)?);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(&rgba, rgba.width(), rgba.height(), ColorType::Rgba8)?;
    Ok(())
}

fn recompress_jpeg(path: &Path, out: &Path) -> Result<(), AssetError> {
    debug!("recompressing jpeg {}", path.display());
    let img = image::open(path)?;
    let rgb = img.to_rgb8();
    let mut writer = BufWriter::new(File::create(out)?);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder.encode(&rgb, rgb.width(), rgb.height(), ColorType::Rgb8)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_recompresses_png_and_preserves_subtree() {
        let temp = TempDir::new().unwrap();
        let icons = temp.path().join("app/img/icons");
        std::fs::create_dir_all(&icons).unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255]));
        img.save(temp.path().join("app/img/logo.png")).unwrap();
        std::fs::write(icons.join("star.svg"), "<svg></svg>").unwrap();

        let config = SiteConfig::default().with_root(temp.path());
        let output = process(&config).unwrap();
        assert_eq!(output.files.len(), 2);

        let logo = temp.path().join("dist/img/logo.png");
        assert!(logo.exists());
        let reopened = image::open(&logo).unwrap().to_rgba8();
        assert_eq!(reopened.dimensions(), (4, 4));
        assert_eq!(reopened.get_pixel(0, 0), &Rgba([200, 10, 10, 255]));

        // Non-raster files are copied through, keeping their subtree
        assert!(temp.path().join("dist/img/icons/star.svg").exists());
    }

    #[test]
    fn test_corrupt_image_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("app/img")).unwrap();
        std::fs::write(temp.path().join("app/img/broken.png"), b"not a png").unwrap();

        let config = SiteConfig::default().with_root(temp.path());
        assert!(matches!(process(&config), Err(AssetError::Image(_))));
    }
}
