//! SVG minification and sprite generation
//!
//! Icon sources are minified, stripped of presentation attributes so they
//! can be styled from CSS, combined into a single `<symbol>` sprite, and
//! accompanied by an HTML preview page.

use crate::assets::{self, AssetError, StepOutput};
use crate::core::SiteConfig;
use regex::Regex;
use tracing::debug;

const SPRITE_FILE: &str = "sprite.svg";
const PREVIEW_FILE: &str = "symbols.html";

/// Build the icon sprite and its preview page
pub fn sprite(config: &SiteConfig) -> Result<StepOutput, AssetError> {
    let sources = assets::expand(config, &config.svg.src)?;
    if sources.is_empty() {
        return Ok(StepOutput::default());
    }

    let mut symbols = String::new();
    let mut names = Vec::new();
    for path in &sources {
        let raw = std::fs::read_to_string(path)?;
        let minified = minify(&raw);
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let symbol = to_symbol(&minified, &name).ok_or_else(|| {
            AssetError::Svg(format!("not an svg document: {}", path.display()))
        })?;
        debug!("sprited icon-{}", name);
        symbols.push_str(&symbol);
        names.push(name);
    }

    let dest = config.resolve(&config.svg.dest);
    std::fs::create_dir_all(&dest)?;

    let sprite_path = dest.join(SPRITE_FILE);
    std::fs::write(
        &sprite_path,
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" style=\"display:none\">{}</svg>\n",
            symbols
        ),
    )?;

    let preview_path = dest.join(PREVIEW_FILE);
    std::fs::write(&preview_path, preview_page(&names))?;

    let mut output = StepOutput::default();
    output.push(sprite_path);
    output.push(preview_path);
    Ok(output)
}

/// Strip the xml declaration, comments, presentation attributes, and
/// inter-tag whitespace.
fn minify(source: &str) -> String {
    let declaration = Regex::new(r"<\?xml[^>]*\?>").unwrap();
    let comments = Regex::new(r"(?s)<!--.*?-->").unwrap();
    let presentation = Regex::new(r#"\s(?:fill|stroke|style)=("[^"]*"|'[^']*')"#).unwrap();
    let between_tags = Regex::new(r">\s+<").unwrap();

    let out = declaration.replace_all(source, "");
    let out = comments.replace_all(&out, "");
    let out = presentation.replace_all(&out, "");
    let out = between_tags.replace_all(&out, "><");
    out.trim().to_string()
}

/// Rewrap an `<svg>` document as a `<symbol>` carrying its viewBox
fn to_symbol(svg: &str, name: &str) -> Option<String> {
    let open = svg.find("<svg")?;
    let open_end = open + svg[open..].find('>')? + 1;
    let close = svg.rfind("</svg>")?;
    if close < open_end {
        return None;
    }
    let content = &svg[open_end..close];

    let view_box = Regex::new(r#"viewBox="([^"]*)""#)
        .unwrap()
        .captures(&svg[open..open_end])
        .map(|c| c[1].to_string());

    Some(match view_box {
        Some(vb) => format!("<symbol id=\"icon-{name}\" viewBox=\"{vb}\">{content}</symbol>"),
        None => format!("<symbol id=\"icon-{name}\">{content}</symbol>"),
    })
}

/// Preview page listing every generated symbol
fn preview_page(names: &[String]) -> String {
    let mut items = String::new();
    for name in names {
        items.push_str(&format!(
            "    <li><svg class=\"icon\"><use href=\"{SPRITE_FILE}#icon-{name}\"></use></svg><code>icon-{name}</code></li>\n"
        ));
    }
    format!(
        "<!doctype html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>Icon symbols</title>\n  <style>\n    body {{ font-family: sans-serif; }}\n    .icon {{ width: 32px; height: 32px; fill: currentColor; }}\n    li {{ display: flex; align-items: center; gap: 8px; margin: 8px 0; }}\n  </style>\n</head>\n<body>\n  <h1>Icon symbols</h1>\n  <ul>\n{items}  </ul>\n</body>\n</html>\n"
    )
}
