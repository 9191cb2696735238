//! Shared fixtures for integration tests

#![allow(dead_code)]

use sitepipe::core::SiteConfig;
use std::path::Path;

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Build a small but complete source tree and return its configuration
pub fn fixture(root: &Path) -> SiteConfig {
    write(
        root,
        "app/templates/layout.html",
        "<!doctype html>\n<html>\n<head>\n  <title>{% block title %}{{ site_name }}{% endblock %}</title>\n  <link rel=\"stylesheet\" href=\"css/main.min.css\">\n</head>\n<body>\n{% block content %}{% endblock %}\n<script src=\"js/app.min.js\"></script>\n</body>\n</html>\n",
    );
    write(
        root,
        "app/templates/pages/index.html",
        "{% extends \"layout.html\" %}\n{% block content %}\n<svg class=\"icon\"><use href=\"img/icons/sprite.svg#icon-star\"></use></svg>\n<p>Welcome to {{ site_name }}</p>\n{% endblock %}\n",
    );
    write(root, "app/css/base.css", "body {\n  margin: 0;\n}\n");
    write(
        root,
        "app/css/main.css",
        "@import \"base.css\";\n\n.icon {\n  width: 16px;\n  height: 16px;\n}\n",
    );
    write(
        root,
        "app/js/app.js",
        "// entry\nfunction main() {\n  return \"ready\";\n}\nmain();\n",
    );
    write(
        root,
        "app/img/icons/star.svg",
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 16 16\" fill=\"#000\"><path d=\"M8 0l2 6h6l-5 4 2 6-5-4-5 4 2-6-5-4h6z\"/></svg>",
    );

    let logo = image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 128, 255, 255]));
    std::fs::create_dir_all(root.join("app/img")).unwrap();
    logo.save(root.join("app/img/logo.png")).unwrap();

    std::fs::create_dir_all(root.join("app/fonts")).unwrap();
    std::fs::write(root.join("app/fonts/body.woff2"), b"font bytes").unwrap();

    let mut config = SiteConfig::default().with_root(root);
    config.variables.insert(
        "site_name".to_string(),
        serde_yaml::Value::String("Acme Site".to_string()),
    );
    config
}

/// Sorted relative paths of every file under `dir`
pub fn walk(dir: &Path) -> Vec<String> {
    fn visit(dir: &Path, base: &Path, out: &mut Vec<String>) {
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    visit(&path, base, out);
                } else {
                    out.push(
                        path.strip_prefix(base)
                            .unwrap()
                            .to_string_lossy()
                            .replace('\\', "/"),
                    );
                }
            }
        }
    }
    let mut out = Vec::new();
    visit(dir, dir, &mut out);
    out.sort();
    out
}
