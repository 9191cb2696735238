//! Project configuration from YAML

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level project configuration.
///
/// Constructed once at startup (defaults, or a `sitepipe.yaml` file) and
/// passed by reference to the engine, watch, and serve components. All
/// patterns and directories are relative to [`SiteConfig::root`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Project root all patterns and directories are resolved against
    #[serde(skip)]
    pub root: PathBuf,

    /// Source tree that is watched for changes
    pub source_root: String,

    /// Output root, deleted wholesale by `clean`
    pub output_root: String,

    /// Variables exposed to every page template
    pub variables: HashMap<String, serde_yaml::Value>,

    pub templates: TemplatePaths,
    pub styles: StylePaths,
    pub scripts: ScriptPaths,
    pub images: ImagePaths,
    pub svg: SvgPaths,
    pub fonts: FontPaths,

    pub watch: WatchSettings,
    pub server: ServerSettings,
}

/// Template rendering paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePaths {
    /// Glob covering every template, including layouts and partials
    pub src: String,
    /// Glob covering the page templates that produce output files
    pub pages: String,
    /// Output directory for rendered pages
    pub dest: String,
}

/// Stylesheet compilation paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePaths {
    /// Entry stylesheet; `@import`s are bundled from here
    pub entry: String,
    /// Glob covering every stylesheet, used for watch bindings
    pub src: String,
    pub dest: String,
}

/// Script bundling paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPaths {
    pub src: String,
    pub dest: String,
    /// File name of the emitted bundle
    pub bundle: String,
}

/// Image processing paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePaths {
    pub src: String,
    pub dest: String,
}

/// SVG sprite paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgPaths {
    pub src: String,
    pub dest: String,
}

/// Font copying paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub src: String,
    pub dest: String,
}

/// Watch mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Window within which rapid successive change events are coalesced
    pub debounce_ms: u64,
}

/// Dev server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            source_root: "app".to_string(),
            output_root: "dist".to_string(),
            variables: HashMap::new(),
            templates: TemplatePaths::default(),
            styles: StylePaths::default(),
            scripts: ScriptPaths::default(),
            images: ImagePaths::default(),
            svg: SvgPaths::default(),
            fonts: FontPaths::default(),
            watch: WatchSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Default for TemplatePaths {
    fn default() -> Self {
        Self {
            src: "app/templates/**/*.html".to_string(),
            pages: "app/templates/pages/*.html".to_string(),
            dest: "dist".to_string(),
        }
    }
}

impl Default for StylePaths {
    fn default() -> Self {
        Self {
            entry: "app/css/main.css".to_string(),
            src: "app/css/**/*.css".to_string(),
            dest: "dist/css".to_string(),
        }
    }
}

impl Default for ScriptPaths {
    fn default() -> Self {
        Self {
            src: "app/js/**/*.js".to_string(),
            dest: "dist/js".to_string(),
            bundle: "app.min.js".to_string(),
        }
    }
}

impl Default for ImagePaths {
    fn default() -> Self {
        Self {
            src: "app/img/**/*".to_string(),
            dest: "dist/img".to_string(),
        }
    }
}

impl Default for SvgPaths {
    fn default() -> Self {
        Self {
            src: "app/img/icons/*.svg".to_string(),
            dest: "dist/img/icons".to_string(),
        }
    }
}

impl Default for FontPaths {
    fn default() -> Self {
        Self {
            src: "app/fonts/**/*".to_string(),
            dest: "dist/fonts".to_string(),
        }
    }
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl SiteConfig {
    /// Load project configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse project configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SiteConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.output_root.is_empty() || self.output_root == "." || self.output_root == "/" {
            anyhow::bail!(
                "output root must be a dedicated directory, got '{}'",
                self.output_root
            );
        }

        // No step may read its own output: every input pattern must live
        // outside the output root, which `clean` deletes wholesale.
        let inputs = [
            ("templates", &self.templates.pages),
            ("templates", &self.templates.src),
            ("styles", &self.styles.entry),
            ("styles", &self.styles.src),
            ("scripts", &self.scripts.src),
            ("images", &self.images.src),
            ("svg", &self.svg.src),
            ("fonts", &self.fonts.src),
        ];
        for (step, input) in inputs {
            if path_is_under(input, &self.output_root) {
                anyhow::bail!(
                    "step '{}' reads '{}' inside the output root '{}'",
                    step,
                    input,
                    self.output_root
                );
            }
        }

        // Every destination must be covered by the output root, so a fresh
        // build never leaves stale files behind.
        let outputs = [
            ("templates", &self.templates.dest),
            ("styles", &self.styles.dest),
            ("scripts", &self.scripts.dest),
            ("images", &self.images.dest),
            ("svg", &self.svg.dest),
            ("fonts", &self.fonts.dest),
        ];
        for (step, dest) in outputs {
            if !path_is_under(dest, &self.output_root) {
                anyhow::bail!(
                    "step '{}' writes '{}' outside the output root '{}'",
                    step,
                    dest,
                    self.output_root
                );
            }
        }

        if self.server.port == 0 {
            anyhow::bail!("server port must be non-zero");
        }
        if self.watch.debounce_ms == 0 {
            anyhow::bail!("watch debounce must be non-zero");
        }

        Ok(())
    }

    /// Anchor all relative paths at the given project root
    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = root.into();
        self
    }

    /// Resolve a config-relative path against the project root
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Resolve a config-relative glob pattern against the project root
    pub fn resolve_pattern(&self, pattern: &str) -> String {
        if self.root.as_os_str().is_empty() {
            pattern.to_string()
        } else {
            format!("{}/{}", self.root.display(), pattern)
        }
    }

    /// Absolute path of the output root
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_root)
    }

    /// Absolute path of the source tree
    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.source_root)
    }
}

/// Whether `path` is `base` or a path under `base` (string-level check on
/// config-relative, `/`-separated paths).
fn path_is_under(path: &str, base: &str) -> bool {
    path == base || path.starts_with(&format!("{}/", base))
}
