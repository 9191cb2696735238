//! Step domain model

use crate::core::config::SiteConfig;
use std::fmt;

/// The named build steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Scripts,
    Styles,
    Templates,
    Images,
    Fonts,
    Svg,
}

impl StepKind {
    /// Every step, in the order the default pipeline runs them
    pub const ALL: [StepKind; 6] = [
        StepKind::Svg,
        StepKind::Scripts,
        StepKind::Styles,
        StepKind::Templates,
        StepKind::Images,
        StepKind::Fonts,
    ];

    /// Stable step identifier, used for logging and CLI names
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Scripts => "scripts",
            StepKind::Styles => "styles",
            StepKind::Templates => "templates",
            StepKind::Images => "images",
            StepKind::Fonts => "fonts",
            StepKind::Svg => "svg",
        }
    }

    /// Title used by the failure notification channel
    pub fn title(&self) -> &'static str {
        match self {
            StepKind::Scripts => "Js",
            StepKind::Styles => "Style",
            StepKind::Templates => "Template",
            StepKind::Images => "Image",
            StepKind::Fonts => "Fonts",
            StepKind::Svg => "Svg",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single step materialized against the project configuration
#[derive(Debug, Clone)]
pub struct Step {
    pub kind: StepKind,

    /// Input glob over the source tree
    pub input: String,

    /// Output directory under the output root
    pub output: String,

    /// Glob whose changes re-trigger this step in watch mode, if any
    pub watch: Option<String>,
}

impl Step {
    /// Materialize a step from the project configuration
    pub fn from_config(kind: StepKind, config: &SiteConfig) -> Self {
        match kind {
            StepKind::Scripts => Step {
                kind,
                input: config.scripts.src.clone(),
                output: config.scripts.dest.clone(),
                watch: Some(config.scripts.src.clone()),
            },
            StepKind::Styles => Step {
                kind,
                input: config.styles.entry.clone(),
                output: config.styles.dest.clone(),
                // Any stylesheet change re-triggers the entry compile
                watch: Some(config.styles.src.clone()),
            },
            StepKind::Templates => Step {
                kind,
                input: config.templates.pages.clone(),
                output: config.templates.dest.clone(),
                // Layout and partial changes re-render the pages too
                watch: Some(config.templates.src.clone()),
            },
            StepKind::Images => Step {
                kind,
                input: config.images.src.clone(),
                output: config.images.dest.clone(),
                watch: Some(config.images.src.clone()),
            },
            StepKind::Fonts => Step {
                kind,
                input: config.fonts.src.clone(),
                output: config.fonts.dest.clone(),
                watch: Some(config.fonts.src.clone()),
            },
            StepKind::Svg => Step {
                kind,
                input: config.svg.src.clone(),
                output: config.svg.dest.clone(),
                watch: None,
            },
        }
    }

    /// Materialize every step
    pub fn all(config: &SiteConfig) -> Vec<Step> {
        StepKind::ALL
            .iter()
            .map(|kind| Step::from_config(*kind, config))
            .collect()
    }

    /// The steps that participate in watch mode
    pub fn watched(config: &SiteConfig) -> Vec<Step> {
        Self::all(config)
            .into_iter()
            .filter(|step| step.watch.is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names_are_unique() {
        let mut names: Vec<_> = StepKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), StepKind::ALL.len());
    }

    #[test]
    fn test_notification_titles() {
        assert_eq!(StepKind::Styles.title(), "Style");
        assert_eq!(StepKind::Scripts.title(), "Js");
        assert_eq!(StepKind::Templates.title(), "Template");
    }

    #[test]
    fn test_from_config_uses_configured_paths() {
        let config = SiteConfig::default();
        let step = Step::from_config(StepKind::Styles, &config);
        assert_eq!(step.input, "app/css/main.css");
        assert_eq!(step.output, "dist/css");
        assert_eq!(step.watch.as_deref(), Some("app/css/**/*.css"));
    }

    #[test]
    fn test_svg_is_not_watched() {
        let config = SiteConfig::default();
        let watched = Step::watched(&config);
        assert_eq!(watched.len(), 5);
        assert!(watched.iter().all(|step| step.kind != StepKind::Svg));
    }
}
