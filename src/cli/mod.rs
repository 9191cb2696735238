//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ServerCommand, ValidateCommand};

/// Static-site asset pipeline
#[derive(Debug, Parser, Clone)]
#[command(name = "sitepipe")]
#[command(author = "Sitepipe Contributors")]
#[command(version = "0.1.0")]
#[command(
    about = "Build, watch, and serve static-site assets",
    long_about = None
)]
pub struct Cli {
    /// With no command: full build, then watch and serve
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a project configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the full build once and exit
    Build,

    /// Delete the output root
    Clean,

    /// Bundle and minify scripts
    Scripts,

    /// Render page templates
    Templates,

    /// Compile stylesheets
    Styles,

    /// Copy fonts
    Fonts,

    /// Compress and copy images
    Images,

    /// Build the SVG sprite
    Svg,

    /// Serve the output root with live reload
    Server(ServerCommand),

    /// Watch the source tree and rebuild changed steps
    Watch,

    /// Validate the project configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
