//! CLI command definitions

use clap::Args;

/// Serve the output root with live reload
#[derive(Debug, Args, Clone)]
pub struct ServerCommand {
    /// Port to bind (overrides the configured port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Validate the project configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Output the resolved configuration in JSON format
    #[arg(long)]
    pub json: bool,
}
