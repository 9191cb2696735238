use anyhow::{Context, Result};
use sitepipe::cli::commands::{ServerCommand, ValidateCommand};
use sitepipe::cli::output::{self, style, CHECK, CROSS, INFO};
use sitepipe::cli::{Cli, Command};
use sitepipe::core::{SiteConfig, StepKind};
use sitepipe::execution::{server, watch, BuildEngine};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match cli.command.clone() {
        None => run_default(load_config(&cli)?).await,
        Some(Command::Build) => run_build(load_config(&cli)?).await,
        Some(Command::Clean) => run_clean(load_config(&cli)?).await,
        Some(Command::Scripts) => run_single(load_config(&cli)?, StepKind::Scripts).await,
        Some(Command::Templates) => run_single(load_config(&cli)?, StepKind::Templates).await,
        Some(Command::Styles) => run_single(load_config(&cli)?, StepKind::Styles).await,
        Some(Command::Fonts) => run_single(load_config(&cli)?, StepKind::Fonts).await,
        Some(Command::Images) => run_single(load_config(&cli)?, StepKind::Images).await,
        Some(Command::Svg) => run_single(load_config(&cli)?, StepKind::Svg).await,
        Some(Command::Server(cmd)) => run_server(load_config(&cli)?, &cmd).await,
        Some(Command::Watch) => run_watch(load_config(&cli)?).await,
        Some(Command::Validate(cmd)) => validate_config(&cli, &cmd),
    }
}

/// Load the project configuration, anchored at the working directory
fn load_config(cli: &Cli) -> Result<Arc<SiteConfig>> {
    Ok(Arc::new(try_load_config(cli)?))
}

fn try_load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = match &cli.config {
        Some(path) => SiteConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path))?,
        None => {
            let default_path = root.join("sitepipe.yaml");
            if default_path.exists() {
                SiteConfig::from_file(&default_path).context("Failed to load sitepipe.yaml")?
            } else {
                SiteConfig::default()
            }
        }
    };
    Ok(config.with_root(root))
}

/// An engine that reports every build event on the console
fn console_engine(config: Arc<SiteConfig>) -> BuildEngine {
    let mut engine = BuildEngine::new(config);
    engine.add_event_handler(|event| println!("{}", output::format_build_event(&event)));
    engine
}

/// Default run: full build, then watch and serve until terminated
async fn run_default(config: Arc<SiteConfig>) -> Result<()> {
    let engine = console_engine(Arc::clone(&config));
    let report = engine.build().await.context("Build aborted")?;
    println!("\n{}", output::format_report(&report));
    println!();

    // Step failures are isolated; watch and serve still start so broken
    // inputs can be fixed incrementally.
    let engine = Arc::new(engine);
    tokio::try_join!(
        watch::watch(Arc::clone(&engine), Arc::clone(&config)),
        server::serve(config),
    )?;
    Ok(())
}

/// One-shot full build
async fn run_build(config: Arc<SiteConfig>) -> Result<()> {
    let engine = console_engine(config);
    let report = engine.build().await.context("Build aborted")?;
    println!("\n{}", output::format_report(&report));

    if report.is_success() {
        println!(
            "\n{} Build completed {}",
            CHECK,
            style("successfully").green()
        );
        Ok(())
    } else {
        println!("\n{} Build {}", CROSS, style("failed").red());
        std::process::exit(1);
    }
}

async fn run_clean(config: Arc<SiteConfig>) -> Result<()> {
    let engine = BuildEngine::new(Arc::clone(&config));
    engine.clean().await?;
    println!(
        "{} Removed {}",
        CHECK,
        style(config.output_path().display()).bold()
    );
    Ok(())
}

/// Run a single named step
async fn run_single(config: Arc<SiteConfig>, step: StepKind) -> Result<()> {
    let engine = console_engine(config);
    let report = engine.run_step(step).await;
    if report.is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

async fn run_server(config: Arc<SiteConfig>, cmd: &ServerCommand) -> Result<()> {
    let config = match cmd.port {
        Some(port) => {
            let mut overridden = (*config).clone();
            overridden.server.port = port;
            Arc::new(overridden)
        }
        None => config,
    };
    server::serve(config).await
}

async fn run_watch(config: Arc<SiteConfig>) -> Result<()> {
    let engine = Arc::new(console_engine(Arc::clone(&config)));
    watch::watch(engine, config).await
}

fn validate_config(cli: &Cli, cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating configuration...", INFO);

    match try_load_config(cli) {
        Ok(config) => {
            println!("{} Configuration is valid!", CHECK);
            println!("  Source root: {}", style(&config.source_root).bold());
            println!("  Output root: {}", style(&config.output_root).bold());
            println!("  Variables: {}", style(config.variables.len()).cyan());
            println!("  Server port: {}", style(config.server.port).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
