//! jiraplan CLI - Create Jira issues from a planning document
//!
//! Parses PLANNING.md into epics, stories, subtasks and tasks, then creates
//! them in Jira in dependency order.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiraplan_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{CreateArgs, FieldsArgs, ParseArgs};

/// jiraplan: Turn a planning document into Jira issues
#[derive(Parser, Debug)]
#[command(name = "jiraplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/jiraplan/config.toml)
    #[arg(long, global = true, env = "JIRAPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Jira base URL (overrides config and env)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Project key (overrides config and env)
    #[arg(long, global = true)]
    project: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Parse a planning document and preview its issues
    #[command(visible_alias = "p")]
    Parse(ParseArgs),

    /// Create Jira issues from a planning document
    #[command(visible_alias = "c")]
    Create(CreateArgs),

    /// Test the connection to Jira
    Check,

    /// Discover custom field IDs
    Fields(FieldsArgs),

    /// Show current configuration
    Config,

    /// Write a default config file and a secrets template
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config_path = cli.config.as_deref();

    // Init writes the config, so it must not require one to load
    if let Some(Commands::Init) = cli.command {
        return commands::config::init(config_path);
    }

    let config =
        Config::load_with_overrides(config_path, cli.base_url.clone(), cli.project.clone())?;

    if cli.verbose {
        tracing::info!(
            base_url = %config.jira.base_url,
            project = %config.jira.project_key,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("jiraplan {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Parse(args)) => {
            args.execute(cli.verbose)?;
        }
        Some(Commands::Create(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Check) => {
            commands::jira::check_connection(&config).await?;
        }
        Some(Commands::Fields(args)) => {
            args.execute(&config, config_path).await?;
        }
        Some(Commands::Config) => {
            commands::config::show_config(&config, config_path)?;
        }
        Some(Commands::Init) => unreachable!("handled before config is loaded"),
        None => {
            println!("jiraplan - Create Jira issues from a planning document");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
