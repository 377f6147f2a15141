use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use staffline_infrastructure::{ConfigOverrides, ConfigService, StafflinePaths};

mod app;
mod commands;
mod render;

use app::App;
use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "staffline")]
#[command(version)]
#[command(about = "Staffline - command-line client for the travel-healthcare ATS", long_about = None)]
struct Cli {
    /// API base URL, e.g. http://localhost:8000/api (overrides config and STAFFLINE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding config.toml and session.json (overrides STAFFLINE_CONFIG_DIR)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Debug logging, unless RUST_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = StafflinePaths::resolve(cli.config_dir.as_deref())?;
    let config = ConfigService::new(
        &paths,
        ConfigOverrides {
            api_base_url: cli.api_url,
        },
    )
    .get_config()?;

    init_tracing(if cli.verbose { "debug" } else { &config.log_level });
    tracing::debug!(
        "Using {} with config dir {}",
        config.base_url(),
        paths.config_dir().display()
    );

    let mut app = App::open(paths, config)?;
    let result = match cli.command {
        Command::Shell => commands::shell::run(&mut app).await,
        command => commands::run(&mut app, command).await,
    };
    app.sync_session();
    result
}
