//! Classroom - coding workspace CLI
//!
//! CLI entry point that dispatches to subcommands.

use classroom::cli::{AppContext, Cli, Commands, LogFormat};
use classroom::config::ConfigManager;
use classroom::error::ClassroomResult;
use classroom::workspace::Owner;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ClassroomResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    let format = cli.log_format.unwrap_or(match config.general.log_format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    });
    init_logging(cli.verbose, format);
    debug!("Loaded config from {}", config_manager.path().display());

    // Config command doesn't need the store
    if let Commands::Config(args) = cli.command {
        return classroom::cli::commands::config(args, &config, &config_manager).await;
    }

    classroom::ui::init_theme();

    let owner = Owner::new(
        cli.owner.unwrap_or_else(|| config.workspace.owner.clone()),
        cli.role.unwrap_or(config.workspace.role),
    );
    debug!("Opening workspace of {} ({})", owner.id, owner.role);

    let app = AppContext::open(config, owner).await?;
    let result = match cli.command {
        Commands::Tree(args) => classroom::cli::commands::tree(args, &app).await,
        Commands::File(args) => classroom::cli::commands::file(args, &app).await,
        Commands::Folder(args) => classroom::cli::commands::folder(args, &app).await,
        Commands::Tab(args) => classroom::cli::commands::tab(args, &app).await,
        Commands::Run(args) => classroom::cli::commands::run(args, &app).await,
        Commands::Project(args) => classroom::cli::commands::project(args, &app).await,
        Commands::Db(args) => classroom::cli::commands::db(args, &app).await,
        Commands::Config(_) => Ok(()),
    };

    // Pending writes must reach the store even when the command failed
    app.close().await;
    result
}

/// 0 = warn, 1 = info, 2+ = debug; `RUST_LOG` wins when set
fn init_logging(verbose: u8, format: LogFormat) {
    let default = match verbose {
        0 => "classroom=warn",
        1 => "classroom=info",
        _ => "classroom=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.without_time().init(),
    }
}
