//! ledlight CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use ledlight_core::{TracingConfig, init_tracing};

use ledlight_cli::cli::{Cli, Command, ConfigAction};
use ledlight_cli::commands;
use ledlight_cli::config::CliConfig;
use ledlight_cli::error::CliResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = match cli.config {
        Some(ref path) => CliConfig::load_from(path)?,
        None => CliConfig::load()?,
    };
    config.apply_cli(&cli);

    // Listen keeps stdout for replies, so its logs go to stderr as JSON.
    let tracing_config = match cli.command {
        Command::Listen if !config.debug => TracingConfig::for_listener(),
        _ => TracingConfig::for_cli(config.debug),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match cli.command {
        Command::Render { styles } => {
            commands::render::render(&config, styles, &mut std::io::stdout().lock())
        }
        Command::Exec {
            ref instructions,
            render,
        } => {
            let mut stdout = std::io::stdout().lock();
            commands::exec::exec(&config, instructions, render, &mut stdout).await
        }
        Command::Listen => commands::listen::listen(&config).await,
        Command::Config { ref action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
