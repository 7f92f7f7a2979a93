//! poster-fetch CLI
//!
//! Command-line interface for downloading posters for the titles in a CSV.

mod cli_types;
mod commands;
mod error;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    load_dotenv();

    let result = match cli.command {
        Commands::Sort(args) => commands::sort::run_sort(args, cli.quiet),
        Commands::Sync(args) => commands::sync::run_sync(args, cli.quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Setup => commands::config::run_config_setup(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{} {}", "\u{2718}".if_supports_color(Stdout, |t| t.red()), e);
            ExitCode::FAILURE
        }
    }
}

/// Plain messages at the default level; timestamps and levels with `-v`.
/// `RUST_LOG` overrides the level.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| {
            if verbose {
                writeln!(
                    buf,
                    "{} {:<5} {}",
                    buf.timestamp_millis(),
                    record.level(),
                    record.args()
                )
            } else {
                writeln!(buf, "{}", record.args())
            }
        })
        .init();
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring .env file: {}", e),
    }
}

/// Emit an empty info line.
pub(crate) fn log_blank() {
    log::info!("");
}
