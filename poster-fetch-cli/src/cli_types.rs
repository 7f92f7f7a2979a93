//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use poster_fetch_scraper::DEFAULT_TIMEOUT;

#[derive(Parser)]
#[command(name = "poster-fetch")]
#[command(about = "Download movie and TV posters for the titles in a CSV file", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by the batch commands.
#[derive(Args, Clone, Debug)]
pub(crate) struct RunArgs {
    /// Show what would be downloaded without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Maximum number of rows to process
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// HTTP request timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Write a detailed run log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl RunArgs {
    pub(crate) fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

#[derive(Args, Clone, Debug)]
pub(crate) struct SortArgs {
    /// CSV with title, type and vibe columns (default: data/movies_list.csv)
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Root directory for the <type>/<vibe>/ tree (default: assets/posters)
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Override the IMDb suggestion endpoint
    #[arg(long, value_name = "URL", hide = true)]
    pub imdb_url: Option<String>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args, Clone, Debug)]
pub(crate) struct SyncArgs {
    /// CSV with a title column, rewritten with image_path (default: data/movies.csv)
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Directory for downloaded posters (default: assets/images)
    #[arg(long, value_name = "DIR")]
    pub images_dir: Option<PathBuf>,

    /// OMDb API key (overrides OMDB_API_KEY and the config file)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Image used when a title has no poster
    #[arg(long, value_name = "URL")]
    pub placeholder_url: Option<String>,

    /// Override the OMDb endpoint
    #[arg(long, value_name = "URL", hide = true)]
    pub omdb_url: Option<String>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Download posters into <save-dir>/<type>/<vibe>/ using IMDb title search
    Sort(SortArgs),

    /// Download posters from OMDb and record their local paths in the CSV
    Sync(SyncArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConfigAction {
    /// Show current settings and where the API key comes from
    Show,

    /// Interactively write the config file
    Setup,

    /// Print the config file path
    Path,
}
