pub mod client;
pub mod download;
pub mod error;
pub mod imdb;
pub mod log;
pub mod omdb;
pub mod pipeline;
pub mod resolver;
pub mod settings;
pub mod types;

pub use client::{DEFAULT_TIMEOUT, build_http_client};
pub use download::{DownloadOutcome, ExistingFile, download_image};
pub use error::ScrapeError;
pub use imdb::ImdbClient;
pub use log::{LogEntry, LogSummary, RunLog};
pub use omdb::OmdbClient;
pub use pipeline::{
    PipelineEvent, SortOptions, SyncOptions, SyncReport, sort_posters, sync_catalog,
};
pub use resolver::{PosterResolver, resolve_or_placeholder};
pub use settings::{
    ApiKey, ConfigFile, CredentialSource, api_key_source, config_path, load_config,
    resolve_api_key, save_config,
};
