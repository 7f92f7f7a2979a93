use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use poster_fetch_scraper::{
    OmdbClient, PipelineEvent, SyncOptions, build_http_client, load_config, resolve_api_key,
    sync_catalog,
};

use super::progress::{RowProgress, print_summary, write_log_file};
use super::sort::log_run_flags;
use crate::CliError;
use crate::cli_types::SyncArgs;

/// Run the `sync` command.
///
/// A missing API key aborts before the CSV is read.
pub(crate) fn run_sync(args: SyncArgs, quiet: bool) -> Result<(), CliError> {
    let config = load_config()?;
    let key = resolve_api_key(args.api_key, &config)?;
    log::debug!("Using OMDb API key from {}", key.source);

    let mut options = SyncOptions::new(
        args.csv.unwrap_or_else(|| config.sync_csv()),
        args.images_dir.unwrap_or_else(|| config.images_dir()),
    );
    options.placeholder_url = args
        .placeholder_url
        .unwrap_or_else(|| config.placeholder_url().to_string());
    options.dry_run = args.run.dry_run;
    options.limit = args.run.limit;

    log::info!(
        "Syncing posters for: {}",
        options.csv_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "Images:              {}",
        options.images_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log_run_flags(&args.run);
    crate::log_blank();

    let http = build_http_client(args.run.timeout())?;
    let mut resolver = OmdbClient::new(http.clone(), key.value);
    if let Some(url) = args.omdb_url.as_deref().or(config.omdb_base_url()) {
        resolver = resolver.with_base_url(url);
    }

    let progress = RowProgress::new(quiet);
    let report = sync_catalog(&resolver, &http, &options, &mut |event: PipelineEvent| {
        progress.handle(event)
    })?;
    drop(progress);

    print_summary(&report.log.summary(), options.dry_run);
    if !report.csv_written {
        log::info!(
            "  {}",
            "CSV left unchanged (dry run)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    write_log_file(&report.log, args.run.log_file.as_deref());
    Ok(())
}
