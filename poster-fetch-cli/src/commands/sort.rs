use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use poster_fetch_scraper::{
    ImdbClient, PipelineEvent, SortOptions, build_http_client, load_config, sort_posters,
};

use super::progress::{RowProgress, print_summary, write_log_file};
use crate::CliError;
use crate::cli_types::{RunArgs, SortArgs};

/// Run the `sort` command.
pub(crate) fn run_sort(args: SortArgs, quiet: bool) -> Result<(), CliError> {
    let config = load_config()?;

    let mut options = SortOptions::new(
        args.csv.unwrap_or_else(|| config.sort_csv()),
        args.save_dir.unwrap_or_else(|| config.save_dir()),
    );
    options.dry_run = args.run.dry_run;
    options.limit = args.run.limit;

    log::info!(
        "Reading titles from: {}",
        options.csv_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "Posters:             {}",
        options.save_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log_run_flags(&args.run);
    crate::log_blank();

    let http = build_http_client(args.run.timeout())?;
    let mut resolver = ImdbClient::new(http.clone());
    if let Some(url) = args.imdb_url.as_deref().or(config.imdb_base_url()) {
        resolver = resolver.with_base_url(url);
    }

    let progress = RowProgress::new(quiet);
    let log = sort_posters(&resolver, &http, &options, &mut |event: PipelineEvent| {
        progress.handle(event)
    })?;
    drop(progress);

    print_summary(&log.summary(), options.dry_run);
    write_log_file(&log, args.run.log_file.as_deref());
    Ok(())
}

pub(super) fn log_run_flags(run: &RunArgs) {
    if run.dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be written".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if let Some(n) = run.limit {
        log::info!(
            "{}",
            format!("Limit: {} rows", n).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
