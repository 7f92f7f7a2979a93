//! The two batch pipelines.
//!
//! `sort` files posters under `<save_dir>/<type>/<vibe>/` and never touches
//! its CSV. `sync` keeps a flat image directory and writes each row's local
//! path back into the CSV. Both run one row at a time.

use std::path::{Path, PathBuf};

use poster_fetch_core::{
    Catalog, CollisionTracker, PosterReference, flat_poster_path, read_sort_rows,
    sorted_poster_path,
};
use reqwest::blocking::Client;

use crate::download::{DownloadOutcome, ExistingFile, download_image};
use crate::error::ScrapeError;
use crate::log::{LogEntry, RunLog};
use crate::resolver::{PosterResolver, resolve_or_placeholder};
use crate::settings::DEFAULT_PLACEHOLDER_URL;

/// Options for the category (`sort`) pipeline.
#[derive(Debug, Clone)]
pub struct SortOptions {
    /// CSV with `title`, `type` and `vibe` columns
    pub csv_path: PathBuf,
    /// Root of the `<type>/<vibe>/` tree
    pub save_dir: PathBuf,
    /// Resolve only; create no directories and download nothing
    pub dry_run: bool,
    /// Maximum number of rows to process
    pub limit: Option<usize>,
}

impl SortOptions {
    pub fn new(csv_path: impl Into<PathBuf>, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            save_dir: save_dir.into(),
            dry_run: false,
            limit: None,
        }
    }
}

/// Options for the catalog (`sync`) pipeline.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// CSV with a `title` column and optional `image_url`; rewritten in place
    pub csv_path: PathBuf,
    /// Flat directory of downloaded posters
    pub images_dir: PathBuf,
    /// Fallback image when a title has no poster
    pub placeholder_url: String,
    /// Resolve only; download nothing and leave the CSV untouched
    pub dry_run: bool,
    /// Maximum number of rows to process
    pub limit: Option<usize>,
}

impl SyncOptions {
    pub fn new(csv_path: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            images_dir: images_dir.into(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            dry_run: false,
            limit: None,
        }
    }
}

/// Progress events emitted while a pipeline runs, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Input loaded. `total` is known for sync (whole table in memory), not for sort.
    Started { total: Option<usize> },
    /// Looking up a poster URL.
    Resolving { index: usize, title: String },
    /// Downloading a poster.
    Downloading { index: usize, title: String },
    /// Row finished with a poster on disk (or planned, in a dry run).
    RowCompleted {
        index: usize,
        title: String,
        path: PathBuf,
    },
    /// Row was skipped without a download (already present, invalid row).
    RowSkipped {
        index: usize,
        title: String,
        reason: String,
    },
    /// Lookup or download failed (non-fatal).
    RowFailed {
        index: usize,
        title: String,
        reason: String,
    },
    /// All rows processed.
    Done,
}

/// Run the category pipeline.
///
/// Each row is resolved through `resolver`; titles without a poster are
/// logged and skipped. Existing files are overwritten. Directory creation
/// failures abort the run.
pub fn sort_posters(
    resolver: &dyn PosterResolver,
    http: &Client,
    options: &SortOptions,
    on_event: &mut dyn FnMut(PipelineEvent),
) -> Result<RunLog, ScrapeError> {
    let rows = read_sort_rows(&options.csv_path)?;
    let mut log = RunLog::new();
    let mut collisions = CollisionTracker::new();

    on_event(PipelineEvent::Started { total: None });

    for (index, row) in rows.enumerate() {
        if options.limit.is_some_and(|max| index >= max) {
            break;
        }

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Skipping row {}: {}", index + 1, e);
                log.add(LogEntry::Skipped {
                    row: index + 1,
                    reason: e.to_string(),
                });
                on_event(PipelineEvent::RowSkipped {
                    index,
                    title: String::new(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let title = row.title.trim();
        if title.is_empty() {
            skip_empty_title(&mut log, index, on_event);
            continue;
        }

        on_event(PipelineEvent::Resolving {
            index,
            title: title.to_string(),
        });
        let url = match resolver.resolve(title) {
            Ok(url) => url,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                if e.is_not_found() {
                    log::warn!("{e}");
                } else {
                    log::warn!("Error fetching poster for '{title}' from {}: {e}", resolver.name());
                }
                log.add(LogEntry::Unresolved {
                    title: title.to_string(),
                    reason: e.to_string(),
                });
                on_event(PipelineEvent::RowFailed {
                    index,
                    title: title.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let dest = sorted_poster_path(&options.save_dir, &row.kind, &row.vibe, title);
        check_collision(&mut collisions, &mut log, &dest, title);

        if options.dry_run {
            log.add(LogEntry::Planned {
                title: title.to_string(),
                path: dest.clone(),
                url: Some(url),
            });
            on_event(PipelineEvent::RowCompleted {
                index,
                title: title.to_string(),
                path: dest,
            });
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        on_event(PipelineEvent::Downloading {
            index,
            title: title.to_string(),
        });
        fetch_into(
            http,
            &PosterReference::Resolved(url),
            &dest,
            ExistingFile::Overwrite,
            title,
            index,
            &mut log,
            on_event,
        );
    }

    on_event(PipelineEvent::Done);
    Ok(log)
}

/// Result of a sync run.
#[derive(Debug)]
pub struct SyncReport {
    pub log: RunLog,
    /// Whether the CSV was rewritten (false for dry runs).
    pub csv_written: bool,
}

/// Run the catalog pipeline.
///
/// Rows whose poster file already exists are recorded without any lookup or
/// download. Otherwise the row's `image_url` is used if present, else the
/// title is resolved through `resolver` with the placeholder as fallback.
/// The local path is recorded for every processed row, even when the download
/// fails, and the CSV is rewritten atomically at the end.
pub fn sync_catalog(
    resolver: &dyn PosterResolver,
    http: &Client,
    options: &SyncOptions,
    on_event: &mut dyn FnMut(PipelineEvent),
) -> Result<SyncReport, ScrapeError> {
    let mut catalog = Catalog::load(&options.csv_path)?;
    if !options.dry_run {
        std::fs::create_dir_all(&options.images_dir)?;
    }

    let mut log = RunLog::new();
    let mut collisions = CollisionTracker::new();
    let total = options
        .limit
        .map_or(catalog.len(), |max| max.min(catalog.len()));

    on_event(PipelineEvent::Started { total: Some(total) });

    for index in 0..total {
        let Some(row) = catalog.row(index) else {
            break;
        };
        let title = row.title.trim().to_string();
        let known_url = row.image_url.map(str::to_string);

        if title.is_empty() {
            skip_empty_title(&mut log, index, on_event);
            continue;
        }

        let dest = flat_poster_path(&options.images_dir, &title);
        check_collision(&mut collisions, &mut log, &dest, &title);
        let dest_str = dest.display().to_string();

        if dest.exists() {
            log::debug!("{} already present", dest.display());
            log.add(LogEntry::AlreadyPresent {
                title: title.clone(),
                path: dest.clone(),
            });
            on_event(PipelineEvent::RowSkipped {
                index,
                title,
                reason: "already downloaded".to_string(),
            });
            catalog.set_image_path(index, &dest_str)?;
            continue;
        }

        let reference = match known_url {
            Some(url) => PosterReference::Resolved(url),
            None => {
                on_event(PipelineEvent::Resolving {
                    index,
                    title: title.clone(),
                });
                resolve_or_placeholder(resolver, &title, &options.placeholder_url)?
            }
        };

        if options.dry_run {
            log.add(LogEntry::Planned {
                title: title.clone(),
                path: dest.clone(),
                url: Some(reference.url().to_string()),
            });
            on_event(PipelineEvent::RowCompleted {
                index,
                title,
                path: dest,
            });
            continue;
        }

        on_event(PipelineEvent::Downloading {
            index,
            title: title.clone(),
        });
        fetch_into(
            http,
            &reference,
            &dest,
            ExistingFile::Skip,
            &title,
            index,
            &mut log,
            on_event,
        );
        catalog.set_image_path(index, &dest_str)?;
    }

    let csv_written = !options.dry_run;
    if csv_written {
        catalog.save(&options.csv_path)?;
        log::info!("CSV file updated with local image paths.");
    }

    on_event(PipelineEvent::Done);
    Ok(SyncReport { log, csv_written })
}

/// Download one poster and record the outcome. Download errors are logged,
/// never returned.
#[allow(clippy::too_many_arguments)]
fn fetch_into(
    http: &Client,
    reference: &PosterReference,
    dest: &Path,
    existing: ExistingFile,
    title: &str,
    index: usize,
    log: &mut RunLog,
    on_event: &mut dyn FnMut(PipelineEvent),
) {
    match download_image(http, reference.url(), dest, existing) {
        Ok(DownloadOutcome::Downloaded { bytes }) => {
            log::debug!("Downloaded poster to {}", dest.display());
            log.add(LogEntry::Downloaded {
                title: title.to_string(),
                path: dest.to_path_buf(),
                url: reference.url().to_string(),
                placeholder: reference.is_placeholder(),
                bytes,
            });
            on_event(PipelineEvent::RowCompleted {
                index,
                title: title.to_string(),
                path: dest.to_path_buf(),
            });
        }
        Ok(DownloadOutcome::AlreadyPresent) => {
            log.add(LogEntry::AlreadyPresent {
                title: title.to_string(),
                path: dest.to_path_buf(),
            });
            on_event(PipelineEvent::RowSkipped {
                index,
                title: title.to_string(),
                reason: "already downloaded".to_string(),
            });
        }
        Err(e) => {
            log::warn!("Failed to download image from {}: {}", reference.url(), e);
            log.add(LogEntry::DownloadFailed {
                title: title.to_string(),
                url: reference.url().to_string(),
                reason: e.to_string(),
            });
            on_event(PipelineEvent::RowFailed {
                index,
                title: title.to_string(),
                reason: e.to_string(),
            });
        }
    }
}

fn skip_empty_title(log: &mut RunLog, index: usize, on_event: &mut dyn FnMut(PipelineEvent)) {
    log::warn!("Skipping row {}: empty title", index + 1);
    log.add(LogEntry::Skipped {
        row: index + 1,
        reason: "empty title".to_string(),
    });
    on_event(PipelineEvent::RowSkipped {
        index,
        title: String::new(),
        reason: "empty title".to_string(),
    });
}

fn check_collision(tracker: &mut CollisionTracker, log: &mut RunLog, dest: &Path, title: &str) {
    if let Some(other) = tracker.claim(dest, title) {
        log::warn!(
            "'{}' and '{}' both map to {}",
            other,
            title,
            dest.display()
        );
        log.add(LogEntry::Collision {
            title: title.to_string(),
            other_title: other,
            path: dest.to_path_buf(),
        });
    }
}
