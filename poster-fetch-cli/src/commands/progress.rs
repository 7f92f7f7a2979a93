//! Per-row progress display and end-of-run reporting.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use poster_fetch_scraper::{LogSummary, PipelineEvent, RunLog};

/// Spinner driven by [`PipelineEvent`]s.
///
/// Finished rows are printed above the spinner. Failures are not printed
/// here; the pipeline already logs them as warnings.
pub(crate) struct RowProgress {
    pb: ProgressBar,
}

impl RowProgress {
    /// When `quiet` is true the spinner is hidden and no row lines are printed.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        pb.set_style(style("  {spinner:.cyan} {msg}"));
        Self { pb }
    }

    pub(crate) fn handle(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::Started { total } => {
                if let Some(total) = total {
                    self.pb.set_length(total as u64);
                    self.pb.set_style(style("  {spinner:.cyan} [{pos}/{len}] {msg}"));
                }
                self.pb.enable_steady_tick(Duration::from_millis(100));
            }
            PipelineEvent::Resolving { title, .. } => {
                self.pb.set_message(format!("Looking up {title}"));
            }
            PipelineEvent::Downloading { title, .. } => {
                self.pb.set_message(format!("Downloading {title}"));
            }
            PipelineEvent::RowCompleted { title, path, .. } => {
                self.pb.inc(1);
                self.pb.suspend(|| {
                    log::info!(
                        "  {} {} {}",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        title,
                        format!("-> {}", path.display()).if_supports_color(Stdout, |t| t.dimmed()),
                    );
                });
            }
            PipelineEvent::RowSkipped { title, reason, .. } => {
                self.pb.inc(1);
                // Untitled rows were already reported by the pipeline
                if !title.is_empty() {
                    self.pb.suspend(|| {
                        log::info!(
                            "  {} {} {}",
                            "-".if_supports_color(Stdout, |t| t.dimmed()),
                            title,
                            format!("({reason})").if_supports_color(Stdout, |t| t.dimmed()),
                        );
                    });
                }
            }
            PipelineEvent::RowFailed { .. } => self.pb.inc(1),
            PipelineEvent::Done => self.pb.finish_and_clear(),
        }
    }
}

impl Drop for RowProgress {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("/-\\|")
}

/// Log the end-of-run totals.
pub(crate) fn print_summary(summary: &LogSummary, dry_run: bool) {
    crate::log_blank();
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));

    if dry_run {
        log::info!(
            "  {} {} posters would be downloaded",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.planned,
        );
    } else {
        log::info!(
            "  {} {} posters downloaded ({} bytes)",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.downloaded,
            summary.bytes,
        );
    }
    if summary.placeholders > 0 {
        log::info!(
            "  {} {} of them placeholders",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.placeholders,
        );
    }
    if summary.already_present > 0 {
        log::info!(
            "  {} {} already present",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.already_present,
        );
    }
    if summary.unresolved > 0 {
        log::warn!(
            "  {} {} titles without a poster",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            summary.unresolved,
        );
    }
    if summary.download_failed > 0 {
        log::warn!(
            "  {} {} downloads failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.download_failed,
        );
    }
    if summary.skipped > 0 {
        log::warn!(
            "  {} {} rows skipped",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.skipped,
        );
    }
    if summary.collisions > 0 {
        log::warn!(
            "  {} {} titles share a file name with another title",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.collisions,
        );
    }
}

/// Write the detailed run log if a path was given. Failure only warns.
pub(crate) fn write_log_file(log: &RunLog, path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    match log.write_to_file(path) {
        Ok(()) => log::info!(
            "Run log written to {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
        Err(e) => log::warn!("Warning: could not write run log {}: {}", path.display(), e),
    }
}
