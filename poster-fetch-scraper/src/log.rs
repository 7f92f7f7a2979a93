use std::path::{Path, PathBuf};

/// A single entry in the run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Downloaded {
        title: String,
        path: PathBuf,
        url: String,
        placeholder: bool,
        bytes: u64,
    },
    AlreadyPresent {
        title: String,
        path: PathBuf,
    },
    Unresolved {
        title: String,
        reason: String,
    },
    DownloadFailed {
        title: String,
        url: String,
        reason: String,
    },
    /// Row could not be processed at all (malformed record, empty title).
    Skipped {
        row: usize,
        reason: String,
    },
    /// Two distinct titles map to the same poster file.
    Collision {
        title: String,
        other_title: String,
        path: PathBuf,
    },
    /// Dry run: the row would have been downloaded.
    Planned {
        title: String,
        path: PathBuf,
        url: Option<String>,
    },
}

/// Collects per-row outcomes and writes a log file.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::Downloaded {
                    placeholder, bytes, ..
                } => {
                    summary.downloaded += 1;
                    summary.bytes += bytes;
                    if *placeholder {
                        summary.placeholders += 1;
                    }
                }
                LogEntry::AlreadyPresent { .. } => summary.already_present += 1,
                LogEntry::Unresolved { .. } => summary.unresolved += 1,
                LogEntry::DownloadFailed { .. } => summary.download_failed += 1,
                LogEntry::Skipped { .. } => summary.skipped += 1,
                LogEntry::Collision { .. } => summary.collisions += 1,
                LogEntry::Planned { .. } => summary.planned += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        self.write_to(&mut file)
    }

    pub fn write_to<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        let summary = self.summary();

        writeln!(out, "=== Poster Fetch Log ===")?;
        writeln!(
            out,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out)?;
        writeln!(out, "--- Summary ---")?;
        writeln!(
            out,
            "Downloaded: {} ({} placeholders, {} bytes)",
            summary.downloaded, summary.placeholders, summary.bytes
        )?;
        writeln!(out, "Already present: {}", summary.already_present)?;
        writeln!(out, "Unresolved: {}", summary.unresolved)?;
        writeln!(out, "Download failures: {}", summary.download_failed)?;
        writeln!(out, "Skipped rows: {}", summary.skipped)?;
        writeln!(out, "Collisions: {}", summary.collisions)?;
        if summary.planned > 0 {
            writeln!(out, "Planned (dry run): {}", summary.planned)?;
        }
        writeln!(out)?;
        writeln!(out, "--- Details ---")?;
        writeln!(out)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Downloaded {
                    title,
                    path,
                    url,
                    placeholder,
                    ..
                } => {
                    let tag = if *placeholder { "[PLACEHOLDER]" } else { "[OK]" };
                    writeln!(out, "{} \"{}\" -> {}", tag, title, path.display())?;
                    writeln!(out, "     From: {}", url)?;
                }
                LogEntry::AlreadyPresent { title, path } => {
                    writeln!(out, "[EXISTS] \"{}\" -> {}", title, path.display())?;
                }
                LogEntry::Unresolved { title, reason } => {
                    writeln!(out, "[NOT FOUND] \"{}\": {}", title, reason)?;
                }
                LogEntry::DownloadFailed { title, url, reason } => {
                    writeln!(out, "[FAILED] \"{}\": {}", title, reason)?;
                    writeln!(out, "     From: {}", url)?;
                }
                LogEntry::Skipped { row, reason } => {
                    writeln!(out, "[SKIPPED] row {}: {}", row, reason)?;
                }
                LogEntry::Collision {
                    title,
                    other_title,
                    path,
                } => {
                    writeln!(
                        out,
                        "[COLLISION] \"{}\" and \"{}\" both map to {}",
                        other_title,
                        title,
                        path.display()
                    )?;
                }
                LogEntry::Planned { title, path, url } => {
                    writeln!(out, "[PLANNED] \"{}\" -> {}", title, path.display())?;
                    if let Some(url) = url {
                        writeln!(out, "     From: {}", url)?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogSummary {
    pub downloaded: usize,
    pub placeholders: usize,
    pub bytes: u64,
    pub already_present: usize,
    pub unresolved: usize,
    pub download_failed: usize,
    pub skipped: usize,
    pub collisions: usize,
    pub planned: usize,
}
