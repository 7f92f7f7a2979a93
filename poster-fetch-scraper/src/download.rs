use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use reqwest::blocking::Client;

use crate::error::ScrapeError;

/// Write buffer size for streamed downloads.
const CHUNK_SIZE: usize = 8 * 1024;

/// What to do when the destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingFile {
    /// Download again and truncate the existing file.
    Overwrite,
    /// Leave the file alone and make no request.
    Skip,
}

/// Result of a successful [`download_image`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { bytes: u64 },
    AlreadyPresent,
}

/// Stream `url` into `dest`.
///
/// The parent directory must already exist. A non-2xx response is an error
/// and creates no file. If the body fails mid-stream the partial file is
/// left in place.
pub fn download_image(
    http: &Client,
    url: &str,
    dest: &Path,
    existing: ExistingFile,
) -> Result<DownloadOutcome, ScrapeError> {
    if existing == ExistingFile::Skip && dest.exists() {
        log::debug!("{} already exists, skipping download", dest.display());
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    let mut resp = http.get(url).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::ServerError {
            status: status.as_u16(),
            message: format!("failed to download image from {url}"),
        });
    }

    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, File::create(dest)?);
    let bytes = std::io::copy(&mut resp, &mut writer)?;
    writer.flush()?;

    Ok(DownloadOutcome::Downloaded { bytes })
}
