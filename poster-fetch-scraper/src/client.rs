use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::ScrapeError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("poster-fetch/", env!("CARGO_PKG_VERSION"));

/// Build the blocking HTTP client shared by the resolvers and the downloader.
///
/// `None` disables the timeout entirely.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, ScrapeError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Trim a response body for inclusion in an error message.
pub(crate) fn snippet(text: &str) -> &str {
    let mut end = text.len().min(200);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
