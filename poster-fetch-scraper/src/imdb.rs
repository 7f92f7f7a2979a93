use reqwest::Url;
use reqwest::blocking::Client;

use crate::client::snippet;
use crate::error::ScrapeError;
use crate::resolver::PosterResolver;
use crate::types::{Suggestion, SuggestionResponse};

pub const DEFAULT_IMDB_URL: &str = "https://v3.sg.media-imdb.com";

/// Title search against IMDb's public suggestion endpoint.
///
/// The first title hit is taken as the match; there is no disambiguation by
/// year or kind.
pub struct ImdbClient {
    http: Client,
    base_url: String,
}

impl ImdbClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: DEFAULT_IMDB_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search for a title and return every title hit, best first.
    pub fn search(&self, title: &str) -> Result<Vec<Suggestion>, ScrapeError> {
        let url = self.search_url(title)?;
        let resp = self.http.get(url).send()?;

        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(ScrapeError::ServerError {
                status: status.as_u16(),
                message: snippet(&text).to_string(),
            });
        }

        let parsed: SuggestionResponse = serde_json::from_str(&text).map_err(|e| {
            ScrapeError::Api(format!(
                "Failed to parse IMDb search results: {e}. Response: {}",
                snippet(&text)
            ))
        })?;

        Ok(parsed.results.into_iter().filter(Suggestion::is_title).collect())
    }

    /// `<base>/suggestion/<first letter>/<query>.json`
    fn search_url(&self, title: &str) -> Result<Url, ScrapeError> {
        let query = search_query(title);
        let bucket = query
            .chars()
            .find(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_string())
            .unwrap_or_else(|| "x".to_string());

        let file = format!("{query}.json");

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ScrapeError::Config(format!("Invalid IMDb base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ScrapeError::Config(format!("Invalid IMDb base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["suggestion", bucket.as_str(), file.as_str()]);
        Ok(url)
    }
}

/// Normalise a title for the suggestion endpoint: lowercase, single spaces.
fn search_query(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl PosterResolver for ImdbClient {
    fn name(&self) -> &'static str {
        "IMDb"
    }

    fn resolve(&self, title: &str) -> Result<String, ScrapeError> {
        let results = self.search(title)?;
        let first = results.first().ok_or_else(|| ScrapeError::NotFound {
            title: title.to_string(),
            reason: "empty search results".to_string(),
        })?;

        log::debug!(
            "IMDb matched '{}' to {} ({}, {})",
            title,
            first.label.as_deref().unwrap_or(&first.id),
            first.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string()),
            first.qualifier.as_deref().unwrap_or("unknown kind"),
        );

        first
            .cover_url()
            .map(str::to_string)
            .ok_or_else(|| ScrapeError::NoPoster {
                title: title.to_string(),
            })
    }
}
