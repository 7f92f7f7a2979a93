use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::client::snippet;
use crate::error::ScrapeError;
use crate::resolver::PosterResolver;
use crate::types::OmdbTitle;

pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";

/// Client for the OMDb REST API (`?t=<title>&apikey=<key>`).
pub struct OmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: DEFAULT_OMDB_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up a title by exact name.
    ///
    /// OMDb answers "not found" with HTTP 200 and `"Response": "False"`, so
    /// the body is returned as-is; callers inspect [`OmdbTitle::is_found`].
    pub fn lookup(&self, title: &str) -> Result<OmdbTitle, ScrapeError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()?;

        let status = resp.status();
        let text = resp.text()?;

        if status == StatusCode::UNAUTHORIZED {
            let message = serde_json::from_str::<OmdbTitle>(&text)
                .ok()
                .and_then(|t| t.error)
                .unwrap_or_else(|| "API key rejected".to_string());
            if message.to_lowercase().contains("limit") {
                return Err(ScrapeError::RateLimit);
            }
            return Err(ScrapeError::InvalidCredentials(message));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScrapeError::RateLimit);
        }
        if !status.is_success() {
            return Err(ScrapeError::ServerError {
                status: status.as_u16(),
                message: snippet(&text).to_string(),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ScrapeError::Api(format!(
                "Failed to parse OMDb response: {e}. Response: {}",
                snippet(&text)
            ))
        })
    }
}

impl PosterResolver for OmdbClient {
    fn name(&self) -> &'static str {
        "OMDb"
    }

    fn resolve(&self, title: &str) -> Result<String, ScrapeError> {
        let found = self.lookup(title)?;
        if !found.is_found() {
            return Err(ScrapeError::NotFound {
                title: title.to_string(),
                reason: found.error.unwrap_or_else(|| "no match".to_string()),
            });
        }
        match found.poster_url() {
            Some(url) => {
                log::debug!(
                    "OMDb matched '{}' to {} ({}, {}, {})",
                    title,
                    found.title.as_deref().unwrap_or(title),
                    found.year.as_deref().unwrap_or("?"),
                    found.kind.as_deref().unwrap_or("unknown kind"),
                    found.imdb_id.as_deref().unwrap_or("no imdbID"),
                );
                Ok(url.to_string())
            }
            None => Err(ScrapeError::NoPoster {
                title: title.to_string(),
            }),
        }
    }
}
