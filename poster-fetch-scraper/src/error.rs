use poster_fetch_core::CatalogError;

/// Errors that can occur while resolving or downloading posters.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by the metadata API")]
    RateLimit,

    #[error("No results found for '{title}': {reason}")]
    NotFound { title: String, reason: String },

    #[error("No poster found for '{title}'")]
    NoPoster { title: String },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Errors that make every following lookup pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidCredentials(_) | Self::Config(_))
    }

    /// True when the lookup simply had no answer for this title.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NoPoster { .. })
    }
}
