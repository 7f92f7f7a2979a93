use serde::Deserialize;

/// Sentinel OMDb uses for absent fields.
pub const OMDB_NOT_AVAILABLE: &str = "N/A";

/// Response body of an OMDb `?t=` title lookup.
///
/// OMDb capitalises most field names. Everything is optional because a
/// failed lookup only carries `Response` and `Error`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct OmdbTitle {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

impl OmdbTitle {
    /// Whether OMDb reported a match (`"Response": "True"`).
    pub fn is_found(&self) -> bool {
        self.response.as_deref() == Some("True")
    }

    /// The poster URL, unless it is missing, empty or `N/A`.
    pub fn poster_url(&self) -> Option<&str> {
        self.poster
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != OMDB_NOT_AVAILABLE)
    }
}

/// Response body of the IMDb suggestion (search-as-you-type) endpoint.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SuggestionResponse {
    #[serde(rename = "d", default)]
    pub results: Vec<Suggestion>,
}

/// One search hit. Title ids start with `tt`, people with `nm`.
#[derive(Debug, Deserialize, Clone)]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "l", default)]
    pub label: Option<String>,
    /// Kind of title, e.g. "feature" or "TV series".
    #[serde(rename = "q", default)]
    pub qualifier: Option<String>,
    #[serde(rename = "y", default)]
    pub year: Option<i32>,
    #[serde(rename = "i", default)]
    pub image: Option<SuggestionImage>,
}

impl Suggestion {
    pub fn is_title(&self) -> bool {
        self.id.starts_with("tt")
    }

    /// Cover image URL, if IMDb has one for this hit.
    pub fn cover_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .map(|i| i.image_url.as_str())
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SuggestionImage {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}
