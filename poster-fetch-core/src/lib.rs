//! Core types for poster-fetch: CSV rows, the sync catalog table, title
//! sanitization and the on-disk poster layout.

pub mod catalog;
pub mod error;
pub mod layout;
pub mod reader;
pub mod sanitize;

pub use catalog::{Catalog, CatalogRow, IMAGE_PATH_COLUMN, IMAGE_URL_COLUMN, TITLE_COLUMN};
pub use error::CatalogError;
pub use layout::{CollisionTracker, flat_poster_path, sorted_poster_path};
pub use reader::{SortRow, SortRows, read_sort_rows, sort_rows_from_reader};
pub use sanitize::{path_component, sanitize_title, underscore_title};

/// A poster URL ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterReference {
    /// URL returned by a metadata lookup (or already present in the CSV).
    Resolved(String),
    /// Fallback URL substituted because the lookup failed.
    Placeholder(String),
}

impl PosterReference {
    pub fn url(&self) -> &str {
        match self {
            Self::Resolved(url) | Self::Placeholder(url) => url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}
