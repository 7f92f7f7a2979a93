use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::sanitize::{path_component, sanitize_title, underscore_title};

/// Extension given to every downloaded poster, regardless of the remote format.
pub const POSTER_EXTENSION: &str = "jpg";

/// Poster path for the category layout: `<save_dir>/<kind>/<vibe>/<Title_With_Underscores>.jpg`.
pub fn sorted_poster_path(save_dir: &Path, kind: &str, vibe: &str, title: &str) -> PathBuf {
    save_dir
        .join(path_component(kind))
        .join(path_component(vibe))
        .join(format!("{}.{}", underscore_title(title), POSTER_EXTENSION))
}

/// Poster path for the flat layout: `<images_dir>/<sanitized_title>.jpg`.
pub fn flat_poster_path(images_dir: &Path, title: &str) -> PathBuf {
    images_dir.join(format!("{}.{}", sanitize_title(title), POSTER_EXTENSION))
}

/// Tracks which title claimed each poster path during a run.
///
/// Two different titles can sanitize to the same filename. Nothing is
/// renamed; the tracker only reports the clash so it can be logged.
#[derive(Debug, Default)]
pub struct CollisionTracker {
    claimed: HashMap<PathBuf, String>,
}

impl CollisionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `title` maps to `path`.
    ///
    /// Returns the previously recorded title when a *different* title already
    /// claimed the same path. Repeating the same title is not a collision.
    pub fn claim(&mut self, path: &Path, title: &str) -> Option<String> {
        match self.claimed.get(path) {
            Some(existing) if existing != title => Some(existing.clone()),
            Some(_) => None,
            None => {
                self.claimed.insert(path.to_path_buf(), title.to_string());
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_path_matches_category_layout() {
        let path = sorted_poster_path(Path::new("posters"), "movie", "mind-bending", "Inception");
        assert_eq!(path, Path::new("posters/movie/mind-bending/Inception.jpg"));
    }

    #[test]
    fn sorted_path_underscores_title() {
        let path = sorted_poster_path(Path::new("p"), "tv", "cozy", "Gilmore Girls");
        assert_eq!(path, Path::new("p/tv/cozy/Gilmore_Girls.jpg"));
    }

    #[test]
    fn sorted_path_cannot_escape_save_dir() {
        let path = sorted_poster_path(Path::new("p"), "..", "a/b", "x");
        assert_eq!(path, Path::new("p/__/a_b/x.jpg"));
    }

    #[test]
    fn flat_path_sanitizes_title() {
        let path = flat_poster_path(Path::new("images"), "Spider-Man: Homecoming");
        assert_eq!(path, Path::new("images/Spider-Man_Homecoming.jpg"));
    }

    #[test]
    fn collision_reported_for_distinct_titles() {
        let mut tracker = CollisionTracker::new();
        let a = flat_poster_path(Path::new("i"), "Alien: Covenant");
        let b = flat_poster_path(Path::new("i"), "Alien Covenant");
        assert_eq!(a, b);
        assert_eq!(tracker.claim(&a, "Alien: Covenant"), None);
        assert_eq!(
            tracker.claim(&b, "Alien Covenant"),
            Some("Alien: Covenant".to_string())
        );
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn same_title_twice_is_not_a_collision() {
        let mut tracker = CollisionTracker::new();
        let p = flat_poster_path(Path::new("i"), "Heat");
        assert_eq!(tracker.claim(&p, "Heat"), None);
        assert_eq!(tracker.claim(&p, "Heat"), None);
    }
}
