use poster_fetch_core::PosterReference;

use crate::error::ScrapeError;

/// Something that can turn a title into a poster URL.
pub trait PosterResolver {
    /// Short name used in log lines, e.g. "OMDb".
    fn name(&self) -> &'static str;

    /// Look up `title` and return the URL of its poster.
    fn resolve(&self, title: &str) -> Result<String, ScrapeError>;
}

/// Resolve a title, substituting `placeholder` when the lookup fails.
///
/// Lookup failures are logged and never returned, except fatal ones
/// (rejected credentials, bad configuration) which would fail for every
/// remaining row too.
pub fn resolve_or_placeholder(
    resolver: &dyn PosterResolver,
    title: &str,
    placeholder: &str,
) -> Result<PosterReference, ScrapeError> {
    match resolver.resolve(title) {
        Ok(url) => Ok(PosterReference::Resolved(url)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            if e.is_not_found() {
                log::warn!("{e}; using placeholder");
            } else {
                log::warn!("Error fetching poster for '{title}' from {}: {e}", resolver.name());
            }
            Ok(PosterReference::Placeholder(placeholder.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(fn(&str) -> Result<String, ScrapeError>);

    impl PosterResolver for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn resolve(&self, title: &str) -> Result<String, ScrapeError> {
            (self.0)(title)
        }
    }

    const PLACEHOLDER: &str = "https://via.placeholder.com/200x300?text=No+Image";

    #[test]
    fn resolved_url_passes_through() {
        let r = Fixed(|t| Ok(format!("https://img/{t}.jpg")));
        let got = resolve_or_placeholder(&r, "Heat", PLACEHOLDER).unwrap();
        assert_eq!(got, PosterReference::Resolved("https://img/Heat.jpg".into()));
    }

    #[test]
    fn not_found_becomes_placeholder() {
        let r = Fixed(|t| {
            Err(ScrapeError::NotFound {
                title: t.to_string(),
                reason: "Movie not found!".into(),
            })
        });
        let got = resolve_or_placeholder(&r, "Zzzzz", PLACEHOLDER).unwrap();
        assert!(got.is_placeholder());
        assert_eq!(got.url(), PLACEHOLDER);
    }

    #[test]
    fn transport_error_becomes_placeholder() {
        let r = Fixed(|_| Err(ScrapeError::Api("bad json".into())));
        let got = resolve_or_placeholder(&r, "Heat", PLACEHOLDER).unwrap();
        assert!(got.is_placeholder());
    }

    #[test]
    fn invalid_credentials_are_fatal() {
        let r = Fixed(|_| Err(ScrapeError::InvalidCredentials("Invalid API key!".into())));
        let err = resolve_or_placeholder(&r, "Heat", PLACEHOLDER).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidCredentials(_)));
    }
}
