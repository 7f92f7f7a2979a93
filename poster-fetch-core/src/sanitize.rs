/// Stem used when a title sanitizes down to nothing.
const EMPTY_STEM: &str = "untitled";

/// Reduce a title to a filename stem.
///
/// Keeps alphanumerics (Unicode-aware), spaces and `._-`, drops everything
/// else, then replaces spaces with underscores. Used for the flat
/// `<images_dir>/<stem>.jpg` layout.
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .collect();
    let stem = kept.replace(' ', "_");
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        EMPTY_STEM.to_string()
    } else {
        stem
    }
}

/// Filename stem for the category layout: spaces become underscores and
/// nothing else is dropped, apart from path separators.
pub fn underscore_title(title: &str) -> String {
    let stem = path_component(title).replace(' ', "_");
    if stem.is_empty() {
        EMPTY_STEM.to_string()
    } else {
        stem
    }
}

/// Make a CSV value safe to use as a single path component.
///
/// Path separators are replaced with `_`, and `.`/`..` are escaped so a row
/// can never climb out of the save directory.
pub fn path_component(value: &str) -> String {
    let replaced: String = value
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    match replaced.as_str() {
        "." | ".." => replaced.replace('.', "_"),
        _ => replaced,
    }
}
