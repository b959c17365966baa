//! Folder path decomposition.
//!
//! Folder paths have the form `folders/<Seg>/.../<Last>.yy`: the first
//! segment is always the root marker and the last one carries the unit-file
//! suffix.

use super::error::ExportError;

/// First segment of every folder path
pub const FOLDER_ROOT: &str = "folders";

/// Suffix carried by the last segment of every folder path
pub const FOLDER_SUFFIX: &str = ".yy";

/// Split a folder path into its hierarchy segments, root marker and suffix removed.
///
/// `folders/Scripts/Sub.yy` becomes `["Scripts", "Sub"]`.
pub fn decompose(path: &str) -> Result<Vec<String>, ExportError> {
    let mut segments = path.split('/');

    match segments.next() {
        Some(FOLDER_ROOT) => {}
        _ => {
            return Err(ExportError::malformed(
                path,
                format!("expected first segment '{FOLDER_ROOT}'"),
            ))
        }
    }

    let mut names: Vec<String> = segments.map(str::to_string).collect();

    let Some(last) = names.last_mut() else {
        return Err(ExportError::malformed(path, "expected at least two segments"));
    };
    let Some(stripped) = last.strip_suffix(FOLDER_SUFFIX) else {
        return Err(ExportError::malformed(
            path,
            format!("last segment lacks '{FOLDER_SUFFIX}' suffix"),
        ));
    };
    *last = stripped.to_string();

    if names.iter().any(String::is_empty) {
        return Err(ExportError::malformed(path, "empty segment"));
    }

    Ok(names)
}

/// Rebuild a folder path from a prefix and segment names.
///
/// Inverse of [`decompose`] when `prefix` is [`FOLDER_ROOT`].
pub fn compose<S: AsRef<str>>(prefix: &str, segments: &[S]) -> String {
    let mut path = prefix.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(segment.as_ref());
    }
    path.push_str(FOLDER_SUFFIX);
    path
}
