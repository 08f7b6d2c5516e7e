//! File naming rules for forest files

use std::path::{Path, PathBuf};

use crate::forest::encoder::ForestFormat;

/// Extension of the legacy array formats (v1 and v3)
pub const LEGACY_EXTENSION: &str = ".forest.json";

/// Extension of the canonical line-delimited format (v4)
pub const CANONICAL_EXTENSION: &str = ".forest4.json";

/// Name of the scene container an imported file is placed in
///
/// The forest extension is stripped from the file name. A file name that
/// carries neither forest extension is used as-is.
pub fn container_name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    [CANONICAL_EXTENSION, LEGACY_EXTENSION]
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .map_or_else(|| file_name.clone(), str::to_string)
}

/// Append the format's extension unless the path already carries it
pub fn with_format_extension(path: &Path, format: ForestFormat) -> PathBuf {
    let ext = format.file_extension();
    let has_ext = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(ext));

    if has_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(ext);
        PathBuf::from(name)
    }
}
