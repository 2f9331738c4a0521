//! Path utilities

use std::path::Path;

/// Path helpers used by the CLI
pub struct PathUtils;

impl PathUtils {
    /// Get file extension from path, without the dot
    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .filter(|ext| !ext.is_empty())
    }

    /// Display form of a path for logs and summaries
    pub fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }
}
