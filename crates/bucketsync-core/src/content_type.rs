//! Content-type resolution for uploaded objects
//!
//! Lookup order: configured overrides, then the standard extension table,
//! then [`FALLBACK_CONTENT_TYPE`]. File contents are never inspected.

use std::collections::HashMap;

use crate::domain::newtypes::RelativePath;

/// Content type used when the extension is missing or unknown
pub const FALLBACK_CONTENT_TYPE: &str = "application/binary";

/// Maps a relative path to the `Content-Type` stored with its object
#[derive(Debug, Clone, Default)]
pub struct ContentTypeResolver {
    overrides: HashMap<String, String>,
}

impl ContentTypeResolver {
    /// Creates a resolver using only the standard table
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with extension overrides
    ///
    /// Keys are matched case-insensitively; a leading dot is ignored.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let overrides = overrides
            .iter()
            .map(|(ext, mime)| (normalize_extension(ext), mime.clone()))
            .collect();
        Self { overrides }
    }

    /// Resolves the content type for `relative`
    pub fn resolve(&self, relative: &RelativePath) -> String {
        let Some(ext) = relative.extension() else {
            return FALLBACK_CONTENT_TYPE.to_string();
        };

        let ext = normalize_extension(ext);
        if let Some(mime) = self.overrides.get(&ext) {
            return mime.clone();
        }

        mime_guess::from_ext(&ext)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
