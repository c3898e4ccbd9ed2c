//! Theme loading from the filesystem.
//!
//! The pure parsing lives in `types`; this module adds file reading and the
//! read → filter → parse sequence the pipeline runs for every theme.

use std::path::Path;

use super::filter::filter_properties;
use super::types::ThemeDocument;
use crate::error::ThemeError;

impl ThemeDocument {
    /// Load a theme document from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| ThemeError::io(path, e))?;
        Self::parse(&raw)
    }
}

/// A theme read from disk after property filtering.
#[derive(Debug, Clone)]
pub struct LoadedTheme {
    pub document: ThemeDocument,
    /// Properties the filter dropped before parsing.
    pub removed_properties: usize,
}

/// Read a source file as text. Bytes that are not UTF-8 make the document
/// malformed; only a failed read is an I/O error.
pub(crate) fn read_text(path: &Path) -> Result<String, ThemeError> {
    let bytes = std::fs::read(path).map_err(|e| ThemeError::io(path, e))?;
    String::from_utf8(bytes)
        .map_err(|e| ThemeError::MalformedDocument(format!("invalid UTF-8: {}", e.utf8_error())))
}

/// Read `path`, strip properties matching `prefixes`, and parse the result.
pub fn load_filtered(path: &Path, prefixes: &[String]) -> Result<LoadedTheme, ThemeError> {
    let raw = read_text(path)?;
    let filtered = filter_properties(&raw, prefixes)?;
    let document = ThemeDocument::parse(filtered.text.as_bytes())?;
    Ok(LoadedTheme {
        document,
        removed_properties: filtered.removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ThemeDocument::from_file(dir.path().join("absent.theme.json")).unwrap_err();
        assert!(matches!(err, ThemeError::Io { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed_not_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.theme.json");
        std::fs::write(&path, b"{\"name\": \"\xff\xfe\"}").unwrap();

        let err = load_filtered(&path, &["doki".to_string()]).unwrap_err();
        assert!(matches!(err, ThemeError::MalformedDocument(_)), "{err}");
        assert!(matches!(
            read_text(&path),
            Err(ThemeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_load_filtered_drops_prefixed_keys_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sakura.theme.json");
        std::fs::write(
            &path,
            r##"{"name": "Sakura", "dark": true, "dokiThemeId": "1", "colors": {"dokiAccent": "#ff00ff", "editor.background": "#1a1820"}}"##,
        )
        .unwrap();

        let loaded = load_filtered(&path, &["doki".to_string()]).unwrap();
        assert_eq!(loaded.removed_properties, 2);
        assert_eq!(loaded.document.name, "Sakura");
        assert!(!loaded.document.metadata_extra.contains_key("dokiThemeId"));
        assert!(!loaded.document.colors.contains_key("dokiAccent"));
        assert!(loaded.document.colors.contains_key("editor.background"));
    }
}
