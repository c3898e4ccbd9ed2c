//! Structural removal of internal properties from theme JSON.
//!
//! Keys are deleted from the parsed tree, never from text lines, so the
//! result is always a well-formed document no matter where the removed
//! entries sat (first or last member, multi-line values, nested objects).

use std::path::Path;

use serde_json::Value;

use super::loader::read_text;
use crate::error::ThemeError;

/// Result of filtering one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// The filtered document. Identical to the input when nothing matched.
    pub text: String,
    /// Number of keys removed. Children of a removed key are not counted.
    pub removed: usize,
}

impl FilterOutcome {
    pub fn changed(&self) -> bool {
        self.removed > 0
    }
}

/// Remove every key, at any depth, whose name starts with one of `prefixes`
/// (compared case-insensitively). Empty prefixes are ignored.
pub fn filter_properties(raw: &str, prefixes: &[String]) -> Result<FilterOutcome, ThemeError> {
    let mut value: Value = serde_json::from_str(raw)
        .map_err(|e| ThemeError::MalformedDocument(format!("invalid JSON: {}", e)))?;

    let prefixes: Vec<String> = prefixes
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();

    let removed = remove_matching_keys(&mut value, &prefixes);
    if removed == 0 {
        return Ok(FilterOutcome {
            text: raw.to_string(),
            removed,
        });
    }

    let mut text = serde_json::to_string_pretty(&value)
        .map_err(|e| ThemeError::MalformedDocument(format!("failed to serialize: {}", e)))?;
    text.push('\n');
    Ok(FilterOutcome { text, removed })
}

/// Filter a file in place. The file is only rewritten when a key was removed.
pub fn filter_file(path: &Path, prefixes: &[String]) -> Result<usize, ThemeError> {
    let raw = read_text(path)?;
    let outcome = filter_properties(&raw, prefixes)?;
    if outcome.changed() {
        std::fs::write(path, &outcome.text).map_err(|e| ThemeError::io(path, e))?;
        tracing::debug!(
            "removed {} properties from {}",
            outcome.removed,
            path.display()
        );
    }
    Ok(outcome.removed)
}

fn key_matches(key: &str, prefixes: &[String]) -> bool {
    let key = key.to_lowercase();
    prefixes.iter().any(|prefix| key.starts_with(prefix.as_str()))
}

fn remove_matching_keys(value: &mut Value, prefixes: &[String]) -> usize {
    if prefixes.is_empty() {
        return 0;
    }
    match value {
        Value::Object(map) => {
            let before = map.len();
            map.retain(|key, _| !key_matches(key, prefixes));
            let mut removed = before - map.len();
            for (_, child) in map.iter_mut() {
                removed += remove_matching_keys(child, prefixes);
            }
            removed
        }
        Value::Array(items) => items
            .iter_mut()
            .map(|item| remove_matching_keys(item, prefixes))
            .sum(),
        _ => 0,
    }
}
