//! Package-level index of converted themes.
//!
//! The manifest ends up in two documents: the `contributes.themes` array of
//! `package.json`, and the theme list in the generated README.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Serialize, Serializer};
use serde_json::json;

use crate::config::PackageMetadata;
use crate::error::ThemeError;
use crate::theme::UiVariant;

/// One converted theme as listed in `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub label: String,
    #[serde(rename = "uiTheme", serialize_with = "serialize_ui_theme")]
    pub ui_variant: UiVariant,
    /// Package-root-relative path, e.g. `./themes/sakura-color-theme.json`.
    #[serde(rename = "path")]
    pub relative_path: String,
    /// Source theme the entry was generated from.
    #[serde(skip)]
    pub source: PathBuf,
}

fn serialize_ui_theme<S: Serializer>(variant: &UiVariant, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(variant.ui_theme())
}

/// Accumulates manifest entries in insertion order.
///
/// Callers add entries in sorted source order so the manifest is the same
/// on every run and platform.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    entries: Vec<ManifestEntry>,
    paths: HashSet<String>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A second entry with the same `relative_path` is a
    /// `NameCollision` and is not added.
    pub fn add(&mut self, entry: ManifestEntry) -> Result<(), ThemeError> {
        if !self.paths.insert(entry.relative_path.clone()) {
            let mut sources: Vec<PathBuf> = self
                .entries
                .iter()
                .filter(|e| e.relative_path == entry.relative_path)
                .map(|e| e.source.clone())
                .collect();
            sources.push(entry.source);
            return Err(ThemeError::NameCollision {
                file_name: entry.relative_path,
                sources,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> Vec<ManifestEntry> {
        self.entries
    }
}

/// Render the extension's `package.json`.
pub fn render_package_json(
    entries: &[ManifestEntry],
    meta: &PackageMetadata,
) -> serde_json::Result<String> {
    let package = json!({
        "name": meta.name,
        "displayName": meta.display_name,
        "description": meta.description,
        "version": meta.version,
        "publisher": meta.publisher,
        "engines": { "vscode": meta.engine },
        "categories": meta.categories,
        "contributes": { "themes": entries },
        "repository": { "type": "git", "url": meta.repository_url },
        "keywords": meta.keywords,
        "galleryBanner": { "color": meta.banner_color, "theme": meta.banner_theme },
    });
    let mut text = serde_json::to_string_pretty(&package)?;
    text.push('\n');
    Ok(text)
}

/// Render the human-readable README listing every theme and how to install.
pub fn render_readme(entries: &[ManifestEntry], meta: &PackageMetadata) -> String {
    let mut lines = vec![
        format!("# {} for VSCode", meta.display_name),
        String::new(),
        meta.description.clone(),
        String::new(),
        "## Themes Included".to_string(),
        String::new(),
    ];

    if entries.is_empty() {
        lines.push("No themes were converted.".to_string());
    }
    for entry in entries {
        let variant = match entry.ui_variant {
            UiVariant::Dark => "dark",
            UiVariant::Light => "light",
        };
        lines.push(format!("- {} ({})", entry.label, variant));
    }

    lines.extend([
        String::new(),
        "## Installation".to_string(),
        String::new(),
        "1. Copy this entire folder to your VSCode extensions directory".to_string(),
        "2. Restart VSCode".to_string(),
        "3. Go to File > Preferences > Color Theme".to_string(),
        format!("4. Select one of the {}", meta.display_name),
        String::new(),
        "## Source".to_string(),
        String::new(),
        format!(
            "These themes are automatically generated from the [{} IntelliJ plugin]({}).",
            meta.display_name, meta.repository_url
        ),
    ]);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, variant: UiVariant, file: &str) -> ManifestEntry {
        ManifestEntry {
            label: label.to_string(),
            ui_variant: variant,
            relative_path: format!("./themes/{}", file),
            source: PathBuf::from(format!("src/{}.theme.json", label)),
        }
    }

    #[test]
    fn test_builder_keeps_insertion_order() {
        let mut builder = ManifestBuilder::new();
        builder
            .add(entry("Zeta", UiVariant::Dark, "zeta-color-theme.json"))
            .unwrap();
        builder
            .add(entry("Alpha", UiVariant::Light, "alpha-color-theme.json"))
            .unwrap();
        let labels: Vec<_> = builder.build().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_duplicate_path_is_a_collision() {
        let mut builder = ManifestBuilder::new();
        builder
            .add(entry("One", UiVariant::Dark, "same-color-theme.json"))
            .unwrap();
        let err = builder
            .add(entry("Two", UiVariant::Dark, "same-color-theme.json"))
            .unwrap_err();
        match err {
            ThemeError::NameCollision { file_name, sources } => {
                assert_eq!(file_name, "./themes/same-color-theme.json");
                assert_eq!(sources.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_package_json_contributes_themes() {
        let entries = vec![
            entry("Sakura", UiVariant::Dark, "sakura-color-theme.json"),
            entry("Snow", UiVariant::Light, "snow-color-theme.json"),
        ];
        let text = render_package_json(&entries, &PackageMetadata::default()).unwrap();
        assert!(text.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "nanahoshi-themes");
        assert_eq!(value["engines"]["vscode"], "^1.60.0");
        assert_eq!(
            value["contributes"]["themes"],
            json!([
                {"label": "Sakura", "uiTheme": "vs-dark", "path": "./themes/sakura-color-theme.json"},
                {"label": "Snow", "uiTheme": "vs", "path": "./themes/snow-color-theme.json"}
            ])
        );
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.first().map(String::as_str), Some("name"));
        assert_eq!(keys.last().map(String::as_str), Some("galleryBanner"));
    }

    #[test]
    fn test_readme_snapshot() {
        let meta = PackageMetadata {
            display_name: "Demo Themes".to_string(),
            description: "Demo themes converted from IntelliJ.".to_string(),
            repository_url: "https://example.com/demo".to_string(),
            ..PackageMetadata::default()
        };
        let entries = vec![
            entry("Sakura", UiVariant::Dark, "sakura-color-theme.json"),
            entry("Snow", UiVariant::Light, "snow-color-theme.json"),
        ];
        insta::assert_snapshot!(render_readme(&entries, &meta), @r"
        # Demo Themes for VSCode

        Demo themes converted from IntelliJ.

        ## Themes Included

        - Sakura (dark)
        - Snow (light)

        ## Installation

        1. Copy this entire folder to your VSCode extensions directory
        2. Restart VSCode
        3. Go to File > Preferences > Color Theme
        4. Select one of the Demo Themes

        ## Source

        These themes are automatically generated from the [Demo Themes IntelliJ plugin](https://example.com/demo).
        ");
    }

    #[test]
    fn test_readme_without_entries() {
        let text = render_readme(&[], &PackageMetadata::default());
        assert!(text.contains("No themes were converted."));
    }
}
