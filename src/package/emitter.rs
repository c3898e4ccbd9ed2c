//! Writing the VS Code package to disk.
//!
//! Output names are planned for the whole run before anything is written, so
//! a collision can fail every theme involved without leaving partial output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::manifest::{render_package_json, render_readme, ManifestEntry};
use crate::config::{CollisionPolicy, PackageMetadata};
use crate::error::{ThemeError, ThemeFailure};
use crate::theme::TargetTheme;

/// Subdirectory of the package holding the color-theme files.
pub const THEMES_DIR: &str = "themes";

/// Appended to the stripped source name.
pub const OUTPUT_SUFFIX: &str = "-color-theme.json";

/// Known source suffixes, longest first. Only the first match is stripped.
pub static SOURCE_SUFFIXES: &[&str] = &[
    ".dark.theme.json",
    ".light.theme.json",
    ".theme.json",
    ".json",
];

/// Derive the output file name for a source theme path.
///
/// `themes/sakura.dark.theme.json` becomes `sakura-color-theme.json`.
pub fn output_file_name(source: &Path) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = SOURCE_SUFFIXES
        .iter()
        .find_map(|suffix| base.strip_suffix(suffix))
        .unwrap_or(base.as_str());
    format!("{}{}", stem, OUTPUT_SUFFIX)
}

/// A source path with a collision-free output name, not yet converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    pub source: PathBuf,
    pub file_name: String,
}

impl PlannedOutput {
    /// Attach the converted theme.
    pub fn with_target(self, target: TargetTheme) -> PlannedTheme {
        PlannedTheme {
            source: self.source,
            file_name: self.file_name,
            target,
        }
    }
}

/// A converted theme with a collision-free output name.
#[derive(Debug, Clone)]
pub struct PlannedTheme {
    pub source: PathBuf,
    pub file_name: String,
    pub target: TargetTheme,
}

impl PlannedTheme {
    /// Path recorded in the manifest.
    pub fn relative_path(&self) -> String {
        format!("./{}/{}", THEMES_DIR, self.file_name)
    }

    pub fn manifest_entry(&self) -> ManifestEntry {
        ManifestEntry {
            label: self.target.name.clone(),
            ui_variant: self.target.ui_variant,
            relative_path: self.relative_path(),
            source: self.source.clone(),
        }
    }
}

/// Outcome of output name planning.
#[derive(Debug, Default)]
pub struct OutputPlan {
    pub planned: Vec<PlannedOutput>,
    pub failures: Vec<ThemeFailure>,
    /// Sources dropped in favour of a later theme under `CollisionPolicy::Overwrite`.
    pub overwritten: Vec<PathBuf>,
}

/// Assign output names and resolve collisions.
///
/// Names depend on the path alone, so planning runs over every discovered
/// source before any of them is parsed: a theme that later fails to load
/// still takes part in its collision group. `sources` must be sorted.
/// Names are compared case-insensitively so the result is the same on
/// case-insensitive filesystems.
pub fn plan_outputs(sources: Vec<PathBuf>, policy: CollisionPolicy) -> OutputPlan {
    let names: Vec<String> = sources.iter().map(|s| output_file_name(s)).collect();

    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, name) in names.iter().enumerate() {
        groups.entry(name.to_lowercase()).or_default().push(index);
    }

    let mut plan = OutputPlan::default();
    for (index, (source, file_name)) in sources.iter().zip(names).enumerate() {
        let group = &groups[&file_name.to_lowercase()];
        if group.len() == 1 {
            plan.planned.push(PlannedOutput {
                source: source.clone(),
                file_name,
            });
            continue;
        }

        match policy {
            CollisionPolicy::Fail => {
                tracing::error!(
                    "{}: output name {} is shared with {} other theme(s)",
                    source.display(),
                    file_name,
                    group.len() - 1
                );
                let error = ThemeError::NameCollision {
                    file_name,
                    sources: group.iter().map(|&i| sources[i].clone()).collect(),
                };
                plan.failures.push(ThemeFailure::new(source.clone(), error));
            }
            CollisionPolicy::Overwrite => {
                if group.last() == Some(&index) {
                    plan.planned.push(PlannedOutput {
                        source: source.clone(),
                        file_name,
                    });
                } else {
                    tracing::warn!(
                        "{}: overwritten by a later theme with output name {}",
                        source.display(),
                        file_name
                    );
                    plan.overwritten.push(source.clone());
                }
            }
        }
    }

    plan
}

/// Writes into a freshly recreated package directory.
#[derive(Debug)]
pub struct FileEmitter {
    root: PathBuf,
}

impl FileEmitter {
    /// Remove `root` if it exists and recreate it with an empty `themes/`.
    pub fn prepare(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.exists() {
            std::fs::remove_dir_all(&root)
                .with_context(|| format!("Failed to clean output directory {}", root.display()))?;
        }
        let themes_dir = root.join(THEMES_DIR);
        std::fs::create_dir_all(&themes_dir)
            .with_context(|| format!("Failed to create {}", themes_dir.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one color-theme file and return its package-relative path.
    pub fn emit(&self, theme: &PlannedTheme) -> Result<String, ThemeError> {
        let path = self.root.join(THEMES_DIR).join(&theme.file_name);
        let mut text = serde_json::to_string_pretty(&theme.target).map_err(|e| {
            ThemeError::MalformedDocument(format!("failed to serialize theme: {}", e))
        })?;
        text.push('\n');
        std::fs::write(&path, text).map_err(|e| ThemeError::io(&path, e))?;
        tracing::info!(
            "Generated VSCode theme: {} -> {}",
            theme.target.name,
            theme.file_name
        );
        Ok(theme.relative_path())
    }

    /// Write `package.json` and `README.md`.
    pub fn write_package(&self, entries: &[ManifestEntry], meta: &PackageMetadata) -> Result<()> {
        let package_json = self.root.join("package.json");
        let rendered = render_package_json(entries, meta)
            .with_context(|| format!("Failed to render {}", package_json.display()))?;
        std::fs::write(&package_json, rendered)
            .with_context(|| format!("Failed to write {}", package_json.display()))?;

        let readme = self.root.join("README.md");
        std::fs::write(&readme, render_readme(entries, meta))
            .with_context(|| format!("Failed to write {}", readme.display()))?;
        Ok(())
    }
}
