//! Pipeline configuration.
//!
//! Every field has a default so an empty (or absent) config file yields the
//! layout the IntelliJ plugin project uses. Values can be overridden from the
//! command line after loading.

use std::collections::BTreeMap;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::theme::RoleTable;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "theme-bridge.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Root of the IntelliJ theme tree.
    pub source_dir: PathBuf,

    /// Destination of the generated VS Code package. Recreated on every run.
    pub output_dir: PathBuf,

    /// File name suffix identifying theme documents inside `source_dir`.
    pub theme_suffix: String,

    /// Keys starting with any of these (case-insensitive) are stripped.
    pub property_prefixes: Vec<String>,

    /// What to do when two themes derive the same output file name.
    pub collision_policy: CollisionPolicy,

    /// Entries merged over the built-in role table. An empty destination
    /// removes the built-in role.
    pub role_overrides: BTreeMap<String, String>,

    /// Plugin descriptor whose `<extensions>` block lists every theme.
    pub plugin_xml: PathBuf,

    /// Metadata written to the generated `package.json` and README.
    pub package: PackageMetadata,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src/main/resources/themes"),
            output_dir: PathBuf::from("build/vscode-themes"),
            theme_suffix: ".theme.json".to_string(),
            property_prefixes: vec!["doki".to_string()],
            collision_policy: CollisionPolicy::default(),
            role_overrides: BTreeMap::new(),
            plugin_xml: PathBuf::from("src/main/resources/META-INF/plugin.xml"),
            package: PackageMetadata::default(),
        }
    }
}

impl Config {
    /// The built-in role table with `role_overrides` applied.
    pub fn role_table(&self) -> RoleTable {
        RoleTable::builtin().with_overrides(&self.role_overrides)
    }
}

/// Resolution of output name collisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Every theme involved in a collision fails and nothing is written for it.
    #[default]
    Fail,
    /// The lexicographically last source path wins; the others are skipped.
    Overwrite,
}

/// Fields of the generated extension manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PackageMetadata {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub publisher: String,
    /// Value of `engines.vscode`.
    pub engine: String,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub repository_url: String,
    pub banner_color: String,
    pub banner_theme: String,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: "nanahoshi-themes".to_string(),
            display_name: "Nanahoshi Themes".to_string(),
            description:
                "Beautiful anime-inspired themes for VSCode, converted from IntelliJ themes"
                    .to_string(),
            version: "1.0.0".to_string(),
            publisher: "nanahoshi".to_string(),
            engine: "^1.60.0".to_string(),
            categories: vec!["Themes".to_string()],
            keywords: ["theme", "dark", "anime", "genshin", "honkai", "wuthering"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            repository_url: "https://github.com/nanahoshi/nanahoshi-theme".to_string(),
            banner_color: "#1A1820".to_string(),
            banner_theme: "dark".to_string(),
        }
    }
}
