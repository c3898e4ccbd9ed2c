//! The `<extensions>` block of the IntelliJ plugin descriptor.
//!
//! Only the `com.intellij` extensions block is regenerated. It lists one
//! `<themeProvider>` per theme file; everything outside the block is kept.

use std::path::Path;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::discovery::{discover_files, relative_slash_path};
use crate::sidecar::escape;

static EXTENSIONS_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<extensions\s+defaultExtensionNs="com\.intellij"\s*>"#)
        .expect("extensions start pattern is valid")
});

static EXTENSIONS_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</extensions\s*>").expect("extensions end pattern is valid"));

/// Indentation of provider lines inside the block.
const PROVIDER_INDENT: &str = "        ";
/// Indentation of the closing tag.
const CLOSING_INDENT: &str = "    ";

/// One `<themeProvider>` line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ThemeProvider {
    /// File name without the theme suffix.
    pub id: String,
    /// `/themes/<path relative to the theme root>`.
    pub path: String,
}

impl ThemeProvider {
    fn render(&self) -> String {
        format!(
            "{}<themeProvider id=\"{}\" path=\"{}\"/>",
            PROVIDER_INDENT,
            escape(&self.id, '"'),
            escape(&self.path, '"')
        )
    }
}

/// Providers for every theme below `source_dir`, sorted by id.
pub fn theme_providers(source_dir: &Path, theme_suffix: &str) -> Result<Vec<ThemeProvider>> {
    let mut providers: Vec<ThemeProvider> = discover_files(source_dir, theme_suffix)?
        .into_iter()
        .map(|path| {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let id = file_name
                .strip_suffix(theme_suffix)
                .unwrap_or(&file_name)
                .to_string();
            ThemeProvider {
                id,
                path: format!("/themes/{}", relative_slash_path(source_dir, &path)),
            }
        })
        .collect();
    providers.sort();
    Ok(providers)
}

/// Replace the contents of the `com.intellij` extensions block.
///
/// Returns `None` when the descriptor has no such block.
pub fn substitute_extensions_block(xml: &str, providers: &[ThemeProvider]) -> Option<String> {
    let start = EXTENSIONS_START.find(xml)?;
    let end = EXTENSIONS_END.find_at(xml, start.end())?;

    let mut out = String::with_capacity(xml.len());
    out.push_str(&xml[..start.end()]);
    out.push('\n');
    for provider in providers {
        out.push_str(&provider.render());
        out.push('\n');
    }
    out.push_str(CLOSING_INDENT);
    out.push_str(&xml[end.start()..]);
    Some(out)
}

/// Rewrite the plugin descriptor at `path`. Returns whether it changed.
pub fn update_plugin_xml(path: &Path, providers: &[ThemeProvider]) -> Result<bool> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plugin descriptor {}", path.display()))?;

    let Some(updated) = substitute_extensions_block(&xml, providers) else {
        bail!(
            "Could not find extensions section in plugin descriptor {}",
            path.display()
        );
    };

    if updated == xml {
        tracing::info!("{} is already up to date", path.display());
        return Ok(false);
    }

    std::fs::write(path, updated)
        .with_context(|| format!("Failed to write plugin descriptor {}", path.display()))?;
    tracing::info!(
        "Updated {} with {} theme providers",
        path.display(),
        providers.len()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"<idea-plugin>
    <id>demo</id>
    <extensions defaultExtensionNs="com.intellij">
        <themeProvider id="old" path="/themes/old.theme.json"/>
    </extensions>
    <extensions defaultExtensionNs="other">
        <keep/>
    </extensions>
</idea-plugin>
"#;

    fn provider(id: &str, path: &str) -> ThemeProvider {
        ThemeProvider {
            id: id.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_substitute_rewrites_only_intellij_block() {
        let providers = vec![
            provider("ayaka", "/themes/genshin/ayaka.theme.json"),
            provider("kiana", "/themes/honkai/kiana.theme.json"),
        ];
        let updated = substitute_extensions_block(DESCRIPTOR, &providers).unwrap();
        assert_eq!(
            updated,
            r#"<idea-plugin>
    <id>demo</id>
    <extensions defaultExtensionNs="com.intellij">
        <themeProvider id="ayaka" path="/themes/genshin/ayaka.theme.json"/>
        <themeProvider id="kiana" path="/themes/honkai/kiana.theme.json"/>
    </extensions>
    <extensions defaultExtensionNs="other">
        <keep/>
    </extensions>
</idea-plugin>
"#
        );
        assert_eq!(
            substitute_extensions_block(&updated, &providers).unwrap(),
            updated
        );
    }

    #[test]
    fn test_provider_attributes_are_escaped() {
        let providers = vec![provider("tom&jerry \"v2\"", "/themes/a&b/tom&jerry \"v2\".theme.json")];
        let updated = substitute_extensions_block(DESCRIPTOR, &providers).unwrap();
        assert!(updated.contains(
            r#"<themeProvider id="tom&amp;jerry &quot;v2&quot;" path="/themes/a&amp;b/tom&amp;jerry &quot;v2&quot;.theme.json"/>"#
        ));
    }

    #[test]
    fn test_missing_block() {
        assert_eq!(
            substitute_extensions_block("<idea-plugin/>", &[provider("a", "/themes/a")]),
            None
        );
    }

    #[test]
    fn test_theme_providers_sorted_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for rel in ["zeta/zhongli.theme.json", "alpha/yae.theme.json", "ayaka.theme.json", "ayaka.xml"] {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "{}").unwrap();
        }

        let providers = theme_providers(root, ".theme.json").unwrap();
        assert_eq!(
            providers,
            vec![
                provider("ayaka", "/themes/ayaka.theme.json"),
                provider("yae", "/themes/alpha/yae.theme.json"),
                provider("zhongli", "/themes/zeta/zhongli.theme.json"),
            ]
        );
    }

    #[test]
    fn test_update_plugin_xml_reports_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugin.xml");
        std::fs::write(&path, DESCRIPTOR).unwrap();
        let providers = vec![provider("a", "/themes/a.theme.json")];

        assert!(update_plugin_xml(&path, &providers).unwrap());
        let first = std::fs::read_to_string(&path).unwrap();
        assert!(!update_plugin_xml(&path, &providers).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_update_without_block_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugin.xml");
        std::fs::write(&path, "<idea-plugin/>").unwrap();
        let err = update_plugin_xml(&path, &[]).unwrap_err();
        assert!(err.to_string().contains("Could not find extensions section"));
    }
}
