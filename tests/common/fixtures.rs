use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use theme_bridge::Config;

/// A throwaway plugin project: `themes/` with theme files and descriptors,
/// `out/` as the package destination, and a `plugin.xml`.
pub struct ThemeTree {
    _dir: TempDir,
    pub root: PathBuf,
}

impl ThemeTree {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().to_path_buf();
        std::fs::create_dir_all(root.join("themes"))?;
        Ok(Self { _dir: dir, root })
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join("themes")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("out")
    }

    pub fn plugin_xml(&self) -> PathBuf {
        self.root.join("plugin.xml")
    }

    /// Configuration pointing at this tree.
    pub fn config(&self) -> Config {
        Config {
            source_dir: self.source_dir(),
            output_dir: self.output_dir(),
            plugin_xml: self.plugin_xml(),
            ..Config::default()
        }
    }

    /// Write `contents` at `rel` below the theme directory.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.source_dir().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write a theme file with a matching scheme descriptor next to it.
    pub fn add_theme(&self, rel: &str, json: &str, scheme_name: &str) -> PathBuf {
        let path = self.write(rel, json);
        let xml_rel = rel.trim_end_matches(".theme.json").to_string() + ".xml";
        self.write(
            &xml_rel,
            &format!(
                "<scheme name=\"{}\" version=\"142\" parent_scheme=\"Darcula\">\n  <colors/>\n</scheme>\n",
                scheme_name
            ),
        );
        path
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.root.join(path)).unwrap()
    }

    /// Every file below `dir` keyed by its `/`-separated relative path.
    pub fn snapshot(&self, dir: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(dir, dir, &mut files);
        files
    }
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            files.insert(rel, std::fs::read(&path).unwrap());
        }
    }
}
