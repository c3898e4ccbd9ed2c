//! Discovery of theme files under the source root.
//!
//! Directory listing order differs between platforms and filesystems, so
//! every list returned here is sorted. Manifest order and collision
//! detection both depend on it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;

/// All files below `root` whose name ends with `suffix`, sorted.
///
/// A missing root is fatal for the run.
pub fn discover_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Theme directory not found: {}", root.display());
    }

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(
        "discovered {} files matching *{} under {}",
        files.len(),
        suffix,
        root.display()
    );
    Ok(files)
}

/// `path` relative to `root`, with `/` separators on every platform.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
