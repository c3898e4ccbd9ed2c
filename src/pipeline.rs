//! Orchestration of the conversion commands.
//!
//! Each command walks the source tree in sorted order. Failures scoped to one
//! theme are logged, recorded in the [`RunSummary`] and skipped; anything that
//! makes the whole run meaningless is returned as an `anyhow::Error`.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::discovery::discover_files;
use crate::error::ThemeFailure;
use crate::package::{plan_outputs, FileEmitter, ManifestBuilder};
use crate::plugin_xml;
use crate::sidecar::{sidecar_path_for, sync_sidecar, SyncOutcome};
use crate::theme::{filter_file, load_filtered, map_to_target, ThemeDocument};

/// Suffix of every structured file the property cleaner rewrites.
const CLEANABLE_SUFFIX: &str = ".json";

/// Counters and failures of one command (or of `all`).
#[derive(Debug, Default)]
pub struct RunSummary {
    pub discovered: usize,
    pub converted: usize,
    pub sidecars_synced: usize,
    pub sidecars_in_sync: usize,
    pub properties_removed: usize,
    pub files_cleaned: usize,
    /// `Some(changed)` when the plugin descriptor was processed.
    pub plugin_xml_updated: Option<bool>,
    /// Per-theme failures. Any entry makes the run unsuccessful.
    pub failures: Vec<ThemeFailure>,
    /// Companion descriptor problems, reported as warnings.
    pub sidecar_failures: Vec<ThemeFailure>,
    /// Sources dropped because a later theme took their output name.
    pub overwritten: Vec<PathBuf>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold the result of a later step into this one. A source that already
    /// failed is not reported a second time.
    pub fn absorb(&mut self, other: RunSummary) {
        self.discovered = self.discovered.max(other.discovered);
        self.converted += other.converted;
        self.sidecars_synced += other.sidecars_synced;
        self.sidecars_in_sync += other.sidecars_in_sync;
        self.properties_removed += other.properties_removed;
        self.files_cleaned += other.files_cleaned;
        self.plugin_xml_updated = other.plugin_xml_updated.or(self.plugin_xml_updated);
        self.overwritten.extend(other.overwritten);

        let failed: HashSet<PathBuf> = self.failures.iter().map(|f| f.source.clone()).collect();
        self.failures.extend(
            other
                .failures
                .into_iter()
                .filter(|f| !failed.contains(&f.source)),
        );
        self.sidecar_failures.extend(other.sidecar_failures);
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Themes discovered:        {}", self.discovered)?;
        writeln!(f, "Themes converted:         {}", self.converted)?;
        writeln!(f, "Sidecars synced:          {}", self.sidecars_synced)?;
        writeln!(f, "Sidecars already in sync: {}", self.sidecars_in_sync)?;
        writeln!(
            f,
            "Properties removed:       {} (in {} files)",
            self.properties_removed, self.files_cleaned
        )?;
        match self.plugin_xml_updated {
            Some(true) => writeln!(f, "Plugin descriptor:        updated")?,
            Some(false) => writeln!(f, "Plugin descriptor:        already up to date")?,
            None => {}
        }
        for source in &self.overwritten {
            writeln!(f, "Overwritten:              {}", source.display())?;
        }
        writeln!(f, "Errors:                   {}", self.failures.len())?;
        for failure in &self.failures {
            writeln!(f, "  [{}] {}", failure.error.kind(), failure)?;
        }
        if !self.sidecar_failures.is_empty() {
            writeln!(f, "Warnings:                 {}", self.sidecar_failures.len())?;
            for failure in &self.sidecar_failures {
                writeln!(f, "  [{}] {}", failure.error.kind(), failure)?;
            }
        }
        Ok(())
    }
}

/// Runs the commands against one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert every source theme and write the VS Code package.
    ///
    /// Nothing is written (and the destination is left alone) when no theme
    /// is found. Output names are collision-checked over every discovered
    /// path, and every theme is converted, before the destination is
    /// recreated.
    pub fn convert(&self) -> Result<RunSummary> {
        let _span = tracing::info_span!("convert").entered();
        let config = &self.config;
        let files = discover_files(&config.source_dir, &config.theme_suffix)?;

        let mut summary = RunSummary {
            discovered: files.len(),
            ..RunSummary::default()
        };
        if files.is_empty() {
            tracing::warn!(
                "No theme files matching *{} under {}; output left untouched",
                config.theme_suffix,
                config.source_dir.display()
            );
            return Ok(summary);
        }
        self.check_output_dir()?;

        let plan = plan_outputs(files, config.collision_policy);
        summary.failures.extend(plan.failures);
        summary.overwritten = plan.overwritten;

        let roles = config.role_table();
        let mut converted = Vec::with_capacity(plan.planned.len());
        for output in plan.planned {
            match load_filtered(&output.source, &config.property_prefixes) {
                Ok(loaded) => {
                    summary.properties_removed += loaded.removed_properties;
                    let target = map_to_target(&loaded.document, &roles);
                    tracing::debug!(
                        "{}: mapped {} colors, {} token rules",
                        output.source.display(),
                        target.workbench_colors.len(),
                        target.token_colors.len()
                    );
                    converted.push(output.with_target(target));
                }
                Err(error) => {
                    tracing::error!("Error processing {}: {}", output.source.display(), error);
                    summary.failures.push(ThemeFailure::new(output.source, error));
                }
            }
        }

        let emitter = FileEmitter::prepare(&config.output_dir)?;
        let mut manifest = ManifestBuilder::new();
        for planned in &converted {
            let result = emitter
                .emit(planned)
                .and_then(|_| manifest.add(planned.manifest_entry()));
            match result {
                Ok(()) => summary.converted += 1,
                Err(error) => {
                    tracing::error!("Error writing {}: {}", planned.source.display(), error);
                    summary
                        .failures
                        .push(ThemeFailure::new(planned.source.clone(), error));
                }
            }
        }

        emitter.write_package(&manifest.build(), &config.package)?;
        tracing::info!(
            "Converted {} of {} themes into {}",
            summary.converted,
            summary.discovered,
            config.output_dir.display()
        );
        Ok(summary)
    }

    /// Strip prefixed properties from every JSON file under the source root,
    /// rewriting only files that changed.
    pub fn clean_properties(&self) -> Result<RunSummary> {
        let _span = tracing::info_span!("clean_properties").entered();
        let config = &self.config;
        let mut summary = RunSummary::default();

        for path in discover_files(&config.source_dir, CLEANABLE_SUFFIX)? {
            match filter_file(&path, &config.property_prefixes) {
                Ok(0) => {}
                Ok(removed) => {
                    summary.properties_removed += removed;
                    summary.files_cleaned += 1;
                }
                Err(error) => {
                    tracing::error!("Error cleaning {}: {}", path.display(), error);
                    summary.failures.push(ThemeFailure::new(path, error));
                }
            }
        }

        tracing::info!(
            "Removed {} properties from {} files",
            summary.properties_removed,
            summary.files_cleaned
        );
        Ok(summary)
    }

    /// Bring every theme's companion descriptor in line with its name.
    pub fn sync_names(&self) -> Result<RunSummary> {
        let _span = tracing::info_span!("sync_names").entered();
        let config = &self.config;
        let files = discover_files(&config.source_dir, &config.theme_suffix)?;
        let mut summary = RunSummary {
            discovered: files.len(),
            ..RunSummary::default()
        };

        for path in files {
            let doc = match ThemeDocument::from_file(&path) {
                Ok(doc) => doc,
                Err(error) => {
                    tracing::error!("Error reading {}: {}", path.display(), error);
                    summary.failures.push(ThemeFailure::new(path, error));
                    continue;
                }
            };
            match sync_sidecar(&doc, &sidecar_path_for(&path, &config.theme_suffix)) {
                Ok(SyncOutcome::Updated { previous }) => {
                    tracing::debug!("{}: renamed from '{}'", path.display(), previous);
                    summary.sidecars_synced += 1;
                }
                Ok(SyncOutcome::AlreadyInSync) => summary.sidecars_in_sync += 1,
                Err(error) => {
                    tracing::warn!("Skipping sidecar of {}: {}", path.display(), error);
                    summary.sidecar_failures.push(ThemeFailure::new(path, error));
                }
            }
        }
        Ok(summary)
    }

    /// Regenerate the theme providers of the plugin descriptor. A missing
    /// descriptor is skipped with a warning.
    pub fn update_plugin_xml(&self) -> Result<RunSummary> {
        let _span = tracing::info_span!("plugin_xml").entered();
        let config = &self.config;
        let mut summary = RunSummary::default();

        if !config.plugin_xml.is_file() {
            tracing::warn!(
                "Plugin descriptor not found: {}",
                config.plugin_xml.display()
            );
            return Ok(summary);
        }

        let providers = plugin_xml::theme_providers(&config.source_dir, &config.theme_suffix)?;
        summary.discovered = providers.len();
        summary.plugin_xml_updated =
            Some(plugin_xml::update_plugin_xml(&config.plugin_xml, &providers)?);
        Ok(summary)
    }

    /// Every command in dependency order: clean, sync names, plugin
    /// descriptor, convert.
    pub fn run_all(&self) -> Result<RunSummary> {
        let mut summary = self.clean_properties()?;
        summary.absorb(self.sync_names()?);
        summary.absorb(self.update_plugin_xml()?);
        summary.absorb(self.convert()?);
        Ok(summary)
    }

    /// Recreating the output directory must never delete the source tree.
    fn check_output_dir(&self) -> Result<()> {
        let output = &self.config.output_dir;
        if !output.exists() {
            return Ok(());
        }
        let output = canonical(output)?;
        let source = canonical(&self.config.source_dir)?;
        if source.starts_with(&output) {
            bail!(
                "Output directory {} contains the theme directory {}",
                output.display(),
                source.display()
            );
        }
        Ok(())
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))
}
