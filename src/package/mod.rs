//! The generated VS Code package: manifest rendering and file emission.

mod emitter;
mod manifest;

pub use emitter::{
    output_file_name, plan_outputs, FileEmitter, OutputPlan, PlannedOutput, PlannedTheme,
    OUTPUT_SUFFIX, SOURCE_SUFFIXES, THEMES_DIR,
};
pub use manifest::{render_package_json, render_readme, ManifestBuilder, ManifestEntry};
