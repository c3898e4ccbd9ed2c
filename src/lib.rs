//! Conversion of IntelliJ color themes into a VS Code color-theme package.
//!
//! The [`pipeline::Pipeline`] drives the commands; the modules below it can
//! be used on their own to parse, filter, map and emit single themes.

pub mod config;
pub mod config_io;
pub mod discovery;
pub mod error;
pub mod package;
pub mod pipeline;
pub mod plugin_xml;
pub mod sidecar;
pub mod theme;

pub use config::{CollisionPolicy, Config, PackageMetadata};
pub use error::{ThemeError, ThemeErrorKind, ThemeFailure};
pub use pipeline::{Pipeline, RunSummary};
