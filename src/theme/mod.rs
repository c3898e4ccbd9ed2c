//! Theme module - source documents and their conversion
//!
//! This module is organized into:
//!
//! - **`types`**: Pure types (`Color`, `UiVariant`, `ThemeDocument::parse`)
//! - **`loader`**: Reading theme files, optionally through the property filter
//! - **`filter`**: Structural removal of internal properties
//! - **`roles`**: Static role table, derived colors and token policy
//! - **`mapper`**: `map_to_target` producing a VS Code color theme
//!
//! # Usage
//!
//! ```ignore
//! use theme_bridge::theme::{load_filtered, map_to_target, RoleTable};
//!
//! let loaded = load_filtered(path, &["doki".to_string()])?;
//! let target = map_to_target(&loaded.document, &RoleTable::builtin());
//! ```

mod filter;
mod loader;
mod mapper;
mod roles;
mod types;

pub use filter::{filter_file, filter_properties, FilterOutcome};
pub(crate) use loader::read_text;
pub use loader::{load_filtered, LoadedTheme};
pub use mapper::{map_to_target, TargetTheme, TokenColor, TokenSettings};
pub use roles::{DerivedColor, RoleTable, TokenRule, BUILTIN_ROLES, DERIVED_COLORS, TOKEN_RULES};
pub use types::{Color, ThemeDocument, UiVariant};
