//! Conversion of a parsed IntelliJ theme into a VS Code color theme.
//!
//! `map_to_target` is a pure function of the document and the role table:
//! no timestamps, no randomness, and ordered collections everywhere, so the
//! same input always serializes to the same bytes.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;

use super::roles::{RoleTable, DERIVED_COLORS, TOKEN_RULES};
use super::types::{Color, ThemeDocument, UiVariant};

/// A converted theme, serialized as a VS Code color-theme file.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TargetTheme {
    pub name: String,
    #[serde(rename = "type")]
    pub ui_variant: UiVariant,
    #[serde(rename = "colors")]
    #[schemars(with = "BTreeMap<String, String>")]
    pub workbench_colors: BTreeMap<String, Color>,
    #[serde(rename = "tokenColors")]
    pub token_colors: Vec<TokenColor>,
}

/// One `tokenColors` entry.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TokenColor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Comma-separated TextMate scope selectors.
    pub scope: String,
    pub settings: TokenSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct TokenSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub foreground: Option<Color>,
    #[serde(rename = "fontStyle", skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

/// Convert `doc` using `roles`.
///
/// Roles missing from the table are dropped. Derived colors only fill
/// destinations the table can produce, so every key of the result's
/// `workbench_colors` is a destination of `roles`.
pub fn map_to_target(doc: &ThemeDocument, roles: &RoleTable) -> TargetTheme {
    let mut workbench_colors = BTreeMap::new();
    for (role, color) in &doc.colors {
        match roles.get(role) {
            Some(destination) => {
                workbench_colors.insert(destination.to_string(), *color);
            }
            None => tracing::trace!("{}: no destination for role {}", doc.name, role),
        }
    }

    apply_derived(&mut workbench_colors, roles, doc.is_dark);

    let token_colors = TOKEN_RULES
        .iter()
        .filter_map(|rule| {
            let color = doc.colors.get(rule.role)?;
            Some(TokenColor {
                name: Some(rule.name.to_string()),
                scope: rule.scopes.join(", "),
                settings: TokenSettings {
                    foreground: Some(*color),
                    font_style: rule.font_style.map(str::to_string),
                },
            })
        })
        .collect();

    TargetTheme {
        name: doc.name.clone(),
        ui_variant: doc.ui_variant(),
        workbench_colors,
        token_colors,
    }
}

fn apply_derived(colors: &mut BTreeMap<String, Color>, roles: &RoleTable, is_dark: bool) {
    let destinations = roles.destinations();
    for rule in DERIVED_COLORS {
        if colors.contains_key(rule.target) || !destinations.contains(rule.target) {
            continue;
        }
        let Some(base) = colors.get(rule.from).copied() else {
            continue;
        };
        colors.insert(rule.target.to_string(), shift(base, rule.shift, is_dark));
    }
}

fn shift(color: Color, amount: f32, is_dark: bool) -> Color {
    let towards_contrast = amount > 0.0;
    let amount = amount.abs();
    if amount == 0.0 {
        color
    } else if towards_contrast == is_dark {
        color.lighten(amount)
    } else {
        color.darken(amount)
    }
}
