//! Pure theme types: colors, variants and the parsed source document.
//!
//! Nothing in this module touches the filesystem. `ThemeDocument::parse`
//! takes raw bytes so it can be fed from a file, a test string or the output
//! of the property filter alike.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ThemeError;

/// RGB color with optional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// `None` (or `Some(255)`) means fully opaque.
    pub a: Option<u8>,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Canonical lowercase hex form, `#rrggbb` or `#rrggbbaa`.
    pub fn to_hex(&self) -> String {
        match self.a {
            Some(a) if a != 0xff => {
                format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a)
            }
            _ => format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
        }
    }

    /// Parse a hex color literal. The leading `#` is optional because
    /// IntelliJ theme files frequently omit it.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .ok()
                .map(|n| n * 0x11)
        };
        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Parse any accepted color form: a hex string, an `[r, g, b(, a)]`
    /// array or an `{"r", "g", "b"(, "a")}` object.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::from_hex(s),
            Value::Array(items) => {
                let parts: Option<Vec<u8>> = items.iter().map(component).collect();
                match parts?.as_slice() {
                    [r, g, b] => Some(Self::rgb(*r, *g, *b)),
                    [r, g, b, a] => Some(Self::rgba(*r, *g, *b, *a)),
                    _ => None,
                }
            }
            Value::Object(map) => {
                let r = component(map.get("r")?)?;
                let g = component(map.get("g")?)?;
                let b = component(map.get("b")?)?;
                match map.get("a") {
                    Some(a) => Some(Self::rgba(r, g, b, component(a)?)),
                    None => Some(Self::rgb(r, g, b)),
                }
            }
            _ => None,
        }
    }

    /// Mix towards white by `amount` (0.0..=1.0).
    pub fn lighten(&self, amount: f32) -> Self {
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round().min(255.0) as u8;
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
            a: self.a,
        }
    }

    /// Mix towards black by `amount` (0.0..=1.0).
    pub fn darken(&self, amount: f32) -> Self {
        let mix = |c: u8| (c as f32 * (1.0 - amount)).round().max(0.0) as u8;
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
            a: self.a,
        }
    }
}

fn component(value: &Value) -> Option<u8> {
    value.as_u64().and_then(|n| u8::try_from(n).ok())
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// UI brightness variant of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UiVariant {
    Dark,
    Light,
}

impl UiVariant {
    pub fn from_is_dark(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Value of the `type` field in an emitted color theme.
    pub fn theme_type(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Value of `uiTheme` in the package manifest.
    pub fn ui_theme(&self) -> &'static str {
        match self {
            Self::Dark => "vs-dark",
            Self::Light => "vs",
        }
    }
}

/// Parsed form of one IntelliJ `*.theme.json` file.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDocument {
    pub name: String,
    pub is_dark: bool,
    /// Flattened role key → color. Keys of nested objects are joined with `.`.
    pub colors: BTreeMap<String, Color>,
    /// Top-level fields the converter does not interpret.
    pub metadata_extra: Map<String, Value>,
}

/// Top-level sections flattened into `ThemeDocument::colors`, in order.
/// Later sections win on duplicate keys.
const COLOR_SECTIONS: &[&str] = &["colors", "ui"];

impl ThemeDocument {
    /// Parse a theme document from raw bytes.
    pub fn parse(raw: &[u8]) -> Result<Self, ThemeError> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| ThemeError::MalformedDocument(format!("invalid JSON: {}", e)))?;
        let Value::Object(mut root) = value else {
            return Err(ThemeError::MalformedDocument(
                "top level must be an object".to_string(),
            ));
        };

        let name = match root.shift_remove("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => return Err(ThemeError::MissingRequiredField("name")),
        };

        let is_dark = match root.shift_remove("dark") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(dark)) => dark,
            Some(other) => {
                return Err(ThemeError::MalformedDocument(format!(
                    "`dark` must be a boolean, found {}",
                    other
                )))
            }
        };

        // The palette is needed to resolve named references in every section.
        let palette = match root.get("colors") {
            Some(Value::Object(map)) => palette_of(map),
            _ => BTreeMap::new(),
        };

        let mut colors = BTreeMap::new();
        for section in COLOR_SECTIONS {
            match root.shift_remove(*section) {
                Some(Value::Object(map)) => flatten_colors(None, &map, &palette, &mut colors),
                Some(Value::Null) | None => {}
                Some(_) => {
                    return Err(ThemeError::MalformedDocument(format!(
                        "`{}` must be an object",
                        section
                    )))
                }
            }
        }

        Ok(Self {
            name,
            is_dark,
            colors,
            metadata_extra: root,
        })
    }

    pub fn ui_variant(&self) -> UiVariant {
        UiVariant::from_is_dark(self.is_dark)
    }
}

/// Named colors defined directly under `colors`.
fn palette_of(map: &Map<String, Value>) -> BTreeMap<String, Color> {
    map.iter()
        .filter_map(|(name, value)| Color::from_json(value).map(|c| (name.clone(), c)))
        .collect()
}

fn flatten_colors(
    prefix: Option<&str>,
    map: &Map<String, Value>,
    palette: &BTreeMap<String, Color>,
    out: &mut BTreeMap<String, Color>,
) {
    for (key, value) in map {
        let full_key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        let color = match value {
            Value::Object(nested) if Color::from_json(value).is_none() => {
                flatten_colors(Some(&full_key), nested, palette, out);
                continue;
            }
            Value::String(s) => Color::from_hex(s).or_else(|| palette.get(s.trim()).copied()),
            other => Color::from_json(other),
        };
        match color {
            Some(color) => {
                out.insert(full_key, color);
            }
            None => tracing::trace!("skipping non-color value at {}", full_key),
        }
    }
}
