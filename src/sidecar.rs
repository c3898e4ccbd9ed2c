//! Keeping editor color-scheme descriptors in sync with their theme.
//!
//! Every `foo.theme.json` has a `foo.xml` color scheme next to it whose root
//! element is `<scheme name="...">`. The name shown to users comes from that
//! attribute, so it must match the theme's `name`.
//!
//! The descriptor is scanned tag by tag: the prolog (XML declaration,
//! comments, doctype) is skipped, the root start tag's attributes are parsed,
//! and only the bytes of the `name` value are replaced. Everything else in
//! the file, whitespace included, is left exactly as it was.

use std::path::{Path, PathBuf};

use crate::error::ThemeError;
use crate::theme::{read_text, ThemeDocument};

/// Root element of a color-scheme descriptor.
const ROOT_ELEMENT: &str = "scheme";
const NAME_ATTRIBUTE: &str = "name";

/// Result of a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The descriptor was rewritten; `previous` is the old name.
    Updated { previous: String },
    /// The descriptor already carried the theme's name and was not touched.
    AlreadyInSync,
}

/// Location of the sidecar descriptor for a theme file: the theme suffix is
/// replaced by `.xml` in the same directory.
pub fn sidecar_path_for(theme_path: &Path, theme_suffix: &str) -> PathBuf {
    let file_name = theme_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(theme_suffix)
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(&file_name);
    theme_path.with_file_name(format!("{}.xml", stem))
}

/// Bring the descriptor at `sidecar` in line with `doc.name`.
pub fn sync_sidecar(doc: &ThemeDocument, sidecar: &Path) -> Result<SyncOutcome, ThemeError> {
    if !sidecar.is_file() {
        return Err(ThemeError::SidecarMissing(sidecar.to_path_buf()));
    }
    let xml = read_text(sidecar)?;

    match rename_scheme(&xml, &doc.name)? {
        None => {
            tracing::debug!("{} already in sync", sidecar.display());
            Ok(SyncOutcome::AlreadyInSync)
        }
        Some(renamed) => {
            std::fs::write(sidecar, &renamed.xml).map_err(|e| ThemeError::io(sidecar, e))?;
            tracing::info!(
                "Updated scheme name to '{}' in {}",
                doc.name,
                sidecar.display()
            );
            Ok(SyncOutcome::Updated {
                previous: renamed.previous,
            })
        }
    }
}

/// A descriptor with its scheme name replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub xml: String,
    pub previous: String,
}

/// Replace the root `<scheme>`'s `name` with `name`. Returns `None` when the
/// descriptor already carries that name.
pub fn rename_scheme(xml: &str, name: &str) -> Result<Option<Renamed>, ThemeError> {
    let span = locate_root_name(xml)?;
    let raw = &xml[span.start..span.end];
    let previous = unescape(raw);
    if previous == name {
        return Ok(None);
    }

    let mut out = String::with_capacity(xml.len() + name.len());
    out.push_str(&xml[..span.start]);
    out.push_str(&escape(name, span.quote));
    out.push_str(&xml[span.end..]);
    Ok(Some(Renamed { xml: out, previous }))
}

/// Byte range of an attribute value, quotes excluded.
#[derive(Debug, Clone, Copy)]
struct ValueSpan {
    start: usize,
    end: usize,
    quote: char,
}

fn malformed(message: impl Into<String>) -> ThemeError {
    ThemeError::MalformedDocument(message.into())
}

fn locate_root_name(xml: &str) -> Result<ValueSpan, ThemeError> {
    let mut pos = 0;
    loop {
        let Some(offset) = xml[pos..].find('<') else {
            return Err(malformed("descriptor has no root element"));
        };
        let text = &xml[pos..pos + offset];
        if !text.trim_start_matches('\u{feff}').trim().is_empty() {
            return Err(malformed("text before the root element"));
        }

        let start = pos + offset;
        let rest = &xml[start..];
        pos = if rest.starts_with("<?") {
            start + end_of(rest, "?>")?
        } else if rest.starts_with("<!--") {
            start + end_of(rest, "-->")?
        } else if rest.starts_with("<!") {
            start + end_of_declaration(rest)?
        } else {
            return name_attribute_of_root(xml, start + 1);
        };
    }
}

fn end_of(rest: &str, terminator: &str) -> Result<usize, ThemeError> {
    rest.find(terminator)
        .map(|i| i + terminator.len())
        .ok_or_else(|| malformed(format!("unterminated markup, expected `{}`", terminator)))
}

/// End of a `<!DOCTYPE ...>` declaration, which may hold a bracketed
/// internal subset containing `>`.
fn end_of_declaration(rest: &str) -> Result<usize, ThemeError> {
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => return Ok(i + 1),
            _ => {}
        }
    }
    Err(malformed("unterminated declaration"))
}

fn name_attribute_of_root(xml: &str, mut pos: usize) -> Result<ValueSpan, ThemeError> {
    let element_end = xml[pos..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .map(|i| pos + i)
        .ok_or_else(|| malformed("unterminated root element"))?;
    let element = &xml[pos..element_end];
    if element != ROOT_ELEMENT {
        return Err(malformed(format!(
            "root element is <{}>, expected <{}>",
            element, ROOT_ELEMENT
        )));
    }
    pos = element_end;

    loop {
        let rest = &xml[pos..];
        let skipped = rest.len() - rest.trim_start().len();
        pos += skipped;
        let rest = &xml[pos..];

        if rest.is_empty() {
            return Err(malformed("unterminated root element"));
        }
        if rest.starts_with('>') || rest.starts_with("/>") {
            return Err(malformed(format!(
                "<{}> has no `{}` attribute",
                ROOT_ELEMENT, NAME_ATTRIBUTE
            )));
        }

        let name_len = rest
            .find(|c: char| c == '=' || c.is_whitespace() || c == '>' || c == '/')
            .ok_or_else(|| malformed("unterminated attribute"))?;
        if name_len == 0 {
            return Err(malformed("malformed attribute in root element"));
        }
        let attribute = &rest[..name_len];
        pos += name_len;

        let rest = &xml[pos..];
        let rest_trimmed = rest.trim_start();
        pos += rest.len() - rest_trimmed.len();
        if !rest_trimmed.starts_with('=') {
            return Err(malformed(format!("attribute `{}` has no value", attribute)));
        }
        pos += 1;

        let rest = &xml[pos..];
        let rest_trimmed = rest.trim_start();
        pos += rest.len() - rest_trimmed.len();
        let quote = match rest_trimmed.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(malformed(format!("attribute `{}` is not quoted", attribute))),
        };
        let value_start = pos + 1;
        let value_len = xml[value_start..]
            .find(quote)
            .ok_or_else(|| malformed(format!("unterminated value for `{}`", attribute)))?;
        let value_end = value_start + value_len;

        if attribute == NAME_ATTRIBUTE {
            return Ok(ValueSpan {
                start: value_start,
                end: value_end,
                quote,
            });
        }
        pos = value_end + 1;
    }
}

/// Escape `value` for an attribute delimited by `quote`.
pub(crate) fn escape(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote == '"' => out.push_str("&quot;"),
            '\'' if quote == '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let decoded = after.find(';').and_then(|semi| {
            let entity = &after[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            }?;
            Some((c, semi + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
