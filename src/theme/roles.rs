//! Static conversion tables: source role → destination role, derived
//! destination colors, and the syntax token policy.

use std::collections::{BTreeMap, BTreeSet};

/// Built-in mapping from flattened IntelliJ role keys to VS Code workbench
/// color identifiers.
pub static BUILTIN_ROLES: &[(&str, &str)] = &[
    // Editor palette entries
    ("editor.background", "editor.background"),
    ("editor.foreground", "editor.foreground"),
    ("editor.selectionBackground", "editor.selectionBackground"),
    ("editor.lineHighlight", "editor.lineHighlightBackground"),
    ("editor.lineNumber", "editorLineNumber.foreground"),
    ("editor.activeLineNumber", "editorLineNumber.activeForeground"),
    ("editor.caret", "editorCursor.foreground"),
    ("editor.indentGuide", "editorIndentGuide.background1"),
    ("editor.whitespace", "editorWhitespace.foreground"),
    ("editor.findMatch", "editor.findMatchBackground"),
    // IntelliJ `ui` section
    ("*.foreground", "foreground"),
    ("Component.focusColor", "focusBorder"),
    ("Borders.color", "panel.border"),
    ("Panel.background", "panel.background"),
    ("Tree.background", "sideBar.background"),
    ("Tree.foreground", "sideBar.foreground"),
    ("Tree.selectionBackground", "list.activeSelectionBackground"),
    ("Tree.selectionForeground", "list.activeSelectionForeground"),
    ("Tree.hoverBackground", "list.hoverBackground"),
    ("ToolWindow.Header.background", "sideBarSectionHeader.background"),
    ("EditorTabs.background", "editorGroupHeader.tabsBackground"),
    ("EditorTabs.underlinedTabBackground", "tab.activeBackground"),
    ("EditorTabs.underlineColor", "tab.activeBorder"),
    ("EditorTabs.inactiveUnderlineColor", "tab.unfocusedActiveBorder"),
    ("StatusBar.background", "statusBar.background"),
    ("StatusBar.borderColor", "statusBar.border"),
    ("Button.default.startBackground", "button.background"),
    ("Button.default.foreground", "button.foreground"),
    ("TextField.background", "input.background"),
    ("TextField.foreground", "input.foreground"),
    ("Popup.background", "editorWidget.background"),
    ("Menu.background", "menu.background"),
    ("Menu.foreground", "menu.foreground"),
    ("ScrollBar.Mac.thumbColor", "scrollbarSlider.background"),
    ("ScrollBar.Mac.hoverThumbColor", "scrollbarSlider.hoverBackground"),
    ("ProgressBar.progressColor", "progressBar.background"),
    ("Link.activeForeground", "textLink.foreground"),
    ("ActionButton.hoverBackground", "toolbar.hoverBackground"),
    ("Notification.background", "notifications.background"),
];

/// A destination color computed from another destination color when the
/// source theme does not provide it.
#[derive(Debug, Clone, Copy)]
pub struct DerivedColor {
    pub target: &'static str,
    pub from: &'static str,
    /// Positive moves towards contrast (lighter on dark themes, darker on
    /// light ones), negative moves the other way, zero copies.
    pub shift: f32,
}

/// Applied in order, so a rule may build on an earlier derived value.
pub static DERIVED_COLORS: &[DerivedColor] = &[
    DerivedColor {
        target: "editor.lineHighlightBackground",
        from: "editor.background",
        shift: 0.05,
    },
    DerivedColor {
        target: "sideBar.background",
        from: "editor.background",
        shift: -0.03,
    },
    DerivedColor {
        target: "editorGroupHeader.tabsBackground",
        from: "sideBar.background",
        shift: 0.0,
    },
    DerivedColor {
        target: "tab.activeBackground",
        from: "editor.background",
        shift: 0.0,
    },
    DerivedColor {
        target: "statusBar.background",
        from: "sideBar.background",
        shift: 0.0,
    },
    DerivedColor {
        target: "editorCursor.foreground",
        from: "editor.foreground",
        shift: 0.0,
    },
    DerivedColor {
        target: "editorLineNumber.foreground",
        from: "editor.foreground",
        shift: -0.45,
    },
];

/// How one syntax role becomes a `tokenColors` entry.
#[derive(Debug, Clone, Copy)]
pub struct TokenRule {
    pub role: &'static str,
    pub name: &'static str,
    pub scopes: &'static [&'static str],
    pub font_style: Option<&'static str>,
}

pub static TOKEN_RULES: &[TokenRule] = &[
    TokenRule {
        role: "syntax.comment",
        name: "Comments",
        scopes: &["comment", "punctuation.definition.comment"],
        font_style: Some("italic"),
    },
    TokenRule {
        role: "syntax.docComment",
        name: "Documentation comments",
        scopes: &["comment.block.documentation"],
        font_style: Some("italic"),
    },
    TokenRule {
        role: "syntax.string",
        name: "Strings",
        scopes: &["string", "string.quoted"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.escape",
        name: "Escape sequences",
        scopes: &["constant.character.escape"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.number",
        name: "Numbers",
        scopes: &["constant.numeric"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.constant",
        name: "Constants",
        scopes: &["constant.language", "variable.other.constant"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.keyword",
        name: "Keywords",
        scopes: &["keyword", "storage.type", "storage.modifier"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.operator",
        name: "Operators",
        scopes: &["keyword.operator"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.function",
        name: "Functions",
        scopes: &["entity.name.function", "support.function"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.type",
        name: "Types",
        scopes: &[
            "entity.name.type",
            "entity.name.class",
            "support.type",
            "support.class",
        ],
        font_style: None,
    },
    TokenRule {
        role: "syntax.parameter",
        name: "Parameters",
        scopes: &["variable.parameter"],
        font_style: Some("italic"),
    },
    TokenRule {
        role: "syntax.variable",
        name: "Variables",
        scopes: &["variable", "variable.other.readwrite"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.property",
        name: "Properties",
        scopes: &["variable.other.property", "support.variable.property"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.tag",
        name: "Tags",
        scopes: &["entity.name.tag"],
        font_style: None,
    },
    TokenRule {
        role: "syntax.attribute",
        name: "Attributes",
        scopes: &["entity.other.attribute-name"],
        font_style: Some("italic"),
    },
    TokenRule {
        role: "syntax.annotation",
        name: "Annotations",
        scopes: &[
            "meta.annotation",
            "storage.type.annotation",
            "entity.name.function.decorator",
        ],
        font_style: None,
    },
    TokenRule {
        role: "syntax.invalid",
        name: "Invalid",
        scopes: &["invalid"],
        font_style: Some("underline"),
    },
];

/// Mapping from source role keys to destination role keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTable {
    entries: BTreeMap<String, String>,
}

impl RoleTable {
    /// The built-in IntelliJ → VS Code table.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ROLES.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Merge configured entries over this table. An override whose
    /// destination is empty removes the role.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (from, to) in overrides {
            if to.trim().is_empty() {
                self.entries.remove(from);
            } else {
                self.entries.insert(from.clone(), to.clone());
            }
        }
        self
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.entries.get(role).map(String::as_str)
    }

    /// Every destination key this table can produce.
    pub fn destinations(&self) -> BTreeSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sources_are_unique() {
        let table = RoleTable::builtin();
        assert_eq!(table.len(), BUILTIN_ROLES.len());
    }

    #[test]
    fn test_builtin_destinations_are_unique() {
        let table = RoleTable::builtin();
        assert_eq!(table.destinations().len(), BUILTIN_ROLES.len());
    }

    #[test]
    fn test_derived_targets_are_builtin_destinations() {
        let table = RoleTable::builtin();
        let destinations = table.destinations();
        for rule in DERIVED_COLORS {
            assert!(
                destinations.contains(rule.target),
                "derived target {} is not a destination",
                rule.target
            );
        }
    }

    #[test]
    fn test_overrides_add_replace_and_remove() {
        let mut overrides = BTreeMap::new();
        overrides.insert("custom.bg".to_string(), "editorWidget.border".to_string());
        overrides.insert("editor.caret".to_string(), "terminalCursor.foreground".to_string());
        overrides.insert("Menu.foreground".to_string(), String::new());

        let table = RoleTable::builtin().with_overrides(&overrides);
        assert_eq!(table.get("custom.bg"), Some("editorWidget.border"));
        assert_eq!(table.get("editor.caret"), Some("terminalCursor.foreground"));
        assert_eq!(table.get("Menu.foreground"), None);
        assert_eq!(table.len(), BUILTIN_ROLES.len());
    }

    #[test]
    fn test_token_rules_have_scopes() {
        for rule in TOKEN_RULES {
            assert!(!rule.scopes.is_empty(), "{} has no scopes", rule.role);
            assert!(rule.role.starts_with("syntax."));
        }
    }
}
