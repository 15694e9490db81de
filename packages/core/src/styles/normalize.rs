//! # Shorthand/Longhand Normalization
//!
//! Renderers apply style maps property by property, so a map must never carry
//! a CSS shorthand (`padding`) together with one of its longhands
//! (`paddingTop`). When both are present the shorthand is expanded into the
//! longhands it covers and removed. Explicitly set longhands always win over
//! values derived from the shorthand.
//!
//! Expansion never fails: values with too few tokens repeat per the CSS
//! 1/2/3/4-value rule and surplus tokens are ignored.

use crate::element::StyleMap;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// How shorthands are treated when they do not conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShorthandMode {
    /// Only conflicting shorthands are expanded
    #[default]
    Preserve,
    /// Every expandable shorthand is expanded (longhand-only output)
    Expand,
    /// Complete longhand sets are folded back into their shorthand
    Combine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion {
    /// top right bottom left
    Sides,
    /// top-left top-right bottom-right bottom-left
    Corners,
    /// whole value copied to every longhand
    Copy,
    /// width / style / color picked by token kind
    Outline,
    /// a lone color token maps to backgroundColor
    Background,
    /// cannot be decomposed; dropped when longhands are present
    Opaque,
}

struct PropertyGroup {
    shorthand: &'static str,
    longhands: &'static [&'static str],
    expansion: Expansion,
}

const PROPERTY_GROUPS: &[PropertyGroup] = &[
    PropertyGroup {
        shorthand: "padding",
        longhands: &["paddingTop", "paddingRight", "paddingBottom", "paddingLeft"],
        expansion: Expansion::Sides,
    },
    PropertyGroup {
        shorthand: "margin",
        longhands: &["marginTop", "marginRight", "marginBottom", "marginLeft"],
        expansion: Expansion::Sides,
    },
    PropertyGroup {
        shorthand: "border",
        longhands: &["borderTop", "borderRight", "borderBottom", "borderLeft"],
        expansion: Expansion::Copy,
    },
    PropertyGroup {
        shorthand: "borderWidth",
        longhands: &["borderTopWidth", "borderRightWidth", "borderBottomWidth", "borderLeftWidth"],
        expansion: Expansion::Sides,
    },
    PropertyGroup {
        shorthand: "borderStyle",
        longhands: &["borderTopStyle", "borderRightStyle", "borderBottomStyle", "borderLeftStyle"],
        expansion: Expansion::Sides,
    },
    PropertyGroup {
        shorthand: "borderColor",
        longhands: &["borderTopColor", "borderRightColor", "borderBottomColor", "borderLeftColor"],
        expansion: Expansion::Sides,
    },
    PropertyGroup {
        shorthand: "borderRadius",
        longhands: &[
            "borderTopLeftRadius",
            "borderTopRightRadius",
            "borderBottomRightRadius",
            "borderBottomLeftRadius",
        ],
        expansion: Expansion::Corners,
    },
    PropertyGroup {
        shorthand: "background",
        longhands: &[
            "backgroundColor",
            "backgroundImage",
            "backgroundRepeat",
            "backgroundPosition",
            "backgroundSize",
        ],
        expansion: Expansion::Background,
    },
    PropertyGroup {
        shorthand: "font",
        longhands: &["fontStyle", "fontVariant", "fontWeight", "fontSize", "lineHeight", "fontFamily"],
        expansion: Expansion::Opaque,
    },
    PropertyGroup {
        shorthand: "outline",
        longhands: &["outlineWidth", "outlineStyle", "outlineColor"],
        expansion: Expansion::Outline,
    },
];

const LINE_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
    "auto",
];

impl PropertyGroup {
    fn has_shorthand(&self, styles: &StyleMap) -> bool {
        styles.contains_key(self.shorthand)
    }

    fn present_longhands<'a>(&'a self, styles: &'a StyleMap) -> impl Iterator<Item = &'static str> + 'a {
        self.longhands
            .iter()
            .copied()
            .filter(move |prop| styles.contains_key(*prop))
    }

    fn has_longhands(&self, styles: &StyleMap) -> bool {
        self.present_longhands(styles).next().is_some()
    }

    /// Whether expansion is lossless without a conflict to resolve
    fn expandable(&self) -> bool {
        matches!(
            self.expansion,
            Expansion::Sides | Expansion::Corners | Expansion::Copy | Expansion::Outline
        )
    }

    fn expand(&self, value: &str) -> Vec<(&'static str, String)> {
        let tokens = split_tokens(value);

        match self.expansion {
            Expansion::Sides | Expansion::Corners => match four_sides(&tokens) {
                Some(sides) => self.longhands.iter().copied().zip(sides).collect(),
                None => Vec::new(),
            },
            Expansion::Copy => self
                .longhands
                .iter()
                .map(|prop| (*prop, value.to_string()))
                .collect(),
            Expansion::Outline => {
                let mut out = Vec::new();
                for token in tokens {
                    let prop = if is_line_width(&token) {
                        "outlineWidth"
                    } else if LINE_STYLES.contains(&token.as_str()) {
                        "outlineStyle"
                    } else {
                        "outlineColor"
                    };
                    if !out.iter().any(|(p, _)| *p == prop) {
                        out.push((prop, token));
                    }
                }
                out
            }
            Expansion::Background => {
                let lone_color = tokens.len() == 1
                    && !value.contains("url(")
                    && !value.contains("gradient(");
                if lone_color {
                    vec![("backgroundColor", value.trim().to_string())]
                } else {
                    Vec::new()
                }
            }
            Expansion::Opaque => Vec::new(),
        }
    }

    /// Fold a complete longhand set into a single shorthand value
    fn combine(&self, styles: &StyleMap) -> Option<String> {
        let values: Vec<&str> = self
            .longhands
            .iter()
            .map(|prop| styles.get(*prop).map(String::as_str))
            .collect::<Option<_>>()?;

        match self.expansion {
            Expansion::Sides | Expansion::Corners => {
                Some(combine_sides(values[0], values[1], values[2], values[3]))
            }
            Expansion::Copy => values
                .iter()
                .all(|v| *v == values[0])
                .then(|| values[0].to_string()),
            Expansion::Outline => Some(values.join(" ")),
            Expansion::Background | Expansion::Opaque => None,
        }
    }
}

/// A shorthand present alongside some of its longhands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleConflict {
    pub shorthand: String,
    pub longhands: Vec<String>,
}

impl fmt::Display for StyleConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conflicting properties detected: {} and {}",
            self.shorthand,
            self.longhands.join(", ")
        )
    }
}

/// Normalize a style map. Empty values are dropped in every mode.
pub fn normalize_styles(styles: &StyleMap, mode: ShorthandMode) -> StyleMap {
    let mut normalized: StyleMap = styles
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    for group in PROPERTY_GROUPS {
        let has_shorthand = group.has_shorthand(&normalized);
        let has_longhands = group.has_longhands(&normalized);

        if has_shorthand && has_longhands {
            if let Some(value) = normalized.remove(group.shorthand) {
                debug!(shorthand = group.shorthand, value = %value, "Expanding conflicting shorthand");
                for (prop, expanded) in group.expand(&value) {
                    normalized.entry(prop.to_string()).or_insert(expanded);
                }
            }
        } else if has_shorthand && mode == ShorthandMode::Expand && group.expandable() {
            if let Some(value) = normalized.remove(group.shorthand) {
                for (prop, expanded) in group.expand(&value) {
                    normalized.insert(prop.to_string(), expanded);
                }
            }
        }

        if mode == ShorthandMode::Combine && !group.has_shorthand(&normalized) {
            if let Some(combined) = group.combine(&normalized) {
                for prop in group.longhands {
                    normalized.remove(*prop);
                }
                normalized.insert(group.shorthand.to_string(), combined);
            }
        }
    }

    normalized
}

/// Normalization for every inline style write path
pub fn normalize_inline_styles(styles: &StyleMap) -> StyleMap {
    normalize_styles(styles, ShorthandMode::Preserve)
}

/// Normalization for stylesheet output, preferring compact shorthands
pub fn normalize_css_styles(styles: &StyleMap) -> StyleMap {
    normalize_styles(styles, ShorthandMode::Combine)
}

/// Right-biased shallow merge followed by inline normalization
pub fn merge_styles<'a>(maps: impl IntoIterator<Item = &'a StyleMap>) -> StyleMap {
    let mut merged = StyleMap::new();
    for map in maps {
        merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    normalize_inline_styles(&merged)
}

/// Every shorthand/longhand conflict in a map
pub fn validate_styles(styles: &StyleMap) -> Vec<StyleConflict> {
    PROPERTY_GROUPS
        .iter()
        .filter(|group| group.has_shorthand(styles))
        .filter_map(|group| {
            let longhands: Vec<String> = group
                .present_longhands(styles)
                .map(str::to_string)
                .collect();
            (!longhands.is_empty()).then(|| StyleConflict {
                shorthand: group.shorthand.to_string(),
                longhands,
            })
        })
        .collect()
}

pub fn has_conflicts(styles: &StyleMap) -> bool {
    PROPERTY_GROUPS
        .iter()
        .any(|group| group.has_shorthand(styles) && group.has_longhands(styles))
}

/// Longhands covered by a shorthand, if the property is a known shorthand
pub(crate) fn longhands_of(property: &str) -> Option<&'static [&'static str]> {
    PROPERTY_GROUPS
        .iter()
        .find(|group| group.shorthand == property)
        .map(|group| group.longhands)
}

/// Whitespace tokenizer that keeps `rgb(0, 0, 0)` and `calc(1px + 2px)` whole
fn split_tokens(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in value.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn four_sides(tokens: &[String]) -> Option<[String; 4]> {
    let top = tokens.first()?.clone();
    let right = tokens.get(1).cloned().unwrap_or_else(|| top.clone());
    let bottom = tokens.get(2).cloned().unwrap_or_else(|| top.clone());
    let left = tokens.get(3).cloned().unwrap_or_else(|| right.clone());
    Some([top, right, bottom, left])
}

fn combine_sides(top: &str, right: &str, bottom: &str, left: &str) -> String {
    if top == right && right == bottom && bottom == left {
        top.to_string()
    } else if top == bottom && right == left {
        format!("{top} {right}")
    } else if right == left {
        format!("{top} {right} {bottom}")
    } else {
        format!("{top} {right} {bottom} {left}")
    }
}

fn is_line_width(token: &str) -> bool {
    matches!(token, "thin" | "medium" | "thick")
        || token.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || token.starts_with("calc(")
}
