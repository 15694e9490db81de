//! # Responsive Style Resolution
//!
//! Desktop styles are the base layer (`Element::styles`). Tablet and mobile
//! carry sparse override layers that win key by key.

use super::normalize::{longhands_of, normalize_inline_styles};
use crate::element::{Element, StyleMap, Viewport};
use serde::Serialize;

/// Width range a viewport covers and the canvas width used to preview it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoint {
    pub min: u32,
    /// `None` = unbounded
    pub max: Option<u32>,
    pub canvas_width: u32,
}

impl Viewport {
    pub fn breakpoint(&self) -> Breakpoint {
        match self {
            Viewport::Mobile => Breakpoint {
                min: 0,
                max: Some(767),
                canvas_width: 375,
            },
            Viewport::Tablet => Breakpoint {
                min: 768,
                max: Some(1023),
                canvas_width: 768,
            },
            Viewport::Desktop => Breakpoint {
                min: 1024,
                max: None,
                canvas_width: 1200,
            },
        }
    }

    /// Viewport whose range contains `width` (in CSS pixels)
    pub fn for_width(width: u32) -> Viewport {
        Viewport::ALL
            .into_iter()
            .find(|viewport| {
                let bp = viewport.breakpoint();
                width >= bp.min && bp.max.map_or(true, |max| width <= max)
            })
            .unwrap_or_default()
    }
}

/// Plain layering: base styles overlaid with the viewport's override layer.
/// Desktop returns the base styles untouched.
pub fn get_responsive_styles(element: &Element, viewport: Viewport) -> StyleMap {
    let mut styles = element.styles.clone();
    if let Some(layer) = element.responsive_styles.layer(viewport) {
        styles.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    styles
}

/// Cascade-aware layering for renderers and exporters.
///
/// A shorthand in the override layer resets the base layer's longhands of the
/// same group, and a longhand in the override layer wins over the matching
/// side of a base shorthand. The result is normalized.
pub fn resolve_styles(element: &Element, viewport: Viewport) -> StyleMap {
    let base = normalize_inline_styles(&element.styles);
    let Some(layer) = element.responsive_styles.layer(viewport) else {
        return base;
    };

    let mut resolved = base;
    for property in layer.keys() {
        if let Some(longhands) = longhands_of(property) {
            for longhand in longhands {
                resolved.remove(*longhand);
            }
        }
    }
    resolved.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));

    normalize_inline_styles(&resolved)
}

/// Return a copy of `element` with `patch` merged into the viewport's layer
/// (into the base styles for desktop). The merged layer is normalized.
pub fn update_responsive_styles(element: &Element, viewport: Viewport, patch: &StyleMap) -> Element {
    let mut updated = element.clone();

    match updated.responsive_styles.layer_mut(viewport) {
        Some(layer) => {
            let mut merged = layer.take().unwrap_or_default();
            merged.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
            *layer = Some(normalize_inline_styles(&merged));
        }
        None => {
            let mut merged = std::mem::take(&mut updated.styles);
            merged.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
            updated.styles = normalize_inline_styles(&merged);
        }
    }

    updated.touch();
    updated
}
