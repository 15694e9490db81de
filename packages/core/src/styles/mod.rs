//! Responsive style resolution and shorthand normalization

mod normalize;
mod resolve;

pub use normalize::{
    has_conflicts, merge_styles, normalize_css_styles, normalize_inline_styles, normalize_styles,
    validate_styles, ShorthandMode, StyleConflict,
};
pub use resolve::{get_responsive_styles, resolve_styles, update_responsive_styles, Breakpoint};
