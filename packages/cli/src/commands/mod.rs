pub mod check;
pub mod inspect;
pub mod normalize;
pub mod styles;

pub use check::{check, CheckArgs};
pub use inspect::{inspect, InspectArgs};
pub use normalize::{normalize, NormalizeArgs};
pub use styles::{styles, StylesArgs};

use anyhow::{Context, Result};
use pagecraft_core::Element;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve `path` against the working directory
pub(crate) fn resolve(path: &Path, cwd: &str) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(cwd).join(path)
    }
}

/// Read a saved page: a JSON array of flat element records
pub(crate) fn read_page(path: &Path) -> Result<Vec<Element>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let elements = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a page export", path.display()))?;
    Ok(elements)
}

/// Page id recorded on the elements, falling back to the file stem
pub(crate) fn page_id_of(path: &Path, elements: &[Element]) -> String {
    elements
        .iter()
        .map(|el| el.page_id.as_str())
        .find(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_default()
}
