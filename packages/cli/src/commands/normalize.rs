use super::{read_page, resolve};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_core::styles::{normalize_css_styles, normalize_inline_styles};
use pagecraft_core::{Element, StyleMap};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Saved page (JSON array of elements)
    pub input: PathBuf,

    /// Write here instead of rewriting the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fold complete longhand sets back into shorthands (stylesheet output)
    #[arg(long)]
    pub css: bool,
}

pub fn normalize(args: NormalizeArgs, cwd: &str) -> Result<()> {
    let input = resolve(&args.input, cwd);
    let output = args
        .output
        .as_ref()
        .map(|path| resolve(path, cwd))
        .unwrap_or_else(|| input.clone());

    let mut elements = read_page(&input)?;
    let changed = normalize_page(&mut elements, args.css);

    let json = serde_json::to_string_pretty(&elements)?;
    fs::write(&output, json).with_context(|| format!("Cannot write {}", output.display()))?;

    println!("✨ {} {}", "Normalized".green().bold(), output.display());
    println!("   Elements changed: {} of {}", changed, elements.len());
    Ok(())
}

/// Normalize the base map and every override layer; returns how many
/// elements changed
fn normalize_page(elements: &mut [Element], css: bool) -> usize {
    let normalize: fn(&StyleMap) -> StyleMap = if css {
        normalize_css_styles
    } else {
        normalize_inline_styles
    };

    let mut changed = 0;
    for element in elements.iter_mut() {
        let mut touched = rewrite(&mut element.styles, normalize);
        let layers = &mut element.responsive_styles;
        for layer in [layers.tablet.as_mut(), layers.mobile.as_mut()].into_iter().flatten() {
            touched |= rewrite(layer, normalize);
        }
        if touched {
            tracing::debug!(element = %element.id, "styles normalized");
            changed += 1;
        }
    }
    changed
}

fn rewrite(styles: &mut StyleMap, normalize: fn(&StyleMap) -> StyleMap) -> bool {
    let normalized = normalize(styles);
    if normalized == *styles {
        return false;
    }
    *styles = normalized;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"[
        { "id": "s", "type": "section", "position": 0,
          "styles": { "padding": "1rem 2rem", "paddingTop": "0" },
          "responsiveStyles": { "mobile": { "margin": "0", "marginLeft": "4px" } } },
        { "id": "t", "type": "text", "parentId": "s", "position": 0,
          "styles": { "color": "red" } }
    ]"#;

    #[test]
    fn test_normalize_page_counts_changed_elements() {
        let mut elements: Vec<Element> = serde_json::from_str(PAGE).unwrap();
        assert_eq!(normalize_page(&mut elements, false), 1);

        let section = &elements[0];
        assert!(section.styles.get("padding").is_none());
        assert_eq!(section.styles.get("paddingTop").map(String::as_str), Some("0"));
        assert_eq!(section.styles.get("paddingRight").map(String::as_str), Some("2rem"));

        let mobile = section.responsive_styles.mobile.as_ref().unwrap();
        assert!(mobile.get("margin").is_none());
        assert_eq!(mobile.get("marginLeft").map(String::as_str), Some("4px"));

        assert_eq!(normalize_page(&mut elements, false), 0);
    }

    #[test]
    fn test_normalize_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("home.json");
        let output = dir.path().join("out.json");
        fs::write(&input, PAGE).unwrap();

        normalize(
            NormalizeArgs {
                input: input.clone(),
                output: Some(output.clone()),
                css: false,
            },
            ".",
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&input).unwrap(), PAGE);
        let written: Vec<Element> = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].styles.get("padding").is_none());
    }
}
