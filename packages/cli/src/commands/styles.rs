use super::{page_id_of, read_page, resolve};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_core::styles::resolve_styles;
use pagecraft_core::{ElementTree, StyleMap, Viewport};
use pagecraft_editor::EditorConfig;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct StylesArgs {
    /// Saved page (JSON array of elements)
    pub input: PathBuf,

    /// Viewport to resolve for (desktop, tablet, mobile); defaults to the
    /// configured default viewport
    #[arg(short, long)]
    pub viewport: Option<Viewport>,

    /// Only this element
    #[arg(short, long)]
    pub element: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn styles(args: StylesArgs, cwd: &str) -> Result<()> {
    let config = EditorConfig::load(cwd)?;
    let viewport = args.viewport.unwrap_or(config.default_viewport);

    let path = resolve(&args.input, cwd);
    let flat = read_page(&path)?;
    let tree = ElementTree::from_flat(page_id_of(&path, &flat), flat);

    let resolved: BTreeMap<&str, StyleMap> = match &args.element {
        Some(id) => {
            let element = tree
                .get(id)
                .ok_or_else(|| anyhow!("No element {} in {}", id, path.display()))?;
            BTreeMap::from([(element.id.as_str(), resolve_styles(element, viewport))])
        }
        None => tree
            .iter()
            .map(|el| (el.id.as_str(), resolve_styles(el, viewport)))
            .collect(),
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&resolved)?),
        "text" => {
            println!(
                "🎨 {} styles at {} ({}px canvas)",
                "Resolved".green().bold(),
                viewport,
                viewport.breakpoint().canvas_width
            );
            for el in tree.iter().filter(|el| resolved.contains_key(el.id.as_str())) {
                println!();
                println!("{} {}", el.element_type.to_string().cyan(), el.id.dimmed());
                for (property, value) in &resolved[el.id.as_str()] {
                    println!("   {}: {}", property, value);
                }
            }
        }
        other => return Err(anyhow!("Unknown format: {}. Use: text or json", other)),
    }

    Ok(())
}
