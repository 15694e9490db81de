use super::{page_id_of, read_page, resolve};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_core::{ElementNode, ElementTree};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Saved page (JSON array of elements)
    pub input: PathBuf,

    /// Print the nested tree as JSON instead
    #[arg(long)]
    pub json: bool,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let path = resolve(&args.input, cwd);
    let flat = read_page(&path)?;
    let tree = ElementTree::from_flat(page_id_of(&path, &flat), flat);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree.nodes())?);
        return Ok(());
    }

    println!(
        "📄 {} {} ({} elements)",
        "Page".green().bold(),
        tree.page_id(),
        tree.len()
    );
    for node in tree.nodes() {
        print_node(&node, 1);
    }
    Ok(())
}

fn print_node(node: &ElementNode, depth: usize) {
    let element = &node.element;
    let label = element
        .content
        .get("text")
        .or_else(|| element.content.get("title"))
        .and_then(|value| value.as_str())
        .map(|text| format!(" {:?}", text))
        .unwrap_or_default();

    println!(
        "{}{} {}{}",
        "  ".repeat(depth),
        element.element_type.to_string().cyan(),
        element.id.dimmed(),
        label
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
