use super::{read_page, resolve};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_core::{audit_page, AuditIssue};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Saved page, or a directory of saved pages (*.json)
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let input = resolve(&args.input, cwd);
    println!("🔍 {} Pagecraft page check", "Starting".green().bold());
    println!("   Input: {}", input.display());
    println!();

    let pages = if input.is_file() {
        vec![input.clone()]
    } else if input.is_dir() {
        let pages = find_page_files(&input);
        println!("   Found {} page files", pages.len());
        println!();
        pages
    } else {
        return Err(anyhow::anyhow!("Input path does not exist: {}", input.display()));
    };

    let mut total_errors = 0;
    let mut total_warnings = 0;
    for page in &pages {
        let (errors, warnings) = check_file(page, &args.format)?;
        total_errors += errors;
        total_warnings += warnings;
    }

    println!();
    println!(
        "✨ {} Check complete!",
        if total_errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Pages checked: {}", pages.len());
    if total_errors > 0 {
        println!("   {} {}", "Errors:".red(), total_errors);
    }
    if total_warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), total_warnings);
    }
    if total_errors == 0 && total_warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }

    if total_errors + total_warnings > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Problems loading cannot repair without losing intent are errors;
/// the rest are warnings
fn is_error(issue: &AuditIssue) -> bool {
    matches!(
        issue,
        AuditIssue::DuplicateId { .. } | AuditIssue::DanglingParent { .. } | AuditIssue::InvalidPlacement { .. }
    )
}

fn check_file(path: &Path, format: &str) -> Result<(usize, usize)> {
    let flat = read_page(path)?;
    let issues = audit_page(&flat);
    let errors = issues.iter().filter(|issue| is_error(issue)).count();
    let warnings = issues.len() - errors;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&issues)?);
        return Ok((errors, warnings));
    }

    if issues.is_empty() {
        println!("{} {}", "✓".green(), path.display());
        return Ok((0, 0));
    }

    println!("{}", path.display());
    for issue in &issues {
        let level = if is_error(issue) {
            "error".red().bold()
        } else {
            "warning".yellow().bold()
        };
        println!("  {} {}", level, issue);
    }
    println!();

    Ok((errors, warnings))
}

fn find_page_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false))
        .filter(|path| path.file_name().map(|name| name != pagecraft_editor::DEFAULT_CONFIG_NAME).unwrap_or(true))
        .collect()
}
