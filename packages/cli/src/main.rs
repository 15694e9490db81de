mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, inspect, normalize, styles, CheckArgs, InspectArgs, NormalizeArgs, StylesArgs};
use tracing_subscriber::EnvFilter;

/// Pagecraft CLI - inspect and repair saved pages
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a page's element tree
    Inspect(InspectArgs),

    /// Print resolved styles for a viewport
    Styles(StylesArgs),

    /// Report structural and style problems
    Check(CheckArgs),

    /// Rewrite a page with normalized styles
    Normalize(NormalizeArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PAGECRAFT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| ".".to_string());

    let result = match cli.command {
        Command::Inspect(args) => inspect(args, &cwd),
        Command::Styles(args) => styles(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Normalize(args) => normalize(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
