//! Sandcast CLI Binary
//!
//! Command-line interface for loading local projects and launching sandboxed
//! previews.

use anyhow::Context as _;
use clap::Parser;
use sandcast::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let context = CliContext::new(&cli).context("failed to initialize")?;
    let output = context.execute(&cli.command)?;
    println!("{output}");
    Ok(())
}
