//! # toksim
//!
//! CLI entry point: parses the option surface, then hands off to the
//! driver. This crate holds no comparison logic of its own.

mod cli;
mod config;
mod driver;

pub use cli::Cli;

use anyhow::{bail, Result};
use clap::error::ErrorKind;
use clap::Parser;

/// Runs the tool against the process arguments.
pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    run_with_args(args)
}

/// The bare `--` is itself an option (lexical dump only), so it is
/// recognized and stripped before clap sees the list.
pub fn run_with_args(mut args: Vec<String>) -> Result<()> {
    let lex_only = args.iter().skip(1).any(|a| a == "--");
    if lex_only {
        args.retain(|a| a != "--");
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            print!("{e}");
            return Ok(());
        }
        Err(e) => {
            let msg = e.to_string();
            let first = msg.lines().next().unwrap_or("bad arguments");
            let first = first.strip_prefix("error: ").unwrap_or(first);
            bail!("{first}");
        }
    };
    driver::run(cli, lex_only)
}
