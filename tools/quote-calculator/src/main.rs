//! Contractor quote calculator CLI
//!
//! - derive: one-shot quote summary (or JSON)
//! - breakdown: export the plain-text breakdown
//! - interactive: edit a quote field by field
//! - init-config: write the default configuration

mod cli;

use clap::Parser;
use cli::commands::{handle_commands, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    handle_commands(cli)
}
