//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Typeset language-tagged noweb code chunks as LaTeX figures.
///
/// Reads noweb's tagged stream on stdin and writes the filtered stream to stdout.
#[derive(Parser, Debug)]
#[command(name = "noweb-figures")]
#[command(version)]
pub struct Args {
    /// File name whose `@file` line is passed through
    pub target: String,

    /// Config file path (defaults to ./noweb-figures.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
