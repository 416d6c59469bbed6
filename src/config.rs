use std::path::PathBuf;

use clap::Parser;
use derive_getters::Getters;

/// Minimal SQL front-end over tab-separated table files.
#[derive(Parser, Debug, Getters)]
#[command(name = "tabsql", version)]
pub struct Config {
    /// Directory holding one .tsv file per table
    #[arg(long, default_value = "DB")]
    data_dir: PathBuf,

    /// Log parsed statements and file operations
    #[arg(long)]
    debug: bool,

    /// Execute the statements of this file instead of starting the prompt
    script: Option<PathBuf>,
}
