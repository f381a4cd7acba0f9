pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shardnote")]
#[command(about = "Work with notebooks shared across note store shards", version)]
pub struct Args {
    /// Path to the shardnote config directory (defaults to ~/.shardnote)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
