pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "calypso", version)]
#[command(about = "Custodian for encrypted writes, re-encrypted to a single reader")]
pub struct Args {
    /// API endpoint of a running daemon (defaults to the configured port on localhost)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the calypso config directory (defaults to ~/.calypso)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
