use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use mkvinfo::{RecoveryPolicy, ScanOptions};

#[derive(Parser)]
#[command(name = "mkvinfo")]
#[command(author, version, about = "Report the structure and metadata of Matroska/WebM files")]
pub struct Cli {
    /// Files to scan
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Read only the first Cluster in full, skip the rest
    #[arg(long)]
    pub shallow: bool,

    /// Maximum element nesting depth
    #[arg(long, default_value = "64")]
    pub max_depth: NonZeroUsize,

    /// Fail on the first malformed element instead of recovering
    #[arg(long)]
    pub strict: bool,

    /// Cancel scans still running after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn scan_options(&self) -> ScanOptions {
        let recovery = if self.strict {
            RecoveryPolicy::Strict
        } else {
            RecoveryPolicy::BestEffort
        };
        ScanOptions::default()
            .with_shallow(self.shallow)
            .with_max_depth(self.max_depth)
            .with_recovery(recovery)
    }
}
