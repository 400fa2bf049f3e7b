mod cli;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use cli::Cli;
use mkvinfo::{scan_file, CancelToken, Report, ScanError};
use rayon::prelude::*;

fn spawn_timeout(cancel: CancelToken, timeout: Duration) {
    thread::spawn(move || {
        thread::sleep(timeout);
        tracing::warn!("timeout of {}s reached, cancelling scans", timeout.as_secs());
        cancel.cancel();
    });
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mkvinfo=trace".to_string()
        } else {
            "mkvinfo=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let options = cli.scan_options();
    if let Some(secs) = cli.timeout_secs {
        spawn_timeout(options.cancel.clone(), Duration::from_secs(secs));
    }

    let results: Vec<(&PathBuf, Result<Report, ScanError>)> = cli
        .files
        .par_iter()
        .map(|path| (path, scan_file(path, &options)))
        .collect();

    let mut failures = 0;
    for (path, result) in results {
        if cli.files.len() > 1 {
            println!("==> {} <==", path.display());
        }
        match result {
            Ok(report) => print!("{report}"),
            Err(e) => {
                tracing::error!("Failed to scan {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} file(s) could not be scanned", cli.files.len());
    }
    Ok(())
}
