#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

//! Structural and metadata reports for EBML files (Matroska, WebM).
//!
//! A scan builds the element tree of a file with [`ebml::EbmlReader`], binds
//! the known parts of it to typed records in [`MatroskaDocument`] and renders
//! both as a [`Report`].

use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;

pub mod ebml;
pub mod matroska;
mod util;

pub use ebml::{ByteSource, CancelToken, FormatError, RecoveryPolicy, ScanError, ScanOptions};
pub use matroska::{print_matroska_report, MatroskaDocument, Report};

/// Scans a seekable EBML stream and renders its report.
pub fn scan<R: Read + Seek>(reader: R, options: &ScanOptions) -> Result<Report, ScanError> {
    let document = MatroskaDocument::parse_from(reader, options)?;
    Ok(print_matroska_report(&document, options))
}

/// Like [`scan`], reading from the file at `path`. The file is closed before returning.
pub fn scan_file<P: AsRef<Path>>(path: P, options: &ScanOptions) -> Result<Report, ScanError> {
    let path = path.as_ref();
    debug!(path = %path.display(), shallow = options.shallow, "scanning file");
    let source = ByteSource::open(path)?;
    let document = MatroskaDocument::parse_source(source, options)?;
    Ok(print_matroska_report(&document, options))
}
