use std::io;

use thiserror::Error;

/// Structurally invalid EBML, reported at the position where it was found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid element ID prefix (no VINT marker)")]
    InvalidIdPrefix,

    #[error("invalid element ID length: {0} bytes")]
    InvalidIdLength(u8),

    #[error("invalid element size prefix (no VINT marker)")]
    InvalidSizePrefix,

    #[error("unexpected end of data in VINT")]
    TruncatedVint,

    #[error("cannot resolve element boundary")]
    UnresolvableBoundary,

    #[error("maximum nesting depth of {0} exceeded")]
    MaxDepthExceeded(usize),

    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    #[error("invalid integer length: {0}")]
    InvalidIntegerWidth(u64),

    #[error("invalid float length: {0}")]
    InvalidFloatWidth(u64),

    #[error("invalid date length: {0}")]
    InvalidDateWidth(u64),

    #[error("value of {0} bytes is too large to decode")]
    OversizedValue(u64),

    #[error("element declares {declared} bytes but only {available} remain in its parent")]
    ElementOverrunsParent { declared: u64, available: u64 },
}

/// Failure of a whole scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("format error at byte {offset}: {reason}")]
    Format { offset: u64, reason: FormatError },

    #[error("scan cancelled")]
    Cancelled,
}

impl ScanError {
    pub const fn format(offset: u64, reason: FormatError) -> Self {
        Self::Format { offset, reason }
    }

    /// The format error behind this failure, if any.
    pub const fn format_reason(&self) -> Option<&FormatError> {
        match self {
            Self::Format { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
