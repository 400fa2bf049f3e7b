pub mod element;
pub mod element_header;
pub mod error;
pub mod options;
pub mod primitives;
pub mod reader;
pub mod schema;
pub mod source;
pub mod vint;

#[cfg(test)]
pub(crate) mod test_util;

pub use element::{ByteRange, Element, ElementBody};
pub use element_header::DataSize;
pub use error::{FormatError, ScanError};
pub use options::{CancelToken, RecoveryPolicy, ScanOptions};
pub use primitives::Value;
pub use reader::EbmlReader;
pub use schema::{EbmlSchema, ElementSpec, Placement, ValueKind};
pub use source::ByteSource;
