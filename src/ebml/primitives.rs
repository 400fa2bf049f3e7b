use std::fmt;

use chrono::DateTime;

use crate::ebml::error::FormatError;
use crate::ebml::schema::ValueKind;

/// Bytes of a binary payload kept for display.
pub const BINARY_PREVIEW_LEN: usize = 16;

/// Largest string payload decoded into memory.
pub const MAX_STRING_LEN: u64 = 1 << 20;

/// 2001-01-01T00:00:00Z as seconds since the Unix epoch.
const MATROSKA_EPOCH_UNIX_SECS: i64 = 978_307_200;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A decoded leaf payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    /// Nanoseconds since 2001-01-01T00:00:00Z.
    Date(i64),
    /// Opaque payload. Only a leading preview is kept, and at most
    /// [`BINARY_PREVIEW_LEN`] bytes of it are displayed.
    Binary { len: u64, preview: Vec<u8> },
}

impl Value {
    pub fn binary(len: u64, mut preview: Vec<u8>) -> Self {
        preview.truncate(BINARY_PREVIEW_LEN);
        Self::Binary { len, preview }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Signed(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:.6}"),
            Self::Text(value) => write!(f, "{value:?}"),
            Self::Date(nanos) => f.write_str(&format_date(*nanos)),
            Self::Binary { len, preview } => {
                let shown = &preview[..preview.len().min(BINARY_PREVIEW_LEN)];
                if shown.is_empty() {
                    return write!(f, "<{len} bytes>");
                }
                let ellipsis = if *len > shown.len() as u64 { "..." } else { "" };
                write!(f, "<{len} bytes: {}{ellipsis}>", hex::encode(shown))
            }
        }
    }
}

/// Renders a Matroska date as `YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ`.
pub fn format_date(nanos: i64) -> String {
    let secs = nanos.div_euclid(NANOS_PER_SEC) + MATROSKA_EPOCH_UNIX_SECS;
    u32::try_from(nanos.rem_euclid(NANOS_PER_SEC))
        .ok()
        .and_then(|subsec| DateTime::from_timestamp(secs, subsec))
        .map_or_else(
            || format!("<date out of range: {nanos}ns>"),
            |date| date.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string(),
        )
}

/// Decodes a non-binary payload according to its kind.
pub fn decode_value(kind: ValueKind, bytes: &[u8]) -> Result<Value, FormatError> {
    match kind {
        ValueKind::Unsigned => parse_u64(bytes).map(Value::Unsigned),
        ValueKind::Signed => parse_i64(bytes).map(Value::Signed),
        ValueKind::Float => parse_f64(bytes).map(Value::Float),
        ValueKind::String | ValueKind::Utf8 => parse_string(bytes).map(Value::Text),
        ValueKind::Date => parse_date(bytes).map(Value::Date),
        ValueKind::Binary | ValueKind::Master => {
            Ok(Value::binary(bytes.len() as u64, bytes.to_vec()))
        }
    }
}

/// Strings may be zero-padded; the padding is not part of the value.
pub fn parse_string(bytes: &[u8]) -> Result<String, FormatError> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end])
        .map(str::to_owned)
        .map_err(|_| FormatError::InvalidUtf8)
}

/// Big-endian unsigned integer of 0 to 8 bytes; empty means 0.
pub fn parse_u64(bytes: &[u8]) -> Result<u64, FormatError> {
    if bytes.len() > 8 {
        return Err(FormatError::InvalidIntegerWidth(bytes.len() as u64));
    }
    let mut value: u64 = 0;
    for &byte in bytes {
        value = (value << 8) | u64::from(byte);
    }
    Ok(value)
}

/// Big-endian two's complement integer of 0 to 8 bytes.
pub fn parse_i64(bytes: &[u8]) -> Result<i64, FormatError> {
    if bytes.len() > 8 {
        return Err(FormatError::InvalidIntegerWidth(bytes.len() as u64));
    }
    let sign = match bytes.first() {
        Some(&byte) if byte & 0x80 != 0 => -1,
        _ => 0,
    };
    Ok(bytes
        .iter()
        .fold(sign, |value: i64, &byte| (value << 8) | i64::from(byte)))
}

/// IEEE 754 float of 0, 4 or 8 bytes.
pub fn parse_f64(bytes: &[u8]) -> Result<f64, FormatError> {
    match bytes.len() {
        0 => Ok(0.0),
        4 => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(bytes);
            Ok(f64::from(f32::from_be_bytes(buf)))
        }
        8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(bytes);
            Ok(f64::from_be_bytes(buf))
        }
        other => Err(FormatError::InvalidFloatWidth(other as u64)),
    }
}

/// Signed nanoseconds since the Matroska epoch, 0 or 8 bytes.
pub fn parse_date(bytes: &[u8]) -> Result<i64, FormatError> {
    match bytes.len() {
        0 | 8 => parse_i64(bytes),
        other => Err(FormatError::InvalidDateWidth(other as u64)),
    }
}
