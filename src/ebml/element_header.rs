use crate::ebml::error::FormatError;
use crate::ebml::vint::{RawVint, VintError};

/// Longest header: a 4 byte ID followed by an 8 byte size.
pub const MAX_HEADER_LEN: u64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementId {
    //TODO: Handle length > 4 for EBMLMaxIDLength > 4
    pub value: u32,
    pub length: u8, // 1–4 bytes
}

impl ElementId {
    /// Element ID values keep their VINT_MARKER, so `0x81` and `0x4001` stay distinct.
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, FormatError> {
        let raw_vint = match RawVint::decode(bytes) {
            Ok(Some(raw_vint)) => raw_vint,
            Ok(None) => return Ok(None),
            Err(VintError::NoMarker) => return Err(FormatError::InvalidIdPrefix),
            Err(VintError::Truncated) => return Err(FormatError::TruncatedVint),
        };
        if raw_vint.length > 4 {
            return Err(FormatError::InvalidIdLength(raw_vint.length));
        }
        let value =
            u32::try_from(raw_vint.value).map_err(|_| FormatError::InvalidIdLength(raw_vint.length))?;

        Ok(Some(Self {
            value,
            length: raw_vint.length,
        }))
    }
}

/// Declared payload size of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSize {
    Known(u64),
    /// All VINT_DATA bits set: the end must be found by content.
    Unknown,
}

impl DataSize {
    pub const fn known(self) -> Option<u64> {
        match self {
            Self::Known(size) => Some(size),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSize {
    pub value: DataSize,
    pub length: u8, // 1–8 bytes
}

impl ElementSize {
    const fn from_raw_vint(raw_vint: &RawVint) -> Self {
        let value = if raw_vint.is_all_ones() {
            DataSize::Unknown
        } else {
            DataSize::Known(raw_vint.data())
        };
        Self {
            value,
            length: raw_vint.length,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, FormatError> {
        match RawVint::decode(bytes) {
            Ok(raw_vint) => Ok(raw_vint.as_ref().map(Self::from_raw_vint)),
            Err(VintError::NoMarker) => Err(FormatError::InvalidSizePrefix),
            Err(VintError::Truncated) => Err(FormatError::TruncatedVint),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHeader {
    pub id: ElementId,
    pub data_size: ElementSize,
    pub header_size: u8, // 2 VINT's -> 2-12 bytes
}

impl ElementHeader {
    /// Decodes an (ID, size) pair from the start of `bytes`.
    ///
    /// Returns `Ok(None)` for empty input. A header cut short by the end of
    /// `bytes` is [`FormatError::TruncatedVint`].
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, FormatError> {
        let Some(id) = ElementId::decode(bytes)? else {
            return Ok(None);
        };

        let rest = &bytes[usize::from(id.length)..];
        let Some(data_size) = ElementSize::decode(rest)? else {
            return Err(FormatError::TruncatedVint);
        };

        Ok(Some(Self {
            id,
            data_size,
            header_size: id.length + data_size.length,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_element_id() {
        // Element Id's values are taken directly from raw_vint
        let cases = vec![
            (vec![0b1001_1100], 1, 0b1001_1100),
            (vec![0b0101_0001, 0x00], 2, 0x5100),
            (vec![0b0011_1110, 0xAC, 0x12], 3, 0x003E_AC12),
            (vec![0b0001_1111, 0xFF, 0xEE, 0xDD], 4, 0x1FFF_EEDD),
        ];

        for (input, expected_length, expected_value) in cases {
            let element_id = ElementId::decode(&input).unwrap().unwrap();
            assert_eq!(
                element_id.length, expected_length,
                "input {input:#02x?}, expected length {expected_length}, got {}",
                element_id.length
            );
            assert_eq!(
                element_id.value, expected_value,
                "input {input:#02x?}, expected value {expected_value:#x}, got {:#x}",
                element_id.value
            );
        }
    }

    #[test]
    fn test_decode_element_id_keeps_marker_width() {
        let short = ElementId::decode(&[0x81]).unwrap().unwrap();
        let long = ElementId::decode(&[0x40, 0x01]).unwrap().unwrap();
        assert_ne!(short.value, long.value);
    }

    #[test]
    fn test_decode_element_id_invalid_length() {
        let data = vec![0b0000_1111, 0xFF, 0xEE, 0xDD, 0xCC]; // Length 5, invalid
        assert_eq!(
            ElementId::decode(&data),
            Err(FormatError::InvalidIdLength(5))
        );
    }

    #[test]
    fn test_decode_element_id_zero_prefix() {
        assert_eq!(
            ElementId::decode(&[0x00, 0x80]),
            Err(FormatError::InvalidIdPrefix)
        );
    }

    #[test]
    fn test_decode_element_size() {
        let cases = vec![
            (vec![0b1001_1100], 1, 0b0001_1100),
            (vec![0b0101_0001, 0x00], 2, 0x1100),
            (vec![0b0011_1110, 0xAC, 0x12], 3, 0x001E_AC12),
            (vec![0b0001_1111, 0xFF, 0xEE, 0xDD], 4, 0x0FFF_EEDD),
        ];

        for (input, expected_length, expected_value) in cases {
            let element_size = ElementSize::decode(&input).unwrap().unwrap();
            assert_eq!(
                element_size.length, expected_length,
                "input {input:#02x?}, expected length {expected_length}, got {}",
                element_size.length
            );
            assert_eq!(
                element_size.value,
                DataSize::Known(expected_value),
                "input {input:#02x?}"
            );
        }
    }

    #[test]
    fn test_decode_unknown_size() {
        let cases = vec![
            vec![0xFF],
            vec![0x7F, 0xFF],
            vec![0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        ];
        for input in cases {
            let element_size = ElementSize::decode(&input).unwrap().unwrap();
            assert_eq!(element_size.value, DataSize::Unknown, "input {input:#02x?}");
        }
    }

    #[test]
    fn test_decode_size_zero_prefix() {
        assert_eq!(
            ElementSize::decode(&[0x00]),
            Err(FormatError::InvalidSizePrefix)
        );
    }

    #[test]
    fn test_decode_element_header() {
        let header_bytes = vec![
            // Element ID (EBML Header ID)
            0x1A,
            0x45,
            0xDF,
            0xA3,
            // Element Size
            (0b1000_0000 + 15), // Size: 15 bytes
        ];

        let element_header = ElementHeader::decode(&header_bytes).unwrap().unwrap();
        assert_eq!(element_header.id.length, 4);
        assert_eq!(element_header.id.value, 0x1A45_DFA3);
        assert_eq!(element_header.data_size.length, 1);
        assert_eq!(element_header.data_size.value, DataSize::Known(15));
        assert_eq!(element_header.header_size, 5);
    }

    #[test]
    fn test_decode_element_header_truncated() {
        // Element ID (incomplete)
        let header_bytes = vec![0x1A, 0x45];
        assert_eq!(
            ElementHeader::decode(&header_bytes),
            Err(FormatError::TruncatedVint)
        );

        // Element ID without size
        let header_bytes = vec![0x1A, 0x45, 0xDF, 0xA3];
        assert_eq!(
            ElementHeader::decode(&header_bytes),
            Err(FormatError::TruncatedVint)
        );
    }

    #[test]
    fn test_decode_element_header_empty() {
        assert_eq!(ElementHeader::decode(&[]), Ok(None));
    }
}
