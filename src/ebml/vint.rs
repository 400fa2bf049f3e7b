#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VintError {
    /// First byte is 0x00, so there is no VINT_MARKER in the first octet.
    NoMarker,
    /// Fewer bytes available than the VINT_WIDTH announces.
    Truncated,
}

/// A VINT exactly as stored: `value` still carries the VINT_MARKER bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawVint {
    pub value: u64,
    pub length: u8, // 1–8 bytes
}

impl RawVint {
    /// Decodes the VINT at the start of `bytes`. Returns `Ok(None)` when `bytes` is empty.
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, VintError> {
        let Some(&first_byte) = bytes.first() else {
            return Ok(None);
        };

        // Determine length by VINT_MARKER position
        let length = (1..=8u8)
            .find(|&length| first_byte & (0x80 >> (length - 1)) != 0)
            .ok_or(VintError::NoMarker)?;

        let Some(octets) = bytes.get(..usize::from(length)) else {
            return Err(VintError::Truncated);
        };
        let value = octets
            .iter()
            .fold(0u64, |value, &byte| (value << 8) | u64::from(byte));

        Ok(Some(Self { value, length }))
    }

    /// VINT_DATA with the marker bit cleared.
    pub const fn data(&self) -> u64 {
        // VINT_MARKER is at position 8 * length - length = 7 * length
        self.value & !(1 << (7 * self.length))
    }

    /// VINT_DATA read as a signed value, as used by EBML lace size deltas.
    pub fn signed_data(&self) -> Option<i64> {
        let bias = (1i64 << (7 * self.length - 1)) - 1;
        i64::try_from(self.data()).ok().map(|data| data - bias)
    }

    /// True when every VINT_DATA bit is set (the reserved "unknown" value).
    pub const fn is_all_ones(&self) -> bool {
        self.data() == (1 << (7 * self.length)) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_raw_vint() {
        let cases = vec![
            (vec![0x83], 1, 0x83),
            (vec![0x4F, 0xAB], 2, 0x4FAB),
            (vec![0x1A, 0x13, 0xBB, 0x00], 4, 0x1A13_BB00),
            (
                vec![0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00],
                8,
                0x0100_FF00_FF00_FF00,
            ),
        ];

        for (input, expected_length, expected_value) in cases {
            let raw_vint = RawVint::decode(&input).unwrap().unwrap();
            assert_eq!(
                raw_vint.length, expected_length,
                "input {input:#02x?}, expected length {expected_length}, got {}",
                raw_vint.length
            );
            assert_eq!(
                raw_vint.value, expected_value,
                "input {input:#02x?}, expected value {expected_value:#x}, got {:#x}",
                raw_vint.value
            );
        }
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let raw_vint = RawVint::decode(&[0x81, 0xFF, 0xFF]).unwrap().unwrap();
        assert_eq!(raw_vint.length, 1);
        assert_eq!(raw_vint.data(), 1);
    }

    #[test]
    fn test_data_clears_marker() {
        let cases = vec![
            (vec![0x82], 2),
            (vec![0x40, 0x02], 2),
            (vec![0x20, 0x00, 0x02], 2),
            (vec![0x10, 0x00, 0x00, 0x02], 2),
            (vec![0x01, 0, 0, 0, 0, 0, 0x01, 0x00], 256),
        ];

        for (input, expected) in cases {
            let raw_vint = RawVint::decode(&input).unwrap().unwrap();
            assert_eq!(raw_vint.data(), expected, "input {input:#02x?}");
        }
    }

    #[test]
    fn test_all_ones() {
        assert!(RawVint::decode(&[0xFF]).unwrap().unwrap().is_all_ones());
        assert!(RawVint::decode(&[0x7F, 0xFF]).unwrap().unwrap().is_all_ones());
        assert!(RawVint::decode(&[0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])
            .unwrap()
            .unwrap()
            .is_all_ones());
        assert!(!RawVint::decode(&[0xFE]).unwrap().unwrap().is_all_ones());
        assert!(!RawVint::decode(&[0x7F, 0xFE]).unwrap().unwrap().is_all_ones());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(RawVint::decode(&[]), Ok(None));
    }

    #[test]
    fn test_no_vint_marker() {
        assert_eq!(RawVint::decode(&[0x00, 0x81]), Err(VintError::NoMarker));
    }

    #[test]
    fn test_truncated() {
        let cases = vec![
            vec![0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // Length = 8 but only 7 bytes provided
            vec![0x08, 0x00, 0x00],                         // Length = 5 but only 3 bytes provided
            vec![0x10, 0x00],                               // Length = 4 but only 2 bytes provided
            vec![0x20, 0x00],                               // Length = 3 but only 2 bytes provided
        ];

        for input in cases {
            let result = RawVint::decode(&input);
            assert_eq!(
                result,
                Err(VintError::Truncated),
                "input {input:#02x?}, expected Err(VintError::Truncated) got {result:?}"
            );
        }
    }
}
