use std::fmt;

use thiserror::Error;

use crate::ebml::vint::{RawVint, VintError};

const FLAG_KEYFRAME: u8 = 0x80;
const FLAG_INVISIBLE: u8 = 0x08;
const FLAG_LACING: u8 = 0x06;
const FLAG_DISCARDABLE: u8 = 0x01;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("block header is truncated")]
    Truncated,

    #[error("invalid track number")]
    InvalidTrackNumber,

    #[error("lace sizes do not add up to the block size")]
    InvalidLaceSizes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lacing {
    None,
    Xiph,
    FixedSize,
    Ebml,
}

impl Lacing {
    const fn from_flags(flags: u8) -> Self {
        match (flags & FLAG_LACING) >> 1 {
            0 => Self::None,
            1 => Self::Xiph,
            2 => Self::FixedSize,
            _ => Self::Ebml,
        }
    }
}

impl fmt::Display for Lacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Xiph => "Xiph",
            Self::FixedSize => "fixed",
            Self::Ebml => "EBML",
        };
        f.write_str(name)
    }
}

/// Fixed part of a Block or SimpleBlock payload:
/// track number VINT, signed 16-bit timecode, flags, optional lace count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub track_number: u64,
    /// Relative to the enclosing cluster's timestamp.
    pub timecode: i16,
    pub flags: u8,
    pub lacing: Lacing,
    pub frame_count: u16,
    /// Size of each frame in bytes. `None` when the lace table extends past
    /// the bytes that were read of the payload.
    pub frame_sizes: Option<Vec<u64>>,
}

impl BlockHeader {
    /// Parses the leading `bytes` of a block payload of `payload_len` bytes.
    pub fn parse(bytes: &[u8], payload_len: u64) -> Result<Self, BlockError> {
        let track = match RawVint::decode(bytes) {
            Ok(Some(track)) => track,
            Ok(None) | Err(VintError::Truncated) => return Err(BlockError::Truncated),
            Err(VintError::NoMarker) => return Err(BlockError::InvalidTrackNumber),
        };
        let rest = &bytes[usize::from(track.length)..];

        let [timecode_hi, timecode_lo, flags, ..] = rest else {
            return Err(BlockError::Truncated);
        };
        let flags = *flags;
        let lacing = Lacing::from_flags(flags);
        let fixed_len = u64::from(track.length) + 3;

        let (frame_count, frame_sizes) = if lacing == Lacing::None {
            let size = payload_len.checked_sub(fixed_len).ok_or(BlockError::Truncated)?;
            (1, Some(vec![size]))
        } else {
            let lace_count = rest.get(3).ok_or(BlockError::Truncated)?;
            let frame_count = u16::from(*lace_count) + 1;
            let remaining = payload_len.checked_sub(fixed_len + 1).ok_or(BlockError::Truncated)?;
            let whole_payload = u64::try_from(bytes.len()).is_ok_and(|len| len >= payload_len);
            let frame_sizes = match lace_sizes(lacing, frame_count, &rest[4..], remaining) {
                Ok(sizes) => Some(sizes),
                // Only the preview ran out, not the block.
                Err(BlockError::Truncated) if !whole_payload => None,
                Err(error) => return Err(error),
            };
            (frame_count, frame_sizes)
        };

        Ok(Self {
            track_number: track.data(),
            timecode: i16::from_be_bytes([*timecode_hi, *timecode_lo]),
            flags,
            lacing,
            frame_count,
            frame_sizes,
        })
    }

    /// Only meaningful for SimpleBlock; Block uses ReferenceBlock instead.
    pub const fn is_keyframe(&self) -> bool {
        self.flags & FLAG_KEYFRAME != 0
    }

    pub const fn is_invisible(&self) -> bool {
        self.flags & FLAG_INVISIBLE != 0
    }

    pub const fn is_discardable(&self) -> bool {
        self.flags & FLAG_DISCARDABLE != 0
    }
}

/// Decodes the lace table at the start of `table`. `remaining` counts the
/// table plus all frame data.
fn lace_sizes(lacing: Lacing, frames: u16, table: &[u8], remaining: u64) -> Result<Vec<u64>, BlockError> {
    if lacing == Lacing::FixedSize {
        let count = u64::from(frames);
        if remaining % count != 0 {
            return Err(BlockError::InvalidLaceSizes);
        }
        return Ok(vec![remaining / count; usize::from(frames)]);
    }

    let mut sizes = Vec::with_capacity(usize::from(frames));
    let mut pos = 0;
    for _ in 1..frames {
        let size = match lacing {
            Lacing::Xiph => {
                let mut size = 0u64;
                loop {
                    let byte = *table.get(pos).ok_or(BlockError::Truncated)?;
                    pos += 1;
                    size += u64::from(byte);
                    if byte != 0xFF {
                        break size;
                    }
                }
            }
            _ => {
                let vint = match RawVint::decode(table.get(pos..).unwrap_or_default()) {
                    Ok(Some(vint)) => vint,
                    Ok(None) | Err(VintError::Truncated) => return Err(BlockError::Truncated),
                    Err(VintError::NoMarker) => return Err(BlockError::InvalidLaceSizes),
                };
                pos += usize::from(vint.length);
                // The first size is absolute, later ones are deltas to the previous size.
                match sizes.last() {
                    None => vint.data(),
                    Some(&previous) => vint
                        .signed_data()
                        .and_then(|delta| u64::checked_add_signed(previous, delta))
                        .ok_or(BlockError::InvalidLaceSizes)?,
                }
            }
        };
        sizes.push(size);
    }

    let table_len = u64::try_from(pos).map_err(|_| BlockError::InvalidLaceSizes)?;
    let last = remaining
        .checked_sub(table_len)
        .and_then(|data| data.checked_sub(sizes.iter().sum()))
        .ok_or(BlockError::InvalidLaceSizes)?;
    sizes.push(last);
    Ok(sizes)
}
