//! Byte builders for hand-crafted EBML streams in tests.

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::ebml::options::CancelToken;

/// Element ID bytes; the value already carries its length marker.
pub fn id_bytes(id: u32) -> Vec<u8> {
    let bytes = id.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(3);
    bytes[skip..].to_vec()
}

/// Shortest size VINT that can hold `size`.
pub fn size_bytes(size: u64) -> Vec<u8> {
    let length = (1..=8u32)
        .find(|&length| size < (1u64 << (7 * length)) - 1)
        .expect("size fits in 8 byte VINT");
    let marked = size | (1u64 << (7 * length));
    marked.to_be_bytes()[(8 - length as usize)..].to_vec()
}

pub fn element(id: u32, payload: &[u8]) -> Vec<u8> {
    [id_bytes(id), size_bytes(payload.len() as u64), payload.to_vec()].concat()
}

pub fn unknown_size_element(id: u32, payload: &[u8]) -> Vec<u8> {
    [id_bytes(id), vec![0xFF], payload.to_vec()].concat()
}

/// Seekable in-memory stream that fires a cancel token on its n-th read.
pub struct CancelOnRead {
    inner: Cursor<Vec<u8>>,
    cancel: CancelToken,
    reads_left: usize,
}

impl CancelOnRead {
    pub fn new(bytes: Vec<u8>, cancel: CancelToken, reads: usize) -> Self {
        Self {
            inner: Cursor::new(bytes),
            cancel,
            reads_left: reads,
        }
    }
}

impl Read for CancelOnRead {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.reads_left > 0 {
            self.reads_left -= 1;
            if self.reads_left == 0 {
                self.cancel.cancel();
            }
        }
        self.inner.read(buf)
    }
}

impl Seek for CancelOnRead {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
