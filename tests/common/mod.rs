//! Hand-built EBML byte streams.
#![allow(dead_code)]

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use mkvinfo::matroska::ids::{EBML_DOCTYPE_ID, EBML_HEADER_ID, EBML_VERSION_ID};
use mkvinfo::CancelToken;

pub fn id_bytes(id: u32) -> Vec<u8> {
    let bytes = id.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(3);
    bytes[skip..].to_vec()
}

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

pub fn uint(id: u32, value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(7);
    element(id, &bytes[skip..])
}

/// EBML { DocType }; 16 bytes for "matroska", 12 for "webm".
pub fn ebml_header(doc_type: &str) -> Vec<u8> {
    element(EBML_HEADER_ID, &element(EBML_DOCTYPE_ID, doc_type.as_bytes()))
}

pub fn ebml_header_with_version(doc_type: &str) -> Vec<u8> {
    element(
        EBML_HEADER_ID,
        &[uint(EBML_VERSION_ID, 1), element(EBML_DOCTYPE_ID, doc_type.as_bytes())].concat(),
    )
}

/// In-memory file that cancels the scan once `reads` reads have been made.
pub struct CancelAfterReads {
    inner: Cursor<Vec<u8>>,
    cancel: CancelToken,
    reads_left: usize,
}

impl CancelAfterReads {
    pub fn new(bytes: Vec<u8>, cancel: CancelToken, reads: usize) -> Self {
        Self {
            inner: Cursor::new(bytes),
            cancel,
            reads_left: reads,
        }
    }
}

impl Read for CancelAfterReads {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads_left = self.reads_left.saturating_sub(1);
        if self.reads_left == 0 {
            self.cancel.cancel();
        }
        self.inner.read(buf)
    }
}

impl Seek for CancelAfterReads {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
