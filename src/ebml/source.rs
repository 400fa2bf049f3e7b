use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes fetched per refill of the read window.
const WINDOW_LEN: u64 = 8 * 1024;

/// Random-access, bounds-checked, read-only view over a seekable input.
///
/// Small reads are served from a window of recently fetched bytes, so the
/// header-then-payload access pattern of a scan seeks the input only when it
/// leaves the window. The underlying handle is owned for the lifetime of the
/// source and closed when it is dropped.
pub struct ByteSource<R: Read + Seek> {
    reader: R,
    len: u64,
    window_start: u64,
    window: Vec<u8>,
}

impl ByteSource<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> ByteSource<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.rewind()?;
        Ok(Self {
            reader,
            len,
            window_start: 0,
            window: Vec::new(),
        })
    }

    /// Total number of bytes available.
    pub const fn len(&self) -> u64 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads exactly `length` bytes at `offset`.
    pub fn read(&mut self, offset: u64, length: u64) -> io::Result<Vec<u8>> {
        let end = offset.checked_add(length).filter(|&end| end <= self.len);
        if end.is_none() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "read of {length} bytes at offset {offset} exceeds source length {}",
                    self.len
                ),
            ));
        }
        if let Some(bytes) = self.windowed(offset, length) {
            return Ok(bytes.to_vec());
        }
        if length >= WINDOW_LEN {
            return self.read_direct(offset, length);
        }

        self.window = self.read_direct(offset, WINDOW_LEN.min(self.len - offset))?;
        self.window_start = offset;
        self.windowed(offset, length)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "window refill came up short"))
    }

    fn windowed(&self, offset: u64, length: u64) -> Option<&[u8]> {
        let start = usize::try_from(offset.checked_sub(self.window_start)?).ok()?;
        let end = start.checked_add(usize::try_from(length).ok()?)?;
        self.window.get(start..end)
    }

    fn read_direct(&mut self, offset: u64, length: u64) -> io::Result<Vec<u8>> {
        let length = usize::try_from(length)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "read length too large"))?;

        let mut buffer = vec![0u8; length];
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads up to `max` bytes at `offset` without going past `limit`.
    pub fn read_up_to(&mut self, offset: u64, max: u64, limit: u64) -> io::Result<Vec<u8>> {
        let end = limit.min(self.len).min(offset.saturating_add(max));
        self.read(offset, end.saturating_sub(offset))
    }
}
