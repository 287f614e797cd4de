//! Positioned read cursors over in-memory byte buffers.
//!
//! The decode engine only talks to [`ReadCursor`]; the buffer itself is owned
//! by the caller (typically a memory-mapped save file).

use crate::error::{Error, Result};

/// A read position over a byte buffer that advances as bytes are consumed.
pub trait ReadCursor {
    /// Current offset from the start of the buffer
    fn position(&self) -> usize;

    /// Number of bytes left after the current position
    fn remaining(&self) -> usize;

    /// Return the next `len` bytes without advancing
    fn peek(&self, len: usize) -> Result<&[u8]>;

    /// Consume and return the next `len` bytes
    ///
    /// On failure the position is left unchanged.
    fn read_bytes(&mut self, len: usize) -> Result<&[u8]>;

    /// Advance past `len` bytes without reading them
    fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Consume exactly `N` bytes into an array
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]>
    where
        Self: Sized,
    {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

/// Cursor over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a cursor starting at `offset`
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self> {
        let mut cursor = Self::new(data);
        cursor.seek(offset)?;
        Ok(cursor)
    }

    /// Move to an absolute offset; the end of the buffer is a valid position
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(Error::OffsetOutOfBounds {
                offset,
                len: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn exhausted(&self, needed: usize) -> Error {
        Error::BufferExhausted {
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }
}

impl ReadCursor for ByteCursor<'_> {
    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn peek(&self, len: usize) -> Result<&[u8]> {
        let end = self.pos.checked_add(len).ok_or_else(|| self.exhausted(len))?;
        self.data
            .get(self.pos..end)
            .ok_or_else(|| self.exhausted(len))
    }

    fn read_bytes(&mut self, len: usize) -> Result<&[u8]> {
        let end = self.pos.checked_add(len).ok_or_else(|| self.exhausted(len))?;
        if end > self.data.len() {
            return Err(self.exhausted(len));
        }
        let start = self.pos;
        self.pos = end;
        Ok(&self.data[start..end])
    }
}
