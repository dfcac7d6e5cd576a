use crate::encoding::uleb128;
use crate::error::{Error, Result};

/// A bounds-checked reader over a borrowed byte buffer.
///
/// Every stream of a tile is read through one `Cursor`: reading a stream's metadata and
/// payload advances it, so streams must be read in the order they were written.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// A cursor over `data` starting at `position`.
    pub fn with_position(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.take(1)?[0];
        Ok(byte)
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let rest = self.data.get(self.position..).unwrap_or_default();
        let (value, consumed) = uleb128::decode(rest).map_err(|error| match error {
            Error::OutOfBounds { needed, .. } => Error::OutOfBounds {
                offset: self.position,
                needed: rest.len() + needed,
                len: rest.len(),
            },
            other => other,
        })?;
        self.position += consumed;
        Ok(value)
    }

    /// Reads a varint that must fit in a `u32`.
    pub fn read_varint_u32(&mut self) -> Result<u32> {
        let value = self.read_varint()?;
        u32::try_from(value).map_err(|_| oos!("The varint {} does not fit in 32 bits", value))
    }

    /// Reads a varint used as a length or a count.
    pub fn read_varint_usize(&mut self) -> Result<usize> {
        self.read_varint_u32().map(|value| value as usize)
    }

    /// Consumes the next `length` bytes.
    pub fn take(&mut self, length: usize) -> Result<&'a [u8]> {
        if length > self.remaining() {
            return Err(Error::OutOfBounds {
                offset: self.position,
                needed: length,
                len: self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + length];
        self.position += length;
        Ok(slice)
    }
}
