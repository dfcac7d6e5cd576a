use super::{ByteRleEncoded, MIN_RUN};
use crate::error::Result;
use crate::read::Cursor;

/// An iterator over the runs and literals of a byte-RLE encoded slice.
pub struct RunIterator<'a, 'b> {
    cursor: &'b mut Cursor<'a>,
    remaining: usize,
}

impl<'a, 'b> RunIterator<'a, 'b> {
    pub fn new(cursor: &'b mut Cursor<'a>, length: usize) -> Self {
        Self {
            cursor,
            remaining: length,
        }
    }

    fn read(&mut self) -> Result<ByteRleEncoded<'a>> {
        let header = self.cursor.read_u8()?;
        if header <= 0x7f {
            let length = header as usize + MIN_RUN;
            let value = self.cursor.read_u8()?;
            Ok(ByteRleEncoded::Run(value, length))
        } else {
            let length = 256 - header as usize;
            Ok(ByteRleEncoded::Literals(self.cursor.take(length)?))
        }
    }
}

impl<'a, 'b> Iterator for RunIterator<'a, 'b> {
    type Item = Result<ByteRleEncoded<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.read();
        if let Ok(encoded) = &result {
            let length = match encoded {
                ByteRleEncoded::Run(_, length) => *length,
                ByteRleEncoded::Literals(values) => values.len(),
            };
            if length > self.remaining {
                self.remaining = 0;
                return Some(Err(oos!("A byte-RLE run exceeds the declared number of bytes")));
            }
            self.remaining -= length;
        } else {
            self.remaining = 0;
        }
        Some(result)
    }
}

/// A fallible iterator over the bytes of a byte-RLE encoded slice.
pub struct Decoder<'a, 'b> {
    runs: RunIterator<'a, 'b>,
    current: ByteRleEncoded<'a>,
}

impl<'a, 'b> Decoder<'a, 'b> {
    pub fn new(cursor: &'b mut Cursor<'a>, length: usize) -> Self {
        Self {
            runs: RunIterator::new(cursor, length),
            current: ByteRleEncoded::Literals(&[]),
        }
    }
}

impl<'a, 'b> Iterator for Decoder<'a, 'b> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let value = match &mut self.current {
                ByteRleEncoded::Run(value, length) if *length > 0 => {
                    *length -= 1;
                    Some(*value)
                }
                ByteRleEncoded::Literals(values) if !values.is_empty() => {
                    let literals = *values;
                    *values = &literals[1..];
                    Some(literals[0])
                }
                _ => None,
            };
            if let Some(value) = value {
                return Some(Ok(value));
            }
            match self.runs.next()? {
                Ok(next) => self.current = next,
                Err(error) => return Some(Err(error)),
            }
        }
    }
}

/// Decodes `length` bytes from `cursor`.
pub fn decode(cursor: &mut Cursor, length: usize) -> Result<Vec<u8>> {
    // a run of two bytes expands to at most 130
    let mut values = Vec::with_capacity(length.min(cursor.remaining().saturating_mul(65)));
    for encoded in RunIterator::new(cursor, length) {
        match encoded? {
            ByteRleEncoded::Run(value, length) => {
                values.extend(std::iter::repeat(value).take(length))
            }
            ByteRleEncoded::Literals(literals) => values.extend_from_slice(literals),
        }
    }
    Ok(values)
}
