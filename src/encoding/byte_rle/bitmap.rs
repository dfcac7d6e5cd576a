use crate::encoding::ceil8;
use crate::error::Result;

const BIT_MASK: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

/// Sets bit at position `i` in `byte`
#[inline]
pub fn set(byte: u8, i: usize) -> u8 {
    byte | BIT_MASK[i]
}

/// The present (non-null) flags of a nullable column, LSB first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentVector {
    bytes: Vec<u8>,
    length: usize,
}

impl PresentVector {
    pub fn try_new(bytes: Vec<u8>, length: usize) -> Result<Self> {
        if bytes.len() < ceil8(length) {
            return Err(oos!(
                "A present vector of {} values needs {} bytes but has {}",
                length,
                ceil8(length),
                bytes.len()
            ));
        }
        Ok(Self { bytes, length })
    }

    /// A present vector where every value is present.
    pub fn all_present(length: usize) -> Self {
        Self {
            bytes: vec![0xff; ceil8(length)],
            length,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether the value at `i` is present.
    /// # Panics
    /// iff `i >= self.len()`
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.length);
        self.bytes[i / 8] & BIT_MASK[i % 8] != 0
    }

    /// The number of present values
    pub fn count_set(&self) -> usize {
        self.iter().filter(|x| *x).count()
    }

    pub fn iter(&self) -> BitmapIter {
        BitmapIter::new(&self.bytes, 0, self.length)
    }
}

impl FromIterator<bool> for PresentVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bytes = vec![];
        let mut length = 0;
        for value in iter {
            if length % 8 == 0 {
                bytes.push(0);
            }
            if value {
                // a byte was pushed above
                if let Some(last) = bytes.last_mut() {
                    *last = set(*last, length % 8);
                }
            }
            length += 1;
        }
        Self { bytes, length }
    }
}

/// An iterator of bits according to the LSB format
pub struct BitmapIter<'a> {
    iter: std::slice::Iter<'a, u8>,
    current_byte: &'a u8,
    len: usize,
    index: usize,
    mask: u8,
}

impl<'a> BitmapIter<'a> {
    #[inline]
    pub fn new(slice: &'a [u8], offset: usize, len: usize) -> Self {
        let bytes = &slice[offset / 8..];

        let mut iter = bytes.iter();

        let current_byte = iter.next().unwrap_or(&0);

        Self {
            iter,
            mask: 1u8.rotate_left(offset as u32),
            len,
            index: 0,
            current_byte,
        }
    }
}

impl<'a> Iterator for BitmapIter<'a> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.len {
            return None;
        } else {
            self.index += 1;
        }
        let value = self.current_byte & self.mask != 0;
        self.mask = self.mask.rotate_left(1);
        if self.mask == 1 {
            // reached a new byte => fetch it from the iterator, if any
            self.current_byte = self.iter.next().unwrap_or(&0);
        }
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len - self.index, Some(self.len - self.index))
    }
}
