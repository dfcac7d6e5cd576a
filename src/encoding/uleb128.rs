use crate::error::{Error, Result};

/// Decodes a single varint from the start of `values`, returning it and the number of bytes
/// consumed.
pub fn decode(values: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0;
    let mut shift = 0;

    let mut consumed = 0;
    for byte in values {
        consumed += 1;
        if shift == 63 && *byte > 1 {
            return Err(oos!("varint does not fit in 64 bits"));
        };

        result |= u64::from(byte & 0x7f) << shift;

        if byte & 0x80 == 0 {
            return Ok((result, consumed));
        }

        shift += 7;
    }
    Err(Error::OutOfBounds {
        offset: consumed,
        needed: 1,
        len: values.len(),
    })
}

/// Encodes `value` into `container`, returning the number of bytes used.
pub fn encode(mut value: u64, container: &mut [u8; 10]) -> usize {
    let mut consumed = 0;
    let mut iter = container.iter_mut();
    loop {
        let mut byte = (value as u8) & !128;
        value >>= 7;
        if value != 0 {
            byte |= 128;
        }
        // the container holds the 10 bytes of the longest u64
        if let Some(slot) = iter.next() {
            *slot = byte;
        }
        consumed += 1;
        if value == 0 {
            return consumed;
        }
    }
}

/// The number of bytes `value` occupies once encoded.
#[inline]
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Appends `value` to `buffer`.
#[inline]
pub fn write(value: u64, buffer: &mut Vec<u8>) {
    let mut container = [0u8; 10];
    let used = encode(value, &mut container);
    buffer.extend_from_slice(&container[..used]);
}

/// Appends every value of `values` to `buffer`.
pub fn encode_all<I: IntoIterator<Item = u64>>(values: I, buffer: &mut Vec<u8>) {
    values.into_iter().for_each(|value| write(value, buffer))
}

/// Decodes `length` varints from `values`, returning them and the number of bytes consumed.
pub fn decode_all(values: &[u8], length: usize) -> Result<(Vec<u64>, usize)> {
    // every varint takes at least one byte
    if length > values.len() {
        return Err(Error::OutOfBounds {
            offset: 0,
            needed: length,
            len: values.len(),
        });
    }
    let mut result = Vec::with_capacity(length);
    let mut consumed = 0;
    for _ in 0..length {
        let (value, used) = decode(&values[consumed..])?;
        result.push(value);
        consumed += used;
    }
    Ok((result, consumed))
}
