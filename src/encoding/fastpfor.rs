//! FastPFOR physical encoding of `u32` values.
//!
//! Values are compressed with the composite `FastPFOR` codec: 256-value blocks followed by
//! a variable byte tail for the values that do not fill a block. The compressed `u32` words
//! are stored big-endian.
use fastpfor::{AnyLenCodec, FastPFor256, FastPForError};

use crate::error::{Error, Result};

impl From<FastPForError> for Error {
    fn from(error: FastPForError) -> Self {
        Error::oos(format!("Invalid FastPFOR data: {}", error))
    }
}

/// Encodes `values` into `buffer`.
pub fn encode(values: &[u32], buffer: &mut Vec<u8>) -> Result<()> {
    let mut words = vec![];
    FastPFor256::default().encode(values, &mut words)?;
    buffer.reserve(words.len() * 4);
    words
        .iter()
        .for_each(|word| buffer.extend_from_slice(&word.to_be_bytes()));
    Ok(())
}

/// Decodes `num_values` values from `payload`, which must hold whole words.
pub fn decode(payload: &[u8], num_values: usize) -> Result<Vec<u32>> {
    if num_values == 0 {
        return Ok(vec![]);
    }
    if payload.len() % 4 != 0 {
        return Err(oos!(
            "A FastPFOR payload must hold whole 32-bit words but has {} bytes",
            payload.len()
        ));
    }
    let expected = u32::try_from(num_values)
        .map_err(|_| oos!("A FastPFOR stream cannot hold {} values", num_values))?;
    let words = payload
        .chunks_exact(4)
        .map(|word| u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
        .collect::<Vec<_>>();

    // the codec caps the expected count by the payload size before allocating
    let mut values = vec![];
    FastPFor256::default().decode(&words, &mut values, Some(expected))?;
    Ok(values)
}
