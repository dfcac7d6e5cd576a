// ORC's byte run-length encoding, see
// https://orc.apache.org/specification/ORCv1/#byte-run-length-encoding
mod bitmap;
mod decoder;
mod encoder;
pub use bitmap::{set, BitmapIter, PresentVector};
pub use decoder::{decode, Decoder, RunIterator};
pub use encoder::encode;

use crate::error::Result;
use crate::read::Cursor;

/// The shortest run written as a run; shorter repetitions are written as literals.
pub const MIN_RUN: usize = 3;
/// The longest run a single control byte can describe.
pub const MAX_RUN: usize = 127 + MIN_RUN;
/// The maximum number of literals a single control byte can describe.
pub const MAX_LITERALS: usize = 128;

#[derive(Debug, PartialEq, Eq)]
pub enum ByteRleEncoded<'a> {
    /// A byte repeated a number of times.
    Run(u8, usize),
    /// Bytes stored verbatim.
    Literals(&'a [u8]),
}

/// Packs `values` (LSB first) and byte-RLE encodes the packed bytes into `buffer`.
pub fn encode_bool<I: IntoIterator<Item = bool>>(values: I, buffer: &mut Vec<u8>) {
    let mut packed = vec![];
    let mut byte = 0u8;
    let mut index = 0;
    for value in values {
        if value {
            byte = set(byte, index);
        }
        index += 1;
        if index == 8 {
            packed.push(byte);
            byte = 0;
            index = 0;
        }
    }
    if index != 0 {
        packed.push(byte);
    }
    encode(&packed, buffer)
}

/// Decodes `length` booleans from `cursor`.
pub fn decode_bool(cursor: &mut Cursor, length: usize) -> Result<PresentVector> {
    let bytes = decode(cursor, super::ceil8(length))?;
    PresentVector::try_new(bytes, length)
}
