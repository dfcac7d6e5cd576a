use super::Cursor;
use crate::curve::ZOrderCurve;
use crate::encoding::byte_rle::PresentVector;
use crate::encoding::{delta, fastpfor, rle, uleb128};
use crate::error::{Error, Result};
use crate::geometry::Vertex;
use crate::metadata::{LogicalEncoding, MortonMetadata, PhysicalLevelTechnique, StreamMetadata};
use crate::types::NativeInteger;

/// Reads the payload of `metadata` from `cursor` and undoes its physical level technique,
/// returning one word per physical value.
fn decode_physical<T: NativeInteger>(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
) -> Result<Vec<u64>> {
    let payload = cursor.take(metadata.byte_length as usize)?;
    let num_values = metadata.num_values as usize;
    let words = match metadata.physical_level_technique {
        PhysicalLevelTechnique::Varint => {
            let (words, consumed) = uleb128::decode_all(payload, num_values)?;
            if consumed != payload.len() {
                return Err(oos!(
                    "A varint stream of {} values declares {} bytes but uses {}",
                    num_values,
                    payload.len(),
                    consumed
                ));
            }
            words
        }
        PhysicalLevelTechnique::FastPfor => fastpfor::decode(payload, num_values)?
            .into_iter()
            .map(|word| word as u64)
            .collect(),
        PhysicalLevelTechnique::None => {
            return Err(Error::unsupported(
                "Integer streams must use a physical level technique",
            ))
        }
    };
    if T::BITS < 64 && words.iter().any(|word| word >> T::BITS != 0) {
        return Err(oos!("A stream value does not fit in {} bits", T::BITS));
    }
    Ok(words)
}

/// Undoes the logical level techniques of `metadata` over physically decoded `words`.
fn decode_words<T: NativeInteger>(
    words: Vec<u64>,
    metadata: &StreamMetadata,
    is_signed: bool,
) -> Result<Vec<T>> {
    let scalar = |word: u64| {
        if is_signed {
            T::from_zigzag(word)
        } else {
            T::from_raw(word)
        }
    };
    match &metadata.logical_encoding {
        LogicalEncoding::Plain => Ok(words.into_iter().map(scalar).collect()),
        // deltas are always zigzag encoded
        LogicalEncoding::Delta => {
            let mut values = words.into_iter().map(T::from_zigzag).collect::<Vec<_>>();
            delta::decode(&mut values);
            Ok(values)
        }
        LogicalEncoding::Rle(runs) => rle::decode(
            &words,
            runs.runs as usize,
            runs.num_rle_values as usize,
            scalar,
        ),
        LogicalEncoding::DeltaRle(runs) => {
            let mut values = rle::decode(
                &words,
                runs.runs as usize,
                runs.num_rle_values as usize,
                T::from_zigzag,
            )?;
            delta::decode(&mut values);
            Ok(values)
        }
        LogicalEncoding::ComponentwiseDelta => delta::decode_componentwise(&words),
        LogicalEncoding::MortonDelta(morton) => Ok(decode_morton(&words, morton)
            .flat_map(|vertex| [T::from_i32(vertex.x), T::from_i32(vertex.y)])
            .collect()),
    }
}

/// The Morton codes of a stream of sorted, delta encoded codes.
fn decode_morton_deltas(words: &[u64]) -> Vec<u32> {
    let mut code = 0u32;
    words
        .iter()
        .map(|delta| {
            code = code.wrapping_add(*delta as u32);
            code
        })
        .collect()
}

fn decode_morton<'a>(
    words: &'a [u64],
    morton: &'a MortonMetadata,
) -> impl Iterator<Item = Vertex> + 'a {
    decode_morton_deltas(words)
        .into_iter()
        .map(move |code| ZOrderCurve::decode(code, morton.num_bits, morton.coordinate_shift))
}

fn decode_stream<T: NativeInteger>(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
) -> Result<Vec<T>> {
    let words = decode_physical::<T>(cursor, metadata)?;
    decode_words(words, metadata, is_signed)
}

/// Decodes a stream of 32-bit integers whose metadata was just read from `cursor`.
///
/// Unsigned values are returned with their bits reinterpreted as `i32`. Morton encoded
/// streams are returned as interleaved `x, y` pairs.
pub fn decode_int_stream(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
) -> Result<Vec<i32>> {
    decode_stream(cursor, metadata, is_signed)
}

/// Decodes a stream of 64-bit integers whose metadata was just read from `cursor`.
pub fn decode_long_stream(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
) -> Result<Vec<i64>> {
    decode_stream(cursor, metadata, is_signed)
}

/// Decodes the Morton codes of a `MORTON, DELTA` stream without de-interleaving them.
pub fn decode_morton_codes(cursor: &mut Cursor, metadata: &StreamMetadata) -> Result<Vec<u32>> {
    if metadata.morton().is_none() {
        return Err(Error::unsupported(format!(
            "Expected a Morton encoded stream but found {:?}",
            metadata.logical_encoding
        )));
    }
    let words = decode_physical::<i32>(cursor, metadata)?;
    Ok(decode_morton_deltas(&words))
}

/// Decodes a stream of lengths into `n + 1` offsets: `offsets[0] == 0` and
/// `offsets[i + 1] - offsets[i]` is the `i`-th length.
pub fn decode_length_stream_to_offset_buffer(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
) -> Result<Vec<u32>> {
    match metadata.logical_encoding {
        LogicalEncoding::Plain
        | LogicalEncoding::Delta
        | LogicalEncoding::Rle(_)
        | LogicalEncoding::DeltaRle(_) => {}
        other => {
            return Err(Error::unsupported(format!(
                "A length stream cannot be encoded with {:?}",
                other
            )))
        }
    }
    let lengths = decode_stream::<i32>(cursor, metadata, false)?;

    let mut offsets = Vec::with_capacity(lengths.len() + 1);
    offsets.push(0u32);
    let mut offset = 0u32;
    for length in lengths {
        offset = offset
            .checked_add(length as u32)
            .ok_or_else(|| oos!("The lengths of a stream overflow a 32-bit offset"))?;
        offsets.push(offset);
    }
    Ok(offsets)
}

fn decode_const<T: NativeInteger>(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
) -> Result<T> {
    let words = decode_physical::<T>(cursor, metadata)?;
    let scalar = |word: u64| {
        if is_signed {
            T::from_zigzag(word)
        } else {
            T::from_raw(word)
        }
    };
    match (&metadata.logical_encoding, words.as_slice()) {
        (LogicalEncoding::Rle(rle), [_, value]) if rle.runs == 1 => Ok(scalar(*value)),
        (LogicalEncoding::Plain, [value]) => Ok(scalar(*value)),
        (LogicalEncoding::Delta, [value]) => Ok(T::from_zigzag(*value)),
        _ => Err(oos!(
            "A stream of {} values encoded with {:?} is not constant",
            metadata.num_values,
            metadata.logical_encoding
        )),
    }
}

/// Decodes the single value of a stream whose [`VectorType`](crate::metadata::VectorType)
/// is `Const`.
pub fn decode_const_int_stream(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
) -> Result<i32> {
    decode_const(cursor, metadata, is_signed)
}

pub fn decode_const_long_stream(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
) -> Result<i64> {
    decode_const(cursor, metadata, is_signed)
}

fn decode_nullable<T: NativeInteger>(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
    present: &PresentVector,
) -> Result<Vec<T>> {
    match metadata.logical_encoding {
        LogicalEncoding::ComponentwiseDelta | LogicalEncoding::MortonDelta(_) => {
            return Err(Error::unsupported(format!(
                "A nullable stream cannot be encoded with {:?}",
                metadata.logical_encoding
            )))
        }
        _ => {}
    }
    // runs and deltas only span the present values
    let values = decode_stream::<T>(cursor, metadata, is_signed)?;
    let num_present = present.count_set();
    if values.len() != num_present {
        return Err(oos!(
            "A nullable stream holds {} values but {} are present",
            values.len(),
            num_present
        ));
    }

    let mut values = values.into_iter();
    Ok(present
        .iter()
        .map(|is_present| {
            if is_present {
                values.next().unwrap_or_default()
            } else {
                T::default()
            }
        })
        .collect())
}

/// Decodes a stream of 32-bit integers with one value per present position of `present`.
/// Absent positions hold 0.
pub fn decode_nullable_int_stream(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
    present: &PresentVector,
) -> Result<Vec<i32>> {
    decode_nullable(cursor, metadata, is_signed, present)
}

/// Decodes a stream of 64-bit integers with one value per present position of `present`.
/// Absent positions hold 0.
pub fn decode_nullable_long_stream(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
    is_signed: bool,
    present: &PresentVector,
) -> Result<Vec<i64>> {
    decode_nullable(cursor, metadata, is_signed, present)
}
