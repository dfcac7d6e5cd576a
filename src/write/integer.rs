use super::{EncodeOptions, IntegerEncodingOption};
use crate::encoding::{byte_rle, delta, fastpfor, rle, uleb128};
use crate::error::{Error, Result};
use crate::metadata::{
    DictionaryType, LogicalEncoding, LogicalStreamType, MortonMetadata, PhysicalLevelTechnique,
    PhysicalStreamType, RleMetadata, StreamMetadata,
};
use crate::types::NativeInteger;

/// A stream ready to be written: its metadata and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream {
    pub metadata: StreamMetadata,
    pub payload: Vec<u8>,
}

impl EncodedStream {
    pub(crate) fn new(
        physical_stream_type: PhysicalStreamType,
        logical_stream_type: Option<LogicalStreamType>,
        logical_encoding: LogicalEncoding,
        physical_level_technique: PhysicalLevelTechnique,
        num_values: usize,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            metadata: StreamMetadata {
                physical_stream_type,
                logical_stream_type,
                logical_encoding,
                physical_level_technique,
                num_values: num_values as u32,
                byte_length: payload.len() as u32,
            },
            payload,
        }
    }

    /// Appends the metadata and the payload to `buffer`.
    pub fn write(&self, buffer: &mut Vec<u8>) {
        self.metadata.write(buffer);
        buffer.extend_from_slice(&self.payload);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![];
        self.write(&mut buffer);
        buffer
    }

    /// The number of bytes this stream occupies once written
    pub fn encoded_len(&self) -> usize {
        self.metadata.encode().len() + self.payload.len()
    }
}

pub(crate) fn encode_physical(
    words: &[u64],
    technique: PhysicalLevelTechnique,
) -> Result<Vec<u8>> {
    let mut buffer = vec![];
    match technique {
        PhysicalLevelTechnique::Varint => uleb128::encode_all(words.iter().copied(), &mut buffer),
        PhysicalLevelTechnique::FastPfor => {
            let words = words
                .iter()
                .map(|word| {
                    u32::try_from(*word).map_err(|_| {
                        oos!("FastPFOR can only encode 32-bit values but got {}", word)
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            fastpfor::encode(&words, &mut buffer)?
        }
        PhysicalLevelTechnique::None => {
            return Err(Error::unsupported(
                "Integer streams must use a physical level technique",
            ))
        }
    }
    Ok(buffer)
}

/// One way of encoding a sequence of integers.
struct Candidate {
    logical_encoding: LogicalEncoding,
    num_values: usize,
    payload: Vec<u8>,
}

/// The logical level candidates, in the order they are preferred on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Technique {
    Plain,
    Delta,
    Rle,
    DeltaRle,
}

struct Encoder<'a, T: NativeInteger> {
    values: &'a [T],
    deltas: Vec<T>,
    is_signed: bool,
    physical: PhysicalLevelTechnique,
}

impl<'a, T: NativeInteger> Encoder<'a, T> {
    fn scalar(&self, value: T) -> u64 {
        if self.is_signed {
            value.zigzag()
        } else {
            value.to_raw()
        }
    }

    fn encode(&self, technique: Technique) -> Result<Candidate> {
        let (logical_encoding, words) = match technique {
            Technique::Plain => (
                LogicalEncoding::Plain,
                self.values.iter().map(|v| self.scalar(*v)).collect::<Vec<_>>(),
            ),
            Technique::Delta => (
                LogicalEncoding::Delta,
                self.deltas.iter().map(|v| v.zigzag()).collect(),
            ),
            Technique::Rle => {
                let (lengths, values) = rle::encode(self.values);
                let metadata = RleMetadata {
                    runs: values.len() as u32,
                    num_rle_values: self.values.len() as u32,
                };
                let mut words = lengths;
                words.extend(values.iter().map(|v| self.scalar(*v)));
                (LogicalEncoding::Rle(metadata), words)
            }
            Technique::DeltaRle => {
                let (lengths, values) = rle::encode(&self.deltas);
                let metadata = RleMetadata {
                    runs: values.len() as u32,
                    num_rle_values: self.values.len() as u32,
                };
                let mut words = lengths;
                words.extend(values.iter().map(|v| v.zigzag()));
                (LogicalEncoding::DeltaRle(metadata), words)
            }
        };
        Ok(Candidate {
            logical_encoding,
            num_values: words.len(),
            payload: encode_physical(&words, self.physical)?,
        })
    }

    /// The candidates worth trying for these values
    fn techniques(&self) -> Vec<Technique> {
        let length = self.values.len();
        let runs = rle::count_runs(self.values);
        if length == 0 {
            return vec![Technique::Plain];
        }
        // constant streams are always run-length encoded so that readers can detect them
        if runs == 1 && length >= 2 {
            return vec![Technique::Rle];
        }
        let delta_runs = rle::count_runs(&self.deltas);
        let mut techniques = vec![Technique::Plain, Technique::Delta];
        if length / runs >= 2 {
            techniques.push(Technique::Rle);
        }
        if length / delta_runs >= 2 {
            techniques.push(Technique::DeltaRle);
        }
        techniques
    }
}

fn encode_values<T: NativeInteger>(
    values: &[T],
    is_signed: bool,
    physical: PhysicalLevelTechnique,
    option: IntegerEncodingOption,
) -> Result<Candidate> {
    let encoder = Encoder {
        values,
        deltas: delta::encode(values),
        is_signed,
        physical,
    };
    let techniques = match option {
        IntegerEncodingOption::Auto => encoder.techniques(),
        IntegerEncodingOption::Plain => vec![Technique::Plain],
        IntegerEncodingOption::Delta => vec![Technique::Delta],
        IntegerEncodingOption::Rle => vec![Technique::Rle],
        IntegerEncodingOption::DeltaRle => vec![Technique::DeltaRle],
    };

    let mut best: Option<Candidate> = None;
    for technique in techniques {
        let candidate = encoder.encode(technique)?;
        log::trace!(
            "{:?} encodes {} values in {} bytes",
            technique,
            values.len(),
            candidate.payload.len()
        );
        // ties keep the earlier candidate
        if best
            .as_ref()
            .map_or(true, |best| candidate.payload.len() < best.payload.len())
        {
            best = Some(candidate);
        }
    }
    let best = best.ok_or_else(|| oos!("No integer encoding was tried"))?;
    log::debug!(
        "encoded {} values as {:?} in {} bytes",
        values.len(),
        best.logical_encoding,
        best.payload.len()
    );
    Ok(best)
}

fn encode_stream<T: NativeInteger>(
    values: &[T],
    is_signed: bool,
    physical_stream_type: PhysicalStreamType,
    logical_stream_type: Option<LogicalStreamType>,
    physical: PhysicalLevelTechnique,
    option: IntegerEncodingOption,
) -> Result<EncodedStream> {
    let candidate = encode_values(values, is_signed, physical, option)?;
    Ok(EncodedStream::new(
        physical_stream_type,
        logical_stream_type,
        candidate.logical_encoding,
        physical,
        candidate.num_values,
        candidate.payload,
    ))
}

/// Encodes `values` into a stream with the smallest of the candidate logical encodings
/// (or the one forced by `options.integer_encoding`).
///
/// Unsigned values are passed with their bits reinterpreted as `i32`.
pub fn encode_int_stream(
    values: &[i32],
    is_signed: bool,
    physical_stream_type: PhysicalStreamType,
    logical_stream_type: Option<LogicalStreamType>,
    options: &EncodeOptions,
) -> Result<EncodedStream> {
    encode_stream(
        values,
        is_signed,
        physical_stream_type,
        logical_stream_type,
        options.physical_technique,
        options.integer_encoding,
    )
}

/// Encodes 64-bit `values`, always as varints.
pub fn encode_long_stream(
    values: &[i64],
    is_signed: bool,
    physical_stream_type: PhysicalStreamType,
    logical_stream_type: Option<LogicalStreamType>,
    options: &EncodeOptions,
) -> Result<EncodedStream> {
    if options.physical_technique == PhysicalLevelTechnique::FastPfor {
        log::warn!("FastPFOR only encodes 32-bit values; 64-bit streams use varints");
    }
    encode_stream(
        values,
        is_signed,
        physical_stream_type,
        logical_stream_type,
        PhysicalLevelTechnique::Varint,
        options.integer_encoding,
    )
}

/// Encodes sorted Morton `codes` as deltas; sorted deltas need no zigzag.
pub fn encode_morton_stream(
    codes: &[u32],
    num_bits: u32,
    coordinate_shift: u32,
    physical: PhysicalLevelTechnique,
) -> Result<EncodedStream> {
    let mut previous = 0u32;
    let deltas = codes
        .iter()
        .map(|code| {
            let delta = code.wrapping_sub(previous);
            previous = *code;
            delta as u64
        })
        .collect::<Vec<_>>();
    Ok(EncodedStream::new(
        PhysicalStreamType::Data,
        Some(LogicalStreamType::Dictionary(DictionaryType::Morton)),
        LogicalEncoding::MortonDelta(MortonMetadata {
            num_bits,
            coordinate_shift,
        }),
        physical,
        deltas.len(),
        encode_physical(&deltas, physical)?,
    ))
}

/// Encodes the present flags of a nullable column.
pub fn encode_present_stream<I: IntoIterator<Item = bool>>(values: I) -> EncodedStream {
    let values = values.into_iter().collect::<Vec<_>>();
    let mut payload = vec![];
    byte_rle::encode_bool(values.iter().copied(), &mut payload);
    EncodedStream::new(
        PhysicalStreamType::Present,
        None,
        LogicalEncoding::Plain,
        PhysicalLevelTechnique::None,
        values.len(),
        payload,
    )
}
