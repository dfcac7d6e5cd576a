#[cfg(feature = "serde_types")]
use serde_derive::{Deserialize, Serialize};

use super::types::*;
use crate::encoding::uleb128;
use crate::error::{Error, Result};
use crate::read::Cursor;

/// The run counts of a run-length encoded stream.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub struct RleMetadata {
    /// The number of runs
    pub runs: u32,
    /// The number of values once the runs are expanded
    pub num_rle_values: u32,
}

/// The parameters needed to de-interleave Morton codes into `(x, y)`.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub struct MortonMetadata {
    pub num_bits: u32,
    pub coordinate_shift: u32,
}

/// The closed set of logical encodings a stream can carry.
///
/// On the wire this is the pair `(technique1, technique2)`; any pair that is not a variant
/// of this enum is rejected when the metadata is read.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum LogicalEncoding {
    /// `NONE, NONE`
    Plain,
    /// `DELTA, NONE`
    Delta,
    /// `COMPONENTWISE_DELTA, NONE`
    ComponentwiseDelta,
    /// `RLE, NONE`
    Rle(RleMetadata),
    /// `DELTA, RLE`
    DeltaRle(RleMetadata),
    /// `MORTON, DELTA`
    MortonDelta(MortonMetadata),
}

impl LogicalEncoding {
    pub fn techniques(&self) -> (LogicalLevelTechnique, LogicalLevelTechnique) {
        use LogicalLevelTechnique::*;
        match self {
            Self::Plain => (None, None),
            Self::Delta => (Delta, None),
            Self::ComponentwiseDelta => (ComponentwiseDelta, None),
            Self::Rle(_) => (Rle, None),
            Self::DeltaRle(_) => (Delta, Rle),
            Self::MortonDelta(_) => (Morton, Delta),
        }
    }
}

/// How a stream's values are laid out as seen by a random-access reader.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum VectorType {
    /// Every value is different from the next
    Flat,
    /// Every value is the same
    Const,
    /// Values grow by a constant step
    Sequence,
}

/// The metadata of a stream: everything needed to decode its payload.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub struct StreamMetadata {
    pub physical_stream_type: PhysicalStreamType,
    pub logical_stream_type: Option<LogicalStreamType>,
    pub logical_encoding: LogicalEncoding,
    pub physical_level_technique: PhysicalLevelTechnique,
    /// The number of values physically stored in the payload
    pub num_values: u32,
    /// The number of bytes of the payload
    pub byte_length: u32,
}

impl StreamMetadata {
    pub fn logical_level_technique1(&self) -> LogicalLevelTechnique {
        self.logical_encoding.techniques().0
    }

    pub fn logical_level_technique2(&self) -> LogicalLevelTechnique {
        self.logical_encoding.techniques().1
    }

    /// The run counts, for run-length encoded streams
    pub fn rle(&self) -> Option<&RleMetadata> {
        match &self.logical_encoding {
            LogicalEncoding::Rle(rle) | LogicalEncoding::DeltaRle(rle) => Some(rle),
            _ => None,
        }
    }

    /// The Morton parameters, for Morton encoded streams
    pub fn morton(&self) -> Option<&MortonMetadata> {
        match &self.logical_encoding {
            LogicalEncoding::MortonDelta(morton) => Some(morton),
            _ => None,
        }
    }

    /// The number of logical values of this stream (the expanded count for RLE streams).
    pub fn num_logical_values(&self) -> u32 {
        self.rle()
            .map(|rle| rle.num_rle_values)
            .unwrap_or(self.num_values)
    }

    pub fn vector_type(&self) -> VectorType {
        match &self.logical_encoding {
            LogicalEncoding::Rle(rle) if rle.runs == 1 => VectorType::Const,
            LogicalEncoding::DeltaRle(rle) if rle.runs == 1 => VectorType::Sequence,
            _ if self.num_values == 1 => VectorType::Const,
            _ => VectorType::Flat,
        }
    }

    /// Reads a [`StreamMetadata`] from `cursor`, leaving it at the start of the payload.
    pub fn read(cursor: &mut Cursor) -> Result<Self> {
        let stream_type = cursor.read_u8()?;
        let physical_stream_type = PhysicalStreamType::try_from(stream_type >> 4)?;
        let logical_stream_type =
            LogicalStreamType::try_new(physical_stream_type, stream_type & 0x0f)?;

        let encodings = cursor.read_u8()?;
        let technique1 = LogicalLevelTechnique::try_from(encodings >> 5)?;
        let technique2 = LogicalLevelTechnique::try_from((encodings >> 2) & 0x07)?;
        let physical_level_technique = PhysicalLevelTechnique::try_from(encodings & 0x03)?;

        let num_values = cursor.read_varint_u32()?;
        let byte_length = cursor.read_varint_u32()?;

        use LogicalLevelTechnique as T;
        let logical_encoding = match (technique1, technique2) {
            (T::None, T::None) => LogicalEncoding::Plain,
            (T::Delta, T::None) => LogicalEncoding::Delta,
            (T::ComponentwiseDelta, T::None) => LogicalEncoding::ComponentwiseDelta,
            (T::Rle, T::None) => LogicalEncoding::Rle(read_rle(cursor)?),
            (T::Delta, T::Rle) => LogicalEncoding::DeltaRle(read_rle(cursor)?),
            (T::Morton, T::Delta) => LogicalEncoding::MortonDelta(MortonMetadata {
                num_bits: cursor.read_varint_u32()?,
                coordinate_shift: cursor.read_varint_u32()?,
            }),
            (technique1, technique2) => {
                return Err(Error::unsupported(format!(
                    "The logical level techniques {:?} and {:?} cannot be combined",
                    technique1, technique2
                )))
            }
        };

        let metadata = Self {
            physical_stream_type,
            logical_stream_type,
            logical_encoding,
            physical_level_technique,
            num_values,
            byte_length,
        };
        log::trace!("read stream metadata {:?}", metadata);
        Ok(metadata)
    }

    /// Appends the wire representation of this metadata to `buffer`.
    pub fn write(&self, buffer: &mut Vec<u8>) {
        let physical: u8 = self.physical_stream_type.into();
        let logical: u8 = self.logical_stream_type.map(u8::from).unwrap_or(0);
        buffer.push(physical << 4 | logical);

        let (technique1, technique2) = self.logical_encoding.techniques();
        let physical_level_technique: u8 = self.physical_level_technique.into();
        buffer.push(
            u8::from(technique1) << 5 | u8::from(technique2) << 2 | physical_level_technique,
        );

        uleb128::write(self.num_values as u64, buffer);
        uleb128::write(self.byte_length as u64, buffer);

        match &self.logical_encoding {
            LogicalEncoding::Rle(rle) | LogicalEncoding::DeltaRle(rle) => {
                uleb128::write(rle.runs as u64, buffer);
                uleb128::write(rle.num_rle_values as u64, buffer);
            }
            LogicalEncoding::MortonDelta(morton) => {
                uleb128::write(morton.num_bits as u64, buffer);
                uleb128::write(morton.coordinate_shift as u64, buffer);
            }
            _ => {}
        }
    }

    /// The wire representation of this metadata
    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = vec![];
        self.write(&mut buffer);
        buffer
    }
}

fn read_rle(cursor: &mut Cursor) -> Result<RleMetadata> {
    Ok(RleMetadata {
        runs: cursor.read_varint_u32()?,
        num_rle_values: cursor.read_varint_u32()?,
    })
}
