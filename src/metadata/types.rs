// Bridges the tags of the stream metadata wire format to rust enums.
use std::convert::TryFrom;

#[cfg(feature = "serde_types")]
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

fn out_of_range(name: &str, value: u8) -> Error {
    Error::unsupported(format!("{} {} is out of range", name, value))
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum PhysicalStreamType {
    Present,
    Data,
    Offset,
    Length,
}

impl TryFrom<u8> for PhysicalStreamType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => PhysicalStreamType::Present,
            1 => PhysicalStreamType::Data,
            2 => PhysicalStreamType::Offset,
            3 => PhysicalStreamType::Length,
            _ => return Err(out_of_range("Physical stream type", value)),
        })
    }
}

impl From<PhysicalStreamType> for u8 {
    fn from(value: PhysicalStreamType) -> Self {
        match value {
            PhysicalStreamType::Present => 0,
            PhysicalStreamType::Data => 1,
            PhysicalStreamType::Offset => 2,
            PhysicalStreamType::Length => 3,
        }
    }
}

/// The kind of values of a `Data` stream.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum DictionaryType {
    None,
    Single,
    Shared,
    Vertex,
    Morton,
    Fsst,
}

impl TryFrom<u8> for DictionaryType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => DictionaryType::None,
            1 => DictionaryType::Single,
            2 => DictionaryType::Shared,
            3 => DictionaryType::Vertex,
            4 => DictionaryType::Morton,
            5 => DictionaryType::Fsst,
            _ => return Err(out_of_range("Dictionary type", value)),
        })
    }
}

impl From<DictionaryType> for u8 {
    fn from(value: DictionaryType) -> Self {
        match value {
            DictionaryType::None => 0,
            DictionaryType::Single => 1,
            DictionaryType::Shared => 2,
            DictionaryType::Vertex => 3,
            DictionaryType::Morton => 4,
            DictionaryType::Fsst => 5,
        }
    }
}

/// What the values of an `Offset` stream index into.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum OffsetType {
    Vertex,
    Index,
    String,
    Key,
}

impl TryFrom<u8> for OffsetType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => OffsetType::Vertex,
            1 => OffsetType::Index,
            2 => OffsetType::String,
            3 => OffsetType::Key,
            _ => return Err(out_of_range("Offset type", value)),
        })
    }
}

impl From<OffsetType> for u8 {
    fn from(value: OffsetType) -> Self {
        match value {
            OffsetType::Vertex => 0,
            OffsetType::Index => 1,
            OffsetType::String => 2,
            OffsetType::Key => 3,
        }
    }
}

/// What the values of a `Length` stream count.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum LengthType {
    VarBinary,
    Geometries,
    Parts,
    Rings,
    Triangles,
    Symbol,
    Dictionary,
}

impl TryFrom<u8> for LengthType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => LengthType::VarBinary,
            1 => LengthType::Geometries,
            2 => LengthType::Parts,
            3 => LengthType::Rings,
            4 => LengthType::Triangles,
            5 => LengthType::Symbol,
            6 => LengthType::Dictionary,
            _ => return Err(out_of_range("Length type", value)),
        })
    }
}

impl From<LengthType> for u8 {
    fn from(value: LengthType) -> Self {
        match value {
            LengthType::VarBinary => 0,
            LengthType::Geometries => 1,
            LengthType::Parts => 2,
            LengthType::Rings => 3,
            LengthType::Triangles => 4,
            LengthType::Symbol => 5,
            LengthType::Dictionary => 6,
        }
    }
}

/// Disambiguates the physical stream type; its variant always matches the physical type.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum LogicalStreamType {
    Dictionary(DictionaryType),
    Offset(OffsetType),
    Length(LengthType),
}

impl LogicalStreamType {
    /// Reads the logical subtype `value` of a stream of `physical` type.
    pub fn try_new(physical: PhysicalStreamType, value: u8) -> Result<Option<Self>, Error> {
        Ok(match physical {
            PhysicalStreamType::Present => None,
            PhysicalStreamType::Data => Some(Self::Dictionary(value.try_into()?)),
            PhysicalStreamType::Offset => Some(Self::Offset(value.try_into()?)),
            PhysicalStreamType::Length => Some(Self::Length(value.try_into()?)),
        })
    }

    pub fn physical_stream_type(&self) -> PhysicalStreamType {
        match self {
            Self::Dictionary(_) => PhysicalStreamType::Data,
            Self::Offset(_) => PhysicalStreamType::Offset,
            Self::Length(_) => PhysicalStreamType::Length,
        }
    }
}

impl From<LogicalStreamType> for u8 {
    fn from(value: LogicalStreamType) -> Self {
        match value {
            LogicalStreamType::Dictionary(value) => value.into(),
            LogicalStreamType::Offset(value) => value.into(),
            LogicalStreamType::Length(value) => value.into(),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum LogicalLevelTechnique {
    None,
    Delta,
    ComponentwiseDelta,
    Rle,
    Morton,
}

impl TryFrom<u8> for LogicalLevelTechnique {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => LogicalLevelTechnique::None,
            1 => LogicalLevelTechnique::Delta,
            2 => LogicalLevelTechnique::ComponentwiseDelta,
            3 => LogicalLevelTechnique::Rle,
            4 => LogicalLevelTechnique::Morton,
            _ => return Err(out_of_range("Logical level technique", value)),
        })
    }
}

impl From<LogicalLevelTechnique> for u8 {
    fn from(value: LogicalLevelTechnique) -> Self {
        match value {
            LogicalLevelTechnique::None => 0,
            LogicalLevelTechnique::Delta => 1,
            LogicalLevelTechnique::ComponentwiseDelta => 2,
            LogicalLevelTechnique::Rle => 3,
            LogicalLevelTechnique::Morton => 4,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum PhysicalLevelTechnique {
    None,
    FastPfor,
    Varint,
}

impl TryFrom<u8> for PhysicalLevelTechnique {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => PhysicalLevelTechnique::None,
            1 => PhysicalLevelTechnique::FastPfor,
            2 => PhysicalLevelTechnique::Varint,
            _ => return Err(out_of_range("Physical level technique", value)),
        })
    }
}

impl From<PhysicalLevelTechnique> for u8 {
    fn from(value: PhysicalLevelTechnique) -> Self {
        match value {
            PhysicalLevelTechnique::None => 0,
            PhysicalLevelTechnique::FastPfor => 1,
            PhysicalLevelTechnique::Varint => 2,
        }
    }
}
