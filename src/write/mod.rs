mod geometry;
mod integer;
mod observer;
mod sort;

pub use geometry::{encode_geometry_column, EncodedGeometryColumn};
pub use integer::{
    encode_int_stream, encode_long_stream, encode_morton_stream, encode_present_stream,
    EncodedStream,
};
pub use observer::{NoopObserver, StreamObserver};
pub use sort::sort_order;

#[cfg(feature = "serde_types")]
use serde_derive::{Deserialize, Serialize};

use crate::metadata::PhysicalLevelTechnique;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub struct EncodeOptions {
    /// How integer streams are packed into bytes; 64-bit streams always use varints
    pub physical_technique: PhysicalLevelTechnique,
    pub integer_encoding: IntegerEncodingOption,
    /// Whether a Morton encoded vertex dictionary is considered for geometry columns
    pub use_morton: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            physical_technique: PhysicalLevelTechnique::Varint,
            integer_encoding: IntegerEncodingOption::Auto,
            use_morton: true,
        }
    }
}

/// The logical encoding of integer streams.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum IntegerEncodingOption {
    /// The smallest of the candidate encodings
    Auto,
    Plain,
    Delta,
    Rle,
    DeltaRle,
}

impl Default for IntegerEncodingOption {
    fn default() -> Self {
        Self::Auto
    }
}

/// Whether the features of a column may be reordered while encoding it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub struct SortSettings {
    pub is_sortable: bool,
    /// The id of every feature, permuted alongside the geometries; may be empty
    pub feature_ids: Vec<u64>,
}
