mod stream;
mod types;

pub use stream::{LogicalEncoding, MortonMetadata, RleMetadata, StreamMetadata, VectorType};
pub use types::{
    DictionaryType, LengthType, LogicalLevelTechnique, LogicalStreamType, OffsetType,
    PhysicalLevelTechnique, PhysicalStreamType,
};
