mod cursor;
mod geometry;
mod integer;
mod present;
mod scan;
pub mod vectorized;

pub use cursor::Cursor;
pub use geometry::{decode_geometry, decode_geometry_column, GeometryColumn};
pub use integer::{
    decode_const_int_stream, decode_const_long_stream, decode_int_stream,
    decode_length_stream_to_offset_buffer, decode_long_stream, decode_morton_codes,
    decode_nullable_int_stream, decode_nullable_long_stream,
};
pub use present::decode_present_stream;
#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub use scan::decode_int_streams_par;
pub use scan::{scan_streams, RawStream};
pub use vectorized::{
    decode_to_random_access_format, GeometryTypes, GeometryVector, MortonSettings, TopologyVector,
    VertexBuffer,
};
