//! Decoding of geometry columns into a random access [`GeometryVector`].
//!
//! Length streams are turned into offset buffers. When the column mixes geometry types a
//! feature may have no entry in a topology stream (e.g. a `Point` in `num_parts`); such
//! features get an offset of one per geometry so that every level stays indexable.
mod vector;

pub use vector::{GeometryTypes, GeometryVector, MortonSettings, TopologyVector, VertexBuffer};

use super::geometry::{decode_geometry_types, GeometryStream};
use super::{
    decode_const_int_stream, decode_int_stream, decode_length_stream_to_offset_buffer,
    decode_morton_codes, Cursor,
};
use crate::error::{Error, Result};
use crate::geometry::GeometryType;
use crate::metadata::{StreamMetadata, VectorType};

#[derive(Default)]
struct Streams {
    num_geometries: Option<Vec<u32>>,
    num_parts: Option<Vec<u32>>,
    num_rings: Option<Vec<u32>>,
    vertex_offsets: Option<Vec<u32>>,
    vertex_buffer: Option<VertexBuffer>,
}

/// Reads the streams after the geometry type stream, decoding length streams with `lengths`.
fn read_streams<F>(cursor: &mut Cursor, num_streams: usize, lengths: F) -> Result<Streams>
where
    F: Fn(&mut Cursor, &StreamMetadata) -> Result<Vec<u32>>,
{
    let mut streams = Streams::default();
    for _ in 1..num_streams {
        let metadata = StreamMetadata::read(cursor)?;
        match GeometryStream::try_from(&metadata)? {
            GeometryStream::NumGeometries => {
                streams.num_geometries = Some(lengths(cursor, &metadata)?)
            }
            GeometryStream::NumParts => streams.num_parts = Some(lengths(cursor, &metadata)?),
            GeometryStream::NumRings => streams.num_rings = Some(lengths(cursor, &metadata)?),
            GeometryStream::VertexOffsets => {
                streams.vertex_offsets = Some(decode_unsigned(cursor, &metadata)?)
            }
            GeometryStream::Vertices => {
                streams.vertex_buffer = Some(VertexBuffer::Vec2(decode_int_stream(
                    cursor, &metadata, true,
                )?))
            }
            GeometryStream::MortonVertices => {
                let settings = metadata
                    .morton()
                    .map(|morton| MortonSettings {
                        num_bits: morton.num_bits,
                        coordinate_shift: morton.coordinate_shift,
                    })
                    .ok_or_else(|| {
                        Error::unsupported("A Morton vertex buffer must be Morton encoded")
                    })?;
                let codes = decode_morton_codes(cursor, &metadata)?;
                streams.vertex_buffer = Some(VertexBuffer::Morton { codes, settings })
            }
        }
    }
    Ok(streams)
}

fn decode_unsigned(cursor: &mut Cursor, metadata: &StreamMetadata) -> Result<Vec<u32>> {
    Ok(decode_int_stream(cursor, metadata, false)?
        .into_iter()
        .map(|value| value as u32)
        .collect())
}

/// Decodes the `num_streams` streams of a geometry column of `num_features` features into a
/// [`GeometryVector`].
pub fn decode_to_random_access_format(
    cursor: &mut Cursor,
    num_streams: usize,
    num_features: usize,
) -> Result<GeometryVector> {
    if num_streams == 0 {
        return Err(oos!("A geometry column needs at least its geometry type stream"));
    }
    let metadata = StreamMetadata::read(cursor)?;

    if metadata.vector_type() == VectorType::Const {
        let geometry_type = decode_const_int_stream(cursor, &metadata, false)?;
        let geometry_type = GeometryType::try_from(geometry_type)?;
        let streams = read_streams(cursor, num_streams, decode_length_stream_to_offset_buffer)?;
        let vertex_buffer = streams
            .vertex_buffer
            .ok_or_else(|| oos!("A geometry column must have a vertex buffer"))?;
        log::debug!(
            "decoded a constant {:?} geometry column of {} features",
            geometry_type,
            num_features
        );
        return Ok(GeometryVector::new(
            num_features,
            GeometryTypes::Const(geometry_type),
            TopologyVector {
                geometry_offsets: streams.num_geometries,
                part_offsets: streams.num_parts,
                ring_offsets: streams.num_rings,
            },
            streams.vertex_offsets,
            vertex_buffer,
        ));
    }

    let geometry_types = decode_geometry_types(cursor, &metadata)?;
    if geometry_types.len() != num_features {
        return Err(oos!(
            "A geometry column of {} features has {} geometry types",
            num_features,
            geometry_types.len()
        ));
    }
    let streams = read_streams(cursor, num_streams, decode_unsigned)?;
    let vertex_buffer = streams
        .vertex_buffer
        .ok_or_else(|| oos!("A geometry column must have a vertex buffer"))?;
    let topology = decode_topology(
        &geometry_types,
        streams.num_geometries,
        streams.num_parts,
        streams.num_rings,
    )?;

    Ok(GeometryVector::new(
        num_features,
        GeometryTypes::PerFeature(geometry_types),
        topology,
        streams.vertex_offsets,
        vertex_buffer,
    ))
}

/// Turns the length streams of a column of mixed geometry types into offset buffers.
fn decode_topology(
    types: &[GeometryType],
    num_geometries: Option<Vec<u32>>,
    num_parts: Option<Vec<u32>>,
    num_rings: Option<Vec<u32>>,
) -> Result<TopologyVector> {
    use GeometryType::*;

    let streams = (num_geometries, num_parts, num_rings);
    let (geometry_offsets, part_offsets, ring_offsets) = match streams {
        (Some(geometries), parts, rings) => {
            let geometry_offsets = decode_root_length_stream(types, &geometries, 2)?;
            match (parts, rings) {
                (Some(parts), Some(rings)) => {
                    let part_offsets = decode_level1_length_stream(
                        types,
                        &geometry_offsets,
                        &parts,
                        |t| matches!(t, Polygon | MultiPolygon),
                    )?;
                    let ring_offsets = decode_level2_length_stream(
                        types,
                        &geometry_offsets,
                        &part_offsets,
                        &rings,
                    )?;
                    (Some(geometry_offsets), Some(part_offsets), Some(ring_offsets))
                }
                (Some(parts), None) => {
                    let part_offsets = decode_level1_length_stream(
                        types,
                        &geometry_offsets,
                        &parts,
                        |t| matches!(t, LineString | MultiLineString),
                    )?;
                    (Some(geometry_offsets), Some(part_offsets), None)
                }
                (None, None) => (Some(geometry_offsets), None, None),
                (None, Some(_)) => return Err(oos!("A ring stream requires a part stream")),
            }
        }
        (None, Some(parts), Some(rings)) => {
            let part_offsets = decode_root_length_stream(types, &parts, 1)?;
            let ring_offsets = decode_level1_length_stream(types, &part_offsets, &rings, |t| {
                matches!(t, Polygon | MultiPolygon | LineString | MultiLineString)
            })?;
            (None, Some(part_offsets), Some(ring_offsets))
        }
        (None, Some(parts), None) => {
            let part_offsets = decode_root_length_stream(types, &parts, 0)?;
            (None, Some(part_offsets), None)
        }
        (None, None, Some(_)) => return Err(oos!("A ring stream requires a part stream")),
        (None, None, None) => (None, None, None),
    };
    Ok(TopologyVector {
        geometry_offsets,
        part_offsets,
        ring_offsets,
    })
}

/// Reads lengths in order, failing when the stream runs out or is not fully consumed.
struct Lengths<'a> {
    lengths: std::slice::Iter<'a, u32>,
}

impl<'a> Lengths<'a> {
    fn new(lengths: &'a [u32]) -> Self {
        Self {
            lengths: lengths.iter(),
        }
    }

    fn next(&mut self) -> Result<u32> {
        self.lengths
            .next()
            .copied()
            .ok_or_else(|| oos!("A topology stream has fewer lengths than its geometries need"))
    }

    fn finish(self) -> Result<()> {
        match self.lengths.len() {
            0 => Ok(()),
            remaining => Err(oos!(
                "A topology stream has {} lengths more than its geometries need",
                remaining
            )),
        }
    }
}

fn push_offset(offsets: &mut Vec<u32>, length: u32) -> Result<()> {
    let last = offsets.last().copied().unwrap_or(0);
    let offset = last
        .checked_add(length)
        .ok_or_else(|| oos!("The offsets of a topology stream overflow 32 bits"))?;
    offsets.push(offset);
    Ok(())
}

/// The number of entries of the feature at `index` in the level mapped by `offsets`.
fn span(offsets: &[u32], index: usize) -> Result<u32> {
    match (offsets.get(index), offsets.get(index + 1)) {
        (Some(start), Some(end)) if start <= end => Ok(end - start),
        _ => Err(oos!("Offset {} is out of a topology buffer", index)),
    }
}

/// Offsets of the outermost present stream. Types above `buffer_id` (2 for geometries, 1 for
/// parts with rings, 0 for parts without rings) have a length; the others count as one.
fn decode_root_length_stream(
    types: &[GeometryType],
    lengths: &[u32],
    buffer_id: i32,
) -> Result<Vec<u32>> {
    let mut lengths = Lengths::new(lengths);
    let mut offsets = Vec::with_capacity(types.len() + 1);
    offsets.push(0);
    for geometry_type in types {
        let length = if i32::from(*geometry_type) > buffer_id {
            lengths.next()?
        } else {
            1
        };
        push_offset(&mut offsets, length)?;
    }
    lengths.finish()?;
    Ok(offsets)
}

/// Offsets of the level below the root: every geometry of a type for which `has_length`
/// holds consumes a length, the others count as one.
fn decode_level1_length_stream<F: Fn(GeometryType) -> bool>(
    types: &[GeometryType],
    root_offsets: &[u32],
    lengths: &[u32],
    has_length: F,
) -> Result<Vec<u32>> {
    let mut lengths = Lengths::new(lengths);
    let mut offsets = vec![0];
    for (index, geometry_type) in types.iter().enumerate() {
        let num_geometries = span(root_offsets, index)?;
        for _ in 0..num_geometries {
            let length = if has_length(*geometry_type) {
                lengths.next()?
            } else {
                1
            };
            push_offset(&mut offsets, length)?;
        }
    }
    lengths.finish()?;
    Ok(offsets)
}

/// Offsets of rings below geometries and parts: every part of a non-puntal geometry has a
/// length; points count as one.
fn decode_level2_length_stream(
    types: &[GeometryType],
    root_offsets: &[u32],
    level1_offsets: &[u32],
    lengths: &[u32],
) -> Result<Vec<u32>> {
    let mut lengths = Lengths::new(lengths);
    let mut offsets = vec![0];
    let mut level1 = 0;
    for (index, geometry_type) in types.iter().enumerate() {
        let num_geometries = span(root_offsets, index)?;
        for _ in 0..num_geometries {
            if geometry_type.is_puntal() {
                push_offset(&mut offsets, 1)?;
            } else {
                for _ in 0..span(level1_offsets, level1)? {
                    push_offset(&mut offsets, lengths.next()?)?;
                }
            }
            level1 += 1;
        }
    }
    lengths.finish()?;
    Ok(offsets)
}
