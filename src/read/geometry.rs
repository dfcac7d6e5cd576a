use std::convert::TryFrom;

use super::{decode_int_stream, Cursor};
use crate::error::{Error, Result};
use crate::geometry::{Geometry, GeometryType, LineString, Polygon, Vertex};
use crate::metadata::{DictionaryType, LengthType, LogicalStreamType, StreamMetadata};

/// The streams of a geometry column, decoded but not yet assembled into geometries.
///
/// Every topology stream holds one count per entry of its parent: `num_geometries` one per
/// multi-part feature, `num_parts` one per line (or polygon, when polygons are present) and
/// `num_rings` one per ring (and per line, when polygons are present).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeometryColumn {
    pub geometry_types: Vec<GeometryType>,
    pub num_geometries: Option<Vec<u32>>,
    pub num_parts: Option<Vec<u32>>,
    pub num_rings: Option<Vec<u32>>,
    /// Indices into `vertex_buffer`, one per vertex, when the vertices are dictionary encoded
    pub vertex_offsets: Option<Vec<u32>>,
    /// Interleaved `x, y` coordinates
    pub vertex_buffer: Vec<i32>,
}

impl GeometryColumn {
    /// Whether the column holds a polygonal geometry, in which case line lengths are stored
    /// in `num_rings`.
    pub fn contains_polygon(&self) -> bool {
        self.geometry_types.iter().any(|t| t.is_polygonal())
    }
}

/// The role of a stream of a geometry column, as told by its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GeometryStream {
    NumGeometries,
    NumParts,
    NumRings,
    VertexOffsets,
    Vertices,
    MortonVertices,
}

impl TryFrom<&StreamMetadata> for GeometryStream {
    type Error = Error;

    fn try_from(metadata: &StreamMetadata) -> Result<Self> {
        use LogicalStreamType::*;
        Ok(match metadata.logical_stream_type {
            Some(Length(LengthType::Geometries)) => GeometryStream::NumGeometries,
            Some(Length(LengthType::Parts)) => GeometryStream::NumParts,
            Some(Length(LengthType::Rings)) => GeometryStream::NumRings,
            Some(Length(LengthType::Triangles)) => {
                return Err(Error::NotImplemented(
                    "Triangulated geometries are not supported".to_string(),
                ))
            }
            Some(Offset(_)) => GeometryStream::VertexOffsets,
            Some(Dictionary(DictionaryType::Vertex)) => GeometryStream::Vertices,
            Some(Dictionary(DictionaryType::Morton)) => GeometryStream::MortonVertices,
            other => {
                return Err(oos!(
                    "A {:?} stream of type {:?} cannot be part of a geometry column",
                    metadata.physical_stream_type,
                    other
                ))
            }
        })
    }
}

/// Decodes the geometry type stream that starts every geometry column.
pub(crate) fn decode_geometry_types(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
) -> Result<Vec<GeometryType>> {
    decode_int_stream(cursor, metadata, false)?
        .into_iter()
        .map(GeometryType::try_from)
        .collect()
}

fn to_counts(values: Vec<i32>) -> Vec<u32> {
    values.into_iter().map(|value| value as u32).collect()
}

/// Reads the `num_streams` streams of a geometry column from `cursor`.
pub fn decode_geometry_column(cursor: &mut Cursor, num_streams: usize) -> Result<GeometryColumn> {
    if num_streams == 0 {
        return Err(oos!("A geometry column needs at least its geometry type stream"));
    }
    let metadata = StreamMetadata::read(cursor)?;
    let mut column = GeometryColumn {
        geometry_types: decode_geometry_types(cursor, &metadata)?,
        ..Default::default()
    };

    let mut vertex_buffer = None;
    for _ in 1..num_streams {
        let metadata = StreamMetadata::read(cursor)?;
        match GeometryStream::try_from(&metadata)? {
            GeometryStream::NumGeometries => {
                let counts = decode_int_stream(cursor, &metadata, false)?;
                column.num_geometries = Some(to_counts(counts))
            }
            GeometryStream::NumParts => {
                let counts = decode_int_stream(cursor, &metadata, false)?;
                column.num_parts = Some(to_counts(counts))
            }
            GeometryStream::NumRings => {
                let counts = decode_int_stream(cursor, &metadata, false)?;
                column.num_rings = Some(to_counts(counts))
            }
            GeometryStream::VertexOffsets => {
                let offsets = decode_int_stream(cursor, &metadata, false)?;
                column.vertex_offsets = Some(to_counts(offsets))
            }
            // Morton codes decode to interleaved coordinates as well
            GeometryStream::Vertices | GeometryStream::MortonVertices => {
                vertex_buffer = Some(decode_int_stream(cursor, &metadata, true)?)
            }
        }
    }
    column.vertex_buffer =
        vertex_buffer.ok_or_else(|| oos!("A geometry column must have a vertex buffer"))?;
    Ok(column)
}

/// Walks the streams of a [`GeometryColumn`] feature by feature.
struct Walker<'a> {
    column: &'a GeometryColumn,
    geometries: usize,
    parts: usize,
    rings: usize,
    vertices: usize,
}

fn next_count(counts: Option<&Vec<u32>>, counter: &mut usize, name: &str) -> Result<usize> {
    let count = counts
        .and_then(|counts| counts.get(*counter))
        .ok_or_else(|| oos!("The geometry column ran out of {}", name))?;
    *counter += 1;
    Ok(*count as usize)
}

impl<'a> Walker<'a> {
    fn new(column: &'a GeometryColumn) -> Self {
        Self {
            column,
            geometries: 0,
            parts: 0,
            rings: 0,
            vertices: 0,
        }
    }

    fn num_geometries(&mut self) -> Result<usize> {
        next_count(
            self.column.num_geometries.as_ref(),
            &mut self.geometries,
            "geometries",
        )
    }

    fn num_parts(&mut self) -> Result<usize> {
        next_count(self.column.num_parts.as_ref(), &mut self.parts, "parts")
    }

    fn num_rings(&mut self) -> Result<usize> {
        next_count(self.column.num_rings.as_ref(), &mut self.rings, "rings")
    }

    /// The number of vertices of the next line
    fn num_line_vertices(&mut self, contains_polygon: bool) -> Result<usize> {
        if contains_polygon {
            self.num_rings()
        } else {
            self.num_parts()
        }
    }

    fn vertex(&mut self) -> Result<Vertex> {
        let index = match &self.column.vertex_offsets {
            Some(offsets) => *offsets
                .get(self.vertices)
                .ok_or_else(|| oos!("The geometry column ran out of vertex offsets"))?
                as usize,
            None => self.vertices,
        };
        self.vertices += 1;
        match self.column.vertex_buffer.get(index * 2..index * 2 + 2) {
            Some([x, y]) => Ok(Vertex::new(*x, *y)),
            _ => Err(oos!(
                "Vertex {} is out of the vertex buffer of {} vertices",
                index,
                self.column.vertex_buffer.len() / 2
            )),
        }
    }

    fn vertices(&mut self, length: usize) -> Result<Vec<Vertex>> {
        (0..length).map(|_| self.vertex()).collect()
    }

    /// A ring of `length` stored vertices, closed.
    fn ring(&mut self, length: usize) -> Result<LineString> {
        let mut ring = self.vertices(length)?;
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        Ok(ring)
    }

    fn polygon(&mut self) -> Result<Polygon> {
        let num_rings = self.num_parts()?;
        (0..num_rings)
            .map(|_| {
                let length = self.num_rings()?;
                self.ring(length)
            })
            .collect()
    }

    fn geometry(
        &mut self,
        geometry_type: GeometryType,
        contains_polygon: bool,
    ) -> Result<Geometry> {
        Ok(match geometry_type {
            GeometryType::Point => Geometry::Point(self.vertex()?),
            GeometryType::MultiPoint => {
                let length = self.num_geometries()?;
                Geometry::MultiPoint(self.vertices(length)?)
            }
            GeometryType::LineString => {
                let length = self.num_line_vertices(contains_polygon)?;
                Geometry::LineString(self.vertices(length)?)
            }
            GeometryType::MultiLineString => {
                let num_lines = self.num_geometries()?;
                let lines = (0..num_lines)
                    .map(|_| {
                        let length = self.num_line_vertices(contains_polygon)?;
                        self.vertices(length)
                    })
                    .collect::<Result<_>>()?;
                Geometry::MultiLineString(lines)
            }
            GeometryType::Polygon => Geometry::Polygon(self.polygon()?),
            GeometryType::MultiPolygon => {
                let num_polygons = self.num_geometries()?;
                let polygons = (0..num_polygons)
                    .map(|_| self.polygon())
                    .collect::<Result<_>>()?;
                Geometry::MultiPolygon(polygons)
            }
        })
    }
}

/// Assembles the geometries of `column`, one per feature.
pub fn decode_geometry(column: &GeometryColumn) -> Result<Vec<Geometry>> {
    let contains_polygon = column.contains_polygon();
    let mut walker = Walker::new(column);
    column
        .geometry_types
        .iter()
        .map(|geometry_type| walker.geometry(*geometry_type, contains_polygon))
        .collect()
}
