use std::ops::Range;

use crate::curve::ZOrderCurve;
use crate::error::Result;
use crate::geometry::{Geometry, GeometryType, LineString, Vertex};

/// The geometry types of a [`GeometryVector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryTypes {
    /// Every feature has the same type
    Const(GeometryType),
    PerFeature(Vec<GeometryType>),
}

/// Offset buffers of the topology of a geometry column.
///
/// Each buffer maps an index of its level to a range of indices of the next present level
/// (or of vertices, for the last present one): feature -> geometry -> part -> ring -> vertex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopologyVector {
    pub geometry_offsets: Option<Vec<u32>>,
    pub part_offsets: Option<Vec<u32>>,
    pub ring_offsets: Option<Vec<u32>>,
}

impl TopologyVector {
    /// The present offset buffers, outermost first.
    pub fn levels(&self) -> Vec<&[u32]> {
        [&self.geometry_offsets, &self.part_offsets, &self.ring_offsets]
            .into_iter()
            .flatten()
            .map(|offsets| offsets.as_slice())
            .collect()
    }
}

/// The parameters needed to de-interleave the Morton codes of a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MortonSettings {
    pub num_bits: u32,
    pub coordinate_shift: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexBuffer {
    /// Interleaved `x, y` coordinates
    Vec2(Vec<i32>),
    /// Morton codes, de-interleaved on access
    Morton {
        codes: Vec<u32>,
        settings: MortonSettings,
    },
}

impl VertexBuffer {
    /// The number of vertices
    pub fn len(&self) -> usize {
        match self {
            VertexBuffer::Vec2(values) => values.len() / 2,
            VertexBuffer::Morton { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Vertex> {
        match self {
            VertexBuffer::Vec2(values) => match values.get(index * 2..index * 2 + 2) {
                Some([x, y]) => Some(Vertex::new(*x, *y)),
                _ => None,
            },
            VertexBuffer::Morton { codes, settings } => codes.get(index).map(|code| {
                ZOrderCurve::decode(*code, settings.num_bits, settings.coordinate_shift)
            }),
        }
    }
}

/// A geometry column in a form where any feature can be read without decoding the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryVector {
    num_features: usize,
    geometry_types: GeometryTypes,
    topology: TopologyVector,
    vertex_offsets: Option<Vec<u32>>,
    vertex_buffer: VertexBuffer,
}

/// Maps `range` through each offset buffer of `levels`.
fn map_range(range: Range<usize>, levels: &[&[u32]]) -> Result<Range<usize>> {
    levels.iter().try_fold(range, |range, offsets| {
        match (offsets.get(range.start), offsets.get(range.end)) {
            (Some(start), Some(end)) if start <= end => Ok(*start as usize..*end as usize),
            _ => Err(oos!(
                "The range {:?} is out of an offset buffer of {} entries",
                range,
                offsets.len()
            )),
        }
    })
}

impl GeometryVector {
    pub fn new(
        num_features: usize,
        geometry_types: GeometryTypes,
        topology: TopologyVector,
        vertex_offsets: Option<Vec<u32>>,
        vertex_buffer: VertexBuffer,
    ) -> Self {
        Self {
            num_features,
            geometry_types,
            topology,
            vertex_offsets,
            vertex_buffer,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.num_features
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_features == 0
    }

    pub fn geometry_types(&self) -> &GeometryTypes {
        &self.geometry_types
    }

    pub fn topology(&self) -> &TopologyVector {
        &self.topology
    }

    pub fn vertex_offsets(&self) -> Option<&[u32]> {
        self.vertex_offsets.as_deref()
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    /// The type of the feature at `index`, or `None` if it is out of bounds.
    pub fn geometry_type(&self, index: usize) -> Option<GeometryType> {
        if index >= self.num_features {
            return None;
        }
        match &self.geometry_types {
            GeometryTypes::Const(geometry_type) => Some(*geometry_type),
            GeometryTypes::PerFeature(types) => types.get(index).copied(),
        }
    }

    /// The vertex at position `index` of the column's vertex sequence.
    fn vertex(&self, index: usize) -> Result<Vertex> {
        let index = match &self.vertex_offsets {
            Some(offsets) => *offsets
                .get(index)
                .ok_or_else(|| oos!("Vertex offset {} is out of bounds", index))?
                as usize,
            None => index,
        };
        self.vertex_buffer
            .get(index)
            .ok_or_else(|| oos!("Vertex {} is out of the vertex buffer", index))
    }

    fn vertices(&self, range: Range<usize>) -> Result<LineString> {
        range.map(|index| self.vertex(index)).collect()
    }

    fn ring(&self, range: Range<usize>) -> Result<LineString> {
        let mut ring = self.vertices(range)?;
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        Ok(ring)
    }

    /// Assembles the geometry of the feature at `index`.
    pub fn get_geometry(&self, index: usize) -> Result<Geometry> {
        let geometry_type = self.geometry_type(index).ok_or_else(|| {
            oos!(
                "Feature {} is out of a column of {} features",
                index,
                self.num_features
            )
        })?;
        let levels = self.topology.levels();
        // the number of innermost levels that give the geometry its structure
        let depth = match geometry_type {
            GeometryType::Point | GeometryType::MultiPoint | GeometryType::LineString => 0,
            GeometryType::MultiLineString | GeometryType::Polygon => 1,
            GeometryType::MultiPolygon => 2,
        };
        if levels.len() < depth {
            return Err(oos!(
                "A {:?} needs {} topology levels but the column has {}",
                geometry_type,
                depth,
                levels.len()
            ));
        }
        let (outer, inner) = levels.split_at(levels.len() - depth);
        let range = map_range(index..index + 1, outer)?;

        Ok(match geometry_type {
            GeometryType::Point => {
                if range.len() != 1 {
                    return Err(oos!("A point must have one vertex but has {}", range.len()));
                }
                Geometry::Point(self.vertex(range.start)?)
            }
            GeometryType::MultiPoint => Geometry::MultiPoint(self.vertices(range)?),
            GeometryType::LineString => Geometry::LineString(self.vertices(range)?),
            GeometryType::MultiLineString => Geometry::MultiLineString(
                range
                    .map(|line| self.vertices(map_range(line..line + 1, inner)?))
                    .collect::<Result<_>>()?,
            ),
            GeometryType::Polygon => Geometry::Polygon(
                range
                    .map(|ring| self.ring(map_range(ring..ring + 1, inner)?))
                    .collect::<Result<_>>()?,
            ),
            GeometryType::MultiPolygon => Geometry::MultiPolygon(
                range
                    .map(|polygon| {
                        map_range(polygon..polygon + 1, &inner[..1])?
                            .map(|ring| self.ring(map_range(ring..ring + 1, &inner[1..])?))
                            .collect::<Result<_>>()
                    })
                    .collect::<Result<_>>()?,
            ),
        })
    }

    /// Assembles every geometry of the column.
    pub fn to_geometries(&self) -> Result<Vec<Geometry>> {
        (0..self.num_features)
            .map(|index| self.get_geometry(index))
            .collect()
    }
}
