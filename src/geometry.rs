//! In-memory representation of the geometries of a column.
use std::convert::TryFrom;

#[cfg(feature = "serde_types")]
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

/// A 2D vertex in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Vertex {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An open sequence of vertices.
pub type LineString = Vec<Vertex>;

/// Closed rings; the first ring is the shell and the remaining ones are holes. The last
/// vertex of every ring equals its first.
pub type Polygon = Vec<LineString>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum Geometry {
    Point(Vertex),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(Vec<Vertex>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
        }
    }
}

/// The tag of a [`Geometry`] as stored in the geometry type stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryType {
    pub fn is_polygonal(&self) -> bool {
        matches!(self, GeometryType::Polygon | GeometryType::MultiPolygon)
    }

    pub fn is_lineal(&self) -> bool {
        matches!(self, GeometryType::LineString | GeometryType::MultiLineString)
    }

    pub fn is_puntal(&self) -> bool {
        matches!(self, GeometryType::Point | GeometryType::MultiPoint)
    }
}

impl TryFrom<i32> for GeometryType {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => GeometryType::Point,
            1 => GeometryType::LineString,
            2 => GeometryType::Polygon,
            3 => GeometryType::MultiPoint,
            4 => GeometryType::MultiLineString,
            5 => GeometryType::MultiPolygon,
            _ => return Err(oos!("Geometry type {} is out of range", value)),
        })
    }
}

impl From<GeometryType> for i32 {
    fn from(value: GeometryType) -> Self {
        match value {
            GeometryType::Point => 0,
            GeometryType::LineString => 1,
            GeometryType::Polygon => 2,
            GeometryType::MultiPoint => 3,
            GeometryType::MultiLineString => 4,
            GeometryType::MultiPolygon => 5,
        }
    }
}
