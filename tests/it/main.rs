mod read;
mod write;

use mlt_codec::geometry::{Geometry, LineString, Polygon, Vertex};

pub fn v(x: i32, y: i32) -> Vertex {
    Vertex::new(x, y)
}

/// A closed square ring with its lower left corner at `(x, y)`.
pub fn square(x: i32, y: i32, size: i32) -> LineString {
    vec![
        v(x, y),
        v(x + size, y),
        v(x + size, y + size),
        v(x, y + size),
        v(x, y),
    ]
}

pub fn polygon_with_hole(x: i32, y: i32) -> Polygon {
    vec![square(x, y, 10), square(x + 2, y + 2, 3)]
}

/// `Point(1 1)`, `LineString(0 0, 2 2, 4 4)`, `Polygon((0 0, 4 0, 4 4, 0 4, 0 0))`
pub fn example_column() -> Vec<Geometry> {
    vec![
        Geometry::Point(v(1, 1)),
        Geometry::LineString(vec![v(0, 0), v(2, 2), v(4, 4)]),
        Geometry::Polygon(vec![square(0, 0, 4)]),
    ]
}

pub fn points() -> Vec<Geometry> {
    vec![
        Geometry::Point(v(5, 7)),
        Geometry::Point(v(-3, 2)),
        Geometry::Point(v(100, 4)),
        Geometry::Point(v(5, 7)),
    ]
}

pub fn line_strings() -> Vec<Geometry> {
    vec![
        Geometry::LineString(vec![v(0, 0), v(10, 10), v(20, 0)]),
        Geometry::LineString(vec![v(-5, 3), v(-5, 8)]),
        Geometry::LineString(vec![v(7, 7), v(8, 8), v(9, 9), v(10, 10)]),
    ]
}

pub fn polygons() -> Vec<Geometry> {
    vec![
        Geometry::Polygon(vec![square(0, 0, 4)]),
        Geometry::Polygon(polygon_with_hole(20, 20)),
        Geometry::Polygon(vec![square(-8, 3, 2)]),
    ]
}

pub fn multi_polygons() -> Vec<Geometry> {
    vec![
        Geometry::MultiPolygon(vec![vec![square(0, 0, 4)], polygon_with_hole(10, 10)]),
        Geometry::MultiPolygon(vec![vec![square(50, 50, 1)]]),
    ]
}

/// Every geometry type in one column.
pub fn mixed() -> Vec<Geometry> {
    vec![
        Geometry::Point(v(1, 1)),
        Geometry::MultiPoint(vec![v(2, 2), v(3, 4), v(2, 2)]),
        Geometry::LineString(vec![v(0, 0), v(2, 2), v(4, 4)]),
        Geometry::MultiLineString(vec![
            vec![v(1, 0), v(1, 5)],
            vec![v(3, 0), v(3, 5), v(6, 5)],
        ]),
        Geometry::Polygon(polygon_with_hole(0, 0)),
        Geometry::MultiPolygon(vec![vec![square(30, 30, 5)], vec![square(40, 40, 5)]]),
        Geometry::Point(v(-4, 9)),
    ]
}

/// Mixes without polygons, which store line lengths as parts instead of rings.
pub fn mixed_without_polygons() -> Vec<Geometry> {
    vec![
        Geometry::LineString(vec![v(0, 0), v(2, 2)]),
        Geometry::Point(v(1, 1)),
        Geometry::MultiLineString(vec![vec![v(1, 0), v(1, 5)], vec![v(3, 0), v(3, 5)]]),
        Geometry::MultiPoint(vec![v(9, 9)]),
    ]
}

pub fn points_and_lines() -> Vec<Geometry> {
    vec![
        Geometry::Point(v(1, 1)),
        Geometry::LineString(vec![v(0, 0), v(2, 2), v(4, 4)]),
        Geometry::Point(v(3, 3)),
    ]
}

pub fn multi_points() -> Vec<Geometry> {
    vec![
        Geometry::MultiPoint(vec![v(1, 1), v(2, 2)]),
        Geometry::MultiPoint(vec![v(3, 3)]),
    ]
}

pub fn multi_line_strings() -> Vec<Geometry> {
    vec![
        Geometry::MultiLineString(vec![vec![v(0, 0), v(1, 1)], vec![v(5, 5), v(6, 5)]]),
        Geometry::MultiLineString(vec![vec![v(2, 2), v(3, 3), v(4, 2)]]),
    ]
}

pub fn polygons_and_points() -> Vec<Geometry> {
    vec![
        Geometry::Polygon(vec![square(0, 0, 4)]),
        Geometry::Point(v(8, 8)),
        Geometry::LineString(vec![v(0, 0), v(9, 9)]),
        Geometry::Polygon(polygon_with_hole(20, 0)),
    ]
}

/// Every test column, with a name for assertion messages.
pub fn columns() -> Vec<(&'static str, Vec<Geometry>)> {
    vec![
        ("example", example_column()),
        ("points", points()),
        ("line strings", line_strings()),
        ("polygons", polygons()),
        ("multi polygons", multi_polygons()),
        ("mixed", mixed()),
        ("mixed without polygons", mixed_without_polygons()),
        ("points and lines", points_and_lines()),
        ("multi points", multi_points()),
        ("multi line strings", multi_line_strings()),
        ("polygons and points", polygons_and_points()),
        ("single point", vec![Geometry::Point(v(0, 0))]),
        ("single polygon", vec![Geometry::Polygon(vec![square(1, 1, 1)])]),
    ]
}
