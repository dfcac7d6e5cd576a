use super::SortSettings;
use crate::curve::{HilbertCurve, SpaceFillingCurve, ZOrderCurve};
use crate::error::Result;
use crate::geometry::{Geometry, Vertex};

/// The smallest and the largest coordinate of `vertices`, over both axes.
pub(crate) fn coordinate_range<'a, I: IntoIterator<Item = &'a Vertex>>(
    vertices: I,
) -> Option<(i32, i32)> {
    vertices.into_iter().fold(None, |range, vertex| {
        let (min, max) = range.unwrap_or((vertex.x, vertex.x));
        Some((
            min.min(vertex.x).min(vertex.y),
            max.max(vertex.x).max(vertex.y),
        ))
    })
}

/// The sort key of every geometry, or `None` if the column cannot be reordered.
fn sort_keys(geometries: &[Geometry]) -> Option<Vec<u32>> {
    let all_lines = geometries
        .iter()
        .all(|geometry| matches!(geometry, Geometry::LineString(_)));
    let all_points = geometries
        .iter()
        .all(|geometry| matches!(geometry, Geometry::Point(_)));
    if !all_lines && !all_points {
        return None;
    }

    let first_vertices = geometries
        .iter()
        .filter_map(|geometry| match geometry {
            Geometry::Point(vertex) => Some(*vertex),
            Geometry::LineString(line) => line.first().copied(),
            _ => None,
        })
        .collect::<Vec<_>>();
    // empty lines have no key
    if first_vertices.len() != geometries.len() {
        return None;
    }
    let vertices = geometries.iter().flat_map(|geometry| match geometry {
        Geometry::Point(vertex) => std::slice::from_ref(vertex),
        Geometry::LineString(line) => line.as_slice(),
        _ => &[],
    });
    let (min, max) = coordinate_range(vertices)?;

    if all_lines {
        let curve = ZOrderCurve::try_new(min, max).ok()?;
        Some(first_vertices.into_iter().map(|v| curve.encode(v)).collect())
    } else {
        let curve = HilbertCurve::try_new(min, max).ok()?;
        Some(first_vertices.into_iter().map(|v| curve.encode(v)).collect())
    }
}

/// Returns the order in which `geometries` should be written, or `None` when they keep
/// their order.
///
/// Only columns of points (ordered by Hilbert index) or of line strings (ordered by the
/// Morton code of their first vertex) are reordered; the sort is stable.
pub fn sort_order(geometries: &[Geometry], settings: &SortSettings) -> Result<Option<Vec<usize>>> {
    if !settings.feature_ids.is_empty() && settings.feature_ids.len() != geometries.len() {
        return Err(oos!(
            "{} feature ids were given for {} geometries",
            settings.feature_ids.len(),
            geometries.len()
        ));
    }
    if !settings.is_sortable {
        return Ok(None);
    }
    let keys = match sort_keys(geometries) {
        Some(keys) => keys,
        None => {
            log::debug!("the geometry column cannot be sorted");
            return Ok(None);
        }
    };
    let mut order = (0..geometries.len()).collect::<Vec<_>>();
    order.sort_by_key(|index| keys[*index]);
    Ok(Some(order))
}
