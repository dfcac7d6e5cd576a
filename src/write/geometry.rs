use std::collections::BTreeMap;

use super::integer::{encode_int_stream, encode_morton_stream, encode_physical, EncodedStream};
use super::observer::StreamObserver;
use super::sort::{coordinate_range, sort_order};
use super::{EncodeOptions, SortSettings};
use crate::curve::{HilbertCurve, SpaceFillingCurve, ZOrderCurve};
use crate::encoding::delta;
use crate::error::Result;
use crate::geometry::{Geometry, LineString, Vertex};
use crate::metadata::{
    DictionaryType, LengthType, LogicalEncoding, LogicalStreamType, OffsetType,
    PhysicalLevelTechnique, PhysicalStreamType,
};

/// A geometry column ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedGeometryColumn {
    /// The number of streams in `data`
    pub num_streams: usize,
    pub data: Vec<u8>,
    /// The largest coordinate of the column, over both axes
    pub max_vertex_value: i32,
    /// Whether the geometries were reordered
    pub sorted: bool,
    /// The feature ids, in the order of the written geometries
    pub feature_ids: Vec<u64>,
}

/// The topology of a sequence of geometries, as length streams plus a vertex buffer.
#[derive(Debug, Default)]
struct Topology {
    geometry_types: Vec<i32>,
    num_geometries: Vec<i32>,
    num_parts: Vec<i32>,
    num_rings: Vec<i32>,
    vertices: Vec<Vertex>,
}

impl Topology {
    fn push_line(&mut self, line: &[Vertex], contains_polygon: bool) {
        if contains_polygon {
            self.num_rings.push(line.len() as i32);
        } else {
            self.num_parts.push(line.len() as i32);
        }
        self.vertices.extend_from_slice(line);
    }

    /// Rings are stored open: a closing vertex equal to the first one is dropped.
    fn push_polygon(&mut self, polygon: &[LineString]) {
        self.num_parts.push(polygon.len() as i32);
        for ring in polygon {
            let ring = match (ring.first(), ring.last()) {
                (Some(first), Some(last)) if ring.len() > 1 && first == last => {
                    &ring[..ring.len() - 1]
                }
                _ => &ring[..],
            };
            self.num_rings.push(ring.len() as i32);
            self.vertices.extend_from_slice(ring);
        }
    }

    fn push(&mut self, geometry: &Geometry, contains_polygon: bool) {
        self.geometry_types.push(geometry.geometry_type().into());
        match geometry {
            Geometry::Point(vertex) => self.vertices.push(*vertex),
            Geometry::MultiPoint(points) => {
                self.num_geometries.push(points.len() as i32);
                self.vertices.extend_from_slice(points);
            }
            Geometry::LineString(line) => self.push_line(line, contains_polygon),
            Geometry::MultiLineString(lines) => {
                self.num_geometries.push(lines.len() as i32);
                for line in lines {
                    self.push_line(line, contains_polygon)
                }
            }
            Geometry::Polygon(polygon) => self.push_polygon(polygon),
            Geometry::MultiPolygon(polygons) => {
                self.num_geometries.push(polygons.len() as i32);
                for polygon in polygons {
                    self.push_polygon(polygon)
                }
            }
        }
    }
}

fn flatten<'a, I: IntoIterator<Item = &'a Geometry>>(
    geometries: I,
    contains_polygon: bool,
) -> Topology {
    let mut topology = Topology::default();
    for geometry in geometries {
        topology.push(geometry, contains_polygon);
    }
    topology
}

fn interleave(vertices: &[Vertex]) -> Vec<i32> {
    vertices.iter().flat_map(|v| [v.x, v.y]).collect()
}

/// Encodes interleaved coordinates as a `DATA/VERTEX` stream of component-wise deltas.
fn encode_vertex_buffer(
    coordinates: &[i32],
    physical: PhysicalLevelTechnique,
) -> Result<EncodedStream> {
    let words = delta::encode_componentwise(coordinates);
    Ok(EncodedStream::new(
        PhysicalStreamType::Data,
        Some(LogicalStreamType::Dictionary(DictionaryType::Vertex)),
        LogicalEncoding::ComponentwiseDelta,
        physical,
        words.len(),
        encode_physical(&words, physical)?,
    ))
}

/// A way of writing the vertices of a column.
struct VertexCandidate {
    name: &'static str,
    /// The offset stream and its values, for dictionaries
    offsets: Option<(Vec<i32>, EncodedStream)>,
    /// The values reported to observers
    values: Vec<i32>,
    buffer: EncodedStream,
}

impl VertexCandidate {
    fn encoded_len(&self) -> usize {
        self.buffer.encoded_len()
            + self
                .offsets
                .as_ref()
                .map_or(0, |(_, stream)| stream.encoded_len())
    }
}

/// Deduplicates `vertices` ordered by `key`, returning the dictionary keys and the offset of
/// every vertex into it.
fn dictionary<F: Fn(Vertex) -> u32>(
    vertices: &[Vertex],
    key: F,
) -> (BTreeMap<u32, Vertex>, Vec<i32>) {
    let dictionary = vertices
        .iter()
        .map(|vertex| (key(*vertex), *vertex))
        .collect::<BTreeMap<_, _>>();
    let keys = dictionary.keys().copied().collect::<Vec<_>>();
    let offsets = vertices
        .iter()
        .map(|vertex| keys.binary_search(&key(*vertex)).unwrap_or_default() as i32)
        .collect();
    (dictionary, offsets)
}

fn encode_offsets(
    offsets: Vec<i32>,
    options: &EncodeOptions,
) -> Result<(Vec<i32>, EncodedStream)> {
    let stream = encode_int_stream(
        &offsets,
        false,
        PhysicalStreamType::Offset,
        Some(LogicalStreamType::Offset(OffsetType::Vertex)),
        options,
    )?;
    Ok((offsets, stream))
}

fn vertex_candidates(
    vertices: &[Vertex],
    options: &EncodeOptions,
) -> Result<Vec<VertexCandidate>> {
    let physical = options.physical_technique;
    let coordinates = interleave(vertices);
    let mut candidates = vec![VertexCandidate {
        name: "plain",
        offsets: None,
        buffer: encode_vertex_buffer(&coordinates, physical)?,
        values: coordinates,
    }];

    let (min, max) = match coordinate_range(vertices) {
        Some(range) => range,
        None => return Ok(candidates),
    };
    let curves = (HilbertCurve::try_new(min, max), ZOrderCurve::try_new(min, max));
    let (hilbert, zorder) = match curves {
        (Ok(hilbert), Ok(zorder)) => (hilbert, zorder),
        _ => {
            log::debug!(
                "vertices in [{}, {}] do not fit a curve; skipping vertex dictionaries",
                min,
                max
            );
            return Ok(candidates);
        }
    };

    let (entries, offsets) = dictionary(vertices, |vertex| hilbert.encode(vertex));
    let entries = entries.into_values().collect::<Vec<_>>();
    let coordinates = interleave(&entries);
    candidates.push(VertexCandidate {
        name: "dictionary",
        offsets: Some(encode_offsets(offsets, options)?),
        buffer: encode_vertex_buffer(&coordinates, physical)?,
        values: coordinates,
    });

    if options.use_morton {
        let (entries, offsets) = dictionary(vertices, |vertex| zorder.encode(vertex));
        let codes = entries.into_keys().collect::<Vec<_>>();
        candidates.push(VertexCandidate {
            name: "morton dictionary",
            offsets: Some(encode_offsets(offsets, options)?),
            buffer: encode_morton_stream(
                &codes,
                zorder.num_bits(),
                zorder.coordinate_shift(),
                physical,
            )?,
            values: codes.into_iter().map(|code| code as i32).collect(),
        });
    }
    Ok(candidates)
}

/// Picks the smallest candidate; ties prefer plain, then the dictionary.
fn select(candidates: Vec<VertexCandidate>) -> Option<VertexCandidate> {
    let best = candidates.into_iter().min_by_key(|candidate| candidate.encoded_len())?;
    log::debug!(
        "writing vertices as {} in {} bytes",
        best.name,
        best.encoded_len()
    );
    Some(best)
}

struct Writer<'a> {
    data: Vec<u8>,
    num_streams: usize,
    observer: &'a mut dyn StreamObserver,
}

impl<'a> Writer<'a> {
    fn write(&mut self, name: &str, values: &[i32], stream: &EncodedStream) {
        let metadata = stream.metadata.encode();
        if self.observer.is_active() {
            self.observer.observe_stream(name, values, &metadata, &stream.payload);
        }
        self.data.extend_from_slice(&metadata);
        self.data.extend_from_slice(&stream.payload);
        self.num_streams += 1;
    }

    fn write_lengths(
        &mut self,
        name: &str,
        values: &[i32],
        length_type: Option<LengthType>,
        options: &EncodeOptions,
    ) -> Result<()> {
        let stream = encode_int_stream(
            values,
            false,
            PhysicalStreamType::Length,
            length_type.map(LogicalStreamType::Length),
            options,
        )?;
        self.write(name, values, &stream);
        Ok(())
    }
}

/// Encodes `geometries` into the streams of a geometry column.
///
/// The vertices are written plain or through a vertex dictionary, whichever is smaller.
/// When `sort_settings` allow it, columns of points or of line strings are reordered first
/// and the feature ids are permuted alongside.
pub fn encode_geometry_column(
    geometries: &[Geometry],
    options: &EncodeOptions,
    sort_settings: SortSettings,
    observer: &mut dyn StreamObserver,
) -> Result<EncodedGeometryColumn> {
    let order = sort_order(geometries, &sort_settings)?;
    let SortSettings { feature_ids, .. } = sort_settings;
    let (ordered, feature_ids) = match &order {
        Some(order) => (
            order.iter().map(|index| &geometries[*index]).collect::<Vec<_>>(),
            if feature_ids.is_empty() {
                feature_ids
            } else {
                order.iter().map(|index| feature_ids[*index]).collect()
            },
        ),
        None => (geometries.iter().collect(), feature_ids),
    };

    let contains_polygon = geometries
        .iter()
        .any(|geometry| geometry.geometry_type().is_polygonal());
    let topology = flatten(ordered, contains_polygon);

    let max_vertex_value = match coordinate_range(&topology.vertices) {
        Some((_, max)) => max,
        None => return Err(oos!("A geometry column must have at least one vertex")),
    };

    let mut writer = Writer {
        data: vec![],
        num_streams: 0,
        observer,
    };
    writer.write_lengths("geom_types", &topology.geometry_types, None, options)?;
    for (name, values, length_type) in [
        ("geom_num_geoms", &topology.num_geometries, LengthType::Geometries),
        ("geom_num_parts", &topology.num_parts, LengthType::Parts),
        ("geom_num_rings", &topology.num_rings, LengthType::Rings),
    ] {
        if !values.is_empty() {
            writer.write_lengths(name, values, Some(length_type), options)?;
        }
    }

    let vertices = select(vertex_candidates(&topology.vertices, options)?)
        .ok_or_else(|| oos!("No vertex encoding was tried"))?;
    if let Some((offsets, stream)) = &vertices.offsets {
        writer.write("geom_vertex_offsets", offsets, stream);
    }
    writer.write("geom_vertex_buffer", &vertices.values, &vertices.buffer);

    Ok(EncodedGeometryColumn {
        num_streams: writer.num_streams,
        data: writer.data,
        max_vertex_value,
        sorted: order.is_some(),
        feature_ids,
    })
}
