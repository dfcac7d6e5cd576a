use mlt_codec::curve::ZOrderCurve;
use mlt_codec::error::Result;
use mlt_codec::geometry::Geometry;
use mlt_codec::metadata::PhysicalLevelTechnique;
use mlt_codec::read::{
    decode_geometry, decode_geometry_column, decode_to_random_access_format, Cursor,
    GeometryColumn, GeometryTypes, VertexBuffer,
};
use mlt_codec::write::{
    encode_geometry_column, EncodeOptions, EncodedGeometryColumn, NoopObserver, SortSettings,
};

use super::{columns, example_column, points, v};

fn options() -> Vec<EncodeOptions> {
    let mut options = vec![];
    for physical_technique in [PhysicalLevelTechnique::Varint, PhysicalLevelTechnique::FastPfor] {
        for use_morton in [true, false] {
            options.push(EncodeOptions {
                physical_technique,
                use_morton,
                ..Default::default()
            })
        }
    }
    options
}

fn encode(geometries: &[Geometry], options: &EncodeOptions) -> Result<EncodedGeometryColumn> {
    encode_geometry_column(geometries, options, SortSettings::default(), &mut NoopObserver)
}

fn read_column(encoded: &EncodedGeometryColumn) -> Result<GeometryColumn> {
    let mut cursor = Cursor::new(&encoded.data);
    let column = decode_geometry_column(&mut cursor, encoded.num_streams)?;
    assert!(cursor.is_empty());
    Ok(column)
}

#[test]
fn example() -> Result<()> {
    let geometries = example_column();
    let encoded = encode(&geometries, &EncodeOptions::default())?;
    assert_eq!(encoded.max_vertex_value, 4);

    let column = read_column(&encoded)?;
    // the ring is stored without its closing vertex
    assert_eq!(column.num_parts, Some(vec![1]));
    assert_eq!(column.num_rings, Some(vec![3, 4]));
    assert_eq!(column.num_geometries, None);
    assert_eq!(decode_geometry(&column)?, geometries);
    Ok(())
}

#[test]
fn sequential_roundtrip() -> Result<()> {
    for (name, geometries) in columns() {
        for options in options() {
            let encoded = encode(&geometries, &options)?;
            let column = read_column(&encoded)?;
            assert_eq!(decode_geometry(&column)?, geometries, "{} {:?}", name, options);
        }
    }
    Ok(())
}

#[test]
fn random_access_matches_sequential() -> Result<()> {
    for (name, geometries) in columns() {
        for options in options() {
            let encoded = encode(&geometries, &options)?;
            let mut cursor = Cursor::new(&encoded.data);
            let vector =
                decode_to_random_access_format(&mut cursor, encoded.num_streams, geometries.len())?;
            assert!(cursor.is_empty());
            assert_eq!(vector.len(), geometries.len());

            let sequential = decode_geometry(&read_column(&encoded)?)?;
            assert_eq!(vector.to_geometries()?, sequential, "{} {:?}", name, options);
            for (index, geometry) in geometries.iter().enumerate().rev() {
                assert_eq!(vector.geometry_type(index), Some(geometry.geometry_type()));
                assert_eq!(&vector.get_geometry(index)?, geometry, "{} {}", name, index);
            }
            assert!(vector.get_geometry(geometries.len()).is_err());
        }
    }
    Ok(())
}

#[test]
fn const_geometry_types() -> Result<()> {
    let geometries = points();
    let encoded = encode(&geometries, &EncodeOptions::default())?;
    let mut cursor = Cursor::new(&encoded.data);
    let vector = decode_to_random_access_format(&mut cursor, encoded.num_streams, 4)?;
    assert!(matches!(vector.geometry_types(), GeometryTypes::Const(_)));
    Ok(())
}

#[test]
fn repeated_vertices_use_a_dictionary() -> Result<()> {
    // an 8x8 grid with a spacing of 1000, every vertex used 30 times in a scattered order
    let points = (0..64 * 30)
        .map(|i| (i * 37) % 64)
        .map(|cell| v((cell % 8) * 1000, (cell / 8) * 1000))
        .collect::<Vec<_>>();
    let geometries = vec![Geometry::MultiPoint(points)];
    for options in options() {
        let encoded = encode(&geometries, &options)?;
        let column = read_column(&encoded)?;
        assert!(column.vertex_offsets.is_some(), "{:?}", options);
        assert_eq!(column.vertex_buffer.len(), 64 * 2);
        assert_eq!(decode_geometry(&column)?, geometries);
    }
    Ok(())
}

#[test]
fn distinct_vertices_are_plain() -> Result<()> {
    let line = (0..200).map(|i| v(i, (i * 7) % 13)).collect::<Vec<_>>();
    let geometries = vec![Geometry::LineString(line)];
    let options = EncodeOptions {
        use_morton: false,
        ..Default::default()
    };
    let encoded = encode(&geometries, &options)?;
    assert_eq!(encoded.num_streams, 3);
    let column = read_column(&encoded)?;
    assert_eq!(column.vertex_offsets, None);
    assert_eq!(decode_geometry(&column)?, geometries);
    Ok(())
}

#[test]
fn morton_dictionary() -> Result<()> {
    // a dense square visited in Morton order, four times
    let points = (0..4)
        .flat_map(|_| {
            (0..256u32).map(|code| {
                let x = ZOrderCurve::deinterleave(code, 4);
                let y = ZOrderCurve::deinterleave(code >> 1, 4);
                v(x as i32, y as i32)
            })
        })
        .collect::<Vec<_>>();
    let geometries = vec![Geometry::MultiPoint(points)];
    let encoded = encode(&geometries, &EncodeOptions::default())?;

    let mut cursor = Cursor::new(&encoded.data);
    let vector = decode_to_random_access_format(&mut cursor, encoded.num_streams, 1)?;
    assert!(vector.vertex_offsets().is_some());
    match vector.vertex_buffer() {
        VertexBuffer::Morton { codes, settings } => {
            assert_eq!(codes, &(0..256).collect::<Vec<u32>>());
            assert_eq!(settings.num_bits, 4);
            assert_eq!(settings.coordinate_shift, 0);
        }
        other => panic!("expected Morton codes but got {:?}", other),
    }
    assert_eq!(vector.to_geometries()?, geometries);
    Ok(())
}

#[test]
fn wide_coordinates() -> Result<()> {
    // more than 16 bits per axis rule out the vertex dictionaries
    let geometries = vec![
        Geometry::Point(v(-100_000, 3)),
        Geometry::Point(v(250_000, 3)),
        Geometry::Point(v(-100_000, 3)),
    ];
    for options in options() {
        let encoded = encode(&geometries, &options)?;
        assert_eq!(encoded.max_vertex_value, 250_000);
        let column = read_column(&encoded)?;
        assert_eq!(column.vertex_offsets, None);
        assert_eq!(decode_geometry(&column)?, geometries);
    }
    Ok(())
}

#[test]
fn sorted_points() -> Result<()> {
    let geometries = vec![
        Geometry::Point(v(1, 0)),
        Geometry::Point(v(1, 1)),
        Geometry::Point(v(0, 0)),
        Geometry::Point(v(0, 1)),
    ];
    let settings = SortSettings {
        is_sortable: true,
        feature_ids: vec![10, 11, 12, 13],
    };
    let encoded = encode_geometry_column(
        &geometries,
        &EncodeOptions::default(),
        settings,
        &mut NoopObserver,
    )?;
    assert!(encoded.sorted);
    assert_eq!(encoded.feature_ids, vec![12, 13, 11, 10]);

    let decoded = decode_geometry(&read_column(&encoded)?)?;
    let expected = [2, 3, 1, 0]
        .iter()
        .map(|index| geometries[*index].clone())
        .collect::<Vec<_>>();
    assert_eq!(decoded, expected);
    Ok(())
}

#[test]
fn unsortable_columns_keep_their_order() -> Result<()> {
    let geometries = example_column();
    let settings = SortSettings {
        is_sortable: true,
        feature_ids: vec![3, 2, 1],
    };
    let encoded = encode_geometry_column(
        &geometries,
        &EncodeOptions::default(),
        settings,
        &mut NoopObserver,
    )?;
    assert!(!encoded.sorted);
    assert_eq!(encoded.feature_ids, vec![3, 2, 1]);
    assert_eq!(decode_geometry(&read_column(&encoded)?)?, geometries);
    Ok(())
}

#[test]
fn empty_column() {
    assert!(encode(&[], &EncodeOptions::default()).is_err());
}
