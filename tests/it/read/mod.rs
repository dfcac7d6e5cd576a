use fastpfor::{AnyLenCodec, FastPFor256};
use rand::{Rng, SeedableRng};

use mlt_codec::curve::{SpaceFillingCurve, ZOrderCurve};
use mlt_codec::error::{Error, Result};
use mlt_codec::metadata::{
    DictionaryType, LengthType, LogicalEncoding, LogicalStreamType, PhysicalLevelTechnique,
    PhysicalStreamType, RleMetadata, StreamMetadata, VectorType,
};
use mlt_codec::read::{
    decode_const_int_stream, decode_int_stream, decode_length_stream_to_offset_buffer,
    decode_long_stream, decode_nullable_int_stream, decode_nullable_long_stream,
    decode_present_stream, scan_streams, Cursor,
};
use mlt_codec::write::{
    encode_int_stream, encode_long_stream, encode_present_stream, EncodeOptions,
    IntegerEncodingOption,
};

use super::v;

const ENCODINGS: [IntegerEncodingOption; 5] = [
    IntegerEncodingOption::Auto,
    IntegerEncodingOption::Plain,
    IntegerEncodingOption::Delta,
    IntegerEncodingOption::Rle,
    IntegerEncodingOption::DeltaRle,
];

fn options(
    physical_technique: PhysicalLevelTechnique,
    integer_encoding: IntegerEncodingOption,
) -> EncodeOptions {
    EncodeOptions {
        physical_technique,
        integer_encoding,
        ..Default::default()
    }
}

fn data() -> Option<LogicalStreamType> {
    Some(LogicalStreamType::Dictionary(DictionaryType::None))
}

fn write_ints(values: &[i32], is_signed: bool, options: &EncodeOptions) -> Result<Vec<u8>> {
    Ok(encode_int_stream(values, is_signed, PhysicalStreamType::Data, data(), options)?.to_bytes())
}

fn read_ints(bytes: &[u8], is_signed: bool) -> Result<Vec<i32>> {
    let mut cursor = Cursor::new(bytes);
    let metadata = StreamMetadata::read(&mut cursor)?;
    let values = decode_int_stream(&mut cursor, &metadata, is_signed)?;
    assert!(cursor.is_empty());
    Ok(values)
}

#[test]
fn int_roundtrip() -> Result<()> {
    let columns: Vec<Vec<i32>> = vec![
        vec![],
        vec![0],
        vec![-1],
        vec![i32::MIN],
        vec![0, -1, i32::MIN, i32::MAX],
        vec![5; 100],
        (0..300).collect(),
        (0..300).map(|i| i / 7).collect(),
        (0..300).map(|i| (i * 7919) % 1013 - 500).collect(),
    ];
    for physical in [PhysicalLevelTechnique::Varint, PhysicalLevelTechnique::FastPfor] {
        for encoding in ENCODINGS {
            let options = options(physical, encoding);
            for values in &columns {
                for is_signed in [true, false] {
                    let bytes = write_ints(values, is_signed, &options)?;
                    assert_eq!(&read_ints(&bytes, is_signed)?, values, "{:?}", options);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn long_roundtrip() -> Result<()> {
    let values = vec![0, -1, i64::MIN, i64::MAX, 1 << 50, -(1 << 50), 7, 7, 7];
    for encoding in ENCODINGS {
        for is_signed in [true, false] {
            let options = options(PhysicalLevelTechnique::Varint, encoding);
            let stream =
                encode_long_stream(&values, is_signed, PhysicalStreamType::Data, data(), &options)?;
            let bytes = stream.to_bytes();
            let mut cursor = Cursor::new(&bytes);
            let metadata = StreamMetadata::read(&mut cursor)?;
            assert_eq!(decode_long_stream(&mut cursor, &metadata, is_signed)?, values);
        }
    }
    Ok(())
}

#[test]
fn constant_runs_are_forced_to_rle() -> Result<()> {
    let bytes = write_ints(&[42; 1000], true, &EncodeOptions::default())?;
    let mut cursor = Cursor::new(&bytes);
    let metadata = StreamMetadata::read(&mut cursor)?;
    assert!(matches!(metadata.logical_encoding, LogicalEncoding::Rle(_)));
    assert_eq!(metadata.vector_type(), VectorType::Const);
    assert_eq!(decode_const_int_stream(&mut cursor, &metadata, true)?, 42);
    Ok(())
}

#[test]
fn sequences() -> Result<()> {
    let values = (10..1010).collect::<Vec<i32>>();
    let bytes = write_ints(&values, false, &EncodeOptions::default())?;
    let mut cursor = Cursor::new(&bytes);
    let metadata = StreamMetadata::read(&mut cursor)?;
    // the first delta (10) differs from the others (1)
    assert_eq!(metadata.vector_type(), VectorType::Flat);
    assert_eq!(decode_int_stream(&mut cursor, &metadata, false)?, values);
    Ok(())
}

#[test]
fn offsets_are_monotonic() -> Result<()> {
    let lengths = [3, 0, 5, 5, 5, 1, 2];
    for physical in [PhysicalLevelTechnique::Varint, PhysicalLevelTechnique::FastPfor] {
        for encoding in ENCODINGS {
            let options = options(physical, encoding);
            let bytes = encode_int_stream(
                &lengths,
                false,
                PhysicalStreamType::Length,
                Some(LogicalStreamType::Length(LengthType::Parts)),
                &options,
            )?
            .to_bytes();
            let mut cursor = Cursor::new(&bytes);
            let metadata = StreamMetadata::read(&mut cursor)?;
            let offsets = decode_length_stream_to_offset_buffer(&mut cursor, &metadata)?;
            assert_eq!(offsets, vec![0, 3, 3, 8, 13, 18, 19, 21], "{:?}", options);
        }
    }
    Ok(())
}

#[test]
fn nullable_padding() -> Result<()> {
    let present = [true, false, false, true, true, false, true, false, false, true];
    let dense = [-4, -4, 9, 9, 9];
    for encoding in ENCODINGS {
        let options = options(PhysicalLevelTechnique::Varint, encoding);
        let mut bytes = encode_present_stream(present).to_bytes();
        bytes.extend(write_ints(&dense, true, &options)?);

        let mut cursor = Cursor::new(&bytes);
        let metadata = StreamMetadata::read(&mut cursor)?;
        let bitmap = decode_present_stream(&mut cursor, &metadata)?;
        assert_eq!(bitmap.count_set(), dense.len());

        let metadata = StreamMetadata::read(&mut cursor)?;
        let values = decode_nullable_int_stream(&mut cursor, &metadata, true, &bitmap)?;
        assert_eq!(values, vec![-4, 0, 0, -4, 9, 0, 9, 0, 0, 9], "{:?}", encoding);
        assert!(cursor.is_empty());
    }
    Ok(())
}

#[test]
fn nullable_long() -> Result<()> {
    let present = [false, true, true];
    let bytes = encode_long_stream(
        &[i64::MAX, 3],
        false,
        PhysicalStreamType::Data,
        data(),
        &EncodeOptions::default(),
    )?
    .to_bytes();
    let bitmap = present.iter().copied().collect();

    let mut cursor = Cursor::new(&bytes);
    let metadata = StreamMetadata::read(&mut cursor)?;
    let values = decode_nullable_long_stream(&mut cursor, &metadata, false, &bitmap)?;
    assert_eq!(values, vec![0, i64::MAX, 3]);
    Ok(())
}

#[test]
fn nullable_count_mismatch() -> Result<()> {
    let bytes = write_ints(&[1, 2, 3], false, &EncodeOptions::default())?;
    let bitmap = [true, false, true].iter().copied().collect();
    let mut cursor = Cursor::new(&bytes);
    let metadata = StreamMetadata::read(&mut cursor)?;
    let result = decode_nullable_int_stream(&mut cursor, &metadata, false, &bitmap);
    assert!(matches!(result, Err(Error::OutOfSpec(_))));
    Ok(())
}

#[test]
fn truncated_stream() -> Result<()> {
    let mut bytes = write_ints(&(0..100).collect::<Vec<_>>(), false, &EncodeOptions::default())?;
    bytes.pop();
    let mut cursor = Cursor::new(&bytes);
    let metadata = StreamMetadata::read(&mut cursor)?;
    let result = decode_int_stream(&mut cursor, &metadata, false);
    assert!(matches!(result, Err(Error::OutOfBounds { .. })));
    Ok(())
}

#[test]
fn scan_then_decode() -> Result<()> {
    let first = (0..50).collect::<Vec<i32>>();
    let second = vec![-7, 7, -7];
    let mut bytes = write_ints(&first, false, &EncodeOptions::default())?;
    bytes.extend(write_ints(&second, true, &EncodeOptions::default())?);

    let mut cursor = Cursor::new(&bytes);
    let streams = scan_streams(&mut cursor, 2)?;
    assert!(cursor.is_empty());
    assert_eq!(
        decode_int_stream(&mut streams[0].cursor(), &streams[0].metadata, false)?,
        first
    );
    assert_eq!(
        decode_int_stream(&mut streams[1].cursor(), &streams[1].metadata, true)?,
        second
    );
    assert!(scan_streams(&mut Cursor::new(&bytes), 3).is_err());
    Ok(())
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_decode() -> Result<()> {
    use mlt_codec::read::decode_int_streams_par;

    let columns = (0..8)
        .map(|i| (0..100 * i).map(|x| x * i).collect::<Vec<i32>>())
        .collect::<Vec<_>>();
    let mut bytes = vec![];
    for values in &columns {
        bytes.extend(write_ints(values, true, &EncodeOptions::default())?);
    }
    let streams = scan_streams(&mut Cursor::new(&bytes), columns.len())?;
    assert_eq!(decode_int_streams_par(&streams, true)?, columns);
    Ok(())
}

#[test]
fn morton_inverse() -> Result<()> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    for _ in 0..1000 {
        let min = rng.gen_range(-30_000..0);
        let max = rng.gen_range(0..30_000);
        let curve = ZOrderCurve::try_new(min, max)?;
        let vertex = v(rng.gen_range(min..=max), rng.gen_range(min..=max));
        let code = curve.encode(vertex);
        assert_eq!(
            ZOrderCurve::decode(code, curve.num_bits(), curve.coordinate_shift()),
            vertex
        );
    }
    Ok(())
}

fn be_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|word| u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
        .collect()
}

#[test]
fn fastpfor_payload_is_composite_codec() -> Result<()> {
    let values = (0..257).map(|i| (i * 31) % 1000).collect::<Vec<i32>>();
    let options = options(PhysicalLevelTechnique::FastPfor, IntegerEncodingOption::Plain);
    let stream = encode_int_stream(&values, false, PhysicalStreamType::Data, data(), &options)?;
    assert_eq!(stream.payload.len() % 4, 0);

    let mut decoded = vec![];
    FastPFor256::default()
        .decode(&be_words(&stream.payload), &mut decoded, Some(257))
        .unwrap();
    let expected = values.iter().map(|v| *v as u32).collect::<Vec<_>>();
    assert_eq!(decoded, expected);
    Ok(())
}

#[test]
fn reads_fastpfor_codec_output() -> Result<()> {
    let words = (0..600u32).map(|i| i * 3).collect::<Vec<_>>();
    let mut compressed = vec![];
    FastPFor256::default().encode(&words, &mut compressed).unwrap();
    let payload = compressed
        .iter()
        .flat_map(|word| word.to_be_bytes())
        .collect::<Vec<_>>();

    let metadata = StreamMetadata {
        physical_stream_type: PhysicalStreamType::Data,
        logical_stream_type: data(),
        logical_encoding: LogicalEncoding::Plain,
        physical_level_technique: PhysicalLevelTechnique::FastPfor,
        num_values: words.len() as u32,
        byte_length: payload.len() as u32,
    };
    let mut bytes = metadata.encode();
    bytes.extend(payload);

    let values = read_ints(&bytes, false)?;
    assert_eq!(values, words.iter().map(|w| *w as i32).collect::<Vec<_>>());
    Ok(())
}

fn stream_with_counts(
    logical_encoding: LogicalEncoding,
    physical_level_technique: PhysicalLevelTechnique,
    num_values: u32,
    payload: &[u8],
) -> Vec<u8> {
    let metadata = StreamMetadata {
        physical_stream_type: PhysicalStreamType::Data,
        logical_stream_type: data(),
        logical_encoding,
        physical_level_technique,
        num_values,
        byte_length: payload.len() as u32,
    };
    let mut bytes = metadata.encode();
    bytes.extend_from_slice(payload);
    bytes
}

#[test]
fn declared_counts_beyond_the_payload() -> Result<()> {
    // a single run of 5 claiming u32::MAX values
    let rle = LogicalEncoding::Rle(RleMetadata {
        runs: 1,
        num_rle_values: u32::MAX,
    });
    let bytes = stream_with_counts(rle, PhysicalLevelTechnique::Varint, 2, &[1, 5]);
    let mut cursor = Cursor::new(&bytes);
    let metadata = StreamMetadata::read(&mut cursor)?;
    let result = decode_long_stream(&mut cursor, &metadata, false);
    assert!(matches!(result, Err(Error::OutOfSpec(_))));

    let bytes = stream_with_counts(
        LogicalEncoding::Plain,
        PhysicalLevelTechnique::Varint,
        u32::MAX,
        &[1, 5],
    );
    assert!(matches!(read_ints(&bytes, false), Err(Error::OutOfBounds { .. })));

    let bytes = stream_with_counts(
        LogicalEncoding::Plain,
        PhysicalLevelTechnique::FastPfor,
        u32::MAX,
        &[0, 0, 0, 0],
    );
    assert!(matches!(read_ints(&bytes, false), Err(Error::OutOfSpec(_))));

    // a present stream claiming u32::MAX flags from a single run
    let mut bytes = encode_present_stream([true; 3]).to_bytes();
    bytes[2] = 0xff;
    bytes.splice(3..3, [0xff, 0xff, 0xff, 0x0f]);
    let mut cursor = Cursor::new(&bytes);
    let metadata = StreamMetadata::read(&mut cursor)?;
    assert_eq!(metadata.num_values, u32::MAX);
    assert!(decode_present_stream(&mut cursor, &metadata).is_err());
    Ok(())
}
