use super::Cursor;
use crate::error::Result;
use crate::metadata::StreamMetadata;

/// A stream whose metadata has been read but whose payload has not been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStream<'a> {
    pub metadata: StreamMetadata,
    pub payload: &'a [u8],
}

impl<'a> RawStream<'a> {
    /// A cursor positioned at the start of the payload, as expected by the stream decoders.
    pub fn cursor(&self) -> Cursor<'a> {
        Cursor::new(self.payload)
    }
}

/// Reads the metadata of the next `num_streams` streams of `cursor`, skipping over their
/// payloads.
pub fn scan_streams<'a>(cursor: &mut Cursor<'a>, num_streams: usize) -> Result<Vec<RawStream<'a>>> {
    (0..num_streams)
        .map(|_| {
            let metadata = StreamMetadata::read(cursor)?;
            let payload = cursor.take(metadata.byte_length as usize)?;
            Ok(RawStream { metadata, payload })
        })
        .collect()
}

/// Decodes independent integer streams on the rayon thread pool.
#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub fn decode_int_streams_par(streams: &[RawStream], is_signed: bool) -> Result<Vec<Vec<i32>>> {
    use rayon::prelude::*;

    streams
        .par_iter()
        .map(|stream| super::decode_int_stream(&mut stream.cursor(), &stream.metadata, is_signed))
        .collect()
}
