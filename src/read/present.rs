use super::Cursor;
use crate::encoding::byte_rle::{decode_bool, PresentVector};
use crate::error::{Error, Result};
use crate::metadata::{PhysicalStreamType, StreamMetadata};

/// Decodes a PRESENT stream whose metadata was just read from `cursor`.
pub fn decode_present_stream(
    cursor: &mut Cursor,
    metadata: &StreamMetadata,
) -> Result<PresentVector> {
    if metadata.physical_stream_type != PhysicalStreamType::Present {
        return Err(Error::unsupported(format!(
            "Expected a present stream but found a {:?} stream",
            metadata.physical_stream_type
        )));
    }
    let payload = cursor.take(metadata.byte_length as usize)?;
    let mut payload = Cursor::new(payload);
    let present = decode_bool(&mut payload, metadata.num_values as usize)?;
    if !payload.is_empty() {
        return Err(oos!(
            "A present stream of {} values leaves {} bytes unread",
            metadata.num_values,
            payload.remaining()
        ));
    }
    Ok(present)
}
