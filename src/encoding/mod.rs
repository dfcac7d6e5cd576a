pub mod byte_rle;
pub mod delta;
pub mod fastpfor;
pub mod rle;
pub mod uleb128;
pub mod zigzag;

/// Returns the number of bits needed to represent `value`.
#[inline]
pub fn get_bit_width(value: u64) -> u32 {
    64 - value.leading_zeros()
}

/// Returns the ceil of value/8
#[inline]
pub fn ceil8(value: usize) -> usize {
    value / 8 + ((value % 8 != 0) as usize)
}
