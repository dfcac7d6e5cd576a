//! Zigzag mapping of signed integers onto unsigned ones, so that values of small magnitude
//! have small varints: `0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...`

#[inline]
pub fn encode_i32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

#[inline]
pub fn decode_i32(value: u32) -> i32 {
    (value >> 1) as i32 ^ -((value & 1) as i32)
}

#[inline]
pub fn encode_i64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn decode_i64(value: u64) -> i64 {
    (value >> 1) as i64 ^ -((value & 1) as i64)
}
