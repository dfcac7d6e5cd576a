use crate::encoding::zigzag;

/// A native integer type that can be carried by an integer stream.
///
/// Streams store every value as an unsigned word; this trait is the bridge between the
/// logical value (`i32` or `i64`) and that word, either reinterpreted bit-for-bit (`to_raw`)
/// or zigzag mapped (`zigzag`).
pub trait NativeInteger:
    Sized + Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    /// The number of bits of this type
    const BITS: u32;

    /// The bits of this value zero-extended to a `u64`
    fn to_raw(self) -> u64;

    /// The inverse of [`NativeInteger::to_raw`]; higher bits are discarded.
    fn from_raw(raw: u64) -> Self;

    fn zigzag(self) -> u64;

    fn from_zigzag(raw: u64) -> Self;

    fn from_i32(value: i32) -> Self;

    fn wrapping_add(self, other: Self) -> Self;

    fn wrapping_sub(self, other: Self) -> Self;
}

macro_rules! native {
    ($type:ty, $unsigned:ty, $encode:path, $decode:path) => {
        impl NativeInteger for $type {
            const BITS: u32 = <$type>::BITS;

            #[inline]
            fn to_raw(self) -> u64 {
                self as $unsigned as u64
            }

            #[inline]
            fn from_raw(raw: u64) -> Self {
                raw as $unsigned as $type
            }

            #[inline]
            fn zigzag(self) -> u64 {
                $encode(self) as u64
            }

            #[inline]
            fn from_zigzag(raw: u64) -> Self {
                $decode(raw as $unsigned)
            }

            #[inline]
            fn from_i32(value: i32) -> Self {
                value as $type
            }

            #[inline]
            fn wrapping_add(self, other: Self) -> Self {
                <$type>::wrapping_add(self, other)
            }

            #[inline]
            fn wrapping_sub(self, other: Self) -> Self {
                <$type>::wrapping_sub(self, other)
            }
        }
    };
}

native!(i32, u32, zigzag::encode_i32, zigzag::decode_i32);
native!(i64, u64, zigzag::encode_i64, zigzag::decode_i64);
