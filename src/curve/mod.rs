//! Space-filling curves mapping 2D vertices to a single integer while preserving locality.
mod hilbert;
mod zorder;

pub use hilbert::HilbertCurve;
pub use zorder::ZOrderCurve;

use crate::encoding::get_bit_width;
use crate::error::Result;
use crate::geometry::Vertex;

/// The largest number of bits per axis whose curve codes fit in a `u32`.
pub const MAX_BITS: u32 = 16;

/// The bit depth and the shift that make the vertices of a `[min, max]` range non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParameters {
    pub num_bits: u32,
    pub coordinate_shift: u32,
}

impl CurveParameters {
    /// Returns the parameters covering every coordinate in `[min, max]`.
    pub fn try_new(min: i32, max: i32) -> Result<Self> {
        if min > max {
            return Err(oos!("A curve range must not be empty but is [{}, {}]", min, max));
        }
        let coordinate_shift = if min < 0 { min.unsigned_abs() } else { 0 };
        let extent = max as i64 + coordinate_shift as i64;
        let num_bits = get_bit_width(extent as u64).max(1);
        if num_bits > MAX_BITS {
            return Err(oos!(
                "A curve over [{}, {}] needs {} bits per axis but at most {} fit in 32 bits",
                min,
                max,
                num_bits,
                MAX_BITS
            ));
        }
        Ok(Self {
            num_bits,
            coordinate_shift,
        })
    }

    /// The vertex translated into the non-negative range of the curve.
    #[inline]
    fn shift(&self, vertex: Vertex) -> (u32, u32) {
        let shift = self.coordinate_shift as i64;
        (
            (vertex.x as i64 + shift) as u32,
            (vertex.y as i64 + shift) as u32,
        )
    }
}

/// A curve over a fixed coordinate range.
pub trait SpaceFillingCurve {
    fn parameters(&self) -> &CurveParameters;

    /// The position of `vertex` on the curve.
    /// `vertex` must lie within the range the curve was created for.
    fn encode(&self, vertex: Vertex) -> u32;

    fn num_bits(&self) -> u32 {
        self.parameters().num_bits
    }

    fn coordinate_shift(&self) -> u32 {
        self.parameters().coordinate_shift
    }
}
