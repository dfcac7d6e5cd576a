use super::{CurveParameters, SpaceFillingCurve};
use crate::error::Result;
use crate::geometry::Vertex;

/// The Hilbert curve, computed with Skilling's transpose algorithm
/// ("Programming the Hilbert curve", 2004).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HilbertCurve {
    parameters: CurveParameters,
}

impl HilbertCurve {
    pub fn try_new(min: i32, max: i32) -> Result<Self> {
        Ok(Self {
            parameters: CurveParameters::try_new(min, max)?,
        })
    }

    /// The index of `(x, y)` on a curve of `bits` per axis.
    pub fn xy_to_index(bits: u32, x: u32, y: u32) -> u32 {
        let mut axes = [x, y];
        axes_to_transpose(bits, &mut axes);
        untranspose(bits, &axes)
    }

    /// The inverse of [`HilbertCurve::xy_to_index`].
    pub fn index_to_xy(bits: u32, index: u32) -> (u32, u32) {
        let mut axes = transpose(bits, index);
        transpose_to_axes(bits, &mut axes);
        (axes[0], axes[1])
    }
}

impl SpaceFillingCurve for HilbertCurve {
    fn parameters(&self) -> &CurveParameters {
        &self.parameters
    }

    fn encode(&self, vertex: Vertex) -> u32 {
        let (x, y) = self.parameters.shift(vertex);
        Self::xy_to_index(self.parameters.num_bits, x, y)
    }
}

fn axes_to_transpose(bits: u32, x: &mut [u32; 2]) {
    let m = 1u32 << (bits - 1);
    // inverse undo
    let mut q = m;
    while q > 1 {
        let p = q - 1;
        for i in 0..2 {
            if x[i] & q != 0 {
                x[0] ^= p;
            } else {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            }
        }
        q >>= 1;
    }
    // gray encode
    x[1] ^= x[0];
    let mut t = 0;
    let mut q = m;
    while q > 1 {
        if x[1] & q != 0 {
            t ^= q - 1;
        }
        q >>= 1;
    }
    x[0] ^= t;
    x[1] ^= t;
}

fn transpose_to_axes(bits: u32, x: &mut [u32; 2]) {
    let n = 2u64 << (bits - 1);
    // gray decode
    let t = x[1] >> 1;
    x[1] ^= x[0];
    x[0] ^= t;
    // undo excess work
    let mut q = 2u64;
    while q != n {
        let p = (q - 1) as u32;
        for i in (0..2).rev() {
            if x[i] & q as u32 != 0 {
                x[0] ^= p;
            } else {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            }
        }
        q <<= 1;
    }
}

fn untranspose(bits: u32, x: &[u32; 2]) -> u32 {
    let mut index = 0u32;
    let mut bit = 2 * bits;
    let mut mask = 1u32 << (bits - 1);
    for _ in 0..bits {
        for axis in x {
            bit -= 1;
            if axis & mask != 0 {
                index |= 1 << bit;
            }
        }
        mask >>= 1;
    }
    index
}

fn transpose(bits: u32, index: u32) -> [u32; 2] {
    let mut x = [0u32; 2];
    for bit in 0..2 * bits {
        if index & (1 << bit) != 0 {
            let axis = (2 * bits - bit - 1) as usize % 2;
            let shift = (bit / 2) % bits;
            x[axis] |= 1 << shift;
        }
    }
    x
}
