use super::{CurveParameters, SpaceFillingCurve};
use crate::error::Result;
use crate::geometry::Vertex;

/// The Z-order (Morton) curve: the bits of `x` and `y` interleaved, `x` in the even bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZOrderCurve {
    parameters: CurveParameters,
}

impl ZOrderCurve {
    pub fn try_new(min: i32, max: i32) -> Result<Self> {
        Ok(Self {
            parameters: CurveParameters::try_new(min, max)?,
        })
    }

    /// Interleaves the lowest `num_bits` of `x` and `y`.
    #[inline]
    pub fn interleave(x: u32, y: u32, num_bits: u32) -> u32 {
        let mut code = 0u64;
        for i in 0..num_bits {
            code |= ((x as u64) & (1 << i)) << i | ((y as u64) & (1 << i)) << (i + 1);
        }
        code as u32
    }

    /// Collects the `num_bits` even bits of `code`.
    #[inline]
    pub fn deinterleave(code: u32, num_bits: u32) -> u32 {
        let mut coordinate = 0;
        for i in 0..num_bits.min(16) {
            coordinate |= (code & (1 << (2 * i))) >> i;
        }
        coordinate
    }

    /// The inverse of [`SpaceFillingCurve::encode`] for a curve of `num_bits` and
    /// `coordinate_shift`.
    pub fn decode(code: u32, num_bits: u32, coordinate_shift: u32) -> Vertex {
        let shift = coordinate_shift as i64;
        let x = Self::deinterleave(code, num_bits) as i64 - shift;
        let y = Self::deinterleave(code >> 1, num_bits) as i64 - shift;
        Vertex::new(x as i32, y as i32)
    }
}

impl SpaceFillingCurve for ZOrderCurve {
    fn parameters(&self) -> &CurveParameters {
        &self.parameters
    }

    fn encode(&self, vertex: Vertex) -> u32 {
        let (x, y) = self.parameters.shift(vertex);
        Self::interleave(x, y, self.parameters.num_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn interleaves() -> Result<()> {
        let curve = ZOrderCurve::try_new(0, 7)?;
        // x = 0b011, y = 0b101 => y2 x2 y1 x1 y0 x0 = 1 0 0 1 1 1
        assert_eq!(curve.encode(Vertex::new(3, 5)), 0b100111);
        assert_eq!(curve.encode(Vertex::new(1, 0)), 1);
        assert_eq!(curve.encode(Vertex::new(0, 1)), 2);
        assert_eq!(ZOrderCurve::decode(0b100111, 3, 0), Vertex::new(3, 5));
        Ok(())
    }

    #[test]
    fn shifted() -> Result<()> {
        let curve = ZOrderCurve::try_new(-4, 3)?;
        assert_eq!(curve.coordinate_shift(), 4);
        assert_eq!(curve.encode(Vertex::new(-4, -4)), 0);
        let code = curve.encode(Vertex::new(-1, 2));
        assert_eq!(
            ZOrderCurve::decode(code, curve.num_bits(), curve.coordinate_shift()),
            Vertex::new(-1, 2)
        );
        Ok(())
    }

    #[test]
    fn inverse_random() -> Result<()> {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let min = rng.gen_range(-30_000..0);
            let max = rng.gen_range(0..30_000);
            let curve = ZOrderCurve::try_new(min, max)?;
            for _ in 0..100 {
                let vertex = Vertex::new(rng.gen_range(min..=max), rng.gen_range(min..=max));
                let code = curve.encode(vertex);
                let decoded =
                    ZOrderCurve::decode(code, curve.num_bits(), curve.coordinate_shift());
                assert_eq!(decoded, vertex);
            }
        }
        Ok(())
    }

    #[test]
    fn monotonic_on_axes() -> Result<()> {
        let curve = ZOrderCurve::try_new(0, 1000)?;
        let codes = (0..1000)
            .map(|x| curve.encode(Vertex::new(x, 0)))
            .collect::<Vec<_>>();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
        Ok(())
    }
}
