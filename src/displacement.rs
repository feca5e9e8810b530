//! Displacement and slope map extraction from the IFFT output.

use crate::field::Field;
use crate::time_spectrum::SpectrumTexel;

/// Decodes the spatial-domain transform output into the world-space
/// displacement field and derives the slope field from it.
///
/// The slope field stores physical `[∂h/∂x, ∂h/∂z]` per cell; consumers
/// reconstruct the surface normal as `normalize(-sx, 1, -sz)`.
#[derive(Debug)]
pub struct DisplacementMaps {
    displacement: Field<[f32; 3]>,
    slope: Field<[f32; 2]>,
}

impl DisplacementMaps {
    pub fn new(resolution: usize) -> Result<Self, String> {
        Ok(Self {
            displacement: Field::new(resolution)?,
            slope: Field::new(resolution)?,
        })
    }

    /// Take the real parts of the three spatial channels and assemble the
    /// per-cell `[x offset, height, z offset]` vector. Choppiness was already
    /// applied when the spectral channels were built; it is not reapplied.
    pub fn unpack(&mut self, spatial: &Field<SpectrumTexel>) -> Result<(), String> {
        let n = self.displacement.resolution();
        if spatial.resolution() != n {
            return Err(format!(
                "displacement maps are {0}x{0} but IFFT output is {1}x{1}",
                n,
                spatial.resolution()
            ));
        }

        for (offset, texel) in self
            .displacement
            .as_mut_slice()
            .iter_mut()
            .zip(spatial.as_slice())
        {
            *offset = [texel.disp_x.re, texel.height.re, texel.disp_z.re];
        }
        Ok(())
    }

    /// Central-difference gradient of the height channel. Neighbor lookups
    /// wrap toroidally, matching the periodic spectral field, so the patch
    /// tiles seamlessly. The difference over two cells is divided by
    /// 2·(L/N) to yield physical slope.
    pub fn compute_slope(&mut self, ocean_size_m: f32) {
        let n = self.displacement.resolution();
        let inv_step = n as f32 / (2.0 * ocean_size_m);

        for y in 0..n {
            let up = (y + n - 1) % n;
            let down = (y + 1) % n;
            for x in 0..n {
                let left = (x + n - 1) % n;
                let right = (x + 1) % n;

                let sx = (self.displacement.get(right, y)[1]
                    - self.displacement.get(left, y)[1])
                    * inv_step;
                let sz = (self.displacement.get(x, down)[1]
                    - self.displacement.get(x, up)[1])
                    * inv_step;
                self.slope.set(x, y, [sx, sz]);
            }
        }
    }

    pub fn displacement(&self) -> &Field<[f32; 3]> {
        &self.displacement
    }

    pub fn slope(&self) -> &Field<[f32; 2]> {
        &self.slope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex32;

    #[test]
    fn test_unpack_takes_real_parts() {
        let n = 4;
        let mut spatial: Field<SpectrumTexel> = Field::new(n).unwrap();
        spatial.set(
            2,
            1,
            SpectrumTexel {
                height: Complex32::new(3.0, 9.0),
                disp_x: Complex32::new(1.0, 9.0),
                disp_z: Complex32::new(2.0, 9.0),
            },
        );

        let mut maps = DisplacementMaps::new(n).unwrap();
        maps.unpack(&spatial).unwrap();
        assert_eq!(maps.displacement().get(2, 1), [1.0, 3.0, 2.0]);
        assert_eq!(maps.displacement().get(0, 0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_slope_wraps_toroidally() {
        // A single-cell bump at (0, 0) must be visible from the far edge
        // through the wrapped neighbor lookup.
        let n = 8;
        let l = 16.0;
        let mut spatial: Field<SpectrumTexel> = Field::new(n).unwrap();
        spatial.set(
            0,
            0,
            SpectrumTexel {
                height: Complex32::new(1.0, 0.0),
                disp_x: Complex32::new(0.0, 0.0),
                disp_z: Complex32::new(0.0, 0.0),
            },
        );

        let mut maps = DisplacementMaps::new(n).unwrap();
        maps.unpack(&spatial).unwrap();
        maps.compute_slope(l);

        let scale = n as f32 / (2.0 * l);
        // (N-1, 0) sees the bump as its right neighbor via the wrap.
        assert!((maps.slope().get(n - 1, 0)[0] - scale).abs() < 1e-6);
        // (1, 0) sees it as its left neighbor, with opposite sign.
        assert!((maps.slope().get(1, 0)[0] + scale).abs() < 1e-6);
        // Same along z through the vertical wrap.
        assert!((maps.slope().get(0, n - 1)[1] - scale).abs() < 1e-6);
        // Far from the bump the surface is flat.
        assert_eq!(maps.slope().get(4, 4), [0.0, 0.0]);
    }

    #[test]
    fn test_unpack_rejects_mismatched_input() {
        let spatial: Field<SpectrumTexel> = Field::new(8).unwrap();
        let mut maps = DisplacementMaps::new(4).unwrap();
        assert!(maps.unpack(&spatial).is_err());
    }
}
