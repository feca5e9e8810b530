//! 2D inverse FFT over the three spectral channels.
//!
//! Radix-2 Stockham autosort transform: log2(N) horizontal butterfly passes
//! followed by log2(N) vertical passes, ping-ponging between two scratch
//! fields. Each pass reads only the previous pass's fully written buffer, so
//! the pass sequence forms the same barrier chain the GPU dispatch order did.
//! No bit-reversal step is needed; the 1/N² normalization is applied exactly
//! once after the final pass.

use std::f32::consts::PI;

use num_complex::Complex32;

use crate::field::{Field, PingPong};
use crate::time_spectrum::SpectrumTexel;

#[derive(Debug)]
pub struct Ifft2d {
    resolution: usize,
    stages: u32,
    scratch: PingPong<SpectrumTexel>,
}

impl Ifft2d {
    pub fn new(resolution: usize) -> Result<Self, String> {
        if resolution < 2 || !resolution.is_power_of_two() {
            return Err(format!(
                "IFFT resolution must be a power of two >= 2, got {}",
                resolution
            ));
        }
        Ok(Self {
            resolution,
            stages: resolution.trailing_zeros(),
            scratch: PingPong::new(resolution)?,
        })
    }

    /// Transform the frequency-domain field to the spatial domain. The
    /// result lives in this engine's front scratch buffer until the next
    /// `transform` call; read it through [`Ifft2d::output`].
    pub fn transform(&mut self, input: &Field<SpectrumTexel>) -> Result<(), String> {
        if input.resolution() != self.resolution {
            return Err(format!(
                "IFFT engine is {0}x{0} but input is {1}x{1}",
                self.resolution,
                input.resolution()
            ));
        }

        let mut first = true;
        for stage in 0..self.stages {
            let subseq = 1usize << stage;
            {
                let (front, back) = self.scratch.split();
                let src = if first { input } else { front };
                horizontal_pass(src, back, subseq);
            }
            self.scratch.swap();
            first = false;
        }

        for stage in 0..self.stages {
            let subseq = 1usize << stage;
            {
                let (front, back) = self.scratch.split();
                vertical_pass(front, back, subseq);
            }
            self.scratch.swap();
        }

        // Inverse-transform normalization, folded in once at the end. A
        // unit-amplitude single-bin spectrum therefore comes out with
        // spatial amplitude exactly 1/N².
        let norm = 1.0 / (self.resolution * self.resolution) as f32;
        for texel in self.scratch.front_mut().as_mut_slice() {
            texel.height = texel.height * norm;
            texel.disp_x = texel.disp_x * norm;
            texel.disp_z = texel.disp_z * norm;
        }

        Ok(())
    }

    /// Spatial-domain output of the most recent transform.
    pub fn output(&self) -> &Field<SpectrumTexel> {
        self.scratch.front()
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }
}

/// One butterfly: combine `a` with the twiddled `b` across all channels.
fn butterfly(
    a: SpectrumTexel,
    b: SpectrumTexel,
    twiddle: Complex32,
) -> (SpectrumTexel, SpectrumTexel) {
    let bh = twiddle * b.height;
    let bx = twiddle * b.disp_x;
    let bz = twiddle * b.disp_z;
    (
        SpectrumTexel {
            height: a.height + bh,
            disp_x: a.disp_x + bx,
            disp_z: a.disp_z + bz,
        },
        SpectrumTexel {
            height: a.height - bh,
            disp_x: a.disp_x - bx,
            disp_z: a.disp_z - bz,
        },
    )
}

/// One Stockham pass over every row. `subseq` is the subsequence count p of
/// this stage (1, 2, .., N/2); thread t of a row combines elements t and
/// t + N/2 into positions 2(t-k)+k and 2(t-k)+k+p, k = t mod p, with the
/// inverse-transform twiddle e^{+iπk/p}.
fn horizontal_pass(src: &Field<SpectrumTexel>, dst: &mut Field<SpectrumTexel>, subseq: usize) {
    let n = src.resolution();
    let half = n / 2;
    for y in 0..n {
        for t in 0..half {
            let k = t % subseq;
            let twiddle = Complex32::from_polar(1.0, PI * k as f32 / subseq as f32);
            let (even, odd) = butterfly(src.get(t, y), src.get(t + half, y), twiddle);
            let base = 2 * (t - k) + k;
            dst.set(base, y, even);
            dst.set(base + subseq, y, odd);
        }
    }
}

/// Same pass along columns.
fn vertical_pass(src: &Field<SpectrumTexel>, dst: &mut Field<SpectrumTexel>, subseq: usize) {
    let n = src.resolution();
    let half = n / 2;
    for t in 0..half {
        let k = t % subseq;
        let twiddle = Complex32::from_polar(1.0, PI * k as f32 / subseq as f32);
        let base = 2 * (t - k) + k;
        for x in 0..n {
            let (even, odd) = butterfly(src.get(x, t), src.get(x, t + half), twiddle);
            dst.set(x, base, even);
            dst.set(x, base + subseq, odd);
        }
    }
}
