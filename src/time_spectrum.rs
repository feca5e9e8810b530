//! Time-varying complex spectrum assembly from amplitude + phase.

use bytemuck::{Pod, Zeroable};
use num_complex::Complex32;

use crate::field::Field;
use crate::spectrum::{mirror_index, wavenumber};

/// One cell of the time-varying spectrum: three complex channels that ride
/// through the inverse FFT together.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SpectrumTexel {
    /// Vertical height channel h(k, t).
    pub height: Complex32,
    /// Horizontal choppiness channel along x: -i·(kx/|k|)·h·choppiness.
    pub disp_x: Complex32,
    /// Horizontal choppiness channel along z: -i·(kz/|k|)·h·choppiness.
    pub disp_z: Complex32,
}

/// Combines the static spectrum with the current phases into the complex
/// spectrum for this tick. Pure function of its inputs; the output buffer is
/// transient and fully rewritten every call.
#[derive(Debug)]
pub struct TimeSpectrumAssembler {
    output: Field<SpectrumTexel>,
}

impl TimeSpectrumAssembler {
    pub fn new(resolution: usize) -> Result<Self, String> {
        Ok(Self {
            output: Field::new(resolution)?,
        })
    }

    /// Per cell: h = s(k)·e^{iφ} + s(-k)·e^{-iφ}, pairing each frequency with
    /// its conjugate mirror so the spatial field comes out real-valued. The
    /// horizontal channels scale h by -i·k̂·choppiness, zero at the DC cell
    /// where k̂ is undefined.
    pub fn assemble(
        &mut self,
        spectrum: &Field<f32>,
        phase: &Field<f32>,
        choppiness: f32,
        ocean_size_m: f32,
    ) -> Result<(), String> {
        let n = self.output.resolution();
        if spectrum.resolution() != n || phase.resolution() != n {
            return Err(format!(
                "assembler is {0}x{0} but spectrum is {1}x{1} and phase {2}x{2}",
                n,
                spectrum.resolution(),
                phase.resolution()
            ));
        }

        for y in 0..n {
            for x in 0..n {
                let rotor = Complex32::from_polar(1.0, phase.get(x, y));
                let amp = spectrum.get(x, y);
                let amp_mirror = spectrum.get(mirror_index(x, n), mirror_index(y, n));

                // The stored amplitudes are real, so the conjugate-mirrored
                // term only needs the mirrored magnitude and a conjugated
                // rotor.
                let height = amp * rotor + amp_mirror * rotor.conj();

                let k = wavenumber(x, y, n, ocean_size_m);
                let k_len = k.length();
                let (disp_x, disp_z) = if k_len > 1e-6 {
                    let steepness = height * Complex32::new(0.0, -choppiness / k_len);
                    (steepness * k.x, steepness * k.y)
                } else {
                    // DC: no horizontal displacement contribution.
                    (Complex32::ZERO, Complex32::ZERO)
                };

                self.output.set(
                    x,
                    y,
                    SpectrumTexel {
                        height,
                        disp_x,
                        disp_z,
                    },
                );
            }
        }
        Ok(())
    }

    pub fn output(&self) -> &Field<SpectrumTexel> {
        &self.output
    }
}
