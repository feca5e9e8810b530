//! Initial wave spectrum generation from wind and patch size.

use glam::Vec2;

use crate::field::Field;
use crate::params::SimulationConfig;

/// Gravitational acceleration (m/s²), shared with the dispersion relation.
pub const GRAVITY: f32 = 9.81;

/// Small-ripple damping factor l² in the Phillips spectrum. Suppresses
/// capillary-scale waves the grid cannot resolve cleanly.
const RIPPLE_CUTOFF_SQ: f32 = 0.05;

/// Map a grid cell to its wavenumber vector (rad/m).
///
/// Zero frequency sits at cell (0, 0); indices at or above N/2 alias to
/// negative frequencies. This matches the inverse transform's DC-at-origin
/// layout, so no per-cell sign fixup is needed after the IFFT.
pub fn wavenumber(x: usize, y: usize, resolution: usize, ocean_size_m: f32) -> Vec2 {
    let scale = std::f32::consts::TAU / ocean_size_m;
    Vec2::new(
        signed_frequency(x, resolution) as f32 * scale,
        signed_frequency(y, resolution) as f32 * scale,
    )
}

/// Signed integer frequency for grid index `i`: 0, 1, .., N/2-1, -N/2, .., -1.
fn signed_frequency(i: usize, resolution: usize) -> isize {
    if i < resolution / 2 {
        i as isize
    } else {
        i as isize - resolution as isize
    }
}

/// Grid cell holding the mirrored wavenumber -k of cell index `i`.
pub(crate) fn mirror_index(i: usize, resolution: usize) -> usize {
    (resolution - i) % resolution
}

/// Phillips spectral density P(k) for the given wind.
///
/// Amplitude grows with wind alignment ((k̂·ŵ)²) and is cut off above the
/// largest wind-driven wavelength |w|²/g (see the Tessendorf paper).
fn phillips(k: Vec2, wind: Vec2) -> f32 {
    let k_sq = k.length_squared();
    let wind_sq = wind.length_squared();
    if k_sq < 1e-12 || wind_sq < 1e-12 {
        return 0.0;
    }

    let largest_wave = wind_sq / GRAVITY;
    let alignment = (k / k_sq.sqrt()).dot(wind / wind_sq.sqrt());

    (-1.0 / (k_sq * largest_wave * largest_wave)).exp() / (k_sq * k_sq)
        * alignment
        * alignment
        * (-k_sq * RIPPLE_CUTOFF_SQ).exp()
}

/// Produces the static frequency-domain wave amplitude field.
///
/// Fully deterministic in (resolution, ocean size, wind): the statistical
/// model's random degree of freedom lives in the initial phases (see
/// [`crate::phase::PhaseEvolver`]), not here, so regenerating after a
/// parameter change never makes the spectrum pop.
#[derive(Debug, Default)]
pub struct SpectrumGenerator;

impl SpectrumGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build a complete new amplitude field.
    ///
    /// On error nothing is produced, so the caller's previous field stays
    /// valid; swap the result in only on success.
    pub fn generate(&self, config: &SimulationConfig) -> Result<Field<f32>, String> {
        config.validate()?;
        let mut field = Field::new(config.resolution)?;
        self.generate_into(config, &mut field)?;
        Ok(field)
    }

    /// Write the amplitude field into a caller-supplied target in place.
    ///
    /// Fails before touching the target, never mid-write. The caller must
    /// not let any other stage read `target` while this runs.
    pub fn generate_into(
        &self,
        config: &SimulationConfig,
        target: &mut Field<f32>,
    ) -> Result<(), String> {
        config.validate()?;
        if target.resolution() != config.resolution {
            return Err(format!(
                "target field is {}x{0}, expected {1}x{1}",
                target.resolution(),
                config.resolution
            ));
        }

        let n = config.resolution;
        for y in 0..n {
            for x in 0..n {
                let k = wavenumber(x, y, n, config.ocean_size_m);
                // Stored amplitude is sqrt(P/2); the assembler combines the
                // +k and -k halves back into the full spectral energy.
                let amplitude = (0.5 * phillips(k, config.wind)).sqrt();
                target.set(x, y, amplitude);
            }
        }

        // DC term carries no wave energy; a non-zero value here would show
        // up as a net vertical offset of the whole surface.
        target.set(0, 0, 0.0);
        Ok(())
    }
}
