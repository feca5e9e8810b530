//! Simulation parameters with physical units and documented semantics.

use glam::Vec2;

/// Ocean simulation configuration.
///
/// Mutating `ocean_size_m`, `wind` or `choppiness` at runtime triggers an
/// in-place recompute of the dependent fields; mutating `resolution` rebuilds
/// the whole pipeline (see [`crate::ocean::OceanSystem`]).
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Simulation grid resolution (cells per side). Must be a power of two:
    /// the inverse FFT runs log2(resolution) butterfly passes per axis.
    /// Higher = finer waves, cost grows O(n² log n).
    pub resolution: usize,

    /// World-space size of the simulated ocean patch (meters). This is the
    /// "L" parameter in Tessendorf's paper: larger = broader, lower-frequency
    /// waves since the same resolution covers more area.
    pub ocean_size_m: f32,

    /// Wind vector (m/s). Direction biases the spectrum toward aligned
    /// waves; speed sets the largest-wave cutoff.
    pub wind: Vec2,

    /// Horizontal displacement scale. Higher = sharper wave crests, but more
    /// distortion. Zero disables horizontal displacement entirely.
    pub choppiness: f32,

    /// Seed for the initial random phases. Fixed across wind/size changes so
    /// regenerating the spectrum never makes the sea "pop".
    pub phase_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            resolution: 512,
            ocean_size_m: 150.0,
            wind: Vec2::new(60.0, 30.0),
            choppiness: 1.5,
            phase_seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Validate the configuration (resolution must be a power of two, etc.).
    ///
    /// Invalid values fail fast here; nothing downstream clamps silently.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution < 2 || !self.resolution.is_power_of_two() {
            return Err(format!(
                "resolution must be a power of two >= 2, got {}",
                self.resolution
            ));
        }
        if !(self.ocean_size_m.is_finite() && self.ocean_size_m > 0.0) {
            return Err(format!(
                "ocean size must be positive, got {}",
                self.ocean_size_m
            ));
        }
        if !self.wind.is_finite() {
            return Err(format!("wind vector must be finite, got {}", self.wind));
        }
        if !(self.choppiness.is_finite() && self.choppiness >= 0.0) {
            return Err(format!(
                "choppiness must be non-negative, got {}",
                self.choppiness
            ));
        }
        Ok(())
    }

    /// Physical distance covered by one grid cell (meters).
    pub fn cell_size_m(&self) -> f32 {
        self.ocean_size_m / self.resolution as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_power_of_two_resolution() {
        let config = SimulationConfig {
            resolution: 100,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let mut config = SimulationConfig {
            ocean_size_m: 0.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        config.ocean_size_m = 150.0;
        config.choppiness = -0.1;
        assert!(config.validate().is_err());

        config.choppiness = 1.0;
        config.wind = Vec2::new(f32::NAN, 0.0);
        assert!(config.validate().is_err());
    }
}
