//! High-level ocean system: owns every field, runs the per-tick pipeline and
//! applies parameter changes at tick boundaries.

use glam::Vec2;
use log::info;

use crate::displacement::DisplacementMaps;
use crate::field::Field;
use crate::ifft::Ifft2d;
use crate::params::SimulationConfig;
use crate::phase::PhaseEvolver;
use crate::spectrum::SpectrumGenerator;
use crate::time_spectrum::{SpectrumTexel, TimeSpectrumAssembler};

/// The full simulation pipeline.
///
/// One `advance` call runs the tick stages in strict order — phase evolution,
/// spectrum assembly, inverse FFT, displacement/slope extraction — each stage
/// reading only its predecessor's completed output; the sequential calls are
/// the barriers of the stage dependency graph. Parameter setters take effect
/// between ticks: they either store a value read by the next tick or complete
/// a synchronous recompute before returning.
#[derive(Debug)]
pub struct OceanSystem {
    config: SimulationConfig,
    generator: SpectrumGenerator,
    spectrum: Field<f32>,
    phase: PhaseEvolver,
    assembler: TimeSpectrumAssembler,
    ifft: Ifft2d,
    maps: DisplacementMaps,
}

impl OceanSystem {
    /// Validate the configuration and build every field of the pipeline.
    pub fn new(config: SimulationConfig) -> Result<Self, String> {
        config.validate()?;

        let generator = SpectrumGenerator::new();
        let spectrum = generator.generate(&config)?;
        info!(
            "initial spectrum generated ({0}x{0}, L={1}m, wind={2})",
            config.resolution, config.ocean_size_m, config.wind
        );

        let phase = PhaseEvolver::new(&config)?;
        let assembler = TimeSpectrumAssembler::new(config.resolution)?;
        let ifft = Ifft2d::new(config.resolution)?;
        let maps = DisplacementMaps::new(config.resolution)?;
        info!("ocean pipeline initialized ({0}x{0})", config.resolution);

        Ok(Self {
            config,
            generator,
            spectrum,
            phase,
            assembler,
            ifft,
            maps,
        })
    }

    /// Run one simulation tick for `delta_time` elapsed seconds, producing
    /// updated displacement and slope fields. No other side effects.
    ///
    /// On error the tick's output is invalid but the previous tick's fields
    /// remain readable as last known-good state.
    pub fn advance(&mut self, delta_time: f32) -> Result<(), String> {
        self.phase.advance(delta_time);
        self.assembler.assemble(
            &self.spectrum,
            self.phase.current(),
            self.config.choppiness,
            self.config.ocean_size_m,
        )?;
        self.ifft.transform(self.assembler.output())?;
        self.maps.unpack(self.ifft.output())?;
        self.maps.compute_slope(self.config.ocean_size_m);
        Ok(())
    }

    /// Takes effect at the next tick; no recompute needed.
    pub fn set_choppiness(&mut self, choppiness: f32) -> Result<(), String> {
        let next = SimulationConfig {
            choppiness,
            ..self.config.clone()
        };
        next.validate()?;
        self.config = next;
        Ok(())
    }

    /// Changing the wind reshapes the spectrum: regenerates it synchronously,
    /// completing before the next tick can read it. Phases are untouched.
    pub fn set_wind(&mut self, wind: Vec2) -> Result<(), String> {
        let next = SimulationConfig {
            wind,
            ..self.config.clone()
        };
        self.regenerate_spectrum(next)
    }

    /// Changing the patch size rescales every wavenumber: regenerates the
    /// spectrum and updates the dispersion relation's cell-to-wavenumber
    /// mapping. Phase values survive unchanged.
    pub fn set_ocean_size(&mut self, ocean_size_m: f32) -> Result<(), String> {
        let next = SimulationConfig {
            ocean_size_m,
            ..self.config.clone()
        };
        self.regenerate_spectrum(next)?;
        self.phase.set_ocean_size(ocean_size_m);
        Ok(())
    }

    /// Full teardown: every field is recreated at the new resolution and the
    /// phases are reseeded. Equivalent to reinitializing the pipeline; on
    /// error the existing pipeline is left untouched.
    pub fn set_resolution(&mut self, resolution: usize) -> Result<(), String> {
        let next = SimulationConfig {
            resolution,
            ..self.config.clone()
        };
        info!("resolution change requested: rebuilding pipeline at {0}x{0}", resolution);
        *self = Self::new(next)?;
        Ok(())
    }

    /// Regenerate into a fresh field and swap on success only, so a failed
    /// generation leaves the previous spectrum as last known-good and readers
    /// never observe a partially written grid.
    fn regenerate_spectrum(&mut self, next: SimulationConfig) -> Result<(), String> {
        let spectrum = self.generator.generate(&next)?;
        info!(
            "spectrum regenerated (L={}m, wind={})",
            next.ocean_size_m, next.wind
        );
        self.spectrum = spectrum;
        self.config = next;
        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current world-space displacement field (`[x, height, z]` per cell).
    pub fn displacement(&self) -> &Field<[f32; 3]> {
        self.maps.displacement()
    }

    /// Current slope field (`[∂h/∂x, ∂h/∂z]` per cell).
    pub fn slope(&self) -> &Field<[f32; 2]> {
        self.maps.slope()
    }

    /// Static amplitude spectrum, for visualization.
    pub fn spectrum(&self) -> &Field<f32> {
        &self.spectrum
    }

    /// Most recently completed phase buffer, for visualization.
    pub fn current_phase(&self) -> &Field<f32> {
        self.phase.current()
    }

    /// Raw spatial-domain IFFT output of the last tick.
    pub fn spatial_output(&self) -> &Field<SpectrumTexel> {
        self.ifft.output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(resolution: usize) -> SimulationConfig {
        SimulationConfig {
            resolution,
            ..SimulationConfig::default()
        }
    }

    /// Conjugate-symmetric spectral input must come out of the transform
    /// with negligible imaginary parts: the assembler is fed zero phases so
    /// the symmetry is exact.
    #[test]
    fn test_round_trip_output_is_real() {
        for n in [8, 64, 512] {
            let mut system = OceanSystem::new(config(n)).unwrap();

            let zero_phase: Field<f32> = Field::new(n).unwrap();
            system
                .assembler
                .assemble(
                    &system.spectrum,
                    &zero_phase,
                    system.config.choppiness,
                    system.config.ocean_size_m,
                )
                .unwrap();
            system.ifft.transform(system.assembler.output()).unwrap();

            let spatial = system.ifft.output();
            let max_re = spatial
                .as_slice()
                .iter()
                .map(|t| t.height.re.abs())
                .fold(0.0f32, f32::max);
            let tolerance = 1e-4 * max_re.max(1e-6);
            for texel in spatial.as_slice() {
                assert!(
                    texel.height.im.abs() <= tolerance,
                    "imaginary residue {} at N={}",
                    texel.height.im,
                    n
                );
            }
        }
    }

    #[test]
    fn test_advance_produces_waves() {
        let mut system = OceanSystem::new(config(64)).unwrap();
        system.advance(0.016).unwrap();

        let has_height = system
            .displacement()
            .as_slice()
            .iter()
            .any(|offset| offset[1].abs() > 0.0);
        let has_slope = system
            .slope()
            .as_slice()
            .iter()
            .any(|slope| slope[0].abs() > 0.0 || slope[1].abs() > 0.0);
        assert!(has_height);
        assert!(has_slope);
    }

    #[test]
    fn test_zero_choppiness_means_no_horizontal_displacement() {
        let mut system = OceanSystem::new(SimulationConfig {
            resolution: 64,
            choppiness: 0.0,
            ..SimulationConfig::default()
        })
        .unwrap();
        system.advance(0.5).unwrap();

        for offset in system.displacement().as_slice() {
            assert_eq!(offset[0], 0.0);
            assert_eq!(offset[2], 0.0);
        }
    }

    #[test]
    fn test_resolution_change_rebuilds_every_field() {
        let mut system = OceanSystem::new(config(256)).unwrap();
        system.advance(0.016).unwrap();

        system.set_resolution(512).unwrap();
        assert_eq!(system.config().resolution, 512);
        assert_eq!(system.spectrum().resolution(), 512);
        assert_eq!(system.current_phase().resolution(), 512);
        assert_eq!(system.displacement().resolution(), 512);
        assert_eq!(system.slope().resolution(), 512);
        assert_eq!(system.spatial_output().resolution(), 512);

        // The rebuilt pipeline ticks cleanly at the new size.
        system.advance(0.016).unwrap();
        assert_eq!(system.displacement().as_slice().len(), 512 * 512);
    }

    #[test]
    fn test_invalid_reconfiguration_leaves_pipeline_intact() {
        let mut system = OceanSystem::new(config(64)).unwrap();
        system.advance(0.016).unwrap();
        let before: Vec<f32> = system.spectrum().as_slice().to_vec();

        assert!(system.set_resolution(100).is_err());
        assert!(system.set_ocean_size(-1.0).is_err());
        assert!(system.set_choppiness(-2.0).is_err());

        assert_eq!(system.config().resolution, 64);
        assert_eq!(system.spectrum().as_slice(), before.as_slice());
        system.advance(0.016).unwrap();
    }

    #[test]
    fn test_wind_change_regenerates_spectrum_but_keeps_phases() {
        let mut system = OceanSystem::new(config(64)).unwrap();
        let phases_before: Vec<f32> = system.current_phase().as_slice().to_vec();
        let spectrum_before: Vec<f32> = system.spectrum().as_slice().to_vec();

        system.set_wind(Vec2::new(5.0, 0.0)).unwrap();

        assert_ne!(system.spectrum().as_slice(), spectrum_before.as_slice());
        assert_eq!(system.current_phase().as_slice(), phases_before.as_slice());
        assert_eq!(system.spectrum().get(0, 0), 0.0);
    }

    #[test]
    fn test_ocean_size_change_affects_dispersion_mapping() {
        let mut system = OceanSystem::new(config(32)).unwrap();
        system.set_ocean_size(300.0).unwrap();
        assert_eq!(system.config().ocean_size_m, 300.0);
        system.advance(0.016).unwrap();
    }
}
