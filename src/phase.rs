//! Per-frequency wave phase evolution, double-buffered.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::field::{Field, PingPong};
use crate::params::SimulationConfig;
use crate::spectrum::{wavenumber, GRAVITY};

/// Advances per-cell wave phases over elapsed time.
///
/// Two buffers alternate roles every tick: `advance` reads the buffer most
/// recently written and writes the other, then flips the role flag so the
/// fresh phases become the readable buffer for the same tick's assembler.
#[derive(Debug)]
pub struct PhaseEvolver {
    buffers: PingPong<f32>,
    ocean_size_m: f32,
}

impl PhaseEvolver {
    /// Seed the source buffer with independent uniform phases in [0, 2π).
    pub fn new(config: &SimulationConfig) -> Result<Self, String> {
        config.validate()?;
        let mut buffers = PingPong::new(config.resolution)?;

        let mut rng = StdRng::seed_from_u64(config.phase_seed);
        for phase in buffers.front_mut().as_mut_slice() {
            *phase = rng.gen::<f32>() * TAU;
        }

        Ok(Self {
            buffers,
            ocean_size_m: config.ocean_size_m,
        })
    }

    /// Advance every phase by ω(k)·dt with ω = sqrt(g·|k|), the deep-water
    /// gravity-wave dispersion relation, wrapping into [0, 2π).
    pub fn advance(&mut self, delta_time: f32) {
        let n = self.buffers.resolution();
        let l = self.ocean_size_m;

        let (src, dst) = self.buffers.split();
        for y in 0..n {
            for x in 0..n {
                let k_len = wavenumber(x, y, n, l).length();
                let omega = (GRAVITY * k_len).sqrt();
                dst.set(x, y, wrap_phase(src.get(x, y) + omega * delta_time));
            }
        }
        self.buffers.swap();
    }

    /// The most recently completed phase buffer. Non-mutating; also the
    /// visualization accessor.
    pub fn current(&self) -> &Field<f32> {
        self.buffers.front()
    }

    /// The dispersion relation depends on the patch size through k; the
    /// phase buffers themselves survive an ocean-size change unchanged.
    pub fn set_ocean_size(&mut self, ocean_size_m: f32) {
        self.ocean_size_m = ocean_size_m;
    }
}

fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for inputs just below a
    // multiple of it.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
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

    fn assert_in_range(field: &Field<f32>) {
        for &phase in field.as_slice() {
            assert!((0.0..TAU).contains(&phase), "phase {} out of range", phase);
        }
    }

    #[test]
    fn test_initial_phases_in_range() {
        let evolver = PhaseEvolver::new(&config(32)).unwrap();
        assert_in_range(evolver.current());
    }

    #[test]
    fn test_phases_stay_wrapped_after_large_steps() {
        let mut evolver = PhaseEvolver::new(&config(32)).unwrap();
        for _ in 0..10 {
            evolver.advance(1000.0);
            assert_in_range(evolver.current());
        }
    }

    #[test]
    fn test_zero_step_preserves_phases() {
        let mut evolver = PhaseEvolver::new(&config(16)).unwrap();
        let before: Vec<f32> = evolver.current().as_slice().to_vec();
        evolver.advance(0.0);
        // The freshly written buffer must be the one now readable.
        for (a, b) in before.iter().zip(evolver.current().as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_seed_determinism() {
        let a = PhaseEvolver::new(&config(16)).unwrap();
        let b = PhaseEvolver::new(&config(16)).unwrap();
        assert_eq!(a.current().as_slice(), b.current().as_slice());

        let other = PhaseEvolver::new(&SimulationConfig {
            resolution: 16,
            phase_seed: 7,
            ..SimulationConfig::default()
        })
        .unwrap();
        assert_ne!(other.current().as_slice(), a.current().as_slice());
    }

    #[test]
    fn test_dc_phase_is_constant() {
        // ω(0) = 0: the DC phase never moves.
        let mut evolver = PhaseEvolver::new(&config(16)).unwrap();
        let initial = evolver.current().get(0, 0);
        evolver.advance(3.0);
        assert!((evolver.current().get(0, 0) - initial).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_phase_bounds() {
        assert_eq!(wrap_phase(TAU), 0.0);
        assert!(wrap_phase(-1e-3) < TAU);
        assert!(wrap_phase(-1e-3) >= 0.0);
        assert!((wrap_phase(TAU + 1.0) - 1.0).abs() < 1e-6);
    }
}
