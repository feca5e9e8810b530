//! Wavecrest - spectral FFT ocean surface simulation core.
//!
//! Wind and patch-size parameters become a frequency-domain wave spectrum,
//! evolved over time through the gravity-wave dispersion relation, inverse
//! FFT'd back to the spatial domain, and unpacked into displacement and
//! slope fields ready for rendering.

pub mod displacement;
pub mod field;
pub mod ifft;
pub mod ocean;
pub mod params;
pub mod phase;
pub mod spectrum;
pub mod time_spectrum;
