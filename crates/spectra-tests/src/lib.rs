//! # spectra-tests
//!
//! Statistical and cross-library testing for oxspectra.
//!
//! This crate provides:
//! - Perceptual accuracy measurement (CIELAB, deltaE2000)
//! - Deterministic colour pattern generators
//! - Hero-wavelength estimators: averaging single-path spectra over many
//!   hero wavelengths to recover the colour they represent
//!
//! ## Test Categories
//!
//! 1. **Round trip**: RGB → spectrum → RGB in expectation
//! 2. **Convergence**: estimator error shrinking with sample count
//! 3. **Robustness**: degenerate and hostile inputs
//! 4. **Palette parity**: matrices, adaptation and deltaE against `palette`
//! 5. **Concurrency**: shared dataset reads from many threads

pub mod accuracy;
pub mod estimator;
pub mod patterns;

pub use accuracy::{DeltaEStats, delta_e_2000, xyz_to_lab};
pub use estimator::{expected_rgb, expected_xyz, stratified_heroes};
pub use patterns::{ColorPattern, generate_pattern};
