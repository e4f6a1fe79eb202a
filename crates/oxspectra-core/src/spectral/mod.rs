//! Spectral upsampling data
//!
//! - [`cmf`]: the CIE 1931 standard observer
//! - [`dataset`]: the chromaticity grid of smooth reflectance spectra and
//!   its lookup
//! - [`builder`]: generation of that grid
//!
//! Wavelengths are in nanometres throughout.

pub mod builder;
pub mod cmf;
pub mod dataset;

pub use builder::DatasetBuilder;
pub use cmf::{CIE_1931, ColorMatchingTable};
pub use dataset::{
    CellWeights, GridCell, GridTransform, NoContribution, Reflectance, SpectralDataPoint,
    SpectralDataset, WavelengthSampling, equal_energy_reflectance, spectral_reflectance_at,
    spectral_reflectance_at4,
};

/// Shortest wavelength covered by the dataset
pub const LAMBDA_MIN: f64 = 360.0;

/// Longest wavelength covered by the dataset
pub const LAMBDA_MAX: f64 = 830.0;

/// Spacing of the dataset's spectral samples
pub const SPECTRUM_BIN_SIZE: f64 = 5.0;

/// Number of samples per stored spectrum, both ends inclusive
pub const SPECTRUM_NUM_SAMPLES: usize = 95;

const _: () = assert!(
    (SPECTRUM_NUM_SAMPLES - 1) as f64 * SPECTRUM_BIN_SIZE == LAMBDA_MAX - LAMBDA_MIN,
    "sample count and bin size must tile the wavelength range"
);
