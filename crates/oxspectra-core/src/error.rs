//! Error types for oxspectra
//!
//! Only construction can fail. Lookups and spectrum arithmetic always
//! produce a number and degrade to zero instead of erroring.

use thiserror::Error;

/// Result type for oxspectra operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing colour spaces or datasets
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The spectral dataset failed validation
    #[error("Invalid spectral dataset: {0}")]
    InvalidDataset(#[from] DatasetError),

    /// A colour space matrix could not be inverted
    #[error("Singular colour space matrix for {0}")]
    SingularMatrix(String),

    /// Dataset generation parameters are out of range
    #[error("Invalid builder configuration: {0}")]
    InvalidConfig(String),
}

/// Structural defects in a spectral dataset
///
/// These are data-generation defects. They are reported once, when a
/// [`SpectralDataset`](crate::spectral::SpectralDataset) is assembled.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DatasetError {
    /// Number of cells does not match width × height
    #[error("Grid of {width}x{height} needs {expected} cells, got {actual}")]
    GridSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// A cell references a data point that does not exist
    #[error("Cell {cell} references point {index}, but only {points} points exist")]
    PointIndexOutOfRange {
        cell: usize,
        index: u32,
        points: usize,
    },

    /// A non-empty cell has too few points for its kind
    #[error("Cell {cell} has {count} points, needs {required}")]
    CellTooSmall {
        cell: usize,
        count: usize,
        required: usize,
    },

    /// A data point's spectrum has the wrong number of samples
    #[error("Point {point} has {actual} samples, expected {expected}")]
    SpectrumLength {
        point: usize,
        expected: usize,
        actual: usize,
    },

    /// A data point holds NaN or infinite values
    #[error("Point {point} holds a non-finite value")]
    NonFiniteSample { point: usize },

    /// Wavelength sampling is empty or reversed
    #[error("Invalid wavelength range [{min}, {max}] with {samples} samples")]
    InvalidWavelengthRange { min: f64, max: f64, samples: usize },

    /// The equal-energy reflectance is not a positive finite number
    #[error("Equal-energy reflectance must be positive and finite, got {0}")]
    InvalidEqualEnergyReflectance(f64),

    /// Grid has no cells or no points
    #[error("Dataset is empty")]
    EmptyDataset,
}
