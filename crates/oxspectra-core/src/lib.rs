//! # oxspectra - spectral colour conversion core
//!
//! Moves colours between tristimulus values (RGB, CIE XYZ) and the compact
//! four-sample hero-wavelength spectra a physically based renderer carries
//! along each path.
//!
//! ## Pipeline
//!
//! - **Upsampling**: RGB → XYZ ([`LinearColorSpace`]) → adapt D65 to the
//!   equal-energy white ([`adapt`]) → per-wavelength reflectance from a
//!   chromaticity grid of smooth spectra ([`spectral_reflectance_at`]).
//! - **Transport**: elementwise arithmetic on [`Spectrum`].
//! - **Sensor**: [`Spectrum::to_xyz`] → adapt back to D65 → RGB, clamped
//!   with hue preserved.
//!
//! ## Quick Start
//!
//! ```
//! use oxspectra_core::{Rgb, Spectrum, SRGB};
//!
//! // One hero wavelength per path, from a uniform random number
//! let hero = Spectrum::sample_hero(0.37);
//!
//! let albedo = Spectrum::from_rgb(hero, Rgb::new(0.8, 0.3, 0.2), &SRGB);
//! let light = Spectrum::from_rgb_illuminant(hero, Rgb::new(2.0, 2.0, 2.0), &SRGB);
//! let radiance = albedo * light;
//!
//! // A single estimate; average many hero wavelengths for the pixel colour
//! let rgb = radiance.to_rgb(&SRGB);
//! assert!(rgb.is_in_gamut());
//! ```
//!
//! The upsampling grid is generated once, on first use, by
//! [`spectral::DatasetBuilder`]. Custom grids can be built and passed
//! explicitly with the `*_with` constructors.
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Xyz`], [`Rgb`], [`Spectrum`]
//!   and [`AdaptationTransform`].

pub mod color;
pub mod colorspace;
pub mod error;
pub mod math;
pub mod simd;
pub mod spectral;
pub mod spectrum;

pub use color::{D50, D65, E, Rgb, WhitePoint, Xyz};
pub use colorspace::{ADOBE_RGB, DISPLAY_P3, LinearColorSpace, REC2020, SRGB};
pub use error::{DatasetError, Error, Result};
pub use math::{AdaptationTransform, ChromaticAdaptationMethod, Matrix3x3, adapt};
pub use spectral::{
    NoContribution, Reflectance, SpectralDataset, equal_energy_reflectance,
    spectral_reflectance_at, spectral_reflectance_at4,
};
pub use spectrum::{NUM_WAVELENGTHS, Spectrum};

/// Version of oxspectra
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
