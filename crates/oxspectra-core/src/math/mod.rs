//! Numeric building blocks
//!
//! This module provides:
//! - 3x3 matrix operations for RGB↔XYZ transforms
//! - Chromatic adaptation (Bradford, fixed D65↔E transforms)
//! - Interpolation (linear, barycentric)
//! - Tridiagonal solves for dataset generation
//! - Convex polygons for covering the spectral locus

pub mod chromatic_adaptation;
pub mod interpolation;
pub mod matrix;
pub mod polygon;
pub mod tridiagonal;

pub use chromatic_adaptation::{
    AdaptationTransform, ChromaticAdaptationMethod, adapt, adapt_xyz, adaptation_matrix,
};
pub use interpolation::{barycentric, cross2, lerp};
pub use matrix::Matrix3x3;
pub use polygon::{
    clip_convex, contains_convex, convex_hull, nearest_on_convex, offset_convex, polygon_area,
    polygon_centroid,
};
pub use tridiagonal::Tridiagonal;
