//! Colour value types
//!
//! This module provides:
//! - CIE XYZ tristimulus values
//! - Linear RGB values
//! - White point definitions

pub mod rgb;
pub mod white_point;
pub mod xyz;

pub use rgb::Rgb;
pub use white_point::{D50, D65, E, WhitePoint};
pub use xyz::Xyz;
