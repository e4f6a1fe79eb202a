//! CIE Standard Illuminant White Points
//!
//! White points are given as CIE XYZ with Y = 1.0.

use crate::color::Xyz;

/// A white point definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    /// Name of the illuminant
    pub name: &'static str,
    /// CIE XYZ coordinates (Y normalized to 1.0)
    pub xyz: Xyz,
}

impl WhitePoint {
    /// Create a new white point
    pub const fn new(name: &'static str, x: f64, y: f64, z: f64) -> Self {
        Self {
            name,
            xyz: Xyz::new(x, y, z),
        }
    }

    /// Create a white point from xy chromaticity (Y = 1.0)
    pub fn from_chromaticity(name: &'static str, x: f64, y: f64) -> Self {
        Self {
            name,
            xyz: Xyz::new(x / y, 1.0, (1.0 - x - y) / y),
        }
    }

    /// Get the chromaticity coordinates (x, y)
    pub fn chromaticity(&self) -> (f64, f64) {
        self.xyz.chromaticity().unwrap_or((0.0, 0.0))
    }
}

/// CIE Standard Illuminant D50
pub const D50: WhitePoint = WhitePoint::new("D50", 0.9642, 1.0, 0.8251);

/// CIE Standard Illuminant D65 (Noon Daylight)
///
/// White point of sRGB, Display P3, Adobe RGB and Rec.2020.
/// Derived from the sRGB chromaticity (0.3127, 0.3290).
pub const D65: WhitePoint = WhitePoint::new("D65", 0.95047, 1.0, 1.08883);

/// CIE Standard Illuminant E (Equal Energy)
///
/// The white the spectral dataset is defined against: a flat spectrum.
pub const E: WhitePoint = WhitePoint::new("E", 1.0, 1.0, 1.0);
