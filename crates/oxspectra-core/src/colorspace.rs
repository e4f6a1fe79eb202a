//! Linear RGB colour spaces
//!
//! A [`LinearColorSpace`] is a pair of fixed 3x3 matrices between linear
//! RGB and CIE XYZ relative to the space's own white, plus the adaptation
//! into the equal-energy frame of the spectral dataset.
//!
//! No clamping happens here. Out-of-gamut and negative values pass through
//! unchanged; clamping for display is done by the caller.

use crate::color::{D65, E, Rgb, WhitePoint, Xyz};
use crate::error::{Error, Result};
use crate::math::{AdaptationTransform, ChromaticAdaptationMethod, Matrix3x3, adaptation_matrix};
use crate::simd;

/// A named linear RGB space
#[derive(Debug, Clone, PartialEq)]
pub struct LinearColorSpace {
    name: &'static str,
    white: WhitePoint,
    rgb_to_xyz: Matrix3x3,
    xyz_to_rgb: Matrix3x3,
    to_e: Matrix3x3,
    from_e: Matrix3x3,
}

impl LinearColorSpace {
    /// Assemble a D65 space from a matrix pair
    const fn d65(name: &'static str, rgb_to_xyz: Matrix3x3, xyz_to_rgb: Matrix3x3) -> Self {
        Self {
            name,
            white: D65,
            rgb_to_xyz,
            xyz_to_rgb,
            to_e: AdaptationTransform::D65ToE.matrix(),
            from_e: AdaptationTransform::EToD65.matrix(),
        }
    }

    /// Build a space from its RGB→XYZ matrix, inverting it once
    pub fn from_matrix(name: &'static str, rgb_to_xyz: Matrix3x3, white: WhitePoint) -> Result<Self> {
        let xyz_to_rgb = rgb_to_xyz
            .inverse()
            .ok_or_else(|| Error::SingularMatrix(name.to_string()))?;
        let (to_e, from_e) = if white == D65 {
            (
                AdaptationTransform::D65ToE.matrix(),
                AdaptationTransform::EToD65.matrix(),
            )
        } else {
            (
                adaptation_matrix(&white, &E, ChromaticAdaptationMethod::Bradford),
                adaptation_matrix(&E, &white, ChromaticAdaptationMethod::Bradford),
            )
        };
        Ok(Self {
            name,
            white,
            rgb_to_xyz,
            xyz_to_rgb,
            to_e,
            from_e,
        })
    }

    /// Build a space from primary and white chromaticities
    ///
    /// The RGB→XYZ matrix is scaled so RGB (1, 1, 1) lands on `white`.
    pub fn from_primaries(
        name: &'static str,
        red: (f64, f64),
        green: (f64, f64),
        blue: (f64, f64),
        white: WhitePoint,
    ) -> Result<Self> {
        let column = |(x, y): (f64, f64)| -> Result<[f64; 3]> {
            if y.abs() < 1e-12 {
                return Err(Error::SingularMatrix(name.to_string()));
            }
            Ok([x / y, 1.0, (1.0 - x - y) / y])
        };
        let primaries = Matrix3x3::from_columns(column(red)?, column(green)?, column(blue)?);
        let s = primaries
            .inverse()
            .ok_or_else(|| Error::SingularMatrix(name.to_string()))?
            .multiply_vec(white.xyz.to_array());
        let rgb_to_xyz = primaries.multiply(&Matrix3x3::diagonal(s[0], s[1], s[2]));
        Self::from_matrix(name, rgb_to_xyz, white)
    }

    /// Name of the space
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// White point the space's XYZ values are relative to
    pub fn white(&self) -> &WhitePoint {
        &self.white
    }

    /// RGB→XYZ matrix
    pub fn rgb_to_xyz_matrix(&self) -> &Matrix3x3 {
        &self.rgb_to_xyz
    }

    /// XYZ→RGB matrix
    pub fn xyz_to_rgb_matrix(&self) -> &Matrix3x3 {
        &self.xyz_to_rgb
    }

    /// Convert XYZ to linear RGB
    #[inline]
    pub fn xyz_to_rgb(&self, xyz: Xyz) -> Rgb {
        Rgb::from_array(self.xyz_to_rgb.multiply_vec(xyz.to_array()))
    }

    /// Convert linear RGB to XYZ
    #[inline]
    pub fn rgb_to_xyz(&self, rgb: Rgb) -> Xyz {
        Xyz::from_array(self.rgb_to_xyz.multiply_vec(rgb.to_array()))
    }

    /// Adapt XYZ relative to this space's white to the equal-energy white
    #[inline]
    pub fn adapt_to_e(&self, xyz: Xyz) -> Xyz {
        self.to_e.apply(xyz)
    }

    /// Adapt XYZ relative to the equal-energy white to this space's white
    #[inline]
    pub fn adapt_from_e(&self, xyz: Xyz) -> Xyz {
        self.from_e.apply(xyz)
    }

    /// Convert linear RGB to XYZ relative to the equal-energy white
    #[inline]
    pub fn rgb_to_xyz_e(&self, rgb: Rgb) -> Xyz {
        self.adapt_to_e(self.rgb_to_xyz(rgb))
    }

    /// Convert XYZ relative to the equal-energy white to linear RGB
    #[inline]
    pub fn xyz_e_to_rgb(&self, xyz: Xyz) -> Rgb {
        self.xyz_to_rgb(self.adapt_from_e(xyz))
    }

    /// Convert a batch of XYZ values to RGB
    ///
    /// # Panics
    /// If `output` is shorter than `input`.
    pub fn xyz_to_rgb_batch(&self, input: &[Xyz], output: &mut [Rgb]) {
        simd::matrix_multiply_vec3_batch(
            &self.xyz_to_rgb.m,
            bytemuck::cast_slice(input),
            bytemuck::cast_slice_mut(output),
        );
    }

    /// Convert a batch of RGB values to XYZ
    ///
    /// # Panics
    /// If `output` is shorter than `input`.
    pub fn rgb_to_xyz_batch(&self, input: &[Rgb], output: &mut [Xyz]) {
        simd::matrix_multiply_vec3_batch(
            &self.rgb_to_xyz.m,
            bytemuck::cast_slice(input),
            bytemuck::cast_slice_mut(output),
        );
    }
}

/// sRGB / Rec.709 primaries, D65 (IEC 61966-2-1:1999)
pub static SRGB: LinearColorSpace = LinearColorSpace::d65(
    "sRGB",
    Matrix3x3::new([
        [0.4124564, 0.3575761, 0.1804375],
        [0.2126729, 0.7151522, 0.0721750],
        [0.0193339, 0.1191920, 0.9503041],
    ]),
    Matrix3x3::new([
        [3.2404542, -1.5371385, -0.4985314],
        [-0.9692660, 1.8760108, 0.0415560],
        [0.0556434, -0.2040259, 1.0572252],
    ]),
);

/// Display P3, D65
pub static DISPLAY_P3: LinearColorSpace = LinearColorSpace::d65(
    "Display P3",
    Matrix3x3::new([
        [0.4865709, 0.2656677, 0.1982173],
        [0.2289746, 0.6917385, 0.0792869],
        [0.0000000, 0.0451134, 1.0439444],
    ]),
    Matrix3x3::new([
        [2.4934969, -0.9313836, -0.4027108],
        [-0.8294890, 1.7626641, 0.0236247],
        [0.0358458, -0.0761724, 0.9568845],
    ]),
);

/// Adobe RGB (1998), D65
pub static ADOBE_RGB: LinearColorSpace = LinearColorSpace::d65(
    "Adobe RGB (1998)",
    Matrix3x3::new([
        [0.5767309, 0.1855540, 0.1881852],
        [0.2973769, 0.6273491, 0.0752741],
        [0.0270343, 0.0706872, 0.9911085],
    ]),
    Matrix3x3::new([
        [2.0413690, -0.5649464, -0.3446944],
        [-0.9692660, 1.8760108, 0.0415560],
        [0.0134474, -0.1183897, 1.0154096],
    ]),
);

/// Rec.2020, D65
pub static REC2020: LinearColorSpace = LinearColorSpace::d65(
    "Rec.2020",
    Matrix3x3::new([
        [0.6369580, 0.1446169, 0.1688810],
        [0.2627002, 0.6779981, 0.0593017],
        [0.0000000, 0.0280727, 1.0609851],
    ]),
    Matrix3x3::new([
        [1.7166512, -0.3556708, -0.2533663],
        [-0.6666844, 1.6164812, 0.0157685],
        [0.0176399, -0.0427706, 0.9421031],
    ]),
);
