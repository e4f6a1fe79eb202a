//! Chromatic Adaptation Transforms
//!
//! The spectral dataset is defined against the equal-energy white E, while
//! RGB working spaces assume D65. Colours are adapted D65→E on the way into
//! the spectral domain and E→D65 on the way out.
//!
//! References:
//! - Lindbloom: http://www.brucelindbloom.com/index.html?Eqn_ChromAdapt.html

use crate::color::{WhitePoint, Xyz};
use crate::math::Matrix3x3;

/// Chromatic adaptation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaticAdaptationMethod {
    /// Bradford adaptation
    #[default]
    Bradford,
    /// Von Kries adaptation
    VonKries,
    /// XYZ Scaling
    XyzScaling,
}

/// Bradford matrix: XYZ → LMS (cone response)
const BRADFORD_XYZ_TO_LMS: Matrix3x3 = Matrix3x3::new([
    [0.8951000, 0.2664000, -0.1614000],
    [-0.7502000, 1.7135000, 0.0367000],
    [0.0389000, -0.0685000, 1.0296000],
]);

/// Von Kries matrix: XYZ → LMS
const VON_KRIES_XYZ_TO_LMS: Matrix3x3 = Matrix3x3::new([
    [0.4002400, 0.7076000, -0.0808100],
    [-0.2263000, 1.1653200, 0.0457000],
    [0.0000000, 0.0000000, 0.9182200],
]);

impl ChromaticAdaptationMethod {
    fn xyz_to_lms(self) -> Matrix3x3 {
        match self {
            Self::Bradford => BRADFORD_XYZ_TO_LMS,
            Self::VonKries => VON_KRIES_XYZ_TO_LMS,
            Self::XyzScaling => Matrix3x3::identity(),
        }
    }
}

/// Compute the matrix adapting XYZ from `src_white` to `dst_white`
///
/// The returned matrix M is used as: XYZ_dst = M × XYZ_src
pub fn adaptation_matrix(
    src_white: &WhitePoint,
    dst_white: &WhitePoint,
    method: ChromaticAdaptationMethod,
) -> Matrix3x3 {
    let m_a = method.xyz_to_lms();
    let Some(m_a_inv) = m_a.inverse() else {
        return Matrix3x3::identity();
    };

    let src_lms = m_a.multiply_vec(src_white.xyz.to_array());
    let dst_lms = m_a.multiply_vec(dst_white.xyz.to_array());

    let ratio = |i: usize| {
        if src_lms[i].abs() > 1e-10 {
            dst_lms[i] / src_lms[i]
        } else {
            1.0
        }
    };
    let scale = Matrix3x3::diagonal(ratio(0), ratio(1), ratio(2));

    // M = M_A^-1 × Scale × M_A
    m_a_inv.multiply(&scale.multiply(&m_a))
}

/// Bradford D65 → E
pub const D65_TO_E_BRADFORD: Matrix3x3 = Matrix3x3::new([
    [1.0502616160, 0.0270756503, -0.0232523062],
    [0.0390649557, 0.9729501919, -0.0092578826],
    [-0.0024046676, 0.0026445727, 0.9180872972],
]);

/// Bradford E → D65
pub const E_TO_D65_BRADFORD: Matrix3x3 = Matrix3x3::new([
    [0.9531874262, -0.0265905737, 0.0238731475],
    [-0.0382466561, 1.0288406195, 0.0094060366],
    [0.0026067728, -0.0030332467, 1.0892564739],
]);

/// The fixed adaptations used around the spectral domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdaptationTransform {
    /// D65-relative XYZ into the dataset's equal-energy frame
    D65ToE,
    /// Dataset frame back to D65
    EToD65,
    /// No adaptation
    Identity,
}

impl AdaptationTransform {
    /// The fixed matrix of this transform
    #[inline]
    pub const fn matrix(self) -> Matrix3x3 {
        match self {
            Self::D65ToE => D65_TO_E_BRADFORD,
            Self::EToD65 => E_TO_D65_BRADFORD,
            Self::Identity => Matrix3x3::identity(),
        }
    }

    /// The transform undoing this one
    #[inline]
    pub const fn inverse(self) -> Self {
        match self {
            Self::D65ToE => Self::EToD65,
            Self::EToD65 => Self::D65ToE,
            Self::Identity => Self::Identity,
        }
    }
}

/// Adapt an XYZ value with one of the fixed transforms
#[inline]
pub fn adapt(transform: AdaptationTransform, xyz: Xyz) -> Xyz {
    transform.matrix().apply(xyz)
}

/// Adapt an XYZ value between arbitrary white points
#[inline]
pub fn adapt_xyz(
    xyz: Xyz,
    src_white: &WhitePoint,
    dst_white: &WhitePoint,
    method: ChromaticAdaptationMethod,
) -> Xyz {
    adaptation_matrix(src_white, dst_white, method).apply(xyz)
}
