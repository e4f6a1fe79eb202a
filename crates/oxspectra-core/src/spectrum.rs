//! Hero-wavelength spectra
//!
//! A [`Spectrum`] carries four samples of a spectral quantity along one
//! light path. The first sits at the hero wavelength; the others are
//! spaced a quarter of the visible range apart, wrapping around at the
//! long end. Averaging [`Spectrum::to_xyz`] over uniformly sampled hero
//! wavelengths gives the tristimulus value of the underlying spectrum.

use std::ops::{Add, AddAssign, Index, Mul, MulAssign};

use crate::color::{Rgb, Xyz};
use crate::colorspace::LinearColorSpace;
use crate::simd;
use crate::spectral::{CIE_1931, LAMBDA_MAX, LAMBDA_MIN, SpectralDataset, spectral_reflectance_at4};

/// Samples per spectrum
pub const NUM_WAVELENGTHS: usize = 4;

const LAMBDA_RANGE: f64 = LAMBDA_MAX - LAMBDA_MIN;

/// Four spectral samples tied to a hero wavelength
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spectrum {
    hero: f64,
    channels: [f64; NUM_WAVELENGTHS],
}

/// Fold a wavelength into [LAMBDA_MIN, LAMBDA_MAX)
#[inline]
fn wrap_wavelength(lambda: f64) -> f64 {
    if !lambda.is_finite() {
        return LAMBDA_MIN;
    }
    let offset = (lambda - LAMBDA_MIN).rem_euclid(LAMBDA_RANGE);
    // rem_euclid can round up to the range itself
    if offset >= LAMBDA_RANGE {
        LAMBDA_MIN
    } else {
        offset + LAMBDA_MIN
    }
}

impl Spectrum {
    /// Create a spectrum from its channels
    ///
    /// `hero` is folded into the visible range.
    #[inline]
    pub fn new(hero: f64, channels: [f64; NUM_WAVELENGTHS]) -> Self {
        Self {
            hero: wrap_wavelength(hero),
            channels,
        }
    }

    /// All channels zero
    #[inline]
    pub fn zero(hero: f64) -> Self {
        Self::new(hero, [0.0; NUM_WAVELENGTHS])
    }

    /// All channels `value`
    #[inline]
    pub fn constant(hero: f64, value: f64) -> Self {
        Self::new(hero, [value; NUM_WAVELENGTHS])
    }

    /// Map a uniform random number in [0, 1) to a hero wavelength
    #[inline]
    pub fn sample_hero(u: f64) -> f64 {
        wrap_wavelength(LAMBDA_MIN + u.clamp(0.0, 1.0) * LAMBDA_RANGE)
    }

    /// The hero wavelength
    #[inline]
    pub fn hero_wavelength(&self) -> f64 {
        self.hero
    }

    /// Wavelength of channel `j`
    ///
    /// # Panics
    /// If `j >= NUM_WAVELENGTHS`.
    #[inline]
    pub fn wavelength(&self, j: usize) -> f64 {
        assert!(j < NUM_WAVELENGTHS);
        let mut offset = self.hero - LAMBDA_MIN + j as f64 * (LAMBDA_RANGE / NUM_WAVELENGTHS as f64);
        if offset >= LAMBDA_RANGE {
            offset -= LAMBDA_RANGE;
        }
        offset + LAMBDA_MIN
    }

    /// Wavelengths of all channels
    #[inline]
    pub fn wavelengths(&self) -> [f64; NUM_WAVELENGTHS] {
        std::array::from_fn(|j| self.wavelength(j))
    }

    /// Channel values
    #[inline]
    pub fn channels(&self) -> &[f64; NUM_WAVELENGTHS] {
        &self.channels
    }

    /// Upsample a reflectance given as XYZ relative to the equal-energy
    /// white, using the standard dataset
    pub fn from_xyz(hero: f64, xyz: Xyz) -> Self {
        Self::from_xyz_with(SpectralDataset::standard(), hero, xyz)
    }

    /// [`Spectrum::from_xyz`] against a given dataset
    ///
    /// Channels are clamped to [0, 1].
    pub fn from_xyz_with(dataset: &SpectralDataset, hero: f64, xyz: Xyz) -> Self {
        Self::upsample(dataset, hero, xyz).map_channels(|c| c.clamp(0.0, 1.0))
    }

    /// Upsample a reflectance in a linear RGB space, using the standard
    /// dataset
    pub fn from_rgb(hero: f64, rgb: Rgb, space: &LinearColorSpace) -> Self {
        Self::from_rgb_with(SpectralDataset::standard(), hero, rgb, space)
    }

    /// [`Spectrum::from_rgb`] against a given dataset
    pub fn from_rgb_with(dataset: &SpectralDataset, hero: f64, rgb: Rgb, space: &LinearColorSpace) -> Self {
        Self::from_xyz_with(dataset, hero, space.rgb_to_xyz_e(rgb))
    }

    /// Upsample an emission from XYZ relative to the equal-energy white
    ///
    /// Like [`Spectrum::from_xyz`] but without the upper clamp, so bright
    /// sources keep their power.
    pub fn from_xyz_illuminant(hero: f64, xyz: Xyz) -> Self {
        Self::upsample(SpectralDataset::standard(), hero, xyz).map_channels(|c| c.max(0.0))
    }

    /// Upsample an emission given in a linear RGB space
    pub fn from_rgb_illuminant(hero: f64, rgb: Rgb, space: &LinearColorSpace) -> Self {
        Self::from_xyz_illuminant(hero, space.rgb_to_xyz_e(rgb))
    }

    /// Raw lookup, normalised so the equal-energy white is 1
    fn upsample(dataset: &SpectralDataset, hero: f64, xyz: Xyz) -> Self {
        let mut spectrum = Self::zero(hero);
        let inv_eer = 1.0 / dataset.equal_energy_reflectance();
        let values = spectral_reflectance_at4(dataset, spectrum.wavelengths(), xyz);
        spectrum.channels = values.map(|v| v * inv_eer);
        spectrum
    }

    #[inline]
    fn map_channels(mut self, f: impl Fn(f64) -> f64) -> Self {
        self.channels = self.channels.map(f);
        self
    }

    /// Project onto XYZ relative to the equal-energy white
    ///
    /// A single call is a four-sample estimate; its expectation over
    /// uniformly distributed hero wavelengths is the tristimulus value.
    pub fn to_xyz(&self) -> Xyz {
        let cmf = &*CIE_1931;
        let scale = LAMBDA_RANGE / (NUM_WAVELENGTHS as f64 * cmf.y_integral());
        self.wavelengths()
            .iter()
            .zip(&self.channels)
            .fold(Xyz::default(), |acc, (&l, &c)| acc + cmf.evaluate(l) * c)
            * scale
    }

    /// Luminance (Y) of [`Spectrum::to_xyz`]
    pub fn luminance(&self) -> f64 {
        self.to_xyz().y
    }

    /// Convert to linear RGB without clamping
    pub fn to_rgb_unclamped(&self, space: &LinearColorSpace) -> Rgb {
        space.xyz_e_to_rgb(self.to_xyz())
    }

    /// Convert to linear RGB clamped to [0, 1] with ratios preserved
    pub fn to_rgb(&self, space: &LinearColorSpace) -> Rgb {
        self.to_rgb_unclamped(space).clamp_preserving_ratio()
    }

    /// [`Spectrum::to_xyz`] over a slice
    ///
    /// # Panics
    /// If `output` and `spectra` differ in length.
    pub fn to_xyz_batch(spectra: &[Spectrum], output: &mut [Xyz]) {
        let cmf = &*CIE_1931;
        let scale = LAMBDA_RANGE / (NUM_WAVELENGTHS as f64 * cmf.y_integral());
        let weights: Vec<[[f64; 3]; NUM_WAVELENGTHS]> = spectra
            .iter()
            .map(|s| s.wavelengths().map(|l| cmf.evaluate(l).to_array()))
            .collect();
        let channels: Vec<[f64; NUM_WAVELENGTHS]> = spectra.iter().map(|s| s.channels).collect();
        simd::spectral_to_xyz_batch(&weights, &channels, scale, bytemuck::cast_slice_mut(output));
    }

    /// [`Spectrum::to_rgb`] over a slice
    ///
    /// # Panics
    /// If `output` and `spectra` differ in length.
    pub fn to_rgb_batch(spectra: &[Spectrum], space: &LinearColorSpace, output: &mut [Rgb]) {
        let mut xyz = vec![Xyz::default(); spectra.len()];
        Self::to_xyz_batch(spectra, &mut xyz);
        for v in xyz.iter_mut() {
            *v = space.adapt_from_e(*v);
        }
        space.xyz_to_rgb_batch(&xyz, output);
        simd::clamp_preserving_ratio_batch(bytemuck::cast_slice_mut(output));
    }

    /// Multiply every channel by `factor`
    #[inline]
    pub fn scale(&self, factor: f64) -> Self {
        self.map_channels(|c| c * factor)
    }

    /// Set all channels to zero
    #[inline]
    pub fn set_zero(&mut self) {
        self.channels = [0.0; NUM_WAVELENGTHS];
    }

    /// Set all channels to `value`
    #[inline]
    pub fn set(&mut self, value: f64) {
        self.channels = [value; NUM_WAVELENGTHS];
    }

    /// True when every channel is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.channels.iter().all(|&c| c == 0.0)
    }

    /// Largest channel
    #[inline]
    pub fn max_value(&self) -> f64 {
        self.channels.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean of the channels
    #[inline]
    pub fn average(&self) -> f64 {
        self.channels.iter().sum::<f64>() / NUM_WAVELENGTHS as f64
    }

    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(
            self.hero, rhs.hero,
            "spectra with different hero wavelengths cannot be combined"
        );
        Self {
            hero: self.hero,
            channels: std::array::from_fn(|j| f(self.channels[j], rhs.channels[j])),
        }
    }
}

impl Index<usize> for Spectrum {
    type Output = f64;

    fn index(&self, j: usize) -> &f64 {
        &self.channels[j]
    }
}

impl Mul for Spectrum {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl Mul<f64> for Spectrum {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Add for Spectrum {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl MulAssign for Spectrum {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl MulAssign<f64> for Spectrum {
    #[inline]
    fn mul_assign(&mut self, rhs: f64) {
        *self = self.scale(rhs);
    }
}

impl AddAssign for Spectrum {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorspace::SRGB;

    const STEP: f64 = LAMBDA_RANGE / NUM_WAVELENGTHS as f64;

    #[test]
    fn test_wavelength_spacing() {
        for k in 0..470 {
            let s = Spectrum::zero(LAMBDA_MIN + k as f64 + 0.25);
            let w = s.wavelengths();
            assert_eq!(w[0], s.hero_wavelength());
            for j in 0..NUM_WAVELENGTHS {
                assert!((LAMBDA_MIN..LAMBDA_MAX).contains(&w[j]), "{w:?}");
                let next = w[(j + 1) % NUM_WAVELENGTHS];
                let gap = (next - w[j]).rem_euclid(LAMBDA_RANGE);
                assert!((gap - STEP).abs() < 1e-9, "{w:?}");
            }
        }
    }

    #[test]
    fn test_known_wavelengths() {
        assert_eq!(Spectrum::zero(550.0).wavelengths(), [550.0, 667.5, 785.0, 432.5]);
        assert_eq!(Spectrum::zero(360.0).wavelengths(), [360.0, 477.5, 595.0, 712.5]);
    }

    #[test]
    fn test_hero_is_folded_into_range() {
        assert_eq!(Spectrum::zero(830.0).hero_wavelength(), 360.0);
        assert_eq!(Spectrum::zero(900.0).hero_wavelength(), 430.0);
        assert_eq!(Spectrum::zero(f64::NAN).hero_wavelength(), 360.0);
        assert_eq!(Spectrum::sample_hero(0.0), 360.0);
        assert!(Spectrum::sample_hero(0.999_999_999) < LAMBDA_MAX);
        assert_eq!(Spectrum::sample_hero(1.0), 360.0);
    }

    #[test]
    fn test_elementwise_ops() {
        let a = Spectrum::new(500.0, [1.0, 2.0, 3.0, 4.0]);
        let b = Spectrum::new(500.0, [0.5, 0.25, 2.0, 0.0]);
        assert_eq!((a * b).channels(), &[0.5, 0.5, 6.0, 0.0]);
        assert_eq!((a + b).channels(), &[1.5, 2.25, 5.0, 4.0]);
        assert_eq!(a.scale(2.0).channels(), &[2.0, 4.0, 6.0, 8.0]);
        assert_eq!((a * 0.5).channels(), &[0.5, 1.0, 1.5, 2.0]);

        let mut c = a;
        c *= b;
        c += a;
        c *= 2.0;
        assert_eq!(c.channels(), &[3.0, 5.0, 18.0, 8.0]);
        assert_eq!(c.hero_wavelength(), 500.0);
        assert_eq!(c[2], 18.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "hero wavelengths")]
    fn test_mixed_heroes_panic_in_debug() {
        let _ = Spectrum::zero(400.0) + Spectrum::zero(500.0);
    }

    #[test]
    fn test_channel_helpers() {
        let mut s = Spectrum::new(600.0, [0.2, 0.8, 0.4, 0.6]);
        assert_eq!(s.max_value(), 0.8);
        assert!((s.average() - 0.5).abs() < 1e-12);
        assert!(!s.is_zero());
        s.set(0.3);
        assert_eq!(s.channels(), &[0.3; 4]);
        s.set_zero();
        assert!(s.is_zero());
    }

    #[test]
    fn test_white_upsamples_to_one() {
        for k in 0..47 {
            let hero = LAMBDA_MIN + k as f64 * 10.0;
            let s = Spectrum::from_rgb(hero, Rgb::WHITE, &SRGB);
            for &c in s.channels() {
                assert!((c - 1.0).abs() < 0.05, "hero {hero}: {:?}", s.channels());
            }
        }
    }

    #[test]
    fn test_black_and_degenerate_inputs() {
        let black = Spectrum::from_rgb(550.0, Rgb::BLACK, &SRGB);
        assert!(black.is_zero());

        for xyz in [
            Xyz::new(100.0, 0.0, 0.0),
            Xyz::new(-1.0, -2.0, -3.0),
            Xyz::new(f64::NAN, 0.5, 0.5),
            Xyz::new(f64::INFINITY, 1.0, 1.0),
        ] {
            let s = Spectrum::from_xyz(480.0, xyz);
            assert!(s.is_zero(), "{xyz:?} -> {:?}", s.channels());
        }
    }

    #[test]
    fn test_reflectance_is_clamped_but_emission_is_not() {
        let bright = Rgb::new(4.0, 4.0, 4.0);
        let r = Spectrum::from_rgb(550.0, bright, &SRGB);
        assert!(r.channels().iter().all(|&c| (0.0..=1.0).contains(&c)));
        let e = Spectrum::from_rgb_illuminant(550.0, bright, &SRGB);
        assert!(e.channels().iter().all(|&c| (c - 4.0).abs() < 0.2), "{:?}", e.channels());
    }

    #[test]
    fn test_red_favours_long_wavelengths() {
        let s = Spectrum::from_rgb(550.0, Rgb::new(1.0, 0.1, 0.1), &SRGB);
        // Channels sit at 550, 667.5, 785 and 432.5 nm
        let c = s.channels();
        assert!(c[1] > c[0] && c[1] > c[3], "{c:?}");
        assert!(c[2] > c[0] && c[2] > c[3], "{c:?}");
    }

    #[test]
    fn test_flat_spectrum_expectation_is_equal_energy() {
        let n = 1000;
        let mut acc = Xyz::default();
        for k in 0..n {
            let hero = Spectrum::sample_hero((k as f64 + 0.5) / n as f64);
            acc += Spectrum::constant(hero, 1.0).to_xyz();
        }
        let mean = acc * (1.0 / n as f64);
        assert!(mean.approx_eq(&Xyz::new(1.0, 1.0, 1.0), 1e-3), "{mean:?}");
    }

    #[test]
    fn test_to_rgb_clamps() {
        let s = Spectrum::constant(550.0, 50.0);
        let rgb = s.to_rgb(&SRGB);
        assert!(rgb.is_in_gamut());
        assert!((rgb.max_component() - 1.0).abs() < 1e-12);
        assert!(!s.to_rgb_unclamped(&SRGB).is_in_gamut());
        assert_eq!(s.luminance(), s.to_xyz().y);
    }

    #[test]
    fn test_batches_match_scalar() {
        let spectra: Vec<Spectrum> = (0..16)
            .map(|k| Spectrum::new(360.0 + 29.0 * k as f64, [0.1 * k as f64, 0.5, 1.5, 0.0]))
            .collect();

        let mut xyz = vec![Xyz::default(); spectra.len()];
        Spectrum::to_xyz_batch(&spectra, &mut xyz);
        let mut rgb = vec![Rgb::default(); spectra.len()];
        Spectrum::to_rgb_batch(&spectra, &SRGB, &mut rgb);

        for ((s, x), r) in spectra.iter().zip(&xyz).zip(&rgb) {
            assert!(s.to_xyz().approx_eq(x, 1e-12));
            assert!(s.to_rgb(&SRGB).approx_eq(r, 1e-9));
        }
    }
}
