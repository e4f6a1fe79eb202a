//! Hero-wavelength estimators
//!
//! A single [`Spectrum`] carries four wavelengths, so its colour is a noisy
//! estimate. Averaging over hero wavelengths spread across the visible
//! range recovers the tristimulus value the spectrum stands for.

use oxspectra_core::{LinearColorSpace, Rgb, Spectrum, Xyz};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// `n` hero wavelengths, one per equal stratum of the visible range
pub fn stratified_heroes(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |k| Spectrum::sample_hero((k as f64 + 0.5) / n as f64))
}

/// `n` uniformly random hero wavelengths
pub fn random_heroes(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| Spectrum::sample_hero(rng.r#gen())).collect()
}

fn mean_xyz(heroes: &[f64], make: impl Fn(f64) -> Spectrum + Sync) -> Xyz {
    let n = heroes.len().max(1) as f64;
    heroes
        .par_iter()
        .map(|&h| make(h).to_xyz())
        .reduce(Xyz::default, |a, b| a + b)
        * (1.0 / n)
}

/// Mean equal-energy XYZ of an RGB reflectance over `n` stratified heroes
pub fn expected_xyz(rgb: Rgb, space: &LinearColorSpace, n: usize) -> Xyz {
    let heroes: Vec<f64> = stratified_heroes(n).collect();
    mean_xyz(&heroes, |h| Spectrum::from_rgb(h, rgb, space))
}

/// [`expected_xyz`] over explicit hero wavelengths
pub fn expected_xyz_over(rgb: Rgb, space: &LinearColorSpace, heroes: &[f64]) -> Xyz {
    mean_xyz(heroes, |h| Spectrum::from_rgb(h, rgb, space))
}

/// [`expected_xyz`] mapped back into `space`, unclamped
pub fn expected_rgb(rgb: Rgb, space: &LinearColorSpace, n: usize) -> Rgb {
    space.xyz_e_to_rgb(expected_xyz(rgb, space, n))
}

/// The equal-energy XYZ an RGB reflectance should average to
pub fn target_xyz(rgb: Rgb, space: &LinearColorSpace) -> Xyz {
    space.rgb_to_xyz_e(rgb)
}

/// Largest absolute component difference
pub fn max_abs_error(a: Xyz, b: Xyz) -> f64 {
    let (a, b) = (a.to_array(), b.to_array());
    (0..3).map(|i| (a[i] - b[i]).abs()).fold(0.0, f64::max)
}
