//! Hero-wavelength estimator convergence
//!
//! The mean of `from_rgb(rgb).to_xyz()` over hero wavelengths should
//! approach the adapted tristimulus value of `rgb`.

use oxspectra_core::{Rgb, SRGB, Spectrum, Xyz};
use spectra_tests::estimator::{
    expected_xyz, expected_xyz_over, max_abs_error, random_heroes, target_xyz,
};

const COLORS: [Rgb; 4] = [
    Rgb::new(0.5, 0.3, 0.2),
    Rgb::new(0.2, 0.5, 0.3),
    Rgb::new(0.2, 0.3, 0.6),
    Rgb::new(0.8, 0.8, 0.2),
];

#[test]
fn test_stratified_error_shrinks() {
    for rgb in COLORS {
        let target = target_xyz(rgb, &SRGB);
        let coarse = max_abs_error(expected_xyz(rgb, &SRGB, 8), target);
        let fine = max_abs_error(expected_xyz(rgb, &SRGB, 512), target);
        assert!(fine <= coarse, "{rgb:?}: {fine} > {coarse}");
        assert!(fine < 5e-3, "{rgb:?}: {fine}");
    }
}

#[test]
fn test_random_heroes_converge() {
    for (i, rgb) in COLORS.into_iter().enumerate() {
        let target = target_xyz(rgb, &SRGB);
        let heroes = random_heroes(100 + i as u64, 16384);
        let err = max_abs_error(expected_xyz_over(rgb, &SRGB, &heroes), target);
        assert!(err < 0.02, "{rgb:?}: {err}");
    }
}

#[test]
fn test_single_sample_is_noisy_but_bounded() {
    let rgb = COLORS[0];
    let ys: Vec<f64> = random_heroes(7, 2000)
        .into_iter()
        .map(|h| Spectrum::from_rgb(h, rgb, &SRGB).luminance())
        .collect();
    let mean = ys.iter().sum::<f64>() / ys.len() as f64;
    let var = ys.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / ys.len() as f64;
    assert!(var > 0.0);
    assert!(ys.iter().all(|y| y.is_finite() && *y >= 0.0));
    assert!((mean - target_xyz(rgb, &SRGB).y).abs() < 0.05, "{mean}");
}

#[test]
fn test_batch_estimate_matches_scalar() {
    let rgb = COLORS[2];
    let spectra: Vec<Spectrum> = random_heroes(3, 1024)
        .into_iter()
        .map(|h| Spectrum::from_rgb(h, rgb, &SRGB))
        .collect();
    let mut batch = vec![Xyz::default(); spectra.len()];
    Spectrum::to_xyz_batch(&spectra, &mut batch);
    for (s, b) in spectra.iter().zip(&batch) {
        assert!(s.to_xyz().approx_eq(b, 1e-12));
    }
}

#[test]
fn test_red_hue_scenario() {
    let red = Rgb::new(1.0, 0.1, 0.1);
    let s = Spectrum::from_rgb(550.0, red, &SRGB);
    assert_eq!(s.wavelengths(), [550.0, 667.5, 785.0, 432.5]);
    let c = s.channels();
    assert!(c[1] > c[0] && c[1] > c[3], "{c:?}");
    assert!(c[2] > c[0] && c[2] > c[3], "{c:?}");

    let back = SRGB.xyz_e_to_rgb(expected_xyz(red, &SRGB, 256));
    let grey_level = (back.r + back.g + back.b) / 3.0;
    let grey = Rgb::new(grey_level, grey_level, grey_level);
    assert!(back.distance(&red) < back.distance(&grey), "{back:?}");
    assert!(back.r > back.g && back.r > back.b, "{back:?}");
}

