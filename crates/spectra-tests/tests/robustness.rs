//! Degenerate and hostile inputs
//!
//! None of these may panic, and every output must be finite and
//! non-negative.

use oxspectra_core::spectral::{LAMBDA_MAX, LAMBDA_MIN};
use oxspectra_core::{
    NoContribution, Rgb, SRGB, SpectralDataset, Spectrum, Xyz, spectral_reflectance_at,
    spectral_reflectance_at4,
};

fn hostile_xyz() -> Vec<Xyz> {
    vec![
        Xyz::new(0.0, 0.0, 0.0),
        Xyz::new(100.0, 0.0, 0.0),
        Xyz::new(0.0, 100.0, 0.0),
        Xyz::new(-0.5, -0.5, -0.5),
        Xyz::new(-1.0, 0.5, 0.2),
        Xyz::new(f64::NAN, 0.5, 0.5),
        Xyz::new(f64::INFINITY, 0.5, 0.5),
        Xyz::new(f64::NEG_INFINITY, 0.5, 0.5),
        Xyz::new(f64::MAX, f64::MAX, f64::MAX),
        Xyz::new(f64::MIN_POSITIVE, f64::MIN_POSITIVE, f64::MIN_POSITIVE),
        Xyz::new(1e-300, 0.0, 0.0),
    ]
}

fn hostile_wavelengths() -> Vec<f64> {
    vec![
        LAMBDA_MIN,
        LAMBDA_MAX,
        LAMBDA_MIN - 1.0,
        LAMBDA_MAX + 1.0,
        -1e9,
        1e9,
        0.0,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ]
}

#[test]
fn test_black_has_no_contribution() {
    let ds = SpectralDataset::standard();
    assert_eq!(
        ds.locate(Xyz::new(0.0, 0.0, 0.0)),
        Err(NoContribution::DegenerateBrightness)
    );
    for h in [400.0, 550.0, 700.0] {
        assert!(Spectrum::from_xyz(h, Xyz::default()).is_zero());
        assert!(Spectrum::from_rgb(h, Rgb::BLACK, &SRGB).is_zero());
    }
}

#[test]
fn test_pure_x_outside_gamut() {
    let ds = SpectralDataset::standard();
    assert!(ds.locate(Xyz::new(100.0, 0.0, 0.0)).is_err());
    assert_eq!(spectral_reflectance_at(ds, 550.0, Xyz::new(100.0, 0.0, 0.0)), 0.0);
}

#[test]
fn test_negative_and_non_finite_brightness() {
    let ds = SpectralDataset::standard();
    for xyz in [
        Xyz::new(-0.5, -0.5, -0.5),
        Xyz::new(f64::NAN, 0.5, 0.5),
        Xyz::new(f64::INFINITY, 0.5, 0.5),
    ] {
        assert_eq!(ds.locate(xyz), Err(NoContribution::DegenerateBrightness), "{xyz:?}");
    }
}

#[test]
fn test_lookups_stay_finite() {
    let ds = SpectralDataset::standard();
    for xyz in hostile_xyz() {
        for lambda in hostile_wavelengths() {
            let r = spectral_reflectance_at(ds, lambda, xyz);
            assert!(r.is_finite(), "{xyz:?} at {lambda}: {r}");
        }
        let r4 = spectral_reflectance_at4(ds, [f64::NAN, 360.0, 829.9, 1e6], xyz);
        assert!(r4.iter().all(|v| v.is_finite()), "{xyz:?}: {r4:?}");
    }
}

#[test]
fn test_spectra_stay_in_range() {
    for xyz in hostile_xyz() {
        for hero in hostile_wavelengths() {
            let s = Spectrum::from_xyz(hero, xyz);
            for (&l, &c) in s.wavelengths().iter().zip(s.channels()) {
                assert!((LAMBDA_MIN..LAMBDA_MAX).contains(&l), "hero {hero} gave {l}");
                assert!((0.0..=1.0).contains(&c), "{xyz:?} hero {hero}: {c}");
            }
            let light = Spectrum::from_xyz_illuminant(hero, xyz);
            assert!(light.channels().iter().all(|&c| c >= 0.0 && c.is_finite()));
            let back = s.to_xyz();
            assert!(back.is_finite(), "{xyz:?} hero {hero}: {back:?}");
        }
    }
}

#[test]
fn test_hostile_rgb_to_rgb() {
    let inputs = [
        Rgb::new(-1.0, 0.5, 0.5),
        Rgb::new(f64::NAN, f64::NAN, f64::NAN),
        Rgb::new(1e12, 0.0, 0.0),
        Rgb::new(2.0, 2.0, 2.0),
    ];
    for rgb in inputs {
        for hero in [360.0, 500.0, 800.0] {
            let out = Spectrum::from_rgb(hero, rgb, &SRGB).to_rgb(&SRGB);
            assert!(out.is_in_gamut(), "{rgb:?}: {out:?}");
        }
    }
}

#[test]
fn test_to_rgb_of_wild_spectra() {
    let wild = [
        Spectrum::new(550.0, [f64::INFINITY, 0.0, 0.0, 0.0]),
        Spectrum::new(550.0, [1e300, 1e300, 1e300, 1e300]),
        Spectrum::new(f64::NAN, [0.5; 4]),
        Spectrum::new(550.0, [-1.0, -1.0, -1.0, -1.0]),
    ];
    for s in wild {
        let rgb = s.to_rgb(&SRGB);
        assert!(rgb.is_in_gamut(), "{s:?}: {rgb:?}");
    }
}
