//! Shared dataset reads from many threads

use std::sync::Barrier;
use std::thread;

use oxspectra_core::{Rgb, SRGB, SpectralDataset, Spectrum};
use rayon::prelude::*;
use spectra_tests::patterns::{ColorPattern, generate_pattern};

#[test]
fn test_standard_dataset_initialised_once() {
    let threads = 8;
    let barrier = Barrier::new(threads);
    let addresses: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    SpectralDataset::standard() as *const SpectralDataset as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_parallel_matches_sequential() {
    let colors = generate_pattern(ColorPattern::Random(11), 512);
    let job = |(i, rgb): (usize, &Rgb)| {
        let hero = Spectrum::sample_hero(i as f64 / 512.0);
        let s = Spectrum::from_rgb(hero, *rgb, &SRGB);
        (s.channels().map(f64::to_bits), s.to_xyz().to_array().map(f64::to_bits))
    };
    let sequential: Vec<_> = colors.iter().enumerate().map(job).collect();
    let parallel: Vec<_> = colors.par_iter().enumerate().map(job).collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_scoped_threads_agree() {
    let colors = generate_pattern(ColorPattern::ColorCube, 125);
    let reference: Vec<[f64; 4]> = colors
        .iter()
        .map(|c| *Spectrum::from_rgb(480.0, *c, &SRGB).channels())
        .collect();
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for (c, expected) in colors.iter().zip(&reference) {
                    assert_eq!(Spectrum::from_rgb(480.0, *c, &SRGB).channels(), expected);
                }
            });
        }
    });
}
