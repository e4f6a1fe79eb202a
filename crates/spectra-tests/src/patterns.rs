//! Deterministic colour patterns
//!
//! Every pattern yields linear RGB in [0, 1].

use oxspectra_core::{Rgb, Xyz};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pattern families used across the statistical tests
#[derive(Debug, Clone, Copy)]
pub enum ColorPattern {
    /// Neutral ramp from black to white
    Grayscale,
    /// Fully saturated hues at half value
    HueRamp,
    /// n × n × n grid over the unit cube
    ColorCube,
    /// Skin tones across the Fitzpatrick range
    SkinTones,
    /// Colours on the faces of the unit cube
    GamutBoundary,
    /// Uniform random colours from a seed
    Random(u64),
}

/// Generate `count` colours of a pattern
///
/// `ColorCube` uses the largest cube fitting in `count`; `SkinTones`
/// cycles through its fixed palette.
pub fn generate_pattern(pattern: ColorPattern, count: usize) -> Vec<Rgb> {
    match pattern {
        ColorPattern::Grayscale => {
            let denom = count.saturating_sub(1).max(1) as f64;
            (0..count)
                .map(|i| {
                    let v = i as f64 / denom;
                    Rgb::new(v, v, v)
                })
                .collect()
        }
        ColorPattern::HueRamp => (0..count)
            .map(|i| hsv_to_rgb(i as f64 / count.max(1) as f64 * 360.0, 1.0, 0.5))
            .collect(),
        ColorPattern::ColorCube => {
            let n = (count as f64).cbrt().floor().max(1.0) as usize;
            let step = n.saturating_sub(1).max(1) as f64;
            let mut out = Vec::with_capacity(n * n * n);
            for r in 0..n {
                for g in 0..n {
                    for b in 0..n {
                        out.push(Rgb::new(r as f64 / step, g as f64 / step, b as f64 / step));
                    }
                }
            }
            out
        }
        ColorPattern::SkinTones => SKIN_TONES_SRGB8
            .iter()
            .cycle()
            .take(count)
            .map(|&[r, g, b]| Rgb::new(srgb8_to_linear(r), srgb8_to_linear(g), srgb8_to_linear(b)))
            .collect(),
        ColorPattern::GamutBoundary => {
            let mut rng = ChaCha8Rng::seed_from_u64(0x6a6d);
            (0..count)
                .map(|i| {
                    let mut c = [rng.r#gen::<f64>(), rng.r#gen::<f64>(), rng.r#gen::<f64>()];
                    c[i % 3] = if (i / 3) % 2 == 0 { 0.0 } else { 1.0 };
                    Rgb::from_array(c)
                })
                .collect()
        }
        ColorPattern::Random(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..count)
                .map(|_| Rgb::new(rng.r#gen(), rng.r#gen(), rng.r#gen()))
                .collect()
        }
    }
}

/// Random XYZ triples with every component in [0, `max`)
pub fn random_xyz(seed: u64, count: usize, max: f64) -> Vec<Xyz> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Xyz::new(rng.gen_range(0.0..max), rng.gen_range(0.0..max), rng.gen_range(0.0..max)))
        .collect()
}

const SKIN_TONES_SRGB8: [[u8; 3]; 6] = [
    [255, 224, 189],
    [241, 194, 125],
    [224, 172, 105],
    [198, 134, 66],
    [141, 85, 36],
    [89, 47, 42],
];

/// Decode an 8-bit sRGB channel
pub fn srgb8_to_linear(v: u8) -> f64 {
    let v = v as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let c = v * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    Rgb::new(r + m, g + m, b + m)
}
