//! Batch kernels over spectral samples and RGB triples

use multiversion::multiversion;

/// Project a batch of four-channel samples onto tristimulus values
///
/// `weights[i][j]` is the colour-matching value at the j-th wavelength of
/// sample i, and `channels[i][j]` is that sample's value there. Each output
/// is `scale * Σ_j channels[i][j] * weights[i][j]`.
///
/// # Panics
/// If the three slices differ in length.
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn spectral_to_xyz_batch(
    weights: &[[[f64; 3]; 4]],
    channels: &[[f64; 4]],
    scale: f64,
    output: &mut [[f64; 3]],
) {
    assert_eq!(weights.len(), channels.len());
    assert_eq!(output.len(), channels.len());

    for ((w, c), out) in weights.iter().zip(channels).zip(output.iter_mut()) {
        let mut acc = [0.0; 3];
        for j in 0..4 {
            acc[0] += c[j] * w[j][0];
            acc[1] += c[j] * w[j][1];
            acc[2] += c[j] * w[j][2];
        }
        out[0] = acc[0] * scale;
        out[1] = acc[1] * scale;
        out[2] = acc[2] * scale;
    }
}

/// Clamp RGB triples into [0, 1] keeping the ratio between channels
///
/// Negative and NaN channels become 0. A triple whose largest channel
/// exceeds 1 is divided by that channel.
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn clamp_preserving_ratio_batch(data: &mut [[f64; 3]]) {
    for rgb in data.iter_mut() {
        // NaN fails the comparison and falls through to zero
        for c in rgb.iter_mut() {
            if !(*c > 0.0) {
                *c = 0.0;
            }
        }
        let max = rgb[0].max(rgb[1]).max(rgb[2]);
        if max > 1.0 {
            if max.is_finite() {
                rgb[0] /= max;
                rgb[1] /= max;
                rgb[2] /= max;
            } else {
                for c in rgb.iter_mut() {
                    *c = if c.is_finite() { 0.0 } else { 1.0 };
                }
            }
        }
    }
}
