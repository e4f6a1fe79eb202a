//! Accuracy measurement with perceptual colour difference
//!
//! deltaE2000 is the metric: 1.0 is roughly the smallest difference a
//! trained observer notices.

use oxspectra_core::{LinearColorSpace, Rgb, WhitePoint, Xyz};
use serde::{Deserialize, Serialize};

/// Summary of a set of deltaE values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaEStats {
    /// Mean deltaE
    pub mean: f64,
    /// Maximum deltaE
    pub max: f64,
    /// 95th percentile deltaE
    pub p95: f64,
    /// Number of samples
    pub count: usize,
}

impl DeltaEStats {
    /// Summarise raw deltaE values; NaN sorts last
    pub fn from_samples(mut samples: Vec<f64>) -> Self {
        samples.sort_by(|a, b| a.total_cmp(b));
        let count = samples.len();
        if count == 0 {
            return Self {
                mean: 0.0,
                max: 0.0,
                p95: 0.0,
                count,
            };
        }
        let p95_idx = ((count as f64 * 0.95) as usize).min(count - 1);
        Self {
            mean: samples.iter().sum::<f64>() / count as f64,
            max: samples[count - 1],
            p95: samples[p95_idx],
            count,
        }
    }

    /// Every difference imperceptible (max deltaE < 1.0)
    pub fn is_excellent(&self) -> bool {
        self.max < 1.0
    }

    /// Every difference barely perceptible (max deltaE < 2.0)
    pub fn is_good(&self) -> bool {
        self.max < 2.0
    }

    /// Every difference acceptable (max deltaE < 3.5)
    pub fn is_acceptable(&self) -> bool {
        self.max < 3.5
    }
}

/// CIE 1976 L*a*b* relative to `white`
pub fn xyz_to_lab(xyz: Xyz, white: &WhitePoint) -> [f64; 3] {
    fn f(t: f64) -> f64 {
        const DELTA: f64 = 6.0 / 29.0;
        if t > DELTA * DELTA * DELTA {
            t.cbrt()
        } else {
            t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
        }
    }

    let fx = f(xyz.x / white.xyz.x);
    let fy = f(xyz.y / white.xyz.y);
    let fz = f(xyz.z / white.xyz.z);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Hue angle in degrees, [0, 360)
fn hue_degrees(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        b.atan2(a).to_degrees().rem_euclid(360.0)
    }
}

/// CIEDE2000 between two Lab colours (kL = kC = kH = 1)
pub fn delta_e_2000(lab1: [f64; 3], lab2: [f64; 3]) -> f64 {
    const POW25_7: f64 = 6_103_515_625.0;
    let [l1, a1, b1] = lab1;
    let [l2, a2, b2] = lab2;

    // a* stretched so neutral-ish colours get more hue resolution
    let c_bar = (a1.hypot(b1) + a2.hypot(b2)) / 2.0;
    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());
    let (a1p, a2p) = (a1 * (1.0 + g), a2 * (1.0 + g));

    let (c1p, c2p) = (a1p.hypot(b1), a2p.hypot(b2));
    let (h1p, h2p) = (hue_degrees(a1p, b1), hue_degrees(a2p, b2));
    let chroma_product = c1p * c2p;

    let dh = h2p - h1p;
    let dhp = if chroma_product == 0.0 {
        0.0
    } else if dh > 180.0 {
        dh - 360.0
    } else if dh < -180.0 {
        dh + 360.0
    } else {
        dh
    };
    let d_l = l2 - l1;
    let d_c = c2p - c1p;
    let d_h = 2.0 * chroma_product.sqrt() * (dhp.to_radians() / 2.0).sin();

    let l_bar = (l1 + l2) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;
    let h_bar = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar).to_radians().cos()
        + 0.32 * (3.0 * h_bar + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar - 63.0).to_radians().cos();

    let l_dev = (l_bar - 50.0).powi(2);
    let s_l = 1.0 + 0.015 * l_dev / (20.0 + l_dev).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_p;
    let s_h = 1.0 + 0.015 * c_bar_p * t;

    let c_bar_p7 = c_bar_p.powi(7);
    let r_c = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
    let d_theta = 30.0 * (-((h_bar - 275.0) / 25.0).powi(2)).exp();
    let r_t = -r_c * (2.0 * d_theta).to_radians().sin();

    let (tl, tc, th) = (d_l / s_l, d_c / s_c, d_h / s_h);
    (tl * tl + tc * tc + th * th + r_t * tc * th).sqrt()
}

/// deltaE2000 between two linear RGB colours of `space`
pub fn delta_e_rgb(reference: Rgb, result: Rgb, space: &LinearColorSpace) -> f64 {
    let white = space.white();
    delta_e_2000(
        xyz_to_lab(space.rgb_to_xyz(reference), white),
        xyz_to_lab(space.rgb_to_xyz(result), white),
    )
}

/// Compare two buffers of linear RGB colours
///
/// # Panics
/// If the buffers differ in length.
pub fn compare_rgb(reference: &[Rgb], result: &[Rgb], space: &LinearColorSpace) -> DeltaEStats {
    assert_eq!(reference.len(), result.len());
    DeltaEStats::from_samples(
        reference
            .iter()
            .zip(result)
            .map(|(&a, &b)| delta_e_rgb(a, b, space))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxspectra_core::{D65, SRGB};

    #[test]
    fn test_delta_e_same_color() {
        let lab = [50.0, 25.0, -25.0];
        assert!(delta_e_2000(lab, lab) < 1e-12);
    }

    #[test]
    fn test_delta_e_reference_pairs() {
        // Sharma, Wu and Dalal (2005) test data
        let pairs = [
            ([50.0, 2.6772, -79.7751], [50.0, 0.0, -82.7485], 2.0425),
            ([50.0, 3.1571, -77.2803], [50.0, 0.0, -82.7485], 2.8615),
            ([50.0, 2.5, 0.0], [50.0, 0.0, -2.5], 4.3065),
            ([50.0, 2.5, 0.0], [73.0, 25.0, -18.0], 27.1492),
            ([60.2574, -34.0099, 36.2677], [60.4626, -34.1751, 39.4387], 1.2644),
            ([22.7233, 20.0904, -46.6940], [23.0331, 14.9730, -42.5619], 2.0373),
        ];
        for (lab1, lab2, expected) in pairs {
            let de = delta_e_2000(lab1, lab2);
            assert!((de - expected).abs() < 1e-4, "{lab1:?} {lab2:?}: {de} vs {expected}");
        }
    }

    #[test]
    fn test_lab_of_white_and_black() {
        let white = xyz_to_lab(D65.xyz, &D65);
        assert!((white[0] - 100.0).abs() < 1e-9);
        assert!(white[1].abs() < 1e-9 && white[2].abs() < 1e-9);
        assert_eq!(xyz_to_lab(Xyz::default(), &D65), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_identical_buffers() {
        let buf = [Rgb::new(1.0, 0.5, 0.25), Rgb::new(0.1, 0.1, 0.1)];
        let stats = compare_rgb(&buf, &buf, &SRGB);
        assert!(stats.is_excellent());
        assert_eq!(stats.count, 2);
        assert!(stats.mean < 1e-9);
    }

    #[test]
    fn test_stats_percentiles() {
        let stats = DeltaEStats::from_samples((1..=100).map(|v| v as f64 / 10.0).collect());
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.p95, 9.6);
        assert!((stats.mean - 5.05).abs() < 1e-9);
        assert!(!stats.is_acceptable());
        assert_eq!(DeltaEStats::from_samples(Vec::new()).count, 0);
    }

    #[test]
    fn test_report_json_roundtrip() {
        let stats = DeltaEStats {
            mean: 0.25,
            max: 0.75,
            p95: 0.5,
            count: 64,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"count\":64"));
        let back: DeltaEStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
