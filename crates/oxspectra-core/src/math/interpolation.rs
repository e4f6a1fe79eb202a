//! Interpolation primitives for the upsampling grid
//!
//! - Linear interpolation (wavelength bins)
//! - Barycentric weights (boundary triangle fans)

/// Linear interpolation between two values
///
/// Returns a + t * (b - a)
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// 2D cross product a × b
#[inline]
pub fn cross2(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// Barycentric weights of `p` in the triangle (a, b, c)
///
/// Returns (wa, wb, wc) summing to 1, or None for a degenerate triangle.
/// A point is inside (or on an edge) when all three are non-negative.
#[inline]
pub fn barycentric(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Option<(f64, f64, f64)> {
    let e = (p.0 - a.0, p.1 - a.1);
    let e0 = (b.0 - a.0, b.1 - a.1);
    let e1 = (c.0 - a.0, c.1 - a.1);
    let area = cross2(e0, e1);
    if area == 0.0 || !area.is_finite() {
        return None;
    }
    let wc = cross2(e0, e) / area;
    let wb = cross2(e, e1) / area;
    Some((1.0 - wb - wc, wb, wc))
}
