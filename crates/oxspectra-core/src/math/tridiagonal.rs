//! Symmetric tridiagonal solves
//!
//! The dataset builder's smoothness system is tridiagonal, so each
//! reflectance fit costs O(n) per right-hand side.

/// Symmetric tridiagonal matrix
///
/// `off[i]` couples rows `i` and `i + 1`; its last entry is unused.
#[derive(Debug, Clone, PartialEq)]
pub struct Tridiagonal {
    pub diag: Vec<f64>,
    pub off: Vec<f64>,
}

impl Tridiagonal {
    /// Size of the system
    #[inline]
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    /// True for a 0×0 system
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// Solve A x = rhs with the Thomas algorithm
    ///
    /// Returns None on a zero pivot. The matrices built here are strictly
    /// diagonally dominant, so that only happens for malformed input.
    pub fn solve(&self, rhs: &[f64]) -> Option<Vec<f64>> {
        let n = self.len();
        if n == 0 || rhs.len() != n {
            return None;
        }

        let mut c = vec![0.0; n];
        let mut d = vec![0.0; n];

        let mut pivot = self.diag[0];
        if pivot == 0.0 {
            return None;
        }
        c[0] = if n > 1 { self.off[0] / pivot } else { 0.0 };
        d[0] = rhs[0] / pivot;

        for i in 1..n {
            pivot = self.diag[i] - self.off[i - 1] * c[i - 1];
            if pivot == 0.0 || !pivot.is_finite() {
                return None;
            }
            c[i] = if i + 1 < n { self.off[i] / pivot } else { 0.0 };
            d[i] = (rhs[i] - self.off[i - 1] * d[i - 1]) / pivot;
        }

        let mut x = d;
        for i in (0..n - 1).rev() {
            x[i] -= c[i] * x[i + 1];
        }
        Some(x)
    }

    /// Multiply by a vector
    pub fn multiply(&self, v: &[f64]) -> Vec<f64> {
        let n = self.len();
        (0..n)
            .map(|i| {
                let mut acc = self.diag[i] * v[i];
                if i > 0 {
                    acc += self.off[i - 1] * v[i - 1];
                }
                if i + 1 < n {
                    acc += self.off[i] * v[i + 1];
                }
                acc
            })
            .collect()
    }
}
