//! CIE 1931 2° standard observer
//!
//! The colour-matching functions are evaluated analytically with the
//! multi-lobe piecewise Gaussian fit of Wyman, Sloan and Shirley (2013),
//! which tracks the tabulated CIE data to well under 1% of peak.
//!
//! The table is normalised so that all three functions integrate to the
//! same value over the sampled range. With that, a flat spectrum maps to
//! the equal-energy white (X = Y = Z), which is the white the upsampling
//! grid is built around.

use once_cell::sync::Lazy;

use crate::color::Xyz;
use crate::spectral::dataset::WavelengthSampling;

/// Bins whose x̄+ȳ+z̄ falls below this fraction of the peak are left out of
/// the locus. The analytic fit folds back along x+y=1 in both tails, where
/// no smooth spectrum can reach the chromaticities anyway.
pub(crate) const LOCUS_MIN_RELATIVE: f64 = 1e-3;

/// The normalised CIE 1931 observer over the standard sampling
pub static CIE_1931: Lazy<ColorMatchingTable> =
    Lazy::new(|| ColorMatchingTable::cie1931(WavelengthSampling::standard()));

/// Piecewise Gaussian with separate widths on each side of the mean
#[inline]
fn lobe(lambda: f64, mean: f64, left: f64, right: f64) -> f64 {
    let t = (lambda - mean) / if lambda < mean { left } else { right };
    (-0.5 * t * t).exp()
}

/// Raw x̄(λ)
pub fn x_bar(lambda: f64) -> f64 {
    1.056 * lobe(lambda, 599.8, 37.9, 31.0) + 0.362 * lobe(lambda, 442.0, 16.0, 26.7)
        - 0.065 * lobe(lambda, 501.1, 20.4, 26.2)
}

/// Raw ȳ(λ)
pub fn y_bar(lambda: f64) -> f64 {
    0.821 * lobe(lambda, 568.8, 46.9, 40.5) + 0.286 * lobe(lambda, 530.9, 16.3, 31.1)
}

/// Raw z̄(λ)
pub fn z_bar(lambda: f64) -> f64 {
    1.217 * lobe(lambda, 437.0, 11.8, 36.0) + 0.681 * lobe(lambda, 459.0, 26.0, 13.8)
}

/// Colour-matching functions normalised over a wavelength sampling
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMatchingTable {
    sampling: WavelengthSampling,
    x_scale: f64,
    z_scale: f64,
    y_integral: f64,
}

impl ColorMatchingTable {
    /// Normalise the CIE 1931 observer over `sampling`
    ///
    /// Integrals use the rectangle rule on the sampling's bins, the same
    /// quadrature the dataset builder projects spectra with.
    pub fn cie1931(sampling: WavelengthSampling) -> Self {
        let bin = sampling.bin_size();
        let (mut ix, mut iy, mut iz) = (0.0, 0.0, 0.0);
        for lambda in sampling.wavelengths() {
            ix += x_bar(lambda);
            iy += y_bar(lambda);
            iz += z_bar(lambda);
        }
        ix *= bin;
        iy *= bin;
        iz *= bin;

        log::trace!("CIE 1931 integrals over {sampling:?}: x={ix:.6} y={iy:.6} z={iz:.6}");

        Self {
            sampling,
            x_scale: iy / ix,
            z_scale: iy / iz,
            y_integral: iy,
        }
    }

    /// Sampling the table was normalised over
    pub fn sampling(&self) -> &WavelengthSampling {
        &self.sampling
    }

    /// Normalised (x̄, ȳ, z̄) at a wavelength
    #[inline]
    pub fn evaluate(&self, lambda: f64) -> Xyz {
        Xyz::new(
            x_bar(lambda) * self.x_scale,
            y_bar(lambda),
            z_bar(lambda) * self.z_scale,
        )
    }

    /// ∫ȳ(λ)dλ over the sampled range
    ///
    /// After normalisation x̄ and z̄ integrate to the same value.
    #[inline]
    pub fn y_integral(&self) -> f64 {
        self.y_integral
    }

    /// Normalised functions at every sample of the table's sampling
    pub fn samples(&self) -> Vec<Xyz> {
        self.sampling.wavelengths().map(|l| self.evaluate(l)).collect()
    }

    /// Integrate a sampled spectrum against the functions
    ///
    /// `spectrum` holds one value per sample of the table's sampling.
    /// Extra values are ignored and missing ones count as zero.
    pub fn integrate(&self, spectrum: &[f64]) -> Xyz {
        let bin = self.sampling.bin_size();
        self.sampling
            .wavelengths()
            .zip(spectrum)
            .fold(Xyz::default(), |acc, (lambda, &v)| acc + self.evaluate(lambda) * (v * bin))
    }

    /// Chromaticities of monochromatic light along the sampling
    ///
    /// Only bins where the functions carry at least [`LOCUS_MIN_RELATIVE`]
    /// of their peak are included.
    pub fn spectral_locus(&self) -> Vec<(f64, f64)> {
        self.locus_bins()
            .into_iter()
            .filter_map(|i| self.evaluate(self.sampling.wavelength(i)).chromaticity())
            .collect()
    }

    /// Sample indices that make up the spectral locus
    pub(crate) fn locus_bins(&self) -> Vec<usize> {
        let sums: Vec<f64> = self.samples().iter().map(Xyz::sum).collect();
        let peak = sums.iter().copied().fold(0.0, f64::max);
        (0..sums.len())
            .filter(|&i| sums[i] > 0.0 && sums[i] >= LOCUS_MIN_RELATIVE * peak)
            .collect()
    }
}
