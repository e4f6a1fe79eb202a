//! The spectral upsampling grid and its lookup
//!
//! The grid lives in a rotated and scaled copy of the CIE xy chromaticity
//! plane, so that unit squares in (u, v) are grid cells. Cells fully
//! inside the spectral locus are quads interpolated bilinearly. Cells
//! crossing the locus are triangle fans around their first point.
//!
//! A lookup locates the cell once and produces [`CellWeights`], which can
//! then be evaluated at any number of wavelengths. Failure to locate a
//! colour is not an error: it is tagged as a [`NoContribution`] and counts
//! as zero.

use once_cell::sync::Lazy;

use crate::color::Xyz;
use crate::error::DatasetError;
use crate::math::{barycentric, lerp};
use crate::spectral::builder::DatasetBuilder;
use crate::spectral::{LAMBDA_MAX, LAMBDA_MIN, SPECTRUM_NUM_SAMPLES};

/// Slack allowed on barycentric weights along shared fan edges
const BARYCENTRIC_EPSILON: f64 = 1e-12;

static STANDARD: Lazy<SpectralDataset> = Lazy::new(|| match DatasetBuilder::default().build() {
    Ok(dataset) => dataset,
    Err(e) => {
        log::error!("Standard spectral dataset failed to build: {e}");
        SpectralDataset::unavailable()
    }
});

/// Uniform wavelength sampling, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavelengthSampling {
    min: f64,
    max: f64,
    samples: usize,
}

impl WavelengthSampling {
    /// Create a sampling of `samples` wavelengths over [min, max]
    pub fn new(min: f64, max: f64, samples: usize) -> Result<Self, DatasetError> {
        if samples < 2 || !min.is_finite() || !max.is_finite() || min >= max {
            return Err(DatasetError::InvalidWavelengthRange { min, max, samples });
        }
        Ok(Self { min, max, samples })
    }

    /// 360–830 nm in 5 nm bins
    pub const fn standard() -> Self {
        Self {
            min: LAMBDA_MIN,
            max: LAMBDA_MAX,
            samples: SPECTRUM_NUM_SAMPLES,
        }
    }

    /// First sampled wavelength
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Last sampled wavelength
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of samples
    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Spacing between samples
    #[inline]
    pub fn bin_size(&self) -> f64 {
        (self.max - self.min) / (self.samples - 1) as f64
    }

    /// Wavelength of sample `i`
    #[inline]
    pub fn wavelength(&self, i: usize) -> f64 {
        self.min + i as f64 * self.bin_size()
    }

    /// All sampled wavelengths in increasing order
    pub fn wavelengths(&self) -> impl Iterator<Item = f64> + Clone + use<> {
        let sampling = *self;
        (0..sampling.samples).map(move |i| sampling.wavelength(i))
    }

    /// Bracketing samples and blend factor for a wavelength
    ///
    /// Wavelengths outside the range clamp to its ends. Returns
    /// `(sb0, sb1, t)` with `sb1 = sb0 + 1` except at the last sample.
    #[inline]
    pub fn position(&self, lambda: f64) -> (usize, usize, f64) {
        let t = (lambda - self.min) / (self.max - self.min);
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.samples - 1;
        let sb = t * last as f64;
        let sb0 = (sb as usize).min(last);
        let sb1 = (sb0 + 1).min(last);
        (sb0, sb1, sb - sb0 as f64)
    }
}

impl Default for WavelengthSampling {
    fn default() -> Self {
        Self::standard()
    }
}

/// Affine map between CIE xy and grid (u, v)
///
/// Both directions are stored as row-major 2x3 matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    xy_to_uv: [f64; 6],
    uv_to_xy: [f64; 6],
}

#[inline]
fn apply_2x3(m: &[f64; 6], (a, b): (f64, f64)) -> (f64, f64) {
    (m[0] * a + m[1] * b + m[2], m[3] * a + m[4] * b + m[5])
}

impl GridTransform {
    /// Create from a matrix pair
    ///
    /// The caller guarantees the two maps are mutual inverses.
    pub const fn from_matrices(xy_to_uv: [f64; 6], uv_to_xy: [f64; 6]) -> Self {
        Self { xy_to_uv, uv_to_xy }
    }

    /// The identity map
    pub const fn identity() -> Self {
        let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        Self::from_matrices(m, m)
    }

    /// Rotate xy by `angle` radians, shift so `origin` (in rotated xy)
    /// becomes (0, 0), and scale so one unit is `cell_size`
    pub fn rotated(angle: f64, origin: (f64, f64), cell_size: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let (u0, v0) = origin;
        let inv = 1.0 / cell_size;
        Self {
            xy_to_uv: [c * inv, -s * inv, -u0 * inv, s * inv, c * inv, -v0 * inv],
            uv_to_xy: [
                c * cell_size,
                s * cell_size,
                c * u0 + s * v0,
                -s * cell_size,
                c * cell_size,
                -s * u0 + c * v0,
            ],
        }
    }

    /// Chromaticity to grid coordinates
    #[inline]
    pub fn xy_to_uv(&self, xy: (f64, f64)) -> (f64, f64) {
        apply_2x3(&self.xy_to_uv, xy)
    }

    /// Grid coordinates to chromaticity
    #[inline]
    pub fn uv_to_xy(&self, uv: (f64, f64)) -> (f64, f64) {
        apply_2x3(&self.uv_to_xy, uv)
    }
}

/// A reference spectrum placed on the grid
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralDataPoint {
    /// Position in grid coordinates
    pub uv: (f64, f64),
    /// Reflectance at each sample of the dataset's sampling
    pub spectrum: Vec<f64>,
}

/// One unit square of the grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridCell {
    inside: bool,
    points: Vec<u32>,
}

impl GridCell {
    /// An interior cell from its corners: bottom-left, bottom-right,
    /// top-left, top-right
    pub fn quad(corners: [u32; 4]) -> Self {
        Self {
            inside: true,
            points: corners.to_vec(),
        }
    }

    /// A boundary cell fanned around `points[0]`, the rest in ring order
    pub fn fan(points: Vec<u32>) -> Self {
        Self {
            inside: false,
            points,
        }
    }

    /// A cell without coverage
    pub fn empty() -> Self {
        Self::default()
    }

    /// True for quads
    #[inline]
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// True when the cell references no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Referenced point indices
    #[inline]
    pub fn points(&self) -> &[u32] {
        &self.points
    }
}

/// Why a lookup contributed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoContribution {
    /// X+Y+Z is zero, negative or not finite
    DegenerateBrightness,
    /// Chromaticity maps outside the grid
    OutOfGamut,
    /// The cell has no points
    EmptyCell,
    /// The fan of a boundary cell does not cover the chromaticity
    OutsideTriangulation,
}

/// Result of a reflectance lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reflectance {
    /// An interpolated value, already scaled by X+Y+Z
    Value(f64),
    /// Nothing found; numerically zero
    NoContribution(NoContribution),
}

impl Reflectance {
    /// Numeric value, zero when there is no contribution
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Self::Value(v) => v,
            Self::NoContribution(_) => 0.0,
        }
    }

    /// The reason for no contribution, if any
    #[inline]
    pub fn reason(self) -> Option<NoContribution> {
        match self {
            Self::Value(_) => None,
            Self::NoContribution(r) => Some(r),
        }
    }
}

impl From<Result<f64, NoContribution>> for Reflectance {
    fn from(result: Result<f64, NoContribution>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(r) => Self::NoContribution(r),
        }
    }
}

/// A located colour: up to four points and their spatial weights
///
/// Independent of wavelength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellWeights {
    points: [u32; 4],
    weights: [f64; 4],
    len: usize,
    brightness: f64,
}

impl CellWeights {
    /// Indices of the contributing points
    #[inline]
    pub fn points(&self) -> &[u32] {
        &self.points[..self.len]
    }

    /// Weight of each contributing point; these sum to 1
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights[..self.len]
    }

    /// X+Y+Z of the located colour
    #[inline]
    pub fn brightness(&self) -> f64 {
        self.brightness
    }
}

/// An immutable upsampling grid
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralDataset {
    transform: GridTransform,
    width: usize,
    height: usize,
    cells: Vec<GridCell>,
    points: Vec<SpectralDataPoint>,
    sampling: WavelengthSampling,
    equal_energy_reflectance: f64,
}

impl SpectralDataset {
    /// Assemble and validate a dataset
    ///
    /// `cells` is row-major: cell (i, j) is at `i + width * j`. Every
    /// non-empty quad needs 4 points, every fan at least 3, and every
    /// point needs one finite sample per wavelength of `sampling`.
    pub fn new(
        transform: GridTransform,
        width: usize,
        height: usize,
        cells: Vec<GridCell>,
        points: Vec<SpectralDataPoint>,
        sampling: WavelengthSampling,
        equal_energy_reflectance: f64,
    ) -> Result<Self, DatasetError> {
        if width == 0 || height == 0 || points.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        let expected = width * height;
        if cells.len() != expected {
            return Err(DatasetError::GridSizeMismatch {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        if !(equal_energy_reflectance > 0.0 && equal_energy_reflectance.is_finite()) {
            return Err(DatasetError::InvalidEqualEnergyReflectance(
                equal_energy_reflectance,
            ));
        }

        for (index, cell) in cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let required = if cell.inside { 4 } else { 3 };
            if cell.points.len() < required {
                return Err(DatasetError::CellTooSmall {
                    cell: index,
                    count: cell.points.len(),
                    required,
                });
            }
            if let Some(&bad) = cell.points.iter().find(|&&p| p as usize >= points.len()) {
                return Err(DatasetError::PointIndexOutOfRange {
                    cell: index,
                    index: bad,
                    points: points.len(),
                });
            }
        }

        for (index, point) in points.iter().enumerate() {
            if point.spectrum.len() != sampling.samples() {
                return Err(DatasetError::SpectrumLength {
                    point: index,
                    expected: sampling.samples(),
                    actual: point.spectrum.len(),
                });
            }
            let finite = point.uv.0.is_finite()
                && point.uv.1.is_finite()
                && point.spectrum.iter().all(|v| v.is_finite());
            if !finite {
                return Err(DatasetError::NonFiniteSample { point: index });
            }
        }

        Ok(Self {
            transform,
            width,
            height,
            cells,
            points,
            sampling,
            equal_energy_reflectance,
        })
    }

    /// Stand-in used if the standard dataset cannot be built; every
    /// lookup is out of gamut
    fn unavailable() -> Self {
        Self {
            transform: GridTransform::identity(),
            width: 0,
            height: 0,
            cells: Vec::new(),
            points: Vec::new(),
            sampling: WavelengthSampling::standard(),
            equal_energy_reflectance: 1.0,
        }
    }

    /// The process-wide dataset, generated with default builder settings
    /// on first use
    pub fn standard() -> &'static SpectralDataset {
        &STANDARD
    }

    /// Grid transform
    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    /// Grid width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// All data points
    pub fn points(&self) -> &[SpectralDataPoint] {
        &self.points
    }

    /// Wavelength sampling of the stored spectra
    pub fn sampling(&self) -> &WavelengthSampling {
        &self.sampling
    }

    /// Reflectance the lookup yields for XYZ = (1, 1, 1)
    ///
    /// Dividing lookups by this maps the equal-energy white to 1.
    pub fn equal_energy_reflectance(&self) -> f64 {
        self.equal_energy_reflectance
    }

    /// Find the points and weights that reconstruct `xyz`
    pub fn locate(&self, xyz: Xyz) -> Result<CellWeights, NoContribution> {
        let sum = xyz.sum();
        let norm = 1.0 / sum;
        if !(sum > 0.0) || !sum.is_finite() || !norm.is_finite() {
            return Err(NoContribution::DegenerateBrightness);
        }

        let (u, v) = self.transform.xy_to_uv((xyz.x * norm, xyz.y * norm));
        if !(u >= 0.0 && v >= 0.0 && u < self.width as f64 && v < self.height as f64) {
            return Err(NoContribution::OutOfGamut);
        }

        let (ui, vi) = (u as usize, v as usize);
        let cell = &self.cells[ui + self.width * vi];
        if cell.is_empty() {
            return Err(NoContribution::EmptyCell);
        }

        if cell.inside {
            let fu = u - ui as f64;
            let fv = v - vi as f64;
            let p = &cell.points;
            return Ok(CellWeights {
                points: [p[0], p[1], p[2], p[3]],
                weights: [
                    (1.0 - fu) * (1.0 - fv),
                    fu * (1.0 - fv),
                    (1.0 - fu) * fv,
                    fu * fv,
                ],
                len: 4,
                brightness: sum,
            });
        }

        self.locate_in_fan(&cell.points, (u, v), sum)
    }

    /// Walk the triangles (p0, p[i], p[i+1]) of a fan, closing with
    /// (p0, p[n-1], p[1])
    fn locate_in_fan(
        &self,
        fan: &[u32],
        uv: (f64, f64),
        brightness: f64,
    ) -> Result<CellWeights, NoContribution> {
        let n = fan.len();
        let origin = self.points[fan[0] as usize].uv;
        for i in 0..n - 1 {
            let b = i + 1;
            let c = if i == n - 2 { 1 } else { i + 2 };
            let pb = self.points[fan[b] as usize].uv;
            let pc = self.points[fan[c] as usize].uv;
            let Some((wa, wb, wc)) = barycentric(uv, origin, pb, pc) else {
                continue;
            };
            if wa >= -BARYCENTRIC_EPSILON && wb >= -BARYCENTRIC_EPSILON && wc >= -BARYCENTRIC_EPSILON
            {
                return Ok(CellWeights {
                    points: [fan[0], fan[b], fan[c], 0],
                    weights: [wa, wb, wc, 0.0],
                    len: 3,
                    brightness,
                });
            }
        }
        Err(NoContribution::OutsideTriangulation)
    }

    /// Evaluate located weights at one wavelength
    #[inline]
    pub fn evaluate(&self, weights: &CellWeights, lambda: f64) -> f64 {
        let (sb0, sb1, t) = self.sampling.position(lambda);
        let value: f64 = weights
            .points()
            .iter()
            .zip(weights.weights())
            .map(|(&p, &w)| {
                let s = &self.points[p as usize].spectrum;
                w * lerp(s[sb0], s[sb1], t)
            })
            .sum();
        value * weights.brightness
    }

    /// Reflectance of `xyz` at one wavelength
    pub fn reflectance(&self, lambda: f64, xyz: Xyz) -> Reflectance {
        self.locate(xyz).map(|w| self.evaluate(&w, lambda)).into()
    }

    /// Reflectance of `xyz` at four wavelengths, locating once
    pub fn reflectance4(&self, lambdas: [f64; 4], xyz: Xyz) -> Result<[f64; 4], NoContribution> {
        let w = self.locate(xyz)?;
        Ok(lambdas.map(|l| self.evaluate(&w, l)))
    }
}

/// Reflectance of `xyz` at `lambda`, zero where the dataset has nothing
#[inline]
pub fn spectral_reflectance_at(dataset: &SpectralDataset, lambda: f64, xyz: Xyz) -> f64 {
    dataset.reflectance(lambda, xyz).value()
}

/// [`spectral_reflectance_at`] at four wavelengths sharing one location
#[inline]
pub fn spectral_reflectance_at4(dataset: &SpectralDataset, lambdas: [f64; 4], xyz: Xyz) -> [f64; 4] {
    dataset.reflectance4(lambdas, xyz).unwrap_or([0.0; 4])
}

/// The dataset's equal-energy reflectance
#[inline]
pub fn equal_energy_reflectance(dataset: &SpectralDataset) -> f64 {
    dataset.equal_energy_reflectance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::SPECTRUM_BIN_SIZE;

    fn sampling() -> WavelengthSampling {
        WavelengthSampling::new(400.0, 700.0, 4).unwrap()
    }

    fn point(u: f64, v: f64, value: f64) -> SpectralDataPoint {
        SpectralDataPoint {
            uv: (u, v),
            spectrum: vec![value; 4],
        }
    }

    /// One cell over [0,1]² in xy, corners valued 1, 2, 3, 4
    fn quad_dataset() -> SpectralDataset {
        let points = vec![
            point(0.0, 0.0, 1.0),
            point(1.0, 0.0, 2.0),
            point(0.0, 1.0, 3.0),
            point(1.0, 1.0, 4.0),
        ];
        SpectralDataset::new(
            GridTransform::identity(),
            1,
            1,
            vec![GridCell::quad([0, 1, 2, 3])],
            points,
            sampling(),
            1.0,
        )
        .unwrap()
    }

    /// Centre valued 10, ring corners valued 0, fanned BL, BR, TR, TL
    fn fan_dataset() -> SpectralDataset {
        let points = vec![
            point(0.5, 0.5, 10.0),
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(1.0, 1.0, 0.0),
            point(0.0, 1.0, 0.0),
        ];
        SpectralDataset::new(
            GridTransform::identity(),
            1,
            1,
            vec![GridCell::fan(vec![0, 1, 2, 3, 4])],
            points,
            sampling(),
            1.0,
        )
        .unwrap()
    }

    fn at(dataset: &SpectralDataset, x: f64, y: f64) -> Reflectance {
        dataset.reflectance(550.0, Xyz::from_chromaticity(x, y))
    }

    #[test]
    fn test_sampling_position() {
        let s = sampling();
        assert_eq!(s.bin_size(), 100.0);
        assert_eq!(s.position(400.0), (0, 1, 0.0));
        assert_eq!(s.position(450.0), (0, 1, 0.5));
        assert_eq!(s.position(700.0), (3, 3, 0.0));
        assert_eq!(s.position(900.0), (3, 3, 0.0));
        assert_eq!(s.position(f64::NAN), (0, 1, 0.0));
    }

    #[test]
    fn test_sampling_rejects_bad_range() {
        assert!(WavelengthSampling::new(700.0, 400.0, 4).is_err());
        assert!(WavelengthSampling::new(400.0, 700.0, 1).is_err());
        assert!(WavelengthSampling::new(f64::NAN, 700.0, 4).is_err());
    }

    #[test]
    fn test_standard_sampling() {
        let s = WavelengthSampling::standard();
        assert_eq!(s.bin_size(), SPECTRUM_BIN_SIZE);
        assert_eq!(s.wavelengths().count(), 95);
        assert_eq!(s.wavelengths().last(), Some(830.0));
    }

    #[test]
    fn test_rotated_transform_roundtrip() {
        let t = GridTransform::rotated(0.7, (0.1, -0.2), 0.025);
        let xy = (0.3127, 0.3290);
        let back = t.uv_to_xy(t.xy_to_uv(xy));
        assert!((back.0 - xy.0).abs() < 1e-12);
        assert!((back.1 - xy.1).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_corner_layout() {
        let d = quad_dataset();
        assert_eq!(at(&d, 0.0, 0.0), Reflectance::Value(1.0));
        assert!((at(&d, 0.999_999, 0.0).value() - 2.0).abs() < 1e-5);
        assert!((at(&d, 0.0, 0.999_999).value() - 3.0).abs() < 1e-5);
        assert!((at(&d, 0.0, 0.5).value() - 2.0).abs() < 1e-12);
        assert!((at(&d, 0.25, 0.5).value() - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_value_scales_with_brightness() {
        let d = quad_dataset();
        let xyz = Xyz::from_chromaticity(0.25, 0.5).scale(2.0);
        assert!((d.reflectance(550.0, xyz).value() - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_wavelength_interpolation() {
        let points = (0..4)
            .map(|k| SpectralDataPoint {
                uv: ((k & 1) as f64, (k >> 1) as f64),
                spectrum: vec![0.0, 1.0, 2.0, 3.0],
            })
            .collect();
        let d = SpectralDataset::new(
            GridTransform::identity(),
            1,
            1,
            vec![GridCell::quad([0, 1, 2, 3])],
            points,
            sampling(),
            1.0,
        )
        .unwrap();
        let xyz = Xyz::from_chromaticity(0.3, 0.3);
        assert!((d.reflectance(450.0, xyz).value() - 0.5).abs() < 1e-12);
        assert!((d.reflectance(700.0, xyz).value() - 3.0).abs() < 1e-12);
        let four = d.reflectance4([400.0, 500.0, 600.0, 650.0], xyz).unwrap();
        for (got, want) in four.iter().zip([0.0, 1.0, 2.0, 2.5]) {
            assert!((got - want).abs() < 1e-9, "{four:?}");
        }
    }

    #[test]
    fn test_fan_centre_and_wrap_triangle() {
        let d = fan_dataset();
        assert!((at(&d, 0.5, 0.5).value() - 10.0).abs() < 1e-12);
        // (centre, TL, BL) is the closing triangle of the fan
        let w = d.locate(Xyz::from_chromaticity(0.25, 0.5)).unwrap();
        assert_eq!(w.points(), &[0, 4, 1]);
        assert!((at(&d, 0.25, 0.5).value() - 5.0).abs() < 1e-12);
        // First triangle (centre, BL, BR)
        let w = d.locate(Xyz::from_chromaticity(0.5, 0.25)).unwrap();
        assert_eq!(w.points(), &[0, 1, 2]);
    }

    #[test]
    fn test_fan_miss_is_zero() {
        let points = vec![point(0.0, 0.0, 1.0), point(1.0, 0.0, 2.0), point(0.0, 1.0, 3.0)];
        let d = SpectralDataset::new(
            GridTransform::identity(),
            1,
            1,
            vec![GridCell::fan(vec![0, 1, 2])],
            points,
            sampling(),
            1.0,
        )
        .unwrap();
        assert!((at(&d, 0.25, 0.25).value() - 1.75).abs() < 1e-12);
        assert_eq!(
            at(&d, 0.75, 0.75),
            Reflectance::NoContribution(NoContribution::OutsideTriangulation)
        );
    }

    #[test]
    fn test_no_contribution_reasons() {
        let d = quad_dataset();
        let reason = |xyz: Xyz| d.reflectance(550.0, xyz).reason();
        assert_eq!(reason(Xyz::new(0.0, 0.0, 0.0)), Some(NoContribution::DegenerateBrightness));
        assert_eq!(reason(Xyz::new(-1.0, -1.0, 0.5)), Some(NoContribution::DegenerateBrightness));
        assert_eq!(reason(Xyz::new(f64::NAN, 0.1, 0.1)), Some(NoContribution::DegenerateBrightness));
        assert_eq!(reason(Xyz::new(1.0, 0.5, -0.6)), Some(NoContribution::OutOfGamut));
        assert_eq!(reason(Xyz::new(-0.1, 0.5, 0.6)), Some(NoContribution::OutOfGamut));
        assert_eq!(spectral_reflectance_at(&d, 550.0, Xyz::new(1.0, 0.5, -0.6)), 0.0);
        assert_eq!(spectral_reflectance_at4(&d, [550.0; 4], Xyz::default()), [0.0; 4]);
    }

    #[test]
    fn test_empty_cell() {
        let d = SpectralDataset::new(
            GridTransform::identity(),
            2,
            1,
            vec![GridCell::quad([0, 1, 2, 3]), GridCell::empty()],
            quad_dataset().points,
            sampling(),
            1.0,
        )
        .unwrap();
        assert_eq!(at(&d, 0.5, 0.5).reason(), None);
        // Chromaticity (1.2, 0.1) lands in the second cell
        let xyz = Xyz::new(1.2, 0.1, -0.3);
        assert_eq!(d.reflectance(550.0, xyz).reason(), Some(NoContribution::EmptyCell));
    }

    #[test]
    fn test_validation_errors() {
        let ok = quad_dataset();
        let build = |cells: Vec<GridCell>, points: Vec<SpectralDataPoint>, eer: f64| {
            SpectralDataset::new(GridTransform::identity(), 1, 1, cells, points, sampling(), eer)
        };

        assert!(matches!(
            build(vec![], ok.points.clone(), 1.0),
            Err(DatasetError::GridSizeMismatch { expected: 1, actual: 0, .. })
        ));
        assert!(matches!(
            build(vec![GridCell::quad([0, 1, 2, 9])], ok.points.clone(), 1.0),
            Err(DatasetError::PointIndexOutOfRange { index: 9, .. })
        ));
        assert!(matches!(
            build(vec![GridCell::fan(vec![0, 1])], ok.points.clone(), 1.0),
            Err(DatasetError::CellTooSmall { count: 2, required: 3, .. })
        ));

        let mut short = ok.points.clone();
        short[2].spectrum.pop();
        assert!(matches!(
            build(ok.cells.clone(), short, 1.0),
            Err(DatasetError::SpectrumLength { point: 2, expected: 4, actual: 3 })
        ));

        let mut nan = ok.points.clone();
        nan[1].spectrum[0] = f64::NAN;
        assert_eq!(
            build(ok.cells.clone(), nan, 1.0),
            Err(DatasetError::NonFiniteSample { point: 1 })
        );

        assert!(matches!(
            build(ok.cells.clone(), ok.points.clone(), 0.0),
            Err(DatasetError::InvalidEqualEnergyReflectance(_))
        ));
        assert_eq!(build(ok.cells.clone(), vec![], 1.0), Err(DatasetError::EmptyDataset));
    }

    #[test]
    fn test_unavailable_contributes_nothing() {
        let d = SpectralDataset::unavailable();
        assert_eq!(at(&d, 0.3, 0.3).reason(), Some(NoContribution::OutOfGamut));
    }
}
