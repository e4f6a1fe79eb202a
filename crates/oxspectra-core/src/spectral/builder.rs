//! Generation of the upsampling grid
//!
//! Every grid point gets the smoothest non-negative spectrum whose
//! tristimulus value has the point's chromaticity and X+Y+Z = 1:
//!
//! ```text
//! minimise   ‖D s‖² + ε ‖s‖²
//! subject to A s = (x, y, 1 - x - y),  s ≥ 0
//! ```
//!
//! where D takes first differences and the rows of A are the normalised
//! colour-matching functions times the bin width. Without the bound this
//! is a tridiagonal system plus a 3x3 system for the Lagrange
//! multipliers. The bound is handled with a primal active set started
//! from the three locus wavelengths around the target, pinning samples
//! that would go negative and releasing pinned ones whose multiplier says
//! they should grow.
//!
//! Reachable chromaticities are exactly the convex hull of the locus
//! wavelengths. The grid covers that hull grown by a small margin; cells
//! cut by the margin's edge are clipped to it and fanned around their
//! centroid, and points in the margin take the spectrum of the nearest
//! hull chromaticity.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::math::{
    Matrix3x3, Tridiagonal, barycentric, clip_convex, contains_convex, convex_hull,
    nearest_on_convex, offset_convex, polygon_area, polygon_centroid,
};
use crate::spectral::cmf::ColorMatchingTable;
use crate::spectral::dataset::{
    GridCell, GridTransform, SpectralDataPoint, SpectralDataset, WavelengthSampling,
};

/// Samples below this fraction of the peak count as negative
const NEGATIVE_TOLERANCE: f64 = 1e-9;

/// Steps shorter than this fraction of the peak sample are stationary
const STATIONARY_TOLERANCE: f64 = 1e-12;

/// Pinned samples are released when their multiplier is below minus this
/// fraction of the largest |Aᵀλ|
const RELEASE_TOLERANCE: f64 = 1e-10;

/// Accepted tristimulus residual relative to the target
const RESIDUAL_TOLERANCE: f64 = 1e-9;

/// Slack on barycentric weights when placing the start inside the hull
const HULL_TOLERANCE: f64 = 1e-9;

/// Clipped cell vertices closer than this in grid units are merged
const MERGE_DISTANCE: f64 = 1e-12;

/// Clipped cells with less area than this in grid units stay empty
const MIN_CELL_AREA: f64 = 1e-9;

/// Configuration for generating a [`SpectralDataset`]
///
/// ```
/// use oxspectra_core::spectral::DatasetBuilder;
///
/// let dataset = DatasetBuilder::new().cell_size(0.1).build().unwrap();
/// assert!(dataset.width() > 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBuilder {
    cell_size: f64,
    smoothness_epsilon: f64,
    rotation_step_degrees: f64,
    locus_margin: f64,
    sampling: WavelengthSampling,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self {
            cell_size: 0.025,
            smoothness_epsilon: 1e-6,
            rotation_step_degrees: 1.0,
            locus_margin: 0.005,
            sampling: WavelengthSampling::standard(),
        }
    }
}

impl DatasetBuilder {
    /// Builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Edge length of a grid cell in xy chromaticity units (default 0.025)
    pub fn cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Weight of the ‖s‖² term (default 1e-6)
    ///
    /// Keeps the system definite. Larger values pull spectra towards zero
    /// at the expense of smoothness.
    pub fn smoothness_epsilon(mut self, epsilon: f64) -> Self {
        self.smoothness_epsilon = epsilon;
        self
    }

    /// Angular resolution of the grid rotation search (default 1°)
    pub fn rotation_step_degrees(mut self, step: f64) -> Self {
        self.rotation_step_degrees = step;
        self
    }

    /// How far outside the spectral locus the grid reaches, in xy (default 0.005)
    ///
    /// Chromaticities in the margin map to the spectrum of the closest
    /// reachable chromaticity. This keeps wide-gamut primaries that land a
    /// hair outside the analytic locus from going black.
    pub fn locus_margin(mut self, margin: f64) -> Self {
        self.locus_margin = margin;
        self
    }

    /// Wavelength sampling of the stored spectra (default 360–830 nm, 5 nm)
    pub fn sampling(mut self, sampling: WavelengthSampling) -> Self {
        self.sampling = sampling;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.cell_size > 0.0 && self.cell_size <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "cell size must be in (0, 1], got {}",
                self.cell_size
            )));
        }
        if !(self.smoothness_epsilon > 0.0 && self.smoothness_epsilon.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "smoothness epsilon must be positive, got {}",
                self.smoothness_epsilon
            )));
        }
        if !(self.rotation_step_degrees > 0.0 && self.rotation_step_degrees <= 90.0) {
            return Err(Error::InvalidConfig(format!(
                "rotation step must be in (0, 90], got {}",
                self.rotation_step_degrees
            )));
        }
        if !(self.locus_margin >= 0.0 && self.locus_margin < 0.1) {
            return Err(Error::InvalidConfig(format!(
                "locus margin must be in [0, 0.1), got {}",
                self.locus_margin
            )));
        }
        Ok(())
    }

    /// Generate the dataset
    pub fn build(&self) -> Result<SpectralDataset> {
        self.validate()?;

        let cmf = ColorMatchingTable::cie1931(self.sampling);
        let fit = SmoothSpectrumFit::new(&cmf, self.smoothness_epsilon);

        let hull = fit.hull_polygon();
        if hull.len() < 3 {
            return Err(Error::InvalidConfig(
                "sampling does not cover the visible spectrum".to_string(),
            ));
        }
        let coverage = offset_convex(&hull, self.locus_margin);
        let frame = fit_rotation(&coverage, self.rotation_step_degrees).ok_or_else(|| {
            Error::InvalidConfig("sampling does not cover the visible spectrum".to_string())
        })?;
        let transform = GridTransform::rotated(frame.angle, frame.origin, self.cell_size);
        let width = ((frame.extent.0 / self.cell_size).ceil() as usize).max(1);
        let height = ((frame.extent.1 / self.cell_size).ceil() as usize).max(1);

        // Margin points borrow the spectrum of the closest hull chromaticity
        let fit_uv =
            |uv: (f64, f64)| fit.solve_at(nearest_on_convex(&hull, transform.uv_to_xy(uv)));

        let stride = width + 1;
        let vertex_fits: Vec<Option<Vec<f64>>> = (0..stride * (height + 1))
            .into_par_iter()
            .map(|k| {
                let uv = ((k % stride) as f64, (k / stride) as f64);
                if contains_convex(&coverage, transform.uv_to_xy(uv)) {
                    fit_uv(uv)
                } else {
                    None
                }
            })
            .collect();

        let mut points = Vec::new();
        let mut vertex_index = vec![None; vertex_fits.len()];
        for (k, spectrum) in vertex_fits.into_iter().enumerate() {
            if let Some(spectrum) = spectrum {
                vertex_index[k] = Some(points.len() as u32);
                points.push(SpectralDataPoint {
                    uv: ((k % stride) as f64, (k / stride) as f64),
                    spectrum,
                });
            }
        }
        let vertex = |i: usize, j: usize| vertex_index[i + stride * j];

        // Classify cells; boundary cells are clipped to the coverage
        let coverage_uv: Vec<(f64, f64)> =
            coverage.iter().map(|&xy| transform.xy_to_uv(xy)).collect();
        let mut cells = Vec::with_capacity(width * height);
        let mut boundary = Vec::new();
        for j in 0..height {
            for i in 0..width {
                let bl = vertex(i, j);
                let br = vertex(i + 1, j);
                let tl = vertex(i, j + 1);
                let tr = vertex(i + 1, j + 1);
                if let (Some(bl), Some(br), Some(tl), Some(tr)) = (bl, br, tl, tr) {
                    cells.push(GridCell::quad([bl, br, tl, tr]));
                    continue;
                }
                // Counter-clockwise
                let (u, v) = (i as f64, j as f64);
                let corners = [
                    ((u, v), bl),
                    ((u + 1.0, v), br),
                    ((u + 1.0, v + 1.0), tr),
                    ((u, v + 1.0), tl),
                ];
                if let Some(cell) = BoundaryCell::clip(cells.len(), &corners, &coverage_uv) {
                    boundary.push(cell);
                }
                cells.push(GridCell::empty());
            }
        }

        let solved: Vec<(Option<Vec<f64>>, Vec<Option<Vec<f64>>>)> = boundary
            .par_iter()
            .map(|cell| {
                let ring = cell
                    .ring
                    .iter()
                    .map(|vertex| match *vertex {
                        RingVertex::Clipped(uv) => fit_uv(uv),
                        RingVertex::Grid(_) => None,
                    })
                    .collect();
                (fit_uv(cell.centre), ring)
            })
            .collect();

        let grid_points = points.len();
        for (cell, (centre, ring_fits)) in boundary.into_iter().zip(solved) {
            let mut ring = Vec::with_capacity(cell.ring.len());
            for (vertex, spectrum) in cell.ring.into_iter().zip(ring_fits) {
                match (vertex, spectrum) {
                    (RingVertex::Grid(index), _) => ring.push(index),
                    (RingVertex::Clipped(uv), Some(spectrum)) => {
                        ring.push(points.len() as u32);
                        points.push(SpectralDataPoint { uv, spectrum });
                    }
                    (RingVertex::Clipped(uv), None) => {
                        log::trace!("Dropping boundary point {uv:?}: no feasible spectrum");
                    }
                }
            }
            match centre {
                Some(spectrum) if ring.len() >= 2 => {
                    let mut fan = Vec::with_capacity(ring.len() + 1);
                    fan.push(points.len() as u32);
                    fan.extend(ring);
                    points.push(SpectralDataPoint {
                        uv: cell.centre,
                        spectrum,
                    });
                    cells[cell.index] = GridCell::fan(fan);
                }
                _ if ring.len() >= 3 => cells[cell.index] = GridCell::fan(ring),
                _ => log::trace!("Leaving cell {} empty: too few feasible points", cell.index),
            }
        }

        let interior = cells.iter().filter(|c| c.is_inside()).count();
        let fans = cells.iter().filter(|c| !c.is_inside() && !c.is_empty()).count();
        log::debug!(
            "Spectral grid {width}x{height}, rotation {:.1}°, {} points ({} on boundaries), {interior} interior cells, {fans} boundary cells",
            frame.angle.to_degrees(),
            points.len(),
            points.len() - grid_points,
        );
        if interior == 0 {
            log::warn!("Spectral grid has no interior cells; cell size {} is too coarse", self.cell_size);
        }

        let equal_energy_reflectance = 1.0 / cmf.y_integral();
        let dataset = SpectralDataset::new(
            transform,
            width,
            height,
            cells,
            points,
            self.sampling,
            equal_energy_reflectance,
        )?;
        Ok(dataset)
    }
}

/// Corner of a boundary cell's ring
#[derive(Debug, Clone, Copy, PartialEq)]
enum RingVertex {
    /// An already fitted grid vertex
    Grid(u32),
    /// Where the coverage edge crosses the cell, in grid units
    Clipped((f64, f64)),
}

/// A cell cut by the edge of the coverage
#[derive(Debug, Clone, PartialEq)]
struct BoundaryCell {
    index: usize,
    centre: (f64, f64),
    ring: Vec<RingVertex>,
}

impl BoundaryCell {
    /// Clip a cell, given counter-clockwise as corners with their fitted
    /// vertex if any, against the coverage polygon in grid units
    fn clip(
        index: usize,
        corners: &[((f64, f64), Option<u32>); 4],
        coverage: &[(f64, f64)],
    ) -> Option<Self> {
        let square = corners.map(|(uv, _)| uv);
        let mut polygon: Vec<(f64, f64)> = Vec::new();
        for p in clip_convex(&square, coverage) {
            if polygon.last().is_none_or(|&q| distance(p, q) > MERGE_DISTANCE) {
                polygon.push(p);
            }
        }
        while polygon.len() > 1
            && distance(polygon[0], polygon[polygon.len() - 1]) <= MERGE_DISTANCE
        {
            polygon.pop();
        }
        if polygon.len() < 3 || polygon_area(&polygon) < MIN_CELL_AREA {
            return None;
        }

        let centre = polygon_centroid(&polygon)?;
        let ring = polygon
            .into_iter()
            .map(|p| match corners.iter().find(|(uv, _)| *uv == p) {
                Some(&(_, Some(vertex))) => RingVertex::Grid(vertex),
                _ => RingVertex::Clipped(p),
            })
            .collect();
        Some(Self { index, centre, ring })
    }
}

#[inline]
fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Rotation and bounding box of the grid in xy
#[derive(Debug, Clone, Copy, PartialEq)]
struct GridFrame {
    /// Radians
    angle: f64,
    /// Minimum corner of the bounding box in rotated coordinates
    origin: (f64, f64),
    /// Size of the bounding box
    extent: (f64, f64),
}

/// Rotation in [0°, 90°) minimising the bounding box area of `outline`
fn fit_rotation(outline: &[(f64, f64)], step_degrees: f64) -> Option<GridFrame> {
    if outline.len() < 3 {
        return None;
    }
    let steps = (90.0 / step_degrees).ceil() as usize;
    let mut best: Option<(f64, GridFrame)> = None;
    for k in 0..steps {
        let angle = (k as f64 * step_degrees).to_radians();
        let (s, c) = angle.sin_cos();
        let (mut u_min, mut u_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut v_min, mut v_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in outline {
            let u = c * x - s * y;
            let v = s * x + c * y;
            u_min = u_min.min(u);
            u_max = u_max.max(u);
            v_min = v_min.min(v);
            v_max = v_max.max(v);
        }
        let area = (u_max - u_min) * (v_max - v_min);
        if best.is_none_or(|(a, _)| area < a) {
            best = Some((
                area,
                GridFrame {
                    angle,
                    origin: (u_min, v_min),
                    extent: (u_max - u_min, v_max - v_min),
                },
            ));
        }
    }
    best.map(|(_, frame)| frame)
}

/// Smoothest non-negative spectrum with a given tristimulus value
#[derive(Debug, Clone)]
pub(crate) struct SmoothSpectrumFit {
    /// Colour-matching rows times bin width
    rows: [Vec<f64>; 3],
    epsilon: f64,
    /// Locus bins on the convex hull with their chromaticity,
    /// counter-clockwise
    hull: Vec<(usize, (f64, f64))>,
}

impl SmoothSpectrumFit {
    pub(crate) fn new(cmf: &ColorMatchingTable, epsilon: f64) -> Self {
        let bin = cmf.sampling().bin_size();
        let samples = cmf.samples();
        let locus: Vec<(usize, (f64, f64))> = cmf
            .locus_bins()
            .into_iter()
            .filter_map(|i| Some((i, samples[i].chromaticity()?)))
            .collect();
        let chromaticities: Vec<(f64, f64)> = locus.iter().map(|&(_, xy)| xy).collect();
        let hull = convex_hull(&chromaticities).into_iter().map(|k| locus[k]).collect();
        Self {
            rows: [
                samples.iter().map(|s| s.x * bin).collect(),
                samples.iter().map(|s| s.y * bin).collect(),
                samples.iter().map(|s| s.z * bin).collect(),
            ],
            epsilon,
            hull,
        }
    }

    /// Chromaticities the fit can reach, as a counter-clockwise polygon
    pub(crate) fn hull_polygon(&self) -> Vec<(f64, f64)> {
        self.hull.iter().map(|&(_, xy)| xy).collect()
    }

    /// Fit for chromaticity (x, y) at X+Y+Z = 1
    pub(crate) fn solve_at(&self, (x, y): (f64, f64)) -> Option<Vec<f64>> {
        self.solve([x, y, 1.0 - x - y])
    }

    /// Fit for a tristimulus target, None when infeasible
    pub(crate) fn solve(&self, target: [f64; 3]) -> Option<Vec<f64>> {
        let n = self.rows[0].len();
        let (start, basis) = self.feasible_start(target)?;

        // Most targets away from the locus never touch the bound
        let all: Vec<usize> = (0..n).collect();
        if let Some((spectrum, _)) = self.equality_fit(&all, target) {
            let peak = spectrum.iter().copied().fold(0.0, f64::max);
            if spectrum.iter().all(|&v| v >= -NEGATIVE_TOLERANCE * peak) {
                return Some(self.accept(spectrum, start, target));
            }
        }

        let mut spectrum = start.clone();
        let mut pinned = vec![true; n];
        for &i in &basis {
            pinned[i] = false;
        }

        for _ in 0..10 * n {
            let free: Vec<usize> = (0..n).filter(|&i| !pinned[i]).collect();
            if free.len() < 3 {
                break;
            }
            let Some((candidate, lambda)) = self.equality_fit(&free, target) else {
                break;
            };

            let step: Vec<f64> = candidate.iter().zip(&spectrum).map(|(c, s)| c - s).collect();
            let peak = spectrum.iter().copied().fold(0.0, f64::max);
            let longest = step.iter().fold(0.0, |m: f64, v| m.max(v.abs()));
            if longest <= STATIONARY_TOLERANCE * peak {
                match self.most_violated_bound(&spectrum, &pinned, lambda) {
                    Some(i) => pinned[i] = false,
                    None => return Some(self.accept(spectrum, start, target)),
                }
                continue;
            }

            // Walk towards the candidate until a free sample hits zero
            let mut alpha = 1.0;
            let mut blocking = None;
            for &i in &free {
                if step[i] < 0.0 {
                    let limit = -spectrum[i] / step[i];
                    if limit < alpha {
                        alpha = limit;
                        blocking = Some(i);
                    }
                }
            }
            match blocking {
                Some(b) => {
                    for &i in &free {
                        spectrum[i] = (spectrum[i] + alpha * step[i]).max(0.0);
                    }
                    spectrum[b] = 0.0;
                    pinned[b] = true;
                }
                None => spectrum = candidate,
            }
        }

        log::trace!("Active set stopped early for {target:?}");
        Some(self.accept(spectrum, start, target))
    }

    /// Exact non-negative solution on three hull wavelengths around the
    /// target's chromaticity
    fn feasible_start(&self, target: [f64; 3]) -> Option<(Vec<f64>, [usize; 3])> {
        let sum = target[0] + target[1] + target[2];
        if !(sum > 0.0 && sum.is_finite()) || self.hull.len() < 3 {
            return None;
        }
        let xy = (target[0] / sum, target[1] / sum);

        let (first, origin) = self.hull[0];
        for pair in self.hull[1..].windows(2) {
            let [(a, pa), (b, pb)] = [pair[0], pair[1]];
            let Some((w0, wa, wb)) = barycentric(xy, origin, pa, pb) else {
                continue;
            };
            if w0 < -HULL_TOLERANCE || wa < -HULL_TOLERANCE || wb < -HULL_TOLERANCE {
                continue;
            }
            let basis = [first, a, b];
            let [c0, c1, c2] = basis.map(|i| [self.rows[0][i], self.rows[1][i], self.rows[2][i]]);
            let weights = Matrix3x3::from_columns(c0, c1, c2).inverse()?.multiply_vec(target);
            let mut spectrum = vec![0.0; self.rows[0].len()];
            for (&i, w) in basis.iter().zip(weights) {
                spectrum[i] = w.max(0.0);
            }
            return Some((spectrum, basis));
        }
        None
    }

    /// Minimise over the `free` samples with A s = target and the rest
    /// zero; returns the full spectrum and the multipliers
    fn equality_fit(&self, free: &[usize], target: [f64; 3]) -> Option<(Vec<f64>, [f64; 3])> {
        // Q⁻¹ A_Fᵀ, one column per colour-matching row
        let q = self.restricted_system(free);
        let mut z: [Vec<f64>; 3] = Default::default();
        for (r, col) in z.iter_mut().enumerate() {
            let rhs: Vec<f64> = free.iter().map(|&i| self.rows[r][i]).collect();
            *col = q.solve(&rhs)?;
        }

        // A_F Q⁻¹ A_Fᵀ λ = target
        let m = Matrix3x3::new(std::array::from_fn(|r| {
            std::array::from_fn(|c| {
                free.iter()
                    .zip(&z[c])
                    .map(|(&i, zc)| self.rows[r][i] * zc)
                    .sum()
            })
        }));
        let lambda = m.inverse()?.multiply_vec(target);

        let mut spectrum = vec![0.0; self.rows[0].len()];
        for (k, &i) in free.iter().enumerate() {
            spectrum[i] = z[0][k] * lambda[0] + z[1][k] * lambda[1] + z[2][k] * lambda[2];
        }
        Some((spectrum, lambda))
    }

    /// Pinned sample whose bound multiplier is most negative, if any
    ///
    /// The multiplier of s_i ≥ 0 is (Q s - Aᵀλ)_i; with s_i = 0 only the
    /// neighbours contribute to (Q s)_i.
    fn most_violated_bound(
        &self,
        spectrum: &[f64],
        pinned: &[bool],
        lambda: [f64; 3],
    ) -> Option<usize> {
        let n = spectrum.len();
        let at_lambda = |i: usize| {
            self.rows[0][i] * lambda[0] + self.rows[1][i] * lambda[1] + self.rows[2][i] * lambda[2]
        };
        let scale = (0..n).map(|i| at_lambda(i).abs()).fold(0.0, f64::max);
        let mut best = None;
        let mut most_negative = -RELEASE_TOLERANCE * scale;
        for i in (0..n).filter(|&i| pinned[i]) {
            let left = if i > 0 { spectrum[i - 1] } else { 0.0 };
            let right = if i + 1 < n { spectrum[i + 1] } else { 0.0 };
            let multiplier = -(left + right) - at_lambda(i);
            if multiplier < most_negative {
                most_negative = multiplier;
                best = Some(i);
            }
        }
        best
    }

    /// Clamp to the bound, falling back to the exact start if rounding
    /// drifted off the target
    fn accept(&self, spectrum: Vec<f64>, start: Vec<f64>, target: [f64; 3]) -> Vec<f64> {
        let spectrum: Vec<f64> = spectrum.into_iter().map(|v| v.max(0.0)).collect();
        let scale = target.iter().fold(0.0, |m: f64, t| m.max(t.abs()));
        let drifted = self.rows.iter().zip(target).any(|(row, t)| {
            let value: f64 = row.iter().zip(&spectrum).map(|(a, s)| a * s).sum();
            !((value - t).abs() <= RESIDUAL_TOLERANCE * scale)
        });
        if drifted { start } else { spectrum }
    }

    /// Q = DᵀD + εI restricted to the free samples
    ///
    /// Pinned samples are zero, so a free sample keeps the full difference
    /// penalty against a pinned neighbour but loses the coupling term.
    fn restricted_system(&self, free: &[usize]) -> Tridiagonal {
        let n = self.rows[0].len();
        let diag = free
            .iter()
            .map(|&i| {
                let neighbours = if i == 0 || i == n - 1 { 1.0 } else { 2.0 };
                neighbours + self.epsilon
            })
            .collect();
        let off = free
            .iter()
            .enumerate()
            .map(|(k, &i)| match free.get(k + 1) {
                Some(&next) if next == i + 1 => -1.0,
                _ => 0.0,
            })
            .collect();
        Tridiagonal { diag, off }
    }
}
