//! Convex polygon helpers for laying the grid over the spectral locus
//!
//! Polygons are slices of vertices in counter-clockwise order, without a
//! repeated closing vertex.

use super::interpolation::cross2;

type Point = (f64, f64);

#[inline]
fn sub(a: Point, b: Point) -> Point {
    (a.0 - b.0, a.1 - b.1)
}

/// Which side of the directed line a→b the point p lies on; positive to
/// the left
#[inline]
fn side(a: Point, b: Point, p: Point) -> f64 {
    cross2(sub(b, a), sub(p, a))
}

/// Indices of the convex hull of `points`, counter-clockwise
///
/// Andrew's monotone chain. Collinear and repeated points are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        points[a].0.total_cmp(&points[b].0).then(points[a].1.total_cmp(&points[b].1))
    });
    if order.len() < 3 {
        return order;
    }

    let mut hull: Vec<usize> = Vec::with_capacity(2 * order.len());
    let turn = |hull: &mut Vec<usize>, start: usize, i: usize| {
        while hull.len() >= start + 2
            && side(points[hull[hull.len() - 2]], points[hull[hull.len() - 1]], points[i]) <= 0.0
        {
            hull.pop();
        }
        hull.push(i);
    };
    for &i in &order {
        turn(&mut hull, 0, i);
    }
    // The last point of each chain starts the next one
    hull.pop();
    let start = hull.len();
    for &i in order.iter().rev() {
        turn(&mut hull, start, i);
    }
    hull.pop();
    hull
}

/// True when `p` is inside or on the boundary of a convex polygon
pub fn contains_convex(polygon: &[Point], p: Point) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    edges(polygon).all(|(a, b)| side(a, b, p) >= 0.0)
}

/// Closest point of a convex polygon to `p`; `p` itself when inside
pub fn nearest_on_convex(polygon: &[Point], p: Point) -> Point {
    if contains_convex(polygon, p) || polygon.is_empty() {
        return p;
    }
    let mut best = polygon[0];
    let mut best_distance = f64::INFINITY;
    for (a, b) in edges(polygon) {
        let edge = sub(b, a);
        let length2 = edge.0 * edge.0 + edge.1 * edge.1;
        let t = if length2 > 0.0 {
            let d = sub(p, a);
            ((d.0 * edge.0 + d.1 * edge.1) / length2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let q = (a.0 + t * edge.0, a.1 + t * edge.1);
        let d = sub(q, p);
        let distance = d.0 * d.0 + d.1 * d.1;
        if distance < best_distance {
            best_distance = distance;
            best = q;
        }
    }
    best
}

/// Grow a convex polygon outwards by `margin` with mitred corners
pub fn offset_convex(polygon: &[Point], margin: f64) -> Vec<Point> {
    let n = polygon.len();
    if n < 3 || margin == 0.0 {
        return polygon.to_vec();
    }
    let normal = |a: Point, b: Point| {
        let e = sub(b, a);
        let length = e.0.hypot(e.1);
        (e.1 / length, -e.0 / length)
    };
    (0..n)
        .map(|k| {
            let prev = polygon[(k + n - 1) % n];
            let cur = polygon[k];
            let next = polygon[(k + 1) % n];
            let n1 = normal(prev, cur);
            let n2 = normal(cur, next);
            let scale = margin / (1.0 + n1.0 * n2.0 + n1.1 * n2.1);
            (cur.0 + scale * (n1.0 + n2.0), cur.1 + scale * (n1.1 + n2.1))
        })
        .collect()
}

/// Intersection of a polygon with a convex polygon (Sutherland–Hodgman)
///
/// The result keeps the subject's orientation and may contain repeated
/// vertices where the subject only touches the clip boundary.
pub fn clip_convex(subject: &[Point], clip: &[Point]) -> Vec<Point> {
    let mut output = subject.to_vec();
    for (a, b) in edges(clip) {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        for k in 0..input.len() {
            let p = input[k];
            let q = input[(k + 1) % input.len()];
            let dp = side(a, b, p);
            let dq = side(a, b, q);
            if dp >= 0.0 {
                output.push(p);
            }
            if (dp >= 0.0) != (dq >= 0.0) {
                let t = dp / (dp - dq);
                output.push((p.0 + t * (q.0 - p.0), p.1 + t * (q.1 - p.1)));
            }
        }
    }
    output
}

/// Signed area, positive for counter-clockwise polygons
pub fn polygon_area(polygon: &[Point]) -> f64 {
    0.5 * edges(polygon).map(|(a, b)| cross2(a, b)).sum::<f64>()
}

/// Area centroid, None for polygons without area
pub fn polygon_centroid(polygon: &[Point]) -> Option<Point> {
    let mut twice_area = 0.0;
    let (mut cx, mut cy) = (0.0, 0.0);
    for (a, b) in edges(polygon) {
        let c = cross2(a, b);
        twice_area += c;
        cx += (a.0 + b.0) * c;
        cy += (a.1 + b.1) * c;
    }
    if twice_area == 0.0 || !twice_area.is_finite() {
        return None;
    }
    Some((cx / (3.0 * twice_area), cy / (3.0 * twice_area)))
}

/// Consecutive vertex pairs, wrapping around
fn edges(polygon: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = polygon.len();
    (0..n).map(move |k| (polygon[k], polygon[(k + 1) % n]))
}
