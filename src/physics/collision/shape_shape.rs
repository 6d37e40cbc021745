//! Separating axis tests between pairs of shapes.
//!
//! Every test returns the minimum translation vector (MTV) if the shapes overlap.
//! The MTV points from the first shape towards the second
//! and its length is the penetration depth along the axis of least overlap.

use super::collider::ColliderShape;
use crate::math::{self as m, Angle};

/// Epsilons used to detect degenerate geometry.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    /// Squared length under which an axis is skipped.
    pub degenerate: f64,
    /// Distance under which circle centers are treated as coincident.
    pub coincident: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            degenerate: m::DEGENERATE_EPS,
            coincident: 1e-6,
        }
    }
}

/// A shape placed in the world: its center and rotation.
#[derive(Clone, Copy, Debug)]
pub struct PlacedShape {
    pub shape: ColliderShape,
    pub center: m::Vec2,
    pub angle: Angle,
}

/// Checks two placed shapes for intersection, returning the MTV from `s1` towards `s2`.
pub fn intersection_check(s1: &PlacedShape, s2: &PlacedShape, tol: Tolerances) -> Option<m::Vec2> {
    use ColliderShape::*;
    match (s1.shape, s2.shape) {
        (Circle { r: r1 }, Circle { r: r2 }) => circle_circle(s1.center, r1, s2.center, r2, tol),
        (Circle { r }, Rect { .. } | Triangle { .. }) => {
            let verts = s2.shape.vertices(s2.center, s2.angle);
            poly_circle(&verts, s1.center, r, tol).map(|mtv| -mtv)
        }
        (Rect { .. } | Triangle { .. }, Circle { r }) => {
            let verts = s1.shape.vertices(s1.center, s1.angle);
            poly_circle(&verts, s2.center, r, tol)
        }
        (Rect { .. } | Triangle { .. }, Rect { .. } | Triangle { .. }) => {
            let verts1 = s1.shape.vertices(s1.center, s1.angle);
            let verts2 = s2.shape.vertices(s2.center, s2.angle);
            poly_poly(&verts1, &verts2, tol)
        }
    }
}

//
// helpers
//

/// Project a set of points onto an axis, returning the (min, max) interval.
fn project(verts: &[m::Vec2], axis: m::Vec2) -> (f64, f64) {
    verts.iter().fold((f64::MAX, f64::MIN), |(lo, hi), v| {
        let p = v.dot(axis);
        (lo.min(p), hi.max(p))
    })
}

fn centroid(verts: &[m::Vec2]) -> m::Vec2 {
    let sum = verts.iter().fold(m::Vec2::zero(), |acc, v| acc + *v);
    sum / verts.len() as f64
}

/// Unit normals of a polygon's edges, zero for degenerate edges.
fn edge_normals(verts: &[m::Vec2], tol: Tolerances) -> impl '_ + Iterator<Item = m::Vec2> {
    (0..verts.len()).map(move |i| {
        let edge = verts[(i + 1) % verts.len()] - verts[i];
        m::normalize_or_zero(m::left_normal(edge), tol.degenerate)
    })
}

/// Tracks the axis of least overlap over a series of projections.
struct AxisSearch {
    overlap: f64,
    axis: m::Vec2,
}

impl AxisSearch {
    fn new() -> Self {
        Self {
            overlap: f64::MAX,
            axis: m::Vec2::zero(),
        }
    }

    /// Test two projected intervals. Returns false if they're separated.
    fn test(&mut self, axis: m::Vec2, (min1, max1): (f64, f64), (min2, max2): (f64, f64)) -> bool {
        if max1 < min2 || max2 < min1 {
            return false;
        }
        let overlap = max1.min(max2) - min1.max(min2);
        if overlap < self.overlap {
            self.overlap = overlap;
            self.axis = axis;
        }
        true
    }

    /// The MTV, oriented along `dir`.
    fn finish(self, dir: m::Vec2) -> m::Vec2 {
        let axis = if dir.dot(self.axis) < 0.0 {
            -self.axis
        } else {
            self.axis
        };
        // all axes degenerate means there's no meaningful overlap to resolve
        if self.overlap == f64::MAX {
            return m::Vec2::zero();
        }
        axis * self.overlap
    }
}

//
// CIRCLE <-> CIRCLE
//

fn circle_circle(
    pos1: m::Vec2,
    r1: f64,
    pos2: m::Vec2,
    r2: f64,
    tol: Tolerances,
) -> Option<m::Vec2> {
    let dist = pos2 - pos1;
    let dist_sq = dist.mag_sq();
    let r_sum = r1 + r2;

    if !(dist_sq < r_sum * r_sum) {
        return None;
    }

    let dist_mag = dist_sq.sqrt();
    if dist_mag < tol.coincident {
        // same position, consider penetration to be on x axis
        return Some(m::Vec2::new(r_sum, 0.0));
    }

    Some(dist / dist_mag * (r_sum - dist_mag))
}

//
// POLYGON <-> CIRCLE
//

/// Returns the MTV pointing from the polygon towards the circle.
fn poly_circle(verts: &[m::Vec2], center: m::Vec2, r: f64, tol: Tolerances) -> Option<m::Vec2> {
    let mut search = AxisSearch::new();
    let circle_interval = |axis: m::Vec2| {
        let c = center.dot(axis);
        (c - r, c + r)
    };

    for axis in edge_normals(verts, tol) {
        if m::is_degenerate(axis, tol.degenerate) {
            continue;
        }
        if !search.test(axis, project(verts, axis), circle_interval(axis)) {
            return None;
        }
    }

    // the closest vertex axis catches circles hanging off a corner
    let closest_vert = verts
        .iter()
        .copied()
        .min_by(|a, b| (center - *a).mag_sq().total_cmp(&(center - *b).mag_sq()))?;
    let axis = m::normalize_or_zero(center - closest_vert, tol.degenerate);
    if !m::is_degenerate(axis, tol.degenerate)
        && !search.test(axis, project(verts, axis), circle_interval(axis))
    {
        return None;
    }

    Some(search.finish(center - centroid(verts)))
}

//
// POLYGON <-> POLYGON
//

fn poly_poly(verts1: &[m::Vec2], verts2: &[m::Vec2], tol: Tolerances) -> Option<m::Vec2> {
    let mut search = AxisSearch::new();

    for axis in edge_normals(verts1, tol).chain(edge_normals(verts2, tol)) {
        if m::is_degenerate(axis, tol.degenerate) {
            continue;
        }
        if !search.test(axis, project(verts1, axis), project(verts2, axis)) {
            return None;
        }
    }

    Some(search.finish(centroid(verts2) - centroid(verts1)))
}

//
// tests
//
