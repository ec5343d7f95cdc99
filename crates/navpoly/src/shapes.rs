//! Convex geometry predicates.
//!
//! Every predicate in here relies on the winding convention of the crate: the exterior of a polygon lies
//! clockwise of its directed edges. Feeding a polygon with the opposite winding silently inverts
//! inside and outside.

use glam::Vec2;

use crate::math::{Vec2Ext as _, edges};

/// Returns whether `point` lies strictly clockwise of the vector `edge`.
///
/// Both are expected to be relative to the same origin, usually the start of a polygon edge.
/// Points exactly on the line spanned by `edge` are not clockwise of it.
#[inline]
pub fn cw_from_vector(edge: Vec2, point: Vec2) -> bool {
    edge.perp_cw().dot(point) > 0.0
}

/// Returns whether `point` is inside the convex polygon `poly`. Points on the boundary count as inside.
///
/// An empty polygon contains nothing.
pub fn point_in_poly(poly: &[Vec2], point: Vec2) -> bool {
    !poly.is_empty() && edges(poly).all(|(a, b)| !cw_from_vector(b - a, point - a))
}

/// Intersects the segments `a1 -> a2` and `b1 -> b2`.
///
/// Endpoints touching the other segment count as an intersection.
/// Parallel segments, including collinear overlapping ones, are reported as not intersecting.
pub fn edge_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let a = a2 - a1;
    let b = b2 - b1;
    let denom = a.perp_dot(b);
    if denom == 0.0 {
        return None;
    }

    // Both parameters are scaled by `denom` to avoid dividing before we know there's an intersection.
    let offset = b1 - a1;
    let t = offset.perp_dot(b);
    let u = offset.perp_dot(a);
    let in_range = |value: f32| {
        if denom > 0.0 {
            (0.0..=denom).contains(&value)
        } else {
            (denom..=0.0).contains(&value)
        }
    };
    (in_range(t) && in_range(u)).then(|| a1 + a * (t / denom))
}

/// Returns whether two convex polygons intersect. Polygons that only touch count as intersecting.
pub fn poly_intersect(p1: &[Vec2], p2: &[Vec2]) -> bool {
    !has_separating_edge(p1, p2) && !has_separating_edge(p2, p1)
}

/// An edge of `poly` separates it from `other` if all of `other` lies strictly outside of it.
fn has_separating_edge(poly: &[Vec2], other: &[Vec2]) -> bool {
    edges(poly).any(|(a, b)| {
        other
            .iter()
            .all(|vertex| cw_from_vector(b - a, *vertex - a))
    })
}

/// Finds the point with the largest projection onto `direction`.
/// On ties, the first such point wins. Returns `None` if `points` is empty.
pub fn generic_support(points: &[Vec2], direction: Vec2) -> Option<Vec2> {
    let mut support = None;
    let mut max_projection = f32::NEG_INFINITY;
    for point in points {
        let projection = point.dot(direction);
        if projection > max_projection {
            max_projection = projection;
            support = Some(*point);
        }
    }
    support
}
