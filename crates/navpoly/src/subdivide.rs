//! Carving a convex obstacle out of a convex polygon.
//!
//! The obstacle's edges are walked in winding order. For every edge, the part of the polygon that lies outside
//! of that edge, and inside of all edges walked before it, becomes a new polygon. Whatever is left after the
//! last edge lies inside the obstacle and is dropped.
//!
//! Each piece is the intersection of the original polygon with a set of half-planes, so the pieces are convex,
//! keep the winding of the original polygon, never overlap each other, and together cover exactly the part of
//! the polygon that the obstacle does not.
//!
//! The piece layout differs from walking the polygon boundary between the points where the obstacle enters and
//! leaves it. There is exactly one piece per obstacle edge that cuts into the remainder, and an exposed corner of
//! the polygon belongs to the piece of the edge that reaches it first instead of forming a piece of its own.
//! The set of covered points is the same either way.

use glam::Vec2;

use crate::{
    config::DEFAULT_AREA_EPSILON,
    math::{Vec2Ext as _, edges, polygon_area},
};

/// Vertices closer than this are merged when cleaning up a piece. `[Units: wu]`
const VERTEX_WELD_DISTANCE: f32 = 1e-6;

/// Subdivides the convex polygon `poly` into the convex polygons that remain after removing `obstacle` from it.
///
/// Both polygons must be convex and correctly wound. Pieces with an area below
/// [`DEFAULT_AREA_EPSILON`] are dropped, so an obstacle containing `poly` produces no pieces at all.
/// An obstacle that does not intersect `poly` yields `poly` itself as the only piece.
pub fn subdivide_nav_poly(poly: &[Vec2], obstacle: &[Vec2]) -> Vec<Vec<Vec2>> {
    subdivide(poly, obstacle, DEFAULT_AREA_EPSILON)
}

pub(crate) fn subdivide(poly: &[Vec2], obstacle: &[Vec2], area_epsilon: f32) -> Vec<Vec<Vec2>> {
    let mut pieces = Vec::new();
    // The part of `poly` that is inside of all obstacle edges walked so far.
    let mut remainder = poly.to_vec();

    for (w1, w2) in edges(obstacle) {
        let edge = w2 - w1;
        if edge == Vec2::ZERO {
            continue;
        }
        let (outside, inside) = split(&remainder, w1, edge);
        if let Some(piece) = clean_up(outside, area_epsilon) {
            pieces.push(piece);
        }
        remainder = inside;
        if remainder.len() < 3 {
            // Nothing left to carve.
            break;
        }
    }
    pieces
}

/// Splits a convex polygon along the line through `origin` in direction `edge`.
///
/// Returns the part clockwise of the line followed by the rest. Vertices on the line end up in both parts.
fn split(poly: &[Vec2], origin: Vec2, edge: Vec2) -> (Vec<Vec2>, Vec<Vec2>) {
    let normal = edge.perp_cw();
    let mut outside = Vec::with_capacity(poly.len() + 1);
    let mut inside = Vec::with_capacity(poly.len() + 1);

    for (current, next) in edges(poly) {
        let current_distance = normal.dot(current - origin);
        let next_distance = normal.dot(next - origin);

        if current_distance >= 0.0 {
            outside.push(current);
        }
        if current_distance <= 0.0 {
            inside.push(current);
        }

        let crosses = (current_distance > 0.0 && next_distance < 0.0)
            || (current_distance < 0.0 && next_distance > 0.0);
        if crosses {
            let t = current_distance / (current_distance - next_distance);
            let crossing = current + (next - current) * t;
            assert!(
                crossing.is_finite(),
                "Edge {current} -> {next} crosses the obstacle edge through {origin}, but no intersection could be computed"
            );
            outside.push(crossing);
            inside.push(crossing);
        }
    }
    (outside, inside)
}

/// Welds duplicate vertices and rejects degenerate pieces.
fn clean_up(mut piece: Vec<Vec2>, area_epsilon: f32) -> Option<Vec<Vec2>> {
    piece.dedup_by(|current, previous| previous.abs_diff_eq(*current, VERTEX_WELD_DISTANCE));
    while piece.len() > 1
        && piece[0].abs_diff_eq(piece[piece.len() - 1], VERTEX_WELD_DISTANCE)
    {
        piece.pop();
    }
    if piece.len() < 3 || polygon_area(&piece) <= area_epsilon {
        return None;
    }
    Some(piece)
}
