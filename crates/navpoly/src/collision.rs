//! Oriented rectangles and the separating axis test between them.

use glam::{Mat2, Vec2};

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

use crate::{Aabb2d, shapes::generic_support};

/// The transform of a rectangle on the xy-plane.
///
/// The rectangle is centered at `pos`, has the side lengths `scale` before rotation,
/// and is rotated counter-clockwise by `rotation` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct Transform2d {
    /// The center of the rectangle.
    pub pos: Vec2,
    /// The full side lengths of the rectangle along its local x and y axes.
    pub scale: Vec2,
    /// Counter-clockwise rotation in radians.
    pub rotation: f32,
}

impl Default for Transform2d {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform2d {
    /// Creates a new transform.
    #[inline]
    pub fn new(pos: Vec2, scale: Vec2, rotation: f32) -> Self {
        Self {
            pos,
            scale,
            rotation,
        }
    }

    /// The corners of the rectangle relative to its center,
    /// in the order top right, top left, bottom left, bottom right before rotation.
    pub fn local_corners(&self) -> [Vec2; 4] {
        let rotation = Mat2::from_angle(self.rotation);
        let half = 0.5 * self.scale;
        [
            rotation * half,
            rotation * Vec2::new(-half.x, half.y),
            rotation * -half,
            rotation * Vec2::new(half.x, -half.y),
        ]
    }

    /// The corners of the rectangle in world space, wound so they can be used as an obstacle polygon.
    ///
    /// Negative scales mirror the rectangle and flip the winding.
    pub fn corners(&self) -> [Vec2; 4] {
        self.local_corners().map(|corner| corner + self.pos)
    }

    /// The outward normals of the sides, in the order right, up, left, down, paired with the distance
    /// from the center to that side.
    pub fn faces(&self) -> [(Vec2, f32); 4] {
        let (sin, cos) = self.rotation.sin_cos();
        let half = 0.5 * self.scale;
        [
            (Vec2::new(cos, sin), half.x),
            (Vec2::new(-sin, cos), half.y),
            (Vec2::new(-cos, -sin), half.x),
            (Vec2::new(sin, -cos), half.y),
        ]
    }

    /// Returns whether `point` lies inside the rectangle. Points on the border count as inside.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let (sin, cos) = self.rotation.sin_cos();
        let offset = point - self.pos;
        let projection = Vec2::new(
            Vec2::new(cos, sin).dot(offset),
            Vec2::new(-sin, cos).dot(offset),
        );
        projection.abs().cmple((0.5 * self.scale).abs()).all()
    }

    /// The world-space AABB enclosing the rotated rectangle.
    pub fn aabb(&self) -> Aabb2d {
        let corners = self.corners();
        let min = corners.into_iter().reduce(Vec2::min).unwrap_or(self.pos);
        let max = corners.into_iter().reduce(Vec2::max).unwrap_or(self.pos);
        Aabb2d::new(min, max)
    }
}

/// Tests whether two oriented rectangles overlap using the separating axis theorem.
///
/// Returns `None` if a separating axis exists. Otherwise returns the penetration vector, which points
/// out of `r2`: translating `r1` by it moves `r1` out of `r2` along the axis of least overlap.
/// Rectangles that only touch overlap with a zero penetration vector.
pub fn intersect(r1: &Transform2d, r2: &Transform2d) -> Option<Vec2> {
    let r1_corners = r1.local_corners();
    let r2_corners = r2.local_corners();

    // Penetration distances are <= 0 for overlapping axes, so the least overlap is the largest one.
    let mut min_penetration: Option<(f32, Vec2)> = None;

    // Test if r2 lies entirely past one of the sides of r1.
    for (normal, side) in r1.faces() {
        let Some(support) = generic_support(&r2_corners, -normal) else {
            unreachable!("A rectangle always has corners");
        };
        let penetration = normal.dot(support + r2.pos - r1.pos) - side;
        if penetration > 0.0 {
            return None;
        }
        if min_penetration.is_none_or(|(min, _)| penetration > min) {
            min_penetration = Some((penetration, normal));
        }
    }

    // Test if r1 lies entirely past one of the sides of r2.
    for (normal, side) in r2.faces() {
        let Some(support) = generic_support(&r1_corners, -normal) else {
            unreachable!("A rectangle always has corners");
        };
        let penetration = normal.dot(support + r1.pos - r2.pos) - side;
        if penetration > 0.0 {
            return None;
        }
        if min_penetration.is_none_or(|(min, _)| penetration > min) {
            min_penetration = Some((penetration, -normal));
        }
    }

    min_penetration.map(|(distance, normal)| distance * normal)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::math::{is_convex, polygon_area};

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Transform2d {
        Transform2d::new(Vec2::new(x, y), Vec2::new(width, height), 0.0)
    }

    #[test]
    fn corners_are_a_correctly_wound_rectangle() {
        let transform = Transform2d::new(Vec2::new(3.0, -1.0), Vec2::new(2.0, 4.0), 0.7);
        let corners = transform.corners();
        assert!(is_convex(&corners, 1e-5));
        assert!((polygon_area(&corners) - 8.0).abs() < 1e-4);
    }

    #[test]
    fn unrotated_corners_match_scale() {
        let corners = rect(1.0, 1.0, 2.0, 4.0).corners();
        assert_eq!(
            corners,
            [
                Vec2::new(2.0, 3.0),
                Vec2::new(0.0, 3.0),
                Vec2::new(0.0, -1.0),
                Vec2::new(2.0, -1.0),
            ]
        );
    }

    #[test]
    fn contains_point_respects_rotation() {
        let transform = Transform2d::new(Vec2::ZERO, Vec2::new(4.0, 1.0), FRAC_PI_2);
        assert!(transform.contains_point(Vec2::new(0.0, 1.9)));
        assert!(!transform.contains_point(Vec2::new(1.9, 0.0)));
        assert!(transform.contains_point(Vec2::ZERO));
    }

    #[test]
    fn aabb_of_rotated_square_grows() {
        let transform = Transform2d::new(Vec2::ZERO, Vec2::splat(2.0), std::f32::consts::FRAC_PI_4);
        let aabb = transform.aabb();
        let expected = 2.0_f32.sqrt();
        assert!((aabb.max.x - expected).abs() < 1e-5);
        assert!((aabb.min.y + expected).abs() < 1e-5);
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        assert_eq!(intersect(&rect(0.0, 0.0, 2.0, 2.0), &rect(3.0, 0.0, 2.0, 2.0)), None);
        assert_eq!(intersect(&rect(0.0, 0.0, 2.0, 2.0), &rect(0.0, -2.5, 2.0, 2.0)), None);
    }

    #[test]
    fn penetration_points_out_of_the_second_box() {
        let r1 = rect(0.0, 0.0, 2.0, 2.0);
        let r2 = rect(1.5, 0.0, 2.0, 2.0);
        let penetration = intersect(&r1, &r2).unwrap();
        assert!((penetration - Vec2::new(-0.5, 0.0)).length() < 1e-6);

        let penetration = intersect(&r2, &r1).unwrap();
        assert!((penetration - Vec2::new(0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn penetration_uses_the_axis_of_least_overlap() {
        let r1 = rect(0.0, 0.0, 4.0, 4.0);
        let r2 = rect(0.5, 2.5, 2.0, 2.0);
        let penetration = intersect(&r1, &r2).unwrap();
        assert!((penetration - Vec2::new(0.0, -0.5)).length() < 1e-6);
    }

    #[test]
    fn touching_boxes_intersect_without_penetration() {
        let r1 = rect(0.0, 0.0, 2.0, 2.0);
        let r2 = rect(2.0, 0.0, 2.0, 2.0);
        assert_eq!(intersect(&r1, &r2), Some(Vec2::ZERO));
    }

    #[test]
    fn touching_axis_is_not_overwritten_by_deeper_axes() {
        // The first tested axis reports exactly zero penetration, every later one is deeper.
        let r1 = rect(0.0, 0.0, 2.0, 2.0);
        let r2 = rect(2.0, 0.5, 2.0, 2.0);
        assert_eq!(intersect(&r1, &r2), Some(Vec2::ZERO));
    }

    #[test]
    fn rotated_box_separated_only_by_its_own_axis() {
        // The diamond's AABB overlaps the square, but the diamond's own face normal separates them.
        let square = rect(0.0, 0.0, 2.0, 2.0);
        let diamond = Transform2d::new(Vec2::new(2.3, 2.3), Vec2::splat(2.0), std::f32::consts::FRAC_PI_4);
        assert_eq!(intersect(&square, &diamond), None);
        assert_eq!(intersect(&diamond, &square), None);
    }

    /// Deterministic pseudo-random numbers, so failures are reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn range(&mut self, min: f32, max: f32) -> f32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (self.0 >> 40) as f32 / (1u64 << 24) as f32;
            min + unit * (max - min)
        }
    }

    #[test]
    fn boxes_sharing_a_rotation_match_interval_overlap() {
        let mut random = Lcg(3);
        let mut overlapping = 0;
        let mut separated = 0;
        for _ in 0..2000 {
            let rotation = random.range(0.0, std::f32::consts::TAU);
            let local_r1 = Vec2::new(random.range(-3.0, 3.0), random.range(-3.0, 3.0));
            let local_r2 = Vec2::new(random.range(-3.0, 3.0), random.range(-3.0, 3.0));
            let scale_r1 = Vec2::new(random.range(0.1, 4.0), random.range(0.1, 4.0));
            let scale_r2 = Vec2::new(random.range(0.1, 4.0), random.range(0.1, 4.0));

            // Overlap of the projections onto the shared local axes. Negative means a gap.
            let overlap = 0.5 * (scale_r1 + scale_r2) - (local_r2 - local_r1).abs();
            if overlap.abs().min_element() < 1e-3 {
                // Too close to touching for float comparisons to be meaningful.
                continue;
            }

            let to_world = Mat2::from_angle(rotation);
            let r1 = Transform2d::new(to_world * local_r1, scale_r1, rotation);
            let r2 = Transform2d::new(to_world * local_r2, scale_r2, rotation);
            match intersect(&r1, &r2) {
                Some(penetration) => {
                    assert!(
                        overlap.min_element() > 0.0,
                        "{r1:?} and {r2:?} are separated, but got {penetration}"
                    );
                    assert!(
                        (penetration.length() - overlap.min_element()).abs() < 1e-3,
                        "Expected a penetration depth of {}, got {penetration}",
                        overlap.min_element()
                    );
                    // Moving r1 slightly past the penetration separates it from r2.
                    let moved = Transform2d {
                        pos: r1.pos + penetration + penetration.normalize() * 1e-2,
                        ..r1
                    };
                    assert_eq!(intersect(&moved, &r2), None);
                    overlapping += 1;
                }
                None => {
                    assert!(
                        overlap.min_element() < 0.0,
                        "{r1:?} and {r2:?} overlap by {overlap}, but no intersection was found"
                    );
                    separated += 1;
                }
            }
        }
        assert!(overlapping > 100 && separated > 100);
    }

    #[test]
    fn contained_box_intersects() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        let inner = Transform2d::new(Vec2::new(1.0, 1.0), Vec2::splat(1.0), 0.3);
        assert!(intersect(&outer, &inner).is_some());
        assert!(intersect(&inner, &outer).is_some());
    }
}
