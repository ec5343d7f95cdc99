use glam::Vec2;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

pub(crate) trait Vec2Ext {
    /// Rotates the vector by 90 degrees clockwise in a y-up frame.
    fn perp_cw(self) -> Vec2;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn perp_cw(self) -> Vec2 {
        Vec2::new(self.y, -self.x)
    }
}

/// An axis-aligned bounding box on the xy-plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct Aabb2d {
    /// The minimum corner, i.e. left and bottom.
    pub min: Vec2,
    /// The maximum corner, i.e. right and top.
    pub max: Vec2,
}

impl Aabb2d {
    /// Creates a new AABB from its minimum and maximum corners.
    #[inline]
    pub fn new(min: impl Into<Vec2>, max: impl Into<Vec2>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Computes the AABB enclosing all vertices.
    /// Returns `None` if `vertices` is empty.
    pub fn from_verts(vertices: &[Vec2]) -> Option<Self> {
        let (first, rest) = vertices.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for vertex in rest {
            aabb.min = aabb.min.min(*vertex);
            aabb.max = aabb.max.max(*vertex);
        }
        Some(aabb)
    }

    /// Returns whether the point is inside the AABB. Points on the border count as inside.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// The extents of the AABB.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// The four corners as a correctly wound polygon, starting at the top left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min.x, self.max.y),
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
        ]
    }
}

/// Iterates over the directed edges of a polygon, including the closing edge from the last vertex back to the first.
#[inline]
pub fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    polygon
        .iter()
        .copied()
        .zip(polygon.iter().copied().cycle().skip(1))
}

/// Signed area of a polygon. Correctly wound polygons have a positive area.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    edges(polygon).map(|(a, b)| a.perp_dot(b)).sum::<f32>() * 0.5
}

/// The average of all vertices. Lies inside every non-degenerate convex polygon.
/// Returns `None` for an empty polygon.
pub fn polygon_centroid(polygon: &[Vec2]) -> Option<Vec2> {
    if polygon.is_empty() {
        return None;
    }
    Some(polygon.iter().copied().sum::<Vec2>() / polygon.len() as f32)
}

/// Returns whether the polygon is convex and correctly wound.
///
/// `tolerance` is how far the cross product of an edge and the offset to any vertex may drop below zero,
/// i.e. twice the area of the triangle they span. Measuring area instead of distance keeps very short edges,
/// whose direction is dominated by rounding errors, from failing the test.
pub fn is_convex(polygon: &[Vec2], tolerance: f32) -> bool {
    if polygon.len() < 3 || polygon_area(polygon) <= 0.0 {
        return false;
    }
    edges(polygon).all(|(a, b)| {
        let edge = b - a;
        polygon
            .iter()
            .all(|vertex| edge.perp_cw().dot(*vertex - a) <= tolerance)
    })
}
