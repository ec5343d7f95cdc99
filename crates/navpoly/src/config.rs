use glam::Vec2;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

use crate::Aabb2d;

/// Specifies the configuration used when building a [`NavMesh`](crate::NavMesh).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub struct NavMeshConfig {
    /// The region covered by the mesh before any obstacle is carved out of it. `[Units: wu]`
    pub bounds: Aabb2d,

    /// The maximum number of vertices the mesh may store, counting the vertices of retired polygons.
    ///
    /// Every obstacle retires the polygons it hits and appends their replacements,
    /// so the vertex buffer only ever grows during a build.
    pub max_vertices: usize,

    /// The maximum number of polygons the mesh may store, counting retired polygons.
    pub max_polygons: usize,

    /// Pieces with a smaller area are dropped when a polygon is subdivided. `[Limit: >= 0] [Units: wu²]`
    ///
    /// Obstacles that only graze a polygon, or share an edge with it, would otherwise
    /// produce slivers of zero width.
    pub area_epsilon: f32,
}

impl Default for NavMeshConfig {
    fn default() -> Self {
        Self {
            bounds: Aabb2d::new(Vec2::splat(-10.0), Vec2::splat(10.0)),
            max_vertices: 1024,
            max_polygons: 1024,
            area_epsilon: DEFAULT_AREA_EPSILON,
        }
    }
}

/// The default for [`NavMeshConfig::area_epsilon`].
pub const DEFAULT_AREA_EPSILON: f32 = 1e-5;

impl NavMeshConfig {
    /// Creates a default config covering the given bounds.
    pub fn from_bounds(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            bounds: Aabb2d::new([left, bottom], [right, top]),
            ..Default::default()
        }
    }

    /// Sets the vertex and polygon capacities.
    pub fn with_capacity(mut self, max_vertices: usize, max_polygons: usize) -> Self {
        self.max_vertices = max_vertices;
        self.max_polygons = max_polygons;
        self
    }

    /// Sets the [`NavMeshConfig::area_epsilon`].
    pub fn with_area_epsilon(mut self, area_epsilon: f32) -> Self {
        self.area_epsilon = area_epsilon;
        self
    }
}
