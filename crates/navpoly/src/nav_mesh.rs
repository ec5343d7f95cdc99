//! The navigation mesh and its construction from obstacles.

use std::ops::Range;

use glam::Vec2;
use thiserror::Error;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

use crate::{
    NavMeshConfig, Transform2d,
    math::{edges, polygon_area},
    shapes::{point_in_poly, poly_intersect},
    subdivide::subdivide,
};

/// A convex polygon of a [`NavMesh`], stored as a range into [`NavMesh::vertices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct NavPoly {
    /// The index of the first vertex.
    pub offset: u32,
    /// The number of vertices.
    pub count: u32,
    /// Whether the polygon is part of the navigable mesh.
    /// Polygons that were subdivided by an obstacle stay in the buffer, but are no longer occupied.
    pub occupied: bool,
}

impl NavPoly {
    /// The range of this polygon's vertices in [`NavMesh::vertices`].
    #[inline]
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.count as usize
    }
}

/// A navigation mesh made of convex polygons that share one flat vertex buffer.
///
/// The mesh starts out as a single polygon covering [`NavMeshConfig::bounds`]. Every obstacle retires the polygons
/// it intersects and appends the pieces of them that remain navigable. Nothing is ever removed from the buffers,
/// so rebuild the mesh from scratch whenever the obstacles change.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavMesh {
    config: NavMeshConfig,
    polygons: Vec<NavPoly>,
    vertices: Vec<Vec2>,
}

/// Builds a navigation mesh covering the given bounds with the default capacities,
/// carving out every rectangle in `obstacles`.
pub fn build_nav_mesh(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    obstacles: impl IntoIterator<Item = Transform2d>,
) -> Result<NavMesh, NavMeshError> {
    NavMesh::build(NavMeshConfig::from_bounds(left, right, bottom, top), obstacles)
}

impl NavMesh {
    /// Creates a mesh consisting of a single polygon spanning [`NavMeshConfig::bounds`].
    pub fn new(config: NavMeshConfig) -> Result<Self, NavMeshError> {
        let mut mesh = Self {
            polygons: Vec::with_capacity(config.max_polygons.min(INITIAL_CAPACITY)),
            vertices: Vec::with_capacity(config.max_vertices.min(INITIAL_CAPACITY)),
            config,
        };
        mesh.seed()?;
        Ok(mesh)
    }

    /// Creates a mesh and carves out every rectangle in `obstacles`.
    pub fn build(
        config: NavMeshConfig,
        obstacles: impl IntoIterator<Item = Transform2d>,
    ) -> Result<Self, NavMeshError> {
        let mut mesh = Self::new(config)?;
        mesh.add_obstacles(obstacles)?;
        Ok(mesh)
    }

    /// Builds the mesh again from `obstacles`, keeping the config.
    ///
    /// On error, the mesh is left untouched.
    pub fn rebuild(
        &mut self,
        obstacles: impl IntoIterator<Item = Transform2d>,
    ) -> Result<(), NavMeshError> {
        *self = Self::build(self.config.clone(), obstacles)?;
        Ok(())
    }

    fn seed(&mut self) -> Result<(), NavMeshError> {
        let corners = self.config.bounds.corners();
        self.push_polygon(&corners)
    }

    fn add_obstacles(
        &mut self,
        obstacles: impl IntoIterator<Item = Transform2d>,
    ) -> Result<(), NavMeshError> {
        let mut obstacle_count = 0;
        for transform in obstacles {
            self.add_obstacle(&transform.corners())?;
            obstacle_count += 1;
        }
        tracing::debug!(
            "Built nav mesh over {:?} with {obstacle_count} obstacles: {} of {} polygons occupied, {} vertices",
            self.config.bounds,
            self.occupied_count(),
            self.polygons.len(),
            self.vertices.len(),
        );
        Ok(())
    }

    /// Carves a convex obstacle out of the mesh.
    ///
    /// Every occupied polygon intersecting the obstacle is retired and replaced by the pieces of it that lie
    /// outside of the obstacle. Polygons the obstacle only touches are left as they are.
    /// An obstacle wound the wrong way around is reversed first. Degenerate obstacles and obstacles with
    /// non-finite vertices are ignored.
    ///
    /// Returns the number of retired polygons.
    pub fn add_obstacle(&mut self, obstacle: &[Vec2]) -> Result<usize, NavMeshError> {
        if !obstacle.iter().all(|vertex| vertex.is_finite()) {
            tracing::warn!("Ignoring obstacle with non-finite vertices: {obstacle:?}");
            return Ok(0);
        }
        let area = polygon_area(obstacle);
        if obstacle.len() < 3 || area.abs() <= self.config.area_epsilon {
            tracing::debug!("Ignoring degenerate obstacle with area {area}");
            return Ok(0);
        }
        let reversed;
        let obstacle = if area < 0.0 {
            tracing::warn!("Obstacle is wound the wrong way around, reversing it");
            reversed = obstacle.iter().rev().copied().collect::<Vec<_>>();
            reversed.as_slice()
        } else {
            obstacle
        };

        let mut retired = 0;
        // Polygons pushed during this loop are already clear of the obstacle.
        let polygon_count = self.polygons.len();
        for index in 0..polygon_count {
            let nav_poly = self.polygons[index];
            if !nav_poly.occupied {
                continue;
            }
            let poly = &self.vertices[nav_poly.range()];
            if !poly_intersect(poly, obstacle) {
                continue;
            }

            let pieces = subdivide(poly, obstacle, self.config.area_epsilon);
            let remaining_area: f32 = pieces.iter().map(|piece| polygon_area(piece)).sum();
            if polygon_area(poly) - remaining_area <= self.config.area_epsilon {
                // The obstacle only touches the polygon.
                continue;
            }
            tracing::trace!(
                "Subdividing nav polygon {index} into {} pieces",
                pieces.len()
            );

            self.reserve(pieces.len(), pieces.iter().map(Vec::len).sum())?;
            self.polygons[index].occupied = false;
            for piece in &pieces {
                self.push_polygon(piece)?;
            }
            retired += 1;
        }
        Ok(retired)
    }

    /// Fails if adding the given number of polygons and vertices would exceed the configured capacity.
    fn reserve(&self, polygons: usize, vertices: usize) -> Result<(), NavMeshError> {
        if self.polygons.len() + polygons > self.config.max_polygons {
            return Err(NavMeshError::CapacityExceeded {
                kind: CapacityKind::Polygons,
                capacity: self.config.max_polygons,
            });
        }
        if self.vertices.len() + vertices > self.config.max_vertices {
            return Err(NavMeshError::CapacityExceeded {
                kind: CapacityKind::Vertices,
                capacity: self.config.max_vertices,
            });
        }
        Ok(())
    }

    fn push_polygon(&mut self, vertices: &[Vec2]) -> Result<(), NavMeshError> {
        self.reserve(1, vertices.len())?;
        let offset = u32::try_from(self.vertices.len()).map_err(|_| NavMeshError::CapacityExceeded {
            kind: CapacityKind::Vertices,
            capacity: u32::MAX as usize,
        })?;
        self.vertices.extend_from_slice(vertices);
        self.polygons.push(NavPoly {
            offset,
            count: vertices.len() as u32,
            occupied: true,
        });
        Ok(())
    }

    /// The config the mesh was built with.
    #[inline]
    pub fn config(&self) -> &NavMeshConfig {
        &self.config
    }

    /// All polygons, including retired ones.
    #[inline]
    pub fn polygons(&self) -> &[NavPoly] {
        &self.polygons
    }

    /// The shared vertex buffer.
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// The vertices of a polygon of this mesh.
    ///
    /// # Panics
    ///
    /// Panics if `polygon` does not belong to this mesh.
    #[inline]
    pub fn polygon_vertices(&self, polygon: &NavPoly) -> &[Vec2] {
        &self.vertices[polygon.range()]
    }

    /// Iterates over the vertices of every occupied polygon.
    pub fn occupied(&self) -> impl Iterator<Item = &[Vec2]> + '_ {
        self.polygons
            .iter()
            .filter(|polygon| polygon.occupied)
            .map(|polygon| self.polygon_vertices(polygon))
    }

    /// The number of occupied polygons.
    pub fn occupied_count(&self) -> usize {
        self.polygons
            .iter()
            .filter(|polygon| polygon.occupied)
            .count()
    }

    /// Iterates over every occupied polygon as a closed loop of line segments, e.g. for debug drawing.
    pub fn line_loops(
        &self,
    ) -> impl Iterator<Item = impl Iterator<Item = (Vec2, Vec2)> + '_> + '_ {
        self.occupied().map(edges)
    }

    /// The total area of all occupied polygons.
    pub fn navigable_area(&self) -> f32 {
        self.occupied().map(polygon_area).sum()
    }

    /// Returns the index into [`NavMesh::polygons`] of an occupied polygon containing `point`.
    /// Points on a shared edge may be reported for either polygon.
    pub fn find_polygon(&self, point: Vec2) -> Option<usize> {
        self.polygons.iter().position(|polygon| {
            polygon.occupied && point_in_poly(self.polygon_vertices(polygon), point)
        })
    }
}

/// Upper bound for the up-front allocation of the buffers.
const INITIAL_CAPACITY: usize = 256;

/// Errors that can occur when building a [`NavMesh`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMeshError {
    /// Happens when the mesh would need more vertices or polygons than its config allows.
    #[error("Nav mesh capacity exceeded: more than {capacity} {kind} needed")]
    CapacityExceeded {
        /// The buffer that ran out of space.
        kind: CapacityKind,
        /// The capacity of that buffer.
        capacity: usize,
    },
}

/// The buffers of a [`NavMesh`] that have a capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityKind {
    /// [`NavMesh::vertices`]
    Vertices,
    /// [`NavMesh::polygons`]
    Polygons,
}

impl std::fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapacityKind::Vertices => write!(f, "vertices"),
            CapacityKind::Polygons => write!(f, "polygons"),
        }
    }
}
