#![doc = include_str!("../../../readme.md")]

mod collision;
mod config;
pub(crate) mod math;
mod nav_mesh;
mod scene;
pub mod shapes;
mod subdivide;

pub use collision::{Transform2d, intersect};
pub use config::{DEFAULT_AREA_EPSILON, NavMeshConfig};
pub use math::{Aabb2d, edges, is_convex, polygon_area, polygon_centroid};
pub use nav_mesh::{CapacityKind, NavMesh, NavMeshError, NavPoly, build_nav_mesh};
pub use scene::{Entity, EntityKey, Scene};
pub use subdivide::subdivide_nav_poly;

/// Re-export of the math library used throughout the public API.
pub use glam;
