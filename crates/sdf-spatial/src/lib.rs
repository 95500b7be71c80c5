//! Spatial acceleration structures for the SDF support-seeding engine.
//!
//! Two structures back the analysis pipeline:
//!
//! - [`RayTree`] - a bounding-volume hierarchy over a fixed mesh snapshot,
//!   answering first-hit ray queries. The tree owns the per-face normals it
//!   serves for hit-angle filtering, so a rebuilt tree can never be paired
//!   with a stale normal array.
//! - [`PointGrid`] - a sparse hash grid over accepted support anchors,
//!   answering "which anchors lie within this radius" and footprint-overlap
//!   queries during poisson thinning.
//!
//! Both are built once per analysis run and never updated incrementally: the
//! tree is immutable after [`RayTree::build`], the grid is append-only.
//!
//! # Example
//!
//! ```
//! use sdf_spatial::RayTree;
//! use sdf_types::{unit_cube, Point3, Vector3};
//!
//! let tree = RayTree::build(&unit_cube()).unwrap();
//!
//! // Cast from the cube center along +X: hits the x=1 wall at distance 0.5
//! let hit = tree
//!     .first_hit(&Point3::new(0.5, 0.5, 0.5), &Vector3::x())
//!     .unwrap();
//! assert!((hit.distance - 0.5).abs() < 1e-10);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod point_grid;
mod ray_tree;

pub use error::SpatialError;
pub use point_grid::PointGrid;
pub use ray_tree::{RayHit, RayTree};
