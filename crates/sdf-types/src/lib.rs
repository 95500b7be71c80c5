//! Core types for the SDF support-seeding engine.
//!
//! This crate provides the foundational types shared by every stage of the
//! width-estimation and support-seeding pipeline:
//!
//! - [`Vertex`] - A point in 3D space with an optional unit normal
//! - [`Mesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`PointRadius`] - A support anchor candidate (position + footprint radius)
//! - [`EdgeStats`] - Edge-length distribution summary
//! - [`NormalStrategy`] - Vertex-normal estimation strategies
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`. Downstream
//! crates (sdf-remesh, sdf-support) assume millimeters.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule. "Top-facing" surface tests
//! throughout the engine compare a normal's Z component against a threshold.
//!
//! # Example
//!
//! ```
//! use sdf_types::{Mesh, Vertex, Point3};
//!
//! // Create a simple triangle mesh
//! let mut mesh = Mesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod mesh;
mod normals;
mod sample;
mod triangle;
mod vertex;

// Re-export core types
pub use bounds::Aabb;
pub use mesh::{square_plate, unit_cube, EdgeStats, Mesh};
pub use normals::{face_normals, vertex_normals, NormalStrategy};
pub use sample::PointRadius;
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
