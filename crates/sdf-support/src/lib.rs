//! Thickness-driven support point generation.
//!
//! This crate turns a per-vertex width field into a set of support anchor
//! candidates whose density and footprint follow the local wall thickness:
//! thin, fragile regions are seeded densely with small-radius anchors, thick
//! regions sparsely with large ones. Top-facing surface is never seeded.
//!
//! The full pipeline, orchestrated by [`find_support_points`]:
//!
//! 1. Normalize the mesh so edge lengths are bounded (sdf-remesh)
//! 2. Estimate per-vertex normals and widths (sdf-types, sdf-width)
//! 3. [`generate_points`] - oversample the surface, radius mapped linearly
//!    from width
//! 4. [`thin_points`] - greedy poisson thinning against a [`PointGrid`],
//!    largest anchors first
//! 5. [`sample_tiny_parts`] - rescue pass for components too small to carry
//!    a usable width field, fed through the same width -> radius -> thinning
//!    path
//!
//! [`PointGrid`]: sdf_spatial::PointGrid
//!
//! # Example
//!
//! ```no_run
//! use sdf_support::{find_support_points, Config};
//! use sdf_types::unit_cube;
//!
//! let outcome = find_support_points(&unit_cube(), &Config::default(), 42)?;
//! for anchor in &outcome.points {
//!     println!("support at {:?} radius {}", anchor.point, anchor.radius);
//! }
//! # Ok::<(), sdf_support::SupportError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod generate;
mod pipeline;
mod thin;
mod tiny;

pub use config::{Config, SampleConfig};
pub use error::{ConfigError, SupportError};
pub use generate::{generate_points, radius_for_width};
pub use pipeline::{find_support_points, SupportOutcome};
pub use thin::thin_points;
pub use tiny::sample_tiny_parts;
