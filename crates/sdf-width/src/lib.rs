//! Multi-ray shape-diameter width estimation.
//!
//! The shape diameter function (SDF) estimates local material thickness at a
//! surface point by casting a bundle of rays *into* the solid (opposite the
//! surface normal) and averaging the distances at which they exit through
//! the opposite wall. A single ray is easily fooled by mesh noise and
//! incidental geometry; this crate casts a weighted cone of rays and filters
//! the hits twice:
//!
//! - **Angle filtering** rejects hits on surfaces that are not oriented back
//!   toward the ray (grazing hits that would bias the width down).
//! - **Deviation filtering** rejects hits farther than a configured number
//!   of weighted standard deviations from the weighted mean (outlier rays
//!   that pierced thin unrelated geometry).
//!
//! What remains is averaged by ray weight. When nothing survives, the width
//! is *undetermined* - represented as `None`, never as a numeric sentinel.
//!
//! # Example
//!
//! ```
//! use sdf_spatial::RayTree;
//! use sdf_types::{unit_cube, Point3, Vector3};
//! use sdf_width::{estimate_width, RaysConfig};
//!
//! let tree = RayTree::build(&unit_cube()).unwrap();
//! let config = RaysConfig::default();
//!
//! // From the center of the top face, looking down through the cube
//! let width = estimate_width(
//!     &Point3::new(0.5, 0.5, 1.0),
//!     &Vector3::z(),
//!     &tree,
//!     &config,
//! )
//! .unwrap();
//! assert!(width > 0.5 && width < 2.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod directions;
mod estimate;

pub use directions::{cone_directions, WeightedDirection};
pub use estimate::{estimate_width, estimate_widths, RaysConfig};
