//! Edge-length normalization for the SDF support-seeding engine.
//!
//! The width estimator and the surface samplers assume that triangle edge
//! lengths are roughly uniform: ray origins sit on vertices, and sample
//! density is allocated per triangle area. This crate bounds edge lengths
//! into a `[min_length, max_length]` band:
//!
//! - [`split_long_edges`] - midpoint-splits every edge longer than the bound,
//!   crack-free, until none remains
//! - [`merge_short_edges`] - collapses edges shorter than the bound using a
//!   quadric error metric, rejecting collapses that would move the surface
//!   more than an error budget
//! - [`normalize_mesh`] - runs both in sequence with validated parameters
//!
//! # Example
//!
//! ```
//! use sdf_remesh::{normalize_mesh, NormalizeParams};
//! use sdf_types::unit_cube;
//!
//! let params = NormalizeParams::new(0.25, 0.5, 0.05)?;
//! let outcome = normalize_mesh(&unit_cube(), &params)?;
//!
//! let stats = outcome.mesh.edge_stats();
//! assert!(stats.max <= 0.5 + 1e-9);
//! # Ok::<(), sdf_remesh::RemeshError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod collapse;
mod error;
mod params;
mod quadric;
mod split;

pub use collapse::merge_short_edges;
pub use error::{RemeshError, RemeshResult};
pub use params::NormalizeParams;
pub use quadric::Quadric;
pub use split::split_long_edges;

use sdf_types::Mesh;
use tracing::info;

/// Outcome of a [`normalize_mesh`] run.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    /// The normalized mesh.
    pub mesh: Mesh,
    /// Face count before normalization.
    pub original_faces: usize,
    /// Face count after normalization.
    pub final_faces: usize,
    /// Vertex count before normalization.
    pub original_vertices: usize,
    /// Vertex count after normalization.
    pub final_vertices: usize,
}

/// Bound the mesh's edge lengths into `[min_length, max_length]`.
///
/// Long edges are midpoint-split first, then short edges are collapsed under
/// the quadric error budget. Collapsing cannot reintroduce edges longer than
/// the split bound by more than the merged vertices' local extent, so one
/// round of each is sufficient in practice.
///
/// # Errors
///
/// Returns an error if the parameters are inconsistent (see
/// [`NormalizeParams::new`]); an empty mesh passes through unchanged.
pub fn normalize_mesh(mesh: &Mesh, params: &NormalizeParams) -> RemeshResult<NormalizeOutcome> {
    let original_faces = mesh.face_count();
    let original_vertices = mesh.vertex_count();

    let split = split_long_edges(mesh, params.max_length)?;
    let merged = merge_short_edges(&split, params.min_length, params.max_error)?;

    info!(
        original_faces,
        final_faces = merged.face_count(),
        original_vertices,
        final_vertices = merged.vertex_count(),
        "Mesh normalization complete"
    );

    Ok(NormalizeOutcome {
        original_faces,
        final_faces: merged.face_count(),
        original_vertices,
        final_vertices: merged.vertex_count(),
        mesh: merged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdf_types::unit_cube;

    #[test]
    fn normalize_bounds_edges() {
        let params = NormalizeParams::new(0.2, 0.5, 0.05).unwrap();
        let outcome = normalize_mesh(&unit_cube(), &params).unwrap();

        let stats = outcome.mesh.edge_stats();
        assert!(stats.max <= 0.5 + 1e-9, "max edge {}", stats.max);
        assert!(outcome.final_faces > outcome.original_faces);
    }

    #[test]
    fn normalize_empty_mesh_is_neutral() {
        let params = NormalizeParams::new(0.5, 1.0, 0.1).unwrap();
        let outcome = normalize_mesh(&Mesh::new(), &params).unwrap();
        assert!(outcome.mesh.is_empty());
        assert_eq!(outcome.original_faces, 0);
        assert_eq!(outcome.final_faces, 0);
    }

    #[test]
    fn normalize_terminates_on_roundtrip_thresholds() {
        // Subdividing then merging with matching thresholds must not blow up
        let params = NormalizeParams::new(0.4, 0.5, 0.2).unwrap();
        let outcome = normalize_mesh(&unit_cube(), &params).unwrap();
        assert!(outcome.final_faces < 10_000);
    }
}
