//! Midpoint splitting of over-long edges.

// Mesh processing uses u32 indices throughout
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use sdf_types::{Mesh, Vertex};
use tracing::debug;

use crate::error::{RemeshError, RemeshResult};

/// Split every triangle edge longer than `max_length` at its midpoint until
/// none remains.
///
/// Midpoints are shared between the two faces adjacent to an edge, so the
/// result is crack-free. A face with one, two, or three over-long edges is
/// re-triangulated into two, three, or four faces whose vertices follow the
/// original boundary cycle, preserving winding. Each pass at most halves the
/// longest edge, so the loop terminates for any finite input.
///
/// An empty mesh passes through unchanged.
///
/// # Errors
///
/// Returns [`RemeshError::InvalidMaxLength`] if `max_length` is not positive
/// and finite.
///
/// # Example
///
/// ```
/// use sdf_remesh::split_long_edges;
/// use sdf_types::unit_cube;
///
/// let split = split_long_edges(&unit_cube(), 0.75)?;
/// assert!(split.edge_stats().max <= 0.75 + 1e-9);
/// # Ok::<(), sdf_remesh::RemeshError>(())
/// ```
pub fn split_long_edges(mesh: &Mesh, max_length: f64) -> RemeshResult<Mesh> {
    if !(max_length.is_finite() && max_length > 0.0) {
        return Err(RemeshError::InvalidMaxLength(max_length));
    }

    let mut vertices = mesh.vertices.clone();
    let mut faces = mesh.faces.clone();
    let mut pass = 0usize;

    loop {
        // One midpoint per unique over-long edge, shared across faces
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();

        for face in &faces {
            for i in 0..3 {
                let a = face[i];
                let b = face[(i + 1) % 3];
                let edge = normalize_edge(a, b);
                if midpoints.contains_key(&edge) {
                    continue;
                }
                let pa = &vertices[a as usize].position;
                let pb = &vertices[b as usize].position;
                if (pb - pa).norm() > max_length {
                    let mid = Vertex::from_coords(
                        f64::midpoint(pa.x, pb.x),
                        f64::midpoint(pa.y, pb.y),
                        f64::midpoint(pa.z, pb.z),
                    );
                    let idx = vertices.len() as u32;
                    vertices.push(mid);
                    midpoints.insert(edge, idx);
                }
            }
        }

        if midpoints.is_empty() {
            break;
        }

        pass += 1;
        debug!(pass, splits = midpoints.len(), "Splitting long edges");

        let mut new_faces = Vec::with_capacity(faces.len() * 2);
        for face in &faces {
            let [v0, v1, v2] = *face;
            let m01 = midpoints.get(&normalize_edge(v0, v1)).copied();
            let m12 = midpoints.get(&normalize_edge(v1, v2)).copied();
            let m20 = midpoints.get(&normalize_edge(v2, v0)).copied();

            // Every sub-face lists its corners in the original boundary
            // cycle v0, m01, v1, m12, v2, m20 - this keeps CCW winding.
            match (m01, m12, m20) {
                (None, None, None) => new_faces.push(*face),
                (Some(m), None, None) => {
                    new_faces.push([v0, m, v2]);
                    new_faces.push([m, v1, v2]);
                }
                (None, Some(m), None) => {
                    new_faces.push([v0, v1, m]);
                    new_faces.push([v0, m, v2]);
                }
                (None, None, Some(m)) => {
                    new_faces.push([v0, v1, m]);
                    new_faces.push([m, v1, v2]);
                }
                (Some(a), Some(b), None) => {
                    new_faces.push([v0, a, v2]);
                    new_faces.push([a, v1, b]);
                    new_faces.push([a, b, v2]);
                }
                (None, Some(a), Some(b)) => {
                    new_faces.push([v0, v1, a]);
                    new_faces.push([v0, a, b]);
                    new_faces.push([b, a, v2]);
                }
                (Some(a), None, Some(b)) => {
                    new_faces.push([v0, a, b]);
                    new_faces.push([a, v1, v2]);
                    new_faces.push([a, v2, b]);
                }
                (Some(a), Some(b), Some(c)) => {
                    new_faces.push([v0, a, c]);
                    new_faces.push([v1, b, a]);
                    new_faces.push([v2, c, b]);
                    new_faces.push([a, b, c]);
                }
            }
        }
        faces = new_faces;
    }

    Ok(Mesh::from_parts(vertices, faces))
}

/// Normalize edge so smaller vertex index comes first.
const fn normalize_edge(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}
