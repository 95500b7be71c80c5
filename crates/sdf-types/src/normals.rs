//! Face and vertex normal estimation.

use nalgebra::Vector3;

use crate::Mesh;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How per-vertex normals are accumulated from adjacent faces.
///
/// All strategies agree on flat geometry; they differ in how much weight a
/// large or sliver-shaped face gets at a shared corner, which matters for the
/// cast direction of the width estimator near sharp features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NormalStrategy {
    /// Each adjacent face contributes its normal scaled by its area.
    AreaWeighted,
    /// Each adjacent face contributes its normal scaled by the corner angle
    /// it subtends at the vertex.
    AngleWeighted,
    /// Nelson Max's weighting: the corner cross product divided by the
    /// squared lengths of both incident edges. Insensitive to triangulation
    /// density, which suits irregular scan meshes.
    #[default]
    MaxAngleWeighted,
}

/// Compute one unit normal per face.
///
/// Degenerate (zero-area) faces yield `None`. Output length equals
/// `mesh.face_count()`.
///
/// # Example
///
/// ```
/// use sdf_types::{face_normals, unit_cube};
///
/// let normals = face_normals(&unit_cube());
/// assert_eq!(normals.len(), 12);
/// assert!(normals.iter().all(Option::is_some));
/// ```
#[must_use]
pub fn face_normals(mesh: &Mesh) -> Vec<Option<Vector3<f64>>> {
    mesh.triangles().map(|tri| tri.normal()).collect()
}

/// Compute one unit normal per vertex from adjacent faces.
///
/// If **every** vertex already carries a normal, the caller-supplied normals
/// win and are returned unchanged. Otherwise the chosen strategy accumulates
/// face contributions; vertices with no non-degenerate adjacent face get a
/// zero vector, which downstream consumers must treat as "no reliable
/// normal". Output length equals `mesh.vertex_count()`.
///
/// # Example
///
/// ```
/// use sdf_types::{vertex_normals, unit_cube, NormalStrategy};
///
/// let normals = vertex_normals(&unit_cube(), NormalStrategy::AreaWeighted);
/// assert_eq!(normals.len(), 8);
/// // Cube corner normals point away from the center
/// assert!(normals[0].dot(&normals[6]) < 0.0);
/// ```
#[must_use]
pub fn vertex_normals(mesh: &Mesh, strategy: NormalStrategy) -> Vec<Vector3<f64>> {
    if !mesh.vertices.is_empty() && mesh.vertices.iter().all(|v| v.normal.is_some()) {
        return mesh
            .vertices
            .iter()
            .map(|v| v.normal.unwrap_or_else(Vector3::zeros))
            .collect();
    }

    let mut normals = vec![Vector3::zeros(); mesh.vertex_count()];

    for face in &mesh.faces {
        let p = [
            mesh.vertices[face[0] as usize].position,
            mesh.vertices[face[1] as usize].position,
            mesh.vertices[face[2] as usize].position,
        ];

        for corner in 0..3 {
            let e1 = p[(corner + 1) % 3] - p[corner];
            let e2 = p[(corner + 2) % 3] - p[corner];
            let cross = e1.cross(&e2);

            let contribution = match strategy {
                // |cross| = 2 * area, direction = face normal
                NormalStrategy::AreaWeighted => cross * 0.5,
                NormalStrategy::AngleWeighted => {
                    let denom = e1.norm() * e2.norm();
                    if denom < f64::EPSILON {
                        continue;
                    }
                    let angle = (e1.dot(&e2) / denom).clamp(-1.0, 1.0).acos();
                    let len = cross.norm();
                    if len < f64::EPSILON {
                        continue;
                    }
                    (cross / len) * angle
                }
                NormalStrategy::MaxAngleWeighted => {
                    let denom = e1.norm_squared() * e2.norm_squared();
                    if denom < f64::EPSILON {
                        continue;
                    }
                    cross / denom
                }
            };

            normals[face[corner] as usize] += contribution;
        }
    }

    for normal in &mut normals {
        let len = normal.norm();
        if len > f64::EPSILON {
            *normal /= len;
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{square_plate, unit_cube, Vertex};
    use approx::assert_relative_eq;

    #[test]
    fn face_normals_of_cube_are_axis_aligned() {
        let normals = face_normals(&unit_cube());
        for n in normals.into_iter().flatten() {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            let max_component = n.x.abs().max(n.y.abs()).max(n.z.abs());
            assert_relative_eq!(max_component, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_face_has_no_normal() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(2.0, 0.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        assert_eq!(face_normals(&mesh), vec![None]);
    }

    #[test]
    fn flat_plate_normals_point_up() {
        // Strip the pre-set normals so the strategies actually run.
        let mut plate = square_plate(1.0);
        for v in &mut plate.vertices {
            v.normal = None;
        }

        for strategy in [
            NormalStrategy::AreaWeighted,
            NormalStrategy::AngleWeighted,
            NormalStrategy::MaxAngleWeighted,
        ] {
            let normals = vertex_normals(&plate, strategy);
            for n in normals {
                assert_relative_eq!(n.z, 1.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn caller_supplied_normals_win() {
        let plate = square_plate(1.0);
        let normals = vertex_normals(&plate, NormalStrategy::MaxAngleWeighted);
        for n in normals {
            assert_eq!(n, Vector3::z());
        }
    }

    #[test]
    fn cube_corner_normals_are_unit_and_outward() {
        let cube = unit_cube();
        let normals = vertex_normals(&cube, NormalStrategy::MaxAngleWeighted);
        let center = nalgebra::Point3::new(0.5, 0.5, 0.5);
        for (v, n) in cube.vertices.iter().zip(&normals) {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-10);
            assert!(n.dot(&(v.position - center)) > 0.0);
        }
    }

    #[test]
    fn isolated_vertex_gets_zero_normal() {
        let mut mesh = square_plate(1.0);
        for v in &mut mesh.vertices {
            v.normal = None;
        }
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0));
        let normals = vertex_normals(&mesh, NormalStrategy::AreaWeighted);
        assert_eq!(normals[4], Vector3::zeros());
    }
}
