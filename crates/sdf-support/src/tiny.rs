//! Dense rescue sampling of tiny mesh components.

use nalgebra::{Point3, Vector3};
use rand::Rng;
use sdf_spatial::PointGrid;
use sdf_types::Mesh;
use tracing::debug;

use crate::config::SampleConfig;

/// Components with fewer vertices than this carry too few width samples for
/// the per-vertex generator to represent them reliably.
const TINY_COMPONENT_VERTICES: usize = 16;

/// Densely sample the surface of tiny connected components.
///
/// The per-vertex generator allocates anchors from the vertex width field,
/// which under-represents small isolated islands: they own only a handful
/// of vertices no matter how fragile they are. This pass finds connected
/// components with fewer than a fixed number of vertices and resamples
/// their triangle interiors at random barycentric coordinates, with an
/// expected `multiplicator * area / min_width^2` samples per triangle.
///
/// Excluded are top-facing triangles (face normal Z above
/// `sample.normal_z_max`) and samples already covered by an anchor in
/// `grid` within `sample.min_radius` - those regions are represented
/// well enough.
///
/// Returns surviving sample positions with their face normals, ready for
/// downstream width estimation. The RNG is consumed sequentially; reseed it
/// for reproducible runs.
#[must_use]
pub fn sample_tiny_parts(
    mesh: &Mesh,
    grid: &PointGrid,
    sample: &SampleConfig,
    rng: &mut impl Rng,
) -> Vec<(Point3<f64>, Vector3<f64>)> {
    if mesh.is_empty() {
        return Vec::new();
    }

    let component = components_by_vertex(mesh);
    let mut component_vertices = vec![0usize; mesh.vertex_count()];
    for &root in &component {
        component_vertices[root] += 1;
    }

    let min_width_sq = sample.min_width * sample.min_width;
    let mut samples = Vec::new();
    let mut tiny_faces = 0usize;

    for (face, tri) in mesh.faces.iter().zip(mesh.triangles()) {
        if component_vertices[component[face[0] as usize]] >= TINY_COMPONENT_VERTICES {
            continue;
        }
        let Some(normal) = tri.normal() else {
            continue;
        };
        if normal.z > sample.normal_z_max {
            continue;
        }
        tiny_faces += 1;

        let expected = sample.multiplicator * tri.area() / min_width_sq;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut count = expected.floor() as usize;
        if rng.gen::<f64>() < expected.fract() {
            count += 1;
        }

        for _ in 0..count {
            let point = tri.sample_interior(rng);
            if grid.query_within(&point, sample.min_radius).is_empty() {
                samples.push((point, normal));
            }
        }
    }

    debug!(
        tiny_faces,
        samples = samples.len(),
        "Sampled tiny components"
    );

    samples
}

/// Union-find over vertices connected by faces; returns each vertex's
/// component root.
fn components_by_vertex(mesh: &Mesh) -> Vec<usize> {
    let mut parent: Vec<usize> = (0..mesh.vertex_count()).collect();

    fn find(parent: &mut [usize], mut v: usize) -> usize {
        while parent[v] != v {
            parent[v] = parent[parent[v]]; // path halving
            v = parent[v];
        }
        v
    }

    for face in &mesh.faces {
        let a = find(&mut parent, face[0] as usize);
        let b = find(&mut parent, face[1] as usize);
        let c = find(&mut parent, face[2] as usize);
        parent[b] = a;
        parent[c] = a;
    }

    (0..parent.len())
        .map(|v| find(&mut parent, v))
        .collect()
}
