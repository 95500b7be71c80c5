//! Width-driven surface oversampling.

use nalgebra::Vector3;
use rand::Rng;
use sdf_types::{Mesh, PointRadius};
use tracing::info;

use crate::config::SampleConfig;

/// Map an estimated width onto an anchor radius.
///
/// Linear from `[min_width, max_width]` onto `[min_radius, max_radius]`,
/// clamped at both ends. An undetermined width maps to `max_radius`: when
/// every ray escaped there is no measurable opposite wall, so the vertex is
/// treated as maximally thick and seeded most sparsely.
///
/// # Example
///
/// ```
/// use sdf_support::{radius_for_width, SampleConfig};
///
/// let sample = SampleConfig::default();
/// assert!((radius_for_width(Some(0.1), &sample) - 1.5).abs() < 1e-12);
/// assert!((radius_for_width(Some(10.0), &sample) - 10.0).abs() < 1e-12);
/// assert!((radius_for_width(Some(99.0), &sample) - 10.0).abs() < 1e-12);
/// assert!((radius_for_width(None, &sample) - 10.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn radius_for_width(width: Option<f64>, sample: &SampleConfig) -> f64 {
    let Some(width) = width else {
        return sample.max_radius;
    };

    let t = ((width - sample.min_width) / (sample.max_width - sample.min_width)).clamp(0.0, 1.0);
    sample
        .min_radius
        .mul_add(1.0 - t, sample.max_radius * t)
}

/// Scatter weighted anchor candidates over the mesh surface.
///
/// Every vertex maps its width onto a radius; each triangle then receives,
/// per corner, an expected `multiplicator * (area/3) / radius^2` uniform
/// interior samples inheriting that corner's radius. Corners whose vertex
/// normal is top-facing (`z > normal_z_max`) contribute nothing. Fractional
/// expectations round probabilistically so the expected density carries no
/// truncation bias.
///
/// The result deliberately oversamples - deduplication is the thinning
/// pass's job.
///
/// # Panics
///
/// Panics if `widths` or `normals` length differs from the vertex count.
#[must_use]
pub fn generate_points(
    mesh: &Mesh,
    widths: &[Option<f64>],
    normals: &[Vector3<f64>],
    sample: &SampleConfig,
    rng: &mut impl Rng,
) -> Vec<PointRadius> {
    assert_eq!(widths.len(), mesh.vertex_count(), "one width per vertex");
    assert_eq!(normals.len(), mesh.vertex_count(), "one normal per vertex");

    let radii: Vec<f64> = widths
        .iter()
        .map(|&width| radius_for_width(width, sample))
        .collect();

    let mut anchors = Vec::new();

    for (face, tri) in mesh.faces.iter().zip(mesh.triangles()) {
        let corner_area = tri.area() / 3.0;
        if corner_area <= 0.0 {
            continue;
        }

        for &vertex in face {
            let vertex = vertex as usize;
            if normals[vertex].z > sample.normal_z_max {
                continue;
            }

            let radius = radii[vertex];
            let expected = sample.multiplicator * corner_area / (radius * radius);

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let mut count = expected.floor() as usize;
            if rng.gen::<f64>() < expected.fract() {
                count += 1;
            }

            for _ in 0..count {
                anchors.push(PointRadius::new(tri.sample_interior(rng), radius));
            }
        }
    }

    info!(
        candidates = anchors.len(),
        faces = mesh.face_count(),
        "Generated support candidates"
    );

    anchors
}
