//! Full analysis pipeline.

use nalgebra::{Point3, Vector3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sdf_remesh::normalize_mesh;
use sdf_spatial::{PointGrid, RayTree};
use sdf_types::{vertex_normals, Mesh, PointRadius};
use sdf_width::estimate_widths;
use tracing::info;

use crate::config::Config;
use crate::error::SupportError;
use crate::generate::{generate_points, radius_for_width};
use crate::thin::thin_points;
use crate::tiny::sample_tiny_parts;

/// Seed salt for the tiny-part sub-stream, so the two sampling stages never
/// consume the same random sequence.
const TINY_STREAM_SALT: u64 = 0x7469_6e79; // "tiny"

/// Result of a [`find_support_points`] run.
///
/// The width field is aligned with the vertices of the **normalized** mesh
/// returned here, not with the caller's input mesh - normalization rewrites
/// the vertex array.
#[derive(Debug, Clone)]
pub struct SupportOutcome {
    /// The normalized mesh the analysis ran on.
    pub mesh: Mesh,
    /// Estimated width per vertex of `mesh`; `None` where undetermined or
    /// top-facing.
    pub widths: Vec<Option<f64>>,
    /// Surviving support anchors. Order is irrelevant; every pair satisfies
    /// the radius-sum separation invariant.
    pub points: Vec<PointRadius>,
}

/// Run the full support-seeding analysis over a mesh.
///
/// Normalizes edge lengths, estimates per-vertex normals and widths, and
/// scatters, maps, and thins anchor candidates; a rescue pass densely
/// samples components too small to carry a usable width field and feeds the
/// extra candidates through the same width-to-radius mapping and thinning
/// grid.
///
/// Randomness is fully determined by `seed`: the generator and the
/// tiny-part pass each own a `ChaCha8` sub-stream derived from it, and the
/// parallel width estimation consumes no randomness, so identical inputs
/// and seed reproduce identical output.
///
/// # Errors
///
/// Returns an error only for inconsistent normalization parameters; an
/// empty or fully top-facing mesh yields an empty anchor set.
pub fn find_support_points(
    mesh: &Mesh,
    config: &Config,
    seed: u64,
) -> Result<SupportOutcome, SupportError> {
    let normalized = normalize_mesh(mesh, &config.normalize)?;
    let mesh = normalized.mesh;

    let normals = vertex_normals(&mesh, config.normal_strategy);

    let Some(tree) = RayTree::build(&mesh) else {
        let widths = vec![None; mesh.vertex_count()];
        return Ok(SupportOutcome {
            mesh,
            widths,
            points: Vec::new(),
        });
    };

    let positions: Vec<Point3<f64>> = mesh.vertices.iter().map(|v| v.position).collect();
    let widths = estimate_widths(&positions, &normals, &tree, &config.rays);

    let mut generator_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut accepted = generate_points(&mesh, &widths, &normals, &config.sample, &mut generator_rng);

    let mut grid = PointGrid::new(config.sample.max_radius);
    thin_points(&mut accepted, &mut grid);

    let mut tiny_rng = ChaCha8Rng::seed_from_u64(seed ^ TINY_STREAM_SALT);
    let tiny = sample_tiny_parts(&mesh, &grid, &config.sample, &mut tiny_rng);
    if !tiny.is_empty() {
        let (tiny_points, tiny_normals): (Vec<Point3<f64>>, Vec<Vector3<f64>>) =
            tiny.into_iter().unzip();
        let tiny_widths = estimate_widths(&tiny_points, &tiny_normals, &tree, &config.rays);

        let mut extra: Vec<PointRadius> = tiny_points
            .iter()
            .zip(&tiny_widths)
            .map(|(point, &width)| {
                PointRadius::new(*point, radius_for_width(width, &config.sample))
            })
            .collect();

        thin_points(&mut extra, &mut grid);
        accepted.extend(extra);
    }

    info!(
        anchors = accepted.len(),
        vertices = mesh.vertex_count(),
        "Support point analysis complete"
    );

    Ok(SupportOutcome {
        mesh,
        widths,
        points: accepted,
    })
}
