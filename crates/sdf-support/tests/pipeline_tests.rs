//! End-to-end tests for the support-seeding pipeline.

use sdf_support::{find_support_points, Config, SampleConfig};
use sdf_types::{square_plate, unit_cube, Mesh, Vertex};
use sdf_width::RaysConfig;

/// A closed box with a hollow cavity: outer shell `size` on a side, walls
/// `wall` thick. Inner faces are wound toward the cavity.
fn thin_walled_box(size: f64, wall: f64) -> Mesh {
    let mut mesh = Mesh::new();

    let outer = [
        (0.0, 0.0, 0.0),
        (size, 0.0, 0.0),
        (size, size, 0.0),
        (0.0, size, 0.0),
        (0.0, 0.0, size),
        (size, 0.0, size),
        (size, size, size),
        (0.0, size, size),
    ];
    let inner = [
        (wall, wall, wall),
        (size - wall, wall, wall),
        (size - wall, size - wall, wall),
        (wall, size - wall, wall),
        (wall, wall, size - wall),
        (size - wall, wall, size - wall),
        (size - wall, size - wall, size - wall),
        (wall, size - wall, size - wall),
    ];

    for (x, y, z) in outer {
        mesh.vertices.push(Vertex::from_coords(x, y, z));
    }
    for (x, y, z) in inner {
        mesh.vertices.push(Vertex::from_coords(x, y, z));
    }

    // Outer shell, CCW viewed from outside
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]); // bottom
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]); // top
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]); // front
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]); // back
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]); // left
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]); // right

    // Inner shell, reversed winding so normals face the cavity
    mesh.faces.push([8, 9, 10]);
    mesh.faces.push([8, 10, 11]); // bottom inner
    mesh.faces.push([12, 14, 13]);
    mesh.faces.push([12, 15, 14]); // top inner
    mesh.faces.push([8, 13, 9]);
    mesh.faces.push([8, 12, 13]); // front inner
    mesh.faces.push([11, 14, 15]);
    mesh.faces.push([11, 10, 14]); // back inner
    mesh.faces.push([8, 11, 15]);
    mesh.faces.push([8, 15, 12]); // left inner
    mesh.faces.push([9, 13, 14]);
    mesh.faces.push([9, 14, 10]); // right inner

    mesh
}

#[test]
fn empty_mesh_yields_empty_outcome() {
    let outcome = find_support_points(&Mesh::new(), &Config::default(), 1).unwrap();
    assert!(outcome.points.is_empty());
    assert!(outcome.widths.is_empty());
}

#[test]
fn flat_top_facing_plate_gets_no_supports() {
    // Every normal points up and normal_z_max = 0.3 excludes it all
    let plate = square_plate(2.0);
    let outcome = find_support_points(&plate, &Config::default(), 7).unwrap();

    assert!(outcome.points.is_empty());
    assert_eq!(outcome.widths.len(), outcome.mesh.vertex_count());
    assert!(outcome.widths.iter().all(Option::is_none));
}

#[test]
fn thin_walled_box_gets_thin_widths_and_small_radii() {
    let mesh = thin_walled_box(8.0, 0.5);
    let config = Config::default();
    let outcome = find_support_points(&mesh, &config, 42).unwrap();

    // Wall vertices measure roughly the wall thickness
    let measured: Vec<f64> = outcome.widths.iter().copied().flatten().collect();
    assert!(!measured.is_empty());
    // The wide default cone averages slanted exit distances on top of the
    // 0.5 plate thickness, so "near the wall" is a band, not a spike
    let near_wall = measured
        .iter()
        .filter(|&&w| (0.3..=2.0).contains(&w))
        .count();
    assert!(
        near_wall * 2 > measured.len(),
        "expected most widths near the 0.5 wall, got {near_wall}/{}",
        measured.len()
    );

    // Thin walls map to the low end of the radius range
    assert!(!outcome.points.is_empty());
    let mut radii: Vec<f64> = outcome.points.iter().map(|p| p.radius).collect();
    radii.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median = radii[radii.len() / 2];
    assert!(
        median < 3.5,
        "median radius {median} should sit near min_radius {}",
        config.sample.min_radius
    );
    assert!(radii[0] < 2.5);
}

#[test]
fn surviving_anchors_respect_the_separation_invariant() {
    let mesh = thin_walled_box(8.0, 0.5);
    let outcome = find_support_points(&mesh, &Config::default(), 5).unwrap();

    assert!(!outcome.points.is_empty());
    for (i, a) in outcome.points.iter().enumerate() {
        for b in &outcome.points[i + 1..] {
            let distance = (a.point - b.point).norm();
            assert!(
                distance >= a.radius + b.radius - 1e-9,
                "anchors too close: {distance} < {} + {}",
                a.radius,
                b.radius
            );
        }
    }
}

#[test]
fn runs_are_reproducible_for_a_fixed_seed() {
    let mut cube = unit_cube();
    for v in &mut cube.vertices {
        v.position.coords *= 3.0;
    }

    let config = Config::default();
    let a = find_support_points(&cube, &config, 1234).unwrap();
    let b = find_support_points(&cube, &config, 1234).unwrap();

    assert_eq!(a.widths, b.widths);
    assert_eq!(a.points, b.points);
}

#[test]
fn widths_align_with_the_normalized_mesh() {
    let mesh = thin_walled_box(6.0, 0.5);
    let outcome = find_support_points(&mesh, &Config::default(), 9).unwrap();

    assert_eq!(outcome.widths.len(), outcome.mesh.vertex_count());
    // Normalization refines the coarse input box
    assert!(outcome.mesh.vertex_count() > mesh.vertex_count());
}

#[test]
fn tolerant_config_still_supports_vertical_walls() {
    // Raising both top-surface thresholds together stays valid and keeps
    // vertical walls (normal z = 0) supported
    let rays = RaysConfig {
        normal_z_max: 0.5,
        ..RaysConfig::default()
    };
    let sample = SampleConfig {
        normal_z_max: 0.5,
        ..SampleConfig::default()
    };
    let config = Config::new(
        rays,
        sample,
        sdf_remesh::NormalizeParams::default(),
        sdf_types::NormalStrategy::default(),
    )
    .unwrap();

    let mesh = thin_walled_box(8.0, 0.5);
    let outcome = find_support_points(&mesh, &config, 3).unwrap();
    assert!(!outcome.points.is_empty());
}
