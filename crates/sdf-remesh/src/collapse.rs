//! Quadric-bounded collapse of under-short edges.

// Mesh processing uses u32 indices throughout
#![allow(clippy::cast_possible_truncation)]

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use sdf_types::{Mesh, Vertex};
use tracing::debug;

use crate::error::{RemeshError, RemeshResult};
use crate::quadric::Quadric;

/// An edge collapse candidate in the priority queue.
#[derive(Debug, Clone)]
struct Candidate {
    v1: u32,
    v2: u32,
    cost: f64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (smaller cost = higher priority)
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Collapse every edge shorter than `min_length` whose quadric error stays
/// within `max_error`.
///
/// Cheapest collapses run first. The merged vertex is placed at the combined
/// quadric's optimal point (edge midpoint when the system is singular, e.g.
/// on flat patches). A collapse is rejected when its error exceeds the budget
/// or when it would pinch the surface into a non-manifold configuration.
/// Faces that degenerate during a collapse are removed. The loop runs until
/// no admissible collapse remains.
///
/// An empty mesh passes through unchanged.
///
/// # Errors
///
/// Returns an error if `min_length` or `max_error` is not positive and
/// finite.
///
/// # Example
///
/// ```
/// use sdf_remesh::{split_long_edges, merge_short_edges};
/// use sdf_types::unit_cube;
///
/// // Refine, then undo the refinement within a generous error budget
/// let fine = split_long_edges(&unit_cube(), 0.6)?;
/// let coarse = merge_short_edges(&fine, 0.6, 1.0)?;
/// assert!(coarse.face_count() < fine.face_count());
/// # Ok::<(), sdf_remesh::RemeshError>(())
/// ```
#[allow(clippy::too_many_lines)]
pub fn merge_short_edges(mesh: &Mesh, min_length: f64, max_error: f64) -> RemeshResult<Mesh> {
    if !(min_length.is_finite() && min_length > 0.0) {
        return Err(RemeshError::InvalidMinLength(min_length));
    }
    if !(max_error.is_finite() && max_error > 0.0) {
        return Err(RemeshError::InvalidMaxError(max_error));
    }
    if mesh.is_empty() {
        return Ok(mesh.clone());
    }

    let mut positions: Vec<Option<Point3<f64>>> =
        mesh.vertices.iter().map(|v| Some(v.position)).collect();
    let mut faces: Vec<Option<[u32; 3]>> = mesh.faces.iter().copied().map(Some).collect();

    // Accumulate one quadric per vertex from incident face planes
    let mut quadrics: Vec<Quadric> = vec![Quadric::default(); positions.len()];
    for (face, tri) in mesh.faces.iter().zip(mesh.triangles()) {
        if let Some(normal) = tri.normal() {
            let plane = Quadric::from_point_normal(&tri.v0, &normal);
            for &v in face {
                quadrics[v as usize].add(&plane);
            }
        }
    }

    // Seed the queue with every unique under-short edge
    let mut heap = BinaryHeap::new();
    let mut seeded: HashSet<(u32, u32)> = HashSet::new();
    for face in &mesh.faces {
        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            let edge = if a <= b { (a, b) } else { (b, a) };
            if seeded.insert(edge) {
                push_candidate(&mut heap, edge.0, edge.1, &positions, &quadrics, min_length);
            }
        }
    }

    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut collapses = 0usize;
    let mut rejected = 0usize;

    while let Some(candidate) = heap.pop() {
        let v1 = resolve(candidate.v1, &remap);
        let v2 = resolve(candidate.v2, &remap);

        if v1 == v2 {
            continue;
        }
        let (Some(p1), Some(p2)) = (positions[v1 as usize], positions[v2 as usize]) else {
            continue;
        };

        // Stale candidate: the edge grew past the threshold through remaps
        if (p2 - p1).norm() >= min_length {
            continue;
        }

        // Re-evaluate against current quadrics; the queued cost may be stale
        let mut combined = quadrics[v1 as usize];
        combined.add(&quadrics[v2 as usize]);
        let target = combined
            .optimal_point()
            .unwrap_or_else(|| Point3::from((p1.coords + p2.coords) * 0.5));
        let cost = combined.evaluate(&target);

        if cost > max_error {
            rejected += 1;
            continue;
        }

        if !collapse_is_valid(v1, v2, &target, &positions, &faces, &remap) {
            rejected += 1;
            continue;
        }

        // Merge v2 into v1 at the optimal position
        positions[v1 as usize] = Some(target);
        positions[v2 as usize] = None;
        quadrics[v1 as usize] = combined;
        remap.insert(v2, v1);

        // Rewrite faces, dropping the ones the collapse degenerates
        for face_opt in &mut faces {
            if let Some(face) = face_opt {
                for idx in face.iter_mut() {
                    *idx = resolve(*idx, &remap);
                }
                if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                    *face_opt = None;
                }
            }
        }

        collapses += 1;

        // Surviving edges around the merged vertex may now be collapsible
        for face in faces.iter().flatten() {
            if face.contains(&v1) {
                for &u in face {
                    if u != v1 {
                        push_candidate(&mut heap, v1, u, &positions, &quadrics, min_length);
                    }
                }
            }
        }
    }

    debug!(collapses, rejected, "Short-edge merging finished");

    Ok(rebuild(&positions, &faces))
}

/// Queue the edge if it is currently alive and under-short.
fn push_candidate(
    heap: &mut BinaryHeap<Candidate>,
    v1: u32,
    v2: u32,
    positions: &[Option<Point3<f64>>],
    quadrics: &[Quadric],
    min_length: f64,
) {
    let (Some(p1), Some(p2)) = (positions[v1 as usize], positions[v2 as usize]) else {
        return;
    };
    if (p2 - p1).norm() >= min_length {
        return;
    }

    let mut combined = quadrics[v1 as usize];
    combined.add(&quadrics[v2 as usize]);
    let target = combined
        .optimal_point()
        .unwrap_or_else(|| Point3::from((p1.coords + p2.coords) * 0.5));

    heap.push(Candidate {
        v1,
        v2,
        cost: combined.evaluate(&target),
    });
}

/// Follow the remap chain to the surviving vertex.
fn resolve(mut v: u32, remap: &HashMap<u32, u32>) -> u32 {
    while let Some(&next) = remap.get(&v) {
        v = next;
    }
    v
}

/// Check that merging `v2` into `v1` at `target` leaves a clean surface.
///
/// Rejects collapses that would pinch the surface into a non-manifold
/// configuration (link condition: the endpoints may share at most the two
/// apex neighbors of the collapsing edge), and collapses whose surviving
/// faces would become geometrically degenerate or flip their normals.
fn collapse_is_valid(
    v1: u32,
    v2: u32,
    target: &Point3<f64>,
    positions: &[Option<Point3<f64>>],
    faces: &[Option<[u32; 3]>],
    remap: &HashMap<u32, u32>,
) -> bool {
    let mut n1: HashSet<u32> = HashSet::new();
    let mut n2: HashSet<u32> = HashSet::new();

    for face in faces.iter().flatten() {
        let resolved = face.map(|v| resolve(v, remap));
        let touches_v1 = resolved.contains(&v1);
        let touches_v2 = resolved.contains(&v2);

        if touches_v1 {
            n1.extend(resolved.iter().filter(|&&v| v != v1));
        }
        if touches_v2 {
            n2.extend(resolved.iter().filter(|&&v| v != v2));
        }
        if !touches_v1 && !touches_v2 {
            continue;
        }

        // Faces spanning the collapsing edge disappear; the rest must stay
        // well-shaped and keep their orientation after the move.
        let merged = resolved.map(|v| if v == v2 { v1 } else { v });
        if merged[0] == merged[1] || merged[1] == merged[2] || merged[0] == merged[2] {
            continue;
        }

        let corner = |v: u32| -> Option<Point3<f64>> {
            if v == v1 {
                Some(*target)
            } else {
                positions[v as usize]
            }
        };
        let (Some(a), Some(b), Some(c)) = (corner(merged[0]), corner(merged[1]), corner(merged[2]))
        else {
            return false;
        };
        let after = sdf_types::Triangle::new(a, b, c);
        let Some(normal_after) = after.normal() else {
            return false;
        };

        let before = sdf_types::Triangle::new(
            match positions[resolved[0] as usize] {
                Some(p) => p,
                None => return false,
            },
            match positions[resolved[1] as usize] {
                Some(p) => p,
                None => return false,
            },
            match positions[resolved[2] as usize] {
                Some(p) => p,
                None => return false,
            },
        );
        if let Some(normal_before) = before.normal() {
            if normal_before.dot(&normal_after) < 0.0 {
                return false;
            }
        }
    }

    n1.intersection(&n2).count() <= 2
}

/// Compact the surviving vertices and faces into a fresh mesh.
fn rebuild(positions: &[Option<Point3<f64>>], faces: &[Option<[u32; 3]>]) -> Mesh {
    let mut index_map: HashMap<u32, u32> = HashMap::new();
    let mut vertices = Vec::new();

    for (old, position) in positions.iter().enumerate() {
        if let Some(p) = position {
            index_map.insert(old as u32, vertices.len() as u32);
            vertices.push(Vertex::new(*p));
        }
    }

    let new_faces = faces
        .iter()
        .flatten()
        .map(|face| face.map(|v| index_map[&v]))
        .collect();

    Mesh::from_parts(vertices, new_faces)
}
