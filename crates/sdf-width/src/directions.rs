//! Deterministic ray-direction sets.

use nalgebra::Vector3;

/// A unit ray direction with an importance weight.
///
/// The weight is the direction's cosine with the cone axis: rays closer to
/// the axis see the opposite wall more squarely and their distances count
/// for more in the width average (the projected-area contribution of the
/// ray).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedDirection {
    /// Unit direction.
    pub direction: Vector3<f64>,
    /// Non-negative importance weight.
    pub weight: f64,
}

/// Place `count` quasi-uniform directions on the unit half-sphere around +Z
/// and keep those within a cone of `angle_degrees` around the axis.
///
/// Uses the golden-angle spiral: sample `i` sits at height
/// `z = 1 - (i + 0.5) / count` with azimuth `i` golden angles, which
/// distributes points evenly over the cap without any randomness. Identical
/// inputs always produce identical, identically-ordered output.
///
/// Each surviving direction is weighted by its cosine with +Z. A `count` of
/// zero or a non-positive cone angle yields an empty set; an angle of 90° or
/// more keeps the entire half-sphere.
///
/// # Example
///
/// ```
/// use sdf_width::cone_directions;
///
/// let dirs = cone_directions(60.0, 64);
/// assert!(!dirs.is_empty());
/// let cos_60 = 60.0_f64.to_radians().cos();
/// for d in &dirs {
///     assert!((d.direction.norm() - 1.0).abs() < 1e-12);
///     assert!(d.direction.z >= cos_60 - 1e-12);
///     assert!((d.weight - d.direction.z).abs() < 1e-12);
/// }
/// ```
#[must_use]
pub fn cone_directions(angle_degrees: f64, count: usize) -> Vec<WeightedDirection> {
    if count == 0 || angle_degrees <= 0.0 {
        return Vec::new();
    }

    // Golden angle in radians
    let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    let min_z = angle_degrees.to_radians().cos();

    let mut directions = Vec::with_capacity(count);
    for i in 0..count {
        #[allow(clippy::cast_precision_loss)]
        let z = 1.0 - (i as f64 + 0.5) / count as f64;
        if z < min_z {
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        let azimuth = golden_angle * i as f64;
        let planar = (1.0 - z * z).sqrt();

        directions.push(WeightedDirection {
            direction: Vector3::new(planar * azimuth.cos(), planar * azimuth.sin(), z),
            weight: z,
        });
    }

    directions
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_count_is_empty() {
        assert!(cone_directions(120.0, 0).is_empty());
    }

    #[test]
    fn nonpositive_angle_is_empty() {
        assert!(cone_directions(0.0, 60).is_empty());
        assert!(cone_directions(-30.0, 60).is_empty());
    }

    #[test]
    fn directions_are_unit_length() {
        for d in cone_directions(120.0, 60) {
            assert_relative_eq!(d.direction.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn polar_angle_respects_cone() {
        let angle: f64 = 45.0;
        let min_z = angle.to_radians().cos();
        let dirs = cone_directions(angle, 128);
        assert!(!dirs.is_empty());
        for d in dirs {
            assert!(d.direction.z >= min_z - 1e-12);
        }
    }

    #[test]
    fn wide_cone_keeps_whole_half_sphere() {
        // 120 degrees covers every polar angle of the half-sphere
        assert_eq!(cone_directions(120.0, 60).len(), 60);
        assert_eq!(cone_directions(90.0, 60).len(), 60);
    }

    #[test]
    fn weights_grow_toward_the_axis() {
        let dirs = cone_directions(120.0, 60);
        for d in &dirs {
            assert!(d.weight >= 0.0);
            assert_relative_eq!(d.weight, d.direction.z, epsilon = 1e-12);
        }
        // The spiral walks from the pole outward, so weights are decreasing
        for pair in dirs.windows(2) {
            assert!(pair[0].weight > pair[1].weight);
        }
    }

    #[test]
    fn output_is_bit_identical_across_calls() {
        let a = cone_directions(75.0, 97);
        let b = cone_directions(75.0, 97);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.direction, y.direction);
            assert!((x.weight - y.weight).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn narrow_cone_is_a_subset_of_the_spiral() {
        let narrow = cone_directions(30.0, 100);
        let wide = cone_directions(120.0, 100);
        assert!(narrow.len() < wide.len());
        // The narrow set is exactly the head of the wide spiral
        for (n, w) in narrow.iter().zip(&wide) {
            assert_eq!(n.direction, w.direction);
        }
    }
}
