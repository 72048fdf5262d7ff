use nalgebra::{Matrix3, Point3, Vector3};

const DEGENERATE_NORM: f64 = 1e-12;

#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Angle in degrees between two vectors, `None` if either has zero length.
pub fn vector_angle(u: &Vector3<f64>, v: &Vector3<f64>) -> Option<f64> {
    let norms = u.norm() * v.norm();
    if norms < DEGENERATE_NORM {
        return None;
    }
    let cos = (u.dot(v) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle in degrees at `vertex` formed by the rays towards `a` and `b`.
pub fn angle_at(vertex: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> Option<f64> {
    vector_angle(&(a - vertex), &(b - vertex))
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Normal of the plane spanned by the centroid and the first two ring atoms.
///
/// The orientation of the normal follows the ordering of the ring atoms, so
/// comparisons against it should go through [`angle_between_limits`] with
/// `ring = true`.
pub fn ring_normal(centroid: &Point3<f64>, ring: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let (a, b) = match ring {
        [a, b, ..] => (a, b),
        _ => return None,
    };
    let normal = (a - centroid).cross(&(b - centroid));
    (normal.norm() > DEGENERATE_NORM).then_some(normal)
}

/// Checks `min <= angle <= max`. When `ring` is set, obtuse angles are first
/// mirrored to `180 - angle`, since a ring normal has no preferred direction.
pub fn angle_between_limits(angle: f64, min: f64, max: f64, ring: bool) -> bool {
    let angle = if ring && angle > 90.0 {
        180.0 - angle
    } else {
        angle
    };
    (min..=max).contains(&angle)
}

/// Projection of `plane_centroid` onto the line where two planes intersect.
///
/// Returns `None` for parallel planes.
pub fn plane_intersection_point(
    plane_normal: &Vector3<f64>,
    plane_centroid: &Point3<f64>,
    tilted_normal: &Vector3<f64>,
    tilted_centroid: &Point3<f64>,
) -> Option<Point3<f64>> {
    let direction = plane_normal.cross(tilted_normal);
    if direction.norm() < DEGENERATE_NORM {
        return None;
    }
    let system = Matrix3::from_rows(&[
        plane_normal.transpose(),
        tilted_normal.transpose(),
        direction.transpose(),
    ]);
    let offsets = Vector3::new(
        plane_normal.dot(&plane_centroid.coords),
        tilted_normal.dot(&tilted_centroid.coords),
        0.0,
    );
    let point = Point3::from(system.lu().solve(&offsets)?);

    let unit = direction.normalize();
    let scalar_projection = unit.dot(&(plane_centroid - point));
    Some(point + unit * scalar_projection)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn hexagon(center: Point3<f64>, u: Vector3<f64>, v: Vector3<f64>) -> Vec<Point3<f64>> {
        (0..6)
            .map(|k| {
                let theta = (60.0 * k as f64).to_radians();
                center + u * (1.39 * theta.cos()) + v * (1.39 * theta.sin())
            })
            .collect()
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 2.0, 2.0);
        assert!(f64_approx_equal(distance(&a, &b), 3.0));
    }

    #[test]
    fn angle_at_right_angle_returns_ninety_degrees() {
        let vertex = Point3::origin();
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 3.0, 0.0);
        assert!(f64_approx_equal(angle_at(&vertex, &a, &b).unwrap(), 90.0));
    }

    #[test]
    fn angle_at_collinear_points_returns_straight_angle() {
        let vertex = Point3::origin();
        let a = Point3::new(-1.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        assert!(f64_approx_equal(angle_at(&vertex, &a, &b).unwrap(), 180.0));
    }

    #[test]
    fn vector_angle_with_zero_vector_is_none() {
        assert!(vector_angle(&Vector3::zeros(), &Vector3::x()).is_none());
    }

    #[test]
    fn centroid_of_empty_slice_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn centroid_of_hexagon_is_its_center() {
        let center = Point3::new(1.0, -2.0, 3.0);
        let ring = hexagon(center, Vector3::x(), Vector3::y());
        let c = centroid(&ring).unwrap();
        assert!((c - center).norm() < TOLERANCE);
    }

    #[test]
    fn ring_normal_is_perpendicular_to_ring_plane() {
        let ring = hexagon(Point3::origin(), Vector3::x(), Vector3::y());
        let normal = ring_normal(&Point3::origin(), &ring).unwrap();
        let angle = vector_angle(&normal, &Vector3::z()).unwrap();
        assert!(angle_between_limits(angle, 0.0, 1e-6, true));
    }

    #[test]
    fn ring_normal_needs_two_atoms() {
        assert!(ring_normal(&Point3::origin(), &[Point3::new(1.0, 0.0, 0.0)]).is_none());
    }

    #[test]
    fn angle_between_limits_mirrors_obtuse_angles_for_rings() {
        assert!(angle_between_limits(170.0, 0.0, 30.0, true));
        assert!(!angle_between_limits(170.0, 0.0, 30.0, false));
        assert!(angle_between_limits(90.0, 50.0, 90.0, true));
        assert!(!angle_between_limits(45.0, 50.0, 90.0, true));
    }

    #[test]
    fn plane_intersection_point_of_perpendicular_planes_lies_on_both() {
        // z = 0 plane and y = 0 plane intersect along the x axis.
        let point = plane_intersection_point(
            &Vector3::z(),
            &Point3::new(0.5, 0.0, 0.0),
            &Vector3::y(),
            &Point3::new(0.0, 0.0, 5.0),
        )
        .unwrap();
        assert!((point - Point3::new(0.5, 0.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn plane_intersection_point_of_parallel_planes_is_none() {
        let point = plane_intersection_point(
            &Vector3::z(),
            &Point3::origin(),
            &Vector3::z(),
            &Point3::new(0.0, 0.0, 3.5),
        );
        assert!(point.is_none());
    }
}
