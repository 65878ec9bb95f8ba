use serde::Serialize;
use std::fmt;

use super::line::{Line3, LinearPath};
use super::point::Point3;
use super::scalar::SafeScalar;
use super::vector::Vector3;
use crate::error::GeometryError;

/// A plane through `anchor` with unit `normal`.
///
/// Equality ignores the sign of the normal: two planes are equal when their
/// normals are parallel and one anchor lies in the other plane.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Plane3 {
    anchor: Point3,
    normal: Vector3,
}

impl Plane3 {
    pub fn from_point_and_normal(anchor: Point3, normal: Vector3) -> Result<Self, GeometryError> {
        if normal.is_zero() {
            return Err(GeometryError::degenerate("plane with zero normal"));
        }
        Ok(Self {
            anchor,
            normal: normal.normalized()?,
        })
    }

    /// The plane through `anchor` spanned by `u` and `v`.
    pub fn from_point_and_vectors(
        anchor: Point3,
        u: Vector3,
        v: Vector3,
    ) -> Result<Self, GeometryError> {
        Self::from_point_and_normal(anchor, u.cross(&v))
    }

    pub fn from_points(a: Point3, b: Point3, c: Point3) -> Result<Self, GeometryError> {
        Self::from_point_and_vectors(a, b - a, c - a)
    }

    pub fn from_point_and_line(point: Point3, line: &dyn LinearPath) -> Result<Self, GeometryError> {
        let a = line.anchor();
        let b = a + line.direction();
        Self::from_point_and_vectors(point, a - point, b - point)
    }

    /// The plane containing two lines that either meet or are parallel.
    pub fn from_lines(first: &Line3, second: &Line3) -> Result<Self, GeometryError> {
        if first == second {
            return Err(GeometryError::degenerate("equal lines do not span a plane"));
        }
        if first.is_parallel(second)? {
            let across = second.anchor() - first.anchor();
            return Self::from_point_and_vectors(first.anchor(), first.direction(), across);
        }
        match first.intersection(second)? {
            Some(meet) => {
                Self::from_point_and_vectors(meet, first.direction(), second.direction())
            }
            None => Err(GeometryError::degenerate("skew lines do not span a plane")),
        }
    }

    pub fn anchor(&self) -> Point3 {
        self.anchor
    }

    /// Unit normal.
    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    pub fn dist_to_point(&self, point: &Point3) -> SafeScalar {
        (*point - self.anchor).dot(&self.normal).abs()
    }

    pub fn contains_point(&self, point: &Point3) -> bool {
        self.dist_to_point(point).is_zero()
    }

    pub fn contains_line(&self, line: &dyn LinearPath) -> bool {
        self.contains_point(&line.anchor()) && self.is_parallel_to(&line.direction()).unwrap_or(false)
    }

    pub fn cos(&self, other: &Plane3) -> SafeScalar {
        self.normal.dot(&other.normal)
    }

    pub fn is_parallel(&self, other: &Plane3) -> bool {
        self.cos(other).abs() == SafeScalar::ONE
    }

    pub fn is_perpendicular(&self, other: &Plane3) -> bool {
        self.cos(other).is_zero()
    }

    /// Whether `direction` runs parallel to the plane.
    pub fn is_parallel_to(&self, direction: &Vector3) -> Result<bool, GeometryError> {
        direction.is_perpendicular(&self.normal)
    }

    pub fn intersect_line(&self, line: &dyn LinearPath) -> Result<Option<Point3>, GeometryError> {
        line.intersect_plane(self)
    }

    /// The line shared by two non-parallel planes.
    pub fn intersect_plane(&self, other: &Plane3) -> Result<Option<Line3>, GeometryError> {
        if self.is_parallel(other) {
            if self == other {
                return Err(GeometryError::ambiguous("planes are equal"));
            }
            return Ok(None);
        }

        let direction = self.normal.cross(&other.normal);
        let dir = direction.to_array();
        let free = (0..3)
            .max_by(|&a, &b| dir[a].abs().total_cmp(&dir[b].abs()))
            .unwrap_or(2);
        // The point sits where the coordinate along `free` is zero.
        let (i, j) = match free {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };

        let n1 = self.normal.to_array();
        let n2 = other.normal.to_array();
        let d1 = self.normal.dot(&self.anchor.to_vector()).value();
        let d2 = other.normal.dot(&other.anchor.to_vector()).value();

        let det = SafeScalar::new(n1[i] * n2[j] - n1[j] * n2[i]);
        if det.is_zero() {
            return Err(GeometryError::degenerate(
                "plane equations are singular along the intersection",
            ));
        }
        let mut coords = [0.0; 3];
        coords[i] = SafeScalar::new(d1 * n2[j] - n1[j] * d2).checked_div(det)?.value();
        coords[j] = SafeScalar::new(n1[i] * d2 - d1 * n2[i]).checked_div(det)?.value();

        let point = Point3::new(coords[0], coords[1], coords[2]);
        Line3::from_point_and_vector(point, direction).map(Some)
    }
}

impl PartialEq for Plane3 {
    fn eq(&self, other: &Self) -> bool {
        self.is_parallel(other) && self.contains_point(&other.anchor)
    }
}

impl fmt::Display for Plane3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane through {} with normal {}", self.anchor, self.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn xy_plane() -> Plane3 {
        Plane3::from_point_and_normal(Point3::ORIGIN, Vector3::Z).unwrap()
    }

    #[test]
    fn test_construction_paths_agree() {
        let origin = Point3::ORIGIN;
        let x_axis = Line3::from_point_and_vector(origin, Vector3::X).unwrap();
        let y_axis = Line3::from_point_and_vector(origin, Vector3::Y).unwrap();
        let shifted_x = Line3::from_point_and_vector(Point3::new(0.0, 1.0, 0.0), Vector3::X).unwrap();

        let planes = [
            Plane3::from_point_and_normal(origin, Vector3::new(0.0, 0.0, 5.0)).unwrap(),
            Plane3::from_point_and_vectors(origin, Vector3::X, Vector3::Y).unwrap(),
            Plane3::from_points(origin, Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0))
                .unwrap(),
            Plane3::from_point_and_line(Point3::new(3.0, 3.0, 0.0), &x_axis).unwrap(),
            Plane3::from_lines(&x_axis, &y_axis).unwrap(),
            Plane3::from_lines(&x_axis, &shifted_x).unwrap(),
        ];
        for plane in planes {
            assert_eq!(plane, xy_plane(), "{plane}");
            assert_relative_eq!(plane.normal().length().value(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_construction() {
        let p = Point3::ORIGIN;
        assert!(matches!(
            Plane3::from_point_and_normal(p, Vector3::ZERO),
            Err(GeometryError::DegenerateInput { .. })
        ));
        assert!(Plane3::from_points(p, Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0)).is_err());
        assert!(Plane3::from_point_and_vectors(p, Vector3::X, Vector3::X * 2.0).is_err());

        let x_axis = Line3::from_point_and_vector(p, Vector3::X).unwrap();
        assert!(Plane3::from_point_and_line(Point3::new(9.0, 0.0, 0.0), &x_axis).is_err());
    }

    #[test]
    fn test_from_lines_rejects_equal_and_skew() {
        let x_axis = Line3::from_point_and_vector(Point3::ORIGIN, Vector3::X).unwrap();
        let same = Line3::from_point_and_vector(Point3::new(2.0, 0.0, 0.0), Vector3::X).unwrap();
        let skew = Line3::from_point_and_vector(Point3::new(0.0, 0.0, 1.0), Vector3::Y).unwrap();
        assert!(matches!(
            Plane3::from_lines(&x_axis, &same),
            Err(GeometryError::DegenerateInput { .. })
        ));
        assert!(matches!(
            Plane3::from_lines(&x_axis, &skew),
            Err(GeometryError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_equality_is_sign_independent() {
        let up = xy_plane();
        let down = Plane3::from_point_and_normal(Point3::new(4.0, -2.0, 0.0), -Vector3::Z).unwrap();
        let lifted = Plane3::from_point_and_normal(Point3::new(0.0, 0.0, 1.0), Vector3::Z).unwrap();
        assert_eq!(up, down);
        assert_ne!(up, lifted);
        assert!(up.is_parallel(&lifted));
    }

    #[test]
    fn test_distance_and_containment() {
        let plane = xy_plane();
        assert_eq!(plane.dist_to_point(&Point3::new(3.0, 4.0, -2.0)), 2.0);
        assert!(plane.contains_point(&Point3::new(10.0, -3.0, 0.0)));

        let in_plane = Line3::from_points(Point3::new(1.0, 1.0, 0.0), Point3::new(2.0, 3.0, 0.0)).unwrap();
        let crossing = Line3::from_points(Point3::new(1.0, 1.0, 0.0), Point3::new(2.0, 3.0, 1.0)).unwrap();
        assert!(plane.contains_line(&in_plane));
        assert!(!plane.contains_line(&crossing));
        assert!(plane.is_parallel_to(&Vector3::X).unwrap());
        assert!(!plane.is_parallel_to(&Vector3::Z).unwrap());
    }

    #[test]
    fn test_plane_angles() {
        let xz = Plane3::from_point_and_normal(Point3::ORIGIN, Vector3::Y).unwrap();
        assert!(xy_plane().is_perpendicular(&xz));
        assert_eq!(xy_plane().cos(&xy_plane()), 1.0);
    }

    #[test]
    fn test_plane_plane_intersection_lies_in_both() {
        let a = xy_plane();
        let b = Plane3::from_point_and_normal(Point3::ORIGIN, Vector3::X).unwrap();
        let line = a.intersect_plane(&b).unwrap().unwrap();
        assert!(a.contains_line(&line));
        assert!(b.contains_line(&line));

        let tilted = Plane3::from_point_and_normal(Point3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0))
            .unwrap();
        let high = Plane3::from_point_and_normal(Point3::new(0.0, 0.0, 2.0), Vector3::Z).unwrap();
        let line = tilted.intersect_plane(&high).unwrap().unwrap();
        assert!(tilted.contains_line(&line));
        assert!(high.contains_line(&line));
    }

    #[test]
    fn test_plane_plane_parallel_cases() {
        let a = xy_plane();
        let lifted = Plane3::from_point_and_normal(Point3::new(0.0, 0.0, 3.0), Vector3::Z).unwrap();
        assert!(a.intersect_plane(&lifted).unwrap().is_none());
        assert!(matches!(
            a.intersect_plane(&a),
            Err(GeometryError::AmbiguousIntersection { .. })
        ));
    }

    #[test]
    fn test_line_intersection_delegates_to_path() {
        let ray = crate::geometry::line::Ray3::from_point_and_vector(
            Point3::new(0.0, 0.0, 2.0),
            -Vector3::Z,
        )
        .unwrap();
        assert_eq!(xy_plane().intersect_line(&ray).unwrap(), Some(Point3::ORIGIN));
    }
}
