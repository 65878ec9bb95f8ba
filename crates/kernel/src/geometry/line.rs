use serde::Serialize;
use std::fmt;

use super::plane::Plane3;
use super::point::Point3;
use super::scalar::SafeScalar;
use super::vector::Vector3;
use crate::default_tolerance;
use crate::error::GeometryError;

/// Anything with an anchor and a direction that can be intersected with a plane.
///
/// Implemented by [`Line3`] (unbounded in both directions) and [`Ray3`]
/// (bounded at its origin). Containment and plane intersection dispatch on the
/// concrete kind, so a ray never reports a hit behind its origin.
pub trait LinearPath {
    /// The infinite carrying line.
    fn line(&self) -> &Line3;

    fn anchor(&self) -> Point3 {
        self.line().anchor
    }

    fn direction(&self) -> Vector3 {
        self.line().direction
    }

    fn dist_to_point(&self, point: &Point3) -> SafeScalar;

    fn contains_point(&self, point: &Point3) -> bool {
        self.dist_to_point(point).is_zero()
    }

    /// The unique point where this path meets `plane`.
    ///
    /// `Ok(None)` when the path is parallel to the plane or misses it;
    /// `AmbiguousIntersection` when the path lies in the plane.
    fn intersect_plane(&self, plane: &Plane3) -> Result<Option<Point3>, GeometryError>;

    fn cos(&self, other: &dyn LinearPath) -> Result<SafeScalar, GeometryError> {
        self.direction().cos(&other.direction())
    }

    fn is_parallel(&self, other: &dyn LinearPath) -> Result<bool, GeometryError> {
        self.direction().is_parallel(&other.direction())
    }

    fn is_perpendicular(&self, other: &dyn LinearPath) -> Result<bool, GeometryError> {
        self.direction().is_perpendicular(&other.direction())
    }
}

/// The infinite line `anchor + t * direction`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Line3 {
    anchor: Point3,
    direction: Vector3,
}

impl Line3 {
    pub fn from_points(start: Point3, end: Point3) -> Result<Self, GeometryError> {
        if start == end {
            return Err(GeometryError::degenerate(
                "line through two coincident points",
            ));
        }
        Ok(Self {
            anchor: start,
            direction: end - start,
        })
    }

    pub fn from_point_and_vector(anchor: Point3, direction: Vector3) -> Result<Self, GeometryError> {
        if direction.is_zero() {
            return Err(GeometryError::degenerate("line with zero direction"));
        }
        Ok(Self { anchor, direction })
    }

    pub fn anchor(&self) -> Point3 {
        self.anchor
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    pub fn point_at(&self, t: impl Into<SafeScalar>) -> Point3 {
        self.anchor + self.direction * t.into()
    }

    /// Intersection point of two lines.
    ///
    /// The parameters are solved in the coordinate-plane minor with the largest
    /// determinant, then the candidate is checked against both lines in 3D so
    /// skew lines return `None`.
    pub fn intersection(&self, other: &Line3) -> Result<Option<Point3>, GeometryError> {
        if self == other {
            return Err(GeometryError::ambiguous("lines are equal"));
        }

        let v1 = self.direction.to_array();
        let v2 = other.direction.to_array();
        let d = (other.anchor - self.anchor).to_array();

        // Solve t*v1 - s*v2 = d restricted to axes (i, j).
        let (det, i, j) = [(0, 1), (0, 2), (1, 2)]
            .into_iter()
            .map(|(i, j)| (v2[i] * v1[j] - v1[i] * v2[j], i, j))
            .max_by(|a, b| a.0.abs().total_cmp(&b.0.abs()))
            .unwrap_or((0.0, 0, 1));
        let det = SafeScalar::new(det);
        if det.is_zero() {
            return Ok(None);
        }

        let t = SafeScalar::new(v2[i] * d[j] - d[i] * v2[j]).checked_div(det)?;
        let candidate = self.point_at(t);

        let slack = SafeScalar::new(default_tolerance().intersection_slack);
        let on_self = self.dist_to_point(&candidate) <= slack;
        let on_other = other.dist_to_point(&candidate) <= slack;
        if on_self && on_other {
            Ok(Some(candidate))
        } else {
            Ok(None)
        }
    }
}

impl LinearPath for Line3 {
    fn line(&self) -> &Line3 {
        self
    }

    fn dist_to_point(&self, point: &Point3) -> SafeScalar {
        let ap = *point - self.anchor;
        (ap - ap.project_to(&self.direction)).length()
    }

    fn intersect_plane(&self, plane: &Plane3) -> Result<Option<Point3>, GeometryError> {
        let normal = plane.normal();
        if self.direction.is_perpendicular(&normal)? {
            if plane.contains_point(&self.anchor) {
                return Err(GeometryError::ambiguous("line lies in the plane"));
            }
            return Ok(None);
        }
        let t = (plane.anchor() - self.anchor)
            .dot(&normal)
            .checked_div(self.direction.dot(&normal))?;
        Ok(Some(self.point_at(t)))
    }
}

impl PartialEq for Line3 {
    fn eq(&self, other: &Self) -> bool {
        self.direction
            .is_parallel(&other.direction)
            .unwrap_or(false)
            && self.contains_point(&other.anchor)
    }
}

impl fmt::Display for Line3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} + t{}", self.anchor, self.direction)
    }
}

/// A half-line `origin + t * direction` with `t >= 0`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ray3 {
    line: Line3,
}

impl Ray3 {
    pub fn from_points(origin: Point3, through: Point3) -> Result<Self, GeometryError> {
        Ok(Self {
            line: Line3::from_points(origin, through)?,
        })
    }

    pub fn from_point_and_vector(origin: Point3, direction: Vector3) -> Result<Self, GeometryError> {
        Ok(Self {
            line: Line3::from_point_and_vector(origin, direction)?,
        })
    }

    pub fn origin(&self) -> Point3 {
        self.line.anchor
    }

    pub fn direction(&self) -> Vector3 {
        self.line.direction
    }

    /// Intersection of the carrying line with `other`.
    pub fn intersection(&self, other: &Line3) -> Result<Option<Point3>, GeometryError> {
        self.line.intersection(other)
    }
}

impl LinearPath for Ray3 {
    fn line(&self) -> &Line3 {
        &self.line
    }

    fn dist_to_point(&self, point: &Point3) -> SafeScalar {
        let origin = self.line.anchor;
        if *point == origin {
            return SafeScalar::ZERO;
        }
        match (*point - origin).cos(&self.line.direction) {
            Ok(cos) if cos >= SafeScalar::ZERO => self.line.dist_to_point(point),
            _ => point.dist_to_point(&origin),
        }
    }

    fn intersect_plane(&self, plane: &Plane3) -> Result<Option<Point3>, GeometryError> {
        let hit = self.line.intersect_plane(plane)?;
        Ok(hit.filter(|p| self.contains_point(p)))
    }
}

impl PartialEq for Ray3 {
    fn eq(&self, other: &Self) -> bool {
        self.origin() == other.origin()
            && self
                .direction()
                .cos(&other.direction())
                .is_ok_and(|cos| cos == SafeScalar::ONE)
    }
}

impl fmt::Display for Ray3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ray {} + t{}, t >= 0", self.line.anchor, self.line.direction)
    }
}
