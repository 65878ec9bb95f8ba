//! Convex planar polygons and their staged construction.
//!
//! A [`Polygon`] is built from an unordered point set by a pipeline of
//! fallible steps on [`PolygonBuilder`]. Each step consumes the builder and
//! returns it in the next stage, so a stage can only be reached in order:
//!
//! ```text
//! from_points -> fit_plane -> check_coplanar -> sort_by_polar_angle
//!             -> remove_collinear -> finish
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use tracing::{debug, trace};

use super::edge::Edge;
use crate::error::GeometryError;
use crate::geometry::angle::Angle;
use crate::geometry::line::{Line3, LinearPath};
use crate::geometry::plane::Plane3;
use crate::geometry::point::Point3;
use crate::geometry::scalar::SafeScalar;
use crate::geometry::vector::Vector3;
use crate::traits::Hit;

/// Where a point lies relative to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Containment {
    Outside,
    Inside,
    OnBoundary,
}

/// Points collapsed to a distinct set and sorted canonically.
#[derive(Debug)]
pub struct Distinct;

/// A carrying plane has been fitted through the points.
#[derive(Debug)]
pub struct Fitted {
    plane: Plane3,
}

/// Every point lies on the carrying plane.
#[derive(Debug)]
pub struct Coplanar {
    plane: Plane3,
}

/// Points are ordered by polar angle around their centroid.
#[derive(Debug)]
pub struct Ordered {
    plane: Plane3,
}

/// No three consecutive points are collinear.
#[derive(Debug)]
pub struct Reduced {
    plane: Plane3,
}

/// Staged polygon construction; `S` is the stage reached so far.
#[derive(Debug)]
pub struct PolygonBuilder<S> {
    points: Vec<Point3>,
    stage: S,
}

impl<S> PolygonBuilder<S> {
    pub fn points(&self) -> &[Point3] {
        &self.points
    }
}

impl PolygonBuilder<Distinct> {
    /// Collapse tolerant duplicates and require at least three distinct points.
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Result<Self, GeometryError> {
        let mut distinct: Vec<Point3> = Vec::new();
        for point in points {
            if !distinct.contains(&point) {
                distinct.push(point);
            }
        }
        if distinct.len() < 3 {
            return Err(GeometryError::degenerate(
                "polygon needs at least three distinct points",
            ));
        }
        distinct.sort_by(Point3::canonical_cmp);
        Ok(Self {
            points: distinct,
            stage: Distinct,
        })
    }

    /// Fit the plane through the first two points and the first point off their line.
    pub fn fit_plane(self) -> Result<PolygonBuilder<Fitted>, GeometryError> {
        let (a, b) = (self.points[0], self.points[1]);
        let base = Line3::from_points(a, b)?;
        let c = self
            .points
            .iter()
            .skip(2)
            .find(|p| !base.contains_point(p))
            .copied()
            .ok_or(GeometryError::degenerate("polygon points are collinear"))?;
        let plane = Plane3::from_points(a, b, c)?;
        Ok(PolygonBuilder {
            points: self.points,
            stage: Fitted { plane },
        })
    }
}

impl PolygonBuilder<Fitted> {
    pub fn plane(&self) -> &Plane3 {
        &self.stage.plane
    }

    pub fn check_coplanar(self) -> Result<PolygonBuilder<Coplanar>, GeometryError> {
        let plane = self.stage.plane;
        if !self.points.iter().all(|p| plane.contains_point(p)) {
            return Err(GeometryError::degenerate("polygon points are not coplanar"));
        }
        Ok(PolygonBuilder {
            points: self.points,
            stage: Coplanar { plane },
        })
    }
}

impl PolygonBuilder<Coplanar> {
    /// Order the points by `atan2` of their centroid-relative in-plane coordinates.
    pub fn sort_by_polar_angle(self) -> Result<PolygonBuilder<Ordered>, GeometryError> {
        let plane = self.stage.plane;
        let mut points = self.points;

        let sum = points
            .iter()
            .fold(Vector3::ZERO, |acc, p| acc + p.to_vector());
        let centroid = Point3::ORIGIN + sum.checked_div(points.len() as f64)?;
        if points.iter().any(|p| *p == centroid) {
            debug!(%centroid, "polygon vertex coincides with its centroid");
            return Err(GeometryError::degenerate(
                "polygon vertex coincides with its centroid",
            ));
        }

        let x_axis = (points[0] - centroid).normalized()?;
        let y_axis = x_axis.cross(&plane.normal()).normalized()?;
        let polar = |p: &Point3| {
            let rel = *p - centroid;
            rel.dot(&y_axis).value().atan2(rel.dot(&x_axis).value())
        };
        points.sort_by(|a, b| polar(a).total_cmp(&polar(b)));

        Ok(PolygonBuilder {
            points,
            stage: Ordered { plane },
        })
    }
}

impl PolygonBuilder<Ordered> {
    /// Drop every vertex whose incoming and outgoing edges are parallel.
    pub fn remove_collinear(self) -> Result<PolygonBuilder<Reduced>, GeometryError> {
        let plane = self.stage.plane;
        let mut points = self.points;

        while points.len() >= 3 {
            let n = points.len();
            let mut redundant = None;
            for i in 0..n {
                let incoming = points[i] - points[(i + n - 1) % n];
                let outgoing = points[(i + 1) % n] - points[i];
                if incoming.is_parallel(&outgoing)? {
                    redundant = Some(i);
                    break;
                }
            }
            match redundant {
                Some(i) => {
                    points.remove(i);
                }
                None => break,
            }
        }

        if points.len() < 3 {
            return Err(GeometryError::degenerate(
                "fewer than three non-collinear vertices remain",
            ));
        }
        Ok(PolygonBuilder {
            points,
            stage: Reduced { plane },
        })
    }
}

impl PolygonBuilder<Reduced> {
    /// Check convexity and record whether the polygon is equilateral and equiangular.
    pub fn finish(self) -> Result<Polygon, GeometryError> {
        let plane = self.stage.plane;
        let points = self.points;
        let n = points.len();
        let normal = plane.normal();
        let regular_cos = Angle::from_degrees(360.0 / n as f64).cos();
        let first_length = points[0].dist_to_point(&points[1]);

        let mut orientation = None;
        let mut edges_equal = true;
        let mut angles_equal = true;
        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            let lhs = points[i] - prev;
            let rhs = next - points[i];

            let turn = lhs.cross(&rhs).dot(&normal);
            let positive = if turn > SafeScalar::ZERO {
                true
            } else if turn < SafeScalar::ZERO {
                false
            } else {
                debug!(vertex = %points[i], "polygon has a flat vertex");
                return Err(GeometryError::NotConvex);
            };
            if *orientation.get_or_insert(positive) != positive {
                debug!(vertex = %points[i], "polygon turns both ways");
                return Err(GeometryError::NotConvex);
            }

            edges_equal &= rhs.length() == first_length;
            angles_equal &= lhs.cos(&rhs)? == regular_cos;
        }

        trace!(vertices = n, edges_equal, angles_equal, "built polygon");
        Ok(Polygon {
            points,
            plane,
            edges_equal,
            angles_equal,
        })
    }
}

/// A convex planar polygon with at least three vertices in boundary order.
#[derive(Debug, Clone, Serialize)]
pub struct Polygon {
    points: Vec<Point3>,
    plane: Plane3,
    edges_equal: bool,
    angles_equal: bool,
}

impl Polygon {
    /// Run the full construction pipeline over an unordered point set.
    pub fn new(points: impl IntoIterator<Item = Point3>) -> Result<Self, GeometryError> {
        PolygonBuilder::from_points(points)?
            .fit_plane()?
            .check_coplanar()?
            .sort_by_polar_angle()?
            .remove_collinear()?
            .finish()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn plane(&self) -> &Plane3 {
        &self.plane
    }

    pub fn edges_equal(&self) -> bool {
        self.edges_equal
    }

    pub fn angles_equal(&self) -> bool {
        self.angles_equal
    }

    /// Boundary edges in order, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Edge::from_distinct(self.points[i], self.points[(i + 1) % n]))
    }

    pub fn contains_point(&self, point: &Point3) -> Containment {
        if !self.plane.contains_point(point) {
            return Containment::Outside;
        }
        let normal = self.plane.normal();
        let n = self.points.len();
        let mut side = None;
        for i in 0..n {
            let start = self.points[i];
            let edge = self.points[(i + 1) % n] - start;
            let rel = *point - start;
            let s = edge.cross(&rel).dot(&normal);
            if s.is_zero() {
                let along = rel.dot(&edge);
                return if along >= SafeScalar::ZERO && along <= edge.dot(&edge) {
                    Containment::OnBoundary
                } else {
                    Containment::Outside
                };
            }
            let positive = s > SafeScalar::ZERO;
            if *side.get_or_insert(positive) != positive {
                return Containment::Outside;
            }
        }
        Containment::Inside
    }

    /// Where `path` crosses this polygon, if it does.
    pub fn intersect(&self, path: &dyn LinearPath) -> Result<Option<Hit>, GeometryError> {
        let Some(point) = path.intersect_plane(&self.plane)? else {
            return Ok(None);
        };
        Ok(match self.contains_point(&point) {
            Containment::Outside => None,
            containment => Some(Hit { point, containment }),
        })
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.points.len() == other.points.len()
            && self.points.iter().all(|p| other.points.contains(p))
    }
}

impl Eq for Polygon {}

impl Hash for Polygon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.points.iter().fold(0u64, |acc, p| {
            let mut hasher = DefaultHasher::new();
            p.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        self.points.len().hash(state);
        combined.hash(state);
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "polygon [")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EPS;
    use crate::geometry::line::{Line3, Ray3};
    use std::collections::HashSet;

    fn unit_square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn vertical(x: f64, y: f64) -> Line3 {
        Line3::from_point_and_vector(Point3::new(x, y, -1.0), Vector3::Z).unwrap()
    }

    #[test]
    fn test_from_points_collapses_duplicates() {
        let mut points = unit_square();
        points.push(Point3::new(EPS / 4.0, 0.0, 0.0));
        points.push(Point3::new(1.0, 1.0, 0.0));
        let builder = PolygonBuilder::from_points(points).unwrap();
        assert_eq!(builder.points().len(), 4);
    }

    #[test]
    fn test_from_points_needs_three() {
        let points = [Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0), Point3::ORIGIN];
        assert!(matches!(
            PolygonBuilder::from_points(points),
            Err(GeometryError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_fit_plane_rejects_collinear() {
        let points = (0..4).map(|i| Point3::new(i as f64, 2.0 * i as f64, 0.0));
        let builder = PolygonBuilder::from_points(points).unwrap();
        assert!(matches!(
            builder.fit_plane(),
            Err(GeometryError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_check_coplanar_rejects_bent_points() {
        let mut points = unit_square();
        points[1] = Point3::new(1.0, 1.0, 0.5);
        let fitted = PolygonBuilder::from_points(points).unwrap().fit_plane().unwrap();
        assert!(matches!(
            fitted.check_coplanar(),
            Err(GeometryError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_sort_by_polar_angle_orders_boundary() {
        let ordered = PolygonBuilder::from_points(unit_square())
            .and_then(|b| b.fit_plane())
            .and_then(|b| b.check_coplanar())
            .and_then(|b| b.sort_by_polar_angle())
            .unwrap();
        let pts = ordered.points();
        for i in 0..4 {
            assert_eq!(pts[i].dist_to_point(&pts[(i + 1) % 4]), 1.0);
        }
    }

    #[test]
    fn test_centroid_vertex_is_rejected() {
        let mut points = unit_square();
        points.push(Point3::new(0.5, 0.5, 0.0));
        let coplanar = PolygonBuilder::from_points(points)
            .and_then(|b| b.fit_plane())
            .and_then(|b| b.check_coplanar())
            .unwrap();
        assert!(matches!(
            coplanar.sort_by_polar_angle(),
            Err(GeometryError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_remove_collinear_drops_edge_midpoint() {
        let mut points = unit_square();
        points.push(Point3::new(0.5, 0.0, 0.0));
        let polygon = Polygon::new(points).unwrap();
        assert_eq!(polygon.points().len(), 4);
        assert!(!polygon.points().contains(&Point3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_non_convex_is_rejected() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(1.0, 0.5, 0.0),
        ];
        assert_eq!(Polygon::new(points).unwrap_err(), GeometryError::NotConvex);
    }

    #[test]
    fn test_regularity_flags() {
        let square = Polygon::new(unit_square()).unwrap();
        assert!(square.edges_equal() && square.angles_equal());

        let rectangle = Polygon::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        assert!(!rectangle.edges_equal());
        assert!(rectangle.angles_equal());

        let rhombus = Polygon::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(2.0, -1.0, 0.0),
        ])
        .unwrap();
        assert!(rhombus.edges_equal());
        assert!(!rhombus.angles_equal());
    }

    #[test]
    fn test_contains_point() {
        let square = Polygon::new(unit_square()).unwrap();
        assert_eq!(square.contains_point(&Point3::new(0.5, 0.5, 0.0)), Containment::Inside);
        assert_eq!(square.contains_point(&Point3::new(1.0, 0.5, 0.0)), Containment::OnBoundary);
        assert_eq!(square.contains_point(&Point3::ORIGIN), Containment::OnBoundary);
        assert_eq!(square.contains_point(&Point3::new(2.0, 0.5, 0.0)), Containment::Outside);
        assert_eq!(square.contains_point(&Point3::new(2.0, 0.0, 0.0)), Containment::Outside);
        assert_eq!(square.contains_point(&Point3::new(0.5, 0.5, 1.0)), Containment::Outside);
    }

    #[test]
    fn test_intersect() {
        let square = Polygon::new(unit_square()).unwrap();

        let hit = square.intersect(&vertical(0.25, 0.75)).unwrap().unwrap();
        assert_eq!(hit.point, Point3::new(0.25, 0.75, 0.0));
        assert_eq!(hit.containment, Containment::Inside);

        let edge_hit = square.intersect(&vertical(1.0, 0.3)).unwrap().unwrap();
        assert_eq!(edge_hit.containment, Containment::OnBoundary);

        assert!(square.intersect(&vertical(3.0, 3.0)).unwrap().is_none());

        let away = Ray3::from_point_and_vector(Point3::new(0.5, 0.5, 1.0), Vector3::Z).unwrap();
        assert!(square.intersect(&away).unwrap().is_none());

        let in_plane = Line3::from_point_and_vector(Point3::new(0.5, 0.5, 0.0), Vector3::X).unwrap();
        assert!(matches!(
            square.intersect(&in_plane),
            Err(GeometryError::AmbiguousIntersection { .. })
        ));
    }

    #[test]
    fn test_equality_and_hash_ignore_order() {
        let a = Polygon::new(unit_square()).unwrap();
        let mut reversed = unit_square();
        reversed.reverse();
        let b = Polygon::new(reversed).unwrap();
        assert_eq!(a, b);

        let set: HashSet<Polygon> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_edges_close_the_loop() {
        let square = Polygon::new(unit_square()).unwrap();
        let edges: Vec<Edge> = square.edges().collect();
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|e| e.length() == 1.0));
        let first = square.points()[0];
        assert!(edges.iter().filter(|e| e.points().contains(&first)).count() == 2);
    }

    #[test]
    fn test_display_lists_vertices() {
        let triangle = Polygon::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        let text = triangle.to_string();
        assert!(text.starts_with("polygon ["));
        assert!(text.contains("(1, 0, 0)"));
    }
}
