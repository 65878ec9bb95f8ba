//! The intersection seam shared by every renderable figure.
//!
//! A ray tracer holds figures as `&dyn Figure` and feeds them rays; a plane,
//! a single polygon and a closed polyhedron all answer the same query.

use serde::Serialize;

use crate::error::GeometryError;
use crate::geometry::line::LinearPath;
use crate::geometry::plane::Plane3;
use crate::geometry::point::Point3;
use crate::topology::polygon::{Containment, Polygon};
use crate::topology::polyhedron::Polyhedron;

/// A point where a linear path meets a figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hit {
    pub point: Point3,
    /// Never `Outside`.
    pub containment: Containment,
}

pub trait Figure {
    /// The hit nearest to the anchor of `path`, if any.
    fn intersection(&self, path: &dyn LinearPath) -> Result<Option<Hit>, GeometryError>;
}

// ── Implementations ────────────────────────────────────────────────────────

impl Figure for Plane3 {
    fn intersection(&self, path: &dyn LinearPath) -> Result<Option<Hit>, GeometryError> {
        Ok(self.intersect_line(path)?.map(|point| Hit {
            point,
            containment: Containment::Inside,
        }))
    }
}

impl Figure for Polygon {
    fn intersection(&self, path: &dyn LinearPath) -> Result<Option<Hit>, GeometryError> {
        self.intersect(path)
    }
}

impl Figure for Polyhedron {
    fn intersection(&self, path: &dyn LinearPath) -> Result<Option<Hit>, GeometryError> {
        self.intersect(path)
    }
}
