use serde::Serialize;
use std::fmt;

use crate::error::GeometryError;
use crate::geometry::point::Point3;
use crate::geometry::scalar::SafeScalar;

/// An undirected edge between two distinct points.
///
/// The endpoints are stored in `Point3` order, so `Edge::new(a, b)` and
/// `Edge::new(b, a)` are equal and hash alike. Used as the key when counting
/// how many faces share each edge of a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    start: Point3,
    end: Point3,
}

impl Edge {
    pub fn new(a: Point3, b: Point3) -> Result<Self, GeometryError> {
        if a == b {
            return Err(GeometryError::degenerate("edge endpoints coincide"));
        }
        Ok(Self::from_distinct(a, b))
    }

    /// Caller guarantees `a != b`.
    pub(crate) fn from_distinct(a: Point3, b: Point3) -> Self {
        if b < a {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn start(&self) -> Point3 {
        self.start
    }

    pub fn end(&self) -> Point3 {
        self.end
    }

    pub fn points(&self) -> [Point3; 2] {
        [self.start, self.end]
    }

    pub fn length(&self) -> SafeScalar {
        self.start.dist_to_point(&self.end)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}
