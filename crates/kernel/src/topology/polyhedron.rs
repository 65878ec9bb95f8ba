use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use super::edge::Edge;
use super::polygon::Polygon;
use crate::error::GeometryError;
use crate::geometry::line::LinearPath;
use crate::traits::Hit;

/// A closed solid bounded by convex polygon faces.
///
/// Every edge of every face is shared by exactly two faces. Faces are held by
/// value; no adjacency is stored.
#[derive(Debug, Clone, Serialize)]
pub struct Polyhedron {
    faces: Vec<Polygon>,
    edge_count: usize,
}

impl Polyhedron {
    /// Build a solid from its faces, collapsing duplicates and checking closure.
    pub fn new(faces: impl IntoIterator<Item = Polygon>) -> Result<Self, GeometryError> {
        let mut distinct: Vec<Polygon> = Vec::new();
        for face in faces {
            if !distinct.contains(&face) {
                distinct.push(face);
            }
        }
        if distinct.is_empty() {
            return Err(GeometryError::degenerate("polyhedron has no faces"));
        }

        let mut edge_faces: HashMap<Edge, usize> = HashMap::new();
        for face in &distinct {
            for edge in face.edges() {
                *edge_faces.entry(edge).or_default() += 1;
            }
        }

        // Lowest offending edge in canonical order.
        let violation = edge_faces
            .iter()
            .filter(|&(_, &count)| count != 2)
            .min_by(|a, b| {
                a.0.start()
                    .canonical_cmp(&b.0.start())
                    .then_with(|| a.0.end().canonical_cmp(&b.0.end()))
            });
        if let Some((edge, &count)) = violation {
            debug!(%edge, count, faces = distinct.len(), "polyhedron is not closed");
            return Err(GeometryError::ClosedSolidViolation {
                start: edge.start(),
                end: edge.end(),
                count,
            });
        }

        debug!(
            faces = distinct.len(),
            edges = edge_faces.len(),
            "built closed polyhedron"
        );
        Ok(Self {
            faces: distinct,
            edge_count: edge_faces.len(),
        })
    }

    pub fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// The face hit closest to the anchor of `path`.
    ///
    /// A path grazing an edge or lying in a face plane fails with
    /// `AmbiguousIntersection` from that face.
    pub fn intersect(&self, path: &dyn LinearPath) -> Result<Option<Hit>, GeometryError> {
        let anchor = path.anchor();
        let mut nearest: Option<Hit> = None;
        for face in &self.faces {
            let Some(hit) = face.intersect(path)? else {
                continue;
            };
            let closer = nearest.as_ref().is_none_or(|best| {
                anchor.dist_to_point(&hit.point).value() < anchor.dist_to_point(&best.point).value()
            });
            if closer {
                nearest = Some(hit);
            }
        }
        Ok(nearest)
    }
}

impl fmt::Display for Polyhedron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "polyhedron with {} faces and {} edges",
            self.faces.len(),
            self.edge_count
        )?;
        for face in &self.faces {
            writeln!(f, "  {face}")?;
        }
        Ok(())
    }
}
