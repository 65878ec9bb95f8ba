pub mod error;
pub mod geometry;
pub mod topology;
pub mod traits;

// Re-export the kernel surface at crate root for convenience.
pub use error::GeometryError;
pub use geometry::angle::Angle;
pub use geometry::line::{Line3, LinearPath, Ray3};
pub use geometry::plane::Plane3;
pub use geometry::point::Point3;
pub use geometry::scalar::SafeScalar;
pub use geometry::vector::Vector3;
pub use topology::edge::Edge;
pub use topology::polygon::{Containment, Polygon, PolygonBuilder};
pub use topology::polyhedron::Polyhedron;
pub use topology::primitives::{
    regular_dodecahedron, regular_hexahedron, regular_icosahedron, regular_octahedron,
    regular_tetrahedron,
};
pub use traits::{Figure, Hit};

/// Absolute tolerance for every scalar comparison in the kernel.
///
/// Values up to roughly 9.2e9 in magnitude keep their epsilon buckets inside `i64`.
pub const EPS: f64 = 1e-9;

/// Width of one hash bucket; points within tolerance land in the same bucket.
pub const HASH_BUCKET_WIDTH: f64 = 2.0 * EPS;

/// Slack for verifying a line-line intersection candidate against both lines.
pub const INTERSECTION_SLACK: f64 = 10.0 * EPS;

/// Tolerance configuration shared by all geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Scalars closer than this are equal.
    pub eps: f64,
    /// Bucket width used when hashing coordinates.
    pub bucket_width: f64,
    /// Maximum distance of a line-line intersection from either line.
    pub intersection_slack: f64,
}

impl Tolerance {
    pub const DEFAULT: Self = Self {
        eps: EPS,
        bucket_width: HASH_BUCKET_WIDTH,
        intersection_slack: INTERSECTION_SLACK,
    };

    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.eps
    }

    /// Index of the hash bucket holding `value`.
    pub fn bucket(&self, value: f64) -> i64 {
        (value / self.bucket_width).round() as i64
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The process-wide tolerance. It is a constant and never changes at run time.
pub fn default_tolerance() -> Tolerance {
    Tolerance::DEFAULT
}
