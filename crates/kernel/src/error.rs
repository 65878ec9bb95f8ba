use crate::geometry::point::Point3;

/// Failure of a geometric construction or query.
///
/// Every fallible kernel operation returns this error to its immediate caller;
/// nothing is retried or downgraded inside the kernel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: &'static str },

    #[error("division by zero: divisor {divisor} is within tolerance of zero")]
    DivisionByZero { divisor: f64 },

    #[error("ambiguous intersection: {reason}")]
    AmbiguousIntersection { reason: &'static str },

    #[error("polygon is not convex")]
    NotConvex,

    #[error("edge {start} -> {end} is shared by {count} faces, expected exactly 2")]
    ClosedSolidViolation {
        start: Point3,
        end: Point3,
        count: usize,
    },

    #[error("invalid parameter {parameter}: {value}")]
    InvalidParameter { parameter: &'static str, value: f64 },
}

impl GeometryError {
    pub(crate) fn degenerate(reason: &'static str) -> Self {
        Self::DegenerateInput { reason }
    }

    pub(crate) fn ambiguous(reason: &'static str) -> Self {
        Self::AmbiguousIntersection { reason }
    }
}
