use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

use super::line::LinearPath;
use super::scalar::SafeScalar;
use super::vector::Vector3;

/// A point in 3D Euclidean space with tolerant coordinate equality.
///
/// Hashing buckets each coordinate into cells of width `2·EPS`, so points that
/// compare equal almost always collide. Two equal points that straddle a
/// bucket boundary hash apart; containers keyed by `Point3` treat them as
/// distinct.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: SafeScalar,
    pub y: SafeScalar,
    pub z: SafeScalar,
}

impl Point3 {
    pub const ORIGIN: Self = Self {
        x: SafeScalar::ZERO,
        y: SafeScalar::ZERO,
        z: SafeScalar::ZERO,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: SafeScalar::new(x),
            y: SafeScalar::new(y),
            z: SafeScalar::new(z),
        }
    }

    pub const fn from_scalars(x: SafeScalar, y: SafeScalar, z: SafeScalar) -> Self {
        Self { x, y, z }
    }

    pub fn dist_to_point(&self, other: &Self) -> SafeScalar {
        (*other - *self).length()
    }

    pub fn dist_to_line(&self, line: &dyn LinearPath) -> SafeScalar {
        line.dist_to_point(self)
    }

    pub fn to_vector(&self) -> Vector3 {
        Vector3::from_point(*self)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x.value(), self.y.value(), self.z.value()]
    }

    /// Exact lexicographic order on the raw coordinates.
    ///
    /// Unlike `Ord`, this is a strict total order, so it is safe to sort with.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.x
            .value()
            .total_cmp(&other.x.value())
            .then_with(|| self.y.value().total_cmp(&other.y.value()))
            .then_with(|| self.z.value().total_cmp(&other.z.value()))
    }
}

fn tolerant_cmp(a: SafeScalar, b: SafeScalar) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.value().total_cmp(&b.value()))
}

impl Eq for Point3 {}

impl Ord for Point3 {
    fn cmp(&self, other: &Self) -> Ordering {
        tolerant_cmp(self.x, other.x)
            .then_with(|| tolerant_cmp(self.y, other.y))
            .then_with(|| tolerant_cmp(self.z, other.z))
    }
}

impl PartialOrd for Point3 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Point3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.bucket().hash(state);
        self.y.bucket().hash(state);
        self.z.bucket().hash(state);
    }
}

impl Add<Vector3> for Point3 {
    type Output = Point3;
    fn add(self, rhs: Vector3) -> Self::Output {
        Point3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub<Vector3> for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Vector3) -> Self::Output {
        Point3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Sub for Point3 {
    type Output = Vector3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vector3::from_scalars(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
