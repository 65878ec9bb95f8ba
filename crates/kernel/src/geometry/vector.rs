use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::angle::Angle;
use super::plane::Plane3;
use super::point::Point3;
use super::scalar::SafeScalar;
use crate::error::GeometryError;

/// A free vector in 3D Euclidean space with tolerant component equality.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: SafeScalar,
    pub y: SafeScalar,
    pub z: SafeScalar,
}

impl Vector3 {
    pub const ZERO: Self = Self {
        x: SafeScalar::ZERO,
        y: SafeScalar::ZERO,
        z: SafeScalar::ZERO,
    };
    pub const X: Self = Self {
        x: SafeScalar::ONE,
        y: SafeScalar::ZERO,
        z: SafeScalar::ZERO,
    };
    pub const Y: Self = Self {
        x: SafeScalar::ZERO,
        y: SafeScalar::ONE,
        z: SafeScalar::ZERO,
    };
    pub const Z: Self = Self {
        x: SafeScalar::ZERO,
        y: SafeScalar::ZERO,
        z: SafeScalar::ONE,
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

    /// The position vector of `point`, from the origin.
    pub fn from_point(point: Point3) -> Self {
        Self::from_scalars(point.x, point.y, point.z)
    }

    /// The vector from `start` to `end`.
    pub fn between(start: Point3, end: Point3) -> Self {
        end - start
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x.value(), self.y.value(), self.z.value()]
    }

    pub fn dot(&self, other: &Self) -> SafeScalar {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> SafeScalar {
        self.dot(self).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    /// Scale to unit length in place.
    pub fn normalize(&mut self) -> Result<(), GeometryError> {
        *self = self.normalized()?;
        Ok(())
    }

    pub fn normalized(&self) -> Result<Self, GeometryError> {
        if self.is_zero() {
            return Err(GeometryError::degenerate("cannot normalize a zero vector"));
        }
        self.checked_div(self.length())
    }

    pub fn checked_div(&self, divisor: impl Into<SafeScalar>) -> Result<Self, GeometryError> {
        let divisor = divisor.into();
        Ok(Self {
            x: self.x.checked_div(divisor)?,
            y: self.y.checked_div(divisor)?,
            z: self.z.checked_div(divisor)?,
        })
    }

    /// Cosine of the angle between `self` and `other`.
    ///
    /// Fails with `DivisionByZero` when `|self| * |other| <= EPS`, so with the
    /// fixed absolute tolerance both vectors need a length of about `3e-5` or more.
    pub fn cos(&self, other: &Self) -> Result<SafeScalar, GeometryError> {
        self.require_direction(other)?;
        self.dot(other).checked_div(self.length() * other.length())
    }

    /// Sine of the (unsigned) angle between `self` and `other`.
    pub fn sin(&self, other: &Self) -> Result<SafeScalar, GeometryError> {
        self.require_direction(other)?;
        self.cross(other)
            .length()
            .checked_div(self.length() * other.length())
    }

    pub fn is_parallel(&self, other: &Self) -> Result<bool, GeometryError> {
        Ok(self.cos(other)?.abs() == SafeScalar::ONE)
    }

    pub fn is_perpendicular(&self, other: &Self) -> Result<bool, GeometryError> {
        Ok(self.cos(other)?.is_zero())
    }

    /// Vector projection of `self` onto `other`; zero when either operand is zero.
    pub fn project_to(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::ZERO;
        }
        // A non-zero component exceeds EPS, so the length does too.
        let unit = *other * (1.0 / other.length().value());
        unit * self.dot(&unit)
    }

    /// The two vectors `self ± (self × n) * tan(angle)` for a plane with normal `n`.
    ///
    /// These bound a view frustum of half-angle `angle` around `self`.
    pub fn projected_vectors(&self, plane: &Plane3, angle: Angle) -> (Self, Self) {
        let offset = self.cross(&plane.normal()) * angle.tan();
        (*self + offset, *self - offset)
    }

    fn require_direction(&self, other: &Self) -> Result<(), GeometryError> {
        if self.is_zero() || other.is_zero() {
            return Err(GeometryError::degenerate(
                "direction of a zero vector is undefined",
            ));
        }
        Ok(())
    }
}

impl From<Point3> for Vector3 {
    fn from(point: Point3) -> Self {
        Self::from_point(point)
    }
}

impl Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<SafeScalar> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: SafeScalar) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        self * SafeScalar::new(rhs)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Self::Output {
        rhs * self
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_and_cross() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(&b), 32.0);
        assert_eq!(Vector3::X.cross(&Vector3::Y), Vector3::Z);
        assert_eq!(Vector3::Y.cross(&Vector3::X), -Vector3::Z);
    }

    #[test]
    fn test_length_and_normalize() {
        let mut v = Vector3::new(3.0, 4.0, 0.0);
        assert_eq!(v.length(), 5.0);
        v.normalize().unwrap();
        assert_eq!(v, Vector3::new(0.6, 0.8, 0.0));
        assert_relative_eq!(v.length().value(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_zero_fails() {
        let mut v = Vector3::ZERO;
        assert!(matches!(
            v.normalize(),
            Err(GeometryError::DegenerateInput { .. })
        ));
        assert!(Vector3::new(1e-10, 0.0, 0.0).normalized().is_err());
    }

    #[test]
    fn test_between_points() {
        let v = Vector3::between(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 3.0, 4.0));
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Vector3::from(Point3::new(1.0, 2.0, 3.0)), v);
    }

    #[test]
    fn test_cos_and_sin() {
        let a = Vector3::X;
        let b = Vector3::new(1.0, 1.0, 0.0);
        let half_sqrt2 = 2f64.sqrt() / 2.0;
        assert_eq!(a.cos(&b).unwrap(), half_sqrt2);
        assert_eq!(a.sin(&b).unwrap(), half_sqrt2);
        assert!(a.cos(&Vector3::ZERO).is_err());
    }

    #[test]
    fn test_parallel_and_perpendicular() {
        let v = Vector3::new(1.0, -2.0, 0.5);
        assert!(v.is_parallel(&v).unwrap());
        assert!(v.is_parallel(&(-v)).unwrap());
        assert!(v.is_parallel(&(v * 3.0)).unwrap());
        assert!(!v.is_perpendicular(&v).unwrap());
        assert!(Vector3::X.is_perpendicular(&Vector3::Z).unwrap());
        assert!(Vector3::X.is_parallel(&Vector3::ZERO).is_err());
    }

    #[test]
    fn test_project_to() {
        let v = Vector3::new(2.0, 3.0, 0.0);
        assert_eq!(v.project_to(&Vector3::X), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(v.project_to(&v), v);
        assert_eq!(v.project_to(&Vector3::ZERO), Vector3::ZERO);
        assert_eq!(Vector3::ZERO.project_to(&v), Vector3::ZERO);
    }

    #[test]
    fn test_project_to_short_vector() {
        let v = Vector3::new(5.0, 2.0, 0.0);
        let short = Vector3::new(1e-5, 0.0, 0.0);
        assert_eq!(v.project_to(&short), Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(v.project_to(&(-short)), Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_cos_below_usable_length() {
        let tiny = Vector3::new(2e-5, 0.0, 0.0);
        assert!(matches!(
            tiny.cos(&tiny),
            Err(GeometryError::DivisionByZero { .. })
        ));
        let short = Vector3::new(1e-4, 0.0, 0.0);
        assert_eq!(short.cos(&short).unwrap(), 1.0);
    }

    #[test]
    fn test_checked_div() {
        let v = Vector3::new(2.0, 4.0, 6.0);
        assert_eq!(v.checked_div(2.0).unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert!(matches!(
            v.checked_div(0.0),
            Err(GeometryError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_projected_vectors() {
        let plane = Plane3::from_point_and_normal(Point3::ORIGIN, Vector3::Z).unwrap();
        let (left, right) = Vector3::X.projected_vectors(&plane, Angle::from_degrees(45.0));
        assert_eq!(left, Vector3::new(1.0, -1.0, 0.0));
        assert_eq!(right, Vector3::new(1.0, 1.0, 0.0));
    }
}
