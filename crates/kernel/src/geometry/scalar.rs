use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::GeometryError;
use crate::Tolerance;

/// A floating-point value whose comparisons apply an `EPS`-wide band.
///
/// `a == b` holds iff `|a - b| <= EPS`, `a > b` iff `a - b > EPS` and
/// `a < b` iff `a - b < -EPS`. Exactly one of the three holds for finite
/// values, but equality is not transitive: chains of neighbours that are each
/// within tolerance can drift apart by more than `EPS`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeScalar(f64);

impl SafeScalar {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Absolute value; anything inside the tolerance band collapses to exactly zero.
    pub fn abs(self) -> Self {
        if self > Self::ZERO {
            self
        } else if self < Self::ZERO {
            -self
        } else {
            Self::ZERO
        }
    }

    /// Divide, failing when the divisor is zero under tolerant equality.
    pub fn checked_div(self, divisor: impl Into<SafeScalar>) -> Result<Self, GeometryError> {
        let divisor = divisor.into();
        if divisor.is_zero() {
            return Err(GeometryError::DivisionByZero {
                divisor: divisor.0,
            });
        }
        Ok(Self(self.0 / divisor.0))
    }

    /// Real exponentiation; negative bases with fractional exponents yield NaN.
    pub fn pow(self, exponent: impl Into<SafeScalar>) -> Self {
        Self(self.0.powf(exponent.into().0))
    }

    pub fn sqrt(self) -> Self {
        Self(self.0.sqrt())
    }

    /// Hash bucket of this value; values within tolerance usually share a bucket.
    pub fn bucket(self) -> i64 {
        Tolerance::DEFAULT.bucket(self.0)
    }
}

impl From<f64> for SafeScalar {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<SafeScalar> for f64 {
    fn from(value: SafeScalar) -> Self {
        value.0
    }
}

impl PartialEq for SafeScalar {
    fn eq(&self, other: &Self) -> bool {
        Tolerance::DEFAULT.is_zero(self.0 - other.0)
    }
}

impl PartialEq<f64> for SafeScalar {
    fn eq(&self, other: &f64) -> bool {
        *self == Self(*other)
    }
}

impl PartialOrd for SafeScalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let eps = Tolerance::DEFAULT.eps;
        let diff = self.0 - other.0;
        if diff > eps {
            Some(Ordering::Greater)
        } else if diff < -eps {
            Some(Ordering::Less)
        } else if diff.abs() <= eps {
            Some(Ordering::Equal)
        } else {
            // NaN on either side.
            None
        }
    }
}

impl PartialOrd<f64> for SafeScalar {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.partial_cmp(&Self(*other))
    }
}

impl Neg for SafeScalar {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Add for SafeScalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add<f64> for SafeScalar {
    type Output = Self;
    fn add(self, rhs: f64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl Sub for SafeScalar {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub<f64> for SafeScalar {
    type Output = Self;
    fn sub(self, rhs: f64) -> Self::Output {
        Self(self.0 - rhs)
    }
}

impl Mul for SafeScalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul<f64> for SafeScalar {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Mul<SafeScalar> for f64 {
    type Output = SafeScalar;
    fn mul(self, rhs: SafeScalar) -> Self::Output {
        SafeScalar(self * rhs.0)
    }
}

impl AddAssign for SafeScalar {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for SafeScalar {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl MulAssign for SafeScalar {
    fn mul_assign(&mut self, rhs: Self) {
        self.0 *= rhs.0;
    }
}

impl fmt::Display for SafeScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
