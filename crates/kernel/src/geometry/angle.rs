use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::ops::Div;

use super::scalar::SafeScalar;

/// An angle normalized into one full turn, `[0°, 360°)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    degrees: f64,
    radians: f64,
}

impl Angle {
    pub fn from_degrees(degrees: f64) -> Self {
        let degrees = degrees.rem_euclid(360.0);
        Self {
            degrees,
            radians: degrees.to_radians(),
        }
    }

    pub fn from_radians(radians: f64) -> Self {
        let radians = radians.rem_euclid(TAU);
        Self {
            degrees: radians.to_degrees(),
            radians,
        }
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn radians(&self) -> f64 {
        self.radians
    }

    pub fn cos(&self) -> SafeScalar {
        SafeScalar::new(self.radians.cos())
    }

    pub fn sin(&self) -> SafeScalar {
        SafeScalar::new(self.radians.sin())
    }

    pub fn tan(&self) -> SafeScalar {
        SafeScalar::new(self.radians.tan())
    }
}

impl Div<f64> for Angle {
    type Output = Angle;
    fn div(self, rhs: f64) -> Self::Output {
        Angle::from_degrees(self.degrees / rhs)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees)
    }
}
