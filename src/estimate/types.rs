#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::traits::FloatScalar;
use crate::Matrix;

/// Planar vector `(x, y)`. Body or world frame depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T: FloatScalar> Vec2<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// As a `2 x 1` column matrix.
    pub fn to_column(self) -> Result<Matrix<T>, Error> {
        Matrix::column(&[self.x, self.y])
    }
}

impl<T> From<[T; 2]> for Vec2<T> {
    fn from([x, y]: [T; 2]) -> Self {
        Self { x, y }
    }
}

/// One sample from the sensor suite.
///
/// Accelerometer and gyroscope are body frame; GNSS position and velocity
/// are world frame. The GNSS fields are only read when the caller marks the
/// fix as fresh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorReading<T> {
    /// Specific force, m/s².
    pub accelerometer: Vec2<T>,
    /// Pitch rate, rad/s.
    pub gyroscope: T,
    /// GNSS position, m.
    pub gnss_position: Vec2<T>,
    /// GNSS velocity, m/s.
    pub gnss_velocity: Vec2<T>,
}

impl<T: FloatScalar> SensorReading<T> {
    /// GNSS observation in filter order `[x, y, vx, vy]`.
    pub fn gnss_measurement(&self) -> Result<Matrix<T>, Error> {
        Matrix::column(&[
            self.gnss_position.x,
            self.gnss_position.y,
            self.gnss_velocity.x,
            self.gnss_velocity.y,
        ])
    }
}

/// Latest fused estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EstimationRecord<T> {
    /// World position, m.
    pub position: Vec2<T>,
    /// World velocity, m/s.
    pub velocity: Vec2<T>,
    /// Pitch angle, rad. Not wrapped.
    pub angle: T,
}
