use crate::error::Error;
use crate::traits::FloatScalar;

use super::tuning::DEFAULT_GYRO_WEIGHT;
use super::types::Vec2;

/// Pitch angle implied by the gravity vector in a body-frame accelerometer
/// sample: `atan2(accel.x, accel.y)`.
///
/// Zero when the specific force points straight along body `+y`.
#[inline]
pub fn accel_angle<T: FloatScalar>(accel: Vec2<T>) -> T {
    accel.x.atan2(accel.y)
}

/// One complementary filter step with the reference gyro weight.
///
/// `α · (prev + rate·dt) + (1 - α) · atan2(accel.x, accel.y)` with
/// `α = 0.99`. The result is not wrapped.
///
/// ```
/// use drone_kf::estimate::{update_angle, Vec2};
/// let a = update_angle(0.0_f64, 0.0, 0.01, Vec2::new(0.0, 9.81));
/// assert_eq!(a, 0.0);
/// ```
pub fn update_angle<T: FloatScalar>(prev: T, gyro_rate: T, dt: T, accel: Vec2<T>) -> T {
    blend(prev, gyro_rate, dt, accel, T::cast_f64(DEFAULT_GYRO_WEIGHT))
}

#[inline]
fn blend<T: FloatScalar>(prev: T, gyro_rate: T, dt: T, accel: Vec2<T>, weight: T) -> T {
    weight * (prev + gyro_rate * dt) + (T::one() - weight) * accel_angle(accel)
}

/// Complementary filter fusing gyro rate with the accelerometer tilt.
///
/// The gyro path tracks fast motion; the accelerometer path removes the
/// slow drift of the integrated rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplementaryFilter<T> {
    angle: T,
    gyro_weight: T,
}

impl<T: FloatScalar> Default for ComplementaryFilter<T> {
    fn default() -> Self {
        Self {
            angle: T::zero(),
            gyro_weight: T::cast_f64(DEFAULT_GYRO_WEIGHT),
        }
    }
}

impl<T: FloatScalar> ComplementaryFilter<T> {
    /// Filter at angle zero.
    ///
    /// Fails with [`Error::InvalidTuning`] unless `gyro_weight` is in
    /// `[0, 1]`.
    pub fn new(gyro_weight: T) -> Result<Self, Error> {
        if !(gyro_weight >= T::zero() && gyro_weight <= T::one()) {
            return Err(Error::InvalidTuning { field: "gyro_weight" });
        }
        Ok(Self {
            angle: T::zero(),
            gyro_weight,
        })
    }

    #[inline]
    pub fn angle(&self) -> T {
        self.angle
    }

    #[inline]
    pub fn gyro_weight(&self) -> T {
        self.gyro_weight
    }

    pub fn reset(&mut self, angle: T) {
        self.angle = angle;
    }

    /// Advance by `dt` and return the new angle.
    pub fn update(&mut self, gyro_rate: T, dt: T, accel: Vec2<T>) -> T {
        self.angle = blend(self.angle, gyro_rate, dt, accel, self.gyro_weight);
        self.angle
    }
}
