#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Gravity state at start-up, world frame, m/s² (y axis up).
pub const STANDARD_GRAVITY: f64 = -9.81;

/// Weight given to the gyro-integrated angle by the complementary filter.
pub const DEFAULT_GYRO_WEIGHT: f64 = 0.99;

/// Sample interval of the reference flight loop, seconds.
pub const DEFAULT_DT: f64 = 0.01;

/// Tuning constants of the planar 5-state Kalman filter.
///
/// All values are standard deviations in SI units and are squared into the
/// diagonal covariance matrices when the filter is built. `Default` returns
/// the reference tuning of the flight loop.
///
/// Process noise per axis:
/// - position: `0.5 · accel_noise_std · dt² + position_noise_floor`
/// - velocity: `accel_noise_std · dt + velocity_noise_floor`
///
/// Measurement noise per GNSS channel: `gnss_noise_scale · gnss_*_std`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FilterTuning {
    /// Initial value of the gravity state.
    pub gravity: f64,
    /// Initial position uncertainty (1σ, m).
    pub initial_position_std: f64,
    /// Initial velocity uncertainty (1σ, m/s).
    pub initial_velocity_std: f64,
    /// Accelerometer noise driving the process model (1σ, m/s²).
    pub accel_noise_std: f64,
    /// Constant position process noise (1σ, m).
    pub position_noise_floor: f64,
    /// Constant velocity process noise (1σ, m/s).
    pub velocity_noise_floor: f64,
    /// Scale applied to the GNSS receiver figures below.
    pub gnss_noise_scale: f64,
    /// GNSS position noise per axis `[x, y]` (1σ, m).
    pub gnss_position_std: [f64; 2],
    /// GNSS velocity noise per axis `[x, y]` (1σ, m/s).
    pub gnss_velocity_std: [f64; 2],
}

impl Default for FilterTuning {
    fn default() -> Self {
        Self {
            gravity: STANDARD_GRAVITY,
            initial_position_std: 0.005,
            initial_velocity_std: 0.0005,
            accel_noise_std: 0.0014,
            position_noise_floor: 0.001,
            velocity_noise_floor: 0.005,
            gnss_noise_scale: 0.05,
            gnss_position_std: [3.3, 5.3],
            gnss_velocity_std: [0.2, 0.2],
        }
    }
}

impl FilterTuning {
    /// Position process noise (1σ) for one step of `dt`.
    pub fn position_process_std(&self, dt: f64) -> f64 {
        0.5 * self.accel_noise_std * dt * dt + self.position_noise_floor
    }

    /// Velocity process noise (1σ) for one step of `dt`.
    pub fn velocity_process_std(&self, dt: f64) -> f64 {
        self.accel_noise_std * dt + self.velocity_noise_floor
    }

    /// GNSS measurement noise (1σ) in observation order `[x, y, vx, vy]`.
    pub fn measurement_std(&self) -> [f64; 4] {
        let s = self.gnss_noise_scale;
        [
            s * self.gnss_position_std[0],
            s * self.gnss_position_std[1],
            s * self.gnss_velocity_std[0],
            s * self.gnss_velocity_std[1],
        ]
    }

    /// Check that the gravity term is finite and every deviation is finite
    /// and non-negative.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.gravity.is_finite() {
            return Err(Error::InvalidTuning { field: "gravity" });
        }
        let fields: [(&'static str, f64); 10] = [
            ("initial_position_std", self.initial_position_std),
            ("initial_velocity_std", self.initial_velocity_std),
            ("accel_noise_std", self.accel_noise_std),
            ("position_noise_floor", self.position_noise_floor),
            ("velocity_noise_floor", self.velocity_noise_floor),
            ("gnss_noise_scale", self.gnss_noise_scale),
            ("gnss_position_std", self.gnss_position_std[0]),
            ("gnss_position_std", self.gnss_position_std[1]),
            ("gnss_velocity_std", self.gnss_velocity_std[0]),
            ("gnss_velocity_std", self.gnss_velocity_std[1]),
        ];
        for (field, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidTuning { field });
            }
        }
        Ok(())
    }
}

/// Everything needed to build an [`Estimator`](super::Estimator).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EstimatorConfig {
    /// Fixed sample interval, seconds.
    pub dt: f64,
    /// Kalman filter tuning.
    pub tuning: FilterTuning,
    /// Complementary filter weight on the gyro path, in `[0, 1]`.
    pub gyro_weight: f64,
    /// Absolute pivot tolerance for the gain solve. `None` scales the
    /// tolerance with the innovation covariance.
    pub solve_tolerance: Option<f64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            tuning: FilterTuning::default(),
            gyro_weight: DEFAULT_GYRO_WEIGHT,
            solve_tolerance: None,
        }
    }
}

impl EstimatorConfig {
    /// Reference configuration with a custom sample interval.
    pub fn with_dt(dt: f64) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(Error::InvalidSampleInterval);
        }
        if !(0.0..=1.0).contains(&self.gyro_weight) {
            return Err(Error::InvalidTuning { field: "gyro_weight" });
        }
        if let Some(tol) = self.solve_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(Error::InvalidTuning { field: "solve_tolerance" });
            }
        }
        self.tuning.validate()
    }
}
