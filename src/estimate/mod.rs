//! Planar drone state estimation: a linear Kalman filter for position and
//! velocity, a complementary filter for pitch, and the [`Estimator`] that
//! runs both at a fixed rate.
//!
//! Everything lives on the stack in [`Matrix`](crate::Matrix) values; no
//! heap is touched, so the module works in `no_std` builds.
//!
//! # Kalman filter
//!
//! ```
//! use drone_kf::estimate::{FilterTuning, KalmanFilter};
//! use drone_kf::Matrix;
//!
//! let tuning = FilterTuning { initial_position_std: 10.0, ..Default::default() };
//! let mut kf = KalmanFilter::<f64>::planar_with_tuning(0.01, &tuning).unwrap();
//!
//! kf.rotate_input(&Matrix::column(&[0.0, 9.81]).unwrap(), 0.0).unwrap();
//! let z = Matrix::column(&[10.0, 5.0, 0.0, 0.0]).unwrap();
//! for _ in 0..50 {
//!     kf.predict_and_update(&z).unwrap();
//! }
//! let [x, y] = kf.position().unwrap();
//! assert!((x - 10.0).abs() < 0.1);
//! assert!((y - 5.0).abs() < 0.1);
//! ```
//!
//! # Complementary filter
//!
//! ```
//! use drone_kf::estimate::{ComplementaryFilter, Vec2};
//!
//! let mut cf = ComplementaryFilter::<f64>::default();
//! let angle = cf.update(0.5, 0.01, Vec2::new(0.0, 9.81));
//! assert!((angle - 0.99 * 0.005).abs() < 1e-15);
//! ```

mod attitude;
mod estimator;
mod kalman;
mod tuning;
mod types;


pub use attitude::{accel_angle, update_angle, ComplementaryFilter};
pub use estimator::Estimator;
pub use kalman::{KalmanFilter, LinearModel, PLANAR_INPUTS, PLANAR_MEASUREMENTS, PLANAR_STATES};
pub use tuning::{
    EstimatorConfig, FilterTuning, DEFAULT_DT, DEFAULT_GYRO_WEIGHT, STANDARD_GRAVITY,
};
pub use types::{EstimationRecord, SensorReading, Vec2};
