//! # drone-kf
//!
//! Planar drone state estimation on fixed-capacity, stack-allocated
//! matrices. no-std compatible; no heap allocation happens anywhere,
//! including inside a filter step.
//!
//! ## Quick start
//!
//! ```
//! use drone_kf::estimate::{Estimator, EstimatorConfig, SensorReading, Vec2};
//!
//! let mut config = EstimatorConfig::default(); // dt = 0.01 s
//! config.tuning.initial_position_std = 10.0;
//! let mut est = Estimator::<f64>::new(&config).unwrap();
//!
//! let reading = SensorReading {
//!     accelerometer: Vec2::new(0.0, 9.81), // hover
//!     gyroscope: 0.0,
//!     gnss_position: Vec2::new(10.0, 5.0),
//!     gnss_velocity: Vec2::new(0.0, 0.0),
//! };
//! for _ in 0..50 {
//!     est.step(&reading, true).unwrap();
//! }
//! let rec = est.record();
//! assert!((rec.position.x - 10.0).abs() < 0.1);
//! assert!((rec.position.y - 5.0).abs() < 0.1);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: `Matrix<T>` with runtime shape and a fixed
//!   [`MAX_ELEMENTS`]-element row-major store. Value semantics (`Copy`);
//!   every shape-dependent operation is checked and returns [`Error`].
//!
//! - [`linalg`]: Householder QR, upper-triangular back-substitution and the
//!   QR-based `solve`. Pivot tolerance is relative by default, absolute on
//!   request.
//!
//! - [`estimate`]: Linear Kalman filter with Joseph-form update and the
//!   planar `[x, y, vx, vy, g]` model, complementary pitch filter, and the
//!   fixed-rate [`Estimator`](estimate::Estimator) tying them together.
//!
//! - [`traits`]: [`FloatScalar`], implemented for `f32` and `f64`.
//!
//! ## Logging
//!
//! Filters emit through the [`log`](https://docs.rs/log) facade: `debug` on
//! construction, `trace` per step, `warn` when an update is rejected. Install
//! any logger in the host application to see them.
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Hardware FPU via system libm |
//! | `libm`  | baseline | Pure-Rust software float fallback |
//! | `serde` | no       | `Serialize`/`Deserialize` for configuration and sensor types |

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod estimate;
pub mod linalg;
pub mod matrix;
pub mod traits;

pub use error::Error;
pub use matrix::{Matrix, MAX_ELEMENTS};
pub use traits::FloatScalar;
