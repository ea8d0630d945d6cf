use crate::error::Error;
use crate::traits::FloatScalar;

use super::attitude::ComplementaryFilter;
use super::kalman::{KalmanFilter, PLANAR_INPUTS, PLANAR_MEASUREMENTS};
use super::tuning::EstimatorConfig;
use super::types::{EstimationRecord, SensorReading, Vec2};

/// Fixed-rate fusion loop: complementary filter for the pitch angle, Kalman
/// filter for planar position and velocity.
///
/// Each tick rotates the body-frame accelerometer into the world frame by
/// the current angle, runs a prediction, and folds in GNSS when the caller
/// flags a fresh fix. The estimate in [`record`](Self::record) only changes
/// when a tick succeeds.
///
/// # Example
///
/// ```
/// use drone_kf::estimate::{Estimator, EstimatorConfig, SensorReading, Vec2};
///
/// let mut est = Estimator::<f64>::new(&EstimatorConfig::default()).unwrap();
/// let hover = SensorReading {
///     accelerometer: Vec2::new(0.0, 9.81),
///     ..Default::default()
/// };
/// for _ in 0..10 {
///     est.step(&hover, false).unwrap();
/// }
/// assert!(est.record().position.y.abs() < 1e-9);
/// assert_eq!(est.ticks(), 10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Estimator<T> {
    kalman: KalmanFilter<T>,
    attitude: ComplementaryFilter<T>,
    dt: T,
    record: EstimationRecord<T>,
    ticks: u64,
    gnss_updates: u64,
}

impl<T: FloatScalar> Estimator<T> {
    /// Planar estimator from a validated configuration.
    pub fn new(config: &EstimatorConfig) -> Result<Self, Error> {
        config.validate()?;
        let dt = T::cast_f64(config.dt);
        let mut kalman = KalmanFilter::planar_with_tuning(dt, &config.tuning)?;
        if let Some(tol) = config.solve_tolerance {
            kalman = kalman.with_solve_tolerance(T::cast_f64(tol))?;
        }
        let attitude = ComplementaryFilter::new(T::cast_f64(config.gyro_weight))?;
        log::debug!(
            "estimator ready: dt={} gyro_weight={}",
            config.dt,
            config.gyro_weight
        );
        Self::from_parts(kalman, attitude, dt)
    }

    /// Assemble from pre-built filters.
    ///
    /// The Kalman filter needs at least four states (position then
    /// velocity), a 2-D input and a 4-D measurement.
    pub fn from_parts(
        kalman: KalmanFilter<T>,
        attitude: ComplementaryFilter<T>,
        dt: T,
    ) -> Result<Self, Error> {
        if !dt.is_finite() || dt <= T::zero() {
            return Err(Error::InvalidSampleInterval);
        }
        let model = kalman.model();
        if model.state_dim() < 4 {
            return Err(Error::mismatch("estimator state", model.f.shape(), (4, 4)));
        }
        if model.input_dim() != PLANAR_INPUTS {
            return Err(Error::mismatch(
                "estimator input",
                model.b.shape(),
                (model.state_dim(), PLANAR_INPUTS),
            ));
        }
        if model.measurement_dim() != PLANAR_MEASUREMENTS {
            return Err(Error::mismatch(
                "estimator measurement",
                model.h.shape(),
                (PLANAR_MEASUREMENTS, model.state_dim()),
            ));
        }

        let mut record = EstimationRecord {
            angle: attitude.angle(),
            ..Default::default()
        };
        write_motion(&mut record, &kalman)?;
        Ok(Self {
            kalman,
            attitude,
            dt,
            record,
            ticks: 0,
            gnss_updates: 0,
        })
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Latest fused estimate.
    #[inline]
    pub fn record(&self) -> &EstimationRecord<T> {
        &self.record
    }

    #[inline]
    pub fn filter(&self) -> &KalmanFilter<T> {
        &self.kalman
    }

    #[inline]
    pub fn attitude(&self) -> &ComplementaryFilter<T> {
        &self.attitude
    }

    #[inline]
    pub fn dt(&self) -> T {
        self.dt
    }

    /// Successful position ticks so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks that included a GNSS update.
    #[inline]
    pub fn gnss_updates(&self) -> u64 {
        self.gnss_updates
    }

    // ── Ticks ───────────────────────────────────────────────────────

    /// Advance the complementary filter and store the new angle.
    pub fn update_attitude(&mut self, reading: &SensorReading<T>) -> T {
        let angle = self
            .attitude
            .update(reading.gyroscope, self.dt, reading.accelerometer);
        self.record.angle = angle;
        angle
    }

    /// One Kalman tick using the angle currently in the record.
    ///
    /// With `gnss_fresh` the tick is predict-and-update against the GNSS
    /// fields of `reading`; otherwise it is a pure prediction.
    pub fn estimate_position(
        &mut self,
        reading: &SensorReading<T>,
        gnss_fresh: bool,
    ) -> Result<&EstimationRecord<T>, Error> {
        let kalman = self.advance_kalman(reading, self.record.angle, gnss_fresh)?;
        self.commit(kalman, gnss_fresh)
    }

    /// Attitude update followed by a position tick at the new angle.
    ///
    /// Both filters are committed together; on error neither moves.
    pub fn step(
        &mut self,
        reading: &SensorReading<T>,
        gnss_fresh: bool,
    ) -> Result<&EstimationRecord<T>, Error> {
        let mut attitude = self.attitude;
        let angle = attitude.update(reading.gyroscope, self.dt, reading.accelerometer);
        let kalman = self.advance_kalman(reading, angle, gnss_fresh)?;
        self.attitude = attitude;
        self.record.angle = angle;
        self.commit(kalman, gnss_fresh)
    }

    fn advance_kalman(
        &self,
        reading: &SensorReading<T>,
        angle: T,
        gnss_fresh: bool,
    ) -> Result<KalmanFilter<T>, Error> {
        let mut kalman = self.kalman;
        kalman.rotate_input(&reading.accelerometer.to_column()?, angle)?;
        if gnss_fresh {
            kalman.predict_and_update(&reading.gnss_measurement()?)?;
        } else {
            kalman.predict()?;
        }
        Ok(kalman)
    }

    fn commit(
        &mut self,
        kalman: KalmanFilter<T>,
        gnss_fresh: bool,
    ) -> Result<&EstimationRecord<T>, Error> {
        write_motion(&mut self.record, &kalman)?;
        self.kalman = kalman;
        self.ticks += 1;
        if gnss_fresh {
            self.gnss_updates += 1;
        }
        log::trace!(
            "tick {}: {} pos=({:.4}, {:.4}) angle={:.4}",
            self.ticks,
            if gnss_fresh { "predict+update" } else { "predict" },
            self.record.position.x.as_f64(),
            self.record.position.y.as_f64(),
            self.record.angle.as_f64()
        );
        Ok(&self.record)
    }
}

fn write_motion<T: FloatScalar>(
    record: &mut EstimationRecord<T>,
    kalman: &KalmanFilter<T>,
) -> Result<(), Error> {
    record.position = Vec2::from(kalman.position()?);
    record.velocity = Vec2::from(kalman.velocity()?);
    Ok(())
}
