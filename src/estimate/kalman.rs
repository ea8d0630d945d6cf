use crate::error::Error;
use crate::linalg;
use crate::traits::FloatScalar;
use crate::Matrix;

use super::tuning::FilterTuning;

/// Number of states in the planar model: `[x, y, vx, vy, g]`.
pub const PLANAR_STATES: usize = 5;
/// Number of inputs in the planar model: world-frame `[ax, ay]`.
pub const PLANAR_INPUTS: usize = 2;
/// Number of GNSS observations: `[x, y, vx, vy]`.
pub const PLANAR_MEASUREMENTS: usize = 4;

/// Linear time-invariant model `x' = F·x + B·u + w`, `z = H·x + v`.
///
/// `w ~ N(0, Q)` and `v ~ N(0, R)`. Shapes are checked by
/// [`validate`](Self::validate); every constructor in this crate calls it.
#[derive(Debug, Clone, Copy)]
pub struct LinearModel<T> {
    /// State transition, `n x n`.
    pub f: Matrix<T>,
    /// Input matrix, `n x m`.
    pub b: Matrix<T>,
    /// Observation matrix, `k x n`.
    pub h: Matrix<T>,
    /// Process noise covariance, `n x n`.
    pub q: Matrix<T>,
    /// Measurement noise covariance, `k x k`.
    pub r: Matrix<T>,
}

impl<T: FloatScalar> LinearModel<T> {
    /// Planar drone model for a fixed sample interval `dt`.
    ///
    /// Position integrates velocity, velocity integrates the input, and the
    /// gravity state feeds the vertical channel:
    ///
    /// ```text
    ///     ┌ 1  0  dt  0   0      ┐        ┌ dt²/2  0     ┐
    ///     │ 0  1  0   dt  dt²/2  │        │ 0      dt²/2 │
    /// F = │ 0  0  1   0   0      │    B = │ dt     0     │
    ///     │ 0  0  0   1   dt     │        │ 0      dt    │
    ///     └ 0  0  0   0   1      ┘        └ 0      0     ┘
    /// ```
    ///
    /// `H` selects the first four states.
    pub fn planar(dt: T, tuning: &FilterTuning) -> Result<Self, Error> {
        if !dt.is_finite() || dt <= T::zero() {
            return Err(Error::InvalidSampleInterval);
        }
        tuning.validate()?;

        let half = T::cast_f64(0.5);
        let half_dt2 = half * dt * dt;

        let mut f = Matrix::eye(PLANAR_STATES)?;
        f[(0, 2)] = dt;
        f[(1, 3)] = dt;
        f[(1, 4)] = half_dt2;
        f[(3, 4)] = dt;

        let mut b = Matrix::zeros(PLANAR_STATES, PLANAR_INPUTS)?;
        b[(0, 0)] = half_dt2;
        b[(1, 1)] = half_dt2;
        b[(2, 0)] = dt;
        b[(3, 1)] = dt;

        let h = Matrix::from_fn(PLANAR_MEASUREMENTS, PLANAR_STATES, |i, j| {
            if i == j {
                T::one()
            } else {
                T::zero()
            }
        })?;

        let dt64 = dt.as_f64();
        let qp = tuning.position_process_std(dt64);
        let qv = tuning.velocity_process_std(dt64);
        let q = Matrix::from_diag(&[
            T::cast_f64(qp * qp),
            T::cast_f64(qp * qp),
            T::cast_f64(qv * qv),
            T::cast_f64(qv * qv),
            T::zero(),
        ])?;

        let rs = tuning.measurement_std();
        let r = Matrix::from_diag(&rs.map(|s| T::cast_f64(s * s)))?;

        let model = Self { f, b, h, q, r };
        model.validate()?;
        Ok(model)
    }

    /// State dimension `n`.
    pub fn state_dim(&self) -> usize {
        self.f.nrows()
    }

    /// Input dimension `m`.
    pub fn input_dim(&self) -> usize {
        self.b.ncols()
    }

    /// Measurement dimension `k`.
    pub fn measurement_dim(&self) -> usize {
        self.h.nrows()
    }

    /// Check that `F, B, H, Q, R` have mutually consistent shapes.
    pub fn validate(&self) -> Result<(), Error> {
        let n = self.f.nrows();
        if !self.f.is_square() {
            return Err(Error::mismatch("model F", self.f.shape(), (n, n)));
        }
        if self.b.nrows() != n {
            return Err(Error::mismatch("model B", self.b.shape(), (n, self.b.ncols())));
        }
        if self.h.ncols() != n {
            return Err(Error::mismatch("model H", self.h.shape(), (self.h.nrows(), n)));
        }
        if self.q.shape() != (n, n) {
            return Err(Error::mismatch("model Q", self.q.shape(), (n, n)));
        }
        let k = self.h.nrows();
        if self.r.shape() != (k, k) {
            return Err(Error::mismatch("model R", self.r.shape(), (k, k)));
        }
        Ok(())
    }
}

/// Linear Kalman filter with a Joseph-form covariance update.
///
/// Every step is computed into temporaries and committed only when it
/// succeeds; a failing step leaves state, covariance and input untouched.
///
/// The gain is never formed through an explicit inverse. With
/// `S = H·P·Hᵀ + R` the filter solves `Sᵀ·Kᵀ = (P·Hᵀ)ᵀ` by Householder QR
/// and transposes the result.
///
/// # Example
///
/// ```
/// use drone_kf::estimate::KalmanFilter;
/// use drone_kf::Matrix;
///
/// let mut kf = KalmanFilter::<f64>::planar(0.01).unwrap();
///
/// // Hovering: body thrust cancels gravity
/// kf.rotate_input(&Matrix::column(&[0.0, 9.81]).unwrap(), 0.0).unwrap();
/// kf.predict().unwrap();
/// assert!(kf.position().unwrap()[1].abs() < 1e-12);
///
/// // GNSS fix at (1, 2), at rest
/// let z = Matrix::column(&[1.0, 2.0, 0.0, 0.0]).unwrap();
/// kf.predict_and_update(&z).unwrap();
/// assert!(kf.position().unwrap()[0] > 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KalmanFilter<T> {
    model: LinearModel<T>,
    x: Matrix<T>,
    p: Matrix<T>,
    u: Matrix<T>,
    innovation: Option<Matrix<T>>,
    solve_tolerance: Option<T>,
}

impl<T: FloatScalar> KalmanFilter<T> {
    /// Filter over an arbitrary linear model.
    ///
    /// `x0` must be `n x 1` and `p0` must be `n x n`. The input starts at zero.
    pub fn new(model: LinearModel<T>, x0: Matrix<T>, p0: Matrix<T>) -> Result<Self, Error> {
        model.validate()?;
        let n = model.state_dim();
        if x0.shape() != (n, 1) {
            return Err(Error::mismatch("initial state", x0.shape(), (n, 1)));
        }
        if p0.shape() != (n, n) {
            return Err(Error::mismatch("initial covariance", p0.shape(), (n, n)));
        }
        let u = Matrix::zeros(model.input_dim(), 1)?;
        Ok(Self {
            model,
            x: x0,
            p: p0,
            u,
            innovation: None,
            solve_tolerance: None,
        })
    }

    /// Planar drone filter with the reference tuning.
    pub fn planar(dt: T) -> Result<Self, Error> {
        Self::planar_with_tuning(dt, &FilterTuning::default())
    }

    /// Planar drone filter with a custom tuning.
    ///
    /// Initial state is `[0, 0, 0, 0, gravity]`; the initial covariance is
    /// diagonal with zero variance on the gravity state.
    pub fn planar_with_tuning(dt: T, tuning: &FilterTuning) -> Result<Self, Error> {
        let model = LinearModel::planar(dt, tuning)?;

        let mut x0 = Matrix::zeros(PLANAR_STATES, 1)?;
        x0[(4, 0)] = T::cast_f64(tuning.gravity);

        let sp = tuning.initial_position_std;
        let sv = tuning.initial_velocity_std;
        let p0 = Matrix::from_diag(&[
            T::cast_f64(sp * sp),
            T::cast_f64(sp * sp),
            T::cast_f64(sv * sv),
            T::cast_f64(sv * sv),
            T::zero(),
        ])?;

        log::debug!(
            "planar kalman filter: dt={} gravity={} p0_pos={:e} p0_vel={:e}",
            dt.as_f64(),
            tuning.gravity,
            sp * sp,
            sv * sv
        );
        Self::new(model, x0, p0)
    }

    /// Use an absolute pivot tolerance for the gain solve instead of the
    /// default relative one.
    ///
    /// Fails with [`Error::InvalidTuning`] unless `tol` is finite and
    /// non-negative.
    pub fn with_solve_tolerance(mut self, tol: T) -> Result<Self, Error> {
        if !tol.is_finite() || tol < T::zero() {
            return Err(Error::InvalidTuning { field: "solve_tolerance" });
        }
        self.solve_tolerance = Some(tol);
        Ok(self)
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Current state estimate, `n x 1`.
    #[inline]
    pub fn state(&self) -> &Matrix<T> {
        &self.x
    }

    /// Current state covariance, `n x n`.
    #[inline]
    pub fn covariance(&self) -> &Matrix<T> {
        &self.p
    }

    /// Input applied by the next prediction, `m x 1`.
    #[inline]
    pub fn input(&self) -> &Matrix<T> {
        &self.u
    }

    #[inline]
    pub fn model(&self) -> &LinearModel<T> {
        &self.model
    }

    /// Innovation `z - H·x_pred` of the most recent update, if any.
    #[inline]
    pub fn last_innovation(&self) -> Option<&Matrix<T>> {
        self.innovation.as_ref()
    }

    /// States 0 and 1 (planar position).
    pub fn position(&self) -> Result<[T; 2], Error> {
        Ok([self.x.get(0, 0)?, self.x.get(1, 0)?])
    }

    /// States 2 and 3 (planar velocity).
    pub fn velocity(&self) -> Result<[T; 2], Error> {
        Ok([self.x.get(2, 0)?, self.x.get(3, 0)?])
    }

    // ── Input ───────────────────────────────────────────────────────

    /// Replace the input vector. Must be `m x 1` and finite.
    pub fn set_input(&mut self, u: &Matrix<T>) -> Result<(), Error> {
        let expected = (self.model.input_dim(), 1);
        if u.shape() != expected {
            return Err(Error::mismatch("set input", u.shape(), expected));
        }
        if !u.is_finite() {
            return Err(Error::NonFinite { op: "set input" });
        }
        self.u = *u;
        Ok(())
    }

    /// Rotate a body-frame 2-vector into the world frame by `angle` radians
    /// and store it as the input.
    ///
    /// The rotation is `[[cos, -sin], [sin, cos]]`. Returns the rotated
    /// vector.
    pub fn rotate_input(&mut self, u_body: &Matrix<T>, angle: T) -> Result<Matrix<T>, Error> {
        if u_body.shape() != (2, 1) {
            return Err(Error::mismatch("rotate input", u_body.shape(), (2, 1)));
        }
        let (s, c) = angle.sin_cos();
        let rot = Matrix::new([[c, -s], [s, c]])?;
        let u = rot.try_mul(u_body)?;
        self.set_input(&u)?;
        Ok(u)
    }

    // ── Steps ───────────────────────────────────────────────────────

    /// `x = F·x + B·u`, `P = F·P·Fᵀ + Q`, without committing.
    fn propagate(&self) -> Result<(Matrix<T>, Matrix<T>), Error> {
        let LinearModel { f, b, q, .. } = &self.model;
        let x = f.try_mul(&self.x)?.try_add(&b.try_mul(&self.u)?)?;
        let p = f.try_mul(&self.p)?.try_mul(&f.transpose())?.try_add(q)?;
        Ok((x, p))
    }

    /// Time update.
    pub fn predict(&mut self) -> Result<(), Error> {
        let (x, p) = self.propagate()?;
        self.x = x;
        self.p = p;
        log::trace!("kalman predict: trace(P)={:e}", self.p.trace()?.as_f64());
        Ok(())
    }

    /// Time update followed by a measurement update with `z` (`k x 1`).
    ///
    /// Uses the Joseph form `P = (I - K·H)·P·(I - K·H)ᵀ + K·R·Kᵀ`.
    /// Returns [`Error::NonFinite`] for a measurement holding NaN or infinity
    /// and [`Error::SingularMatrix`] if the innovation covariance cannot be
    /// solved against; nothing is committed in either case.
    pub fn predict_and_update(&mut self, z: &Matrix<T>) -> Result<(), Error> {
        let k_dim = self.model.measurement_dim();
        if z.shape() != (k_dim, 1) {
            return Err(Error::mismatch("measurement", z.shape(), (k_dim, 1)));
        }
        if !z.is_finite() {
            log::warn!("kalman update rejected: non-finite measurement");
            return Err(Error::NonFinite { op: "measurement" });
        }

        let (x_pred, p_pred) = self.propagate()?;
        let LinearModel { h, r, .. } = &self.model;

        let y = z.try_sub(&h.try_mul(&x_pred)?)?;
        let p_ht = p_pred.try_mul(&h.transpose())?;
        let s = h.try_mul(&p_ht)?.try_add(r)?;

        let kt = match self.solve_tolerance {
            Some(tol) => linalg::solve_with_tolerance(&s.transpose(), &p_ht.transpose(), tol),
            None => linalg::solve(&s.transpose(), &p_ht.transpose()),
        }
        .map_err(|e| {
            log::warn!("kalman update rejected: {}", e);
            e
        })?;
        let gain = kt.transpose();

        let x = x_pred.try_add(&gain.try_mul(&y)?)?;

        let i_kh = Matrix::eye(self.model.state_dim())?.try_sub(&gain.try_mul(h)?)?;
        let p = i_kh
            .try_mul(&p_pred)?
            .try_mul(&i_kh.transpose())?
            .try_add(&gain.try_mul(r)?.try_mul(&kt)?)?;

        self.x = x;
        self.p = p;
        self.innovation = Some(y);
        log::trace!(
            "kalman update: |y|={:e} trace(P)={:e}",
            y.magnitude().as_f64(),
            self.p.trace()?.as_f64()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn planar_model_entries() {
        let dt = 0.01;
        let m = LinearModel::<f64>::planar(dt, &FilterTuning::default()).unwrap();
        assert_eq!(m.f.shape(), (5, 5));
        assert_eq!(m.b.shape(), (5, 2));
        assert_eq!(m.h.shape(), (4, 5));
        assert_eq!(m.f[(0, 2)], dt);
        assert_eq!(m.f[(1, 4)], 0.5 * dt * dt);
        assert_eq!(m.f[(3, 4)], dt);
        assert_eq!(m.f[(4, 4)], 1.0);
        assert_eq!(m.b[(1, 1)], 0.5 * dt * dt);
        assert_eq!(m.b[(3, 1)], dt);
        assert_eq!(m.b[(4, 0)], 0.0);
        for i in 0..4 {
            for j in 0..5 {
                assert_eq!(m.h[(i, j)], if i == j { 1.0 } else { 0.0 });
            }
        }
        assert_near(m.r[(0, 0)], 0.165 * 0.165, 1e-15, "R xx");
        assert_near(m.r[(1, 1)], 0.265 * 0.265, 1e-15, "R yy");
        assert_eq!(m.q[(4, 4)], 0.0);
    }

    #[test]
    fn planar_initial_state() {
        let kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        assert_eq!(kf.state().as_slice(), &[0.0, 0.0, 0.0, 0.0, -9.81]);
        assert_near(kf.covariance()[(0, 0)], 2.5e-5, 1e-18, "P0 pos");
        assert_near(kf.covariance()[(2, 2)], 2.5e-7, 1e-20, "P0 vel");
        assert_eq!(kf.covariance()[(4, 4)], 0.0);
        assert_eq!(kf.input().shape(), (2, 1));
        assert!(kf.last_innovation().is_none());
    }

    #[test]
    fn bad_sample_interval() {
        assert_eq!(
            KalmanFilter::<f64>::planar(0.0).unwrap_err(),
            Error::InvalidSampleInterval
        );
        assert_eq!(
            KalmanFilter::<f64>::planar(-0.01).unwrap_err(),
            Error::InvalidSampleInterval
        );
        assert_eq!(
            KalmanFilter::<f64>::planar(f64::INFINITY).unwrap_err(),
            Error::InvalidSampleInterval
        );
    }

    #[test]
    fn model_shape_checks() {
        let mut m = LinearModel::<f64>::planar(0.01, &FilterTuning::default()).unwrap();
        m.r = Matrix::eye(3).unwrap();
        assert!(matches!(
            m.validate(),
            Err(Error::DimensionMismatch { op: "model R", .. })
        ));

        let m = LinearModel::<f64>::planar(0.01, &FilterTuning::default()).unwrap();
        let x0 = Matrix::zeros(4, 1).unwrap();
        let p0 = Matrix::eye(5).unwrap();
        assert!(KalmanFilter::new(m, x0, p0).is_err());
    }

    #[test]
    fn rotate_input_quarter_turn() {
        let mut kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        let u = kf
            .rotate_input(&Matrix::column(&[1.0, 0.0]).unwrap(), core::f64::consts::FRAC_PI_2)
            .unwrap();
        assert_near(u[(0, 0)], 0.0, 1e-15, "ux");
        assert_near(u[(1, 0)], 1.0, 1e-15, "uy");
        assert_eq!(kf.input(), &u);

        let bad = Matrix::column(&[1.0, 0.0, 0.0]).unwrap();
        assert!(kf.rotate_input(&bad, 0.0).is_err());
        assert_eq!(kf.input(), &u);
    }

    #[test]
    fn predict_integrates_input() {
        let dt = 0.1;
        let mut kf = KalmanFilter::<f64>::planar(dt).unwrap();
        // 1 m/s² along x, thrust cancels gravity along y
        kf.set_input(&Matrix::column(&[1.0, 9.81]).unwrap()).unwrap();
        kf.predict().unwrap();
        let [px, py] = kf.position().unwrap();
        let [vx, vy] = kf.velocity().unwrap();
        assert_near(px, 0.5 * dt * dt, 1e-15, "px");
        assert_near(vx, dt, 1e-15, "vx");
        assert_near(py, 0.0, 1e-15, "py");
        assert_near(vy, 0.0, 1e-15, "vy");
        assert_eq!(kf.state()[(4, 0)], -9.81);
    }

    #[test]
    fn update_records_innovation() {
        let mut kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        kf.set_input(&Matrix::column(&[0.0, 9.81]).unwrap()).unwrap();
        let z = Matrix::column(&[1.0, -1.0, 0.0, 0.0]).unwrap();
        kf.predict_and_update(&z).unwrap();
        let y = kf.last_innovation().unwrap();
        assert_near(y[(0, 0)], 1.0, 1e-12, "y0");
        assert_near(y[(1, 0)], -1.0, 1e-12, "y1");
        let [px, py] = kf.position().unwrap();
        assert!(px > 0.0 && px < 1.0);
        assert!(py < 0.0 && py > -1.0);
        assert!(kf.covariance().is_symmetric(1e-12));
    }

    #[test]
    fn update_wrong_measurement_shape_is_atomic() {
        let mut kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        let before = kf;
        let z = Matrix::column(&[1.0, 2.0]).unwrap();
        assert!(matches!(
            kf.predict_and_update(&z),
            Err(Error::DimensionMismatch { op: "measurement", .. })
        ));
        assert_eq!(kf.state(), before.state());
        assert_eq!(kf.covariance(), before.covariance());
    }

    #[test]
    fn singular_innovation_is_atomic() {
        // Zero covariance and zero measurement noise make S = 0
        let mut model = LinearModel::<f64>::planar(0.01, &FilterTuning::default()).unwrap();
        model.q = Matrix::zeros(5, 5).unwrap();
        model.r = Matrix::zeros(4, 4).unwrap();
        let x0 = Matrix::zeros(5, 1).unwrap();
        let p0 = Matrix::zeros(5, 5).unwrap();
        let mut kf = KalmanFilter::new(model, x0, p0).unwrap();

        let z = Matrix::column(&[1.0, 1.0, 0.0, 0.0]).unwrap();
        assert!(matches!(
            kf.predict_and_update(&z),
            Err(Error::SingularMatrix { .. })
        ));
        assert_eq!(kf.state(), &x0);
        assert!(kf.last_innovation().is_none());
    }

    #[test]
    fn solve_tolerance_must_be_finite_and_non_negative() {
        let kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        for tol in [f64::NAN, f64::INFINITY, -1e-9] {
            assert_eq!(
                kf.with_solve_tolerance(tol).unwrap_err(),
                Error::InvalidTuning { field: "solve_tolerance" }
            );
        }
        assert!(kf.with_solve_tolerance(1e-9).is_ok());
    }

    #[test]
    fn non_finite_measurement_is_rejected() {
        let mut kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        let before = kf;
        let z = Matrix::column(&[f64::NAN, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(
            kf.predict_and_update(&z).unwrap_err(),
            Error::NonFinite { op: "measurement" }
        );
        assert_eq!(kf.state(), before.state());
        assert_eq!(kf.covariance(), before.covariance());
        assert!(kf.state().is_finite());
        assert!(kf.last_innovation().is_none());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        let u = Matrix::column(&[0.0, f64::INFINITY]).unwrap();
        assert_eq!(
            kf.set_input(&u).unwrap_err(),
            Error::NonFinite { op: "set input" }
        );
        assert!(kf.rotate_input(&u, 0.1).is_err());
        assert_eq!(kf.input(), &Matrix::zeros(2, 1).unwrap());
    }

    #[test]
    fn model_copy_is_independent() {
        let a = LinearModel::<f64>::planar(0.01, &FilterTuning::default()).unwrap();
        let mut b = a;
        b.q = Matrix::zeros(5, 5).unwrap();
        let qp = FilterTuning::default().position_process_std(0.01);
        assert_eq!(a.q[(0, 0)], qp * qp);
        assert_eq!(b.f, a.f);
        assert_ne!(b.q, a.q);
    }
}
