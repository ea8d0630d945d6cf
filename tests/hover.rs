use approx::assert_abs_diff_eq;
use drone_kf::estimate::{Estimator, EstimatorConfig, SensorReading, Vec2};
use drone_kf::Error;

const DT: f64 = 0.01;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn hover_with_fix(x: f64, y: f64) -> SensorReading<f64> {
    SensorReading {
        accelerometer: Vec2::new(0.0, 9.81),
        gyroscope: 0.0,
        gnss_position: Vec2::new(x, y),
        gnss_velocity: Vec2::new(0.0, 0.0),
    }
}

// ── Convergence ──────────────────────────────────────────────────────

#[test]
fn fifty_ticks_converge_on_gnss_fix() {
    init_logging();

    // Reference Q/R; the position prior is widened to 10 m so fifty ticks
    // are enough to pull the estimate across 10 m.
    let mut config = EstimatorConfig::with_dt(DT);
    config.tuning.initial_position_std = 10.0;
    let mut est = Estimator::<f64>::new(&config).unwrap();

    let reading = hover_with_fix(10.0, 5.0);
    for _ in 0..50 {
        est.step(&reading, true).unwrap();
    }

    let rec = est.record();
    assert_abs_diff_eq!(rec.position.x, 10.0, epsilon = 0.1);
    assert_abs_diff_eq!(rec.position.y, 5.0, epsilon = 0.1);
    assert_abs_diff_eq!(rec.velocity.x, 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(rec.velocity.y, 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(rec.angle, 0.0);
    assert_eq!(est.ticks(), 50);
    assert_eq!(est.gnss_updates(), 50);

    let p = est.filter().covariance();
    assert!(p.is_symmetric(1e-12));
    assert!(p[(0, 0)] < 0.01 && p[(1, 1)] < 0.01);
}

#[test]
fn reference_prior_moves_slowly() {
    init_logging();

    // The reference prior trusts the start position far more than GNSS
    let mut est = Estimator::<f64>::new(&EstimatorConfig::default()).unwrap();
    let reading = hover_with_fix(10.0, 5.0);
    let mut last_x = 0.0;
    for _ in 0..50 {
        let rec = est.step(&reading, true).unwrap();
        assert!(rec.position.x >= last_x);
        last_x = rec.position.x;
    }
    assert!(last_x > 0.0 && last_x < 10.0);
}

#[test]
fn gnss_dropout_coasts_on_prediction() {
    init_logging();

    let mut config = EstimatorConfig::default();
    config.tuning.initial_position_std = 10.0;
    let mut est = Estimator::<f64>::new(&config).unwrap();

    let reading = hover_with_fix(10.0, 5.0);
    for tick in 0..100 {
        // Fix arrives every tenth tick
        est.step(&reading, tick % 10 == 0).unwrap();
    }
    assert_eq!(est.gnss_updates(), 10);
    let rec = est.record();
    assert_abs_diff_eq!(rec.position.x, 10.0, epsilon = 0.5);
    assert_abs_diff_eq!(rec.position.y, 5.0, epsilon = 0.5);
}

// ── Attitude ─────────────────────────────────────────────────────────

#[test]
fn split_attitude_and_position_ticks() {
    init_logging();

    let mut est = Estimator::<f64>::new(&EstimatorConfig::default()).unwrap();
    let reading = SensorReading {
        accelerometer: Vec2::new(0.0, 9.81),
        gyroscope: 0.2,
        ..Default::default()
    };
    let angle = est.update_attitude(&reading);
    assert_abs_diff_eq!(angle, 0.99 * 0.2 * DT, epsilon = 1e-15);
    assert_eq!(est.ticks(), 0);

    est.estimate_position(&reading, false).unwrap();
    assert_eq!(est.ticks(), 1);
    assert_abs_diff_eq!(est.record().angle, angle);

    // Tilted thrust pushes the vehicle toward -x
    let u = est.filter().input();
    assert!(u[(0, 0)] < 0.0);
}

// ── Configuration errors ─────────────────────────────────────────────

#[test]
fn rejects_bad_configuration() {
    assert_eq!(
        Estimator::<f64>::new(&EstimatorConfig::with_dt(0.0)).unwrap_err(),
        Error::InvalidSampleInterval
    );

    let mut config = EstimatorConfig::default();
    config.tuning.initial_velocity_std = f64::NAN;
    assert!(matches!(
        Estimator::<f32>::new(&config),
        Err(Error::InvalidTuning { .. })
    ));
}
