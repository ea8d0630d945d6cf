use criterion::{criterion_group, criterion_main, Criterion};

use drone_kf::estimate::{Estimator, EstimatorConfig, KalmanFilter, SensorReading, Vec2};
use drone_kf::linalg::solve;
use drone_kf::Matrix;

fn reading() -> SensorReading<f64> {
    SensorReading {
        accelerometer: Vec2::new(0.1, 9.81),
        gyroscope: 0.01,
        gnss_position: Vec2::new(10.0, 5.0),
        gnss_velocity: Vec2::new(0.0, 0.0),
    }
}

// ---------------------------------------------------------------------------
// Linear algebra
// ---------------------------------------------------------------------------

fn qr_solve_4x4(c: &mut Criterion) {
    let a = Matrix::from_fn(4, 4, |i, j| ((i + 1) * (j + 1)) as f64 + if i == j { 10.0 } else { 0.0 })
        .unwrap();
    let b = Matrix::from_fn(4, 5, |i, j| (i + 2 * j) as f64).unwrap();
    c.bench_function("qr_solve_4x4", |bench| {
        bench.iter(|| solve(std::hint::black_box(&a), std::hint::black_box(&b)))
    });
}

// ---------------------------------------------------------------------------
// Filter ticks
// ---------------------------------------------------------------------------

fn kalman_ticks(c: &mut Criterion) {
    let mut g = c.benchmark_group("kalman_tick");
    let z = Matrix::column(&[10.0, 5.0, 0.0, 0.0]).unwrap();

    g.bench_function("predict", |bench| {
        let mut kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        bench.iter(|| std::hint::black_box(&mut kf).predict())
    });
    g.bench_function("predict_and_update", |bench| {
        let mut kf = KalmanFilter::<f64>::planar(0.01).unwrap();
        bench.iter(|| std::hint::black_box(&mut kf).predict_and_update(std::hint::black_box(&z)))
    });
    g.finish();
}

fn estimator_step(c: &mut Criterion) {
    let mut g = c.benchmark_group("estimator_step");
    let r = reading();

    g.bench_function("f64", |bench| {
        let mut est = Estimator::<f64>::new(&EstimatorConfig::default()).unwrap();
        bench.iter(|| est.step(std::hint::black_box(&r), true).map(|rec| rec.position))
    });
    g.bench_function("f32", |bench| {
        let mut est = Estimator::<f32>::new(&EstimatorConfig::default()).unwrap();
        let r32 = SensorReading {
            accelerometer: Vec2::new(0.1_f32, 9.81),
            gyroscope: 0.01,
            gnss_position: Vec2::new(10.0, 5.0),
            gnss_velocity: Vec2::new(0.0, 0.0),
        };
        bench.iter(|| est.step(std::hint::black_box(&r32), true).map(|rec| rec.position))
    });
    g.finish();
}

criterion_group!(benches, qr_solve_4x4, kalman_ticks, estimator_step);
criterion_main!(benches);
