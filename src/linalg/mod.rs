//! Householder QR, triangular back-substitution and the QR-based linear
//! solver.
//!
//! The solver is the only inversion-avoiding mechanism in the crate: the
//! Kalman gain is obtained by solving `Sᵀ·Kᵀ = (P·Hᵀ)ᵀ` rather than forming
//! `S⁻¹`.
//!
//! ```
//! use drone_kf::Matrix;
//! use drone_kf::linalg::solve;
//!
//! let a = Matrix::new([[4.0_f64, 1.0], [1.0, 3.0]]).unwrap();
//! let b = Matrix::new([[1.0, 0.0], [0.0, 1.0]]).unwrap();
//! let x = solve(&a, &b).unwrap(); // x = a⁻¹
//! let id = a.try_mul(&x).unwrap();
//! assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
//! assert!(id[(1, 0)].abs() < 1e-12);
//! ```

pub(crate) mod qr;

pub use qr::{
    back_substitute, back_substitute_with_tolerance, default_tolerance, householder, solve,
    solve_with_tolerance, QrDecomposition,
};
