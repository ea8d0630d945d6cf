use thiserror::Error;

/// Errors from matrix operations, decompositions and the estimators.
///
/// Every variant is fatal for the operation that produced it: results are
/// never partially written, so the caller's previous values stay valid.
///
/// ```
/// use drone_kf::{Error, Matrix};
///
/// let a = Matrix::<f64>::zeros(2, 3).unwrap();
/// let b = Matrix::<f64>::zeros(2, 2).unwrap();
/// assert!(matches!(a.try_mul(&b), Err(Error::DimensionMismatch { .. })));
/// ```
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch in {op}: {}x{} vs {}x{}", .lhs.0, .lhs.1, .rhs.0, .rhs.1)]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// A triangular pivot is zero or below the solve tolerance.
    #[error("matrix is singular (pivot at row {row})")]
    SingularMatrix { row: usize },

    /// Requested shape does not fit the fixed element store.
    #[error("{rows}x{cols} matrix does not fit the {capacity}-element store")]
    ConfigurationOverflow {
        rows: usize,
        cols: usize,
        capacity: usize,
    },

    /// Checked element access outside the live shape.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Sample interval is not a finite positive number.
    #[error("sample interval must be finite and positive")]
    InvalidSampleInterval,

    /// A tuning or configuration value is out of range.
    #[error("invalid tuning value for `{field}`")]
    InvalidTuning { field: &'static str },

    /// An input vector or measurement holds NaN or infinity.
    #[error("non-finite values in {op}")]
    NonFinite { op: &'static str },
}

impl Error {
    pub(crate) fn mismatch(op: &'static str, lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        Error::DimensionMismatch { op, lhs, rhs }
    }
}
