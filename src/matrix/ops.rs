use core::ops::{Mul, Neg};

use crate::error::Error;
use crate::traits::FloatScalar;

use super::Matrix;

// Matrix-matrix arithmetic is fallible (shapes are runtime values), so it is
// exposed as `try_*` methods rather than operator impls.

// ── Element-wise addition / subtraction ─────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    fn zip_with(&self, rhs: &Self, op: &'static str, f: impl Fn(T, T) -> T) -> Result<Self, Error> {
        if self.shape() != rhs.shape() {
            return Err(Error::mismatch(op, self.shape(), rhs.shape()));
        }
        let mut out = Self::zeros(self.nrows, self.ncols)?;
        let n = self.nrows * self.ncols;
        for k in 0..n {
            out.data[k] = f(self.data[k], rhs.data[k]);
        }
        Ok(out)
    }

    /// Element-wise sum `self + rhs`.
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let a = Matrix::new([[1.0, 2.0]]).unwrap();
    /// let b = Matrix::new([[3.0, 4.0]]).unwrap();
    /// assert_eq!(a.try_add(&b).unwrap(), Matrix::new([[4.0, 6.0]]).unwrap());
    /// ```
    pub fn try_add(&self, rhs: &Self) -> Result<Self, Error> {
        self.zip_with(rhs, "add", |a, b| a + b)
    }

    /// Element-wise difference `self - rhs`.
    pub fn try_sub(&self, rhs: &Self) -> Result<Self, Error> {
        self.zip_with(rhs, "subtract", |a, b| a - b)
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Matrix product `self * rhs`.
    ///
    /// Fails with [`Error::DimensionMismatch`] when `self.ncols() != rhs.nrows()`
    /// (checked before any element is read) and with
    /// [`Error::ConfigurationOverflow`] when the product does not fit.
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// let b = Matrix::column(&[1.0, 1.0]).unwrap();
    /// assert_eq!(a.try_mul(&b).unwrap().as_slice(), &[3.0, 7.0]);
    /// ```
    pub fn try_mul(&self, rhs: &Self) -> Result<Self, Error> {
        if self.ncols != rhs.nrows {
            return Err(Error::mismatch("multiply", self.shape(), rhs.shape()));
        }
        let mut out = Self::zeros(self.nrows, rhs.ncols)?;
        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let mut sum = T::zero();
                for k in 0..self.ncols {
                    sum = sum + self[(i, k)] * rhs[(k, j)];
                }
                out[(i, j)] = sum;
            }
        }
        Ok(out)
    }

    /// Transpose. Always succeeds: the element count is unchanged.
    pub fn transpose(&self) -> Self {
        let mut out = Self {
            data: [T::zero(); super::MAX_ELEMENTS],
            nrows: self.ncols,
            ncols: self.nrows,
        };
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                out[(j, i)] = self[(i, j)];
            }
        }
        out
    }

    /// Multiply every element by `s`.
    pub fn scale(&self, s: T) -> Self {
        let mut out = *self;
        let n = self.nrows * self.ncols;
        for k in 0..n {
            out.data[k] = self.data[k] * s;
        }
        out
    }
}

// ── Scalar multiplication: matrix * scalar ──────────────────────────

impl<T: FloatScalar> Mul<T> for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        self.scale(rhs)
    }
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: FloatScalar> Neg for Matrix<T> {
    type Output = Self;

    fn neg(self) -> Self {
        self.scale(-T::one())
    }
}
