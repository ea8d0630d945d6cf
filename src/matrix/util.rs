use core::fmt::{self, Write as _};

use crate::error::Error;
use crate::traits::FloatScalar;

use super::{Matrix, MAX_ELEMENTS};

// ── Diagonal helpers ────────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Square matrix with `diag` on the diagonal.
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let d = Matrix::from_diag(&[1.0, 2.0]).unwrap();
    /// assert_eq!(d[(1, 1)], 2.0);
    /// assert_eq!(d[(0, 1)], 0.0);
    /// ```
    pub fn from_diag(diag: &[T]) -> Result<Self, Error> {
        let mut m = Self::zeros(diag.len(), diag.len())?;
        for (i, &v) in diag.iter().enumerate() {
            m[(i, i)] = v;
        }
        Ok(m)
    }

    /// Sum of diagonal elements. Square matrices only.
    pub fn trace(&self) -> Result<T, Error> {
        if !self.is_square() {
            return Err(Error::mismatch("trace", self.shape(), self.shape()));
        }
        let mut sum = T::zero();
        for i in 0..self.nrows {
            sum = sum + self[(i, i)];
        }
        Ok(sum)
    }

    /// Check `|A[i,j] - A[j,i]| <= tol` for every pair.
    pub fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.nrows {
            for j in (i + 1)..self.ncols {
                if (self[(i, j)] - self[(j, i)]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Whether every element is finite.
    pub fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|v| v.is_finite())
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: FloatScalar + fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Find max width per column for alignment
        let mut widths = [0usize; MAX_ELEMENTS];
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                let w = WriteCounting::count(|wc| write!(wc, "{:.4}", self[(i, j)]));
                if w > widths[j] {
                    widths[j] = w;
                }
            }
        }

        for i in 0..self.nrows {
            write!(f, "│")?;
            for j in 0..self.ncols {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$.4}", self[(i, j)], width = widths[j])?;
            }
            write!(f, "│")?;
            if i < self.nrows - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Helper to count characters written, without allocating.
struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.chars().count();
        Ok(())
    }
}
