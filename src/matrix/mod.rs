mod ops;
mod util;
mod vector;

use core::ops::{Index, IndexMut};

use crate::error::Error;
use crate::traits::FloatScalar;

/// Element capacity of every [`Matrix`].
///
/// Large enough for the 5×5 covariance and the 4×5 / 5×4 gain-sized
/// intermediates of the planar filter.
pub const MAX_ELEMENTS: usize = 32;

/// Dense matrix with runtime shape and fixed-capacity storage.
///
/// Storage is row-major: element `(row, col)` lives at `data[row * ncols + col]`.
/// The backing array always has [`MAX_ELEMENTS`] slots; slots past
/// `nrows * ncols` are kept at zero and never observed. Matrices are `Copy`,
/// so every operation produces a fresh value that shares nothing with its
/// operands. Stack-allocated, no-std compatible.
///
/// # Examples
///
/// ```
/// use drone_kf::Matrix;
///
/// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let b = Matrix::<f64>::eye(3).unwrap();
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matrix<T> {
    data: [T; MAX_ELEMENTS],
    nrows: usize,
    ncols: usize,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Create an `nrows x ncols` matrix filled with zeros.
    ///
    /// Fails with [`Error::ConfigurationOverflow`] when the shape has a zero
    /// dimension or more than [`MAX_ELEMENTS`] elements.
    pub fn zeros(nrows: usize, ncols: usize) -> Result<Self, Error> {
        if nrows == 0 || ncols == 0 || nrows * ncols > MAX_ELEMENTS {
            return Err(Error::ConfigurationOverflow {
                rows: nrows,
                cols: ncols,
                capacity: MAX_ELEMENTS,
            });
        }
        Ok(Self {
            data: [T::zero(); MAX_ELEMENTS],
            nrows,
            ncols,
        })
    }

    /// Create an `n x n` identity matrix.
    pub fn eye(n: usize) -> Result<Self, Error> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        Ok(m)
    }

    /// Create a matrix from a row-major 2D array.
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let m = Matrix::new([[1.0_f32, 2.0, 3.0]]).unwrap();
    /// assert_eq!(m.shape(), (1, 3));
    /// ```
    pub fn new<const R: usize, const C: usize>(rows: [[T; C]; R]) -> Result<Self, Error> {
        let mut m = Self::zeros(R, C)?;
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                m[(i, j)] = v;
            }
        }
        Ok(m)
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Result<Self, Error> {
        let mut m = Self::zeros(nrows, ncols)?;
        if row_major.len() != nrows * ncols {
            return Err(Error::mismatch(
                "from_rows",
                (nrows, ncols),
                (row_major.len(), 1),
            ));
        }
        m.data[..row_major.len()].copy_from_slice(row_major);
        Ok(m)
    }

    /// Create a column vector (`n x 1`) from a slice.
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let v = Matrix::column(&[1.0, 2.0]).unwrap();
    /// assert_eq!(v.shape(), (2, 1));
    /// ```
    pub fn column(values: &[T]) -> Result<Self, Error> {
        Self::from_rows(values.len(), 1, values)
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    pub fn from_fn(
        nrows: usize,
        ncols: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Result<Self, Error> {
        let mut m = Self::zeros(nrows, ncols)?;
        for i in 0..nrows {
            for j in 0..ncols {
                m[(i, j)] = f(i, j);
            }
        }
        Ok(m)
    }
}

// ── Shape and checked access ────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Live elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.nrows * self.ncols]
    }

    #[inline]
    fn check_index(&self, row: usize, col: usize) -> Result<usize, Error> {
        if row >= self.nrows || col >= self.ncols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        Ok(row * self.ncols + col)
    }

    /// Bounds-checked read.
    ///
    /// ```
    /// use drone_kf::{Error, Matrix};
    /// let m = Matrix::<f64>::eye(2).unwrap();
    /// assert_eq!(m.get(1, 1), Ok(1.0));
    /// assert!(matches!(m.get(2, 0), Err(Error::IndexOutOfBounds { .. })));
    /// ```
    pub fn get(&self, row: usize, col: usize) -> Result<T, Error> {
        let idx = self.check_index(row, col)?;
        Ok(self.data[idx])
    }

    /// Bounds-checked write.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), Error> {
        let idx = self.check_index(row, col)?;
        self.data[idx] = value;
        Ok(())
    }
}

// ── Index by (row, col) tuple ───────────────────────────────────────
//
// Panics outside the live shape, even when the slot exists in storage.

impl<T: FloatScalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &self.data[row * self.ncols + col]
    }
}

impl<T: FloatScalar> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &mut self.data[row * self.ncols + col]
    }
}

impl<T: FloatScalar> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.as_slice() == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_and_eye() {
        let z = Matrix::<f64>::zeros(3, 3).unwrap();
        assert_eq!(z[(0, 0)], 0.0);
        assert_eq!(z[(2, 2)], 0.0);

        let id = Matrix::<f64>::eye(3).unwrap();
        assert_eq!(id[(0, 0)], 1.0);
        assert_eq!(id[(1, 1)], 1.0);
        assert_eq!(id[(0, 1)], 0.0);
    }

    #[test]
    fn capacity_is_enforced() {
        assert_eq!(
            Matrix::<f64>::zeros(6, 6).unwrap_err(),
            Error::ConfigurationOverflow { rows: 6, cols: 6, capacity: 32 }
        );
        assert!(Matrix::<f64>::zeros(0, 3).is_err());
        assert!(Matrix::<f64>::eye(6).is_err());
        // 32 elements exactly still fits
        assert!(Matrix::<f64>::zeros(4, 8).is_ok());
    }

    #[test]
    fn new_and_index() {
        let m = Matrix::new([[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(m[(1, 1)], 4.0);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn from_rows_wrong_length() {
        let r = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0]);
        assert!(matches!(r, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn checked_access() {
        let mut m = Matrix::<f32>::zeros(2, 3).unwrap();
        m.set(1, 2, 5.0).unwrap();
        assert_eq!(m.get(1, 2), Ok(5.0));
        assert_eq!(
            m.set(2, 0, 1.0),
            Err(Error::IndexOutOfBounds { row: 2, col: 0, rows: 2, cols: 3 })
        );
        // (0, 3) maps to a valid storage slot but is outside the shape
        assert!(m.get(0, 3).is_err());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_outside_shape_panics() {
        let m = Matrix::<f64>::zeros(2, 2).unwrap();
        let _ = m[(0, 2)];
    }

    #[test]
    fn copies_do_not_alias() {
        let a = Matrix::<f64>::eye(2).unwrap();
        let mut b = a;
        b[(0, 1)] = 7.0;
        assert_eq!(a[(0, 1)], 0.0);
        assert_eq!(b[(0, 1)], 7.0);
    }

    #[test]
    fn equality_compares_shape_and_elements() {
        let row = Matrix::from_rows(1, 2, &[1.0_f64, 2.0]).unwrap();
        let col = Matrix::from_rows(2, 1, &[1.0_f64, 2.0]).unwrap();
        assert_ne!(row, col);
        assert_eq!(row, Matrix::new([[1.0, 2.0]]).unwrap());
    }

    #[test]
    fn from_fn() {
        let m = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64).unwrap();
        assert_eq!(m[(0, 0)], 0.0);
        assert_eq!(m[(1, 1)], 4.0);
        assert_eq!(m[(2, 2)], 8.0);
    }
}
