use crate::error::Error;
use crate::traits::FloatScalar;

use super::Matrix;

// Column vectors are plain `n x 1` matrices; these helpers cover the vector
// arithmetic used by the Householder sweep.

impl<T: FloatScalar> Matrix<T> {
    /// Unit column vector of length `n` with a 1 at index `i` (zero based).
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let e = Matrix::<f64>::basis_vector(3, 1).unwrap();
    /// assert_eq!(e.as_slice(), &[0.0, 1.0, 0.0]);
    /// ```
    pub fn basis_vector(n: usize, i: usize) -> Result<Self, Error> {
        let mut v = Self::zeros(n, 1)?;
        v.set(i, 0, T::one())?;
        Ok(v)
    }

    /// Extract column `j` as an `nrows x 1` column vector.
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let m = Matrix::new([[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(m.column_at(1).unwrap().as_slice(), &[2.0, 4.0]);
    /// ```
    pub fn column_at(&self, j: usize) -> Result<Self, Error> {
        if j >= self.ncols {
            return Err(Error::IndexOutOfBounds {
                row: 0,
                col: j,
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        let mut v = Self::zeros(self.nrows, 1)?;
        for i in 0..self.nrows {
            v[(i, 0)] = self[(i, j)];
        }
        Ok(v)
    }

    /// Euclidean magnitude `sqrt(Σ v_i²)` over every element.
    ///
    /// For a matrix this is the Frobenius norm.
    pub fn magnitude(&self) -> T {
        let mut sum = T::zero();
        for &v in self.as_slice() {
            sum = sum + v * v;
        }
        sum.sqrt()
    }

    /// `selfᵀ · self`.
    ///
    /// A 1×1 matrix holding the squared magnitude for a column vector.
    pub fn outer_self_product(&self) -> Result<Self, Error> {
        self.transpose().try_mul(self)
    }

    /// `(selfᵀ · self)[0, 0]`: the squared magnitude of the first column.
    pub fn scalar_self_product(&self) -> T {
        let mut sum = T::zero();
        for i in 0..self.nrows {
            let v = self[(i, 0)];
            sum = sum + v * v;
        }
        sum
    }
}
