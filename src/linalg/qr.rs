use crate::error::Error;
use crate::traits::FloatScalar;
use crate::Matrix;

/// Householder reflector `H = I - 2·u·uᵀ / (uᵀu)`.
///
/// `u` is a column vector of length `n`; the result is `n x n`. A zero `u`
/// defines no reflector and fails with [`Error::SingularMatrix`]; a
/// non-finite `u` fails with [`Error::NonFinite`].
pub fn householder<T: FloatScalar>(u: &Matrix<T>) -> Result<Matrix<T>, Error> {
    if u.ncols() != 1 {
        return Err(Error::mismatch("householder", u.shape(), (u.nrows(), 1)));
    }
    if !u.is_finite() {
        return Err(Error::NonFinite { op: "householder" });
    }
    let utu = u.scalar_self_product();
    if utu <= T::zero() {
        return Err(Error::SingularMatrix { row: 0 });
    }
    // Row vector uᵀ gives (uᵀ)ᵀ·uᵀ = u·uᵀ
    let uut = u.transpose().outer_self_product()?;
    let two = T::one() + T::one();
    Matrix::eye(u.nrows())?.try_sub(&uut.scale(two / utu))
}

/// Reflection vector that maps column `i` of `r` (rows `i..`) onto `+m·e_i`.
///
/// Returns `None` when the sub-column is already reduced, i.e. it has no
/// energy below the diagonal and a non-negative pivot.
fn reflection_vector<T: FloatScalar>(r: &Matrix<T>, i: usize) -> Result<Option<Matrix<T>>, Error> {
    let mut x = r.column_at(i)?;
    for k in 0..i {
        x[(k, 0)] = T::zero();
    }

    let m = x.magnitude();
    let xi = x[(i, 0)];
    let mut tail = T::zero();
    for k in (i + 1)..x.nrows() {
        tail = tail + x[(k, 0)] * x[(k, 0)];
    }

    let floor = T::epsilon() * m;
    if m == T::zero() || (xi >= T::zero() && tail <= floor * floor) {
        return Ok(None);
    }

    // u = x - m·e_i. For xi > 0 the pivot entry xi - m cancels; use the
    // equivalent (xi² - m²) / (xi + m) = -tail / (xi + m).
    x[(i, 0)] = if xi > T::zero() { -tail / (xi + m) } else { xi - m };
    Ok(Some(x))
}

/// QR decomposition of a matrix (`rows >= cols`) by explicit Householder
/// reflections.
///
/// Each sweep step `i` reflects column `i` of the running R onto `+m·e_i` and
/// accumulates `Q ← H·Q`, `R ← H·R`; Q is transposed at the end so that
/// `Q·R == A`. Q is `rows x rows`, R is `rows x cols`. Every reflected pivot
/// is non-negative; the last row of a square input has no reflector and
/// keeps its sign.
///
/// # Example
///
/// ```
/// use drone_kf::Matrix;
///
/// let a = Matrix::new([[12.0_f64, -51.0, 4.0], [6.0, 167.0, -68.0], [-4.0, 24.0, -41.0]]).unwrap();
/// let qr = a.qr().unwrap();
/// let back = qr.q().try_mul(qr.r()).unwrap();
/// assert!((back[(1, 2)] + 68.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QrDecomposition<T> {
    q: Matrix<T>,
    r: Matrix<T>,
    reflections: usize,
}

impl<T: FloatScalar> QrDecomposition<T> {
    /// Decompose `a`.
    ///
    /// Fails with [`Error::DimensionMismatch`] when `a` has fewer rows than
    /// columns, or [`Error::ConfigurationOverflow`] when the `rows x rows`
    /// Q does not fit.
    pub fn new(a: &Matrix<T>) -> Result<Self, Error> {
        let (m, n) = a.shape();
        if m < n {
            return Err(Error::mismatch("qr", a.shape(), (n, n)));
        }

        let mut q = Matrix::eye(m)?;
        let mut r = *a;
        let mut reflections = 0;

        for i in 0..(m - 1).min(n) {
            let Some(u) = reflection_vector(&r, i)? else {
                continue;
            };
            let h = householder(&u)?;
            q = h.try_mul(&q)?;
            r = h.try_mul(&r)?;
            reflections += 1;
        }

        Ok(Self {
            q: q.transpose(),
            r,
            reflections,
        })
    }

    /// Orthogonal factor (`rows x rows`).
    #[inline]
    pub fn q(&self) -> &Matrix<T> {
        &self.q
    }

    /// Upper-triangular factor (`rows x cols`).
    #[inline]
    pub fn r(&self) -> &Matrix<T> {
        &self.r
    }

    /// Solve `A·X = B` for square `A` using [`default_tolerance`].
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, Error> {
        self.solve_with_tolerance(b, default_tolerance(&self.r))
    }

    /// Solve `A·X = B`: back-substitute `R·X = Qᵀ·B`.
    pub fn solve_with_tolerance(&self, b: &Matrix<T>, tol: T) -> Result<Matrix<T>, Error> {
        let qtb = self.q.transpose().try_mul(b)?;
        back_substitute_with_tolerance(&self.r, &qtb, tol)
    }

    /// Determinant of the decomposed matrix (square only).
    ///
    /// Each reflection contributes a factor of −1 through Q.
    pub fn det(&self) -> Result<T, Error> {
        if !self.r.is_square() {
            return Err(Error::mismatch("det", self.r.shape(), self.r.shape()));
        }
        let mut d = T::one();
        for i in 0..self.r.nrows() {
            d = d * self.r[(i, i)];
        }
        if self.reflections % 2 == 1 {
            d = -d;
        }
        Ok(d)
    }
}

/// Default pivot tolerance for `r`: `n · ε · max|R[i,i]|`.
///
/// Scales with the matrix so that rank-deficient inputs are caught
/// regardless of their units.
pub fn default_tolerance<T: FloatScalar>(r: &Matrix<T>) -> T {
    let n = r.nrows().min(r.ncols());
    let mut max = T::zero();
    for i in 0..n {
        max = max.max(r[(i, i)].abs());
    }
    T::epsilon() * T::cast_f64(n as f64) * max
}

/// Upper-triangular back-substitution `R·X = B` with [`default_tolerance`].
pub fn back_substitute<T: FloatScalar>(r: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>, Error> {
    back_substitute_with_tolerance(r, b, default_tolerance(r))
}

/// Upper-triangular back-substitution `R·X = B`.
///
/// Each column of `B` is solved independently, rows last to first. Only the
/// upper triangle of `R` is read. A pivot with `|R[i,i]| <= tol` fails with
/// [`Error::SingularMatrix`].
///
/// ```
/// use drone_kf::Matrix;
/// use drone_kf::linalg::back_substitute;
///
/// let r = Matrix::new([[2.0_f64, 1.0], [0.0, 4.0]]).unwrap();
/// let b = Matrix::column(&[4.0, 8.0]).unwrap();
/// let x = back_substitute(&r, &b).unwrap();
/// assert_eq!(x.as_slice(), &[1.0, 2.0]);
/// ```
pub fn back_substitute_with_tolerance<T: FloatScalar>(
    r: &Matrix<T>,
    b: &Matrix<T>,
    tol: T,
) -> Result<Matrix<T>, Error> {
    if !r.is_square() || b.nrows() != r.nrows() {
        return Err(Error::mismatch("back_substitute", r.shape(), b.shape()));
    }
    let n = r.nrows();
    let mut x = Matrix::zeros(n, b.ncols())?;

    for col in 0..b.ncols() {
        for row in (0..n).rev() {
            let pivot = r[(row, row)];
            if pivot.abs() <= tol {
                return Err(Error::SingularMatrix { row });
            }
            let mut num = b[(row, col)];
            for k in (row + 1)..n {
                num = num - r[(row, k)] * x[(k, col)];
            }
            x[(row, col)] = num / pivot;
        }
    }

    Ok(x)
}

/// Solve `A·X = B` via QR with [`default_tolerance`].
///
/// `A` must be square and `B` must have as many rows as `A`.
pub fn solve<T: FloatScalar>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>, Error> {
    if !a.is_square() || a.nrows() != b.nrows() {
        return Err(Error::mismatch("solve", a.shape(), b.shape()));
    }
    QrDecomposition::new(a)?.solve(b)
}

/// Solve `A·X = B` via QR; pivots at or below `tol` are singular.
pub fn solve_with_tolerance<T: FloatScalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    tol: T,
) -> Result<Matrix<T>, Error> {
    if !a.is_square() || a.nrows() != b.nrows() {
        return Err(Error::mismatch("solve", a.shape(), b.shape()));
    }
    QrDecomposition::new(a)?.solve_with_tolerance(b, tol)
}

/// Convenience methods.
impl<T: FloatScalar> Matrix<T> {
    /// QR decomposition using Householder reflections.
    pub fn qr(&self) -> Result<QrDecomposition<T>, Error> {
        QrDecomposition::new(self)
    }

    /// Solve `self · X = b` via QR.
    ///
    /// ```
    /// use drone_kf::Matrix;
    /// let a = Matrix::new([[2.0_f64, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]]).unwrap();
    /// let b = Matrix::column(&[8.0, -11.0, -3.0]).unwrap();
    /// let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
    /// assert!((x[(0, 0)] - 2.0).abs() < 1e-10);
    /// assert!((x[(2, 0)] + 1.0).abs() < 1e-10);
    /// ```
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, Error> {
        solve(self, b)
    }
}
