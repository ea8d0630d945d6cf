use core::fmt::Debug;
use num_traits::Float;

/// Trait for floating-point matrix elements.
///
/// Implemented for `f32` (flight builds) and `f64` (analysis and tests).
/// One engine instance uses a single precision throughout; tuning constants
/// stored as `f64` are narrowed once with [`FloatScalar::cast_f64`].
pub trait FloatScalar: Float + Debug + Default + 'static {
    /// Convert an `f64` constant into `Self`.
    fn cast_f64(v: f64) -> Self;

    /// Widen `self` to `f64` (for logging and diagnostics).
    fn as_f64(self) -> f64;
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {
        $(
            impl FloatScalar for $t {
                #[inline] fn cast_f64(v: f64) -> $t { v as $t }
                #[inline] fn as_f64(self) -> f64 { self as f64 }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_and_widening() {
        assert_eq!(<f32 as FloatScalar>::cast_f64(0.5), 0.5_f32);
        assert_eq!(FloatScalar::as_f64(0.25_f32), 0.25);
        assert_eq!(<f64 as FloatScalar>::cast_f64(-9.81), -9.81);
    }
}
