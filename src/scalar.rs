use std::{
    fmt::{Debug, Display},
    ops::Neg,
};

use num::{Complex, Float, Num, ToPrimitive};

/// Scalar types usable as polynomial coefficients, roots and gains.
///
/// Implemented for `f32`, `f64` and `Complex` of either. Every coefficient can
/// be lifted to the complex plane over its `Real` type, which is what
/// evaluation and root finding operate on.
pub trait Coefficient: Num + Copy + Neg<Output = Self> + Debug + Display {
    type Real: Float + Debug + Display;

    fn from_real(re: Self::Real) -> Self;

    fn to_complex(self) -> Complex<Self::Real>;

    /// `false` for NaN and infinite values (either part, for complex numbers)
    fn is_finite(self) -> bool;

    fn magnitude(self) -> Self::Real;

    /// Whether the value prints with a leading minus, always `false` for complex numbers
    fn is_negative(self) -> bool;
}

macro_rules! impl_real_coefficient {
    ($($t:ty),*) => {
        $(
            impl Coefficient for $t {
                type Real = $t;

                fn from_real(re: $t) -> Self {
                    re
                }

                fn to_complex(self) -> Complex<$t> {
                    Complex::new(self, 0.0)
                }

                fn is_finite(self) -> bool {
                    <$t>::is_finite(self)
                }

                fn magnitude(self) -> $t {
                    self.abs()
                }

                fn is_negative(self) -> bool {
                    self < 0.0
                }
            }
        )*
    };
}

impl_real_coefficient!(f32, f64);

impl<F: Float + Debug + Display> Coefficient for Complex<F> {
    type Real = F;

    fn from_real(re: F) -> Self {
        Self::new(re, F::zero())
    }

    fn to_complex(self) -> Self {
        self
    }

    fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    fn magnitude(self) -> F {
        self.norm()
    }

    fn is_negative(self) -> bool {
        false
    }
}

/// Converts a literal into any `Float`, NaN if it is not representable
pub(crate) fn real<R: Float>(x: f64) -> R {
    R::from(x).unwrap_or_else(R::nan)
}

/// Lossy conversion used when reporting values inside errors
pub(crate) fn to_f64<R: ToPrimitive>(x: R) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
