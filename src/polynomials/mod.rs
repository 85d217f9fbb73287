use num::{Complex, Num, Zero};
use std::{
    fmt::Display,
    iter::repeat,
    ops::{Add, Mul, Neg, Sub},
};

use crate::scalar::Coefficient;

pub mod root_locus;
pub mod roots;

/// Dense univariate polynomial in `s`.
///
/// Coefficients are stored in ascending powers: index `i` holds the
/// coefficient of `s^i`. Highest-order zeros are always trimmed, and the zero
/// polynomial is `[0]`, so `order` never underflows.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Polynomial<T: Coefficient>(Vec<T>);

pub type Polynomial32 = Polynomial<f32>;
pub type Polynomial64 = Polynomial<f64>;

/// Full linear convolution of `a` and `b`, written into the first
/// `a.len() + b.len() - 1` slots of `out`; the rest of `out` is zeroed.
pub fn conv<N: Num + Copy>(a: &[N], b: &[N], out: &mut [N]) {
    debug_assert!(a.len() + b.len() - 1 <= out.len());

    out.iter_mut().for_each(|x| *x = N::zero());

    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] = out[i + j] + x * y;
        }
    }
}

/// Removes trailing zeros from the end of a vector by mutating it
pub fn remove_trailing_zeros_vec<F: Zero>(vec: &mut Vec<F>) {
    vec.truncate(vec.iter().rposition(|x| !x.is_zero()).unwrap_or(0) + 1);
}

impl<T: Coefficient> Polynomial<T> {
    #[must_use]
    pub fn new(mut vec: Vec<T>) -> Self {
        remove_trailing_zeros_vec(&mut vec);
        if vec.is_empty() {
            vec.push(T::zero());
        }
        Self(vec)
    }

    #[must_use]
    pub fn zero() -> Self {
        Self(vec![T::zero()])
    }

    #[must_use]
    pub fn one() -> Self {
        Self(vec![T::one()])
    }

    /// Builds the monic polynomial `(s - r_0)(s - r_1)...` by multiplying the
    /// factors in the order the roots are given.
    #[must_use]
    pub fn from_roots(roots: &[T]) -> Self {
        let mut out = vec![T::zero(); roots.len() + 1];
        out[0] = T::one();
        let mut out_copy = out.clone();

        for (i, &root) in roots.iter().enumerate() {
            conv(&out_copy[..=i], &[-root, T::one()], &mut out);

            out_copy.clone_from_slice(&out);
        }

        Self::new(out)
    }

    /// Creates a polynomial from the sum `x * a + y * b`
    #[must_use]
    pub fn from_sum(x: T, a: &Self, y: T, b: &Self) -> Self {
        if a.0.len() < b.0.len() {
            return Self::from_sum(y, b, x, a);
        }

        let zero = T::zero();
        let bi = b.get_terms().iter().chain(repeat(&zero));

        Self::new(
            a.get_terms()
                .iter()
                .zip(bi)
                .map(|(&i, &j)| x * i + y * j)
                .collect(),
        )
    }

    #[must_use]
    pub fn from_mul(a: &Self, b: &Self) -> Self {
        let mut out = vec![T::zero(); a.0.len() + b.0.len() - 1];

        conv(&a.0, &b.0, &mut out);

        Self::new(out)
    }

    /// Coefficients in ascending powers of `s`
    #[must_use]
    pub fn get_terms(&self) -> &[T] {
        &self.0
    }

    /// Coefficients in descending powers of `s`
    #[must_use]
    pub fn descending(&self) -> Vec<T> {
        self.0.iter().rev().copied().collect()
    }

    #[must_use]
    pub fn order(&self) -> usize {
        self.0.len() - 1
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Zero::is_zero)
    }

    /// Coefficient of the highest power
    #[must_use]
    pub fn leading(&self) -> T {
        self.0[self.0.len() - 1]
    }

    #[must_use]
    pub fn map<U: Coefficient>(&self, f: impl FnMut(T) -> U) -> Polynomial<U> {
        Polynomial::new(self.0.iter().copied().map(f).collect())
    }

    pub fn eval(&self, x: T) -> T {
        self.0.iter().rev().fold(T::zero(), |acc, &term| acc * x + term)
    }

    pub fn eval_complex(&self, x: Complex<T::Real>) -> Complex<T::Real> {
        self.0
            .iter()
            .rev()
            .fold(Complex::zero(), |acc, &term| acc * x + term.to_complex())
    }

    pub fn eval_complex_derivative(&self, x: Complex<T::Real>) -> Complex<T::Real> {
        self.derivative().eval_complex(x)
    }

    #[must_use]
    pub fn derivative(&self) -> Self {
        let mut power = T::zero();
        Self::new(
            self.0
                .iter()
                .skip(1)
                .map(|&v| {
                    power = power + T::one();
                    power * v
                })
                .collect(),
        )
    }
}

impl<T: Coefficient> Display for Polynomial<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (i, term) in self.0.iter().enumerate().rev() {
            if term.is_zero() {
                continue;
            }
            let term = if first {
                *term
            } else if term.is_negative() {
                write!(f, " - ")?;
                -*term
            } else {
                write!(f, " + ")?;
                *term
            };
            first = false;

            match i {
                0 => write!(f, "{term}")?,
                1 => write!(f, "{term} s")?,
                _ => write!(f, "{term} s^{i}")?,
            }
        }
        Ok(())
    }
}

impl<T: Coefficient> Add for Polynomial<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_sum(T::one(), &self, T::one(), &rhs)
    }
}

impl<T: Coefficient> Sub for Polynomial<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_sum(T::one(), &self, -T::one(), &rhs)
    }
}

impl<T: Coefficient> Sub for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Polynomial::from_sum(T::one(), self, -T::one(), rhs)
    }
}

impl<T: Coefficient> Neg for Polynomial<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(self.0.into_iter().map(|x| -x).collect())
    }
}

impl<T: Coefficient> Mul<T> for Polynomial<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        Self::new(self.0.into_iter().map(|x| x * rhs).collect())
    }
}

impl<T: Coefficient> Mul<T> for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn mul(self, rhs: T) -> Self::Output {
        Polynomial::new(self.0.iter().map(|&x| x * rhs).collect())
    }
}

impl<T: Coefficient> Mul for Polynomial<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_mul(&self, &rhs)
    }
}

impl<T: Coefficient> Mul for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        Polynomial::from_mul(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num::complex::Complex64;

    #[test]
    fn from_roots() {
        let roots = vec![1.0, 2.0];
        // (x - 1) * (x - 2)
        // x^2 - 3 x + 2
        let poly = Polynomial(vec![2.0, -3.0, 1.0]);

        assert_eq!(Polynomial::from_roots(&roots), poly);
    }

    #[test]
    fn from_roots_empty_is_one() {
        assert_eq!(Polynomial::<f64>::from_roots(&[]), Polynomial::one());
    }

    #[test]
    fn from_roots_complex_pair() {
        let roots = [Complex64::new(1.0, 1.0), Complex64::new(1.0, -1.0)];
        let poly = Polynomial::from_roots(&roots);

        assert_eq!(
            poly.get_terms(),
            &[
                Complex64::new(2.0, 0.0),
                Complex64::new(-2.0, 0.0),
                Complex64::new(1.0, 0.0)
            ]
        );
    }

    #[test]
    fn eval() {
        // 1 + 2x - 8x² + 4x³
        let poly = Polynomial(vec![1.0, 2.0, -8.0, 4.0]);

        assert_eq!(poly.eval(0.0), 1.0);
        assert_eq!(poly.eval(2.0), 1.0 + 4.0 - 32.0 + 32.0);
    }

    #[test]
    fn eval_complex_derivative() {
        let terms = vec![1.0, 2.0, -8.0, 4.0];
        let poly = Polynomial(terms);

        let x = Complex64::new(2.0, 2.0);

        let der = poly.eval_complex_derivative(x);

        // 2 - 16x + 12x² at 2 + 2i
        let real_der = Complex64::new(-30.0, 64.0);

        assert_relative_eq!(real_der.re, der.re);
        assert_relative_eq!(real_der.im, der.im);
    }

    #[test]
    fn derivative() {
        let poly = Polynomial(vec![1.0, 2.0, -8.0, 4.0]);
        let der = Polynomial(vec![2.0, -16.0, 12.0]);

        assert_eq!(poly.derivative(), der);
        assert_eq!(Polynomial(vec![5.0]).derivative(), Polynomial::zero());
    }

    #[test]
    fn add() {
        let a = Polynomial(vec![1.0, 2.0]); // 1 + 2x
        let b = Polynomial(vec![-1.0, 0.0, -3.0]); // -1 - 3x²
        let c = Polynomial(vec![0.0, 2.0, -3.0]); // a + b = 2x - 3x²

        assert_eq!(a + b, c);
    }

    #[test]
    fn add_cancels_leading_terms() {
        let a = Polynomial(vec![1.0, 3.0]);
        let b = Polynomial(vec![1.0, -3.0]);

        assert_eq!((a + b).get_terms(), &[2.0]);
    }

    #[test]
    fn sub() {
        let a = Polynomial(vec![1.0, 2.0]); // 1 + 2x
        let b = Polynomial(vec![-1.0, 0.0, -3.0]); // -1 - 3x²
        let c = Polynomial(vec![2.0, 2.0, 3.0]);

        assert_eq!(a - b, c);
    }

    #[test]
    fn mul_scalar() {
        let a = Polynomial(vec![-1.0, 2.0, -3.0]); // -1 + 2x - 3x²
        let b = Polynomial(vec![-2.0, 4.0, -6.0]); // -2 + 4x - 6x²

        assert_eq!(a.clone() * 2.0, b);
        assert_eq!(a * 0.0, Polynomial::zero());
    }

    #[test]
    fn mul_poly() {
        let a = Polynomial(vec![1.0, 2.0]); // 1 + 2x
        let b = Polynomial(vec![-1.0, 0.0, -3.0]); // -1 - 3x²
        let c = Polynomial(vec![-1.0, -2.0, -3.0, -6.0]);

        assert_eq!(&a * &b, c);
        assert_eq!(a * b, c);
    }

    #[test]
    fn descending_and_order() {
        let p = Polynomial::new(vec![6.0, 5.0, 1.0, 0.0]);

        assert_eq!(p.order(), 2);
        assert_eq!(p.descending(), vec![1.0, 5.0, 6.0]);
        assert_eq!(p.leading(), 1.0);
    }

    #[test]
    fn empty_is_zero_polynomial() {
        let p = Polynomial::<f64>::new(vec![]);

        assert!(p.is_zero());
        assert_eq!(p.order(), 0);
        assert_eq!(p.get_terms(), &[0.0]);
    }

    #[test]
    fn display() {
        let p = Polynomial::new(vec![6.0, 5.0, 1.0]);
        assert_eq!(p.to_string(), "1 s^2 + 5 s + 6");

        let p = Polynomial::new(vec![0.0, 10.0]);
        assert_eq!(p.to_string(), "10 s");

        assert_eq!(Polynomial::<f64>::zero().to_string(), "0");
    }

    #[test]
    fn display_negative_terms() {
        let p = Polynomial::new(vec![6.0, -5.0, 1.0]);
        assert_eq!(p.to_string(), "1 s^2 - 5 s + 6");

        let p = Polynomial::new(vec![-2.0, 0.0, -3.0]);
        assert_eq!(p.to_string(), "-3 s^2 - 2");
    }

    #[test]
    fn remove_trailing_zeros_vec_works() {
        let mut a = vec![0.0, 2.0, 3.0, 0.0, 4.0, 0.0, 0.0];

        remove_trailing_zeros_vec(&mut a);
        assert_eq!(a, vec![0.0, 2.0, 3.0, 0.0, 4.0]);

        let mut b = vec![0.0, 0.0, 0.0];

        remove_trailing_zeros_vec(&mut b);
        assert_eq!(b, vec![0.0]);
    }
}
