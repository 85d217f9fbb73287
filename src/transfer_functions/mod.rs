use std::{
    fmt::Display,
    ops::{Add, Mul, Neg, Sub},
};

use num::{Complex, Float, Zero};

use crate::{
    error::{Error, Result},
    polynomials::{
        roots::{sort_roots, RootFinding},
        Polynomial,
    },
    scalar::{to_f64, Coefficient},
};

pub mod zpk;

/// Sign of the feedback path in a closed loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackSign {
    #[default]
    Negative,
    Positive,
}

/// A rational transfer function `N(s) / D(s)`.
///
/// The denominator is never the zero polynomial. Values are immutable: every
/// operation returns a new transfer function, and no pole/zero cancellation
/// is attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction<T: Coefficient> {
    numerator: Polynomial<T>,
    denominator: Polynomial<T>,
}

impl<T: Coefficient> TransferFunction<T> {
    /// # Errors
    ///
    /// `Error::ZeroDenominator` if `denominator` is the zero polynomial.
    pub fn new(numerator: Polynomial<T>, denominator: Polynomial<T>) -> Result<Self> {
        if denominator.is_zero() {
            return Err(Error::ZeroDenominator);
        }

        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Builds a transfer function from coefficients in descending powers of
    /// `s`, so `from_descending(&[1.0], &[1.0, 2.0])` is `1 / (s + 2)`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` for non-finite coefficients and
    /// `Error::ZeroDenominator` for an all-zero (or empty) denominator.
    pub fn from_descending(num: &[T], den: &[T]) -> Result<Self> {
        for (argument, terms) in [("num", num), ("den", den)] {
            if let Some(i) = terms.iter().position(|x| !x.is_finite()) {
                return Err(Error::invalid(
                    argument,
                    Some(i),
                    format!("coefficient {} is not finite", terms[i]),
                ));
            }
        }

        Self::new(
            Polynomial::new(num.iter().rev().copied().collect()),
            Polynomial::new(den.iter().rev().copied().collect()),
        )
    }

    /// The static gain `k / 1`
    #[must_use]
    pub fn gain(k: T) -> Self {
        Self {
            numerator: Polynomial::new(vec![k]),
            denominator: Polynomial::one(),
        }
    }

    /// The Laplace variable `s / 1`
    #[must_use]
    pub fn s() -> Self {
        Self {
            numerator: Polynomial::new(vec![T::zero(), T::one()]),
            denominator: Polynomial::one(),
        }
    }

    #[must_use]
    pub const fn numerator(&self) -> &Polynomial<T> {
        &self.numerator
    }

    #[must_use]
    pub const fn denominator(&self) -> &Polynomial<T> {
        &self.denominator
    }

    /// Numerator coefficients in descending powers of `s`
    #[must_use]
    pub fn num(&self) -> Vec<T> {
        self.numerator.descending()
    }

    /// Denominator coefficients in descending powers of `s`
    #[must_use]
    pub fn den(&self) -> Vec<T> {
        self.denominator.descending()
    }

    /// Evaluates `G(s)`. At a pole the result is not finite.
    #[must_use]
    pub fn eval(&self, s: Complex<T::Real>) -> Complex<T::Real> {
        self.numerator.eval_complex(s) / self.denominator.eval_complex(s)
    }

    /// `G(0)`; infinite (or NaN for complex coefficients) with a pole at the origin
    #[must_use]
    pub fn dcgain(&self) -> T {
        self.numerator.eval(T::zero()) / self.denominator.eval(T::zero())
    }

    /// Denominator roots, sorted by real then imaginary part
    #[must_use]
    pub fn poles(&self, prec: T::Real) -> Vec<Complex<T::Real>> {
        let mut roots = self.denominator.roots(prec);
        sort_roots(&mut roots);
        roots
    }

    /// Numerator roots, sorted by real then imaginary part. The zero system has none.
    #[must_use]
    pub fn zeros(&self, prec: T::Real) -> Vec<Complex<T::Real>> {
        let mut roots = self.numerator.roots(prec);
        sort_roots(&mut roots);
        roots
    }

    /// `self * other`
    #[must_use]
    pub fn series(&self, other: &Self) -> Self {
        Self {
            numerator: &self.numerator * &other.numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    /// `self + other`
    #[must_use]
    pub fn parallel(&self, other: &Self) -> Self {
        let numerator = Polynomial::from_sum(
            T::one(),
            &(&self.numerator * &other.denominator),
            T::one(),
            &(&other.numerator * &self.denominator),
        );

        Self {
            numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    /// `self / other`
    ///
    /// # Errors
    ///
    /// `Error::ZeroDenominator` if `other` is the zero system.
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        Self::new(
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        )
    }

    /// Closes the loop around `self` with `other` in the feedback path:
    /// `G / (1 + G H)` for negative feedback, `G / (1 - G H)` for positive.
    ///
    /// # Errors
    ///
    /// `Error::ZeroDenominator` if the loop cancels, e.g. `G = 1`, `H = 1`
    /// with positive feedback.
    pub fn feedback(&self, other: &Self, sign: FeedbackSign) -> Result<Self> {
        let loop_sign = match sign {
            FeedbackSign::Negative => T::one(),
            FeedbackSign::Positive => -T::one(),
        };

        Self::new(
            &self.numerator * &other.denominator,
            Polynomial::from_sum(
                T::one(),
                &(&self.denominator * &other.denominator),
                loop_sign,
                &(&self.numerator * &other.numerator),
            ),
        )
    }
}

impl<F: Coefficient<Real = F> + Float> TransferFunction<Complex<F>> {
    /// Drops the imaginary parts of all coefficients.
    ///
    /// # Errors
    ///
    /// `Error::NotReal` if any imaginary part exceeds `tol` in magnitude,
    /// e.g. when a complex root was given without its conjugate.
    pub fn into_real(self, tol: F) -> Result<TransferFunction<F>> {
        let residue = self
            .numerator
            .get_terms()
            .iter()
            .chain(self.denominator.get_terms())
            .map(|c| c.im.abs())
            .fold(F::zero(), F::max);

        if residue > tol {
            return Err(Error::NotReal {
                residue: to_f64(residue),
            });
        }

        TransferFunction::new(self.numerator.map(|c| c.re), self.denominator.map(|c| c.re))
    }
}

impl<T: Coefficient> Mul for TransferFunction<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.series(&rhs)
    }
}

impl<T: Coefficient> Mul<T> for TransferFunction<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        Self {
            numerator: self.numerator * rhs,
            denominator: self.denominator,
        }
    }
}

impl<T: Coefficient> Add for TransferFunction<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.parallel(&rhs)
    }
}

impl<T: Coefficient> Sub for TransferFunction<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.parallel(&-rhs)
    }
}

impl<T: Coefficient> Neg for TransferFunction<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl<T: Coefficient> Display for TransferFunction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let num = self.numerator.to_string();
        let den = self.denominator.to_string();
        let width = num.chars().count().max(den.chars().count());

        writeln!(f, "{num:^width$}")?;
        writeln!(f, "{}", "-".repeat(width))?;
        write!(f, "{den:^width$}")
    }
}

impl<T: Coefficient> Zero for TransferFunction<T> {
    fn zero() -> Self {
        Self::gain(T::zero())
    }

    fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }
}
