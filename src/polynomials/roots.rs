use super::Polynomial;
use crate::scalar::{real, to_f64, Coefficient};
use approx::{AbsDiffEq, RelativeEq};
use num::{Complex, Float, One, Zero};
use rand::{distributions::Standard, prelude::*};
use std::cmp::Ordering;

/// Hard cap on Aberth iterations; multiple roots converge only linearly
pub const MAX_ITERATIONS: usize = 200;

/// An implementation for finding the complex roots of a univariate polynomial
pub trait RootFinding<F: Float> {
    /// Implementation of the Aberth method
    /// Link to Wikipedia page [here](https://en.wikipedia.org/wiki/Aberth_method)
    ///
    /// Will call `determine_roots_bounds` and generate evenly distributed
    /// start guesses inside that region. `output` must hold exactly
    /// `order()` values.
    fn find_roots(&self, output: &mut [Complex<F>], prec: F) -> usize;

    /// Implementation of the Aberth method
    /// Link to Wikipedia page [here](https://en.wikipedia.org/wiki/Aberth_method)
    ///
    /// Receives the initial position for the roots
    fn find_roots_from(&self, initial_guess: &mut [Complex<F>], prec: F) -> usize;

    /// Same as `RootFinding::find_roots_from`, but adds relative randomness to the points
    fn find_roots_from_rand<R>(
        &self,
        initial_guess: &mut [Complex<F>],
        prec: F,
        rng: &mut R,
    ) -> usize
    where
        Standard: Distribution<F>,
        R: RngCore;

    /// Determines lower and upper bounds for the module of the polynomial roots
    ///
    /// Time complexity: same as `determine_max_bound`, which is called twice
    fn determine_roots_bounds(&self) -> (F, F);

    /// Allocates and returns all `order()` roots
    fn roots(&self, prec: F) -> Vec<Complex<F>>;

    /// Determines the upper bounds by using Lagrange's and Cauchy's bounds.
    /// Returns the smallest of the two.
    ///
    /// Time complexity: $ O(n) $
    fn determine_max_bound(terms: &[Complex<F>]) -> F {
        max_root_bound(terms)
    }
}

/// Smallest of Lagrange's and Cauchy's upper bounds on the root moduli
fn max_root_bound<F: Float>(terms: &[Complex<F>]) -> F {
    let mut lagrange = F::zero();
    let mut cauchy = F::zero();
    let Some(&last) = terms.last() else {
        return F::one();
    };

    for &term in terms.iter().rev().skip(1) {
        let div = (term / last).norm();
        lagrange = lagrange + div;
        cauchy = div.max(cauchy);
    }

    lagrange = lagrange.max(F::one());
    cauchy = cauchy + F::one();

    lagrange.min(cauchy)
}

/// Lifts the coefficients to the complex plane and strips the roots sitting
/// exactly at the origin, returning how many there were.
fn split_origin_roots<T: Coefficient>(poly: &Polynomial<T>) -> (usize, Vec<Complex<T::Real>>) {
    let terms = poly.get_terms();
    let origin = terms
        .iter()
        .position(|x| !x.is_zero())
        .unwrap_or(0)
        .min(poly.order());

    (origin, terms[origin..].iter().map(|x| x.to_complex()).collect())
}

/// Evaluates the polynomial and its derivative in one Horner pass
fn horner<F: Float>(terms: &[Complex<F>], x: Complex<F>) -> (Complex<F>, Complex<F>) {
    let mut value = Complex::zero();
    let mut derivative = Complex::zero();

    for &term in terms.iter().rev() {
        derivative = derivative * x + value;
        value = value * x + term;
    }

    (value, derivative)
}

fn circle_guesses<F: Float>(terms: &[Complex<F>], output: &mut [Complex<F>]) {
    let upper = max_root_bound(terms);
    let rev_terms: Vec<_> = terms.iter().copied().rev().collect();
    let lower = F::one() / max_root_bound(&rev_terms);
    let radius = (lower + upper) / real(2.0);

    let angle = real::<F>(std::f64::consts::TAU) / F::from(output.len()).unwrap_or_else(F::one);
    let mut theta = real::<F>(0.4);

    for out in output.iter_mut() {
        *out = Complex::from_polar(radius, theta);
        theta = theta + angle;
    }
}

fn aberth<F: Float>(terms: &[Complex<F>], guesses: &mut [Complex<F>], prec: F) -> usize {
    let mut max_off = F::infinity();
    let mut count = 0;
    let mut offsets = vec![Complex::<F>::zero(); guesses.len()];

    while max_off > prec && count < MAX_ITERATIONS {
        max_off = F::zero();
        count += 1;

        for (k, off) in offsets.iter_mut().enumerate() {
            let (value, derivative) = horner(terms, guesses[k]);
            if value.is_zero() {
                *off = Complex::zero();
                continue;
            }

            let frac = value / derivative;

            let mut sum = Complex::<F>::zero();
            for (j, guess) in guesses.iter().enumerate() {
                if j != k {
                    sum = sum + Complex::<F>::one() / (guesses[k] - guess);
                }
            }

            *off = frac / (Complex::<F>::one() - frac * sum);

            let norm = off.norm();
            if norm > max_off || norm.is_nan() {
                max_off = norm;
            }
        }

        guesses
            .iter_mut()
            .zip(offsets.iter())
            .for_each(|(g, &o)| *g = *g - o);
    }

    if max_off.is_nan() {
        log::warn!("Aberth iteration diverged after {count} steps");
    } else {
        log::trace!("Aberth converged to {:e} in {count} steps", to_f64(max_off));
    }

    count
}

impl<T: Coefficient> RootFinding<T::Real> for Polynomial<T> {
    fn find_roots(&self, output: &mut [Complex<T::Real>], prec: T::Real) -> usize {
        debug_assert_eq!(self.order(), output.len());

        let (origin, terms) = split_origin_roots(self);
        let (at_origin, rest) = output.split_at_mut(origin);
        at_origin.iter_mut().for_each(|x| *x = Complex::zero());

        if rest.is_empty() {
            return 0;
        }

        circle_guesses(&terms, rest);

        aberth(&terms, rest, prec)
    }

    fn find_roots_from_rand<R>(
        &self,
        initial_guess: &mut [Complex<T::Real>],
        prec: T::Real,
        rng: &mut R,
    ) -> usize
    where
        Standard: Distribution<T::Real>,
        R: RngCore,
    {
        let scale = real::<T::Real>(0.01);
        for x in initial_guess.iter_mut() {
            let r = Complex::new(rng.gen::<T::Real>(), rng.gen::<T::Real>()) * scale;
            // Relative to the guess, but never zero for guesses at the origin
            *x = *x + r * x.norm().max(T::Real::one());
        }

        self.find_roots_from(initial_guess, prec)
    }

    fn find_roots_from(&self, guesses: &mut [Complex<T::Real>], prec: T::Real) -> usize {
        let terms: Vec<_> = self.get_terms().iter().map(|x| x.to_complex()).collect();

        aberth(&terms, guesses, prec)
    }

    fn determine_roots_bounds(&self) -> (T::Real, T::Real) {
        let (_, terms) = split_origin_roots(self);
        let upper = Self::determine_max_bound(&terms);
        let rev_terms: Vec<_> = terms.iter().copied().rev().collect();
        let lower = T::Real::one() / Self::determine_max_bound(&rev_terms);

        (lower, upper)
    }

    fn roots(&self, prec: T::Real) -> Vec<Complex<T::Real>> {
        let mut out = vec![Complex::zero(); self.order()];
        self.find_roots(&mut out, prec);
        out
    }
}

/// Sorts roots by real part, then imaginary part.
///
/// Parts are compared after rounding to 1e-8 so that rounding noise on
/// conjugate pairs and real roots does not decide the order. NaN sorts last.
pub fn sort_roots<F: Float>(roots: &mut [Complex<F>]) {
    let key = |x: F| {
        let q = (x * real::<F>(1e8)).round();
        if q.is_nan() {
            F::infinity()
        } else {
            q
        }
    };

    roots.sort_by(|a, b| {
        key(a.re)
            .partial_cmp(&key(b.re))
            .unwrap_or(Ordering::Equal)
            .then(key(a.im).partial_cmp(&key(b.im)).unwrap_or(Ordering::Equal))
    });
}

/// A root wrapper with approximate equality, compared part by part
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Root<F>(pub Complex<F>);

impl<F: AbsDiffEq<Epsilon = F> + Float> AbsDiffEq for Root<F> {
    type Epsilon = F;

    fn default_epsilon() -> Self::Epsilon {
        F::epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.re.abs_diff_eq(&other.0.re, epsilon) && self.0.im.abs_diff_eq(&other.0.im, epsilon)
    }
}

impl<F: AbsDiffEq<Epsilon = F> + RelativeEq + Float> RelativeEq for Root<F> {
    fn default_max_relative() -> Self::Epsilon {
        F::epsilon()
    }

    fn relative_eq(&self, other: &Self, epsilon: F, max_relative: F) -> bool {
        self.0.re.relative_eq(&other.0.re, epsilon, max_relative)
            && self.0.im.relative_eq(&other.0.im, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use num::complex::Complex64;
    use rand::rngs::StdRng;

    use super::*;

    fn lift(terms: &[f64]) -> Vec<Complex64> {
        terms.iter().map(|&x| Complex64::from(x)).collect()
    }

    #[test]
    fn max_bound() {
        let terms = lift(&[1.0, 2.0, -8.0, 4.0]);
        let roots = [-0.2406, 0.6555, 1.5850];

        let max_bound = Polynomial::<f64>::determine_max_bound(&terms);

        for root in roots {
            assert!(
                root.abs() <= max_bound,
                "There are roots larger than the max bound"
            );
        }
    }

    #[test]
    fn bounds() {
        let terms = vec![1.0, 2.0, -8.0, 4.0];
        let roots = [-0.2406, 0.6555, 1.5850];

        let (min, max) = Polynomial(terms).determine_roots_bounds();

        for root in roots {
            assert!(
                root.abs() >= min,
                "There are roots smaller than the min bound"
            );
            assert!(
                root.abs() <= max,
                "There are roots larger than the max bound"
            );
        }
    }

    #[test]
    fn find_roots() {
        // (x + 1)(x² - 2x + 2)
        let terms = vec![2.0, 0.0, -1.0, 1.0];

        let mut out = vec![Complex64::zero(); 3];

        Polynomial(terms).find_roots(&mut out, 1e-12);
        sort_roots(&mut out);

        let expected = vec![
            Complex64::new(-1.0, 0.0),
            Complex64::new(1.0, -1.0),
            Complex64::new(1.0, 1.0),
        ];

        out.into_iter().zip(expected).for_each(|(a, b)| {
            assert_abs_diff_eq!(Root(a), Root(b), epsilon = 1e-9);
        });
    }

    #[test]
    fn roots_at_origin_are_exact() {
        // x² (x + 3)
        let mut roots = Polynomial(vec![0.0, 0.0, 3.0, 1.0]).roots(1e-12);
        sort_roots(&mut roots);

        assert_abs_diff_eq!(Root(roots[0]), Root(Complex64::new(-3.0, 0.0)), epsilon = 1e-9);
        assert_eq!(roots[1], Complex64::zero());
        assert_eq!(roots[2], Complex64::zero());
    }

    #[test]
    fn constant_has_no_roots() {
        assert!(Polynomial(vec![4.0]).roots(1e-12).is_empty());
        assert!(Polynomial::<f64>::zero().roots(1e-12).is_empty());
    }

    #[test]
    fn complex_coefficients() {
        // (x - i)(x - 2)
        let poly = Polynomial::from_roots(&[Complex64::i(), Complex64::new(2.0, 0.0)]);
        let mut roots = poly.roots(1e-12);
        sort_roots(&mut roots);

        assert_abs_diff_eq!(Root(roots[0]), Root(Complex64::i()), epsilon = 1e-9);
        assert_abs_diff_eq!(Root(roots[1]), Root(Complex64::new(2.0, 0.0)), epsilon = 1e-9);
    }

    #[test]
    fn warm_start_with_coincident_guesses() {
        // (x + 1)(x + 2)
        let poly = Polynomial(vec![2.0, 3.0, 1.0]);
        let mut guesses = vec![Complex64::new(-1.5, 0.0); 2];
        let mut rng = StdRng::seed_from_u64(7);

        poly.find_roots_from_rand(&mut guesses, 1e-12, &mut rng);
        sort_roots(&mut guesses);

        assert_abs_diff_eq!(Root(guesses[0]), Root(Complex64::new(-2.0, 0.0)), epsilon = 1e-9);
        assert_abs_diff_eq!(Root(guesses[1]), Root(Complex64::new(-1.0, 0.0)), epsilon = 1e-9);
    }
}
