use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use num::{Complex, Float, One, Zero};
use rand::{distributions::Standard, prelude::*, rngs::StdRng};

use crate::{
    error::{Error, Result},
    polynomials::{roots::RootFinding, Polynomial},
    scalar::{real, Coefficient},
    transfer_functions::TransferFunction,
};

/// A gain usable as an ordered map key. Gains are validated finite before
/// they get here.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct OrderedGain<F: Float>(pub F);

impl<F: Float> Eq for OrderedGain<F> {}

impl<F: Float> PartialOrd for OrderedGain<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Float> Ord for OrderedGain<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// Sweep parameters for [`RootLocus::calculate_all`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocusOptions<F> {
    /// Stop Aberth iterations once every correction is below this
    pub precision: F,
    /// Smallest non-zero gain of the logarithmic sweep
    pub min_gain: F,
    pub max_gain: F,
    /// Number of logarithmically spaced gains, ends included
    pub steps: usize,
    /// Seed for the perturbation applied to warm-start guesses
    pub seed: u64,
}

impl<F: Float> Default for LocusOptions<F> {
    fn default() -> Self {
        Self {
            precision: real(1e-10),
            min_gain: real(1e-2),
            max_gain: real(1e3),
            steps: 256,
            seed: 0,
        }
    }
}

impl<F: Float> LocusOptions<F> {
    /// # Errors
    ///
    /// `Error::InvalidInput` for a non-positive precision or minimum gain,
    /// a maximum gain not above the minimum, or fewer than two steps.
    pub fn validate(&self) -> Result<()> {
        let positive = |x: F| x.is_finite() && x > F::zero();

        if !positive(self.precision) {
            return Err(Error::invalid("precision", None, "must be a positive number"));
        }
        if !positive(self.min_gain) {
            return Err(Error::invalid("min_gain", None, "must be a positive number"));
        }
        if !self.max_gain.is_finite() || self.max_gain <= self.min_gain {
            return Err(Error::invalid("max_gain", None, "must be finite and above min_gain"));
        }
        if self.steps < 2 {
            return Err(Error::invalid("steps", None, "at least two gains are needed"));
        }
        Ok(())
    }
}

/// A struct for calculating the roots of a polynomial A + k B,
/// where A == `poly_a` and B == `poly_b` as k varies from 0 upward.
///
/// For an open loop `N / D` this is the closed-loop characteristic
/// polynomial `D + k N`.
pub struct RootLocus<T: Coefficient> {
    poly_a: Polynomial<T>,
    poly_b: Polynomial<T>,
    gains: BTreeMap<OrderedGain<T::Real>, usize>, // map from gain to step index
    /// A `Vec` with all roots. For the gain at step `n`, the
    /// corresponding roots are at indices `b*n` through
    /// `b*(n+1)` (exclusive), where `b` is the order of `poly_a`.
    roots: Vec<Complex<T::Real>>,
}

impl<T: Coefficient> RootLocus<T>
where
    Standard: Distribution<T::Real>,
{
    /// # Errors
    ///
    /// `Error::InvalidInput` if `poly_b` has a higher order than `poly_a`,
    /// `Error::ZeroDenominator` if `poly_a` is the zero polynomial.
    pub fn new(poly_a: Polynomial<T>, poly_b: Polynomial<T>) -> Result<Self> {
        if poly_a.is_zero() {
            return Err(Error::ZeroDenominator);
        }
        if poly_b.order() > poly_a.order() {
            return Err(Error::invalid(
                "poly_b",
                None,
                format!(
                    "order {} exceeds the characteristic order {}",
                    poly_b.order(),
                    poly_a.order()
                ),
            ));
        }

        Ok(Self {
            poly_a,
            poly_b,
            gains: BTreeMap::new(),
            roots: Vec::new(),
        })
    }

    /// Locus of the closed loop `1 + k G(s)`
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `g` is improper.
    pub fn from_transfer_function(g: &TransferFunction<T>) -> Result<Self> {
        Self::new(g.denominator().clone(), g.numerator().clone())
    }

    #[must_use]
    pub fn get_branches(&self) -> usize {
        self.poly_a.order()
    }

    /// Computes the gain `k` for a given `p` in `A(p) + k B(p) = 0`
    ///
    /// k = - A(p) / B(p)
    pub fn compute_gain(&self, position: Complex<T::Real>) -> Complex<T::Real> {
        -self.poly_a.eval_complex(position) / self.poly_b.eval_complex(position)
    }

    /// Real, positive gains at which branches meet: `A' B - B' A = 0`
    fn breakaway_gains(&self, prec: T::Real) -> Vec<T::Real> {
        let intersections_poly =
            &(&self.poly_a.derivative() * &self.poly_b) - &(&self.poly_b.derivative() * &self.poly_a);

        let intersections = intersections_poly.roots(prec);

        if intersections.iter().any(|x| x.re.is_nan() || x.im.is_nan()) {
            log::warn!(
                "NaN breakaway points for A = {}, B = {}: {:?}",
                self.poly_a,
                self.poly_b,
                intersections
            );
        }

        let tol = prec.sqrt();
        intersections
            .iter()
            .map(|&x| self.compute_gain(x))
            .filter(|k| {
                k.re.is_finite()
                    && k.re > T::Real::zero()
                    && k.im.abs() <= tol * (T::Real::one() + k.re)
            })
            .map(|k| k.re)
            .collect()
    }

    /// Sweeps the gain from 0 to `options.max_gain`, filling the gain map and
    /// the root table. Previous results are discarded.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `options` fails [`LocusOptions::validate`].
    pub fn calculate_all(&mut self, options: &LocusOptions<T::Real>) -> Result<()> {
        options.validate()?;

        let prec = options.precision;
        let branches = self.get_branches();
        let mut rng = StdRng::seed_from_u64(options.seed);

        // gains to calculate, k == 0 first
        let mut future_gains = BTreeSet::new();
        future_gains.insert(OrderedGain(T::Real::zero()));

        let last = options.steps - 1;
        let ratio = (options.max_gain / options.min_gain)
            .powf(T::Real::one() / real::<T::Real>(last as f64));
        let mut k = options.min_gain;
        for _ in 0..last {
            future_gains.insert(OrderedGain(k));
            k = k * ratio;
        }
        future_gains.insert(OrderedGain(options.max_gain));

        for k in self.breakaway_gains(prec) {
            if k >= options.min_gain && k <= options.max_gain {
                future_gains.insert(OrderedGain(k));
            }
        }

        log::debug!(
            "root locus: {} branches over {} gains",
            branches,
            future_gains.len()
        );

        self.gains.clear();
        self.roots.clear();
        self.roots.reserve(future_gains.len() * branches);

        let mut old_roots = self.poly_a.roots(prec);

        for (i, gain) in future_gains.iter().enumerate() {
            let poly = Polynomial::from_sum(
                T::one(),
                &self.poly_a,
                T::from_real(gain.0),
                &self.poly_b,
            );

            if poly.order() == branches {
                if i > 0 {
                    poly.find_roots_from_rand(&mut old_roots, prec, &mut rng);
                }
                self.roots.extend_from_slice(&old_roots);
            } else {
                // Leading coefficients cancelled: the missing roots went to infinity
                let mut found = poly.roots(prec);
                found.resize(branches, Complex::new(T::Real::infinity(), T::Real::zero()));
                self.roots.extend_from_slice(&found);
            }

            self.gains.insert(*gain, i);
        }

        Ok(())
    }

    #[must_use]
    pub const fn get_gains(&self) -> &BTreeMap<OrderedGain<T::Real>, usize> {
        &self.gains
    }

    /// Swept gains in ascending order
    #[must_use]
    pub fn gains(&self) -> Vec<T::Real> {
        self.gains.keys().map(|g| g.0).collect()
    }

    #[must_use]
    pub fn get_roots(&self) -> &[Complex<T::Real>] {
        &self.roots
    }

    /// Closed-loop roots at sweep step `step`, `None` past the last step
    #[must_use]
    pub fn roots_at(&self, step: usize) -> Option<&[Complex<T::Real>]> {
        if step >= self.gains.len() {
            return None;
        }
        let branches = self.get_branches();
        let start = step.checked_mul(branches)?;
        let end = start.checked_add(branches)?;
        self.roots.get(start..end)
    }

    /// Trajectory of a single branch across all steps
    #[must_use]
    pub fn branch(&self, branch: usize) -> Vec<Complex<T::Real>> {
        if branch >= self.get_branches() {
            return Vec::new();
        }
        self.roots
            .iter()
            .skip(branch)
            .step_by(self.get_branches())
            .copied()
            .collect()
    }
}
