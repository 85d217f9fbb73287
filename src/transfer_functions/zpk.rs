//! Zero-pole-gain construction of transfer functions

use std::str::FromStr;

use num::complex::Complex64;

use super::TransferFunction;
use crate::{
    error::{Error, Result},
    polynomials::Polynomial,
    scalar::Coefficient,
};

fn check_finite<T: Coefficient>(argument: &'static str, values: &[T]) -> Result<()> {
    match values.iter().position(|x| !x.is_finite()) {
        Some(i) => Err(Error::invalid(
            argument,
            Some(i),
            format!("{} is not a finite number", values[i]),
        )),
        None => Ok(()),
    }
}

/// Creates the transfer function `gain * Π(s - zeros[i]) / Π(s - poles[i])`.
///
/// Factors are multiplied in input order, zeros into the numerator and poles
/// into the denominator, and the numerator is scaled by `gain` last. Empty
/// lists give a unit polynomial, and a zero gain gives the zero system.
///
/// ```
/// use sca::zpk;
///
/// // 10 s / (s² + 5 s + 6)
/// let g = zpk(&[0.0], &[-2.0, -3.0], 10.0).unwrap();
///
/// assert_eq!(g.num(), vec![10.0, 0.0]);
/// assert_eq!(g.den(), vec![1.0, 5.0, 6.0]);
/// ```
///
/// Complex conjugate pairs cancel to real coefficients, which
/// [`TransferFunction::into_real`] then drops:
///
/// ```
/// use num::complex::Complex64;
/// use sca::zpk;
///
/// let zeros = [Complex64::new(1.0, 1.0), Complex64::new(1.0, -1.0)];
/// let g = zpk(&zeros, &[], Complex64::new(1.0, 0.0)).unwrap();
///
/// assert_eq!(g.into_real(1e-12).unwrap().num(), vec![1.0, -2.0, 2.0]);
/// ```
///
/// # Errors
///
/// `Error::InvalidInput` if a zero, pole or the gain is NaN or infinite.
pub fn zpk<T: Coefficient>(zeros: &[T], poles: &[T], gain: T) -> Result<TransferFunction<T>> {
    check_finite("zeros", zeros)?;
    check_finite("poles", poles)?;
    if !gain.is_finite() {
        return Err(Error::invalid(
            "gain",
            None,
            format!("{gain} is not a finite number"),
        ));
    }

    let numerator = Polynomial::from_roots(zeros) * gain;
    let denominator = Polynomial::from_roots(poles);

    TransferFunction::new(numerator, denominator)
}

/// Parses a real or complex literal such as `-2`, `0.5`, `1+1j` or `3-4i`.
///
/// # Errors
///
/// `Error::InvalidInput` naming `argument` and `index` when the text is not a
/// number or is not finite.
pub fn parse_root(text: &str, argument: &'static str, index: Option<usize>) -> Result<Complex64> {
    let trimmed = text.trim();
    let value = Complex64::from_str(trimmed)
        .map_err(|e| Error::invalid(argument, index, format!("`{trimmed}` is not a number ({e})")))?;

    if !Coefficient::is_finite(value) {
        return Err(Error::invalid(
            argument,
            index,
            format!("`{trimmed}` is not a finite number"),
        ));
    }

    Ok(value)
}

/// Parses every entry with [`parse_root`], failing on the first bad one
///
/// # Errors
///
/// `Error::InvalidInput` for the first entry that is not a finite number.
pub fn parse_roots<S: AsRef<str>>(texts: &[S], argument: &'static str) -> Result<Vec<Complex64>> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| parse_root(text.as_ref(), argument, Some(i)))
        .collect()
}
