//! Scalar phase helpers and point evaluation of transfer functions

use num::{Complex, Float};

use crate::{scalar::Coefficient, transfer_functions::TransferFunction};

/// Angle of `z` about the origin, in radians within `[-π, π]`
///
/// The sign of a zero imaginary part picks the end: `-1 - 0j` maps to `-π`.
pub fn phase<F: Float>(z: Complex<F>) -> F {
    z.arg()
}

/// Angle of `z` about the origin, in degrees within `[-180, 180]`
pub fn phased<F: Float>(z: Complex<F>) -> F {
    phase(z).to_degrees()
}

/// Element-wise [`phase`]
pub fn phases<F: Float>(values: &[Complex<F>]) -> Vec<F> {
    values.iter().copied().map(phase).collect()
}

/// Element-wise [`phased`]
pub fn phases_deg<F: Float>(values: &[Complex<F>]) -> Vec<F> {
    values.iter().copied().map(phased).collect()
}

/// Evaluates `g` at the complex frequency `s`
pub fn evals<T: Coefficient>(g: &TransferFunction<T>, s: Complex<T::Real>) -> Complex<T::Real> {
    g.eval(s)
}
