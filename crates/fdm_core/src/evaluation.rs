//! Pointwise derivative estimates from sampled functions.

use crate::error::{FdmError, FdmResult};
use crate::solvers::coefficients;
use crate::traits::{convert, Coefficient};
use crate::types::Scheme;
use num_traits::Zero;
use std::convert::Infallible;
use std::ops::{Add, Div, Mul};
use tracing::trace;

/// Approximates the `scheme.derivative`-th derivative of `f` at `at`:
/// `h^-n Σ c_i f(at + i h)`.
///
/// Weights are solved in `C` and converted once to the argument type `T`,
/// which may itself be exact (`BigRational` spacing with an exact `f`) or a
/// float. Samples with an exact zero weight are never evaluated.
pub fn value<C, T, V, F>(mut f: F, at: T, scheme: &Scheme, spacing: T) -> FdmResult<V>
where
    C: Coefficient,
    T: Coefficient,
    V: Zero + Add<Output = V> + Mul<T, Output = V> + Div<T, Output = V>,
    F: FnMut(T) -> V,
{
    try_value::<C, T, V, _, Infallible>(|x| Ok(f(x)), at, scheme, spacing)
}

/// Like [`value`] for fallible functions. The first failing sample aborts
/// the sum and is reported as [`FdmError::DomainError`] carrying the
/// caller's error unchanged.
pub fn try_value<C, T, V, F, E>(mut f: F, at: T, scheme: &Scheme, spacing: T) -> FdmResult<V>
where
    C: Coefficient,
    T: Coefficient,
    V: Zero + Add<Output = V> + Mul<T, Output = V> + Div<T, Output = V>,
    F: FnMut(T) -> Result<V, E>,
    E: Into<anyhow::Error>,
{
    if spacing.is_zero() || spacing.to_exact().is_none() {
        return Err(FdmError::InvalidSpacing);
    }
    let table = coefficients::<C>(scheme)?;
    let weights = table
        .nonzero()
        .map(|(offset, weight)| {
            convert::<C, T>(weight)
                .map(|converted| (offset, converted))
                .ok_or_else(|| FdmError::Conversion(format!("{weight:?} as {}", T::NAME)))
        })
        .collect::<FdmResult<Vec<_>>>()?;
    trace!(
        samples = weights.len(),
        derivative = scheme.derivative,
        direction = %scheme.direction,
        numeric = T::NAME,
        "evaluating finite difference"
    );

    let overflow = || FdmError::Overflow(T::NAME);
    let mut sum = V::zero();
    for (offset, weight) in weights {
        let x = T::from_integer(offset)
            .try_mul(&spacing)
            .and_then(|step| at.try_add(&step))
            .ok_or_else(overflow)?;
        let sample = f(x).map_err(|source| FdmError::DomainError {
            offset,
            source: source.into(),
        })?;
        sum = sum + sample * weight;
    }

    let power = spacing
        .try_powi(scheme.derivative)
        .filter(|power| !power.is_zero())
        .ok_or_else(overflow)?;
    Ok(sum / power)
}
