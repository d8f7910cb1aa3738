use crate::error::{FdmError, FdmResult};
use crate::traits::{convert, Coefficient};
use num_traits::{One, Zero};
use std::collections::BTreeMap;

/// Weights `c_i` of `f^(n)(x) ≈ h^-n Σ c_i f(x + i h)`, keyed by offset.
///
/// Every stencil offset has an entry, including weights that are exactly
/// zero (the centre of a central odd-derivative stencil). Iteration is always
/// in ascending offset order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable<C> {
    derivative: usize,
    weights: BTreeMap<i64, C>,
}

impl<C: Coefficient> CoefficientTable<C> {
    pub(crate) fn new(derivative: usize, weights: BTreeMap<i64, C>) -> Self {
        Self {
            derivative,
            weights,
        }
    }

    pub fn derivative(&self) -> usize {
        self.derivative
    }

    pub fn get(&self, offset: i64) -> Option<&C> {
        self.weights.get(&offset)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn offsets(&self) -> impl Iterator<Item = i64> + '_ {
        self.weights.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &C)> + '_ {
        self.weights.iter().map(|(offset, weight)| (*offset, weight))
    }

    /// Entries whose weight is not exactly zero.
    pub fn nonzero(&self) -> impl Iterator<Item = (i64, &C)> + '_ {
        self.iter().filter(|(_, weight)| !weight.is_zero())
    }

    pub fn into_map(self) -> BTreeMap<i64, C> {
        self.weights
    }

    /// Order `m` of the truncation error `O(h^m)` these weights achieve.
    ///
    /// Scans the moments `Σ c_i i^q` for `q = 0, 1, ...`: every moment must be
    /// zero except `q = n`, which must equal `n!`. The first violation at
    /// `q > n` gives order `q - n`; a violation at `q <= n` means the weights
    /// do not approximate the derivative at all and the order is 0. Only
    /// meaningful for exact coefficient types, since float round-off makes
    /// high moments spuriously nonzero.
    pub fn truncation_order(&self) -> FdmResult<usize> {
        let n = self.derivative;
        let factorial = factorial::<C>(n)?;
        let bound = n + 2 * self.len() + 1;
        for q in 0..=bound {
            let mut moment = C::zero();
            for (offset, weight) in self.iter() {
                let term = C::from_integer(offset)
                    .try_powi(q)
                    .and_then(|power| power.try_mul(weight))
                    .ok_or(FdmError::Overflow(C::NAME))?;
                moment = moment.try_add(&term).ok_or(FdmError::Overflow(C::NAME))?;
            }
            let expected = if q == n { factorial.clone() } else { C::zero() };
            if moment != expected {
                return Ok(q.saturating_sub(n));
            }
        }
        Err(FdmError::SingularSystem(format!(
            "weights annihilate every moment up to degree {bound}"
        )))
    }

    /// Re-expresses every weight in another coefficient type.
    pub fn convert<T: Coefficient>(&self) -> FdmResult<CoefficientTable<T>> {
        let weights = self
            .iter()
            .map(|(offset, weight)| {
                convert::<C, T>(weight)
                    .map(|converted| (offset, converted))
                    .ok_or_else(|| FdmError::Conversion(format!("{weight:?} as {}", T::NAME)))
            })
            .collect::<FdmResult<BTreeMap<_, _>>>()?;
        Ok(CoefficientTable::new(self.derivative, weights))
    }
}

/// `n!` computed with checked arithmetic in `C`.
pub(crate) fn factorial<C: Coefficient>(n: usize) -> FdmResult<C> {
    let mut acc = C::one();
    for factor in 2..=n as i64 {
        acc = acc
            .try_mul(&C::from_integer(factor))
            .ok_or(FdmError::Overflow(C::NAME))?;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::Rational64;

    fn table(derivative: usize, entries: &[(i64, i64, i64)]) -> CoefficientTable<Rational64> {
        let weights = entries
            .iter()
            .map(|&(offset, numer, denom)| (offset, Rational64::new(numer, denom)))
            .collect();
        CoefficientTable::new(derivative, weights)
    }

    #[test]
    fn iteration_is_sorted_by_offset() {
        let t = table(1, &[(1, 1, 2), (-1, -1, 2), (0, 0, 1)]);
        assert_eq!(t.offsets().collect::<Vec<_>>(), vec![-1, 0, 1]);
        assert_eq!(t.nonzero().map(|(i, _)| i).collect::<Vec<_>>(), vec![-1, 1]);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn truncation_order_of_classical_formulas() {
        let central = table(1, &[(-1, -1, 2), (0, 0, 1), (1, 1, 2)]);
        assert_eq!(central.truncation_order().unwrap(), 2);
        let forward = table(1, &[(0, -1, 1), (1, 1, 1)]);
        assert_eq!(forward.truncation_order().unwrap(), 1);
        let second = table(2, &[(-1, 1, 1), (0, -2, 1), (1, 1, 1)]);
        assert_eq!(second.truncation_order().unwrap(), 2);
    }

    #[test]
    fn inconsistent_weights_have_order_zero() {
        let wrong_scale = table(1, &[(-1, -1, 1), (1, 1, 1)]);
        assert_eq!(wrong_scale.truncation_order().unwrap(), 0);
    }

    #[test]
    fn convert_to_float_and_back() {
        let t = table(2, &[(-1, 1, 1), (0, -2, 1), (1, 1, 1)]);
        let float = t.convert::<f64>().expect("convert to f64");
        assert_eq!(float.get(0), Some(&-2.0));
        let exact = float.convert::<Rational64>().expect("convert back");
        assert_eq!(exact, t);
    }

    #[test]
    fn factorial_in_exact_and_float_types() {
        assert_eq!(factorial::<Rational64>(5).unwrap(), Rational64::from_integer(120));
        assert_eq!(factorial::<f64>(0).unwrap(), 1.0);
    }
}
