//! Moment-matching solver for stencil weights.
//!
//! For offsets `i_1..i_k` the weights solve the generalized Vandermonde system
//!
//! ```text
//! Σ_j c_j (i_j)^p = p! δ(p, n)    for p = 0..k
//! ```
//!
//! i.e. the stencil differentiates every polynomial of degree `< k` exactly
//! and isolates the `n`-th derivative. Exact coefficient types are eliminated
//! in `BigRational` and narrowed once at the end; `f64` is eliminated in place
//! and its round-off grows with the stencil width.

use crate::error::{FdmError, FdmResult};
use crate::stencil::{check_orders, select};
use crate::table::{factorial, CoefficientTable};
use crate::traits::Coefficient;
use crate::types::Scheme;
use nalgebra::DMatrix;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use tracing::trace;

/// Weights of the `derivative`-th derivative on arbitrary distinct offsets.
pub fn solve<C: Coefficient>(offsets: &[i64], derivative: usize) -> FdmResult<CoefficientTable<C>> {
    if derivative < 1 {
        return Err(FdmError::InvalidOrder(format!(
            "derivative order must be at least 1, got {derivative}"
        )));
    }
    if offsets.is_empty() {
        return Err(FdmError::SingularSystem("stencil has no offsets".into()));
    }
    let mut sorted = offsets.to_vec();
    sorted.sort_unstable();
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(FdmError::SingularSystem(format!(
            "offset {} appears more than once",
            pair[0]
        )));
    }
    if offsets.len() <= derivative {
        return Err(FdmError::InvalidOrder(format!(
            "a stencil of width {} cannot resolve derivative order {derivative}",
            offsets.len()
        )));
    }

    trace!(
        width = offsets.len(),
        derivative,
        numeric = C::NAME,
        "solving moment system"
    );
    let solution = if C::EXACT {
        narrow::<C>(eliminate(moment_system::<BigRational>(offsets, derivative)?)?)?
    } else {
        eliminate(moment_system::<C>(offsets, derivative)?)?
    };
    Ok(CoefficientTable::new(
        derivative,
        offsets.iter().copied().zip(solution).collect(),
    ))
}

/// Weights of the narrowest stencil for `scheme` (see [`select`]).
pub fn coefficients<C: Coefficient>(scheme: &Scheme) -> FdmResult<CoefficientTable<C>> {
    check_orders(scheme.derivative, scheme.accuracy)?;
    let stencil = select(scheme.derivative, scheme.accuracy, scheme.direction)?;
    solve(stencil.offsets(), scheme.derivative)
}

/// Exact weights in `C`; elimination intermediates grow far beyond the
/// final weights, so fixed-width rationals only see the result.
fn narrow<C: Coefficient>(solution: Vec<BigRational>) -> FdmResult<Vec<C>> {
    solution
        .iter()
        .map(|weight| C::from_exact(weight).ok_or(FdmError::Overflow(C::NAME)))
        .collect()
}

/// Augmented `k × (k + 1)` matrix `[V | n! e_n]`.
fn moment_system<C: Coefficient>(offsets: &[i64], derivative: usize) -> FdmResult<DMatrix<C>> {
    let k = offsets.len();
    let mut system = DMatrix::from_element(k, k + 1, C::zero());
    for (col, &offset) in offsets.iter().enumerate() {
        let base = C::from_integer(offset);
        let mut power = C::one();
        for row in 0..k {
            if row > 0 {
                power = power.try_mul(&base).ok_or(FdmError::Overflow(C::NAME))?;
            }
            system[(row, col)] = power.clone();
        }
    }
    system[(derivative, k)] = factorial::<C>(derivative)?;
    Ok(system)
}

/// Gaussian elimination with partial pivoting on an augmented square system.
fn eliminate<C: Coefficient>(mut system: DMatrix<C>) -> FdmResult<Vec<C>> {
    let k = system.nrows();
    let overflow = || FdmError::Overflow(C::NAME);

    for col in 0..k {
        let mut pivot = col;
        for row in col + 1..k {
            if system[(row, col)].abs() > system[(pivot, col)].abs() {
                pivot = row;
            }
        }
        if system[(pivot, col)].is_zero() {
            return Err(FdmError::SingularSystem(format!(
                "zero pivot in column {col}"
            )));
        }
        if pivot != col {
            system.swap_rows(pivot, col);
        }

        for row in col + 1..k {
            if system[(row, col)].is_zero() {
                continue;
            }
            let factor = system[(row, col)]
                .try_div(&system[(col, col)])
                .ok_or_else(overflow)?;
            for j in col..=k {
                let scaled = factor.try_mul(&system[(col, j)]).ok_or_else(overflow)?;
                let updated = system[(row, j)].try_sub(&scaled).ok_or_else(overflow)?;
                system[(row, j)] = updated;
            }
        }
    }

    let mut solution = vec![C::zero(); k];
    for row in (0..k).rev() {
        let mut acc = system[(row, k)].clone();
        for j in row + 1..k {
            let term = system[(row, j)].try_mul(&solution[j]).ok_or_else(overflow)?;
            acc = acc.try_sub(&term).ok_or_else(overflow)?;
        }
        solution[row] = acc.try_div(&system[(row, row)]).ok_or_else(overflow)?;
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use num_bigint::BigInt;
    use num_rational::Rational64;

    fn r(numer: i64, denom: i64) -> Rational64 {
        Rational64::new(numer, denom)
    }

    fn weights(table: &CoefficientTable<Rational64>) -> Vec<(i64, Rational64)> {
        table.iter().map(|(i, c)| (i, *c)).collect()
    }

    #[test]
    fn central_first_derivative_second_order_is_exact() {
        let table = coefficients::<Rational64>(&Scheme::central(1, 2)).expect("solve");
        assert_eq!(
            weights(&table),
            vec![(-1, r(-1, 2)), (0, r(0, 1)), (1, r(1, 2))]
        );
    }

    #[test]
    fn central_second_derivative_second_order_is_exact() {
        let table = coefficients::<Rational64>(&Scheme::central(2, 2)).expect("solve");
        assert_eq!(
            weights(&table),
            vec![(-1, r(1, 1)), (0, r(-2, 1)), (1, r(1, 1))]
        );
    }

    #[test]
    fn forward_first_derivative_first_order_is_exact() {
        let table = coefficients::<Rational64>(&Scheme::forward(1, 1)).expect("solve");
        assert_eq!(weights(&table), vec![(0, r(-1, 1)), (1, r(1, 1))]);
    }

    #[test]
    fn backward_second_order_first_derivative() {
        let table = coefficients::<Rational64>(&Scheme::backward(1, 2)).expect("solve");
        assert_eq!(
            weights(&table),
            vec![(-2, r(1, 2)), (-1, r(-2, 1)), (0, r(3, 2))]
        );
    }

    #[test]
    fn zero_weights_are_kept_in_the_table() {
        let table = coefficients::<Rational64>(&Scheme::central(3, 2)).expect("solve");
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(0), Some(&r(0, 1)));
        assert_eq!(table.nonzero().count(), 4);
    }

    #[test]
    fn unsorted_custom_offsets_are_keyed_by_offset() {
        let table = solve::<Rational64>(&[1, -1, 0], 1).expect("solve");
        assert_eq!(
            weights(&table),
            vec![(-1, r(-1, 2)), (0, r(0, 1)), (1, r(1, 2))]
        );
    }

    #[test]
    fn float_and_big_rational_agree_with_rational64() {
        let scheme = Scheme::central(4, 4);
        let exact = coefficients::<Rational64>(&scheme).expect("solve");
        let big = coefficients::<BigRational>(&scheme).expect("solve");
        let float = coefficients::<f64>(&scheme).expect("solve");
        for (offset, weight) in exact.iter() {
            let expected = BigRational::new(BigInt::from(*weight.numer()), BigInt::from(*weight.denom()));
            assert_eq!(big.get(offset), Some(&expected));
            let approx = *weight.numer() as f64 / *weight.denom() as f64;
            let got = float.get(offset).copied().expect("offset present");
            assert!((got - approx).abs() < 1e-12, "offset {offset}: {got} vs {approx}");
        }
    }

    #[test]
    fn weights_reach_the_requested_order() {
        for direction in [Direction::Central, Direction::Forward, Direction::Backward] {
            for n in 1..=3 {
                for m in 1..=4 {
                    let table =
                        coefficients::<BigRational>(&Scheme::new(n, m, direction)).expect("solve");
                    let order = table.truncation_order().expect("order");
                    assert!(order >= m, "{direction} n={n} m={m} reached only {order}");
                }
            }
        }
    }

    #[test]
    fn selected_width_is_minimal_within_its_family() {
        for n in 1..=4 {
            for m in 1..=6 {
                // one-sided: dropping the farthest point loses an order
                let narrower = solve::<BigRational>(
                    &(0..(n + m - 1) as i64).collect::<Vec<_>>(),
                    n,
                );
                if let Ok(table) = narrower {
                    assert!(table.truncation_order().expect("order") < m);
                }

                // central: the next smaller symmetric stencil falls short
                let stencil = select(n, m, Direction::Central).expect("select");
                let half = stencil.last() - 1;
                if (2 * half + 1) as usize > n {
                    let offsets: Vec<i64> = (-half..=half).collect();
                    let table = solve::<BigRational>(&offsets, n).expect("solve");
                    assert!(table.truncation_order().expect("order") < m);
                }
            }
        }
    }

    #[test]
    fn duplicate_offsets_are_singular() {
        let err = solve::<Rational64>(&[0, 1, 1], 1).expect_err("expected error");
        assert!(matches!(err, FdmError::SingularSystem(_)));
        assert!(err.to_string().contains("offset 1 appears more than once"));
    }

    #[test]
    fn too_narrow_stencil_is_rejected() {
        assert!(matches!(
            solve::<Rational64>(&[0, 1], 2),
            Err(FdmError::InvalidOrder(_))
        ));
        assert!(matches!(
            solve::<Rational64>(&[], 1),
            Err(FdmError::SingularSystem(_))
        ));
    }

    #[test]
    fn zero_orders_are_rejected() {
        assert!(matches!(
            coefficients::<Rational64>(&Scheme::central(0, 2)),
            Err(FdmError::InvalidOrder(_))
        ));
        assert!(matches!(
            coefficients::<Rational64>(&Scheme::central(1, 0)),
            Err(FdmError::InvalidOrder(_))
        ));
    }

    #[test]
    fn rational64_handles_wide_stencils() {
        for scheme in [
            Scheme::central(1, 10),
            Scheme::central(1, 12),
            Scheme::forward(1, 10),
            Scheme::central(2, 9),
            Scheme::forward(4, 12),
        ] {
            let exact = coefficients::<Rational64>(&scheme).expect("solve");
            let big = coefficients::<BigRational>(&scheme).expect("solve");
            assert_eq!(exact.convert::<BigRational>().expect("widen"), big, "{scheme:?}");
        }
        let c110 = coefficients::<Rational64>(&Scheme::central(1, 10)).expect("solve");
        assert_eq!(c110.get(-5), Some(&r(-1, 1260)));
        assert_eq!(c110.get(1), Some(&r(5, 6)));
    }

    #[test]
    fn rational64_overflow_is_reported() {
        // the weight at the far offset is -1 / (L (L - 1)), beyond i64
        let far = 4_000_000_000;
        let err = solve::<Rational64>(&[0, 1, far], 1).expect_err("expected overflow");
        assert!(matches!(err, FdmError::Overflow("Rational64")));
        let big = solve::<BigRational>(&[0, 1, far], 1).expect("solve");
        let expected = BigRational::new(BigInt::from(-1), BigInt::from(far) * BigInt::from(far - 1));
        assert_eq!(big.get(far), Some(&expected));
    }
}
