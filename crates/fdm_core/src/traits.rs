use num_bigint::BigInt;
use num_rational::{BigRational, Rational64};
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Signed, ToPrimitive, Zero};
use std::fmt::Debug;

/// A field in which stencil weights can be solved and operators assembled.
///
/// Implemented for `f64`, `Rational64` and `BigRational`. The `try_*`
/// operations return `None` when the result cannot be represented
/// (`i64` overflow for `Rational64`, a non-finite result for `f64`), so the
/// solver reports overflow instead of producing wrapped or infinite weights.
/// `BigRational` never fails.
pub trait Coefficient:
    Clone + Debug + PartialEq + PartialOrd + Signed + Send + Sync + 'static
{
    /// Human-readable type name used in errors and logs.
    const NAME: &'static str;

    /// Whether values are exact rationals. Exact types are solved in
    /// `BigRational` and narrowed once, so only the final weights must fit.
    const EXACT: bool;

    fn from_integer(value: i64) -> Self;

    fn try_add(&self, rhs: &Self) -> Option<Self>;
    fn try_sub(&self, rhs: &Self) -> Option<Self>;
    fn try_mul(&self, rhs: &Self) -> Option<Self>;
    fn try_div(&self, rhs: &Self) -> Option<Self>;

    /// Exact rational image of this value (`None` for NaN or infinities).
    fn to_exact(&self) -> Option<BigRational>;

    /// Nearest representable value of an exact rational, if any.
    fn from_exact(value: &BigRational) -> Option<Self>;

    /// Raises `self` to a non-negative integer power with checked products.
    fn try_powi(&self, exponent: usize) -> Option<Self> {
        let mut acc = Self::one();
        for _ in 0..exponent {
            acc = acc.try_mul(self)?;
        }
        Some(acc)
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl Coefficient for f64 {
    const NAME: &'static str = "f64";
    const EXACT: bool = false;

    fn from_integer(value: i64) -> Self {
        value as f64
    }

    fn try_add(&self, rhs: &Self) -> Option<Self> {
        finite(self + rhs)
    }

    fn try_sub(&self, rhs: &Self) -> Option<Self> {
        finite(self - rhs)
    }

    fn try_mul(&self, rhs: &Self) -> Option<Self> {
        finite(self * rhs)
    }

    fn try_div(&self, rhs: &Self) -> Option<Self> {
        finite(self / rhs)
    }

    fn to_exact(&self) -> Option<BigRational> {
        BigRational::from_float(*self)
    }

    fn from_exact(value: &BigRational) -> Option<Self> {
        value.to_f64().and_then(finite)
    }
}

impl Coefficient for Rational64 {
    const NAME: &'static str = "Rational64";
    const EXACT: bool = true;

    fn from_integer(value: i64) -> Self {
        Rational64::from_integer(value)
    }

    fn try_add(&self, rhs: &Self) -> Option<Self> {
        CheckedAdd::checked_add(self, rhs)
    }

    fn try_sub(&self, rhs: &Self) -> Option<Self> {
        CheckedSub::checked_sub(self, rhs)
    }

    fn try_mul(&self, rhs: &Self) -> Option<Self> {
        CheckedMul::checked_mul(self, rhs)
    }

    fn try_div(&self, rhs: &Self) -> Option<Self> {
        CheckedDiv::checked_div(self, rhs)
    }

    fn to_exact(&self) -> Option<BigRational> {
        Some(BigRational::new(
            BigInt::from(*self.numer()),
            BigInt::from(*self.denom()),
        ))
    }

    fn from_exact(value: &BigRational) -> Option<Self> {
        let numer = value.numer().to_i64()?;
        let denom = value.denom().to_i64()?;
        Some(Rational64::new(numer, denom))
    }
}

impl Coefficient for BigRational {
    const NAME: &'static str = "BigRational";
    const EXACT: bool = true;

    fn from_integer(value: i64) -> Self {
        BigRational::from_integer(BigInt::from(value))
    }

    fn try_add(&self, rhs: &Self) -> Option<Self> {
        Some(self + rhs)
    }

    fn try_sub(&self, rhs: &Self) -> Option<Self> {
        Some(self - rhs)
    }

    fn try_mul(&self, rhs: &Self) -> Option<Self> {
        Some(self * rhs)
    }

    fn try_div(&self, rhs: &Self) -> Option<Self> {
        if rhs.is_zero() {
            None
        } else {
            Some(self / rhs)
        }
    }

    fn to_exact(&self) -> Option<BigRational> {
        Some(self.clone())
    }

    fn from_exact(value: &BigRational) -> Option<Self> {
        Some(value.clone())
    }
}

/// Converts between coefficient types through the exact rational bridge.
pub fn convert<C: Coefficient, T: Coefficient>(value: &C) -> Option<T> {
    T::from_exact(&value.to_exact()?)
}
