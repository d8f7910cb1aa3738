//! Published coefficient sets from B. Fornberg, "Generation of finite
//! difference formulas on arbitrarily spaced grids", Math. Comp. 51 (1988)
//! 699-706, transcribed by hand. Used only to check [`crate::solvers::solve`].
//!
//! Backward formulas are not stored: they are the forward ones mirrored,
//! `c_b(-i) = (-1)^n c_f(i)`.

use crate::table::CoefficientTable;
use crate::types::Direction;
use num_rational::Rational64;

#[derive(Debug, Clone, Copy)]
pub struct ReferenceEntry {
    pub direction: Direction,
    pub derivative: usize,
    pub accuracy: usize,
    /// Offset of the first weight; the rest follow contiguously.
    pub first: i64,
    /// `(numerator, denominator)` pairs.
    pub weights: &'static [(i64, i64)],
}

const fn entry(
    direction: Direction,
    derivative: usize,
    accuracy: usize,
    first: i64,
    weights: &'static [(i64, i64)],
) -> ReferenceEntry {
    ReferenceEntry {
        direction,
        derivative,
        accuracy,
        first,
        weights,
    }
}

#[rustfmt::skip]
pub static FORNBERG_1988: &[ReferenceEntry] = &[
    entry(Direction::Central, 1, 2, -1, &[(-1, 2), (0, 1), (1, 2)]),
    entry(Direction::Central, 1, 4, -2, &[(1, 12), (-2, 3), (0, 1), (2, 3), (-1, 12)]),
    entry(Direction::Central, 1, 6, -3, &[(-1, 60), (3, 20), (-3, 4), (0, 1), (3, 4), (-3, 20), (1, 60)]),
    entry(Direction::Central, 1, 8, -4, &[(1, 280), (-4, 105), (1, 5), (-4, 5), (0, 1), (4, 5), (-1, 5), (4, 105), (-1, 280)]),
    entry(Direction::Central, 2, 2, -1, &[(1, 1), (-2, 1), (1, 1)]),
    entry(Direction::Central, 2, 4, -2, &[(-1, 12), (4, 3), (-5, 2), (4, 3), (-1, 12)]),
    entry(Direction::Central, 2, 6, -3, &[(1, 90), (-3, 20), (3, 2), (-49, 18), (3, 2), (-3, 20), (1, 90)]),
    entry(Direction::Central, 2, 8, -4, &[(-1, 560), (8, 315), (-1, 5), (8, 5), (-205, 72), (8, 5), (-1, 5), (8, 315), (-1, 560)]),
    entry(Direction::Central, 3, 2, -2, &[(-1, 2), (1, 1), (0, 1), (-1, 1), (1, 2)]),
    entry(Direction::Central, 3, 4, -3, &[(1, 8), (-1, 1), (13, 8), (0, 1), (-13, 8), (1, 1), (-1, 8)]),
    entry(Direction::Central, 3, 6, -4, &[(-7, 240), (3, 10), (-169, 120), (61, 30), (0, 1), (-61, 30), (169, 120), (-3, 10), (7, 240)]),
    entry(Direction::Central, 4, 2, -2, &[(1, 1), (-4, 1), (6, 1), (-4, 1), (1, 1)]),
    entry(Direction::Central, 4, 4, -3, &[(-1, 6), (2, 1), (-13, 2), (28, 3), (-13, 2), (2, 1), (-1, 6)]),
    entry(Direction::Central, 4, 6, -4, &[(7, 240), (-2, 5), (169, 60), (-122, 15), (91, 8), (-122, 15), (169, 60), (-2, 5), (7, 240)]),
    entry(Direction::Forward, 1, 1, 0, &[(-1, 1), (1, 1)]),
    entry(Direction::Forward, 1, 2, 0, &[(-3, 2), (2, 1), (-1, 2)]),
    entry(Direction::Forward, 1, 3, 0, &[(-11, 6), (3, 1), (-3, 2), (1, 3)]),
    entry(Direction::Forward, 1, 4, 0, &[(-25, 12), (4, 1), (-3, 1), (4, 3), (-1, 4)]),
    entry(Direction::Forward, 2, 1, 0, &[(1, 1), (-2, 1), (1, 1)]),
    entry(Direction::Forward, 2, 2, 0, &[(2, 1), (-5, 1), (4, 1), (-1, 1)]),
    entry(Direction::Forward, 2, 3, 0, &[(35, 12), (-26, 3), (19, 2), (-14, 3), (11, 12)]),
    entry(Direction::Forward, 2, 4, 0, &[(15, 4), (-77, 6), (107, 6), (-13, 1), (61, 12), (-5, 6)]),
    entry(Direction::Forward, 3, 1, 0, &[(-1, 1), (3, 1), (-3, 1), (1, 1)]),
    entry(Direction::Forward, 3, 2, 0, &[(-5, 2), (9, 1), (-12, 1), (7, 1), (-3, 2)]),
    entry(Direction::Forward, 3, 3, 0, &[(-17, 4), (71, 4), (-59, 2), (49, 2), (-41, 4), (7, 4)]),
    entry(Direction::Forward, 3, 4, 0, &[(-49, 8), (29, 1), (-461, 8), (62, 1), (-307, 8), (13, 1), (-15, 8)]),
    entry(Direction::Forward, 4, 1, 0, &[(1, 1), (-4, 1), (6, 1), (-4, 1), (1, 1)]),
    entry(Direction::Forward, 4, 2, 0, &[(3, 1), (-14, 1), (26, 1), (-24, 1), (11, 1), (-2, 1)]),
    entry(Direction::Forward, 4, 3, 0, &[(35, 6), (-31, 1), (137, 2), (-242, 3), (107, 2), (-19, 1), (17, 6)]),
    entry(Direction::Forward, 4, 4, 0, &[(28, 3), (-111, 2), (142, 1), (-1219, 6), (176, 1), (-185, 2), (82, 3), (-7, 2)]),
];

impl ReferenceEntry {
    pub fn table(&self) -> CoefficientTable<Rational64> {
        let weights = self
            .weights
            .iter()
            .enumerate()
            .map(|(idx, &(numer, denom))| (self.first + idx as i64, Rational64::new(numer, denom)))
            .collect();
        CoefficientTable::new(self.derivative, weights)
    }
}

/// Reference weights for `(direction, n, m)`, if the table covers them.
pub fn fornberg1988(
    direction: Direction,
    derivative: usize,
    accuracy: usize,
) -> Option<CoefficientTable<Rational64>> {
    let lookup = |direction: Direction| {
        FORNBERG_1988.iter().find(|entry| {
            entry.direction == direction
                && entry.derivative == derivative
                && entry.accuracy == accuracy
        })
    };
    match direction {
        Direction::Central | Direction::Forward => lookup(direction).map(ReferenceEntry::table),
        Direction::Backward => {
            let forward = lookup(Direction::Forward)?;
            let sign = if derivative % 2 == 0 { 1 } else { -1 };
            let weights = forward
                .table()
                .iter()
                .map(|(offset, weight)| (-offset, *weight * sign))
                .collect();
            Some(CoefficientTable::new(derivative, weights))
        }
    }
}
