//! Stencil selection.
//!
//! A stencil is the ordered set of grid offsets a finite difference samples.
//! [`select`] returns the narrowest stencil of a given family that reaches the
//! requested accuracy order:
//!
//! - central: offsets `-p..=p` with `p = (n-1)/2 + (m+1)/2`. Symmetric stencils
//!   only reach even orders, so an odd `m` gets the next even order.
//! - forward: offsets `0..n+m`.
//! - backward: offsets `-(n+m-1)..=0`.

use crate::error::{FdmError, FdmResult};
use crate::types::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stencil {
    direction: Direction,
    offsets: Vec<i64>,
}

impl Stencil {
    /// Builds a stencil from caller-supplied offsets, which must be strictly
    /// increasing.
    pub fn from_offsets(direction: Direction, offsets: Vec<i64>) -> FdmResult<Self> {
        if offsets.is_empty() {
            return Err(FdmError::SingularSystem("stencil has no offsets".into()));
        }
        if let Some(pair) = offsets.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(FdmError::SingularSystem(format!(
                "offsets must be distinct and increasing, found {} before {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self { direction, offsets })
    }

    /// Contiguous stencil `first..first + width`.
    pub(crate) fn window(direction: Direction, first: i64, width: usize) -> Self {
        Self {
            direction,
            offsets: (first..first + width as i64).collect(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    pub fn width(&self) -> usize {
        self.offsets.len()
    }

    pub fn first(&self) -> i64 {
        self.offsets[0]
    }

    pub fn last(&self) -> i64 {
        self.offsets[self.offsets.len() - 1]
    }
}

pub(crate) fn check_orders(derivative: usize, accuracy: usize) -> FdmResult<()> {
    if derivative < 1 {
        return Err(FdmError::InvalidOrder(format!(
            "derivative order must be at least 1, got {derivative}"
        )));
    }
    if accuracy < 1 {
        return Err(FdmError::InvalidOrder(format!(
            "accuracy order must be at least 1, got {accuracy}"
        )));
    }
    Ok(())
}

/// Narrowest stencil of `direction` approximating the `derivative`-th
/// derivative to `O(h^accuracy)`.
pub fn select(derivative: usize, accuracy: usize, direction: Direction) -> FdmResult<Stencil> {
    check_orders(derivative, accuracy)?;
    let stencil = match direction {
        Direction::Central => {
            let half = ((derivative - 1) / 2 + (accuracy + 1) / 2) as i64;
            Stencil::window(direction, -half, (2 * half + 1) as usize)
        }
        Direction::Forward => Stencil::window(direction, 0, derivative + accuracy),
        Direction::Backward => {
            let width = derivative + accuracy;
            Stencil::window(direction, 1 - width as i64, width)
        }
    };
    Ok(stencil)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(derivative: usize, accuracy: usize, direction: Direction) -> Vec<i64> {
        select(derivative, accuracy, direction)
            .expect("valid orders")
            .offsets()
            .to_vec()
    }

    #[test]
    fn central_stencils_follow_classical_widths() {
        assert_eq!(offsets(1, 2, Direction::Central), vec![-1, 0, 1]);
        assert_eq!(offsets(2, 2, Direction::Central), vec![-1, 0, 1]);
        assert_eq!(offsets(3, 2, Direction::Central), vec![-2, -1, 0, 1, 2]);
        assert_eq!(offsets(4, 4, Direction::Central).len(), 7);
        assert_eq!(offsets(2, 8, Direction::Central).len(), 9);
    }

    #[test]
    fn odd_central_accuracy_rounds_up_to_next_even_order() {
        assert_eq!(offsets(1, 1, Direction::Central), offsets(1, 2, Direction::Central));
        assert_eq!(offsets(2, 3, Direction::Central), offsets(2, 4, Direction::Central));
    }

    #[test]
    fn one_sided_stencils_have_width_n_plus_m() {
        assert_eq!(offsets(1, 1, Direction::Forward), vec![0, 1]);
        assert_eq!(offsets(2, 2, Direction::Forward), vec![0, 1, 2, 3]);
        assert_eq!(offsets(1, 2, Direction::Backward), vec![-2, -1, 0]);
        assert_eq!(offsets(3, 1, Direction::Backward), vec![-3, -2, -1, 0]);
    }

    #[test]
    fn family_invariants_hold() {
        for n in 1..=4 {
            for m in 1..=8 {
                let central = offsets(n, m, Direction::Central);
                assert!(central.iter().zip(central.iter().rev()).all(|(a, b)| *a == -*b));
                assert!(central.len() >= n + 1);

                let forward = offsets(n, m, Direction::Forward);
                assert_eq!(forward[0], 0);
                assert!(forward.iter().all(|i| *i >= 0));

                let backward = offsets(n, m, Direction::Backward);
                assert_eq!(*backward.last().unwrap(), 0);
                assert!(backward.iter().all(|i| *i <= 0));
            }
        }
    }

    #[test]
    fn zero_orders_are_rejected() {
        assert!(matches!(
            select(0, 2, Direction::Central),
            Err(FdmError::InvalidOrder(_))
        ));
        assert!(matches!(
            select(1, 0, Direction::Forward),
            Err(FdmError::InvalidOrder(_))
        ));
    }

    #[test]
    fn custom_offsets_must_be_increasing() {
        assert!(Stencil::from_offsets(Direction::Central, vec![-1, 0, 1]).is_ok());
        assert!(matches!(
            Stencil::from_offsets(Direction::Central, vec![0, 0, 1]),
            Err(FdmError::SingularSystem(_))
        ));
        assert!(matches!(
            Stencil::from_offsets(Direction::Forward, vec![]),
            Err(FdmError::SingularSystem(_))
        ));
    }
}
