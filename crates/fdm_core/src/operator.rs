//! Sparse operators on a uniform grid.
//!
//! Row `r` of an `N × N` operator applies the interior stencil when every
//! sampled index `r + i` lies in `0..N`. Near the edges the
//! [`BoundaryPolicy`] decides:
//!
//! - `OneSided` keeps the interior width `k` and slides the window inward just
//!   enough to fit, `first = clamp(i_1, -r, N - r - k)`, then re-solves the
//!   weights on that window. Such rows still differentiate polynomials of
//!   degree `< k` exactly but carry a larger truncation error than interior
//!   rows.
//! - `Truncate` keeps the interior weights and drops columns outside the grid.
//!
//! Exact zero weights are never stored.

use crate::error::{FdmError, FdmResult};
use crate::solvers::solve;
use crate::stencil::{check_orders, select, Stencil};
use crate::table::CoefficientTable;
use crate::traits::{convert, Coefficient};
use crate::types::{BoundaryPolicy, Scheme};
use nalgebra_sparse::CsrMatrix;
use num_traits::Zero;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Builds operator rows with weights solved in `C` and entries in `T`.
#[derive(Debug, Clone)]
pub struct Assembler<C, T> {
    grid_size: usize,
    derivative: usize,
    stencil: Stencil,
    policy: BoundaryPolicy,
    spacing_power: T,
    interior: Vec<(i64, T)>,
    _solve_in: PhantomData<C>,
}

impl<C: Coefficient, T: Coefficient> Assembler<C, T> {
    pub fn new(
        grid_size: usize,
        scheme: &Scheme,
        spacing: T,
        policy: BoundaryPolicy,
    ) -> FdmResult<Self> {
        check_orders(scheme.derivative, scheme.accuracy)?;
        if spacing.is_zero() || spacing.to_exact().is_none() {
            return Err(FdmError::InvalidSpacing);
        }
        let stencil = select(scheme.derivative, scheme.accuracy, scheme.direction)?;
        if grid_size < stencil.width() {
            return Err(FdmError::GridTooSmall {
                grid_size,
                width: stencil.width(),
            });
        }
        let spacing_power = spacing
            .try_powi(scheme.derivative)
            .filter(|power| !power.is_zero())
            .ok_or(FdmError::Overflow(T::NAME))?;

        let mut assembler = Self {
            grid_size,
            derivative: scheme.derivative,
            stencil,
            policy,
            spacing_power,
            interior: Vec::new(),
            _solve_in: PhantomData,
        };
        let interior = solve::<C>(assembler.stencil.offsets(), assembler.derivative)?;
        assembler.interior = assembler.scaled(&interior)?;
        Ok(assembler)
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn stencil(&self) -> &Stencil {
        &self.stencil
    }

    /// `(column, value)` pairs of one row, ascending by column. Rows outside
    /// the grid are empty.
    pub fn row(&self, row: usize) -> FdmResult<Vec<(usize, T)>> {
        if row >= self.grid_size {
            return Ok(Vec::new());
        }
        let r = row as i64;
        let last_index = self.grid_size as i64 - 1;
        let fits = r + self.stencil.first() >= 0 && r + self.stencil.last() <= last_index;

        let boundary;
        let weights = if fits || self.policy == BoundaryPolicy::Truncate {
            &self.interior
        } else {
            boundary = self.boundary_weights(r)?;
            &boundary
        };

        Ok(weights
            .iter()
            .filter_map(|(offset, value)| {
                let col = r + offset;
                (0..=last_index)
                    .contains(&col)
                    .then(|| (col as usize, value.clone()))
            })
            .collect())
    }

    pub fn assemble(&self) -> FdmResult<CsrMatrix<T>> {
        let mut row_offsets = Vec::with_capacity(self.grid_size + 1);
        let mut col_indices = Vec::with_capacity(self.grid_size * self.stencil.width());
        let mut values = Vec::with_capacity(self.grid_size * self.stencil.width());
        row_offsets.push(0);
        for row in 0..self.grid_size {
            for (col, value) in self.row(row)? {
                col_indices.push(col);
                values.push(value);
            }
            row_offsets.push(col_indices.len());
        }
        debug!(
            grid_size = self.grid_size,
            width = self.stencil.width(),
            direction = %self.stencil.direction(),
            policy = ?self.policy,
            nnz = values.len(),
            "assembled finite difference operator"
        );
        CsrMatrix::try_from_csr_data(
            self.grid_size,
            self.grid_size,
            row_offsets,
            col_indices,
            values,
        )
        .map_err(|err| FdmError::Sparse(err.to_string()))
    }

    fn boundary_weights(&self, row: i64) -> FdmResult<Vec<(i64, T)>> {
        let width = self.stencil.width() as i64;
        let first = self
            .stencil
            .first()
            .clamp(-row, self.grid_size as i64 - row - width);
        let window = Stencil::window(self.stencil.direction(), first, self.stencil.width());
        trace!(row, first, width, "re-deriving boundary stencil");
        let table = solve::<C>(window.offsets(), self.derivative)?;
        self.scaled(&table)
    }

    /// Nonzero weights converted to `T` and divided by `h^n`.
    fn scaled(&self, table: &CoefficientTable<C>) -> FdmResult<Vec<(i64, T)>> {
        table
            .nonzero()
            .map(|(offset, weight)| {
                let converted: T = convert(weight).ok_or_else(|| {
                    FdmError::Conversion(format!("{weight:?} as {}", T::NAME))
                })?;
                let value = converted
                    .try_div(&self.spacing_power)
                    .ok_or(FdmError::Overflow(T::NAME))?;
                Ok((offset, value))
            })
            .collect()
    }
}

/// `N × N` operator for `scheme` on spacing `h`, with one-sided boundary rows.
///
/// Weights are solved in `C` and the entries are produced in `T`, so
/// `matrix::<Rational64, f64>` gives exact weights scaled in floating point.
pub fn matrix<C: Coefficient, T: Coefficient>(
    grid_size: usize,
    scheme: &Scheme,
    spacing: T,
) -> FdmResult<CsrMatrix<T>> {
    matrix_with_boundary::<C, T>(grid_size, scheme, spacing, BoundaryPolicy::default())
}

pub fn matrix_with_boundary<C: Coefficient, T: Coefficient>(
    grid_size: usize,
    scheme: &Scheme,
    spacing: T,
    policy: BoundaryPolicy,
) -> FdmResult<CsrMatrix<T>> {
    Assembler::<C, T>::new(grid_size, scheme, spacing, policy)?.assemble()
}

/// Converts every stored entry of an operator to another coefficient type.
pub fn convert_operator<C: Coefficient, T: Coefficient>(
    operator: &CsrMatrix<C>,
) -> FdmResult<CsrMatrix<T>> {
    let values = operator
        .values()
        .iter()
        .map(|value| {
            convert::<C, T>(value)
                .ok_or_else(|| FdmError::Conversion(format!("{value:?} as {}", T::NAME)))
        })
        .collect::<FdmResult<Vec<T>>>()?;
    CsrMatrix::try_from_csr_data(
        operator.nrows(),
        operator.ncols(),
        operator.row_offsets().to_vec(),
        operator.col_indices().to_vec(),
        values,
    )
    .map_err(|err| FdmError::Sparse(err.to_string()))
}
