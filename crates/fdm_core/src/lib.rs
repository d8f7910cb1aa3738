//! The `fdm_core` crate computes finite difference stencils on uniform 1-D grids.
//! It is generic over the coefficient type, so the same code produces exact
//! rational weights (`Rational64`, `BigRational`) or floating-point ones (`f64`).
//!
//! Key components:
//! - **Stencil**: selection of central, forward and backward offsets for a derivative/accuracy pair.
//! - **Solvers**: the moment system whose solution is the weight table.
//! - **Operator**: `N × N` sparse differentiation matrices with one-sided or truncated boundary rows.
//! - **Evaluation**: derivative estimates of a sampled function at a point.
//! - **Reference**: Fornberg's 1988 table of classical weights.
pub mod error;
pub mod evaluation;
pub mod operator;
pub mod reference;
pub mod solvers;
pub mod stencil;
pub mod table;
pub mod traits;
pub mod types;

pub use error::{FdmError, FdmResult};
pub use evaluation::{try_value, value};
pub use nalgebra_sparse::CsrMatrix;
pub use num_rational::{BigRational, Rational64};
pub use operator::{convert_operator, matrix, matrix_with_boundary, Assembler};
pub use reference::{fornberg1988, ReferenceEntry, FORNBERG_1988};
pub use solvers::{coefficients, solve};
pub use stencil::{select, Stencil};
pub use table::CoefficientTable;
pub use traits::{convert, Coefficient};
pub use types::{BoundaryPolicy, Direction, Scheme, DEFAULT_SPACING};
