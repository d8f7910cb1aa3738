use thiserror::Error;

#[derive(Debug, Error)]
pub enum FdmError {
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("grid of {grid_size} points cannot host a stencil of width {width}")]
    GridTooSmall { grid_size: usize, width: usize },

    #[error("singular moment system: {0}")]
    SingularSystem(String),

    /// The sampled function failed; `source` is the caller's own error.
    #[error("function evaluation failed at stencil offset {offset}: {source}")]
    DomainError {
        offset: i64,
        #[source]
        source: anyhow::Error,
    },

    #[error("grid spacing must be finite and nonzero")]
    InvalidSpacing,

    #[error("value not representable as {0}")]
    Conversion(String),

    #[error("arithmetic overflow in {0} coefficients")]
    Overflow(&'static str),

    #[error("sparse assembly failed: {0}")]
    Sparse(String),
}

pub type FdmResult<T> = Result<T, FdmError>;
