use thiserror::Error;

#[derive(Error, Debug)]
pub enum NanoIvfError {
    // Validation errors
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("capacity exceeded: capacity {capacity}, requested {requested}")]
    CapacityExceeded { capacity: usize, requested: usize },

    #[error("invalid metric: {0}")]
    InvalidMetric(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Selector errors
    #[error("container is empty")]
    EmptyContainer,

    // Config errors
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NanoIvfError>;

impl NanoIvfError {
    /// True for errors caused by the caller's input rather than by index state.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            NanoIvfError::DimensionMismatch { .. }
                | NanoIvfError::InvalidMetric(_)
                | NanoIvfError::InvalidArgument(_)
        )
    }
}
