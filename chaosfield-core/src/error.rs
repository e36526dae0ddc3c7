use thiserror::Error;

/// Errors originating from the numeric engines.
///
/// Numeric degeneracies (a vanishing derivative during Newton iteration) are
/// not errors; they surface as `inf`/`NaN` values in the output arrays.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("polynomial must have at least one non-zero coefficient")]
    ZeroPolynomial,

    #[error("polynomial coefficient {index} is not finite: {value}")]
    NonFiniteCoefficient { index: usize, value: f64 },

    #[error("invalid Newton step count: {0} (must be >= 1)")]
    InvalidStepCount(u32),

    #[error("invalid convergence epsilon: {0} (must be positive and finite)")]
    InvalidEpsilon(f64),

    #[error("invalid grid size: {0} (must be >= 1)")]
    InvalidGridSize(usize),

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid frame count: {0} (must be >= 1)")]
    InvalidFrameCount(usize),

    #[error("invalid trajectory length: {0} (must be >= 1)")]
    InvalidIterationCount(usize),
}
