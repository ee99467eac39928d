use thiserror::Error;

/// Error type for invalid operations.
///
/// The curve mathematics itself never fails: degenerate inputs resolve to
/// zero or to an absent fit. Errors only arise at the data boundary.
#[derive(Error, Debug)]
pub enum MaccError {
    #[error("unknown curve model '{0}', expected one of: step, quadratic, piecewise")]
    UnknownCurveModel(String),
    #[error("invalid horizon: {0}")]
    InvalidHorizon(String),
    #[error("failed to parse horizon config: {0}")]
    HorizonConfig(#[from] toml::de::Error),
}

/// Convenience type for `Result<T, MaccError>`.
pub type MaccResult<T> = Result<T, MaccError>;
