//! Equation-of-state errors.

use hz_core::HzError;
use thiserror::Error;

/// Result type for equation-of-state setup.
pub type EosResult<T> = Result<T, EosError>;

/// Errors raised while building an equation-of-state collaborator.
///
/// Evaluation itself is infallible: kernels are pure functions of `(δ, τ)`
/// and report trouble through non-finite values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    /// Non-physical constant (negative critical pressure, etc.).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<EosError> for HzError {
    fn from(err: EosError) -> Self {
        match err {
            EosError::NonPhysical { what, value } => HzError::NonPositive { what, value },
            EosError::InvalidArg { what } => HzError::InvalidArg { what },
        }
    }
}
