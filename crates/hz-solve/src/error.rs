//! Error types for solver setup and the physical-unit facade.
//!
//! The numeric solves themselves never fail: non-convergence returns the last
//! iterate and out-of-range densities are replaced by fallbacks.

use hz_core::HzError;
use hz_eos::EosError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Invalid input: {0}")]
    Input(#[from] HzError),

    #[error("Equation of state error: {0}")]
    Eos(#[from] EosError),
}

pub type SolveResult<T> = Result<T, SolveError>;

impl From<SolveError> for HzError {
    fn from(e: SolveError) -> Self {
        match e {
            SolveError::InvalidConfig { what: _ } => HzError::InvalidArg {
                what: "solver configuration",
            },
            SolveError::Input(inner) => inner,
            SolveError::Eos(inner) => inner.into(),
        }
    }
}
