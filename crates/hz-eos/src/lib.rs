//! hz-eos: equation-of-state collaborators for the helmholtz solvers.
//!
//! Provides:
//! - Critical-point constants and reduced-variable conversions
//! - The `HelmholtzEos` trait the solvers consume (pressure, residual
//!   Helmholtz derivatives, Gibbs energy, each with derivatives)
//! - A reduced van der Waals reference fluid implementing the trait
//!
//! # Architecture
//!
//! The solvers in `hz-solve` never see a concrete model. They work in reduced
//! density `δ = ρ/ρc` and inverse reduced temperature `τ = Tc/T` and only
//! call through `HelmholtzEos`, so a multiparameter fluid can be dropped in
//! without touching the inversion code.
//!
//! # Example
//!
//! ```
//! use hz_eos::{HelmholtzEos, VanDerWaals};
//!
//! let eos = VanDerWaals::water_like();
//! let pc = eos.constants().p_c;
//! assert!((eos.pressure(1.0, 1.0) - pc).abs() < 1e-9);
//! ```

pub mod constants;
pub mod error;
pub mod model;
pub mod van_der_waals;

// Re-exports for ergonomics
pub use constants::CriticalConstants;
pub use error::{EosError, EosResult};
pub use model::HelmholtzEos;
pub use van_der_waals::{IdealPart, VanDerWaals};
