//! Equation-of-state trait consumed by the density and saturation solvers.

use crate::constants::CriticalConstants;
use hz_core::{Derivs2, Real};

/// Helmholtz-energy equation of state in reduced variables.
///
/// Every method is a pure function of reduced density `δ` and inverse reduced
/// temperature `τ`. Pressure is in kPa and Gibbs energy in kJ/kg; derivative
/// containers are ordered `(δ, τ)`, so `grad = [∂/∂δ, ∂/∂τ]` and
/// `hes = [∂²/∂δ², ∂²/∂δ∂τ, ∂²/∂τ²]`.
///
/// Implementations must be thread-safe (Send + Sync) to support parallel evaluation.
pub trait HelmholtzEos: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    fn constants(&self) -> &CriticalConstants;

    /// Pressure [kPa].
    fn pressure(&self, delta: Real, tau: Real) -> Real;

    /// Pressure [kPa] with gradient and Hessian in `(δ, τ)`.
    fn pressure_derivs(&self, delta: Real, tau: Real) -> Derivs2;

    /// Residual Helmholtz energy `φʳ`.
    fn phir(&self, delta: Real, tau: Real) -> Real;

    /// `∂φʳ/∂δ`
    fn phir_delta(&self, delta: Real, tau: Real) -> Real;

    /// `∂²φʳ/∂δ²`
    fn phir_delta2(&self, delta: Real, tau: Real) -> Real;

    /// Specific Gibbs energy [kJ/kg].
    fn gibbs(&self, delta: Real, tau: Real) -> Real;

    /// Specific Gibbs energy [kJ/kg] with gradient and Hessian in `(δ, τ)`.
    fn gibbs_derivs(&self, delta: Real, tau: Real) -> Derivs2;
}

impl<M: HelmholtzEos + ?Sized> HelmholtzEos for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn constants(&self) -> &CriticalConstants {
        (**self).constants()
    }

    fn pressure(&self, delta: Real, tau: Real) -> Real {
        (**self).pressure(delta, tau)
    }

    fn pressure_derivs(&self, delta: Real, tau: Real) -> Derivs2 {
        (**self).pressure_derivs(delta, tau)
    }

    fn phir(&self, delta: Real, tau: Real) -> Real {
        (**self).phir(delta, tau)
    }

    fn phir_delta(&self, delta: Real, tau: Real) -> Real {
        (**self).phir_delta(delta, tau)
    }

    fn phir_delta2(&self, delta: Real, tau: Real) -> Real {
        (**self).phir_delta2(delta, tau)
    }

    fn gibbs(&self, delta: Real, tau: Real) -> Real {
        (**self).gibbs(delta, tau)
    }

    fn gibbs_derivs(&self, delta: Real, tau: Real) -> Derivs2 {
        (**self).gibbs_derivs(delta, tau)
    }
}
