//! Critical-point constants and reduced-variable conversions.

use crate::error::{EosError, EosResult};

/// Critical constants of a single fluid.
///
/// Units follow the kernels: temperature in K, pressure in kPa, density in
/// kg/m³. Fixed per fluid instance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriticalConstants {
    /// Critical temperature [K]
    pub t_c: f64,
    /// Critical pressure [kPa]
    pub p_c: f64,
    /// Critical density [kg/m³]
    pub rho_c: f64,
}

impl CriticalConstants {
    pub fn new(t_c: f64, p_c: f64, rho_c: f64) -> EosResult<Self> {
        let consts = Self { t_c, p_c, rho_c };
        consts.validate()?;
        Ok(consts)
    }

    /// Critical point of water (IAPWS-95 values).
    pub fn water() -> Self {
        Self {
            t_c: 647.096,
            p_c: 22_064.0,
            rho_c: 322.0,
        }
    }

    pub fn validate(&self) -> EosResult<()> {
        for (what, value) in [
            ("critical temperature", self.t_c),
            ("critical pressure", self.p_c),
            ("critical density", self.rho_c),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EosError::NonPhysical { what, value });
            }
        }
        Ok(())
    }

    /// Inverse reduced temperature `τ = Tc/T`.
    #[inline]
    pub fn tau(&self, t_k: f64) -> f64 {
        self.t_c / t_k
    }

    #[inline]
    pub fn temperature(&self, tau: f64) -> f64 {
        self.t_c / tau
    }

    /// Reduced density `δ = ρ/ρc`.
    #[inline]
    pub fn delta(&self, rho: f64) -> f64 {
        rho / self.rho_c
    }

    #[inline]
    pub fn density(&self, delta: f64) -> f64 {
        delta * self.rho_c
    }
}
