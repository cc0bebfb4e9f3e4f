//! Reduced van der Waals fluid in Helmholtz form.
//!
//! Residual part:
//!
//! ```text
//! φʳ(δ, τ) = −ln(1 − δ/3) − (9/8)·δ·τ
//! ```
//!
//! which puts the critical point exactly at `(δ, τ) = (1, 1)` and gives the
//! reduced pressure
//!
//! ```text
//! p(δ, τ) = Pc · (8δ / (τ(3 − δ)) − 3δ²)
//! ```
//!
//! The ideal part is `φ° = ln δ + n₁ + n₂τ + n₃ ln τ`. Only the Gibbs energy
//! sees it, and `n₁, n₂` cancel out of every phase-equilibrium condition.
//!
//! The specific gas constant is tied to the critical constants through the
//! van der Waals critical compressibility `Zc = 3/8`, so the model is
//! self-consistent for any `(Tc, Pc, ρc)`.

use crate::constants::CriticalConstants;
use crate::error::{EosError, EosResult};
use crate::model::HelmholtzEos;
use hz_core::{Derivs2, Real};

/// Coefficients of the ideal-gas Helmholtz part `φ° = ln δ + n₁ + n₂τ + n₃ ln τ`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdealPart {
    pub n1: Real,
    pub n2: Real,
    pub n3: Real,
}

impl Default for IdealPart {
    fn default() -> Self {
        // n3 = cv°/R of a monatomic gas
        Self {
            n1: -1.0,
            n2: 0.0,
            n3: 1.5,
        }
    }
}

/// Van der Waals fluid scaled onto a set of critical constants.
#[derive(Clone, Debug)]
pub struct VanDerWaals {
    constants: CriticalConstants,
    ideal: IdealPart,
    /// Specific gas constant [kJ/(kg·K)]
    r: Real,
}

impl VanDerWaals {
    const ZC: Real = 3.0 / 8.0;

    pub fn new(constants: CriticalConstants, ideal: IdealPart) -> EosResult<Self> {
        constants.validate()?;
        if ![ideal.n1, ideal.n2, ideal.n3].iter().all(|n| n.is_finite()) {
            return Err(EosError::InvalidArg {
                what: "ideal-part coefficients must be finite",
            });
        }
        let r = constants.p_c / (Self::ZC * constants.rho_c * constants.t_c);
        Ok(Self { constants, ideal, r })
    }

    /// Van der Waals fluid on the critical point of water.
    pub fn water_like() -> Self {
        let constants = CriticalConstants::water();
        let r = constants.p_c / (Self::ZC * constants.rho_c * constants.t_c);
        Self {
            constants,
            ideal: IdealPart::default(),
            r,
        }
    }

    /// Specific gas constant [kJ/(kg·K)].
    pub fn gas_constant(&self) -> Real {
        self.r
    }

    pub fn ideal_part(&self) -> &IdealPart {
        &self.ideal
    }

    /// Reduced Gibbs energy `g/(RT) = 1 + φ° + φʳ + δ·φʳ_δ` and its derivatives.
    fn reduced_gibbs(&self, delta: Real, tau: Real) -> Derivs2 {
        let IdealPart { n1, n2, n3 } = self.ideal;
        let w = 3.0 - delta;
        let value = 1.0 + delta.ln() + n1 + n2 * tau + n3 * tau.ln() - (w / 3.0).ln()
            + delta / w
            - 2.25 * delta * tau;
        let h_d = 1.0 / delta + 1.0 / w + 3.0 / (w * w) - 2.25 * tau;
        let h_t = n2 + n3 / tau - 2.25 * delta;
        let h_dd = -1.0 / (delta * delta) + 1.0 / (w * w) + 6.0 / (w * w * w);
        let h_dt = -2.25;
        let h_tt = -n3 / (tau * tau);
        Derivs2::new(value, [h_d, h_t], [h_dd, h_dt, h_tt])
    }
}

impl HelmholtzEos for VanDerWaals {
    fn name(&self) -> &str {
        "van der Waals"
    }

    fn constants(&self) -> &CriticalConstants {
        &self.constants
    }

    fn pressure(&self, delta: Real, tau: Real) -> Real {
        let pc = self.constants.p_c;
        pc * (8.0 * delta / (tau * (3.0 - delta)) - 3.0 * delta * delta)
    }

    fn pressure_derivs(&self, delta: Real, tau: Real) -> Derivs2 {
        let pc = self.constants.p_c;
        let w = 3.0 - delta;
        let value = pc * (8.0 * delta / (tau * w) - 3.0 * delta * delta);
        let p_d = pc * (24.0 / (tau * w * w) - 6.0 * delta);
        let p_t = -pc * 8.0 * delta / (tau * tau * w);
        let p_dd = pc * (48.0 / (tau * w * w * w) - 6.0);
        let p_dt = -pc * 24.0 / (tau * tau * w * w);
        let p_tt = pc * 16.0 * delta / (tau * tau * tau * w);
        Derivs2::new(value, [p_d, p_t], [p_dd, p_dt, p_tt])
    }

    fn phir(&self, delta: Real, tau: Real) -> Real {
        -(1.0 - delta / 3.0).ln() - 1.125 * delta * tau
    }

    fn phir_delta(&self, delta: Real, tau: Real) -> Real {
        1.0 / (3.0 - delta) - 1.125 * tau
    }

    fn phir_delta2(&self, delta: Real, _tau: Real) -> Real {
        let w = 3.0 - delta;
        1.0 / (w * w)
    }

    fn gibbs(&self, delta: Real, tau: Real) -> Real {
        self.gibbs_derivs(delta, tau).value
    }

    fn gibbs_derivs(&self, delta: Real, tau: Real) -> Derivs2 {
        // g = C·h/τ with C = R·Tc
        let c = self.r * self.constants.t_c;
        let h = self.reduced_gibbs(delta, tau);
        let [h_d, h_t] = h.grad;
        let [h_dd, h_dt, h_tt] = h.hes;
        let t2 = tau * tau;
        Derivs2::new(
            c * h.value / tau,
            [c * h_d / tau, c * (h_t / tau - h.value / t2)],
            [
                c * h_dd / tau,
                c * (h_dt / tau - h_d / t2),
                c * (h_tt / tau - 2.0 * h_t / t2 + 2.0 * h.value / (t2 * tau)),
            ],
        )
    }
}
