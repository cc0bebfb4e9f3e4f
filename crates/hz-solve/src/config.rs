//! Iteration caps, tolerances, initial guesses and fallbacks.
//!
//! Everything here is read-only per solver instance. Defaults are tuned for
//! the reduced van der Waals reference fluid; a multiparameter fluid supplies
//! its own values.

use crate::error::{SolveError, SolveResult};

/// Bracketing (bisection / false position) seed solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BracketConfig {
    /// Maximum iterations
    pub max_iter: usize,
    /// Tolerance on the squared bracket width `(b − a)²` in reduced density
    pub tol: f64,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-10,
        }
    }
}

/// Halley density solver and phase selector configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DensityConfig {
    /// Maximum Halley iterations
    pub max_iter: usize,
    /// Absolute pressure residual tolerance on the liquid branch [kPa]
    pub tol_liq: f64,
    /// Absolute pressure residual tolerance on the vapor branch [kPa]
    pub tol_vap: f64,
    /// Initial reduced density for the liquid branch
    pub liq_guess: f64,
    /// Initial reduced density for the vapor branch
    pub vap_guess: f64,
    /// Smallest admissible reduced density
    pub delta_min: f64,
    /// Largest admissible reduced density
    pub delta_max: f64,
    /// Reduced density substituted when the liquid solve is unusable
    pub liq_fallback: f64,
    /// Reduced density substituted when the vapor solve is unusable
    pub vap_fallback: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            max_iter: 50,
            tol_liq: 1e-7,
            tol_vap: 1e-9,
            liq_guess: 2.5,
            vap_guess: 1e-3,
            delta_min: 1e-12,
            delta_max: 5.0,
            liq_fallback: 3.1,
            vap_fallback: 1e-3,
        }
    }
}

impl DensityConfig {
    /// Whether `delta` is a usable solve result.
    pub fn admissible(&self, delta: f64) -> bool {
        !delta.is_nan() && delta >= self.delta_min && delta <= self.delta_max
    }
}

/// Akasaka saturation solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SaturationConfig {
    /// Maximum Akasaka iterations
    pub max_iter: usize,
    /// Tolerance on `|g_v − g_l| / g_l`
    pub tol_rel_g: f64,
    /// Initial saturated liquid reduced density
    pub liq_guess: f64,
    /// Initial saturated vapor reduced density
    pub vap_guess: f64,
    /// Step scale γ applied to the Newton update
    pub gamma: f64,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            max_iter: 50,
            tol_rel_g: 1e-11,
            liq_guess: 2.5,
            vap_guess: 1e-3,
            gamma: 1.0,
        }
    }
}

/// Memo table sizing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MemoConfig {
    /// Entries per table before it is cleared
    pub capacity: usize,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            capacity: 1_000_000,
        }
    }
}

/// Complete solver configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SolverConfig {
    pub bracket: BracketConfig,
    pub density: DensityConfig,
    pub saturation: SaturationConfig,
    pub memo: MemoConfig,
}

fn invalid(what: &str) -> SolveError {
    SolveError::InvalidConfig {
        what: what.to_string(),
    }
}

fn check_positive(v: f64, what: &str) -> SolveResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SolveError::InvalidConfig {
            what: format!("{what} must be positive and finite (got {v})"),
        })
    }
}

impl SolverConfig {
    pub fn validate(&self) -> SolveResult<()> {
        let BracketConfig { max_iter, tol } = self.bracket;
        if max_iter == 0 {
            return Err(invalid("bracket.max_iter must be positive"));
        }
        check_positive(tol, "bracket.tol")?;

        let d = &self.density;
        if d.max_iter == 0 {
            return Err(invalid("density.max_iter must be positive"));
        }
        check_positive(d.tol_liq, "density.tol_liq")?;
        check_positive(d.tol_vap, "density.tol_vap")?;
        check_positive(d.liq_guess, "density.liq_guess")?;
        check_positive(d.vap_guess, "density.vap_guess")?;
        check_positive(d.delta_min, "density.delta_min")?;
        check_positive(d.delta_max, "density.delta_max")?;
        if d.delta_min >= d.delta_max {
            return Err(invalid("density.delta_min must be below density.delta_max"));
        }
        if !d.admissible(d.liq_fallback) || !d.admissible(d.vap_fallback) {
            return Err(invalid(
                "density fallbacks must lie inside [delta_min, delta_max]",
            ));
        }

        let s = &self.saturation;
        if s.max_iter == 0 {
            return Err(invalid("saturation.max_iter must be positive"));
        }
        check_positive(s.tol_rel_g, "saturation.tol_rel_g")?;
        check_positive(s.liq_guess, "saturation.liq_guess")?;
        check_positive(s.vap_guess, "saturation.vap_guess")?;
        check_positive(s.gamma, "saturation.gamma")?;

        if self.memo.capacity == 0 {
            return Err(invalid("memo.capacity must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn fallbacks_are_distinct_from_guesses() {
        let d = DensityConfig::default();
        assert_ne!(d.liq_fallback, d.liq_guess);
        assert!(d.admissible(d.liq_fallback));
        assert!(d.admissible(d.vap_fallback));
    }

    #[test]
    fn admissible_range_is_inclusive() {
        let d = DensityConfig::default();
        assert!(d.admissible(1e-12));
        assert!(d.admissible(5.0));
        assert!(!d.admissible(5.000001));
        assert!(!d.admissible(0.0));
        assert!(!d.admissible(-0.02));
        assert!(!d.admissible(f64::NAN));
    }

    #[test]
    fn rejects_inverted_density_bounds() {
        let mut cfg = SolverConfig::default();
        cfg.density.delta_min = 6.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("delta_min"));
    }

    #[test]
    fn rejects_zero_iteration_caps() {
        let mut cfg = SolverConfig::default();
        cfg.saturation.max_iter = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = SolverConfig::default();
        cfg.bracket.max_iter = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_nan_tolerance_and_bad_fallback() {
        let mut cfg = SolverConfig::default();
        cfg.density.tol_vap = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = SolverConfig::default();
        cfg.density.liq_fallback = 7.0;
        assert!(cfg.validate().is_err());
    }
}
