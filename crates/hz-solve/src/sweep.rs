//! Property sweeps over temperature and pressure.
//!
//! Points are generated from a [`SweepDefinition`] and evaluated in parallel
//! with rayon. Every worker shares the solver (and its memo), so repeating a
//! sweep is served from the memo.

use crate::error::{SolveError, SolveResult};
use crate::memo::MemoStore;
use crate::phase::Phase;
use crate::solution::{Request, Source};
use crate::solver::HelmholtzSolver;
use hz_core::{Real, ensure_positive};
use hz_eos::HelmholtzEos;
use rayon::prelude::*;
use std::fmt;

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SweepType {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// Range of a single swept quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepDefinition {
    pub start: Real,
    pub end: Real,
    pub num_points: usize,
    pub sweep_type: SweepType,
}

impl SweepDefinition {
    pub fn new(
        start: Real,
        end: Real,
        num_points: usize,
        sweep_type: SweepType,
    ) -> SolveResult<Self> {
        if num_points < 2 {
            return Err(SolveError::InvalidConfig {
                what: "sweep must have at least 2 points".to_string(),
            });
        }
        if !start.is_finite() || !end.is_finite() || (start - end).abs() < 1e-12 {
            return Err(SolveError::InvalidConfig {
                what: format!("sweep bounds must be finite and distinct (got {start}, {end})"),
            });
        }
        if sweep_type == SweepType::Logarithmic && (start <= 0.0 || end <= 0.0) {
            return Err(SolveError::InvalidConfig {
                what: "logarithmic sweep bounds must be positive".to_string(),
            });
        }
        Ok(Self {
            start,
            end,
            num_points,
            sweep_type,
        })
    }

    /// Generate all points in the sweep, ending exactly on `end`.
    pub fn generate_points(&self) -> Vec<Real> {
        let n = self.num_points;
        if n < 2 {
            return vec![self.start];
        }
        let (lo, hi) = match self.sweep_type {
            SweepType::Linear => (self.start, self.end),
            SweepType::Logarithmic => (self.start.ln(), self.end.ln()),
        };
        let step = (hi - lo) / (n - 1) as Real;
        let mut points: Vec<Real> = (0..n)
            .map(|i| {
                let x = lo + i as Real * step;
                match self.sweep_type {
                    SweepType::Linear => x,
                    SweepType::Logarithmic => x.exp(),
                }
            })
            .collect();
        points[n - 1] = self.end;
        points
    }
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep from {} to {} ({} points, {})",
            self.start, self.end, self.num_points, self.sweep_type
        )
    }
}

/// One point of a saturation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SaturationPoint {
    pub temperature_k: Real,
    pub tau: Real,
    pub pressure_kpa: Real,
    pub rho_liq: Real,
    pub rho_vap: Real,
    pub iterations: usize,
}

/// One point of an isotherm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IsothermPoint {
    pub pressure_kpa: Real,
    pub delta: Real,
    pub rho: Real,
    pub fallback: bool,
}

/// Coexistence densities and vapor pressure at each temperature [K].
pub fn saturation_curve<M, S>(
    solver: &HelmholtzSolver<M, S>,
    temperatures_k: &[Real],
) -> SolveResult<Vec<SaturationPoint>>
where
    M: HelmholtzEos,
    S: MemoStore,
{
    for &t in temperatures_k {
        ensure_positive(t, "temperature")?;
    }
    let consts = *solver.eos().constants();
    let points = temperatures_k
        .par_iter()
        .map(|&t| {
            let tau = consts.tau(t);
            let sat = solver.sat(tau);
            let p = solver.sat_p(tau);
            SaturationPoint {
                temperature_k: t,
                tau,
                pressure_kpa: p.value,
                rho_liq: consts.density(sat.liquid.value),
                rho_vap: consts.density(sat.vapor.value),
                iterations: sat.iterations,
            }
        })
        .collect();
    Ok(points)
}

/// Densities on one phase branch at fixed temperature [K] over pressures [kPa].
pub fn isotherm<M, S>(
    solver: &HelmholtzSolver<M, S>,
    temperature_k: Real,
    pressures_kpa: &[Real],
    phase: Phase,
) -> SolveResult<Vec<IsothermPoint>>
where
    M: HelmholtzEos,
    S: MemoStore,
{
    ensure_positive(temperature_k, "temperature")?;
    let consts = *solver.eos().constants();
    let tau = consts.tau(temperature_k);
    let points = pressures_kpa
        .par_iter()
        .map(|&p| {
            let sol = solver.delta_phase(phase, p, tau, Request::Value);
            IsothermPoint {
                pressure_kpa: p,
                delta: sol.delta,
                rho: consts.density(sol.delta),
                fallback: sol.source == Source::Fallback,
            }
        })
        .collect();
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_points() {
        let sweep = SweepDefinition::new(300.0, 400.0, 5, SweepType::Linear).unwrap();
        assert_eq!(sweep.generate_points(), vec![300.0, 325.0, 350.0, 375.0, 400.0]);
    }

    #[test]
    fn logarithmic_points() {
        let sweep = SweepDefinition::new(1.0, 1000.0, 4, SweepType::Logarithmic).unwrap();
        let points = sweep.generate_points();
        for (got, want) in points.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
            assert!((got - want).abs() < 1e-9 * want);
        }
        assert_eq!(points[3], 1000.0);
    }

    #[test]
    fn rejects_bad_definitions() {
        assert!(SweepDefinition::new(1.0, 2.0, 1, SweepType::Linear).is_err());
        assert!(SweepDefinition::new(1.0, 1.0, 3, SweepType::Linear).is_err());
        assert!(SweepDefinition::new(-1.0, 2.0, 3, SweepType::Logarithmic).is_err());
        assert!(SweepDefinition::new(0.0, f64::NAN, 3, SweepType::Linear).is_err());
    }

    #[test]
    fn descending_sweep() {
        let sweep = SweepDefinition::new(10.0, 0.0, 3, SweepType::Linear).unwrap();
        assert_eq!(sweep.generate_points(), vec![10.0, 5.0, 0.0]);
    }
}
