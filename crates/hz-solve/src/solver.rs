//! Solver service tying an equation of state, its configuration and a memo
//! together, plus the physical-unit entry points.

use crate::bracket::{BracketMethod, Bracketed, bracket_delta};
use crate::config::SolverConfig;
use crate::error::SolveResult;
use crate::halley::delta_p_tau;
use crate::memo::{MemoStore, MemoTable};
use crate::solution::{DensitySolution, Request};
use hz_core::units::{Density, Pressure, Temperature, kg_per_m3, kpa, to_k, to_kpa};
use hz_core::{Real, ensure_finite, ensure_positive};
use hz_eos::HelmholtzEos;

/// Density and saturation solver for one fluid.
///
/// All solve methods take `&self`; with a thread-safe memo (the default
/// [`MemoTable`]) one solver can serve several threads at once.
pub struct HelmholtzSolver<M: HelmholtzEos, S: MemoStore = MemoTable> {
    pub(crate) eos: M,
    pub(crate) config: SolverConfig,
    pub(crate) memo: S,
}

impl<M: HelmholtzEos> HelmholtzSolver<M, MemoTable> {
    /// Create a solver with a fresh in-memory memo sized from `config.memo`.
    pub fn new(eos: M, config: SolverConfig) -> SolveResult<Self> {
        let memo = MemoTable::new(config.memo);
        Self::with_memo(eos, config, memo)
    }
}

impl<M: HelmholtzEos, S: MemoStore> HelmholtzSolver<M, S> {
    pub fn with_memo(eos: M, config: SolverConfig, memo: S) -> SolveResult<Self> {
        config.validate()?;
        eos.constants().validate()?;
        Ok(Self { eos, config, memo })
    }

    pub fn eos(&self) -> &M {
        &self.eos
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn memo(&self) -> &S {
        &self.memo
    }

    /// Bracketing seed between physical densities `rho_a`, `rho_b` [kg/m³].
    pub fn bracket_seed(
        &self,
        pr: Real,
        tau: Real,
        rho_a: Real,
        rho_b: Real,
        method: BracketMethod,
    ) -> Bracketed {
        bracket_delta(
            &self.eos,
            &self.config.bracket,
            pr,
            tau,
            rho_a,
            rho_b,
            method,
        )
    }

    /// Halley solve from an explicit initial guess. Not memoized.
    pub fn delta_p_tau(
        &self,
        pr: Real,
        tau: Real,
        delta_0: Real,
        tol: Real,
        request: Request,
    ) -> DensitySolution {
        delta_p_tau(
            &self.eos,
            self.config.density.max_iter,
            pr,
            tau,
            delta_0,
            tol,
            request,
        )
    }

    /// Halley solve seeded by a bracket search between `rho_a` and `rho_b`.
    /// Not memoized.
    #[allow(clippy::too_many_arguments)]
    pub fn delta_bracketed(
        &self,
        pr: Real,
        tau: Real,
        rho_a: Real,
        rho_b: Real,
        method: BracketMethod,
        tol: Real,
        request: Request,
    ) -> DensitySolution {
        let seed = self.bracket_seed(pr, tau, rho_a, rho_b, method);
        self.delta_p_tau(pr, tau, seed.delta, tol, request)
    }

    fn reduce_state(&self, p: Pressure, t: Temperature) -> SolveResult<(Real, Real)> {
        let p_kpa = ensure_positive(to_kpa(p), "pressure")?;
        let tau = self.reduce_temperature(t)?;
        Ok((p_kpa, tau))
    }

    fn reduce_temperature(&self, t: Temperature) -> SolveResult<Real> {
        let t_k = ensure_positive(to_k(t), "temperature")?;
        Ok(ensure_finite(self.eos.constants().tau(t_k), "inverse reduced temperature")?)
    }

    fn density_of(&self, delta: Real) -> Density {
        kg_per_m3(self.eos.constants().density(delta))
    }

    /// Liquid-branch (or supercritical) density at `(p, T)`.
    pub fn liquid_density(&self, p: Pressure, t: Temperature) -> SolveResult<Density> {
        let (p_kpa, tau) = self.reduce_state(p, t)?;
        Ok(self.density_of(self.delta_liq(p_kpa, tau, Request::Value).delta))
    }

    /// Vapor-branch (or supercritical) density at `(p, T)`.
    pub fn vapor_density(&self, p: Pressure, t: Temperature) -> SolveResult<Density> {
        let (p_kpa, tau) = self.reduce_state(p, t)?;
        Ok(self.density_of(self.delta_vap(p_kpa, tau, Request::Value).delta))
    }

    /// Coexisting (liquid, vapor) densities at `T`.
    pub fn saturation_densities(&self, t: Temperature) -> SolveResult<(Density, Density)> {
        let tau = self.reduce_temperature(t)?;
        let liq = self.sat_delta_liq(tau);
        let vap = self.sat_delta_vap(tau);
        Ok((self.density_of(liq.value), self.density_of(vap.value)))
    }

    /// Vapor pressure at `T`.
    pub fn saturation_pressure(&self, t: Temperature) -> SolveResult<Pressure> {
        let tau = self.reduce_temperature(t)?;
        Ok(kpa(self.sat_p(tau).value))
    }
}
