//! Liquid / vapor density selection with memoization and fallback.
//!
//! Each branch is a Halley solve from a fixed phase-specific guess. Results
//! outside the admissible reduced-density range (or not-a-number) are
//! replaced by a fixed fallback with zero derivatives, because an outer
//! solver may evaluate a branch whose phase is absent. The full derivative
//! set is always computed and stored so later requests of any kind hit.

use crate::config::DensityConfig;
use crate::halley::halley;
use crate::memo::{BinStore, MemoStore};
use crate::solution::{DensitySolution, Request, Source};
use crate::solver::HelmholtzSolver;
use hz_core::{Derivs2, Real};
use hz_eos::HelmholtzEos;

/// Density branch to solve on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Phase {
    Liquid,
    Vapor,
}

impl Phase {
    pub fn store(self) -> BinStore {
        match self {
            Phase::Liquid => BinStore::DeltaLiq,
            Phase::Vapor => BinStore::DeltaVap,
        }
    }

    pub fn guess(self, cfg: &DensityConfig) -> Real {
        match self {
            Phase::Liquid => cfg.liq_guess,
            Phase::Vapor => cfg.vap_guess,
        }
    }

    pub fn tol(self, cfg: &DensityConfig) -> Real {
        match self {
            Phase::Liquid => cfg.tol_liq,
            Phase::Vapor => cfg.tol_vap,
        }
    }

    pub fn fallback(self, cfg: &DensityConfig) -> Real {
        match self {
            Phase::Liquid => cfg.liq_fallback,
            Phase::Vapor => cfg.vap_fallback,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Liquid => write!(f, "liquid"),
            Phase::Vapor => write!(f, "vapor"),
        }
    }
}

impl<M: HelmholtzEos, S: MemoStore> HelmholtzSolver<M, S> {
    /// Liquid-branch reduced density at pressure `p` [kPa] and `tau`.
    pub fn delta_liq(&self, p: Real, tau: Real, request: Request) -> DensitySolution {
        self.delta_phase(Phase::Liquid, p, tau, request)
    }

    /// Vapor-branch reduced density at pressure `p` [kPa] and `tau`.
    pub fn delta_vap(&self, p: Real, tau: Real, request: Request) -> DensitySolution {
        self.delta_phase(Phase::Vapor, p, tau, request)
    }

    pub fn delta_phase(
        &self,
        phase: Phase,
        p: Real,
        tau: Real,
        request: Request,
    ) -> DensitySolution {
        let store = phase.store();
        if let Some(hit) = self.memo.get_bin(store, p, tau) {
            return DensitySolution::from_derivs(hit, request, None, Source::Memo);
        }

        let cfg = &self.config.density;
        let (solved, it) = halley(
            &self.eos,
            cfg.max_iter,
            p,
            tau,
            phase.guess(cfg),
            phase.tol(cfg),
            Request::Hessian,
        );
        let (entry, source) = if cfg.admissible(solved.value) {
            if !solved.is_finite() {
                tracing::debug!(
                    %phase,
                    p,
                    tau,
                    delta = solved.value,
                    "non-finite density sensitivities"
                );
            }
            (solved, Source::Solved)
        } else {
            let fallback = phase.fallback(cfg);
            tracing::debug!(
                %phase,
                p,
                tau,
                delta = solved.value,
                fallback,
                "density solve out of range, using fallback"
            );
            (Derivs2::constant(fallback), Source::Fallback)
        };

        self.memo.add_bin(store, p, tau, entry);
        DensitySolution::from_derivs(entry, request, Some(it), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::memo::{MemoTable, NoMemo};
    use hz_eos::VanDerWaals;

    fn solver() -> HelmholtzSolver<VanDerWaals> {
        HelmholtzSolver::new(VanDerWaals::water_like(), SolverConfig::default()).unwrap()
    }

    #[test]
    fn second_call_hits_memo() {
        let s = solver();
        let (delta, tau) = (0.02, 1.2);
        let p = s.eos().pressure(delta, tau);

        let first = s.delta_vap(p, tau, Request::Hessian);
        assert_eq!(first.source, Source::Solved);
        assert!((first.delta - delta).abs() < 1e-9);

        let second = s.delta_vap(p, tau, Request::Hessian);
        assert_eq!(second.source, Source::Memo);
        assert_eq!(second.iterations, None);
        assert_eq!(second.delta.to_bits(), first.delta.to_bits());
        assert_eq!(second.grad, first.grad);
        assert_eq!(second.hes, first.hes);
    }

    #[test]
    fn value_request_still_stores_derivatives() {
        let s = solver();
        let p = s.eos().pressure(2.7, 1.3);
        let plain = s.delta_liq(p, 1.3, Request::Value);
        assert!(plain.grad.is_none());

        let full = s.delta_liq(p, 1.3, Request::Hessian);
        assert_eq!(full.source, Source::Memo);
        assert!(full.grad.is_some_and(|g| g[0] != 0.0));
        assert!(full.hes.is_some());
    }

    #[test]
    fn branches_use_separate_stores() {
        let s = solver();
        let (p, tau) = (1000.0, 1.1);
        s.delta_liq(p, tau, Request::Value);
        let vap = s.delta_vap(p, tau, Request::Value);
        assert_ne!(vap.source, Source::Memo);
    }

    #[test]
    fn negative_pressure_vapor_falls_back() {
        let s = solver();
        let tau = 1.0 / 0.7;
        let sol = s.delta_vap(-1000.0, tau, Request::Hessian);
        assert_eq!(sol.source, Source::Fallback);
        assert_eq!(sol.delta, s.config().density.vap_fallback);
        assert_eq!(sol.grad, Some([0.0; 2]));
        assert_eq!(sol.hes, Some([0.0; 3]));

        let again = s.delta_vap(-1000.0, tau, Request::Value);
        assert_eq!(again.source, Source::Memo);
        assert_eq!(again.delta, sol.delta);
    }

    #[test]
    fn memo_does_not_change_results() {
        let eos = VanDerWaals::water_like();
        let cached = HelmholtzSolver::with_memo(&eos, SolverConfig::default(), MemoTable::default())
            .unwrap();
        let plain = HelmholtzSolver::with_memo(&eos, SolverConfig::default(), NoMemo).unwrap();
        let p = eos.pressure(1.6, 0.9);
        for _ in 0..2 {
            let a = cached.delta_liq(p, 0.9, Request::Hessian);
            let b = plain.delta_liq(p, 0.9, Request::Hessian);
            assert_eq!(a.delta.to_bits(), b.delta.to_bits());
            assert_eq!(a.grad, b.grad);
            assert_eq!(a.hes, b.hes);
        }
    }

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::Liquid.to_string(), "liquid");
        assert_eq!(Phase::Vapor.store(), BinStore::DeltaVap);
    }
}
