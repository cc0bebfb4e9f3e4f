//! Memo behaviour observed through an equation of state that counts its calls.

use hz_core::{Derivs2, Real};
use hz_eos::{CriticalConstants, HelmholtzEos, VanDerWaals};
use hz_solve::{
    HelmholtzSolver, MemoConfig, MemoTable, NoMemo, Request, SolverConfig, Source,
    saturation_curve,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Counting {
    inner: VanDerWaals,
    calls: AtomicUsize,
}

impl Counting {
    fn new() -> Self {
        Self {
            inner: VanDerWaals::water_like(),
            calls: AtomicUsize::new(0),
        }
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl HelmholtzEos for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn constants(&self) -> &CriticalConstants {
        self.inner.constants()
    }

    fn pressure(&self, delta: Real, tau: Real) -> Real {
        self.tick();
        self.inner.pressure(delta, tau)
    }

    fn pressure_derivs(&self, delta: Real, tau: Real) -> Derivs2 {
        self.tick();
        self.inner.pressure_derivs(delta, tau)
    }

    fn phir(&self, delta: Real, tau: Real) -> Real {
        self.tick();
        self.inner.phir(delta, tau)
    }

    fn phir_delta(&self, delta: Real, tau: Real) -> Real {
        self.tick();
        self.inner.phir_delta(delta, tau)
    }

    fn phir_delta2(&self, delta: Real, tau: Real) -> Real {
        self.tick();
        self.inner.phir_delta2(delta, tau)
    }

    fn gibbs(&self, delta: Real, tau: Real) -> Real {
        self.tick();
        self.inner.gibbs(delta, tau)
    }

    fn gibbs_derivs(&self, delta: Real, tau: Real) -> Derivs2 {
        self.tick();
        self.inner.gibbs_derivs(delta, tau)
    }
}

#[test]
fn density_hit_skips_the_model() {
    let s = HelmholtzSolver::new(Counting::new(), SolverConfig::default()).unwrap();
    let tau = 1.3;
    let p = VanDerWaals::water_like().pressure(2.6, tau);

    let first = s.delta_liq(p, tau, Request::Hessian);
    let after_first = s.eos().calls();
    assert!(after_first > 0);

    let second = s.delta_liq(p, tau, Request::Hessian);
    assert_eq!(s.eos().calls(), after_first);
    assert_eq!(second.source, Source::Memo);
    assert_eq!(second.delta.to_bits(), first.delta.to_bits());
    assert_eq!(second.grad, first.grad);
    assert_eq!(second.hes, first.hes);
}

#[test]
fn saturation_hit_skips_the_model() {
    let s = HelmholtzSolver::new(Counting::new(), SolverConfig::default()).unwrap();
    let liq = s.sat_delta_liq(1.4);
    let calls = s.eos().calls();

    assert_eq!(s.sat_delta_liq(1.4), liq);
    // The vapor branch was stored by the same solve
    s.sat_delta_vap(1.4);
    assert_eq!(s.eos().calls(), calls);

    s.sat_p(1.4);
    let with_p = s.eos().calls();
    assert!(with_p > calls);
    s.sat_p(1.4);
    assert_eq!(s.eos().calls(), with_p);
}

#[test]
fn repeated_saturation_curve_skips_the_model() {
    let s = HelmholtzSolver::new(Counting::new(), SolverConfig::default()).unwrap();
    let temps = [400.0, 500.0];
    let first = saturation_curve(&s, &temps).unwrap();
    let calls = s.eos().calls();
    assert!(first.iter().all(|pt| pt.iterations > 0));

    let second = saturation_curve(&s, &temps).unwrap();
    assert_eq!(s.eos().calls(), calls);
    assert!(second.iter().all(|pt| pt.iterations == 0));
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.rho_liq.to_bits(), b.rho_liq.to_bits());
        assert_eq!(a.pressure_kpa.to_bits(), b.pressure_kpa.to_bits());
    }
}

#[test]
fn disabled_memo_always_solves() {
    let s = HelmholtzSolver::with_memo(Counting::new(), SolverConfig::default(), NoMemo).unwrap();
    let p = 5000.0;
    s.delta_vap(p, 1.2, Request::Value);
    let once = s.eos().calls();
    let again = s.delta_vap(p, 1.2, Request::Value);
    assert_eq!(s.eos().calls(), 2 * once);
    assert_eq!(again.source, Source::Solved);
}

#[test]
fn shared_memo_across_solvers() {
    let memo = Arc::new(MemoTable::new(MemoConfig::default()));
    let eos = VanDerWaals::water_like();
    let a = HelmholtzSolver::with_memo(&eos, SolverConfig::default(), Arc::clone(&memo)).unwrap();
    let b = HelmholtzSolver::with_memo(&eos, SolverConfig::default(), Arc::clone(&memo)).unwrap();

    let p = eos.pressure(0.01, 1.5);
    let solved = a.delta_vap(p, 1.5, Request::Gradient);
    let replayed = b.delta_vap(p, 1.5, Request::Gradient);
    assert_eq!(replayed.source, Source::Memo);
    assert_eq!(replayed.delta, solved.delta);
    assert_eq!(memo.stats().snapshot().hits, 1);
}

#[test]
fn concurrent_callers_agree() {
    let s = HelmholtzSolver::new(VanDerWaals::water_like(), SolverConfig::default()).unwrap();
    let p = s.eos().pressure(2.55, 1.8);
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| s.delta_liq(p, 1.8, Request::Hessian)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for r in &results[1..] {
        assert_eq!(r.delta.to_bits(), results[0].delta.to_bits());
        assert_eq!(r.grad, results[0].grad);
    }
}
