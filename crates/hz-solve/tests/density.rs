//! Density-from-pressure behaviour against the van der Waals reference fluid.

use hz_eos::{HelmholtzEos, VanDerWaals};
use hz_solve::{BracketMethod, HelmholtzSolver, Request, Source, SolverConfig};
use proptest::prelude::*;

fn solver() -> HelmholtzSolver<VanDerWaals> {
    HelmholtzSolver::new(VanDerWaals::water_like(), SolverConfig::default()).unwrap()
}

proptest! {
    #[test]
    fn supercritical_round_trip(tau in 0.5_f64..0.85, delta in 0.05_f64..2.0) {
        let s = solver();
        let p = s.eos().pressure(delta, tau);
        let sol = s.delta_liq(p, tau, Request::Value);
        prop_assert_eq!(sol.source, Source::Solved);
        prop_assert!((sol.delta - delta).abs() < 1e-8, "got {} want {}", sol.delta, delta);
    }

    #[test]
    fn vapor_round_trip(tau in 1.1_f64..2.0, delta in 1e-4_f64..0.02) {
        let s = solver();
        let p = s.eos().pressure(delta, tau);
        let sol = s.delta_vap(p, tau, Request::Value);
        prop_assert!((sol.delta - delta).abs() < 1e-10);
    }

    #[test]
    fn liquid_round_trip(tau in 1.1_f64..2.0, delta in 2.5_f64..2.9) {
        let s = solver();
        let p = s.eos().pressure(delta, tau);
        let sol = s.delta_liq(p, tau, Request::Value);
        prop_assert!((sol.delta - delta).abs() < 1e-8);
    }

    #[test]
    fn unusable_vapor_solve_is_replaced(p in -1e5_f64..-1000.0, tau in 1.2_f64..2.0) {
        let s = solver();
        let sol = s.delta_vap(p, tau, Request::Hessian);
        prop_assert_eq!(sol.source, Source::Fallback);
        prop_assert_eq!(sol.delta, s.config().density.vap_fallback);
        prop_assert_eq!(sol.grad, Some([0.0; 2]));
        prop_assert_eq!(sol.hes, Some([0.0; 3]));
    }
}

#[test]
fn unusable_liquid_solve_is_replaced() {
    let s = solver();
    let sol = s.delta_liq(-1e5, 2.0, Request::Hessian);
    assert_eq!(sol.source, Source::Fallback);
    assert_eq!(sol.delta, s.config().density.liq_fallback);
    assert_ne!(sol.delta, s.config().density.liq_guess);
    assert_eq!(sol.grad, Some([0.0; 2]));
    assert_eq!(sol.hes, Some([0.0; 3]));
}

#[test]
fn critical_point_is_fixed() {
    let s = solver();
    let pc = s.eos().constants().p_c;
    let rho_c = s.eos().constants().rho_c;
    for method in [BracketMethod::Bisection, BracketMethod::FalsePosition] {
        let seed = s.bracket_seed(pc, 1.0, 0.5 * rho_c, 1.5 * rho_c, method);
        assert_eq!(seed.delta, 1.0);
        assert_eq!(seed.iterations, 0);
    }
    let sol = s.delta_p_tau(pc, 1.0, 1.0, 1e-9, Request::Value);
    assert_eq!(sol.delta, 1.0);
    assert_eq!(sol.iterations, Some(0));
}

/// Central differences of the solved density against the analytic
/// sensitivities.
#[test]
fn sensitivities_match_finite_differences() {
    let s = solver();
    let (delta, tau) = (0.6, 0.9);
    let p = s.eos().pressure(delta, tau);
    let sol = s.delta_p_tau(p, tau, delta, 1e-10, Request::Hessian);
    let [d_p, d_t] = sol.grad.unwrap();
    let [d_pp, d_pt, d_tt] = sol.hes.unwrap();

    let at = |p: f64, tau: f64| s.delta_p_tau(p, tau, delta, 1e-11, Request::Value).delta;
    let (hp, ht) = (1.0, 1e-4);

    let fd_p = (at(p + hp, tau) - at(p - hp, tau)) / (2.0 * hp);
    let fd_t = (at(p, tau + ht) - at(p, tau - ht)) / (2.0 * ht);
    assert!((d_p - fd_p).abs() < 1e-5 * d_p.abs(), "{d_p} vs {fd_p}");
    assert!((d_t - fd_t).abs() < 1e-5 * d_t.abs(), "{d_t} vs {fd_t}");

    let grad_at = |p: f64, tau: f64| {
        s.delta_p_tau(p, tau, delta, 1e-11, Request::Gradient)
            .grad
            .unwrap()
    };
    let fd_pp = (grad_at(p + hp, tau)[0] - grad_at(p - hp, tau)[0]) / (2.0 * hp);
    let fd_pt = (grad_at(p, tau + ht)[0] - grad_at(p, tau - ht)[0]) / (2.0 * ht);
    let fd_tt = (grad_at(p, tau + ht)[1] - grad_at(p, tau - ht)[1]) / (2.0 * ht);
    assert!((d_pp - fd_pp).abs() < 1e-4 * d_pp.abs(), "{d_pp} vs {fd_pp}");
    assert!((d_pt - fd_pt).abs() < 1e-4 * d_pt.abs(), "{d_pt} vs {fd_pt}");
    assert!((d_tt - fd_tt).abs() < 1e-4 * d_tt.abs(), "{d_tt} vs {fd_tt}");
}
