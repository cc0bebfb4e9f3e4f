//! Halley iteration for density from pressure and temperature.
//!
//! Solves `p(δ, τ) = pr` for `δ` using the pressure value, slope and
//! curvature in one equation-of-state call per iteration:
//!
//! ```text
//! δ ← δ − f·p_δ / (p_δ² − ½·f·p_δδ),   f = p(δ, τ) − pr
//! ```
//!
//! Sensitivities of the implicit function `δ(p, τ)` follow from
//! differentiating `p(δ(p, τ), τ) = p`:
//!
//! ```text
//! ∂δ/∂p   = 1/p_δ
//! ∂δ/∂τ   = −p_τ · ∂δ/∂p
//! ∂²δ/∂p² = −p_δδ · ∂δ/∂p / p_δ²
//! ∂²δ/∂p∂τ = −(p_δτ + p_δδ · ∂δ/∂τ) / p_δ²
//! ∂²δ/∂τ² = −(∂δ/∂p · (p_ττ + ∂δ/∂τ · p_δτ) + p_τ · ∂²δ/∂p∂τ)
//! ```

use crate::solution::{DensitySolution, Request, Source};
use hz_core::{Derivs2, Real};
use hz_eos::HelmholtzEos;

/// Sensitivities of `δ(p, τ)` from the pressure derivatives at the solution.
///
/// Entries not covered by `request` are left at zero.
pub fn implicit_sensitivities(p: &Derivs2, delta: Real, request: Request) -> Derivs2 {
    let mut out = Derivs2::constant(delta);
    if !request.wants_gradient() {
        return out;
    }
    let [p_d, p_t] = p.grad;
    let [p_dd, p_dt, p_tt] = p.hes;

    let d_p = 1.0 / p_d;
    let d_t = -p_t * d_p;
    out.grad = [d_p, d_t];

    if request.wants_hessian() {
        let d_pp = -p_dd * d_p / p_d / p_d;
        let d_pt = -(p_dt + p_dd * d_t) / p_d / p_d;
        let d_tt = -(d_p * (p_tt + d_t * p_dt) + p_t * d_pt);
        out.hes = [d_pp, d_pt, d_tt];
    }
    out
}

/// Halley solve of `p(δ, τ) = pr` from `delta_0`, returning the solved
/// density with the sensitivities `request` asks for and the iteration count.
///
/// Stops once `|p − pr| < tol` or after `max_iter` iterations; exhausting the
/// cap is not an error, the last iterate is returned.
pub fn halley<M: HelmholtzEos + ?Sized>(
    eos: &M,
    max_iter: usize,
    pr: Real,
    tau: Real,
    delta_0: Real,
    tol: Real,
    request: Request,
) -> (Derivs2, usize) {
    let mut delta = delta_0;
    let mut p = eos.pressure_derivs(delta, tau);
    let mut fun = p.value - pr;
    let mut it = 0;
    while fun.abs() > tol && it < max_iter {
        let [p_d, _] = p.grad;
        delta -= fun * p_d / (p_d * p_d - 0.5 * fun * p.hes[0]);
        p = eos.pressure_derivs(delta, tau);
        fun = p.value - pr;
        it += 1;
        tracing::trace!(iteration = it, delta, residual = fun, "halley step");
    }
    if fun.abs() > tol {
        tracing::debug!(
            pr,
            tau,
            delta,
            residual = fun,
            iterations = it,
            "halley iteration cap reached"
        );
    }
    (implicit_sensitivities(&p, delta, request), it)
}

/// [`halley`] packaged as a [`DensitySolution`].
pub fn delta_p_tau<M: HelmholtzEos + ?Sized>(
    eos: &M,
    max_iter: usize,
    pr: Real,
    tau: Real,
    delta_0: Real,
    tol: Real,
    request: Request,
) -> DensitySolution {
    let (derivs, it) = halley(eos, max_iter, pr, tau, delta_0, tol, request);
    DensitySolution::from_derivs(derivs, request, Some(it), Source::Solved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hz_eos::VanDerWaals;

    #[test]
    fn recovers_supercritical_density() {
        let eos = VanDerWaals::water_like();
        let (delta, tau) = (0.8, 0.9);
        let pr = eos.pressure(delta, tau);
        let sol = delta_p_tau(&eos, 50, pr, tau, 2.5, 1e-8, Request::Value);
        assert!((sol.delta - delta).abs() < 1e-9);
        assert_eq!(sol.source, Source::Solved);
        assert!(sol.grad.is_none() && sol.hes.is_none());
        assert!(sol.iterations.is_some_and(|n| n < 50));
    }

    #[test]
    fn converged_guess_takes_no_iterations() {
        let eos = VanDerWaals::water_like();
        let pr = eos.pressure(0.3, 1.2);
        let sol = delta_p_tau(&eos, 50, pr, 1.2, 0.3, 1e-6, Request::Gradient);
        assert_eq!(sol.iterations, Some(0));
        assert_eq!(sol.delta, 0.3);
    }

    #[test]
    fn gradient_matches_slope() {
        let eos = VanDerWaals::water_like();
        let (delta, tau) = (0.05, 1.3);
        let pr = eos.pressure(delta, tau);
        let sol = delta_p_tau(&eos, 50, pr, tau, 1e-3, 1e-10, Request::Hessian);
        let p = eos.pressure_derivs(sol.delta, tau);
        let grad = sol.grad.expect("gradient requested");
        assert!((grad[0] * p.grad[0] - 1.0).abs() < 1e-12);
        assert!((grad[1] + p.grad[1] * grad[0]).abs() < 1e-12);
        assert!(sol.hes.is_some());
    }

    #[test]
    fn cap_returns_last_iterate() {
        let eos = VanDerWaals::water_like();
        let pr = eos.pressure(0.1, 1.1);
        let sol = delta_p_tau(&eos, 1, pr, 1.1, 1e-3, 1e-14, Request::Value);
        assert_eq!(sol.iterations, Some(1));
        assert!(sol.delta.is_finite());
        assert!(sol.delta != 1e-3);
    }
}
