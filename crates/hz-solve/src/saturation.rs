//! Vapor-liquid coexistence at fixed temperature.
//!
//! The density pair is found with the Akasaka iteration on the auxiliary
//! functions
//!
//! ```text
//! J(δ) = δ(1 + δ·φʳ_δ)            (reduced pressure)
//! K(δ) = δ·φʳ_δ + φʳ + ln δ       (reduced Gibbs energy, τ terms dropped)
//! ```
//!
//! which makes equal pressure and equal Gibbs energy the pair of conditions
//! `J(δl) = J(δv)`, `K(δl) = K(δv)`. Both densities are updated together and
//! the loop stops on the relative Gibbs energy gap between the phases.
//!
//! τ-derivatives of the pair come from differentiating the coexistence
//! conditions `p(δl, τ) = p(δv, τ)` and `g(δl, τ) = g(δv, τ)`. The linear
//! system couples both phases, so the two branches are always solved and
//! stored together.

use crate::memo::{MemoStore, UnStore};
use crate::solver::HelmholtzSolver;
use hz_core::{Derivs1, Derivs2, Real};
use hz_eos::HelmholtzEos;
use nalgebra::{Matrix2, Vector2};

/// `τ − 1` below which the state is treated as critical or supercritical.
const CRITICAL_TAU_TOL: Real = 1e-12;

/// Coexisting reduced densities with their τ-derivatives.
///
/// At or above the critical temperature both branches are `δ = 1` with
/// zero τ-derivatives; the coupled system is not evaluated there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Saturation {
    pub liquid: Derivs1,
    pub vapor: Derivs1,
    /// Akasaka iterations; zero at or above the critical temperature and on
    /// a memo hit
    pub iterations: usize,
}

/// `J`, `K` and their δ-derivatives at one density.
struct Akasaka {
    j: Real,
    k: Real,
    j_d: Real,
    k_d: Real,
}

impl Akasaka {
    fn at<M: HelmholtzEos + ?Sized>(eos: &M, delta: Real, tau: Real) -> Self {
        let phi = eos.phir(delta, tau);
        let phi_d = eos.phir_delta(delta, tau);
        let phi_dd = eos.phir_delta2(delta, tau);
        Self {
            j: delta * (1.0 + delta * phi_d),
            k: delta * phi_d + phi + delta.ln(),
            j_d: 1.0 + 2.0 * delta * phi_d + delta * delta * phi_dd,
            k_d: 2.0 * phi_d + delta * phi_dd + 1.0 / delta,
        }
    }
}

fn gibbs_gap<M: HelmholtzEos + ?Sized>(eos: &M, dl: Real, dv: Real, tau: Real) -> Real {
    let gl = eos.gibbs(dl, tau);
    ((eos.gibbs(dv, tau) - gl) / gl).abs()
}

/// `f_δδ·x² + 2·f_δτ·x + f_ττ`, the part of `d²f(δ(τ), τ)/dτ²` that does not
/// involve `δ''`.
fn curvature(f: &Derivs2, x: Real) -> Real {
    let [f_dd, f_dt, f_tt] = f.hes;
    f_dd * x * x + 2.0 * f_dt * x + f_tt
}

/// Solve the coupled coexistence sensitivities at a converged pair.
///
/// Returns `None` when the 2×2 system is singular.
fn coexistence_slopes<M: HelmholtzEos + ?Sized>(
    eos: &M,
    dl: Real,
    dv: Real,
    tau: Real,
) -> Option<(Derivs1, Derivs1)> {
    let pl = eos.pressure_derivs(dl, tau);
    let pv = eos.pressure_derivs(dv, tau);
    let gl = eos.gibbs_derivs(dl, tau);
    let gv = eos.gibbs_derivs(dv, tau);

    let a = Matrix2::new(pl.grad[0], -pv.grad[0], gl.grad[0], -gv.grad[0]);
    let lu = a.lu();

    let r1 = Vector2::new(pv.grad[1] - pl.grad[1], gv.grad[1] - gl.grad[1]);
    let x = lu.solve(&r1)?;
    let (xl, xv) = (x[0], x[1]);

    let r2 = Vector2::new(
        curvature(&pv, xv) - curvature(&pl, xl),
        curvature(&gv, xv) - curvature(&gl, xl),
    );
    let y = lu.solve(&r2)?;

    Some((Derivs1::new(dl, xl, y[0]), Derivs1::new(dv, xv, y[1])))
}

impl<M: HelmholtzEos, S: MemoStore> HelmholtzSolver<M, S> {
    /// Coexistence pair at `tau`, from the memo when both branches are stored.
    ///
    /// Never fails: on hitting the iteration cap the last iterate is
    /// returned. Near the critical point the iteration can collapse onto the
    /// trivial solution `δl = δv`, which also satisfies both conditions, or
    /// step past the model's density limit. A not-a-number Gibbs gap never
    /// counts as converged, so the latter runs to the cap.
    pub fn sat(&self, tau: Real) -> Saturation {
        let stored = self.memo.get_un(UnStore::SatDeltaLiq, tau).and_then(|liquid| {
            self.memo
                .get_un(UnStore::SatDeltaVap, tau)
                .map(|vapor| (liquid, vapor))
        });
        match stored {
            Some((liquid, vapor)) => Saturation {
                liquid,
                vapor,
                iterations: 0,
            },
            None => self.solve_saturation(tau),
        }
    }

    /// Run the Akasaka iteration at `tau` and store both branches.
    fn solve_saturation(&self, tau: Real) -> Saturation {
        let cfg = &self.config.saturation;
        let eos = &self.eos;

        let (mut dl, mut dv, max_iter) = if tau - 1.0 < CRITICAL_TAU_TOL {
            tracing::debug!(tau, "critical or supercritical, skipping saturation solve");
            (1.0, 1.0, 0)
        } else {
            (cfg.liq_guess, cfg.vap_guess, cfg.max_iter)
        };

        // A not-a-number gap is never converged
        let converged = |gap: Real| gap <= cfg.tol_rel_g;
        let mut gap = gibbs_gap(eos, dl, dv, tau);
        let mut it = 0;
        while it < max_iter && !converged(gap) {
            let l = Akasaka::at(eos, dl, tau);
            let v = Akasaka::at(eos, dv, tau);
            let det = v.j_d * l.k_d - l.j_d * v.k_d;
            let dk = v.k - l.k;
            let dj = v.j - l.j;
            let step = cfg.gamma / det;
            dl += step * (dk * v.j_d - dj * v.k_d);
            dv += step * (dk * l.j_d - dj * l.k_d);
            gap = gibbs_gap(eos, dl, dv, tau);
            it += 1;
            tracing::trace!(iteration = it, dl, dv, gap, "akasaka step");
        }
        if !converged(gap) {
            tracing::debug!(tau, dl, dv, gap, iterations = it, "saturation iteration cap reached");
        }

        let (liquid, vapor) = if max_iter == 0 {
            (Derivs1::constant(dl), Derivs1::constant(dv))
        } else {
            coexistence_slopes(eos, dl, dv, tau).unwrap_or_else(|| {
                tracing::debug!(tau, dl, dv, "singular coexistence system");
                (
                    Derivs1::new(dl, Real::NAN, Real::NAN),
                    Derivs1::new(dv, Real::NAN, Real::NAN),
                )
            })
        };

        self.memo.add_un(UnStore::SatDeltaLiq, tau, liquid);
        self.memo.add_un(UnStore::SatDeltaVap, tau, vapor);
        Saturation {
            liquid,
            vapor,
            iterations: it,
        }
    }

    /// Saturated liquid reduced density and its τ-derivatives.
    pub fn sat_delta_liq(&self, tau: Real) -> Derivs1 {
        self.memo
            .get_un(UnStore::SatDeltaLiq, tau)
            .unwrap_or_else(|| self.solve_saturation(tau).liquid)
    }

    /// Saturated vapor reduced density and its τ-derivatives.
    pub fn sat_delta_vap(&self, tau: Real) -> Derivs1 {
        self.memo
            .get_un(UnStore::SatDeltaVap, tau)
            .unwrap_or_else(|| self.solve_saturation(tau).vapor)
    }

    /// Saturation pressure [kPa] and its τ-derivatives, evaluated on the
    /// liquid branch.
    pub fn sat_p(&self, tau: Real) -> Derivs1 {
        if let Some(hit) = self.memo.get_un(UnStore::SatP, tau) {
            return hit;
        }
        let liq = self.sat_delta_liq(tau);
        let p = self.eos.pressure_derivs(liq.value, tau);
        let [p_d, p_t] = p.grad;
        let out = Derivs1::new(
            p.value,
            p_d * liq.d1 + p_t,
            curvature(&p, liq.d1) + p_d * liq.d2,
        );
        self.memo.add_un(UnStore::SatP, tau, out);
        out
    }
}
