//! Bracketing seed solver (bisection / false position).
//!
//! Produces an approximate reduced density for a target pressure in regions
//! where a Newton-type iteration from a fixed guess is unreliable (near the
//! critical point, deep in the supercritical region). The result is a seed,
//! not a certified root: the iteration stops on bracket width or on the
//! iteration cap and no convergence flag is raised.

use crate::config::BracketConfig;
use hz_core::Real;
use hz_eos::HelmholtzEos;

/// `|Tc/τ − Tc|` below which a state counts as critical temperature [K].
const CRITICAL_T_TOL: Real = 1e-7;
/// `|p − Pc|` below which a pressure counts as critical [kPa].
const CRITICAL_P_TOL: Real = 1e-4;

/// How the trial point inside the bracket is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BracketMethod {
    /// Interval midpoint
    Bisection,
    /// Secant point through both endpoints (regula falsi)
    FalsePosition,
}

/// Outcome of [`bracket_delta`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracketed {
    /// Bracket midpoint (reduced density)
    pub delta: Real,
    pub iterations: usize,
    /// Final squared bracket width `(b − a)²`
    pub width_sq: Real,
}

/// A bracket on the pressure residual `f(δ) = p(δ, τ) − pr`, advanced one
/// trial point at a time.
///
/// The update replaces `a` when `f(c)·f(a) ≥ 0` and `b` otherwise. Starting
/// from a true sign change this keeps the root bracketed and the width never
/// grows, until a residual is exactly zero: then every trial point replaces
/// `a` and the sign change can be lost. With false position one endpoint can
/// stay fixed for many steps, so the width may stall well above tolerance
/// until the iteration cap.
pub struct Bracket<'a, M: HelmholtzEos + ?Sized> {
    eos: &'a M,
    pr: Real,
    tau: Real,
    method: BracketMethod,
    a: Real,
    b: Real,
    fa: Real,
    fb: Real,
    iterations: usize,
}

impl<'a, M: HelmholtzEos + ?Sized> Bracket<'a, M> {
    /// Start a bracket from two physical densities `rho_a`, `rho_b` [kg/m³].
    pub fn new(
        eos: &'a M,
        pr: Real,
        tau: Real,
        rho_a: Real,
        rho_b: Real,
        method: BracketMethod,
    ) -> Self {
        let consts = eos.constants();
        let a = consts.delta(rho_a);
        let b = consts.delta(rho_b);
        let fa = eos.pressure(a, tau) - pr;
        let fb = eos.pressure(b, tau) - pr;
        Self {
            eos,
            pr,
            tau,
            method,
            a,
            b,
            fa,
            fb,
            iterations: 0,
        }
    }

    /// Current endpoints in reduced density.
    pub fn bounds(&self) -> (Real, Real) {
        (self.a, self.b)
    }

    pub fn width_sq(&self) -> Real {
        (self.a - self.b) * (self.a - self.b)
    }

    pub fn midpoint(&self) -> Real {
        (self.a + self.b) / 2.0
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the residual changes sign across the bracket.
    pub fn straddles_root(&self) -> bool {
        self.fa * self.fb <= 0.0
    }

    /// Evaluate one trial point and shrink the bracket onto it.
    pub fn step(&mut self) {
        let c = match self.method {
            BracketMethod::Bisection => (self.a + self.b) / 2.0,
            BracketMethod::FalsePosition => {
                self.b - self.fb * (self.b - self.a) / (self.fb - self.fa)
            }
        };
        let fc = self.eos.pressure(c, self.tau) - self.pr;
        if fc * self.fa >= 0.0 {
            self.a = c;
            self.fa = fc;
        } else {
            self.b = c;
            self.fb = fc;
        }
        self.iterations += 1;
        tracing::trace!(
            iteration = self.iterations,
            a = self.a,
            b = self.b,
            width_sq = self.width_sq(),
            "bracket step"
        );
    }
}

/// Approximate reduced density at pressure `pr` [kPa] and `tau` between the
/// physical density bounds `rho_a`, `rho_b` [kg/m³].
///
/// Right at the critical point (critical temperature and pressure) this
/// returns `δ = 1` without iterating.
pub fn bracket_delta<M: HelmholtzEos + ?Sized>(
    eos: &M,
    cfg: &BracketConfig,
    pr: Real,
    tau: Real,
    rho_a: Real,
    rho_b: Real,
    method: BracketMethod,
) -> Bracketed {
    let consts = eos.constants();
    if (consts.t_c / tau - consts.t_c).abs() < CRITICAL_T_TOL
        && (pr - consts.p_c).abs() < CRITICAL_P_TOL
    {
        tracing::debug!(pr, tau, "critical point, skipping bracket search");
        return Bracketed {
            delta: 1.0,
            iterations: 0,
            width_sq: 0.0,
        };
    }

    let mut bracket = Bracket::new(eos, pr, tau, rho_a, rho_b, method);
    if !bracket.straddles_root() {
        tracing::debug!(
            pr,
            tau,
            rho_a,
            rho_b,
            "bracket endpoints do not straddle a sign change"
        );
    }
    while bracket.iterations() < cfg.max_iter && bracket.width_sq() > cfg.tol {
        bracket.step();
    }
    if bracket.width_sq() > cfg.tol {
        tracing::debug!(
            ?method,
            iterations = bracket.iterations(),
            width_sq = bracket.width_sq(),
            "bracket iteration cap reached"
        );
    }

    Bracketed {
        delta: bracket.midpoint(),
        iterations: bracket.iterations(),
        width_sq: bracket.width_sq(),
    }
}
