//! hz-solve: density and saturation solvers for Helmholtz-energy fluids.
//!
//! Inverts an equation of state expressed in reduced density `δ = ρ/ρc` and
//! inverse reduced temperature `τ = Tc/T`:
//!
//! - **bracket**: bisection / false-position seed for hard regions
//! - **halley**: Halley iteration for `δ(p, τ)` with implicit sensitivities
//! - **phase**: liquid / vapor branch selection with memo and fallback
//! - **saturation**: Akasaka coexistence solve with τ-derivatives
//! - **memo**: memoization service shared by the above
//! - **sweep**: parallel saturation curves and isotherms
//!
//! Numeric solves never return errors. Non-convergence yields the last
//! iterate; the phase selector replaces unusable densities with a fixed
//! fallback. Errors only come from configuration and physical-unit inputs.
//!
//! # Example
//!
//! ```
//! use hz_eos::{HelmholtzEos, VanDerWaals};
//! use hz_solve::{HelmholtzSolver, Request, SolverConfig};
//!
//! let solver = HelmholtzSolver::new(VanDerWaals::water_like(), SolverConfig::default())?;
//! let tau = 1.25;
//! let p = solver.eos().pressure(0.05, tau);
//! let sol = solver.delta_vap(p, tau, Request::Gradient);
//! assert!((sol.delta - 0.05).abs() < 1e-9);
//! # Ok::<(), hz_solve::SolveError>(())
//! ```

pub mod bracket;
pub mod config;
pub mod error;
pub mod halley;
pub mod memo;
pub mod phase;
pub mod saturation;
pub mod solution;
pub mod solver;
pub mod sweep;

pub use bracket::{Bracket, BracketMethod, Bracketed, bracket_delta};
pub use config::{BracketConfig, DensityConfig, MemoConfig, SaturationConfig, SolverConfig};
pub use error::{SolveError, SolveResult};
pub use halley::{delta_p_tau, implicit_sensitivities};
pub use memo::{BinStore, MemoCounts, MemoStats, MemoStore, MemoTable, NoMemo, UnStore};
pub use phase::Phase;
pub use saturation::Saturation;
pub use solution::{DensitySolution, Request, Source};
pub use solver::HelmholtzSolver;
pub use sweep::{
    IsothermPoint, SaturationPoint, SweepDefinition, SweepType, isotherm, saturation_curve,
};
