//! Result types shared by the density solvers.

use hz_core::{Derivs2, Real};

/// Which derivatives the caller wants back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Request {
    #[default]
    Value,
    Gradient,
    Hessian,
}

impl Request {
    pub fn wants_gradient(self) -> bool {
        self >= Request::Gradient
    }

    pub fn wants_hessian(self) -> bool {
        self == Request::Hessian
    }
}

/// Where a density came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// Replayed from the memo without any equation-of-state evaluation.
    Memo,
    /// Fresh Halley solve.
    Solved,
    /// Solve was unusable; the phase fallback with zero derivatives.
    Fallback,
}

/// Reduced density `δ(p, τ)` with optional sensitivities.
///
/// - `grad = [∂δ/∂p, ∂δ/∂τ]`
/// - `hes = [∂²δ/∂p², ∂²δ/∂p∂τ, ∂²δ/∂τ²]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensitySolution {
    pub delta: Real,
    pub grad: Option<[Real; 2]>,
    pub hes: Option<[Real; 3]>,
    /// Halley iterations; `None` when replayed from the memo.
    pub iterations: Option<usize>,
    pub source: Source,
}

impl DensitySolution {
    /// Trim a full derivative set down to what `request` asks for.
    pub fn from_derivs(
        d: Derivs2,
        request: Request,
        iterations: Option<usize>,
        source: Source,
    ) -> Self {
        Self {
            delta: d.value,
            grad: request.wants_gradient().then_some(d.grad),
            hes: request.wants_hessian().then_some(d.hes),
            iterations,
            source,
        }
    }
}
