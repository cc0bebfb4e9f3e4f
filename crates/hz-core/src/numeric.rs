use crate::HzError;

/// Floating point type used throughout the solvers
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HzError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HzError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, HzError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(HzError::NonPositive { what, value: v })
    }
}

/// A function of two variables `f(x, y)` with its gradient and Hessian.
///
/// - `grad = [∂f/∂x, ∂f/∂y]`
/// - `hes` is the upper triangle `[∂²f/∂x², ∂²f/∂x∂y, ∂²f/∂y²]`
///
/// Fixed-size so derivative scratch never touches the heap.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Derivs2 {
    pub value: Real,
    pub grad: [Real; 2],
    pub hes: [Real; 3],
}

impl Derivs2 {
    pub fn new(value: Real, grad: [Real; 2], hes: [Real; 3]) -> Self {
        Self { value, grad, hes }
    }

    /// A value with every derivative forced to zero.
    pub fn constant(value: Real) -> Self {
        Self {
            value,
            grad: [0.0; 2],
            hes: [0.0; 3],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
            && self.grad.iter().all(|g| g.is_finite())
            && self.hes.iter().all(|h| h.is_finite())
    }
}

/// A function of one variable with its first and second derivative.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Derivs1 {
    pub value: Real,
    pub d1: Real,
    pub d2: Real,
}

impl Derivs1 {
    pub fn new(value: Real, d1: Real, d2: Real) -> Self {
        Self { value, d1, d2 }
    }

    pub fn constant(value: Real) -> Self {
        Self {
            value,
            d1: 0.0,
            d2: 0.0,
        }
    }
}
