//! hz-core: shared foundation for the helmholtz solver workspace.
//!
//! Contains:
//! - units (uom SI types + constructors in the kPa / K / kg·m⁻³ system)
//! - numeric (Real + float checks + derivative containers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HzError, HzResult};
pub use numeric::*;
pub use units::*;
