//! Exponential growth model.
//!
//! Kept as small, pure functions so the fitter and the plotting code share one
//! definition of the curve.

pub mod model;

pub use model::*;
