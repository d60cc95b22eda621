//! Growth fitting.
//!
//! Responsibilities:
//!
//! - pull the OD600 readings for a dataset's trendline window
//! - fit the exponential model from the window endpoints
//! - turn a validated batch into per-dataset outcomes

pub mod batch;
pub mod fitter;

pub use batch::*;
pub use fitter::*;
