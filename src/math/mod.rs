//! Mathematical utilities: the log-linear line behind exponential growth.

pub mod loglinear;

pub use loglinear::*;
