//! Bundled input data.

pub mod sample;

pub use sample::*;
