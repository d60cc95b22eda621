//! Input/output helpers.
//!
//! - text ingest (`ingest`) and alignment checks (`validate`)
//! - result exports (CSV) (`export`)
//! - growth-curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;
pub mod validate;

pub use curve::*;
pub use export::*;
pub use ingest::*;
pub use validate::*;
