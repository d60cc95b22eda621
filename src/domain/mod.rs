//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and parsed inputs (`RawSeriesText`, `ParsedSeries`)
//! - validated datasets (`Dataset`, `RejectedDataset`)
//! - fit outputs (`FitResult`, `GrowthModel`, `DatasetOutcome`)
//! - the fixed series palette (`SeriesColor`)

pub mod palette;
pub mod types;

pub use palette::*;
pub use types::*;
