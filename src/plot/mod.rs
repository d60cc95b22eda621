//! Terminal plotting (fixed-size character grid).

pub mod ascii;

pub use ascii::*;
