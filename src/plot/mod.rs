//! Terminal plots of comparison runs.

pub mod ascii;

pub use ascii::*;
