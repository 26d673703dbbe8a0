//! Domain types used throughout the comparison.
//!
//! This module defines:
//!
//! - sampled curves (`Curve`, `Point`)
//! - tolerance parameters (`ToleranceSpec`)
//! - the tube built around a reference (`Band`)
//! - validation output (`ErrorReport`)

pub mod types;

pub use types::*;
