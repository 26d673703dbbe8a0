//! Input/output helpers.
//!
//! - CSV ingest of reference/test curves (`ingest`)
//! - CSV artifacts of a comparison run (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
