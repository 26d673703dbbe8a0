//! Error types.
//!
//! - `FunnelError`: failures of the library (curve checks, band construction,
//!   validation, CSV artifacts)
//! - `AppError`: what the binary reports (exit code + message)

use std::path::PathBuf;

use thiserror::Error;

/// Library error. Every variant is fatal for the current comparison run.
#[derive(Debug, Error)]
pub enum FunnelError {
    #[error("Invalid tolerance `{name}` = {value} (must be finite and >= 0).")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("{label} curve has no samples.")]
    EmptyCurve { label: &'static str },

    #[error("{label} curve has {x_len} x values but {y_len} y values.")]
    LengthMismatch {
        label: &'static str,
        x_len: usize,
        y_len: usize,
    },

    #[error("{label} curve is not sorted by x: x[{index}] = {x} follows {prev}.")]
    UnsortedCurve {
        label: &'static str,
        index: usize,
        prev: f64,
        x: f64,
    },

    #[error("{label} curve has a non-finite value at index {index}.")]
    NonFiniteValue { label: &'static str, index: usize },

    #[error("Reference and test data {which} x values are different: {reference} vs {test}.")]
    DomainMismatch {
        which: &'static str,
        reference: f64,
        test: f64,
    },

    #[error("Lower or upper curve is degenerate ({lower} vs {upper} samples).")]
    BandCollapsed { lower: usize, upper: usize },

    #[error("Failed to allocate memory for {label} curve ({len} samples).")]
    AllocationFailure { label: &'static str, len: usize },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid value in '{}' line {line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

impl FunnelError {
    /// Process exit status for this error. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            FunnelError::InvalidTolerance { .. }
            | FunnelError::LengthMismatch { .. }
            | FunnelError::UnsortedCurve { .. }
            | FunnelError::NonFiniteValue { .. } => 2,
            FunnelError::EmptyCurve { .. } | FunnelError::DomainMismatch { .. } => 3,
            FunnelError::BandCollapsed { .. } | FunnelError::AllocationFailure { .. } => 4,
            FunnelError::Io { .. } | FunnelError::Csv { .. } | FunnelError::Parse { .. } => 5,
        }
    }
}

pub type Result<T, E = FunnelError> = std::result::Result<T, E>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FunnelError> for AppError {
    fn from(err: FunnelError) -> Self {
        AppError::new(err.exit_code(), format!("Error: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
