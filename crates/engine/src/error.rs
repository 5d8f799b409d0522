//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidSplits`] thrown when a row's splits do not sum to 100% and a
//!   calculation is requested.
//! - [`RowNotFound`] thrown when a row index is outside the store.
//! - [`InvalidSchema`] thrown when an [`AllocationSchema`] cannot be built.
//!
//!  [`InvalidSplits`]: EngineError::InvalidSplits
//!  [`RowNotFound`]: EngineError::RowNotFound
//!  [`InvalidSchema`]: EngineError::InvalidSchema
//!  [`AllocationSchema`]: crate::AllocationSchema
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid percentage: {0}")]
    InvalidPercent(String),
    #[error("row {0} not found!")]
    RowNotFound(usize),
    #[error("category {0} not found!")]
    CategoryNotFound(usize),
    #[error("Each row's splits must sum to 100% (row index {row} sums to {sum}%)")]
    InvalidSplits { row: usize, sum: u32 },
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}
