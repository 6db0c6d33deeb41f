//! Error types for vectorized expression evaluation.

use thiserror::Error;

use crate::types::{ColumnKind, DataType};

/// Result type alias using [`VexError`].
pub type Result<T> = std::result::Result<T, VexError>;

/// Error types for expression construction and batch evaluation.
///
/// Per-row data problems (unparseable dates, division by zero) are never
/// reported here; they become SQL nulls in the output column.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VexError {
    // ==================== Construction Errors ====================
    /// A bound literal has a representation the operator cannot use.
    #[error("Unexpected scalar {value} for {operator}")]
    UnexpectedScalar { operator: String, value: String },

    /// An argument position carries a type the operator does not support.
    #[error("Unsupported input type {data_type} at argument {position} of {operator}")]
    UnsupportedInputType {
        operator: String,
        position: usize,
        data_type: DataType,
    },

    /// No registered variant matches the requested call signature.
    #[error("No vectorized variant of {function} for signature ({signature})")]
    UnsupportedSignature { function: String, signature: String },

    /// A node was wired to read from its own output column.
    #[error("Column {0} cannot be both an input and the output of one expression")]
    ColumnAliasing(usize),

    /// Invalid expression description.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    // ==================== Evaluation Errors ====================
    /// A column ordinal does not exist in the batch.
    #[error("Column {column} out of range (batch has {width} columns)")]
    ColumnOutOfRange { column: usize, width: usize },

    /// A column holds a different storage kind than the operator expects.
    #[error("Column {column} has kind {actual}, expected {expected}")]
    ColumnKindMismatch {
        column: usize,
        expected: ColumnKind,
        actual: ColumnKind,
    },

    /// The bound scalar text could not be parsed; aborts the batch.
    #[error("Cannot parse scalar {value:?} as {target}")]
    ScalarParse { value: String, target: &'static str },

    /// A batch was allocated larger than the configured batch size.
    #[error("Batch {index} has capacity {capacity}, configured batch size is {batch_size}")]
    BatchTooLarge {
        index: usize,
        capacity: usize,
        batch_size: usize,
    },

    /// Selection or size outside the batch capacity.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    // ==================== Wrapped Errors ====================
    /// Arrow conversion failure.
    #[error("Arrow error: {0}")]
    Arrow(String),

    /// Expression spec serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Worker pool setup failure.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl From<arrow::error::ArrowError> for VexError {
    fn from(err: arrow::error::ArrowError) -> Self {
        VexError::Arrow(err.to_string())
    }
}

impl From<bincode::Error> for VexError {
    fn from(err: bincode::Error) -> Self {
        VexError::Serialization(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for VexError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        VexError::ThreadPool(err.to_string())
    }
}
