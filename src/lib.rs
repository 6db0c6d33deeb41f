//! vexec - Vectorized batch expression evaluation
//!
//! Operators run over fixed-capacity columnar batches in place. Each node
//! reads typed input columns and/or a bound literal, honors the batch's
//! selection and every column's null and repeat flags, and writes one output
//! column (or, in filter mode, narrows the active rows).
//!
//! Trees are built from plan-level [`ExpressionSpec`]s by the
//! [`VectorExpressionRegistry`] and driven by a [`VectorizedEvaluator`].

pub mod error;
pub mod executor;
pub mod expressions;
pub mod storage;
pub mod types;

pub use error::{Result, VexError};
pub use executor::vectorized::{
    ArgumentSpec, Descriptor, ExpressionSpec, FunctionName, Mode, VectorExpression,
    VectorExpressionRegistry, VectorizedEvaluator, VectorizedRowBatch, DEFAULT_BATCH_SIZE,
};
pub use executor::EvaluatorConfig;
pub use storage::ColumnVector;
pub use types::{ColumnKind, DataType, ScalarValue};
