//! Vectorized expression evaluation.
//!
//! Expressions operate on [`VectorizedRowBatch`]es in place: each node reads
//! already-populated input columns and writes exactly one output column,
//! honoring the batch's selection and every column's null/repeat flags.

pub mod batch;
pub mod descriptor;
pub mod evaluator;
pub mod expression;
pub mod null_util;
pub mod registry;

pub use batch::{ActiveRows, InputColumns, VectorizedRowBatch, DEFAULT_BATCH_SIZE};
pub use descriptor::{ArgumentType, Descriptor, DescriptorBuilder, InputExpressionType, Mode};
pub use evaluator::VectorizedEvaluator;
pub use expression::VectorExpression;
pub use registry::{ArgumentSpec, ExpressionSpec, FunctionName, VectorExpressionRegistry};
