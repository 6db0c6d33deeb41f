//! Vectorized operator catalog.
//!
//! Each operator implements
//! [`VectorExpression`](crate::executor::vectorized::VectorExpression)
//! over typed input columns and/or a bound literal, writing one output
//! column whose type is fixed by the operator's identity.

mod arithmetic;
mod date_diff;
mod divide;
mod filter;
mod leaf;
mod string_unary;

pub use arithmetic::{ArithmeticOp, ColScalarArithmetic};
pub use date_diff::{DateDiffColScalar, DateDiffScalarCol, DateOperand};
pub use divide::{LongColDivideLongColumn, LongColDivideLongScalar, LongScalarDivideLongColumn};
pub use filter::{CompareOp, FilterLongColCompareLongScalar, SelectColumnIsNotNull};
pub use leaf::{ConstantVectorExpression, IdentityExpression};
pub use string_unary::{
    Lower, Ltrim, Reverse, Rtrim, StringUnaryUdf, Trim, UnaryStringFunction, Upper,
};

use crate::error::{Result, VexError};
use crate::storage::ColumnVector;
use crate::types::{ColumnKind, ScalarValue};

/// Rejects a node that would read the column it writes.
pub(crate) fn check_distinct(input: usize, output: usize) -> Result<()> {
    if input == output {
        return Err(VexError::ColumnAliasing(output));
    }
    Ok(())
}

pub(crate) fn expect_kind(col: &ColumnVector, ordinal: usize, expected: ColumnKind) -> Result<()> {
    let actual = col.kind();
    if actual != expected {
        return Err(VexError::ColumnKindMismatch {
            column: ordinal,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Extracts a long literal for `operator`.
pub(crate) fn long_scalar(operator: &str, value: &ScalarValue) -> Result<i64> {
    value.as_long().ok_or_else(|| VexError::UnexpectedScalar {
        operator: operator.to_string(),
        value: value.to_string(),
    })
}
