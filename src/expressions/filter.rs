//! Filter-mode expressions: narrow the batch's active rows in place.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VexError};
use crate::executor::vectorized::descriptor::{
    ArgumentType, Descriptor, InputExpressionType, Mode,
};
use crate::executor::vectorized::{VectorExpression, VectorizedRowBatch};
use crate::storage::ColumnVector;
use crate::types::{DataType, ScalarValue};

use super::long_scalar;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl CompareOp {
    fn test(self, a: i64, b: i64) -> bool {
        match self {
            CompareOp::Equal => a == b,
            CompareOp::NotEqual => a != b,
            CompareOp::Less => a < b,
            CompareOp::LessEqual => a <= b,
            CompareOp::Greater => a > b,
            CompareOp::GreaterEqual => a >= b,
        }
    }
}

/// Keeps the active rows for which `keep` holds, compacting the selection.
///
/// A batch without a selection only switches to one when a row is dropped.
fn retain_active(
    size: &mut usize,
    selected: &mut [usize],
    selected_in_use: &mut bool,
    mut keep: impl FnMut(usize) -> bool,
) {
    let n = *size;
    let mut kept = 0;
    if *selected_in_use {
        for j in 0..n {
            let i = selected[j];
            if keep(i) {
                selected[kept] = i;
                kept += 1;
            }
        }
    } else {
        for i in 0..n {
            if keep(i) {
                selected[kept] = i;
                kept += 1;
            }
        }
        if kept < n {
            *selected_in_use = true;
        }
    }
    *size = kept;
}

fn input_column(cols: &[ColumnVector], column: usize) -> Result<&ColumnVector> {
    cols.get(column).ok_or(VexError::ColumnOutOfRange {
        column,
        width: cols.len(),
    })
}

/// Keeps rows where `column <op> scalar`; null rows are dropped.
#[derive(Debug)]
pub struct FilterLongColCompareLongScalar {
    col_num: usize,
    op: CompareOp,
    value: i64,
    children: Vec<Box<dyn VectorExpression>>,
}

impl FilterLongColCompareLongScalar {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        Descriptor::builder()
            .mode(Mode::Filter)
            .argument_types(&[ArgumentType::IntFamily, ArgumentType::IntFamily])
            .input_types(&[InputExpressionType::Column, InputExpressionType::Scalar])
            .build()
    }

    /// # Errors
    ///
    /// Returns an error if the scalar is not a long.
    pub fn new(col_num: usize, op: CompareOp, value: &ScalarValue) -> Result<Self> {
        Ok(FilterLongColCompareLongScalar {
            col_num,
            op,
            value: long_scalar("FilterLongColCompareLongScalar", value)?,
            children: Vec::new(),
        })
    }
}

impl VectorExpression for FilterLongColCompareLongScalar {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let VectorizedRowBatch {
            cols,
            size,
            selected,
            selected_in_use,
            ..
        } = batch;
        let input = input_column(cols, self.col_num)?;
        let values = input.data.longs(self.col_num)?;
        let (op, value) = (self.op, self.value);

        if input.is_repeating {
            if input.is_null_at(0) || !op.test(values[0], value) {
                *size = 0;
            }
            return Ok(());
        }
        if input.no_nulls {
            retain_active(size, selected, selected_in_use, |i| op.test(values[i], value));
        } else {
            retain_active(size, selected, selected_in_use, |i| {
                !input.is_null[i] && op.test(values[i], value)
            });
        }
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        None
    }

    fn output_type(&self) -> DataType {
        DataType::Boolean
    }

    fn descriptor(&self) -> Descriptor {
        Self::signature()
    }

    fn children_mut(&mut self) -> &mut [Box<dyn VectorExpression>] {
        &mut self.children
    }

    fn set_children(&mut self, children: Vec<Box<dyn VectorExpression>>) {
        self.children = children;
    }

    fn name(&self) -> &'static str {
        "FilterLongColCompareLongScalar"
    }
}

/// Keeps rows whose column value is not null.
#[derive(Debug)]
pub struct SelectColumnIsNotNull {
    col_num: usize,
    children: Vec<Box<dyn VectorExpression>>,
}

impl SelectColumnIsNotNull {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        Descriptor::builder()
            .mode(Mode::Filter)
            .argument_types(&[ArgumentType::Any])
            .input_types(&[InputExpressionType::Column])
            .build()
    }

    #[must_use]
    pub fn new(col_num: usize) -> Self {
        SelectColumnIsNotNull {
            col_num,
            children: Vec::new(),
        }
    }
}

impl VectorExpression for SelectColumnIsNotNull {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let VectorizedRowBatch {
            cols,
            size,
            selected,
            selected_in_use,
            ..
        } = batch;
        let input = input_column(cols, self.col_num)?;
        if input.no_nulls {
            return Ok(());
        }
        if input.is_repeating {
            if input.is_null[0] {
                *size = 0;
            }
            return Ok(());
        }
        retain_active(size, selected, selected_in_use, |i| !input.is_null[i]);
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        None
    }

    fn output_type(&self) -> DataType {
        DataType::Boolean
    }

    fn descriptor(&self) -> Descriptor {
        Self::signature()
    }

    fn children_mut(&mut self) -> &mut [Box<dyn VectorExpression>] {
        &mut self.children
    }

    fn set_children(&mut self, children: Vec<Box<dyn VectorExpression>>) {
        self.children = children;
    }

    fn name(&self) -> &'static str {
        "SelectColumnIsNotNull"
    }
}
