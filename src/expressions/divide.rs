//! Integer division promoted to double.
//!
//! Every variant writes a double column. A zero divisor never raises: the
//! affected rows become null.

use crate::error::Result;
use crate::executor::vectorized::descriptor::{
    ArgumentType, Descriptor, InputExpressionType, Mode,
};
use crate::executor::vectorized::expression::{map_column, split_column, VectorExpression};
use crate::executor::vectorized::null_util::{
    propagate_nulls_col_col, set_null_and_div_by_zero_data_entries, set_null_data_entries,
};
use crate::executor::vectorized::VectorizedRowBatch;
use crate::types::{ColumnKind, DataType, ScalarValue};

use super::{check_distinct, expect_kind, long_scalar};

fn int_descriptor(inputs: [InputExpressionType; 2]) -> Descriptor {
    Descriptor::builder()
        .mode(Mode::Projection)
        .argument_types(&[ArgumentType::IntFamily, ArgumentType::IntFamily])
        .input_types(&inputs)
        .build()
}

/// `column / scalar` over longs.
#[derive(Debug)]
pub struct LongColDivideLongScalar {
    col_num: usize,
    value: i64,
    output_column: usize,
    children: Vec<Box<dyn VectorExpression>>,
}

impl LongColDivideLongScalar {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        int_descriptor([InputExpressionType::Column, InputExpressionType::Scalar])
    }

    /// # Errors
    ///
    /// Returns an error if the scalar is not a long or the input is the output.
    pub fn new(col_num: usize, value: &ScalarValue, output_column: usize) -> Result<Self> {
        check_distinct(col_num, output_column)?;
        Ok(LongColDivideLongScalar {
            col_num,
            value: long_scalar("LongColDivideLongScalar", value)?,
            output_column,
            children: Vec::new(),
        })
    }
}

impl VectorExpression for LongColDivideLongScalar {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let (rows, inputs, out) = batch.split_output(self.output_column)?;
        let input = inputs.get(self.col_num)?;
        let values = input.data.longs(self.col_num)?;
        expect_kind(out, self.output_column, ColumnKind::Double)?;

        if self.value == 0 {
            out.set_repeating_null();
            set_null_data_entries(out, rows);
            return Ok(());
        }

        let divisor = self.value as f64;
        let (mask, data) = split_column(out);
        let out_values = data.doubles_mut(self.output_column)?;
        map_column(input, values, mask, out_values, rows, |v| v as f64 / divisor);
        set_null_data_entries(out, rows);
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.output_column)
    }

    fn output_type(&self) -> DataType {
        DataType::Double
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
        "LongColDivideLongScalar"
    }
}

/// `scalar / column` over longs.
#[derive(Debug)]
pub struct LongScalarDivideLongColumn {
    value: f64,
    col_num: usize,
    output_column: usize,
    children: Vec<Box<dyn VectorExpression>>,
}

impl LongScalarDivideLongColumn {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        int_descriptor([InputExpressionType::Scalar, InputExpressionType::Column])
    }

    /// # Errors
    ///
    /// Returns an error if the scalar is not a long or the input is the output.
    pub fn new(value: &ScalarValue, col_num: usize, output_column: usize) -> Result<Self> {
        check_distinct(col_num, output_column)?;
        Ok(LongScalarDivideLongColumn {
            value: long_scalar("LongScalarDivideLongColumn", value)? as f64,
            col_num,
            output_column,
            children: Vec::new(),
        })
    }
}

impl VectorExpression for LongScalarDivideLongColumn {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let (rows, inputs, out) = batch.split_output(self.output_column)?;
        let input = inputs.get(self.col_num)?;
        let values = input.data.longs(self.col_num)?;

        let dividend = self.value;
        let mut saw_zero = false;
        let (mask, data) = split_column(out);
        let out_values = data.doubles_mut(self.output_column)?;
        map_column(input, values, mask, out_values, rows, |denom| {
            saw_zero |= denom == 0;
            dividend / denom as f64
        });

        if saw_zero {
            set_null_and_div_by_zero_data_entries(out, rows, input);
        } else {
            set_null_data_entries(out, rows);
        }
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.output_column)
    }

    fn output_type(&self) -> DataType {
        DataType::Double
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
        "LongScalarDivideLongColumn"
    }
}

/// `column / column` over longs.
#[derive(Debug)]
pub struct LongColDivideLongColumn {
    col_num1: usize,
    col_num2: usize,
    output_column: usize,
    children: Vec<Box<dyn VectorExpression>>,
}

impl LongColDivideLongColumn {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        int_descriptor([InputExpressionType::Column, InputExpressionType::Column])
    }

    /// # Errors
    ///
    /// Returns an error if either input is the output column.
    pub fn new(col_num1: usize, col_num2: usize, output_column: usize) -> Result<Self> {
        check_distinct(col_num1, output_column)?;
        check_distinct(col_num2, output_column)?;
        Ok(LongColDivideLongColumn {
            col_num1,
            col_num2,
            output_column,
            children: Vec::new(),
        })
    }
}

impl VectorExpression for LongColDivideLongColumn {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let (rows, inputs, out) = batch.split_output(self.output_column)?;
        let left = inputs.get(self.col_num1)?;
        let right = inputs.get(self.col_num2)?;
        let a = left.data.longs(self.col_num1)?;
        let b = right.data.longs(self.col_num2)?;
        expect_kind(out, self.output_column, ColumnKind::Double)?;

        // A repeating null on either side nulls the whole output.
        if (left.is_repeating && left.is_null_at(0)) || (right.is_repeating && right.is_null_at(0))
        {
            out.set_repeating_null();
            set_null_data_entries(out, rows);
            return Ok(());
        }

        out.is_repeating = left.is_repeating && right.is_repeating;
        propagate_nulls_col_col(left, right, out, rows);

        let repeating = out.is_repeating;
        let out_values = out.data.doubles_mut(self.output_column)?;
        let slot = |col_repeats: bool, i: usize| if col_repeats { 0 } else { i };
        let mut saw_zero = false;
        let mut divide = |i: usize| {
            let denom = b[slot(right.is_repeating, i)];
            saw_zero |= denom == 0;
            out_values[i] = a[slot(left.is_repeating, i)] as f64 / denom as f64;
        };
        if repeating {
            divide(0);
        } else {
            rows.iter().for_each(&mut divide);
        }

        if saw_zero {
            set_null_and_div_by_zero_data_entries(out, rows, right);
        } else {
            set_null_data_entries(out, rows);
        }
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.output_column)
    }

    fn output_type(&self) -> DataType {
        DataType::Double
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
        "LongColDivideLongColumn"
    }
}
