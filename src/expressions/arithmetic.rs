//! Column-scalar add, subtract and multiply with type promotion.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VexError};
use crate::executor::vectorized::descriptor::{
    ArgumentType, Descriptor, InputExpressionType, Mode,
};
use crate::executor::vectorized::expression::{map_column, split_column, VectorExpression};
use crate::executor::vectorized::null_util::set_null_data_entries;
use crate::executor::vectorized::VectorizedRowBatch;
use crate::types::{DataType, ScalarValue};

use super::check_distinct;

/// Arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
}

impl ArithmeticOp {
    /// Integer arithmetic wraps on overflow.
    fn apply_long(self, a: i64, b: i64) -> i64 {
        match self {
            ArithmeticOp::Add => a.wrapping_add(b),
            ArithmeticOp::Subtract => a.wrapping_sub(b),
            ArithmeticOp::Multiply => a.wrapping_mul(b),
        }
    }

    fn apply_double(self, a: f64, b: f64) -> f64 {
        match self {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Subtract => a - b,
            ArithmeticOp::Multiply => a * b,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Operand {
    Long(i64),
    Double(f64),
}

/// `column <op> scalar` over the numeric families.
///
/// A long column with a long scalar yields a long column; any double operand
/// promotes the output to double.
#[derive(Debug)]
pub struct ColScalarArithmetic {
    op: ArithmeticOp,
    col_num: usize,
    input_is_float: bool,
    scalar: Operand,
    output_column: usize,
    children: Vec<Box<dyn VectorExpression>>,
}

impl ColScalarArithmetic {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        Descriptor::builder()
            .mode(Mode::Projection)
            .argument_types(&[ArgumentType::NumericFamily, ArgumentType::NumericFamily])
            .input_types(&[InputExpressionType::Column, InputExpressionType::Scalar])
            .build()
    }

    /// # Errors
    ///
    /// Returns an error if the input type is not numeric, the scalar is not a
    /// long or double, or the input is the output.
    pub fn new(
        op: ArithmeticOp,
        col_num: usize,
        input_type: DataType,
        value: &ScalarValue,
        output_column: usize,
    ) -> Result<Self> {
        check_distinct(col_num, output_column)?;
        if !(input_type.is_integer() || input_type.is_float()) {
            return Err(VexError::UnsupportedInputType {
                operator: format!("{op:?}"),
                position: 0,
                data_type: input_type,
            });
        }
        // A float column widens a long literal once, here.
        let scalar = match value {
            ScalarValue::Long(v) if !input_type.is_float() => Some(Operand::Long(*v)),
            other => other.as_double().map(Operand::Double),
        }
        .ok_or_else(|| VexError::UnexpectedScalar {
            operator: format!("{op:?}"),
            value: value.to_string(),
        })?;
        Ok(ColScalarArithmetic {
            op,
            col_num,
            input_is_float: input_type.is_float(),
            scalar,
            output_column,
            children: Vec::new(),
        })
    }
}

impl VectorExpression for ColScalarArithmetic {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let (rows, inputs, out) = batch.split_output(self.output_column)?;
        let input = inputs.get(self.col_num)?;
        let op = self.op;
        let (mask, data) = split_column(out);

        match (self.input_is_float, self.scalar) {
            (_, Operand::Long(s)) => {
                let values = input.data.longs(self.col_num)?;
                let out_values = data.longs_mut(self.output_column)?;
                map_column(input, values, mask, out_values, rows, |v| op.apply_long(v, s));
            }
            (false, Operand::Double(s)) => {
                let values = input.data.longs(self.col_num)?;
                let out_values = data.doubles_mut(self.output_column)?;
                map_column(input, values, mask, out_values, rows, |v| {
                    op.apply_double(v as f64, s)
                });
            }
            (true, Operand::Double(s)) => {
                let values = input.data.doubles(self.col_num)?;
                let out_values = data.doubles_mut(self.output_column)?;
                map_column(input, values, mask, out_values, rows, |v| op.apply_double(v, s));
            }
        }
        set_null_data_entries(out, rows);
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.output_column)
    }

    fn output_type(&self) -> DataType {
        if self.input_is_float || matches!(self.scalar, Operand::Double(_)) {
            DataType::Double
        } else {
            DataType::BigInt
        }
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
        match self.op {
            ArithmeticOp::Add => "ColAddScalar",
            ArithmeticOp::Subtract => "ColSubtractScalar",
            ArithmeticOp::Multiply => "ColMultiplyScalar",
        }
    }
}
