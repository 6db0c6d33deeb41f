//! Leaf expressions: column references and constants.

use crate::error::{Result, VexError};
use crate::executor::vectorized::descriptor::{
    ArgumentType, Descriptor, InputExpressionType, Mode,
};
use crate::executor::vectorized::null_util::set_null_data_entries;
use crate::executor::vectorized::{VectorExpression, VectorizedRowBatch};
use crate::storage::ColumnData;
use crate::types::{DataType, ScalarValue};

/// A reference to an existing column; evaluation does nothing.
#[derive(Debug)]
pub struct IdentityExpression {
    col_num: usize,
    data_type: DataType,
    children: Vec<Box<dyn VectorExpression>>,
}

impl IdentityExpression {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        Descriptor::builder()
            .mode(Mode::Projection)
            .argument_types(&[ArgumentType::Any])
            .input_types(&[InputExpressionType::Column])
            .build()
    }

    #[must_use]
    pub fn new(col_num: usize, data_type: DataType) -> Self {
        IdentityExpression {
            col_num,
            data_type,
            children: Vec::new(),
        }
    }
}

impl VectorExpression for IdentityExpression {
    fn evaluate_node(&mut self, _batch: &mut VectorizedRowBatch) -> Result<()> {
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.col_num)
    }

    fn output_type(&self) -> DataType {
        self.data_type
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
        "IdentityExpression"
    }
}

/// Fills its output column with one repeating literal, or with null.
#[derive(Debug)]
pub struct ConstantVectorExpression {
    output_column: usize,
    data_type: DataType,
    value: ScalarValue,
    children: Vec<Box<dyn VectorExpression>>,
}

impl ConstantVectorExpression {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        Descriptor::builder()
            .mode(Mode::Projection)
            .argument_types(&[ArgumentType::Any])
            .input_types(&[InputExpressionType::Scalar])
            .build()
    }

    /// # Errors
    ///
    /// Returns `UnexpectedScalar` if a non-null `value` does not fit `data_type`'s storage.
    pub fn new(output_column: usize, data_type: DataType, value: ScalarValue) -> Result<Self> {
        if let Some(kind) = value.column_kind() {
            if kind != data_type.column_kind() {
                return Err(VexError::UnexpectedScalar {
                    operator: format!("constant {data_type}"),
                    value: value.to_string(),
                });
            }
        }
        Ok(ConstantVectorExpression {
            output_column,
            data_type,
            value,
            children: Vec::new(),
        })
    }
}

impl VectorExpression for ConstantVectorExpression {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let (rows, _, out) = batch.split_output(self.output_column)?;

        if self.value.is_null() {
            out.set_repeating_null();
            set_null_data_entries(out, rows);
            return Ok(());
        }

        let expected = self.data_type.column_kind();
        let actual = out.kind();
        match (&mut out.data, &self.value) {
            (ColumnData::Long(v), ScalarValue::Long(x)) => v[0] = *x,
            (ColumnData::Double(v), ScalarValue::Double(x)) => v[0] = *x,
            (ColumnData::Bytes(b), ScalarValue::Bytes(x)) => {
                b.init_buffer();
                b.set_val(0, x);
            }
            (ColumnData::Timestamp(t), ScalarValue::Timestamp(x)) => t.set_millis(0, *x),
            (ColumnData::Decimal(d), ScalarValue::Decimal(x)) => d.unscaled[0] = *x,
            _ => {
                return Err(VexError::ColumnKindMismatch {
                    column: self.output_column,
                    expected,
                    actual,
                })
            }
        }
        out.is_repeating = true;
        out.is_null[0] = false;
        out.no_nulls = true;
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.output_column)
    }

    fn output_type(&self) -> DataType {
        self.data_type
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
        "ConstantVectorExpression"
    }
}
