//! Adapter running a single-argument text function over a bytes column.

use std::fmt;

use crate::error::Result;
use crate::executor::vectorized::descriptor::{
    ArgumentType, Descriptor, InputExpressionType, Mode,
};
use crate::executor::vectorized::expression::{map_rows, split_column, VectorExpression};
use crate::executor::vectorized::VectorizedRowBatch;
use crate::types::DataType;

use super::check_distinct;

/// A text-to-text function applied row by row.
pub trait UnaryStringFunction: Send + fmt::Debug {
    /// Writes the result for `input` into `out`, which arrives empty.
    ///
    /// Returns None when the result is SQL null, whatever the input was.
    fn evaluate(&mut self, input: &[u8], out: &mut Vec<u8>) -> Option<()>;

    fn name(&self) -> &'static str;
}

/// `upper(s)`.
#[derive(Debug, Default)]
pub struct Upper;

impl UnaryStringFunction for Upper {
    fn evaluate(&mut self, input: &[u8], out: &mut Vec<u8>) -> Option<()> {
        if input.is_ascii() {
            out.extend(input.iter().map(u8::to_ascii_uppercase));
        } else {
            out.extend_from_slice(std::str::from_utf8(input).ok()?.to_uppercase().as_bytes());
        }
        Some(())
    }

    fn name(&self) -> &'static str {
        "upper"
    }
}

/// `lower(s)`.
#[derive(Debug, Default)]
pub struct Lower;

impl UnaryStringFunction for Lower {
    fn evaluate(&mut self, input: &[u8], out: &mut Vec<u8>) -> Option<()> {
        if input.is_ascii() {
            out.extend(input.iter().map(u8::to_ascii_lowercase));
        } else {
            out.extend_from_slice(std::str::from_utf8(input).ok()?.to_lowercase().as_bytes());
        }
        Some(())
    }

    fn name(&self) -> &'static str {
        "lower"
    }
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != b' ').unwrap_or(bytes.len());
    &bytes[start..]
}

fn trim_end(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|b| *b != b' ').map_or(0, |i| i + 1);
    &bytes[..end]
}

/// `trim(s)`: strips leading and trailing spaces.
#[derive(Debug, Default)]
pub struct Trim;

impl UnaryStringFunction for Trim {
    fn evaluate(&mut self, input: &[u8], out: &mut Vec<u8>) -> Option<()> {
        out.extend_from_slice(trim_end(trim_start(input)));
        Some(())
    }

    fn name(&self) -> &'static str {
        "trim"
    }
}

/// `ltrim(s)`.
#[derive(Debug, Default)]
pub struct Ltrim;

impl UnaryStringFunction for Ltrim {
    fn evaluate(&mut self, input: &[u8], out: &mut Vec<u8>) -> Option<()> {
        out.extend_from_slice(trim_start(input));
        Some(())
    }

    fn name(&self) -> &'static str {
        "ltrim"
    }
}

/// `rtrim(s)`.
#[derive(Debug, Default)]
pub struct Rtrim;

impl UnaryStringFunction for Rtrim {
    fn evaluate(&mut self, input: &[u8], out: &mut Vec<u8>) -> Option<()> {
        out.extend_from_slice(trim_end(input));
        Some(())
    }

    fn name(&self) -> &'static str {
        "rtrim"
    }
}

/// `reverse(s)` by character. Invalid UTF-8 yields null.
#[derive(Debug, Default)]
pub struct Reverse;

impl UnaryStringFunction for Reverse {
    fn evaluate(&mut self, input: &[u8], out: &mut Vec<u8>) -> Option<()> {
        let text = std::str::from_utf8(input).ok()?;
        let mut buf = [0u8; 4];
        for c in text.chars().rev() {
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        Some(())
    }

    fn name(&self) -> &'static str {
        "reverse"
    }
}

/// Projects a bytes column through a [`UnaryStringFunction`].
#[derive(Debug)]
pub struct StringUnaryUdf {
    col_num: usize,
    output_column: usize,
    func: Box<dyn UnaryStringFunction>,
    scratch: Vec<u8>,
    children: Vec<Box<dyn VectorExpression>>,
}

impl StringUnaryUdf {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        Descriptor::builder()
            .mode(Mode::Projection)
            .argument_types(&[ArgumentType::StringFamily])
            .input_types(&[InputExpressionType::Column])
            .build()
    }

    /// # Errors
    ///
    /// Returns an error if the input is the output column.
    pub fn new(
        col_num: usize,
        output_column: usize,
        func: Box<dyn UnaryStringFunction>,
    ) -> Result<Self> {
        check_distinct(col_num, output_column)?;
        Ok(StringUnaryUdf {
            col_num,
            output_column,
            func,
            scratch: Vec::new(),
            children: Vec::new(),
        })
    }
}

impl VectorExpression for StringUnaryUdf {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let (rows, inputs, out) = batch.split_output(self.output_column)?;
        let input = inputs.get(self.col_num)?;
        let in_bytes = input.data.bytes(self.col_num)?;
        let (mask, data) = split_column(out);
        let out_bytes = data.bytes_mut(self.output_column)?;
        out_bytes.init_buffer();

        let func = &mut self.func;
        let scratch = &mut self.scratch;
        map_rows(input, mask, rows, |i| {
            scratch.clear();
            match func.evaluate(in_bytes.get(i), scratch) {
                Some(()) => {
                    out_bytes.set_val(i, scratch);
                    true
                }
                None => false,
            }
        });
        Ok(())
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.output_column)
    }

    fn output_type(&self) -> DataType {
        DataType::String
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
        self.func.name()
    }
}
