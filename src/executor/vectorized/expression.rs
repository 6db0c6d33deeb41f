//! The expression-node contract and the per-row kernels operators share.

use std::fmt;

use crate::error::Result;
use crate::storage::{ColumnData, ColumnVector};
use crate::types::DataType;

use super::batch::{ActiveRows, VectorizedRowBatch};
use super::descriptor::Descriptor;

/// A node of a vectorized expression tree.
///
/// A tree is built once per plan and reused across batches. Nodes keep their
/// scratch state in `&mut self`, so one tree instance serves one thread.
pub trait VectorExpression: Send + fmt::Debug {
    /// Evaluates every child depth-first, then this node.
    ///
    /// An empty batch reads and writes no column.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error raised by a child or by this node.
    fn evaluate(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        for child in self.children_mut() {
            child.evaluate(batch)?;
        }
        if batch.size == 0 {
            return Ok(());
        }
        self.evaluate_node(batch)
    }

    /// Applies this node's own transform; children have already run and
    /// `batch.size` is non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error on a column kind mismatch or a fatal operand failure.
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()>;

    /// Column written by this node, or None for filters.
    fn output_column(&self) -> Option<usize>;

    /// Type of the output column, fixed by the operator's identity.
    fn output_type(&self) -> DataType;

    /// Static shape used when binding variants.
    fn descriptor(&self) -> Descriptor;

    fn children_mut(&mut self) -> &mut [Box<dyn VectorExpression>];

    fn set_children(&mut self, children: Vec<Box<dyn VectorExpression>>);

    /// Short operator name for logs and plan display.
    fn name(&self) -> &'static str;
}

/// The null/repeat flags of an output column, split from its payload so
/// kernels can write both at once.
#[derive(Debug)]
pub struct OutputMask<'a> {
    pub is_null: &'a mut [bool],
    pub no_nulls: &'a mut bool,
    pub is_repeating: &'a mut bool,
}

/// Splits a column into its flags and its payload.
pub fn split_column(col: &mut ColumnVector) -> (OutputMask<'_>, &mut ColumnData) {
    let ColumnVector {
        is_null,
        no_nulls,
        is_repeating,
        data,
    } = col;
    (
        OutputMask {
            is_null: is_null.as_mut_slice(),
            no_nulls,
            is_repeating,
        },
        data,
    )
}

/// Applies `f` to every active value of `input`, writing `out`.
///
/// Covers the four evaluation branches: a repeating input is computed once
/// at slot 0; a no-nulls input writes values and clears the mask; an input
/// with nulls computes every active row unconditionally and copies its mask.
/// Null slots are left with whatever `f` produced; callers that need a
/// sentinel there run a null-data fill afterwards.
pub fn map_column<I: Copy, O>(
    input: &ColumnVector,
    values: &[I],
    mask: OutputMask<'_>,
    out: &mut [O],
    rows: ActiveRows<'_>,
    mut f: impl FnMut(I) -> O,
) {
    let OutputMask {
        is_null,
        no_nulls,
        is_repeating,
    } = mask;

    if input.is_repeating {
        *is_repeating = true;
        if input.is_null_at(0) {
            is_null[0] = true;
            *no_nulls = false;
        } else {
            is_null[0] = false;
            *no_nulls = true;
            out[0] = f(values[0]);
        }
        return;
    }
    *is_repeating = false;

    let n = rows.size();
    if input.no_nulls {
        match rows.selected() {
            Some(sel) => {
                for &i in sel {
                    is_null[i] = false;
                    out[i] = f(values[i]);
                }
            }
            None => {
                is_null.fill(false);
                *no_nulls = true;
                for (o, v) in out[..n].iter_mut().zip(&values[..n]) {
                    *o = f(*v);
                }
            }
        }
    } else {
        *no_nulls = false;
        match rows.selected() {
            Some(sel) => {
                for &i in sel {
                    out[i] = f(values[i]);
                    is_null[i] = input.is_null[i];
                }
            }
            None => {
                for (o, v) in out[..n].iter_mut().zip(&values[..n]) {
                    *o = f(*v);
                }
                is_null[..n].copy_from_slice(&input.is_null[..n]);
            }
        }
    }
}

/// Evaluates `eval` at every active, non-null slot of `input`.
///
/// `eval(slot)` reads the input at `slot`, writes the output there and
/// returns false when the result is null. Used where a row can fail on its
/// own (text parsing, functions returning no value).
pub fn map_rows(
    input: &ColumnVector,
    mask: OutputMask<'_>,
    rows: ActiveRows<'_>,
    mut eval: impl FnMut(usize) -> bool,
) {
    let OutputMask {
        is_null,
        no_nulls,
        is_repeating,
    } = mask;

    if input.is_repeating {
        *is_repeating = true;
        let valid = !input.is_null_at(0) && eval(0);
        is_null[0] = !valid;
        *no_nulls = valid;
        return;
    }
    *is_repeating = false;

    let mut all_valid = true;
    for i in rows.iter() {
        let valid = !input.is_null_at(i) && eval(i);
        is_null[i] = !valid;
        all_valid &= valid;
    }
    *no_nulls = all_valid;
}
