//! Contract tests for the unary text adapter.

use vexec::executor::vectorized::VectorizedRowBatch;
use vexec::expressions::{StringUnaryUdf, UnaryStringFunction, Upper};
use vexec::storage::ColumnVector;
use vexec::types::{ColumnKind, DataType};
use vexec::VectorExpression;

/// Returns null for empty input and echoes anything else.
#[derive(Debug)]
struct NullIfEmpty;

impl UnaryStringFunction for NullIfEmpty {
    fn evaluate(&mut self, input: &[u8], out: &mut Vec<u8>) -> Option<()> {
        if input.is_empty() {
            return None;
        }
        out.extend_from_slice(input);
        Some(())
    }

    fn name(&self) -> &'static str {
        "nullif_empty"
    }
}

fn batch(values: &[Option<&str>]) -> VectorizedRowBatch {
    VectorizedRowBatch::from_columns(vec![
        ColumnVector::from_strs(values),
        ColumnVector::new(ColumnKind::Bytes, values.len()),
    ])
    .expect("build batch")
}

#[test]
fn test_function_null_result_nulls_valid_row() {
    let mut b = batch(&[Some("x"), Some(""), None]);
    let mut expr = StringUnaryUdf::new(0, 1, Box::new(NullIfEmpty)).expect("construct");
    assert_eq!(expr.name(), "nullif_empty");
    assert_eq!(expr.output_type(), DataType::String);
    expr.evaluate(&mut b).expect("evaluate");
    let out = &b.cols[1];
    assert!(!out.no_nulls);
    assert_eq!(out.is_null, vec![false, true, true]);
    assert_eq!(out.data.bytes(1).expect("bytes").get(0), b"x");
}

#[test]
fn test_all_valid_rows_report_no_nulls() {
    let mut b = batch(&[Some("ab"), Some("cd")]);
    b.cols[1].no_nulls = false;
    b.cols[1].is_null[1] = true;
    StringUnaryUdf::new(0, 1, Box::new(Upper))
        .expect("construct")
        .evaluate(&mut b)
        .expect("evaluate");
    let out = &b.cols[1];
    assert!(out.no_nulls);
    assert_eq!(out.is_null, vec![false, false]);
    assert_eq!(out.data.bytes(1).expect("bytes").get(1), b"CD");
}
