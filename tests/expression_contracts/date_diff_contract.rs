//! Contract tests for the date-difference family.

use vexec::executor::vectorized::VectorizedRowBatch;
use vexec::expressions::{DateDiffColScalar, DateDiffScalarCol};
use vexec::storage::{ColumnVector, MILLIS_PER_DAY};
use vexec::types::{ColumnKind, DataType, ScalarValue};
use vexec::{VectorExpression, VexError};

const JAN_5_2020: i64 = 18_266;

fn text(s: &str) -> ScalarValue {
    ScalarValue::Bytes(s.as_bytes().to_vec())
}

fn batch(input: ColumnVector) -> VectorizedRowBatch {
    let n = input.capacity();
    VectorizedRowBatch::from_columns(vec![input, ColumnVector::new(ColumnKind::Long, n)])
        .expect("build batch")
}

#[test]
fn test_text_scalar_minus_text_column() {
    let mut b = batch(ColumnVector::from_strs(&[Some("2020-01-05")]));
    let mut expr =
        DateDiffScalarCol::new(&text("2020-01-10"), DataType::String, 0, DataType::String, 1)
            .expect("construct");
    assert_eq!(expr.output_type(), DataType::Int);
    expr.evaluate(&mut b).expect("evaluate");
    assert_eq!(b.cols[1].data.longs(1).expect("longs")[0], 5);
    assert!(b.cols[1].no_nulls);
}

#[test]
fn test_bad_column_text_nulls_only_that_row() {
    let mut b = batch(ColumnVector::from_strs(&[
        Some("2020-01-05"),
        Some("2020-13-45"),
        Some("2020-01-09"),
    ]));
    DateDiffScalarCol::new(&text("2020-01-10"), DataType::String, 0, DataType::String, 1)
        .expect("construct")
        .evaluate(&mut b)
        .expect("evaluate");
    let out = &b.cols[1];
    assert!(!out.no_nulls);
    assert_eq!(out.is_null, vec![false, true, false]);
    let values = out.data.longs(1).expect("longs");
    assert_eq!(values[0], 5);
    assert_eq!(values[1], 0);
    assert_eq!(values[2], 1);
}

#[test]
fn test_timestamp_column_minus_date_scalar() {
    let late_evening = (JAN_5_2020 + 3) * MILLIS_PER_DAY + 23 * 3_600_000;
    let mut b = batch(ColumnVector::from_timestamp_millis(&[Some(late_evening), None]));
    DateDiffColScalar::new(
        0,
        DataType::Timestamp,
        &ScalarValue::Long(JAN_5_2020),
        DataType::Date,
        1,
    )
    .expect("construct")
    .evaluate(&mut b)
    .expect("evaluate");
    let out = &b.cols[1];
    assert_eq!(out.data.longs(1).expect("longs")[0], 3);
    assert!(out.is_null_at(1));
}

#[test]
fn test_timestamp_scalar_truncates_to_day() {
    let mut b = batch(ColumnVector::from_longs(&[Some(JAN_5_2020)]));
    DateDiffScalarCol::new(
        &ScalarValue::Timestamp(JAN_5_2020 * MILLIS_PER_DAY + MILLIS_PER_DAY - 1),
        DataType::Timestamp,
        0,
        DataType::Date,
        1,
    )
    .expect("construct")
    .evaluate(&mut b)
    .expect("evaluate");
    assert_eq!(b.cols[1].data.longs(1).expect("longs")[0], 0);
}

#[test]
fn test_bad_scalar_text_aborts_batch() {
    let mut b = batch(ColumnVector::from_longs(&[Some(JAN_5_2020)]));
    let err = DateDiffScalarCol::new(&text("yesterday"), DataType::String, 0, DataType::Date, 1)
        .expect("construct")
        .evaluate(&mut b)
        .unwrap_err();
    assert!(matches!(err, VexError::ScalarParse { target: "date", .. }));
}

#[test]
fn test_unsupported_type_pair_fails_at_construction() {
    let err = DateDiffColScalar::new(0, DataType::BigInt, &text("2020-01-01"), DataType::String, 1)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported input type bigint at argument 0 of DateDiffColScalar"
    );
}
