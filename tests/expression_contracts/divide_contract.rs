//! Contract tests for integer division promoted to double.

use vexec::executor::vectorized::VectorizedRowBatch;
use vexec::expressions::{
    LongColDivideLongColumn, LongColDivideLongScalar, LongScalarDivideLongColumn,
};
use vexec::storage::ColumnVector;
use vexec::types::{ColumnKind, DataType, ScalarValue};
use vexec::VectorExpression;

fn batch(cols: Vec<ColumnVector>) -> VectorizedRowBatch {
    VectorizedRowBatch::from_columns(cols).expect("build batch")
}

#[test]
fn test_scalar_divided_by_column() {
    // 10 / [4, 0, 5]
    let mut b = batch(vec![
        ColumnVector::from_longs(&[Some(4), Some(0), Some(5)]),
        ColumnVector::new(ColumnKind::Double, 3),
    ]);
    let mut expr =
        LongScalarDivideLongColumn::new(&ScalarValue::Long(10), 0, 1).expect("construct");
    assert_eq!(expr.output_type(), DataType::Double);
    expr.evaluate(&mut b).expect("evaluate");

    let out = &b.cols[1];
    assert!(!out.no_nulls);
    assert_eq!(out.is_null, vec![false, true, false]);
    let values = out.data.doubles(1).expect("doubles");
    assert_eq!(values[0], 2.5);
    assert_eq!(values[2], 2.0);
}

#[test]
fn test_column_divided_by_zero_scalar() {
    let mut b = batch(vec![
        ColumnVector::from_longs(&[Some(1), Some(2), Some(3)]),
        ColumnVector::new(ColumnKind::Double, 3),
    ]);
    LongColDivideLongScalar::new(0, &ScalarValue::Long(0), 1)
        .expect("construct")
        .evaluate(&mut b)
        .expect("evaluate");
    let out = &b.cols[1];
    assert!(out.is_repeating);
    assert!(!out.no_nulls);
    assert!(out.is_null[0]);
    assert!((0..3).all(|i| out.is_null_at(i)));
}

#[test]
fn test_column_divided_by_column_keeps_ieee_results() {
    let mut b = batch(vec![
        ColumnVector::from_longs(&[Some(1), Some(-1), Some(0), None, Some(9)]),
        ColumnVector::from_longs(&[Some(0), Some(0), Some(0), Some(3), Some(3)]),
        ColumnVector::new(ColumnKind::Double, 5),
    ]);
    LongColDivideLongColumn::new(0, 1, 2)
        .expect("construct")
        .evaluate(&mut b)
        .expect("evaluate");
    let out = &b.cols[2];
    assert_eq!(out.is_null, vec![true, true, true, true, false]);
    let values = out.data.doubles(2).expect("doubles");
    assert_eq!(values[0], f64::INFINITY);
    assert_eq!(values[1], f64::NEG_INFINITY);
    assert!(values[2].is_nan());
    // Input-null row with a non-zero divisor carries the sentinel.
    assert_eq!(values[3], 0.0);
    assert_eq!(values[4], 3.0);
}

#[test]
fn test_divide_with_selection() {
    let mut b = batch(vec![
        ColumnVector::from_longs(&[Some(0), Some(8), Some(0), Some(2)]),
        ColumnVector::new(ColumnKind::Double, 4),
    ]);
    b.set_selection(&[1, 3]).expect("select");
    LongScalarDivideLongColumn::new(&ScalarValue::Long(4), 0, 1)
        .expect("construct")
        .evaluate(&mut b)
        .expect("evaluate");
    let out = &b.cols[1];
    assert!(out.no_nulls);
    assert!(!out.is_null[1] && !out.is_null[3]);
    let values = out.data.doubles(1).expect("doubles");
    assert_eq!(values[1], 0.5);
    assert_eq!(values[3], 2.0);
}

#[test]
fn test_non_long_scalar_is_rejected() {
    let err = LongColDivideLongScalar::new(0, &ScalarValue::Double(2.0), 1).unwrap_err();
    assert!(matches!(err, vexec::VexError::UnexpectedScalar { .. }));
}
