//! Contract tests for the null-data fill helpers.

use vexec::executor::vectorized::null_util::{
    set_null_and_div_by_zero_data_entries, set_null_data_entries, NULL_LONG_VALUE,
};
use vexec::executor::vectorized::{ActiveRows, VectorizedRowBatch};
use vexec::storage::ColumnVector;
use vexec::types::ColumnKind;

#[test]
fn test_fill_touches_only_active_rows() {
    let mut col = ColumnVector::from_longs(&[None, None, None]);
    col.data.longs_mut(0).expect("longs").copy_from_slice(&[7, 8, 9]);
    let selected = [0, 2];
    set_null_data_entries(&mut col, ActiveRows::new(2, Some(&selected[..])));
    assert_eq!(col.data.longs(0).expect("longs"), &[NULL_LONG_VALUE, 8, NULL_LONG_VALUE]);
}

#[test]
fn test_fill_is_idempotent() {
    let mut col = ColumnVector::from_doubles(&[Some(1.5), None, Some(-2.0), None]);
    col.data.doubles_mut(0).expect("doubles")[3] = 42.0;
    let rows = ActiveRows::new(4, None);
    set_null_data_entries(&mut col, rows);
    let once = col.clone();
    set_null_data_entries(&mut col, rows);
    assert_eq!(col, once);
}

#[test]
fn test_fill_ignores_stale_mask_when_no_nulls() {
    let mut col = ColumnVector::from_longs(&[Some(3), Some(4)]);
    col.is_null[1] = true;
    set_null_data_entries(&mut col, ActiveRows::new(2, None));
    assert_eq!(col.data.longs(0).expect("longs"), &[3, 4]);
}

#[test]
fn test_div_by_zero_fill_is_idempotent() {
    let denoms = ColumnVector::from_longs(&[Some(0), Some(2), Some(0), Some(5)]);
    let mut out = ColumnVector::from_doubles(&[
        Some(f64::INFINITY),
        None,
        Some(f64::NEG_INFINITY),
        Some(1.0),
    ]);
    let rows = ActiveRows::new(4, None);
    set_null_and_div_by_zero_data_entries(&mut out, rows, &denoms);
    let once = out.clone();
    set_null_and_div_by_zero_data_entries(&mut out, rows, &denoms);
    assert_eq!(out, once);
    assert_eq!(out.is_null, vec![true, true, true, false]);
    let values = out.data.doubles(0).expect("doubles");
    assert_eq!(values[0], f64::INFINITY);
    assert_eq!(values[1], 0.0);
}

#[test]
fn test_batch_reset_restores_flags() {
    let mut batch = VectorizedRowBatch::new(&[ColumnKind::Long, ColumnKind::Bytes], 4);
    batch.set_selection(&[1, 3]).expect("select");
    batch.cols[0].set_repeating_null();
    batch.reset();
    assert_eq!(batch.size, 0);
    assert!(!batch.selected_in_use);
    assert!(batch.cols[0].no_nulls);
    assert!(!batch.cols[0].is_repeating);
    assert!(!batch.cols[0].is_null[0]);
}
