//! Null/selection post-processing helpers.
//!
//! These routines run after a node has computed its output data and copied
//! its null mask. They reconcile the data at null slots with the mask without
//! re-deriving why a row is invalid. All of them touch only the active rows
//! and are idempotent.

use crate::storage::{ColumnData, ColumnVector};

use super::batch::ActiveRows;

/// Data written at null slots of long, timestamp and decimal columns.
pub const NULL_LONG_VALUE: i64 = 0;

/// Data written at null slots of double columns that are not division results.
pub const NULL_DOUBLE_VALUE: f64 = 0.0;

/// Overwrites the data of every active null slot with the kind's sentinel.
///
/// A repeating column only has slot 0 rewritten. Bytes columns are left
/// untouched since a null string has no meaningful payload.
pub fn set_null_data_entries(col: &mut ColumnVector, rows: ActiveRows<'_>) {
    if col.no_nulls {
        return;
    }
    let ColumnVector {
        is_null,
        is_repeating,
        data,
        ..
    } = col;
    if *is_repeating {
        if is_null[0] {
            write_sentinel(data, 0);
        }
        return;
    }
    match data {
        ColumnData::Long(v) => fill_null_slots(v.as_mut_slice(), is_null, rows, NULL_LONG_VALUE),
        ColumnData::Double(v) => fill_null_slots(v.as_mut_slice(), is_null, rows, NULL_DOUBLE_VALUE),
        ColumnData::Decimal(d) => fill_null_slots(d.unscaled.as_mut_slice(), is_null, rows, 0),
        ColumnData::Timestamp(t) => {
            fill_null_slots(t.time.as_mut_slice(), is_null, rows, NULL_LONG_VALUE);
            fill_null_slots(t.nanos.as_mut_slice(), is_null, rows, 0);
        }
        ColumnData::Bytes(_) => {}
    }
}

/// Null-data fill for a division output when at least one divisor was zero.
///
/// Every active row whose divisor (read from `denoms`, honoring its repeating
/// flag) is zero becomes null. Rows that were already null keep sentinel data,
/// except where the divisor was zero: that slot keeps its IEEE-754 quotient.
pub fn set_null_and_div_by_zero_data_entries(
    col: &mut ColumnVector,
    rows: ActiveRows<'_>,
    denoms: &ColumnVector,
) {
    let real_nulls = !col.no_nulls;
    col.no_nulls = false;
    let ColumnVector {
        is_null,
        is_repeating,
        data,
        ..
    } = col;

    let mut mark = |i: usize, data: &mut ColumnData| {
        let zero = is_zero_divisor(denoms, i);
        let was_null = real_nulls && is_null[i];
        is_null[i] = was_null || zero;
        if was_null && !zero {
            write_sentinel(data, i);
        }
    };

    if *is_repeating {
        mark(0, &mut *data);
        return;
    }
    match rows.selected() {
        Some(sel) => {
            for &i in sel {
                mark(i, &mut *data);
            }
        }
        None => {
            for i in 0..rows.size() {
                mark(i, &mut *data);
            }
        }
    }
}

/// Merges the null masks of two inputs into `out` for a column-column operator.
///
/// `out.is_repeating` must already reflect whether both inputs repeat.
pub fn propagate_nulls_col_col(
    a: &ColumnVector,
    b: &ColumnVector,
    out: &mut ColumnVector,
    rows: ActiveRows<'_>,
) {
    if a.no_nulls && b.no_nulls {
        out.no_nulls = true;
        if out.is_repeating {
            out.is_null[0] = false;
        } else {
            match rows.selected() {
                Some(sel) => {
                    for &i in sel {
                        out.is_null[i] = false;
                    }
                }
                None => out.is_null[..rows.size()].fill(false),
            }
        }
        return;
    }

    out.no_nulls = false;
    if out.is_repeating {
        out.is_null[0] = a.is_null_at(0) || b.is_null_at(0);
        return;
    }
    for i in rows.iter() {
        out.is_null[i] = a.is_null_at(i) || b.is_null_at(i);
    }
}

fn is_zero_divisor(denoms: &ColumnVector, row: usize) -> bool {
    let slot = if denoms.is_repeating { 0 } else { row };
    match &denoms.data {
        ColumnData::Long(v) => v[slot] == 0,
        ColumnData::Double(v) => v[slot] == 0.0,
        ColumnData::Decimal(d) => d.unscaled[slot] == 0,
        ColumnData::Bytes(_) | ColumnData::Timestamp(_) => false,
    }
}

fn write_sentinel(data: &mut ColumnData, slot: usize) {
    match data {
        ColumnData::Long(v) => v[slot] = NULL_LONG_VALUE,
        ColumnData::Double(v) => v[slot] = NULL_DOUBLE_VALUE,
        ColumnData::Decimal(d) => d.unscaled[slot] = 0,
        ColumnData::Timestamp(t) => {
            t.time[slot] = NULL_LONG_VALUE;
            t.nanos[slot] = 0;
        }
        ColumnData::Bytes(_) => {}
    }
}

fn fill_null_slots<T: Copy>(values: &mut [T], is_null: &[bool], rows: ActiveRows<'_>, sentinel: T) {
    match rows.selected() {
        Some(sel) => {
            for &i in sel {
                if is_null[i] {
                    values[i] = sentinel;
                }
            }
        }
        None => {
            for (value, null) in values[..rows.size()].iter_mut().zip(is_null) {
                if *null {
                    *value = sentinel;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;

    fn doubles(col: &ColumnVector) -> Vec<f64> {
        col.data.doubles(0).unwrap().to_vec()
    }

    #[test]
    fn test_fill_skips_no_nulls_column() {
        let mut col = ColumnVector::from_doubles(&[Some(f64::NAN), Some(2.0)]);
        col.is_null[0] = true; // stale
        set_null_data_entries(&mut col, ActiveRows::new(2, None));
        assert!(doubles(&col)[0].is_nan());
    }

    #[test]
    fn test_fill_writes_sentinel_at_null_rows() {
        let mut col = ColumnVector::from_doubles(&[Some(1.0), Some(2.0), Some(3.0)]);
        col.no_nulls = false;
        col.is_null[1] = true;
        set_null_data_entries(&mut col, ActiveRows::new(3, None));
        assert_eq!(doubles(&col), vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_fill_only_touches_selected_rows() {
        let mut col = ColumnVector::from_longs(&[Some(7), Some(8), Some(9)]);
        col.no_nulls = false;
        col.is_null = vec![true, true, false];
        let sel = [1];
        set_null_data_entries(&mut col, ActiveRows::new(1, Some(&sel[..])));
        assert_eq!(col.data.longs(0).unwrap(), &[7, 0, 9]);
    }

    #[test]
    fn test_fill_repeating_null() {
        let mut col = ColumnVector::from_longs(&[Some(5), Some(6)]);
        col.set_repeating_null();
        set_null_data_entries(&mut col, ActiveRows::new(2, None));
        assert_eq!(col.data.longs(0).unwrap(), &[0, 6]);
    }

    #[test]
    fn test_div_by_zero_fill_marks_and_keeps_ieee() {
        let mut out = ColumnVector::from_doubles(&[Some(f64::INFINITY), Some(2.5), Some(9.0)]);
        out.no_nulls = false;
        out.is_null = vec![false, false, true];
        let denoms = ColumnVector::from_longs(&[Some(0), Some(4), Some(3)]);

        set_null_and_div_by_zero_data_entries(&mut out, ActiveRows::new(3, None), &denoms);

        assert!(!out.no_nulls);
        assert_eq!(out.is_null, vec![true, false, true]);
        let v = doubles(&out);
        assert!(v[0].is_infinite());
        assert_eq!(v[1], 2.5);
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn test_div_by_zero_fill_ignores_stale_mask() {
        let mut out = ColumnVector::from_doubles(&[Some(1.0), Some(2.0)]);
        out.is_null = vec![true, true]; // stale, no_nulls is true
        let denoms = ColumnVector::from_longs(&[Some(1), Some(0)]);

        set_null_and_div_by_zero_data_entries(&mut out, ActiveRows::new(2, None), &denoms);

        assert_eq!(out.is_null, vec![false, true]);
        assert_eq!(doubles(&out)[0], 1.0);
    }

    #[test]
    fn test_div_by_zero_fill_is_idempotent() {
        let mut out = ColumnVector::from_doubles(&[Some(f64::NEG_INFINITY), Some(7.0), Some(1.0)]);
        out.no_nulls = false;
        out.is_null = vec![false, true, false];
        let denoms = ColumnVector::from_longs(&[Some(0), Some(2), Some(1)]);
        let rows = ActiveRows::new(3, None);

        set_null_and_div_by_zero_data_entries(&mut out, rows, &denoms);
        let once = out.clone();
        set_null_and_div_by_zero_data_entries(&mut out, rows, &denoms);
        assert_eq!(out.is_null, once.is_null);
        assert_eq!(
            doubles(&out).iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            doubles(&once).iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_propagate_nulls_col_col() {
        let a = ColumnVector::from_longs(&[Some(1), None, Some(3)]);
        let mut b = ColumnVector::from_longs(&[None, Some(2), Some(3)]);
        let mut out = ColumnVector::new(ColumnKind::Double, 3);
        propagate_nulls_col_col(&a, &b, &mut out, ActiveRows::new(3, None));
        assert!(!out.no_nulls);
        assert_eq!(out.is_null, vec![true, true, false]);

        b = ColumnVector::from_longs(&[Some(1), Some(1), Some(1)]);
        let clean = ColumnVector::from_longs(&[Some(1), Some(1), Some(1)]);
        propagate_nulls_col_col(&clean, &b, &mut out, ActiveRows::new(3, None));
        assert!(out.no_nulls);
        assert_eq!(out.is_null, vec![false, false, false]);
    }
}
