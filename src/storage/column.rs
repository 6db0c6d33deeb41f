//! Fixed-capacity column vectors with a shared null/repeat model.

use crate::error::{Result, VexError};
use crate::types::ColumnKind;

use super::bytes::BytesData;

/// Timestamp payload: milliseconds since Unix epoch plus nanos-of-second.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampData {
    pub time: Vec<i64>,
    pub nanos: Vec<i32>,
}

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

impl TimestampData {
    /// Creates zeroed timestamp storage.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        TimestampData {
            time: vec![0; capacity],
            nanos: vec![0; capacity],
        }
    }

    /// Sets slot `row` from epoch milliseconds; nanos are derived from the millis.
    pub fn set_millis(&mut self, row: usize, millis: i64) {
        self.time[row] = millis;
        self.nanos[row] = (millis.rem_euclid(1000) * 1_000_000) as i32;
    }

    /// Day number (days since epoch, UTC) of slot `row`.
    #[must_use]
    pub fn days(&self, row: usize) -> i64 {
        self.time[row].div_euclid(MILLIS_PER_DAY)
    }
}

/// Decimal payload: unscaled values sharing one precision and scale.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalData {
    pub unscaled: Vec<i128>,
    pub precision: u8,
    pub scale: u8,
}

/// Kind-specific payload of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Long(Vec<i64>),
    Double(Vec<f64>),
    Bytes(BytesData),
    Timestamp(TimestampData),
    Decimal(DecimalData),
}

impl ColumnData {
    /// Returns the storage kind of this payload.
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Long(_) => ColumnKind::Long,
            ColumnData::Double(_) => ColumnKind::Double,
            ColumnData::Bytes(_) => ColumnKind::Bytes,
            ColumnData::Timestamp(_) => ColumnKind::Timestamp,
            ColumnData::Decimal(_) => ColumnKind::Decimal,
        }
    }

    fn mismatch(&self, column: usize, expected: ColumnKind) -> VexError {
        VexError::ColumnKindMismatch {
            column,
            expected,
            actual: self.kind(),
        }
    }

    /// Long values; `column` is the ordinal reported on a kind mismatch.
    pub fn longs(&self, column: usize) -> Result<&[i64]> {
        match self {
            ColumnData::Long(v) => Ok(v.as_slice()),
            other => Err(other.mismatch(column, ColumnKind::Long)),
        }
    }

    pub fn longs_mut(&mut self, column: usize) -> Result<&mut [i64]> {
        match self {
            ColumnData::Long(v) => Ok(v.as_mut_slice()),
            other => Err(other.mismatch(column, ColumnKind::Long)),
        }
    }

    pub fn doubles(&self, column: usize) -> Result<&[f64]> {
        match self {
            ColumnData::Double(v) => Ok(v.as_slice()),
            other => Err(other.mismatch(column, ColumnKind::Double)),
        }
    }

    pub fn doubles_mut(&mut self, column: usize) -> Result<&mut [f64]> {
        match self {
            ColumnData::Double(v) => Ok(v.as_mut_slice()),
            other => Err(other.mismatch(column, ColumnKind::Double)),
        }
    }

    pub fn bytes(&self, column: usize) -> Result<&BytesData> {
        match self {
            ColumnData::Bytes(v) => Ok(v),
            other => Err(other.mismatch(column, ColumnKind::Bytes)),
        }
    }

    pub fn bytes_mut(&mut self, column: usize) -> Result<&mut BytesData> {
        match self {
            ColumnData::Bytes(v) => Ok(v),
            other => Err(other.mismatch(column, ColumnKind::Bytes)),
        }
    }

    pub fn timestamps(&self, column: usize) -> Result<&TimestampData> {
        match self {
            ColumnData::Timestamp(v) => Ok(v),
            other => Err(other.mismatch(column, ColumnKind::Timestamp)),
        }
    }

    pub fn timestamps_mut(&mut self, column: usize) -> Result<&mut TimestampData> {
        match self {
            ColumnData::Timestamp(v) => Ok(v),
            other => Err(other.mismatch(column, ColumnKind::Timestamp)),
        }
    }

    pub fn decimals(&self, column: usize) -> Result<&DecimalData> {
        match self {
            ColumnData::Decimal(v) => Ok(v),
            other => Err(other.mismatch(column, ColumnKind::Decimal)),
        }
    }
}

/// A fixed-capacity column of one storage kind.
///
/// The three flags are independent fast paths that every expression must read
/// correctly on its inputs and re-establish on its output:
/// - `no_nulls`: no active slot is null; `is_null` is then not authoritative.
/// - `is_repeating`: slot 0's value and nullity hold for every active row.
/// - `is_null`: per-slot SQL null mask, meaningful only when `no_nulls` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnVector {
    pub is_null: Vec<bool>,
    pub no_nulls: bool,
    pub is_repeating: bool,
    pub data: ColumnData,
}

impl ColumnVector {
    /// Creates an empty column of `kind` sized to `capacity` rows.
    ///
    /// Decimal columns default to precision 38, scale 0.
    #[must_use]
    pub fn new(kind: ColumnKind, capacity: usize) -> Self {
        let data = match kind {
            ColumnKind::Long => ColumnData::Long(vec![0; capacity]),
            ColumnKind::Double => ColumnData::Double(vec![0.0; capacity]),
            ColumnKind::Bytes => ColumnData::Bytes(BytesData::new(capacity)),
            ColumnKind::Timestamp => ColumnData::Timestamp(TimestampData::new(capacity)),
            ColumnKind::Decimal => ColumnData::Decimal(DecimalData {
                unscaled: vec![0; capacity],
                precision: 38,
                scale: 0,
            }),
        };
        Self::with_data(data, capacity)
    }

    /// Creates a decimal column with the given precision and scale.
    #[must_use]
    pub fn decimal(capacity: usize, precision: u8, scale: u8) -> Self {
        Self::with_data(
            ColumnData::Decimal(DecimalData {
                unscaled: vec![0; capacity],
                precision,
                scale,
            }),
            capacity,
        )
    }

    fn with_data(data: ColumnData, capacity: usize) -> Self {
        ColumnVector {
            is_null: vec![false; capacity],
            no_nulls: true,
            is_repeating: false,
            data,
        }
    }

    /// Builds a long column from optional values; capacity equals the input length.
    #[must_use]
    pub fn from_longs(values: &[Option<i64>]) -> Self {
        let mut col = Self::new(ColumnKind::Long, values.len());
        if let ColumnData::Long(v) = &mut col.data {
            for (i, value) in values.iter().enumerate() {
                v[i] = value.unwrap_or(0);
            }
        }
        col.load_nulls(values.iter().map(Option::is_none));
        col
    }

    /// Builds a double column from optional values.
    #[must_use]
    pub fn from_doubles(values: &[Option<f64>]) -> Self {
        let mut col = Self::new(ColumnKind::Double, values.len());
        if let ColumnData::Double(v) = &mut col.data {
            for (i, value) in values.iter().enumerate() {
                v[i] = value.unwrap_or(0.0);
            }
        }
        col.load_nulls(values.iter().map(Option::is_none));
        col
    }

    /// Builds a bytes column from optional strings.
    #[must_use]
    pub fn from_strs(values: &[Option<&str>]) -> Self {
        let mut col = Self::new(ColumnKind::Bytes, values.len());
        if let ColumnData::Bytes(b) = &mut col.data {
            for (i, value) in values.iter().enumerate() {
                b.set_val(i, value.unwrap_or("").as_bytes());
            }
        }
        col.load_nulls(values.iter().map(Option::is_none));
        col
    }

    /// Builds a timestamp column from optional epoch milliseconds.
    #[must_use]
    pub fn from_timestamp_millis(values: &[Option<i64>]) -> Self {
        let mut col = Self::new(ColumnKind::Timestamp, values.len());
        if let ColumnData::Timestamp(t) = &mut col.data {
            for (i, value) in values.iter().enumerate() {
                t.set_millis(i, value.unwrap_or(0));
            }
        }
        col.load_nulls(values.iter().map(Option::is_none));
        col
    }

    fn load_nulls(&mut self, nulls: impl Iterator<Item = bool>) {
        for (slot, null) in self.is_null.iter_mut().zip(nulls) {
            *slot = null;
            if null {
                self.no_nulls = false;
            }
        }
    }

    /// Returns the storage kind.
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.is_null.len()
    }

    /// Restores the column to its freshly-allocated flag state.
    ///
    /// Data slots are left as they are; only the null/repeat model is cleared.
    pub fn reset(&mut self) {
        self.is_null.fill(false);
        self.no_nulls = true;
        self.is_repeating = false;
        if let ColumnData::Bytes(b) = &mut self.data {
            b.init_buffer();
        }
    }

    /// Marks every active row null using the repeating representation.
    pub fn set_repeating_null(&mut self) {
        self.no_nulls = false;
        self.is_repeating = true;
        self.is_null[0] = true;
    }

    /// Returns whether `row` is null, honoring the repeating and no-nulls flags.
    #[must_use]
    pub fn is_null_at(&self, row: usize) -> bool {
        if self.no_nulls {
            return false;
        }
        let slot = if self.is_repeating { 0 } else { row };
        self.is_null[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_column_is_clean() {
        let col = ColumnVector::new(ColumnKind::Double, 8);
        assert_eq!(col.capacity(), 8);
        assert!(col.no_nulls);
        assert!(!col.is_repeating);
        assert_eq!(col.kind(), ColumnKind::Double);
    }

    #[test]
    fn test_from_longs_tracks_nulls() {
        let col = ColumnVector::from_longs(&[Some(1), None, Some(3)]);
        assert!(!col.no_nulls);
        assert_eq!(col.is_null, vec![false, true, false]);
        assert_eq!(col.data.longs(0).unwrap(), &[1, 0, 3]);
    }

    #[test]
    fn test_is_null_at_honors_flags() {
        let mut col = ColumnVector::from_longs(&[Some(1), Some(2), Some(3)]);
        col.is_null[1] = true; // stale, no_nulls wins
        assert!(!col.is_null_at(1));

        col.set_repeating_null();
        assert!(col.is_null_at(2));
    }

    #[test]
    fn test_kind_mismatch_reports_ordinal() {
        let col = ColumnVector::new(ColumnKind::Long, 4);
        let err = col.data.doubles(7).unwrap_err();
        assert_eq!(
            err,
            VexError::ColumnKindMismatch {
                column: 7,
                expected: ColumnKind::Double,
                actual: ColumnKind::Long,
            }
        );
    }

    #[test]
    fn test_timestamp_days_before_epoch() {
        let mut ts = TimestampData::new(2);
        ts.set_millis(0, -1);
        ts.set_millis(1, MILLIS_PER_DAY + 5);
        assert_eq!(ts.days(0), -1);
        assert_eq!(ts.days(1), 1);
        assert_eq!(ts.nanos[0], 999_000_000);
    }
}
