//! Reusable row batch with an active-row selection.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BinaryArray, BooleanArray, Date32Array, Decimal128Array,
    Float32Array, Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, StringArray,
    TimestampMillisecondArray,
};
use arrow::datatypes::{
    DataType as ArrowDataType, Date32Type, Decimal128Type, Field, Float32Type, Float64Type,
    Int16Type, Int32Type, Int64Type, Int8Type, Schema, SchemaRef, TimeUnit,
    TimestampMillisecondType,
};
use arrow::record_batch::RecordBatch;

use crate::error::{Result, VexError};
use crate::executor::EvaluatorConfig;
use crate::storage::{ColumnData, ColumnVector};
use crate::types::{ColumnKind, DataType};

/// Default batch capacity for vectorized execution (rows per batch).
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// The set of logically active rows of a batch.
///
/// Either the contiguous range `[0, size)` or, when a selection is in use,
/// the first `size` entries of the selection vector.
#[derive(Debug, Clone, Copy)]
pub struct ActiveRows<'a> {
    size: usize,
    selected: Option<&'a [usize]>,
}

impl<'a> ActiveRows<'a> {
    /// Creates an active row set. `selected`, when present, must hold at least `size` entries.
    #[must_use]
    pub fn new(size: usize, selected: Option<&'a [usize]>) -> Self {
        ActiveRows {
            size,
            selected: selected.map(|s| &s[..size]),
        }
    }

    /// Returns the number of active rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if no rows are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the selected indices, or None when rows are contiguous.
    #[must_use]
    pub fn selected(&self) -> Option<&'a [usize]> {
        self.selected
    }

    /// Iterates the active row indices in order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + 'a {
        let selected = self.selected;
        (0..self.size).map(move |j| selected.map_or(j, |s| s[j]))
    }
}

/// Read-only view of every column except the one being written.
#[derive(Debug, Clone, Copy)]
pub struct InputColumns<'a> {
    before: &'a [ColumnVector],
    after: &'a [ColumnVector],
    output: usize,
}

impl<'a> InputColumns<'a> {
    /// Returns input column `column`.
    ///
    /// # Errors
    ///
    /// Returns `ColumnAliasing` when `column` is the output column and
    /// `ColumnOutOfRange` when it does not exist.
    pub fn get(&self, column: usize) -> Result<&'a ColumnVector> {
        if column == self.output {
            return Err(VexError::ColumnAliasing(column));
        }
        let found = if column < self.output {
            self.before.get(column)
        } else {
            self.after.get(column - self.output - 1)
        };
        found.ok_or(VexError::ColumnOutOfRange {
            column,
            width: self.before.len() + self.after.len() + 1,
        })
    }
}

/// A fixed-capacity, reusable unit of columnar rows.
///
/// Owned by the upstream row source and lent to one evaluation pass at a time.
/// `size` counts active rows; when `selected_in_use` is set, the active rows
/// are `selected[0..size]`.
#[derive(Debug, Clone)]
pub struct VectorizedRowBatch {
    pub cols: Vec<ColumnVector>,
    pub size: usize,
    pub selected: Vec<usize>,
    pub selected_in_use: bool,
    capacity: usize,
}

impl VectorizedRowBatch {
    /// Creates a batch with one empty column per kind.
    #[must_use]
    pub fn new(kinds: &[ColumnKind], capacity: usize) -> Self {
        VectorizedRowBatch {
            cols: kinds
                .iter()
                .map(|kind| ColumnVector::new(*kind, capacity))
                .collect(),
            size: 0,
            selected: vec![0; capacity],
            selected_in_use: false,
            capacity,
        }
    }

    /// Creates a batch whose columns are typed for `types` (keeps decimal precision and scale).
    #[must_use]
    pub fn for_types(types: &[DataType], capacity: usize) -> Self {
        let mut batch = Self::new(&[], capacity);
        for data_type in types {
            batch.add_column(*data_type);
        }
        batch
    }

    /// Creates a batch typed for `types` at the configured batch size.
    #[must_use]
    pub fn for_config(types: &[DataType], config: &EvaluatorConfig) -> Self {
        Self::for_types(types, config.batch_size)
    }

    /// Wraps pre-filled columns; `size` becomes the shared column capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in capacity.
    pub fn from_columns(cols: Vec<ColumnVector>) -> Result<Self> {
        let capacity = cols.first().map_or(0, ColumnVector::capacity);
        if let Some(bad) = cols.iter().position(|c| c.capacity() != capacity) {
            return Err(VexError::InvalidSelection(format!(
                "column {bad} has capacity {}, expected {capacity}",
                cols[bad].capacity()
            )));
        }
        Ok(VectorizedRowBatch {
            cols,
            size: capacity,
            selected: vec![0; capacity],
            selected_in_use: false,
            capacity,
        })
    }

    /// Appends a scratch column for `data_type` and returns its ordinal.
    pub fn add_column(&mut self, data_type: DataType) -> usize {
        let col = match data_type {
            DataType::Decimal { precision, scale } => {
                ColumnVector::decimal(self.capacity, precision, scale)
            }
            other => ColumnVector::new(other.column_kind(), self.capacity),
        };
        self.cols.push(col);
        self.cols.len() - 1
    }

    /// Returns the row capacity of every column.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.cols.len()
    }

    /// Returns a column by ordinal.
    ///
    /// # Errors
    ///
    /// Returns `ColumnOutOfRange` if the ordinal does not exist.
    pub fn column(&self, index: usize) -> Result<&ColumnVector> {
        self.cols.get(index).ok_or(VexError::ColumnOutOfRange {
            column: index,
            width: self.cols.len(),
        })
    }

    /// Sets the number of contiguous active rows and drops any selection.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` exceeds the capacity.
    pub fn set_size(&mut self, size: usize) -> Result<()> {
        if size > self.capacity {
            return Err(VexError::InvalidSelection(format!(
                "size {size} exceeds capacity {}",
                self.capacity
            )));
        }
        self.size = size;
        self.selected_in_use = false;
        Ok(())
    }

    /// Makes exactly `indices` active.
    ///
    /// # Errors
    ///
    /// Returns an error unless indices are strictly ascending and below capacity.
    pub fn set_selection(&mut self, indices: &[usize]) -> Result<()> {
        if indices.len() > self.capacity {
            return Err(VexError::InvalidSelection(format!(
                "{} indices exceed capacity {}",
                indices.len(),
                self.capacity
            )));
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(VexError::InvalidSelection(
                "indices must be strictly ascending".into(),
            ));
        }
        if let Some(&last) = indices.last() {
            if last >= self.capacity {
                return Err(VexError::InvalidSelection(format!(
                    "index {last} out of capacity {}",
                    self.capacity
                )));
            }
        }
        self.selected[..indices.len()].copy_from_slice(indices);
        self.size = indices.len();
        self.selected_in_use = true;
        Ok(())
    }

    /// Drops the selection, keeping `size` as a contiguous count.
    pub fn clear_selection(&mut self) {
        self.selected_in_use = false;
    }

    /// Returns the active rows of this batch.
    #[must_use]
    pub fn active_rows(&self) -> ActiveRows<'_> {
        ActiveRows::new(
            self.size,
            self.selected_in_use.then_some(self.selected.as_slice()),
        )
    }

    /// Prepares the batch for refilling by the row source.
    pub fn reset(&mut self) {
        self.size = 0;
        self.selected_in_use = false;
        for col in &mut self.cols {
            col.reset();
        }
    }

    /// Splits the batch for one node pass: active rows, read-only inputs and
    /// exclusive access to the output column.
    ///
    /// # Errors
    ///
    /// Returns `ColumnOutOfRange` if `output` does not exist.
    pub fn split_output(
        &mut self,
        output: usize,
    ) -> Result<(ActiveRows<'_>, InputColumns<'_>, &mut ColumnVector)> {
        let width = self.cols.len();
        if output >= width {
            return Err(VexError::ColumnOutOfRange {
                column: output,
                width,
            });
        }
        let (before, rest) = self.cols.split_at_mut(output);
        let (out, after) = rest
            .split_first_mut()
            .ok_or(VexError::ColumnOutOfRange { column: output, width })?;
        let rows = ActiveRows::new(
            self.size,
            self.selected_in_use.then_some(self.selected.as_slice()),
        );
        let inputs = InputColumns {
            before,
            after,
            output,
        };
        Ok((rows, inputs, out))
    }

    /// Materializes the active rows into an Arrow batch.
    ///
    /// Field `i` of `schema` is read from column `i`; repeating and no-nulls
    /// columns are expanded, unselected rows are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported field types or mismatched column kinds.
    pub fn to_record_batch(&self, schema: SchemaRef) -> Result<RecordBatch> {
        let rows = self.active_rows();
        let arrays = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| export_column(self.column(i)?, i, field.data_type(), rows))
            .collect::<Result<Vec<_>>>()?;
        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Materializes the active rows under a schema derived from `fields`.
    ///
    /// Column `i` is exported as nullable field `fields[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error for mismatched column kinds.
    pub fn to_record_batch_typed(&self, fields: &[(&str, DataType)]) -> Result<RecordBatch> {
        let schema = Schema::new(
            fields
                .iter()
                .map(|(name, data_type)| Field::new(*name, data_type.to_arrow(), true))
                .collect::<Vec<_>>(),
        );
        self.to_record_batch(Arc::new(schema))
    }

    /// Loads an Arrow batch into a fresh batch with no selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch exceeds `capacity` or holds unsupported types.
    pub fn from_record_batch(batch: &RecordBatch, capacity: usize) -> Result<Self> {
        let n = batch.num_rows();
        if n > capacity {
            return Err(VexError::InvalidSelection(format!(
                "{n} rows exceed capacity {capacity}"
            )));
        }
        let mut out = Self::new(&[], capacity);
        for (i, array) in batch.columns().iter().enumerate() {
            let data_type = DataType::from_arrow(array.data_type()).ok_or_else(|| {
                VexError::Arrow(format!(
                    "unsupported column {i} type {:?}",
                    array.data_type()
                ))
            })?;
            let ordinal = out.add_column(data_type);
            import_column(array, &mut out.cols[ordinal], ordinal)?;
        }
        out.size = n;
        Ok(out)
    }
}

fn export_column(
    col: &ColumnVector,
    ordinal: usize,
    arrow_type: &ArrowDataType,
    rows: ActiveRows<'_>,
) -> Result<ArrayRef> {
    let slot = |i: usize| if col.is_repeating { 0 } else { i };
    let valid = |i: usize| !col.is_null_at(i);
    let array: ArrayRef = match arrow_type {
        ArrowDataType::Int64 => {
            let v = col.data.longs(ordinal)?;
            Arc::new(Int64Array::from_iter(
                rows.iter().map(|i| valid(i).then(|| v[slot(i)])),
            ))
        }
        ArrowDataType::Int32 => {
            let v = col.data.longs(ordinal)?;
            Arc::new(Int32Array::from_iter(
                rows.iter().map(|i| valid(i).then(|| v[slot(i)] as i32)),
            ))
        }
        ArrowDataType::Int16 => {
            let v = col.data.longs(ordinal)?;
            Arc::new(Int16Array::from_iter(
                rows.iter().map(|i| valid(i).then(|| v[slot(i)] as i16)),
            ))
        }
        ArrowDataType::Int8 => {
            let v = col.data.longs(ordinal)?;
            Arc::new(Int8Array::from_iter(
                rows.iter().map(|i| valid(i).then(|| v[slot(i)] as i8)),
            ))
        }
        ArrowDataType::Boolean => {
            let v = col.data.longs(ordinal)?;
            Arc::new(BooleanArray::from_iter(
                rows.iter().map(|i| valid(i).then(|| v[slot(i)] != 0)),
            ))
        }
        ArrowDataType::Date32 => {
            let v = col.data.longs(ordinal)?;
            Arc::new(Date32Array::from_iter(
                rows.iter().map(|i| valid(i).then(|| v[slot(i)] as i32)),
            ))
        }
        ArrowDataType::Float64 => {
            let v = col.data.doubles(ordinal)?;
            Arc::new(Float64Array::from_iter(
                rows.iter().map(|i| valid(i).then(|| v[slot(i)])),
            ))
        }
        ArrowDataType::Float32 => {
            let v = col.data.doubles(ordinal)?;
            Arc::new(Float32Array::from_iter(
                rows.iter().map(|i| valid(i).then(|| v[slot(i)] as f32)),
            ))
        }
        ArrowDataType::Utf8 => {
            let b = col.data.bytes(ordinal)?;
            Arc::new(StringArray::from_iter(rows.iter().map(|i| {
                valid(i).then(|| String::from_utf8_lossy(b.get(slot(i))).into_owned())
            })))
        }
        ArrowDataType::Binary => {
            let b = col.data.bytes(ordinal)?;
            Arc::new(BinaryArray::from_iter(
                rows.iter().map(|i| valid(i).then(|| b.get(slot(i)))),
            ))
        }
        ArrowDataType::Timestamp(TimeUnit::Millisecond, _) => {
            let t = col.data.timestamps(ordinal)?;
            Arc::new(TimestampMillisecondArray::from_iter(
                rows.iter().map(|i| valid(i).then(|| t.time[slot(i)])),
            ))
        }
        ArrowDataType::Decimal128(precision, scale) => {
            let d = col.data.decimals(ordinal)?;
            Arc::new(
                Decimal128Array::from_iter(
                    rows.iter().map(|i| valid(i).then(|| d.unscaled[slot(i)])),
                )
                .with_precision_and_scale(*precision, *scale)?,
            )
        }
        other => {
            return Err(VexError::Arrow(format!(
                "cannot export column {ordinal} as {other:?}"
            )))
        }
    };
    Ok(array)
}

fn import_column(array: &ArrayRef, col: &mut ColumnVector, ordinal: usize) -> Result<()> {
    let missing = || VexError::Arrow(format!("column {ordinal} does not match its declared type"));
    let n = array.len();
    for i in 0..n {
        if array.is_null(i) {
            col.is_null[i] = true;
            col.no_nulls = false;
        }
    }
    match (&mut col.data, array.data_type()) {
        (ColumnData::Long(v), ArrowDataType::Int64) => {
            let a = array.as_primitive_opt::<Int64Type>().ok_or_else(missing)?;
            v[..n].copy_from_slice(a.values());
        }
        (ColumnData::Long(v), ArrowDataType::Int32) => {
            let a = array.as_primitive_opt::<Int32Type>().ok_or_else(missing)?;
            copy_widened(&mut v[..n], a.values());
        }
        (ColumnData::Long(v), ArrowDataType::Int16) => {
            let a = array.as_primitive_opt::<Int16Type>().ok_or_else(missing)?;
            copy_widened(&mut v[..n], a.values());
        }
        (ColumnData::Long(v), ArrowDataType::Int8) => {
            let a = array.as_primitive_opt::<Int8Type>().ok_or_else(missing)?;
            copy_widened(&mut v[..n], a.values());
        }
        (ColumnData::Long(v), ArrowDataType::Date32) => {
            let a = array.as_primitive_opt::<Date32Type>().ok_or_else(missing)?;
            copy_widened(&mut v[..n], a.values());
        }
        (ColumnData::Long(v), ArrowDataType::Boolean) => {
            let a = array.as_boolean_opt().ok_or_else(missing)?;
            for (i, slot) in v[..n].iter_mut().enumerate() {
                *slot = i64::from(a.value(i));
            }
        }
        (ColumnData::Double(v), ArrowDataType::Float64) => {
            let a = array.as_primitive_opt::<Float64Type>().ok_or_else(missing)?;
            v[..n].copy_from_slice(a.values());
        }
        (ColumnData::Double(v), ArrowDataType::Float32) => {
            let a = array.as_primitive_opt::<Float32Type>().ok_or_else(missing)?;
            copy_widened(&mut v[..n], a.values());
        }
        (ColumnData::Bytes(b), ArrowDataType::Utf8) => {
            let a = array.as_string_opt::<i32>().ok_or_else(missing)?;
            for i in 0..n {
                b.set_val(i, a.value(i).as_bytes());
            }
        }
        (ColumnData::Bytes(b), ArrowDataType::LargeUtf8) => {
            let a = array.as_string_opt::<i64>().ok_or_else(missing)?;
            for i in 0..n {
                b.set_val(i, a.value(i).as_bytes());
            }
        }
        (ColumnData::Bytes(b), ArrowDataType::Binary) => {
            let a = array.as_binary_opt::<i32>().ok_or_else(missing)?;
            for i in 0..n {
                b.set_val(i, a.value(i));
            }
        }
        (ColumnData::Bytes(b), ArrowDataType::LargeBinary) => {
            let a = array.as_binary_opt::<i64>().ok_or_else(missing)?;
            for i in 0..n {
                b.set_val(i, a.value(i));
            }
        }
        (ColumnData::Timestamp(t), ArrowDataType::Timestamp(TimeUnit::Millisecond, _)) => {
            let a = array
                .as_primitive_opt::<TimestampMillisecondType>()
                .ok_or_else(missing)?;
            for (i, millis) in a.values().iter().enumerate() {
                t.set_millis(i, *millis);
            }
        }
        (ColumnData::Decimal(d), ArrowDataType::Decimal128(_, _)) => {
            let a = array.as_primitive_opt::<Decimal128Type>().ok_or_else(missing)?;
            d.unscaled[..n].copy_from_slice(a.values());
        }
        _ => return Err(missing()),
    }
    Ok(())
}

fn copy_widened<S: Copy, T: From<S>>(dst: &mut [T], src: &[S]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = T::from(*s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_batch() -> VectorizedRowBatch {
        VectorizedRowBatch::from_columns(vec![
            ColumnVector::from_longs(&[Some(1), Some(2), Some(3), Some(4), Some(5)]),
            ColumnVector::new(ColumnKind::Double, 5),
        ])
        .unwrap()
    }

    #[test]
    fn test_batch_basic() {
        let batch = long_batch();
        assert_eq!(batch.size, 5);
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(batch.capacity(), 5);
        assert!(!batch.selected_in_use);
    }

    #[test]
    fn test_from_columns_rejects_mixed_capacity() {
        let result = VectorizedRowBatch::from_columns(vec![
            ColumnVector::new(ColumnKind::Long, 4),
            ColumnVector::new(ColumnKind::Long, 8),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_selection() {
        let mut batch = long_batch();
        batch.set_selection(&[0, 2, 4]).unwrap();
        assert_eq!(batch.size, 3);
        let rows: Vec<usize> = batch.active_rows().iter().collect();
        assert_eq!(rows, vec![0, 2, 4]);

        batch.clear_selection();
        let rows: Vec<usize> = batch.active_rows().iter().collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_selection_must_ascend() {
        let mut batch = long_batch();
        assert!(batch.set_selection(&[2, 1]).is_err());
        assert!(batch.set_selection(&[1, 1]).is_err());
        assert!(batch.set_selection(&[9]).is_err());
    }

    #[test]
    fn test_split_output_guards_aliasing() {
        let mut batch = long_batch();
        let (rows, inputs, out) = batch.split_output(1).unwrap();
        assert_eq!(rows.size(), 5);
        assert_eq!(out.kind(), ColumnKind::Double);
        assert_eq!(inputs.get(0).unwrap().kind(), ColumnKind::Long);
        assert_eq!(inputs.get(1).unwrap_err(), VexError::ColumnAliasing(1));
        assert!(matches!(
            inputs.get(2),
            Err(VexError::ColumnOutOfRange { column: 2, width: 2 })
        ));
    }

    #[test]
    fn test_add_column_keeps_decimal_scale() {
        let mut batch = VectorizedRowBatch::new(&[ColumnKind::Long], 8);
        let ordinal = batch.add_column(DataType::Decimal { precision: 10, scale: 2 });
        assert_eq!(ordinal, 1);
        let d = batch.cols[1].data.decimals(1).unwrap();
        assert_eq!((d.precision, d.scale), (10, 2));
    }

    #[test]
    fn test_record_batch_export_honors_selection_and_repeat() {
        let mut batch = VectorizedRowBatch::from_columns(vec![
            ColumnVector::from_longs(&[Some(10), None, Some(30), Some(40)]),
            ColumnVector::from_doubles(&[Some(1.5), Some(0.0), Some(0.0), Some(0.0)]),
        ])
        .unwrap();
        batch.cols[1].is_repeating = true;
        batch.set_selection(&[1, 3]).unwrap();

        let schema = Arc::new(Schema::new(vec![
            Field::new("a", ArrowDataType::Int64, true),
            Field::new("b", ArrowDataType::Float64, true),
        ]));
        let rb = batch.to_record_batch(schema).unwrap();
        assert_eq!(rb.num_rows(), 2);

        let a = rb.column(0).as_primitive::<Int64Type>();
        assert!(a.is_null(0));
        assert_eq!(a.value(1), 40);
        let b = rb.column(1).as_primitive::<Float64Type>();
        assert_eq!(b.value(0), 1.5);
        assert_eq!(b.value(1), 1.5);
    }

    #[test]
    fn test_typed_export_derives_schema() {
        let mut batch = VectorizedRowBatch::from_columns(vec![
            ColumnVector::from_longs(&[Some(18_266), None]),
            ColumnVector::from_strs(&[Some("x"), Some("y")]),
        ])
        .unwrap();
        batch.cols[1].is_repeating = true;

        let rb = batch
            .to_record_batch_typed(&[("day", DataType::Date), ("tag", DataType::Char(1))])
            .unwrap();
        assert_eq!(rb.schema().field(0).data_type(), &ArrowDataType::Date32);
        assert_eq!(rb.schema().field(1).name(), "tag");
        let day = rb.column(0).as_primitive::<Date32Type>();
        assert_eq!(day.value(0), 18_266);
        assert!(day.is_null(1));
        let tag = rb.column(1).as_string::<i32>();
        assert_eq!(tag.value(1), "x");
    }

    #[test]
    fn test_for_config_uses_batch_size() {
        let config = EvaluatorConfig::new().with_batch_size(64);
        let batch =
            VectorizedRowBatch::for_config(&[DataType::Double, DataType::Timestamp], &config);
        assert_eq!(batch.capacity(), 64);
        assert_eq!(batch.cols[1].kind(), ColumnKind::Timestamp);
        assert_eq!(batch.size, 0);
    }

    #[test]
    fn test_record_batch_import() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", ArrowDataType::Int64, false),
            Field::new("name", ArrowDataType::Utf8, true),
            Field::new("day", ArrowDataType::Date32, true),
        ]));
        let rb = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef,
                Arc::new(StringArray::from(vec![Some("a"), None, Some("c")])) as ArrayRef,
                Arc::new(Date32Array::from(vec![18_266, 18_267, 18_268])) as ArrayRef,
            ],
        )
        .unwrap();

        let batch = VectorizedRowBatch::from_record_batch(&rb, 16).unwrap();
        assert_eq!(batch.size, 3);
        assert_eq!(batch.capacity(), 16);
        assert!(batch.cols[0].no_nulls);
        assert_eq!(&batch.cols[0].data.longs(0).unwrap()[..3], &[1, 2, 3]);
        assert!(!batch.cols[1].no_nulls);
        assert!(batch.cols[1].is_null[1]);
        assert_eq!(batch.cols[1].data.bytes(1).unwrap().get(2), b"c");
        assert_eq!(batch.cols[2].data.longs(2).unwrap()[0], 18_266);
    }

    #[test]
    fn test_reset() {
        let mut batch = long_batch();
        batch.set_selection(&[1]).unwrap();
        batch.cols[0].is_repeating = true;
        batch.reset();
        assert_eq!(batch.size, 0);
        assert!(!batch.selected_in_use);
        assert!(!batch.cols[0].is_repeating);
    }
}
