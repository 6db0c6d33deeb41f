//! Day difference between a bound date literal and a date column.
//!
//! Either side may be a day number, a timestamp or `yyyy-MM-dd` text; the
//! representation is resolved once per instance from static type metadata.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, VexError};
use crate::executor::vectorized::descriptor::{
    ArgumentType, Descriptor, InputExpressionType, Mode,
};
use crate::executor::vectorized::expression::{
    map_column, map_rows, split_column, VectorExpression,
};
use crate::executor::vectorized::null_util::{set_null_data_entries, NULL_LONG_VALUE};
use crate::executor::vectorized::VectorizedRowBatch;
use crate::storage::MILLIS_PER_DAY;
use crate::types::{ColumnKind, DataType, ScalarValue};

use super::{check_distinct, expect_kind};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// How a date-difference operand stores its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateOperand {
    /// Day number in a long column.
    Date,
    /// Epoch milliseconds.
    Timestamp,
    /// `yyyy-MM-dd` prefixed text.
    Text,
}

impl DateOperand {
    /// Resolves the representation of argument `position` of `operator`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedInputType` for types outside string/date/timestamp.
    pub fn from_type(operator: &str, position: usize, data_type: DataType) -> Result<Self> {
        match data_type {
            DataType::Date => Ok(DateOperand::Date),
            DataType::Timestamp => Ok(DateOperand::Timestamp),
            t if t.is_string_family() => Ok(DateOperand::Text),
            other => Err(VexError::UnsupportedInputType {
                operator: operator.to_string(),
                position,
                data_type: other,
            }),
        }
    }
}

/// Parses a `yyyy-MM-dd` prefix into days since the Unix epoch.
///
/// Month and day may be one or two digits. Out-of-range fields such as
/// `2020-02-30` do not roll into the next month; they fail to parse.
fn parse_days(text: &[u8]) -> Option<i64> {
    let text = std::str::from_utf8(text).ok()?;
    let (date, _) = NaiveDate::parse_and_remainder(text, "%Y-%m-%d").ok()?;
    Some(i64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
}

/// Remembers the last parsed column text; runs of equal values parse once.
#[derive(Debug, Default)]
struct DateParseCache {
    last: Vec<u8>,
    days: Option<i64>,
    primed: bool,
}

impl DateParseCache {
    fn parse(&mut self, text: &[u8]) -> Option<i64> {
        if !self.primed || self.last != text {
            self.last.clear();
            self.last.extend_from_slice(text);
            self.days = parse_days(text);
            self.primed = true;
        }
        self.days
    }
}

#[derive(Debug)]
enum ScalarDays {
    Days(i64),
    /// Text not yet parsed.
    Text(String),
    /// Text that failed to parse; every later batch fails the same way.
    Invalid(String),
    Null,
}

/// Shared state of both operand orders.
#[derive(Debug)]
struct DateDiff {
    operator: &'static str,
    col_num: usize,
    column: DateOperand,
    scalar: ScalarDays,
    scalar_first: bool,
    output_column: usize,
    cache: DateParseCache,
}

impl DateDiff {
    fn new(
        operator: &'static str,
        value: &ScalarValue,
        scalar_type: DataType,
        col_num: usize,
        col_type: DataType,
        output_column: usize,
        scalar_first: bool,
    ) -> Result<Self> {
        check_distinct(col_num, output_column)?;
        let (scalar_position, col_position) = if scalar_first { (0, 1) } else { (1, 0) };
        let scalar_repr = DateOperand::from_type(operator, scalar_position, scalar_type)?;
        let column = DateOperand::from_type(operator, col_position, col_type)?;

        let scalar = match (scalar_repr, value) {
            (_, ScalarValue::Null) => ScalarDays::Null,
            (DateOperand::Date, ScalarValue::Long(days)) => ScalarDays::Days(*days),
            (DateOperand::Timestamp, ScalarValue::Timestamp(millis)) => {
                ScalarDays::Days(millis.div_euclid(MILLIS_PER_DAY))
            }
            (DateOperand::Text, ScalarValue::Bytes(bytes)) => {
                let text = String::from_utf8_lossy(bytes);
                let text = match scalar_type {
                    DataType::Char(_) => text.trim_end_matches(' '),
                    _ => text.as_ref(),
                };
                ScalarDays::Text(text.to_string())
            }
            (_, other) => {
                return Err(VexError::UnexpectedScalar {
                    operator: operator.to_string(),
                    value: other.to_string(),
                })
            }
        };

        Ok(DateDiff {
            operator,
            col_num,
            column,
            scalar,
            scalar_first,
            output_column,
            cache: DateParseCache::default(),
        })
    }

    /// Day number of the scalar, parsing text on first use.
    fn scalar_days(&mut self) -> Result<Option<i64>> {
        if let ScalarDays::Text(text) = &self.scalar {
            let resolved = match parse_days(text.as_bytes()) {
                Some(days) => ScalarDays::Days(days),
                None => {
                    warn!("{}: scalar {:?} is not a date", self.operator, text);
                    ScalarDays::Invalid(text.clone())
                }
            };
            self.scalar = resolved;
        }
        match &self.scalar {
            ScalarDays::Days(days) => Ok(Some(*days)),
            ScalarDays::Null => Ok(None),
            ScalarDays::Text(text) | ScalarDays::Invalid(text) => Err(VexError::ScalarParse {
                value: text.clone(),
                target: "date",
            }),
        }
    }

    fn evaluate(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let scalar_days = self.scalar_days()?;
        let (rows, inputs, out) = batch.split_output(self.output_column)?;
        let input = inputs.get(self.col_num)?;
        expect_kind(out, self.output_column, ColumnKind::Long)?;

        let Some(base) = scalar_days else {
            out.set_repeating_null();
            set_null_data_entries(out, rows);
            return Ok(());
        };
        let scalar_first = self.scalar_first;
        let diff = move |days: i64| {
            if scalar_first {
                base.wrapping_sub(days)
            } else {
                days.wrapping_sub(base)
            }
        };

        let (mask, data) = split_column(out);
        let out_values = data.longs_mut(self.output_column)?;
        match self.column {
            DateOperand::Date => {
                let values = input.data.longs(self.col_num)?;
                map_column(input, values, mask, out_values, rows, diff);
            }
            DateOperand::Timestamp => {
                let values = input.data.timestamps(self.col_num)?.time.as_slice();
                map_column(input, values, mask, out_values, rows, |millis| {
                    diff(millis.div_euclid(MILLIS_PER_DAY))
                });
            }
            DateOperand::Text => {
                let bytes = input.data.bytes(self.col_num)?;
                let cache = &mut self.cache;
                map_rows(input, mask, rows, |i| match cache.parse(bytes.get(i)) {
                    Some(days) => {
                        out_values[i] = diff(days);
                        true
                    }
                    None => {
                        out_values[i] = NULL_LONG_VALUE;
                        false
                    }
                });
            }
        }
        set_null_data_entries(out, rows);
        Ok(())
    }
}

fn date_diff_descriptor(inputs: [InputExpressionType; 2]) -> Descriptor {
    Descriptor::builder()
        .mode(Mode::Projection)
        .argument_types(&[
            ArgumentType::StringDatetimeFamily,
            ArgumentType::StringDatetimeFamily,
        ])
        .input_types(&inputs)
        .build()
}

/// `datediff(scalar, column)`: scalar day minus column day.
#[derive(Debug)]
pub struct DateDiffScalarCol {
    inner: DateDiff,
    children: Vec<Box<dyn VectorExpression>>,
}

impl DateDiffScalarCol {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        date_diff_descriptor([InputExpressionType::Scalar, InputExpressionType::Column])
    }

    /// # Errors
    ///
    /// Returns an error if either type is not string/date/timestamp, the
    /// scalar does not match its declared type, or the input is the output.
    pub fn new(
        value: &ScalarValue,
        scalar_type: DataType,
        col_num: usize,
        col_type: DataType,
        output_column: usize,
    ) -> Result<Self> {
        Ok(DateDiffScalarCol {
            inner: DateDiff::new(
                "DateDiffScalarCol",
                value,
                scalar_type,
                col_num,
                col_type,
                output_column,
                true,
            )?,
            children: Vec::new(),
        })
    }
}

impl VectorExpression for DateDiffScalarCol {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        self.inner.evaluate(batch)
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.inner.output_column)
    }

    fn output_type(&self) -> DataType {
        DataType::Int
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
        self.inner.operator
    }
}

/// `datediff(column, scalar)`: column day minus scalar day.
#[derive(Debug)]
pub struct DateDiffColScalar {
    inner: DateDiff,
    children: Vec<Box<dyn VectorExpression>>,
}

impl DateDiffColScalar {
    /// Static shape this operator binds under.
    #[must_use]
    pub fn signature() -> Descriptor {
        date_diff_descriptor([InputExpressionType::Column, InputExpressionType::Scalar])
    }

    /// # Errors
    ///
    /// Returns an error if either type is not string/date/timestamp, the
    /// scalar does not match its declared type, or the input is the output.
    pub fn new(
        col_num: usize,
        col_type: DataType,
        value: &ScalarValue,
        scalar_type: DataType,
        output_column: usize,
    ) -> Result<Self> {
        Ok(DateDiffColScalar {
            inner: DateDiff::new(
                "DateDiffColScalar",
                value,
                scalar_type,
                col_num,
                col_type,
                output_column,
                false,
            )?,
            children: Vec::new(),
        })
    }
}

impl VectorExpression for DateDiffColScalar {
    fn evaluate_node(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        self.inner.evaluate(batch)
    }

    fn output_column(&self) -> Option<usize> {
        Some(self.inner.output_column)
    }

    fn output_type(&self) -> DataType {
        DataType::Int
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
        self.inner.operator
    }
}
