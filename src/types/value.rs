//! `DataType`, `ColumnKind` and `ScalarValue` definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reader-facing SQL type of a column or literal.
///
/// Several types share one physical [`ColumnKind`]; the distinction only
/// matters when an operator variant is chosen at tree-construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Boolean, stored as 0/1 in a long column.
    Boolean,
    /// 8-bit signed integer.
    TinyInt,
    /// 16-bit signed integer.
    SmallInt,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    BigInt,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Unbounded UTF-8 string.
    String,
    /// Fixed-length, blank-padded string.
    Char(u32),
    /// Bounded-length string.
    Varchar(u32),
    /// Raw bytes.
    Binary,
    /// Date (days since Unix epoch).
    Date,
    /// Timestamp (milliseconds since Unix epoch plus nanos).
    Timestamp,
    /// Fixed-point decimal.
    Decimal { precision: u8, scale: u8 },
}

impl DataType {
    /// Returns the physical column kind that stores values of this type.
    #[must_use]
    pub fn column_kind(&self) -> ColumnKind {
        match self {
            DataType::Boolean
            | DataType::TinyInt
            | DataType::SmallInt
            | DataType::Int
            | DataType::BigInt
            | DataType::Date => ColumnKind::Long,
            DataType::Float | DataType::Double => ColumnKind::Double,
            DataType::String | DataType::Char(_) | DataType::Varchar(_) | DataType::Binary => {
                ColumnKind::Bytes
            }
            DataType::Timestamp => ColumnKind::Timestamp,
            DataType::Decimal { .. } => ColumnKind::Decimal,
        }
    }

    /// Returns whether this type belongs to the integer family.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt | DataType::SmallInt | DataType::Int | DataType::BigInt
        )
    }

    /// Returns whether this type belongs to the floating point family.
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }

    /// Returns whether this type is string, char or varchar.
    #[must_use]
    pub fn is_string_family(&self) -> bool {
        matches!(
            self,
            DataType::String | DataType::Char(_) | DataType::Varchar(_)
        )
    }

    /// Converts to an Arrow data type.
    #[must_use]
    pub fn to_arrow(&self) -> arrow::datatypes::DataType {
        use arrow::datatypes::{DataType as Arrow, TimeUnit};
        match self {
            DataType::Boolean => Arrow::Boolean,
            DataType::TinyInt => Arrow::Int8,
            DataType::SmallInt => Arrow::Int16,
            DataType::Int => Arrow::Int32,
            DataType::BigInt => Arrow::Int64,
            DataType::Float => Arrow::Float32,
            DataType::Double => Arrow::Float64,
            DataType::String | DataType::Char(_) | DataType::Varchar(_) => Arrow::Utf8,
            DataType::Binary => Arrow::Binary,
            DataType::Date => Arrow::Date32,
            DataType::Timestamp => Arrow::Timestamp(TimeUnit::Millisecond, None),
            DataType::Decimal { precision, scale } => Arrow::Decimal128(*precision, *scale as i8),
        }
    }

    /// Converts from an Arrow data type.
    ///
    /// Returns None for unsupported Arrow types.
    #[must_use]
    pub fn from_arrow(arrow_type: &arrow::datatypes::DataType) -> Option<Self> {
        use arrow::datatypes::DataType as Arrow;
        match arrow_type {
            Arrow::Boolean => Some(DataType::Boolean),
            Arrow::Int8 => Some(DataType::TinyInt),
            Arrow::Int16 => Some(DataType::SmallInt),
            Arrow::Int32 => Some(DataType::Int),
            Arrow::Int64 => Some(DataType::BigInt),
            Arrow::Float32 => Some(DataType::Float),
            Arrow::Float64 => Some(DataType::Double),
            Arrow::Utf8 | Arrow::LargeUtf8 => Some(DataType::String),
            Arrow::Binary | Arrow::LargeBinary => Some(DataType::Binary),
            Arrow::Date32 => Some(DataType::Date),
            Arrow::Timestamp(arrow::datatypes::TimeUnit::Millisecond, _) => {
                Some(DataType::Timestamp)
            }
            Arrow::Decimal128(precision, scale) if *scale >= 0 => Some(DataType::Decimal {
                precision: *precision,
                scale: *scale as u8,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "boolean"),
            DataType::TinyInt => write!(f, "tinyint"),
            DataType::SmallInt => write!(f, "smallint"),
            DataType::Int => write!(f, "int"),
            DataType::BigInt => write!(f, "bigint"),
            DataType::Float => write!(f, "float"),
            DataType::Double => write!(f, "double"),
            DataType::String => write!(f, "string"),
            DataType::Char(len) => write!(f, "char({len})"),
            DataType::Varchar(len) => write!(f, "varchar({len})"),
            DataType::Binary => write!(f, "binary"),
            DataType::Date => write!(f, "date"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
        }
    }
}

/// Physical storage kind of a [`crate::storage::ColumnVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Long,
    Double,
    Bytes,
    Timestamp,
    Decimal,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Long => "long",
            ColumnKind::Double => "double",
            ColumnKind::Bytes => "bytes",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Decimal => "decimal",
        };
        f.write_str(name)
    }
}

/// A literal operand bound into an expression node at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    /// Integer family, boolean or date day number.
    Long(i64),
    /// Floating point value.
    Double(f64),
    /// String family or binary bytes.
    Bytes(Vec<u8>),
    /// Timestamp in milliseconds since Unix epoch.
    Timestamp(i64),
    /// Unscaled decimal value.
    Decimal(i128),
    /// SQL null.
    Null,
}

impl ScalarValue {
    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Attempts to extract an i64 value.
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            ScalarValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract an f64 value, widening longs.
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            ScalarValue::Double(v) => Some(*v),
            ScalarValue::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Attempts to extract a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ScalarValue::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Returns the column kind a column holding this value would use.
    #[must_use]
    pub fn column_kind(&self) -> Option<ColumnKind> {
        match self {
            ScalarValue::Long(_) => Some(ColumnKind::Long),
            ScalarValue::Double(_) => Some(ColumnKind::Double),
            ScalarValue::Bytes(_) => Some(ColumnKind::Bytes),
            ScalarValue::Timestamp(_) => Some(ColumnKind::Timestamp),
            ScalarValue::Decimal(_) => Some(ColumnKind::Decimal),
            ScalarValue::Null => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Long(v) => write!(f, "{v}"),
            ScalarValue::Double(v) => write!(f, "{v}"),
            ScalarValue::Bytes(b) => write!(f, "'{}'", String::from_utf8_lossy(b)),
            ScalarValue::Timestamp(ms) => write!(f, "timestamp({ms})"),
            ScalarValue::Decimal(v) => write!(f, "decimal({v})"),
            ScalarValue::Null => write!(f, "NULL"),
        }
    }
}
