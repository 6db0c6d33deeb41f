//! Type metadata and bound literal values.

mod value;

pub use value::{ColumnKind, DataType, ScalarValue};
