//! Storage module for columnar batch data.
//!
//! This module provides the column storage family used by every batch:
//! - A shared null/repeat model ([`ColumnVector`])
//! - Kind-specific payloads ([`ColumnData`], [`BytesData`], [`TimestampData`], [`DecimalData`])

mod bytes;
mod column;

pub use bytes::BytesData;
pub use column::{ColumnData, ColumnVector, DecimalData, TimestampData, MILLIS_PER_DAY};
