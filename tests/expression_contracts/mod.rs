//! Per-family operator contracts.

mod date_diff_contract;
mod divide_contract;
mod null_fill_contract;
mod string_contract;
