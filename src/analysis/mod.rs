//! Analysis module - fixed-point ratio arithmetic

mod decimal;

pub use decimal::{DecimalError, FixedDecimal, MAX_SCALE};
