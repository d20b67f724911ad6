use thiserror::Error;

use crate::benchmark::error::BenchmarkError;

/// Errors raised by the admin console outside of the benchmark engine itself
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("no valid fields to update")]
    NoValidFields,

    #[error("invalid value {value:?} for setting {field}")]
    InvalidSettingValue { field: &'static str, value: String },

    #[error("invalid date {0:?} (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("invalid blocked time: {0}")]
    InvalidBlockedTime(String),

    #[error("user {0} not found")]
    UserNotFound(i64),

    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
