pub mod benchmark_constants;
pub mod calculator;
pub mod engine;
pub mod error;
pub mod parsing;
pub mod types;
