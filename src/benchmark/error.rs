use thiserror::Error;

/// Errors surfaced by the benchmark engine.
///
/// Numeric parse failures inside a trade never show up here: they degrade to zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchmarkError {
    /// The input was not a sequence of trade-like records.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
