use thiserror::Error;

/// Errors rejected at the API boundary before any search runs.
///
/// An imperfect fit is not an error: a search over the bounded counter
/// domain always produces a best-so-far [`SearchResult`](crate::SearchResult)
/// and reports the residual in its `error` field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("max_val {0} is outside the counter range 1..=31")]
    MaxValOutOfRange(u32),

    #[error("search radius {0} is outside 0..=31")]
    RadiusOutOfRange(u32),

    #[error("counter {name}={value} is outside {min}..={max}")]
    CounterOutOfRange {
        name: &'static str,
        value: u32,
        min: u8,
        max: u8,
    },

    #[error("table size {0} exceeds the supported maximum of {max}", max = crate::table::MAX_TABLE_LEN)]
    TableTooLarge(u32),

    #[error("table entry {0} fails verification against its metric and the counter domain")]
    TableEntryMismatch(u32),

    #[error("error weight must be at least 1")]
    ZeroErrorWeight,

    #[error("{name} must be {expected}, got {value}")]
    InvalidParameter {
        name: &'static str,
        expected: &'static str,
        value: f64,
    },
}
