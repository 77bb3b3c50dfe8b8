use thiserror::Error;

/// An exam date string that does not name a calendar day.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid exam date '{input}'")]
pub struct InvalidDateError {
    pub input: String,
}

impl InvalidDateError {
    pub fn new(input: &str) -> Self {
        InvalidDateError {
            input: input.to_string(),
        }
    }
}

/// Failure to obtain exam records from the backing store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("exam store unavailable: {0}")]
    Unavailable(String),

    #[error("exam store is malformed: {0}")]
    Malformed(String),
}
