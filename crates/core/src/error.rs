use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("invalid date {input:?}: expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { input: String },
}

/// Failures that make a mock batch impossible to build. These are configuration
/// mistakes, never something a caller can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("{kind} template pool is empty")]
    EmptyTemplatePool { kind: &'static str },

    #[error("timeline window must be at least {min} days (got {got})")]
    WindowTooShort { min: usize, got: usize },

    #[error("a {window_days}-day window ending {date} falls outside the supported calendar")]
    DateOutOfRange { date: NaiveDate, window_days: usize },

    #[error("{kind} batch has {got} unique items after de-duplication, need at least {min}")]
    BelowMinimum {
        kind: &'static str,
        min: usize,
        got: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("invalid reference {raw:?}: expected agg:<id> or rec:<id>")]
    InvalidReference { raw: String },

    #[error("reference {reference} is listed but never cited in the text")]
    MissingToken { reference: String },

    #[error("text cites {reference} but it is not listed in references")]
    UnlistedToken { reference: String },

    #[error("text uses citation slot {{{slot}}} but only {available} citations exist")]
    UnknownSlot { slot: usize, available: usize },

    #[error("citation {index} ({reference}) is never used in the text")]
    UnusedCitation { index: usize, reference: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("prompt must not be empty")]
    Empty,

    #[error("prompt must be at most {max} characters (got {len})")]
    TooLong { len: usize, max: usize },
}
