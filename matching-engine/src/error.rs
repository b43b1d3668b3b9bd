use thiserror::Error;

/// Submission rejections. The engine never aborts on legal input: an
/// invalid submission is reported to the submitter and leaves the book
/// untouched, and a cancel of an unknown id is a negative boolean, not an
/// error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("order volume must be positive")]
    InvalidVolume,

    #[error("market order cannot carry a limit price")]
    MarketOrderWithPrice,

    #[error("limit order requires a price")]
    LimitOrderWithoutPrice,
}

pub type Result<T> = std::result::Result<T, EngineError>;
