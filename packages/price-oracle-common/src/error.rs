use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid hash length; should equal {expected}, got {got}")]
    InvalidHashLength { expected: usize, got: usize },

    #[error("invalid exchange rate {tuple}")]
    InvalidExchangeRate { tuple: String },

    #[error("invalid oracle price for {denom}; should be positive")]
    NonPositiveRate { denom: String },

    #[error("duplicated denom {denom}")]
    DuplicateDenom { denom: String },
}
