use cosmwasm_std::{ConversionOverflowError, DivideByZeroError, OverflowError, StdError};
use price_oracle_common::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),

    #[error("{0}")]
    DivideByZero(#[from] DivideByZeroError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("invalid salt length; must be 64, got {got}")]
    InvalidSaltLength { got: usize },

    #[error("salt must be a valid hex string")]
    InvalidSaltFormat,

    #[error("must provide at least one oracle exchange rate")]
    EmptyExchangeRates,

    #[error("exchange rates string can not exceed {max} characters")]
    ExchangeRatesTooLong { max: usize },

    #[error("unauthorized voter: {feeder} may not submit for {validator}")]
    NoVotingPermission { feeder: String, validator: String },

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("validator {address} is not in the active set")]
    NoValidatorFound { address: String },

    #[error("prevote already submitted for this voting period by {voter}")]
    ExistingPrevote { voter: String },

    #[error("no aggregate prevote for {voter}")]
    NoAggregatePrevote { voter: String },

    #[error("no aggregate vote for {voter}")]
    NoAggregateVote { voter: String },

    #[error("reveal period of submitted vote does not match with registered prevote (submitted at {submit_block}, revealed at {height})")]
    RevealPeriodMissMatch { submit_block: u64, height: u64 },

    #[error("hash verification failed: must be given {expected} not {got}")]
    VerificationFailed { expected: String, got: String },

    #[error("unknown denom {denom}")]
    UnknownDenom { denom: String },

    #[error("ballot must be sorted before this operation")]
    BallotNotSorted,

    #[error("no price history for {denom} in range")]
    NoHistoryInRange { denom: String },

    #[error("start time {start} after end time {end}")]
    InvalidTimeRange { start: u64, end: u64 },

    #[error("invalid parameter {param}: {reason}")]
    InvalidParams { param: String, reason: String },

    #[error("invalid proposal content: {reason}")]
    InvalidProposal { reason: String },

    #[error("empty {field}")]
    Empty { field: String },
}
