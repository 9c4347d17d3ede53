pub mod denom;
pub mod error;
pub mod tuples;
pub mod vote_hash;

pub use denom::{merge_denoms, remove_denoms, Denom, DenomList, DenomSet};
pub use error::ParseError;
pub use tuples::{format_exchange_rate_tuples, parse_exchange_rate_tuples, ExchangeRateTuple};
pub use vote_hash::{AggregateVoteHash, VOTE_HASH_LEN};
