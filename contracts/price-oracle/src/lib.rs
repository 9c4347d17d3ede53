pub mod abci;
pub mod ballot;
pub mod contract;
pub mod error;
pub mod exchange_rate;
pub mod execute;
pub mod genesis;
pub mod gov;
pub mod history;
pub mod keepers;
pub mod msg;
pub mod params;
pub mod query;
pub mod reward;
pub mod slash;
pub mod state;
pub mod tally;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod vote;

pub use crate::error::ContractError;
