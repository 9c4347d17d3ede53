use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Decimal, Timestamp};
use price_oracle_common::{
    parse_exchange_rate_tuples, AggregateVoteHash, DenomList, ExchangeRateTuple,
};

use crate::error::ContractError;
use crate::genesis::GenesisState;
use crate::params::Params;
use crate::state::{
    AggregateExchangeRatePrevote, AggregateExchangeRateVote, ModuleConfig, PriceHistoryEntry,
};

/// Required salt length in hex characters.
pub const SALT_LENGTH: usize = 64;
/// Upper bound on the revealed rates string.
pub const MAX_EXCHANGE_RATES_LENGTH: usize = 4096;
pub const MAX_TITLE_LENGTH: usize = 140;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

#[cw_serde]
pub struct InstantiateMsg {
    pub config: ModuleConfig,
    pub genesis: GenesisState,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Commit to rates for the current vote period. Sent by the validator or
    /// its feeder.
    AggregateExchangeRatePrevote { hash: String, validator: String },
    /// Reveal the rates committed to in the previous vote period.
    AggregateExchangeRateVote {
        salt: String,
        exchange_rates: String,
        validator: String,
    },
    /// Let `delegate` submit oracle messages for `operator`. Operator only.
    DelegateFeedConsent { operator: String, delegate: String },
}

impl ExecuteMsg {
    /// Stateless checks run before a message touches the store.
    pub fn validate_basic(&self) -> Result<(), ContractError> {
        match self {
            ExecuteMsg::AggregateExchangeRatePrevote { hash, .. } => {
                AggregateVoteHash::from_hex(hash)?;
            }
            ExecuteMsg::AggregateExchangeRateVote {
                salt,
                exchange_rates,
                ..
            } => {
                if exchange_rates.is_empty() {
                    return Err(ContractError::EmptyExchangeRates);
                }
                if exchange_rates.len() > MAX_EXCHANGE_RATES_LENGTH {
                    return Err(ContractError::ExchangeRatesTooLong {
                        max: MAX_EXCHANGE_RATES_LENGTH,
                    });
                }
                parse_exchange_rate_tuples(exchange_rates)?;

                if salt.len() != SALT_LENGTH {
                    return Err(ContractError::InvalidSaltLength { got: salt.len() });
                }
                if hex::decode(salt).is_err() {
                    return Err(ContractError::InvalidSaltFormat);
                }
            }
            ExecuteMsg::DelegateFeedConsent { .. } => {}
        }
        Ok(())
    }
}

/// Governance proposals that edit the denom lists.
#[cw_serde]
pub enum ProposalMsg {
    AddTrackingPriceHistory {
        title: String,
        description: String,
        tracking_list: DenomList,
    },
    /// Track the denoms and also accept votes for them.
    AddTrackingPriceHistoryWithAcceptList {
        title: String,
        description: String,
        tracking_list: DenomList,
    },
    RemoveTrackingPriceHistory {
        title: String,
        description: String,
        remove_tracking_list: DenomList,
    },
    AddTwapTrackingList {
        title: String,
        description: String,
        tracking_list: DenomList,
    },
    RemoveTwapTrackingList {
        title: String,
        description: String,
        remove_tracking_list: DenomList,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Params)]
    Params {},
    /// All current rates, or the rate of `denom` alone.
    #[returns(ExchangeRatesResponse)]
    ExchangeRates { denom: Option<String> },
    /// Denoms with a rate from the last tally.
    #[returns(ActiveExchangeRatesResponse)]
    ActiveExchangeRates {},
    #[returns(FeederDelegationResponse)]
    FeederDelegation { validator: String },
    #[returns(MissCounterResponse)]
    MissCounter { validator: String },
    #[returns(SlashWindowResponse)]
    SlashWindow {},
    #[returns(AggregatePrevoteResponse)]
    AggregatePrevote { validator: String },
    #[returns(AggregatePrevotesResponse)]
    AggregatePrevotes {},
    #[returns(AggregateVoteResponse)]
    AggregateVote { validator: String },
    #[returns(AggregateVotesResponse)]
    AggregateVotes {},
    #[returns(DenomList)]
    PriceTrackingLists {},
    #[returns(DenomList)]
    TwapTrackingLists {},
    /// Entry in effect at `time`.
    #[returns(PriceHistoryEntry)]
    PriceHistoryAt { denom: String, time: Timestamp },
    #[returns(Vec<PriceHistoryEntry>)]
    AllPriceHistory {
        denom: String,
        /// Update time in nanoseconds
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(u64)]
    CurrentVotePeriodCount { denom: String },
    #[returns(Decimal)]
    ArithmeticTwap {
        denom: String,
        start_time: Timestamp,
        end_time: Timestamp,
    },
}

#[cw_serde]
pub struct ExchangeRatesResponse {
    pub exchange_rates: Vec<ExchangeRateTuple>,
}

#[cw_serde]
pub struct ActiveExchangeRatesResponse {
    pub active_rates: Vec<String>,
}

#[cw_serde]
pub struct FeederDelegationResponse {
    pub feeder_addr: String,
}

#[cw_serde]
pub struct MissCounterResponse {
    pub miss_counter: u64,
}

#[cw_serde]
pub struct SlashWindowResponse {
    /// Vote periods elapsed in the current slash window.
    pub window_progress: u64,
}

#[cw_serde]
pub struct AggregatePrevoteResponse {
    pub aggregate_prevote: AggregateExchangeRatePrevote,
}

#[cw_serde]
pub struct AggregatePrevotesResponse {
    pub aggregate_prevotes: Vec<AggregateExchangeRatePrevote>,
}

#[cw_serde]
pub struct AggregateVoteResponse {
    pub aggregate_vote: AggregateExchangeRateVote,
}

#[cw_serde]
pub struct AggregateVotesResponse {
    pub aggregate_votes: Vec<AggregateExchangeRateVote>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_oracle_common::ParseError;

    const SALT: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn vote(salt: &str, rates: &str) -> ExecuteMsg {
        ExecuteMsg::AggregateExchangeRateVote {
            salt: salt.to_string(),
            exchange_rates: rates.to_string(),
            validator: "val".to_string(),
        }
    }

    #[test]
    fn test_prevote_hash_checks() {
        let hash = AggregateVoteHash::compute(SALT, "ATOM:1", "val").to_hex();
        let msg = ExecuteMsg::AggregateExchangeRatePrevote {
            hash,
            validator: "val".to_string(),
        };
        msg.validate_basic().unwrap();

        let msg = ExecuteMsg::AggregateExchangeRatePrevote {
            hash: "abcd".to_string(),
            validator: "val".to_string(),
        };
        assert!(matches!(
            msg.validate_basic().unwrap_err(),
            ContractError::Parse(ParseError::InvalidHashLength { got: 2, .. })
        ));

        let msg = ExecuteMsg::AggregateExchangeRatePrevote {
            hash: "zz".repeat(20),
            validator: "val".to_string(),
        };
        assert!(matches!(
            msg.validate_basic().unwrap_err(),
            ContractError::Parse(ParseError::InvalidHex { .. })
        ));
    }

    #[test]
    fn test_vote_checks() {
        vote(SALT, "ATOM:1.5,JUNO:0.2").validate_basic().unwrap();

        assert!(matches!(
            vote(SALT, "").validate_basic().unwrap_err(),
            ContractError::EmptyExchangeRates
        ));
        let long = vec!["ATOM:1"; 700].join(",");
        assert!(matches!(
            vote(SALT, &long).validate_basic().unwrap_err(),
            ContractError::ExchangeRatesTooLong { .. }
        ));
        assert!(matches!(
            vote(SALT, "ATOM:0").validate_basic().unwrap_err(),
            ContractError::Parse(ParseError::NonPositiveRate { .. })
        ));
        assert!(matches!(
            vote("abc", "ATOM:1").validate_basic().unwrap_err(),
            ContractError::InvalidSaltLength { got: 3 }
        ));
        assert!(matches!(
            vote(&"g".repeat(64), "ATOM:1").validate_basic().unwrap_err(),
            ContractError::InvalidSaltFormat
        ));
    }
}
