use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, Timestamp};
use cw_storage_plus::{Item, Map};
use price_oracle_common::ExchangeRateTuple;

use crate::params::Params;

pub const MODULE_CONFIG: Item<ModuleConfig> = Item::new("module_config");
pub const PARAMS: Item<Params> = Item::new("params");

/// Latest consensus rate per symbol denom.
pub const EXCHANGE_RATES: Map<&str, Decimal> = Map::new("exchange_rates");
/// Validator operator -> account allowed to submit oracle messages for it.
pub const FEEDER_DELEGATIONS: Map<&Addr, Addr> = Map::new("feeder_delegations");
/// Vote periods missed in the current slash window.
pub const MISS_COUNTERS: Map<&Addr, u64> = Map::new("miss_counters");
pub const PREVOTES: Map<&Addr, AggregateExchangeRatePrevote> = Map::new("prevotes");
pub const VOTES: Map<&Addr, AggregateExchangeRateVote> = Map::new("votes");
/// (symbol denom, update time in nanoseconds) -> entry. Ordered by time within a denom.
pub const PRICE_HISTORY: Map<(&str, u64), PriceHistoryEntry> = Map::new("price_history");

/// Fixed wiring supplied at genesis.
#[cw_serde]
pub struct ModuleConfig {
    /// Module account holding the reward pool.
    pub module_account: String,
    /// Module account that receives distributed rewards.
    pub distribution_module: String,
    /// Native fee denom, always part of the reward denoms.
    pub native_denom: String,
}

#[cw_serde]
pub struct AggregateExchangeRatePrevote {
    /// Hex-encoded truncated sha256 commitment
    pub hash: String,
    pub voter: Addr,
    pub submit_block: u64,
}

#[cw_serde]
pub struct AggregateExchangeRateVote {
    pub exchange_rate_tuples: Vec<ExchangeRateTuple>,
    pub voter: Addr,
}

#[cw_serde]
pub struct PriceHistoryEntry {
    pub price: Decimal,
    pub vote_period_count: u64,
    pub price_update_time: Timestamp,
}
