use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Deps, DepsMut, Order, Response, StdResult};
use cw2::set_contract_version;
use price_oracle_common::{DenomSet, ExchangeRateTuple};

use crate::error::ContractError;
use crate::exchange_rate;
use crate::history;
use crate::params::Params;
use crate::slash;
use crate::state::{
    AggregateExchangeRatePrevote, AggregateExchangeRateVote, ModuleConfig, PriceHistoryEntry,
    FEEDER_DELEGATIONS, MODULE_CONFIG, PARAMS, PREVOTES, PRICE_HISTORY, VOTES,
};
use crate::vote;

const CONTRACT_NAME: &str = "crates.io:price-oracle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cw_serde]
pub struct FeederDelegation {
    pub validator_address: String,
    pub feeder_address: String,
}

#[cw_serde]
pub struct MissCounter {
    pub validator_address: String,
    pub miss_counter: u64,
}

#[cw_serde]
pub struct PriceHistory {
    pub denom: String,
    pub entries: Vec<PriceHistoryEntry>,
}

#[cw_serde]
#[derive(Default)]
pub struct GenesisState {
    pub params: Params,
    pub feeder_delegations: Vec<FeederDelegation>,
    pub exchange_rates: Vec<ExchangeRateTuple>,
    pub miss_counters: Vec<MissCounter>,
    pub aggregate_exchange_rate_prevotes: Vec<AggregateExchangeRatePrevote>,
    pub aggregate_exchange_rate_votes: Vec<AggregateExchangeRateVote>,
    pub price_history: Vec<PriceHistory>,
}

pub fn init_genesis(
    deps: DepsMut,
    config: ModuleConfig,
    genesis: GenesisState,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    genesis.params.validate()?;
    if config.module_account.is_empty() || config.distribution_module.is_empty() {
        return Err(ContractError::Empty {
            field: "module account".to_string(),
        });
    }
    if config.native_denom.is_empty() {
        return Err(ContractError::Empty {
            field: "native_denom".to_string(),
        });
    }
    MODULE_CONFIG.save(deps.storage, &config)?;
    PARAMS.save(deps.storage, &genesis.params)?;

    for delegation in &genesis.feeder_delegations {
        let validator = deps.api.addr_validate(&delegation.validator_address)?;
        let feeder = deps.api.addr_validate(&delegation.feeder_address)?;
        vote::set_feeder_delegation(deps.storage, &validator, &feeder)?;
    }
    for tuple in &genesis.exchange_rates {
        exchange_rate::set_exchange_rate(deps.storage, &tuple.denom, tuple.exchange_rate)?;
    }
    for counter in &genesis.miss_counters {
        let validator = deps.api.addr_validate(&counter.validator_address)?;
        slash::set_miss_counter(deps.storage, &validator, counter.miss_counter)?;
    }
    for prevote in &genesis.aggregate_exchange_rate_prevotes {
        let voter = deps.api.addr_validate(prevote.voter.as_str())?;
        PREVOTES.save(deps.storage, &voter, prevote)?;
    }
    for vote in &genesis.aggregate_exchange_rate_votes {
        let voter = deps.api.addr_validate(vote.voter.as_str())?;
        VOTES.save(deps.storage, &voter, vote)?;
    }
    for tracked in &genesis.price_history {
        if !genesis.params.price_tracking_list.is_member(&tracked.denom) {
            return Err(ContractError::UnknownDenom {
                denom: tracked.denom.clone(),
            });
        }
        for entry in &tracked.entries {
            history::store_history_entry(deps.storage, &tracked.denom, entry)?;
        }
    }

    Ok(Response::new()
        .add_attribute("action", "init_genesis")
        .add_attribute("native_denom", config.native_denom)
        .add_attribute("vote_period", genesis.params.vote_period.to_string()))
}

pub fn export_genesis(deps: Deps) -> StdResult<GenesisState> {
    let params = PARAMS.load(deps.storage)?;

    let feeder_delegations = FEEDER_DELEGATIONS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| {
            item.map(|(validator, feeder)| FeederDelegation {
                validator_address: validator.to_string(),
                feeder_address: feeder.to_string(),
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    let miss_counters = slash::all_miss_counters(deps.storage)?
        .into_iter()
        .map(|(validator, miss_counter)| MissCounter {
            validator_address: validator.to_string(),
            miss_counter,
        })
        .collect();

    let mut price_history: Vec<PriceHistory> = vec![];
    for item in PRICE_HISTORY.range(deps.storage, None, None, Order::Ascending) {
        let ((denom, _), entry) = item?;
        match price_history.last_mut() {
            Some(last) if last.denom == denom => last.entries.push(entry),
            _ => price_history.push(PriceHistory {
                denom,
                entries: vec![entry],
            }),
        }
    }

    Ok(GenesisState {
        params,
        feeder_delegations,
        exchange_rates: exchange_rate::get_all_exchange_rates(deps.storage)?,
        miss_counters,
        aggregate_exchange_rate_prevotes: vote::all_prevotes(deps.storage)?,
        aggregate_exchange_rate_votes: vote::all_votes(deps.storage)?,
        price_history,
    })
}
