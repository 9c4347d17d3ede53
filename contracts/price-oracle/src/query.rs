use cosmwasm_std::{to_json_binary, Binary, Deps, Env, StdError, StdResult, Timestamp};

use crate::error::ContractError;
use crate::exchange_rate;
use crate::history;
use crate::msg::{
    ActiveExchangeRatesResponse, AggregatePrevoteResponse, AggregatePrevotesResponse,
    AggregateVoteResponse, AggregateVotesResponse, ExchangeRatesResponse,
    FeederDelegationResponse, MissCounterResponse, SlashWindowResponse,
};
use crate::slash;
use crate::state::PARAMS;
use crate::vote;

fn into_std(err: ContractError) -> StdError {
    match err {
        ContractError::Std(err) => err,
        err => StdError::generic_err(err.to_string()),
    }
}

pub fn query_params(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&PARAMS.load(deps.storage)?)
}

pub fn query_exchange_rates(deps: Deps, denom: Option<String>) -> StdResult<Binary> {
    let exchange_rates = match denom {
        Some(denom) => {
            let rate = exchange_rate::get_exchange_rate(deps.storage, &denom).map_err(into_std)?;
            vec![price_oracle_common::ExchangeRateTuple::new(
                denom.to_uppercase(),
                rate,
            )]
        }
        None => exchange_rate::get_all_exchange_rates(deps.storage)?,
    };
    to_json_binary(&ExchangeRatesResponse { exchange_rates })
}

pub fn query_active_exchange_rates(deps: Deps) -> StdResult<Binary> {
    let active_rates = exchange_rate::get_all_exchange_rates(deps.storage)?
        .into_iter()
        .map(|t| t.denom)
        .collect();
    to_json_binary(&ActiveExchangeRatesResponse { active_rates })
}

pub fn query_feeder_delegation(deps: Deps, validator: String) -> StdResult<Binary> {
    let validator = deps.api.addr_validate(&validator)?;
    let feeder = vote::feeder_for(deps.storage, &validator)?;
    to_json_binary(&FeederDelegationResponse {
        feeder_addr: feeder.to_string(),
    })
}

pub fn query_miss_counter(deps: Deps, validator: String) -> StdResult<Binary> {
    let validator = deps.api.addr_validate(&validator)?;
    to_json_binary(&MissCounterResponse {
        miss_counter: slash::get_miss_counter(deps.storage, &validator)?,
    })
}

pub fn query_slash_window(deps: Deps, env: Env) -> StdResult<Binary> {
    let params = PARAMS.load(deps.storage)?;
    let window_progress = (env.block.height % params.slash_window) / params.vote_period;
    to_json_binary(&SlashWindowResponse { window_progress })
}

pub fn query_aggregate_prevote(deps: Deps, validator: String) -> StdResult<Binary> {
    let validator = deps.api.addr_validate(&validator)?;
    let aggregate_prevote = vote::get_prevote(deps.storage, &validator).map_err(into_std)?;
    to_json_binary(&AggregatePrevoteResponse { aggregate_prevote })
}

pub fn query_aggregate_prevotes(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&AggregatePrevotesResponse {
        aggregate_prevotes: vote::all_prevotes(deps.storage)?,
    })
}

pub fn query_aggregate_vote(deps: Deps, validator: String) -> StdResult<Binary> {
    let validator = deps.api.addr_validate(&validator)?;
    let aggregate_vote = vote::get_vote(deps.storage, &validator).map_err(into_std)?;
    to_json_binary(&AggregateVoteResponse { aggregate_vote })
}

pub fn query_aggregate_votes(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&AggregateVotesResponse {
        aggregate_votes: vote::all_votes(deps.storage)?,
    })
}

pub fn query_price_tracking_lists(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&PARAMS.load(deps.storage)?.price_tracking_list)
}

pub fn query_twap_tracking_lists(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&PARAMS.load(deps.storage)?.twap_tracking_list)
}

pub fn query_price_history_at(deps: Deps, denom: String, time: Timestamp) -> StdResult<Binary> {
    let entry = history::entry_at_or_before(deps.storage, &denom, time).map_err(into_std)?;
    to_json_binary(&entry)
}

pub fn query_all_price_history(
    deps: Deps,
    denom: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    to_json_binary(&history::all_price_history(
        deps.storage,
        &denom,
        start_after,
        limit,
    )?)
}

pub fn query_current_vote_period_count(deps: Deps, denom: String) -> StdResult<Binary> {
    let count = history::current_vote_period_count(deps.storage, &denom).map_err(into_std)?;
    to_json_binary(&count)
}

pub fn query_arithmetic_twap(
    deps: Deps,
    denom: String,
    start_time: Timestamp,
    end_time: Timestamp,
) -> StdResult<Binary> {
    let params = PARAMS.load(deps.storage)?;
    let twap = history::arithmetic_twap(deps.storage, &params, &denom, start_time, end_time)
        .map_err(into_std)?;
    to_json_binary(&twap)
}
