use cosmwasm_std::{Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};

use crate::abci;
use crate::error::ContractError;
use crate::execute;
use crate::genesis::{self, GenesisState};
use crate::gov;
use crate::keepers::{Keepers, StakingKeeper};
use crate::msg::{ExecuteMsg, InstantiateMsg, ProposalMsg, QueryMsg};
use crate::query;

pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    genesis::init_genesis(deps, msg.config, msg.genesis)
}

pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    staking: &dyn StakingKeeper,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    msg.validate_basic()?;
    match msg {
        ExecuteMsg::AggregateExchangeRatePrevote { hash, validator } => {
            execute::aggregate_exchange_rate_prevote(deps, env, info, staking, hash, validator)
        }
        ExecuteMsg::AggregateExchangeRateVote {
            salt,
            exchange_rates,
            validator,
        } => execute::aggregate_exchange_rate_vote(
            deps,
            env,
            info,
            staking,
            salt,
            exchange_rates,
            validator,
        ),
        ExecuteMsg::DelegateFeedConsent { operator, delegate } => {
            execute::delegate_feed_consent(deps, info, staking, operator, delegate)
        }
    }
}

/// Block hook, called once per height after all messages.
pub fn end_block(
    deps: DepsMut,
    env: Env,
    keepers: &mut Keepers,
) -> Result<Response, ContractError> {
    abci::end_blocker(deps, &env, keepers)
}

/// Apply a governance proposal that has passed.
pub fn proposal(deps: DepsMut, _env: Env, msg: ProposalMsg) -> Result<Response, ContractError> {
    gov::handle_proposal(deps, msg)
}

pub fn export(deps: Deps) -> StdResult<GenesisState> {
    genesis::export_genesis(deps)
}

pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Params {} => query::query_params(deps),
        QueryMsg::ExchangeRates { denom } => query::query_exchange_rates(deps, denom),
        QueryMsg::ActiveExchangeRates {} => query::query_active_exchange_rates(deps),
        QueryMsg::FeederDelegation { validator } => {
            query::query_feeder_delegation(deps, validator)
        }
        QueryMsg::MissCounter { validator } => query::query_miss_counter(deps, validator),
        QueryMsg::SlashWindow {} => query::query_slash_window(deps, env),
        QueryMsg::AggregatePrevote { validator } => {
            query::query_aggregate_prevote(deps, validator)
        }
        QueryMsg::AggregatePrevotes {} => query::query_aggregate_prevotes(deps),
        QueryMsg::AggregateVote { validator } => query::query_aggregate_vote(deps, validator),
        QueryMsg::AggregateVotes {} => query::query_aggregate_votes(deps),
        QueryMsg::PriceTrackingLists {} => query::query_price_tracking_lists(deps),
        QueryMsg::TwapTrackingLists {} => query::query_twap_tracking_lists(deps),
        QueryMsg::PriceHistoryAt { denom, time } => {
            query::query_price_history_at(deps, denom, time)
        }
        QueryMsg::AllPriceHistory {
            denom,
            start_after,
            limit,
        } => query::query_all_price_history(deps, denom, start_after, limit),
        QueryMsg::CurrentVotePeriodCount { denom } => {
            query::query_current_vote_period_count(deps, denom)
        }
        QueryMsg::ArithmeticTwap {
            denom,
            start_time,
            end_time,
        } => query::query_arithmetic_twap(deps, denom, start_time, end_time),
    }
}
