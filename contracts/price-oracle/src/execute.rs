use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response};
use price_oracle_common::AggregateVoteHash;

use crate::error::ContractError;
use crate::keepers::StakingKeeper;
use crate::state::PARAMS;
use crate::vote;

/// Commit to a set of rates for the current vote period.
pub fn aggregate_exchange_rate_prevote(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    staking: &dyn StakingKeeper,
    hash: String,
    validator: String,
) -> Result<Response, ContractError> {
    let validator = deps.api.addr_validate(&validator)?;
    vote::validate_feeder(deps.storage, staking, &info.sender, &validator)?;

    let hash = AggregateVoteHash::from_hex(&hash)?;
    let prevote = vote::submit_prevote(deps.storage, &validator, hash, env.block.height)?;

    Ok(Response::new()
        .add_attribute("action", "aggregate_prevote")
        .add_attribute("voter", validator.to_string())
        .add_event(
            Event::new("oracle_prevote")
                .add_attribute("voter", validator.to_string())
                .add_attribute("feeder", info.sender.to_string())
                .add_attribute("hash", prevote.hash)
                .add_attribute("submit_block", prevote.submit_block.to_string()),
        ))
}

/// Reveal the rates committed to by the prevote of the previous period.
pub fn aggregate_exchange_rate_vote(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    staking: &dyn StakingKeeper,
    salt: String,
    exchange_rates: String,
    validator: String,
) -> Result<Response, ContractError> {
    let validator = deps.api.addr_validate(&validator)?;
    vote::validate_feeder(deps.storage, staking, &info.sender, &validator)?;

    let params = PARAMS.load(deps.storage)?;
    let vote = vote::reveal_vote(
        deps.storage,
        &params,
        &validator,
        &salt,
        &exchange_rates,
        env.block.height,
    )?;

    Ok(Response::new()
        .add_attribute("action", "aggregate_vote")
        .add_attribute("voter", validator.to_string())
        .add_event(
            Event::new("oracle_vote")
                .add_attribute("voter", validator.to_string())
                .add_attribute("feeder", info.sender.to_string())
                .add_attribute(
                    "exchange_rates",
                    price_oracle_common::format_exchange_rate_tuples(&vote.exchange_rate_tuples),
                ),
        ))
}

/// Let `delegate` feed prices on behalf of the sending validator operator.
pub fn delegate_feed_consent(
    deps: DepsMut,
    info: MessageInfo,
    staking: &dyn StakingKeeper,
    operator: String,
    delegate: String,
) -> Result<Response, ContractError> {
    let operator = deps.api.addr_validate(&operator)?;
    let delegate = deps.api.addr_validate(&delegate)?;
    if info.sender != operator {
        return Err(ContractError::Unauthorized {
            reason: "only the validator operator can delegate feed consent".to_string(),
        });
    }
    if staking.validator(&operator).is_none() {
        return Err(ContractError::NoValidatorFound {
            address: operator.to_string(),
        });
    }

    vote::set_feeder_delegation(deps.storage, &operator, &delegate)?;

    Ok(Response::new()
        .add_attribute("action", "delegate_feed_consent")
        .add_attribute("operator", operator.to_string())
        .add_event(
            Event::new("oracle_feeder_delegated")
                .add_attribute("operator", operator.to_string())
                .add_attribute("feeder", delegate.to_string()),
        ))
}
