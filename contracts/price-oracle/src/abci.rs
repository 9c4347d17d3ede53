use std::collections::BTreeMap;

use cosmwasm_std::{Addr, DepsMut, Env, Event, Response, Timestamp};
use price_oracle_common::DenomSet;

use crate::ballot::{self, BallotDenom, Claim};
use crate::error::ContractError;
use crate::exchange_rate;
use crate::history;
use crate::keepers::Keepers;
use crate::reward;
use crate::slash;
use crate::state::{MODULE_CONFIG, PARAMS};
use crate::tally::tally;
use crate::vote;

/// Whether `height` closes a period of `blocks_per_period` blocks.
pub fn is_period_last_block(height: u64, blocks_per_period: u64) -> bool {
    (height + 1) % blocks_per_period == 0
}

/// Runs at the end of every block.
///
/// On the last block of a vote period the ballots are tallied, rates and
/// history written, misses recorded, winners rewarded and the ballots
/// cleared. On the last block of a slash window miss counters are evaluated
/// and reset.
pub fn end_blocker(
    deps: DepsMut,
    env: &Env,
    keepers: &mut Keepers,
) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    let height = env.block.height;
    let mut response = Response::new()
        .add_attribute("action", "end_blocker")
        .add_attribute("height", height.to_string());

    if is_period_last_block(height, params.vote_period) {
        let config = MODULE_CONFIG.load(deps.storage)?;

        let prune_before = Timestamp::from_nanos(
            env.block
                .time
                .nanos()
                .saturating_sub(params.price_tracking_duration.saturating_mul(1_000_000_000)),
        );
        for denom in &params.price_tracking_list {
            let pruned =
                history::remove_history_before(deps.storage, &denom.symbol_denom, prune_before)?;
            if pruned > 0 {
                tracing::debug!(denom = %denom.symbol_denom, pruned, "pruned price history");
            }
        }

        let mut claims: BTreeMap<Addr, Claim> = keepers
            .staking
            .bonded_validators_by_power()
            .into_iter()
            .map(|v| (v.operator.clone(), Claim::new(v.power, v.operator)))
            .collect();
        let vote_targets = params.accept_list.symbols();

        exchange_rate::clear_exchange_rates(deps.storage);

        let vote_period_count = (height + 1) / params.vote_period;
        let ballots = ballot::organize_ballot_by_denom(deps.storage, &claims)?;
        for BallotDenom { denom, ballot } in ballots {
            let rate = tally(&ballot, params.reward_band, &mut claims)?;
            if rate.is_zero() {
                tracing::debug!(denom = %denom, "no consensus rate for denom");
                continue;
            }
            exchange_rate::set_exchange_rate(deps.storage, &denom, rate)?;
            history::append_history(
                deps.storage,
                &params,
                &denom,
                env.block.time,
                rate,
                vote_period_count,
            )?;
            response = response.add_event(
                Event::new("oracle_exchange_rate_set")
                    .add_attribute("denom", denom)
                    .add_attribute("exchange_rate", rate.to_string())
                    .add_attribute("vote_period_count", vote_period_count.to_string()),
            );
        }

        let claims: Vec<Claim> = claims.into_values().collect();
        slash::record_misses(deps.storage, &claims, vote_targets.len())?;

        let distributed = reward::reward_ballot_winners(
            &config,
            keepers,
            params.vote_period,
            params.reward_distribution_window,
            &params.accept_list.base_denoms(),
            &claims,
        )?;
        if !distributed.is_empty() {
            let amounts: Vec<String> = distributed.iter().map(|c| c.to_string()).collect();
            response = response.add_event(
                Event::new("oracle_rewards_distributed")
                    .add_attribute("amount", amounts.join(","))
                    .add_attribute("vote_period_count", vote_period_count.to_string()),
            );
        }

        vote::clear_ballots(deps.storage, height, params.vote_period)?;
    }

    if is_period_last_block(height, params.slash_window) {
        let slashed =
            slash::slash_and_reset_miss_counters(deps.storage, &params, keepers.staking, height)?;
        for validator in slashed {
            response = response.add_event(
                Event::new("oracle_validator_slashed")
                    .add_attribute("validator", validator.to_string())
                    .add_attribute("slash_fraction", params.slash_fraction.to_string()),
            );
        }
    }

    Ok(response)
}
