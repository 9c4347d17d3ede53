use std::collections::BTreeMap;

use cosmwasm_std::{Coin, Uint128, Uint256};

use crate::ballot::Claim;
use crate::error::ContractError;
use crate::keepers::Keepers;
use crate::state::ModuleConfig;

/// Pay this period's share of the reward pool to the ballot winners.
///
/// For every reward denom the period share is `balance * vote_period /
/// reward_distribution_window`, split by claim weight and rounded down. The
/// total paid is moved to the distribution module in one transfer. Returns the
/// coins paid out.
pub fn reward_ballot_winners(
    config: &ModuleConfig,
    keepers: &mut Keepers,
    vote_period: u64,
    reward_distribution_window: u64,
    vote_targets: &[String],
    ballot_winners: &[Claim],
) -> Result<Vec<Coin>, ContractError> {
    let total_weight: i64 = ballot_winners.iter().map(|c| c.weight).sum();
    if total_weight <= 0 {
        return Ok(vec![]);
    }

    let mut reward_denoms = Vec::with_capacity(vote_targets.len() + 1);
    reward_denoms.push(config.native_denom.clone());
    for denom in vote_targets {
        if *denom != config.native_denom {
            reward_denoms.push(denom.clone());
        }
    }

    let pools: Vec<(String, Uint128)> = reward_denoms
        .into_iter()
        .map(|denom| {
            let balance = keepers.bank.balance(&config.module_account, &denom);
            (denom, balance)
        })
        .filter(|(_, balance)| !balance.is_zero())
        .collect();
    if pools.is_empty() {
        return Ok(vec![]);
    }

    let divisor = Uint256::from(reward_distribution_window)
        .checked_mul(Uint256::from(total_weight.unsigned_abs()))?;
    let mut distributed: BTreeMap<String, Uint128> = BTreeMap::new();

    for winner in ballot_winners {
        if winner.weight <= 0 {
            continue;
        }
        if keepers.staking.validator(&winner.recipient).is_none() {
            tracing::debug!(
                validator = %winner.recipient,
                "skipping reward for validator no longer known to staking"
            );
            continue;
        }

        let mut rewards = Vec::new();
        for (denom, balance) in &pools {
            let share = Uint256::from(*balance)
                .checked_mul(Uint256::from(vote_period))?
                .checked_mul(Uint256::from(winner.weight.unsigned_abs()))?
                .checked_div(divisor)?;
            let amount = Uint128::try_from(share)?;
            if !amount.is_zero() {
                rewards.push(Coin::new(amount, denom.clone()));
            }
        }
        if rewards.is_empty() {
            continue;
        }

        keepers
            .distribution
            .allocate_tokens_to_validator(&winner.recipient, &rewards);
        for coin in &rewards {
            let total = distributed.entry(coin.denom.clone()).or_default();
            *total = total.checked_add(coin.amount)?;
        }
    }

    let distributed: Vec<Coin> = distributed
        .into_iter()
        .map(|(denom, amount)| Coin::new(amount, denom))
        .collect();
    if !distributed.is_empty() {
        keepers.bank.send_coins_from_module_to_module(
            &config.module_account,
            &config.distribution_module,
            &distributed,
        )?;
    }
    Ok(distributed)
}
