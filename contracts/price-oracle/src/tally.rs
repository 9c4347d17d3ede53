use std::collections::BTreeMap;

use cosmwasm_std::{Addr, Decimal};

use crate::ballot::{Claim, ExchangeRateBallot};
use crate::error::ContractError;

/// Compute the ballot's weighted median and credit every vote inside the
/// reward spread to its voter's claim.
///
/// `spread = max(median * reward_band / 2, standard deviation)`. A zero rate
/// is an abstention and is always credited.
pub fn tally(
    ballot: &ExchangeRateBallot,
    reward_band: Decimal,
    claims: &mut BTreeMap<Addr, Claim>,
) -> Result<Decimal, ContractError> {
    let weighted_median = ballot.weighted_median()?;
    let standard_deviation = ballot.standard_deviation()?;

    let half_band = Decimal::raw(reward_band.atomics().u128() / 2);
    let reward_spread = weighted_median
        .checked_mul(half_band)?
        .max(standard_deviation);
    let lower = weighted_median.saturating_sub(reward_spread);
    let upper = weighted_median.saturating_add(reward_spread);

    for vote in ballot.votes() {
        let in_band = vote.exchange_rate >= lower && vote.exchange_rate <= upper;
        if in_band || vote.exchange_rate.is_zero() {
            if let Some(claim) = claims.get_mut(&vote.voter) {
                claim.weight += vote.power;
                claim.win_count += 1;
            }
        }
    }

    Ok(weighted_median)
}
