use std::collections::BTreeMap;

use cosmwasm_std::{Addr, Decimal, Order, StdResult, Storage};

use crate::error::ContractError;
use crate::state::VOTES;

/// One validator's rate for one denom, weighted by its bonded power.
#[derive(Clone, Debug, PartialEq)]
pub struct VoteForTally {
    pub denom: String,
    pub exchange_rate: Decimal,
    pub voter: Addr,
    pub power: i64,
}

/// Per-period ballot bookkeeping for a bonded validator.
#[derive(Clone, Debug, PartialEq)]
pub struct Claim {
    pub power: i64,
    pub weight: i64,
    pub win_count: u64,
    pub recipient: Addr,
}

impl Claim {
    pub fn new(power: i64, recipient: Addr) -> Self {
        Self {
            power,
            weight: 0,
            win_count: 0,
            recipient,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExchangeRateBallot(pub Vec<VoteForTally>);

impl ExchangeRateBallot {
    pub fn votes(&self) -> &[VoteForTally] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn power(&self) -> i64 {
        self.0.iter().map(|v| v.power).sum()
    }

    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.exchange_rate.cmp(&b.exchange_rate));
    }

    pub fn is_sorted(&self) -> bool {
        self.0
            .windows(2)
            .all(|w| w[0].exchange_rate <= w[1].exchange_rate)
    }

    /// First rate at which cumulative power reaches half the total.
    /// An empty ballot yields zero.
    pub fn weighted_median(&self) -> Result<Decimal, ContractError> {
        if !self.is_sorted() {
            return Err(ContractError::BallotNotSorted);
        }
        let pivot_target = self.power() / 2;
        let mut pivot = 0i64;
        for vote in &self.0 {
            pivot += vote.power;
            if pivot >= pivot_target {
                return Ok(vote.exchange_rate);
            }
        }
        Ok(Decimal::zero())
    }

    /// Population standard deviation of the rates around the weighted median.
    ///
    /// Entries whose squared deviation would overflow are left out of both the
    /// sum and the divisor.
    pub fn standard_deviation(&self) -> Result<Decimal, ContractError> {
        if self.0.is_empty() {
            return Ok(Decimal::zero());
        }
        let median = self.weighted_median()?;

        let mut sum = Decimal::zero();
        let mut counted: u128 = 0;
        for vote in &self.0 {
            let deviation = vote.exchange_rate.abs_diff(median);
            match deviation
                .checked_mul(deviation)
                .and_then(|square| sum.checked_add(square))
            {
                Ok(next) => {
                    sum = next;
                    counted += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        voter = %vote.voter,
                        denom = %vote.denom,
                        %err,
                        "excluding vote from standard deviation"
                    );
                }
            }
        }
        if counted == 0 {
            return Ok(Decimal::zero());
        }
        let variance = Decimal::raw(sum.atomics().u128() / counted);
        Ok(variance.sqrt())
    }
}

/// A ballot together with the denom it was collected for.
#[derive(Clone, Debug, PartialEq)]
pub struct BallotDenom {
    pub denom: String,
    pub ballot: ExchangeRateBallot,
}

/// Collect the stored votes of claim holders into sorted ballots, one per
/// denom, ordered by denom.
pub fn organize_ballot_by_denom(
    storage: &dyn Storage,
    claims: &BTreeMap<Addr, Claim>,
) -> StdResult<Vec<BallotDenom>> {
    let mut ballots: BTreeMap<String, ExchangeRateBallot> = BTreeMap::new();
    for item in VOTES.range(storage, None, None, Order::Ascending) {
        let (voter, vote) = item?;
        let Some(claim) = claims.get(&voter) else {
            tracing::debug!(voter = %voter, "ignoring vote from validator outside the bonded set");
            continue;
        };
        for tuple in vote.exchange_rate_tuples {
            ballots
                .entry(tuple.denom.clone())
                .or_default()
                .0
                .push(VoteForTally {
                    denom: tuple.denom,
                    exchange_rate: tuple.exchange_rate,
                    voter: voter.clone(),
                    power: claim.power,
                });
        }
    }

    Ok(ballots
        .into_iter()
        .map(|(denom, mut ballot)| {
            ballot.sort();
            BallotDenom { denom, ballot }
        })
        .collect())
}
