use cosmwasm_std::{Addr, Order, StdResult, Storage};
use price_oracle_common::{parse_exchange_rate_tuples, AggregateVoteHash, DenomSet};

use crate::error::ContractError;
use crate::keepers::StakingKeeper;
use crate::params::Params;
use crate::state::{
    AggregateExchangeRatePrevote, AggregateExchangeRateVote, FEEDER_DELEGATIONS, PREVOTES, VOTES,
};

pub fn get_prevote(
    storage: &dyn Storage,
    voter: &Addr,
) -> Result<AggregateExchangeRatePrevote, ContractError> {
    PREVOTES
        .may_load(storage, voter)?
        .ok_or_else(|| ContractError::NoAggregatePrevote {
            voter: voter.to_string(),
        })
}

pub fn get_vote(
    storage: &dyn Storage,
    voter: &Addr,
) -> Result<AggregateExchangeRateVote, ContractError> {
    VOTES
        .may_load(storage, voter)?
        .ok_or_else(|| ContractError::NoAggregateVote {
            voter: voter.to_string(),
        })
}

pub fn all_prevotes(storage: &dyn Storage) -> StdResult<Vec<AggregateExchangeRatePrevote>> {
    PREVOTES
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, prevote)| prevote))
        .collect()
}

pub fn all_votes(storage: &dyn Storage) -> StdResult<Vec<AggregateExchangeRateVote>> {
    VOTES
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, vote)| vote))
        .collect()
}

/// Record a commitment for the current vote period.
pub fn submit_prevote(
    storage: &mut dyn Storage,
    voter: &Addr,
    hash: AggregateVoteHash,
    height: u64,
) -> Result<AggregateExchangeRatePrevote, ContractError> {
    if PREVOTES.has(storage, voter) {
        return Err(ContractError::ExistingPrevote {
            voter: voter.to_string(),
        });
    }
    let prevote = AggregateExchangeRatePrevote {
        hash: hash.to_hex(),
        voter: voter.clone(),
        submit_block: height,
    };
    PREVOTES.save(storage, voter, &prevote)?;
    Ok(prevote)
}

/// Open a prevote made in the previous vote period.
///
/// On success the vote replaces the prevote. Rates for denoms outside the
/// accept list are dropped from the stored vote.
pub fn reveal_vote(
    storage: &mut dyn Storage,
    params: &Params,
    voter: &Addr,
    salt: &str,
    exchange_rates: &str,
    height: u64,
) -> Result<AggregateExchangeRateVote, ContractError> {
    let prevote = get_prevote(storage, voter)?;

    let submit_period = prevote.submit_block / params.vote_period;
    let current_period = height / params.vote_period;
    if current_period.checked_sub(submit_period) != Some(1) {
        return Err(ContractError::RevealPeriodMissMatch {
            submit_block: prevote.submit_block,
            height,
        });
    }

    let tuples = parse_exchange_rate_tuples(exchange_rates)?;

    let expected = AggregateVoteHash::from_hex(&prevote.hash)?;
    let got = AggregateVoteHash::compute(salt, exchange_rates, voter.as_str());
    if expected != got {
        return Err(ContractError::VerificationFailed {
            expected: expected.to_hex(),
            got: got.to_hex(),
        });
    }

    let (accepted, rejected): (Vec<_>, Vec<_>) = tuples
        .into_iter()
        .partition(|t| params.accept_list.is_member(&t.denom));
    if !rejected.is_empty() {
        tracing::debug!(
            voter = %voter,
            dropped = rejected.len(),
            "dropping rates for denoms outside the accept list"
        );
    }

    let vote = AggregateExchangeRateVote {
        exchange_rate_tuples: accepted,
        voter: voter.clone(),
    };
    VOTES.save(storage, voter, &vote)?;
    PREVOTES.remove(storage, voter);
    Ok(vote)
}

/// Drop prevotes older than one full vote period and every vote.
pub fn clear_ballots(storage: &mut dyn Storage, height: u64, vote_period: u64) -> StdResult<()> {
    let expired = PREVOTES
        .range(storage, None, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((voter, prevote)) if height > prevote.submit_block + vote_period => {
                Some(Ok(voter))
            }
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        })
        .collect::<StdResult<Vec<Addr>>>()?;
    for voter in expired {
        PREVOTES.remove(storage, &voter);
    }
    VOTES.clear(storage);
    Ok(())
}

/// Account allowed to feed for `validator`; the validator itself when no
/// delegation exists.
pub fn feeder_for(storage: &dyn Storage, validator: &Addr) -> StdResult<Addr> {
    Ok(FEEDER_DELEGATIONS
        .may_load(storage, validator)?
        .unwrap_or_else(|| validator.clone()))
}

pub fn set_feeder_delegation(
    storage: &mut dyn Storage,
    validator: &Addr,
    feeder: &Addr,
) -> StdResult<()> {
    FEEDER_DELEGATIONS.save(storage, validator, feeder)
}

pub fn validate_feeder(
    storage: &dyn Storage,
    staking: &dyn StakingKeeper,
    feeder: &Addr,
    validator: &Addr,
) -> Result<(), ContractError> {
    match staking.validator(validator) {
        Some(info) if info.bonded => {}
        _ => {
            return Err(ContractError::NoValidatorFound {
                address: validator.to_string(),
            })
        }
    }
    if feeder_for(storage, validator)? != *feeder {
        return Err(ContractError::NoVotingPermission {
            feeder: feeder.to_string(),
            validator: validator.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::Decimal;
    use price_oracle_common::Denom;

    use crate::testing::MockStakingKeeper;

    const SALT: &str = "1f5e1b7d2e4a3c9b8a7f6e5d4c3b2a1908f7e6d5c4b3a29180f7e6d5c4b3a291";

    fn params() -> Params {
        Params {
            vote_period: 5,
            accept_list: vec![Denom::new("uatom", "ATOM", 6), Denom::new("ujuno", "JUNO", 6)],
            ..Params::default()
        }
    }

    fn prevote(storage: &mut MockStorage, voter: &Addr, rates: &str, height: u64) {
        let hash = AggregateVoteHash::compute(SALT, rates, voter.as_str());
        submit_prevote(storage, voter, hash, height).unwrap();
    }

    #[test]
    fn test_second_prevote_rejected() {
        let mut storage = MockStorage::new();
        let voter = Addr::unchecked("val1");
        prevote(&mut storage, &voter, "ATOM:1", 3);

        let hash = AggregateVoteHash::compute(SALT, "ATOM:2", voter.as_str());
        let err = submit_prevote(&mut storage, &voter, hash, 4).unwrap_err();
        assert!(matches!(err, ContractError::ExistingPrevote { .. }));
    }

    #[test]
    fn test_reveal_in_next_period() {
        let mut storage = MockStorage::new();
        let voter = Addr::unchecked("val1");
        let rates = "ATOM:10.5,JUNO:2";
        prevote(&mut storage, &voter, rates, 3);

        let vote = reveal_vote(&mut storage, &params(), &voter, SALT, rates, 7).unwrap();
        assert_eq!(vote.exchange_rate_tuples.len(), 2);
        assert_eq!(vote.exchange_rate_tuples[0].exchange_rate, Decimal::percent(1050));
        assert!(PREVOTES.may_load(&storage, &voter).unwrap().is_none());
        assert_eq!(get_vote(&storage, &voter).unwrap(), vote);
    }

    #[test]
    fn test_reveal_early_or_late_is_period_mismatch() {
        let voter = Addr::unchecked("val1");
        let rates = "ATOM:1";

        // same period as the prevote
        let mut storage = MockStorage::new();
        prevote(&mut storage, &voter, rates, 5);
        let err = reveal_vote(&mut storage, &params(), &voter, SALT, rates, 9).unwrap_err();
        assert!(matches!(err, ContractError::RevealPeriodMissMatch { .. }));

        // two periods later
        let err = reveal_vote(&mut storage, &params(), &voter, SALT, rates, 15).unwrap_err();
        assert!(matches!(err, ContractError::RevealPeriodMissMatch { .. }));

        // exactly one period later
        reveal_vote(&mut storage, &params(), &voter, SALT, rates, 10).unwrap();
    }

    #[test]
    fn test_reveal_without_prevote() {
        let mut storage = MockStorage::new();
        let voter = Addr::unchecked("val1");
        let err = reveal_vote(&mut storage, &params(), &voter, SALT, "ATOM:1", 10).unwrap_err();
        assert!(matches!(err, ContractError::NoAggregatePrevote { .. }));
    }

    #[test]
    fn test_reveal_hash_mismatch() {
        let mut storage = MockStorage::new();
        let voter = Addr::unchecked("val1");
        prevote(&mut storage, &voter, "ATOM:1", 3);

        let err = reveal_vote(&mut storage, &params(), &voter, SALT, "ATOM:2", 6).unwrap_err();
        assert!(matches!(err, ContractError::VerificationFailed { .. }));

        // the commitment binds the voter address
        let other = Addr::unchecked("val2");
        let hash = AggregateVoteHash::compute(SALT, "ATOM:1", voter.as_str());
        submit_prevote(&mut storage, &other, hash, 3).unwrap();
        let err = reveal_vote(&mut storage, &params(), &other, SALT, "ATOM:1", 6).unwrap_err();
        assert!(matches!(err, ContractError::VerificationFailed { .. }));
    }

    #[test]
    fn test_reveal_filters_unlisted_denoms() {
        let mut storage = MockStorage::new();
        let voter = Addr::unchecked("val1");
        let rates = "ATOM:1,OSMO:3";
        prevote(&mut storage, &voter, rates, 3);

        let vote = reveal_vote(&mut storage, &params(), &voter, SALT, rates, 6).unwrap();
        assert_eq!(vote.exchange_rate_tuples.len(), 1);
        assert_eq!(vote.exchange_rate_tuples[0].denom, "ATOM");
    }

    #[test]
    fn test_clear_ballots() {
        let mut storage = MockStorage::new();
        let stale = Addr::unchecked("stale");
        let fresh = Addr::unchecked("fresh");
        let revealed = Addr::unchecked("revealed");
        prevote(&mut storage, &stale, "ATOM:1", 2);
        prevote(&mut storage, &fresh, "ATOM:1", 9);
        prevote(&mut storage, &revealed, "ATOM:1", 3);
        reveal_vote(&mut storage, &params(), &revealed, SALT, "ATOM:1", 6).unwrap();

        clear_ballots(&mut storage, 9, 5).unwrap();
        assert!(!PREVOTES.has(&storage, &stale));
        assert!(PREVOTES.has(&storage, &fresh));
        assert!(all_votes(&storage).unwrap().is_empty());

        // a second clear at the same height changes nothing
        clear_ballots(&mut storage, 9, 5).unwrap();
        assert_eq!(all_prevotes(&storage).unwrap().len(), 1);
        assert!(all_votes(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_feeder_delegation_gates_submission() {
        let mut storage = MockStorage::new();
        let mut staking = MockStakingKeeper::default();
        let validator = Addr::unchecked("val1");
        let feeder = Addr::unchecked("feeder");
        staking.add_validator(&validator, 10);

        validate_feeder(&storage, &staking, &validator, &validator).unwrap();
        let err = validate_feeder(&storage, &staking, &feeder, &validator).unwrap_err();
        assert!(matches!(err, ContractError::NoVotingPermission { .. }));

        set_feeder_delegation(&mut storage, &validator, &feeder).unwrap();
        validate_feeder(&storage, &staking, &feeder, &validator).unwrap();
        let err = validate_feeder(&storage, &staking, &validator, &validator).unwrap_err();
        assert!(matches!(err, ContractError::NoVotingPermission { .. }));

        staking.set_bonded(&validator, false);
        let err = validate_feeder(&storage, &staking, &feeder, &validator).unwrap_err();
        assert!(matches!(err, ContractError::NoValidatorFound { .. }));
    }
}
