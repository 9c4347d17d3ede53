use cosmwasm_std::{Addr, Decimal, Order, StdResult, Storage};

use crate::ballot::Claim;
use crate::error::ContractError;
use crate::keepers::{StakingKeeper, VALIDATOR_UPDATE_DELAY};
use crate::params::Params;
use crate::state::MISS_COUNTERS;

pub fn get_miss_counter(storage: &dyn Storage, operator: &Addr) -> StdResult<u64> {
    Ok(MISS_COUNTERS.may_load(storage, operator)?.unwrap_or_default())
}

pub fn set_miss_counter(storage: &mut dyn Storage, operator: &Addr, count: u64) -> StdResult<()> {
    MISS_COUNTERS.save(storage, operator, &count)
}

pub fn all_miss_counters(storage: &dyn Storage) -> StdResult<Vec<(Addr, u64)>> {
    MISS_COUNTERS
        .range(storage, None, None, Order::Ascending)
        .collect()
}

/// Count a miss for every claim that did not win a ballot for each vote target.
pub fn record_misses(
    storage: &mut dyn Storage,
    claims: &[Claim],
    vote_targets_len: usize,
) -> StdResult<()> {
    for claim in claims {
        if claim.win_count != vote_targets_len as u64 {
            let misses = get_miss_counter(storage, &claim.recipient)?;
            set_miss_counter(storage, &claim.recipient, misses + 1)?;
        }
    }
    Ok(())
}

/// Slash and jail bonded validators whose valid vote rate over the window fell
/// below `min_valid_per_window`, then reset every miss counter.
///
/// Returns the operators that were slashed.
pub fn slash_and_reset_miss_counters(
    storage: &mut dyn Storage,
    params: &Params,
    staking: &mut dyn StakingKeeper,
    height: u64,
) -> Result<Vec<Addr>, ContractError> {
    let distribution_height = height as i64 - VALIDATOR_UPDATE_DELAY - 1;
    let periods_per_window = params.slash_window / params.vote_period;

    let counters = all_miss_counters(storage)?;
    let mut slashed = Vec::new();
    for (operator, misses) in &counters {
        // more misses than periods is a negative rate, below any minimum
        if *misses <= periods_per_window {
            let valid_rate = Decimal::from_ratio(periods_per_window - *misses, periods_per_window);
            if valid_rate >= params.min_valid_per_window {
                continue;
            }
        }
        match staking.validator(operator) {
            Some(validator) if validator.bonded && !validator.jailed => {
                staking.slash(
                    &validator.cons_addr,
                    distribution_height,
                    validator.power,
                    params.slash_fraction,
                );
                staking.jail(&validator.cons_addr);
                slashed.push(operator.clone());
            }
            _ => {
                tracing::debug!(
                    validator = %operator,
                    "not slashing validator that is unbonded, jailed or unknown"
                );
            }
        }
    }

    for (operator, _) in counters {
        MISS_COUNTERS.remove(storage, &operator);
    }
    Ok(slashed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    use crate::testing::MockStakingKeeper;

    fn params() -> Params {
        Params {
            vote_period: 10,
            slash_window: 100,
            min_valid_per_window: Decimal::percent(50),
            ..Params::default()
        }
    }

    #[test]
    fn test_record_misses() {
        let mut storage = MockStorage::new();
        let hit = Addr::unchecked("hit");
        let partial = Addr::unchecked("partial");
        let claims = vec![
            Claim {
                win_count: 2,
                ..Claim::new(1, hit.clone())
            },
            Claim {
                win_count: 1,
                ..Claim::new(1, partial.clone())
            },
        ];

        record_misses(&mut storage, &claims, 2).unwrap();
        record_misses(&mut storage, &claims, 2).unwrap();
        assert_eq!(get_miss_counter(&storage, &hit).unwrap(), 0);
        assert_eq!(get_miss_counter(&storage, &partial).unwrap(), 2);
    }

    #[test]
    fn test_full_miss_slashes_and_jails() {
        let mut storage = MockStorage::new();
        let mut staking = MockStakingKeeper::default();
        let absent = Addr::unchecked("absent");
        let diligent = Addr::unchecked("diligent");
        staking.add_validator(&absent, 40);
        staking.add_validator(&diligent, 60);
        set_miss_counter(&mut storage, &absent, 10).unwrap();
        set_miss_counter(&mut storage, &diligent, 0).unwrap();

        let slashed =
            slash_and_reset_miss_counters(&mut storage, &params(), &mut staking, 99).unwrap();

        assert_eq!(slashed, vec![absent.clone()]);
        assert_eq!(staking.slashes.len(), 1);
        let record = &staking.slashes[0];
        assert_eq!(record.infraction_height, 97);
        assert_eq!(record.power, 40);
        assert_eq!(record.fraction, params().slash_fraction);
        assert!(staking.is_jailed(&absent));
        assert!(!staking.is_jailed(&diligent));
        assert!(all_miss_counters(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut storage = MockStorage::new();
        let mut staking = MockStakingKeeper::default();
        let borderline = Addr::unchecked("borderline");
        staking.add_validator(&borderline, 10);
        // 5 of 10 periods valid equals the minimum
        set_miss_counter(&mut storage, &borderline, 5).unwrap();

        let slashed =
            slash_and_reset_miss_counters(&mut storage, &params(), &mut staking, 99).unwrap();
        assert!(slashed.is_empty());
        assert_eq!(get_miss_counter(&storage, &borderline).unwrap(), 0);
    }

    #[test]
    fn test_misses_beyond_window_periods_slash_at_zero_minimum() {
        let mut storage = MockStorage::new();
        let mut staking = MockStakingKeeper::default();
        let absent = Addr::unchecked("absent");
        let diligent = Addr::unchecked("diligent");
        staking.add_validator(&absent, 10);
        staking.add_validator(&diligent, 10);
        // three whole periods per window, but a window can hold four period ends
        let params = Params {
            vote_period: 3,
            slash_window: 10,
            min_valid_per_window: Decimal::zero(),
            ..Params::default()
        };
        set_miss_counter(&mut storage, &absent, 4).unwrap();
        set_miss_counter(&mut storage, &diligent, 3).unwrap();

        let slashed =
            slash_and_reset_miss_counters(&mut storage, &params, &mut staking, 29).unwrap();
        assert_eq!(slashed, vec![absent.clone()]);
        assert!(staking.is_jailed(&absent));
        assert!(!staking.is_jailed(&diligent));
        assert!(all_miss_counters(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_jailed_or_unbonded_not_slashed() {
        let mut storage = MockStorage::new();
        let mut staking = MockStakingKeeper::default();
        let unbonded = Addr::unchecked("unbonded");
        let unknown = Addr::unchecked("unknown");
        staking.add_validator(&unbonded, 10);
        staking.set_bonded(&unbonded, false);
        set_miss_counter(&mut storage, &unbonded, 10).unwrap();
        set_miss_counter(&mut storage, &unknown, 10).unwrap();

        let slashed =
            slash_and_reset_miss_counters(&mut storage, &params(), &mut staking, 99).unwrap();
        assert!(slashed.is_empty());
        assert!(staking.slashes.is_empty());
        assert!(all_miss_counters(&storage).unwrap().is_empty());
    }
}
