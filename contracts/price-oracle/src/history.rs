use cosmwasm_std::{Decimal, Order, StdResult, Storage, Timestamp, Uint128, Uint256};
use cw_storage_plus::Bound;
use price_oracle_common::DenomSet;

use crate::error::ContractError;
use crate::params::Params;
use crate::state::{PriceHistoryEntry, PRICE_HISTORY};

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

fn no_history(denom: &str) -> ContractError {
    ContractError::NoHistoryInRange {
        denom: denom.to_string(),
    }
}

pub fn store_history_entry(
    storage: &mut dyn Storage,
    denom: &str,
    entry: &PriceHistoryEntry,
) -> StdResult<()> {
    PRICE_HISTORY.save(
        storage,
        (denom.to_uppercase().as_str(), entry.price_update_time.nanos()),
        entry,
    )
}

/// Append a tally result to the history of `denom` if it is tracked.
/// Returns whether an entry was written.
pub fn append_history(
    storage: &mut dyn Storage,
    params: &Params,
    denom: &str,
    time: Timestamp,
    price: Decimal,
    vote_period_count: u64,
) -> StdResult<bool> {
    if !params.price_tracking_list.is_member(denom) {
        return Ok(false);
    }
    let entry = PriceHistoryEntry {
        price,
        vote_period_count,
        price_update_time: time,
    };
    store_history_entry(storage, denom, &entry)?;
    Ok(true)
}

/// Latest entry recorded at or before `time`.
pub fn entry_at_or_before(
    storage: &dyn Storage,
    denom: &str,
    time: Timestamp,
) -> Result<PriceHistoryEntry, ContractError> {
    let denom = denom.to_uppercase();
    PRICE_HISTORY
        .prefix(&denom)
        .range(
            storage,
            None,
            Some(Bound::inclusive(time.nanos())),
            Order::Descending,
        )
        .next()
        .transpose()?
        .map(|(_, entry)| entry)
        .ok_or_else(|| no_history(&denom))
}

/// Earliest entry inside `[start, end]`.
pub fn first_entry_between(
    storage: &dyn Storage,
    denom: &str,
    start: Timestamp,
    end: Timestamp,
) -> Result<PriceHistoryEntry, ContractError> {
    let denom = denom.to_uppercase();
    PRICE_HISTORY
        .prefix(&denom)
        .range(
            storage,
            Some(Bound::inclusive(start.nanos())),
            Some(Bound::inclusive(end.nanos())),
            Order::Ascending,
        )
        .next()
        .transpose()?
        .map(|(_, entry)| entry)
        .ok_or_else(|| no_history(&denom))
}

/// Entries inside `[start, end]`, oldest first.
pub fn entries_between(
    storage: &dyn Storage,
    denom: &str,
    start: Timestamp,
    end: Timestamp,
) -> StdResult<Vec<PriceHistoryEntry>> {
    PRICE_HISTORY
        .prefix(&denom.to_uppercase())
        .range(
            storage,
            Some(Bound::inclusive(start.nanos())),
            Some(Bound::inclusive(end.nanos())),
            Order::Ascending,
        )
        .map(|item| item.map(|(_, entry)| entry))
        .collect()
}

/// Delete every entry of `denom` recorded strictly before `time`.
pub fn remove_history_before(
    storage: &mut dyn Storage,
    denom: &str,
    time: Timestamp,
) -> StdResult<usize> {
    let denom = denom.to_uppercase();
    let stale = PRICE_HISTORY
        .prefix(&denom)
        .keys(
            storage,
            None,
            Some(Bound::exclusive(time.nanos())),
            Order::Ascending,
        )
        .collect::<StdResult<Vec<u64>>>()?;
    for nanos in &stale {
        PRICE_HISTORY.remove(storage, (denom.as_str(), *nanos));
    }
    Ok(stale.len())
}

/// Page through the history of `denom`, oldest first. `start_after` is an
/// update time in nanoseconds.
pub fn all_price_history(
    storage: &dyn Storage,
    denom: &str,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<PriceHistoryEntry>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);
    PRICE_HISTORY
        .prefix(&denom.to_uppercase())
        .range(storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, entry)| entry))
        .collect()
}

/// Vote period count stamped on the most recent entry of `denom`.
pub fn current_vote_period_count(
    storage: &dyn Storage,
    denom: &str,
) -> Result<u64, ContractError> {
    let denom = denom.to_uppercase();
    PRICE_HISTORY
        .prefix(&denom)
        .range(storage, None, None, Order::Descending)
        .next()
        .transpose()?
        .map(|(_, entry)| entry.vote_period_count)
        .ok_or_else(|| no_history(&denom))
}

/// Time-weighted average price of `denom` over `[start, end]`.
///
/// The price in effect at `start` is the latest entry at or before it, or the
/// first entry inside the window when nothing precedes it. Each later entry
/// closes the running segment; the last price runs until `end`.
pub fn arithmetic_twap(
    storage: &dyn Storage,
    params: &Params,
    denom: &str,
    start: Timestamp,
    end: Timestamp,
) -> Result<Decimal, ContractError> {
    if start > end {
        return Err(ContractError::InvalidTimeRange {
            start: start.nanos(),
            end: end.nanos(),
        });
    }
    if !params.twap_tracking_list.is_member(denom) {
        return Err(ContractError::UnknownDenom {
            denom: denom.to_string(),
        });
    }

    let opening = match entry_at_or_before(storage, denom, start) {
        Ok(entry) => entry,
        Err(ContractError::NoHistoryInRange { .. }) => {
            first_entry_between(storage, denom, start, end)?
        }
        Err(err) => return Err(err),
    };
    if start == end {
        return Ok(opening.price);
    }

    let mut price = opening.price;
    let mut cursor = start.nanos();
    let mut weighted_sum = Uint256::zero();
    let entries = PRICE_HISTORY
        .prefix(&denom.to_uppercase())
        .range(
            storage,
            Some(Bound::exclusive(start.nanos())),
            Some(Bound::inclusive(end.nanos())),
            Order::Ascending,
        )
        .map(|item| item.map(|(_, entry)| entry))
        .collect::<StdResult<Vec<PriceHistoryEntry>>>()?;
    for entry in entries {
        let at = entry.price_update_time.nanos();
        weighted_sum = weighted_sum.checked_add(segment(price, at - cursor)?)?;
        price = entry.price;
        cursor = at;
    }
    weighted_sum = weighted_sum.checked_add(segment(price, end.nanos() - cursor)?)?;

    let average = weighted_sum.checked_div(Uint256::from(end.nanos() - start.nanos()))?;
    Ok(Decimal::raw(Uint128::try_from(average)?.u128()))
}

fn segment(price: Decimal, duration_nanos: u64) -> Result<Uint256, ContractError> {
    Ok(Uint256::from(price.atomics()).checked_mul(Uint256::from(duration_nanos))?)
}
