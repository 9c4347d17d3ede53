use cosmwasm_std::{Decimal, Order, StdResult, Storage};
use price_oracle_common::{DenomSet, ExchangeRateTuple};

use crate::error::ContractError;
use crate::params::Params;
use crate::state::EXCHANGE_RATES;

pub fn set_exchange_rate(storage: &mut dyn Storage, denom: &str, rate: Decimal) -> StdResult<()> {
    EXCHANGE_RATES.save(storage, &denom.to_uppercase(), &rate)
}

pub fn get_exchange_rate(storage: &dyn Storage, denom: &str) -> Result<Decimal, ContractError> {
    EXCHANGE_RATES
        .may_load(storage, &denom.to_uppercase())?
        .ok_or_else(|| ContractError::UnknownDenom {
            denom: denom.to_string(),
        })
}

/// Rate of one base unit of `base_denom`, i.e. the symbol rate scaled down by
/// the denom's exponent.
pub fn get_exchange_rate_base(
    storage: &dyn Storage,
    params: &Params,
    base_denom: &str,
) -> Result<Decimal, ContractError> {
    let denom = params
        .accept_list
        .find(base_denom)
        .ok_or_else(|| ContractError::UnknownDenom {
            denom: base_denom.to_string(),
        })?;
    let rate = get_exchange_rate(storage, &denom.symbol_denom)?;
    let scale = 10u128.pow(denom.exponent);
    Ok(Decimal::raw(rate.atomics().u128() / scale))
}

pub fn get_all_exchange_rates(storage: &dyn Storage) -> StdResult<Vec<ExchangeRateTuple>> {
    EXCHANGE_RATES
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(denom, rate)| ExchangeRateTuple::new(denom, rate)))
        .collect()
}

pub fn clear_exchange_rates(storage: &mut dyn Storage) {
    EXCHANGE_RATES.clear(storage);
}
