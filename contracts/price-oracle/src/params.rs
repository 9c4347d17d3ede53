use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;
use price_oracle_common::{Denom, DenomList, DenomSet};

use crate::error::ContractError;

pub const BLOCKS_PER_MINUTE: u64 = 10;
pub const BLOCKS_PER_HOUR: u64 = BLOCKS_PER_MINUTE * 60;
pub const BLOCKS_PER_DAY: u64 = BLOCKS_PER_HOUR * 24;
pub const BLOCKS_PER_WEEK: u64 = BLOCKS_PER_DAY * 7;

/// Seconds of price history kept for tracked denoms.
pub const DEFAULT_PRICE_TRACKING_DURATION: u64 = 7 * 24 * 60 * 60;

/// Highest exponent accepted for a denom; keeps `10^exponent` inside `Decimal`.
pub const MAX_DENOM_EXPONENT: u32 = 18;

#[cw_serde]
pub struct Params {
    /// Blocks per vote period.
    pub vote_period: u64,
    /// Share of voting power a ballot should reach. Validated only.
    pub vote_threshold: Decimal,
    /// Width of the band around the weighted median that earns rewards.
    pub reward_band: Decimal,
    /// Blocks over which the reward pool is spread.
    pub reward_distribution_window: u64,
    pub accept_list: DenomList,
    pub slash_fraction: Decimal,
    /// Blocks per slash window.
    pub slash_window: u64,
    pub min_valid_per_window: Decimal,
    pub price_tracking_list: DenomList,
    pub twap_tracking_list: DenomList,
    /// Seconds of history kept for each tracked denom.
    pub price_tracking_duration: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            vote_period: 5,
            vote_threshold: Decimal::percent(50),
            reward_band: Decimal::percent(2),
            reward_distribution_window: BLOCKS_PER_WEEK,
            accept_list: vec![Denom::new("ujuno", "JUNO", 6), Denom::new("uatom", "ATOM", 6)],
            slash_fraction: Decimal::from_ratio(1u128, 10_000u128),
            slash_window: BLOCKS_PER_WEEK,
            min_valid_per_window: Decimal::percent(5),
            price_tracking_list: vec![],
            twap_tracking_list: vec![],
            price_tracking_duration: DEFAULT_PRICE_TRACKING_DURATION,
        }
    }
}

fn invalid(param: &str, reason: impl Into<String>) -> ContractError {
    ContractError::InvalidParams {
        param: param.to_string(),
        reason: reason.into(),
    }
}

fn validate_fraction(param: &str, value: Decimal) -> Result<(), ContractError> {
    if value > Decimal::one() {
        return Err(invalid(param, format!("must be at most 1, got {value}")));
    }
    Ok(())
}

fn validate_denoms(param: &str, list: &[Denom]) -> Result<(), ContractError> {
    for denom in list {
        if denom.base_denom.is_empty() {
            return Err(invalid(param, "denom must have a base denom"));
        }
        if denom.symbol_denom.is_empty() {
            return Err(invalid(param, format!("{} must have a symbol denom", denom.base_denom)));
        }
        if denom.exponent > MAX_DENOM_EXPONENT {
            return Err(invalid(
                param,
                format!("exponent of {} exceeds {MAX_DENOM_EXPONENT}", denom.symbol_denom),
            ));
        }
    }
    Ok(())
}

impl Params {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.vote_period == 0 {
            return Err(invalid("vote_period", "must be positive"));
        }
        if self.vote_threshold <= Decimal::percent(33) || self.vote_threshold > Decimal::one() {
            return Err(invalid(
                "vote_threshold",
                format!("must be bigger than 33% and at most 100%, got {}", self.vote_threshold),
            ));
        }
        validate_fraction("reward_band", self.reward_band)?;
        if self.reward_distribution_window < self.vote_period {
            return Err(invalid(
                "reward_distribution_window",
                "must be greater than or equal to vote_period",
            ));
        }
        validate_fraction("slash_fraction", self.slash_fraction)?;
        if self.slash_window < self.vote_period {
            return Err(invalid("slash_window", "must be greater than or equal to vote_period"));
        }
        validate_fraction("min_valid_per_window", self.min_valid_per_window)?;

        validate_denoms("accept_list", &self.accept_list)?;
        validate_denoms("price_tracking_list", &self.price_tracking_list)?;
        validate_denoms("twap_tracking_list", &self.twap_tracking_list)?;
        for denom in &self.twap_tracking_list {
            if !self.price_tracking_list.is_member(&denom.symbol_denom) {
                return Err(invalid(
                    "twap_tracking_list",
                    format!("{} is not in the price tracking list", denom.symbol_denom),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = Params::default();
        params.validate().unwrap();
        assert_eq!(params.slash_fraction, Decimal::from_ratio(1u128, 10_000u128));
        assert_eq!(params.slash_window, 100_800);
    }

    #[test]
    fn test_vote_period_must_be_positive() {
        let params = Params {
            vote_period: 0,
            ..Params::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, ContractError::InvalidParams { param, .. } if param == "vote_period"));
    }

    #[test]
    fn test_vote_threshold_bounds() {
        for threshold in [Decimal::percent(33), Decimal::percent(101)] {
            let params = Params {
                vote_threshold: threshold,
                ..Params::default()
            };
            assert!(params.validate().is_err());
        }
        let params = Params {
            vote_threshold: Decimal::one(),
            ..Params::default()
        };
        params.validate().unwrap();
    }

    #[test]
    fn test_fractions_capped_at_one() {
        let params = Params {
            reward_band: Decimal::percent(150),
            ..Params::default()
        };
        assert!(params.validate().is_err());

        let params = Params {
            min_valid_per_window: Decimal::percent(101),
            ..Params::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_windows_cover_vote_period() {
        let params = Params {
            vote_period: 10,
            slash_window: 5,
            ..Params::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, ContractError::InvalidParams { param, .. } if param == "slash_window"));

        let params = Params {
            vote_period: 10,
            reward_distribution_window: 9,
            ..Params::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_denoms_need_base_and_symbol() {
        let params = Params {
            accept_list: vec![Denom::new("", "ATOM", 6)],
            ..Params::default()
        };
        assert!(params.validate().is_err());

        let params = Params {
            price_tracking_list: vec![Denom::new("uatom", "", 6)],
            ..Params::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_twap_list_must_be_tracked() {
        let atom = Denom::new("uatom", "ATOM", 6);
        let params = Params {
            twap_tracking_list: vec![atom.clone()],
            ..Params::default()
        };
        assert!(params.validate().is_err());

        let params = Params {
            price_tracking_list: vec![atom.clone()],
            twap_tracking_list: vec![atom],
            ..Params::default()
        };
        params.validate().unwrap();
    }
}
