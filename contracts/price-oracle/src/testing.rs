//! In-memory collaborators for driving the oracle outside a chain.

use std::collections::BTreeMap;

use cosmwasm_std::{Addr, Coin, Decimal, StdError, StdResult, Uint128};

use crate::keepers::{BankKeeper, DistributionKeeper, Keepers, StakingKeeper, ValidatorInfo};

#[derive(Clone, Debug, PartialEq)]
pub struct SlashRecord {
    pub cons_addr: Addr,
    pub infraction_height: i64,
    pub power: i64,
    pub fraction: Decimal,
}

#[derive(Default)]
pub struct MockStakingKeeper {
    pub validators: BTreeMap<Addr, ValidatorInfo>,
    pub slashes: Vec<SlashRecord>,
}

impl MockStakingKeeper {
    /// Register a bonded validator whose consensus address mirrors its operator.
    pub fn add_validator(&mut self, operator: &Addr, power: i64) {
        self.validators.insert(
            operator.clone(),
            ValidatorInfo {
                operator: operator.clone(),
                cons_addr: Addr::unchecked(format!("{operator}-cons")),
                power,
                bonded: true,
                jailed: false,
            },
        );
    }

    pub fn set_bonded(&mut self, operator: &Addr, bonded: bool) {
        if let Some(v) = self.validators.get_mut(operator) {
            v.bonded = bonded;
        }
    }

    pub fn is_jailed(&self, operator: &Addr) -> bool {
        self.validators.get(operator).map_or(false, |v| v.jailed)
    }
}

impl StakingKeeper for MockStakingKeeper {
    fn validator(&self, operator: &Addr) -> Option<ValidatorInfo> {
        self.validators.get(operator).cloned()
    }

    fn bonded_validators_by_power(&self) -> Vec<ValidatorInfo> {
        let mut bonded: Vec<ValidatorInfo> = self
            .validators
            .values()
            .filter(|v| v.bonded)
            .cloned()
            .collect();
        bonded.sort_by(|a, b| b.power.cmp(&a.power));
        bonded
    }

    fn slash(&mut self, cons_addr: &Addr, infraction_height: i64, power: i64, fraction: Decimal) {
        self.slashes.push(SlashRecord {
            cons_addr: cons_addr.clone(),
            infraction_height,
            power,
            fraction,
        });
    }

    fn jail(&mut self, cons_addr: &Addr) {
        for v in self.validators.values_mut() {
            if &v.cons_addr == cons_addr {
                v.jailed = true;
            }
        }
    }
}

#[derive(Default)]
pub struct MockBankKeeper {
    /// (module, denom) -> amount
    pub balances: BTreeMap<(String, String), Uint128>,
    pub fail_transfers: bool,
}

impl MockBankKeeper {
    pub fn set_balance(&mut self, module: &str, denom: &str, amount: u128) {
        self.balances
            .insert((module.to_string(), denom.to_string()), Uint128::new(amount));
    }
}

impl BankKeeper for MockBankKeeper {
    fn balance(&self, module: &str, denom: &str) -> Uint128 {
        self.balances
            .get(&(module.to_string(), denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &[Coin],
    ) -> StdResult<()> {
        if self.fail_transfers {
            return Err(StdError::generic_err("module transfer disabled"));
        }
        for coin in amount {
            let from = self.balance(sender_module, &coin.denom);
            let remaining = from.checked_sub(coin.amount)?;
            let to = self.balance(recipient_module, &coin.denom) + coin.amount;
            self.balances
                .insert((sender_module.to_string(), coin.denom.clone()), remaining);
            self.balances
                .insert((recipient_module.to_string(), coin.denom.clone()), to);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockDistributionKeeper {
    pub allocations: Vec<(Addr, Vec<Coin>)>,
}

impl MockDistributionKeeper {
    /// Total allocated to `operator` in `denom` across all calls.
    pub fn allocated(&self, operator: &Addr, denom: &str) -> Uint128 {
        self.allocations
            .iter()
            .filter(|(addr, _)| addr == operator)
            .flat_map(|(_, coins)| coins.iter())
            .filter(|c| c.denom == denom)
            .map(|c| c.amount)
            .sum()
    }
}

impl DistributionKeeper for MockDistributionKeeper {
    fn allocate_tokens_to_validator(&mut self, operator: &Addr, tokens: &[Coin]) {
        self.allocations.push((operator.clone(), tokens.to_vec()));
    }
}

/// All three mock collaborators, lendable as [`Keepers`].
#[derive(Default)]
pub struct MockKeepers {
    pub staking: MockStakingKeeper,
    pub bank: MockBankKeeper,
    pub distribution: MockDistributionKeeper,
}

impl MockKeepers {
    pub fn keepers(&mut self) -> Keepers<'_> {
        Keepers {
            staking: &mut self.staking,
            bank: &mut self.bank,
            distribution: &mut self.distribution,
        }
    }
}
