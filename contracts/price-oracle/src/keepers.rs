use cosmwasm_std::{Addr, Coin, Decimal, StdResult, Uint128};

/// Blocks between a validator set change and it taking effect.
pub const VALIDATOR_UPDATE_DELAY: i64 = 1;

/// Snapshot of a validator as seen by the staking module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorInfo {
    pub operator: Addr,
    pub cons_addr: Addr,
    pub power: i64,
    pub bonded: bool,
    pub jailed: bool,
}

pub trait StakingKeeper {
    fn validator(&self, operator: &Addr) -> Option<ValidatorInfo>;

    /// Bonded validators, highest power first.
    fn bonded_validators_by_power(&self) -> Vec<ValidatorInfo>;

    fn slash(&mut self, cons_addr: &Addr, infraction_height: i64, power: i64, fraction: Decimal);

    fn jail(&mut self, cons_addr: &Addr);
}

pub trait BankKeeper {
    fn balance(&self, module: &str, denom: &str) -> Uint128;

    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &[Coin],
    ) -> StdResult<()>;
}

pub trait DistributionKeeper {
    fn allocate_tokens_to_validator(&mut self, operator: &Addr, tokens: &[Coin]);
}

/// Host collaborators handed to the block hooks.
pub struct Keepers<'a> {
    pub staking: &'a mut dyn StakingKeeper,
    pub bank: &'a mut dyn BankKeeper,
    pub distribution: &'a mut dyn DistributionKeeper,
}
