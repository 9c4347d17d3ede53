use cosmwasm_schema::cw_serde;

/// An asset the oracle knows about.
///
/// Votes and exchange rates are keyed by the upper-cased `symbol_denom`
/// (e.g. `ATOM`); balances and reward payouts use the chain `base_denom`
/// (e.g. `ibc/...` or `ujuno`). `exponent` converts between the two.
#[cw_serde]
pub struct Denom {
    pub base_denom: String,
    pub symbol_denom: String,
    pub exponent: u32,
}

impl Denom {
    pub fn new(base_denom: impl Into<String>, symbol_denom: impl Into<String>, exponent: u32) -> Self {
        Self {
            base_denom: base_denom.into(),
            symbol_denom: symbol_denom.into().to_uppercase(),
            exponent,
        }
    }

    fn matches(&self, denom: &str) -> bool {
        self.base_denom == denom || self.symbol_denom.eq_ignore_ascii_case(denom)
    }
}

pub type DenomList = Vec<Denom>;

/// Membership capability shared by the accept list, the price tracking list
/// and the TWAP tracking list.
///
/// A denom is a member when it equals an entry's base denom, or its symbol
/// denom ignoring case.
pub trait DenomSet {
    fn find(&self, denom: &str) -> Option<&Denom>;

    fn is_member(&self, denom: &str) -> bool {
        self.find(denom).is_some()
    }

    fn symbols(&self) -> Vec<String>;

    fn base_denoms(&self) -> Vec<String>;
}

impl DenomSet for [Denom] {
    fn find(&self, denom: &str) -> Option<&Denom> {
        self.iter().find(|d| d.matches(denom))
    }

    fn symbols(&self) -> Vec<String> {
        self.iter().map(|d| d.symbol_denom.clone()).collect()
    }

    fn base_denoms(&self) -> Vec<String> {
        self.iter().map(|d| d.base_denom.clone()).collect()
    }
}

/// Append every denom of `additions` whose symbol is not already listed.
pub fn merge_denoms(list: &mut DenomList, additions: &[Denom]) {
    for denom in additions {
        if !list.iter().any(|d| d.symbol_denom == denom.symbol_denom) {
            list.push(denom.clone());
        }
    }
}

/// Drop every denom of `list` whose symbol appears in `removals`.
pub fn remove_denoms(list: &mut DenomList, removals: &[Denom]) {
    list.retain(|d| !removals.iter().any(|r| r.symbol_denom == d.symbol_denom));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom() -> Denom {
        Denom::new("ibc/atom", "atom", 6)
    }

    fn juno() -> Denom {
        Denom::new("ujuno", "JUNO", 6)
    }

    #[test]
    fn test_symbol_is_uppercased() {
        assert_eq!(atom().symbol_denom, "ATOM");
    }

    #[test]
    fn test_membership_by_symbol_or_base() {
        let list: DenomList = vec![atom(), juno()];
        assert!(list.is_member("ATOM"));
        assert!(list.is_member("atom"));
        assert!(list.is_member("ibc/atom"));
        assert!(list.is_member("ujuno"));
        assert!(!list.is_member("OSMO"));
        assert!(!list.is_member("IBC/ATOM"));
        assert_eq!(list.find("juno").map(|d| d.exponent), Some(6));
    }

    #[test]
    fn test_symbols_and_base_denoms_keep_order() {
        let list: DenomList = vec![juno(), atom()];
        assert_eq!(list.symbols(), vec!["JUNO", "ATOM"]);
        assert_eq!(list.base_denoms(), vec!["ujuno", "ibc/atom"]);
    }

    #[test]
    fn test_merge_skips_existing() {
        let mut list: DenomList = vec![juno()];
        merge_denoms(&mut list, &[juno(), atom()]);
        assert_eq!(list, vec![juno(), atom()]);
    }

    #[test]
    fn test_remove() {
        let mut list: DenomList = vec![juno(), atom()];
        remove_denoms(&mut list, &[atom(), Denom::new("uosmo", "OSMO", 6)]);
        assert_eq!(list, vec![juno()]);
    }
}
