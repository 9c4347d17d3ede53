use std::collections::HashSet;
use std::str::FromStr;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;

use crate::error::ParseError;

/// One revealed rate: the price of `denom` (symbol, upper case) in the quote
/// currency.
#[cw_serde]
pub struct ExchangeRateTuple {
    pub denom: String,
    pub exchange_rate: Decimal,
}

impl ExchangeRateTuple {
    pub fn new(denom: impl Into<String>, exchange_rate: Decimal) -> Self {
        Self {
            denom: denom.into(),
            exchange_rate,
        }
    }
}

/// Parse `"DENOM:rate,DENOM:rate"` as revealed by a vote.
///
/// Denoms are upper-cased. Every rate must be strictly positive and each denom
/// may appear once. An empty string parses to an empty list.
pub fn parse_exchange_rate_tuples(tuples_str: &str) -> Result<Vec<ExchangeRateTuple>, ParseError> {
    if tuples_str.is_empty() {
        return Ok(vec![]);
    }

    let mut tuples = Vec::new();
    let mut seen = HashSet::new();

    for tuple_str in tuples_str.split(',') {
        let parts: Vec<&str> = tuple_str.split(':').collect();
        if parts.len() != 2 {
            return Err(ParseError::InvalidExchangeRate {
                tuple: tuple_str.to_string(),
            });
        }

        let denom = parts[0].to_uppercase();
        let amount = parts[1];

        if amount.starts_with('-') {
            return Err(ParseError::NonPositiveRate { denom });
        }
        let exchange_rate =
            Decimal::from_str(amount).map_err(|_| ParseError::InvalidExchangeRate {
                tuple: tuple_str.to_string(),
            })?;
        if exchange_rate.is_zero() {
            return Err(ParseError::NonPositiveRate { denom });
        }

        if !seen.insert(denom.clone()) {
            return Err(ParseError::DuplicateDenom { denom });
        }

        tuples.push(ExchangeRateTuple {
            denom,
            exchange_rate,
        });
    }

    Ok(tuples)
}

/// Inverse of [`parse_exchange_rate_tuples`], used by feeders to build the
/// string they commit to.
pub fn format_exchange_rate_tuples(tuples: &[ExchangeRateTuple]) -> String {
    tuples
        .iter()
        .map(|t| format!("{}:{}", t.denom, t.exchange_rate))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let tuples = parse_exchange_rate_tuples("ujuno:123.0,uatom:123.123").unwrap();
        assert_eq!(tuples.len(), 2);
        assert_eq!(tuples[0].denom, "UJUNO");
        assert_eq!(tuples[0].exchange_rate, Decimal::from_str("123").unwrap());
        assert_eq!(tuples[1].denom, "UATOM");
        assert_eq!(tuples[1].exchange_rate, Decimal::from_str("123.123").unwrap());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_exchange_rate_tuples("").unwrap(), vec![]);
    }

    #[test]
    fn test_parse_duplicate_denom() {
        let err = parse_exchange_rate_tuples("ujuno:100.0,uatom:123.123,UATOM:121233.123")
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateDenom {
                denom: "UATOM".to_string()
            }
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_exchange_rate_tuples("123.123").unwrap_err(),
            ParseError::InvalidExchangeRate { .. }
        ));
        assert!(matches!(
            parse_exchange_rate_tuples("ujuno:123.0,123.1").unwrap_err(),
            ParseError::InvalidExchangeRate { .. }
        ));
        assert!(matches!(
            parse_exchange_rate_tuples("ujuno:123: ujuno:456,uusdc:789").unwrap_err(),
            ParseError::InvalidExchangeRate { .. }
        ));
        assert!(matches!(
            parse_exchange_rate_tuples("a,b").unwrap_err(),
            ParseError::InvalidExchangeRate { .. }
        ));
    }

    #[test]
    fn test_parse_non_positive() {
        assert!(matches!(
            parse_exchange_rate_tuples("ujuno:0.0,uatom:123.1").unwrap_err(),
            ParseError::NonPositiveRate { .. }
        ));
        assert!(matches!(
            parse_exchange_rate_tuples("ujuno:-1234.5,uatom:123.1").unwrap_err(),
            ParseError::NonPositiveRate { .. }
        ));
    }

    #[test]
    fn test_parse_overflow() {
        let huge = "foo:100000000000000000000000000000000000000000000000000000000000000000.01";
        assert!(matches!(
            parse_exchange_rate_tuples(huge).unwrap_err(),
            ParseError::InvalidExchangeRate { .. }
        ));
    }

    #[test]
    fn test_format_parses_back() {
        let tuples = vec![
            ExchangeRateTuple::new("ATOM", Decimal::from_str("11.25").unwrap()),
            ExchangeRateTuple::new("JUNO", Decimal::one()),
        ];
        let formatted = format_exchange_rate_tuples(&tuples);
        assert_eq!(formatted, "ATOM:11.25,JUNO:1");
        assert_eq!(parse_exchange_rate_tuples(&formatted).unwrap(), tuples);
    }
}
