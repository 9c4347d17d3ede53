use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::ParseError;

/// Length in bytes of a prevote commitment (truncated SHA-256).
pub const VOTE_HASH_LEN: usize = 20;

/// Commitment submitted with a prevote and checked again on reveal.
///
/// `hash = sha256("{salt}:{exchange_rates}:{voter}")[..20]`
///
/// The voter is the validator operator address string, so a commitment cannot
/// be replayed on behalf of another validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AggregateVoteHash([u8; VOTE_HASH_LEN]);

impl AggregateVoteHash {
    pub fn compute(salt: &str, exchange_rates: &str, voter: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(b":");
        hasher.update(exchange_rates.as_bytes());
        hasher.update(b":");
        hasher.update(voter.as_bytes());
        let digest: [u8; 32] = hasher.finalize().into();

        let mut truncated = [0u8; VOTE_HASH_LEN];
        truncated.copy_from_slice(&digest[..VOTE_HASH_LEN]);
        Self(truncated)
    }

    /// Parse a hex-encoded commitment as carried in prevote messages.
    pub fn from_hex(hash_hex: &str) -> Result<Self, ParseError> {
        let bytes = hex::decode(hash_hex).map_err(|_| ParseError::InvalidHex {
            field: "hash".to_string(),
        })?;
        let fixed: [u8; VOTE_HASH_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| ParseError::InvalidHashLength {
                    expected: VOTE_HASH_LEN,
                    got: bytes.len(),
                })?;
        Ok(Self(fixed))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AggregateVoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
