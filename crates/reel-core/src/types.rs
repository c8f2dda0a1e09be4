//! Chain-facing value types.
//!
//! Addresses are carried as normalized hex strings; token amounts as a
//! newtype over the smallest unit so they can never be confused with
//! whole-token floats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Token configuration
pub const DECIMALS: u8 = 18;
pub const SYMBOL: &str = "REEL";

/// A 20-byte account or contract address, kept as lowercase 0x-hex.
///
/// The all-zero address is the "does not exist" sentinel used by the
/// registry contracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// The zero-address sentinel.
    pub fn zero() -> Self {
        Self(format!("0x{}", "0".repeat(40)))
    }

    /// Parse and normalize a 0x-prefixed hex address.
    pub fn parse(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| Error::InvalidAddress(s.to_string()))?;
        if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidAddress(s.to_string()));
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// True for the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0[2..].bytes().all(|b| b == b'0')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}

/// Token amounts in base units (10^-18 REEL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenAmount(pub u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    /// Create from a human-readable amount (e.g. 1.5 REEL)
    pub fn from_reel(amount: f64) -> Self {
        Self((amount * 10f64.powi(DECIMALS as i32)) as u128)
    }

    /// Convert to a human-readable amount
    pub fn to_reel(&self) -> f64 {
        self.0 as f64 / 10f64.powi(DECIMALS as i32)
    }

    /// Raw base units
    pub fn base_units(&self) -> u128 {
        self.0
    }

    /// Saturating addition
    pub fn add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction
    pub fn sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Check if this amount covers `required`
    pub fn sufficient_for(&self, required: Self) -> bool {
        self.0 >= required.0
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} base units", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_and_normalize() {
        let a = Address::parse("0xAbCd00000000000000000000000000000000EF01").unwrap();
        assert_eq!(a.as_str(), "0xabcd00000000000000000000000000000000ef01");
        assert!(!a.is_zero());
    }

    #[test]
    fn test_address_rejects_garbage() {
        assert!(Address::parse("abcd").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xzz0000000000000000000000000000000000zz00").is_err());
    }

    #[test]
    fn test_zero_address_sentinel() {
        assert!(Address::zero().is_zero());
        let a = Address::parse("0x0000000000000000000000000000000000000000").unwrap();
        assert_eq!(a, Address::zero());
    }

    #[test]
    fn test_token_amount_conversions() {
        let amount = TokenAmount::from_reel(1.5);
        assert_eq!(amount.to_reel(), 1.5_f64);
        assert_eq!(amount.base_units(), 1_500_000_000_000_000_000);
    }

    #[test]
    fn test_token_amount_arithmetic() {
        let a = TokenAmount(100);
        let b = TokenAmount(30);

        assert_eq!(a.add(b), TokenAmount(130));
        assert_eq!(a.sub(b), TokenAmount(70));
        assert_eq!(b.sub(a), TokenAmount::ZERO);
        assert!(a.sufficient_for(b));
        assert!(!b.sufficient_for(a));
    }
}
