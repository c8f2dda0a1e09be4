//! Decoded ABI values.
//!
//! A deliberately small model: the contracts this SDK drives only ever
//! exchange unsigned integers, booleans, addresses, byte strings, text
//! and flat tuples.

use reel_core::{Address, TokenAmount};

use crate::{Error, Result};

/// A single decoded contract value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EthValue {
    Uint(u128),
    Bool(bool),
    Address(Address),
    Bytes(Vec<u8>),
    Str(String),
    Tuple(Vec<EthValue>),
}

impl EthValue {
    fn variant(&self) -> String {
        match self {
            Self::Uint(v) => format!("Uint({v})"),
            Self::Bool(v) => format!("Bool({v})"),
            Self::Address(a) => format!("Address({a})"),
            Self::Bytes(b) => format!("Bytes(0x{})", hex::encode(b)),
            Self::Str(s) => format!("Str({s:?})"),
            Self::Tuple(t) => format!("Tuple(len {})", t.len()),
        }
    }

    pub fn as_uint(&self) -> Result<u128> {
        match self {
            Self::Uint(v) => Ok(*v),
            other => Err(Error::Decode {
                expected: "Uint",
                got: other.variant(),
            }),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(Error::Decode {
                expected: "Bool",
                got: other.variant(),
            }),
        }
    }

    pub fn as_address(&self) -> Result<Address> {
        match self {
            Self::Address(a) => Ok(a.clone()),
            other => Err(Error::Decode {
                expected: "Address",
                got: other.variant(),
            }),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Self::Bytes(b) => Ok(b),
            other => Err(Error::Decode {
                expected: "Bytes",
                got: other.variant(),
            }),
        }
    }

    pub fn as_tuple(&self) -> Result<&[EthValue]> {
        match self {
            Self::Tuple(t) => Ok(t),
            other => Err(Error::Decode {
                expected: "Tuple",
                got: other.variant(),
            }),
        }
    }

    pub fn as_amount(&self) -> Result<TokenAmount> {
        Ok(TokenAmount(self.as_uint()?))
    }
}

impl From<TokenAmount> for EthValue {
    fn from(a: TokenAmount) -> Self {
        Self::Uint(a.0)
    }
}

impl From<Address> for EthValue {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}
