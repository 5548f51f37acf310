use crate::error::PersistDbError;
use alloy::primitives::Address as AlloyAddress;
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Thin newtype to guarantee we only store validated wallet addresses.
///
/// Accepts `0x`-prefixed hex as well as Ronin's `ronin:` spelling and keeps
/// the EIP-55 checksum form, so one wallet always maps to one row key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WalletAddress {
    raw: AlloyAddress,
    checksummed: String,
}

impl WalletAddress {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, PersistDbError> {
        let trimmed = raw.as_ref().trim();
        let hex = trimmed
            .strip_prefix("ronin:")
            .map(|rest| format!("0x{rest}"))
            .unwrap_or_else(|| trimmed.to_owned());
        let address = AlloyAddress::from_str(&hex)
            .map_err(|_| PersistDbError::InvalidAddress(trimmed.to_owned()))?;
        Ok(Self {
            raw: address,
            checksummed: address.to_checksum(None),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.checksummed
    }

    pub fn address(&self) -> AlloyAddress {
        self.raw
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksummed)
    }
}

pub fn now() -> NaiveDateTime {
    crate::util::now_naive()
}

pub fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

pub fn parse_address(addr: impl AsRef<str>) -> Result<WalletAddress, PersistDbError> {
    WalletAddress::parse(addr)
}
