//! Closed address ranges

use crate::error::{Result, ZxipError};
use num_bigint::BigUint;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::address::{Address, Family};

/// Number of leading bits an IPv4-mapped literal spends on `::ffff:`
const MAPPED_PREFIX_BITS: u32 = 96;

/// A closed interval `[start, end]` of same-family addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AddressRange {
    start: Address,
    end: Address,
}

impl AddressRange {
    /// Build a range; fails if the families differ or `end < start`
    pub fn new(start: Address, end: Address) -> Result<Self> {
        match start.compare(&end) {
            Err(_) => Err(ZxipError::range(format!(
                "{} and {} are different families",
                start, end
            ))),
            Ok(std::cmp::Ordering::Greater) => Err(ZxipError::range(format!(
                "{} is after {}",
                start, end
            ))),
            Ok(_) => Ok(AddressRange { start, end }),
        }
    }

    /// Range holding exactly one address
    pub fn single(addr: Address) -> Self {
        AddressRange {
            start: addr,
            end: addr,
        }
    }

    /// Build from two address literals
    pub fn from_bounds(start: &str, end: &str) -> Result<Self> {
        Self::new(start.trim().parse()?, end.trim().parse()?)
    }

    /// Parse `a.b.c.d/len`, `start-end` or a single address
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some((base, prefix)) = text.split_once('/') {
            Self::from_cidr(base.trim(), prefix.trim())
        } else if let Some((start, end)) = text.split_once('-') {
            Self::from_bounds(start, end)
        } else {
            Ok(Self::single(text.parse()?))
        }
    }

    fn from_cidr(base: &str, prefix: &str) -> Result<Self> {
        let base: Address = base.parse()?;
        let mut prefix_len: u32 = prefix
            .parse()
            .map_err(|_| ZxipError::InvalidPrefix(prefix.to_string()))?;
        if base.is_mapped() {
            prefix_len = prefix_len.saturating_sub(MAPPED_PREFIX_BITS);
        }

        let family = base.family();
        let bits = family.bits();
        if prefix_len > bits {
            return Err(ZxipError::InvalidPrefix(format!(
                "/{} is wider than {} bits",
                prefix_len, bits
            )));
        }

        let all_ones = u128::MAX >> (128 - bits);
        let host_mask = all_ones.checked_shr(prefix_len).unwrap_or(0);
        let value = octets_to_u128(base.octets());
        let start = value & !host_mask;
        let end = start | host_mask;

        Ok(AddressRange {
            start: u128_to_address(start, family)?,
            end: u128_to_address(end, family)?,
        })
    }

    pub fn start(&self) -> &Address {
        &self.start
    }

    pub fn end(&self) -> &Address {
        &self.end
    }

    pub fn family(&self) -> Family {
        self.start.family()
    }

    /// True if `addr` is of the same family and inside `[start, end]`
    pub fn contains(&self, addr: &Address) -> bool {
        if !addr.same_family(&self.start) {
            return false;
        }
        self.start.octets() <= addr.octets() && addr.octets() <= self.end.octets()
    }

    /// Number of addresses in the range
    pub fn size(&self) -> BigUint {
        self.count()
    }

    /// Number of `/prefix_len` blocks in the range (rounded down)
    pub fn size_at_prefix(&self, prefix_len: u32) -> Result<BigUint> {
        let bits = self.family().bits();
        if prefix_len > bits {
            return Err(ZxipError::InvalidPrefix(format!(
                "/{} is wider than {} bits",
                prefix_len, bits
            )));
        }
        Ok(self.count() >> (bits - prefix_len) as usize)
    }

    fn count(&self) -> BigUint {
        self.end.to_biguint() - self.start.to_biguint() + 1u32
    }
}

fn octets_to_u128(octets: &[u8]) -> u128 {
    octets
        .iter()
        .fold(0u128, |acc, &b| (acc << 8) | u128::from(b))
}

/// Mask results keep the base family; a V6 bound that happens to look
/// IPv4-mapped must not collapse.
fn u128_to_address(value: u128, family: Family) -> Result<Address> {
    let bytes = value.to_be_bytes();
    match family {
        Family::V4 => Address::from_bytes_v4(&bytes[12..]),
        Family::V6 => Address::from_bytes_v6(&bytes),
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

impl FromStr for AddressRange {
    type Err = ZxipError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
