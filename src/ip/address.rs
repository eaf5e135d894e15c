//! Canonical IP address value
//!
//! An [`Address`] is either 4 or 16 bytes in network order. Sixteen-byte
//! IPv4-mapped input (`::ffff:a.b.c.d`) collapses to its 4-byte form and
//! remembers that it was mapped, so CIDR prefixes written against the
//! 128-bit form can be adjusted later.

use crate::error::{Result, ZxipError};
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::parser;

/// Size of an IPv4 address in bytes
pub const INADDR4SZ: usize = 4;
/// Size of an IPv6 address in bytes
pub const INADDR16SZ: usize = 16;

/// Address family, identified by byte length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Number of bytes in an address of this family
    pub fn byte_len(self) -> usize {
        match self {
            Family::V4 => INADDR4SZ,
            Family::V6 => INADDR16SZ,
        }
    }

    /// Number of bits in an address of this family
    pub fn bits(self) -> u32 {
        (self.byte_len() * 8) as u32
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => f.write_str("IPv4"),
            Family::V6 => f.write_str("IPv6"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Octets {
    V4([u8; INADDR4SZ]),
    V6([u8; INADDR16SZ]),
}

/// An IPv4 or IPv6 address
///
/// Equality and hashing look at the stored bytes only. Ordering is only
/// defined inside one family: `partial_cmp` returns `None` across families
/// and [`Address::compare`] reports [`ZxipError::FamilyMismatch`].
#[derive(Debug, Clone, Copy)]
pub struct Address {
    octets: Octets,
    mapped: bool,
}

impl Address {
    /// Build from big-endian bytes; 16-byte IPv4-mapped input is collapsed
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            INADDR4SZ => Self::from_bytes_v4(bytes),
            INADDR16SZ => {
                let mut octets = [0u8; INADDR16SZ];
                octets.copy_from_slice(bytes);
                Ok(Self::from_octets16(octets))
            }
            n => Err(ZxipError::address(format!(
                "expected 4 or 16 bytes, got {}",
                n
            ))),
        }
    }

    /// Same as [`Address::from_bytes`] for little-endian input
    pub fn from_bytes_le(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(&bswap(bytes))
    }

    /// Build an IPv4 address from exactly 4 big-endian bytes
    pub fn from_bytes_v4(bytes: &[u8]) -> Result<Self> {
        let octets: [u8; INADDR4SZ] = bytes.try_into().map_err(|_| {
            ZxipError::address(format!("expected 4 bytes, got {}", bytes.len()))
        })?;
        Ok(Self::from_octets4(octets))
    }

    pub fn from_bytes_v4_le(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_v4(&bswap(bytes))
    }

    /// Build an IPv6 address from at most 16 big-endian bytes.
    ///
    /// Shorter input is the high-order part; the low bytes are zero. The
    /// result is never collapsed to IPv4, even if it looks mapped.
    pub fn from_bytes_v6(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > INADDR16SZ {
            return Err(ZxipError::address(format!(
                "expected at most 16 bytes, got {}",
                bytes.len()
            )));
        }
        let mut octets = [0u8; INADDR16SZ];
        octets[..bytes.len()].copy_from_slice(bytes);
        Ok(Address {
            octets: Octets::V6(octets),
            mapped: false,
        })
    }

    pub fn from_bytes_v6_le(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_v6(&bswap(bytes))
    }

    pub(crate) fn from_octets4(octets: [u8; INADDR4SZ]) -> Self {
        Address {
            octets: Octets::V4(octets),
            mapped: false,
        }
    }

    pub(crate) fn from_octets16(octets: [u8; INADDR16SZ]) -> Self {
        if is_ipv4_mapped(&octets) {
            let mut v4 = [0u8; INADDR4SZ];
            v4.copy_from_slice(&octets[12..]);
            Address {
                octets: Octets::V4(v4),
                mapped: true,
            }
        } else {
            Address {
                octets: Octets::V6(octets),
                mapped: false,
            }
        }
    }

    /// All-ones address of a family (`255.255.255.255`, `ffff:...:ffff`)
    pub fn broadcast(family: Family) -> Self {
        match family {
            Family::V4 => Self::from_octets4([0xff; INADDR4SZ]),
            Family::V6 => Address {
                octets: Octets::V6([0xff; INADDR16SZ]),
                mapped: false,
            },
        }
    }

    /// All-zero address of a family
    pub fn unspecified(family: Family) -> Self {
        match family {
            Family::V4 => Self::from_octets4([0; INADDR4SZ]),
            Family::V6 => Address {
                octets: Octets::V6([0; INADDR16SZ]),
                mapped: false,
            },
        }
    }

    /// Big-endian bytes (4 or 16)
    pub fn octets(&self) -> &[u8] {
        match &self.octets {
            Octets::V4(o) => &o[..],
            Octets::V6(o) => &o[..],
        }
    }

    fn octets_mut(&mut self) -> &mut [u8] {
        match &mut self.octets {
            Octets::V4(o) => &mut o[..],
            Octets::V6(o) => &mut o[..],
        }
    }

    pub fn to_bytes_le(&self) -> Vec<u8> {
        bswap(self.octets())
    }

    /// Unsigned magnitude of the address
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(self.octets())
    }

    pub fn family(&self) -> Family {
        match self.octets {
            Octets::V4(_) => Family::V4,
            Octets::V6(_) => Family::V6,
        }
    }

    pub fn is_ipv4(&self) -> bool {
        self.family() == Family::V4
    }

    pub fn is_ipv6(&self) -> bool {
        self.family() == Family::V6
    }

    pub fn same_family(&self, other: &Address) -> bool {
        self.family() == other.family()
    }

    /// True if this address was written as (or decoded from) `::ffff:a.b.c.d`
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Unsigned comparison within one family
    pub fn compare(&self, other: &Address) -> Result<Ordering> {
        if !self.same_family(other) {
            return Err(ZxipError::FamilyMismatch {
                left: self.family(),
                right: other.family(),
            });
        }
        Ok(self.octets().cmp(other.octets()))
    }

    /// Decrement by one; `0.0.0.0` wraps to `255.255.255.255` (same for IPv6)
    pub fn sub_one(&mut self) {
        for byte in self.octets_mut().iter_mut().rev() {
            let (value, borrow) = byte.overflowing_sub(1);
            *byte = value;
            if !borrow {
                break;
            }
        }
    }
}

/// Reverse a byte buffer (little-endian <-> big-endian)
pub fn bswap(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().copied().collect()
}

fn is_ipv4_mapped(octets: &[u8; INADDR16SZ]) -> bool {
    octets[..10].iter().all(|&b| b == 0) && octets[10] == 0xff && octets[11] == 0xff
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.octets() == other.octets()
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.octets().hash(state);
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.octets {
            Octets::V4(o) => write!(f, "{}.{}.{}.{}", o[0], o[1], o[2], o[3]),
            Octets::V6(o) => {
                for (i, pair) in o.chunks_exact(2).enumerate() {
                    if i > 0 {
                        f.write_str(":")?;
                    }
                    write!(f, "{:x}", u16::from_be_bytes([pair[0], pair[1]]))?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Address {
    type Err = ZxipError;

    fn from_str(s: &str) -> Result<Self> {
        parser::parse_address(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Self::from_octets4(ip.octets())
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Self::from_octets16(ip.octets())
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> Self {
        match addr.octets {
            Octets::V4(o) => IpAddr::V4(Ipv4Addr::from(o)),
            Octets::V6(o) => IpAddr::V6(Ipv6Addr::from(o)),
        }
    }
}
