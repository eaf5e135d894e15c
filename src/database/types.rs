//! Type definitions for the database module
//!
//! This module contains the result type shared by every database implementation.

use crate::ip::{Address, AddressRange};
use std::fmt;

/// Result of one IPDB lookup
///
/// `display` is `country` and `local` joined by a single space, exactly as
/// stored, so a missing local part leaves a trailing space.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LookupRecord {
    address: Address,
    range: AddressRange,
    country: String,
    local: String,
    display: String,
}

impl LookupRecord {
    pub fn new(address: Address, range: AddressRange, country: String, local: String) -> Self {
        let display = format!("{} {}", country, local);
        Self {
            address,
            range,
            country,
            local,
            display,
        }
    }

    /// The queried address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Range of the index entry the address fell into
    pub fn range(&self) -> &AddressRange {
        &self.range
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

impl fmt::Display for LookupRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Addr: {}, Range: {}, Display: {}",
            self.address, self.range, self.display
        )
    }
}
