//! ZX IPv6 database implementation core

use crate::database::ipdb::Ipdb;
use crate::database::source::ByteSource;
use crate::database::{Database, LookupRecord};
use crate::error::{Result, ZxipError};
use crate::ip::{Address, Family};
use memmap2::Mmap;
use std::path::Path;
use std::sync::Arc;

/// ZX IPv6 database with optional IPv4 fallback for mapped addresses
pub struct ZXIPv6Database<S> {
    v6: Ipdb<S>,
    v4: Option<Arc<Ipdb<S>>>,
}

impl ZXIPv6Database<Mmap> {
    /// Memory-map `ipv6wry.db` at `path`
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Ipdb::open_path(path, Family::V6)?))
    }
}

impl<S: ByteSource> ZXIPv6Database<S> {
    pub fn new(v6: Ipdb<S>) -> Self {
        Self { v6, v4: None }
    }

    /// Resolve IPv4-mapped addresses through `v4`
    pub fn with_ipv4(mut self, v4: Arc<Ipdb<S>>) -> Self {
        self.v4 = Some(v4);
        self
    }

    pub fn ipv6(&self) -> &Ipdb<S> {
        &self.v6
    }

    pub fn ipv4(&self) -> Option<&Ipdb<S>> {
        self.v4.as_deref()
    }

    pub fn query_str(&self, text: &str) -> Result<LookupRecord> {
        self.query(&text.parse()?)
    }

    pub fn query(&self, addr: &Address) -> Result<LookupRecord> {
        match addr.family() {
            Family::V6 => self.v6.query(addr),
            Family::V4 if addr.is_mapped() => match &self.v4 {
                Some(v4) => {
                    log::debug!("Delegating mapped address {} to {}", addr, v4.name());
                    v4.query(addr)
                }
                None => Err(ZxipError::UnsupportedFamily(Family::V4)),
            },
            Family::V4 => Err(ZxipError::UnsupportedFamily(Family::V4)),
        }
    }

    pub fn version(&self) -> Result<String> {
        self.v6.version()
    }
}

impl<S: ByteSource> Database for ZXIPv6Database<S> {
    fn name(&self) -> &str {
        Database::name(&self.v6)
    }

    fn supports(&self, family: Family) -> bool {
        family == Family::V6
    }

    fn lookup(&self, addr: &Address) -> Result<LookupRecord> {
        self.query(addr)
    }

    fn version(&self) -> Result<String> {
        ZXIPv6Database::version(self)
    }
}
