//! Database manager - opens the configured databases and routes queries

use crate::config::AppConfig;
use crate::database::ipdb::Ipdb;
use crate::database::{Database, LookupRecord, ZXIPv6Database};
use crate::error::{Result, ZxipError};
use crate::ip::{Address, Family};
use memmap2::Mmap;
use std::path::Path;
use std::sync::Arc;

/// Database manager holds the IPv4 and IPv6 databases
///
/// The IPv4 database is shared with the IPv6 wrapper so that IPv4-mapped
/// addresses resolve against it.
///
/// # Thread Safety
///
/// Lookups take `&self` and only issue positioned reads, so a manager can be
/// shared across threads using Arc.
pub struct DatabaseManager {
    ipv4: Option<Arc<Ipdb<Mmap>>>,
    ipv6: Option<ZXIPv6Database<Mmap>>,
}

impl DatabaseManager {
    /// Open the databases named by `config`
    ///
    /// A missing file leaves its family unavailable; a file that exists but
    /// cannot be opened is an error.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let limit = config.database.redirect_limit;

        let ipv4 = match Self::open_if_present(&config.ipv4_database_path()?, Family::V4)? {
            Some(db) => Some(Arc::new(db.with_redirect_limit(limit))),
            None => None,
        };

        let ipv6 = match Self::open_if_present(&config.ipv6_database_path()?, Family::V6)? {
            Some(db) => {
                let db = ZXIPv6Database::new(db.with_redirect_limit(limit));
                Some(match &ipv4 {
                    Some(v4) => db.with_ipv4(Arc::clone(v4)),
                    None => db,
                })
            }
            None => None,
        };

        Ok(Self { ipv4, ipv6 })
    }

    fn open_if_present(path: &Path, family: Family) -> Result<Option<Ipdb<Mmap>>> {
        if !path.exists() {
            log::warn!(
                "{} database file not found: {}",
                family,
                path.display()
            );
            return Ok(None);
        }
        Ipdb::open_path(path, family).map(Some)
    }

    pub fn ipv4(&self) -> Option<&Ipdb<Mmap>> {
        self.ipv4.as_deref()
    }

    pub fn ipv6(&self) -> Option<&ZXIPv6Database<Mmap>> {
        self.ipv6.as_ref()
    }

    /// Look up `addr` in the database for its family
    ///
    /// IPv4-mapped addresses go through the IPv6 database, which hands them
    /// to the shared IPv4 one; without an IPv6 database they go there directly.
    pub fn query(&self, addr: &Address) -> Result<LookupRecord> {
        let db = self.route(addr).ok_or_else(|| {
            ZxipError::DatabaseNotFound(format!("no database loaded for {} address {}", addr.family(), addr))
        })?;
        log::debug!("Querying {} with {}", addr, db.name());
        db.lookup(addr)
    }

    /// Parse `text` and look it up
    pub fn query_str(&self, text: &str) -> Result<LookupRecord> {
        self.query(&text.parse()?)
    }

    fn route(&self, addr: &Address) -> Option<&dyn Database> {
        let ipv6 = self.ipv6.as_ref().map(|db| db as &dyn Database);
        let ipv4 = self.ipv4.as_deref().map(|db| db as &dyn Database);

        if addr.is_mapped() && self.ipv6.as_ref().is_some_and(|v6| v6.ipv4().is_some()) {
            return ipv6;
        }
        [ipv6, ipv4]
            .into_iter()
            .flatten()
            .find(|db| db.supports(addr.family()))
    }

    /// `(name, version)` of every loaded database
    pub fn versions(&self) -> Vec<(String, Result<String>)> {
        let mut out = Vec::new();
        if let Some(db) = &self.ipv4 {
            out.push((Database::name(&**db).to_string(), Database::version(&**db)));
        }
        if let Some(db) = &self.ipv6 {
            out.push((db.name().to_string(), Database::version(db)));
        }
        out
    }

    /// Number of loaded databases
    pub fn loaded(&self) -> usize {
        usize::from(self.ipv4.is_some()) + usize::from(self.ipv6.is_some())
    }
}
