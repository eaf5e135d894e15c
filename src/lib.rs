//! zxip-rs: offline IP location lookups against ZX IPDB databases
//!
//! The crate models IPv4/IPv6 addresses and ranges (`ip`), reads the ZX IPDB
//! flat-file format used by `qqwry.db` and `ipv6wry.db` (`database`), and
//! annotates free text with the location of every address it contains
//! (`entity`).
//!
//! ```no_run
//! use zxip_rs::database::Ipdb;
//! use zxip_rs::ip::Family;
//!
//! let db = Ipdb::open_path("qqwry.db", Family::V4)?;
//! let record = db.query_str("1.2.3.4")?;
//! println!("{} -> {}", record.range(), record.display());
//! # Ok::<(), zxip_rs::ZxipError>(())
//! ```

pub mod cli;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod ip;
pub mod prelude;
pub mod regex;
pub mod utils;

// Re-export common types
pub use error::{Result, ZxipError};

pub use database::{
    ByteSource, Database, DatabaseManager, Ipdb, LookupRecord, ZXIPv6Database,
};
pub use ip::{Address, AddressRange, Family};
