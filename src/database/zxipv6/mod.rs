//! ZX IPv6 database implementation
//!
//! `ipv6wry.db` covers native IPv6 space. IPv4-mapped addresses are handed
//! to an attached IPv4 database instead.

pub mod database;

pub use database::ZXIPv6Database;
