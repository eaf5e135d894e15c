//! ZX IPDB database implementation
//!
//! This module implements the flat-file IPDB format shared by `qqwry.db`
//! (IPv4) and `ipv6wry.db` (IPv6): a small header, a sorted index of range
//! start addresses and a heap of flag-tagged text records.
//!
//! # Module Organization
//!
//! - `header`: header fields and their validation
//! - `reader`: record / field redirect decoding
//! - `database`: binary search and query logic

pub mod database;
pub mod header;
pub mod reader;

#[cfg(test)]
pub(crate) mod fixture;

pub use database::Ipdb;
pub use header::Header;
