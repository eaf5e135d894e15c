//! IP address and range model
//!
//! - `address`: the [`Address`] value type and its byte-level constructors
//! - `parser`: IPv4 / IPv6 text grammar
//! - `range`: [`AddressRange`] with CIDR / dash / single notation

pub mod address;
pub mod parser;
pub mod range;

pub use address::{Address, Family, bswap};
pub use range::AddressRange;
