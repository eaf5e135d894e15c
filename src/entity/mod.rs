//! Entity parsing and processing module
//!
//! This module extracts IP address literals from text so they can be
//! annotated with their location records.

pub mod parser;
pub mod types;
pub mod formatter;

pub use types::*;
