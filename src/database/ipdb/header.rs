//! IPDB database header structure
//!
//! ```text
//! 0       4       6   7   8               16              24
//! +-------+-------+---+---+---------------+---------------+
//! | magic | ver   |off|ip | total entries | index start   |
//! +-------+-------+---+---+---------------+---------------+
//! ```
//!
//! Only the four fields from byte 6 onwards are interpreted.

use crate::error::{Result, ZxipError};
use crate::ip::Family;

use crate::database::source::ByteSource;

/// Bytes needed to hold every interpreted header field
pub const HEADER_LEN: usize = 24;

/// Widest record pointer that still fits a `u64`
const MAX_OFFSET_LEN: u8 = 8;

/// IPDB database header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub offset_len: u8,
    pub address_len: u8,
    pub total_entries: u32,
    pub index_start: u64,
}

impl Header {
    /// Read and validate the header of a database indexing `family`
    pub fn read<S: ByteSource + ?Sized>(source: &S, family: Family) -> Result<Self> {
        let mut data = [0u8; HEADER_LEN];
        source.read_exact_at(0, &mut data).map_err(|_| {
            ZxipError::header(format!(
                "file too small: {} bytes, need at least {}",
                source.size(),
                HEADER_LEN
            ))
        })?;
        let header = Self::parse(&data, family)?;

        let index_end = u64::from(header.total_entries)
            .checked_mul(header.entry_len())
            .and_then(|len| len.checked_add(header.index_start));
        match index_end {
            Some(end) if end <= source.size() => Ok(header),
            _ => Err(ZxipError::header(format!(
                "index of {} entries at 0x{:x} runs past the end of a {} byte file",
                header.total_entries,
                header.index_start,
                source.size()
            ))),
        }
    }

    /// Parse header from raw data
    pub fn parse(data: &[u8; HEADER_LEN], family: Family) -> Result<Self> {
        let offset_len = data[6];
        let address_len = data[7];
        let mut field = [0u8; 8];
        field.copy_from_slice(&data[8..16]);
        let total_entries = u64::from_le_bytes(field);
        field.copy_from_slice(&data[16..24]);
        let index_start = u64::from_le_bytes(field);

        if offset_len == 0 || offset_len > MAX_OFFSET_LEN {
            return Err(ZxipError::header(format!(
                "offset field length {} not in 1..={}",
                offset_len, MAX_OFFSET_LEN
            )));
        }
        if address_len == 0 || usize::from(address_len) > family.byte_len() {
            return Err(ZxipError::header(format!(
                "address field length {} not in 1..={} for {}",
                address_len,
                family.byte_len(),
                family
            )));
        }
        if total_entries == 0 {
            return Err(ZxipError::header("index has no entries"));
        }
        let total_entries = u32::try_from(total_entries).map_err(|_| {
            ZxipError::header(format!("{} entries do not fit a 32-bit count", total_entries))
        })?;

        Ok(Self {
            offset_len,
            address_len,
            total_entries,
            index_start,
        })
    }

    /// Size of one index entry: address field followed by record pointer
    pub fn entry_len(&self) -> u64 {
        u64::from(self.address_len) + u64::from(self.offset_len)
    }

    /// Absolute offset of index entry `i`
    pub fn entry_offset(&self, i: u32) -> Result<u64> {
        u64::from(i)
            .checked_mul(self.entry_len())
            .and_then(|rel| rel.checked_add(self.index_start))
            .ok_or(ZxipError::TruncatedRead {
                offset: self.index_start,
                len: usize::from(self.address_len) + usize::from(self.offset_len),
            })
    }
}
