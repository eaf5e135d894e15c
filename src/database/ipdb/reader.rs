//! IPDB record reader
//!
//! A record is two text fields. Both the record and each field may start
//! with a one-byte flag:
//!
//! - `0x01` at a record start: the whole record lives at the pointer that
//!   follows
//! - `0x02` at a field start: the field text lives at the pointer that
//!   follows
//! - `0x00` at a field start: empty field
//! - anything else: the flag byte is the first byte of a NUL-terminated
//!   string

use crate::error::{Result, ZxipError};

use crate::database::source::ByteSource;

/// Redirect mode constants
pub const REDIRECT_MODE_1: u8 = 0x01;
pub const REDIRECT_MODE_2: u8 = 0x02;
const EMPTY_FIELD: u8 = 0x00;

/// Default bound on chained redirects before a record is treated as corrupt
pub const DEFAULT_REDIRECT_LIMIT: usize = 32;

const STRING_CHUNK: usize = 64;

/// One decoded flag position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Empty,
    Redirect { pointer: u64 },
    Inline,
}

/// Reader for parsing IPDB records
pub struct Reader<'a, S: ?Sized> {
    source: &'a S,
    offset_len: usize,
    redirect_limit: usize,
}

impl<'a, S: ByteSource + ?Sized> Reader<'a, S> {
    pub fn new(source: &'a S, offset_len: u8, redirect_limit: usize) -> Self {
        Self {
            source,
            offset_len: usize::from(offset_len),
            redirect_limit,
        }
    }

    /// Read an `offset_len`-byte little-endian pointer
    pub fn read_offset(&self, offset: u64) -> Result<u64> {
        self.source.read_uint_le_at(offset, self.offset_len)
    }

    /// Resolve the record at `offset` into its (country, local) bytes
    pub fn parse(&self, offset: u64) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut offset = offset;
        let mut hops = 0;

        loop {
            let mode = self.source.read_u8_at(offset)?;
            if mode == REDIRECT_MODE_1 {
                self.bump(&mut hops, offset)?;
                offset = self.read_offset(offset + 1)?;
                continue;
            }

            let country = self.read_location(offset)?;
            let area_offset = if mode == REDIRECT_MODE_2 {
                offset + self.offset_len as u64 + 1
            } else {
                offset + country.len() as u64 + 1
            };
            let area = self.read_location(area_offset)?;
            return Ok((country, area));
        }
    }

    /// Read one text field, following field-level redirects
    pub fn read_location(&self, offset: u64) -> Result<Vec<u8>> {
        let mut offset = offset;
        let mut hops = 0;

        loop {
            match self.read_field(offset)? {
                Field::Empty => return Ok(Vec::new()),
                Field::Redirect { pointer } => {
                    self.bump(&mut hops, offset)?;
                    offset = pointer;
                }
                Field::Inline => return self.read_string(offset),
            }
        }
    }

    fn read_field(&self, offset: u64) -> Result<Field> {
        if offset == 0 {
            return Ok(Field::Empty);
        }
        match self.source.read_u8_at(offset)? {
            EMPTY_FIELD => Ok(Field::Empty),
            REDIRECT_MODE_2 => Ok(Field::Redirect {
                pointer: self.read_offset(offset + 1)?,
            }),
            _ => Ok(Field::Inline),
        }
    }

    fn bump(&self, hops: &mut usize, offset: u64) -> Result<()> {
        *hops += 1;
        if *hops > self.redirect_limit {
            return Err(ZxipError::RedirectLoopOrTooDeep {
                offset,
                limit: self.redirect_limit,
            });
        }
        Ok(())
    }

    /// Read null-terminated string
    fn read_string(&self, offset: u64) -> Result<Vec<u8>> {
        let size = self.source.size();
        let mut out = Vec::new();
        let mut pos = offset;
        let mut chunk = [0u8; STRING_CHUNK];

        loop {
            let n = size.saturating_sub(pos).min(STRING_CHUNK as u64) as usize;
            if n == 0 {
                return Err(ZxipError::TruncatedRead { offset: pos, len: 1 });
            }
            self.source.read_exact_at(pos, &mut chunk[..n])?;
            if let Some(nul) = chunk[..n].iter().position(|&b| b == 0) {
                out.extend_from_slice(&chunk[..nul]);
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
            pos += n as u64;
        }
    }
}
