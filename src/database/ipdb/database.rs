//! IPDB database implementation core

use crate::database::source::ByteSource;
use crate::database::{Database, LookupRecord};
use crate::error::{Result, ZxipError};
use crate::ip::{Address, AddressRange, Family};
use memmap2::Mmap;
use std::cmp::Ordering;
use std::fs::File;
use std::path::Path;

use super::header::Header;
use super::reader::{DEFAULT_REDIRECT_LIMIT, Reader};

/// Sorted-index database over one address family
///
/// Index entry `i` holds the first address of range `i` (little-endian,
/// `address_len` bytes) followed by a pointer to its record. Range `i` ends
/// one address before the start of range `i + 1`; the last range ends at the
/// family's all-ones address, where databases keep their version string.
pub struct Ipdb<S> {
    name: String,
    source: S,
    family: Family,
    header: Header,
    redirect_limit: usize,
}

impl Ipdb<Mmap> {
    /// Memory-map a database file
    pub fn open_path<P: AsRef<Path>>(path: P, family: Family) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading {} IPDB database from: {}", family, path.display());

        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and database files are replaced, not edited in place
        let mmap = unsafe { Mmap::map(&file) }?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ipdb".to_string());
        let db = Self::open(mmap, family)?.with_name(name);

        log::info!(
            "Successfully loaded {} database: {} records",
            db.name,
            db.header.total_entries
        );
        Ok(db)
    }
}

impl<S: ByteSource> Ipdb<S> {
    /// Read the header of `source` and prepare it for queries
    pub fn open(source: S, family: Family) -> Result<Self> {
        let header = Header::read(&source, family)?;
        log::debug!(
            "IPDB header: off_len={} ip_len={} entries={} index_start=0x{:x}",
            header.offset_len,
            header.address_len,
            header.total_entries,
            header.index_start
        );
        Ok(Self {
            name: match family {
                Family::V4 => "qqwry".to_string(),
                Family::V6 => "ipv6wry".to_string(),
            },
            source,
            family,
            header,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
        })
    }

    pub fn with_name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    /// Bound on chained record/field redirects
    pub fn with_redirect_limit(mut self, limit: usize) -> Self {
        self.redirect_limit = limit;
        self
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Parse `text` and look it up
    pub fn query_str(&self, text: &str) -> Result<LookupRecord> {
        self.query(&text.parse()?)
    }

    /// Resolve the range and location containing `addr`
    pub fn query(&self, addr: &Address) -> Result<LookupRecord> {
        if addr.family() != self.family {
            return Err(ZxipError::UnsupportedFamily(addr.family()));
        }

        let found = self.search_index(addr)?;
        let start = self.read_index_address(found)?;
        let end = self.range_end(found)?;
        let range = AddressRange::new(start, end)?;

        let pointer_offset = self.header.entry_offset(found)? + u64::from(self.header.address_len);
        let reader = Reader::new(&self.source, self.header.offset_len, self.redirect_limit);
        let record_offset = reader.read_offset(pointer_offset)?;
        log::debug!("Entry {} -> record offset 0x{:08x}", found, record_offset);

        let (country_bytes, area_bytes) = reader.parse(record_offset)?;
        let country = String::from_utf8_lossy(&country_bytes).into_owned();
        let local = String::from_utf8_lossy(&area_bytes).into_owned();
        log::debug!("Country: '{}', Local: '{}'", country, local);

        Ok(LookupRecord::new(*addr, range, country, local))
    }

    /// Display text stored at the all-ones address
    pub fn version(&self) -> Result<String> {
        let record = self.query(&Address::broadcast(self.family))?;
        Ok(record.display().to_string())
    }

    /// Index of the last entry whose start address is `<= addr`
    ///
    /// Entry 0 is expected to start at the all-zero address, so addresses
    /// below every range land on it.
    pub(crate) fn search_index(&self, addr: &Address) -> Result<u32> {
        let mut l = 0u32;
        let mut r = self.header.total_entries;

        while l + 1 < r {
            let mid = l + (r - l) / 2;
            let mid_ip = self.read_index_address(mid)?;
            if addr.compare(&mid_ip)? == Ordering::Less {
                r = mid;
            } else {
                l = mid;
            }
        }
        Ok(l)
    }

    /// Start address stored in index entry `i`
    fn read_index_address(&self, i: u32) -> Result<Address> {
        let mut buf = [0u8; 16];
        let key = &mut buf[..usize::from(self.header.address_len)];
        self.source.read_exact_at(self.header.entry_offset(i)?, key)?;
        match self.family {
            Family::V4 if key.len() == 4 => Address::from_bytes_v4_le(key),
            Family::V4 => {
                // short keys hold the high-order bytes
                let mut be = [0u8; 4];
                for (dst, src) in be.iter_mut().zip(key.iter().rev()) {
                    *dst = *src;
                }
                Address::from_bytes_v4(&be)
            }
            Family::V6 => Address::from_bytes_v6_le(key),
        }
    }

    fn range_end(&self, found: u32) -> Result<Address> {
        if found + 1 >= self.header.total_entries {
            return Ok(Address::broadcast(self.family));
        }
        match self.read_index_address(found + 1) {
            Ok(mut next) => {
                next.sub_one();
                Ok(next)
            }
            Err(ZxipError::TruncatedRead { .. }) => Ok(Address::broadcast(self.family)),
            Err(e) => Err(e),
        }
    }
}

impl<S: ByteSource> Database for Ipdb<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, family: Family) -> bool {
        self.family == family
    }

    fn lookup(&self, addr: &Address) -> Result<LookupRecord> {
        self.query(addr)
    }

    fn version(&self) -> Result<String> {
        Ipdb::version(self)
    }
}
