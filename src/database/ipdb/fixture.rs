//! Synthetic IPDB files for tests

use super::header::HEADER_LEN;
use super::reader::{REDIRECT_MODE_1, REDIRECT_MODE_2};

/// Index starts right after a zero-padded 32-byte header
pub(crate) const INDEX_START: u64 = 32;

/// Builds `header | index | heap` with absolute record pointers
pub(crate) struct DbBuilder {
    offset_len: u8,
    address_len: u8,
    entries: usize,
    index: Vec<u8>,
    heap: Vec<u8>,
}

impl DbBuilder {
    pub(crate) fn new(offset_len: u8, address_len: u8, entries: usize) -> Self {
        Self {
            offset_len,
            address_len,
            entries,
            index: Vec::new(),
            heap: Vec::new(),
        }
    }

    fn heap_base(&self) -> u64 {
        INDEX_START + (self.entries * usize::from(self.address_len + self.offset_len)) as u64
    }

    /// Absolute offset the next heap write will land on
    pub(crate) fn next_offset(&self) -> u64 {
        self.heap_base() + self.heap.len() as u64
    }

    fn pointer(&self, value: u64) -> Vec<u8> {
        value.to_le_bytes()[..usize::from(self.offset_len)].to_vec()
    }

    /// Append raw record bytes, returning their absolute offset
    pub(crate) fn push(&mut self, bytes: &[u8]) -> u64 {
        let at = self.next_offset();
        self.heap.extend_from_slice(bytes);
        at
    }

    /// `[0x01][pointer]`: whole record lives at `target`
    pub(crate) fn record_redirect(&mut self, target: u64) -> u64 {
        let mut rec = vec![REDIRECT_MODE_1];
        rec.extend(self.pointer(target));
        self.push(&rec)
    }

    /// `[0x02][pointer]` country followed by `area`
    pub(crate) fn field_redirect(&mut self, country: u64, area: &[u8]) -> u64 {
        let mut rec = vec![REDIRECT_MODE_2];
        rec.extend(self.pointer(country));
        rec.extend_from_slice(area);
        self.push(&rec)
    }

    /// Add an index entry; `start` is big-endian, `address_len` bytes
    pub(crate) fn entry(&mut self, start: &[u8], record: u64) {
        assert_eq!(start.len(), usize::from(self.address_len));
        self.index.extend(start.iter().rev());
        let pointer = self.pointer(record);
        self.index.extend(pointer);
    }

    pub(crate) fn build(self) -> Vec<u8> {
        assert_eq!(
            self.index.len(),
            self.entries * usize::from(self.address_len + self.offset_len)
        );
        let mut data = vec![0u8; INDEX_START as usize];
        data[..4].copy_from_slice(b"IPDB");
        data[6] = self.offset_len;
        data[7] = self.address_len;
        data[8..16].copy_from_slice(&(self.entries as u64).to_le_bytes());
        data[16..HEADER_LEN].copy_from_slice(&INDEX_START.to_le_bytes());
        data.extend(self.index);
        data.extend(self.heap);
        data
    }
}
