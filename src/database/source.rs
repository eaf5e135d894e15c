//! Positioned byte access for database files
//!
//! Every read names its absolute offset, so a source is never mutated by a
//! query and one opened database can serve many threads.

use crate::error::{Result, ZxipError};

/// Random-access read of N bytes at offset O
pub trait ByteSource {
    /// Total size in bytes
    fn size(&self) -> u64;

    /// Fill `buf` from `offset`, or fail with `TruncatedRead`
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;

    fn read_u8_at(&self, offset: u64) -> Result<u8> {
        let mut b = [0u8; 1];
        self.read_exact_at(offset, &mut b)?;
        Ok(b[0])
    }

    /// Read a `len`-byte little-endian unsigned integer (`len <= 8`)
    fn read_uint_le_at(&self, offset: u64, len: usize) -> Result<u64> {
        let mut b = [0u8; 8];
        self.read_exact_at(offset, &mut b[..len])?;
        Ok(u64::from_le_bytes(b))
    }
}

/// In-memory buffers and memory-mapped files
impl<T: AsRef<[u8]> + ?Sized> ByteSource for T {
    fn size(&self) -> u64 {
        self.as_ref().len() as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let data = self.as_ref();
        let len = buf.len();
        let truncated = || ZxipError::TruncatedRead { offset, len };
        let start = usize::try_from(offset).map_err(|_| truncated())?;
        let end = start.checked_add(len).ok_or_else(truncated)?;
        let src = data.get(start..end).ok_or_else(truncated)?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_exact_at() {
        let data = vec![1u8, 2, 3, 4, 5];
        let mut buf = [0u8; 2];
        data.read_exact_at(3, &mut buf).unwrap();
        assert_eq!(buf, [4, 5]);
        assert_eq!(data.read_u8_at(0).unwrap(), 1);
        assert_eq!(data.size(), 5);
    }

    #[test]
    fn test_read_past_end() {
        let data: &[u8] = &[1, 2, 3];
        let mut buf = [0u8; 2];
        assert!(matches!(
            data.read_exact_at(2, &mut buf),
            Err(ZxipError::TruncatedRead { offset: 2, len: 2 })
        ));
        assert!(data.read_u8_at(u64::MAX).is_err());
    }

    #[test]
    fn test_read_uint_le_at() {
        let data = [0xAAu8, 0x01, 0x02, 0x03];
        assert_eq!(data.read_uint_le_at(1, 3).unwrap(), 0x030201);
        assert_eq!(data.read_uint_le_at(0, 1).unwrap(), 0xAA);
    }
}
