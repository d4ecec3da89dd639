//! Bounds-checked, endian-aware integer reads over a byte buffer.
//!
//! Every read checks `offset + width <= buffer.len()` before touching memory
//! and reports `ReadError::OutOfBounds` otherwise. Callers decide whether a
//! failed read ends their decode.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// The requested region extends past the end of the buffer.
    #[error("out of bounds: {width} bytes at offset {offset:#x} (buffer is {len} bytes)")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },
}

/// Byte order of a container, resolved from its magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn read_u32(self, buf: &[u8], offset: usize) -> Result<u32, ReadError> {
        match self {
            Endian::Little => read_u32_le(buf, offset),
            Endian::Big => read_u32_be(buf, offset),
        }
    }

    /// 64-bit read as laid out in FAT64 architecture entries.
    ///
    /// Little-endian containers use a plain `le64`; big-endian containers
    /// compose the value from two big-endian 32-bit halves, high half first.
    pub fn read_u64(self, buf: &[u8], offset: usize) -> Result<u64, ReadError> {
        match self {
            Endian::Little => read_u64_le(buf, offset),
            Endian::Big => read_u64_be_halves(buf, offset),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Endian::Little => "little",
            Endian::Big => "big",
        }
    }
}

/// Returns true if `len` bytes starting at `offset` lie inside `buf`.
pub fn has(buf: &[u8], offset: usize, len: usize) -> bool {
    offset
        .checked_add(len)
        .is_some_and(|end| end <= buf.len())
}

fn region(buf: &[u8], offset: usize, width: usize) -> Result<&[u8], ReadError> {
    if !has(buf, offset, width) {
        return Err(ReadError::OutOfBounds {
            offset,
            width,
            len: buf.len(),
        });
    }
    Ok(&buf[offset..offset + width])
}

pub fn read_u16_le(buf: &[u8], offset: usize) -> Result<u16, ReadError> {
    region(buf, offset, 2).map(LittleEndian::read_u16)
}

pub fn read_u16_be(buf: &[u8], offset: usize) -> Result<u16, ReadError> {
    region(buf, offset, 2).map(BigEndian::read_u16)
}

pub fn read_u32_le(buf: &[u8], offset: usize) -> Result<u32, ReadError> {
    region(buf, offset, 4).map(LittleEndian::read_u32)
}

pub fn read_u32_be(buf: &[u8], offset: usize) -> Result<u32, ReadError> {
    region(buf, offset, 4).map(BigEndian::read_u32)
}

pub fn read_u64_le(buf: &[u8], offset: usize) -> Result<u64, ReadError> {
    region(buf, offset, 8).map(LittleEndian::read_u64)
}

/// `(be32(offset) << 32) | be32(offset + 4)`.
///
/// The whole 8-byte region is checked up front so a half-present field never
/// yields a partial value.
pub fn read_u64_be_halves(buf: &[u8], offset: usize) -> Result<u64, ReadError> {
    let bytes = region(buf, offset, 8)?;
    let high = BigEndian::read_u32(&bytes[..4]) as u64;
    let low = BigEndian::read_u32(&bytes[4..]) as u64;
    Ok((high << 32) | low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_and_big_endian_reads() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(read_u16_le(&buf, 0), Ok(0x0201));
        assert_eq!(read_u16_be(&buf, 0), Ok(0x0102));
        assert_eq!(read_u32_le(&buf, 4), Ok(0x0807_0605));
        assert_eq!(read_u32_be(&buf, 4), Ok(0x0506_0708));
        assert_eq!(read_u64_le(&buf, 0), Ok(0x0807_0605_0403_0201));
    }

    #[test]
    fn out_of_bounds_is_reported_not_read() {
        let buf = [0u8; 6];
        assert_eq!(
            read_u32_le(&buf, 3),
            Err(ReadError::OutOfBounds {
                offset: 3,
                width: 4,
                len: 6
            })
        );
        assert!(read_u64_le(&buf, 0).is_err());
        assert!(read_u16_be(&buf, 5).is_err());
        assert!(read_u16_be(&buf, 4).is_ok());
    }

    #[test]
    fn has_handles_overflowing_offsets() {
        let buf = [0u8; 4];
        assert!(has(&buf, 0, 4));
        assert!(has(&buf, 4, 0));
        assert!(!has(&buf, 1, 4));
        assert!(!has(&buf, usize::MAX, 2));
        assert!(read_u32_be(&buf, usize::MAX - 1).is_err());
    }

    #[test]
    fn fat64_halves_match_native_big_endian_u64() {
        let value = 0x0011_2233_4455_6677u64;
        let buf = value.to_be_bytes();
        assert_eq!(read_u64_be_halves(&buf, 0), Ok(value));
        assert_eq!(Endian::Big.read_u64(&buf, 0), Ok(value));

        // The same bytes read from a little-endian container are a plain le64.
        assert_eq!(Endian::Little.read_u64(&buf, 0), Ok(value.swap_bytes()));
    }

    #[test]
    fn fat64_halves_require_all_eight_bytes() {
        let buf = [0xFFu8; 7];
        assert!(read_u64_be_halves(&buf, 0).is_err());
        assert!(Endian::Little.read_u64(&buf, 0).is_err());
    }
}
