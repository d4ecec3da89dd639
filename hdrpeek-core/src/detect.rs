//! Container classification from leading magic bytes.

use crate::reader::{self, Endian};
use goblin::mach::fat::{FAT_CIGAM, FAT_MAGIC};
use goblin::mach::header::{MH_CIGAM, MH_CIGAM_64, MH_MAGIC, MH_MAGIC_64};
use goblin::pe::header::DOS_MAGIC;
use serde::Serialize;
use std::fmt;

/// 64-bit universal header magic, big-endian tag.
pub const FAT_MAGIC_64: u32 = 0xCAFE_BABF;
/// 64-bit universal header magic, little-endian tag.
pub const FAT_CIGAM_64: u32 = 0xBFBA_FECA;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatKind {
    Pe,
    MachO,
    FatMachO,
    Unknown,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatKind::Pe => "PE",
            FormatKind::MachO => "Mach-O",
            FormatKind::FatMachO => "Mach-O FAT",
            FormatKind::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Byte order and word size selected by a Mach-O or FAT magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub endian: Endian,
    pub is_64: bool,
}

/// Leading magic read big-endian, the way every magic table here is written.
pub fn leading_magic(buf: &[u8]) -> Option<u32> {
    reader::read_u32_be(buf, 0).ok()
}

pub fn macho_layout(magic: u32) -> Option<Layout> {
    let (endian, is_64) = match magic {
        MH_MAGIC => (Endian::Big, false),
        MH_CIGAM => (Endian::Little, false),
        MH_MAGIC_64 => (Endian::Big, true),
        MH_CIGAM_64 => (Endian::Little, true),
        _ => return None,
    };
    Some(Layout { endian, is_64 })
}

pub fn fat_layout(magic: u32) -> Option<Layout> {
    let (endian, is_64) = match magic {
        FAT_MAGIC => (Endian::Big, false),
        FAT_CIGAM => (Endian::Little, false),
        FAT_MAGIC_64 => (Endian::Big, true),
        FAT_CIGAM_64 => (Endian::Little, true),
        _ => return None,
    };
    Some(Layout { endian, is_64 })
}

/// Classifies `buf`. Total: anything unrecognised is `Unknown`.
///
/// The 4-byte FAT and Mach-O magics are unambiguous and go first; `MZ` is a
/// 2-byte fallback.
pub fn detect(buf: &[u8]) -> FormatKind {
    if buf.len() < 2 {
        return FormatKind::Unknown;
    }
    if let Some(magic) = leading_magic(buf) {
        if fat_layout(magic).is_some() {
            return FormatKind::FatMachO;
        }
        if macho_layout(magic).is_some() {
            return FormatKind::MachO;
        }
    }
    match reader::read_u16_le(buf, 0) {
        Ok(DOS_MAGIC) => FormatKind::Pe,
        _ => FormatKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_buffers_are_unknown() {
        assert_eq!(detect(&[]), FormatKind::Unknown);
        assert_eq!(detect(b"M"), FormatKind::Unknown);
    }

    #[test]
    fn mz_is_pe_even_without_room_for_a_magic() {
        assert_eq!(detect(b"MZ"), FormatKind::Pe);
        assert_eq!(detect(b"MZ\x90"), FormatKind::Pe);
        assert_eq!(detect(b"ZM\x00\x00"), FormatKind::Unknown);
    }

    #[test]
    fn fat_magics() {
        for magic in [0xCAFE_BABEu32, 0xBEBA_FECA, 0xCAFE_BABF, 0xBFBA_FECA] {
            assert_eq!(detect(&magic.to_be_bytes()), FormatKind::FatMachO);
        }
    }

    #[test]
    fn macho_magics() {
        for magic in [0xFEED_FACEu32, 0xCEFA_EDFE, 0xFEED_FACF, 0xCFFA_EDFE] {
            assert_eq!(detect(&magic.to_be_bytes()), FormatKind::MachO);
        }
    }

    #[test]
    fn layouts_follow_the_magic() {
        let le64 = macho_layout(0xCFFA_EDFE).unwrap();
        assert_eq!(le64.endian, Endian::Little);
        assert!(le64.is_64);

        let be32 = macho_layout(0xFEED_FACE).unwrap();
        assert_eq!(be32.endian, Endian::Big);
        assert!(!be32.is_64);

        let fat = fat_layout(0xBFBA_FECA).unwrap();
        assert_eq!(fat.endian, Endian::Little);
        assert!(fat.is_64);

        assert!(fat_layout(0xFEED_FACE).is_none());
        assert!(macho_layout(0xCAFE_BABE).is_none());
    }

    #[test]
    fn unrelated_bytes_are_unknown() {
        assert_eq!(detect(b"\x7fELF"), FormatKind::Unknown);
        assert_eq!(leading_magic(b"\x7fELF"), Some(0x7F45_4C46));
        assert_eq!(leading_magic(b"abc"), None);
    }
}
