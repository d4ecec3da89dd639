//! Universal (FAT) header and its per-architecture entries.

use crate::detect::Layout;
use crate::header::Header;
use crate::reader::{self, Endian, ReadError};
use crate::{CpuType, Diagnostic, Issue};
use serde::Serialize;

/// Entries start right after `magic` and `nfat_arch`.
pub const FAT_ARCH_OFFSET: usize = 8;
pub const FAT_ARCH_SIZE: usize = 20;
pub const FAT_ARCH_64_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FatArch {
    pub index: u32,
    pub cputype: u32,
    pub cpu: CpuType,
    pub cpusubtype: u32,
    pub offset: u64,
    pub size: u64,
    pub align: u32,
}

impl FatArch {
    /// Reads one entry at `at`. The caller has checked the full stride.
    ///
    /// `fat_arch`:    cputype cpusubtype offset(4) size(4) align
    /// `fat_arch_64`: cputype cpusubtype offset(8) size(8) align reserved
    fn parse(buf: &[u8], at: usize, index: u32, layout: Layout) -> Result<Self, ReadError> {
        let endian = layout.endian;
        let cputype = endian.read_u32(buf, at)?;
        let cpusubtype = endian.read_u32(buf, at + 4)?;
        let (offset, size, align) = if layout.is_64 {
            (
                endian.read_u64(buf, at + 8)?,
                endian.read_u64(buf, at + 16)?,
                endian.read_u32(buf, at + 24)?,
            )
        } else {
            (
                u64::from(endian.read_u32(buf, at + 8)?),
                u64::from(endian.read_u32(buf, at + 12)?),
                endian.read_u32(buf, at + 16)?,
            )
        };
        Ok(Self {
            index,
            cputype,
            cpu: CpuType::from_u32(cputype),
            cpusubtype,
            offset,
            size,
            align,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FatReport {
    pub endian: Endian,
    pub is_64: bool,
    pub nfat_arch: Option<u32>,
    pub arches: Vec<FatArch>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Header for FatReport {
    fn format_name(&self) -> &'static str {
        "Mach-O FAT"
    }

    fn is_64(&self) -> Option<bool> {
        Some(self.is_64)
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn stride(layout: Layout) -> usize {
    if layout.is_64 {
        FAT_ARCH_64_SIZE
    } else {
        FAT_ARCH_SIZE
    }
}

/// Decodes the universal header and as many architecture entries as fit.
///
/// The first short entry ends the walk with a fatal diagnostic carrying its
/// index; entries before it are kept. Work is bounded by the buffer, not by
/// `nfat_arch`.
pub fn decode(buf: &[u8], layout: Layout) -> FatReport {
    let mut report = FatReport {
        endian: layout.endian,
        is_64: layout.is_64,
        nfat_arch: None,
        arches: Vec::new(),
        diagnostics: Vec::new(),
    };

    let Ok(nfat_arch) = layout.endian.read_u32(buf, 4) else {
        log::warn!("universal header has no architecture count");
        report
            .diagnostics
            .push(Diagnostic::fatal(Issue::FatHeaderTruncated));
        return report;
    };
    report.nfat_arch = Some(nfat_arch);

    let stride = stride(layout);
    for index in 0..nfat_arch {
        let at = (index as usize)
            .checked_mul(stride)
            .and_then(|rel| rel.checked_add(FAT_ARCH_OFFSET));
        let entry = match at {
            Some(at) if reader::has(buf, at, stride) => FatArch::parse(buf, at, index, layout).ok(),
            _ => None,
        };
        let Some(entry) = entry else {
            log::warn!("architecture [{index}] of {nfat_arch} is truncated");
            report
                .diagnostics
                .push(Diagnostic::fatal(Issue::FatArchTruncated { index }));
            break;
        };
        report.arches.push(entry);
    }

    log::debug!(
        "decoded {} of {nfat_arch} universal architectures",
        report.arches.len()
    );
    report
}
