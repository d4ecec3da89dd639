//! Single-architecture Mach-O header.

use crate::detect::Layout;
use crate::header::Header;
use crate::reader::Endian;
use crate::{CpuType, Diagnostic, Issue};
use goblin::mach::header::{MH_DYLIB, MH_EXECUTE, MH_OBJECT};
use serde::Serialize;

/// Conventional name for a `filetype` value. Display only; never enforced.
///
/// 7 is reported as a bundle, matching the 1/2/6/7 legend printed next to
/// the raw value.
pub fn filetype_name(filetype: u32) -> Option<&'static str> {
    match filetype {
        MH_OBJECT => Some("object"),
        MH_EXECUTE => Some("executable"),
        MH_DYLIB => Some("dylib"),
        7 => Some("bundle"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachOReport {
    pub endian: Endian,
    pub is_64: bool,
    pub cputype: u32,
    pub cpu: CpuType,
    pub cpusubtype: u32,
    pub filetype: u32,
    pub ncmds: u32,
    pub sizeofcmds: u32,
    pub flags: u32,
    pub diagnostics: Vec<Diagnostic>,
}

impl Header for MachOReport {
    fn format_name(&self) -> &'static str {
        "Mach-O"
    }

    fn is_64(&self) -> Option<bool> {
        Some(self.is_64)
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Decodes `mach_header` / `mach_header_64`.
///
/// All six fields sit in one contiguous region, so a short buffer does not
/// stop the walk: a missing field reads as 0 and gets an info diagnostic.
/// The 64-bit trailing `reserved` word is not decoded.
pub fn decode(buf: &[u8], layout: Layout) -> MachOReport {
    let mut diagnostics = Vec::new();
    let mut field = |name: &'static str, offset: usize| -> u32 {
        layout.endian.read_u32(buf, offset).unwrap_or_else(|_| {
            diagnostics.push(Diagnostic::info(Issue::MachFieldTruncated { field: name }));
            0
        })
    };

    let cputype = field("cputype", 4);
    let cpusubtype = field("cpusubtype", 8);
    let filetype = field("filetype", 12);
    let ncmds = field("ncmds", 16);
    let sizeofcmds = field("sizeofcmds", 20);
    let flags = field("flags", 24);

    log::debug!(
        "Mach-O {} ({}): cputype {cputype:#x}, {ncmds} load commands",
        if layout.is_64 { 64 } else { 32 },
        layout.endian.as_str()
    );

    MachOReport {
        endian: layout.endian,
        is_64: layout.is_64,
        cputype,
        cpu: CpuType::from_u32(cputype),
        cpusubtype,
        filetype,
        ncmds,
        sizeofcmds,
        flags,
        diagnostics,
    }
}
