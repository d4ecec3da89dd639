use crate::detect::{self, FormatKind};
use crate::header::fat::{self, FatReport};
use crate::header::macho::{self, MachOReport};
use crate::header::pe::{self, PeReport};
use crate::header::Header;
use crate::Diagnostic;
use serde::Serialize;

/// Nothing matched. Carries the leading magic for display when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownReport {
    pub magic: Option<u32>,
}

impl Header for UnknownReport {
    fn format_name(&self) -> &'static str {
        "UNKNOWN"
    }

    fn is_64(&self) -> Option<bool> {
        None
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &[]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format")]
pub enum DecodedReport {
    #[serde(rename = "pe")]
    Pe(PeReport),
    #[serde(rename = "macho")]
    MachO(MachOReport),
    #[serde(rename = "fat")]
    FatMachO(FatReport),
    #[serde(rename = "unknown")]
    Unknown(UnknownReport),
}

impl DecodedReport {
    pub fn kind(&self) -> FormatKind {
        match self {
            DecodedReport::Pe(_) => FormatKind::Pe,
            DecodedReport::MachO(_) => FormatKind::MachO,
            DecodedReport::FatMachO(_) => FormatKind::FatMachO,
            DecodedReport::Unknown(_) => FormatKind::Unknown,
        }
    }

    pub fn header(&self) -> &dyn Header {
        match self {
            DecodedReport::Pe(r) => r,
            DecodedReport::MachO(r) => r,
            DecodedReport::FatMachO(r) => r,
            DecodedReport::Unknown(r) => r,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.header().diagnostics()
    }

    pub fn is_partial(&self) -> bool {
        self.header().is_partial()
    }
}

/// Classifies `buf` and runs the matching decoder over it.
///
/// Pure: the buffer is only read, never past its end, and nothing outside
/// the call is touched.
pub fn decode(buf: &[u8]) -> DecodedReport {
    let kind = detect::detect(buf);
    log::debug!("detected {kind} in {} bytes", buf.len());

    let magic = detect::leading_magic(buf);
    match kind {
        FormatKind::Pe => DecodedReport::Pe(pe::decode(buf)),
        FormatKind::MachO => match magic.and_then(detect::macho_layout) {
            Some(layout) => DecodedReport::MachO(macho::decode(buf, layout)),
            None => DecodedReport::Unknown(UnknownReport { magic }),
        },
        FormatKind::FatMachO => match magic.and_then(detect::fat_layout) {
            Some(layout) => DecodedReport::FatMachO(fat::decode(buf, layout)),
            None => DecodedReport::Unknown(UnknownReport { magic }),
        },
        FormatKind::Unknown => DecodedReport::Unknown(UnknownReport { magic }),
    }
}
