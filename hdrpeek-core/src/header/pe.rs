//! PE header walk: DOS stub, PE signature, COFF header, optional-header magic.

use crate::header::Header;
use crate::reader::{self, ReadError};
use crate::{Diagnostic, Issue};
use chrono::{DateTime, Utc};
use goblin::pe::header::PE_MAGIC;
use goblin::pe::optional_header::{MAGIC_32, MAGIC_64};
use serde::Serialize;

/// Offset of `e_lfanew` inside the DOS header.
pub const PE_POINTER_OFFSET: usize = 0x3C;
/// Size of the COFF file header.
pub const COFF_HEADER_SIZE: usize = 20;

/// How far the decoder got. Any failure stops at the last stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeStage {
    Start,
    DosStubChecked,
    PeSigChecked,
    CoffRead,
    OptHeaderRead,
}

/// COFF file header fields, all little-endian on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoffHeader {
    pub machine: u16,
    pub number_of_sections: u16,
    /// Seconds since the Unix epoch.
    pub time_date_stamp: u32,
    pub size_of_optional_header: u16,
    pub characteristics: u16,
}

impl CoffHeader {
    pub fn parse(buf: &[u8], offset: usize) -> Result<Self, ReadError> {
        Ok(Self {
            machine: reader::read_u16_le(buf, offset)?,
            number_of_sections: reader::read_u16_le(buf, offset + 2)?,
            time_date_stamp: reader::read_u32_le(buf, offset + 4)?,
            size_of_optional_header: reader::read_u16_le(buf, offset + 16)?,
            characteristics: reader::read_u16_le(buf, offset + 18)?,
        })
    }

    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.time_date_stamp), 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionalKind {
    Pe32,
    Pe32Plus,
    Unknown,
}

impl OptionalKind {
    pub fn from_magic(magic: u16) -> Self {
        match magic {
            MAGIC_32 => OptionalKind::Pe32,
            MAGIC_64 => OptionalKind::Pe32Plus,
            _ => OptionalKind::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OptionalKind::Pe32 => "PE32",
            OptionalKind::Pe32Plus => "PE32+",
            OptionalKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionalMagic {
    pub magic: u16,
    pub kind: OptionalKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeReport {
    pub stage: PeStage,
    pub e_lfanew: Option<u32>,
    pub coff: Option<CoffHeader>,
    pub optional_magic: Option<OptionalMagic>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PeReport {
    fn new() -> Self {
        Self {
            stage: PeStage::Start,
            e_lfanew: None,
            coff: None,
            optional_magic: None,
            diagnostics: Vec::new(),
        }
    }

    fn halt(mut self, issue: Issue) -> Self {
        log::warn!("PE decode stopped after {:?}: {issue}", self.stage);
        self.diagnostics.push(Diagnostic::fatal(issue));
        self
    }
}

impl Header for PeReport {
    fn format_name(&self) -> &'static str {
        "PE"
    }

    fn is_64(&self) -> Option<bool> {
        match self.optional_magic?.kind {
            OptionalKind::Pe32 => Some(false),
            OptionalKind::Pe32Plus => Some(true),
            OptionalKind::Unknown => None,
        }
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Decodes the PE headers of a buffer already classified as PE.
///
/// Each stage is gated on the previous one. A failure records a fatal
/// diagnostic and returns what was read so far.
pub fn decode(buf: &[u8]) -> PeReport {
    let mut report = PeReport::new();

    let Ok(e_lfanew) = reader::read_u32_le(buf, PE_POINTER_OFFSET) else {
        return report.halt(Issue::DosHeaderTruncated);
    };
    report.e_lfanew = Some(e_lfanew);
    report.stage = PeStage::DosStubChecked;

    let sig_offset = e_lfanew as usize;
    let Ok(signature) = reader::read_u32_le(buf, sig_offset) else {
        return report.halt(Issue::InvalidLfanew { e_lfanew });
    };
    if signature != PE_MAGIC {
        return report.halt(Issue::PeSignatureMissing { e_lfanew });
    }
    report.stage = PeStage::PeSigChecked;

    let coff_offset = sig_offset + 4;
    if !reader::has(buf, coff_offset, COFF_HEADER_SIZE) {
        return report.halt(Issue::IncompleteCoffHeader);
    }
    match CoffHeader::parse(buf, coff_offset) {
        Ok(coff) => report.coff = Some(coff),
        Err(_) => return report.halt(Issue::IncompleteCoffHeader),
    }
    report.stage = PeStage::CoffRead;

    // A missing optional header is not an error; the magic is simply absent.
    if let Ok(magic) = reader::read_u16_le(buf, coff_offset + COFF_HEADER_SIZE) {
        report.optional_magic = Some(OptionalMagic {
            magic,
            kind: OptionalKind::from_magic(magic),
        });
        report.stage = PeStage::OptHeaderRead;
    }

    log::debug!("PE decode reached {:?}", report.stage);
    report
}
