use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Decoding continued; a field may carry a default.
    Info,
    /// Decoding stopped here; later fields are absent.
    Fatal,
}

/// Something noticed while walking a header.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    #[error("too small for DOS header")]
    DosHeaderTruncated,

    #[error("invalid e_lfanew {e_lfanew:#x}")]
    InvalidLfanew { e_lfanew: u32 },

    #[error("MZ found but PE signature missing at e_lfanew {e_lfanew:#x}")]
    PeSignatureMissing { e_lfanew: u32 },

    #[error("incomplete COFF header")]
    IncompleteCoffHeader,

    #[error("mach header field {field} truncated, reported as 0")]
    MachFieldTruncated { field: &'static str },

    #[error("truncated fat header")]
    FatHeaderTruncated,

    #[error("architecture [{index}] truncated")]
    FatArchTruncated { index: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub issue: Issue,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, issue: Issue) -> Self {
        let message = issue.to_string();
        Self {
            severity,
            issue,
            message,
        }
    }

    pub fn info(issue: Issue) -> Self {
        Self::new(Severity::Info, issue)
    }

    pub fn fatal(issue: Issue) -> Self {
        Self::new(Severity::Fatal, issue)
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "note",
            Severity::Fatal => "error",
        };
        write!(f, "{tag}: {}", self.message)
    }
}
