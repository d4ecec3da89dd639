pub mod binary;
pub mod cpu;
pub mod detect;
pub mod diagnostic;
pub mod header;
pub mod reader;
pub mod report;

pub use binary::*;
pub use cpu::CpuType;
pub use detect::{detect, FormatKind};
pub use diagnostic::*;
pub use header::Header;
pub use report::{decode, DecodedReport, UnknownReport};
