use crate::report::{self, DecodedReport};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// A file read into memory and decoded once.
#[derive(Debug)]
pub struct Binary {
    pub path: String,
    pub len: usize,
    pub report: DecodedReport,
}

impl Binary {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let buf = std::fs::read(path).with_context(|| format!("couldn't read {}", path.display()))?;
        log::debug!("read {} bytes from {}", buf.len(), path.display());
        Self::from_bytes(path.display().to_string(), &buf)
    }

    pub fn from_bytes(path: impl Into<String>, buf: &[u8]) -> Result<Self> {
        let path = path.into();
        if buf.is_empty() {
            bail!("empty file: {path}");
        }

        let report = report::decode(buf);
        let header = report.header();
        log::info!(
            "{path}: {} ({} diagnostics)",
            header.format_name(),
            header.diagnostics().len()
        );
        if header.is_partial() {
            log::warn!("{path}: header decode stopped early");
        }

        Ok(Self {
            path,
            len: buf.len(),
            report,
        })
    }
}
