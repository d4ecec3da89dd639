use colored::Colorize;
use hdrpeek_core::header::fat::FatReport;
use hdrpeek_core::header::macho::{self, MachOReport};
use hdrpeek_core::header::pe::PeReport;
use hdrpeek_core::{Binary, DecodedReport, Diagnostic, Severity, UnknownReport};
use std::io::{self, Write};
use tabled::{Table, Tabled, settings::Style};

/// Text rendering of a decoded binary. `verbose` is passed in explicitly.
pub fn text<W: Write>(out: &mut W, bin: &Binary, verbose: bool) -> io::Result<()> {
    writeln!(out, "file: {}", bin.path)?;
    match &bin.report {
        DecodedReport::Pe(pe) => render_pe(out, pe)?,
        DecodedReport::MachO(m) => render_macho(out, m)?,
        DecodedReport::FatMachO(fat) => render_fat(out, fat)?,
        DecodedReport::Unknown(unknown) => render_unknown(out, unknown, verbose)?,
    }
    for d in bin.report.diagnostics() {
        render_diagnostic(out, d)?;
    }
    Ok(())
}

pub fn json<W: Write>(out: &mut W, bin: &Binary) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &bin.report)?;
    writeln!(out)?;
    Ok(())
}

fn render_diagnostic<W: Write>(out: &mut W, d: &Diagnostic) -> io::Result<()> {
    let tag = match d.severity {
        Severity::Info => "note:".yellow(),
        Severity::Fatal => "error:".red(),
    };
    writeln!(out, "{tag} {}", d.message)
}

fn render_pe<W: Write>(out: &mut W, pe: &PeReport) -> io::Result<()> {
    writeln!(out, "type: PE")?;
    let Some(coff) = pe.coff else {
        return Ok(());
    };
    writeln!(out, "machine: {:#x}", coff.machine)?;
    writeln!(out, "sections: {}", coff.number_of_sections)?;
    match coff.timestamp_utc() {
        Some(ts) => writeln!(
            out,
            "timestamp: {} (unix epoch, {})",
            coff.time_date_stamp,
            ts.format("%Y-%m-%d %H:%M:%S UTC")
        )?,
        None => writeln!(out, "timestamp: {} (unix epoch)", coff.time_date_stamp)?,
    }
    writeln!(out, "opt_hdr_size: {}", coff.size_of_optional_header)?;
    writeln!(out, "characteristics: {:#x}", coff.characteristics)?;
    if let Some(opt) = pe.optional_magic {
        writeln!(out, "opt_magic: {:#x} ({})", opt.magic, opt.kind.name())?;
    }
    Ok(())
}

fn render_macho<W: Write>(out: &mut W, m: &MachOReport) -> io::Result<()> {
    writeln!(
        out,
        "type: Mach-O {} ({})",
        if m.is_64 { 64 } else { 32 },
        m.endian.as_str()
    )?;
    writeln!(out, "cputype: {} ({:#x})", m.cpu, m.cputype)?;
    match macho::filetype_name(m.filetype) {
        Some(name) => writeln!(out, "filetype: {} ({name})", m.filetype)?,
        None => writeln!(out, "filetype: {}", m.filetype)?,
    }
    writeln!(out, "ncmds: {}  sizeofcmds: {}", m.ncmds, m.sizeofcmds)?;
    writeln!(out, "flags: {:#x}", m.flags)
}

#[derive(Tabled)]
struct ArchRow {
    #[tabled(rename = "#")]
    index: u32,
    cpu: String,
    cputype: String,
    cpusub: String,
    offset: u64,
    size: u64,
    align: u32,
}

fn render_fat<W: Write>(out: &mut W, fat: &FatReport) -> io::Result<()> {
    writeln!(
        out,
        "type: Mach-O FAT (Universal{}, {})",
        if fat.is_64 { ", 64" } else { "" },
        fat.endian.as_str()
    )?;
    let Some(count) = fat.nfat_arch else {
        return Ok(());
    };
    writeln!(out, "architectures: {count}")?;
    if fat.arches.is_empty() {
        return Ok(());
    }

    let rows = fat.arches.iter().map(|a| ArchRow {
        index: a.index,
        cpu: a.cpu.to_string(),
        cputype: format!("{:#x}", a.cputype),
        cpusub: format!("{:#x}", a.cpusubtype),
        offset: a.offset,
        size: a.size,
        align: a.align,
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    writeln!(out, "{table}")
}

fn render_unknown<W: Write>(out: &mut W, unknown: &UnknownReport, verbose: bool) -> io::Result<()> {
    writeln!(out, "type: UNKNOWN")?;
    if verbose {
        if let Some(magic) = unknown.magic {
            writeln!(out, "magic(first4): {magic:#010x}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bytes: &[u8], verbose: bool) -> String {
        colored::control::set_override(false);
        let bin = Binary::from_bytes("sample.bin", bytes).unwrap();
        let mut out = Vec::new();
        text(&mut out, &bin, verbose).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn unknown_magic_only_when_verbose() {
        let quiet = render(b"\x7fELF", false);
        assert!(quiet.contains("type: UNKNOWN"));
        assert!(!quiet.contains("magic(first4)"));

        let loud = render(b"\x7fELF", true);
        assert!(loud.contains("magic(first4): 0x7f454c46"));
    }

    #[test]
    fn macho_lines() {
        let mut buf = 0xCFFA_EDFEu32.to_be_bytes().to_vec();
        for v in [0x0100_0007u32, 3, 2, 15, 1200, 0x85] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        let text = render(&buf, false);
        assert!(text.contains("type: Mach-O 64 (little)"));
        assert!(text.contains("cputype: x86_64 (0x1000007)"));
        assert!(text.contains("filetype: 2 (executable)"));
        assert!(text.contains("ncmds: 15  sizeofcmds: 1200"));
        assert!(text.contains("flags: 0x85"));
    }

    #[test]
    fn fat_table_and_truncation() {
        let mut buf = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 2];
        buf.extend_from_slice(&12u32.to_be_bytes());
        buf.extend_from_slice(&[0u8; 16]);
        let text = render(&buf, false);
        assert!(text.contains("architectures: 2"));
        assert!(text.contains("arm"));
        assert!(text.contains("error: architecture [1] truncated"));
    }

    #[test]
    fn pe_stops_with_error_line() {
        let text = render(b"MZ", false);
        assert!(text.contains("type: PE"));
        assert!(!text.contains("machine:"));
        assert!(text.contains("error: too small for DOS header"));
    }
}
