use goblin::mach::cputype::{
    CPU_TYPE_ARM, CPU_TYPE_ARM64, CPU_TYPE_POWERPC, CPU_TYPE_POWERPC64, CPU_TYPE_X86,
    CPU_TYPE_X86_64,
};
use serde::Serialize;
use std::fmt;

/// Mach-O CPU type, as stored in `cputype` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuType {
    X86,
    X86_64,
    Arm,
    Arm64,
    Ppc,
    Ppc64,
    Unknown,
}

impl CpuType {
    pub fn from_u32(value: u32) -> Self {
        match value {
            CPU_TYPE_X86 => CpuType::X86,
            CPU_TYPE_X86_64 => CpuType::X86_64,
            CPU_TYPE_ARM => CpuType::Arm,
            CPU_TYPE_ARM64 => CpuType::Arm64,
            CPU_TYPE_POWERPC => CpuType::Ppc,
            CPU_TYPE_POWERPC64 => CpuType::Ppc64,
            _ => CpuType::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CpuType::X86 => "x86",
            CpuType::X86_64 => "x86_64",
            CpuType::Arm => "arm",
            CpuType::Arm64 => "arm64",
            CpuType::Ppc => "ppc",
            CpuType::Ppc64 => "ppc64",
            CpuType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes() {
        let cases = [
            (7, "x86"),
            (0x0100_0007, "x86_64"),
            (12, "arm"),
            (0x0100_000C, "arm64"),
            (18, "ppc"),
            (0x0100_0012, "ppc64"),
        ];
        for (code, name) in cases {
            assert_eq!(CpuType::from_u32(code).name(), name, "code {code:#x}");
        }
    }

    #[test]
    fn unmapped_codes_are_unknown() {
        assert_eq!(CpuType::from_u32(0), CpuType::Unknown);
        // arm64_32 is a real code but outside the mapped set
        assert_eq!(CpuType::from_u32(0x0200_000C), CpuType::Unknown);
        assert_eq!(CpuType::from_u32(u32::MAX).to_string(), "unknown");
    }
}
