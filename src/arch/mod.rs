//! Architecture module - Target identification and capability registry
//!
//! Defines the architecture/mode/endianness vocabulary shared by every
//! component, and the per-family capabilities that back the registry.

mod arm;
mod arm64;
mod mips;
mod ppc;
pub mod registry;
mod sparc;
mod x86;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;

pub use registry::{registry, ArchSpec, ArchitectureRegistry, ModeSpec, Resolved};

/// Target instruction-set family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum Architecture {
    X86,
    X86_64,
    ARM,
    ARM64,
    MIPS,
    PPC,
    SPARC,
}

impl Architecture {
    pub const ALL: [Architecture; 7] = [
        Architecture::X86,
        Architecture::X86_64,
        Architecture::ARM,
        Architecture::ARM64,
        Architecture::MIPS,
        Architecture::PPC,
        Architecture::SPARC,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Architecture::X86 => "X86",
            Architecture::X86_64 => "X86_64",
            Architecture::ARM => "ARM",
            Architecture::ARM64 => "ARM64",
            Architecture::MIPS => "MIPS",
            Architecture::PPC => "PPC",
            Architecture::SPARC => "SPARC",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x86" | "i386" | "x86_32" => Ok(Architecture::X86),
            "x86_64" | "x86-64" | "x64" | "amd64" => Ok(Architecture::X86_64),
            "arm" | "arm32" => Ok(Architecture::ARM),
            "arm64" | "aarch64" => Ok(Architecture::ARM64),
            "mips" => Ok(Architecture::MIPS),
            "ppc" | "powerpc" => Ok(Architecture::PPC),
            "sparc" => Ok(Architecture::SPARC),
            _ => Err(s.to_string()),
        }
    }
}

/// Bit width an architecture operates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Mode {
    Bits32,
    Bits64,
}

impl Mode {
    pub fn bits(&self) -> u32 {
        match self {
            Mode::Bits32 => 32,
            Mode::Bits64 => 64,
        }
    }

    /// Highest representable address in this mode
    pub fn max_address(&self) -> u64 {
        match self {
            Mode::Bits32 => u32::MAX as u64,
            Mode::Bits64 => u64::MAX,
        }
    }

    /// Hex digits needed to print any address in this mode
    pub fn address_digits(&self) -> usize {
        (self.bits() / 4) as usize
    }
}

impl TryFrom<u32> for Mode {
    type Error = u32;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(Mode::Bits32),
            64 => Ok(Mode::Bits64),
            other => Err(other),
        }
    }
}

impl From<Mode> for u32 {
    fn from(mode: Mode) -> u32 {
        mode.bits()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Byte order for multi-byte instruction words and immediates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "Little"),
            Endianness::Big => write!(f, "Big"),
        }
    }
}

impl FromStr for Endianness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "little" | "le" | "little_endian" => Ok(Endianness::Little),
            "big" | "be" | "big_endian" => Ok(Endianness::Big),
            _ => Err(s.to_string()),
        }
    }
}

/// Assembly operand syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Syntax {
    #[default]
    Intel, // mov eax, [ebx+4]
    Att,   // movl 4(%ebx), %eax
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::Intel => write!(f, "intel"),
            Syntax::Att => write!(f, "att"),
        }
    }
}

impl FromStr for Syntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intel" => Ok(Syntax::Intel),
            "att" | "at&t" | "gas" => Ok(Syntax::Att),
            _ => Err(s.to_string()),
        }
    }
}

/// A fully resolved architecture/mode/endianness/syntax tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub arch: Architecture,
    pub mode: Mode,
    pub endianness: Endianness,
    pub syntax: Syntax,
}

impl Target {
    /// Check that `len` bytes starting at `base` fit the mode's address space
    pub fn check_range(&self, base: u64, len: usize) -> Result<(), BridgeError> {
        let max = self.mode.max_address();
        if base > max {
            return Err(BridgeError::InvalidRequest(format!(
                "base address {:#x} does not fit the {} address space",
                base, self.mode
            )));
        }
        if len > 0 {
            let last = base.checked_add(len as u64 - 1);
            if last.map_or(true, |last| last > max) {
                return Err(BridgeError::InvalidRequest(format!(
                    "{} bytes at {:#x} extend past the end of the {} address space",
                    len, base, self.mode
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.arch, self.mode.bits(), self.endianness)
    }
}
