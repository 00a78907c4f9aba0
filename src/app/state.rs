//! Session state
//!
//! The bridge itself is stateless; the current target lives here and is
//! copied into every request the front-end builds.

use crate::arch::{registry, Architecture, Endianness, Syntax};
use crate::asm::AssemblyRequest;
use crate::disasm::DisassemblyRequest;

/// Target selection kept between requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub architecture: Architecture,
    /// `None` follows the architecture's default mode
    pub mode: Option<u32>,
    /// `None` follows the architecture's default byte order
    pub endianness: Option<Endianness>,
    pub syntax: Option<Syntax>,
    pub base_address: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            architecture: Architecture::X86_64,
            mode: None,
            endianness: None,
            syntax: None,
            base_address: 0,
        }
    }
}

impl Session {
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            ..Self::default()
        }
    }

    /// Switch architecture; mode and byte order fall back to its defaults
    pub fn set_architecture(&mut self, architecture: Architecture) {
        if self.architecture != architecture {
            self.mode = None;
            self.endianness = None;
        }
        self.architecture = architecture;
    }

    pub fn assembly_request(&self, source: impl Into<String>) -> AssemblyRequest {
        AssemblyRequest {
            architecture: self.architecture,
            mode: self.mode,
            endianness: self.endianness,
            syntax: self.syntax,
            base_address: self.base_address,
            source: source.into(),
        }
    }

    pub fn disassembly_request(&self, bytes: impl Into<Vec<u8>>) -> DisassemblyRequest {
        DisassemblyRequest {
            architecture: self.architecture,
            mode: self.mode,
            endianness: self.endianness,
            syntax: self.syntax,
            base_address: self.base_address,
            bytes: bytes.into(),
        }
    }

    /// `ARM/32/Little`, or the raw selection when it does not resolve
    pub fn target_label(&self) -> String {
        match registry().resolve(self.architecture, self.mode, self.endianness, self.syntax) {
            Ok(resolved) => resolved.target.to_string(),
            Err(_) => format!(
                "{}/{}/{}?",
                self.architecture,
                self.mode.map_or_else(|| "-".to_string(), |bits| bits.to_string()),
                self.endianness.map_or_else(|| "-".to_string(), |e| e.to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switching_architecture_clears_mode() {
        let mut session = Session::new(Architecture::MIPS);
        session.mode = Some(64);
        session.endianness = Some(Endianness::Big);

        session.set_architecture(Architecture::MIPS);
        assert_eq!(session.mode, Some(64));

        session.set_architecture(Architecture::SPARC);
        assert_eq!(session.mode, None);
        assert_eq!(session.endianness, None);
        assert_eq!(session.target_label(), "SPARC/32/Big");
    }

    #[test]
    fn test_requests_carry_selection() {
        let session = Session {
            base_address: 0x1000,
            ..Session::new(Architecture::ARM)
        };
        let request = session.disassembly_request(vec![0u8; 4]);
        assert_eq!(request.architecture, Architecture::ARM);
        assert_eq!(request.base_address, 0x1000);
        assert_eq!(session.assembly_request("nop").source, "nop");
    }

    #[test]
    fn test_unresolvable_label() {
        let mut session = Session::new(Architecture::X86);
        session.endianness = Some(Endianness::Big);
        assert_eq!(session.target_label(), "X86/-/Big?");
    }
}
