//! Capstone Decoder - Disassembly backend
//!
//! Decodes a single instruction per call so the caller controls how far the
//! stream advances and where it stops.

use capstone::prelude::*;

use super::{Decoder, RawInstruction};
use crate::arch::Endianness;
use crate::error::BridgeError;

impl From<capstone::Error> for BridgeError {
    fn from(err: capstone::Error) -> Self {
        BridgeError::Internal(format!("Capstone error: {}", err))
    }
}

pub struct CapstoneDecoder {
    cs: Capstone,
}

impl CapstoneDecoder {
    pub fn new(cs: Capstone) -> Self {
        Self { cs }
    }
}

impl Decoder for CapstoneDecoder {
    fn decode_one(&self, bytes: &[u8], address: u64) -> Result<RawInstruction, String> {
        let insns = self
            .cs
            .disasm_count(bytes, address, 1)
            .map_err(|e| e.to_string())?;

        let insn = insns
            .iter()
            .next()
            .ok_or_else(|| "invalid instruction encoding".to_string())?;

        Ok(RawInstruction {
            length: insn.bytes().len(),
            mnemonic: insn.mnemonic().unwrap_or("???").to_string(),
            operands: insn.op_str().unwrap_or("").to_string(),
        })
    }
}

/// Capstone byte order for an endianness
pub fn capstone_endian(endianness: Endianness) -> capstone::Endian {
    match endianness {
        Endianness::Little => capstone::Endian::Little,
        Endianness::Big => capstone::Endian::Big,
    }
}
