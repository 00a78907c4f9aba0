//! Disassembly Engine - Sequential decoder driver
//!
//! Walks the input from offset 0, asking the target's decoder for one
//! instruction at a time. Decoding stops at the first byte sequence the
//! decoder rejects; everything decoded before it is kept.

use serde::Serialize;

use crate::arch::{Architecture, ArchitectureRegistry, Endianness, Syntax};
use crate::backend::{CancelToken, Decoder};
use crate::error::{BridgeError, DisassemblyError};

/// What to disassemble and for which target
#[derive(Debug, Clone)]
pub struct DisassemblyRequest {
    pub architecture: Architecture,
    /// Bit width; `None` selects the architecture's default mode
    pub mode: Option<u32>,
    /// Byte order; `None` selects the architecture's default
    pub endianness: Option<Endianness>,
    pub syntax: Option<Syntax>,
    pub base_address: u64,
    pub bytes: Vec<u8>,
}

impl DisassemblyRequest {
    pub fn new(architecture: Architecture, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            architecture,
            mode: None,
            endianness: None,
            syntax: None,
            base_address: 0,
            bytes: bytes.into(),
        }
    }

    pub fn mode(mut self, bits: u32) -> Self {
        self.mode = Some(bits);
        self
    }

    pub fn endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = Some(endianness);
        self
    }

    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn base_address(mut self, address: u64) -> Self {
        self.base_address = address;
        self
    }
}

/// A single decoded instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Address of the instruction (base address + offset)
    pub address: u64,

    /// Number of input bytes this instruction consumed
    pub length: usize,

    /// Raw bytes of the instruction
    pub bytes: Vec<u8>,

    pub mnemonic: String,

    pub operands: String,
}

impl Instruction {
    /// `mnemonic operands`, without trailing blanks for operand-less instructions
    pub fn text(&self) -> String {
        if self.operands.is_empty() {
            self.mnemonic.clone()
        } else {
            format!("{} {}", self.mnemonic, self.operands)
        }
    }

    /// `0x00001000: mov eax, ebx`, address padded to `digits` hex digits
    pub fn format_line(&self, digits: usize) -> String {
        format!("0x{:0width$x}: {}", self.address, self.text(), width = digits)
    }

    /// Address, raw bytes and text, for listings
    pub fn format_full(&self) -> String {
        format!(
            "{:016X} | {:<24} | {}",
            self.address,
            hex::encode(&self.bytes),
            self.text()
        )
    }
}

/// Decoded instructions plus the reason decoding stopped early, if it did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disassembly {
    pub instructions: Vec<Instruction>,

    /// Hex digits used when printing addresses for this target
    pub address_digits: usize,

    /// Set when the input could not be decoded to the end
    pub error: Option<DisassemblyError>,
}

impl Disassembly {
    /// Bytes covered by the decoded instructions
    pub fn decoded_len(&self) -> usize {
        self.instructions.iter().map(|insn| insn.length).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// One self-describing line per instruction
    pub fn lines(&self) -> Vec<String> {
        self.instructions
            .iter()
            .map(|insn| insn.format_line(self.address_digits))
            .collect()
    }

    /// Format instructions as a table (for display)
    pub fn format_listing(&self) -> String {
        let mut output = String::new();
        for insn in &self.instructions {
            output.push_str(&insn.format_full());
            output.push('\n');
        }
        output
    }
}

pub struct Disassembler<'r> {
    registry: &'r ArchitectureRegistry,
    cancel: CancelToken,
}

impl<'r> Disassembler<'r> {
    pub fn new(registry: &'r ArchitectureRegistry) -> Self {
        Self {
            registry,
            cancel: CancelToken::new(),
        }
    }

    /// Stop decoding once `cancel` is set
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn disassemble(&self, request: &DisassemblyRequest) -> Result<Disassembly, BridgeError> {
        let resolved = self.registry.resolve(
            request.architecture,
            request.mode,
            request.endianness,
            request.syntax,
        )?;
        resolved
            .target
            .check_range(request.base_address, request.bytes.len())?;

        let address_digits = resolved.target.mode.address_digits();
        if request.bytes.is_empty() {
            return Ok(Disassembly {
                address_digits,
                ..Disassembly::default()
            });
        }

        let decoder = resolved.capability.decoder(&resolved.target)?;
        log::debug!(
            "Disassembling {} bytes for {} at {:#x}",
            request.bytes.len(),
            resolved.target,
            request.base_address
        );

        let mut disassembly = decode_stream(
            decoder.as_ref(),
            &request.bytes,
            request.base_address,
            resolved.min_instruction_len(),
            &self.cancel,
        );
        disassembly.address_digits = address_digits;
        Ok(disassembly)
    }
}

/// Decode `bytes` sequentially, stopping at the first undecodable offset
pub(crate) fn decode_stream(
    decoder: &dyn Decoder,
    bytes: &[u8],
    base_address: u64,
    min_instruction_len: usize,
    cancel: &CancelToken,
) -> Disassembly {
    let mut instructions = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        if cancel.is_cancelled() {
            return stopped(instructions, offset, "decoding cancelled".to_string());
        }

        let remaining = &bytes[offset..];
        let address = base_address + offset as u64;

        match decoder.decode_one(remaining, address) {
            // A zero or oversized length would stall or overrun the walk
            Ok(raw) if raw.length > 0 && raw.length <= remaining.len() => {
                instructions.push(Instruction {
                    address,
                    length: raw.length,
                    bytes: remaining[..raw.length].to_vec(),
                    mnemonic: raw.mnemonic,
                    operands: raw.operands,
                });
                offset += raw.length;
            }
            Ok(raw) => {
                return stopped(
                    instructions,
                    offset,
                    format!("decoder reported an invalid length of {} bytes", raw.length),
                );
            }
            Err(reason) => {
                let message = if remaining.len() < min_instruction_len {
                    format!(
                        "truncated instruction: {} byte(s) left, at least {} required",
                        remaining.len(),
                        min_instruction_len
                    )
                } else {
                    reason
                };
                return stopped(instructions, offset, message);
            }
        }
    }

    Disassembly {
        instructions,
        ..Disassembly::default()
    }
}

fn stopped(instructions: Vec<Instruction>, offset: usize, message: String) -> Disassembly {
    log::debug!("Decoding stopped at offset {:#x}: {}", offset, message);
    Disassembly {
        instructions,
        address_digits: 0,
        error: Some(DisassemblyError { offset, message }),
    }
}
