//! asmbridge - Architecture-dispatching assemble/disassemble bridge
//!
//! Front-ends send a request naming an architecture, mode, endianness and
//! base address; the bridge picks the matching Keystone/Capstone
//! configuration from a static registry and answers with a uniform
//! [`ResponseEnvelope`].

pub mod app;
pub mod arch;
pub mod asm;
pub mod backend;
pub mod bridge;
pub mod codec;
pub mod disasm;
pub mod error;
pub mod ui;

pub use arch::{registry, Architecture, Endianness, Mode, Syntax, Target};
pub use asm::{Assembler, AssemblyRequest, AssemblyResult};
pub use bridge::{BridgeConfig, BridgeService, OpKind, ResponseData, ResponseEnvelope};
pub use codec::{bytes_from_hex_text, hex_text_from_bytes, HexError};
pub use disasm::{Disassembler, Disassembly, DisassemblyRequest, Instruction};
pub use error::{AssemblyError, BridgeError, DisassemblyError, ErrorKind};
