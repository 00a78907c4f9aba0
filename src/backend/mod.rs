//! Backend module - Encoder/decoder capability seam
//!
//! Each architecture family provides a [`Capability`] that builds a fresh
//! encoder and decoder for a resolved [`Target`]. The assembler and
//! disassembler only ever talk to these traits.

pub mod decoder;
pub mod encoder;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::arch::{Mode, Target};
use crate::error::BridgeError;

/// Shared stop flag for a running job
///
/// Set by the caller once it stops waiting; long loops poll it between
/// backend calls and bail out early.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One instruction as reported by a decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInstruction {
    pub length: usize,
    pub mnemonic: String,
    pub operands: String,
}

/// Turns assembly source into machine code
pub trait Encoder {
    /// Encode `source` as if it were placed at `address`
    fn encode(&self, source: &str, address: u64) -> Result<Vec<u8>, String>;
}

/// Decodes machine code one instruction at a time
pub trait Decoder {
    /// Decode the instruction at the start of `bytes`, located at `address`
    fn decode_one(&self, bytes: &[u8], address: u64) -> Result<RawInstruction, String>;
}

/// Encode/decode capability of one architecture family
pub trait Capability: Send + Sync {
    fn encoder(&self, target: &Target) -> Result<Box<dyn Encoder>, BridgeError>;

    fn decoder(&self, target: &Target) -> Result<Box<dyn Decoder>, BridgeError>;

    /// Smallest encoded instruction, in bytes
    fn min_instruction_len(&self, mode: Mode) -> usize;

    /// Markers that start a comment running to end of line
    fn comment_markers(&self) -> &'static [&'static str];
}
