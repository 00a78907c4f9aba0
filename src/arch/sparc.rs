//! SPARC capability (SPARC32 / SPARC V9)
//!
//! Capstone decodes SPARC as big-endian only, so the registry never offers
//! little-endian here.

use capstone::arch::sparc::ArchMode;
use capstone::prelude::*;
use keystone_engine::{Arch as KsArch, Mode as KsMode};

use super::{Mode, Target};
use crate::backend::decoder::CapstoneDecoder;
use crate::backend::encoder::{keystone_endian, KeystoneEncoder};
use crate::backend::{Capability, Decoder, Encoder};
use crate::error::BridgeError;

pub struct SparcCapability;

impl Capability for SparcCapability {
    fn encoder(&self, target: &Target) -> Result<Box<dyn Encoder>, BridgeError> {
        let width = match target.mode {
            Mode::Bits32 => KsMode::SPARC32,
            Mode::Bits64 => KsMode::SPARC64,
        };
        let mode = width | keystone_endian(target.endianness);
        Ok(Box::new(KeystoneEncoder::new(KsArch::SPARC, mode)?))
    }

    fn decoder(&self, target: &Target) -> Result<Box<dyn Decoder>, BridgeError> {
        let mode = match target.mode {
            Mode::Bits32 => ArchMode::Default,
            Mode::Bits64 => ArchMode::V9,
        };
        let cs = Capstone::new().sparc().mode(mode).build()?;
        Ok(Box::new(CapstoneDecoder::new(cs)))
    }

    fn min_instruction_len(&self, _mode: Mode) -> usize {
        4
    }

    fn comment_markers(&self) -> &'static [&'static str] {
        &["!"]
    }
}
