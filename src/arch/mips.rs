//! MIPS capability (MIPS32 / MIPS64)

use capstone::arch::mips::ArchMode;
use capstone::prelude::*;
use keystone_engine::{Arch as KsArch, Mode as KsMode};

use super::{Mode, Target};
use crate::backend::decoder::{capstone_endian, CapstoneDecoder};
use crate::backend::encoder::{keystone_endian, KeystoneEncoder};
use crate::backend::{Capability, Decoder, Encoder};
use crate::error::BridgeError;

pub struct MipsCapability;

impl Capability for MipsCapability {
    fn encoder(&self, target: &Target) -> Result<Box<dyn Encoder>, BridgeError> {
        let width = match target.mode {
            Mode::Bits32 => KsMode::MIPS32,
            Mode::Bits64 => KsMode::MIPS64,
        };
        let mode = width | keystone_endian(target.endianness);
        Ok(Box::new(KeystoneEncoder::new(KsArch::MIPS, mode)?))
    }

    fn decoder(&self, target: &Target) -> Result<Box<dyn Decoder>, BridgeError> {
        let mode = match target.mode {
            Mode::Bits32 => ArchMode::Mips32,
            Mode::Bits64 => ArchMode::Mips64,
        };
        let cs = Capstone::new()
            .mips()
            .mode(mode)
            .endian(capstone_endian(target.endianness))
            .build()?;
        Ok(Box::new(CapstoneDecoder::new(cs)))
    }

    fn min_instruction_len(&self, _mode: Mode) -> usize {
        4
    }

    fn comment_markers(&self) -> &'static [&'static str] {
        &["#"]
    }
}
