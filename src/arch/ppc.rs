//! PowerPC capability (PPC32 / PPC64)

use capstone::arch::ppc::ArchMode;
use capstone::prelude::*;
use keystone_engine::{Arch as KsArch, Mode as KsMode};

use super::{Mode, Target};
use crate::backend::decoder::{capstone_endian, CapstoneDecoder};
use crate::backend::encoder::{keystone_endian, KeystoneEncoder};
use crate::backend::{Capability, Decoder, Encoder};
use crate::error::BridgeError;

pub struct PpcCapability;

impl Capability for PpcCapability {
    fn encoder(&self, target: &Target) -> Result<Box<dyn Encoder>, BridgeError> {
        let width = match target.mode {
            Mode::Bits32 => KsMode::PPC32,
            Mode::Bits64 => KsMode::PPC64,
        };
        let mode = width | keystone_endian(target.endianness);
        Ok(Box::new(KeystoneEncoder::new(KsArch::PPC, mode)?))
    }

    fn decoder(&self, target: &Target) -> Result<Box<dyn Decoder>, BridgeError> {
        let mode = match target.mode {
            Mode::Bits32 => ArchMode::Mode32,
            Mode::Bits64 => ArchMode::Mode64,
        };
        let cs = Capstone::new()
            .ppc()
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
