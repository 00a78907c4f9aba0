//! ARM (A32) capability

use capstone::arch::arm::ArchMode;
use capstone::prelude::*;
use keystone_engine::{Arch as KsArch, Mode as KsMode};

use super::{Mode, Target};
use crate::backend::decoder::{capstone_endian, CapstoneDecoder};
use crate::backend::encoder::{keystone_endian, KeystoneEncoder};
use crate::backend::{Capability, Decoder, Encoder};
use crate::error::BridgeError;

pub struct ArmCapability;

impl Capability for ArmCapability {
    fn encoder(&self, target: &Target) -> Result<Box<dyn Encoder>, BridgeError> {
        let mode = KsMode::ARM | keystone_endian(target.endianness);
        Ok(Box::new(KeystoneEncoder::new(KsArch::ARM, mode)?))
    }

    fn decoder(&self, target: &Target) -> Result<Box<dyn Decoder>, BridgeError> {
        let cs = Capstone::new()
            .arm()
            .mode(ArchMode::Arm)
            .endian(capstone_endian(target.endianness))
            .build()?;
        Ok(Box::new(CapstoneDecoder::new(cs)))
    }

    fn min_instruction_len(&self, _mode: Mode) -> usize {
        4
    }

    fn comment_markers(&self) -> &'static [&'static str] {
        &["@", "//"]
    }
}
