//! ARM64 (AArch64) capability

use capstone::arch::arm64::ArchMode;
use capstone::prelude::*;
use keystone_engine::Arch as KsArch;

use super::{Mode, Target};
use crate::backend::decoder::{capstone_endian, CapstoneDecoder};
use crate::backend::encoder::{keystone_endian, KeystoneEncoder};
use crate::backend::{Capability, Decoder, Encoder};
use crate::error::BridgeError;

pub struct Arm64Capability;

impl Capability for Arm64Capability {
    fn encoder(&self, target: &Target) -> Result<Box<dyn Encoder>, BridgeError> {
        // Keystone has no AArch64 mode bits besides byte order
        let mode = keystone_endian(target.endianness);
        Ok(Box::new(KeystoneEncoder::new(KsArch::ARM64, mode)?))
    }

    fn decoder(&self, target: &Target) -> Result<Box<dyn Decoder>, BridgeError> {
        let cs = Capstone::new()
            .arm64()
            .mode(ArchMode::Arm)
            .endian(capstone_endian(target.endianness))
            .build()?;
        Ok(Box::new(CapstoneDecoder::new(cs)))
    }

    fn min_instruction_len(&self, _mode: Mode) -> usize {
        4
    }

    fn comment_markers(&self) -> &'static [&'static str] {
        &["//"]
    }
}
