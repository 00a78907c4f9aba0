//! x86 family - X86 and X86_64 capability

use capstone::arch::x86::{ArchMode, ArchSyntax};
use capstone::prelude::*;
use keystone_engine::{Arch as KsArch, Mode as KsMode};

use super::{Mode, Syntax, Target};
use crate::backend::decoder::CapstoneDecoder;
use crate::backend::encoder::KeystoneEncoder;
use crate::backend::{Capability, Decoder, Encoder};
use crate::error::BridgeError;

pub struct X86Capability;

impl Capability for X86Capability {
    fn encoder(&self, target: &Target) -> Result<Box<dyn Encoder>, BridgeError> {
        let mode = match target.mode {
            Mode::Bits32 => KsMode::MODE_32,
            Mode::Bits64 => KsMode::MODE_64,
        };
        let encoder = KeystoneEncoder::new(KsArch::X86, mode)?.with_syntax(target.syntax)?;
        Ok(Box::new(encoder))
    }

    fn decoder(&self, target: &Target) -> Result<Box<dyn Decoder>, BridgeError> {
        let mode = match target.mode {
            Mode::Bits32 => ArchMode::Mode32,
            Mode::Bits64 => ArchMode::Mode64,
        };
        let syntax = match target.syntax {
            Syntax::Intel => ArchSyntax::Intel,
            Syntax::Att => ArchSyntax::Att,
        };
        let cs = Capstone::new().x86().mode(mode).syntax(syntax).build()?;
        Ok(Box::new(CapstoneDecoder::new(cs)))
    }

    fn min_instruction_len(&self, _mode: Mode) -> usize {
        1
    }

    fn comment_markers(&self) -> &'static [&'static str] {
        &["#"]
    }
}
