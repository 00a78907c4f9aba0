//! Keystone Encoder - Assembly backend
//!
//! Wraps a Keystone instance configured for one target.

use keystone_engine::{Arch as KsArch, Keystone, Mode as KsMode, OptionType, OptionValue};

use super::Encoder;
use crate::arch::{Endianness, Syntax};
use crate::error::BridgeError;

pub struct KeystoneEncoder {
    ks: Keystone,
}

impl KeystoneEncoder {
    pub fn new(arch: KsArch, mode: KsMode) -> Result<Self, BridgeError> {
        let ks = Keystone::new(arch, mode).map_err(|e| {
            BridgeError::Internal(format!("Failed to create Keystone instance: {}", e))
        })?;
        Ok(Self { ks })
    }

    /// Select the operand syntax (x86 only)
    pub fn with_syntax(self, syntax: Syntax) -> Result<Self, BridgeError> {
        let value = match syntax {
            Syntax::Intel => OptionValue::SYNTAX_INTEL,
            Syntax::Att => OptionValue::SYNTAX_ATT,
        };
        self.ks.option(OptionType::SYNTAX, value).map_err(|e| {
            BridgeError::Internal(format!("Failed to set Keystone syntax {}: {}", syntax, e))
        })?;
        Ok(self)
    }
}

impl Encoder for KeystoneEncoder {
    fn encode(&self, source: &str, address: u64) -> Result<Vec<u8>, String> {
        self.ks
            .asm(source.to_string(), address)
            .map(|result| result.bytes)
            .map_err(|e| format!("Keystone error: {}", e))
    }
}

/// Keystone mode bits for a byte order
pub fn keystone_endian(endianness: Endianness) -> KsMode {
    match endianness {
        Endianness::Little => KsMode::LITTLE_ENDIAN,
        Endianness::Big => KsMode::BIG_ENDIAN,
    }
}
