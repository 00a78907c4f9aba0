//! Raw request validation
//!
//! Turns the loosely-typed JSON objects sent by the front-end into typed
//! requests. Field names follow the front-end (camelCase); the short
//! aliases (`arch`, `endian`, `addr`, `asmStr`) are accepted too.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::arch::{registry, Architecture, Endianness, Syntax};
use crate::asm::AssemblyRequest;
use crate::codec::bytes_from_hex_text;
use crate::disasm::DisassemblyRequest;
use crate::error::BridgeError;

/// Which backend operation a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Assemble,
    Disassemble,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Assemble => write!(f, "assemble"),
            OpKind::Disassemble => write!(f, "disassemble"),
        }
    }
}

impl FromStr for OpKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assemble" | "asm" => Ok(OpKind::Assemble),
            "disassemble" | "disasm" => Ok(OpKind::Disassemble),
            _ => Err(s.to_string()),
        }
    }
}

/// Parse an address string (supports 0x prefix and decimal)
pub fn parse_address(s: &str) -> Result<u64, std::num::ParseIntError> {
    let s = s.trim().replace('_', "");
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

/// Parse a byte-order name for `arch`
///
/// Unknown names are reported as unsupported for the requested (or default)
/// mode, the same way a known but unavailable byte order is.
pub fn parse_endianness(
    arch: Architecture,
    mode: Option<u32>,
    name: &str,
) -> Result<Endianness, BridgeError> {
    name.parse::<Endianness>().or_else(|_| {
        let spec = registry().spec(arch);
        let mode_spec = spec.mode(mode.unwrap_or(spec.default_mode.bits()))?;
        Err(BridgeError::UnsupportedEndianness {
            arch,
            mode: mode_spec.mode,
            endianness: name.to_string(),
        })
    })
}

fn invalid(message: impl Into<String>) -> BridgeError {
    BridgeError::InvalidRequest(message.into())
}

/// First of `names` present (and not null) in the object
fn field<'v>(
    obj: &'v Map<String, Value>,
    names: &[&'static str],
) -> Option<(&'static str, &'v Value)> {
    names
        .iter()
        .find_map(|name| obj.get(*name).filter(|v| !v.is_null()).map(|v| (*name, v)))
}

fn string_field<'v>(
    obj: &'v Map<String, Value>,
    names: &[&'static str],
) -> Result<Option<&'v str>, BridgeError> {
    match field(obj, names) {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.as_str())),
        Some((name, _)) => Err(invalid(format!("`{}` must be a string", name))),
    }
}

/// Parts shared by both request kinds
struct Common {
    architecture: Architecture,
    mode: Option<u32>,
    endianness: Option<Endianness>,
    syntax: Option<Syntax>,
    base_address: u64,
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>, BridgeError> {
    raw.as_object()
        .ok_or_else(|| invalid("request must be a JSON object"))
}

fn parse_common(obj: &Map<String, Value>) -> Result<Common, BridgeError> {
    // 1. Architecture (required)
    let arch_name = string_field(obj, &["architecture", "arch"])?
        .ok_or_else(|| invalid("missing field `architecture`"))?;
    let architecture = registry().lookup(arch_name)?;

    // 2. Mode: integer bit width, or a numeric string
    let mode = match field(obj, &["mode"]) {
        None => None,
        Some((_, Value::Number(n))) => {
            let bits = n
                .as_u64()
                .and_then(|bits| u32::try_from(bits).ok())
                .ok_or_else(|| invalid(format!("`mode` {} is not a bit width", n)))?;
            Some(bits)
        }
        Some((_, Value::String(s))) => Some(
            s.trim()
                .parse::<u32>()
                .map_err(|_| invalid(format!("`mode` '{}' is not a bit width", s)))?,
        ),
        Some(_) => return Err(invalid("`mode` must be an integer")),
    };

    // 3. Endianness: unknown names are reported against the resolved mode
    let endianness = match string_field(obj, &["endianness", "endian"])? {
        None => None,
        Some(name) => Some(parse_endianness(architecture, mode, name)?),
    };

    // 4. Syntax
    let syntax = match string_field(obj, &["syntax"])? {
        None => None,
        Some(name) => Some(
            name.parse::<Syntax>()
                .map_err(|_| invalid(format!("unknown syntax '{}'", name)))?,
        ),
    };

    // 5. Base address: number, or "0x..."/decimal string
    let base_address = match field(obj, &["baseAddress", "addr", "address"]) {
        None => 0,
        Some((name, Value::Number(n))) => n
            .as_u64()
            .ok_or_else(|| invalid(format!("`{}` {} is not an unsigned address", name, n)))?,
        Some((name, Value::String(s))) => parse_address(s)
            .map_err(|_| invalid(format!("`{}` '{}' is not an address", name, s)))?,
        Some((name, _)) => return Err(invalid(format!("`{}` must be a number or string", name))),
    };

    Ok(Common {
        architecture,
        mode,
        endianness,
        syntax,
        base_address,
    })
}

/// Validate a raw assemble request
pub fn parse_assembly(raw: &Value) -> Result<AssemblyRequest, BridgeError> {
    let obj = as_object(raw)?;
    let common = parse_common(obj)?;
    let source = string_field(obj, &["source", "asmStr"])?
        .ok_or_else(|| invalid("missing field `source`"))?;

    Ok(AssemblyRequest {
        architecture: common.architecture,
        mode: common.mode,
        endianness: common.endianness,
        syntax: common.syntax,
        base_address: common.base_address,
        source: source.to_string(),
    })
}

/// Validate a raw disassemble request
pub fn parse_disassembly(raw: &Value) -> Result<DisassemblyRequest, BridgeError> {
    let obj = as_object(raw)?;
    let common = parse_common(obj)?;

    let bytes = match field(obj, &["bytes", "hex"]) {
        None => return Err(invalid("missing field `bytes`")),
        Some((_, Value::String(text))) => bytes_from_hex_text(text)?,
        Some((_, Value::Array(items))) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| invalid(format!("`bytes[{}]` = {} is not a byte", i, item)))
            })
            .collect::<Result<Vec<u8>, _>>()?,
        Some((name, _)) => {
            return Err(invalid(format!(
                "`{}` must be an array of bytes or a hex string",
                name
            )))
        }
    };

    Ok(DisassemblyRequest {
        architecture: common.architecture,
        mode: common.mode,
        endianness: common.endianness,
        syntax: common.syntax,
        base_address: common.base_address,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_parse_address_forms() {
        assert_eq!(parse_address("0x1000"), Ok(0x1000));
        assert_eq!(parse_address("0X1_000"), Ok(0x1000));
        assert_eq!(parse_address("4096"), Ok(4096));
        assert!(parse_address("zz").is_err());
    }

    #[test]
    fn test_assembly_request_with_short_aliases() {
        let request = parse_assembly(&json!({
            "asmStr": "mov rax, rbx",
            "arch": "X86_64",
            "mode": 64,
            "endian": "Little",
            "addr": 4096
        }))
        .unwrap();

        assert_eq!(request.architecture, Architecture::X86_64);
        assert_eq!(request.mode, Some(64));
        assert_eq!(request.endianness, Some(Endianness::Little));
        assert_eq!(request.base_address, 0x1000);
        assert_eq!(request.source, "mov rax, rbx");
    }

    #[test]
    fn test_disassembly_bytes_as_array_or_text() {
        let from_array = parse_disassembly(&json!({
            "architecture": "ARM64", "bytes": [31, 32, 3, 213], "baseAddress": "0x400000"
        }))
        .unwrap();
        let from_text = parse_disassembly(&json!({
            "architecture": "ARM64", "bytes": "1f 20 03 d5", "baseAddress": "0x400000"
        }))
        .unwrap();

        assert_eq!(from_array.bytes, vec![0x1f, 0x20, 0x03, 0xd5]);
        assert_eq!(from_array.bytes, from_text.bytes);
        assert_eq!(from_text.base_address, 0x400000);
    }

    #[test]
    fn test_missing_fields() {
        let err = parse_assembly(&json!({ "architecture": "X86" })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let err = parse_disassembly(&json!({ "bytes": [144] })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let err = parse_assembly(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_error_kinds_by_field() {
        let err = parse_assembly(&json!({ "architecture": "Z80", "source": "" })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedArchitecture);

        let err = parse_assembly(&json!({
            "architecture": "MIPS", "endianness": "middle", "source": ""
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedEndianness);

        let err = parse_disassembly(&json!({ "architecture": "X86", "bytes": "48 ZZ 90" }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedHex);
        assert!(err.to_string().contains("token 1"));
    }

    #[test]
    fn test_out_of_range_byte_element() {
        let err = parse_disassembly(&json!({ "architecture": "X86", "bytes": [1, 300] }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(err.to_string().contains("bytes[1]"));
    }

    #[test]
    fn test_negative_address_rejected() {
        let err = parse_disassembly(&json!({
            "architecture": "X86", "bytes": [], "baseAddress": -1
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_endianness_names() {
        let endianness = parse_endianness(Architecture::ARM, None, "be").unwrap();
        assert_eq!(endianness, Endianness::Big);

        let err = parse_endianness(Architecture::MIPS, Some(64), "middle").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedEndianness);
        assert!(err.to_string().contains("middle"));

        // The mode is still validated first
        let err = parse_endianness(Architecture::X86, Some(16), "middle").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMode);
    }

    #[test]
    fn test_op_kind_names() {
        assert_eq!("disasm".parse::<OpKind>(), Ok(OpKind::Disassemble));
        assert_eq!(serde_json::to_string(&OpKind::Assemble).unwrap(), "\"assemble\"");
    }
}
