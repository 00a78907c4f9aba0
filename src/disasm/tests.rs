//! Disassembler tests against a scripted decoder
//!
//! Opcode byte N (1..=4) starts an N-byte instruction; anything else is
//! rejected.

use super::engine::decode_stream;
use super::*;
use crate::arch::{registry, Architecture, Endianness};
use crate::backend::{CancelToken, Decoder, RawInstruction};
use crate::error::ErrorKind;

struct ScriptedDecoder;

impl Decoder for ScriptedDecoder {
    fn decode_one(&self, bytes: &[u8], _address: u64) -> Result<RawInstruction, String> {
        let length = match bytes.first() {
            Some(&n @ 1..=4) => n as usize,
            Some(other) => return Err(format!("bad opcode {:#04x}", other)),
            None => return Err("no input".into()),
        };
        if bytes.len() < length {
            return Err("need more bytes".into());
        }
        Ok(RawInstruction {
            length,
            mnemonic: format!("op{}", length),
            operands: if length > 1 { "r0".into() } else { String::new() },
        })
    }
}

#[test]
fn test_addresses_follow_lengths() {
    let bytes = [4, 0, 0, 0, 2, 0];
    let result = decode_stream(&ScriptedDecoder, &bytes, 0x1000, 1, &CancelToken::new());

    assert!(result.is_complete());
    assert_eq!(result.instructions.len(), 2);
    assert_eq!(result.instructions[0].address, 0x1000);
    assert_eq!(result.instructions[1].address, 0x1004);
    assert_eq!(result.instructions[1].bytes, vec![2, 0]);
    assert_eq!(result.decoded_len(), bytes.len());
}

#[test]
fn test_partial_result_is_kept() {
    let bytes = [1, 2, 0, 0xff, 1];
    let result = decode_stream(&ScriptedDecoder, &bytes, 0, 1, &CancelToken::new());

    assert_eq!(result.instructions.len(), 2);
    let error = result.error.expect("decoding should stop");
    assert_eq!(error.offset, 3);
    assert!(error.message.contains("bad opcode"));
}

#[test]
fn test_truncated_tail_is_an_error() {
    // Two 4-byte instructions, then half of a third
    let bytes = [4, 0, 0, 0, 4, 0, 0, 0, 4, 0];
    let result = decode_stream(&ScriptedDecoder, &bytes, 0, 4, &CancelToken::new());

    assert_eq!(result.instructions.len(), 2);
    let error = result.error.as_ref().unwrap();
    assert_eq!(error.offset, 8);
    assert!(error.message.starts_with("truncated instruction"));
    assert!(result.decoded_len() <= bytes.len());
}

#[test]
fn test_text_and_lines() {
    let mut result = decode_stream(&ScriptedDecoder, &[1, 2, 0], 0x400000, 1, &CancelToken::new());
    result.address_digits = 8;

    assert_eq!(result.instructions[0].text(), "op1");
    assert_eq!(result.instructions[1].text(), "op2 r0");
    assert_eq!(
        result.lines(),
        vec!["0x00400000: op1".to_string(), "0x00400001: op2 r0".to_string()]
    );
    assert!(result.format_listing().contains("0200"));
}

#[test]
fn test_empty_bytes_need_no_backend() {
    let disassembler = Disassembler::new(registry());
    let result = disassembler
        .disassemble(&DisassemblyRequest::new(Architecture::MIPS, Vec::new()))
        .unwrap();
    assert!(result.instructions.is_empty());
    assert!(result.is_complete());
    assert_eq!(result.address_digits, 8);
}

#[test]
fn test_big_endian_x86_rejected_without_data() {
    let disassembler = Disassembler::new(registry());
    let request = DisassemblyRequest::new(Architecture::X86, vec![0x90])
        .mode(32)
        .endianness(Endianness::Big);
    let err = disassembler.disassemble(&request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedEndianness);
}

#[test]
fn test_range_overflow_rejected() {
    let disassembler = Disassembler::new(registry());
    let request = DisassemblyRequest::new(Architecture::X86, vec![0x90, 0x90])
        .base_address(0xffff_ffff);
    let err = disassembler.disassemble(&request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}

#[test]
fn test_cancelled_decode_stops_at_start() {
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = decode_stream(&ScriptedDecoder, &[1, 1, 1], 0, 1, &cancel);
    assert!(result.instructions.is_empty());
    let error = result.error.unwrap();
    assert_eq!(error.offset, 0);
    assert!(error.message.contains("cancelled"));
}
