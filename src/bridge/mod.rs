//! Bridge module - The single external entry point
//!
//! Validates raw requests, resolves the target, runs the assembler or
//! disassembler under a time budget and wraps every outcome in a
//! [`ResponseEnvelope`]. No state survives a call.

pub mod config;
pub mod envelope;
pub mod request;
mod safe;

pub use config::BridgeConfig;
pub use envelope::{ResponseData, ResponseEnvelope};
pub use request::{parse_address, parse_endianness, OpKind};

use serde_json::Value;

use crate::arch::registry;
use crate::asm::{Assembler, AssemblyRequest, AssemblyResult};
use crate::disasm::{Disassembler, Disassembly, DisassemblyRequest};
use crate::error::BridgeError;
use safe::run_guarded;

/// Stateless request handler; cheap to clone and share between threads
#[derive(Debug, Clone, Default)]
pub struct BridgeService {
    config: BridgeConfig,
}

impl BridgeService {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Handle a raw request object for `op`
    pub fn handle(&self, op: OpKind, raw: &Value) -> ResponseEnvelope {
        log::debug!("Handling {} request", op);
        match op {
            OpKind::Assemble => match request::parse_assembly(raw) {
                Ok(request) => self.assemble(request),
                Err(e) => ResponseEnvelope::failure(&e),
            },
            OpKind::Disassemble => match request::parse_disassembly(raw) {
                Ok(request) => self.disassemble(request),
                Err(e) => ResponseEnvelope::failure(&e),
            },
        }
    }

    /// Handle a request given as JSON text
    pub fn handle_json(&self, op: OpKind, raw: &str) -> ResponseEnvelope {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.handle(op, &value),
            Err(e) => ResponseEnvelope::failure(&BridgeError::InvalidRequest(format!(
                "request is not valid JSON: {}",
                e
            ))),
        }
    }

    /// Handle a self-describing message: a request object with an `op` field
    pub fn handle_message(&self, raw: &Value) -> ResponseEnvelope {
        let op = raw
            .get("op")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::InvalidRequest("missing field `op`".into()))
            .and_then(|name| {
                name.parse::<OpKind>()
                    .map_err(|_| BridgeError::InvalidRequest(format!("unknown op '{}'", name)))
            });

        match op {
            Ok(op) => self.handle(op, raw),
            Err(e) => ResponseEnvelope::failure(&e),
        }
    }

    pub fn assemble(&self, request: AssemblyRequest) -> ResponseEnvelope {
        match self.run_assemble(request) {
            Ok(result) => ResponseEnvelope::success(ResponseData::Bytes(result.bytes)),
            Err(e) => ResponseEnvelope::failure(&e),
        }
    }

    pub fn disassemble(&self, request: DisassemblyRequest) -> ResponseEnvelope {
        match self.run_disassemble(request) {
            Ok(disassembly) => {
                let lines = ResponseData::Lines(disassembly.lines());
                match disassembly.error {
                    None => ResponseEnvelope::success(lines),
                    Some(stop) => ResponseEnvelope::partial(lines, &BridgeError::Disassembly(stop)),
                }
            }
            Err(e) => ResponseEnvelope::failure(&e),
        }
    }

    /// Assemble under the configured budget, keeping the typed result
    pub fn run_assemble(&self, request: AssemblyRequest) -> Result<AssemblyResult, BridgeError> {
        self.check_input_len(request.source.len())?;
        let budget = self.config.budget_for(request.source.len());
        run_guarded("assemble", budget, move |cancel| {
            Assembler::new(registry())
                .with_cancel(cancel)
                .assemble(&request)
        })
    }

    /// Disassemble under the configured budget, keeping the typed result
    pub fn run_disassemble(&self, request: DisassemblyRequest) -> Result<Disassembly, BridgeError> {
        self.check_input_len(request.bytes.len())?;
        let budget = self.config.budget_for(request.bytes.len());
        run_guarded("disassemble", budget, move |cancel| {
            Disassembler::new(registry())
                .with_cancel(cancel)
                .disassemble(&request)
        })
    }

    fn check_input_len(&self, len: usize) -> Result<(), BridgeError> {
        if len > self.config.max_input_len {
            return Err(BridgeError::InvalidRequest(format!(
                "input of {} bytes exceeds the limit of {} bytes",
                len, self.config.max_input_len
            )));
        }
        Ok(())
    }
}
