//! Assembler - Source text to machine code
//!
//! Resolves the target through the registry, encodes the whole source with
//! the target's encoder, and pins any failure to a line and column.

mod statements;


use crate::arch::{Architecture, ArchitectureRegistry, Endianness, Syntax};
use crate::backend::{CancelToken, Encoder};
use crate::codec::hex_text_from_bytes;
use crate::error::{AssemblyError, BridgeError};

use statements::{locate_failure, split_statements};

/// What to assemble and for which target
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub architecture: Architecture,
    /// Bit width; `None` selects the architecture's default mode
    pub mode: Option<u32>,
    /// Byte order; `None` selects the architecture's default
    pub endianness: Option<Endianness>,
    pub syntax: Option<Syntax>,
    pub base_address: u64,
    pub source: String,
}

impl AssemblyRequest {
    pub fn new(architecture: Architecture, source: impl Into<String>) -> Self {
        Self {
            architecture,
            mode: None,
            endianness: None,
            syntax: None,
            base_address: 0,
            source: source.into(),
        }
    }

    pub fn mode(mut self, bits: u32) -> Self {
        self.mode = Some(bits);
        self
    }

    pub fn endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = Some(endianness);
        self
    }

    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn base_address(mut self, address: u64) -> Self {
        self.base_address = address;
        self
    }
}

/// Encoded machine code, in memory order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyResult {
    pub bytes: Vec<u8>,
}

impl AssemblyResult {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Canonical `48 89 d8` rendering
    pub fn hex_text(&self) -> String {
        hex_text_from_bytes(&self.bytes)
    }
}

pub struct Assembler<'r> {
    registry: &'r ArchitectureRegistry,
    cancel: CancelToken,
}

impl<'r> Assembler<'r> {
    pub fn new(registry: &'r ArchitectureRegistry) -> Self {
        Self {
            registry,
            cancel: CancelToken::new(),
        }
    }

    /// Stop locating a failure once `cancel` is set
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn assemble(&self, request: &AssemblyRequest) -> Result<AssemblyResult, BridgeError> {
        let resolved = self.registry.resolve(
            request.architecture,
            request.mode,
            request.endianness,
            request.syntax,
        )?;
        resolved.target.check_range(request.base_address, 0)?;

        // An empty program is valid
        if request.source.trim().is_empty() {
            return Ok(AssemblyResult::default());
        }

        // Keystone takes a C string
        if let Some(error) = find_nul(&request.source) {
            return Err(error.into());
        }

        let encoder = resolved.capability.encoder(&resolved.target)?;
        log::debug!(
            "Assembling {} bytes of source for {} at {:#x}",
            request.source.len(),
            resolved.target,
            request.base_address
        );

        encode_located(
            encoder.as_ref(),
            &request.source,
            request.base_address,
            resolved.capability.comment_markers(),
            &self.cancel,
        )
        .map(|bytes| AssemblyResult { bytes })
    }
}

/// Encode `source`, turning a backend failure into a located [`AssemblyError`]
pub(crate) fn encode_located(
    encoder: &dyn Encoder,
    source: &str,
    address: u64,
    comment_markers: &[&str],
    cancel: &CancelToken,
) -> Result<Vec<u8>, BridgeError> {
    let whole_source_error = match encoder.encode(source, address) {
        Ok(bytes) => return Ok(bytes),
        Err(message) => message,
    };

    let statements = split_statements(source, comment_markers);
    let error = match locate_failure(encoder, &statements, address, cancel) {
        Some((index, message)) => AssemblyError {
            line: statements[index].line,
            column: statements[index].column,
            message,
        },
        None => {
            // Fails only as a whole (e.g. a branch out of range once everything is laid out)
            let (line, column) = statements
                .last()
                .map(|s| (s.line, s.column))
                .unwrap_or((1, 1));
            AssemblyError {
                line,
                column,
                message: whole_source_error,
            }
        }
    };

    log::debug!("Assembly failed: {}", error);
    Err(error.into())
}

/// Position of the first NUL character, which no backend can accept
fn find_nul(source: &str) -> Option<AssemblyError> {
    let offset = source.find('\0')?;
    let before = &source[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Some(AssemblyError {
        line: before.matches('\n').count() + 1,
        column: before[line_start..].chars().count() + 1,
        message: "NUL character in source".to_string(),
    })
}
