//! Error types - Bridge error taxonomy
//!
//! Every failure the bridge can report maps onto exactly one [`ErrorKind`],
//! which is what the response envelope carries across the transport.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::arch::{Architecture, Endianness, Mode};
use crate::codec::HexError;

/// Stable error categories exposed in the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MalformedHex,
    UnsupportedArchitecture,
    UnsupportedMode,
    UnsupportedEndianness,
    AssemblyError,
    DisassemblyError,
    InternalTimeout,
    InvalidRequest,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedHex => "MalformedHex",
            ErrorKind::UnsupportedArchitecture => "UnsupportedArchitecture",
            ErrorKind::UnsupportedMode => "UnsupportedMode",
            ErrorKind::UnsupportedEndianness => "UnsupportedEndianness",
            ErrorKind::AssemblyError => "AssemblyError",
            ErrorKind::DisassemblyError => "DisassemblyError",
            ErrorKind::InternalTimeout => "InternalTimeout",
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source text that could not be encoded
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("line {line}, column {column}: {message}")]
pub struct AssemblyError {
    /// 1-based line of the first failing statement
    pub line: usize,
    /// 1-based column of the first non-blank character of that statement
    pub column: usize,
    pub message: String,
}

/// Why sequential decoding stopped
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("offset {offset:#x}: {message}")]
pub struct DisassemblyError {
    /// Byte offset into the input where decoding failed
    pub offset: usize,
    pub message: String,
}

/// Bridge errors
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    #[error("malformed hex input: {0}")]
    MalformedHex(#[from] HexError),

    #[error("unsupported architecture: '{0}'")]
    UnsupportedArchitecture(String),

    #[error("unsupported mode {mode} for {arch} (supported: {supported})")]
    UnsupportedMode {
        arch: Architecture,
        mode: u32,
        supported: String,
    },

    #[error("unsupported endianness {endianness} for {arch} in {mode} mode")]
    UnsupportedEndianness {
        arch: Architecture,
        mode: Mode,
        endianness: String,
    },

    #[error("assembly failed at {0}")]
    Assembly(#[from] AssemblyError),

    #[error("disassembly stopped at {0}")]
    Disassembly(#[from] DisassemblyError),

    #[error("{operation} exceeded its time budget of {budget:?}")]
    InternalTimeout {
        operation: &'static str,
        budget: Duration,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::MalformedHex(_) => ErrorKind::MalformedHex,
            BridgeError::UnsupportedArchitecture(_) => ErrorKind::UnsupportedArchitecture,
            BridgeError::UnsupportedMode { .. } => ErrorKind::UnsupportedMode,
            BridgeError::UnsupportedEndianness { .. } => ErrorKind::UnsupportedEndianness,
            BridgeError::Assembly(_) => ErrorKind::AssemblyError,
            BridgeError::Disassembly(_) => ErrorKind::DisassemblyError,
            BridgeError::InternalTimeout { .. } => ErrorKind::InternalTimeout,
            BridgeError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            BridgeError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn unsupported_endianness(
        arch: Architecture,
        mode: Mode,
        endianness: Endianness,
    ) -> Self {
        BridgeError::UnsupportedEndianness {
            arch,
            mode,
            endianness: endianness.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = BridgeError::InvalidRequest("missing field".into());
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let err = BridgeError::from(AssemblyError {
            line: 2,
            column: 5,
            message: "bad mnemonic".into(),
        });
        assert_eq!(err.kind(), ErrorKind::AssemblyError);
        assert_eq!(err.to_string(), "assembly failed at line 2, column 5: bad mnemonic");
    }

    #[test]
    fn test_kind_serializes_by_name() {
        let json = serde_json::to_string(&ErrorKind::InternalTimeout).unwrap();
        assert_eq!(json, "\"InternalTimeout\"");
    }
}
