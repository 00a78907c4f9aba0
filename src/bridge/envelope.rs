//! Response envelope
//!
//! The only shape that crosses back over the transport. Callers must check
//! `ok` before reading `data`; `data` may also accompany a failure when
//! disassembly decoded a prefix before stopping.

use serde::Serialize;

use crate::codec::hex_text_from_bytes;
use crate::error::{BridgeError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Assembled machine code
    Bytes(Vec<u8>),
    /// One `address: mnemonic operands` line per instruction
    Lines(Vec<String>),
}

impl ResponseData {
    /// Text a front-end would show: hex bytes, or newline-joined lines
    pub fn display_text(&self) -> String {
        match self {
            ResponseData::Bytes(bytes) => hex_text_from_bytes(bytes),
            ResponseData::Lines(lines) => lines.join("\n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(data: ResponseData) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error_kind: None,
            error_message: None,
        }
    }

    pub fn failure(error: &BridgeError) -> Self {
        Self {
            ok: false,
            data: None,
            error_kind: Some(error.kind()),
            error_message: Some(error.to_string()),
        }
    }

    /// A failure that still carries what was produced before it
    pub fn partial(data: ResponseData, error: &BridgeError) -> Self {
        Self {
            data: Some(data),
            ..Self::failure(error)
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data without maps keyed by non-strings; serialization cannot fail
        serde_json::to_string(self).unwrap_or_else(|e| {
            let message = format!("envelope serialization failed: {}", e);
            serde_json::json!({ "ok": false, "errorKind": "Internal", "errorMessage": message })
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let envelope = ResponseEnvelope::success(ResponseData::Bytes(vec![0x89, 0xd8]));
        let value: serde_json::Value = serde_json::from_str(&envelope.to_json()).unwrap();
        assert_eq!(value, json!({ "ok": true, "data": [137, 216] }));
        assert_eq!(envelope.data.unwrap().display_text(), "89 d8");
    }

    #[test]
    fn test_failure_shape() {
        let error = BridgeError::UnsupportedArchitecture("Z80".into());
        let value: serde_json::Value =
            serde_json::from_str(&ResponseEnvelope::failure(&error).to_json()).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["errorKind"], json!("UnsupportedArchitecture"));
        assert!(value.get("data").is_none());
        assert!(value["errorMessage"].as_str().unwrap().contains("Z80"));
    }

    #[test]
    fn test_partial_keeps_data() {
        let error = BridgeError::InvalidRequest("stopped".into());
        let lines = ResponseData::Lines(vec!["0x0: nop".into(), "0x1: nop".into()]);
        let envelope = ResponseEnvelope::partial(lines, &error);
        assert!(!envelope.ok);
        assert_eq!(envelope.data.unwrap().display_text(), "0x0: nop\n0x1: nop");
    }

    #[test]
    fn test_empty_listing_serializes_as_empty_array() {
        let envelope = ResponseEnvelope::success(ResponseData::Lines(Vec::new()));
        assert_eq!(envelope.to_json(), r#"{"ok":true,"data":[]}"#);
        assert_eq!(envelope.data.unwrap().display_text(), "");
    }
}
