//! Frame codec (component A, §4.1).

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::FrameError;
use super::{LEN_PREFIX_SIZE, MAX_FRAME_BYTES};

/// One response type, closed per §3/§4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseType {
    Ok,
    Pong,
    Json,
    Chunk,
    End,
    Err,
}

/// A decoded request frame, ready to write to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame {
    pub verb: String,
    pub args: Vec<String>,
    pub sub_verb: Option<String>,
    pub payload: Option<Vec<u8>>,
}

/// A decoded response frame, read from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    pub response_type: ResponseType,
    pub code: Option<String>,
    pub message: Option<String>,
    pub payload: Option<Vec<u8>>,
}

#[derive(Serialize, Deserialize)]
struct RequestHeader {
    verb: String,
    args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_verb: Option<String>,
    payload_len: u32,
}

// Encode-only: the decode side (`parser::decode_one`) must distinguish an
// unrecognized `type` string from any other malformed-header shape, which a
// derived `Deserialize` can't do (it would fail the whole header on an
// unknown enum variant), so decoding goes through a raw `serde_json::Value`
// instead. Keep this struct `Serialize`-only so it doesn't imply a decode
// path that doesn't exist.
#[derive(Serialize)]
struct ResponseHeader {
    #[serde(rename = "type")]
    response_type: ResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    payload_len: u32,
}

fn validate_verb(verb: &str) -> Result<(), FrameError> {
    if verb.is_empty() || !verb.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-') {
        return Err(FrameError::Malformed(format!(
            "verb must be non-empty uppercase ASCII, got {verb:?}"
        )));
    }
    Ok(())
}

fn validate_arg(arg: &str) -> Result<(), FrameError> {
    if arg.chars().any(|c| c.is_control()) {
        return Err(FrameError::Malformed(format!(
            "argument contains a control character: {arg:?}"
        )));
    }
    Ok(())
}

/// Encode a request frame. Fails if the verb or any argument is malformed
/// per §4.1's input contract.
pub fn encode_request(frame: &RequestFrame) -> Result<Vec<u8>, FrameError> {
    validate_verb(&frame.verb)?;
    for arg in &frame.args {
        validate_arg(arg)?;
    }
    if let Some(sub) = &frame.sub_verb {
        validate_arg(sub)?;
    }

    let payload_len = frame.payload.as_ref().map(|p| p.len()).unwrap_or(0);
    let header = RequestHeader {
        verb: frame.verb.clone(),
        args: frame.args.clone(),
        sub_verb: frame.sub_verb.clone(),
        payload_len: payload_len as u32,
    };
    let header_bytes = serde_json::to_vec(&header)
        .map_err(|e| FrameError::Malformed(format!("failed to encode request header: {e}")))?;

    let mut out = Vec::with_capacity(LEN_PREFIX_SIZE + header_bytes.len() + payload_len);
    out.write_all(&(header_bytes.len() as u32).to_be_bytes())?;
    out.write_all(&header_bytes)?;
    if let Some(payload) = &frame.payload {
        out.write_all(payload)?;
    }
    Ok(out)
}

/// Encode a response frame. Used by the mock daemon in tests; the real
/// daemon is out of scope, but the encoder must round-trip with the client's
/// decoder per testable property 2.
pub fn encode_response(frame: &ResponseFrame) -> Result<Vec<u8>, FrameError> {
    let payload_len = frame.payload.as_ref().map(|p| p.len()).unwrap_or(0);
    let header = ResponseHeader {
        response_type: frame.response_type,
        code: frame.code.clone(),
        message: frame.message.clone(),
        payload_len: payload_len as u32,
    };
    let header_bytes = serde_json::to_vec(&header)
        .map_err(|e| FrameError::Malformed(format!("failed to encode response header: {e}")))?;

    let mut out = Vec::with_capacity(LEN_PREFIX_SIZE + header_bytes.len() + payload_len);
    out.write_all(&(header_bytes.len() as u32).to_be_bytes())?;
    out.write_all(&header_bytes)?;
    if let Some(payload) = &frame.payload {
        out.write_all(payload)?;
    }
    Ok(out)
}

/// Decode exactly one request frame from `bytes`, returning the frame and
/// the number of bytes consumed. Used by the mock daemon and by round-trip
/// tests; the client itself never decodes requests.
pub fn decode_request(bytes: &[u8]) -> Result<(RequestFrame, usize), FrameError> {
    if bytes.len() < LEN_PREFIX_SIZE {
        return Err(FrameError::Malformed("truncated length prefix".into()));
    }
    let header_len = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
    if header_len > MAX_FRAME_BYTES {
        return Err(FrameError::Malformed(format!(
            "header length {header_len} exceeds max frame size"
        )));
    }
    let header_len = header_len as usize;
    let header_start = LEN_PREFIX_SIZE;
    let header_end = header_start + header_len;
    if bytes.len() < header_end {
        return Err(FrameError::Malformed("truncated header".into()));
    }
    let header: RequestHeader = serde_json::from_slice(&bytes[header_start..header_end])
        .map_err(|e| FrameError::Malformed(format!("invalid request header: {e}")))?;

    let payload_len = header.payload_len as usize;
    let payload_end = header_end + payload_len;
    if bytes.len() < payload_end {
        return Err(FrameError::Malformed("truncated payload".into()));
    }
    let payload = if payload_len > 0 {
        Some(bytes[header_end..payload_end].to_vec())
    } else {
        None
    };

    Ok((
        RequestFrame {
            verb: header.verb,
            args: header.args,
            sub_verb: header.sub_verb,
            payload,
        },
        payload_end,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_roundtrip_no_payload() {
        let frame = RequestFrame {
            verb: "PING".into(),
            args: vec![],
            sub_verb: None,
            payload: None,
        };
        let bytes = encode_request(&frame).unwrap();
        let (decoded, consumed) = decode_request(&bytes).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn request_roundtrip_with_args_and_payload() {
        let frame = RequestFrame {
            verb: "PROXY".into(),
            args: vec!["EXEC".into(), "p1".into()],
            sub_verb: None,
            payload: Some(b"console.log(1)".to_vec()),
        };
        let bytes = encode_request(&frame).unwrap();
        let (decoded, _) = decode_request(&bytes).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn request_roundtrip_with_sub_verb() {
        let frame = RequestFrame {
            verb: "SESSION".into(),
            args: vec!["sess-1".into()],
            sub_verb: Some("HEARTBEAT".into()),
            payload: None,
        };
        let bytes = encode_request(&frame).unwrap();
        let (decoded, _) = decode_request(&bytes).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn rejects_lowercase_verb() {
        let frame = RequestFrame {
            verb: "ping".into(),
            args: vec![],
            sub_verb: None,
            payload: None,
        };
        assert!(encode_request(&frame).is_err());
    }

    #[test]
    fn rejects_control_char_in_arg() {
        let frame = RequestFrame {
            verb: "PROC".into(),
            args: vec!["bad\narg".into()],
            sub_verb: None,
            payload: None,
        };
        assert!(encode_request(&frame).is_err());
    }

    #[test]
    fn response_roundtrip_json() {
        let frame = ResponseFrame {
            response_type: ResponseType::Json,
            code: None,
            message: None,
            payload: Some(br#"{"version":"1.0.0"}"#.to_vec()),
        };
        let bytes = encode_response(&frame).unwrap();
        let mut cursor = std::io::Cursor::new(bytes);
        let decoded = super::super::parser::decode_one(&mut cursor).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn response_roundtrip_err() {
        let frame = ResponseFrame {
            response_type: ResponseType::Err,
            code: Some("BADID".into()),
            message: Some("no such proxy".into()),
            payload: None,
        };
        let bytes = encode_response(&frame).unwrap();
        let mut cursor = std::io::Cursor::new(bytes);
        let decoded = super::super::parser::decode_one(&mut cursor).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn truncated_request_header_is_malformed() {
        let mut bytes = vec![0u8, 0, 0, 100]; // claims 100-byte header, none follows
        bytes.extend_from_slice(b"x");
        assert!(decode_request(&bytes).is_err());
    }
}
