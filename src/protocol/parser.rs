//! Response parser (component B, §4.2).
//!
//! `ResponseParser` wraps a buffered reader and yields one [`ResponseFrame`]
//! per call. It carries no state across calls beyond the reader itself, per
//! §4.2's "stateless between calls" contract.

use std::io::{BufRead, Read};

use super::frame::{ResponseFrame, ResponseType};
use super::{LEN_PREFIX_SIZE, MAX_FRAME_BYTES};
use crate::error::FrameError;

/// Reads response frames on demand from a buffered byte stream.
pub struct ResponseParser<R> {
    reader: R,
}

impl<R: BufRead> ResponseParser<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Parse exactly one frame, or fail. See [`FrameError::EndOfStream`] for
    /// the clean-EOF sentinel (only possible while expecting the first byte
    /// of a new frame — any EOF after that is a malformed-frame error).
    pub fn parse_response(&mut self) -> Result<ResponseFrame, FrameError> {
        decode_one(&mut self.reader)
    }

    /// Escape hatch for the transport layer, which needs to reach the
    /// underlying socket to apply per-call read timeouts.
    pub(crate) fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

fn map_truncated(e: std::io::Error) -> FrameError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        FrameError::Malformed("unexpected end of stream mid-frame".to_string())
    } else {
        FrameError::Io(e)
    }
}

/// Read the length-prefix, distinguishing a clean EOF (no bytes read at
/// all — the §4.2 `EndOfStream` sentinel) from a truncated read (some bytes
/// arrived, then the stream closed).
fn read_len_prefix<R: Read>(reader: &mut R) -> Result<u32, FrameError> {
    let mut buf = [0u8; LEN_PREFIX_SIZE];
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) if total == 0 => return Err(FrameError::EndOfStream),
            Ok(0) => {
                return Err(FrameError::Malformed(
                    "unexpected end of stream mid-frame".to_string(),
                ))
            }
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FrameError::Io(e)),
        }
    }
    Ok(u32::from_be_bytes(buf))
}

fn parse_response_type(raw: &str) -> Result<ResponseType, FrameError> {
    match raw {
        "OK" => Ok(ResponseType::Ok),
        "PONG" => Ok(ResponseType::Pong),
        "JSON" => Ok(ResponseType::Json),
        "CHUNK" => Ok(ResponseType::Chunk),
        "END" => Ok(ResponseType::End),
        "ERR" => Ok(ResponseType::Err),
        other => Err(FrameError::UnknownResponseType(other.to_string())),
    }
}

/// Decode exactly one response frame from `reader`, advancing it by exactly
/// the frame's length (§4.2: "advancing the read cursor by exactly the
/// frame's length").
pub(crate) fn decode_one<R: Read>(reader: &mut R) -> Result<ResponseFrame, FrameError> {
    let header_len = read_len_prefix(reader)?;
    if header_len > MAX_FRAME_BYTES {
        return Err(FrameError::Malformed(format!(
            "header length {header_len} exceeds max frame size"
        )));
    }

    let mut header_bytes = vec![0u8; header_len as usize];
    reader.read_exact(&mut header_bytes).map_err(map_truncated)?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes)
        .map_err(|e| FrameError::Malformed(format!("invalid response header: {e}")))?;

    let type_str = header
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| FrameError::Malformed("response header missing 'type'".to_string()))?;
    let response_type = parse_response_type(type_str)?;

    let code = header
        .get("code")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    let message = header
        .get("message")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    let payload_len = header
        .get("payload_len")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| FrameError::Malformed("response header missing 'payload_len'".to_string()))?;

    if payload_len > MAX_FRAME_BYTES as u64 {
        return Err(FrameError::Malformed(format!(
            "payload length {payload_len} exceeds max frame size"
        )));
    }

    let payload = if payload_len > 0 {
        let mut buf = vec![0u8; payload_len as usize];
        reader.read_exact(&mut buf).map_err(map_truncated)?;
        Some(buf)
    } else {
        None
    };

    Ok(ResponseFrame {
        response_type,
        code,
        message,
        payload,
    })
}
