//! The wire protocol: frame codec (component A) and response parser
//! (component B).
//!
//! Wire format, both directions: `[4-byte BE header_len][header JSON][payload
//! bytes, payload_len of them]`. The header always carries its own
//! `payload_len` so the parser never scans for a delimiter inside binary
//! payload data — mirrors the length-prefixed binary framing the daemon's
//! `continuum-core::ipc` module uses for audio responses, generalized to
//! cover request frames too and to fold the length into the header instead
//! of a second length-prefixed section.

mod frame;
mod parser;

pub use frame::{decode_request, encode_request, encode_response, RequestFrame, ResponseFrame, ResponseType};
pub use parser::ResponseParser;

/// Header length prefix, in bytes.
pub(crate) const LEN_PREFIX_SIZE: usize = 4;

/// Refuse to allocate a payload buffer larger than this from a length
/// prefix we don't yet trust — guards a malicious/corrupt peer from
/// making us OOM on a bogus length field.
pub(crate) const MAX_FRAME_BYTES: u32 = 64 * 1024 * 1024;
