//! Error types surfaced by the client (§7 of the protocol spec).
//!
//! Every fallible client operation returns a [`ClientError`]. Each variant
//! carries the failing operation as context, per the "never swallow, always
//! say what failed" policy — mirrors the `#[derive(Error)]` enums used
//! throughout the daemon's worker crates (e.g. `TTSError`).

use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`crate::transport::Client`] and the verb surface built on it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Attempted I/O on a client that is closed or was never connected.
    #[error("client is not connected (failed to {operation})")]
    NotConnected { operation: &'static str },

    /// The wire stream violated the protocol: bad header, truncated payload,
    /// unknown response type, or an unexpected response shape for the verb.
    #[error("protocol error while {operation}: {message}")]
    Protocol {
        operation: &'static str,
        message: String,
    },

    /// The daemon replied with `ERR <code> <message>`.
    #[error("server error {code}: {message}")]
    Server { code: String, message: String },

    /// The call was canceled before it completed. The connection is now
    /// indeterminate and has been marked closed.
    #[error("operation canceled while {operation}")]
    Canceled { operation: &'static str },

    /// The call's deadline elapsed before a complete response arrived. The
    /// connection is now indeterminate and has been marked closed.
    #[error("deadline of {deadline:?} exceeded while {operation}")]
    DeadlineExceeded {
        operation: &'static str,
        deadline: Duration,
    },

    /// The underlying socket I/O failed outright.
    #[error("transport error while {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub(crate) fn transport(operation: &'static str, source: std::io::Error) -> Self {
        // A timed-out read/write is how deadlines are implemented on a
        // blocking socket (see CallOptions in transport.rs) — reclassify it.
        match source.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                ClientError::DeadlineExceeded {
                    operation,
                    deadline: Duration::default(),
                }
            }
            _ => ClientError::Transport { operation, source },
        }
    }

    pub(crate) fn protocol(operation: &'static str, message: impl Into<String>) -> Self {
        ClientError::Protocol {
            operation,
            message: message.into(),
        }
    }

    /// True for the error kinds that leave the connection indeterminate and
    /// require the caller to reconnect (§5 cancellation rule).
    pub(crate) fn poisons_connection(&self) -> bool {
        matches!(
            self,
            ClientError::Canceled { .. } | ClientError::DeadlineExceeded { .. }
        )
    }
}

/// Low-level framing errors, internal to the codec/parser (components A/B).
/// `EndOfStream` is the sentinel for a clean EOF while expecting the first
/// byte of a new frame. Everything else is a malformed-frame condition.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("end of stream")]
    EndOfStream,

    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("unknown response type: {0}")]
    UnknownResponseType(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Fold a low-level framing failure into the public error type for a
    /// named operation. `EndOfStream` becomes a `Protocol` error here;
    /// callers that want the lenient chunked-EOF behavior (§4.3) must check
    /// for `FrameError::EndOfStream` themselves before calling this.
    pub(crate) fn into_client_error(self, operation: &'static str) -> ClientError {
        match self {
            FrameError::Io(e) => ClientError::transport(operation, e),
            FrameError::EndOfStream => {
                ClientError::protocol(operation, "unexpected end of stream")
            }
            FrameError::Malformed(m) => ClientError::protocol(operation, m),
            FrameError::UnknownResponseType(t) => {
                ClientError::protocol(operation, format!("unknown response type: {t}"))
            }
        }
    }
}
