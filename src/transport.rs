//! Client transport (component C, §4.3) — one socket, one mutex, strict
//! request/response pairing. Generalizes the worker pack's per-connection
//! thread-and-socket pattern (see the logger/data worker `main.rs` files)
//! to the client side: instead of accepting connections and dispatching to
//! handler threads, this owns a single outbound connection and serializes
//! every call onto it.

use std::io::BufReader;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::protocol::{encode_request, RequestFrame, ResponseParser, ResponseType};

/// Default per-call deadline (§5).
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// A cooperative cancellation flag shared between a caller and an in-flight
/// call. Setting it before or between I/O steps causes the call to fail
/// with [`ClientError::Canceled`] and poisons the connection (§5) — it
/// cannot interrupt a blocking syscall already underway on the socket, only
/// the steps around it; combine with a deadline for a hard bound.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-call options layered over the client's default deadline (§5, SPEC_FULL B.1).
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub deadline: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl CallOptions {
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: None,
        }
    }
}

struct Connection {
    writer: UnixStream,
    parser: ResponseParser<BufReader<UnixStream>>,
}

struct Inner {
    closed: bool,
    conn: Option<Connection>,
}

/// Builder for [`Client`], mirroring the `WithSocketPath`-style options
/// named in §6.
pub struct ClientBuilder {
    socket_path: Option<PathBuf>,
    default_deadline: Duration,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            socket_path: None,
            default_deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_socket_path(mut self, path: impl AsRef<Path>) -> Self {
        self.socket_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_default_deadline(mut self, deadline: Duration) -> Self {
        self.default_deadline = deadline;
        self
    }

    /// Read the socket path from `WARDEN_SOCKET` if one wasn't set explicitly.
    pub fn from_env(mut self) -> Self {
        if self.socket_path.is_none() {
            if let Ok(path) = std::env::var("WARDEN_SOCKET") {
                self.socket_path = Some(PathBuf::from(path));
            }
        }
        self
    }

    pub fn build(self) -> Client {
        Client {
            socket_path: self.socket_path.unwrap_or_default(),
            default_deadline: self.default_deadline,
            inner: Mutex::new(Inner {
                closed: false,
                conn: None,
            }),
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns one socket to the daemon and serializes every command onto it
/// (§3 "Client state", §4.3, §5).
pub struct Client {
    socket_path: PathBuf,
    default_deadline: Duration,
    inner: Mutex<Inner>,
}

impl Client {
    /// Convenience constructor equivalent to
    /// `ClientBuilder::new().with_socket_path(path).build()`.
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        ClientBuilder::new().with_socket_path(socket_path).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Open a connection and connect it immediately.
    pub fn connect(socket_path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let client = Self::new(socket_path);
        client.ensure_connected()?;
        Ok(client)
    }

    /// Idempotent: a no-op if already connected, otherwise opens a fresh
    /// socket and installs a new parser/writer pair. Holds the mutex around
    /// the check-and-install to avoid a double-connect race (§4.3).
    pub fn ensure_connected(&self) -> Result<(), ClientError> {
        let mut inner = self.inner.lock();
        if inner.conn.is_some() && !inner.closed {
            return Ok(());
        }
        let stream = UnixStream::connect(&self.socket_path)
            .map_err(|e| ClientError::transport("connect", e))?;
        let reader_half = stream
            .try_clone()
            .map_err(|e| ClientError::transport("connect", e))?;
        inner.conn = Some(Connection {
            writer: stream,
            parser: ResponseParser::new(BufReader::new(reader_half)),
        });
        inner.closed = false;
        debug!(socket = %self.socket_path.display(), "connected");
        Ok(())
    }

    /// Idempotent: no-op if already closed.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.conn = None;
        debug!(socket = %self.socket_path.display(), "closed");
    }

    pub fn is_connected(&self) -> bool {
        let inner = self.inner.lock();
        !inner.closed && inner.conn.is_some()
    }

    fn effective_deadline(&self, opts: &CallOptions) -> Duration {
        opts.deadline.unwrap_or(self.default_deadline)
    }

    /// Acquire the connection, apply the call's deadline to both halves of
    /// the socket, run `body`, then return its result. Marks the client
    /// closed if `body` fails with a cancellation/timeout (§5), or if the
    /// cancel token fires before we even get the lock.
    fn with_connection<T>(
        &self,
        operation: &'static str,
        opts: &CallOptions,
        body: impl FnOnce(&mut Connection) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        if let Some(cancel) = &opts.cancel {
            if cancel.is_canceled() {
                return Err(ClientError::Canceled { operation });
            }
        }

        let mut inner = self.inner.lock();
        if inner.closed || inner.conn.is_none() {
            return Err(ClientError::NotConnected { operation });
        }
        let deadline = self.effective_deadline(opts);
        let conn = inner.conn.as_mut().expect("checked above");
        let _ = conn.writer.set_write_timeout(Some(deadline));
        let _ = conn.parser.reader_mut().get_mut().set_read_timeout(Some(deadline));

        let result = body(conn);

        if let Err(e) = &result {
            if e.poisons_connection() {
                warn!(%operation, error = %e, "connection poisoned, marking closed");
                inner.closed = true;
                inner.conn = None;
            }
        }
        result
    }

    fn build_frame(
        verb: &str,
        args: &[&str],
        sub_verb: Option<&str>,
        payload: Option<Vec<u8>>,
    ) -> RequestFrame {
        RequestFrame {
            verb: verb.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            sub_verb: sub_verb.map(|s| s.to_string()),
            payload,
        }
    }

    /// Single-frame mode (§4.3 "sendCommand"): write one request, expect
    /// exactly one response frame. `expect` controls whether a non-JSON,
    /// non-ERR reply is a protocol error or accepted as a bare
    /// acknowledgement, matching the verb's declared response shape.
    pub fn send_command(
        &self,
        verb: &str,
        args: &[&str],
        sub_verb: Option<&str>,
        payload: Option<Vec<u8>>,
        expect: Expect,
        opts: &CallOptions,
    ) -> Result<CommandReply, ClientError> {
        const OP: &str = "send command";
        let frame = Self::build_frame(verb, args, sub_verb, payload);

        self.with_connection(OP, opts, |conn| {
            let bytes =
                encode_request(&frame).map_err(|e| e.into_client_error("encode request"))?;
            std::io::Write::write_all(&mut conn.writer, &bytes)
                .map_err(|e| ClientError::transport(OP, e))?;

            let response = conn
                .parser
                .parse_response()
                .map_err(|e| e.into_client_error(OP))?;

            match response.response_type {
                ResponseType::Err => Err(ClientError::Server {
                    code: response.code.unwrap_or_default(),
                    message: response.message.unwrap_or_default(),
                }),
                ResponseType::Pong if matches!(expect, Expect::Pong) => Ok(CommandReply::Pong),
                ResponseType::Json if matches!(expect, Expect::Json) => {
                    Ok(CommandReply::Json(response.payload.unwrap_or_default()))
                }
                ResponseType::Ok if matches!(expect, Expect::Ack | Expect::Json) => {
                    Ok(CommandReply::Ok)
                }
                other => Err(ClientError::protocol(
                    OP,
                    format!("unexpected response type {other:?} for {expect:?}"),
                )),
            }
        })
    }

    /// Chunked mode (§4.3 "sendCommandChunked"): write one request, then
    /// read frames until `END`, concatenating `CHUNK` payloads in arrival
    /// order. An `ERR` anywhere aborts with a server error. `EndOfStream`
    /// before `END` is a protocol error unless no chunks arrived yet, in
    /// which case it is the empty result — the lenient behavior §9 asks us
    /// to preserve for parity with the source implementation.
    pub fn send_command_chunked(
        &self,
        verb: &str,
        args: &[&str],
        sub_verb: Option<&str>,
        payload: Option<Vec<u8>>,
        opts: &CallOptions,
    ) -> Result<Vec<u8>, ClientError> {
        const OP: &str = "send chunked command";
        let frame = Self::build_frame(verb, args, sub_verb, payload);

        self.with_connection(OP, opts, |conn| {
            let bytes =
                encode_request(&frame).map_err(|e| e.into_client_error("encode request"))?;
            std::io::Write::write_all(&mut conn.writer, &bytes)
                .map_err(|e| ClientError::transport(OP, e))?;

            let mut collected = Vec::new();
            loop {
                match conn.parser.parse_response() {
                    Ok(response) => match response.response_type {
                        ResponseType::Chunk => {
                            if let Some(payload) = response.payload {
                                collected.extend_from_slice(&payload);
                            }
                        }
                        ResponseType::End => return Ok(collected),
                        ResponseType::Err => {
                            return Err(ClientError::Server {
                                code: response.code.unwrap_or_default(),
                                message: response.message.unwrap_or_default(),
                            })
                        }
                        other => {
                            return Err(ClientError::protocol(
                                OP,
                                format!("unexpected frame {other:?} in chunked stream"),
                            ))
                        }
                    },
                    Err(crate::error::FrameError::EndOfStream) => {
                        if collected.is_empty() {
                            return Ok(collected);
                        }
                        return Err(ClientError::protocol(OP, "stream ended before END frame"));
                    }
                    Err(e) => return Err(e.into_client_error(OP)),
                }
            }
        })
    }
}

/// What kind of response a single-frame call expects for success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Bare acknowledgement: `OK`.
    Ack,
    /// `PONG` only (used by `PING`).
    Pong,
    /// `JSON`, or `OK` for verbs that may reply either way.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Ok,
    Pong,
    Json(Vec<u8>),
}

impl CommandReply {
    pub fn into_json(self) -> Result<serde_json::Value, ClientError> {
        match self {
            CommandReply::Json(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ClientError::protocol("decode json reply", e.to_string())),
            CommandReply::Ok => Ok(serde_json::Value::Null),
            CommandReply::Pong => Ok(serde_json::Value::Bool(true)),
        }
    }
}
