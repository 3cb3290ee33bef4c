//! Verb surface (component D, §4.4): typed façades over [`crate::transport::Client`].
//!
//! Per §9's design note, verbs are modeled as one encoder/decoder pair per
//! family rather than one bespoke function signature each; every module
//! here follows the same shape: build frame arguments, pick single-frame or
//! chunked mode, decode the untyped JSON result, and — where the family
//! warrants it (§9 "layer typed decoders per verb") — expose a typed
//! newtype over that JSON without changing what the transport itself
//! returns.

mod chaos;
mod core;
mod current_page;
mod overlay;
mod proc;
mod proxy;
mod proxy_log;
mod session;
mod tunnel;

pub use chaos::{ChaosRule, ChaosStatus};
pub use core::DaemonInfo;
pub use current_page::CurrentPage;
pub use overlay::OverlayState;
pub use proc::ProcessDescriptor;
pub use proxy::{ProxyConfig, ProxyStatus};
pub use proxy_log::ProxyLogStats;
pub use session::{generate_code, SessionInfo, TaskInfo};
pub use tunnel::{TunnelConfig, TunnelStatus};

use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{CallOptions, Client, CommandReply, Expect};

/// Serialize a config payload for a `→ config` verb argument. `None` input
/// means "no payload", matching verbs that accept an optional body.
pub(crate) fn json_payload<T: Serialize>(value: &T) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(value).map_err(|e| ClientError::protocol("encode payload", e.to_string()))
}

/// Issue a single-frame command expecting `JSON` (or `OK`, decoded as
/// `null`) and return the raw decoded value. The common path for every
/// `JSON`-shaped verb in §4.4's table.
pub(crate) fn call_json(
    client: &Client,
    verb: &str,
    args: &[&str],
    payload: Option<Vec<u8>>,
    opts: &CallOptions,
) -> Result<Value, ClientError> {
    client
        .send_command(verb, args, None, payload, Expect::Json, opts)?
        .into_json()
}

/// Issue a single-frame command expecting a bare `OK` acknowledgement.
pub(crate) fn call_ok(
    client: &Client,
    verb: &str,
    args: &[&str],
    payload: Option<Vec<u8>>,
    opts: &CallOptions,
) -> Result<(), ClientError> {
    match client.send_command(verb, args, None, payload, Expect::Ack, opts)? {
        CommandReply::Ok => Ok(()),
        other => Err(ClientError::protocol(
            "expect acknowledgement",
            format!("unexpected reply {other:?}"),
        )),
    }
}

/// Issue a chunked command and return the concatenated payload bytes.
pub(crate) fn call_chunked(
    client: &Client,
    verb: &str,
    args: &[&str],
    payload: Option<Vec<u8>>,
    opts: &CallOptions,
) -> Result<Vec<u8>, ClientError> {
    client.send_command_chunked(verb, args, None, payload, opts)
}

/// Shared one-shot mock daemon for verb-family round-trip tests, so each
/// family module doesn't reimplement the listener/thread boilerplate that
/// `transport.rs`'s own tests need for a different reason (exercising the
/// transport directly rather than one verb call).
#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Read, Write};
    use std::os::unix::net::UnixListener;

    use crate::protocol::{decode_request, encode_response, RequestFrame, ResponseFrame};
    use crate::transport::Client;

    /// Bind a socket, spawn a thread that accepts one connection, decodes
    /// exactly one request frame, hands it to `respond` for inspection, and
    /// writes back whatever response frame `respond` returns. Returns a
    /// connected client and the daemon's join handle; the backing temp
    /// directory is kept alive by the returned tuple.
    pub fn spawn_and_connect(
        respond: impl FnOnce(RequestFrame) -> ResponseFrame + Send + 'static,
    ) -> (tempfile::TempDir, Client, std::thread::JoinHandle<()>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 8192];
            let n = stream.read(&mut buf).unwrap();
            let (req, _) = decode_request(&buf[..n]).unwrap();
            let reply = respond(req);
            stream
                .write_all(&encode_response(&reply).unwrap())
                .unwrap();
        });
        let client = Client::connect(&path).unwrap();
        (dir, client, handle)
    }
}
