//! Bare daemon-control verbs: `PING`, `INFO`, `SHUTDOWN`, `DETECT`,
//! `RUN-JSON` (§4.4 table, first five rows).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{CallOptions, Client, CommandReply, Expect};

use super::{call_json, call_ok, json_payload};

/// Decoded `INFO` result. Extra daemon fields are preserved in `extra` so
/// callers aren't locked out of fields this crate doesn't know about yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonInfo {
    pub version: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Client {
    /// `PING` → `PONG`. True once the daemon replies.
    pub fn ping(&self, opts: &CallOptions) -> Result<bool, ClientError> {
        match self.send_command("PING", &[], None, None, Expect::Pong, opts)? {
            CommandReply::Pong => Ok(true),
            other => Err(ClientError::protocol(
                "ping",
                format!("unexpected reply {other:?}"),
            )),
        }
    }

    /// `INFO` → daemon info object.
    pub fn info(&self, opts: &CallOptions) -> Result<DaemonInfo, ClientError> {
        let value = call_json(self, "INFO", &[], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode info", e.to_string()))
    }

    /// `SHUTDOWN` → bare acknowledgement.
    pub fn shutdown(&self, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "SHUTDOWN", &[], None, opts)
    }

    /// `DETECT [path]` → detection report.
    pub fn detect(&self, path: Option<&str>, opts: &CallOptions) -> Result<Value, ClientError> {
        let args: Vec<&str> = path.into_iter().collect();
        call_json(self, "DETECT", &args, None, opts)
    }

    /// `RUN-JSON → config` → process descriptor.
    pub fn run_json<T: Serialize>(
        &self,
        config: &T,
        opts: &CallOptions,
    ) -> Result<Value, ClientError> {
        let payload = json_payload(config)?;
        call_json(self, "RUN-JSON", &[], Some(payload), opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode_request, encode_response, ResponseFrame, ResponseType};
    use std::io::{Read, Write};
    use std::os::unix::net::UnixListener;

    #[test]
    fn daemon_info_decodes_version_and_keeps_extra_fields() {
        let value = serde_json::json!({"version": "1.0.0", "pid": 4242});
        let info: DaemonInfo = serde_json::from_value(value).unwrap();
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.extra.get("pid").and_then(|v| v.as_u64()), Some(4242));
    }

    /// S2 (spec.md §8): Connect; Ping → PONG; Info → {"version":"1.0.0"};
    /// Close; Ping → NotConnected.
    #[test]
    fn s2_scenario_connect_ping_info_close_ping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];

            let n = stream.read(&mut buf).unwrap();
            let (req, _) = decode_request(&buf[..n]).unwrap();
            assert_eq!(req.verb, "PING");
            stream
                .write_all(
                    &encode_response(&ResponseFrame {
                        response_type: ResponseType::Pong,
                        code: None,
                        message: None,
                        payload: None,
                    })
                    .unwrap(),
                )
                .unwrap();

            let n = stream.read(&mut buf).unwrap();
            let (req, _) = decode_request(&buf[..n]).unwrap();
            assert_eq!(req.verb, "INFO");
            let payload = serde_json::to_vec(&serde_json::json!({"version": "1.0.0"})).unwrap();
            stream
                .write_all(
                    &encode_response(&ResponseFrame {
                        response_type: ResponseType::Json,
                        code: None,
                        message: None,
                        payload: Some(payload),
                    })
                    .unwrap(),
                )
                .unwrap();
        });

        let client = Client::connect(&path).unwrap();
        assert!(client.ping(&CallOptions::default()).unwrap());
        let info = client.info(&CallOptions::default()).unwrap();
        assert_eq!(info.version, "1.0.0");

        client.close();
        let err = client.ping(&CallOptions::default()).unwrap_err();
        assert!(matches!(err, ClientError::NotConnected { .. }));

        handle.join().unwrap();
    }
}
