//! `PROXY` verb family (§4.4): `START`, `STOP`, `STATUS`, `LIST`, `EXEC`,
//! `TOAST`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::filters::DirectoryFilter;
use crate::transport::{CallOptions, Client};

use super::{call_json, call_ok, json_payload};

/// `PROXY START` config payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProxyConfig {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

/// Decoded `PROXY STATUS`/`LIST` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyStatus {
    pub id: String,
    pub target: String,
    pub port: u16,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Client {
    /// `PROXY START id target port [maxLog] → config` → JSON status.
    #[allow(clippy::too_many_arguments)]
    pub fn proxy_start(
        &self,
        id: &str,
        target: &str,
        port: u16,
        max_log: Option<u32>,
        config: &ProxyConfig,
        opts: &CallOptions,
    ) -> Result<ProxyStatus, ClientError> {
        let port_str = port.to_string();
        let max_log_str = max_log.map(|m| m.to_string());
        let mut args: Vec<&str> = vec!["START", id, target, &port_str];
        if let Some(m) = &max_log_str {
            args.push(m);
        }
        let payload = json_payload(config)?;
        let value = call_json(self, "PROXY", &args, Some(payload), opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode proxy status", e.to_string()))
    }

    /// `PROXY STOP id` → bare acknowledgement.
    pub fn proxy_stop(&self, id: &str, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "PROXY", &["STOP", id], None, opts)
    }

    /// `PROXY STATUS id` → proxy status.
    pub fn proxy_status(&self, id: &str, opts: &CallOptions) -> Result<ProxyStatus, ClientError> {
        let value = call_json(self, "PROXY", &["STATUS", id], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode proxy status", e.to_string()))
    }

    /// `PROXY LIST [→ filter]` → list of proxy statuses.
    pub fn proxy_list(
        &self,
        filter: &DirectoryFilter,
        opts: &CallOptions,
    ) -> Result<Vec<ProxyStatus>, ClientError> {
        let payload = filter.to_payload();
        let value = call_json(self, "PROXY", &["LIST"], payload, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode proxy list", e.to_string()))
    }

    /// `PROXY EXEC id → code` → JSON result of running `code` in-page.
    pub fn proxy_exec(&self, id: &str, code: &[u8], opts: &CallOptions) -> Result<Value, ClientError> {
        call_json(self, "PROXY", &["EXEC", id], Some(code.to_vec()), opts)
    }

    /// `PROXY TOAST id → config` → bare acknowledgement.
    pub fn proxy_toast(
        &self,
        id: &str,
        config: &Value,
        opts: &CallOptions,
    ) -> Result<(), ClientError> {
        let payload = json_payload(config)?;
        call_ok(self, "PROXY", &["TOAST", id], Some(payload), opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ResponseFrame, ResponseType};
    use crate::verbs::test_support::spawn_and_connect;

    #[test]
    fn start_sends_args_and_payload_and_decodes_status() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "PROXY");
            assert_eq!(req.args, vec!["START", "proxy1", "localhost:3000", "8080", "100"]);
            let sent: Value = serde_json::from_slice(&req.payload.unwrap()).unwrap();
            assert_eq!(sent["mode"], "spa");
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(
                    serde_json::to_vec(&serde_json::json!({
                        "id": "proxy1",
                        "target": "localhost:3000",
                        "port": 8080,
                    }))
                    .unwrap(),
                ),
            }
        });

        let mut config = ProxyConfig::default();
        config
            .fields
            .insert("mode".to_string(), serde_json::json!("spa"));
        let status = client
            .proxy_start(
                "proxy1",
                "localhost:3000",
                8080,
                Some(100),
                &config,
                &CallOptions::default(),
            )
            .unwrap();
        assert_eq!(status.id, "proxy1");
        assert_eq!(status.port, 8080);
        handle.join().unwrap();
    }

    #[test]
    fn exec_sends_raw_code_as_payload() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "PROXY");
            assert_eq!(req.args, vec!["EXEC", "proxy1"]);
            assert_eq!(req.payload.as_deref(), Some(b"console.log(1)".as_slice()));
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(serde_json::to_vec(&serde_json::json!({"result": 1})).unwrap()),
            }
        });

        let value = client
            .proxy_exec("proxy1", b"console.log(1)", &CallOptions::default())
            .unwrap();
        assert_eq!(value["result"], 1);
        handle.join().unwrap();
    }
}
