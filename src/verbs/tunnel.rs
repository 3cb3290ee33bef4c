//! `TUNNEL` verb family (§4.4): `START`, `STOP`, `STATUS`, `LIST`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{CallOptions, Client};

use super::{call_json, call_ok, json_payload};

/// `TUNNEL START` config payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TunnelConfig {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

/// Decoded `TUNNEL STATUS`/`LIST` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TunnelStatus {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Client {
    /// `TUNNEL START → config` → tunnel status.
    pub fn tunnel_start(
        &self,
        config: &TunnelConfig,
        opts: &CallOptions,
    ) -> Result<TunnelStatus, ClientError> {
        let payload = json_payload(config)?;
        let value = call_json(self, "TUNNEL", &["START"], Some(payload), opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode tunnel status", e.to_string()))
    }

    /// `TUNNEL STOP id` → bare acknowledgement.
    pub fn tunnel_stop(&self, id: &str, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "TUNNEL", &["STOP", id], None, opts)
    }

    /// `TUNNEL STATUS id` → tunnel status.
    pub fn tunnel_status(&self, id: &str, opts: &CallOptions) -> Result<TunnelStatus, ClientError> {
        let value = call_json(self, "TUNNEL", &["STATUS", id], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode tunnel status", e.to_string()))
    }

    /// `TUNNEL LIST` → list of tunnel statuses.
    pub fn tunnel_list(&self, opts: &CallOptions) -> Result<Vec<TunnelStatus>, ClientError> {
        let value = call_json(self, "TUNNEL", &["LIST"], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode tunnel list", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ResponseFrame, ResponseType};
    use crate::verbs::test_support::spawn_and_connect;

    #[test]
    fn start_sends_config_payload_and_decodes_status() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "TUNNEL");
            assert_eq!(req.args, vec!["START"]);
            let sent: Value = serde_json::from_slice(&req.payload.unwrap()).unwrap();
            assert_eq!(sent["port"], 3000);
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(
                    serde_json::to_vec(&serde_json::json!({"id": "tun-1", "port": 3000}))
                        .unwrap(),
                ),
            }
        });

        let mut config = TunnelConfig::default();
        config
            .fields
            .insert("port".to_string(), serde_json::json!(3000));
        let status = client
            .tunnel_start(&config, &CallOptions::default())
            .unwrap();
        assert_eq!(status.id, "tun-1");
        handle.join().unwrap();
    }

    #[test]
    fn list_decodes_multiple_statuses() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "TUNNEL");
            assert_eq!(req.args, vec!["LIST"]);
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(
                    serde_json::to_vec(&serde_json::json!([
                        {"id": "tun-1"},
                        {"id": "tun-2"},
                    ]))
                    .unwrap(),
                ),
            }
        });

        let statuses = client.tunnel_list(&CallOptions::default()).unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].id, "tun-1");
        assert_eq!(statuses[1].id, "tun-2");
        handle.join().unwrap();
    }
}
