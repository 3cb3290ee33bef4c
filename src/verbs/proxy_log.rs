//! `PROXY-LOG` verb family (§4.4): `QUERY`, `CLEAR`, `STATS`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{CallOptions, Client};

use super::{call_json, call_ok, json_payload};

/// Decoded `PROXY-LOG STATS` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyLogStats {
    pub entries: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Client {
    /// `PROXY-LOG QUERY id → filter` → JSON log entries.
    pub fn proxy_log_query(
        &self,
        id: &str,
        filter: &Value,
        opts: &CallOptions,
    ) -> Result<Value, ClientError> {
        let payload = json_payload(filter)?;
        call_json(self, "PROXY-LOG", &["QUERY", id], Some(payload), opts)
    }

    /// `PROXY-LOG CLEAR id` → bare acknowledgement.
    pub fn proxy_log_clear(&self, id: &str, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "PROXY-LOG", &["CLEAR", id], None, opts)
    }

    /// `PROXY-LOG STATS id` → stats object.
    pub fn proxy_log_stats(&self, id: &str, opts: &CallOptions) -> Result<ProxyLogStats, ClientError> {
        let value = call_json(self, "PROXY-LOG", &["STATS", id], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode proxy log stats", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ResponseFrame, ResponseType};
    use crate::verbs::test_support::spawn_and_connect;

    #[test]
    fn query_sends_filter_payload() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "PROXY-LOG");
            assert_eq!(req.args, vec!["QUERY", "proxy1"]);
            let sent: Value = serde_json::from_slice(&req.payload.unwrap()).unwrap();
            assert_eq!(sent["grep"], "error");
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(serde_json::to_vec(&serde_json::json!([])).unwrap()),
            }
        });

        let value = client
            .proxy_log_query(
                "proxy1",
                &serde_json::json!({"grep": "error"}),
                &CallOptions::default(),
            )
            .unwrap();
        assert!(value.as_array().unwrap().is_empty());
        handle.join().unwrap();
    }

    #[test]
    fn stats_decodes_entry_count() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "PROXY-LOG");
            assert_eq!(req.args, vec!["STATS", "proxy1"]);
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(serde_json::to_vec(&serde_json::json!({"entries": 42})).unwrap()),
            }
        });

        let stats = client
            .proxy_log_stats("proxy1", &CallOptions::default())
            .unwrap();
        assert_eq!(stats.entries, 42);
        handle.join().unwrap();
    }
}
