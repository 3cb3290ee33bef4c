//! `CHAOS` verb family (§4.4): chaos-injection control for a proxy. Every
//! sub-verb replies `JSON` per the table, including the acknowledgement
//! ones — the daemon echoes back the resulting state rather than a bare
//! `OK`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{CallOptions, Client};

use super::{call_json, json_payload};

/// Decoded `CHAOS STATUS` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChaosStatus {
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One entry from `CHAOS LIST-RULES`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChaosRule {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Client {
    /// `CHAOS ENABLE id` → chaos status.
    pub fn chaos_enable(&self, id: &str, opts: &CallOptions) -> Result<ChaosStatus, ClientError> {
        self.chaos_status_call("ENABLE", id, opts)
    }

    /// `CHAOS DISABLE id` → chaos status.
    pub fn chaos_disable(&self, id: &str, opts: &CallOptions) -> Result<ChaosStatus, ClientError> {
        self.chaos_status_call("DISABLE", id, opts)
    }

    /// `CHAOS STATUS id` → chaos status.
    pub fn chaos_status(&self, id: &str, opts: &CallOptions) -> Result<ChaosStatus, ClientError> {
        self.chaos_status_call("STATUS", id, opts)
    }

    fn chaos_status_call(
        &self,
        sub_verb: &str,
        id: &str,
        opts: &CallOptions,
    ) -> Result<ChaosStatus, ClientError> {
        let value = call_json(self, "CHAOS", &[sub_verb, id], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode chaos status", e.to_string()))
    }

    /// `CHAOS PRESET id name` → chaos status.
    pub fn chaos_preset(
        &self,
        id: &str,
        name: &str,
        opts: &CallOptions,
    ) -> Result<ChaosStatus, ClientError> {
        let value = call_json(self, "CHAOS", &["PRESET", id, name], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode chaos status", e.to_string()))
    }

    /// `CHAOS SET id → config` → chaos status.
    pub fn chaos_set(
        &self,
        id: &str,
        config: &Value,
        opts: &CallOptions,
    ) -> Result<ChaosStatus, ClientError> {
        let payload = json_payload(config)?;
        let value = call_json(self, "CHAOS", &["SET", id], Some(payload), opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode chaos status", e.to_string()))
    }

    /// `CHAOS ADD-RULE id → rule` → the added rule.
    pub fn chaos_add_rule(
        &self,
        id: &str,
        rule: &Value,
        opts: &CallOptions,
    ) -> Result<ChaosRule, ClientError> {
        let payload = json_payload(rule)?;
        let value = call_json(self, "CHAOS", &["ADD-RULE", id], Some(payload), opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode chaos rule", e.to_string()))
    }

    /// `CHAOS REMOVE-RULE id rule` → chaos status.
    pub fn chaos_remove_rule(
        &self,
        id: &str,
        rule: &str,
        opts: &CallOptions,
    ) -> Result<ChaosStatus, ClientError> {
        let value = call_json(self, "CHAOS", &["REMOVE-RULE", id, rule], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode chaos status", e.to_string()))
    }

    /// `CHAOS LIST-RULES id` → rules for that proxy.
    pub fn chaos_list_rules(
        &self,
        id: &str,
        opts: &CallOptions,
    ) -> Result<Vec<ChaosRule>, ClientError> {
        let value = call_json(self, "CHAOS", &["LIST-RULES", id], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode chaos rules", e.to_string()))
    }

    /// `CHAOS STATS id` → stats object.
    pub fn chaos_stats(&self, id: &str, opts: &CallOptions) -> Result<Value, ClientError> {
        call_json(self, "CHAOS", &["STATS", id], None, opts)
    }

    /// `CHAOS CLEAR id` → chaos status.
    pub fn chaos_clear(&self, id: &str, opts: &CallOptions) -> Result<ChaosStatus, ClientError> {
        self.chaos_status_call("CLEAR", id, opts)
    }

    /// `CHAOS LIST-PRESETS` → available preset names.
    pub fn chaos_list_presets(&self, opts: &CallOptions) -> Result<Vec<String>, ClientError> {
        let value = call_json(self, "CHAOS", &["LIST-PRESETS"], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode chaos presets", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ResponseFrame, ResponseType};
    use crate::verbs::test_support::spawn_and_connect;

    #[test]
    fn enable_sends_expected_args_and_decodes_status() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "CHAOS");
            assert_eq!(req.args, vec!["ENABLE", "proxy1"]);
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(serde_json::to_vec(&serde_json::json!({"enabled": true})).unwrap()),
            }
        });

        let status = client
            .chaos_enable("proxy1", &CallOptions::default())
            .unwrap();
        assert!(status.enabled);
        handle.join().unwrap();
    }

    #[test]
    fn add_rule_sends_payload_and_decodes_rule() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "CHAOS");
            assert_eq!(req.args, vec!["ADD-RULE", "proxy1"]);
            let sent: Value = serde_json::from_slice(&req.payload.unwrap()).unwrap();
            assert_eq!(sent["kind"], "latency");
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(
                    serde_json::to_vec(&serde_json::json!({"id": "rule-1", "kind": "latency"}))
                        .unwrap(),
                ),
            }
        });

        let rule = client
            .chaos_add_rule(
                "proxy1",
                &serde_json::json!({"kind": "latency"}),
                &CallOptions::default(),
            )
            .unwrap();
        assert_eq!(rule.id, "rule-1");
        handle.join().unwrap();
    }

    #[test]
    fn list_presets_decodes_string_list() {
        let (_dir, client, handle) = spawn_and_connect(|req| {
            assert_eq!(req.verb, "CHAOS");
            assert_eq!(req.args, vec!["LIST-PRESETS"]);
            ResponseFrame {
                response_type: ResponseType::Json,
                code: None,
                message: None,
                payload: Some(serde_json::to_vec(&serde_json::json!(["flaky", "slow"])).unwrap()),
            }
        });

        let presets = client.chaos_list_presets(&CallOptions::default()).unwrap();
        assert_eq!(presets, vec!["flaky".to_string(), "slow".to_string()]);
        handle.join().unwrap();
    }
}
