//! `OVERLAY` verb family (§4.4): `SET`, `GET`, `CLEAR`, `ACTIVITY`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{CallOptions, Client};

use super::call_json;
use super::call_ok;

/// Decoded `OVERLAY GET` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OverlayState {
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Client {
    /// `OVERLAY SET url` → bare acknowledgement.
    pub fn overlay_set(&self, url: &str, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "OVERLAY", &["SET", url], None, opts)
    }

    /// `OVERLAY GET` → overlay state.
    pub fn overlay_get(&self, opts: &CallOptions) -> Result<OverlayState, ClientError> {
        let value = call_json(self, "OVERLAY", &["GET"], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode overlay state", e.to_string()))
    }

    /// `OVERLAY CLEAR` → bare acknowledgement.
    pub fn overlay_clear(&self, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "OVERLAY", &["CLEAR"], None, opts)
    }

    /// `OVERLAY ACTIVITY bool [proxy…]` → bare acknowledgement.
    pub fn overlay_activity(
        &self,
        enabled: bool,
        proxies: &[&str],
        opts: &CallOptions,
    ) -> Result<(), ClientError> {
        let flag = enabled.to_string();
        let mut args: Vec<&str> = vec!["ACTIVITY", &flag];
        args.extend(proxies.iter().copied());
        call_ok(self, "OVERLAY", &args, None, opts)
    }
}
