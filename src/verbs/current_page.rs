//! `CURRENT-PAGE` verb family (§4.4): `LIST`, `GET`, `CLEAR`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{CallOptions, Client};

use super::{call_json, call_ok};

/// Decoded `CURRENT-PAGE GET` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentPage {
    pub url: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Client {
    /// `CURRENT-PAGE LIST proxy` → JSON list of per-session current pages.
    pub fn current_page_list(&self, proxy: &str, opts: &CallOptions) -> Result<Value, ClientError> {
        call_json(self, "CURRENT-PAGE", &["LIST", proxy], None, opts)
    }

    /// `CURRENT-PAGE GET proxy session` → current page.
    pub fn current_page_get(
        &self,
        proxy: &str,
        session: &str,
        opts: &CallOptions,
    ) -> Result<CurrentPage, ClientError> {
        let value = call_json(self, "CURRENT-PAGE", &["GET", proxy, session], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode current page", e.to_string()))
    }

    /// `CURRENT-PAGE CLEAR proxy` → bare acknowledgement.
    pub fn current_page_clear(&self, proxy: &str, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "CURRENT-PAGE", &["CLEAR", proxy], None, opts)
    }
}
