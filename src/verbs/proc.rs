//! `PROC` verb family (§4.4): `STATUS`, `OUTPUT` (chunked), `STOP`, `LIST`,
//! `CLEANUP-PORT`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::filters::{DirectoryFilter, OutputFilter};
use crate::transport::{CallOptions, Client};

use super::{call_chunked, call_json, call_ok};

/// Decoded `PROC STATUS`/`LIST` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessDescriptor {
    pub id: String,
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Client {
    /// `PROC STATUS id` → process descriptor.
    pub fn proc_status(&self, id: &str, opts: &CallOptions) -> Result<ProcessDescriptor, ClientError> {
        let value = call_json(self, "PROC", &["STATUS", id], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode process status", e.to_string()))
    }

    /// `PROC OUTPUT id <filter args>` → concatenated chunk bytes (§8 S3).
    pub fn proc_output(
        &self,
        id: &str,
        filter: &OutputFilter,
        opts: &CallOptions,
    ) -> Result<Vec<u8>, ClientError> {
        let filter_args = filter.to_args();
        let mut args: Vec<&str> = vec!["OUTPUT", id];
        args.extend(filter_args.iter().map(String::as_str));
        call_chunked(self, "PROC", &args, None, opts)
    }

    /// `PROC STOP id [force]` → bare acknowledgement.
    pub fn proc_stop(&self, id: &str, force: bool, opts: &CallOptions) -> Result<(), ClientError> {
        let mut args: Vec<&str> = vec!["STOP", id];
        if force {
            args.push("force");
        }
        call_ok(self, "PROC", &args, None, opts)
    }

    /// `PROC LIST [→ filter]` → list of process descriptors.
    pub fn proc_list(
        &self,
        filter: &DirectoryFilter,
        opts: &CallOptions,
    ) -> Result<Vec<ProcessDescriptor>, ClientError> {
        let payload = filter.to_payload();
        let value = call_json(self, "PROC", &["LIST"], payload, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode process list", e.to_string()))
    }

    /// `PROC CLEANUP-PORT port` → bare acknowledgement.
    pub fn proc_cleanup_port(&self, port: u16, opts: &CallOptions) -> Result<(), ClientError> {
        let port_str = port.to_string();
        call_ok(self, "PROC", &["CLEANUP-PORT", &port_str], None, opts)
    }
}
