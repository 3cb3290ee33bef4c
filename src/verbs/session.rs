//! `SESSION` verb family (§4.4): named endpoints that receive immediate or
//! scheduled messages, plus the client-local session-code generator
//! (§4.4 "Session-code auto-generation").

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::filters::DirectoryFilter;
use crate::transport::{CallOptions, Client};

use super::{call_json, call_ok, json_payload};

/// Decoded `SESSION GET`/`LIST` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionInfo {
    pub code: String,
    pub path: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Decoded `SESSION TASKS` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskInfo {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Client-local session code: `{command}-{wall-clock nanoseconds mod 10000}`.
///
/// Preserved exactly as specified (§9's open question flags the scheme as
/// collision-prone) so callers get deterministic keys under a frozen clock
/// in tests — `now` is taken as an explicit parameter rather than read from
/// the system clock internally for that reason.
pub fn generate_code(command: &str, now: SystemTime) -> String {
    let nanos = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos();
    format!("{command}-{}", nanos % 10_000)
}

impl Client {
    /// `SESSION REGISTER code path → meta` → bare acknowledgement.
    pub fn session_register(
        &self,
        code: &str,
        path: &str,
        meta: &Value,
        opts: &CallOptions,
    ) -> Result<(), ClientError> {
        let payload = json_payload(meta)?;
        call_ok(self, "SESSION", &["REGISTER", code, path], Some(payload), opts)
    }

    /// `SESSION UNREGISTER code` → bare acknowledgement.
    pub fn session_unregister(&self, code: &str, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "SESSION", &["UNREGISTER", code], None, opts)
    }

    /// `SESSION HEARTBEAT code` → bare acknowledgement.
    pub fn session_heartbeat(&self, code: &str, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "SESSION", &["HEARTBEAT", code], None, opts)
    }

    /// `SESSION LIST [→ filter]` → registered sessions.
    pub fn session_list(
        &self,
        filter: &DirectoryFilter,
        opts: &CallOptions,
    ) -> Result<Vec<SessionInfo>, ClientError> {
        let payload = filter.to_payload();
        let value = call_json(self, "SESSION", &["LIST"], payload, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode session list", e.to_string()))
    }

    /// `SESSION GET code` → session info.
    pub fn session_get(&self, code: &str, opts: &CallOptions) -> Result<SessionInfo, ClientError> {
        let value = call_json(self, "SESSION", &["GET", code], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode session", e.to_string()))
    }

    /// `SESSION SEND code → text` → bare acknowledgement.
    pub fn session_send(
        &self,
        code: &str,
        text: &[u8],
        opts: &CallOptions,
    ) -> Result<(), ClientError> {
        call_ok(self, "SESSION", &["SEND", code], Some(text.to_vec()), opts)
    }

    /// `SESSION SCHEDULE code duration → text` → scheduled task id.
    pub fn session_schedule(
        &self,
        code: &str,
        duration: Duration,
        text: &[u8],
        opts: &CallOptions,
    ) -> Result<String, ClientError> {
        let duration_str = duration.as_millis().to_string();
        let value = call_json(
            self,
            "SESSION",
            &["SCHEDULE", code, &duration_str],
            Some(text.to_vec()),
            opts,
        )?;
        value
            .get("taskId")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ClientError::protocol("decode scheduled task id", "missing taskId"))
    }

    /// `SESSION CANCEL taskId` → bare acknowledgement.
    pub fn session_cancel(&self, task_id: &str, opts: &CallOptions) -> Result<(), ClientError> {
        call_ok(self, "SESSION", &["CANCEL", task_id], None, opts)
    }

    /// `SESSION TASKS [→ filter]` → scheduled tasks.
    pub fn session_tasks(
        &self,
        filter: &DirectoryFilter,
        opts: &CallOptions,
    ) -> Result<Vec<TaskInfo>, ClientError> {
        let payload = filter.to_payload();
        let value = call_json(self, "SESSION", &["TASKS"], payload, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode session tasks", e.to_string()))
    }

    /// `SESSION FIND dir` → session info for the session registered at `dir`.
    pub fn session_find(&self, dir: &str, opts: &CallOptions) -> Result<SessionInfo, ClientError> {
        let value = call_json(self, "SESSION", &["FIND", dir], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode session", e.to_string()))
    }

    /// `SESSION ATTACH dir` → session info for the session newly attached
    /// to `dir`.
    pub fn session_attach(&self, dir: &str, opts: &CallOptions) -> Result<SessionInfo, ClientError> {
        let value = call_json(self, "SESSION", &["ATTACH", dir], None, opts)?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::protocol("decode session", e.to_string()))
    }
}
